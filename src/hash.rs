//! Word hash strategies for the frequency table.
//!
//! The strategy is a type parameter of the table, fixed when the table is
//! built. Distribution quality only affects chain length, never counts.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// A string hash used to pick a bucket
pub trait WordHash: Default + Send + Sync {
    fn hash_word(&self, word: &[u8]) -> u64;
}

/// Runtime name of a hash strategy, resolved once into a concrete type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HashKind {
    /// FxHash from rustc-hash
    #[default]
    Fx,
    /// Weinberger's PJW hash
    Weinberger,
    /// Sedgewick's universal string hash
    Sedgewick,
    /// h = c + 211 * h
    Multiplicative,
}

/// FxHash (case-sensitive, same as `Hash for [u8]` would feed it)
#[derive(Debug, Clone, Copy, Default)]
pub struct FxWordHash;

impl WordHash for FxWordHash {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(word);
        hasher.finish()
    }
}

/// Peter Weinberger's hash, as described in the dragon book
#[derive(Debug, Clone, Copy, Default)]
pub struct WeinbergerHash;

impl WordHash for WeinbergerHash {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u64 {
        const BITS: u32 = u32::BITS;
        const THREE_FOURTHS: u32 = BITS * 3 / 4;
        const ONE_EIGHTH: u32 = BITS / 8;
        const HIGH_BITS: u32 = u32::MAX << (BITS - ONE_EIGHTH);

        let mut hash: u32 = 0;
        for &byte in word {
            hash = (hash << ONE_EIGHTH).wrapping_add(byte as u32);
            let high = hash & HIGH_BITS;
            if high != 0 {
                hash = (hash ^ (high >> THREE_FOURTHS)) & !HIGH_BITS;
            }
        }
        hash as u64
    }
}

/// Sedgewick's universal hash for string keys (Algorithms in C, p. 579)
#[derive(Debug, Clone, Copy, Default)]
pub struct SedgewickHash;

impl WordHash for SedgewickHash {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u64 {
        let mut hash: u32 = 0;
        let mut a: u32 = 0x7ab7;
        let b: u32 = 0x6a2f;

        for &byte in word {
            hash = a.wrapping_mul(hash).wrapping_add(byte as u32);
            a = a.wrapping_mul(b);
        }
        hash as u64
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplicativeHash;

impl WordHash for MultiplicativeHash {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u64 {
        word.iter()
            .fold(0u64, |h, &byte| (byte as u64).wrapping_add(h.wrapping_mul(211)))
    }
}
