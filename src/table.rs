//! Concurrent word frequency table.
//!
//! A fixed array of buckets, each a collision chain behind its own
//! reader/writer lock. Lookups of known words only take the bucket's read
//! lock plus the entry's own counter lock, so any number of workers can bump
//! existing words in the same bucket at once. Inserting a new word takes the
//! bucket's write lock and re-checks the chain before linking.
//!
//! Lock order is always bucket, then entry. Entries are never unlinked or
//! reordered once pushed, so a chain index stays valid for the whole run.
//! The table never resizes; heavy collisions only make chains longer.

use crate::chunk::Corpus;
use crate::hash::{FxWordHash, WordHash};
use parking_lot::{Mutex, RwLock, RwLockWriteGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Bucket count used when nothing else is configured
pub const DEFAULT_BUCKETS: usize = 52_379;

/// Occurrence counts of one word, one per corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub a: u64,
    pub b: u64,
}

impl Counts {
    pub fn new(a: u64, b: u64) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn get(&self, corpus: Corpus) -> u64 {
        match corpus {
            Corpus::A => self.a,
            Corpus::B => self.b,
        }
    }

    #[inline]
    fn bump(&mut self, corpus: Corpus) {
        match corpus {
            Corpus::A => self.a += 1,
            Corpus::B => self.b += 1,
        }
    }

    /// Whether the word has been seen in both corpora
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.a > 0 && self.b > 0
    }
}

/// One distinct word and its counters
#[derive(Debug)]
struct Entry {
    word: Arc<str>,
    counts: Mutex<Counts>,
}

impl Entry {
    fn new(word: &str) -> Self {
        Self {
            word: Arc::from(word),
            counts: Mutex::new(Counts::default()),
        }
    }

    #[inline]
    fn bump(&self, corpus: Corpus) -> Counts {
        let mut counts = self.counts.lock();
        counts.bump(corpus);
        *counts
    }
}

type Bucket = RwLock<Vec<Entry>>;

/// Chain length figures for a finished table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    pub buckets: usize,
    pub occupied: usize,
    pub longest_chain: usize,
}

pub struct FrequencyTable<H: WordHash = FxWordHash> {
    buckets: Box<[Bucket]>,
    hasher: H,
    len: AtomicUsize,
}

impl FrequencyTable<FxWordHash> {
    /// Create a table with the default hash strategy
    pub fn new(buckets: usize) -> Self {
        Self::with_hasher(buckets, FxWordHash)
    }
}

impl<H: WordHash> FrequencyTable<H> {
    /// Create a table with `buckets` chains (at least one) hashed by `hasher`
    pub fn with_hasher(buckets: usize, hasher: H) -> Self {
        let buckets = (0..buckets.max(1))
            .map(|_| RwLock::new(Vec::new()))
            .collect();

        Self {
            buckets,
            hasher,
            len: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn bucket(&self, word: &str) -> &Bucket {
        let hash = self.hasher.hash_word(word.as_bytes());
        &self.buckets[(hash % self.buckets.len() as u64) as usize]
    }

    /// Count one occurrence of `word` in `corpus` and return the new counts
    pub fn increment(&self, word: &str, corpus: Corpus) -> Counts {
        self.increment_with(word, corpus, |_, counts| counts)
    }

    /// Count one occurrence of `word` in `corpus`, then hand the interned word
    /// and the post-increment counts to `observe`.
    ///
    /// `observe` runs while the bucket is still read-locked, so it must not
    /// touch this table.
    pub fn increment_with<F, R>(&self, word: &str, corpus: Corpus, observe: F) -> R
    where
        F: FnOnce(&Arc<str>, Counts) -> R,
    {
        let bucket = self.bucket(word);

        {
            let chain = bucket.read();
            if let Some(entry) = chain.iter().find(|e| &*e.word == word) {
                let counts = entry.bump(corpus);
                return observe(&entry.word, counts);
            }
        }

        // Allocate before taking the write lock to keep it short
        let fresh = Entry::new(word);

        let mut chain = bucket.write();
        let index = match chain.iter().position(|e| &*e.word == word) {
            // Another worker linked it first; `fresh` is dropped
            Some(index) => index,
            None => {
                chain.push(fresh);
                self.len.fetch_add(1, Ordering::Relaxed);
                chain.len() - 1
            }
        };

        let chain = RwLockWriteGuard::downgrade(chain);
        let entry = &chain[index];
        let counts = entry.bump(corpus);
        observe(&entry.word, counts)
    }

    /// Current counts of `word`, if it has been seen
    pub fn counts(&self, word: &str) -> Option<Counts> {
        let chain = self.bucket(word).read();
        chain
            .iter()
            .find(|e| &*e.word == word)
            .map(|e| *e.counts.lock())
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Copy out every word and its counts
    pub fn snapshot(&self) -> Vec<(Arc<str>, Counts)> {
        let mut entries = Vec::with_capacity(self.len());
        for bucket in self.buckets.iter() {
            let chain = bucket.read();
            entries.extend(chain.iter().map(|e| (Arc::clone(&e.word), *e.counts.lock())));
        }
        entries
    }

    pub fn bucket_stats(&self) -> BucketStats {
        let mut stats = BucketStats {
            buckets: self.buckets.len(),
            ..Default::default()
        };

        for bucket in self.buckets.iter() {
            let chain_len = bucket.read().len();
            if chain_len > 0 {
                stats.occupied += 1;
            }
            stats.longest_chain = stats.longest_chain.max(chain_len);
        }

        stats
    }
}
