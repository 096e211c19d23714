//! Commonality scoring and the running best word.

use crate::hash::WordHash;
use crate::table::{Counts, FrequencyTable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// How a word's two counts combine into one commonality score.
///
/// Both metrics grow strictly with either count once both are non-zero, so a
/// word's score never goes down during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Metric {
    /// 2ab / (a + b). Favors words frequent in both corpora.
    #[default]
    Harmonic,
    /// sqrt(ab). Scores lopsided pairs more generously.
    Geometric,
}

impl Metric {
    /// Score a pair of counts. `None` unless the word occurs in both corpora.
    #[inline]
    pub fn score(self, counts: Counts) -> Option<f64> {
        if !counts.is_shared() {
            return None;
        }

        let a = counts.a as f64;
        let b = counts.b as f64;

        Some(match self {
            Metric::Harmonic => 2.0 * a * b / (a + b),
            Metric::Geometric => (a * b).sqrt(),
        })
    }
}

/// The winning word and its score
#[derive(Debug, Clone, PartialEq)]
pub struct Best {
    pub word: Arc<str>,
    pub score: f64,
}

impl Best {
    /// Whether `(score, word)` should replace this best.
    ///
    /// Higher score wins; equal scores go to the lexicographically smaller
    /// word, which makes the winner independent of thread interleaving.
    fn is_beaten_by(&self, score: f64, word: &str) -> bool {
        score > self.score || (score == self.score && word < &*self.word)
    }
}

/// Tracks the highest-scoring shared word seen so far.
///
/// Score and word are only ever compared and replaced together under one
/// lock. `floor` mirrors the locked score so most offers can be rejected
/// without locking; it is only written while the lock is held.
#[derive(Debug)]
pub struct Scorer {
    metric: Metric,
    best: Mutex<Option<Best>>,
    floor: AtomicU64,
}

impl Scorer {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            best: Mutex::new(None),
            floor: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Offer a word's latest counts. Returns true if it became the best.
    #[inline]
    pub fn offer(&self, word: &Arc<str>, counts: Counts) -> bool {
        let Some(score) = self.metric.score(counts) else {
            return false;
        };

        if score < f64::from_bits(self.floor.load(Ordering::Acquire)) {
            return false;
        }

        let mut best = self.best.lock();
        let replace = match best.as_ref() {
            Some(current) => current.is_beaten_by(score, word),
            None => true,
        };

        if replace {
            *best = Some(Best {
                word: Arc::clone(word),
                score,
            });
            self.floor.store(score.to_bits(), Ordering::Release);
        }

        replace
    }

    /// The best word so far, if any shared word has been seen
    pub fn best(&self) -> Option<Best> {
        self.best.lock().clone()
    }
}

/// Find the best word by walking a finished table.
///
/// Applies the same metric and tie-break as [`Scorer`]; useful to check a
/// running result against the full vocabulary.
pub fn scan_best<H: WordHash>(table: &FrequencyTable<H>, metric: Metric) -> Option<Best> {
    let mut best: Option<Best> = None;

    for (word, counts) in table.snapshot() {
        let Some(score) = metric.score(counts) else {
            continue;
        };
        let replace = match best.as_ref() {
            Some(current) => current.is_beaten_by(score, &word),
            None => true,
        };
        if replace {
            best = Some(Best { word, score });
        }
    }

    best
}
