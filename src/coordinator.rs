use crate::chunk::{Corpus, CorpusFile};
use crate::error::{CommonError, Result};
use crate::hash::{
    FxWordHash, HashKind, MultiplicativeHash, SedgewickHash, WeinbergerHash, WordHash,
};
use crate::score::{scan_best, Best, Metric, Scorer};
use crate::table::{BucketStats, FrequencyTable, DEFAULT_BUCKETS};
use crate::worker::{run_worker, WorkerStats};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Default bytes per claimed chunk
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest accepted chunk; every worker allocates one buffer of this size
pub const MAX_CHUNK_SIZE: usize = 1 << 30;

/// Configuration for one comparison run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Total worker threads across both corpora (each corpus gets at least one)
    pub threads: usize,

    /// Bytes per claimed chunk
    pub chunk_size: usize,

    /// Frequency table bucket count
    pub buckets: usize,

    pub metric: Metric,

    pub hash: HashKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);

        Self {
            threads: threads.max(2),
            chunk_size: DEFAULT_CHUNK_SIZE,
            buckets: DEFAULT_BUCKETS,
            metric: Metric::default(),
            hash: HashKind::default(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(CommonError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(CommonError::InvalidConfig(
                "chunk size must be at least 1 byte".to_string(),
            ));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(CommonError::InvalidConfig(format!(
                "chunk size {} exceeds the {} byte limit",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }
        if self.buckets == 0 {
            return Err(CommonError::InvalidConfig(
                "bucket count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Worker count per corpus, indexed by [`Corpus::index`].
    ///
    /// The budget is split evenly; an odd extra worker goes to corpus A, and
    /// a budget below two still gives each corpus one worker.
    pub fn workers_per_corpus(&self) -> [usize; 2] {
        let total = self.threads.max(2);
        [total - total / 2, total / 2]
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Most commonly shared word, if any word occurs in both corpora
    pub best: Option<Best>,

    /// Distinct words across both corpora
    pub distinct_words: usize,

    /// Words counted per corpus, indexed by [`Corpus::index`]
    pub words: [u64; 2],

    /// Bytes read per corpus
    pub bytes: [u64; 2],

    pub workers: Vec<WorkerStats>,

    pub buckets: BucketStats,

    pub elapsed: Duration,
}

impl RunReport {
    pub fn word(&self) -> Option<&str> {
        self.best.as_ref().map(|b| &*b.word)
    }
}

/// Find the most commonly shared word of two files
pub fn find_common_word(first: &Path, second: &Path, config: &RunConfig) -> Result<RunReport> {
    config.validate()?;

    // Both inputs must open before any table or thread exists
    let sources = [
        CorpusFile::open(Corpus::A, first, config.chunk_size)?,
        CorpusFile::open(Corpus::B, second, config.chunk_size)?,
    ];

    match config.hash {
        HashKind::Fx => run_with(sources, config, FxWordHash),
        HashKind::Weinberger => run_with(sources, config, WeinbergerHash),
        HashKind::Sedgewick => run_with(sources, config, SedgewickHash),
        HashKind::Multiplicative => run_with(sources, config, MultiplicativeHash),
    }
}

fn run_with<H: WordHash>(
    sources: [CorpusFile; 2],
    config: &RunConfig,
    hasher: H,
) -> Result<RunReport> {
    let start = Instant::now();
    let split = config.workers_per_corpus();

    let table = FrequencyTable::with_hasher(config.buckets, hasher);
    let scorer = Scorer::new(config.metric);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(split[0] + split[1])
        .thread_name(|i| format!("common-worker-{}", i))
        .build()?;

    for source in &sources {
        log::debug!(
            "{:?}: {} workers on {}",
            source.corpus(),
            split[source.corpus().index()],
            source.path().display()
        );
    }

    let (tx, rx) = mpsc::channel::<WorkerStats>();

    // Every spawned worker finishes before scope returns
    pool.scope(|s| {
        let mut next_id = 0;
        for source in &sources {
            for _ in 0..split[source.corpus().index()] {
                let id = next_id;
                next_id += 1;

                let tx = tx.clone();
                let (table, scorer) = (&table, &scorer);
                s.spawn(move |_| {
                    let stats = run_worker(id, source, table, scorer);
                    let _ = tx.send(stats);
                });
            }
        }
    });

    drop(tx);

    let mut workers: Vec<WorkerStats> = rx.into_iter().collect();
    workers.sort_by_key(|w| w.id);

    let mut words = [0u64; 2];
    let mut bytes = [0u64; 2];
    for worker in &workers {
        words[worker.corpus.index()] += worker.words;
        bytes[worker.corpus.index()] += worker.bytes;
    }

    let report = RunReport {
        best: scorer.best(),
        distinct_words: table.len(),
        words,
        bytes,
        workers,
        buckets: table.bucket_stats(),
        elapsed: start.elapsed(),
    };

    log::info!(
        "counted {} + {} words ({} distinct) in {:.3}s",
        report.words[0],
        report.words[1],
        report.distinct_words,
        report.elapsed.as_secs_f64()
    );
    log::debug!(
        "table: {} of {} buckets occupied, longest chain {}",
        report.buckets.occupied,
        report.buckets.buckets,
        report.buckets.longest_chain
    );
    match &report.best {
        Some(best) => log::debug!("best: {:?} scored {} ({:?})", best.word, best.score, config.metric),
        None => log::debug!("no word occurs in both files"),
    }

    if log::log_enabled!(log::Level::Debug) {
        let scanned = scan_best(&table, config.metric);
        if scanned != report.best {
            log::warn!(
                "running best {:?} disagrees with full table scan {:?}",
                report.best,
                scanned
            );
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Counts;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_pair(a: &str, b: &str) -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        std::fs::write(&first, a).unwrap();
        std::fs::write(&second, b).unwrap();
        (dir, first, second)
    }

    fn config(threads: usize, chunk_size: usize) -> RunConfig {
        RunConfig {
            threads,
            chunk_size,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_cat_dog_bird() {
        let (_dir, a, b) = write_pair("cat dog dog", "dog dog cat bird");

        let report = find_common_word(&a, &b, &config(4, 4096)).unwrap();

        assert_eq!(report.word(), Some("dog"));
        assert_eq!(report.best.as_ref().unwrap().score, 2.0);
        assert_eq!(report.distinct_words, 3);
        assert_eq!(report.words, [3, 4]);
    }

    #[test]
    fn test_empty_files() {
        let (_dir, a, b) = write_pair("", "");
        let report = find_common_word(&a, &b, &config(2, 64)).unwrap();

        assert!(report.word().is_none());
        assert_eq!(report.distinct_words, 0);
    }

    #[test]
    fn test_disjoint_vocabulary() {
        let (_dir, a, b) = write_pair("apple banana cherry", "dog elephant fox");
        let report = find_common_word(&a, &b, &config(3, 64)).unwrap();

        assert!(report.word().is_none());
        assert_eq!(report.distinct_words, 6);
    }

    #[test]
    fn test_identical_single_word() {
        let (_dir, a, b) = write_pair("the", "the");
        let report = find_common_word(&a, &b, &config(2, 64)).unwrap();
        assert_eq!(report.word(), Some("the"));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let (_dir, a, b) = write_pair("The The The", "the the the");
        let report = find_common_word(&a, &b, &config(2, 64)).unwrap();
        assert!(report.word().is_none());
    }

    #[test]
    fn test_harmonic_and_geometric_disagree() {
        // "even": (10, 10); "skew": (2, 100)
        let a = format!("{}{}", "even ".repeat(10), "skew ".repeat(2));
        let b = format!("{}{}", "even ".repeat(10), "skew ".repeat(100));
        let (_dir, a, b) = write_pair(&a, &b);

        let harmonic = find_common_word(&a, &b, &config(2, 4096)).unwrap();
        let geometric = find_common_word(
            &a,
            &b,
            &RunConfig {
                metric: Metric::Geometric,
                ..config(2, 4096)
            },
        )
        .unwrap();

        assert_eq!(harmonic.word(), Some("even"));
        assert_eq!(geometric.word(), Some("skew"));
    }

    #[test]
    fn test_worker_count_does_not_change_counts() {
        let text_a = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do ".repeat(300);
        let text_b = "sed ut perspiciatis unde omnis iste natus error sit ".repeat(300);
        let (_dir, a, b) = write_pair(&text_a, &text_b);

        // Same chunk size, so the same boundaries fall in the same places
        let run = |threads| find_common_word(&a, &b, &config(threads, 37)).unwrap();
        let single = run(2);
        let many = run(9);

        assert_eq!(single.words, many.words);
        assert_eq!(single.distinct_words, many.distinct_words);
        assert_eq!(single.word(), many.word());
        assert_eq!(single.best, many.best);
    }

    #[test]
    fn test_running_best_matches_full_scan() {
        let text_a = "one two two three three three four four four four ".repeat(50);
        let text_b = "four three three two two two two one one one one one ".repeat(50);
        let (_dir, a, b) = write_pair(&text_a, &text_b);

        let cfg = config(6, 4096 * 16);
        let sources = [
            CorpusFile::open(Corpus::A, &a, cfg.chunk_size).unwrap(),
            CorpusFile::open(Corpus::B, &b, cfg.chunk_size).unwrap(),
        ];
        let report = run_with(sources, &cfg, FxWordHash).unwrap();

        // Chunks are larger than either file, so counts are exact:
        // one(50, 250) two(100, 200) three(150, 100) four(200, 50)
        let table = FrequencyTable::new(DEFAULT_BUCKETS);
        for (word, counts) in [
            ("one", Counts::new(50, 250)),
            ("two", Counts::new(100, 200)),
            ("three", Counts::new(150, 100)),
            ("four", Counts::new(200, 50)),
        ] {
            for _ in 0..counts.a {
                table.increment(word, Corpus::A);
            }
            for _ in 0..counts.b {
                table.increment(word, Corpus::B);
            }
        }

        let expected = scan_best(&table, Metric::Harmonic).unwrap();
        assert_eq!(report.best, Some(expected));
        assert_eq!(report.word(), Some("two"));
    }

    #[test]
    fn test_every_hash_strategy_agrees() {
        let (_dir, a, b) = write_pair(
            "to be or not to be that is the question",
            "the rest is silence to be sure",
        );

        let words: Vec<Option<String>> = [
            HashKind::Fx,
            HashKind::Weinberger,
            HashKind::Sedgewick,
            HashKind::Multiplicative,
        ]
        .into_iter()
        .map(|hash| {
            let cfg = RunConfig {
                hash,
                buckets: 5,
                ..config(4, 8)
            };
            find_common_word(&a, &b, &cfg)
                .unwrap()
                .word()
                .map(str::to_string)
        })
        .collect();

        assert!(words.iter().all(|w| w == &words[0]));
        assert!(words[0].is_some());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let (dir, a, _b) = write_pair("x", "y");
        let missing = dir.path().join("nope.txt");

        let err = find_common_word(&a, &missing, &config(2, 64)).unwrap_err();
        assert!(matches!(err, CommonError::Open { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (_dir, a, b) = write_pair("x", "x");

        let zero_chunk = find_common_word(&a, &b, &config(2, 0)).unwrap_err();
        assert!(matches!(zero_chunk, CommonError::InvalidConfig(_)));

        let zero_threads = find_common_word(&a, &b, &config(0, 64)).unwrap_err();
        assert!(matches!(zero_threads, CommonError::InvalidConfig(_)));
    }

    #[test]
    fn test_oversized_chunk_rejected_before_workers_start() {
        let (_dir, a, b) = write_pair("x", "x");

        for chunk_size in [MAX_CHUNK_SIZE + 1, usize::MAX] {
            let err = find_common_word(&a, &b, &config(2, chunk_size)).unwrap_err();
            assert!(matches!(err, CommonError::InvalidConfig(_)));
            assert!(err.to_string().contains("chunk size"));
        }

        assert!(config(2, MAX_CHUNK_SIZE).validate().is_ok());
    }

    #[test]
    fn test_workers_per_corpus() {
        assert_eq!(config(1, 1).workers_per_corpus(), [1, 1]);
        assert_eq!(config(2, 1).workers_per_corpus(), [1, 1]);
        assert_eq!(config(5, 1).workers_per_corpus(), [3, 2]);
        assert_eq!(config(8, 1).workers_per_corpus(), [4, 4]);
    }

    #[test]
    fn test_default_config() {
        let cfg = RunConfig::default();
        assert!(cfg.threads >= 2);
        assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(cfg.buckets, DEFAULT_BUCKETS);
        assert_eq!(cfg.metric, Metric::Harmonic);
        assert_eq!(cfg.hash, HashKind::Fx);
        assert!(cfg.validate().is_ok());
    }
}
