//! Find the word most commonly shared between two large text files
//!
//! Worker threads on each file claim fixed-size chunks, split them into
//! ASCII alphanumeric words and count every word into one shared, sharded
//! frequency table. After each count the word's commonality score (the
//! harmonic mean of its two counts by default) is offered to a running best,
//! so no final pass over the table is needed.
//!
//! # Example
//!
//! ```no_run
//! use common::{find_common_word, RunConfig};
//! use std::path::Path;
//!
//! let config = RunConfig::default();
//! let report = find_common_word(Path::new("a.txt"), Path::new("b.txt"), &config).unwrap();
//!
//! if let Some(word) = report.word() {
//!     println!("{}", word);
//! }
//! ```

mod chunk;
mod coordinator;
mod error;
mod hash;
mod score;
mod table;
mod tokenizer;
mod worker;

// Re-export public API
pub use chunk::{Chunk, ChunkAllocator, Corpus, CorpusFile};
pub use coordinator::{
    find_common_word, RunConfig, RunReport, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE,
};
pub use error::{CommonError, Result};
pub use hash::{
    FxWordHash, HashKind, MultiplicativeHash, SedgewickHash, WeinbergerHash, WordHash,
};
pub use score::{scan_best, Best, Metric, Scorer};
pub use table::{BucketStats, Counts, FrequencyTable, DEFAULT_BUCKETS};
pub use tokenizer::{is_word_byte, tokenize, WordIterator};
pub use worker::{run_worker, WorkerStats};
