//! A worker drains chunks of one corpus into the shared table.

use crate::chunk::{Corpus, CorpusFile};
use crate::hash::WordHash;
use crate::score::Scorer;
use crate::table::FrequencyTable;
use crate::tokenizer::tokenize;

/// What one worker did before it ran out of chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub id: usize,
    pub corpus: Corpus,
    pub chunks: u64,
    pub bytes: u64,
    pub words: u64,
}

/// Claim, read and tokenize chunks until one reads back empty.
///
/// A read error ends this worker only; the error is logged and the chunk is
/// dropped. Other workers on the same corpus keep claiming.
pub fn run_worker<H: WordHash>(
    id: usize,
    source: &CorpusFile,
    table: &FrequencyTable<H>,
    scorer: &Scorer,
) -> WorkerStats {
    let corpus = source.corpus();
    let mut buf = vec![0u8; source.chunk_size()];
    let mut stats = WorkerStats {
        id,
        corpus,
        chunks: 0,
        bytes: 0,
        words: 0,
    };

    loop {
        let chunk = source.claim();

        let read = match source.read_chunk(chunk, &mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                log::warn!(
                    "worker {} stopping: read of {} at offset {} failed: {}",
                    id,
                    source.path().display(),
                    chunk.offset,
                    e
                );
                break;
            }
        };

        stats.chunks += 1;
        stats.bytes += read as u64;

        for word in tokenize(&buf[..read]) {
            table.increment_with(word, corpus, |word, counts| scorer.offer(word, counts));
            stats.words += 1;
        }
    }

    log::debug!(
        "worker {} ({:?}) done: {} chunks, {} bytes, {} words",
        id,
        corpus,
        stats.chunks,
        stats.bytes,
        stats.words
    );

    stats
}
