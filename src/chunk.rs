//! Corpus descriptors and the per-corpus chunk allocator.

use crate::error::{CommonError, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// One of the two inputs being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corpus {
    A,
    B,
}

impl Corpus {
    /// Both corpora, in processing order
    pub const ALL: [Corpus; 2] = [Corpus::A, Corpus::B];

    /// Index into per-corpus arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Corpus::A => 0,
            Corpus::B => 1,
        }
    }
}

/// A claimed byte range of one corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub offset: u64,
    pub size: usize,
}

/// Hands out non-overlapping, strictly increasing chunks of one corpus.
///
/// The claimed size is always the configured chunk size; the range may run
/// past the end of the file, in which case the read comes back short or
/// empty.
#[derive(Debug)]
pub struct ChunkAllocator {
    cursor: AtomicU64,
    chunk_size: usize,
}

impl ChunkAllocator {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            cursor: AtomicU64::new(0),
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Claim the next chunk.
    ///
    /// Read and advance happen in a single fetch-and-add, so no two claimers
    /// can observe the same cursor value.
    #[inline]
    pub fn claim(&self) -> Chunk {
        let offset = self
            .cursor
            .fetch_add(self.chunk_size as u64, Ordering::Relaxed);

        Chunk {
            offset,
            size: self.chunk_size,
        }
    }
}

/// An opened input file bound to its corpus and its chunk allocator
#[derive(Debug)]
pub struct CorpusFile {
    corpus: Corpus,
    path: PathBuf,
    file: File,
    allocator: ChunkAllocator,
}

impl CorpusFile {
    /// Open `path` for reading. Failure is a configuration error.
    pub fn open(corpus: Corpus, path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| CommonError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let metadata = file.metadata().map_err(|source| CommonError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            return Err(CommonError::Open {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "is a directory"),
            });
        }

        Ok(Self {
            corpus,
            path: path.to_path_buf(),
            file,
            allocator: ChunkAllocator::new(chunk_size),
        })
    }

    pub fn corpus(&self) -> Corpus {
        self.corpus
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn claim(&self) -> Chunk {
        self.allocator.claim()
    }

    pub fn chunk_size(&self) -> usize {
        self.allocator.chunk_size()
    }

    /// Wrap an already opened handle, skipping the checks in [`open`].
    ///
    /// [`open`]: CorpusFile::open
    #[cfg(test)]
    pub(crate) fn from_file(corpus: Corpus, path: &Path, file: File, chunk_size: usize) -> Self {
        Self {
            corpus,
            path: path.to_path_buf(),
            file,
            allocator: ChunkAllocator::new(chunk_size),
        }
    }

    /// Read `chunk` into `buf` without touching any shared file position.
    ///
    /// Returns the number of bytes read; 0 means the chunk starts at or past
    /// end of file. Short reads before end of file are continued until the
    /// chunk is full.
    pub fn read_chunk(&self, chunk: Chunk, buf: &mut [u8]) -> io::Result<usize> {
        fill_chunk(chunk, buf, |buf, offset| read_at(&self.file, buf, offset))
    }
}

/// Fill `buf` from `chunk` through a positional reader.
///
/// `Interrupted` is retried; any other error is returned as is.
fn fill_chunk<R>(chunk: Chunk, buf: &mut [u8], mut read: R) -> io::Result<usize>
where
    R: FnMut(&mut [u8], u64) -> io::Result<usize>,
{
    let want = chunk.size.min(buf.len());
    let mut filled = 0;

    while filled < want {
        match read(&mut buf[filled..want], chunk.offset + filled as u64) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}
