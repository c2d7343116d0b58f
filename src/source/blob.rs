//! Blob collaborators: length-queryable byte containers served through
//! sub-range reads.

use std::io;
use std::ops::Range;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// A byte container with a known length that can serve arbitrary sub-ranges.
///
/// This is the random-access collaborator behind the blob-slicing read
/// modes. Implementations only need cheap length queries and the ability to
/// materialize one sub-range at a time; the reader never asks for a range
/// outside `0..size()` and never holds more than one materialized range.
#[async_trait]
pub trait Blob: Send {
    /// Total length in bytes.
    fn size(&self) -> u64;

    /// Materialize the bytes in `range`.
    ///
    /// Ranges arrive in ascending order for forward reads and descending
    /// order for backward reads, so implementations must support
    /// repositioning between calls.
    async fn read_range(&mut self, range: Range<u64>) -> io::Result<Bytes>;
}

/// An in-memory blob.
pub struct MemoryBlob {
    data: Bytes,
}

impl MemoryBlob {
    /// Wrap a byte buffer.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl Blob for MemoryBlob {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_range(&mut self, range: Range<u64>) -> io::Result<Bytes> {
        Ok(self.data.slice(range.start as usize..range.end as usize))
    }
}

/// A file-backed blob reading ranges through seek + read.
pub struct FileBlob {
    file: File,
    size: u64,
}

impl FileBlob {
    /// Open a file and record its current length.
    ///
    /// The length is sampled once; mutating the file while a reader is
    /// driving it is not supported.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path).await?;
        let size = file.metadata().await?.len();
        Ok(Self { file, size })
    }
}

#[async_trait]
impl Blob for FileBlob {
    fn size(&self) -> u64 {
        self.size
    }

    async fn read_range(&mut self, range: Range<u64>) -> io::Result<Bytes> {
        self.file.seek(io::SeekFrom::Start(range.start)).await?;
        let mut buf = vec![0u8; (range.end - range.start) as usize];
        self.file.read_exact(&mut buf).await?;
        Ok(buf.into())
    }
}
