//! Input normalization: three accepted input kinds behind one pull-based
//! chunk producer.
//!
//! An [`Input`] is whatever the caller hands in: an HTTP response, a generic
//! chunked byte stream, or a [`Blob`]. A `ChunkSource` is what the reader
//! drives: `pull` yields opaque byte chunks until the end marker, the total
//! size is known or not, and `release` drops the underlying handle exactly
//! once.

mod blob;

pub use blob::{Blob, FileBlob, MemoryBlob};

use std::collections::VecDeque;
use std::io;
use std::ops::Range;

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use tracing::debug;

use crate::error::{ReadError, Result};
use crate::reader::Direction;
use crate::record::Origin;

/// Byte length of the ranges a blob is sliced into.
///
/// Balances per-pull overhead against the memory held by one materialized
/// range; not externally tunable.
pub(crate) const SLICE_CHUNK_SIZE: u64 = 64 * 1024;

/// The input kinds accepted by the entry operations.
pub enum Input {
    /// An HTTP response. Total size comes from the `Content-Length` header
    /// when present.
    #[cfg(feature = "reqwest")]
    Response(reqwest::Response),
    /// An arbitrary chunked byte stream, with an optionally known total size.
    Stream {
        /// The chunk producer.
        stream: BoxStream<'static, io::Result<Bytes>>,
        /// Total size in bytes, when the caller knows it.
        size: Option<u64>,
    },
    /// A length-queryable blob served through sub-range reads.
    Blob(Box<dyn Blob>),
}

impl Input {
    /// Wrap a chunked byte stream of unknown total size.
    pub fn stream<S>(stream: S) -> Self
    where
        S: futures_util::Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self::Stream {
            stream: stream.boxed(),
            size: None,
        }
    }

    /// Wrap a chunked byte stream whose total size the caller knows.
    pub fn sized_stream<S>(stream: S, size: u64) -> Self
    where
        S: futures_util::Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self::Stream {
            stream: stream.boxed(),
            size: Some(size),
        }
    }

    /// Wrap a blob.
    pub fn blob<B>(blob: B) -> Self
    where
        B: Blob + 'static,
    {
        Self::Blob(Box::new(blob))
    }

    /// Wrap an in-memory byte buffer as a blob.
    pub fn memory(data: impl Into<Bytes>) -> Self {
        Self::blob(MemoryBlob::new(data))
    }

    fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "reqwest")]
            Self::Response(_) => "response",
            Self::Stream { .. } => "stream",
            Self::Blob(_) => "blob",
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Response> for Input {
    fn from(response: reqwest::Response) -> Self {
        Self::Response(response)
    }
}

/// Pull-based chunk producer plus the total size, when known.
///
/// Owned exclusively by one reader. The inner handle is dropped exactly once,
/// on natural exhaustion, cancellation, or error.
pub(crate) struct ChunkSource {
    inner: Option<Inner>,
    total_size: Option<u64>,
    origin: Origin,
}

enum Inner {
    Stream(BoxStream<'static, Result<Bytes>>),
    Ranges {
        blob: Box<dyn Blob>,
        ranges: VecDeque<Range<u64>>,
    },
}

impl ChunkSource {
    /// Normalize any accepted input for forward streaming reads.
    pub fn streaming(input: Input) -> Self {
        match input {
            #[cfg(feature = "reqwest")]
            Input::Response(response) => {
                let total_size = response.content_length();
                let stream = response
                    .bytes_stream()
                    .map(|item| item.map_err(ReadError::from))
                    .boxed();
                Self {
                    inner: Some(Inner::Stream(stream)),
                    total_size,
                    origin: Origin::Response,
                }
            }
            Input::Stream { stream, size } => Self {
                inner: Some(Inner::Stream(
                    stream.map(|item| item.map_err(ReadError::from)).boxed(),
                )),
                total_size: size,
                origin: Origin::Stream,
            },
            Input::Blob(blob) => Self::from_blob(blob, Direction::Forward),
        }
    }

    /// Normalize a blob input for range-sliced reads in either direction.
    ///
    /// Any other input kind is rejected before a single chunk is pulled.
    pub fn sliced(input: Input, direction: Direction) -> Result<Self> {
        match input {
            Input::Blob(blob) => Ok(Self::from_blob(blob, direction)),
            other => Err(ReadError::UnsupportedInput {
                found: other.kind(),
                expected: "blob",
            }),
        }
    }

    fn from_blob(blob: Box<dyn Blob>, direction: Direction) -> Self {
        let size = blob.size();
        Self {
            inner: Some(Inner::Ranges {
                ranges: slice_ranges(size, SLICE_CHUNK_SIZE, direction),
                blob,
            }),
            total_size: Some(size),
            origin: Origin::Blob,
        }
    }

    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Pull the next chunk, or `None` once the source is exhausted.
    ///
    /// Exhaustion and pull failures both release the source; later pulls
    /// keep returning `None`.
    pub async fn pull(&mut self) -> Result<Option<Bytes>> {
        let step = match self.inner.as_mut() {
            None => return Ok(None),
            Some(Inner::Stream(stream)) => stream.next().await,
            Some(Inner::Ranges { blob, ranges }) => match ranges.pop_front() {
                Some(range) => Some(blob.read_range(range).await.map_err(ReadError::from)),
                None => None,
            },
        };
        match step {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => {
                self.release();
                Err(e)
            }
            None => {
                self.release();
                Ok(None)
            }
        }
    }

    /// Drop the underlying handle. Idempotent.
    pub fn release(&mut self) {
        if self.inner.take().is_some() {
            debug!(origin = ?self.origin, "chunk source released");
        }
    }
}

/// Fixed-size ranges covering `[0, size)` exactly, in pull order.
fn slice_ranges(size: u64, range_len: u64, direction: Direction) -> VecDeque<Range<u64>> {
    let mut ranges = Vec::new();
    let mut cur = 0;
    while cur < size {
        let end = (cur + range_len).min(size);
        ranges.push(cur..end);
        cur = end;
    }
    if direction == Direction::Backward {
        ranges.reverse();
    }
    ranges.into()
}
