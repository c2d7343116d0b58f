//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream;
use linewise::{Blob, Input, LineReader, LineRecord};

/// Split `data` into chunks of the given sizes (cycling through `sizes`) and
/// wrap them as a generic stream input of unknown total size.
pub fn chunked_stream(data: &[u8], sizes: &[usize]) -> Input {
    let chunks = chop(data, sizes);
    Input::stream(stream::iter(chunks.into_iter().map(Ok::<_, io::Error>)))
}

/// Chop `data` into chunks of the given sizes, cycling through `sizes`.
pub fn chop(data: &[u8], sizes: &[usize]) -> Vec<Bytes> {
    assert!(!sizes.is_empty());
    let mut chunks = Vec::new();
    let mut rest = data;
    let mut i = 0;
    while !rest.is_empty() {
        let take = sizes[i % sizes.len()].clamp(1, rest.len());
        chunks.push(Bytes::copy_from_slice(&rest[..take]));
        rest = &rest[take..];
        i += 1;
    }
    chunks
}

/// Drain a reader into a vector.
pub async fn collect(mut reader: LineReader) -> Vec<LineRecord> {
    let mut out = Vec::new();
    while let Some(record) = reader.next_line().await.unwrap() {
        out.push(record);
    }
    out
}

/// The texts of a record slice.
pub fn texts(records: &[LineRecord]) -> Vec<String> {
    records.iter().map(|r| r.text.clone()).collect()
}

/// An in-memory blob whose handle drop is observable, for asserting that a
/// reader releases its source exactly once.
pub struct TrackedBlob {
    data: Bytes,
    drops: Arc<AtomicUsize>,
}

impl TrackedBlob {
    pub fn new(data: impl Into<Bytes>) -> (Arc<AtomicUsize>, Self) {
        let drops = Arc::new(AtomicUsize::new(0));
        (
            drops.clone(),
            Self {
                data: data.into(),
                drops,
            },
        )
    }
}

impl Drop for TrackedBlob {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Blob for TrackedBlob {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_range(&mut self, range: Range<u64>) -> io::Result<Bytes> {
        Ok(self.data.slice(range.start as usize..range.end as usize))
    }
}

/// Reference line splitting: split on `\n`, strip a `\r` that preceded it,
/// keep an unterminated tail verbatim.
pub fn reference_lines(data: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = data;
    while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
        let mut line = &rest[..pos];
        if line.last() == Some(&b'\r') {
            line = &line[..line.len() - 1];
        }
        out.push(String::from_utf8_lossy(line).into_owned());
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        out.push(String::from_utf8_lossy(rest).into_owned());
    }
    out
}
