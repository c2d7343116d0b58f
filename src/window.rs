//! A bounded sliding window of decoded lines around the consumption cursor.

use std::collections::VecDeque;

use tokio_util::sync::CancellationToken;

use crate::error::{InvalidRange, Result};
use crate::reader::LineReader;
use crate::record::LineRecord;

/// Half-width used by [`WindowedLineReader::new`].
pub const DEFAULT_HALF_WIDTH: usize = 10;

/// A line reader that keeps up to `K` already-consumed lines and up to `K`
/// upcoming lines buffered around the current line.
///
/// Wraps any [`LineReader`] (forward or backward); once wrapped, the inner
/// reader must only be driven through this type. The buffer never holds more
/// than `2K+1` records, and [`window`](Self::window) can only see buffered
/// records: lines outside `[-K, +K]` of the cursor are gone regardless of
/// the requested bounds.
pub struct WindowedLineReader {
    inner: LineReader,
    buffer: VecDeque<LineRecord>,
    cursor: usize,
    half_width: usize,
    primed: bool,
    /// A record is outstanding; the buffer advances at the next pull so
    /// window queries see the state as of the last yield.
    yielded: bool,
}

impl WindowedLineReader {
    /// Wrap a reader with the default half-width of 10.
    pub fn new(inner: LineReader) -> Self {
        Self::with_half_width(inner, DEFAULT_HALF_WIDTH)
    }

    /// Wrap a reader with an explicit half-width.
    ///
    /// `half_width` is honored as given, with a minimum of 1 so the current
    /// line always fits in the window.
    pub fn with_half_width(inner: LineReader, half_width: usize) -> Self {
        Self {
            inner,
            buffer: VecDeque::new(),
            cursor: 0,
            half_width: half_width.max(1),
            primed: false,
            yielded: false,
        }
    }

    /// The configured half-width.
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// A clone of the inner reader's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancellation_token()
    }

    /// Pull the next line, shifting the window.
    ///
    /// The first call pre-fills up to `K+1` records of lookahead before
    /// yielding. Errors from the inner reader propagate and terminate the
    /// sequence.
    pub async fn next_line(&mut self) -> Result<Option<LineRecord>> {
        if !self.primed {
            while self.buffer.len() < self.half_width + 1 {
                match self.inner.next_line().await? {
                    Some(record) => self.buffer.push_back(record),
                    None => break,
                }
            }
            self.primed = true;
        } else if self.yielded {
            // Deferred advance step for the previously yielded record:
            // extend the lookahead, then either grow the lookback side or
            // evict the oldest record.
            if let Some(record) = self.inner.next_line().await? {
                self.buffer.push_back(record);
            }
            if self.cursor < self.half_width {
                self.cursor += 1;
            } else {
                self.buffer.pop_front();
            }
            self.yielded = false;
        }

        if self.cursor >= self.buffer.len() {
            return Ok(None);
        }
        if self.inner.is_cancelled() {
            return Ok(None);
        }
        let record = self.buffer[self.cursor].clone();
        self.yielded = true;
        Ok(Some(record))
    }

    /// The buffered lines spanning `[cursor+before, cursor+after]`, clamped
    /// to the buffer bounds.
    ///
    /// `window(-1, 1)` is the previous, current, and next line. Both bounds
    /// are relative to the current line, so `window(0, 0)` is the current
    /// line alone.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidRange`] if `after < before`. Consumption of the
    /// underlying sequence is unaffected by a failed query.
    pub fn window(&self, before: i64, after: i64) -> Result<Vec<LineRecord>, InvalidRange> {
        if after < before {
            return Err(InvalidRange { before, after });
        }
        let start = (self.cursor as i64).saturating_add(before).max(0) as usize;
        let end = (self.cursor as i64)
            .saturating_add(after)
            .saturating_add(1)
            .clamp(0, self.buffer.len() as i64) as usize;
        Ok(self
            .buffer
            .iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .cloned()
            .collect())
    }

    /// Every currently buffered line, oldest first.
    pub fn window_all(&self) -> Vec<LineRecord> {
        self.buffer.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Input;

    fn ten_lines() -> Input {
        Input::memory("L1\nL2\nL3\nL4\nL5\nL6\nL7\nL8\nL9\nL10")
    }

    async fn windowed(k: usize) -> WindowedLineReader {
        let (_cancel, reader) = LineReader::blob_forward(ten_lines(), "utf-8").unwrap();
        WindowedLineReader::with_half_width(reader, k)
    }

    fn texts(records: &[LineRecord]) -> Vec<&str> {
        records.iter().map(|r| r.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_buffer_never_exceeds_bound() {
        let mut win = windowed(2).await;
        while let Some(_record) = win.next_line().await.unwrap() {
            assert!(win.window_all().len() <= 2 * 2 + 1);
        }
    }

    #[tokio::test]
    async fn test_query_before_first_pull_is_empty() {
        let win = windowed(2).await;
        assert!(win.window(-2, 2).unwrap().is_empty());
        assert!(win.window_all().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_range_rejected_without_disturbing_sequence() {
        let mut win = windowed(2).await;
        win.next_line().await.unwrap().unwrap();

        assert_eq!(
            win.window(1, -1),
            Err(InvalidRange {
                before: 1,
                after: -1
            })
        );

        // The failed query did not consume anything
        let second = win.next_line().await.unwrap().unwrap();
        assert_eq!(second.text, "L2");
    }

    #[tokio::test]
    async fn test_default_half_width() {
        let (_cancel, reader) = LineReader::blob_forward(ten_lines(), "utf-8").unwrap();
        let win = WindowedLineReader::new(reader);
        assert_eq!(win.half_width(), DEFAULT_HALF_WIDTH);

        let (_cancel, reader) = LineReader::blob_forward(ten_lines(), "utf-8").unwrap();
        let win = WindowedLineReader::with_half_width(reader, 0);
        assert_eq!(win.half_width(), 1);
    }

    #[tokio::test]
    async fn test_window_tracks_neighbors() {
        let mut win = windowed(1).await;

        let first = win.next_line().await.unwrap().unwrap();
        assert_eq!(first.text, "L1");
        // No lookback yet, one line of lookahead
        assert_eq!(texts(&win.window(-1, 1).unwrap()), ["L1", "L2"]);

        let second = win.next_line().await.unwrap().unwrap();
        assert_eq!(second.text, "L2");
        assert_eq!(texts(&win.window(-1, 1).unwrap()), ["L1", "L2", "L3"]);
    }
}
