//! The line reader: one generic splitter over any chunk source.
//!
//! The three traversal modes (stream-forward, blob-forward, blob-backward)
//! share one boundary/carry implementation and differ only in how chunks are
//! acquired and which direction the scan runs. The lazy sequence is a plain
//! pull method, [`LineReader::next_line`], backed by a small explicit
//! state machine, so it is not tied to any particular executor; an adapter
//! into a [`futures_util::Stream`] is provided for combinator-style callers.
//!
//! Cancellation is cooperative: the token is checked before every chunk pull
//! and before every boundary-scan step, never racing an in-flight pull.

use bytes::BytesMut;
use futures_util::Stream;
use tokio_util::codec::Decoder;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::codec::{LineCodec, SplitLine};
use crate::error::Result;
use crate::record::{LineRecord, Origin};
use crate::source::{ChunkSource, Input};

/// Traversal direction over the underlying bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

/// Splitter state. `Filling` pulls chunks until the buffer may hold a
/// boundary, `Emitting` drains completed lines from the buffer.
enum State {
    Filling,
    Emitting,
    Done,
}

/// An incremental line reader over a byte source.
///
/// Produced by the entry constructors together with a [`CancellationToken`];
/// cancelling the token makes the next checkpoint release the underlying
/// source and end the sequence gracefully.
///
/// One reader exclusively owns its source. A second traversal over the same
/// underlying input needs a fresh [`Input`] handle.
pub struct LineReader {
    source: ChunkSource,
    codec: LineCodec,
    direction: Direction,
    cancel: CancellationToken,
    buf: BytesMut,
    state: State,
    bytes_read: u64,
    line_no: i64,
    origin: Option<Origin>,
}

impl LineReader {
    /// Read lines forwards from any accepted input kind, in chunk arrival
    /// order.
    ///
    /// Emitted records carry an [`Origin`] tag naming the input kind.
    ///
    /// # Errors
    ///
    /// Fails if `encoding` is not a known WHATWG encoding label. No chunk is
    /// pulled before the first [`next_line`](Self::next_line) call.
    pub fn streaming(input: Input, encoding: &str) -> Result<(CancellationToken, Self)> {
        Self::streaming_with_token(input, encoding, CancellationToken::new())
    }

    /// [`streaming`](Self::streaming) governed by a caller-supplied token.
    pub fn streaming_with_token(
        input: Input,
        encoding: &str,
        cancel: CancellationToken,
    ) -> Result<(CancellationToken, Self)> {
        let codec = LineCodec::new(encoding)?;
        let source = ChunkSource::streaming(input);
        let origin = Some(source.origin());
        Ok(Self::assemble(source, codec, Direction::Forward, cancel, origin))
    }

    /// Read lines forwards from a blob by slicing it into fixed-size ranges.
    ///
    /// # Errors
    ///
    /// Fails if the input is not blob-like, or if `encoding` is not a known
    /// WHATWG encoding label. Both are raised before any chunk is pulled.
    pub fn blob_forward(input: Input, encoding: &str) -> Result<(CancellationToken, Self)> {
        Self::blob_forward_with_token(input, encoding, CancellationToken::new())
    }

    /// [`blob_forward`](Self::blob_forward) governed by a caller-supplied
    /// token.
    pub fn blob_forward_with_token(
        input: Input,
        encoding: &str,
        cancel: CancellationToken,
    ) -> Result<(CancellationToken, Self)> {
        let codec = LineCodec::new(encoding)?;
        let source = ChunkSource::sliced(input, Direction::Forward)?;
        Ok(Self::assemble(source, codec, Direction::Forward, cancel, None))
    }

    /// Read lines backwards from a blob, last line first.
    ///
    /// Line numbers count down from −1; `bytes_read` still counts consumed
    /// bytes upward.
    ///
    /// # Errors
    ///
    /// Fails if the input is not blob-like, or if `encoding` is not a known
    /// WHATWG encoding label. Both are raised before any chunk is pulled.
    pub fn blob_backward(input: Input, encoding: &str) -> Result<(CancellationToken, Self)> {
        Self::blob_backward_with_token(input, encoding, CancellationToken::new())
    }

    /// [`blob_backward`](Self::blob_backward) governed by a caller-supplied
    /// token.
    pub fn blob_backward_with_token(
        input: Input,
        encoding: &str,
        cancel: CancellationToken,
    ) -> Result<(CancellationToken, Self)> {
        let codec = LineCodec::new(encoding)?;
        let source = ChunkSource::sliced(input, Direction::Backward)?;
        Ok(Self::assemble(source, codec, Direction::Backward, cancel, None))
    }

    fn assemble(
        source: ChunkSource,
        codec: LineCodec,
        direction: Direction,
        cancel: CancellationToken,
        origin: Option<Origin>,
    ) -> (CancellationToken, Self) {
        let reader = Self {
            source,
            codec,
            direction,
            cancel: cancel.clone(),
            buf: BytesMut::new(),
            state: State::Filling,
            bytes_read: 0,
            line_no: 0,
            origin,
        };
        (cancel, reader)
    }

    /// Total size of the input in bytes, when known.
    pub fn total_size(&self) -> Option<u64> {
        self.source.total_size()
    }

    /// Total bytes consumed so far, including stripped terminators.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the governing token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the governing cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Pull the next line.
    ///
    /// Returns `Ok(None)` once the input is exhausted or the token was
    /// cancelled. A pull failure from the underlying source ends the
    /// sequence; the accumulated unterminated tail is not flushed in that
    /// case, since its completion cannot be confirmed.
    pub async fn next_line(&mut self) -> Result<Option<LineRecord>> {
        loop {
            match self.state {
                State::Done => return Ok(None),
                State::Emitting => {
                    if self.check_cancelled() {
                        return Ok(None);
                    }
                    let line = match self.direction {
                        Direction::Forward => self.codec.decode(&mut self.buf)?,
                        Direction::Backward => self.codec.decode_back(&mut self.buf),
                    };
                    match line {
                        Some(line) => return Ok(Some(self.emit(line))),
                        None => self.state = State::Filling,
                    }
                }
                State::Filling => {
                    if self.check_cancelled() {
                        return Ok(None);
                    }
                    match self.source.pull().await {
                        Ok(Some(chunk)) => {
                            self.buf.extend_from_slice(&chunk);
                            self.state = State::Emitting;
                        }
                        Ok(None) => {
                            if self.check_cancelled() {
                                return Ok(None);
                            }
                            self.state = State::Done;
                            let last = match self.direction {
                                Direction::Forward => self.codec.decode_eof(&mut self.buf)?,
                                Direction::Backward => self.codec.flush_back(),
                            };
                            return Ok(last.map(|line| self.emit(line)));
                        }
                        Err(e) => {
                            self.state = State::Done;
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    /// Convert into a [`Stream`] of line records.
    ///
    /// The stream ends after the first error, mirroring
    /// [`next_line`](Self::next_line) semantics.
    pub fn into_stream(self) -> impl Stream<Item = Result<LineRecord>> + Send {
        futures_util::stream::unfold(self, |mut reader| async move {
            match reader.next_line().await {
                Ok(Some(record)) => Some((Ok(record), reader)),
                Ok(None) => None,
                Err(e) => Some((Err(e), reader)),
            }
        })
    }

    fn emit(&mut self, line: SplitLine) -> LineRecord {
        self.bytes_read += line.len as u64;
        self.line_no += match self.direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };
        LineRecord {
            bytes_read: self.bytes_read,
            total_size: self.source.total_size(),
            line_no: self.line_no,
            text: line.text,
            origin: self.origin,
        }
    }

    fn check_cancelled(&mut self) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        debug!(
            bytes_read = self.bytes_read,
            line_no = self.line_no,
            "cancellation observed, releasing source"
        );
        self.source.release();
        self.state = State::Done;
        true
    }
}
