//! Byte-level line splitting shared by every traversal mode.
//!
//! One codec handles both directions. Forward decoding follows the
//! `tokio_util` [`Decoder`] contract: completed lines split off the front of
//! the buffer, leftover bytes stay put until more data arrives or
//! [`Decoder::decode_eof`] flushes them. Backward decoding consumes the
//! buffer from its end; the carried fragment is the *head* of a line whose
//! tail was found in a later chunk, so it is kept internally and appended
//! after newly found bytes rather than left in the buffer for rescanning.

use bytes::BytesMut;
use encoding::Encoding;
use tokio_util::codec::Decoder;

use crate::error::{ReadError, Result};

/// A decoded line plus the count of input bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SplitLine {
    /// Line text after terminator stripping and decoding.
    pub text: String,
    /// Byte length including the stripped terminator.
    pub len: usize,
}

/// Splits buffered bytes into lines, decoding with a caller-chosen encoding.
pub(crate) struct LineCodec {
    encoding: &'static Encoding,
    /// Forward scan: index of the next byte to check for `\n`.
    next_index: usize,
    /// Backward scan: carried tail of a line whose start is still unseen.
    carry: Vec<u8>,
    /// Backward scan: the buffer currently ends with an already-located `\n`.
    tail_terminated: bool,
}

impl LineCodec {
    /// Create a codec for the given WHATWG encoding label (e.g. "utf-8").
    pub fn new(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ReadError::UnknownEncoding(label.to_string()))?;
        Ok(Self {
            encoding,
            next_index: 0,
            carry: Vec::new(),
            tail_terminated: false,
        })
    }

    /// Strip the terminator, decode, and report the pre-strip byte length.
    fn finish(&self, mut raw: Vec<u8>) -> SplitLine {
        let len = raw.len();
        if raw.last() == Some(&b'\n') {
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
        }
        let (text, _, _) = self.encoding.decode(&raw);
        SplitLine {
            text: text.into_owned(),
            len,
        }
    }

    /// Backward step: emit the rightmost complete line in `src`, or move the
    /// whole remaining region into the carry when no boundary is left.
    ///
    /// `src` must hold at most one chunk's unscanned region; it is refilled
    /// only once it has been drained into lines and carry.
    pub fn decode_back(&mut self, src: &mut BytesMut) -> Option<SplitLine> {
        if src.is_empty() {
            return None;
        }
        // The buffer's last byte is only scannable if it is not a terminator
        // we already located on a previous step.
        let scan_end = src.len() - usize::from(self.tail_terminated);
        match src[..scan_end].iter().rposition(|b| *b == b'\n') {
            Some(pos) => {
                let mut raw = src.split_off(pos + 1).to_vec();
                raw.append(&mut self.carry);
                self.tail_terminated = true;
                Some(self.finish(raw))
            }
            None => {
                let mut head = src.split_to(src.len()).to_vec();
                head.append(&mut self.carry);
                self.carry = head;
                self.tail_terminated = false;
                None
            }
        }
    }

    /// Backward EOF flush: the carry now covers the start of the input.
    pub fn flush_back(&mut self) -> Option<SplitLine> {
        if self.carry.is_empty() {
            return None;
        }
        self.tail_terminated = false;
        let raw = std::mem::take(&mut self.carry);
        Some(self.finish(raw))
    }
}

impl Decoder for LineCodec {
    type Item = SplitLine;
    type Error = ReadError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<SplitLine>> {
        // Look for a newline starting from where the last scan left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;
            Ok(Some(self.finish(line.to_vec())))
        } else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();
            Ok(None)
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<SplitLine>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                // Unterminated final line
                self.next_index = 0;
                let raw = src.split_to(src.len()).to_vec();
                Ok(Some(self.finish(raw)))
            }
        }
    }
}
