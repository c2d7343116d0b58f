//! The records a line reader emits.

/// Which of the accepted input kinds a streaming read was built from.
///
/// Only attached by [`LineReader::streaming`](crate::LineReader::streaming);
/// the blob-slicing modes emit records without an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// An HTTP response body.
    Response,
    /// A generic chunked byte stream.
    Stream,
    /// A length-queryable blob.
    Blob,
}

/// One decoded line together with its position accounting.
///
/// Ownership transfers to the consumer on yield; the record is immutable
/// once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    /// Total bytes consumed so far, including this line's stripped
    /// terminator. Counts upward in both traversal directions.
    pub bytes_read: u64,
    /// Total size of the input in bytes, when known.
    pub total_size: Option<u64>,
    /// Line number: `1, 2, 3, …` reading forwards; `-1, -2, -3, …` reading
    /// backwards from the end of the input.
    pub line_no: i64,
    /// The decoded line text, without its `\n` / `\r\n` terminator.
    pub text: String,
    /// Input kind tag, present in streaming mode only.
    pub origin: Option<Origin>,
}
