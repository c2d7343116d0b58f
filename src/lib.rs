//! # linewise
//!
//! Incremental line reading over byte streams, blobs, and HTTP responses,
//! forwards and backwards.
//!
//! ## Features
//!
//! - Splits input into lines chunk by chunk, without materializing the whole
//!   input in memory
//! - Three traversal modes: forward over any chunked stream, forward over a
//!   sliced blob, backward over a sliced blob (last line first)
//! - Byte-exact accounting: every record reports total bytes consumed,
//!   including stripped `\n` / `\r\n` terminators
//! - Cooperative cancellation through a shared one-way token
//! - Caller-chosen text encoding (any WHATWG label, lossy decode)
//! - An optional sliding window of lines around the line being consumed
//!
//! ## Quick Start
//!
//! ### Reading forwards
//!
//! ```rust
//! use linewise::{Input, LineReader};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), linewise::ReadError> {
//! let (_cancel, mut lines) = LineReader::streaming(Input::memory("one\ntwo\nthree"), "utf-8")?;
//! while let Some(line) = lines.next_line().await? {
//!     println!("{}: {}", line.line_no, line.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading a file backwards with a window
//!
//! ```no_run
//! use linewise::{FileBlob, Input, LineReader, WindowedLineReader};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blob = FileBlob::open("app.log").await?;
//! let (cancel, reader) = LineReader::blob_backward(Input::blob(blob), "utf-8")?;
//! let mut lines = WindowedLineReader::with_half_width(reader, 3);
//! while let Some(line) = lines.next_line().await? {
//!     let context = lines.window(-1, 1)?;
//!     if line.text.contains("panic") {
//!         for nearby in &context {
//!             eprintln!("{}: {}", nearby.line_no, nearby.text);
//!         }
//!         cancel.cancel();
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Streaming an HTTP response line by line
//!
//! ```ignore
//! let response = reqwest::get("https://example.com/big.ndjson").await?;
//! let (cancel, mut lines) = LineReader::streaming(response.into(), "utf-8")?;
//! while let Some(line) = lines.next_line().await? {
//!     if let Some(total) = line.total_size {
//!         let pct = line.bytes_read as f64 / total as f64 * 100.0;
//!         println!("{pct:5.1}% {}", line.text);
//!     }
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod codec;

pub mod error;
pub mod reader;
pub mod record;
pub mod source;
pub mod window;

pub use self::error::{InvalidRange, ReadError, Result};
pub use self::reader::LineReader;
pub use self::record::{LineRecord, Origin};
pub use self::source::{Blob, FileBlob, Input, MemoryBlob};
pub use self::window::{WindowedLineReader, DEFAULT_HALF_WIDTH};

pub use tokio_util::sync::CancellationToken;
