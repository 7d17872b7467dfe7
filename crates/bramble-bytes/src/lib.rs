//! Byte access for the bramble columnar reader.
//!
//! - **Chunk**: an immutable byte buffer tied to a `[start, stop)` range of
//!   the logical file, possibly delivered by a deferred fetch
//! - **Cursor**: a mutable read position with big-endian decode primitives,
//!   length-prefixed strings, and NUL-terminated strings
//! - **Source**: the byte-range provider boundary (`fetch(start, stop)`),
//!   with in-memory and memory-mapped file implementations
//!
//! Every decode primitive is bounds-checked against the chunk and fails with
//! [`BytesError::OutOfRange`] rather than panicking; a failed bound is either
//! a corrupt file or a boundary-computation bug upstream, and both must
//! surface as errors.

pub mod chunk;
pub mod cursor;
pub mod error;
pub mod source;

pub use chunk::{Chunk, ChunkFuture};
pub use cursor::Cursor;
pub use error::{BytesError, BytesResult};
pub use source::{FileSource, MemorySource, Source};
