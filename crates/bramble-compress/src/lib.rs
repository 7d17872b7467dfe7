//! Compressed block framing for the bramble columnar reader.
//!
//! A compressed payload is a concatenation of zero or more self-describing
//! blocks: `[2-byte algorithm tag][1-byte method][3-byte LE compressed
//! size][3-byte LE uncompressed size]`, with an extra 8-byte LE XXH64
//! checksum of the compressed payload for LZ4 blocks. Four algorithms are
//! supported (zlib, LZMA, LZ4, zstd); the retired `CS` tag is recognized and
//! always rejected.
//!
//! Every block must decompress to exactly the size its header promises; a
//! mismatch or a failed checksum is fatal, because a wrong-sized block means
//! nothing downstream of it can be trusted.

pub mod compress;
pub mod decompress;
pub mod error;
pub mod header;

pub use compress::compress;
pub use decompress::decompress;
pub use error::{CompressError, CompressResult};
pub use header::{Algorithm, BlockHeader, MAX_BLOCK_SIZE, RETIRED_TAG};
