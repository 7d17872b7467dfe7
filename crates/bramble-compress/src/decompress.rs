use std::hash::Hasher;
use std::io::Read;

use tracing::debug;
use twox_hash::XxHash64;

use bramble_bytes::{Chunk, Cursor};

use crate::error::{CompressError, CompressResult};
use crate::header::{Algorithm, BlockHeader};

/// Decompress `compressed_len` bytes of block-framed payload starting at the
/// cursor into a chunk of exactly `uncompressed_len` bytes.
///
/// Blocks are processed one at a time until the cursor has consumed
/// `compressed_len` bytes. Each block's output length must equal its header's
/// uncompressed size exactly. When a single block covers the whole request
/// its output becomes the result buffer directly, skipping the copy into an
/// accumulation buffer.
pub fn decompress(
    chunk: &Chunk,
    cursor: &mut Cursor,
    compressed_len: u64,
    uncompressed_len: u64,
) -> CompressResult<Chunk> {
    let block_start = cursor.index();
    let mut out: Option<Vec<u8>> = None;
    let mut filled = 0usize;

    while cursor.displacement_from(block_start) < compressed_len as i64 {
        let header = BlockHeader::read(chunk, cursor)?;
        let payload = cursor.read_bytes(chunk, header.compressed)?;

        if let Some(expected) = header.checksum {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(payload);
            let actual = hasher.finish();
            if actual != expected {
                return Err(CompressError::ChecksumMismatch { expected, actual });
            }
        }

        let block = decode_block(header.algo, payload, header.uncompressed as usize)?;
        if block.len() as u64 != header.uncompressed {
            return Err(CompressError::SizeMismatch {
                algo: header.algo.name(),
                expected: header.uncompressed,
                actual: block.len() as u64,
            });
        }

        // Single block covering the whole request: hand its buffer back
        // without copying.
        if filled == 0
            && out.is_none()
            && header.uncompressed == uncompressed_len
            && cursor.displacement_from(block_start) >= compressed_len as i64
        {
            debug!(algo = header.algo.name(), bytes = block.len(), "single-block fast path");
            return Ok(Chunk::from_vec(block));
        }

        let buf = out.get_or_insert_with(|| vec![0u8; uncompressed_len as usize]);
        let end = filled + block.len();
        if end > buf.len() {
            return Err(CompressError::SizeMismatch {
                algo: header.algo.name(),
                expected: uncompressed_len,
                actual: end as u64,
            });
        }
        buf[filled..end].copy_from_slice(&block);
        filled = end;
    }

    // Zero blocks for a nonzero request, or blocks that fell short of the
    // preallocated buffer. The buffer length itself proves nothing here.
    if filled as u64 != uncompressed_len {
        return Err(CompressError::SizeMismatch {
            algo: "framing",
            expected: uncompressed_len,
            actual: filled as u64,
        });
    }
    Ok(Chunk::from_vec(out.unwrap_or_default()))
}

fn decode_block(algo: Algorithm, payload: &[u8], expected: usize) -> CompressResult<Vec<u8>> {
    match algo {
        Algorithm::Zlib => {
            let mut out = Vec::with_capacity(expected);
            flate2::read::ZlibDecoder::new(payload)
                .read_to_end(&mut out)
                .map_err(|e| CompressError::Codec {
                    algo: "zlib",
                    reason: e.to_string(),
                })?;
            Ok(out)
        }
        Algorithm::Lzma => {
            let mut out = Vec::with_capacity(expected);
            xz2::read::XzDecoder::new(payload)
                .read_to_end(&mut out)
                .map_err(|e| CompressError::Codec {
                    algo: "lzma",
                    reason: e.to_string(),
                })?;
            Ok(out)
        }
        Algorithm::Lz4 => {
            lz4_flex::block::decompress(payload, expected).map_err(|e| CompressError::Codec {
                algo: "lz4",
                reason: e.to_string(),
            })
        }
        Algorithm::Zstd => zstd::stream::decode_all(payload).map_err(|e| CompressError::Codec {
            algo: "zstd",
            reason: e.to_string(),
        }),
    }
}
