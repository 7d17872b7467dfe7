use std::hash::Hasher;
use std::io::Write;

use twox_hash::XxHash64;

use crate::error::{CompressError, CompressResult};
use crate::header::{Algorithm, BlockHeader, MAX_BLOCK_SIZE};

/// Compress `data` into the block framing read by
/// [`decompress`](crate::decompress::decompress).
///
/// Input longer than one block's 3-byte size field can describe is split
/// into consecutive blocks of at most [`MAX_BLOCK_SIZE`] uncompressed bytes.
/// Empty input produces an empty framing (zero blocks).
pub fn compress(data: &[u8], algo: Algorithm, level: u32) -> CompressResult<Vec<u8>> {
    let mut out = Vec::new();
    for block in data.chunks(MAX_BLOCK_SIZE) {
        let payload = encode_block(algo, block, level)?;
        let checksum = match algo {
            Algorithm::Lz4 => {
                let mut hasher = XxHash64::with_seed(0);
                hasher.write(&payload);
                Some(hasher.finish())
            }
            _ => None,
        };
        let header = BlockHeader {
            algo,
            method: method_byte(algo, level),
            compressed: payload.len() as u64,
            uncompressed: block.len() as u64,
            checksum,
        };
        header.write(&mut out)?;
        out.extend_from_slice(&payload);
    }
    Ok(out)
}

/// The method byte is carried on the wire but not interpreted on read;
/// zlib historically stores the deflate method id, the others their level.
fn method_byte(algo: Algorithm, level: u32) -> u8 {
    match algo {
        Algorithm::Zlib => 8,
        _ => level.min(u8::MAX as u32) as u8,
    }
}

fn encode_block(algo: Algorithm, block: &[u8], level: u32) -> CompressResult<Vec<u8>> {
    match algo {
        Algorithm::Zlib => {
            let mut enc =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::new(level));
            enc.write_all(block).map_err(codec("zlib"))?;
            enc.finish().map_err(codec("zlib"))
        }
        Algorithm::Lzma => {
            let mut enc = xz2::write::XzEncoder::new(Vec::new(), level);
            enc.write_all(block).map_err(codec("lzma"))?;
            enc.finish().map_err(codec("lzma"))
        }
        Algorithm::Lz4 => Ok(lz4_flex::block::compress(block)),
        Algorithm::Zstd => {
            zstd::stream::encode_all(block, level as i32).map_err(codec("zstd"))
        }
    }
}

fn codec(algo: &'static str) -> impl Fn(std::io::Error) -> CompressError {
    move |e| CompressError::Codec {
        algo,
        reason: e.to_string(),
    }
}
