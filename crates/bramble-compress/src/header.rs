use bramble_bytes::{Chunk, Cursor};

use crate::error::{CompressError, CompressResult};

/// Hard limit imposed by the 3-byte size fields.
pub const MAX_BLOCK_SIZE: usize = 0xFF_FFFF;

/// Retired tag the format reserves but has not accepted for two decades.
pub const RETIRED_TAG: [u8; 2] = *b"CS";

/// A compression algorithm recognized by the block framing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Zlib,
    Lzma,
    Lz4,
    Zstd,
}

impl Algorithm {
    pub fn tag(&self) -> [u8; 2] {
        match self {
            Self::Zlib => *b"ZL",
            Self::Lzma => *b"XZ",
            Self::Lz4 => *b"L4",
            Self::Zstd => *b"ZS",
        }
    }

    pub fn from_tag(tag: [u8; 2]) -> CompressResult<Self> {
        match &tag {
            b"ZL" => Ok(Self::Zlib),
            b"XZ" => Ok(Self::Lzma),
            b"L4" => Ok(Self::Lz4),
            b"ZS" => Ok(Self::Zstd),
            t if *t == RETIRED_TAG => Err(CompressError::RetiredAlgorithm),
            _ => Err(CompressError::UnsupportedCompression { tag }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Zlib => "zlib",
            Self::Lzma => "lzma",
            Self::Lz4 => "lz4",
            Self::Zstd => "zstd",
        }
    }
}

/// One block header: `[tag:2][method:1][csize:3 LE][usize:3 LE]`, plus an
/// 8-byte LE XXH64 checksum of the compressed payload for LZ4 blocks.
#[derive(Clone, Copy, Debug)]
pub struct BlockHeader {
    pub algo: Algorithm,
    pub method: u8,
    pub compressed: u64,
    pub uncompressed: u64,
    pub checksum: Option<u64>,
}

impl BlockHeader {
    /// Decode one header, advancing the cursor past it.
    pub fn read(chunk: &Chunk, cursor: &mut Cursor) -> CompressResult<Self> {
        let tag: [u8; 2] = cursor.read_bytes(chunk, 2)?.try_into().unwrap();
        let algo = Algorithm::from_tag(tag)?;
        let method = cursor.read_u8(chunk)?;
        let compressed = read_u24_le(chunk, cursor)?;
        let uncompressed = read_u24_le(chunk, cursor)?;
        let checksum = if algo == Algorithm::Lz4 {
            Some(read_u64_le(chunk, cursor)?)
        } else {
            None
        };
        Ok(Self {
            algo,
            method,
            compressed,
            uncompressed,
            checksum,
        })
    }

    /// Append the wire form of this header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) -> CompressResult<()> {
        if self.compressed as usize > MAX_BLOCK_SIZE {
            return Err(CompressError::BlockTooLarge {
                got: self.compressed as usize,
                max: MAX_BLOCK_SIZE,
            });
        }
        if self.uncompressed as usize > MAX_BLOCK_SIZE {
            return Err(CompressError::BlockTooLarge {
                got: self.uncompressed as usize,
                max: MAX_BLOCK_SIZE,
            });
        }
        out.extend_from_slice(&self.algo.tag());
        out.push(self.method);
        write_u24_le(out, self.compressed);
        write_u24_le(out, self.uncompressed);
        if let Some(sum) = self.checksum {
            out.extend_from_slice(&sum.to_le_bytes());
        }
        Ok(())
    }
}

fn read_u24_le(chunk: &Chunk, cursor: &mut Cursor) -> CompressResult<u64> {
    let b = cursor.read_bytes(chunk, 3)?;
    Ok(b[0] as u64 | (b[1] as u64) << 8 | (b[2] as u64) << 16)
}

fn read_u64_le(chunk: &Chunk, cursor: &mut Cursor) -> CompressResult<u64> {
    let b: [u8; 8] = cursor.read_bytes(chunk, 8)?.try_into().unwrap();
    Ok(u64::from_le_bytes(b))
}

fn write_u24_le(out: &mut Vec<u8>, value: u64) {
    out.push(value as u8);
    out.push((value >> 8) as u8);
    out.push((value >> 16) as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for algo in [
            Algorithm::Zlib,
            Algorithm::Lzma,
            Algorithm::Lz4,
            Algorithm::Zstd,
        ] {
            assert_eq!(Algorithm::from_tag(algo.tag()).unwrap(), algo);
        }
    }

    #[test]
    fn retired_tag_is_rejected() {
        assert!(matches!(
            Algorithm::from_tag(*b"CS"),
            Err(CompressError::RetiredAlgorithm)
        ));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            Algorithm::from_tag(*b"QQ"),
            Err(CompressError::UnsupportedCompression { tag: [b'Q', b'Q'] })
        ));
    }

    #[test]
    fn header_roundtrip_plain() {
        let header = BlockHeader {
            algo: Algorithm::Zstd,
            method: 0,
            compressed: 0x0A_0B0C,
            uncompressed: 0x01_0203,
            checksum: None,
        };
        let mut wire = Vec::new();
        header.write(&mut wire).unwrap();
        assert_eq!(wire.len(), 9);
        assert_eq!(&wire[0..2], b"ZS");
        assert_eq!(&wire[3..6], &[0x0C, 0x0B, 0x0A]); // little-endian

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        let back = BlockHeader::read(&chunk, &mut cursor).unwrap();
        assert_eq!(back.compressed, 0x0A_0B0C);
        assert_eq!(back.uncompressed, 0x01_0203);
        assert_eq!(back.checksum, None);
    }

    #[test]
    fn header_roundtrip_lz4_checksum() {
        let header = BlockHeader {
            algo: Algorithm::Lz4,
            method: 1,
            compressed: 10,
            uncompressed: 20,
            checksum: Some(0xDEAD_BEEF_0102_0304),
        };
        let mut wire = Vec::new();
        header.write(&mut wire).unwrap();
        assert_eq!(wire.len(), 17);

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        let back = BlockHeader::read(&chunk, &mut cursor).unwrap();
        assert_eq!(back.checksum, Some(0xDEAD_BEEF_0102_0304));
        assert_eq!(cursor.index(), 17);
    }

    #[test]
    fn oversized_block_rejected_at_write() {
        let header = BlockHeader {
            algo: Algorithm::Zlib,
            method: 8,
            compressed: MAX_BLOCK_SIZE as u64 + 1,
            uncompressed: 5,
            checksum: None,
        };
        assert!(matches!(
            header.write(&mut Vec::new()),
            Err(CompressError::BlockTooLarge { .. })
        ));
    }
}
