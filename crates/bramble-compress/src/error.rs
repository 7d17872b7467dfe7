use thiserror::Error;

use bramble_bytes::BytesError;

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("{algo} block decompressed to {actual} bytes, header promised {expected}")]
    SizeMismatch {
        algo: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("LZ4 block checksum mismatch: stored {expected:#018x}, computed {actual:#018x}")]
    ChecksumMismatch { expected: u64, actual: u64 },

    #[error("unrecognized compression tag {tag:?}")]
    UnsupportedCompression { tag: [u8; 2] },

    #[error("the retired 'CS' compression algorithm is not supported")]
    RetiredAlgorithm,

    #[error("block payload of {got} bytes exceeds the framing limit of {max}")]
    BlockTooLarge { got: usize, max: usize },

    #[error("{algo} codec failure: {reason}")]
    Codec { algo: &'static str, reason: String },

    #[error(transparent)]
    Bytes(#[from] BytesError),
}

pub type CompressResult<T> = Result<T, CompressError>;
