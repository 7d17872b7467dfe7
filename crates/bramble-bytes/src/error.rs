use thiserror::Error;

#[derive(Debug, Error)]
pub enum BytesError {
    #[error(
        "attempt to read {want} bytes at position {index}, outside chunk [{start}, {stop})"
    )]
    OutOfRange {
        index: u64,
        want: u64,
        start: u64,
        stop: u64,
    },

    #[error("no NUL terminator found scanning from position {index}")]
    MissingNul { index: u64 },

    #[error("source delivered {got} bytes for a {want}-byte range")]
    TruncatedFetch { want: u64, got: u64 },

    #[error("fetch abandoned before completion")]
    FetchAbandoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BytesResult<T> = Result<T, BytesError>;
