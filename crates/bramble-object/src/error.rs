use thiserror::Error;

use bramble_bytes::BytesError;

#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("object-graph reference to class tag {tag:#010x}, which was never registered")]
    UnknownClassReference { tag: u32 },

    #[error("class {name:?} is not known to the resolver")]
    UnresolvedClass { name: String },

    #[error(
        "while decoding {class}: expected {expected} bytes, consumed {observed}\n\
         decoding path: {}\n{dump}",
        trail.join(" -> ")
    )]
    Deserialization {
        class: String,
        expected: u64,
        observed: u64,
        /// Nested class/member names active when the mismatch surfaced,
        /// outermost first.
        trail: Vec<String>,
        /// Hex dump of the bytes around the failed region.
        dump: String,
    },

    #[error(transparent)]
    Bytes(#[from] BytesError),
}

impl ObjectError {
    /// Record an enclosing class or member on a byte-count mismatch as it
    /// propagates outward. Other variants pass through unchanged.
    pub fn breadcrumb(mut self, frame: &str) -> Self {
        if let Self::Deserialization { trail, .. } = &mut self {
            trail.insert(0, frame.into());
        }
        self
    }
}

pub type ObjectResult<T> = Result<T, ObjectError>;
