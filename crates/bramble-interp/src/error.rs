use thiserror::Error;

use bramble_bytes::BytesError;
use bramble_object::ObjectError;

#[derive(Debug, Error)]
pub enum InterpError {
    #[error("no reader rule matches type {type_name:?} at {path}")]
    NoRule { type_name: String, path: String },

    #[error("fixed array of {type_name:?} at {path} has a zero-sized dimension")]
    EmptyArray { type_name: String, path: String },

    #[error("class {class:?} referenced at {path} has no metadata entry")]
    UnknownClass { class: String, path: String },

    #[error("container of class {class:?} is serialized member-wise, which is not supported")]
    MemberWise { class: String },

    #[error("column shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Bytes(#[from] BytesError),

    #[error(transparent)]
    Object(#[from] ObjectError),
}

pub type InterpResult<T> = Result<T, InterpError>;
