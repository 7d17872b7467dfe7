//! Versioned object-graph wire protocol for the bramble columnar reader.
//!
//! Objects on the wire carry an optional byte count, a version, and (for
//! polymorphic members) a tag that either announces a class by name,
//! back-references a class announced earlier, or references an object
//! already decoded in the same graph. This crate implements:
//!
//! - [`read_numbytes_version`]: the byte-count/version header
//! - [`read_object_any`]: the tag state machine over a per-read
//!   [`RefTable`] of back references
//! - [`check_byte_count`]: post-decode verification with a hex-dump
//!   diagnostic, because a wrong byte count means the cursor is lost
//!
//! Class resolution is injected via [`ClassResolver`]; there is no global
//! registry.

pub mod error;
pub mod graph;
pub mod header;
pub mod refs;
pub mod resolve;

pub use error::{ObjectError, ObjectResult};
pub use graph::read_object_any;
pub use header::{
    check_byte_count, hex_dump_around, read_numbytes_version, NumBytesVersion, BYTE_COUNT_MASK,
    CLASS_REF_MASK, MEMBERWISE_BIT, NEW_CLASS_TAG, REF_KEY_OFFSET,
};
pub use refs::{RefItem, RefTable};
pub use resolve::{
    ClassDecoder, ClassRef, ClassResolver, ObjectHandle, StaticResolver, StreamedObject,
};
