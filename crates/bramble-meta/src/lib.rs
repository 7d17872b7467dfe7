//! Streamer metadata for the bramble columnar reader.
//!
//! The wire format is self-describing: every file carries per-class layout
//! metadata ("streamer info") naming each member, its C++ type, its array
//! shape, and its role. Parsing that metadata's own encoding happens outside
//! this workspace; this crate models the already-parsed result: element
//! descriptors, the class-name-to-element-list map the plan compiler
//! consumes, and the type-name string dissection the container rules need.

pub mod element;
pub mod typename;

pub use element::{ElementDescriptor, ElementRole, MetadataMap, POLYMORPHIC_BASE_TAG};
pub use typename::{normalize_spaces, split_top_level_comma, strip_namespaces, template_of};
