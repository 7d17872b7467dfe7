use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role tag that marks a base-class entry as the generic polymorphic base
/// (version + unique-id + bit-flags on the wire, no useful payload).
pub const POLYMORPHIC_BASE_TAG: u32 = 66;

/// What kind of member an element describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementRole {
    /// An ordinary data member serialized in place.
    Value,
    /// A base-class chain entry; `tag` is the role code recorded by the
    /// metadata writer ([`POLYMORPHIC_BASE_TAG`] marks the polymorphic base).
    Base { tag: u32 },
    /// A pointer-like member serialized through the object-graph protocol.
    Pointer,
    /// A synthetic marker element that carries no payload on the wire.
    Artificial,
}

/// One member's layout metadata, supplied already parsed.
///
/// The engine never reads the metadata's own on-disk encoding; descriptors
/// arrive from an external streamer-info parser (or a JSON fixture in
/// tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Member name.
    pub name: String,
    /// Raw C++ type name, template arguments and all.
    pub type_name: String,
    /// Number of fixed array dimensions (0 for scalars).
    #[serde(default)]
    pub array_dims: u32,
    /// Maximum index per dimension; only the first `array_dims` entries are
    /// meaningful.
    #[serde(default)]
    pub max_index: Vec<u32>,
    /// Type-role code.
    pub role: ElementRole,
}

impl ElementDescriptor {
    /// A plain value member with no array dimensions.
    pub fn value(name: &str, type_name: &str) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            array_dims: 0,
            max_index: Vec::new(),
            role: ElementRole::Value,
        }
    }

    /// A value member with fixed array dimensions.
    pub fn array(name: &str, type_name: &str, dims: &[u32]) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            array_dims: dims.len() as u32,
            max_index: dims.to_vec(),
            role: ElementRole::Value,
        }
    }

    /// A base-class chain entry.
    pub fn base(type_name: &str, tag: u32) -> Self {
        Self {
            name: type_name.into(),
            type_name: type_name.into(),
            array_dims: 0,
            max_index: Vec::new(),
            role: ElementRole::Base { tag },
        }
    }

    /// The same element with its array dimensions stripped, used when a
    /// fixed C-array rule recurses into its item type.
    pub fn without_dims(&self) -> Self {
        Self {
            array_dims: 0,
            max_index: Vec::new(),
            ..self.clone()
        }
    }
}

/// Ordered per-class element lists, keyed by class name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetadataMap {
    classes: HashMap<String, Vec<ElementDescriptor>>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: &str, elements: Vec<ElementDescriptor>) {
        self.classes.insert(class.into(), elements);
    }

    /// The ordered element list for `class`, if the metadata knows it.
    pub fn elements_of(&self, class: &str) -> Option<&[ElementDescriptor]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
