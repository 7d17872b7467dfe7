use std::any::Any;
use std::sync::Arc;

use bramble_bytes::{Chunk, Cursor};

use crate::error::{ObjectError, ObjectResult};
use crate::refs::RefTable;

/// A decoded object from the stream.
///
/// The engine itself never looks inside objects; callers downcast through
/// `as_any` when they know the concrete model type.
pub trait StreamedObject: std::fmt::Debug + Send + Sync {
    fn class_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

pub type ObjectHandle = Arc<dyn StreamedObject>;

/// Per-class decode routine, registered with a [`ClassResolver`].
pub trait ClassDecoder: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Decode one instance starting at the cursor. Implementations may
    /// recurse through [`read_object_any`](crate::graph::read_object_any)
    /// for pointer-like members, threading the same reference table.
    fn decode(
        &self,
        chunk: &Chunk,
        cursor: &mut Cursor,
        refs: &mut RefTable,
        resolver: &dyn ClassResolver,
    ) -> ObjectResult<ObjectHandle>;
}

pub type ClassRef = Arc<dyn ClassDecoder>;

/// Maps stream class names to decode routines.
///
/// An explicit value threaded through every decode call, owned by whatever
/// session object drives the read; there is deliberately no process-wide
/// registry.
pub trait ClassResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<ClassRef>;

    /// Like `resolve`, but an unknown class is an error.
    fn require(&self, name: &str) -> ObjectResult<ClassRef> {
        self.resolve(name).ok_or_else(|| ObjectError::UnresolvedClass {
            name: name.into(),
        })
    }
}

/// Resolver over a fixed set of decoders.
#[derive(Debug, Default)]
pub struct StaticResolver {
    decoders: Vec<ClassRef>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, decoder: ClassRef) {
        self.decoders.push(decoder);
    }
}

impl ClassResolver for StaticResolver {
    fn resolve(&self, name: &str) -> Option<ClassRef> {
        self.decoders.iter().find(|d| d.name() == name).cloned()
    }
}
