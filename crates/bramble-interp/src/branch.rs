use std::sync::Arc;

use tracing::debug;

use bramble_bytes::{Chunk, Cursor};
use bramble_meta::{ElementDescriptor, MetadataMap};

use crate::cache::PlanCache;
use crate::compile::CompiledPlan;
use crate::error::InterpResult;
use crate::reader::Reader;
use crate::reconstruct::{reconstruct, ColumnValue};

/// Drives one column over a run of entries: compiles (or looks up) the plan,
/// instantiates a reader tree, consumes entries, and reshapes the result.
#[derive(Debug)]
pub struct BranchReader {
    plan: Arc<CompiledPlan>,
    root: Reader,
    entries: u64,
}

impl BranchReader {
    /// Reader for a column declared by one element descriptor.
    pub fn for_element(
        element: &ElementDescriptor,
        metadata: &MetadataMap,
    ) -> InterpResult<Self> {
        let plan = Arc::new(CompiledPlan::for_element(element, metadata)?);
        Ok(Self::from_plan(plan))
    }

    /// Reader for a whole-class column, reusing cached plans when available.
    pub fn for_class(
        class: &str,
        metadata: &MetadataMap,
        cache: &PlanCache,
    ) -> InterpResult<Self> {
        let plan = cache.get_or_compile(class, metadata)?;
        Ok(Self::from_plan(plan))
    }

    fn from_plan(plan: Arc<CompiledPlan>) -> Self {
        let root = Reader::new(&plan, plan.root());
        Self {
            plan,
            root,
            entries: 0,
        }
    }

    /// Consume exactly one entry's bytes from the cursor.
    pub fn read_entry(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        self.root.read(chunk, cursor)?;
        self.entries += 1;
        Ok(())
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Reshape everything read so far into the final columnar value.
    pub fn finish(&self) -> InterpResult<ColumnValue> {
        debug!(entries = self.entries, "finishing branch read");
        reconstruct(&self.plan, self.plan.root(), self.root.drain())
    }
}
