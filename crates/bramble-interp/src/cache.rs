use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use bramble_meta::MetadataMap;

use crate::compile::CompiledPlan;
use crate::error::InterpResult;

/// Shared cache of compiled plans, keyed by class name.
///
/// Compilation runs outside the lock, so two threads racing on the same
/// class may both compile; the loser's plan is discarded. Plans are
/// immutable, so either copy is equally valid.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<String, Arc<CompiledPlan>>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(
        &self,
        class: &str,
        metadata: &MetadataMap,
    ) -> InterpResult<Arc<CompiledPlan>> {
        if let Some(plan) = self.plans.read().unwrap().get(class) {
            return Ok(Arc::clone(plan));
        }

        let plan = Arc::new(CompiledPlan::for_class(class, metadata)?);
        let mut plans = self.plans.write().unwrap();
        if let Some(existing) = plans.get(class) {
            debug!(class, "discarding plan compiled in a race");
            return Ok(Arc::clone(existing));
        }
        plans.insert(class.to_string(), Arc::clone(&plan));
        Ok(plan)
    }

    pub fn len(&self) -> usize {
        self.plans.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
