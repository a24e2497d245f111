//! Per-type cache of binding plans.
//!
//! Entries are created on first use of a record type and never evicted.

use crate::plan::{BindingPlan, PlanError};
use crate::record::Record;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type ErasedPlan = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<TypeId, ErasedPlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plan for `R`, building and storing it on first use.
    ///
    /// Concurrent first uses may each build a plan; the first one stored is
    /// kept and returned to everyone. Build failures are not cached.
    pub fn get_or_build<R: Record>(&self) -> Result<Arc<BindingPlan<R>>, PlanError> {
        let key = TypeId::of::<R>();

        if let Some(plan) = self.lookup::<R>(key) {
            tracing::trace!(record = plan.record(), "binding plan cache hit");
            return Ok(plan);
        }

        let built = Arc::new(BindingPlan::<R>::build()?);
        let erased: ErasedPlan = built.clone();
        let stored = self
            .plans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(erased)
            .clone();

        // The entry under `key` is a `BindingPlan<R>` unless the map was
        // written some other way; fall back to the fresh plan then.
        Ok(stored.downcast().unwrap_or(built))
    }

    pub fn contains<R: Record>(&self) -> bool {
        self.plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<R>())
    }

    pub fn len(&self) -> usize {
        self.plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<R: Record>(&self, key: TypeId) -> Option<Arc<BindingPlan<R>>> {
        let plans = self.plans.read().unwrap_or_else(PoisonError::into_inner);
        plans.get(&key).cloned()?.downcast().ok()
    }
}

impl std::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCache")
            .field("plans", &self.len())
            .finish()
    }
}
