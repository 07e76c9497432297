//! In-memory expense store.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use spendflow_shared::{ApprovalStepId, ExpenseId};

use super::{ExpenseRecord, ExpenseStore, StoreError};

/// Thread-safe in-memory store.
///
/// Each record sits behind its own `RwLock`, so decisions on different
/// expenses never contend. The map shard lock is released before the record
/// lock is taken.
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    records: DashMap<ExpenseId, Arc<RwLock<ExpenseRecord>>>,
    step_index: DashMap<ApprovalStepId, ExpenseId>,
}

impl InMemoryExpenseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored expenses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn entry(&self, id: ExpenseId) -> Option<Arc<RwLock<ExpenseRecord>>> {
        self.records.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn insert(&self, record: ExpenseRecord) -> Result<(), StoreError> {
        let id = record.id();
        let step_ids: Vec<ApprovalStepId> = record.steps.iter().map(|s| s.id).collect();

        // Record first, so an indexed step always resolves.
        self.records.insert(id, Arc::new(RwLock::new(record)));
        for step_id in step_ids {
            self.step_index.insert(step_id, id);
        }
        Ok(())
    }

    fn get(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>, StoreError> {
        Ok(self.entry(id).map(|record| record.read().clone()))
    }

    fn expense_for_step(&self, step_id: ApprovalStepId) -> Result<Option<ExpenseId>, StoreError> {
        Ok(self.step_index.get(&step_id).map(|entry| *entry.value()))
    }

    fn update<T, E, F>(&self, id: ExpenseId, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut ExpenseRecord) -> Result<T, E>,
    {
        let record = self.entry(id).ok_or(StoreError::ExpenseNotFound(id))?;
        let mut guard = record.write();

        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }

    fn scan(
        &self,
        filter: &dyn Fn(&ExpenseRecord) -> bool,
    ) -> Result<Vec<ExpenseRecord>, StoreError> {
        let entries: Vec<Arc<RwLock<ExpenseRecord>>> = self
            .records
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        Ok(entries
            .into_iter()
            .filter_map(|record| {
                let snapshot = record.read();
                filter(&snapshot).then(|| snapshot.clone())
            })
            .collect())
    }
}
