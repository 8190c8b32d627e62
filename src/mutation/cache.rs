use std::collections::HashMap;

use crate::models::{Operation, OperationId};

/// The cached operation collection, indexed by id.
///
/// Order is the order the read collaborator delivered. If an id appears
/// twice, lookups resolve to the first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationCache {
    operations: Vec<Operation>,
    index: HashMap<OperationId, usize>,
}

impl OperationCache {
    pub fn new(operations: Vec<Operation>) -> Self {
        let mut cache = Self::default();
        cache.replace(operations);
        cache
    }

    /// Replaces the whole collection (full refresh).
    pub fn replace(&mut self, operations: Vec<Operation>) {
        self.index.clear();
        for (pos, op) in operations.iter().enumerate() {
            self.index.entry(op.id).or_insert(pos);
        }
        self.operations = operations;
    }

    pub fn get(&self, id: OperationId) -> Option<&Operation> {
        self.index.get(&id).map(|&pos| &self.operations[pos])
    }

    pub(crate) fn get_mut(&mut self, id: OperationId) -> Option<&mut Operation> {
        let pos = *self.index.get(&id)?;
        self.operations.get_mut(pos)
    }

    pub fn contains(&self, id: OperationId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
