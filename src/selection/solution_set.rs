use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::SolutionIndex;

/// Solutions returned by an enumeration query, ordered by index.
#[derive(Debug)]
pub struct SolutionSet<S> {
    solutions: BTreeMap<SolutionIndex, Arc<S>>,
}

impl<S> Default for SolutionSet<S> {
    fn default() -> Self {
        Self {
            solutions: BTreeMap::new(),
        }
    }
}

impl<S> SolutionSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: SolutionIndex, solution: Arc<S>) {
        self.solutions.insert(index, solution);
    }

    pub fn contains(&self, index: SolutionIndex) -> bool {
        self.solutions.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn indices(&self) -> Vec<SolutionIndex> {
        self.solutions.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<S>> {
        self.solutions.values()
    }
}
