use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::solution::Candidate;
use crate::types::SolutionIndex;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate solution index: {0}")]
    DuplicateIndex(SolutionIndex),
}

/// Resolves solution indices to shared solutions.
pub trait SolutionLookup<S> {
    fn lookup(&self, index: SolutionIndex) -> Option<Arc<S>>;
}

/// Owns every solution of a library file. Selection libraries keep `Arc`
/// clones of the entries, so a solution lives as long as any holder does.
#[derive(Debug)]
pub struct SolutionRegistry<S> {
    solutions: BTreeMap<SolutionIndex, Arc<S>>,
}

impl<S> Default for SolutionRegistry<S> {
    fn default() -> Self {
        Self {
            solutions: BTreeMap::new(),
        }
    }
}

impl<S: Candidate> SolutionRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_solutions(
        solutions: impl IntoIterator<Item = S>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for solution in solutions {
            registry.insert(Arc::new(solution))?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, solution: Arc<S>) -> Result<(), RegistryError> {
        let index = solution.index();
        if self.solutions.contains_key(&index) {
            return Err(RegistryError::DuplicateIndex(index));
        }
        self.solutions.insert(index, solution);
        Ok(())
    }
}

impl<S> SolutionRegistry<S> {
    pub fn get(&self, index: SolutionIndex) -> Option<&Arc<S>> {
        self.solutions.get(&index)
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SolutionIndex, &Arc<S>)> {
        self.solutions.iter().map(|(index, s)| (*index, s))
    }
}

impl<S> SolutionLookup<S> for SolutionRegistry<S> {
    fn lookup(&self, index: SolutionIndex) -> Option<Arc<S>> {
        self.solutions.get(&index).cloned()
    }
}

impl<S> SolutionLookup<S> for BTreeMap<SolutionIndex, Arc<S>> {
    fn lookup(&self, index: SolutionIndex) -> Option<Arc<S>> {
        self.get(&index).cloned()
    }
}
