use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::selection::{IntensitySelectionLibrary, SelectionConfig};
use crate::solution::{Candidate, SolutionLookup};
use crate::types::SolutionIndex;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IntensitySelectionLibrary requires that context be set to a solution registry")]
    MissingRegistry,
    #[error("IntensitySelectionLibrary requires non empty mapping index set")]
    EmptyIndices,
    #[error("Invalid solution index: {0}")]
    InvalidSolutionIndex(SolutionIndex),
    #[error("Malformed library: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk form of an [`IntensitySelectionLibrary`]: solution indices only.
/// Solution bodies live in the shared registry section of the library file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedIntensityLibrary {
    pub indices: Vec<SolutionIndex>,
}

impl<S: Candidate> IntensitySelectionLibrary<S> {
    /// Ascending list of the indices this library references.
    pub fn to_persisted(&self) -> PersistedIntensityLibrary {
        PersistedIntensityLibrary {
            indices: self.indices().collect(),
        }
    }

    /// Rebuild a library by resolving every persisted index in `registry`.
    ///
    /// Fails on the first index the registry does not know; no partially
    /// populated library is ever returned. Repeated indices collapse into
    /// one entry.
    pub fn from_persisted<R>(
        persisted: &PersistedIntensityLibrary,
        registry: &R,
        config: SelectionConfig,
    ) -> Result<Self, LoadError>
    where
        R: SolutionLookup<S> + ?Sized,
    {
        if persisted.indices.is_empty() {
            return Err(LoadError::EmptyIndices);
        }

        let mut library = Self::with_config(config);
        for &index in &persisted.indices {
            let solution = registry
                .lookup(index)
                .ok_or(LoadError::InvalidSolutionIndex(index))?;
            library.insert_at(index, solution);
        }

        debug!(
            requested = persisted.indices.len(),
            resolved = library.len(),
            "loaded intensity selection library"
        );

        Ok(library)
    }
}

/// Load-time context for readers that hand the registry around separately
/// from the persisted libraries that reference it.
///
/// The registry must be fully populated before any library is loaded
/// through the context; indices are resolved eagerly.
pub struct LibraryIoContext<'a, R: ?Sized> {
    solutions: Option<&'a R>,
    config: SelectionConfig,
}

impl<'a, R: ?Sized> Default for LibraryIoContext<'a, R> {
    fn default() -> Self {
        Self {
            solutions: None,
            config: SelectionConfig::default(),
        }
    }
}

impl<'a, R: ?Sized> LibraryIoContext<'a, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solutions(mut self, solutions: &'a R) -> Self {
        self.solutions = Some(solutions);
        self
    }

    pub fn with_config(mut self, config: SelectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn has_solutions(&self) -> bool {
        self.solutions.is_some()
    }

    pub fn load<S>(
        &self,
        persisted: &PersistedIntensityLibrary,
    ) -> Result<IntensitySelectionLibrary<S>, LoadError>
    where
        S: Candidate,
        R: SolutionLookup<S>,
    {
        let registry = self.solutions.ok_or(LoadError::MissingRegistry)?;
        IntensitySelectionLibrary::from_persisted(persisted, registry, self.config)
    }

    /// Parse `{"indices": [...]}` and load it.
    pub fn load_json<S>(&self, json: &str) -> Result<IntensitySelectionLibrary<S>, LoadError>
    where
        S: Candidate,
        R: SolutionLookup<S>,
    {
        if self.solutions.is_none() {
            return Err(LoadError::MissingRegistry);
        }
        let persisted: PersistedIntensityLibrary = serde_json::from_str(json)?;
        self.load(&persisted)
    }
}
