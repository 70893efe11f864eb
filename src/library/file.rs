use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::library::persisted::{LibraryIoContext, LoadError, PersistedIntensityLibrary};
use crate::selection::{IntensitySelectionLibrary, SelectionConfig};
use crate::solution::{RegistryError, Solution, SolutionRegistry};
use crate::types::LibraryVersion;

#[derive(Debug, Error)]
pub enum LibraryFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output file already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Unsupported library format: {0}")]
    UnsupportedFormat(String),
    #[error("Library version mismatch: file says {stored}, content hashes to {computed}")]
    VersionMismatch {
        stored: LibraryVersion,
        computed: LibraryVersion,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFormat {
    pub format_version: String,
    pub hash_algorithm: String,
}

impl LibraryFormat {
    pub fn v0() -> Self {
        Self {
            format_version: "1".into(),
            hash_algorithm: "sha256".into(),
        }
    }
}

/// Library layout section of a file, tagged by library kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LibraryNode {
    IntensitySelection(PersistedIntensityLibrary),
}

/// A self-contained library file: the shared solution bodies plus the
/// library that references them by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryFile {
    pub format: LibraryFormat,
    pub version: LibraryVersion,
    pub created_at: DateTime<Utc>, // informational only
    pub solutions: Vec<Solution>,
    pub library: LibraryNode,
}

impl LibraryFile {
    /// Hash of everything except `version` and `created_at`.
    pub fn compute_version(
        format: &LibraryFormat,
        solutions: &[Solution],
        library: &LibraryNode,
    ) -> Result<LibraryVersion, serde_json::Error> {
        let mut content = serde_json::to_vec(format)?;
        for solution in solutions {
            content.extend(serde_json::to_vec(solution)?);
        }
        content.extend(serde_json::to_vec(library)?);

        Ok(LibraryVersion::from_content(&content))
    }
}

/// Result of reading a library file.
#[derive(Debug)]
pub struct LoadedLibrary {
    pub version: LibraryVersion,
    pub registry: SolutionRegistry<Solution>,
    pub library: IntensitySelectionLibrary<Solution>,
}

pub struct LibraryWriter {
    format: LibraryFormat,
}

impl LibraryWriter {
    pub fn new(format: LibraryFormat) -> Self {
        Self { format }
    }

    /// Build the file contents for `library`, embedding every solution of
    /// `registry` in ascending index order.
    pub fn to_file(
        &self,
        library: &IntensitySelectionLibrary<Solution>,
        registry: &SolutionRegistry<Solution>,
    ) -> Result<LibraryFile, LibraryFileError> {
        let persisted = library.to_persisted();
        if persisted.indices.is_empty() {
            return Err(LoadError::EmptyIndices.into());
        }
        if let Some(missing) = persisted.indices.iter().find(|i| registry.get(**i).is_none()) {
            return Err(LoadError::InvalidSolutionIndex(*missing).into());
        }

        let solutions: Vec<Solution> = registry.iter().map(|(_, s)| (**s).clone()).collect();
        let node = LibraryNode::IntensitySelection(persisted);
        let version = LibraryFile::compute_version(&self.format, &solutions, &node)?;

        Ok(LibraryFile {
            format: self.format.clone(),
            version,
            created_at: Utc::now(),
            solutions,
            library: node,
        })
    }

    /// Write the library file atomically: a temp sibling is written and
    /// synced, then renamed onto `path`. Existing files are never replaced.
    pub fn write(
        &self,
        library: &IntensitySelectionLibrary<Solution>,
        registry: &SolutionRegistry<Solution>,
        path: &Path,
    ) -> Result<LibraryFile, LibraryFileError> {
        if path.exists() {
            return Err(LibraryFileError::OutputExists(path.to_path_buf()));
        }

        let file = self.to_file(library, registry)?;

        let digest = file
            .version
            .as_str()
            .strip_prefix("sha256:")
            .unwrap_or(file.version.as_str());
        let stem = &digest[..digest.len().min(12)];
        let temp_path = path.with_extension(format!("tmp.{stem}"));

        // Stale temp file from a crashed run of this exact version
        if temp_path.exists() {
            fs::remove_file(&temp_path)?;
        }

        let f = fs::File::create(&temp_path)?;
        serde_json::to_writer_pretty(&f, &file)?;
        f.sync_all()?;

        fs::rename(&temp_path, path)?;

        info!(
            path = %path.display(),
            version = %file.version,
            solutions = file.solutions.len(),
            "wrote library file"
        );

        Ok(file)
    }
}

pub struct LibraryReader {
    config: SelectionConfig,
}

impl Default for LibraryReader {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

impl LibraryReader {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn read(&self, path: &Path) -> Result<LoadedLibrary, LibraryFileError> {
        let f = fs::File::open(path)?;
        let file: LibraryFile = serde_json::from_reader(f)?;
        let loaded = self.load(file)?;

        info!(
            path = %path.display(),
            version = %loaded.version,
            solutions = loaded.registry.len(),
            indices = loaded.library.len(),
            "read library file"
        );

        Ok(loaded)
    }

    pub fn read_str(&self, json: &str) -> Result<LoadedLibrary, LibraryFileError> {
        let file: LibraryFile = serde_json::from_str(json)?;
        self.load(file)
    }

    /// Two-phase load: populate the registry from the embedded solutions,
    /// then resolve the library's indices against it.
    pub fn load(&self, file: LibraryFile) -> Result<LoadedLibrary, LibraryFileError> {
        if file.format != LibraryFormat::v0() {
            return Err(LibraryFileError::UnsupportedFormat(file.format.format_version));
        }

        let computed = LibraryFile::compute_version(&file.format, &file.solutions, &file.library)?;
        if computed != file.version {
            return Err(LibraryFileError::VersionMismatch {
                stored: file.version,
                computed,
            });
        }

        // 1. Registry
        let registry = SolutionRegistry::from_solutions(file.solutions)?;

        // 2. Library
        let context = LibraryIoContext::new()
            .with_solutions(&registry)
            .with_config(self.config);
        let library: IntensitySelectionLibrary<Solution> = match &file.library {
            LibraryNode::IntensitySelection(persisted) => context.load(persisted)?,
        };

        Ok(LoadedLibrary {
            version: file.version,
            registry,
            library,
        })
    }
}
