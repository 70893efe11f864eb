pub mod file;
pub mod persisted;

pub use file::{LibraryFile, LibraryFileError, LibraryFormat, LibraryNode, LibraryReader, LibraryWriter, LoadedLibrary};
pub use persisted::{LibraryIoContext, LoadError, PersistedIntensityLibrary};
