pub mod hardware;
pub mod identifiers;
pub mod problem;

pub use hardware::Hardware;
pub use identifiers::{LibraryVersion, SolutionIndex};
pub use problem::{ContractionProblem, DataType, ProblemType};
