pub mod registry;
pub mod solution;
pub mod stream_k;

pub use registry::{RegistryError, SolutionLookup, SolutionRegistry};
pub use solution::{Candidate, Solution};
pub use stream_k::{StreamKProfile, NOT_COMPARABLE};
