pub mod intensity;
pub mod solution_set;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{ContractionProblem, Hardware};
pub use intensity::IntensitySelectionLibrary;
pub use solution_set::SolutionSet;

/// Runtime knobs of a selection library, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
	/// Emit a `debug` event per evaluated solution (description, cost,
	/// predicate explanations). Never changes a query's result.
	pub trace_evaluation: bool,
}

impl SelectionConfig {
	pub fn verbose() -> Self {
		Self {
			trace_evaluation: true,
		}
	}
}

/// Query surface shared by every kind of solution library.
pub trait SolutionLibrary<S> {
	fn library_type(&self) -> &'static str;

	fn description(&self) -> String;

	/// The single best solution for `problem` on `hardware`, if any.
	/// "No match" is an ordinary outcome, not an error.
	fn find_best_solution(&self, problem: &ContractionProblem, hardware: &Hardware) -> Option<Arc<S>>;

	/// Every solution whose problem and hardware predicates both hold.
	fn find_all_solutions(&self, problem: &ContractionProblem, hardware: &Hardware) -> SolutionSet<S>;

	/// Every solution structurally compatible with the problem type,
	/// regardless of predicates.
	fn find_all_solutions_matching_type(
		&self,
		problem: &ContractionProblem,
		hardware: &Hardware,
	) -> SolutionSet<S>;
}
