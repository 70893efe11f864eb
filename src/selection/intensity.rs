use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::selection::{SelectionConfig, SolutionLibrary, SolutionSet};
use crate::solution::{Candidate, Solution};
use crate::types::{ContractionProblem, Hardware, SolutionIndex};

/// Selects the Stream-K kernel whose tuned arithmetic intensity is closest
/// to the problem's.
///
/// The library is built once (directly or from its persisted indices) and
/// only read afterwards; all queries take `&self` and can run concurrently.
#[derive(Debug)]
pub struct IntensitySelectionLibrary<S = Solution> {
	solutions: BTreeMap<SolutionIndex, Arc<S>>,
	config: SelectionConfig,
}

impl<S> Default for IntensitySelectionLibrary<S> {
	fn default() -> Self {
		Self {
			solutions: BTreeMap::new(),
			config: SelectionConfig::default(),
		}
	}
}

impl<S: Candidate> IntensitySelectionLibrary<S> {
	pub const TYPE: &'static str = "IntensitySelection";

	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: SelectionConfig) -> Self {
		Self {
			solutions: BTreeMap::new(),
			config,
		}
	}

	pub fn from_solutions(solutions: impl IntoIterator<Item = Arc<S>>, config: SelectionConfig) -> Self {
		let mut library = Self::with_config(config);
		for solution in solutions {
			library.insert(solution);
		}
		library
	}

	/// Register a solution under its own index, replacing any previous
	/// entry with that index.
	pub fn insert(&mut self, solution: Arc<S>) -> Option<Arc<S>> {
		self.solutions.insert(solution.index(), solution)
	}

	pub(crate) fn insert_at(&mut self, index: SolutionIndex, solution: Arc<S>) {
		self.solutions.insert(index, solution);
	}

	pub fn get(&self, index: SolutionIndex) -> Option<&Arc<S>> {
		self.solutions.get(&index)
	}

	/// Indices in ascending order.
	pub fn indices(&self) -> impl Iterator<Item = SolutionIndex> + '_ {
		self.solutions.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.solutions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.solutions.is_empty()
	}

	pub fn config(&self) -> SelectionConfig {
		self.config
	}

	fn predicates_pass(solution: &S, problem: &ContractionProblem, hardware: &Hardware) -> bool {
		solution.problem_predicate().evaluate(problem) && solution.hardware_predicate().evaluate(hardware)
	}

	fn trace_predicates(solution: &S, problem: &ContractionProblem, hardware: &Hardware) {
		debug!(
			problem_predicate = %solution.problem_predicate().debug_eval(problem),
			hardware_predicate = %solution.hardware_predicate().debug_eval(hardware),
			"predicate evaluation"
		);
	}
}

impl<S: Candidate> SolutionLibrary<S> for IntensitySelectionLibrary<S> {
	fn library_type(&self) -> &'static str {
		Self::TYPE
	}

	fn description(&self) -> String {
		self.library_type().to_string()
	}

	fn find_best_solution(&self, problem: &ContractionProblem, hardware: &Hardware) -> Option<Arc<S>> {
		let trace_evaluation = self.config.trace_evaluation;
		let intensity = problem.arithmetic_intensity();
		let bound_size = problem.bound_size();

		trace!(
			m = problem.free_size_a(),
			n = problem.free_size_b(),
			batch = problem.batch_size(),
			k = bound_size,
			intensity,
			"intensity selection"
		);

		let mut best_diff = f64::INFINITY;
		let mut best_solution: Option<Arc<S>> = None;

		for (index, solution) in &self.solutions {
			let diff = solution.cost_metric(intensity, bound_size);

			if trace_evaluation {
				debug!(solution = %solution.description(), diff, index = %index, "cost metric");
			}

			if diff < 0.0 {
				continue;
			}

			// Only a strictly better diff is worth a predicate check. A failed
			// check leaves best_diff untouched so worse-but-eligible solutions
			// later in the pass can still win.
			if diff < best_diff {
				if Self::predicates_pass(solution, problem, hardware) {
					best_diff = diff;
					best_solution = Some(Arc::clone(solution));

					if trace_evaluation {
						debug!(index = %index, "best so far");
					}
				} else if trace_evaluation {
					debug!(index = %index, "best, but predicate failure");
				}

				if trace_evaluation {
					Self::trace_predicates(solution, problem, hardware);
				}
			}
		}

		best_solution
	}

	fn find_all_solutions(&self, problem: &ContractionProblem, hardware: &Hardware) -> SolutionSet<S> {
		let trace_evaluation = self.config.trace_evaluation;
		let mut rv = SolutionSet::new();

		for (index, solution) in &self.solutions {
			if Self::predicates_pass(solution, problem, hardware) {
				rv.insert(*index, Arc::clone(solution));

				if trace_evaluation {
					debug!(solution = %solution.description(), index = %index, "works");
				}
			} else if trace_evaluation {
				debug!(solution = %solution.description(), index = %index, "predicate failed");
			}

			if trace_evaluation {
				Self::trace_predicates(solution, problem, hardware);
			}
		}

		rv
	}

	fn find_all_solutions_matching_type(
		&self,
		problem: &ContractionProblem,
		hardware: &Hardware,
	) -> SolutionSet<S> {
		let mut rv = SolutionSet::new();

		for (index, solution) in &self.solutions {
			if solution.matches_type(problem, hardware) {
				rv.insert(*index, Arc::clone(solution));
			}
		}

		rv
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::solution::StreamKProfile;
	use crate::types::{DataType, ProblemType};

	#[test]
	fn empty_library_has_no_best_solution() {
		let library: IntensitySelectionLibrary = IntensitySelectionLibrary::new();
		let problem = ContractionProblem::gemm(DataType::Half, 1024, 1024, 1, 1024);
		let hardware = Hardware::gfx(942, 304);

		assert!(library.find_best_solution(&problem, &hardware).is_none());
		assert!(library.find_all_solutions(&problem, &hardware).is_empty());
	}

	#[test]
	fn insert_replaces_same_index() {
		let mut library = IntensitySelectionLibrary::new();
		let ty = ProblemType::gemm(DataType::Float);
		library.insert(Arc::new(Solution::new(3, "first", ty.clone(), StreamKProfile::new(1.0, 0))));
		let previous = library.insert(Arc::new(Solution::new(3, "second", ty, StreamKProfile::new(2.0, 0))));

		assert_eq!(previous.map(|s| s.name.clone()), Some("first".to_string()));
		assert_eq!(library.len(), 1);
		assert_eq!(library.get(SolutionIndex::new(3)).map(|s| s.name.as_str()), Some("second"));
	}

	#[test]
	fn nan_cost_is_never_selected() {
		struct NanCandidate(Solution);

		impl Candidate for NanCandidate {
			fn index(&self) -> SolutionIndex {
				self.0.index
			}
			fn description(&self) -> String {
				self.0.name.clone()
			}
			fn cost_metric(&self, _intensity: f64, _bound_size: u64) -> f64 {
				f64::NAN
			}
			fn problem_predicate(&self) -> &crate::predicates::ProblemPredicate {
				&self.0.problem_predicate
			}
			fn hardware_predicate(&self) -> &crate::predicates::HardwarePredicate {
				&self.0.hardware_predicate
			}
			fn matches_type(&self, problem: &ContractionProblem, hardware: &Hardware) -> bool {
				self.0.matches_type(problem, hardware)
			}
		}

		let ty = ProblemType::gemm(DataType::Float);
		let mut library = IntensitySelectionLibrary::new();
		library.insert(Arc::new(NanCandidate(Solution::new(1, "nan", ty, StreamKProfile::new(1.0, 0)))));

		let problem = ContractionProblem::gemm(DataType::Float, 64, 64, 1, 64);
		assert!(library.find_best_solution(&problem, &Hardware::gfx(908, 120)).is_none());
	}
}
