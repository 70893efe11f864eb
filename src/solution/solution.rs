use serde::{Deserialize, Serialize};

use crate::predicates::{HardwarePredicate, ProblemPredicate};
use crate::solution::stream_k::StreamKProfile;
use crate::types::{ContractionProblem, Hardware, ProblemType, SolutionIndex};

/// What a selection library needs from a kernel variant.
///
/// Candidates are shared between libraries and never mutated by them, so
/// every method takes `&self` and must be free of side effects.
pub trait Candidate: Send + Sync {
    fn index(&self) -> SolutionIndex;

    fn description(&self) -> String;

    /// Closeness of this candidate to a problem, lower is better.
    /// A negative value means the candidate is not comparable.
    fn cost_metric(&self, intensity: f64, bound_size: u64) -> f64;

    fn problem_predicate(&self) -> &ProblemPredicate;

    fn hardware_predicate(&self) -> &HardwarePredicate;

    /// Structural applicability, independent of both predicates.
    fn matches_type(&self, problem: &ContractionProblem, hardware: &Hardware) -> bool;
}

/// A precomputed kernel variant as stored in a library file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub index: SolutionIndex,
    pub name: String,
    pub problem_type: ProblemType,
    pub stream_k: StreamKProfile,
    #[serde(default)]
    pub problem_predicate: ProblemPredicate,
    #[serde(default)]
    pub hardware_predicate: HardwarePredicate,
}

impl Solution {
    pub fn new(
        index: impl Into<SolutionIndex>,
        name: impl Into<String>,
        problem_type: ProblemType,
        stream_k: StreamKProfile,
    ) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            problem_type,
            stream_k,
            problem_predicate: ProblemPredicate::True,
            hardware_predicate: HardwarePredicate::True,
        }
    }

    pub fn with_problem_predicate(mut self, predicate: ProblemPredicate) -> Self {
        self.problem_predicate = predicate;
        self
    }

    pub fn with_hardware_predicate(mut self, predicate: HardwarePredicate) -> Self {
        self.hardware_predicate = predicate;
        self
    }
}

impl Candidate for Solution {
    fn index(&self) -> SolutionIndex {
        self.index
    }

    fn description(&self) -> String {
        self.name.clone()
    }

    fn cost_metric(&self, intensity: f64, bound_size: u64) -> f64 {
        self.stream_k.cost_metric(intensity, bound_size)
    }

    fn problem_predicate(&self) -> &ProblemPredicate {
        &self.problem_predicate
    }

    fn hardware_predicate(&self) -> &HardwarePredicate {
        &self.hardware_predicate
    }

    fn matches_type(&self, problem: &ContractionProblem, _hardware: &Hardware) -> bool {
        self.problem_type == *problem.problem_type()
    }
}
