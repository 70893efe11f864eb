use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::types::{ContractionProblem, Hardware};

/// A named numeric field read from a predicate subject.
pub trait Property: Copy + Debug {
    type Subject;

    fn name(&self) -> &'static str;

    fn value(&self, subject: &Self::Subject) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemProperty {
    FreeSizeA,
    FreeSizeB,
    BatchSize,
    BoundSize,
}

impl Property for ProblemProperty {
    type Subject = ContractionProblem;

    fn name(&self) -> &'static str {
        match self {
            ProblemProperty::FreeSizeA => "FreeSizeA",
            ProblemProperty::FreeSizeB => "FreeSizeB",
            ProblemProperty::BatchSize => "BatchSize",
            ProblemProperty::BoundSize => "BoundSize",
        }
    }

    fn value(&self, problem: &ContractionProblem) -> u64 {
        match self {
            ProblemProperty::FreeSizeA => problem.free_size_a(),
            ProblemProperty::FreeSizeB => problem.free_size_b(),
            ProblemProperty::BatchSize => problem.batch_size(),
            ProblemProperty::BoundSize => problem.bound_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwareProperty {
    Architecture,
    ComputeUnits,
}

impl Property for HardwareProperty {
    type Subject = Hardware;

    fn name(&self) -> &'static str {
        match self {
            HardwareProperty::Architecture => "Architecture",
            HardwareProperty::ComputeUnits => "ComputeUnits",
        }
    }

    fn value(&self, hardware: &Hardware) -> u64 {
        match self {
            HardwareProperty::Architecture => u64::from(hardware.architecture),
            HardwareProperty::ComputeUnits => u64::from(hardware.compute_units),
        }
    }
}
