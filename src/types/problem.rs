use serde::{Deserialize, Serialize};

/// Element type of the operands of a contraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Half,
    BFloat16,
    Float,
    Double,
    Int8,
    Int32,
}

impl DataType {
    pub fn element_size(self) -> usize {
        match self {
            DataType::Int8 => 1,
            DataType::Half | DataType::BFloat16 => 2,
            DataType::Float | DataType::Int32 => 4,
            DataType::Double => 8,
        }
    }
}

/// Structural kind of a contraction. Two problems of the same type can be
/// served by the same set of kernels; only their sizes differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemType {
    pub operation: String,
    pub data_type: DataType,
    pub transpose_a: bool,
    pub transpose_b: bool,
}

impl ProblemType {
    /// A plain `C = A * B` GEMM with untransposed operands.
    pub fn gemm(data_type: DataType) -> Self {
        Self {
            operation: "Contraction_l_Ailk_Bljk_Cijk_Dijk".to_string(),
            data_type,
            transpose_a: false,
            transpose_b: false,
        }
    }

    pub fn with_transpose(mut self, transpose_a: bool, transpose_b: bool) -> Self {
        self.transpose_a = transpose_a;
        self.transpose_b = transpose_b;
        self
    }
}

/// Workload descriptor: the shape of a batched contraction.
///
/// `M` and `N` are the free sizes of A and B, `K` is the bound (summation)
/// size. The arithmetic intensity is derived once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractionProblem {
    problem_type: ProblemType,
    free_size_a: u64,
    free_size_b: u64,
    batch_size: u64,
    bound_size: u64,
    arithmetic_intensity: f64,
}

impl ContractionProblem {
    pub fn new(
        problem_type: ProblemType,
        free_size_a: u64,
        free_size_b: u64,
        batch_size: u64,
        bound_size: u64,
    ) -> Self {
        let arithmetic_intensity = arithmetic_intensity(
            free_size_a,
            free_size_b,
            bound_size,
            problem_type.data_type.element_size(),
        );

        Self {
            problem_type,
            free_size_a,
            free_size_b,
            batch_size,
            bound_size,
            arithmetic_intensity,
        }
    }

    /// Shorthand for a GEMM of the given sizes.
    pub fn gemm(data_type: DataType, m: u64, n: u64, batch: u64, k: u64) -> Self {
        Self::new(ProblemType::gemm(data_type), m, n, batch, k)
    }

    pub fn problem_type(&self) -> &ProblemType {
        &self.problem_type
    }

    pub fn free_size_a(&self) -> u64 {
        self.free_size_a
    }

    pub fn free_size_b(&self) -> u64 {
        self.free_size_b
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn bound_size(&self) -> u64 {
        self.bound_size
    }

    pub fn arithmetic_intensity(&self) -> f64 {
        self.arithmetic_intensity
    }
}

// flops / bytes per batch: 2*M*N*K / (elem * (M*K + K*N + M*N))
fn arithmetic_intensity(m: u64, n: u64, k: u64, element_size: usize) -> f64 {
    let (m, n, k) = (m as f64, n as f64, k as f64);
    let traffic = element_size as f64 * (m * k + k * n + m * n);
    if traffic == 0.0 {
        return 0.0;
    }
    (2.0 * m * n * k) / traffic
}
