use serde::{Deserialize, Serialize};

/// Hardware descriptor for the device a problem will be dispatched to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardware {
    pub name: String,
    /// Numeric gfx architecture id, e.g. `942` for gfx942.
    pub architecture: u32,
    pub compute_units: u32,
}

impl Hardware {
    pub fn new(name: impl Into<String>, architecture: u32, compute_units: u32) -> Self {
        Self {
            name: name.into(),
            architecture,
            compute_units,
        }
    }

    pub fn gfx(architecture: u32, compute_units: u32) -> Self {
        Self::new(format!("gfx{architecture}"), architecture, compute_units)
    }
}
