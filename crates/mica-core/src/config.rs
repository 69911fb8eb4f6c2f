use serde::{Deserialize, Serialize};

/// Optimization level for code generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptimizationLevel {
    #[serde(rename = "0")]
    O0,
    #[serde(rename = "1")]
    O1,
}

impl Default for OptimizationLevel {
    fn default() -> Self {
        OptimizationLevel::O0
    }
}

impl OptimizationLevel {
    /// Whether the storage array loop caching pass runs at this level.
    pub fn array_loop_caching(self) -> bool {
        self >= OptimizationLevel::O1
    }
}

/// Options that control Yul code generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenOptions {
    /// Optimization level (default: O0)
    #[serde(default)]
    pub optimization_level: OptimizationLevel,
}

impl CodegenOptions {
    pub fn with_level(level: OptimizationLevel) -> Self {
        CodegenOptions {
            optimization_level: level,
        }
    }
}
