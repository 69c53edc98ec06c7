use crate::classification::category_map::MaterialType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("inference failed: {0}")]
    InferenceFailure(String),

    #[error("class index {class_index} is out of range for a vector of length {vector_len}")]
    IndexOutOfRange {
        class_index: usize,
        vector_len: usize,
    },

    #[error("probability at index {index} is not in [0, 1]: {value}")]
    InvalidProbability { index: usize, value: f32 },
}

impl ClassifyError {
    /// Configuration-integrity failures are not fixed by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifyError::ModelUnavailable(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("category map has no entries")]
    EmptyCategoryMap,

    #[error("weight for class index {class_index} must be in (0, 1], got {weight}")]
    InvalidWeight { class_index: usize, weight: f32 },

    #[error("class index {0} is listed more than once")]
    DuplicateClassIndex(usize),

    #[error("category map has no entry for {0}")]
    MissingMaterialType(MaterialType),

    #[error("acceptance threshold must be in [0, 1), got {0}")]
    InvalidThreshold(f32),

    #[error("utc offset of {0} hours is out of range")]
    InvalidUtcOffset(i32),
}
