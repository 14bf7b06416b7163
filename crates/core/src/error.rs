use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Pipeline step at which a generation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Construction,
    Sampling,
    Functional,
    Fit,
    Assembly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Construction => "construction",
            Stage::Sampling => "sampling",
            Stage::Functional => "functional evaluation",
            Stage::Fit => "fitting",
            Stage::Assembly => "table assembly",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistError {
    #[error("Unknown distribution: {0}")]
    UnknownDistribution(String),

    #[error("Unsupported operation '{operation}' for distribution '{family}'")]
    UnsupportedOperation { family: String, operation: String },

    #[error("Generation failed for '{family}' during {stage}: {cause}")]
    GenerationFailure {
        family: String,
        stage: Stage,
        cause: String,
    },
}

impl DistError {
    pub fn failure(family: impl Into<String>, stage: Stage, cause: impl fmt::Display) -> Self {
        DistError::GenerationFailure {
            family: family.into(),
            stage,
            cause: cause.to_string(),
        }
    }

    pub fn unsupported(family: impl Into<String>, operation: impl Into<String>) -> Self {
        DistError::UnsupportedOperation {
            family: family.into(),
            operation: operation.into(),
        }
    }

    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DistError::UnknownDistribution(_) => "unknown_distribution",
            DistError::UnsupportedOperation { .. } => "unsupported_operation",
            DistError::GenerationFailure { .. } => "generation_failure",
        }
    }
}

pub type DistResult<T> = Result<T, DistError>;
