use thiserror::Error;

/// Errors raised while acquiring video metadata from a tier.
///
/// These never escape [`crate::chapters::VideoExtractor::extract_info`]; the
/// extractor logs them and moves on to the next tier.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("metadata tool not found: {0}")]
    ToolNotFound(String),

    #[error("metadata tool exited with status {status:?}: {stderr}")]
    ToolFailed { status: Option<i32>, stderr: String },

    #[error("metadata tool timed out after {0}s")]
    Timeout(u64),

    #[error("malformed metadata output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} is not available")]
    Unavailable(String),
}

pub type AcquisitionResult<T> = std::result::Result<T, AcquisitionError>;
