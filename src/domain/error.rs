//! Domain error types.

/// Top-level error type for barstat.
#[derive(Debug, thiserror::Error)]
pub enum BarstatError {
    #[error("invalid argument: {reason}")]
    Validation { reason: String },

    #[error("malformed input {input:?}: {reason}")]
    MalformedInput { input: String, reason: String },

    #[error("invalid state: {reason}")]
    State { reason: String },

    #[error("arithmetic precondition violated: {reason}")]
    ArithmeticPrecondition { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BarstatError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        BarstatError::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn arithmetic(reason: impl Into<String>) -> Self {
        BarstatError::ArithmeticPrecondition {
            reason: reason.into(),
        }
    }
}

impl From<&BarstatError> for std::process::ExitCode {
    fn from(err: &BarstatError) -> Self {
        let code: u8 = match err {
            BarstatError::Io(_) => 1,
            BarstatError::ConfigParse { .. } | BarstatError::ConfigInvalid { .. } => 2,
            BarstatError::Data { .. } => 3,
            BarstatError::Validation { .. } | BarstatError::MalformedInput { .. } => 4,
            BarstatError::State { .. } | BarstatError::ArithmeticPrecondition { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
