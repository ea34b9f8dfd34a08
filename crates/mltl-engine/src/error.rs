use mltl_dsl::errors::ParseError;
use mltl_smt::encoder::EncodingError;
use thiserror::Error;

/// Failure of a whole `check_sat` or QuickXplain call.
///
/// Any error aborts the call; no partial verdict or core is produced.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Syntax error in formula {index}: {source}")]
    Parse { index: usize, source: ParseError },
    #[error("Encoding error in formula {index}: {source}")]
    Encoding { index: usize, source: EncodingError },
    #[error("Oracle error ({backend}): {message}")]
    Oracle {
        backend: &'static str,
        message: String,
    },
    #[error("Deadline of {timeout_secs}s exceeded before the analysis completed")]
    Timeout { timeout_secs: u64 },
}

impl EngineError {
    pub(crate) fn oracle(backend: &'static str, err: impl std::fmt::Display) -> Self {
        EngineError::Oracle {
            backend,
            message: err.to_string(),
        }
    }

    /// Index of the offending formula, for syntax and encoding errors.
    pub fn formula_index(&self) -> Option<usize> {
        match self {
            EngineError::Parse { index, .. } | EngineError::Encoding { index, .. } => Some(*index),
            EngineError::Oracle { .. } | EngineError::Timeout { .. } => None,
        }
    }

    /// The syntax error, when this is one; renders as a `miette` diagnostic.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            EngineError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
