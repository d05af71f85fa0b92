//! Error types.
//!
//! - `AnalysisError`: recoverable, per-computation failures raised by the
//!   numeric core. A batch caller catches these per galaxy and keeps going.
//! - `AppError`: what the binary reports (message + process exit code).

/// Failures of a single core computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A quantity that must be strictly positive (radius, velocity, transport
    /// coefficient, configuration value) was not.
    #[error("invalid domain: {quantity} = {value} at index {index} (must be finite and > 0)")]
    InvalidDomain {
        quantity: &'static str,
        index: usize,
        value: f64,
    },

    /// Fewer usable samples than the computation needs.
    #[error("insufficient data for {context}: need at least {required}, got {available}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        available: usize,
    },

    /// Bootstrap draws kept failing the fitter precondition.
    #[error(
        "resampling exhausted after {attempts} failed draws \
         ({completed} of {requested} resamples completed)"
    )]
    ResamplingExhausted {
        attempts: usize,
        completed: usize,
        requested: usize,
    },
}

impl AnalysisError {
    pub(crate) fn invalid(quantity: &'static str, index: usize, value: f64) -> Self {
        Self::InvalidDomain {
            quantity,
            index,
            value,
        }
    }

    pub(crate) fn insufficient(context: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            context,
            required,
            available,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let exit_code = match err {
            AnalysisError::InvalidDomain { .. } => 2,
            AnalysisError::InsufficientData { .. } => 3,
            AnalysisError::ResamplingExhausted { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_errors_map_to_exit_codes() {
        let e: AppError = AnalysisError::invalid("R", 0, -1.0).into();
        assert_eq!(e.exit_code(), 2);
        assert!(e.to_string().contains("R = -1"));

        let e: AppError = AnalysisError::insufficient("phase metric", 2, 1).into();
        assert_eq!(e.exit_code(), 3);

        let e: AppError = AnalysisError::ResamplingExhausted {
            attempts: 10,
            completed: 3,
            requested: 5,
        }
        .into();
        assert_eq!(e.exit_code(), 4);
    }
}
