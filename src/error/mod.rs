use thiserror::Error;

use crate::drug::LibraryError;
use crate::settings::SettingsError;

#[derive(Error, Debug)]
pub enum DosingError {
    /// An argument that must be strictly positive (or otherwise well formed) was not
    #[error("Invalid input: {param} = {value}")]
    InvalidInput { param: String, value: String },

    /// A model quantity reduced to zero, infinity or NaN during simulation
    #[error("Numerical error: {reason}")]
    NumericalError { reason: String },

    #[error(transparent)]
    Solver(#[from] diffsol::error::DiffsolError),

    #[error("Error in the drug library: {0}")]
    Library(#[from] LibraryError),

    #[error("Error in the engine settings: {0}")]
    Settings(#[from] SettingsError),
}

impl DosingError {
    pub(crate) fn invalid(param: &str, value: impl ToString) -> Self {
        DosingError::InvalidInput {
            param: param.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn numerical(reason: impl Into<String>) -> Self {
        DosingError::NumericalError {
            reason: reason.into(),
        }
    }

    /// `true` for errors caused by the caller's arguments rather than the model or configuration
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DosingError::InvalidInput { .. })
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self, DosingError::NumericalError { .. })
    }
}
