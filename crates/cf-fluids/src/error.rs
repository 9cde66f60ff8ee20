//! Fluid property errors.

use cf_core::CfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Degenerate equation-of-state input (vanishing denominator,
    /// non-finite molar volume).
    #[error("Degenerate state: {what}")]
    Degenerate { what: &'static str },
}

impl From<FluidError> for CfError {
    fn from(err: FluidError) -> Self {
        // Convert to CfError while preserving context
        match err {
            FluidError::NonPhysical { what } => CfError::Invariant {
                what: Box::leak(format!("Non-physical fluid value: {}", what).into_boxed_str()),
            },
            FluidError::InvalidArg { what } => CfError::InvalidArg {
                what: Box::leak(format!("Invalid fluid argument: {}", what).into_boxed_str()),
            },
            FluidError::Degenerate { what } => CfError::Invariant {
                what: Box::leak(format!("Degenerate fluid state: {}", what).into_boxed_str()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = FluidError::Degenerate {
            what: "molar volume",
        };
        assert!(err.to_string().contains("molar volume"));
    }

    #[test]
    fn error_to_cf_error() {
        let fluid_err = FluidError::Degenerate { what: "B - V" };
        let cf_err: CfError = fluid_err.into();
        assert!(matches!(cf_err, CfError::Invariant { .. }));
    }
}
