//! Error types for tank simulation.

use thiserror::Error;

/// Errors encountered during tank construction or time stepping.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Liquid overflow: column height {liquid_height_m} m >= tank height {tank_height_m} m")]
    LiquidOverflow {
        liquid_height_m: f64,
        tank_height_m: f64,
    },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<cf_fluids::FluidError> for SimError {
    fn from(e: cf_fluids::FluidError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<cf_core::error::CfError> for SimError {
    fn from(e: cf_core::error::CfError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
