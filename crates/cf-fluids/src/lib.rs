//! cf-fluids: fluid property calculations for carbflow.
//!
//! Provides:
//! - Immutable liquid and gas value objects
//! - EosModel trait for gas-phase property calculations
//! - VirialEos backend (Pitzer second-virial correlation)
//! - Reference fluids for the canonical carbonation scenario
//!
//! # Architecture
//!
//! This crate defines a stable API (`EosModel` trait) that isolates the rest
//! of carbflow from the property backend. Currently the truncated virial
//! correlation is the only backend, but the architecture allows for future
//! additions such as cubic equations of state or tabulated property sources.
//!
//! # Example
//!
//! ```
//! use cf_fluids::{EosModel, Gas, VirialEos};
//! use cf_core::units::{bar, gpmol, k, m};
//!
//! let co2 = Gas::new(k(304.21), bar(73.83), 0.224, gpmol(44.01), m(5e-4)).unwrap();
//! let eos = VirialEos::new();
//! let z = eos.compressibility_factor(&co2, 277.59, 5.0).unwrap();
//! assert!(z < 1.0);
//! ```

pub mod catalog;
pub mod eos;
pub mod error;
pub mod gas;
pub mod liquid;

// Re-exports for ergonomics
pub use catalog::{reference_beer, reference_co2, reference_co2_with_bubble_diameter};
pub use eos::{EosModel, VirialEos};
pub use error::{FluidError, FluidResult};
pub use gas::Gas;
pub use liquid::Liquid;
