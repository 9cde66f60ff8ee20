//! Carbonation tank simulation.
//!
//! Models a sparge-carbonated tank as a well-mixed liquid column with a gas
//! headspace. Bubbles injected at the base dissolve on their way up through
//! a Calderbank mass-transfer closure; an optional Fickian pathway lets the
//! headspace feed the liquid directly. Time marching is explicit Euler with
//! drivers for fixed-duration runs and run-until-saturation targets, plus
//! parameter sweeps over step size, bubble diameter, and temperature.
//!
//! ```
//! use cf_sim::{ModelOptions, SimOptions, Tank, TankSpec, run_for_duration};
//! use cf_core::units::PhysicalConstants;
//!
//! let spec = TankSpec::reference();
//! let mut tank = Tank::new(&spec, ModelOptions::default(), PhysicalConstants::default())?;
//! let record = run_for_duration(&mut tank, 60.0, &SimOptions::default())?;
//! assert!(record.last().dissolved_gas_mol > 0.0);
//! # Ok::<(), cf_sim::SimError>(())
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod sweep;
pub mod tank;

pub use config::{GasSpec, HeadFluxMode, HeadspaceMode, LiquidSpec, ModelOptions, TankSpec};
pub use driver::{
    DEFAULT_MAX_TIME_S, DEFAULT_TARGET_FRACTION, SimOptions, SimOutcome, SimRecord, Snapshot,
    run_for_duration, run_to_solubility,
};
pub use error::{SimError, SimResult};
pub use sweep::{
    SweepError, SweepOutcome, SweepPoints, SweepSpacing, bubble_diameter_sensitivity,
    temperature_sensitivity, time_step_sensitivity,
};
pub use tank::Tank;
