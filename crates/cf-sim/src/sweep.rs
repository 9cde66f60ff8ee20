//! Parameter sweeps over tank scenarios.
//!
//! Each executor re-derives a fresh tank per point from a mutated copy of
//! the base `TankSpec`, runs the relevant driver, and collects one summary
//! sample per point. Failed points are kept as `None` so a partially
//! successful sweep still reports the points that worked.

use crate::config::{ModelOptions, TankSpec};
use crate::driver::{self, SimOptions, SimOutcome};
use crate::tank::Tank;
use cf_core::units::PhysicalConstants;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by sweep configuration or execution.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid sweep configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error("No successful points in sweep over {what}")]
    NoSuccessfulPoints { what: &'static str },
}

impl From<SweepError> for crate::error::SimError {
    fn from(e: SweepError) -> Self {
        crate::error::SimError::Backend {
            message: e.to_string(),
        }
    }
}

/// Spacing rule for generated sweep points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepSpacing {
    #[default]
    Linear,
    Logarithmic,
}

/// A closed range of sweep points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepPoints {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    #[serde(default)]
    pub spacing: SweepSpacing,
}

impl SweepPoints {
    /// Materialize the points. Endpoints are hit exactly.
    pub fn generate(&self) -> Result<Vec<f64>, SweepError> {
        if self.num_points < 2 {
            return Err(SweepError::InvalidConfiguration {
                what: "num_points must be at least 2",
            });
        }
        if !self.start.is_finite() || !self.end.is_finite() || self.start >= self.end {
            return Err(SweepError::InvalidConfiguration {
                what: "start must be finite and less than end",
            });
        }
        if self.spacing == SweepSpacing::Logarithmic && self.start <= 0.0 {
            return Err(SweepError::InvalidConfiguration {
                what: "logarithmic spacing requires a positive start",
            });
        }

        let n = self.num_points;
        let mut points = Vec::with_capacity(n);
        match self.spacing {
            SweepSpacing::Linear => {
                let step = (self.end - self.start) / (n - 1) as f64;
                for i in 0..n {
                    points.push(self.start + i as f64 * step);
                }
            }
            SweepSpacing::Logarithmic => {
                let log_start = self.start.ln();
                let step = (self.end.ln() - log_start) / (n - 1) as f64;
                for i in 0..n {
                    points.push((log_start + i as f64 * step).exp());
                }
            }
        }
        points[0] = self.start;
        points[n - 1] = self.end;
        Ok(points)
    }
}

/// Collected samples for one sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepOutcome {
    /// Swept parameter values.
    pub points: Vec<f64>,
    /// One summary sample per point, `None` where the point failed.
    pub samples: Vec<Option<f64>>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl SweepOutcome {
    fn collect(
        what: &'static str,
        points: Vec<f64>,
        samples: Vec<Option<f64>>,
    ) -> Result<Self, SweepError> {
        let num_successful = samples.iter().filter(|s| s.is_some()).count();
        let num_failed = samples.len() - num_successful;
        if num_successful == 0 {
            return Err(SweepError::NoSuccessfulPoints { what });
        }
        tracing::info!(what, num_successful, num_failed, "sweep complete");
        Ok(Self {
            points,
            samples,
            num_successful,
            num_failed,
        })
    }
}

fn time_to_target(
    spec: &TankSpec,
    options: ModelOptions,
    target_fraction: f64,
    max_time_s: f64,
    opts: &SimOptions,
) -> Option<f64> {
    let mut tank = Tank::new(spec, options, PhysicalConstants::default()).ok()?;
    let record = driver::run_to_solubility(&mut tank, target_fraction, max_time_s, opts).ok()?;
    match record.outcome {
        SimOutcome::Converged { time_s } => Some(time_s),
        _ => None,
    }
}

/// Sweep the integration step and sample the converged time per step.
///
/// Points where the run fails or hits the time cap come back as `None`.
pub fn time_step_sensitivity(
    spec: &TankSpec,
    options: ModelOptions,
    steps: &SweepPoints,
    target_fraction: f64,
    max_time_s: f64,
    eval_time_s: f64,
) -> Result<SweepOutcome, SweepError> {
    let points = steps.generate()?;
    let samples = points
        .iter()
        .map(|&dt_s| {
            let opts = SimOptions { dt_s, eval_time_s };
            time_to_target(spec, options, target_fraction, max_time_s, &opts)
        })
        .collect();
    SweepOutcome::collect("time step", points, samples)
}

/// Sweep the sparge bubble diameter and sample the saturation fraction
/// reached after a fixed duration.
pub fn bubble_diameter_sensitivity(
    spec: &TankSpec,
    options: ModelOptions,
    diameters: &SweepPoints,
    total_time_s: f64,
    opts: &SimOptions,
) -> Result<SweepOutcome, SweepError> {
    let points = diameters.generate()?;
    let samples = points
        .iter()
        .map(|&d_m| {
            let mut point_spec = spec.clone();
            point_spec.gas.bubble_diameter_m = d_m;
            let mut tank = Tank::new(&point_spec, options, PhysicalConstants::default()).ok()?;
            let record = driver::run_for_duration(&mut tank, total_time_s, opts).ok()?;
            Some(record.last().percent_solubility)
        })
        .collect();
    SweepOutcome::collect("bubble diameter", points, samples)
}

/// Sweep the operating temperature and sample the time to the saturation
/// target per point.
pub fn temperature_sensitivity(
    spec: &TankSpec,
    options: ModelOptions,
    temperatures: &SweepPoints,
    target_fraction: f64,
    max_time_s: f64,
    opts: &SimOptions,
) -> Result<SweepOutcome, SweepError> {
    let points = temperatures.generate()?;
    let samples = points
        .iter()
        .map(|&t_k| {
            let mut point_spec = spec.clone();
            point_spec.temperature_k = t_k;
            time_to_target(&point_spec, options, target_fraction, max_time_s, opts)
        })
        .collect();
    SweepOutcome::collect("temperature", points, samples)
}
