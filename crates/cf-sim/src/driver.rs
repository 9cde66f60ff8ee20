//! Time-marching drivers and run records.
//!
//! Two entry points share the same stepping core: `run_for_duration` marches
//! a fixed span of simulated time, `run_to_solubility` marches until the
//! liquid reaches a target fraction of the solubility limit or a wall-time
//! cap in simulated seconds is exceeded. Both sample the tank state on a
//! fixed cadence and always record the terminal state.

use crate::error::{SimError, SimResult};
use crate::tank::Tank;
use serde::{Deserialize, Serialize};

/// Stop marching toward a solubility target once this much simulated time
/// has elapsed.
pub const DEFAULT_MAX_TIME_S: f64 = 100_000.0;

/// Saturation fraction the solubility driver aims for by default.
pub const DEFAULT_TARGET_FRACTION: f64 = 0.99;

/// Stepping and sampling cadence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimOptions {
    /// Integration step.
    pub dt_s: f64,
    /// Interval between recorded snapshots.
    pub eval_time_s: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt_s: 0.01,
            eval_time_s: 10.0,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !self.dt_s.is_finite() || self.dt_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt_s must be positive and finite",
            });
        }
        if !self.eval_time_s.is_finite() || self.eval_time_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "eval_time_s must be positive and finite",
            });
        }
        Ok(())
    }

    /// Steps between recorded snapshots, at least one.
    fn record_every(&self) -> usize {
        ((self.eval_time_s / self.dt_s).round() as usize).max(1)
    }
}

/// One sampled state of the liquid inventory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub time_s: f64,
    pub dissolved_gas_mol: f64,
    pub concentration_mol_m3: f64,
    pub percent_solubility: f64,
}

impl Snapshot {
    fn capture(tank: &Tank, time_s: f64) -> Self {
        Self {
            time_s,
            dissolved_gas_mol: tank.dissolved_gas_mol,
            concentration_mol_m3: tank.concentration_mol_m3,
            percent_solubility: tank.percent_solubility,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SimOutcome {
    /// The requested duration was marched to the end.
    Completed,
    /// The solubility target was reached at `time_s`.
    Converged { time_s: f64 },
    /// The solubility target was not reached before the cap.
    MaxTimeExceeded { max_time_s: f64 },
}

impl SimOutcome {
    /// True unless the run hit the time cap short of its target.
    pub fn is_success(&self) -> bool {
        !matches!(self, SimOutcome::MaxTimeExceeded { .. })
    }
}

/// Timeseries plus termination status for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimRecord {
    pub snapshots: Vec<Snapshot>,
    pub outcome: SimOutcome,
}

impl SimRecord {
    /// The terminal sample. Every driver records at least one snapshot.
    pub fn last(&self) -> &Snapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }
}

/// March the tank over a fixed span of simulated time.
///
/// Snapshots are recorded at multiples of `eval_time_s`, starting with the
/// initial state, and the terminal state is always appended.
pub fn run_for_duration(
    tank: &mut Tank,
    total_time_s: f64,
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    opts.validate()?;
    if !total_time_s.is_finite() || total_time_s < 0.0 {
        return Err(SimError::InvalidArg {
            what: "total_time_s must be non-negative and finite",
        });
    }

    // The slack absorbs representation error in total/dt so exact multiples
    // do not gain a step.
    let steps = (((total_time_s / opts.dt_s) - 1e-9).ceil() as usize).max(1);
    let record_every = opts.record_every();

    let mut snapshots = Vec::with_capacity(steps / record_every + 2);
    for step in 0..steps {
        if step % record_every == 0 {
            snapshots.push(Snapshot::capture(tank, step as f64 * opts.dt_s));
        }
        tank.advance(opts.dt_s)?;
    }
    snapshots.push(Snapshot::capture(tank, steps as f64 * opts.dt_s));

    tracing::debug!(
        steps,
        final_percent = tank.percent_solubility,
        "fixed-duration run complete"
    );

    Ok(SimRecord {
        snapshots,
        outcome: SimOutcome::Completed,
    })
}

/// March the tank until the dissolved concentration reaches
/// `target_fraction` of the solubility limit.
///
/// Gives up once the simulated clock passes `max_time_s`; the record then
/// carries `SimOutcome::MaxTimeExceeded` and the timeseries up to the cap.
pub fn run_to_solubility(
    tank: &mut Tank,
    target_fraction: f64,
    max_time_s: f64,
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    opts.validate()?;
    if !target_fraction.is_finite() || target_fraction <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "target_fraction must be positive and finite",
        });
    }
    if !max_time_s.is_finite() || max_time_s <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "max_time_s must be positive and finite",
        });
    }

    let record_every = opts.record_every();
    let mut snapshots = Vec::new();
    let mut step: usize = 0;

    while tank.percent_solubility < target_fraction {
        if step % record_every == 0 {
            snapshots.push(Snapshot::capture(tank, step as f64 * opts.dt_s));
        }
        tank.advance(opts.dt_s)?;
        step += 1;

        if step as f64 * opts.dt_s > max_time_s {
            tracing::warn!(
                target_fraction,
                max_time_s,
                percent_solubility = tank.percent_solubility,
                "solubility target not reached before the time cap"
            );
            snapshots.push(Snapshot::capture(tank, step as f64 * opts.dt_s));
            return Ok(SimRecord {
                snapshots,
                outcome: SimOutcome::MaxTimeExceeded { max_time_s },
            });
        }
    }

    let time_s = step as f64 * opts.dt_s;
    snapshots.push(Snapshot::capture(tank, time_s));

    tracing::debug!(time_s, target_fraction, "solubility target reached");

    Ok(SimRecord {
        snapshots,
        outcome: SimOutcome::Converged { time_s },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelOptions, TankSpec};
    use cf_core::units::PhysicalConstants;

    fn reference_tank() -> Tank {
        Tank::new(
            &TankSpec::reference(),
            ModelOptions::default(),
            PhysicalConstants::default(),
        )
        .unwrap()
    }

    #[test]
    fn snapshot_cadence_is_exact() {
        let mut tank = reference_tank();
        let opts = SimOptions {
            dt_s: 0.1,
            eval_time_s: 10.0,
        };
        let record = run_for_duration(&mut tank, 50.0, &opts).unwrap();

        // Samples at t = 0, 10, 20, 30, 40 plus the terminal state.
        assert_eq!(record.snapshots.len(), 6);
        assert!((record.last().time_s - 50.0).abs() < 1e-9);
        assert_eq!(record.outcome, SimOutcome::Completed);
    }

    #[test]
    fn short_run_records_initial_and_final() {
        let mut tank = reference_tank();
        let opts = SimOptions::default();
        let record = run_for_duration(&mut tank, 0.005, &opts).unwrap();

        // Shorter than one step still advances once.
        assert_eq!(record.snapshots.len(), 2);
        assert!((record.last().time_s - 0.01).abs() < 1e-12);
    }

    #[test]
    fn duration_run_monotone_in_time_and_gas() {
        let mut tank = reference_tank();
        let opts = SimOptions {
            dt_s: 0.01,
            eval_time_s: 1.0,
        };
        let record = run_for_duration(&mut tank, 20.0, &opts).unwrap();

        for pair in record.snapshots.windows(2) {
            assert!(pair[1].time_s > pair[0].time_s);
            assert!(pair[1].dissolved_gas_mol >= pair[0].dissolved_gas_mol);
        }
    }

    #[test]
    fn solubility_run_converges_for_modest_target() {
        let mut tank = reference_tank();
        let opts = SimOptions {
            dt_s: 0.1,
            eval_time_s: 50.0,
        };
        let record = run_to_solubility(&mut tank, 0.5, DEFAULT_MAX_TIME_S, &opts).unwrap();

        match record.outcome {
            SimOutcome::Converged { time_s } => assert!(time_s > 0.0),
            other => panic!("expected convergence, got {other:?}"),
        }
        assert!(record.last().percent_solubility >= 0.5);
        assert!(record.outcome.is_success());
    }

    #[test]
    fn unreachable_target_reports_max_time() {
        let mut tank = reference_tank();
        let opts = SimOptions {
            dt_s: 0.5,
            eval_time_s: 100.0,
        };
        // The frozen headspace caps percent_solubility near 1.0, so 1.5 can
        // never be reached.
        let record = run_to_solubility(&mut tank, 1.5, 500.0, &opts).unwrap();

        assert_eq!(
            record.outcome,
            SimOutcome::MaxTimeExceeded { max_time_s: 500.0 }
        );
        assert!(!record.outcome.is_success());
        assert!(record.last().percent_solubility < 1.5);
    }

    #[test]
    fn invalid_options_rejected() {
        let mut tank = reference_tank();
        let bad_dt = SimOptions {
            dt_s: 0.0,
            eval_time_s: 10.0,
        };
        assert!(run_for_duration(&mut tank, 10.0, &bad_dt).is_err());

        let bad_eval = SimOptions {
            dt_s: 0.01,
            eval_time_s: -1.0,
        };
        assert!(run_for_duration(&mut tank, 10.0, &bad_eval).is_err());

        let opts = SimOptions::default();
        assert!(run_for_duration(&mut tank, -1.0, &opts).is_err());
        assert!(run_to_solubility(&mut tank, 0.0, 100.0, &opts).is_err());
        assert!(run_to_solubility(&mut tank, 0.99, 0.0, &opts).is_err());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = SimOutcome::MaxTimeExceeded { max_time_s: 500.0 };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"type\":\"MaxTimeExceeded\""), "{json}");
    }
}
