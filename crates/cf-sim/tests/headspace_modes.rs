//! Model-variant behavior across headspace and head-flux switches.

use cf_core::units::PhysicalConstants;
use cf_sim::{
    HeadFluxMode, HeadspaceMode, ModelOptions, SimOptions, Tank, TankSpec, run_for_duration,
};

fn tank_with(options: ModelOptions, vent_pressure_bar: Option<f64>) -> Tank {
    let mut spec = TankSpec::reference();
    spec.vent_pressure_bar = vent_pressure_bar;
    Tank::new(&spec, options, PhysicalConstants::default()).unwrap()
}

#[test]
fn frozen_headspace_holds_pressure_and_solubility() {
    let mut tank = tank_with(ModelOptions::default(), None);
    let initial_pressure = tank.head_pressure_bar;
    let initial_solubility = tank.solubility_mol_m3;
    let initial_holdup = tank.gas_holdup_mol;

    let opts = SimOptions {
        dt_s: 0.1,
        eval_time_s: 60.0,
    };
    run_for_duration(&mut tank, 600.0, &opts).unwrap();

    assert_eq!(tank.head_pressure_bar, initial_pressure);
    assert_eq!(tank.solubility_mol_m3, initial_solubility);
    assert_eq!(tank.gas_holdup_mol, initial_holdup);
}

#[test]
fn dynamic_headspace_requires_vent_pressure() {
    let spec = TankSpec::reference();
    let options = ModelOptions {
        headspace: HeadspaceMode::Dynamic,
        head_flux: HeadFluxMode::Disabled,
    };
    assert!(Tank::new(&spec, options, PhysicalConstants::default()).is_err());
}

#[test]
fn dynamic_headspace_pressure_rises_toward_the_vent_limit() {
    let options = ModelOptions {
        headspace: HeadspaceMode::Dynamic,
        head_flux: HeadFluxMode::Disabled,
    };
    let mut tank = tank_with(options, Some(6.0));
    let max_holdup = tank.max_gas_holdup_mol().unwrap();

    let opts = SimOptions {
        dt_s: 0.1,
        eval_time_s: 100.0,
    };
    // Long enough for the liquid to approach saturation, after which the
    // sparge surplus accumulates in the headspace.
    run_for_duration(&mut tank, 3_000.0, &opts).unwrap();

    assert!(tank.head_pressure_bar > 5.0, "{}", tank.head_pressure_bar);
    assert!(
        tank.head_pressure_bar <= 6.0 + 1e-9,
        "{}",
        tank.head_pressure_bar
    );
    assert!(tank.gas_holdup_mol <= max_holdup + 1e-12);
    // The solubility limit tracks the live head pressure.
    assert!(
        (tank.solubility_mol_m3 - tank.head_pressure_bar * 34.0).abs() < 1e-9,
        "solubility {} at {} bar",
        tank.solubility_mol_m3,
        tank.head_pressure_bar
    );
}

#[test]
fn dynamic_headspace_holdup_stays_in_bounds_throughout() {
    let options = ModelOptions {
        headspace: HeadspaceMode::Dynamic,
        head_flux: HeadFluxMode::Fickian,
    };
    let mut tank = tank_with(options, Some(6.0));
    let max_holdup = tank.max_gas_holdup_mol().unwrap();

    for _ in 0..5_000 {
        tank.advance(0.1).unwrap();
        assert!(tank.gas_holdup_mol >= 0.0);
        assert!(tank.gas_holdup_mol <= max_holdup + 1e-12);
        assert!(tank.head_pressure_bar.is_finite());
    }
}

#[test]
fn fickian_head_flux_speeds_up_dissolution() {
    let baseline_options = ModelOptions::default();
    let fickian_options = ModelOptions {
        headspace: HeadspaceMode::Frozen,
        head_flux: HeadFluxMode::Fickian,
    };
    let mut baseline = tank_with(baseline_options, None);
    let mut with_head_flux = tank_with(fickian_options, None);

    let opts = SimOptions {
        dt_s: 0.1,
        eval_time_s: 60.0,
    };
    let a = run_for_duration(&mut baseline, 600.0, &opts).unwrap();
    let b = run_for_duration(&mut with_head_flux, 600.0, &opts).unwrap();

    assert!(
        b.last().dissolved_gas_mol > a.last().dissolved_gas_mol,
        "fickian {} vs baseline {}",
        b.last().dissolved_gas_mol,
        a.last().dissolved_gas_mol
    );
}

#[test]
fn frozen_tank_ignores_vent_pressure() {
    let opts = SimOptions {
        dt_s: 0.1,
        eval_time_s: 60.0,
    };
    let mut plain = tank_with(ModelOptions::default(), None);
    let mut vented = tank_with(ModelOptions::default(), Some(6.0));

    let a = run_for_duration(&mut plain, 120.0, &opts).unwrap();
    let b = run_for_duration(&mut vented, 120.0, &opts).unwrap();
    assert_eq!(a, b);
}
