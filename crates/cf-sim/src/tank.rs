//! Lumped tank state model with bubble and headspace dissolution pathways.

use crate::config::{HeadFluxMode, HeadspaceMode, ModelOptions, TankSpec};
use crate::error::{SimError, SimResult};
use cf_core::units::PhysicalConstants;
use cf_fluids::{EosModel, Gas, Liquid, VirialEos};
use tracing::debug;

/// Headspace bookkeeping, resolved at construction from [`HeadspaceMode`].
#[derive(Clone, Copy, Debug)]
enum HeadspaceState {
    Frozen,
    Dynamic { max_gas_holdup_mol: f64 },
}

/// The central mutable entity: owns all dynamic state and exposes one
/// mutating operation, [`Tank::advance`].
///
/// Static quantities (geometry, solubility limit, bubble population) are
/// derived eagerly at construction under the steady-bubbling assumption;
/// the bubbler's replenishment rate is deliberately decoupled from
/// dissolution depletion.
#[derive(Clone, Debug)]
pub struct Tank {
    /// Solvent liquid properties
    pub liquid: Liquid,
    /// Sparged gas properties
    pub gas: Gas,

    // Static geometry
    /// Cross-sectional area [m²]
    pub area_m2: f64,
    /// Tank height [m]
    pub height_m: f64,
    /// Temperature [K], held constant for the run
    pub temperature_k: f64,
    /// Liquid holdup [mol]
    pub liquid_holdup_mol: f64,
    /// Liquid volume [m³], holdup / molar density
    pub liquid_volume_m3: f64,
    /// Liquid column height [m], volume / area
    pub liquid_height_m: f64,
    /// Headspace volume [m³]
    pub head_volume_m3: f64,

    // Static gas-phase parameters
    /// Target headspace pressure [bar]
    pub gas_pressure_bar: f64,
    /// Molar bubbler injection rate [mol/s]
    pub bubbler_flow_mol_s: f64,
    /// Bubble residence time in the liquid column [s]
    pub residence_time_s: f64,
    /// Steady free-gas inventory carried by the bubble swarm [mol]
    pub free_gas_mol: f64,
    /// Bubble count in the swarm
    pub num_bubbles: f64,
    /// Total bubble surface area [m²]
    pub total_bubble_surface_m2: f64,

    // Dynamic state
    /// Cumulative dissolved gas [mol], monotone non-decreasing
    pub dissolved_gas_mol: f64,
    /// Liquid-phase concentration [mol/m³]
    pub concentration_mol_m3: f64,
    /// Concentration / solubility limit, unclamped diagnostic fraction
    pub percent_solubility: f64,
    /// Current head pressure [bar]; fixed in frozen mode
    pub head_pressure_bar: f64,
    /// Headspace gas holdup [mol]; fixed in frozen mode
    pub gas_holdup_mol: f64,
    /// Henry-law solubility limit [mol/m³] at the current head pressure
    pub solubility_mol_m3: f64,

    headspace: HeadspaceState,
    head_flux_mode: HeadFluxMode,
    constants: PhysicalConstants,
    eos: VirialEos,
}

impl Tank {
    /// Construct a tank from a spec, computing all derived static
    /// quantities eagerly.
    ///
    /// Fails with [`SimError::LiquidOverflow`] when the liquid column
    /// would reach the tank top, and with [`SimError::InvalidArg`] when
    /// dynamic headspace tracking is requested without a vent pressure.
    pub fn new(
        spec: &TankSpec,
        options: ModelOptions,
        constants: PhysicalConstants,
    ) -> SimResult<Self> {
        options.validate(spec)?;

        for (value, what) in [
            (spec.area_m2, "area_m2 must be positive and finite"),
            (spec.height_m, "height_m must be positive and finite"),
            (
                spec.temperature_k,
                "temperature_k must be positive and finite",
            ),
            (
                spec.liquid_holdup_mol,
                "liquid_holdup_mol must be positive and finite",
            ),
            (
                spec.gas_pressure_bar,
                "gas_pressure_bar must be positive and finite",
            ),
            (
                spec.bubbler_pressure_bar,
                "bubbler_pressure_bar must be positive and finite",
            ),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidArg { what });
            }
        }
        if !spec.bubbler_flow_m3_s.is_finite() || spec.bubbler_flow_m3_s < 0.0 {
            return Err(SimError::InvalidArg {
                what: "bubbler_flow_m3_s must be non-negative and finite",
            });
        }

        let liquid = spec.liquid.build()?;
        let gas = spec.gas.build()?;
        let eos = VirialEos::with_gas_constant(constants.gas_constant_m3_bar_per_mol_k);

        let liquid_volume_m3 = spec.liquid_holdup_mol / liquid.density_mol_m3;
        let liquid_height_m = liquid_volume_m3 / spec.area_m2;
        if liquid_height_m >= spec.height_m {
            return Err(SimError::LiquidOverflow {
                liquid_height_m,
                tank_height_m: spec.height_m,
            });
        }
        let head_volume_m3 = (spec.height_m - liquid_height_m) * spec.area_m2;

        let gas_holdup_mol = eos.moles_of_gas(
            &gas,
            head_volume_m3,
            spec.gas_pressure_bar,
            spec.temperature_k,
        )?;
        let solubility_mol_m3 = spec.gas_pressure_bar * constants.henry_mol_per_m3_bar;

        let bubbler_flow_mol_s = eos.moles_of_gas(
            &gas,
            spec.bubbler_flow_m3_s,
            spec.bubbler_pressure_bar,
            spec.temperature_k,
        )?;
        let residence_time_s = liquid_height_m / constants.bubble_rise_m_per_s;
        let free_gas_mol = bubbler_flow_mol_s * residence_time_s;
        let num_bubbles = eos.volume_of_gas(
            &gas,
            free_gas_mol,
            spec.gas_pressure_bar,
            spec.temperature_k,
        )? / gas.bubble_volume_m3;
        let total_bubble_surface_m2 = num_bubbles * gas.bubble_surface_m2;

        let headspace = match options.headspace {
            HeadspaceMode::Frozen => HeadspaceState::Frozen,
            HeadspaceMode::Dynamic => {
                // validate() guarantees the vent pressure is present
                let vent_pressure_bar = spec.vent_pressure_bar.ok_or(SimError::InvalidArg {
                    what: "dynamic headspace tracking requires vent_pressure_bar",
                })?;
                if !vent_pressure_bar.is_finite() || vent_pressure_bar <= 0.0 {
                    return Err(SimError::InvalidArg {
                        what: "vent_pressure_bar must be positive and finite",
                    });
                }
                let max_gas_holdup_mol = eos.moles_of_gas(
                    &gas,
                    head_volume_m3,
                    vent_pressure_bar,
                    spec.temperature_k,
                )?;
                HeadspaceState::Dynamic { max_gas_holdup_mol }
            }
        };

        debug!(
            liquid_volume_m3,
            liquid_height_m,
            head_volume_m3,
            solubility_mol_m3,
            bubbler_flow_mol_s,
            num_bubbles,
            "tank constructed"
        );

        Ok(Self {
            liquid,
            gas,
            area_m2: spec.area_m2,
            height_m: spec.height_m,
            temperature_k: spec.temperature_k,
            liquid_holdup_mol: spec.liquid_holdup_mol,
            liquid_volume_m3,
            liquid_height_m,
            head_volume_m3,
            gas_pressure_bar: spec.gas_pressure_bar,
            bubbler_flow_mol_s,
            residence_time_s,
            free_gas_mol,
            num_bubbles,
            total_bubble_surface_m2,
            dissolved_gas_mol: 0.0,
            concentration_mol_m3: 0.0,
            percent_solubility: 0.0,
            head_pressure_bar: spec.gas_pressure_bar,
            gas_holdup_mol,
            solubility_mol_m3,
            headspace,
            head_flux_mode: options.head_flux,
            constants,
            eos,
        })
    }

    /// Vent-limited headspace capacity, when tracked dynamically.
    pub fn max_gas_holdup_mol(&self) -> Option<f64> {
        match self.headspace {
            HeadspaceState::Frozen => None,
            HeadspaceState::Dynamic { max_gas_holdup_mol } => Some(max_gas_holdup_mol),
        }
    }

    /// Headspace-to-liquid diffusive flux [mol/(m²·s)], clamped at zero.
    fn head_flux(&self) -> f64 {
        match self.head_flux_mode {
            HeadFluxMode::Disabled => 0.0,
            HeadFluxMode::Fickian => {
                let delta_c = self.solubility_mol_m3 - self.concentration_mol_m3;
                let delta_z = (self.liquid_height_m / 2.0).abs();
                (self.constants.diffusivity_m2_per_s * delta_c / delta_z).max(0.0)
            }
        }
    }

    /// Bubble-to-liquid flux [mol/(m²·s)] from the rigid-sphere
    /// small-bubble correlation, clamped at zero.
    ///
    /// k'_L = 2·Dab/d + 0.31·Sc^(-2/3)·(Δρ·μ·g/ρ²)^(1/3)
    fn bubble_flux(&self) -> f64 {
        if self.free_gas_mol <= 0.0 || self.num_bubbles <= 0.0 {
            // no swarm, no transfer; avoids 0/0 in the gas density term
            return 0.0;
        }
        let dab = self.constants.diffusivity_m2_per_s;
        let rho_l = self.liquid.mass_density_kg_m3();
        let sc = self.liquid.viscosity_pa_s / rho_l / dab;
        let rho_g = (self.free_gas_mol * self.gas.molar_mass_g_mol / 1000.0 / self.num_bubbles)
            / self.gas.bubble_volume_m3;
        let delta_rho = (rho_g - rho_l).abs();
        let kl = 2.0 * dab / self.gas.bubble_diameter_m
            + 0.31
                * sc.powf(-2.0 / 3.0)
                * (delta_rho * self.liquid.viscosity_pa_s * self.constants.gravity_m_per_s2
                    / rho_l.powi(2))
                .powf(1.0 / 3.0);
        (kl * (self.solubility_mol_m3 - self.concentration_mol_m3)).max(0.0)
    }

    /// Advance the tank state by `dt_s` seconds.
    ///
    /// Bubbles cannot release more gas than the swarm carries in a step,
    /// and dissolution never reverses (fluxes are clamped at zero), so the
    /// dissolved inventory is monotone non-decreasing.
    pub fn advance(&mut self, dt_s: f64) -> SimResult<()> {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt_s must be positive and finite",
            });
        }

        let flow_from_head = self.head_flux() * self.area_m2 * dt_s;
        let flow_from_bubbles = self
            .free_gas_mol
            .min(self.bubble_flux() * self.total_bubble_surface_m2 * dt_s);

        self.dissolved_gas_mol += flow_from_head + flow_from_bubbles;

        if let HeadspaceState::Dynamic { max_gas_holdup_mol } = self.headspace {
            // bubble gas not dissolved this step rises into the headspace
            let leftover = (self.bubbler_flow_mol_s * dt_s - flow_from_bubbles).max(0.0);
            self.gas_holdup_mol =
                (self.gas_holdup_mol - flow_from_head + leftover).clamp(0.0, max_gas_holdup_mol);
            let molar_volume = self.head_volume_m3 / self.gas_holdup_mol;
            self.head_pressure_bar =
                self.eos
                    .pressure_from_molar_volume(&self.gas, self.temperature_k, molar_volume)?;
            self.solubility_mol_m3 =
                self.head_pressure_bar * self.constants.henry_mol_per_m3_bar;
        }

        self.concentration_mol_m3 = self.dissolved_gas_mol / self.liquid_volume_m3;
        self.percent_solubility = self.concentration_mol_m3 / self.solubility_mol_m3;
        Ok(())
    }
}
