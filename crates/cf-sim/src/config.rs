//! Tank configuration records and model-variant switches.
//!
//! `TankSpec` is the canonical serialized form of a simulation setup; it can
//! be written by hand, loaded from YAML, or produced programmatically by the
//! sweep executors. Fluid sub-records are rebuilt into validated value
//! objects through the uom constructor seam.

use crate::error::{SimError, SimResult};
use cf_core::units::{bar, gpmol, k, m, molpm3, pas};
use cf_fluids::{FluidResult, Gas, Liquid};
use serde::{Deserialize, Serialize};

/// Serialized liquid properties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LiquidSpec {
    pub density_mol_m3: f64,
    pub viscosity_pa_s: f64,
    pub molar_mass_g_mol: f64,
}

impl LiquidSpec {
    /// Build the validated value object.
    pub fn build(&self) -> FluidResult<Liquid> {
        Liquid::new(
            molpm3(self.density_mol_m3),
            pas(self.viscosity_pa_s),
            gpmol(self.molar_mass_g_mol),
        )
    }
}

/// Serialized gas properties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GasSpec {
    pub tc_k: f64,
    pub pc_bar: f64,
    pub acentric: f64,
    pub molar_mass_g_mol: f64,
    pub bubble_diameter_m: f64,
}

impl GasSpec {
    /// Build the validated value object.
    pub fn build(&self) -> FluidResult<Gas> {
        Gas::new(
            k(self.tc_k),
            bar(self.pc_bar),
            self.acentric,
            gpmol(self.molar_mass_g_mol),
            m(self.bubble_diameter_m),
        )
    }
}

/// Full tank configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankSpec {
    pub area_m2: f64,
    pub height_m: f64,
    pub temperature_k: f64,
    pub liquid: LiquidSpec,
    pub gas: GasSpec,
    pub liquid_holdup_mol: f64,
    pub gas_pressure_bar: f64,
    pub bubbler_flow_m3_s: f64,
    pub bubbler_pressure_bar: f64,
    /// Vent relief pressure; required when the headspace is tracked
    /// dynamically, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vent_pressure_bar: Option<f64>,
}

impl TankSpec {
    /// The canonical cellar-tank carbonation scenario: flat beer at 4.4 °C,
    /// 5 bar CO₂ head, 0.5 mm sparge bubbles.
    pub fn reference() -> Self {
        Self {
            area_m2: 0.043355,
            height_m: 0.59055,
            temperature_k: 277.59,
            liquid: LiquidSpec {
                density_mol_m3: 54.788e3,
                viscosity_pa_s: 0.001691,
                molar_mass_g_mol: 19.122,
            },
            gas: GasSpec {
                tc_k: 304.21,
                pc_bar: 73.83,
                acentric: 0.224,
                molar_mass_g_mol: 44.01,
                bubble_diameter_m: 5e-4,
            },
            liquid_holdup_mol: 1036.866,
            gas_pressure_bar: 5.0,
            bubbler_flow_m3_s: 1.67e-5,
            bubbler_pressure_bar: 2.7,
            vent_pressure_bar: None,
        }
    }

    /// Load a spec from a YAML file.
    pub fn load_yaml(path: &std::path::Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: TankSpec = serde_yaml::from_str(&content)?;
        Ok(spec)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Headspace tracking variant.
///
/// `Frozen` holds the head pressure and solubility limit at the target gas
/// pressure for the whole run. `Dynamic` integrates the headspace holdup,
/// re-derives head pressure through the EOS each step, and lets the
/// solubility limit follow it; the holdup is clamped into
/// [0, vent-limited capacity].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadspaceMode {
    #[default]
    Frozen,
    Dynamic,
}

/// Headspace-to-liquid diffusion variant.
///
/// `Disabled` zeroes the pathway. `Fickian` computes a diffusive flux over
/// half the liquid column height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadFluxMode {
    #[default]
    Disabled,
    Fickian,
}

/// Model-variant switches; one update algorithm, parameterized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    #[serde(default)]
    pub headspace: HeadspaceMode,
    #[serde(default)]
    pub head_flux: HeadFluxMode,
}

impl ModelOptions {
    /// Validate the combination against a spec.
    pub fn validate(&self, spec: &TankSpec) -> SimResult<()> {
        if self.headspace == HeadspaceMode::Dynamic && spec.vent_pressure_bar.is_none() {
            return Err(SimError::InvalidArg {
                what: "dynamic headspace tracking requires vent_pressure_bar",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_spec_builds_fluids() {
        let spec = TankSpec::reference();
        let liquid = spec.liquid.build().unwrap();
        let gas = spec.gas.build().unwrap();
        assert!((liquid.density_mol_m3 - 54.788e3).abs() < 1e-9);
        assert!((gas.pc_bar - 73.83).abs() < 1e-9);
    }

    #[test]
    fn yaml_round_trip() {
        let spec = TankSpec::reference();
        let text = spec.to_yaml().unwrap();
        let back: TankSpec = serde_yaml::from_str(&text).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn yaml_without_vent_pressure_parses() {
        let text = "\
area_m2: 0.043355
height_m: 0.59055
temperature_k: 277.59
liquid:
  density_mol_m3: 54788.0
  viscosity_pa_s: 0.001691
  molar_mass_g_mol: 19.122
gas:
  tc_k: 304.21
  pc_bar: 73.83
  acentric: 0.224
  molar_mass_g_mol: 44.01
  bubble_diameter_m: 0.0005
liquid_holdup_mol: 1036.866
gas_pressure_bar: 5.0
bubbler_flow_m3_s: 1.67e-5
bubbler_pressure_bar: 2.7
";
        let spec: TankSpec = serde_yaml::from_str(text).unwrap();
        assert_eq!(spec.vent_pressure_bar, None);
        assert!((spec.bubbler_flow_m3_s - 1.67e-5).abs() < 1e-20);
    }

    #[test]
    fn dynamic_mode_requires_vent_pressure() {
        let spec = TankSpec::reference();
        let options = ModelOptions {
            headspace: HeadspaceMode::Dynamic,
            head_flux: HeadFluxMode::Disabled,
        };
        assert!(options.validate(&spec).is_err());

        let mut vented = spec;
        vented.vent_pressure_bar = Some(6.0);
        assert!(options.validate(&vented).is_ok());
    }

    #[test]
    fn default_options_match_latest_revision() {
        let options = ModelOptions::default();
        assert_eq!(options.headspace, HeadspaceMode::Frozen);
        assert_eq!(options.head_flux, HeadFluxMode::Disabled);
    }
}
