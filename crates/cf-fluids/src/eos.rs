//! Equation-of-state trait and the virial (Pitzer-correlation) backend.

use crate::error::{FluidError, FluidResult};
use crate::gas::Gas;
use cf_core::numeric::{Tolerances, nearly_equal};
use cf_core::units::constants::R_M3_BAR_PER_MOL_K;

/// Trait for gas-phase equation-of-state models.
///
/// Implementations must be thread-safe (Send + Sync) to support parallel
/// sweep evaluation. The tank update loop calls these per step, so the
/// interface works in plain f64: temperatures in K, pressures in bar,
/// volumes in m³, molar amounts in mol.
pub trait EosModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Gas constant used by this model [m³·bar/(mol·K)].
    fn gas_constant(&self) -> f64;

    /// Compressibility factor Z at (T, P).
    fn compressibility_factor(&self, gas: &Gas, t_k: f64, p_bar: f64) -> FluidResult<f64>;

    /// Pressure [bar] from specific molar volume [m³/mol] at fixed T.
    fn pressure_from_molar_volume(&self, gas: &Gas, t_k: f64, v_m3_mol: f64) -> FluidResult<f64>;

    /// Moles contained in `volume_m3` at (P, T): n = P·V/(Z·R·T).
    fn moles_of_gas(&self, gas: &Gas, volume_m3: f64, p_bar: f64, t_k: f64) -> FluidResult<f64> {
        let z = self.compressibility_factor(gas, t_k, p_bar)?;
        let n = p_bar * volume_m3 / (z * self.gas_constant() * t_k);
        if !n.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "moles of gas must be finite",
            });
        }
        Ok(n)
    }

    /// Volume [m³] occupied by `n_mol` at (P, T): V = n·R·T·Z/P.
    fn volume_of_gas(&self, gas: &Gas, n_mol: f64, p_bar: f64, t_k: f64) -> FluidResult<f64> {
        let z = self.compressibility_factor(gas, t_k, p_bar)?;
        let v = n_mol * self.gas_constant() * t_k * z / p_bar;
        if !v.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "volume of gas must be finite",
            });
        }
        Ok(v)
    }
}

/// Truncated virial equation of state with the Pitzer second-virial
/// correlation: B0 = 0.083 − 0.422·Tr⁻¹·⁶, B1 = 0.139 − 0.172·Tr⁻⁴·²,
/// B̂ = B0 + w·B1, B = B̂·R·Tc/Pc, Z = 1 + B·P/(R·T).
#[derive(Clone, Copy, Debug)]
pub struct VirialEos {
    r_m3_bar_mol_k: f64,
}

impl Default for VirialEos {
    fn default() -> Self {
        Self {
            r_m3_bar_mol_k: R_M3_BAR_PER_MOL_K,
        }
    }
}

impl VirialEos {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the gas constant (sensitivity testing only).
    pub fn with_gas_constant(r_m3_bar_mol_k: f64) -> Self {
        Self { r_m3_bar_mol_k }
    }

    /// Dimensional second virial coefficient B [m³/mol] at T.
    fn second_virial(&self, gas: &Gas, t_k: f64) -> f64 {
        let tr = t_k / gas.tc_k;
        let b0 = 0.083 - 0.422 / tr.powf(1.6);
        let b1 = 0.139 - 0.172 / tr.powf(4.2);
        let bhat = b0 + gas.acentric * b1;
        bhat * self.r_m3_bar_mol_k * gas.tc_k / gas.pc_bar
    }

    fn validate_t(t_k: f64) -> FluidResult<()> {
        if !t_k.is_finite() || t_k <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    fn validate_p(p_bar: f64) -> FluidResult<()> {
        if !p_bar.is_finite() || p_bar <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }
}

impl EosModel for VirialEos {
    fn name(&self) -> &str {
        "virial"
    }

    fn gas_constant(&self) -> f64 {
        self.r_m3_bar_mol_k
    }

    fn compressibility_factor(&self, gas: &Gas, t_k: f64, p_bar: f64) -> FluidResult<f64> {
        Self::validate_t(t_k)?;
        Self::validate_p(p_bar)?;
        let b = self.second_virial(gas, t_k);
        let z = 1.0 + b * p_bar / (self.r_m3_bar_mol_k * t_k);
        if !z.is_finite() || z <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "compressibility factor must be positive and finite",
            });
        }
        Ok(z)
    }

    fn pressure_from_molar_volume(&self, gas: &Gas, t_k: f64, v_m3_mol: f64) -> FluidResult<f64> {
        Self::validate_t(t_k)?;
        if !v_m3_mol.is_finite() {
            return Err(FluidError::Degenerate {
                what: "molar volume must be finite",
            });
        }
        let b = self.second_virial(gas, t_k);
        if nearly_equal(b, v_m3_mol, Tolerances::default()) {
            return Err(FluidError::Degenerate {
                what: "molar volume coincides with second virial coefficient",
            });
        }
        Ok(-self.r_m3_bar_mol_k * t_k / (b - v_m3_mol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::{bar, gpmol, k, m};

    fn co2() -> Gas {
        Gas::new(k(304.21), bar(73.83), 0.224, gpmol(44.01), m(5e-4)).unwrap()
    }

    #[test]
    fn z_below_one_for_cold_co2() {
        let eos = VirialEos::new();
        let z5 = eos.compressibility_factor(&co2(), 277.59, 5.0).unwrap();
        assert!((z5 - 0.9680083397123528).abs() < 1e-9);

        let z27 = eos.compressibility_factor(&co2(), 277.59, 2.7).unwrap();
        assert!((z27 - 0.9827245034446704).abs() < 1e-9);
    }

    #[test]
    fn moles_volume_round_trip() {
        let eos = VirialEos::new();
        let gas = co2();
        let v = eos.volume_of_gas(&gas, 1.5, 5.0, 277.59).unwrap();
        let n = eos.moles_of_gas(&gas, v, 5.0, 277.59).unwrap();
        assert!((n - 1.5).abs() / 1.5 < 1e-12);
    }

    #[test]
    fn pressure_recovers_from_molar_volume() {
        // V/n = RT/P + B, so the inverse relation must return P exactly.
        let eos = VirialEos::new();
        let gas = co2();
        let v = eos.volume_of_gas(&gas, 1.0, 5.0, 277.59).unwrap();
        let p = eos.pressure_from_molar_volume(&gas, 277.59, v).unwrap();
        assert!((p - 5.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_molar_volume_rejected() {
        let eos = VirialEos::new();
        let gas = co2();
        let err = eos
            .pressure_from_molar_volume(&gas, 277.59, f64::NAN)
            .unwrap_err();
        assert!(matches!(err, FluidError::Degenerate { .. }));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let eos = VirialEos::new();
        let gas = co2();
        assert!(eos.compressibility_factor(&gas, 0.0, 5.0).is_err());
        assert!(eos.compressibility_factor(&gas, f64::NAN, 5.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use cf_core::units::{bar, gpmol, k, m};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn moles_and_volume_are_inverses(
            n in 1e-3_f64..100.0,
            p in 1.0_f64..60.0,
            t in 260.0_f64..320.0,
        ) {
            let gas = Gas::new(k(304.21), bar(73.83), 0.224, gpmol(44.01), m(5e-4)).unwrap();
            let eos = VirialEos::new();

            let v = eos.volume_of_gas(&gas, n, p, t).unwrap();
            let n_back = eos.moles_of_gas(&gas, v, p, t).unwrap();
            prop_assert!((n_back - n).abs() / n < 1e-9);
        }

        #[test]
        fn pressure_inverse_consistent(
            p in 1.0_f64..60.0,
            t in 260.0_f64..320.0,
        ) {
            let gas = Gas::new(k(304.21), bar(73.83), 0.224, gpmol(44.01), m(5e-4)).unwrap();
            let eos = VirialEos::new();

            let v = eos.volume_of_gas(&gas, 1.0, p, t).unwrap();
            let p_back = eos.pressure_from_molar_volume(&gas, t, v).unwrap();
            prop_assert!((p_back - p).abs() / p < 1e-9);
        }
    }
}
