//! Liquid property value object.

use crate::error::{FluidError, FluidResult};
use cf_core::units::{DynVisc, MolarConc, MolarMass};

/// Immutable description of the solvent liquid.
///
/// Constructed through the uom seam; fields are plain f64 in the units
/// their names carry, since the tank update loop works in mol, m³, and bar.
/// No identity beyond its values; shared freely across tank instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Liquid {
    /// Molar density [mol/m³]
    pub density_mol_m3: f64,
    /// Dynamic viscosity [Pa·s]
    pub viscosity_pa_s: f64,
    /// Molecular weight [g/mol]
    pub molar_mass_g_mol: f64,
}

impl Liquid {
    /// Create a liquid from molar density, viscosity, and molecular weight.
    ///
    /// Validates that all three are positive and finite.
    pub fn new(density: MolarConc, viscosity: DynVisc, molar_mass: MolarMass) -> FluidResult<Self> {
        let density_mol_m3 = density.value;
        if !density_mol_m3.is_finite() || density_mol_m3 <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "liquid density must be positive and finite",
            });
        }

        let viscosity_pa_s = viscosity.value;
        if !viscosity_pa_s.is_finite() || viscosity_pa_s <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "liquid viscosity must be positive and finite",
            });
        }

        let molar_mass_g_mol = molar_mass.get::<uom::si::molar_mass::gram_per_mole>();
        if !molar_mass_g_mol.is_finite() || molar_mass_g_mol <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "liquid molecular weight must be positive and finite",
            });
        }

        Ok(Self {
            density_mol_m3,
            viscosity_pa_s,
            molar_mass_g_mol,
        })
    }

    /// Mass density [kg/m³], converted from molar density and MW.
    pub fn mass_density_kg_m3(&self) -> f64 {
        self.density_mol_m3 * self.molar_mass_g_mol / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::{gpmol, molpm3, pas};

    #[test]
    fn create_valid_liquid() {
        let liquid = Liquid::new(molpm3(54.788e3), pas(0.001691), gpmol(19.122)).unwrap();
        assert_eq!(liquid.density_mol_m3, 54.788e3);
        assert_eq!(liquid.viscosity_pa_s, 0.001691);
        assert!((liquid.molar_mass_g_mol - 19.122).abs() < 1e-12);
    }

    #[test]
    fn mass_density_conversion() {
        let liquid = Liquid::new(molpm3(54.788e3), pas(0.001691), gpmol(19.122)).unwrap();
        let rho = liquid.mass_density_kg_m3();
        assert!((rho - 54.788e3 * 19.122 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn reject_negative_density() {
        let result = Liquid::new(molpm3(-1.0), pas(0.001691), gpmol(19.122));
        assert!(result.is_err());
    }

    #[test]
    fn reject_zero_viscosity() {
        let result = Liquid::new(molpm3(54.788e3), pas(0.0), gpmol(19.122));
        assert!(result.is_err());
    }

    #[test]
    fn reject_non_finite() {
        let result = Liquid::new(molpm3(f64::NAN), pas(0.001691), gpmol(19.122));
        assert!(result.is_err());
    }
}
