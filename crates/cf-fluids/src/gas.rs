//! Gas property value object with derived bubble geometry.

use std::f64::consts::PI;

use crate::error::{FluidError, FluidResult};
use cf_core::units::{Length, MolarMass, Pressure, Temperature};

/// Immutable description of the sparged gas.
///
/// Critical properties feed the virial correlation; the average bubble
/// diameter fixes the per-bubble volume and surface area once, at
/// construction. Internal units are K, bar, g/mol, and m.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gas {
    /// Critical temperature [K]
    pub tc_k: f64,
    /// Critical pressure [bar]
    pub pc_bar: f64,
    /// Acentric factor (dimensionless)
    pub acentric: f64,
    /// Molecular weight [g/mol]
    pub molar_mass_g_mol: f64,
    /// Average bubble diameter [m]
    pub bubble_diameter_m: f64,
    /// Average bubble volume [m³], (4/3)·π·r³
    pub bubble_volume_m3: f64,
    /// Average bubble surface area [m²], 4·π·r²
    pub bubble_surface_m2: f64,
}

impl Gas {
    /// Create a gas from critical properties, MW, and bubble diameter.
    ///
    /// Validates positivity of Tc, Pc, MW, and diameter; the acentric
    /// factor only needs to be finite.
    pub fn new(
        tc: Temperature,
        pc: Pressure,
        acentric: f64,
        molar_mass: MolarMass,
        bubble_diameter: Length,
    ) -> FluidResult<Self> {
        let tc_k = tc.value;
        if !tc_k.is_finite() || tc_k <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "critical temperature must be positive and finite",
            });
        }

        let pc_bar = pc.get::<uom::si::pressure::bar>();
        if !pc_bar.is_finite() || pc_bar <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "critical pressure must be positive and finite",
            });
        }

        if !acentric.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "acentric factor must be finite",
            });
        }

        let molar_mass_g_mol = molar_mass.get::<uom::si::molar_mass::gram_per_mole>();
        if !molar_mass_g_mol.is_finite() || molar_mass_g_mol <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "gas molecular weight must be positive and finite",
            });
        }

        let bubble_diameter_m = bubble_diameter.value;
        if !bubble_diameter_m.is_finite() || bubble_diameter_m <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "bubble diameter must be positive and finite",
            });
        }

        let r = bubble_diameter_m / 2.0;
        let bubble_volume_m3 = 4.0 / 3.0 * PI * r.powi(3);
        let bubble_surface_m2 = 4.0 * PI * r.powi(2);

        Ok(Self {
            tc_k,
            pc_bar,
            acentric,
            molar_mass_g_mol,
            bubble_diameter_m,
            bubble_volume_m3,
            bubble_surface_m2,
        })
    }
}
