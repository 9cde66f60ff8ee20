//! Reference fluid definitions for the canonical carbonation scenario.

use crate::gas::Gas;
use crate::liquid::Liquid;
use std::f64::consts::PI;

/// Flat beer as measured at cellar conditions.
pub fn reference_beer() -> Liquid {
    Liquid {
        density_mol_m3: 54.788e3,
        viscosity_pa_s: 0.001691,
        molar_mass_g_mol: 19.122,
    }
}

/// Carbon dioxide with a 0.5 mm average sparge bubble.
pub fn reference_co2() -> Gas {
    reference_co2_with_bubble_diameter(5e-4)
}

/// Carbon dioxide with a caller-chosen bubble diameter (sweeps vary this).
pub fn reference_co2_with_bubble_diameter(bubble_diameter_m: f64) -> Gas {
    let r = bubble_diameter_m / 2.0;
    Gas {
        tc_k: 304.21,
        pc_bar: 73.83,
        acentric: 0.224,
        molar_mass_g_mol: 44.01,
        bubble_diameter_m,
        bubble_volume_m3: 4.0 / 3.0 * PI * r.powi(3),
        bubble_surface_m2: 4.0 * PI * r.powi(2),
    }
}
