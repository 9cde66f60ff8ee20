// cf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, DynamicViscosity as UomDynamicViscosity, Length as UomLength,
    MassDensity as UomMassDensity, MolarConcentration as UomMolarConcentration,
    MolarMass as UomMolarMass, Pressure as UomPressure, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Velocity as UomVelocity, Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Density = UomMassDensity;
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type MolarConc = UomMolarConcentration;
pub type MolarMass = UomMolarMass;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn molpm3(v: f64) -> MolarConc {
    use uom::si::molar_concentration::mole_per_cubic_meter;
    MolarConc::new::<mole_per_cubic_meter>(v)
}

#[inline]
pub fn gpmol(v: f64) -> MolarMass {
    use uom::si::molar_mass::gram_per_mole;
    MolarMass::new::<gram_per_mole>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pas(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    /// Gas constant in m³·bar/(mol·K), written as the atm-based
    /// value times 1.013 so downstream numbers reproduce exactly.
    pub const R_M3_BAR_PER_MOL_K: f64 = 8.20573660809596e-5 * 1.013;

    /// Henry-law solubility slope for CO₂ in beer, mol/(m³·bar).
    pub const HENRY_MOL_PER_M3_BAR: f64 = 34.0;

    /// CO₂-in-water diffusion coefficient, m²/s.
    pub const DIFFUSIVITY_M2_PER_S: f64 = 3.24e-9;

    /// Terminal rise velocity of a sparged bubble, m/s.
    pub const BUBBLE_RISE_M_PER_S: f64 = 0.09;

    pub const G_MPS2: f64 = 9.81;
}

/// Physical constants the tank model closes over. Defaults match
/// [`constants`]; tests override individual fields.
#[derive(Clone, Copy, Debug)]
pub struct PhysicalConstants {
    pub gas_constant_m3_bar_per_mol_k: f64,
    pub henry_mol_per_m3_bar: f64,
    pub diffusivity_m2_per_s: f64,
    pub bubble_rise_m_per_s: f64,
    pub gravity_m_per_s2: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gas_constant_m3_bar_per_mol_k: constants::R_M3_BAR_PER_MOL_K,
            henry_mol_per_m3_bar: constants::HENRY_MOL_PER_M3_BAR,
            diffusivity_m2_per_s: constants::DIFFUSIVITY_M2_PER_S,
            bubble_rise_m_per_s: constants::BUBBLE_RISE_M_PER_S,
            gravity_m_per_s2: constants::G_MPS2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = bar(5.0);
        let _t = k(277.59);
        let _l = m(0.59);
        let _a = m2(0.043);
        let _v = m3(0.019);
        let _q = m3ps(1.67e-5);
        let _c = molpm3(170.0);
        let _mw = gpmol(44.01);
        let _rho = kgpm3(1036.9);
        let _mu = pas(0.001691);
        let _dt = s(0.1);
        let _u = mps(0.09);
        let _r = unitless(0.99);
    }

    #[test]
    fn bar_is_1e5_pa() {
        use uom::si::pressure::pascal;
        let p = bar(2.7);
        assert!((p.get::<pascal>() - 270_000.0).abs() < 1e-6);
    }

    #[test]
    fn default_constants_match_module() {
        let c = PhysicalConstants::default();
        assert_eq!(
            c.gas_constant_m3_bar_per_mol_k,
            constants::R_M3_BAR_PER_MOL_K
        );
        assert_eq!(c.henry_mol_per_m3_bar, 34.0);
    }
}
