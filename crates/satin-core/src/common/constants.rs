//! Fixed optical and geometric parameters of the CO2 amplifier model.
//!
//! Lengths are in centimetres, intensities in watts/cm2. These values are not
//! configurable at runtime; every kernel reads them from here instead of carrying
//! its own literals.

pub const PI: f64 = 3.141_592_653_589_793_238_462_643_383_279_502_88_f64;

/// Aperture radius of the gain medium.
pub const RAD: f64 = 18.0e-2;
pub const RAD2: f64 = RAD * RAD;
/// Gaussian beam waist.
pub const W1: f64 = 3.0e-1;
/// Radial integration step.
pub const DR: f64 = 2.0e-3;
/// Axial propagation step.
pub const DZ: f64 = 4.0e-2;
/// CO2 laser wavelength.
pub const LAMDA: f64 = 10.6e-3;
pub const AREA: f64 = PI * RAD2;
/// Rayleigh range of the beam waist.
pub const Z1: f64 = PI * (W1 * W1) / LAMDA;
pub const Z12: f64 = Z1 * Z1;
/// Circumference factor of one radial ring, `2 * pi * DR`.
pub const RING_FACTOR: f64 = 2.0 * PI * DR;

pub const CORRECTION_TABLE_LEN: usize = 8001;
pub const CORRECTION_TABLE_CENTER: usize = CORRECTION_TABLE_LEN / 2;
pub const CORRECTION_TABLE_DIVISOR: f64 = 25.0;

/// Radial samples from `r = 0` to `r = 0.5` inclusive.
pub const RADIAL_STEP_COUNT: usize = 251;

pub const GAIN_NORMALIZATION: f64 = 32.0e3;

pub const SATURATION_INTENSITY_START: i32 = 10_000;
pub const SATURATION_INTENSITY_STOP: i32 = 25_000;
pub const SATURATION_INTENSITY_STEP: i32 = 1_000;
pub const SATURATION_STEP_COUNT: usize = ((SATURATION_INTENSITY_STOP - SATURATION_INTENSITY_START)
    / SATURATION_INTENSITY_STEP
    + 1) as usize;

#[cfg(test)]
mod tests {
    use super::{
        AREA, CORRECTION_TABLE_CENTER, CORRECTION_TABLE_LEN, DR, PI, RAD, RAD2,
        RADIAL_STEP_COUNT, RING_FACTOR, SATURATION_STEP_COUNT, Z1, Z12,
    };

    #[test]
    fn derived_constants_match_expected_relationships() {
        assert!((PI - std::f64::consts::PI).abs() <= f64::EPSILON);
        assert_eq!(RAD2, RAD * RAD);
        assert!((AREA - PI * 0.0324).abs() <= 1.0e-15);
        assert!((Z12 - Z1 * Z1).abs() <= f64::EPSILON * Z12);
        assert!((RING_FACTOR - 2.0 * PI * DR).abs() <= f64::EPSILON);
    }

    #[test]
    fn grid_sizes_match_sweep_layout() {
        assert_eq!(SATURATION_STEP_COUNT, 16);
        assert_eq!(CORRECTION_TABLE_LEN, 8001);
        assert_eq!(CORRECTION_TABLE_CENTER, 4000);
        assert!(((RADIAL_STEP_COUNT - 1) as f64 * DR - 0.5).abs() <= 1.0e-12);
    }
}
