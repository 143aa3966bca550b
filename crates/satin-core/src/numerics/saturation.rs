use crate::common::constants::{
    AREA, CORRECTION_TABLE_CENTER, CORRECTION_TABLE_DIVISOR, CORRECTION_TABLE_LEN, DR, DZ,
    GAIN_NORMALIZATION, RAD2, RADIAL_STEP_COUNT, RING_FACTOR, SATURATION_INTENSITY_START,
    SATURATION_INTENSITY_STEP, SATURATION_STEP_COUNT, Z12,
};
use crate::domain::GaussianResult;
use std::sync::OnceLock;

pub type CorrectionTable = [f64; CORRECTION_TABLE_LEN];
pub type SaturationSweepResults = [GaussianResult; SATURATION_STEP_COUNT];

static CORRECTION_TABLE: OnceLock<CorrectionTable> = OnceLock::new();

/// Maps one (input power, small-signal gain) pair to the output power at every
/// saturation intensity of the sweep.
///
/// Implementations are shared by reference across worker threads.
pub trait SaturationModel: Sync {
    fn integrate(&self, input_power: i32, small_signal_gain: f32) -> SaturationSweepResults;
}

/// Saturable-gain propagation of a Gaussian beam through the discharge,
/// integrated over the beam cross-section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GaussianBeamModel;

impl SaturationModel for GaussianBeamModel {
    fn integrate(&self, input_power: i32, small_signal_gain: f32) -> SaturationSweepResults {
        integrate_gaussian_beam(input_power, small_signal_gain)
    }
}

/// Saturation intensities swept for every input power, in watts/cm2.
///
/// The sweep is fixed; its point count is the length of
/// [`SaturationSweepResults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaturationSweep {
    start: i32,
    step: i32,
}

impl Default for SaturationSweep {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl SaturationSweep {
    pub const STANDARD: Self = Self {
        start: SATURATION_INTENSITY_START,
        step: SATURATION_INTENSITY_STEP,
    };

    pub const fn start(&self) -> i32 {
        self.start
    }

    pub const fn stop(&self) -> i32 {
        self.intensity_at(SATURATION_STEP_COUNT - 1)
    }

    pub const fn step(&self) -> i32 {
        self.step
    }

    /// Intensity at `index`, which must be below `SATURATION_STEP_COUNT`.
    pub const fn intensity_at(&self, index: usize) -> i32 {
        self.start + self.step * index as i32
    }

    pub fn intensities(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        (0..SATURATION_STEP_COUNT).map(|index| self.intensity_at(index))
    }
}

/// Axial diffraction correction per propagation step, built on first use and
/// shared by every integration afterwards.
pub fn correction_table() -> &'static CorrectionTable {
    CORRECTION_TABLE.get_or_init(build_correction_table)
}

fn build_correction_table() -> CorrectionTable {
    let mut table = [0.0_f64; CORRECTION_TABLE_LEN];
    for (index, entry) in table.iter_mut().enumerate() {
        let z_inc = (index as f64 - CORRECTION_TABLE_CENTER as f64) / CORRECTION_TABLE_DIVISOR;
        *entry = z_inc * 2.0 * DZ / (Z12 + z_inc * z_inc);
    }
    table
}

/// Output power for `input_power` watts at each saturation intensity of the
/// default sweep. `input_power` must be positive for the log ratio to be finite.
pub fn integrate_gaussian_beam(input_power: i32, small_signal_gain: f32) -> SaturationSweepResults {
    let table = correction_table();
    let sweep = SaturationSweep::default();
    let input_intensity = 2.0 * f64::from(input_power) / AREA;
    let gain_per_step = f64::from(small_signal_gain) / GAIN_NORMALIZATION * DZ;

    std::array::from_fn(|step| {
        let saturation_intensity = sweep.intensity_at(step);
        let output_power =
            integrate_output_power(input_intensity, saturation_intensity, gain_per_step, table);
        GaussianResult::new(input_power, saturation_intensity, output_power)
    })
}

/// Disk integral of the amplified intensity for one saturation intensity.
///
/// Rings are summed from the axis outwards so the result does not depend on
/// which thread evaluates it.
pub fn integrate_output_power(
    input_intensity: f64,
    saturation_intensity: i32,
    gain_per_step: f64,
    table: &CorrectionTable,
) -> f64 {
    let saturation = f64::from(saturation_intensity);
    let gain = saturation * gain_per_step;

    let mut output_power = 0.0_f64;
    for ring in 0..RADIAL_STEP_COUNT {
        let r = ring as f64 * DR;
        let seed = input_intensity * (-2.0 * r * r / RAD2).exp();
        output_power += propagate_axially(seed, saturation, gain, table) * RING_FACTOR * r;
    }
    output_power
}

/// Saturable-gain recurrence along the optical axis. Each step depends on the
/// previous intensity, so the table is walked strictly in index order.
pub fn propagate_axially(
    seed_intensity: f64,
    saturation: f64,
    gain: f64,
    table: &CorrectionTable,
) -> f64 {
    table.iter().fold(seed_intensity, |intensity, correction| {
        intensity * (1.0 + gain / (saturation + intensity) - correction)
    })
}
