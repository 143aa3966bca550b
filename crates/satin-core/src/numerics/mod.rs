pub mod saturation;

pub use saturation::{
    CorrectionTable, GaussianBeamModel, SaturationModel, SaturationSweep, SaturationSweepResults,
    correction_table, integrate_gaussian_beam, integrate_output_power, propagate_axially,
};
