pub mod errors;

pub use errors::{SatinError, SatinErrorCategory, SatinResult};

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const PIN_INPUT: &str = "pin.dat";
pub const LASER_INPUT: &str = "laser.dat";

pub const MAX_OUTPUT_FILE_LEN: usize = 8;
pub const MAX_CARBON_DIOXIDE_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    Sequential,
    #[default]
    Concurrent,
}

impl DispatchMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
        }
    }
}

impl Display for DispatchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LaserConfigError {
    #[error("output file name '{name}' exceeds {max} characters")]
    OutputFileTooLong { name: String, max: usize },
    #[error("output file name '{0}' must be a bare file name")]
    OutputFileNotBare(String),
    #[error("small-signal gain must be finite and >= 0, got {0}")]
    InvalidGain(f32),
    #[error("CO2 designation '{value}' exceeds {max} characters")]
    CarbonDioxideTooLong { value: String, max: usize },
}

/// One row of `laser.dat`: where to write the report and the operating point of
/// the amplifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LaserConfig {
    output_file: String,
    small_signal_gain: f32,
    discharge_pressure: i32,
    carbon_dioxide: String,
}

impl LaserConfig {
    pub fn new(
        output_file: impl Into<String>,
        small_signal_gain: f32,
        discharge_pressure: i32,
        carbon_dioxide: impl Into<String>,
    ) -> Result<Self, LaserConfigError> {
        let output_file = output_file.into();
        let carbon_dioxide = carbon_dioxide.into();

        if output_file.chars().count() > MAX_OUTPUT_FILE_LEN {
            return Err(LaserConfigError::OutputFileTooLong {
                name: output_file,
                max: MAX_OUTPUT_FILE_LEN,
            });
        }
        if output_file.is_empty()
            || output_file == "."
            || output_file == ".."
            || output_file.contains(&['/', '\\'][..])
        {
            return Err(LaserConfigError::OutputFileNotBare(output_file));
        }
        if !small_signal_gain.is_finite() || small_signal_gain < 0.0 {
            return Err(LaserConfigError::InvalidGain(small_signal_gain));
        }
        if carbon_dioxide.chars().count() > MAX_CARBON_DIOXIDE_LEN {
            return Err(LaserConfigError::CarbonDioxideTooLong {
                value: carbon_dioxide,
                max: MAX_CARBON_DIOXIDE_LEN,
            });
        }

        Ok(Self {
            output_file,
            small_signal_gain,
            discharge_pressure,
            carbon_dioxide,
        })
    }

    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    pub const fn small_signal_gain(&self) -> f32 {
        self.small_signal_gain
    }

    pub const fn discharge_pressure(&self) -> i32 {
        self.discharge_pressure
    }

    pub fn carbon_dioxide(&self) -> &str {
        &self.carbon_dioxide
    }
}

/// Output power of the beam at one (input power, saturation intensity) point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianResult {
    pub input_power: i32,
    pub saturation_intensity: i32,
    pub output_power: f64,
    pub log_ratio: f64,
    pub delta: f64,
}

impl GaussianResult {
    pub fn new(input_power: i32, saturation_intensity: i32, output_power: f64) -> Self {
        let input = f64::from(input_power);
        Self {
            input_power,
            saturation_intensity,
            output_power,
            log_ratio: (output_power / input).ln(),
            delta: output_power - input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub pin_path: PathBuf,
    pub laser_path: PathBuf,
    pub output_dir: PathBuf,
    pub mode: DispatchMode,
}

impl RunRequest {
    pub fn new(
        pin_path: impl Into<PathBuf>,
        laser_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pin_path: pin_path.into(),
            laser_path: laser_path.into(),
            output_dir: output_dir.into(),
            mode: DispatchMode::Concurrent,
        }
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for RunRequest {
    fn default() -> Self {
        Self::new(PIN_INPUT, LASER_INPUT, ".")
    }
}
