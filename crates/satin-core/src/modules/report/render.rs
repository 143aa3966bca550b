use crate::domain::{GaussianResult, LaserConfig};
use crate::modules::serialization::format_fixed_f64;
use chrono::NaiveDateTime;

/// ctime(3) layout, e.g. `Sat Oct 17 09:05:03 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

pub const COLUMN_HEADER: &str = "Pin\t\tPout\t\tSat. Int\tln(Pout/Pin)\tPout-Pin";
pub const UNIT_HEADER: &str = "(watts)\t\t(watts)\t\t(watts/cm2)\t\t\t(watts)";

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn render_header(config: &LaserConfig, started: &NaiveDateTime) -> String {
    format!(
        "Start date: {}\n\nGaussian Beam\n\nPressure in Main Discharge = {}kPa\nSmall-signal Gain = {}\nCO2 via {}\n\n{}\n{}\n",
        format_timestamp(started),
        config.discharge_pressure(),
        format_fixed_f64(f64::from(config.small_signal_gain()), 4, 1),
        config.carbon_dioxide(),
        COLUMN_HEADER,
        UNIT_HEADER,
    )
}

pub fn render_result_line(result: &GaussianResult) -> String {
    format!(
        "{}\t\t{}\t\t{}\t\t{}\t\t{}\n",
        result.input_power,
        format_fixed_f64(result.output_power, 7, 3),
        result.saturation_intensity,
        format_fixed_f64(result.log_ratio, 5, 3),
        format_fixed_f64(result.delta, 7, 3),
    )
}

pub fn render_footer(finished: &NaiveDateTime) -> String {
    format!("\nEnd date: {}\n\n", format_timestamp(finished))
}
