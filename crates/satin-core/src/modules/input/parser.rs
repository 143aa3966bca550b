use crate::domain::{LaserConfig, LaserConfigError, SatinError, SatinResult};

const LASER_FIELD_COUNT: usize = 4;

/// Records read before end of input or the first malformed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput<T> {
    pub records: Vec<T>,
    pub stopped_at: Option<ParseStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseStop {
    pub line: usize,
    pub reason: ParseStopReason,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseStopReason {
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
    #[error("input power must be positive, got {0}")]
    NonPositivePower(i32),
    #[error("expected {expected} fields, found {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("small-signal gain '{0}' is not a number")]
    InvalidGain(String),
    #[error("discharge pressure '{0}' is not an integer")]
    InvalidPressure(String),
    #[error(transparent)]
    InvalidConfig(#[from] LaserConfigError),
}

/// Whitespace-separated input powers in watts. Reading ends at the first token
/// that is not a positive integer.
pub fn parse_input_powers(source: &str) -> SatinResult<ParsedInput<i32>> {
    let mut records = Vec::new();

    for (line_index, line) in source.lines().enumerate() {
        for token in line.split_whitespace() {
            let stop_reason = match token.parse::<i32>() {
                Ok(power) if power > 0 => {
                    push_record(&mut records, power, "pin")?;
                    continue;
                }
                Ok(power) => ParseStopReason::NonPositivePower(power),
                Err(_) => ParseStopReason::NotAnInteger(token.to_string()),
            };
            return Ok(ParsedInput {
                records,
                stopped_at: Some(ParseStop {
                    line: line_index + 1,
                    reason: stop_reason,
                }),
            });
        }
    }

    Ok(ParsedInput {
        records,
        stopped_at: None,
    })
}

/// `<output file> <small-signal gain> <discharge pressure> <CO2>` per line.
/// Blank lines are skipped; reading ends at the first malformed line.
pub fn parse_laser_configs(source: &str) -> SatinResult<ParsedInput<LaserConfig>> {
    let mut records = Vec::new();

    for (line_index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_laser_line(line) {
            Ok(config) => push_record(&mut records, config, "laser")?,
            Err(reason) => {
                return Ok(ParsedInput {
                    records,
                    stopped_at: Some(ParseStop {
                        line: line_index + 1,
                        reason,
                    }),
                });
            }
        }
    }

    Ok(ParsedInput {
        records,
        stopped_at: None,
    })
}

fn parse_laser_line(line: &str) -> Result<LaserConfig, ParseStopReason> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != LASER_FIELD_COUNT {
        return Err(ParseStopReason::FieldCount {
            expected: LASER_FIELD_COUNT,
            actual: fields.len(),
        });
    }

    let small_signal_gain = fields[1]
        .parse::<f32>()
        .map_err(|_| ParseStopReason::InvalidGain(fields[1].to_string()))?;
    let discharge_pressure = fields[2]
        .parse::<i32>()
        .map_err(|_| ParseStopReason::InvalidPressure(fields[2].to_string()))?;

    Ok(LaserConfig::new(
        fields[0],
        small_signal_gain,
        discharge_pressure,
        fields[3],
    )?)
}

fn push_record<T>(records: &mut Vec<T>, record: T, input_label: &str) -> SatinResult<()> {
    records.try_reserve(1).map_err(|source| {
        SatinError::resource_exhaustion(
            "SYS.INPUT_BUFFER",
            format!(
                "failed to grow {} buffer beyond {} records: {}",
                input_label,
                records.len(),
                source
            ),
        )
    })?;
    records.push(record);
    Ok(())
}
