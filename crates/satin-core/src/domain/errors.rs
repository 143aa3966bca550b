use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SatinResult<T> = Result<T, SatinError>;

/// Failure classes a run can end with. Each maps to its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SatinErrorCategory {
    /// Bad command line or an input table that yields nothing to compute.
    InputValidationError,
    /// An input could not be read or a report could not be written.
    IoSystemError,
    /// The worker pool could not start or a worker did not come back.
    ConcurrencyError,
    ResourceExhaustionError,
}

impl SatinErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ConcurrencyError => 4,
            Self::ResourceExhaustionError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ConcurrencyError => "ConcurrencyError",
            Self::ResourceExhaustionError => "ResourceExhaustionError",
        }
    }
}

impl Display for SatinErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Error carried from any stage of a run up to the driver, which reports it and
/// exits with the category's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatinError {
    category: SatinErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl SatinError {
    pub fn new(
        category: SatinErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            SatinErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SatinErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn concurrency(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(SatinErrorCategory::ConcurrencyError, placeholder, message)
    }

    pub fn resource_exhaustion(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            SatinErrorCategory::ResourceExhaustionError,
            placeholder,
            message,
        )
    }

    /// Folds the failures of several workers into one error. The first failure
    /// decides the category and placeholder; every failure is listed in the
    /// message. Returns `None` when there is nothing to report.
    pub fn aggregate(mut failures: Vec<SatinError>) -> Option<SatinError> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            count => {
                let details = failures
                    .iter()
                    .map(|error| format!("[{}] {}", error.placeholder, error.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                let first = &failures[0];
                Some(Self::new(
                    first.category,
                    first.placeholder,
                    format!("{} laser workers failed: {}", count, details),
                ))
            }
        }
    }

    pub const fn category(&self) -> SatinErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for SatinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.category, self.placeholder, self.message)
    }
}

impl Error for SatinError {}
