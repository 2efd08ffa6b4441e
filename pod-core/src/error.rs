use core::fmt;

/// Which of the two per-tick telemetry lines a parse failure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelemetryLine {
    Pod,
    Opponent,
}

impl fmt::Display for TelemetryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pod => write!(f, "pod"),
            Self::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryError {
    TokenCount {
        line: TelemetryLine,
        expected: usize,
        found: usize,
    },
    InvalidNumber {
        line: TelemetryLine,
        field: usize,
        token: String,
    },
    /// Input ended after the pod line but before the opponent line.
    TruncatedTick,
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "{line} line: expected {expected} integers, got {found} tokens"
            ),
            Self::InvalidNumber { line, field, token } => {
                write!(f, "{line} line: field {field} is not an integer: {token:?}")
            }
            Self::TruncatedTick => write!(f, "input ended in the middle of a tick"),
        }
    }
}

impl std::error::Error for TelemetryError {}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    EmptyId,
    ThrustRange { min: i32, max: i32 },
    NonPositive { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "config id must not be empty"),
            Self::ThrustRange { min, max } => {
                write!(f, "thrust range invalid: min={min}, max={max} (need 0 <= min <= max <= 100)")
            }
            Self::NonPositive { field } => write!(f, "{field} must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}
