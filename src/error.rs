use std::fmt;

/// Failure to load or validate a tuning file.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse { path: String, message: String },
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    NonFinite { field: &'static str, value: f32 },
    FrameTableTooShort { row: usize, len: usize, frames: usize },
    FrameIndexOutOfAtlas { row: usize, index: usize, cells: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read tuning file {path}: {message}"),
            Self::Parse { path, message } => {
                write!(f, "invalid tuning file {path}: {message}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be a finite value > 0, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must be a finite value >= 0, got {value}")
            }
            Self::NonFinite { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
            Self::FrameTableTooShort { row, len, frames } => write!(
                f,
                "animation row {row} has {len} entries, need at least {frames}"
            ),
            Self::FrameIndexOutOfAtlas { row, index, cells } => write!(
                f,
                "animation row {row} references atlas cell {index}, atlas has {cells}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
