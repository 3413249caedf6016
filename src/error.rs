//! Error type shared by the generator, its exporters and the CLI tools.

use thiserror::Error;

use crate::zones::ZoneId;

pub type Result<T> = std::result::Result<T, LevelError>;

#[derive(Debug, Error)]
pub enum LevelError {
    /// A grid access outside `[0, height) x [0, width)`.
    #[error("index ({row}, {col}) out of range for {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    /// The grid was mutated after the last segmentation pass.
    #[error("zones are stale: grid was mutated since the last segmentation")]
    StaleZones,

    #[error("no zone with id {0:?}")]
    UnknownZone(ZoneId),

    #[error("no valid layout after {attempts} attempts (threshold relaxed to {threshold:.2})")]
    AttemptsExhausted { attempts: usize, threshold: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
