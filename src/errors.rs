/*!
 * Error types for the reelcut application.
 *
 * Timeline assembly and export failures are typed with thiserror so callers
 * can tell a missing artifact apart from a corrupt one. Application glue
 * (controller, CLI) works in `anyhow` and wraps these where needed.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by timeline assembly, timeline loading and export writing
#[derive(Error, Debug)]
pub enum TimelineError {
    /// No timeline artifact exists where one was expected
    #[error("Timeline data not found at {path:?}. Generate the timeline first (assemble narration audio) before exporting.")]
    MissingTimeline {
        /// Location that was probed
        path: PathBuf,
    },

    /// The timeline artifact exists but cannot be used
    #[error("Invalid timeline data in {path:?}: {reason}")]
    MalformedTimeline {
        /// Location of the artifact
        path: PathBuf,
        /// Parser or structural error
        reason: String,
    },

    /// A narrated shot has no entry in the duration lookup
    #[error("No audio duration for scene {scene_number} shot {shot_number}; regenerate narration audio before assembling")]
    MissingShotDuration {
        scene_number: u32,
        shot_number: u32,
    },

    /// Measured duration is negative, NaN, infinite or too large for the ms clock
    #[error("Invalid audio duration {seconds}s for scene {scene_number} shot {shot_number}")]
    InvalidDuration {
        scene_number: u32,
        shot_number: u32,
        seconds: f64,
    },

    /// Durations and pauses add up past the end of the millisecond clock
    #[error("Timeline clock overflows at scene {scene_number} shot {shot_number}")]
    DurationOverflow {
        scene_number: u32,
        /// 0 when the overflow happens on the pause before a scene
        shot_number: u32,
    },

    /// Filesystem error while reading or writing an artifact
    #[error("Failed to {operation} {path:?}: {source}")]
    Io {
        /// What was being done, e.g. "write EDL"
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scene or shot numbers do not strictly increase in source order
    #[error("Numbering out of order: {0}")]
    NumberingOrder(String),

    /// Frame rate is not a finite number between 1 and 1000
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// Timecode string could not be converted back to milliseconds
    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),
}

impl TimelineError {
    /// Wrap an io error with the operation and target file
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// Error from timeline assembly or export
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
