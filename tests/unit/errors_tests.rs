/*!
 * Tests for error types and conversions
 */

use std::io;
use std::path::PathBuf;

use reelcut::errors::{AppError, TimelineError};

#[test]
fn test_timelineError_missingTimeline_shouldCarryRemediationHint() {
    let error = TimelineError::MissingTimeline {
        path: PathBuf::from("proj/audio/timeline_timestamps.json"),
    };
    let display = error.to_string();
    assert!(display.contains("timeline_timestamps.json"));
    assert!(display.contains("Generate the timeline first"));
}

#[test]
fn test_timelineError_malformedTimeline_shouldDifferFromMissing() {
    let error = TimelineError::MalformedTimeline {
        path: PathBuf::from("t.json"),
        reason: "Invalid JSON: expected value".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("Invalid timeline data"));
    assert!(!display.contains("Generate the timeline first"));
}

#[test]
fn test_timelineError_io_shouldNameOperationAndPath() {
    let error = TimelineError::io(
        "write EDL",
        "proj/exports/timeline.edl",
        io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );
    let display = error.to_string();
    assert!(display.contains("Failed to write EDL"));
    assert!(display.contains("timeline.edl"));
    assert!(display.contains("denied"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_timelineError_missingShotDuration_shouldNameShot() {
    let error = TimelineError::MissingShotDuration {
        scene_number: 3,
        shot_number: 7,
    };
    let display = error.to_string();
    assert!(display.contains("scene 3"));
    assert!(display.contains("shot 7"));
}

#[test]
fn test_appError_fromTimelineError_shouldWrapCorrectly() {
    let app_error: AppError = TimelineError::InvalidFrameRate(0.0).into();
    assert!(matches!(app_error, AppError::Timeline(TimelineError::InvalidFrameRate(_))));
    assert!(app_error.to_string().contains("Invalid frame rate"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let app_error: AppError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app_error, AppError::Unknown(ref m) if m == "boom"));
}
