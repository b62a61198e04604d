/*!
 * # reelcut - Timeline Builder & NLE Export Engine
 *
 * Turns a narrated scene/shot script and its measured narration durations
 * into a frame-accurate production timeline, and exports that timeline for
 * non-linear editors.
 *
 * ## Features
 *
 * - Millisecond to `HH:MM:SS:FF` timecode conversion (non-drop)
 * - Editable plain-text script preview with a lenient round-trip parser
 * - Timeline assembly with configurable shot and scene pauses
 * - Exports:
 *   - CMX 3600 EDL
 *   - Final Cut Pro XML 1.9
 *   - DaVinci Resolve Python import script
 * - Narration drift detection between preview edits and generated audio
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Frame rates and timecode conversion
 * - `script`: Scene/shot input model
 * - `preview`: Preview builder, tokenizer and parser
 * - `timeline`: Timeline model, assembler and persistence
 * - `media`: Rendered clip / still image lookup
 * - `export`: Editor exports:
 *   - `export::edl`: CMX 3600 EDL
 *   - `export::fcpxml`: FCPXML
 *   - `export::resolve_script`: DaVinci Resolve script
 * - `drift`: Narration fingerprints and drift reports
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod drift;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod media;
pub mod preview;
pub mod script;
pub mod timecode;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, TimelineError};
pub use export::{ExportFormat, Exporter, emit_automation_script, emit_edl, emit_fcpxml};
pub use preview::{build_preview, parse_preview};
pub use script::{Scene, SceneText, Shot};
pub use timecode::{FrameRate, to_ms, to_timecode};
pub use timeline::{AssemblyOptions, ShotDurations, Timeline, assemble};
