use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::timecode::{FrameRate, MAX_FPS, MIN_FPS};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Project name used in exported titles, bins and timelines
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Timeline frame rate (e.g. 24, 25, 29.97, 30)
    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Silence inserted between consecutive shots of a scene, in seconds
    #[serde(default = "default_inter_shot_pause_s")]
    pub inter_shot_pause_s: f64,

    /// Silence inserted between consecutive scenes, in seconds
    #[serde(default = "default_inter_scene_pause_s")]
    pub inter_scene_pause_s: f64,

    /// Maximum narration characters embedded in export comments
    #[serde(default = "default_narration_preview_chars")]
    pub narration_preview_chars: usize,

    /// Media layout settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where rendered media lives inside a project and what it looks like
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    /// Length of every rendered video clip in milliseconds
    ///
    /// The video generator produces fixed-length clips, so a clip usually has
    /// to be time-stretched to fill its narration slot.
    #[serde(default = "default_source_clip_duration_ms")]
    pub source_clip_duration_ms: u64,

    /// Extension of rendered video clips
    #[serde(default = "default_video_extension")]
    pub video_extension: String,

    /// Extension of still images
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Narration mix file name inside the project's `audio/` directory
    #[serde(default = "default_narration_mix_file")]
    pub narration_mix_file: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            source_clip_duration_ms: default_source_clip_duration_ms(),
            video_extension: default_video_extension(),
            image_extension: default_image_extension(),
            narration_mix_file: default_narration_mix_file(),
        }
    }
}

/// Which clock the EDL record in/out columns use
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdlRecordBase {
    /// Offsets from the start of the shot's scene
    #[default]
    Scene,
    /// Absolute positions on the assembled timeline
    Timeline,
}

/// Settings shared by the exporters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExportConfig {
    /// Clock used by EDL record timecodes
    #[serde(default)]
    pub edl_record_base: EdlRecordBase,

    /// FCPXML format width
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,

    /// FCPXML format height
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            edl_record_base: EdlRecordBase::default(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_project_name() -> String {
    "Untitled".to_string()
}

fn default_fps() -> f64 {
    30.0
}

fn default_inter_shot_pause_s() -> f64 {
    0.5
}

fn default_inter_scene_pause_s() -> f64 {
    1.0
}

fn default_narration_preview_chars() -> usize {
    100
}

fn default_source_clip_duration_ms() -> u64 {
    8000 // image-to-video clips are rendered at a fixed 8 seconds
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

fn default_image_extension() -> String {
    "png".to_string()
}

fn default_narration_mix_file() -> String {
    "full_narration.mp3".to_string()
}

fn default_frame_width() -> u32 {
    1920
}

fn default_frame_height() -> u32 {
    1080
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path.as_ref(), config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if FrameRate::new(self.fps).is_err() {
            return Err(anyhow!(
                "Frame rate must be between {} and {} fps, got {}",
                MIN_FPS,
                MAX_FPS,
                self.fps
            ));
        }

        for (name, value) in [
            ("inter_shot_pause_s", self.inter_shot_pause_s),
            ("inter_scene_pause_s", self.inter_scene_pause_s),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow!("{} must be zero or positive, got {}", name, value));
            }
        }

        if self.narration_preview_chars == 0 {
            return Err(anyhow!("narration_preview_chars must be at least 1"));
        }

        if self.media.video_extension.trim().is_empty() || self.media.image_extension.trim().is_empty() {
            return Err(anyhow!("Media file extensions must not be empty"));
        }

        if self.export.frame_width == 0 || self.export.frame_height == 0 {
            return Err(anyhow!("Export frame size must be non-zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            project_name: default_project_name(),
            fps: default_fps(),
            inter_shot_pause_s: default_inter_shot_pause_s(),
            inter_scene_pause_s: default_inter_scene_pause_s(),
            narration_preview_chars: default_narration_preview_chars(),
            media: MediaConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
