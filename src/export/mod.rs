/*!
 * Editor export surfaces.
 *
 * Each emitter turns a persisted [`Timeline`] into one text artifact:
 *
 * - `edl`: CMX 3600 edit decision list
 * - `fcpxml`: Final Cut Pro XML 1.9
 * - `resolve_script`: DaVinci Resolve Python import script
 *
 * The [`Exporter`] loads the timeline from a project directory and writes the
 * requested artifacts into `<project>/exports/`.
 */

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, EdlRecordBase};
use crate::errors::TimelineError;
use crate::file_utils::FileManager;
use crate::media::{MediaProbe, ProjectMediaProbe};
use crate::timeline::Timeline;

pub mod edl;
pub mod fcpxml;
pub mod resolve_script;

pub use edl::{emit_edl, emit_edl_with};
pub use fcpxml::{emit_fcpxml, emit_fcpxml_with};
pub use resolve_script::{emit_automation_script, emit_automation_script_with};

/// Values the emitters need beyond the timeline itself
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub edl_record_base: EdlRecordBase,
    /// Narration mix audio file
    pub narration_mix: PathBuf,
    pub frame_width: u32,
    pub frame_height: u32,
    pub video_extension: String,
    pub image_extension: String,
    pub source_clip_duration_ms: u64,
}

impl ExportSettings {
    pub fn from_config<P: AsRef<Path>>(config: &Config, project_dir: P) -> Self {
        Self {
            edl_record_base: config.export.edl_record_base,
            narration_mix: project_dir.as_ref().join("audio").join(&config.media.narration_mix_file),
            frame_width: config.export.frame_width,
            frame_height: config.export.frame_height,
            video_extension: config.media.video_extension.clone(),
            image_extension: config.media.image_extension.clone(),
            source_clip_duration_ms: config.media.source_clip_duration_ms,
        }
    }

    /// File name of the narration mix
    pub fn narration_mix_name(&self) -> String {
        self.narration_mix
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Absolute `file://` URL of the narration mix
    pub fn narration_mix_url(&self) -> String {
        let absolute = if self.narration_mix.is_absolute() {
            self.narration_mix.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.narration_mix))
                .unwrap_or_else(|_| self.narration_mix.clone())
        };
        format!("file://{}", absolute.to_string_lossy())
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), ".")
    }
}

/// Artifact kinds the exporter can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Edl,
    Fcpxml,
    ResolveScript,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Edl, ExportFormat::Fcpxml, ExportFormat::ResolveScript];

    /// File name inside the exports directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Edl => "timeline.edl",
            ExportFormat::Fcpxml => "timeline.fcpxml",
            ExportFormat::ResolveScript => "import_to_resolve.py",
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            ExportFormat::Edl => "write EDL",
            ExportFormat::Fcpxml => "write FCPXML",
            ExportFormat::ResolveScript => "write Resolve script",
        }
    }
}

/// Writes editor artifacts for one project directory
pub struct Exporter {
    project_dir: PathBuf,
    project_name: String,
    settings: ExportSettings,
    probe: Box<dyn MediaProbe>,
}

impl Exporter {
    /// Exporter probing the project's own media directories
    pub fn new<P: AsRef<Path>>(project_dir: P, config: &Config) -> Self {
        let project_dir = project_dir.as_ref().to_path_buf();
        let probe = ProjectMediaProbe::new(&project_dir, config.media.clone());
        Self::with_probe(&project_dir, config, Box::new(probe))
    }

    pub fn with_probe<P: AsRef<Path>>(project_dir: P, config: &Config, probe: Box<dyn MediaProbe>) -> Self {
        let project_dir = project_dir.as_ref().to_path_buf();
        Self {
            settings: ExportSettings::from_config(config, &project_dir),
            project_name: config.project_name.clone(),
            project_dir,
            probe,
        }
    }

    pub fn exports_dir(&self) -> PathBuf {
        FileManager::exports_dir(&self.project_dir)
    }

    /// Load the project's timeline, warning about broken ordering
    pub fn load_timeline(&self) -> Result<Timeline, TimelineError> {
        let timeline = Timeline::load(FileManager::timeline_path(&self.project_dir))?;
        for violation in timeline.check_monotonic() {
            warn!("Timeline inconsistency: {}", violation);
        }
        Ok(timeline)
    }

    /// Render one artifact without touching the filesystem
    pub fn render(&self, timeline: &Timeline, format: ExportFormat) -> String {
        match format {
            ExportFormat::Edl => emit_edl_with(timeline, self.probe.as_ref(), &self.settings),
            ExportFormat::Fcpxml => emit_fcpxml_with(timeline, self.probe.as_ref(), &self.settings),
            ExportFormat::ResolveScript => {
                let name = if timeline.project_name.trim().is_empty() {
                    &self.project_name
                } else {
                    &timeline.project_name
                };
                emit_automation_script_with(timeline, name, &self.settings)
            }
        }
    }

    /// Load the timeline once and write every requested artifact.
    ///
    /// Returns the written paths in request order.
    pub fn export(&self, formats: &[ExportFormat]) -> Result<Vec<PathBuf>, TimelineError> {
        let timeline = self.load_timeline()?;
        let exports_dir = self.exports_dir();
        let mut written = Vec::with_capacity(formats.len());

        for format in formats {
            let path = exports_dir.join(format.file_name());
            let content = self.render(&timeline, *format);
            FileManager::write_artifact(&path, &content, format.operation())?;
            if *format == ExportFormat::ResolveScript {
                FileManager::make_executable(&path)?;
            }
            info!("Exported {:?}", path);
            written.push(path);
        }

        Ok(written)
    }
}
