use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::drift::{DriftReport, narration_fingerprint};
use crate::export::{ExportFormat, Exporter};
use crate::file_utils::FileManager;
use crate::preview::{ParseReport, build_preview, parse_preview_report};
use crate::script::{Scene, SceneText};
use crate::timeline::{AssemblyOptions, ShotDurationEntry, ShotDurations, Timeline, assemble};

// @module: Application controller for project workflows

// @const: Timeline settings key holding the narration fingerprint
pub const FINGERPRINT_KEY: &str = "narration_fingerprint";

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the scene/shot script snapshot (JSON array of scenes)
    pub fn load_scenes<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Scene>> {
        let content = FileManager::read_to_string(&path)?;
        let scenes: Vec<Scene> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scenes file: {:?}", path.as_ref()))?;
        debug!("Loaded {} scenes from {:?}", scenes.len(), path.as_ref());
        Ok(scenes)
    }

    /// Load measured narration durations (JSON array of entries in seconds)
    pub fn load_durations<P: AsRef<Path>>(&self, path: P) -> Result<ShotDurations> {
        let content = FileManager::read_to_string(&path)?;
        let entries: Vec<ShotDurationEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse durations file: {:?}", path.as_ref()))?;
        let durations = ShotDurations::try_from_entries(entries)
            .with_context(|| format!("Unusable durations file: {:?}", path.as_ref()))?;
        debug!("Loaded {} shot durations from {:?}", durations.len(), path.as_ref());
        Ok(durations)
    }

    /// Render the editable preview with the configured pauses
    pub fn build_preview(&self, scenes: &[Scene]) -> String {
        build_preview(scenes, self.config.inter_shot_pause_s, self.config.inter_scene_pause_s)
    }

    /// Write the preview for `scenes` to `output`
    pub fn write_preview<P: AsRef<Path>>(&self, scenes: &[Scene], output: P) -> Result<()> {
        let preview = self.build_preview(scenes);
        FileManager::write_to_file(&output, &preview)?;
        info!("Wrote preview for {} scenes to {:?}", scenes.len(), output.as_ref());
        Ok(())
    }

    /// Parse an edited preview file, logging every leniency warning
    pub fn parse_preview_file<P: AsRef<Path>>(&self, path: P) -> Result<ParseReport> {
        let content = FileManager::read_to_string(&path)?;
        let report = parse_preview_report(&content);
        for warning in &report.warnings {
            warn!("{:?}: {}", path.as_ref(), warning);
        }
        info!(
            "Parsed {} scenes with {} shots from {:?}",
            report.scenes.len(),
            report.shot_count(),
            path.as_ref()
        );
        Ok(report)
    }

    /// Assemble the timeline for a project and persist it
    pub fn generate_timeline<P: AsRef<Path>>(
        &self,
        project_dir: P,
        scenes: &[Scene],
        durations: &ShotDurations,
    ) -> Result<Timeline> {
        let options = AssemblyOptions::from_config(&self.config)?;
        let mut timeline = assemble(scenes, durations, &options)?;

        for violation in timeline.check_invariants(options.inter_shot_pause_ms, options.inter_scene_pause_ms) {
            warn!("Timeline invariant violated: {}", violation);
        }

        let texts: Vec<SceneText> = scenes.iter().map(SceneText::from).collect();
        timeline
            .settings
            .insert(FINGERPRINT_KEY.to_string(), Value::from(narration_fingerprint(&texts)));

        let path = FileManager::timeline_path(&project_dir);
        timeline.save(&path)?;
        info!(
            "Timeline: {} scenes, {} shots, {}",
            timeline.scenes.len(),
            timeline.shot_count(),
            timeline.total_duration_timecode
        );
        Ok(timeline)
    }

    /// Whether the narration in `texts` still matches the one the project's
    /// timeline was assembled from. `None` when the timeline carries no
    /// fingerprint.
    pub fn narration_matches_timeline<P: AsRef<Path>>(&self, project_dir: P, texts: &[SceneText]) -> Result<Option<bool>> {
        let timeline = Timeline::load(FileManager::timeline_path(&project_dir))?;
        let stored = timeline.settings.get(FINGERPRINT_KEY).and_then(Value::as_str);
        Ok(stored.map(|fingerprint| fingerprint == narration_fingerprint(texts)))
    }

    /// Structural diff between the original script and an edited preview
    pub fn drift_report(&self, baseline: &[Scene], parsed: &[SceneText]) -> DriftReport {
        let before: Vec<SceneText> = baseline.iter().map(SceneText::from).collect();
        let report = DriftReport::compare(&before, parsed);
        if report.has_drift() {
            warn!("Narration drift detected: {}", report);
        }
        report
    }

    /// Write the requested editor artifacts into `<project>/exports/`
    pub fn export<P: AsRef<Path>>(&self, project_dir: P, formats: &[ExportFormat]) -> Result<Vec<PathBuf>> {
        let exporter = Exporter::new(&project_dir, &self.config);
        let written = exporter
            .export(formats)
            .with_context(|| format!("Export failed for project {:?}", project_dir.as_ref()))?;
        Ok(written)
    }
}
