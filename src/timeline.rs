/*!
 * Production timeline: absolute millisecond positions and timecodes for
 * every scene and shot, assembled from the script and the measured narration
 * audio durations.
 *
 * A timeline is built once per audio generation run, persisted as JSON and
 * never mutated afterwards. Exporters only read it.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::app_config::Config;
use crate::errors::TimelineError;
use crate::file_utils::FileManager;
use crate::script::Scene;
use crate::timecode::{FrameRate, to_timecode};

/// Placement of a single shot on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotTimeline {
    pub shot_number: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
    pub start_timecode: String,
    pub end_timecode: String,
    /// Narration shortened for comments and markers
    #[serde(default)]
    pub narration_preview: String,
}

/// Placement of a scene and its shots on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTimeline {
    pub scene_number: u32,
    pub scene_title: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
    pub start_timecode: String,
    pub end_timecode: String,
    pub shots: Vec<ShotTimeline>,
}

/// Root export artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub project_name: String,
    pub total_duration_ms: u64,
    pub total_duration_timecode: String,
    pub fps: FrameRate,
    /// Free-form assembly settings recorded by the caller
    #[serde(default)]
    pub settings: Map<String, Value>,
    pub scenes: Vec<SceneTimeline>,
}

/// Measured narration duration per `(scene_number, shot_number)`
#[derive(Debug, Clone, Default)]
pub struct ShotDurations {
    durations_ms: HashMap<(u32, u32), u64>,
}

impl ShotDurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ms(&mut self, scene_number: u32, shot_number: u32, duration_ms: u64) {
        self.durations_ms.insert((scene_number, shot_number), duration_ms);
    }

    /// Record an audio duration reported in seconds, rounded to the millisecond.
    ///
    /// Negative, non-finite and out-of-range values are rejected.
    pub fn insert_seconds(&mut self, scene_number: u32, shot_number: u32, seconds: f64) -> Result<(), TimelineError> {
        let ms = (seconds * 1000.0).round();
        if !ms.is_finite() || seconds < 0.0 || ms >= u64::MAX as f64 {
            return Err(TimelineError::InvalidDuration {
                scene_number,
                shot_number,
                seconds,
            });
        }
        self.insert_ms(scene_number, shot_number, ms as u64);
        Ok(())
    }

    /// Build the lookup from durations-file entries, stopping at the first bad value
    pub fn try_from_entries<I: IntoIterator<Item = ShotDurationEntry>>(entries: I) -> Result<Self, TimelineError> {
        let mut durations = Self::new();
        for entry in entries {
            durations.insert_seconds(entry.scene_number, entry.shot_number, entry.duration_s)?;
        }
        Ok(durations)
    }

    pub fn get(&self, scene_number: u32, shot_number: u32) -> Option<u64> {
        self.durations_ms.get(&(scene_number, shot_number)).copied()
    }

    pub fn len(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations_ms.is_empty()
    }
}

/// One line of a durations file as written by the audio generation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotDurationEntry {
    pub scene_number: u32,
    pub shot_number: u32,
    pub duration_s: f64,
}

/// Parameters of a single assembly run
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub project_name: String,
    pub fps: FrameRate,
    pub inter_shot_pause_ms: u64,
    pub inter_scene_pause_ms: u64,
    /// Maximum characters kept in `narration_preview`
    pub narration_preview_chars: usize,
}

impl AssemblyOptions {
    pub fn from_config(config: &Config) -> Result<Self, TimelineError> {
        Ok(Self {
            project_name: config.project_name.clone(),
            fps: FrameRate::new(config.fps)?,
            inter_shot_pause_ms: seconds_to_ms(config.inter_shot_pause_s),
            inter_scene_pause_ms: seconds_to_ms(config.inter_scene_pause_s),
            narration_preview_chars: config.narration_preview_chars,
        })
    }
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            project_name: "Untitled".to_string(),
            fps: FrameRate::default(),
            inter_shot_pause_ms: 500,
            inter_scene_pause_ms: 1000,
            narration_preview_chars: 100,
        }
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Shorten narration for embedding in comments and markers
pub fn narration_preview(narration: &str, max_chars: usize) -> String {
    let trimmed = narration.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Move the clock forward, naming the shot being placed when it runs out
fn advance(current_ms: u64, by_ms: u64, scene_number: u32, shot_number: u32) -> Result<u64, TimelineError> {
    current_ms.checked_add(by_ms).ok_or(TimelineError::DurationOverflow {
        scene_number,
        shot_number,
    })
}

/// Lay scenes and shots out on a single timeline.
///
/// Narrated shots advance the clock by their measured duration; blank shots
/// are recorded with zero length. Pauses separate consecutive shots within a
/// scene and consecutive scenes. A narrated shot without a duration is an
/// error, never a silent zero.
pub fn assemble(scenes: &[Scene], durations: &ShotDurations, options: &AssemblyOptions) -> Result<Timeline, TimelineError> {
    let fps = options.fps;
    let mut current_ms: u64 = 0;
    let mut scene_timelines = Vec::with_capacity(scenes.len());

    for (scene_idx, scene) in scenes.iter().enumerate() {
        if scene_idx > 0 && scene.number <= scenes[scene_idx - 1].number {
            return Err(TimelineError::NumberingOrder(format!(
                "scene {} follows scene {}",
                scene.number,
                scenes[scene_idx - 1].number
            )));
        }

        let scene_start_ms = current_ms;
        let mut shot_timelines = Vec::with_capacity(scene.shots.len());

        for (shot_idx, shot) in scene.shots.iter().enumerate() {
            if shot_idx > 0 && shot.number <= scene.shots[shot_idx - 1].number {
                return Err(TimelineError::NumberingOrder(format!(
                    "scene {}: shot {} follows shot {}",
                    scene.number,
                    shot.number,
                    scene.shots[shot_idx - 1].number
                )));
            }

            let shot_start_ms = current_ms;
            if shot.has_narration() {
                let duration_ms = durations.get(scene.number, shot.number).ok_or(
                    TimelineError::MissingShotDuration {
                        scene_number: scene.number,
                        shot_number: shot.number,
                    },
                )?;
                current_ms = advance(current_ms, duration_ms, scene.number, shot.number)?;
            }
            let shot_end_ms = current_ms;

            shot_timelines.push(ShotTimeline {
                shot_number: shot.number,
                start_ms: shot_start_ms,
                end_ms: shot_end_ms,
                duration_ms: shot_end_ms - shot_start_ms,
                start_timecode: to_timecode(shot_start_ms, fps),
                end_timecode: to_timecode(shot_end_ms, fps),
                narration_preview: narration_preview(&shot.narration, options.narration_preview_chars),
            });

            if let Some(next) = scene.shots.get(shot_idx + 1) {
                current_ms = advance(current_ms, options.inter_shot_pause_ms, scene.number, next.number)?;
            }
        }

        let scene_end_ms = current_ms;
        debug!(
            "Scene {} placed at {}..{}ms with {} shots",
            scene.number,
            scene_start_ms,
            scene_end_ms,
            shot_timelines.len()
        );

        scene_timelines.push(SceneTimeline {
            scene_number: scene.number,
            scene_title: scene.title.clone(),
            start_ms: scene_start_ms,
            end_ms: scene_end_ms,
            duration_ms: scene_end_ms - scene_start_ms,
            start_timecode: to_timecode(scene_start_ms, fps),
            end_timecode: to_timecode(scene_end_ms, fps),
            shots: shot_timelines,
        });

        if let Some(next) = scenes.get(scene_idx + 1) {
            let first_shot = next.shots.first().map_or(0, |s| s.number);
            current_ms = advance(current_ms, options.inter_scene_pause_ms, next.number, first_shot)?;
        }
    }

    let mut settings = Map::new();
    settings.insert("inter_shot_pause_s".to_string(), Value::from(options.inter_shot_pause_ms as f64 / 1000.0));
    settings.insert("inter_scene_pause_s".to_string(), Value::from(options.inter_scene_pause_ms as f64 / 1000.0));
    settings.insert("narration_preview_chars".to_string(), Value::from(options.narration_preview_chars as u64));

    Ok(Timeline {
        project_name: options.project_name.clone(),
        total_duration_ms: current_ms,
        total_duration_timecode: to_timecode(current_ms, fps),
        fps,
        settings,
        scenes: scene_timelines,
    })
}

impl Timeline {
    /// Load a persisted timeline artifact.
    ///
    /// A missing file and an unusable file are reported as different errors.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TimelineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TimelineError::MissingTimeline {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| TimelineError::io("read timeline data", path, e))?;
        let timeline: Timeline = serde_json::from_str(&content).map_err(|e| {
            let reason = if e.is_syntax() || e.is_eof() {
                format!("Invalid JSON: {}", e)
            } else {
                format!("Incomplete timeline structure: {}", e)
            };
            TimelineError::MalformedTimeline {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        info!("Loaded timeline data from {:?}", path);
        Ok(timeline)
    }

    /// Persist the timeline as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TimelineError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| TimelineError::MalformedTimeline {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        FileManager::write_artifact(path, &json, "write timeline data")?;
        info!("Saved timeline to {:?}", path);
        Ok(())
    }

    pub fn shot_count(&self) -> usize {
        self.scenes.iter().map(|s| s.shots.len()).sum()
    }

    /// All shots in playback order, paired with their scene
    pub fn shots(&self) -> impl Iterator<Item = (&SceneTimeline, &ShotTimeline)> {
        self.scenes
            .iter()
            .flat_map(|scene| scene.shots.iter().map(move |shot| (scene, shot)))
    }

    /// Check ordering and gaps that hold regardless of pause settings
    pub fn check_monotonic(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut previous_scene: Option<&SceneTimeline> = None;

        for scene in &self.scenes {
            if scene.end_ms < scene.start_ms || scene.duration_ms != scene.end_ms.saturating_sub(scene.start_ms) {
                violations.push(format!("scene {}: inconsistent interval", scene.scene_number));
            }
            if let Some(prev) = previous_scene {
                if scene.scene_number <= prev.scene_number {
                    violations.push(format!("scene {} follows scene {}", scene.scene_number, prev.scene_number));
                }
                if scene.start_ms < prev.end_ms {
                    violations.push(format!("scene {} overlaps scene {}", scene.scene_number, prev.scene_number));
                }
            }

            let mut previous_shot: Option<&ShotTimeline> = None;
            for shot in &scene.shots {
                if shot.end_ms < shot.start_ms || shot.duration_ms != shot.end_ms.saturating_sub(shot.start_ms) {
                    violations.push(format!(
                        "scene {} shot {}: inconsistent interval",
                        scene.scene_number, shot.shot_number
                    ));
                }
                if shot.start_ms < scene.start_ms || shot.end_ms > scene.end_ms {
                    violations.push(format!(
                        "scene {} shot {}: outside its scene",
                        scene.scene_number, shot.shot_number
                    ));
                }
                if let Some(prev) = previous_shot {
                    if shot.shot_number <= prev.shot_number {
                        violations.push(format!(
                            "scene {}: shot {} follows shot {}",
                            scene.scene_number, shot.shot_number, prev.shot_number
                        ));
                    }
                    if shot.start_ms < prev.end_ms {
                        violations.push(format!(
                            "scene {}: shot {} overlaps shot {}",
                            scene.scene_number, shot.shot_number, prev.shot_number
                        ));
                    }
                }
                previous_shot = Some(shot);
            }

            previous_scene = Some(scene);
        }

        let last_end = self.scenes.last().map(|s| s.end_ms).unwrap_or(0);
        if self.total_duration_ms != last_end {
            violations.push(format!(
                "total duration {}ms does not match final scene end {}ms",
                self.total_duration_ms, last_end
            ));
        }

        violations
    }

    /// Check the exact gap structure produced by [`assemble`] with the given pauses
    pub fn check_invariants(&self, inter_shot_pause_ms: u64, inter_scene_pause_ms: u64) -> Vec<String> {
        let mut violations = self.check_monotonic();

        for (idx, scene) in self.scenes.iter().enumerate() {
            for pair in scene.shots.windows(2) {
                if pair[0].end_ms.checked_add(inter_shot_pause_ms) != Some(pair[1].start_ms) {
                    violations.push(format!(
                        "scene {}: gap between shots {} and {} is not {}ms",
                        scene.scene_number, pair[0].shot_number, pair[1].shot_number, inter_shot_pause_ms
                    ));
                }
            }
            if let Some(first) = scene.shots.first() {
                if first.start_ms != scene.start_ms {
                    violations.push(format!("scene {}: first shot does not start the scene", scene.scene_number));
                }
            }
            if let Some(last) = scene.shots.last() {
                if last.end_ms != scene.end_ms {
                    violations.push(format!("scene {}: last shot does not end the scene", scene.scene_number));
                }
            }
            if let Some(next) = self.scenes.get(idx + 1) {
                if scene.end_ms.checked_add(inter_scene_pause_ms) != Some(next.start_ms) {
                    violations.push(format!(
                        "gap between scenes {} and {} is not {}ms",
                        scene.scene_number, next.scene_number, inter_scene_pause_ms
                    ));
                }
            }
        }

        violations
    }
}
