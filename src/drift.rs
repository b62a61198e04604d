/*!
 * Narration drift detection.
 *
 * A timeline is only valid for the narration it was measured from. Editing
 * the preview after audio generation silently invalidates it, so the
 * narration is fingerprinted at assembly time and compared on the next parse.
 */

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::script::SceneText;

/// SHA-256 over scene numbers, titles and trimmed narration, hex encoded
pub fn narration_fingerprint(scenes: &[SceneText]) -> String {
    let mut hasher = Sha256::new();
    for scene in scenes {
        hasher.update(format!("scene:{}:{}\n", scene.scene_number, scene.title.trim()).as_bytes());
        for narration in &scene.narrations {
            hasher.update(narration.trim().as_bytes());
            hasher.update(b"\n");
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Shot-level narration change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedShot {
    pub scene_number: u32,
    pub shot_number: u32,
}

/// Difference between two versions of the narration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    pub added_scenes: Vec<u32>,
    pub removed_scenes: Vec<u32>,
    /// `(scene_number, before, after)` shot counts
    pub shot_count_changes: Vec<(u32, usize, usize)>,
    pub changed_shots: Vec<ChangedShot>,
}

impl DriftReport {
    pub fn compare(before: &[SceneText], after: &[SceneText]) -> Self {
        let before_map: BTreeMap<u32, &SceneText> = before.iter().map(|s| (s.scene_number, s)).collect();
        let after_map: BTreeMap<u32, &SceneText> = after.iter().map(|s| (s.scene_number, s)).collect();
        let mut report = DriftReport::default();

        for (number, old) in &before_map {
            let Some(new) = after_map.get(number) else {
                report.removed_scenes.push(*number);
                continue;
            };

            if old.narrations.len() != new.narrations.len() {
                report
                    .shot_count_changes
                    .push((*number, old.narrations.len(), new.narrations.len()));
            }

            for (idx, (a, b)) in old.narrations.iter().zip(new.narrations.iter()).enumerate() {
                if a.trim() != b.trim() {
                    report.changed_shots.push(ChangedShot {
                        scene_number: *number,
                        shot_number: idx as u32 + 1,
                    });
                }
            }
        }

        report.added_scenes = after_map
            .keys()
            .filter(|n| !before_map.contains_key(*n))
            .copied()
            .collect();

        report
    }

    pub fn has_drift(&self) -> bool {
        !(self.added_scenes.is_empty()
            && self.removed_scenes.is_empty()
            && self.shot_count_changes.is_empty()
            && self.changed_shots.is_empty())
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_drift() {
            return write!(f, "narration unchanged");
        }
        let mut parts = Vec::new();
        if !self.added_scenes.is_empty() {
            parts.push(format!("scenes added: {:?}", self.added_scenes));
        }
        if !self.removed_scenes.is_empty() {
            parts.push(format!("scenes removed: {:?}", self.removed_scenes));
        }
        for (scene, old, new) in &self.shot_count_changes {
            parts.push(format!("scene {} shot count {} -> {}", scene, old, new));
        }
        for shot in &self.changed_shots {
            parts.push(format!("scene {} shot {} narration changed", shot.scene_number, shot.shot_number));
        }
        write!(f, "{}", parts.join("; "))
    }
}
