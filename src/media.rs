use std::path::{Path, PathBuf};

use crate::app_config::MediaConfig;
use crate::file_utils::FileManager;

// @module: Shot media lookup (rendered clip or still image)

/// Kind of media backing a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

/// Media reference returned by a probe
#[derive(Debug, Clone, PartialEq)]
pub struct ShotMedia {
    pub kind: MediaKind,
    pub path: PathBuf,
    /// Length of the underlying clip, known for rendered videos only
    pub clip_duration_ms: Option<u64>,
}

impl ShotMedia {
    pub fn video(path: impl Into<PathBuf>, clip_duration_ms: u64) -> Self {
        Self {
            kind: MediaKind::Video,
            path: path.into(),
            clip_duration_ms: Some(clip_duration_ms),
        }
    }

    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: MediaKind::Image,
            path: path.into(),
            clip_duration_ms: None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Flat clip name, e.g. `scene_01_shot_02.mp4`
    pub fn clip_name(&self, scene_number: u32, shot_number: u32) -> String {
        let stem = format!("scene_{:02}_shot_{:02}", scene_number, shot_number);
        match self.extension().as_str() {
            "" => stem,
            ext => format!("{}.{}", stem, ext),
        }
    }

    /// Absolute `file://` URL of the media
    pub fn file_url(&self) -> String {
        let absolute = if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.path))
                .unwrap_or_else(|_| self.path.clone())
        };
        format!("file://{}", absolute.to_string_lossy())
    }

    /// Speed factor needed to fill `slot_ms` with this clip, if it is a clip
    /// that differs in length from the slot
    pub fn stretch_ratio(&self, slot_ms: u64) -> Option<f64> {
        match self.clip_duration_ms {
            Some(clip_ms) if clip_ms > 0 && clip_ms != slot_ms => Some(slot_ms as f64 / clip_ms as f64),
            _ => None,
        }
    }
}

/// Answers "is there a rendered clip for this shot, or only a still?"
pub trait MediaProbe {
    fn probe(&self, scene_number: u32, shot_number: u32) -> ShotMedia;
}

impl<F> MediaProbe for F
where
    F: Fn(u32, u32) -> ShotMedia,
{
    fn probe(&self, scene_number: u32, shot_number: u32) -> ShotMedia {
        self(scene_number, shot_number)
    }
}

/// Probe backed by a project's `videos/` and `images/` directories.
///
/// Layout: `<project>/videos/scene_NN/shot_NN.<ext>` and
/// `<project>/images/scene_NN/shot_NN.<ext>`.
#[derive(Debug, Clone)]
pub struct ProjectMediaProbe {
    project_dir: PathBuf,
    media: MediaConfig,
}

impl ProjectMediaProbe {
    pub fn new<P: AsRef<Path>>(project_dir: P, media: MediaConfig) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            media,
        }
    }

    pub fn video_path(&self, scene_number: u32, shot_number: u32) -> PathBuf {
        self.shot_path("videos", scene_number, shot_number, &self.media.video_extension)
    }

    pub fn image_path(&self, scene_number: u32, shot_number: u32) -> PathBuf {
        self.shot_path("images", scene_number, shot_number, &self.media.image_extension)
    }

    pub fn narration_mix_path(&self) -> PathBuf {
        self.project_dir.join("audio").join(&self.media.narration_mix_file)
    }

    fn shot_path(&self, root: &str, scene_number: u32, shot_number: u32, extension: &str) -> PathBuf {
        self.project_dir
            .join(root)
            .join(format!("scene_{:02}", scene_number))
            .join(format!("shot_{:02}.{}", shot_number, extension.trim_start_matches('.')))
    }
}

impl MediaProbe for ProjectMediaProbe {
    fn probe(&self, scene_number: u32, shot_number: u32) -> ShotMedia {
        let video = self.video_path(scene_number, shot_number);
        if FileManager::file_exists(&video) {
            ShotMedia::video(video, self.media.source_clip_duration_ms)
        } else {
            ShotMedia::image(self.image_path(scene_number, shot_number))
        }
    }
}
