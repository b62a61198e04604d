use serde::{Deserialize, Serialize};

// @module: Scene/shot script model handed over by the production pipeline

/// A single shot: one narration block backed by one audio clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    // @field: Shot number, 1-indexed, unique within the scene
    pub number: u32,

    // @field: Voice-over text
    #[serde(default)]
    pub narration: String,
}

impl Shot {
    pub fn new(number: u32, narration: impl Into<String>) -> Self {
        Self {
            number,
            narration: narration.into(),
        }
    }

    /// Shots with blank narration contribute no audio
    pub fn has_narration(&self) -> bool {
        !self.narration.trim().is_empty()
    }
}

/// A scene: a titled, ordered group of shots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    // @field: Scene number, 1-indexed
    pub number: u32,

    // @field: Scene title as shown in headers and bins
    pub title: String,

    // @field: Shots in playback order
    #[serde(default)]
    pub shots: Vec<Shot>,
}

impl Scene {
    pub fn new(number: u32, title: impl Into<String>, shots: Vec<Shot>) -> Self {
        Self {
            number,
            title: title.into(),
            shots,
        }
    }
}

/// Narration of one scene as recovered from the preview text.
///
/// Holds only the ordered narration strings; shot numbers are not part of the
/// editable text and are reassigned on conversion back to a [`Scene`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneText {
    pub scene_number: u32,
    pub title: String,
    pub narrations: Vec<String>,
}

impl SceneText {
    /// Rebuild a scene with shots numbered 1..n in narration order
    pub fn to_scene(&self) -> Scene {
        let shots = self
            .narrations
            .iter()
            .enumerate()
            .map(|(idx, narration)| Shot::new(idx as u32 + 1, narration.clone()))
            .collect();

        Scene::new(self.scene_number, self.title.clone(), shots)
    }
}

/// Same shape the preview parser yields: blank shots dropped, text trimmed
impl From<&Scene> for SceneText {
    fn from(scene: &Scene) -> Self {
        Self {
            scene_number: scene.number,
            title: scene.title.clone(),
            narrations: scene
                .shots
                .iter()
                .filter(|s| s.has_narration())
                .map(|s| s.narration.trim().to_string())
                .collect(),
        }
    }
}

/// Convert parsed scene texts back into the scene/shot model
pub fn scenes_from_texts(texts: &[SceneText]) -> Vec<Scene> {
    texts.iter().map(SceneText::to_scene).collect()
}
