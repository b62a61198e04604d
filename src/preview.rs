/*!
 * Editable script preview: a plain-text rendering of scenes and shots with
 * explicit pause markers, and the lenient parser that reads it back.
 *
 * ```text
 * === SCENE 1: INTRO ===
 *
 * First shot narration.
 *
 * [PAUSE 0.5s]
 *
 * Second shot narration.
 *
 * [PAUSE 1s]
 *
 * === SCENE 2: ...
 * ```
 *
 * Pause durations written into the text are cosmetic. The parser accepts any
 * value (or none) and discards it; real pause lengths are passed to the
 * assembler explicitly. There is no escaping: narration containing a line that
 * looks like a scene header or a pause marker will be split there.
 *
 * In a header only one space on each side of the title belongs to the marker;
 * any further whitespace is part of the title.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

use crate::script::{Scene, SceneText};

// @const: Scene header line
static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^===\s*SCENE\s+(\d+)\s*:\s?(.*?)\s?===$").unwrap()
});

// @const: Pause marker line, value optional and ignored
static PAUSE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[\s*PAUSE(?:\s+([0-9]*\.?[0-9]+)\s*s?)?\s*\]$").unwrap()
});

/// Render scenes into the pause-annotated preview text.
///
/// Shots with empty narration still produce an (empty) text block so that
/// the shot boundaries stay visible to the operator.
pub fn build_preview(scenes: &[Scene], inter_shot_pause_s: f64, inter_scene_pause_s: f64) -> String {
    let shot_marker = pause_marker(inter_shot_pause_s);
    let scene_marker = pause_marker(inter_scene_pause_s);
    let headers: Vec<String> = scenes
        .iter()
        .map(|scene| format!("=== SCENE {}: {} ===", scene.number, scene.title))
        .collect();
    let mut lines: Vec<&str> = Vec::new();

    for (scene_idx, scene) in scenes.iter().enumerate() {
        lines.push(&headers[scene_idx]);
        lines.push("");

        for (shot_idx, shot) in scene.shots.iter().enumerate() {
            lines.push(&shot.narration);
            if shot_idx + 1 < scene.shots.len() {
                lines.push("");
                lines.push(&shot_marker);
                lines.push("");
            }
        }

        if scene_idx + 1 < scenes.len() {
            lines.push("");
            lines.push(&scene_marker);
            lines.push("");
        }
    }

    lines.join("\n")
}

fn pause_marker(seconds: f64) -> String {
    format!("[PAUSE {}s]", seconds)
}

/// A lexical unit of the preview text
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewToken {
    /// `=== SCENE <n>: <title> ===`
    Header { number: u32, title: String },
    /// Trimmed, non-empty run of text lines between markers
    Narration(String),
    /// `[PAUSE <n>s]`; the value is kept for display only
    Pause { seconds: Option<f64> },
    /// A header-shaped line whose scene number does not fit
    MalformedHeader(String),
}

/// Split preview text into tokens, each paired with its 1-based line number
pub fn tokenize(text: &str) -> Vec<(usize, PreviewToken)> {
    let mut tokens = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut pending_start = 0;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        let marker = if let Some(caps) = HEADER_REGEX.captures(line) {
            Some(match caps[1].parse::<u32>() {
                Ok(number) => PreviewToken::Header {
                    number,
                    title: caps[2].to_string(),
                },
                Err(_) => PreviewToken::MalformedHeader(line.to_string()),
            })
        } else if let Some(caps) = PAUSE_REGEX.captures(line) {
            Some(PreviewToken::Pause {
                seconds: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            })
        } else {
            None
        };

        match marker {
            Some(token) => {
                flush_narration(&mut pending, pending_start, &mut tokens);
                tokens.push((line_no, token));
            }
            None => {
                if pending.is_empty() {
                    pending_start = line_no;
                }
                pending.push(raw_line);
            }
        }
    }
    flush_narration(&mut pending, pending_start, &mut tokens);

    tokens
}

fn flush_narration(pending: &mut Vec<&str>, start: usize, tokens: &mut Vec<(usize, PreviewToken)>) {
    if pending.is_empty() {
        return;
    }
    let joined = pending.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        // Report the first non-blank line rather than the leading blank
        let offset = pending.iter().take_while(|l| l.trim().is_empty()).count();
        tokens.push((start + offset, PreviewToken::Narration(trimmed.to_string())));
    }
    pending.clear();
}

/// Anomaly noticed while parsing edited preview text
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    /// Narration appeared before any scene header and was dropped
    TextBeforeFirstHeader { line: usize },
    /// Header-shaped line with an unusable scene number; ignored
    MalformedHeader { line: usize, text: String },
    /// The same scene number appears more than once
    DuplicateSceneNumber { line: usize, scene_number: u32 },
    /// A scene header with no narration under it
    EmptyScene { scene_number: u32 },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::TextBeforeFirstHeader { line } => {
                write!(f, "Line {}: text before the first scene header was ignored", line)
            }
            ParseWarning::MalformedHeader { line, text } => {
                write!(f, "Line {}: unusable scene header '{}' was ignored", line, text)
            }
            ParseWarning::DuplicateSceneNumber { line, scene_number } => {
                write!(f, "Line {}: scene {} appears more than once", line, scene_number)
            }
            ParseWarning::EmptyScene { scene_number } => {
                write!(f, "Scene {} has no narration", scene_number)
            }
        }
    }
}

/// Parsed scenes together with everything the parser chose to overlook
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub scenes: Vec<SceneText>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn shot_count(&self) -> usize {
        self.scenes.iter().map(|s| s.narrations.len()).sum()
    }
}

/// Parse (possibly hand-edited) preview text, collecting warnings.
///
/// Never fails: text without any usable scene header yields no scenes.
pub fn parse_preview_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    let mut current: Option<SceneText> = None;
    let mut seen_numbers = HashSet::new();

    for (line, token) in tokenize(text) {
        match token {
            PreviewToken::Header { number, title } => {
                if let Some(scene) = current.take() {
                    finish_scene(scene, &mut report);
                }
                if !seen_numbers.insert(number) {
                    report.warnings.push(ParseWarning::DuplicateSceneNumber {
                        line,
                        scene_number: number,
                    });
                }
                current = Some(SceneText {
                    scene_number: number,
                    title,
                    narrations: Vec::new(),
                });
            }
            PreviewToken::Narration(narration) => match current.as_mut() {
                Some(scene) => scene.narrations.push(narration),
                None => report.warnings.push(ParseWarning::TextBeforeFirstHeader { line }),
            },
            PreviewToken::Pause { .. } => {}
            PreviewToken::MalformedHeader(text) => {
                report.warnings.push(ParseWarning::MalformedHeader { line, text });
            }
        }
    }
    if let Some(scene) = current.take() {
        finish_scene(scene, &mut report);
    }

    debug!(
        "Parsed preview: {} scenes, {} shots, {} warnings",
        report.scenes.len(),
        report.shot_count(),
        report.warnings.len()
    );

    report
}

fn finish_scene(scene: SceneText, report: &mut ParseReport) {
    if scene.narrations.is_empty() {
        report.warnings.push(ParseWarning::EmptyScene {
            scene_number: scene.scene_number,
        });
    }
    report.scenes.push(scene);
}

/// Parse preview text back into scenes, logging any anomalies
pub fn parse_preview(text: &str) -> Vec<SceneText> {
    let report = parse_preview_report(text);
    for warning in &report.warnings {
        warn!("Preview: {}", warning);
    }
    report.scenes
}
