/*!
 * CMX 3600 edit decision list.
 *
 * One video event per shot, a single audio event for the narration mix, and
 * comment lines for scene markers, clip names and narration. Speed changes
 * are not authored; a stretched clip only gets a `* VIDEO CLIP:` note.
 */

use crate::app_config::EdlRecordBase;
use crate::media::MediaProbe;
use crate::timecode::to_timecode;
use crate::timeline::Timeline;

use super::ExportSettings;

const ZERO_TC: &str = "00:00:00:00";

/// Render the timeline as CMX 3600 text with default settings
pub fn emit_edl(timeline: &Timeline, probe: &dyn MediaProbe) -> String {
    emit_edl_with(timeline, probe, &ExportSettings::default())
}

/// Render the timeline as CMX 3600 text
pub fn emit_edl_with(timeline: &Timeline, probe: &dyn MediaProbe, settings: &ExportSettings) -> String {
    let fps = timeline.fps;
    let mut lines = vec![
        format!("TITLE: {}", ascii_safe(&timeline.project_name)),
        "FCM: NON-DROP FRAME".to_string(),
        String::new(),
    ];

    let mut event_number = 1;

    for scene in &timeline.scenes {
        lines.push(format!(
            "* MARKER: SCENE {} - {}",
            scene.scene_number,
            ascii_safe(&scene.scene_title)
        ));
        lines.push(String::new());

        for shot in &scene.shots {
            let media = probe.probe(scene.scene_number, shot.shot_number);
            let (record_in, record_out) = match settings.edl_record_base {
                EdlRecordBase::Scene => (
                    to_timecode(shot.start_ms.saturating_sub(scene.start_ms), fps),
                    to_timecode(shot.end_ms.saturating_sub(scene.start_ms), fps),
                ),
                EdlRecordBase::Timeline => (shot.start_timecode.clone(), shot.end_timecode.clone()),
            };

            // EventNum Reel Track Edit SourceIn SourceOut RecordIn RecordOut
            lines.push(format!(
                "{:03}  AX       V     C        {} {} {} {}",
                event_number,
                ZERO_TC,
                to_timecode(shot.duration_ms, fps),
                record_in,
                record_out
            ));
            lines.push(format!(
                "* FROM CLIP NAME: {}",
                media.clip_name(scene.scene_number, shot.shot_number)
            ));

            if !shot.narration_preview.trim().is_empty() {
                lines.push(format!("* NARRATION: {}", ascii_safe(&shot.narration_preview)));
            }

            if let Some(clip_ms) = media.clip_duration_ms {
                if media.is_video() && clip_ms > 0 && clip_ms < shot.duration_ms {
                    lines.push(format!(
                        "* VIDEO CLIP: {:.2}s source -> stretch to {:.2}s (speed {:.1}%)",
                        clip_ms as f64 / 1000.0,
                        shot.duration_ms as f64 / 1000.0,
                        clip_ms as f64 / shot.duration_ms as f64 * 100.0
                    ));
                }
            }

            lines.push(String::new());
            event_number += 1;
        }
    }

    let total_tc = &timeline.total_duration_timecode;
    lines.push("* AUDIO TRACK".to_string());
    lines.push(String::new());
    lines.push(format!(
        "{:03}  AX       AA    C        {} {} {} {}",
        event_number, ZERO_TC, total_tc, ZERO_TC, total_tc
    ));
    lines.push(format!("* FROM CLIP NAME: {}", ascii_safe(&settings.narration_mix_name())));
    lines.push(String::new());

    lines.join("\n")
}

/// Single-line ASCII rendering for EDL comments
fn ascii_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}
