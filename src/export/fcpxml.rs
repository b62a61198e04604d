/*!
 * Final Cut Pro XML (version 1.9) document.
 *
 * Durations are frame-rate-relative fractions `<ms>/<fps>000s`. Scene
 * boundaries become spine markers; the narration mix sits alone on audio
 * lane 1 spanning the whole timeline.
 */

use crate::media::MediaProbe;
use crate::timeline::Timeline;

use super::ExportSettings;

/// Render the timeline as FCPXML with default settings
pub fn emit_fcpxml(timeline: &Timeline, probe: &dyn MediaProbe) -> String {
    emit_fcpxml_with(timeline, probe, &ExportSettings::default())
}

/// Render the timeline as FCPXML
pub fn emit_fcpxml_with(timeline: &Timeline, probe: &dyn MediaProbe, settings: &ExportSettings) -> String {
    let fps = timeline.fps;
    let frame_duration = fps.frame_duration();
    let project_name = escape_xml(&timeline.project_name);
    let mut lines: Vec<String> = Vec::new();

    lines.push(r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string());
    lines.push("<!DOCTYPE fcpxml>".to_string());
    lines.push(r#"<fcpxml version="1.9">"#.to_string());
    lines.push("  <resources>".to_string());
    lines.push(format!(
        r#"    <format id="r1" frameDuration="{}" width="{}" height="{}"/>"#,
        frame_duration, settings.frame_width, settings.frame_height
    ));
    lines.push(format!(
        r#"    <asset id="audio1" name="{}" src="{}" hasAudio="1" audioSources="1"/>"#,
        escape_xml(&settings.narration_mix_name()),
        escape_xml(&settings.narration_mix_url())
    ));

    for (asset_idx, (scene, shot)) in timeline.shots().enumerate() {
        let media = probe.probe(scene.scene_number, shot.shot_number);
        lines.push(format!(
            r#"    <asset id="asset{}" name="{}" src="{}"/>"#,
            asset_idx + 1,
            escape_xml(&media.clip_name(scene.scene_number, shot.shot_number)),
            escape_xml(&media.file_url())
        ));
        if let (Some(clip_ms), Some(_)) = (media.clip_duration_ms, media.stretch_ratio(shot.duration_ms)) {
            lines.push(format!(
                "    <!-- Time-stretch: {}ms source to {}ms -->",
                clip_ms, shot.duration_ms
            ));
        }
    }

    lines.push("  </resources>".to_string());
    lines.push("  <library>".to_string());
    lines.push(format!(r#"    <event name="{}">"#, project_name));
    lines.push(format!(r#"      <project name="{}_Timeline">"#, project_name));
    lines.push(r#"        <sequence format="r1">"#.to_string());
    lines.push("          <spine>".to_string());

    let mut asset_id = 1;
    for scene in &timeline.scenes {
        lines.push(format!(
            r#"            <marker start="{}/1000s" duration="{}" value="Scene {}: {}"/>"#,
            scene.start_ms,
            frame_duration,
            scene.scene_number,
            escape_xml(&scene.scene_title)
        ));

        for shot in &scene.shots {
            lines.push(format!(
                r#"            <asset-clip ref="asset{}" duration="{}"/>"#,
                asset_id,
                fps.rational_duration(shot.duration_ms)
            ));
            asset_id += 1;
        }
    }

    lines.push("          </spine>".to_string());
    lines.push(r#"          <audio lane="1">"#.to_string());
    lines.push(format!(
        r#"            <asset-clip ref="audio1" duration="{}"/>"#,
        fps.rational_duration(timeline.total_duration_ms)
    ));
    lines.push("          </audio>".to_string());
    lines.push("        </sequence>".to_string());
    lines.push("      </project>".to_string());
    lines.push("    </event>".to_string());
    lines.push("  </library>".to_string());
    lines.push("</fcpxml>".to_string());

    lines.join("\n")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
