/*!
 * DaVinci Resolve automation script.
 *
 * Emits a standalone Python 3 script for Resolve's scripting API. All
 * timeline data is embedded as literals, so the script needs nothing but the
 * project's media directories next to it. Nothing here runs or checks the
 * target application.
 */

use chrono::Local;

use crate::timeline::Timeline;

use super::ExportSettings;

/// Render the Resolve import script with default settings
pub fn emit_automation_script(timeline: &Timeline, project_name: &str) -> String {
    emit_automation_script_with(timeline, project_name, &ExportSettings::default())
}

/// Render the Resolve import script
pub fn emit_automation_script_with(timeline: &Timeline, project_name: &str, settings: &ExportSettings) -> String {
    let fps = timeline.fps;
    let mut out: Vec<String> = Vec::new();

    out.push("#!/usr/bin/env python3".to_string());
    out.push(format!(
        "\"\"\"Auto-generated DaVinci Resolve import script for {}.\"\"\"",
        py_docstring_safe(project_name)
    ));
    out.push(format!("# Generated {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
    out.push(String::new());
    out.push("import sys".to_string());
    out.push("from pathlib import Path".to_string());
    out.push(String::new());
    out.push("try:".to_string());
    out.push("    import DaVinciResolveScript as dvr_script".to_string());
    out.push("except ImportError:".to_string());
    out.push("    print('ERROR: DaVinciResolveScript not found.')".to_string());
    out.push("    print('Make sure DaVinci Resolve is installed and the API is accessible.')".to_string());
    out.push("    sys.exit(1)".to_string());
    out.push(String::new());

    // Embedded timeline data
    out.push(format!("PROJECT_NAME = {}", py_str(project_name)));
    out.push(format!("TIMELINE_NAME = {}", py_str(&format!("{}_Timeline", project_name))));
    out.push(format!("FRAME_RATE = {}", py_str(&fps.to_string())));
    out.push(format!("VIDEO_EXT = {}", py_str(&settings.video_extension)));
    out.push(format!("IMAGE_EXT = {}", py_str(&settings.image_extension)));
    out.push(format!("SOURCE_CLIP_MS = {}", settings.source_clip_duration_ms));
    out.push(format!("NARRATION_FILE = {}", py_str(&settings.narration_mix_name())));
    out.push("SCENES = [".to_string());
    for scene in &timeline.scenes {
        out.push("    {".to_string());
        out.push(format!("        'number': {},", scene.scene_number));
        out.push(format!("        'title': {},", py_str(&scene.scene_title)));
        out.push(format!("        'start_frame': {},", fps.frames_at(scene.start_ms)));
        let shots: Vec<String> = scene
            .shots
            .iter()
            .map(|shot| format!("({}, {})", shot.shot_number, shot.duration_ms))
            .collect();
        out.push(format!("        'shots': [{}],", shots.join(", ")));
        out.push("    },".to_string());
    }
    out.push("]".to_string());
    out.push(String::new());

    out.push(SCRIPT_BODY.to_string());

    out.join("\n")
}

// Runtime part of the script; reads only the constants above
const SCRIPT_BODY: &str = r#"PROJECT_DIR = Path(__file__).resolve().parent.parent


def shot_media(folder, scene_num, shot_num, ext):
    return PROJECT_DIR / folder / f"scene_{scene_num:02d}" / f"shot_{shot_num:02d}.{ext}"


resolve = dvr_script.scriptapp('Resolve')
if not resolve:
    print('ERROR: Could not connect to DaVinci Resolve.')
    print('Make sure DaVinci Resolve is running.')
    sys.exit(1)

project_manager = resolve.GetProjectManager()
project = project_manager.CreateProject(PROJECT_NAME)
if not project:
    print(f'ERROR: Could not create project {PROJECT_NAME}')
    sys.exit(1)

project.SetSetting('timelineFrameRate', FRAME_RATE)

media_pool = project.GetMediaPool()
root_folder = media_pool.GetRootFolder()

audio_path = PROJECT_DIR / 'audio' / NARRATION_FILE
if audio_path.exists():
    media_pool.ImportMedia([str(audio_path)])
    print(f'Imported audio: {audio_path.name}')
else:
    print(f'WARNING: Audio file not found: {audio_path}')

for scene in SCENES:
    bin_name = f"Scene {scene['number']}: {scene['title']}"
    scene_bin = media_pool.AddSubFolder(root_folder, bin_name)
    if not scene_bin:
        print(f'WARNING: Could not create bin: {bin_name}')
        continue
    media_pool.SetCurrentFolder(scene_bin)

    for shot_num, duration_ms in scene['shots']:
        video_path = shot_media('videos', scene['number'], shot_num, VIDEO_EXT)
        image_path = shot_media('images', scene['number'], shot_num, IMAGE_EXT)
        if video_path.exists():
            media_pool.ImportMedia([str(video_path)])
            print(f'  Imported video: {video_path.name}')
            if duration_ms > 0 and duration_ms != SOURCE_CLIP_MS:
                speed = SOURCE_CLIP_MS / duration_ms * 100
                print(f'     -> adjust speed to {speed:.1f}% to fill {duration_ms / 1000:.2f}s')
        elif image_path.exists():
            media_pool.ImportMedia([str(image_path)])
            print(f'  Imported image: {image_path.name}')
        else:
            print(f'  WARNING: Media not found for scene {scene["number"]} shot {shot_num:02d}')

media_pool.SetCurrentFolder(root_folder)
timeline = media_pool.CreateEmptyTimeline(TIMELINE_NAME)
if not timeline:
    print('ERROR: Could not create timeline')
    sys.exit(1)
print(f'Created timeline: {timeline.GetName()}')

for scene in SCENES:
    marker_name = f"Scene {scene['number']}"
    timeline.AddMarker(scene['start_frame'], 'Blue', marker_name, scene['title'], 1)
    print(f"Added marker at frame {scene['start_frame']}: {marker_name}")

print()
print(f'Project: {PROJECT_NAME}')
print(f'Timeline: {TIMELINE_NAME}')
print()
print('Next steps:')
print('1. Add media clips from the scene bins to the timeline')
print('2. Use the exported EDL or FCPXML for exact cut positions')
print('3. Apply speed changes, transitions and effects as needed')
"#;

/// Python string literal; JSON string syntax is a subset of Python's
fn py_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}

fn py_docstring_safe(value: &str) -> String {
    value.replace('\\', "\\\\").replace("\"\"\"", "'''").replace('\n', " ")
}
