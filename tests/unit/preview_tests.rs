/*!
 * Tests for the script preview builder and parser
 */

use reelcut::preview::{ParseWarning, build_preview, parse_preview, parse_preview_report};
use reelcut::script::{Scene, SceneText, Shot, scenes_from_texts};

use crate::common;

#[test]
fn test_buildPreview_withTwoScenes_shouldPlaceHeadersAndPauses() {
    let preview = build_preview(&common::sample_scenes(), 0.5, 1.0);
    let expected = "=== SCENE 1: Opening ===\n\
                    \n\
                    The city wakes before sunrise.\n\
                    \n\
                    [PAUSE 0.5s]\n\
                    \n\
                    Street vendors set up their stalls.\n\
                    \n\
                    [PAUSE 1s]\n\
                    \n\
                    === SCENE 2: Market ===\n\
                    \n\
                    By noon the market is crowded.\n\
                    \n\
                    [PAUSE 0.5s]\n\
                    \n\
                    Prices change with every conversation.";
    assert_eq!(preview, expected);
}

#[test]
fn test_parsePreview_withUneditedPreview_shouldRecoverScenes() {
    let scenes = common::sample_scenes();
    let parsed = parse_preview(&build_preview(&scenes, 0.5, 1.0));

    let expected: Vec<SceneText> = scenes.iter().map(SceneText::from).collect();
    assert_eq!(parsed, expected);
}

#[test]
fn test_parsePreview_withEditedPauseValues_shouldIgnoreThem() {
    let scenes = common::sample_scenes();
    let original = build_preview(&scenes, 0.5, 1.0);
    let edited = original.replace("[PAUSE 0.5s]", "[PAUSE 3s]").replace("[PAUSE 1s]", "[PAUSE]");

    assert_eq!(parse_preview(&edited), parse_preview(&original));
}

#[test]
fn test_parsePreview_withEmptyShots_shouldDropThemAndRenumber() {
    let scenes = vec![Scene::new(
        3,
        "Gaps",
        vec![Shot::new(1, "First."), Shot::new(2, "   "), Shot::new(3, "Third.")],
    )];
    let parsed = parse_preview(&build_preview(&scenes, 0.5, 1.0));

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].scene_number, 3);
    assert_eq!(parsed[0].narrations, vec!["First.", "Third."]);

    let rebuilt = scenes_from_texts(&parsed);
    let numbers: Vec<u32> = rebuilt[0].shots.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn test_parsePreview_withMultiLineNarration_shouldKeepInternalNewlines() {
    let text = "=== SCENE 1: A ===\n\nline one\nline two\n\n[PAUSE 0.5s]\n\nnext";
    let parsed = parse_preview(text);

    assert_eq!(parsed[0].narrations, vec!["line one\nline two", "next"]);
}

#[test]
fn test_parsePreview_withNoHeaders_shouldReturnNoScenes() {
    let report = parse_preview_report("Just some text.\n\n[PAUSE 1s]\n\nMore text.");

    assert!(report.scenes.is_empty());
    assert!(matches!(report.warnings[0], ParseWarning::TextBeforeFirstHeader { line: 1 }));
}

#[test]
fn test_parsePreview_withEmptyInput_shouldReturnNoScenes() {
    let report = parse_preview_report("");
    assert!(report.scenes.is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_parsePreviewReport_withDuplicateAndEmptyScenes_shouldWarn() {
    let text = "=== SCENE 1: A ===\n\none\n\n=== SCENE 1: Again ===\n\n=== SCENE 2: B ===\n\ntwo";
    let report = parse_preview_report(text);

    assert_eq!(report.scenes.len(), 3);
    assert_eq!(report.shot_count(), 2);
    assert!(report.warnings.contains(&ParseWarning::DuplicateSceneNumber {
        line: 5,
        scene_number: 1
    }));
    assert!(report.warnings.contains(&ParseWarning::EmptyScene { scene_number: 1 }));
}

#[test]
fn test_parsePreview_withHeaderWithoutTitle_shouldKeepEmptyTitle() {
    let parsed = parse_preview("=== SCENE 4:  ===\n\nText.");
    assert_eq!(parsed[0].scene_number, 4);
    assert_eq!(parsed[0].title, "");
}

#[test]
fn test_parsePreview_withPaddedTitle_shouldKeepTitleWhitespace() {
    let scenes = vec![Scene::new(1, " Intro ", vec![Shot::new(1, "Hello.")])];
    let preview = build_preview(&scenes, 0.5, 1.0);
    assert!(preview.starts_with("=== SCENE 1:  Intro  ==="));

    let parsed = parse_preview(&preview);
    assert_eq!(parsed[0].title, " Intro ");
}

fn round_trip_fixtures() -> Vec<Vec<Scene>> {
    vec![
        common::sample_scenes(),
        vec![
            Scene::new(1, "Cold open", vec![Shot::new(1, "Before anything.")]),
            Scene::new(2, "Nothing yet", vec![]),
            Scene::new(3, "After", vec![Shot::new(1, "Then it starts.")]),
        ],
        vec![Scene::new(
            1,
            "Verse",
            vec![
                Shot::new(1, "line one\nline two\nline three"),
                Shot::new(2, "Single line."),
            ],
        )],
        vec![
            Scene::new(3, "Part 2: Return", vec![Shot::new(1, "Back again."), Shot::new(2, "Still here.")]),
            Scene::new(7, "A === B", vec![Shot::new(1, "Equals in the title.")]),
        ],
    ]
}

#[test]
fn test_parsePreview_withVariousPausesAndFixtures_shouldRoundTrip() {
    for (shot_pause, scene_pause) in [(0.0, 0.0), (0.25, 3.0), (2.5, 0.1), (10.0, 0.0)] {
        for scenes in round_trip_fixtures() {
            let preview = build_preview(&scenes, shot_pause, scene_pause);
            let report = parse_preview_report(&preview);

            let expected: Vec<SceneText> = scenes.iter().map(SceneText::from).collect();
            assert_eq!(
                report.scenes, expected,
                "pauses ({}, {}) changed the script:\n{}",
                shot_pause, scene_pause, preview
            );
            assert!(
                report
                    .warnings
                    .iter()
                    .all(|w| matches!(w, ParseWarning::EmptyScene { .. })),
                "unexpected warnings {:?}",
                report.warnings
            );
        }
    }
}
