/*!
 * Tests for timeline assembly and persistence
 */

use anyhow::Result;

use reelcut::errors::TimelineError;
use reelcut::script::{Scene, Shot};
use reelcut::timecode::FrameRate;
use reelcut::timeline::{AssemblyOptions, ShotDurationEntry, ShotDurations, Timeline, assemble};

use crate::common;

fn intervals(timeline: &Timeline) -> Vec<(u64, u64)> {
    timeline.shots().map(|(_, shot)| (shot.start_ms, shot.end_ms)).collect()
}

#[test]
fn test_assemble_withTwoScenes_shouldApplyShotAndScenePauses() {
    let timeline = common::sample_timeline();

    assert_eq!(
        intervals(&timeline),
        vec![(0, 5000), (5500, 11500), (12500, 17500), (18000, 24000)]
    );
    assert_eq!(timeline.scenes[0].start_ms, 0);
    assert_eq!(timeline.scenes[0].end_ms, 11500);
    assert_eq!(timeline.scenes[1].start_ms, 12500);
    assert_eq!(timeline.scenes[1].end_ms, 24000);
    assert_eq!(timeline.total_duration_ms, 24000);
    assert_eq!(timeline.total_duration_timecode, "00:00:24:00");
    assert_eq!(timeline.project_name, "Market Day");
}

#[test]
fn test_assemble_withSampleScript_shouldSatisfyInvariants() {
    let timeline = common::sample_timeline();
    assert!(timeline.check_invariants(500, 1000).is_empty());
    assert!(!timeline.check_invariants(400, 1000).is_empty());
}

#[test]
fn test_assemble_withTimecodes_shouldMatchMilliseconds() {
    let timeline = common::sample_timeline();
    let shot = &timeline.scenes[1].shots[1];

    assert_eq!(shot.start_timecode, "00:00:18:00");
    assert_eq!(shot.end_timecode, "00:00:24:00");
    assert_eq!(timeline.scenes[0].shots[1].start_timecode, "00:00:05:15");
}

#[test]
fn test_assemble_withMissingDuration_shouldFail() {
    let mut durations = ShotDurations::new();
    for (scene, shot, ms) in [(1, 1, 5000), (1, 2, 6000), (2, 1, 5000)] {
        durations.insert_ms(scene, shot, ms);
    }

    let result = assemble(&common::sample_scenes(), &durations, &common::sample_options());
    assert!(matches!(
        result,
        Err(TimelineError::MissingShotDuration {
            scene_number: 2,
            shot_number: 2
        })
    ));
}

#[test]
fn test_assemble_withEmptyNarration_shouldProduceZeroLengthShot() {
    let scenes = vec![Scene::new(
        1,
        "Silent",
        vec![Shot::new(1, "Spoken."), Shot::new(2, ""), Shot::new(3, "Spoken again.")],
    )];
    let mut durations = ShotDurations::new();
    durations.insert_ms(1, 1, 2000);
    durations.insert_ms(1, 3, 3000);

    let timeline = assemble(&scenes, &durations, &AssemblyOptions::default()).unwrap();
    assert_eq!(intervals(&timeline), vec![(0, 2000), (2500, 2500), (3000, 6000)]);
    assert_eq!(timeline.scenes[0].shots[1].duration_ms, 0);
}

#[test]
fn test_assemble_withNoScenes_shouldProduceEmptyTimeline() {
    let timeline = assemble(&[], &ShotDurations::new(), &AssemblyOptions::default()).unwrap();
    assert!(timeline.scenes.is_empty());
    assert_eq!(timeline.total_duration_ms, 0);
    assert_eq!(timeline.total_duration_timecode, "00:00:00:00");
}

#[test]
fn test_assemble_withSceneWithoutShots_shouldBeZeroLength() {
    let scenes = vec![
        Scene::new(1, "Empty", vec![]),
        Scene::new(2, "Full", vec![Shot::new(1, "Words.")]),
    ];
    let mut durations = ShotDurations::new();
    durations.insert_ms(2, 1, 1500);

    let timeline = assemble(&scenes, &durations, &AssemblyOptions::default()).unwrap();
    assert_eq!(timeline.scenes[0].duration_ms, 0);
    assert_eq!(timeline.scenes[1].start_ms, 1000);
    assert_eq!(timeline.total_duration_ms, 2500);
}

#[test]
fn test_assemble_withOutOfOrderScenes_shouldFail() {
    let mut scenes = common::sample_scenes();
    scenes.swap(0, 1);
    let result = assemble(&scenes, &common::sample_durations(), &common::sample_options());
    assert!(matches!(result, Err(TimelineError::NumberingOrder(_))));
}

#[test]
fn test_assemble_withFractionalRate_shouldRecordRate() {
    let options = AssemblyOptions {
        fps: FrameRate::new(29.97).unwrap(),
        ..common::sample_options()
    };
    let timeline = assemble(&common::sample_scenes(), &common::sample_durations(), &options).unwrap();
    assert_eq!(timeline.fps.as_f64(), 29.97);
    assert_eq!(timeline.total_duration_ms, 24000);
}

#[test]
fn test_shotDurations_fromSecondsEntries_shouldRoundToMilliseconds() -> Result<()> {
    let durations = ShotDurations::try_from_entries(vec![
        ShotDurationEntry {
            scene_number: 1,
            shot_number: 1,
            duration_s: 5.0004,
        },
        ShotDurationEntry {
            scene_number: 1,
            shot_number: 2,
            duration_s: 6.0006,
        },
    ])?;

    assert_eq!(durations.get(1, 1), Some(5000));
    assert_eq!(durations.get(1, 2), Some(6001));
    assert_eq!(durations.len(), 2);
    Ok(())
}

fn entry(scene_number: u32, shot_number: u32, duration_s: f64) -> ShotDurationEntry {
    ShotDurationEntry {
        scene_number,
        shot_number,
        duration_s,
    }
}

#[test]
fn test_shotDurations_withHugeSeconds_shouldRejectInsteadOfPanicking() {
    let result = ShotDurations::try_from_entries(vec![entry(1, 1, 1e300), entry(1, 2, 1.0)]);
    assert!(matches!(
        result,
        Err(TimelineError::InvalidDuration {
            scene_number: 1,
            shot_number: 1,
            ..
        })
    ));
}

#[test]
fn test_shotDurations_withNegativeOrNonFiniteSeconds_shouldReject() {
    for bad in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut durations = ShotDurations::new();
        let result = durations.insert_seconds(2, 3, bad);
        assert!(
            matches!(
                result,
                Err(TimelineError::InvalidDuration {
                    scene_number: 2,
                    shot_number: 3,
                    ..
                })
            ),
            "{} should be rejected",
            bad
        );
        assert!(durations.is_empty());
    }

    let mut durations = ShotDurations::new();
    assert!(durations.insert_seconds(1, 1, 0.0).is_ok());
    assert_eq!(durations.get(1, 1), Some(0));
}

#[test]
fn test_assemble_withShotPauseOverflow_shouldReturnDurationOverflow() {
    let mut durations = ShotDurations::new();
    durations.insert_ms(1, 1, u64::MAX - 100);
    durations.insert_ms(1, 2, 1000);
    let scenes = vec![Scene::new(1, "Long", vec![Shot::new(1, "One."), Shot::new(2, "Two.")])];

    let result = assemble(&scenes, &durations, &AssemblyOptions::default());
    assert!(matches!(
        result,
        Err(TimelineError::DurationOverflow {
            scene_number: 1,
            shot_number: 2
        })
    ));
}

#[test]
fn test_assemble_withDurationOverflow_shouldNameOffendingShot() {
    let mut durations = ShotDurations::new();
    durations.insert_ms(1, 1, u64::MAX);
    durations.insert_ms(1, 2, 1);
    let scenes = vec![Scene::new(1, "Long", vec![Shot::new(1, "One."), Shot::new(2, "Two.")])];
    let options = AssemblyOptions {
        inter_shot_pause_ms: 0,
        ..AssemblyOptions::default()
    };

    let error = assemble(&scenes, &durations, &options).unwrap_err();
    assert!(matches!(
        error,
        TimelineError::DurationOverflow {
            scene_number: 1,
            shot_number: 2
        }
    ));
    assert!(error.to_string().contains("scene 1 shot 2"));
}

#[test]
fn test_assemble_withScenePauseOverflow_shouldNameNextScene() {
    let mut durations = ShotDurations::new();
    durations.insert_ms(1, 1, u64::MAX);
    durations.insert_ms(4, 2, 1000);
    let scenes = vec![
        Scene::new(1, "Long", vec![Shot::new(1, "One.")]),
        Scene::new(4, "After", vec![Shot::new(2, "Two.")]),
    ];

    let result = assemble(&scenes, &durations, &AssemblyOptions::default());
    assert!(matches!(
        result,
        Err(TimelineError::DurationOverflow {
            scene_number: 4,
            shot_number: 2
        })
    ));
}

#[test]
fn test_assemble_withGappedNumbersAndBlankShots_shouldSatisfyInvariants() {
    let scenes = vec![
        Scene::new(
            3,
            "Part 2: Return",
            vec![Shot::new(1, ""), Shot::new(2, "Back at the harbour."), Shot::new(5, "   ")],
        ),
        Scene::new(7, "Empty", vec![]),
        Scene::new(9, "Close", vec![Shot::new(4, "The boats come in."), Shot::new(6, "")]),
    ];
    let mut durations = ShotDurations::new();
    durations.insert_ms(3, 2, 2500);
    durations.insert_ms(9, 4, 1200);

    let timeline = assemble(&scenes, &durations, &AssemblyOptions::default()).unwrap();
    assert!(timeline.check_invariants(500, 1000).is_empty());
    assert_eq!(
        intervals(&timeline),
        vec![(0, 0), (500, 3000), (3500, 3500), (5500, 6700), (7200, 7200)]
    );
    assert_eq!(timeline.scenes[1].start_ms, 4500);
    assert_eq!(timeline.scenes[1].duration_ms, 0);
    assert_eq!(timeline.total_duration_ms, 7200);
}

#[test]
fn test_timeline_saveAndLoad_shouldPreserveEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("audio").join("timeline_timestamps.json");
    let timeline = common::sample_timeline();

    timeline.save(&path)?;
    let loaded = Timeline::load(&path)?;

    assert_eq!(loaded, timeline);
    assert_eq!(loaded.settings["inter_shot_pause_s"], serde_json::json!(0.5));
    Ok(())
}

#[test]
fn test_timelineLoad_withMissingFile_shouldReturnMissingTimeline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = Timeline::load(temp_dir.path().join("nope.json"));

    let error = result.unwrap_err();
    assert!(matches!(error, TimelineError::MissingTimeline { .. }));
    assert!(error.to_string().contains("Generate the timeline first"));
    Ok(())
}

#[test]
fn test_timelineLoad_withBrokenJson_shouldReturnMalformedTimeline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    let partial = common::create_test_file(temp_dir.path(), "partial.json", r#"{"project_name": "X"}"#)?;

    match Timeline::load(&broken) {
        Err(TimelineError::MalformedTimeline { reason, .. }) => assert!(reason.starts_with("Invalid JSON")),
        other => panic!("unexpected result: {:?}", other),
    }
    match Timeline::load(&partial) {
        Err(TimelineError::MalformedTimeline { reason, .. }) => {
            assert!(reason.starts_with("Incomplete timeline structure"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_checkMonotonic_withOverlappingShots_shouldReport() {
    let mut timeline = common::sample_timeline();
    timeline.scenes[0].shots[1].start_ms = 4000;
    timeline.scenes[0].shots[1].duration_ms = 7500;

    let violations = timeline.check_monotonic();
    assert!(violations.iter().any(|v| v.contains("overlaps")));
}
