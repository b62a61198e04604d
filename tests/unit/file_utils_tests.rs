/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;

use reelcut::errors::TimelineError;
use reelcut::file_utils::FileManager;

use crate::common;

#[test]
fn test_projectPaths_withProjectDir_shouldFollowLayout() {
    let timeline = FileManager::timeline_path("proj");
    let exports = FileManager::exports_dir("proj");

    assert!(timeline.ends_with("audio/timeline_timestamps.json"));
    assert!(exports.ends_with("proj/exports"));
}

#[test]
fn test_writeArtifact_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::write_artifact(&path, "content", "write test file")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(fs::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_writeArtifact_withDirectoryAsTarget_shouldReturnIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = FileManager::write_artifact(temp_dir.path(), "content", "write EDL");

    match result {
        Err(TimelineError::Io { operation, .. }) => assert_eq!(operation, "write EDL"),
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_makeExecutable_withWrittenFile_shouldSetMode() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "script.py", "print()")?;
    FileManager::make_executable(&path)?;

    let mode = fs::metadata(&path)?.permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    Ok(())
}

#[test]
fn test_ensureDir_withNestedPath_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("x").join("y");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));
    Ok(())
}
