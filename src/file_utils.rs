use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::TimelineError;

// @module: File and directory utilities

// @const: Timeline artifact location relative to the project
pub const TIMELINE_FILE: &str = "audio/timeline_timestamps.json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Timeline artifact path inside a project directory
    pub fn timeline_path<P: AsRef<Path>>(project_dir: P) -> PathBuf {
        project_dir.as_ref().join(TIMELINE_FILE)
    }

    // @returns: Default export directory inside a project directory
    pub fn exports_dir<P: AsRef<Path>>(project_dir: P) -> PathBuf {
        project_dir.as_ref().join("exports")
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write an exported artifact, creating parent directories.
    ///
    /// Failures carry the operation and target path.
    pub fn write_artifact<P: AsRef<Path>>(path: P, content: &str, operation: &str) -> Result<(), TimelineError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| TimelineError::io(operation, parent, e))?;
            }
        }
        fs::write(path, content).map_err(|e| TimelineError::io(operation, path, e))
    }

    /// Mark a file executable (`0o755`). No-op on non-Unix platforms.
    pub fn make_executable<P: AsRef<Path>>(path: P) -> Result<(), TimelineError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let path = path.as_ref();
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))
                .map_err(|e| TimelineError::io("set permissions on", path, e))?;
        }
        #[cfg(not(unix))]
        let _ = path;

        Ok(())
    }
}
