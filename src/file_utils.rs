use anyhow::{Context, Result};
use log::debug;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix appended to the destination name for backup copies
pub const BACKUP_SUFFIX: &str = ".bak";

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
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Backup path by appending ".bak" to the full file name
    // @example: foo.tmx -> foo.tmx.bak
    pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let path = path.as_ref();
        let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
        name.push(BACKUP_SUFFIX);
        path.with_file_name(name)
    }

    /// Directory that will hold the temporary file for `path`
    fn parent_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Write a file atomically.
    ///
    /// Content produced by `write` goes to a temporary file in the destination
    /// directory which is then renamed over `path`. When `backup` is set and
    /// `path` already exists, the old file is copied to its `.bak` sibling
    /// before the rename. If anything fails before the rename, the temporary
    /// file is removed and `path` is left untouched.
    pub fn write_atomic<P, F>(path: P, backup: bool, write: F) -> io::Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let path = path.as_ref();
        let dir = Self::parent_dir(path);
        Self::ensure_dir(&dir)?;

        // Dropping the handle on any early return deletes the partial file
        let mut temp = tempfile::Builder::new()
            .prefix(".tmxalign-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        write(temp.as_file_mut())?;
        temp.as_file_mut().flush()?;
        temp.as_file().sync_all()?;

        if path.exists() {
            fs::set_permissions(temp.path(), fs::metadata(path)?.permissions())?;
            if backup {
                let backup_path = Self::backup_path(path);
                fs::copy(path, &backup_path)?;
                debug!("Backed up {:?} to {:?}", path, backup_path);
            }
        }

        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Expand a mix of files and directories into a list of files
    pub fn collect_inputs(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            if Self::dir_exists(path) {
                files.extend(Self::find_files(path, extension)?);
            } else if Self::file_exists(path) {
                files.push(path.clone());
            } else {
                return Err(anyhow::anyhow!("Input path does not exist: {:?}", path));
            }
        }
        Ok(files)
    }
}
