//! Crash-safe replacement of the overrides file.
//!
//! The overrides file is rewritten in full after every edit. The new contents
//! go to a sibling `.tmp` file first and are renamed over the real file only
//! once they are on disk, so an interrupted write leaves the previous file
//! intact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the temporary file used while writing `path`.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Where an unusable file at `path` is moved so the next write cannot
/// destroy it.
pub fn set_aside_path_for(path: &Path) -> PathBuf {
    let mut bad: OsString = path.as_os_str().to_owned();
    bad.push(".bad");
    PathBuf::from(bad)
}

/// Move `path` to [`set_aside_path_for`], replacing an older copy.
pub fn set_aside(path: &Path) -> std::io::Result<PathBuf> {
    let bad_path = set_aside_path_for(path);
    fs::rename(path, &bad_path)?;
    Ok(bad_path)
}

/// Replace the contents of `path` with `data`, creating parent directories.
///
/// Either the old or the new contents are visible at `path`, never a mix.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)?,
        _ => {}
    }

    let tmp_path = tmp_path_for(path);
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(data)?;
        tmp.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}

/// Removes a `{path}.tmp` left behind by an interrupted write.
///
/// Returns `true` if a stale file was found and removed.
pub fn remove_stale_tmp(path: &Path) -> bool {
    let tmp_path = tmp_path_for(path);
    if !tmp_path.exists() {
        return false;
    }
    fs::remove_file(&tmp_path).is_ok()
}
