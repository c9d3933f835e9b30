// SPDX-License-Identifier: MPL-2.0
//! Input validation for dropped and picked video files.
//!
//! The checks mirror what users actually get wrong: non-MP4 drops, empty
//! files, and renamed files that are not MP4 containers at all. The
//! container check reads only the first few bytes and looks for the
//! `ftyp` box marker, which sits right after the size field in any
//! well-formed MP4.

use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// How many leading bytes to scan for the `ftyp` marker.
const HEADER_SCAN_LEN: usize = 20;

/// Validates that `path` points at a usable MP4 file.
pub fn validate_mp4(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::Video(format!(
            "{} does not exist or is not a regular file",
            path.display()
        )));
    }

    let is_mp4_ext = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("mp4"))
        .unwrap_or(false);
    if !is_mp4_ext {
        return Err(Error::Video(format!(
            "{} is not an .mp4 file",
            path.display()
        )));
    }

    let len = path.metadata()?.len();
    if len == 0 {
        return Err(Error::Video(format!("{} is empty", path.display())));
    }

    let mut header = [0u8; HEADER_SCAN_LEN];
    let mut file = std::fs::File::open(path)?;
    let read = file.read(&mut header)?;
    let has_ftyp = header[..read].windows(4).any(|w| w == b"ftyp");
    if !has_ftyp {
        return Err(Error::Video(format!(
            "{} does not look like an MP4 container",
            path.display()
        )));
    }

    Ok(())
}

/// File size in megabytes.
pub fn file_size_mb(path: &Path) -> Result<f64> {
    Ok(path.metadata()?.len() as f64 / BYTES_PER_MB)
}

/// Whether the file fits under the configured upload limit.
pub fn within_size_limit(path: &Path, max_mb: u32) -> Result<bool> {
    Ok(file_size_mb(path)? <= f64::from(max_mb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_mp4(dir: &Path, name: &str, payload_len: usize) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        // Minimal MP4-looking header: size field then an ftyp box.
        file.write_all(&[0, 0, 0, 0x18]).unwrap();
        file.write_all(b"ftypisom").unwrap();
        file.write_all(&vec![0u8; payload_len]).unwrap();
        path
    }

    #[test]
    fn accepts_file_with_ftyp_header() {
        let dir = tempdir().unwrap();
        let path = write_mp4(dir.path(), "clip.mp4", 64);
        assert!(validate_mp4(&path).is_ok());
    }

    #[test]
    fn accepts_uppercase_extension() {
        let dir = tempdir().unwrap();
        let path = write_mp4(dir.path(), "CLIP.MP4", 64);
        assert!(validate_mp4(&path).is_ok());
    }

    #[test]
    fn rejects_missing_file() {
        let dir = tempdir().unwrap();
        let err = validate_mp4(&dir.path().join("nope.mp4")).unwrap_err();
        assert!(matches!(err, Error::Video(_)));
    }

    #[test]
    fn rejects_wrong_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"anything").unwrap();
        assert!(validate_mp4(&path).is_err());
    }

    #[test]
    fn rejects_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"").unwrap();
        assert!(validate_mp4(&path).is_err());
    }

    #[test]
    fn rejects_renamed_non_mp4() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"this is just text, not a container").unwrap();
        assert!(validate_mp4(&path).is_err());
    }

    #[test]
    fn size_limit_check() {
        let dir = tempdir().unwrap();
        let path = write_mp4(dir.path(), "clip.mp4", 64);
        assert!(within_size_limit(&path, 1).unwrap());
        let mb = file_size_mb(&path).unwrap();
        assert!(mb > 0.0 && mb < 1.0);
    }
}
