// SPDX-License-Identifier: MPL-2.0
//! Result file naming and writing.
//!
//! Output files are named `<timestamp>_<video stem>.txt` so repeated runs
//! against the same clip never collide. After title generation succeeds,
//! the stem is swapped for the sanitized title while the timestamp prefix
//! stays, keeping results sorted by run time.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

const OUTPUT_EXT: &str = "txt";

/// UTF-8 byte order mark, prepended when the BOM setting is on so the
/// files open with the right encoding in Windows editors.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Replaces characters Windows rejects in file names and collapses the
/// leftovers into something readable. Empty results become `untitled`.
pub fn sanitize_filename(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    cleaned = cleaned.trim().to_string();

    // Collapse runs of underscores left by replacement.
    let mut collapsed = String::with_capacity(cleaned.len());
    let mut last_was_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !last_was_underscore {
                collapsed.push(c);
            }
            last_was_underscore = true;
        } else {
            collapsed.push(c);
            last_was_underscore = false;
        }
    }

    let trimmed = collapsed.trim_matches('_').to_string();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed
    }
}

fn timestamp_prefix(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

fn stem_of(video_path: &Path) -> String {
    video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "analysis".to_string())
}

/// Builds the output path for a video at a given instant. Split out from
/// [`output_path_for`] so tests can pin the clock.
pub fn output_path_at(video_path: &Path, output_dir: &Path, now: DateTime<Local>) -> PathBuf {
    let name = format!(
        "{}_{}.{}",
        timestamp_prefix(now),
        sanitize_filename(&stem_of(video_path)),
        OUTPUT_EXT
    );
    unique_path(output_dir.join(name))
}

/// The output path a new analysis of `video_path` should write to.
pub fn output_path_for(video_path: &Path, output_dir: &Path) -> PathBuf {
    output_path_at(video_path, output_dir, Local::now())
}

/// Appends `_N` before the extension until the path does not exist.
pub fn unique_path(candidate: PathBuf) -> PathBuf {
    if !candidate.exists() {
        return candidate;
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| e.to_string_lossy().to_string());
    let parent = candidate.parent().map(Path::to_path_buf).unwrap_or_default();

    for counter in 1.. {
        let name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let next = parent.join(name);
        if !next.exists() {
            return next;
        }
    }
    unreachable!("counter space exhausted");
}

/// Writes the analysis text, creating the output directory on demand.
pub fn write_text(path: &Path, text: &str, use_bom: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if use_bom {
        bytes.extend_from_slice(UTF8_BOM);
    }
    bytes.extend_from_slice(text.as_bytes());
    std::fs::write(path, bytes)?;
    log::info!("result saved to {}", path.display());
    Ok(())
}

/// Renames a result file to carry a generated title, keeping the
/// timestamp prefix of the original name. Returns the new path.
pub fn apply_title(path: &Path, title: &str) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| Error::Output(format!("{} has no file name", path.display())))?;

    // Timestamp prefix is "YYYYMMDD_HHMMSS" (15 chars, underscore at 8).
    let prefix = stem
        .get(..15)
        .filter(|p| p.as_bytes().get(8) == Some(&b'_'))
        .unwrap_or(&stem);

    let new_name = format!("{}_{}.{}", prefix, sanitize_filename(title), OUTPUT_EXT);
    let new_path = unique_path(path.with_file_name(new_name));
    std::fs::rename(path, &new_path)?;
    log::info!("result renamed to {}", new_path.display());
    Ok(new_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap()
    }

    #[test]
    fn sanitize_replaces_forbidden_characters() {
        assert_eq!(sanitize_filename(r#"a\b/c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn sanitize_collapses_and_trims_underscores() {
        assert_eq!(sanitize_filename("__a///b__"), "a_b");
    }

    #[test]
    fn sanitize_empty_becomes_untitled() {
        assert_eq!(sanitize_filename("  ?? "), "untitled");
        assert_eq!(sanitize_filename(""), "untitled");
    }

    #[test]
    fn sanitize_keeps_unicode() {
        assert_eq!(sanitize_filename("会議の要約"), "会議の要約");
    }

    #[test]
    fn output_path_uses_timestamp_and_stem() {
        let dir = tempdir().unwrap();
        let path = output_path_at(
            Path::new("C:/videos/team meeting.mp4"),
            dir.path(),
            fixed_now(),
        );
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "20250601_123045_team meeting.txt"
        );
    }

    #[test]
    fn unique_path_appends_counter() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("result.txt");
        std::fs::write(&first, "x").unwrap();
        let second = unique_path(first.clone());
        assert_eq!(second.file_name().unwrap().to_string_lossy(), "result_1.txt");

        std::fs::write(&second, "x").unwrap();
        let third = unique_path(first);
        assert_eq!(third.file_name().unwrap().to_string_lossy(), "result_2.txt");
    }

    #[test]
    fn write_text_with_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("r.txt");
        write_text(&path, "hello", true).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        assert_eq!(&bytes[3..], b"hello");
    }

    #[test]
    fn write_text_without_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.txt");
        write_text(&path, "hello", false).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn apply_title_keeps_timestamp_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("20250601_123045_clip.txt");
        std::fs::write(&path, "body").unwrap();

        let renamed = apply_title(&path, "Quarterly Review: Notes").unwrap();
        assert_eq!(
            renamed.file_name().unwrap().to_string_lossy(),
            "20250601_123045_Quarterly Review_ Notes.txt"
        );
        assert!(!path.exists());
        assert_eq!(std::fs::read_to_string(&renamed).unwrap(), "body");
    }

    #[test]
    fn apply_title_without_timestamp_prefix_keeps_stem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.txt");
        std::fs::write(&path, "body").unwrap();

        let renamed = apply_title(&path, "Title").unwrap();
        assert_eq!(
            renamed.file_name().unwrap().to_string_lossy(),
            "result_Title.txt"
        );
    }
}
