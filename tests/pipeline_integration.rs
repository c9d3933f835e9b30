// SPDX-License-Identifier: MPL-2.0
//! End-to-end checks of the local half of the pipeline: validation,
//! settings round trips, catalog loading, and result file handling.

use clipsight::config::models::{self, FALLBACK_MODEL};
use clipsight::config::{self, Settings};
use clipsight::media;
use clipsight::output;
use std::path::Path;
use tempfile::tempdir;

/// A minimal file that passes the MP4 signature check.
fn write_mp4(path: &Path) {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x18];
    bytes.extend_from_slice(b"ftypisom");
    bytes.extend_from_slice(&[0u8; 64]);
    std::fs::write(path, bytes).expect("failed to write test video");
}

#[test]
fn settings_round_trip_preserves_everything() {
    let dir = tempdir().expect("failed to create temp dir");
    let file = dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.gemini.api_key = Some("test-key".to_string());
    settings.gemini.model = "gemini-2.5-pro".to_string();
    settings.gemini.stream_response = false;
    settings.file.max_file_size_mb = 250;
    settings.file.use_bom = false;
    settings.file.generate_title = false;
    settings.ui.last_prompt = "summarize this clip".to_string();

    config::save_to_path(&settings, &file).expect("save failed");
    let loaded = config::load_from_path(&file);
    assert_eq!(loaded, settings);
}

#[test]
fn corrupt_settings_fall_back_to_defaults() {
    let dir = tempdir().expect("failed to create temp dir");
    let file = dir.path().join("settings.json");
    std::fs::write(&file, "{not json").expect("write failed");

    let loaded = config::load_from_path(&file);
    assert_eq!(loaded, Settings::default());
    assert_eq!(loaded.gemini.model, FALLBACK_MODEL);
}

#[test]
fn catalog_from_yaml_file() {
    let dir = tempdir().expect("failed to create temp dir");
    let file = dir.path().join("models.yaml");
    std::fs::write(
        &file,
        "models:\n  - name: gemini-2.5-flash\n    description: Fast\n  - gemini-2.5-pro\n",
    )
    .expect("write failed");

    let catalog = models::load_catalog(&file);
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].name, "gemini-2.5-flash");
    assert_eq!(catalog[1].name, "gemini-2.5-pro");
}

#[test]
fn missing_catalog_uses_builtin_models() {
    let dir = tempdir().expect("failed to create temp dir");
    let catalog = models::load_catalog(&dir.path().join("absent.yaml"));
    assert!(!catalog.is_empty());
    assert!(catalog.iter().any(|m| m.name == FALLBACK_MODEL));
}

#[test]
fn validation_accepts_real_mp4_and_rejects_others() {
    let dir = tempdir().expect("failed to create temp dir");

    let good = dir.path().join("clip.mp4");
    write_mp4(&good);
    assert!(media::validate_mp4(&good).is_ok());

    let wrong_ext = dir.path().join("clip.avi");
    write_mp4(&wrong_ext);
    assert!(media::validate_mp4(&wrong_ext).is_err());

    let not_video = dir.path().join("notes.mp4");
    std::fs::write(&not_video, "just some text").expect("write failed");
    assert!(media::validate_mp4(&not_video).is_err());

    assert!(media::validate_mp4(&dir.path().join("missing.mp4")).is_err());
}

#[test]
fn result_write_and_rename_flow() {
    let dir = tempdir().expect("failed to create temp dir");
    let video = dir.path().join("standup recording.mp4");
    write_mp4(&video);

    let out = output::output_path_for(&video, dir.path());
    let name = out.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with("_standup recording.txt"));

    output::write_text(&out, "analysis body", true).expect("write failed");
    let bytes = std::fs::read(&out).expect("read failed");
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);

    let renamed = output::apply_title(&out, "Daily Standup").expect("rename failed");
    let renamed_name = renamed.file_name().unwrap().to_string_lossy().to_string();
    assert!(renamed_name.ends_with("_Daily Standup.txt"));
    assert!(!out.exists());
}

#[test]
fn size_limit_checks_drive_compression_decision() {
    let dir = tempdir().expect("failed to create temp dir");
    let video = dir.path().join("clip.mp4");
    write_mp4(&video);

    // Tiny file is well under any sensible limit.
    assert!(media::within_size_limit(&video, 1).expect("size check failed"));

    let mb = media::file_size_mb(&video).expect("size failed");
    assert!(mb < 0.01);
}
