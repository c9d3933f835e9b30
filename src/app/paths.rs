// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! ClipSight uses a portable layout anchored at the application root:
//! `config/` for the settings and model catalog files, `output/` for
//! analysis results, and `logs/` for log files. The root resolves in
//! priority order:
//!
//! 1. The `CLIPSIGHT_HOME` environment variable (also used by tests).
//! 2. The executable's directory for release builds, so a packaged
//!    executable keeps everything next to itself.
//! 3. The current working directory during development.

use std::path::PathBuf;

/// Environment variable that overrides the application root.
pub const ENV_HOME: &str = "CLIPSIGHT_HOME";

/// Resolves the application root directory.
pub fn app_root() -> PathBuf {
    if let Some(home) = std::env::var_os(ENV_HOME) {
        return PathBuf::from(home);
    }

    if !cfg!(debug_assertions) {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.to_path_buf();
            }
        }
    }

    std::env::current_dir()
        .ok()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directory holding `settings.json` and `models.yaml`.
pub fn config_dir() -> PathBuf {
    app_root().join("config")
}

/// Directory where analysis result files are written by default.
pub fn output_dir() -> PathBuf {
    app_root().join("output")
}

/// Directory where log files are written.
pub fn logs_dir() -> PathBuf {
    app_root().join("logs")
}

/// Full path of the persisted settings file.
pub fn settings_file() -> PathBuf {
    config_dir().join("settings.json")
}

/// Full path of the model catalog file.
pub fn models_file() -> PathBuf {
    config_dir().join("models.yaml")
}
