// SPDX-License-Identifier: MPL-2.0
//! Application settings: loading, validation, and persistence.
//!
//! Settings live in a `settings.json` file under the app's `config/`
//! directory. The Gemini API key may come from the file or, when absent
//! there, from the `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment
//! variables. Invalid or missing files fall back to defaults rather than
//! failing startup.

pub mod models;

use crate::app::paths;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default upload size limit in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u32 = 500;

/// Bounds enforced on the upload size limit.
pub const MIN_FILE_SIZE_MB: u32 = 1;
pub const MAX_FILE_SIZE_MB: u32 = 1000;

/// Gemini API related settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeminiSettings {
    /// API key; `None` means "look at the environment".
    pub api_key: Option<String>,
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Whether responses stream into the window as they are generated.
    pub stream_response: bool,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: models::FALLBACK_MODEL.to_string(),
            stream_response: true,
        }
    }
}

/// File handling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileSettings {
    /// Maximum upload size in MB; larger files trigger compression.
    pub max_file_size_mb: u32,
    /// Where result text files are written.
    pub output_directory: PathBuf,
    /// Write a UTF-8 BOM so results open cleanly in Windows editors.
    pub use_bom: bool,
    /// Starting directory for the file picker.
    pub input_directory: PathBuf,
    /// Whether oversized files are re-encoded before upload.
    pub auto_compress: bool,
    /// Whether result files get renamed after a model-suggested title.
    #[serde(default = "default_true")]
    pub generate_title: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            output_directory: paths::output_dir(),
            use_bom: true,
            input_directory: paths::app_root(),
            auto_compress: true,
            generate_title: true,
        }
    }
}

/// UI state worth remembering between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UiSettings {
    /// The prompt in the editor when the app last closed.
    pub last_prompt: String,
    /// The user's saved custom prompt slot.
    pub custom_prompt: String,
}

/// The whole persisted configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub file: FileSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    /// The effective API key: settings first, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.gemini.api_key {
            if !key.trim().is_empty() {
                return Some(key.trim().to_string());
            }
        }
        api_key_from_env()
    }

    /// Clamps numeric fields into their supported ranges so hand-edited
    /// files cannot request nonsensical limits.
    fn sanitize(mut self) -> Self {
        self.file.max_file_size_mb = self
            .file
            .max_file_size_mb
            .clamp(MIN_FILE_SIZE_MB, MAX_FILE_SIZE_MB);
        if self.gemini.model.trim().is_empty() {
            self.gemini.model = models::FALLBACK_MODEL.to_string();
        }
        self
    }
}

/// Reads the API key from the environment, trying both variable names the
/// Gemini tooling ecosystem uses.
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub fn load() -> Settings {
    load_from_path(&paths::settings_file())
}

pub fn save(settings: &Settings) -> Result<()> {
    save_to_path(settings, &paths::settings_file())
}

pub fn load_from_path(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            if path.exists() {
                log::error!("failed to read settings {}: {}", path.display(), err);
            } else {
                log::info!("no settings file at {}, using defaults", path.display());
            }
            return Settings::default();
        }
    };

    match serde_json::from_str::<Settings>(&content) {
        Ok(settings) => settings.sanitize(),
        Err(err) => {
            log::error!("invalid settings file {}: {}", path.display(), err);
            Settings::default()
        }
    }
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content)?;
    log::debug!("settings saved to {}", path.display());
    Ok(())
}
