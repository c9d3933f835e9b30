// SPDX-License-Identifier: MPL-2.0
//! Model catalog loaded from `config/models.yaml`.
//!
//! The file may list entries either as plain strings or as mappings with
//! `name` and `description`, under a top-level `models:` key or as a bare
//! sequence. A missing or malformed file yields the built-in catalog so
//! the model picker is never empty.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Model used when neither the catalog nor the settings name one.
pub const FALLBACK_MODEL: &str = "gemini-2.5-flash";

/// A selectable Gemini model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} - {}", self.name, self.description)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCatalog {
    Keyed { models: Vec<RawEntry> },
    Bare(Vec<RawEntry>),
}

impl RawEntry {
    fn into_model(self) -> Option<ModelInfo> {
        match self {
            RawEntry::Name(name) if !name.trim().is_empty() => {
                Some(ModelInfo::new(name.trim(), ""))
            }
            RawEntry::Detailed { name, description } if !name.trim().is_empty() => {
                Some(ModelInfo::new(name.trim(), description.trim()))
            }
            _ => None,
        }
    }
}

/// The catalog compiled into the binary, used when no file is available.
pub fn builtin_catalog() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new("gemini-2.5-flash", "Fast, good default for video"),
        ModelInfo::new("gemini-2.5-pro", "Highest quality, slower"),
        ModelInfo::new("gemini-2.0-flash", "Previous generation fallback"),
    ]
}

/// Loads the catalog from `path`, falling back to the built-in list.
pub fn load_catalog(path: &Path) -> Vec<ModelInfo> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            log::info!(
                "model catalog {} not readable, using built-in list",
                path.display()
            );
            return builtin_catalog();
        }
    };

    match parse_catalog(&content) {
        Some(models) if !models.is_empty() => models,
        _ => {
            log::warn!(
                "model catalog {} is empty or malformed, using built-in list",
                path.display()
            );
            builtin_catalog()
        }
    }
}

fn parse_catalog(content: &str) -> Option<Vec<ModelInfo>> {
    let raw: RawCatalog = serde_yaml::from_str(content).ok()?;
    let entries = match raw {
        RawCatalog::Keyed { models } => models,
        RawCatalog::Bare(models) => models,
    };
    Some(entries.into_iter().filter_map(RawEntry::into_model).collect())
}

/// The default model for a catalog: its first entry.
pub fn default_model(catalog: &[ModelInfo]) -> String {
    catalog
        .first()
        .map(|model| model.name.clone())
        .unwrap_or_else(|| FALLBACK_MODEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyed_catalog_with_descriptions() {
        let yaml = r#"
models:
  - name: gemini-2.5-pro
    description: best quality
  - name: gemini-2.5-flash
"#;
        let models = parse_catalog(yaml).expect("should parse");
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "gemini-2.5-pro");
        assert_eq!(models[0].description, "best quality");
        assert_eq!(models[1].description, "");
    }

    #[test]
    fn parses_bare_string_list() {
        let yaml = "- gemini-2.5-flash\n- gemini-2.5-pro\n";
        let models = parse_catalog(yaml).expect("should parse");
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].name, "gemini-2.5-pro");
    }

    #[test]
    fn skips_blank_names() {
        let yaml = "models:\n  - ''\n  - gemini-2.5-flash\n";
        let models = parse_catalog(yaml).expect("should parse");
        assert_eq!(models.len(), 1);
    }

    #[test]
    fn malformed_file_yields_builtin() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("models.yaml");
        std::fs::write(&path, ": not yaml :::").unwrap();

        let models = load_catalog(&path);
        assert_eq!(models, builtin_catalog());
    }

    #[test]
    fn missing_file_yields_builtin() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let models = load_catalog(&dir.path().join("nope.yaml"));
        assert_eq!(models, builtin_catalog());
    }

    #[test]
    fn default_model_is_first_entry() {
        let catalog = vec![
            ModelInfo::new("a-model", ""),
            ModelInfo::new("b-model", ""),
        ];
        assert_eq!(default_model(&catalog), "a-model");
        assert_eq!(default_model(&[]), FALLBACK_MODEL);
    }

    #[test]
    fn display_includes_description_when_present() {
        let with = ModelInfo::new("m", "fast");
        let without = ModelInfo::new("m", "");
        assert_eq!(with.to_string(), "m - fast");
        assert_eq!(without.to_string(), "m");
    }
}
