//! Configuration loading from environment variables.

use std::path::PathBuf;

use anyhow::Context;

use crate::genai::DEFAULT_API_BASE;

pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_DB_FILE: &str = "inkgenius.db";

/// Model names used for each kind of call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSet {
    /// Text-to-image generation
    pub image: String,
    /// Image-to-image editing and blending
    pub edit: String,
    /// Text and grounded search generation
    pub text: String,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE_MODEL.to_string(),
            edit: DEFAULT_EDIT_MODEL.to_string(),
            text: DEFAULT_TEXT_MODEL.to_string(),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key for the hosted model API (may be absent for offline commands)
    pub api_key: Option<String>,
    pub api_base: String,
    pub models: ModelSet,
    /// Local storage database file
    pub db_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables, reading a `.env` file first if present.
    ///
    /// Recognised variables:
    /// - `GEMINI_API_KEY` (or `API_KEY`): key for the model API
    /// - `INKGENIUS_API_BASE`: REST root of the model API
    /// - `INKGENIUS_IMAGE_MODEL`, `INKGENIUS_EDIT_MODEL`, `INKGENIUS_TEXT_MODEL`: model overrides
    /// - `INKGENIUS_DB`: local storage database file (default `inkgenius.db`)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.trim().is_empty());
        let defaults = ModelSet::default();

        Self {
            api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            api_base: var("INKGENIUS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            models: ModelSet {
                image: var("INKGENIUS_IMAGE_MODEL").unwrap_or(defaults.image),
                edit: var("INKGENIUS_EDIT_MODEL").unwrap_or(defaults.edit),
                text: var("INKGENIUS_TEXT_MODEL").unwrap_or(defaults.text),
            },
            db_path: var("INKGENIUS_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
        }
    }

    /// The API key, or an error explaining how to provide one.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .context("GEMINI_API_KEY environment variable not set")
    }
}
