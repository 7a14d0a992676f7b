//! CLI command implementations.

pub mod artists;
pub mod design;
pub mod gallery;
#[cfg(feature = "gui")]
pub mod gui;
pub mod try_on;

use std::path::Path;

use anyhow::Context;
use image::ImageFormat;

use inkgenius::core::data_uri::{DataUri, decode_image_uri};
use inkgenius::{Config, GenAiClient, StudioDb, TattooService};

/// Service backed by the hosted model API.
fn connect_service(config: &Config) -> anyhow::Result<TattooService<GenAiClient>> {
    let client = GenAiClient::new(&config.api_base, config.require_api_key()?)?;
    Ok(TattooService::new(client, config.models.clone()))
}

async fn open_studio(config: &Config) -> anyhow::Result<StudioDb> {
    StudioDb::open(&config.db_path).await
}

/// Read an image file as a data URI, keeping its original encoding.
fn read_image_uri(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .with_context(|| format!("{} is not a supported image", path.display()))?;
    Ok(DataUri::new(format.to_mime_type(), bytes).to_string())
}

/// Write a data URI image to `path`, re-encoding to match the file extension.
fn write_image_uri(uri: &str, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    decode_image_uri(uri)?
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
