//! Try-on command: place a design on a photo.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use inkgenius::compose::{self, BlendMode};
use inkgenius::core::data_uri::{decode_image_uri, image_to_uri};
use inkgenius::Config;

use super::{connect_service, read_image_uri, write_image_uri};

/// Overrides for the automatic placement.
pub struct TryOnOptions {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale: Option<f32>,
    pub rotation: f32,
    pub opacity: f32,
    pub blend: BlendMode,
    pub realistic: bool,
}

/// Runs the try-on command.
///
/// # Errors
///
/// Returns an error if either image cannot be read or the realistic render fails.
pub async fn run(config: &Config, photo: &Path, design: &Path, out: &Path, options: TryOnOptions) -> Result<()> {
    let bytes = std::fs::read(photo).with_context(|| format!("Failed to read {}", photo.display()))?;
    let photo = compose::prepare_photo(&bytes)?;
    let design = decode_image_uri(&read_image_uri(design)?)?;

    let mut placement = compose::initial_placement(
        (photo.width(), photo.height()),
        (design.width(), design.height()),
    );
    if let Some(x) = options.x {
        placement.center_x = x;
    }
    if let Some(y) = options.y {
        placement.center_y = y;
    }
    if let Some(scale) = options.scale {
        if !(scale.is_finite() && scale > 0.0) {
            anyhow::bail!("Scale must be a positive number");
        }
        placement.scale = scale;
    }
    placement.rotation = options.rotation;
    placement.opacity = options.opacity.clamp(0.0, 1.0);
    placement.blend = options.blend;
    info!(?placement, "Compositing design");

    let flat = compose::try_on(&photo, &design, &placement);
    let mut result = image_to_uri(&flat)?;
    if options.realistic {
        result = connect_service(config)?.render_on_skin(&result).await?;
    }

    write_image_uri(&result, out)?;
    println!("{}", out.display());
    Ok(())
}
