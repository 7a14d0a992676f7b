//! Placing a design on a photo: the 2D transforms of the try-on step.

pub mod linework;

use anyhow::Context;
use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage, imageops::FilterType};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

pub use linework::linework_preview;

/// Longest side a photo is reduced to before compositing
pub const MAX_PHOTO_SIDE: u32 = 1600;

/// Share of the photo's shorter side a freshly placed design covers
const INITIAL_COVERAGE: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Design drawn over the photo
    #[default]
    Normal,
    /// Design darkens the skin beneath it, like ink
    Multiply,
}

/// Where the design sits on the photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Centre of the design in photo pixels
    pub center_x: f32,
    pub center_y: f32,
    /// Design pixels to photo pixels
    pub scale: f32,
    /// Clockwise rotation in degrees
    pub rotation: f32,
    pub opacity: f32,
    pub blend: BlendMode,
}

impl Placement {
    fn projection(&self, design_width: u32, design_height: u32) -> Option<Projection> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return None;
        }
        let to_origin = Projection::translate(
            -(design_width as f32) / 2.0,
            -(design_height as f32) / 2.0,
        );
        Some(
            Projection::translate(self.center_x, self.center_y)
                * Projection::rotate(self.rotation.to_radians())
                * Projection::scale(self.scale, self.scale)
                * to_origin,
        )
    }
}

/// Decode a user photo and bound its size.
pub fn prepare_photo(bytes: &[u8]) -> anyhow::Result<DynamicImage> {
    let photo = image::load_from_memory(bytes).context("Failed to decode photo")?;
    if photo.width().max(photo.height()) > MAX_PHOTO_SIDE {
        Ok(photo.resize(MAX_PHOTO_SIDE, MAX_PHOTO_SIDE, FilterType::Triangle))
    } else {
        Ok(photo)
    }
}

/// Centre the design at a comfortable starting size.
pub fn initial_placement(photo: (u32, u32), design: (u32, u32)) -> Placement {
    let (pw, ph) = photo;
    let (dw, dh) = design;
    let target = pw.min(ph) as f32 * INITIAL_COVERAGE;
    let scale = target / dw.max(dh).max(1) as f32;
    Placement {
        center_x: pw as f32 / 2.0,
        center_y: ph as f32 / 2.0,
        scale,
        rotation: 0.0,
        opacity: 0.9,
        blend: BlendMode::Multiply,
    }
}

/// Make near-white paper transparent so only the ink is placed on skin.
///
/// Pixels at or above `threshold` brightness become fully transparent; darker pixels fade in
/// linearly down to black, which keeps antialiased edges soft.
pub fn knock_out_background(design: &DynamicImage, threshold: u8) -> RgbaImage {
    let mut rgba = design.to_rgba8();
    let threshold = threshold.max(1) as f32;
    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let keep = ((threshold - luma) / threshold).clamp(0.0, 1.0);
        // square root keeps mid-tones mostly opaque
        pixel.0[3] = (a as f32 * keep.sqrt()).round() as u8;
    }
    rgba
}

/// Draw `design` onto `photo` according to `placement`. The result has the photo's dimensions.
pub fn composite(photo: &DynamicImage, design: &RgbaImage, placement: &Placement) -> RgbaImage {
    let mut out = photo.to_rgba8();
    let (dw, dh) = design.dimensions();
    let Some(projection) = placement.projection(dw, dh) else {
        return out;
    };
    let opacity = placement.opacity.clamp(0.0, 1.0);
    if opacity == 0.0 || dw == 0 || dh == 0 {
        return out;
    }

    let (pw, ph) = out.dimensions();
    let mut layer: RgbaImage = ImageBuffer::from_pixel(pw, ph, Rgba([0, 0, 0, 0]));
    warp_into(design, &projection, Interpolation::Bilinear, Rgba([0, 0, 0, 0]), &mut layer);

    for (base, ink) in out.pixels_mut().zip(layer.pixels()) {
        let alpha = ink[3] as f32 / 255.0 * opacity;
        if alpha <= 0.0 {
            continue;
        }
        for c in 0..3 {
            let under = base[c] as f32;
            let over = match placement.blend {
                BlendMode::Normal => ink[c] as f32,
                BlendMode::Multiply => under * ink[c] as f32 / 255.0,
            };
            base[c] = (over * alpha + under * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
        }
        base[3] = 255;
    }
    out
}

/// Convenience for the try-on step: knock out the paper and composite in one go.
pub fn try_on(photo: &DynamicImage, design: &DynamicImage, placement: &Placement) -> DynamicImage {
    let ink = knock_out_background(design, 235);
    DynamicImage::ImageRgba8(composite(photo, &ink, placement))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skin(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([200, 160, 140, 255])))
    }

    fn black_square(side: u32) -> RgbaImage {
        ImageBuffer::from_pixel(side, side, Rgba([0, 0, 0, 255]))
    }

    /// Bilinear sampling truncates, so covered pixels may be off by a step or two.
    fn is_inked(pixel: &Rgba<u8>) -> bool {
        pixel.0[..3].iter().all(|&c| c <= 2)
    }

    #[test]
    fn test_initial_placement_is_centred() {
        let placement = initial_placement((1000, 800), (400, 200));
        assert_eq!(placement.center_x, 500.0);
        assert_eq!(placement.center_y, 400.0);
        assert!((placement.scale - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_knock_out_makes_white_transparent() {
        let img = ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 { Rgba([255, 255, 255, 255]) } else { Rgba([0, 0, 0, 255]) }
        });
        let out = knock_out_background(&DynamicImage::ImageRgba8(img), 235);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(1, 0)[3], 255);
    }

    #[test]
    fn test_composite_only_touches_covered_pixels() {
        let photo = skin(100, 100);
        let placement = Placement {
            center_x: 50.0,
            center_y: 50.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            blend: BlendMode::Normal,
        };
        let out = composite(&photo, &black_square(20), &placement);

        assert_eq!(out.dimensions(), (100, 100));
        assert!(is_inked(out.get_pixel(50, 50)));
        assert_eq!(out.get_pixel(5, 5).0, [200, 160, 140, 255]);
        assert_eq!(out.get_pixel(80, 50).0, [200, 160, 140, 255]);
    }

    #[test]
    fn test_scale_and_rotation_move_coverage() {
        let photo = skin(100, 100);
        let mut placement = Placement {
            center_x: 50.0,
            center_y: 50.0,
            scale: 2.0,
            rotation: 0.0,
            opacity: 1.0,
            blend: BlendMode::Normal,
        };
        // 10px square scaled 2x spans 40..60
        let out = composite(&photo, &black_square(10), &placement);
        assert!(is_inked(out.get_pixel(43, 50)));
        assert_eq!(out.get_pixel(35, 50).0, [200, 160, 140, 255]);
        assert_eq!(out.get_pixel(60, 50).0, [200, 160, 140, 255]);

        // rotated 45 degrees the corner reaches further along the axis
        placement.rotation = 45.0;
        let out = composite(&photo, &black_square(10), &placement);
        assert!(is_inked(out.get_pixel(60, 50)));
        assert_eq!(out.get_pixel(59, 41).0, [200, 160, 140, 255]);
    }

    #[test]
    fn test_multiply_with_half_opacity() {
        let photo = skin(10, 10);
        let placement = Placement {
            center_x: 5.0,
            center_y: 5.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 0.5,
            blend: BlendMode::Multiply,
        };
        let grey: RgbaImage = ImageBuffer::from_pixel(10, 10, Rgba([128, 128, 128, 255]));
        let out = composite(&photo, &grey, &placement);
        // 200 * 128/255 = 100.4, half way to 200 = 150.2
        assert!((out.get_pixel(5, 5)[0] as i32 - 150).abs() <= 1);
    }

    #[test]
    fn test_zero_opacity_leaves_photo_unchanged() {
        let photo = skin(20, 20);
        let mut placement = initial_placement((20, 20), (10, 10));
        placement.opacity = 0.0;
        let out = composite(&photo, &black_square(10), &placement);
        assert_eq!(out, photo.to_rgba8());
    }
}
