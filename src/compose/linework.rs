use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

/// Blur applied before edge detection so skin-tone noise and paper grain don't become lines
const SMOOTHING_SIGMA: f32 = 1.5;
const EDGE_LOW: f32 = 50.0;
const EDGE_HIGH: f32 = 100.0;

/// Rough stencil made locally: black edge lines on white.
///
/// Only an approximation of what the model produces, used when no API key is configured.
pub fn linework_preview(design: &DynamicImage) -> GrayImage {
    let smoothed = gaussian_blur_f32(&design.to_luma8(), SMOOTHING_SIGMA);
    let mut lines = canny(&smoothed, EDGE_LOW, EDGE_HIGH);
    image::imageops::invert(&mut lines);
    lines
}
