//! Attention-guided crop window selection.
//!
//! The source is downsampled to a small interest map where every pixel is
//! scored by edge strength (Sobel), color saturation and a skin-tone bonus,
//! weighted by alpha so padding never attracts the window. The map's
//! integral image then scores every candidate window in constant time; the
//! best one wins, ties going to the window nearest the center.

use crate::types::Dimensions;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use imageproc::gradients::sobel_gradients;
use imageproc::integral_image::{integral_image, sum_image_pixels};

const SKIN_BONUS: u32 = 96;

type IntegralMap = ImageBuffer<Luma<u64>, Vec<u64>>;

/// Top-left corner, in source pixels, of the most salient `crop` window.
///
/// `crop` must fit inside `image`; callers check that beforehand.
pub fn find_attention_window(image: &RgbaImage, crop: Dimensions, analysis_size: u32) -> (u32, u32) {
    let (width, height) = image.dimensions();
    if crop.width >= width && crop.height >= height {
        return (0, 0);
    }

    let scale = (f64::from(analysis_size) / f64::from(width.max(height))).min(1.0);
    let to_small = |side: u32, limit: u32| -> u32 {
        ((f64::from(side) * scale).round() as u32).clamp(1, limit)
    };
    let small_w = to_small(width, width);
    let small_h = to_small(height, height);
    let small = if scale < 1.0 {
        imageops::resize(image, small_w, small_h, FilterType::Triangle)
    } else {
        image.clone()
    };

    let integral: IntegralMap = integral_image::<_, u64>(&interest_map(&small));
    let window_w = to_small(crop.width, small_w);
    let window_h = to_small(crop.height, small_h);

    let center_x = f64::from(small_w - window_w) / 2.0;
    let center_y = f64::from(small_h - window_h) / 2.0;
    let mut best = (0u32, 0u32);
    let mut best_score = 0u64;
    let mut best_distance = f64::INFINITY;

    for y in 0..=small_h - window_h {
        for x in 0..=small_w - window_w {
            let score = window_sum(&integral, x, y, window_w, window_h);
            let distance = (f64::from(x) - center_x).powi(2) + (f64::from(y) - center_y).powi(2);
            if score > best_score || (score == best_score && distance < best_distance) {
                best = (x, y);
                best_score = score;
                best_distance = distance;
            }
        }
    }

    let to_source = |small_offset: u32, max: u32| -> u32 {
        ((f64::from(small_offset) / scale).round() as u32).min(max)
    };
    (
        to_source(best.0, width - crop.width.min(width)),
        to_source(best.1, height - crop.height.min(height)),
    )
}

/// Sum of the interest map over a `width` x `height` window at `(x, y)`.
fn window_sum(integral: &IntegralMap, x: u32, y: u32, width: u32, height: u32) -> u64 {
    sum_image_pixels(integral, x, y, x + width - 1, y + height - 1)[0]
}

/// Per-pixel interest, halved to fit a byte and scaled by alpha.
fn interest_map(image: &RgbaImage) -> GrayImage {
    let gray: GrayImage = imageops::grayscale(image);
    let edges = sobel_gradients(&gray);

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = *image.get_pixel(x, y);
        let edge = u32::from(edges.get_pixel(x, y)[0]).min(255);
        let raw = edge + saturation(pixel) / 2 + skin(pixel);
        let weighted = raw * u32::from(pixel[3]) / 255 / 2;
        Luma([weighted.min(255) as u8])
    })
}

fn saturation(Rgba([r, g, b, _]): Rgba<u8>) -> u32 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    u32::from(max - min)
}

fn skin(Rgba([r, g, b, _]): Rgba<u8>) -> u32 {
    let is_skin = r > 95
        && g > 40
        && b > 20
        && r > g
        && r > b
        && r - g.min(b) > 15
        && r.abs_diff(g) > 15;
    if is_skin { SKIN_BONUS } else { 0 }
}
