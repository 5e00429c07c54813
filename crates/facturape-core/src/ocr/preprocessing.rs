//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::PreprocessingConfig;

const BINS: usize = 256;

/// Grayscale conversion plus contrast-limited adaptive histogram equalization.
///
/// Receipt photos are often unevenly lit; equalizing per tile and blending
/// the tile mappings bilinearly brings faded print back without blowing out
/// the whole page.
pub struct ContrastEnhancer {
    /// Clip limit relative to a flat histogram.
    clip_limit: f32,
    /// Tiles along each axis.
    tile_grid: u32,
}

impl ContrastEnhancer {
    /// Create an enhancer with default settings (clip 2.0, 8x8 tiles).
    pub fn new() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }

    /// Create an enhancer from configuration.
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            clip_limit: config.clip_limit,
            tile_grid: config.tile_grid,
        }
    }

    /// Set the clip limit.
    pub fn with_clip_limit(mut self, clip_limit: f32) -> Self {
        self.clip_limit = clip_limit;
        self
    }

    /// Set the number of tiles per axis.
    pub fn with_tile_grid(mut self, tile_grid: u32) -> Self {
        self.tile_grid = tile_grid;
        self
    }

    /// Enhance an image, returning a grayscale image of the same size.
    pub fn enhance(&self, image: &DynamicImage) -> Result<GrayImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "cannot enhance an empty image ({}x{})",
                width, height
            )));
        }
        if self.tile_grid == 0 {
            return Err(OcrError::Preprocessing("tile grid must be at least 1".to_string()));
        }
        if self.clip_limit <= 0.0 {
            return Err(OcrError::Preprocessing(format!(
                "clip limit must be positive, got {}",
                self.clip_limit
            )));
        }

        let gray = image.to_luma8();

        let tile_w = width.div_ceil(self.tile_grid).max(1);
        let tile_h = height.div_ceil(self.tile_grid).max(1);
        let tiles_x = width.div_ceil(tile_w) as usize;
        let tiles_y = height.div_ceil(tile_h) as usize;

        debug!(
            "Enhancing {}x{} image with {}x{} tiles of {}x{}",
            width, height, tiles_x, tiles_y, tile_w, tile_h
        );

        let mut luts = Vec::with_capacity(tiles_x * tiles_y);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let x0 = tx as u32 * tile_w;
                let y0 = ty as u32 * tile_h;
                let x1 = (x0 + tile_w).min(width);
                let y1 = (y0 + tile_h).min(height);
                luts.push(self.tile_mapping(&gray, x0, y0, x1, y1));
            }
        }

        let mut output = GrayImage::new(width, height);
        for y in 0..height {
            let (ty0, ty1, wy) = blend_position(y, tile_h, tiles_y);
            for x in 0..width {
                let (tx0, tx1, wx) = blend_position(x, tile_w, tiles_x);
                let v = gray.get_pixel(x, y)[0] as usize;

                let top = lerp(luts[ty0 * tiles_x + tx0][v], luts[ty0 * tiles_x + tx1][v], wx);
                let bottom = lerp(luts[ty1 * tiles_x + tx0][v], luts[ty1 * tiles_x + tx1][v], wx);
                let value = lerp(top, bottom, wy);

                output.put_pixel(x, y, Luma([value.round().clamp(0.0, 255.0) as u8]));
            }
        }

        Ok(output)
    }

    /// Clipped, equalized intensity mapping for one tile.
    fn tile_mapping(&self, gray: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> [f32; BINS] {
        let mut hist = [0u32; BINS];
        for y in y0..y1 {
            for x in x0..x1 {
                hist[gray.get_pixel(x, y)[0] as usize] += 1;
            }
        }

        let pixels = ((x1 - x0) * (y1 - y0)) as f32;
        let limit = ((self.clip_limit * pixels / BINS as f32) as u32).max(1);

        let mut excess = 0u32;
        for count in hist.iter_mut() {
            if *count > limit {
                excess += *count - limit;
                *count = limit;
            }
        }

        let share = excess / BINS as u32;
        let remainder = (excess % BINS as u32) as usize;
        for (i, count) in hist.iter_mut().enumerate() {
            *count += share + u32::from(i < remainder);
        }

        let mut lut = [0f32; BINS];
        let mut cdf = 0u32;
        for (i, count) in hist.iter().enumerate() {
            cdf += count;
            lut[i] = cdf as f32 * 255.0 / pixels;
        }
        lut
    }
}

impl Default for ContrastEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

/// Neighbouring tile indices and blend weight for a pixel coordinate.
fn blend_position(coord: u32, tile_size: u32, tiles: usize) -> (usize, usize, f32) {
    let f = (coord as f32 + 0.5) / tile_size as f32 - 0.5;
    let first = (f.max(0.0).floor() as usize).min(tiles - 1);
    let second = (first + 1).min(tiles - 1);
    let weight = (f - first as f32).clamp(0.0, 1.0);
    (first, second, weight)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
