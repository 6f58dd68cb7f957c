//! Page geometry for image placement
//!
//! All measurements are in PDF points (1 point = 1/72 inch).

/// US Letter width in points (8.5 inches)
pub const LETTER_WIDTH: f64 = 612.0;
/// US Letter height in points (11 inches)
pub const LETTER_HEIGHT: f64 = 792.0;
/// Raster density images are clamped to when merged
pub const TARGET_DPI: u32 = 300;

/// Fixed target page size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const LETTER: Canvas = Canvas {
        width: LETTER_WIDTH,
        height: LETTER_HEIGHT,
    };

    /// Largest pixel dimensions that still print at `dpi` on this canvas.
    /// Letter at 300 DPI is 2550x3300.
    pub fn pixel_bounds(&self, dpi: u32) -> (u32, u32) {
        let width = (self.width / 72.0 * dpi as f64) as u32;
        let height = (self.height / 72.0 * dpi as f64) as u32;
        (width, height)
    }

    /// Scale an image of `width_px` x `height_px` to fit entirely inside the
    /// canvas without distortion, and center it.
    ///
    /// The scale factor is `min(canvas_w / w, canvas_h / h)`, so small images
    /// are enlarged and large ones reduced.
    pub fn fit_centered(&self, width_px: u32, height_px: u32) -> Placement {
        let scale = (self.width / width_px as f64).min(self.height / height_px as f64);
        let width = width_px as f64 * scale;
        let height = height_px as f64 * scale;

        Placement {
            x: (self.width - width) / 2.0,
            y: (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Where an image lands on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Shrink-only resize target that keeps `width_px` x `height_px` within
/// `max_width` x `max_height` while preserving aspect ratio.
///
/// Returns `None` when the image already fits.
pub fn downscale_to_fit(
    width_px: u32,
    height_px: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    let scale =
        (max_width as f64 / width_px as f64).min(max_height as f64 / height_px as f64);

    if scale >= 1.0 {
        return None;
    }

    let new_width = ((width_px as f64 * scale) as u32).max(1);
    let new_height = ((height_px as f64 * scale) as u32).max(1);
    Some((new_width, new_height))
}
