use image::{Rgba, RgbaImage};

use crate::error::PixelError;
use crate::logger::Logger;
use crate::{log_debug, log_warn};

/// Default fill for new and grown cells.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Returned for every out-of-bounds read.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Upper bound on `width * height`.
pub const MAX_CELLS: u64 = 256_000_000;

/// Reject zero-sized or oversized grids before allocating.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), PixelError> {
    if width == 0 || height == 0 {
        return Err(PixelError::InvalidDimensions { width, height });
    }
    if (width as u64) * (height as u64) > MAX_CELLS {
        return Err(PixelError::CanvasTooLarge { width, height, max: MAX_CELLS });
    }
    Ok(())
}

// ============================================================================
// RASTER BUFFER – the authoritative pixel grid
// ============================================================================

/// Fixed-size RGBA grid with bounds-checked access.
///
/// Coordinates are signed so callers can pass whatever the coordinate mapper
/// produced (including negative cells left of / above the canvas).  Reads
/// outside the grid return [`TRANSPARENT`]; writes outside it are dropped.
#[derive(Clone, Debug)]
pub struct RasterBuffer {
    pixels: RgbaImage,
    logger: Logger,
}

impl RasterBuffer {
    // ---- construction -------------------------------------------------------

    /// Create a grid filled with opaque white.
    pub fn new(width: u32, height: u32, logger: Logger) -> Result<Self, PixelError> {
        validate_dimensions(width, height)?;
        log_debug!(logger, "new {}x{} raster", width, height);
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, WHITE),
            logger,
        })
    }

    // ---- geometry -----------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Map a signed cell coordinate to an in-grid one.
    #[inline]
    fn cell(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return None;
        }
        Some((x, y))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some()
    }

    // ---- pixel access -------------------------------------------------------

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Rgba<u8> {
        match self.cell(x, y) {
            Some((x, y)) => *self.pixels.get_pixel(x, y),
            None => TRANSPARENT,
        }
    }

    /// Overwrite one cell exactly (no blending).
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if let Some((x, y)) = self.cell(x, y) {
            self.pixels.put_pixel(x, y, color);
        }
    }

    /// Stamp `color` onto every cell in `cells`.  Returns how many landed
    /// inside the grid.
    pub fn set_pixels(&mut self, cells: &[(i32, i32)], color: Rgba<u8>) -> usize {
        let mut written = 0;
        for &(x, y) in cells {
            if let Some((x, y)) = self.cell(x, y) {
                self.pixels.put_pixel(x, y, color);
                written += 1;
            }
        }
        written
    }

    // ---- bulk operations ----------------------------------------------------

    /// Overwrite every cell with `color`.
    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    /// Change the grid size, anchored at the top-left corner.
    ///
    /// The overlapping rectangle is preserved, new cells are white and cells
    /// outside the new bounds are discarded.  Invalid sizes leave the buffer
    /// untouched.
    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<(), PixelError> {
        if let Err(e) = validate_dimensions(new_width, new_height) {
            log_warn!(self.logger, "rejected resize to {}x{}: {}", new_width, new_height, e);
            return Err(e);
        }

        let keep_w = self.width().min(new_width);
        let keep_h = self.height().min(new_height);
        let mut resized = RgbaImage::from_pixel(new_width, new_height, WHITE);
        for y in 0..keep_h {
            for x in 0..keep_w {
                resized.put_pixel(x, y, *self.pixels.get_pixel(x, y));
            }
        }

        log_debug!(
            self.logger,
            "resize {}x{} -> {}x{}",
            self.width(),
            self.height(),
            new_width,
            new_height
        );
        self.pixels = resized;
        Ok(())
    }

    /// 4-connected flood fill from `(x, y)`, replacing the seed's color.
    ///
    /// DFS on an explicit stack.  Neighbours are pushed without looking at
    /// their color; the color is checked when a cell is popped, so a cell may
    /// sit on the stack more than once but is rewritten at most once (after
    /// the first write it no longer matches the old color).  Returns the
    /// number of cells rewritten.
    pub fn flood_fill(&mut self, x: i32, y: i32, new_color: Rgba<u8>) -> usize {
        // Off-grid seeds would walk an endless strip of sentinel cells.
        let Some((sx, sy)) = self.cell(x, y) else {
            return 0;
        };
        let old_color = *self.pixels.get_pixel(sx, sy);
        if old_color == new_color {
            return 0;
        }

        let (w, h) = (self.width(), self.height());
        let mut stack: Vec<(u32, u32)> = Vec::with_capacity(256);
        stack.push((sx, sy));
        let mut filled = 0usize;

        while let Some((cx, cy)) = stack.pop() {
            let pixel = self.pixels.get_pixel_mut(cx, cy);
            if *pixel != old_color {
                continue;
            }
            *pixel = new_color;
            filled += 1;

            if cx > 0 {
                stack.push((cx - 1, cy));
            }
            if cx + 1 < w {
                stack.push((cx + 1, cy));
            }
            if cy > 0 {
                stack.push((cx, cy - 1));
            }
            if cy + 1 < h {
                stack.push((cx, cy + 1));
            }
        }

        log_debug!(self.logger, "flood fill at ({}, {}) rewrote {} cells", sx, sy, filled);
        filled
    }

    // ---- rendering access ---------------------------------------------------

    /// Owned copy of the whole grid for a rendering surface.
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// Row-major RGBA bytes, `width * height * 4` long.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn raster(w: u32, h: u32) -> RasterBuffer {
        RasterBuffer::new(w, h, Logger::disabled()).unwrap()
    }

    #[test]
    fn starts_opaque_white() {
        let r = raster(3, 2);
        assert_eq!((r.width(), r.height()), (3, 2));
        assert!(r.as_raw().chunks_exact(4).all(|p| p == WHITE.0));
    }

    #[test]
    fn out_of_bounds_reads_return_sentinel() {
        let r = raster(4, 4);
        for &(x, y) in &[(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MIN, i32::MAX)] {
            assert_eq!(r.get_pixel(x, y), TRANSPARENT, "({x}, {y})");
        }
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut r = raster(4, 4);
        let before = r.snapshot();
        for &(x, y) in &[(-1, 0), (0, -1), (4, 3), (3, 4), (100, 100)] {
            r.set_pixel(x, y, RED);
        }
        assert_eq!(r.snapshot(), before);
    }

    #[test]
    fn set_pixel_overwrites_without_blending() {
        let mut r = raster(2, 2);
        let half = Rgba([10, 20, 30, 128]);
        r.set_pixel(1, 1, half);
        assert_eq!(r.get_pixel(1, 1), half);
        assert_eq!(r.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn set_pixels_counts_in_bounds_cells() {
        let mut r = raster(2, 2);
        let written = r.set_pixels(&[(0, 0), (1, 1), (2, 2), (-1, 0)], RED);
        assert_eq!(written, 2);
        assert_eq!(r.get_pixel(1, 1), RED);
    }

    #[test]
    fn clear_overwrites_every_cell() {
        let mut r = raster(3, 3);
        r.set_pixel(1, 1, RED);
        r.clear(BLACK);
        assert!(r.as_raw().chunks_exact(4).all(|p| p == BLACK.0));
        r.clear(WHITE);
        assert_eq!(r.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn fill_covers_uniform_grid() {
        let mut r = raster(8, 8);
        assert_eq!(r.flood_fill(0, 0, RED), 64);
        assert!(r.as_raw().chunks_exact(4).all(|p| p == RED.0));
    }

    #[test]
    fn fill_twice_is_a_no_op() {
        let mut r = raster(5, 5);
        r.set_pixel(2, 0, BLACK);
        r.set_pixel(2, 1, BLACK);
        r.flood_fill(0, 0, RED);
        let after_first = r.snapshot();
        assert_eq!(r.flood_fill(0, 0, RED), 0);
        assert_eq!(r.snapshot(), after_first);
    }

    #[test]
    fn fill_stops_at_border() {
        let mut r = raster(6, 6);
        for i in 0..6 {
            r.set_pixel(i, 0, BLACK);
            r.set_pixel(i, 5, BLACK);
            r.set_pixel(0, i, BLACK);
            r.set_pixel(5, i, BLACK);
        }
        assert_eq!(r.flood_fill(2, 3, RED), 16);
        for i in 0..6 {
            assert_eq!(r.get_pixel(i, 0), BLACK);
            assert_eq!(r.get_pixel(i, 5), BLACK);
            assert_eq!(r.get_pixel(0, i), BLACK);
            assert_eq!(r.get_pixel(5, i), BLACK);
        }
        assert_eq!(r.get_pixel(1, 1), RED);
        assert_eq!(r.get_pixel(4, 4), RED);
    }

    #[test]
    fn fill_is_four_connected() {
        // Diagonal wall: the fill must not leak through corner contacts.
        let mut r = raster(4, 4);
        for i in 0..4 {
            r.set_pixel(i, 3 - i, BLACK);
        }
        let filled = r.flood_fill(0, 0, RED);
        assert_eq!(filled, 6);
        assert_eq!(r.get_pixel(3, 3), WHITE);
    }

    #[test]
    fn fill_with_off_grid_seed_does_nothing() {
        let mut r = raster(4, 4);
        let before = r.snapshot();
        assert_eq!(r.flood_fill(-3, 2, RED), 0);
        assert_eq!(r.flood_fill(2, 9, RED), 0);
        assert_eq!(r.snapshot(), before);
    }

    #[test]
    fn fill_replaces_transparent_regions() {
        let mut r = raster(3, 3);
        r.clear(TRANSPARENT);
        assert_eq!(r.flood_fill(1, 1, BLACK), 9);
    }

    #[test]
    fn resize_crops_and_grows_from_top_left() {
        let mut r = raster(4, 4);
        r.set_pixel(0, 0, RED);
        r.set_pixel(3, 3, BLACK);

        let mut cropped = r.clone();
        cropped.resize(2, 2).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert_eq!(cropped.get_pixel(0, 0), RED);
        assert_eq!(cropped.get_pixel(3, 3), TRANSPARENT);

        r.resize(6, 6).unwrap();
        assert_eq!((r.width(), r.height()), (6, 6));
        assert_eq!(r.get_pixel(0, 0), RED);
        assert_eq!(r.get_pixel(3, 3), BLACK);
        assert_eq!(r.get_pixel(4, 0), WHITE);
        assert_eq!(r.get_pixel(5, 5), WHITE);
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let mut r = raster(4, 4);
        r.set_pixel(1, 1, RED);
        assert_eq!(
            r.resize(0, 3),
            Err(PixelError::InvalidDimensions { width: 0, height: 3 })
        );
        assert_eq!((r.width(), r.height()), (4, 4));
        assert_eq!(r.get_pixel(1, 1), RED);
    }

    #[test]
    fn oversized_grids_are_rejected() {
        assert!(matches!(
            validate_dimensions(100_000, 100_000),
            Err(PixelError::CanvasTooLarge { .. })
        ));
        assert!(RasterBuffer::new(0, 1, Logger::disabled()).is_err());
    }
}
