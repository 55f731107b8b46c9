// ============================================================================
// BRUSH MAPPER — display space → grid cells
// ============================================================================

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 10;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 10.0;

/// Zoom tool: left click.
pub const ZOOM_IN_FACTOR: f32 = 1.2;
/// Zoom tool: right click.
pub const ZOOM_OUT_FACTOR: f32 = 0.8;

/// Brush tip shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BrushShape {
    #[default]
    Square,
}

impl BrushShape {
    pub fn label(&self) -> &'static str {
        match self {
            BrushShape::Square => "Square",
        }
    }

    pub fn all() -> &'static [BrushShape] {
        &[BrushShape::Square]
    }
}

/// Active brush size, shape and zoom.  Size and zoom are clamped on every
/// mutation, so a `BrushSpec` is never out of range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushSpec {
    size: u32,
    shape: BrushShape,
    zoom: f32,
}

impl Default for BrushSpec {
    fn default() -> Self {
        Self {
            size: MIN_BRUSH_SIZE,
            shape: BrushShape::Square,
            zoom: MIN_ZOOM,
        }
    }
}

impl BrushSpec {
    pub fn new(size: i32, shape: BrushShape, zoom: f32) -> Self {
        let mut spec = Self { shape, ..Self::default() };
        spec.set_size(size);
        spec.set_zoom(zoom);
        spec
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn shape(&self) -> BrushShape {
        self.shape
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_size(&mut self, size: i32) {
        self.size = size.clamp(MIN_BRUSH_SIZE as i32, MAX_BRUSH_SIZE as i32) as u32;
    }

    /// Grow or shrink by `delta` steps, clamped.
    pub fn adjust_size(&mut self, delta: i32) {
        self.set_size((self.size as i32).saturating_add(delta));
    }

    pub fn set_shape(&mut self, shape: BrushShape) {
        self.shape = shape;
    }

    /// NaN is treated as the minimum zoom.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_nan() {
            MIN_ZOOM
        } else {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        };
    }

    /// `zoom *= factor`, clamped.  Factors above 1 zoom in.
    pub fn apply_zoom(&mut self, factor: f32) -> f32 {
        self.set_zoom(self.zoom * factor);
        self.zoom
    }

    /// Display pixels covered by one grid cell at the current zoom.
    pub fn cell_display_size(&self, cell_pixel_size: u32) -> f32 {
        cell_pixel_size as f32 * self.zoom
    }
}

/// Map a pointer position in display space to a grid cell:
/// `floor(p / zoom / cell_pixel_size)` on each axis.
///
/// Every consumer (draw, sample, fill, hover preview) goes through this one
/// function.  Positions left of / above the canvas map to negative cells.
/// Non-finite positions map to `i32::MIN`, far enough out that no brush
/// footprint around them reaches the grid.
pub fn display_to_cell(px: f32, py: f32, zoom: f32, cell_pixel_size: u32) -> (i32, i32) {
    let cell = cell_pixel_size.max(1) as f32;
    let zoom = if zoom > 0.0 { zoom } else { MIN_ZOOM };
    let to_cell = |p: f32| {
        let g = (p / zoom / cell).floor();
        if g.is_finite() { g as i32 } else { i32::MIN }
    };
    (to_cell(px), to_cell(py))
}

/// Offsets a brush of `size` covers along one axis, relative to its centre:
/// `floor(-size / 2) + 1 ..= floor(size / 2)`.
///
/// Always exactly `size` offsets.  Even sizes lean towards +x/+y (a size-2
/// brush covers the centre and the cell to its right/below); that lean is
/// kept as-is so strokes line up with existing artwork.
fn axis_offsets(size: u32) -> std::ops::RangeInclusive<i32> {
    let size = size as i32;
    (-size).div_euclid(2) + 1..=size.div_euclid(2)
}

/// Cells stamped by one brush application centred on `(center_x, center_y)`,
/// restricted to `[0, grid_width) × [0, grid_height)`.
pub fn brush_footprint(
    center_x: i32,
    center_y: i32,
    spec: &BrushSpec,
    grid_width: u32,
    grid_height: u32,
) -> Vec<(i32, i32)> {
    let in_grid = |x: i32, y: i32| {
        x >= 0 && y >= 0 && (x as u32) < grid_width && (y as u32) < grid_height
    };

    match spec.shape {
        BrushShape::Square => {
            let mut cells = Vec::with_capacity((spec.size * spec.size) as usize);
            for dx in axis_offsets(spec.size) {
                for dy in axis_offsets(spec.size) {
                    let (x, y) = (center_x.saturating_add(dx), center_y.saturating_add(dy));
                    if in_grid(x, y) {
                        cells.push((x, y));
                    }
                }
            }
            cells
        }
    }
}
