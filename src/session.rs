use image::Rgba;
use uuid::Uuid;

use crate::brush::{self, BrushShape, BrushSpec, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::canvas::{self, RasterBuffer, WHITE};
use crate::components::colors::{Palette, to_hex};
use crate::components::tools::Tool;
use crate::error::PixelError;
use crate::logger::Logger;
use crate::{log_debug, log_info, log_trace};

/// Startup geometry of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Display pixels per cell at zoom 1.
    pub cell_pixel_size: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        // 512×512 display pixels at 8px per cell
        Self {
            width: 64,
            height: 64,
            cell_pixel_size: 8,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), PixelError> {
        canvas::validate_dimensions(self.width, self.height)?;
        if self.cell_pixel_size == 0 {
            return Err(PixelError::InvalidCellSize);
        }
        Ok(())
    }
}

// ============================================================================
// Normalized input events
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button went down.
    Press,
    /// Pointer moved with the button held.
    Drag,
}

/// A pointer event in display space (relative to the canvas origin).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub button: PointerButton,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn press(x: f32, y: f32, button: PointerButton) -> Self {
        Self { x, y, button, phase: PointerPhase::Press }
    }

    pub fn drag(x: f32, y: f32, button: PointerButton) -> Self {
        Self { x, y, button, phase: PointerPhase::Drag }
    }
}

/// What an event did, so the host knows whether to redraw or refresh widgets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventOutcome {
    /// Brush/eraser stamped this many cells.
    Painted(usize),
    /// Dropper picked this colour; it is now the current colour.
    Sampled(Rgba<u8>),
    /// Flood fill rewrote this many cells.
    Filled(usize),
    /// Zoom changed; new zoom level.
    Zoomed(f32),
    /// Brush size changed; new size.
    BrushSize(u32),
    Ignored,
}

impl EventOutcome {
    /// True when the canvas needs to be re-rendered.
    pub fn needs_redraw(&self) -> bool {
        match self {
            EventOutcome::Painted(n) | EventOutcome::Filled(n) => *n > 0,
            EventOutcome::Zoomed(_) => true,
            EventOutcome::Sampled(_) | EventOutcome::BrushSize(_) | EventOutcome::Ignored => false,
        }
    }
}

// ============================================================================
// EditorSession — owns the raster, brush, tool and palette
// ============================================================================

pub struct EditorSession {
    id: Uuid,
    raster: RasterBuffer,
    brush: BrushSpec,
    tool: Tool,
    palette: Palette,
    cell_pixel_size: u32,
    logger: Logger,
}

impl EditorSession {
    pub fn new(config: SessionConfig, logger: Logger) -> Result<Self, PixelError> {
        Self::with_id(Uuid::new_v4(), config, logger)
    }

    /// Like [`EditorSession::new`] with a caller-chosen id (the host uses the
    /// same id in the log file header).
    pub fn with_id(id: Uuid, config: SessionConfig, logger: Logger) -> Result<Self, PixelError> {
        config.validate()?;
        let raster = RasterBuffer::new(config.width, config.height, logger.named("canvas"))?;
        let palette = Palette::new(logger.named("palette"));
        let session_logger = logger.named("session");

        log_info!(
            session_logger,
            "session {} initialized: {}x{} cells at {}px",
            id,
            config.width,
            config.height,
            config.cell_pixel_size
        );

        Ok(Self {
            id,
            raster,
            brush: BrushSpec::default(),
            tool: Tool::default(),
            palette,
            cell_pixel_size: config.cell_pixel_size,
            logger: session_logger,
        })
    }

    // ---- read-only projections ---------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    /// Direct access for hosts that edit pixels outside the tool flow.
    pub fn raster_mut(&mut self) -> &mut RasterBuffer {
        &mut self.raster
    }

    pub fn brush(&self) -> &BrushSpec {
        &self.brush
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn current_color(&self) -> Rgba<u8> {
        self.palette.current()
    }

    pub fn cell_pixel_size(&self) -> u32 {
        self.cell_pixel_size
    }

    /// Canvas size in display pixels at the current zoom.
    pub fn display_size(&self) -> (f32, f32) {
        let cell = self.brush.cell_display_size(self.cell_pixel_size);
        (self.raster.width() as f32 * cell, self.raster.height() as f32 * cell)
    }

    /// Grid cell under a display-space position.
    pub fn cell_at(&self, x: f32, y: f32) -> (i32, i32) {
        brush::display_to_cell(x, y, self.brush.zoom(), self.cell_pixel_size)
    }

    /// Cells the brush would cover under the pointer (hover overlay).
    pub fn brush_preview(&self, x: f32, y: f32) -> Vec<(i32, i32)> {
        let (cx, cy) = self.cell_at(x, y);
        brush::brush_footprint(cx, cy, &self.brush, self.raster.width(), self.raster.height())
    }

    // ---- discrete UI events -------------------------------------------------

    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
        log_info!(self.logger, "Current tool: {}", tool);
    }

    pub fn select_tool_by_name(&mut self, name: &str) -> Result<Tool, PixelError> {
        let tool: Tool = name.parse()?;
        self.select_tool(tool);
        Ok(tool)
    }

    pub fn select_color(&mut self, color: Rgba<u8>) {
        self.palette.set_color(color);
    }

    pub fn set_brush_size(&mut self, size: i32) -> u32 {
        self.brush.set_size(size);
        log_debug!(self.logger, "Brush size set to {}", self.brush.size());
        self.brush.size()
    }

    pub fn set_brush_shape(&mut self, shape: BrushShape) {
        self.brush.set_shape(shape);
        log_info!(self.logger, "Brush shape: {}", shape.label());
    }

    /// Mouse wheel, in notches (positive = away from the user).
    ///
    /// Brush/eraser: resize the brush by one step per notch.
    /// Zoom: zoom in/out by one tool step per notch, stopping as soon as a
    /// zoom limit is reached.  Other tools ignore it.
    pub fn wheel(&mut self, notches: i32) -> EventOutcome {
        if notches == 0 {
            return EventOutcome::Ignored;
        }
        if self.tool.uses_brush() {
            self.brush.adjust_size(notches);
            log_debug!(self.logger, "Brush size adjusted to {}", self.brush.size());
            return EventOutcome::BrushSize(self.brush.size());
        }
        if self.tool == Tool::Zoom {
            let factor = if notches > 0 { ZOOM_IN_FACTOR } else { ZOOM_OUT_FACTOR };
            for _ in 0..notches.unsigned_abs() {
                let before = self.brush.zoom();
                if self.brush.apply_zoom(factor) == before {
                    break;
                }
            }
            return self.zoomed();
        }
        EventOutcome::Ignored
    }

    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), PixelError> {
        self.raster.resize(width, height)?;
        log_info!(self.logger, "Canvas resized to {}x{}", width, height);
        Ok(())
    }

    pub fn clear_canvas(&mut self) {
        self.raster.clear(WHITE);
        log_info!(self.logger, "Canvas cleared");
    }

    // ---- pointer dispatch ---------------------------------------------------

    /// Route a pointer event through the active tool.
    ///
    /// | tool    | press                          | drag |
    /// |---------|--------------------------------|------|
    /// | brush   | stamp footprint, current color | same |
    /// | eraser  | stamp footprint, white         | same |
    /// | dropper | sample cell → current color    | -    |
    /// | fill    | flood fill with current color  | -    |
    /// | zoom    | primary ×1.2, secondary ×0.8   | -    |
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EventOutcome {
        use PointerButton::{Primary, Secondary};

        if event.phase == PointerPhase::Drag && !self.tool.paints_on_drag() {
            return EventOutcome::Ignored;
        }

        let (cx, cy) = self.cell_at(event.x, event.y);
        match (self.tool, event.button) {
            (Tool::Brush, Primary) => self.stamp(cx, cy, self.palette.current()),
            (Tool::Eraser, Primary) => self.stamp(cx, cy, WHITE),
            (Tool::Dropper, Primary) => self.sample(cx, cy),
            (Tool::Fill, Primary) => {
                let filled = self.raster.flood_fill(cx, cy, self.palette.current());
                log_debug!(self.logger, "Fill at ({}, {}) covered {} cells", cx, cy, filled);
                EventOutcome::Filled(filled)
            }
            (Tool::Zoom, Primary) => {
                self.brush.apply_zoom(ZOOM_IN_FACTOR);
                self.zoomed()
            }
            (Tool::Zoom, Secondary) => {
                self.brush.apply_zoom(ZOOM_OUT_FACTOR);
                self.zoomed()
            }
            _ => EventOutcome::Ignored,
        }
    }

    fn stamp(&mut self, cx: i32, cy: i32, color: Rgba<u8>) -> EventOutcome {
        let cells = brush::brush_footprint(cx, cy, &self.brush, self.raster.width(), self.raster.height());
        let written = self.raster.set_pixels(&cells, color);
        log_trace!(self.logger, "stamp {} at ({}, {}): {} cells", to_hex(color), cx, cy, written);
        EventOutcome::Painted(written)
    }

    fn sample(&mut self, cx: i32, cy: i32) -> EventOutcome {
        if !self.raster.contains(cx, cy) {
            return EventOutcome::Ignored;
        }
        let color = self.raster.get_pixel(cx, cy);
        self.palette.set_color(color);
        EventOutcome::Sampled(color)
    }

    fn zoomed(&self) -> EventOutcome {
        log_debug!(self.logger, "Zoom level {:.2}", self.brush.zoom());
        EventOutcome::Zoomed(self.brush.zoom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::TRANSPARENT;
    use crate::logger::Level;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn session() -> EditorSession {
        EditorSession::new(SessionConfig::default(), Logger::disabled()).unwrap()
    }

    fn press(x: f32, y: f32) -> PointerEvent {
        PointerEvent::press(x, y, PointerButton::Primary)
    }

    #[test]
    fn config_is_validated() {
        let bad = SessionConfig { cell_pixel_size: 0, ..SessionConfig::default() };
        assert_eq!(
            EditorSession::new(bad, Logger::disabled()).err(),
            Some(PixelError::InvalidCellSize)
        );
        let empty = SessionConfig { width: 0, ..SessionConfig::default() };
        assert!(EditorSession::new(empty, Logger::disabled()).is_err());
    }

    #[test]
    fn brush_paints_current_color_on_press_and_drag() {
        let mut s = session();
        s.select_color(RED);
        assert_eq!(s.handle_pointer(press(17.0, 25.0)), EventOutcome::Painted(1));
        assert_eq!(s.raster().get_pixel(2, 3), RED);

        let drag = PointerEvent::drag(40.0, 25.0, PointerButton::Primary);
        assert_eq!(s.handle_pointer(drag), EventOutcome::Painted(1));
        assert_eq!(s.raster().get_pixel(5, 3), RED);
    }

    #[test]
    fn eraser_restores_white() {
        let mut s = session();
        s.select_color(RED);
        s.set_brush_size(3);
        s.handle_pointer(press(80.0, 80.0));
        assert_eq!(s.raster().get_pixel(9, 9), RED);

        s.select_tool(Tool::Eraser);
        assert_eq!(s.handle_pointer(press(80.0, 80.0)), EventOutcome::Painted(9));
        assert_eq!(s.raster().get_pixel(9, 9), WHITE);
        assert_eq!(s.raster().get_pixel(11, 11), WHITE);
    }

    #[test]
    fn dropper_samples_into_palette_and_ignores_drag() {
        let mut s = session();
        s.raster_mut().set_pixel(0, 0, RED);
        s.select_tool(Tool::Dropper);

        let drag = PointerEvent::drag(1.0, 1.0, PointerButton::Primary);
        assert_eq!(s.handle_pointer(drag), EventOutcome::Ignored);

        assert_eq!(s.handle_pointer(press(1.0, 1.0)), EventOutcome::Sampled(RED));
        assert_eq!(s.current_color(), RED);
    }

    #[test]
    fn dropper_outside_grid_keeps_color() {
        let mut s = session();
        s.select_tool(Tool::Dropper);
        assert_eq!(s.handle_pointer(press(10_000.0, 1.0)), EventOutcome::Ignored);
        assert_ne!(s.current_color(), TRANSPARENT);
    }

    #[test]
    fn fill_uses_current_color() {
        let mut s = session();
        s.select_color(RED);
        s.select_tool(Tool::Fill);
        assert_eq!(s.handle_pointer(press(3.0, 3.0)), EventOutcome::Filled(64 * 64));
        assert_eq!(s.handle_pointer(press(3.0, 3.0)), EventOutcome::Filled(0));
    }

    #[test]
    fn zoom_tool_steps_in_and_out() {
        let mut s = session();
        s.select_tool(Tool::Zoom);
        match s.handle_pointer(press(0.0, 0.0)) {
            EventOutcome::Zoomed(z) => assert!((z - 1.2).abs() < 1e-6),
            other => panic!("expected zoom, got {other:?}"),
        }
        let right = PointerEvent::press(0.0, 0.0, PointerButton::Secondary);
        match s.handle_pointer(right) {
            // 1.2 * 0.8 = 0.96, clamped back up to the minimum
            EventOutcome::Zoomed(z) => assert_eq!(z, 1.0),
            other => panic!("expected zoom, got {other:?}"),
        }
    }

    #[test]
    fn zoom_changes_cell_mapping() {
        let mut s = session();
        s.select_tool(Tool::Zoom);
        for _ in 0..4 {
            s.handle_pointer(press(0.0, 0.0));
        }
        // 1.2^4 ≈ 2.07: one cell spans ~16.6 display pixels
        assert_eq!(s.cell_at(17.0, 16.0), (1, 0));
        let (w, _) = s.display_size();
        assert!((w - 64.0 * 8.0 * s.brush().zoom()).abs() < 1e-3);
    }

    #[test]
    fn secondary_button_only_matters_for_zoom() {
        let mut s = session();
        let right = PointerEvent::press(8.0, 8.0, PointerButton::Secondary);
        assert_eq!(s.handle_pointer(right), EventOutcome::Ignored);
        assert_eq!(s.raster().get_pixel(1, 1), WHITE);
    }

    #[test]
    fn wheel_resizes_brush_for_painting_tools_only() {
        let mut s = session();
        assert_eq!(s.wheel(3), EventOutcome::BrushSize(4));
        assert_eq!(s.wheel(-10), EventOutcome::BrushSize(1));
        assert_eq!(s.wheel(0), EventOutcome::Ignored);

        s.select_tool(Tool::Fill);
        assert_eq!(s.wheel(2), EventOutcome::Ignored);
        assert_eq!(s.brush().size(), 1);

        s.select_tool(Tool::Zoom);
        assert!(matches!(s.wheel(50), EventOutcome::Zoomed(z) if z == 10.0));
    }

    #[test]
    fn wheel_zoom_steps_out_with_negative_notches() {
        let mut s = session();
        s.select_tool(Tool::Zoom);
        s.wheel(3);
        match s.wheel(-1) {
            // 1.2^3 * 0.8 = 1.3824
            EventOutcome::Zoomed(z) => assert!((z - 1.3824).abs() < 1e-4, "zoom {z}"),
            other => panic!("expected zoom, got {other:?}"),
        }
        assert_eq!(s.wheel(-5), EventOutcome::Zoomed(1.0));
        assert_eq!(s.brush().size(), 1);
    }

    #[test]
    fn extreme_wheel_deltas_stop_at_zoom_limits() {
        let mut s = session();
        s.select_tool(Tool::Zoom);
        assert_eq!(s.wheel(i32::MAX), EventOutcome::Zoomed(10.0));
        assert_eq!(s.wheel(i32::MIN), EventOutcome::Zoomed(1.0));
        assert_eq!(s.wheel(i32::MIN), EventOutcome::Zoomed(1.0));
    }

    #[test]
    fn eraser_keeps_erasing_while_dragged() {
        let mut s = session();
        s.select_color(RED);
        s.handle_pointer(press(4.0, 4.0));
        s.handle_pointer(press(12.0, 4.0));

        s.select_tool(Tool::Eraser);
        for x in [4.0, 12.0] {
            let drag = PointerEvent::drag(x, 4.0, PointerButton::Primary);
            assert_eq!(s.handle_pointer(drag), EventOutcome::Painted(1));
        }
        assert_eq!(s.raster().get_pixel(0, 0), WHITE);
        assert_eq!(s.raster().get_pixel(1, 0), WHITE);
    }

    #[test]
    fn fill_and_zoom_ignore_drags() {
        let mut s = session();
        s.select_color(RED);
        let before = s.raster().snapshot();

        s.select_tool(Tool::Fill);
        let drag = PointerEvent::drag(3.0, 3.0, PointerButton::Primary);
        assert_eq!(s.handle_pointer(drag), EventOutcome::Ignored);
        assert_eq!(s.raster().snapshot(), before);

        s.select_tool(Tool::Zoom);
        for button in [PointerButton::Primary, PointerButton::Secondary] {
            let drag = PointerEvent::drag(3.0, 3.0, button);
            assert_eq!(s.handle_pointer(drag), EventOutcome::Ignored);
        }
        assert_eq!(s.brush().zoom(), 1.0);
    }

    #[test]
    fn only_visible_changes_need_a_redraw() {
        assert!(EventOutcome::Painted(1).needs_redraw());
        assert!(EventOutcome::Filled(12).needs_redraw());
        assert!(EventOutcome::Zoomed(1.0).needs_redraw());
        assert!(!EventOutcome::Painted(0).needs_redraw());
        assert!(!EventOutcome::Filled(0).needs_redraw());
        assert!(!EventOutcome::Sampled(RED).needs_redraw());
        assert!(!EventOutcome::BrushSize(3).needs_redraw());
        assert!(!EventOutcome::Ignored.needs_redraw());

        // Stamping off the canvas writes nothing.
        let mut s = session();
        assert!(!s.handle_pointer(press(-20.0, -20.0)).needs_redraw());
    }

    #[test]
    fn brush_shape_selection_is_logged() {
        let logger = Logger::memory(Level::Info);
        let mut s = EditorSession::new(SessionConfig::default(), logger.clone()).unwrap();
        s.set_brush_shape(BrushShape::Square);
        assert_eq!(s.brush().shape(), BrushShape::Square);
        assert!(logger.lines().iter().any(|l| l.contains("Brush shape: Square")));
    }

    #[test]
    fn brush_preview_follows_mapping() {
        let mut s = session();
        s.set_brush_size(2);
        let mut cells = s.brush_preview(9.0, 9.0);
        cells.sort();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);

        for tool in Tool::all() {
            s.select_tool(*tool);
            let mut same = s.brush_preview(9.0, 9.0);
            same.sort();
            assert_eq!(same, cells, "{tool}");
        }
    }

    #[test]
    fn tool_changes_are_logged() {
        let logger = Logger::memory(Level::Info);
        let mut s = EditorSession::new(SessionConfig::default(), logger.clone()).unwrap();
        assert_eq!(s.select_tool_by_name("eraser"), Ok(Tool::Eraser));
        assert!(s.select_tool_by_name("spray").is_err());
        assert_eq!(s.tool(), Tool::Eraser);

        let lines = logger.lines();
        assert!(lines.iter().any(|l| l.contains("[session] Current tool: eraser")));
    }
}
