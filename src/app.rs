use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use image::Rgba;

use pixelscribe::brush::BrushShape;
use pixelscribe::components::colors::to_hex;
use pixelscribe::components::tools::Tool;
use pixelscribe::logger::Logger;
use pixelscribe::session::{EditorSession, EventOutcome, PointerButton, PointerEvent};
use pixelscribe::{log_debug, log_info};

/// egui scroll points per wheel notch.  egui-winit turns one wheel line (120
/// raw units on Windows) into 50 points before the app sees it.
const SCROLL_POINTS_PER_NOTCH: f32 = 50.0;
const SWATCH_SIZE: f32 = 32.0;
const HOVER_TINT: Color32 = Color32::from_rgba_premultiplied(64, 64, 64, 128);

fn to_color32(c: Rgba<u8>) -> Color32 {
    let [r, g, b, a] = c.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Window host: toolbox + palette on the left, the canvas in the centre.
///
/// Everything here is plumbing.  Pointer input is normalised into
/// [`PointerEvent`]s in canvas-local display space and handed to the session;
/// the session's raster is uploaded as a nearest-filtered texture and scaled
/// by `cell size × zoom`.
pub struct PixelScribeApp {
    session: EditorSession,
    logger: Logger,
    texture: Option<TextureHandle>,
    texture_dirty: bool,
    /// Canvas rect from the previous frame, used to route wheel input.
    canvas_rect: Option<Rect>,
    scroll_accum: f32,
    /// Swatch whose colour editor is open (right-click on a swatch).
    editing_swatch: Option<usize>,
}

impl PixelScribeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: EditorSession, logger: Logger) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let logger = logger.named("app");
        log_info!(logger, "PixelScribe application initialized");
        Self {
            session,
            logger,
            texture: None,
            texture_dirty: true,
            canvas_rect: None,
            scroll_accum: 0.0,
            editing_swatch: None,
        }
    }

    fn apply(&mut self, outcome: EventOutcome) {
        if outcome.needs_redraw() {
            self.texture_dirty = true;
        }
    }

    // ---- toolbox ------------------------------------------------------------

    fn show_toolbox(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        for tool in Tool::all() {
            let selected = self.session.tool() == *tool;
            if ui.selectable_label(selected, tool.label()).clicked() && !selected {
                self.session.select_tool(*tool);
            }
        }
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Shape:");
            for shape in BrushShape::all() {
                let selected = self.session.brush().shape() == *shape;
                if ui.selectable_label(selected, shape.label()).clicked() && !selected {
                    self.session.set_brush_shape(*shape);
                }
            }
        });
        ui.label(format!("Size: {}", self.session.brush().size()));
        ui.label(format!("Zoom: {:.2}×", self.session.brush().zoom()));
    }

    // ---- palette ------------------------------------------------------------

    fn show_palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Colors");
        let swatches = self.session.palette().swatches().to_vec();

        egui::Grid::new("palette_grid").spacing([4.0, 4.0]).show(ui, |ui| {
            for (i, color) in swatches.iter().enumerate() {
                let (rect, response) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::click());
                ui.painter().rect_filled(rect, 2.0, to_color32(*color));
                if response.clicked() {
                    let _ = self.session.palette_mut().select_swatch(i);
                }
                if response.secondary_clicked() {
                    self.editing_swatch = Some(i);
                }
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });

        ui.add_space(8.0);
        let current = self.session.current_color();
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE / 2.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, to_color32(current));
            ui.monospace(to_hex(current));
        });
    }

    /// Small colour editor for the swatch picked with a right-click.
    fn show_swatch_editor(&mut self, ctx: &egui::Context) {
        let Some(index) = self.editing_swatch else {
            return;
        };
        let Some(color) = self.session.palette().swatches().get(index).copied() else {
            self.editing_swatch = None;
            return;
        };

        let mut open = true;
        let mut rgb = [color[0], color[1], color[2]];
        egui::Window::new("Edit swatch")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    let _ = self
                        .session
                        .palette_mut()
                        .set_swatch(index, Rgba([rgb[0], rgb[1], rgb[2], 255]));
                }
            });
        if !open {
            self.editing_swatch = None;
        }
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.monospace(format!("session {}", self.session.id()));
            if let Some(path) = self.logger.path() {
                ui.separator();
                ui.monospace(format!("log: {}", path.display()));
            }
        });
    }

    // ---- canvas -------------------------------------------------------------

    fn sync_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty && self.texture.is_some() {
            return;
        }
        let raster = self.session.raster();
        let image = ColorImage::from_rgba_unmultiplied(
            [raster.width() as usize, raster.height() as usize],
            raster.as_raw(),
        );
        if let Some(tex) = self.texture.as_mut() {
            tex.set(image, TextureOptions::NEAREST);
        } else {
            self.texture = Some(ctx.load_texture("pixel_canvas", image, TextureOptions::NEAREST));
        }
        self.texture_dirty = false;
    }

    /// Turn wheel movement over the canvas into whole notches before the
    /// scroll area sees it.  Only tools that react to the wheel consume it.
    fn take_wheel(&mut self, ctx: &egui::Context) {
        let tool = self.session.tool();
        if !(tool.uses_brush() || tool == Tool::Zoom) {
            self.scroll_accum = 0.0;
            return;
        }
        let Some(canvas_rect) = self.canvas_rect else {
            return;
        };

        let delta = ctx.input_mut(|i| {
            let over_canvas = i.pointer.hover_pos().is_some_and(|pos| canvas_rect.contains(pos));
            if over_canvas && i.scroll_delta.y.abs() > 0.1 {
                let dy = i.scroll_delta.y;
                i.scroll_delta.y = 0.0;
                dy
            } else {
                0.0
            }
        });
        if delta == 0.0 {
            return;
        }

        self.scroll_accum += delta;
        let notches = (self.scroll_accum / SCROLL_POINTS_PER_NOTCH).trunc();
        if notches != 0.0 {
            self.scroll_accum -= notches * SCROLL_POINTS_PER_NOTCH;
            let outcome = self.session.wheel(notches as i32);
            log_debug!(self.logger, "wheel {} notches -> {:?}", notches, outcome);
            self.apply(outcome);
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        self.sync_texture(ui.ctx());
        let (w, h) = self.session.display_size();

        egui::ScrollArea::both().show(ui, |ui| {
            let (rect, response) = ui.allocate_exact_size(Vec2::new(w, h), Sense::click_and_drag());
            self.canvas_rect = Some(rect);

            let painter = ui.painter_at(rect);
            if let Some(tex) = &self.texture {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(tex.id(), rect, uv, Color32::WHITE);
            }

            let (primary_pressed, secondary_pressed) =
                ui.input(|i| (i.pointer.primary_pressed(), i.pointer.secondary_pressed()));

            let event = if let Some(pos) = response.hover_pos().filter(|_| primary_pressed || secondary_pressed) {
                let local = pos - rect.min;
                let button = if primary_pressed { PointerButton::Primary } else { PointerButton::Secondary };
                Some(PointerEvent::press(local.x, local.y, button))
            } else if response.dragged_by(egui::PointerButton::Primary) {
                response
                    .interact_pointer_pos()
                    .map(|pos| pos - rect.min)
                    .map(|local| PointerEvent::drag(local.x, local.y, PointerButton::Primary))
            } else {
                None
            };

            if let Some(event) = event {
                let outcome = self.session.handle_pointer(event);
                self.apply(outcome);
                if outcome.needs_redraw() {
                    ui.ctx().request_repaint();
                }
            }

            // Brush preview under the cursor
            if let Some(pos) = response.hover_pos() {
                let local = pos - rect.min;
                let cell = self.session.brush().cell_display_size(self.session.cell_pixel_size());
                for (cx, cy) in self.session.brush_preview(local.x, local.y) {
                    let min = rect.min + Vec2::new(cx as f32 * cell, cy as f32 * cell);
                    painter.rect_filled(Rect::from_min_size(min, Vec2::splat(cell)), 0.0, HOVER_TINT);
                }
            }
        });
    }
}

impl eframe::App for PixelScribeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.take_wheel(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        egui::SidePanel::left("toolbox_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.show_toolbox(ui);
                ui.separator();
                self.show_palette(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_canvas(ui);
        });

        self.show_swatch_editor(ctx);
    }
}
