use crate::canvas::export;
use crate::canvas::model::{MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};
use crate::canvas::{normalize_pointer, BrushConfig, Color, DisplayRect, Surface};
use crate::gen::{GenerationController, GenerationEvent, PROMPT_MAX_CHARS};
use crate::settings::Settings;
use chrono::Local;
use eframe::egui;
use std::path::PathBuf;

pub struct SketchApp {
    settings: Settings,
    surface: Surface,
    pen_color: Color,
    brush_width: u32,
    prompt: String,
    controller: GenerationController,
    error: Option<String>,
    last_saved: Option<PathBuf>,
    texture: Option<egui::TextureHandle>,
    texture_revision: Option<u64>,
}

impl SketchApp {
    pub fn new(settings: Settings, controller: GenerationController) -> Self {
        let surface = Surface::new(
            settings.canvas_width,
            settings.canvas_height,
            settings.background_color,
        );
        Self {
            pen_color: settings.pen_color,
            brush_width: settings
                .brush_width
                .clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH),
            settings,
            surface,
            prompt: String::new(),
            controller,
            error: None,
            last_saved: None,
            texture: None,
            texture_revision: None,
        }
    }

    fn brush(&self) -> BrushConfig {
        BrushConfig::new(self.pen_color, self.brush_width)
    }

    fn handle_generation_events(&mut self) {
        match self.controller.poll() {
            Some(GenerationEvent::Completed { message, image }) => {
                if !message.is_empty() {
                    tracing::debug!(message = %message, "model commentary");
                }
                self.surface.composite_background(image);
            }
            Some(GenerationEvent::Failed { error }) => {
                self.error = Some(error);
            }
            None => {}
        }
    }

    fn submit(&mut self) {
        let snapshot = match export::snapshot_base64(&self.surface) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(%err, "canvas snapshot failed, submitting text only");
                None
            }
        };
        self.controller.submit(&self.prompt, snapshot);
    }

    fn download(&mut self) {
        let result = export::resolve_export_dir(self.settings.export_dir.as_deref())
            .and_then(|dir| export::save_canvas_png(&self.surface, &dir, Local::now()));
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "canvas saved");
                self.last_saved = Some(path);
            }
            Err(err) => self.error = Some(format!("{err:#}")),
        }
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Drawing tools");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Color");
            let current = egui::Color32::from_rgb(
                self.pen_color.r,
                self.pen_color.g,
                self.pen_color.b,
            );
            let swatch = ui.add(egui::Button::new("").fill(current).min_size(egui::vec2(28.0, 20.0)));
            let popup_id = ui.make_persistent_id("palette_popup");
            if swatch.clicked() {
                ui.memory_mut(|mem| mem.toggle_popup(popup_id));
            }
            // The popup closes itself on any click outside of it.
            egui::popup_below_widget(ui, popup_id, &swatch, |ui| {
                ui.set_min_width(120.0);
                let palette = self.settings.palette.clone();
                egui::Grid::new("palette_grid").show(ui, |ui| {
                    for (i, color) in palette.iter().enumerate() {
                        let fill = egui::Color32::from_rgb(color.r, color.g, color.b);
                        let button = egui::Button::new("").fill(fill).min_size(egui::vec2(22.0, 22.0));
                        if ui.add(button).on_hover_text(color.to_hex()).clicked() {
                            self.pen_color = *color;
                            ui.memory_mut(|mem| mem.close_popup());
                        }
                        if i % 4 == 3 {
                            ui.end_row();
                        }
                    }
                });
            });
        });

        ui.horizontal(|ui| {
            ui.label("Brush");
            ui.add(
                egui::Slider::new(&mut self.brush_width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH)
                    .suffix("px"),
            );
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("Clear all").clicked() {
                self.surface.reset();
            }
            if ui.button("Download").clicked() {
                self.download();
            }
        });
        if let Some(path) = &self.last_saved {
            ui.small(format!("Saved {}", path.display()));
        }

        ui.separator();
        ui.heading("Generate");
        ui.label("Describe what to add to your drawing.");
        ui.add(
            egui::TextEdit::multiline(&mut self.prompt)
                .desired_rows(5)
                .desired_width(f32::INFINITY)
                .char_limit(PROMPT_MAX_CHARS)
                .hint_text("e.g. add yellow leaves and three bees"),
        );
        ui.small(format!("{}/{}", self.prompt.chars().count(), PROMPT_MAX_CHARS));

        let can_submit = !self.controller.is_submitting() && !self.prompt.trim().is_empty();
        if ui
            .add_enabled(can_submit, egui::Button::new("Transform"))
            .clicked()
        {
            self.submit();
        }
        if self.controller.is_submitting() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Generating, this can take a few seconds...");
            });
        }
    }

    fn canvas_view(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let logical = self.surface.logical_size();
        if logical.0 == 0 || logical.1 == 0 {
            return;
        }

        if self.texture_revision != Some(self.surface.revision()) {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [logical.0 as usize, logical.1 as usize],
                &self.surface.raster().pixels,
            );
            if let Some(texture) = &mut self.texture {
                texture.set(image, egui::TextureOptions::LINEAR);
            } else {
                self.texture =
                    Some(ctx.load_texture("canvas", image, egui::TextureOptions::LINEAR));
            }
            self.texture_revision = Some(self.surface.revision());
        }

        // Fit the logical canvas into the available space, preserving aspect.
        let available = ui.available_size();
        let aspect = logical.0 as f32 / logical.1 as f32;
        let mut size = egui::vec2(available.x, available.x / aspect);
        if size.y > available.y {
            size = egui::vec2(available.y * aspect, available.y);
        }

        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());
        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        let display_rect = DisplayRect::new((rect.min.x, rect.min.y), (rect.width(), rect.height()));
        let pointer = response.interact_pointer_pos().map(|pos| (pos.x, pos.y));

        if response.drag_started() {
            self.surface
                .begin_stroke(normalize_pointer(pointer, display_rect, logical));
        } else if response.dragged() {
            let brush = self.brush();
            self.surface
                .extend_stroke(normalize_pointer(pointer, display_rect, logical), &brush);
        }
        if response.drag_stopped() {
            self.surface.end_stroke();
        }
        // Leaving the canvas mid-stroke ends it, so the flag cannot stay
        // stuck when the pointer returns.
        if self.surface.is_stroke_active() {
            let outside = pointer.map_or(true, |pos| !rect.contains(egui::pos2(pos.0, pos.1)));
            if outside {
                self.surface.end_stroke();
            }
        }
    }

    fn error_modal(&mut self, ctx: &egui::Context) {
        let Some(error) = self.error.clone() else {
            return;
        };
        egui::Window::new("Something went wrong")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(error);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.error = None;
                }
            });
    }
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_generation_events();
        if self.controller.is_submitting() {
            // Keep polling the worker while a request is in flight.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.controls_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                self.canvas_view(ui, ctx);
            });
        });

        self.error_modal(ctx);
    }
}
