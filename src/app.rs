use eframe::egui;

use crate::detect::FaceDetector;
use crate::effects::GlyphRenderer;
use crate::input::{self, DispatchOutcome, GestureConfig, GestureResolver};
use crate::loader::{self, InputFile};
use crate::region::{EffectKind, GlyphChoice};
use crate::render;
use crate::session::SessionStore;
use crate::tools::ToolSettings;
use crate::util::time;

/// How long a failure message stays on screen before the overlay hides, so
/// the user has time to read it.
const STATUS_GRACE_SECS: f64 = 2.0;

/// Emoji shown as quick-pick buttons; the rest of the pool is reachable via
/// the custom field or the random option.
const EMOJI_QUICK_PICKS: &[&str] = &["☺️", "😎", "🐱", "🐶", "🦊", "🤖", "👻", "😷"];

struct StatusMessage {
    text: String,
    /// `None` keeps the message until replaced.
    hide_at: Option<f64>,
}

pub struct PrivacyCamApp {
    session: SessionStore,
    tools: ToolSettings,
    glyphs: GlyphRenderer,
    detector: Box<dyn FaceDetector>,
    gestures: GestureResolver,

    canvas_texture: Option<egui::TextureHandle>,
    /// Set whenever model or tool state changed and the canvas needs a
    /// fresh composite.
    dirty: bool,
    status: Option<StatusMessage>,
    custom_glyph: String,
    dark_theme: bool,
}

impl PrivacyCamApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let glyphs = GlyphRenderer::from_egui_fonts().unwrap_or_else(|err| {
            log::error!("glyph fonts unavailable: {err}");
            GlyphRenderer::empty()
        });

        // The theme choice is the only durable state the app touches.
        let theme: Option<String> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, "theme"));

        Self {
            session: SessionStore::new(),
            tools: ToolSettings::default(),
            glyphs,
            detector: default_detector(),
            gestures: GestureResolver::new(GestureConfig::default()),
            canvas_texture: None,
            dirty: false,
            status: None,
            custom_glyph: String::new(),
            dark_theme: theme.as_deref() != Some("light"),
        }
    }

    fn set_status(&mut self, text: impl Into<String>, transient: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            hide_at: transient.then(|| time::current_time_secs() + STATUS_GRACE_SECS),
        });
    }

    /// Pull newly dropped files out of the input state and ingest them
    /// sequentially. A failure aborts the rest of the batch; the session
    /// keeps whatever loaded before it.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::new();
        for file in &dropped {
            if let Some(bytes) = &file.bytes {
                files.push(InputFile {
                    name: file.name.clone(),
                    bytes: bytes.to_vec(),
                });
            } else if let Some(path) = &file.path {
                match std::fs::read(path) {
                    Ok(bytes) => files.push(InputFile {
                        name: path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.display().to_string()),
                        bytes,
                    }),
                    Err(err) => {
                        log::error!("failed to read {}: {err}", path.display());
                    }
                }
            } else {
                log::warn!("dropped file has no accessible data: {}", file.name);
            }
        }

        match loader::load_files(&mut self.session, files, self.detector.as_ref(), &self.tools) {
            Ok(count) => {
                log::info!("loaded {count} image(s)");
                self.status = None;
            }
            Err(err) => {
                log::error!("batch load aborted: {err}");
                self.set_status(err.user_message(), true);
            }
        }
        self.dirty = true;
    }

    /// Dim the window and list the files while a drag hovers over it.
    fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to add images:".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            ctx.style()
                .text_styles
                .get(&TextStyle::Heading)
                .cloned()
                .unwrap_or_else(|| egui::FontId::proportional(20.0)),
            Color32::WHITE,
        );
    }

    fn bulk_apply_to_active(&mut self) {
        if let Some(entry) = self.session.active_entry_mut() {
            entry.bulk_apply(&self.tools);
            self.dirty = true;
        }
    }

    fn thumbnails_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Images");
        ui.separator();
        let active = self.session.active_id();
        let mut clicked = None;
        for entry in self.session.entries() {
            let label = format!("{} ({} faces)", entry.name(), entry.face_count());
            if ui
                .selectable_label(active == Some(entry.id()), label)
                .clicked()
            {
                clicked = Some(entry.id());
            }
        }
        if let Some(id) = clicked {
            self.session.select(id);
            self.dirty = true;
        }
        if self.session.is_empty() {
            ui.weak("Drop image files anywhere in the window.");
        }
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .selectable_label(self.tools.effect == EffectKind::Mosaic, "▦ Mosaic")
                .clicked()
            {
                self.tools.effect = EffectKind::Mosaic;
                self.bulk_apply_to_active();
            }
            if ui
                .selectable_label(self.tools.effect == EffectKind::Glyph, "😎 Emoji")
                .clicked()
            {
                self.tools.effect = EffectKind::Glyph;
                self.bulk_apply_to_active();
            }
        });

        ui.horizontal(|ui| {
            ui.label("Mosaic size:");
            if ui
                .add(egui::Slider::new(&mut self.tools.mosaic_intensity, 4..=64))
                .changed()
            {
                // Intensity is read live at render time; nothing stored per
                // region, a redraw is all that's needed.
                self.dirty = true;
            }
        });

        if self.tools.effect == EffectKind::Glyph {
            ui.separator();
            ui.label("Emoji:");
            ui.horizontal_wrapped(|ui| {
                for &emoji in EMOJI_QUICK_PICKS {
                    let selected = self.tools.glyph == GlyphChoice::Literal(emoji.to_owned());
                    if ui.selectable_label(selected, emoji).clicked() {
                        self.tools.glyph = GlyphChoice::Literal(emoji.to_owned());
                        self.bulk_apply_to_active();
                    }
                }
                let random = self.tools.glyph == GlyphChoice::Random;
                if ui.selectable_label(random, "🎲 Random").clicked() {
                    // Each detected region gets its own fresh draw from the
                    // pool on every apply.
                    self.tools.glyph = GlyphChoice::Random;
                    self.bulk_apply_to_active();
                }
            });
            ui.horizontal(|ui| {
                ui.label("Custom:");
                if ui
                    .add(egui::TextEdit::singleline(&mut self.custom_glyph).desired_width(60.0))
                    .changed()
                    && !self.custom_glyph.is_empty()
                {
                    self.tools.glyph = GlyphChoice::Literal(self.custom_glyph.clone());
                    self.bulk_apply_to_active();
                }
            });
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                self.export_active();
            }
            if ui.button("Save all").clicked() {
                self.export_all();
            }
        });

        ui.separator();
        let theme_label = if self.dark_theme { "☀ Light theme" } else { "🌙 Dark theme" };
        if ui.button(theme_label).clicked() {
            self.dark_theme = !self.dark_theme;
        }
    }

    fn export_active(&mut self) {
        let Some(entry) = self.session.active_entry() else {
            return;
        };
        let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
        match crate::export::export_entry(entry, &self.tools, &self.glyphs, &dir) {
            Ok(path) => self.set_status(format!("Saved {}", path.display()), true),
            Err(err) => {
                log::error!("export failed: {err}");
                self.set_status("Export failed", true);
            }
        }
    }

    fn export_all(&mut self) {
        if self.session.is_empty() {
            return;
        }
        let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
        match crate::export::export_session(&self.session, &self.tools, &self.glyphs, &dir) {
            Ok(paths) => self.set_status(format!("Saved {} image(s)", paths.len()), true),
            Err(err) => {
                log::error!("batch export failed: {err}");
                self.set_status("Export failed", true);
            }
        }
    }

    /// Draw the active image (re-compositing if anything changed) and feed
    /// pointer interactions through the gesture resolver.
    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(active_id) = self.session.active_id() else {
            ui.centered_and_justified(|ui| {
                ui.heading("Drop photos here to blur faces");
            });
            return;
        };

        let Some((surface_w, surface_h)) = self
            .session
            .get(active_id)
            .map(|entry| (entry.width(), entry.height()))
        else {
            return;
        };

        if self.dirty || self.canvas_texture.is_none() {
            if let Some(entry) = self.session.get(active_id) {
                let surface = render::render(entry, &self.tools, &self.glyphs, false);
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [surface.width() as usize, surface.height() as usize],
                    surface.as_raw(),
                );
                self.canvas_texture =
                    Some(ctx.load_texture("canvas", color_image, egui::TextureOptions::LINEAR));
                self.dirty = false;
            }
        }

        // Fit the image into the available space, preserving aspect ratio
        let avail = ui.available_rect_before_wrap();
        let scale = (avail.width() / surface_w as f32)
            .min(avail.height() / surface_h as f32)
            .min(1.0);
        let shown = egui::vec2(surface_w as f32 * scale, surface_h as f32 * scale);
        let rect = egui::Rect::from_center_size(avail.center(), shown);

        if let Some(texture) = &self.canvas_texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        let _response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let now = time::current_time_secs();
        let map = |pos: egui::Pos2| {
            input::map_to_surface(
                (pos.x, pos.y),
                (rect.min.x, rect.min.y),
                (rect.width(), rect.height()),
                (surface_w, surface_h),
            )
        };

        let mut gesture = None;
        ctx.input(|i| {
            let pos = i.pointer.latest_pos();
            if i.pointer.primary_pressed() {
                if let Some(pos) = pos.filter(|p| rect.contains(*p)) {
                    self.gestures.on_press(map(pos), now);
                }
            } else if i.pointer.primary_released() {
                if let Some(pos) = pos {
                    gesture = self.gestures.on_release(map(pos));
                }
            } else if self.gestures.is_pressed() {
                if let Some(pos) = pos {
                    self.gestures.on_move(map(pos));
                }
            }
        });
        if gesture.is_none() {
            gesture = self.gestures.poll(now);
        }

        if let Some(gesture) = gesture {
            let config = self.gestures.config().clone();
            if let Some(entry) = self.session.get_mut(active_id) {
                match input::apply_gesture(entry, gesture, &self.tools, &config) {
                    DispatchOutcome::Unchanged => {}
                    DispatchOutcome::Changed => self.dirty = true,
                    DispatchOutcome::ChangedWithHaptic => {
                        // Best effort only; no haptic hardware on desktop.
                        log::debug!("haptic pulse requested");
                        self.dirty = true;
                    }
                }
            }
        }

        // The long-press timer is polled, not scheduled, so keep frames
        // coming while a press is held.
        if self.gestures.is_pressed() {
            ctx.request_repaint();
        }
    }

    fn status_overlay(&mut self, ctx: &egui::Context) {
        let now = time::current_time_secs();
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.hide_at.is_some_and(|t| now >= t))
        {
            self.status = None;
        }
        if let Some(status) = &self.status {
            egui::Area::new(egui::Id::new("status_overlay"))
                .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(&status.text);
                    });
                });
            ctx.request_repaint();
        }
    }
}

impl eframe::App for PrivacyCamApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let theme = if self.dark_theme { "dark" } else { "light" };
        eframe::set_value(storage, "theme", &theme.to_owned());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_theme {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        self.handle_dropped_files(ctx);
        self.preview_files_being_dropped(ctx);

        egui::SidePanel::left("thumbnails")
            .default_width(220.0)
            .show(ctx, |ui| self.thumbnails_panel(ui));

        egui::SidePanel::right("tools")
            .default_width(220.0)
            .show(ctx, |ui| self.tools_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui, ctx));

        self.status_overlay(ctx);
    }
}

#[cfg(feature = "face-detection")]
fn default_detector() -> Box<dyn FaceDetector> {
    let path = std::env::var("SEETA_MODEL_PATH")
        .unwrap_or_else(|_| "seeta_fd_frontal_v1.0.bin".to_owned());
    match crate::detect::RustfaceDetector::from_model_path(std::path::Path::new(&path)) {
        Ok(detector) => Box::new(detector),
        Err(err) => {
            log::error!("failed to load SeetaFace model from {path}: {err}");
            Box::new(crate::detect::DisabledDetector)
        }
    }
}

#[cfg(not(feature = "face-detection"))]
fn default_detector() -> Box<dyn FaceDetector> {
    Box::new(crate::detect::DisabledDetector)
}
