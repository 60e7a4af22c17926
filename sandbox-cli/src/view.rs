//! Interactive scene viewer
//!
//! Draws an X/Y projection of the world and reloads the scene whenever the
//! file on disk changes.

use anyhow::Result;
use eframe::egui;
use notify::{Event, RecommendedWatcher, Watcher};
use sandbox_core::{
    build_simulation_context_from_source, step_simulation, Collider, Shape, SimulationContext,
};
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{debug, warn};

/// Half-extent of the visible world, in world units
const WORLD_HALF_EXTENT: f32 = 10.0;

pub fn run(source_path: PathBuf) -> Result<()> {
    let title = format!("sandbox - {}", source_path.display());
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ViewApp::new(source_path, cc)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

pub struct ViewApp {
    source_path: PathBuf,
    source_text: String,
    ctx_opt: Option<SimulationContext>,
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    // Kept alive to maintain file watching
    _file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewApp {
    pub fn new(source_path: PathBuf, _cc: &eframe::CreationContext<'_>) -> Self {
        let source_text = std::fs::read_to_string(&source_path)
            .unwrap_or_else(|e| format!("# error reading file: {}", e));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let Some(w) = watcher.as_mut() {
            if let Err(e) = w.watch(&source_path, notify::RecursiveMode::NonRecursive) {
                warn!(error = %e, "file watching unavailable");
            }
        }

        let mut app = Self {
            source_path,
            source_text,
            ctx_opt: None,
            last_load_error: None,
            playing: false,
            speed_multiplier: 1.0,
            _file_watcher: watcher,
            file_receiver: rx,
        };
        app.reload_context();
        app
    }

    fn reload_context(&mut self) {
        match build_simulation_context_from_source(&self.source_text) {
            Ok((ctx, warnings)) => {
                for w in warnings.iter() {
                    warn!("{}", w);
                }
                self.ctx_opt = Some(ctx);
                self.last_load_error = None;
            }
            Err(e) => {
                self.last_load_error = Some(e.to_string());
                self.ctx_opt = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) if paths.iter().any(|p| p.ends_with(&self.source_path)) => {
                    if let Ok(text) = std::fs::read_to_string(&self.source_path) {
                        self.source_text = text;
                        needs_reload = true;
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "file watcher error"),
            }
        }

        if needs_reload {
            debug!(file = %self.source_path.display(), "reloading scene");
            self.reload_context();
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button(if self.playing { "Pause" } else { "Play" }).clicked() {
                self.playing = !self.playing;
            }

            if ui.button("Reset").clicked() {
                self.reload_context();
                self.playing = false;
            }

            if ui.button("Step").clicked() {
                if let Some(ctx) = self.ctx_opt.as_mut() {
                    step_simulation(ctx);
                }
            }

            ui.separator();
            ui.label("Speed:");
            ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=10.0));
            ui.separator();

            if let Some(ctx) = &self.ctx_opt {
                ui.label(format!("Step: {} / {}", ctx.current_step, ctx.max_steps));
            }
        });
    }

    fn draw_world(&self, ui: &egui::Ui) {
        let Some(ctx) = &self.ctx_opt else {
            return;
        };

        let rect = ui.max_rect();
        let painter = ui.painter();
        let center = rect.center();
        let scale = rect.width().min(rect.height()) / (2.0 * WORLD_HALF_EXTENT) * 0.9;
        let to_screen = |x: f32, y: f32| center + egui::vec2(x * scale, -y * scale);

        for body in &ctx.world.bodies {
            let Some(collider) = body.collider.as_ref() else {
                continue;
            };
            let pos = collider.position();
            let screen = to_screen(pos.x, pos.y);

            match collider.shape() {
                Shape::Plane { normal } => {
                    // Trace of the plane in the X/Y view
                    let along = egui::vec2(normal.y, normal.x) * (2.0 * WORLD_HALF_EXTENT * scale);
                    painter.line_segment(
                        [screen - along, screen + along],
                        egui::Stroke::new(2.0, egui::Color32::GRAY),
                    );
                }
                Shape::Sphere { radius } => {
                    let fill = if body.is_fixed {
                        egui::Color32::DARK_GRAY
                    } else {
                        egui::Color32::LIGHT_BLUE
                    };
                    let r = (radius * scale).max(2.0);
                    painter.circle_filled(screen, r, fill);
                    painter.circle_stroke(screen, r, egui::Stroke::new(1.0, egui::Color32::BLUE));
                    painter.text(
                        screen + egui::vec2(0.0, r + 8.0),
                        egui::Align2::CENTER_TOP,
                        &body.name,
                        egui::FontId::default(),
                        egui::Color32::WHITE,
                    );
                }
            }
        }
    }
}

impl eframe::App for ViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));

        if let Some(error) = &self.last_load_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.label(egui::RichText::new(error).color(egui::Color32::RED));
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_world(ui));

        if self.playing {
            if let Some(sim) = self.ctx_opt.as_mut() {
                let steps_per_frame = self.speed_multiplier.max(0.1).round().max(1.0) as usize;
                for _ in 0..steps_per_frame {
                    if step_simulation(sim) {
                        self.playing = false;
                        break;
                    }
                }
            }
            ctx.request_repaint();
        }
    }
}
