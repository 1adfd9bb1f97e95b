//! Interactive window
//!
//! Two sliders (block count and gravitational constant) above a single
//! drawing surface. Arrow keys or WASD push every block. When started with
//! a config file, the file is watched and reloaded on change.

use crate::painter::{to_color32, PainterSurface};
use crate::CommonArgs;
use eframe::egui;
use gravblocks_core::{populate, population_rng, Direction, InputEvent, SimConfig, Simulation};
use notify::{Event, RecommendedWatcher, Watcher};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

const MAX_BLOCKS: usize = 200;
const MAX_GRAVITATIONAL_CONSTANT: f32 = 1000.0;

pub struct BlocksApp {
    sim: Simulation,
    block_count: usize,
    gravitational_constant: f32,
    overrides: CommonArgs,
    config_path: Option<PathBuf>,
    last_load_error: Option<String>,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
    needs_respawn: bool,
}

impl BlocksApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        sim: Simulation,
        config_path: Option<PathBuf>,
        overrides: CommonArgs,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let file_watcher = config_path.as_ref().and_then(|path| {
            let mut watcher = notify::recommended_watcher(move |res| {
                // the receiver is gone during shutdown
                let _ = tx.send(res);
            })
            .map_err(|e| tracing::warn!("config watcher unavailable: {}", e))
            .ok()?;
            if let Err(e) = watcher.watch(path, notify::RecursiveMode::NonRecursive) {
                tracing::warn!(path = %path.display(), "cannot watch config file: {}", e);
                return None;
            }
            tracing::info!(path = %path.display(), "watching config file");
            Some(watcher)
        });

        let config = sim.config().clone();
        Self {
            sim,
            block_count: config.population.count,
            gravitational_constant: config.gravitational_constant,
            overrides,
            config_path,
            last_load_error: None,
            file_watcher,
            file_receiver: rx,
            needs_respawn: true,
        }
    }

    fn respawn(&mut self, width: f32, height: f32) {
        let mut population = self.sim.config().population.clone();
        population.count = self.block_count;
        let mut rng = population_rng(&population);
        match populate(&population, width, height, &mut rng) {
            Ok(blocks) => {
                tracing::info!(count = blocks.len(), "spawned blocks");
                self.sim.replace_blocks(blocks);
                self.sim.reset_clock();
            }
            Err(e) => {
                tracing::warn!("cannot spawn blocks: {}", e);
                self.last_load_error = Some(e.to_string());
            }
        }
    }

    fn reload_config(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        let loaded = SimConfig::load(path).map(|c| self.overrides.apply(c));
        match loaded.and_then(|config| {
            let count = config.population.count;
            let g = config.gravitational_constant;
            self.sim.reconfigure(config).map(|()| (count, g))
        }) {
            Ok((count, g)) => {
                tracing::info!(path = %path.display(), "config reloaded");
                let count = slider_block_count(count);
                if count != self.block_count {
                    self.block_count = count;
                    self.needs_respawn = true;
                }
                self.gravitational_constant = g;
                self.last_load_error = None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "config reload failed: {}", e);
                self.last_load_error = Some(e.to_string());
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    ..
                }) => changed = true,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("file watcher error: {}", e);
                }
            }
        }
        if changed {
            self.reload_config();
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let widget_focused = ctx.wants_keyboard_input();
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Key { key, pressed, .. } => {
                    if let Some(event) = key_event(key, pressed, widget_focused) {
                        self.sim.handle_input(event);
                    }
                }
                egui::Event::WindowFocused(false) => {
                    for dir in Direction::ALL {
                        self.sim.release(dir);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Clamp a configured block count to the slider range, warning when it
/// had to be lowered.
fn slider_block_count(count: usize) -> usize {
    if count > MAX_BLOCKS {
        tracing::warn!(
            requested = count,
            used = MAX_BLOCKS,
            "block count capped by the window slider"
        );
    }
    count.min(MAX_BLOCKS)
}

/// Map a key transition to an input event. Releases always go through so
/// a push never sticks; presses are ignored while a widget has focus.
fn key_event(key: egui::Key, pressed: bool, widget_focused: bool) -> Option<InputEvent> {
    let dir = direction_for(key)?;
    if !pressed {
        Some(InputEvent::Deactivate(dir))
    } else if widget_focused {
        None
    } else {
        Some(InputEvent::Activate(dir))
    }
}

fn direction_for(key: egui::Key) -> Option<Direction> {
    match key {
        egui::Key::ArrowUp | egui::Key::W => Some(Direction::Up),
        egui::Key::ArrowLeft | egui::Key::A => Some(Direction::Left),
        egui::Key::ArrowDown | egui::Key::S => Some(Direction::Down),
        egui::Key::ArrowRight | egui::Key::D => Some(Direction::Right),
        _ => None,
    }
}

impl eframe::App for BlocksApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Blocks:");
                if ui
                    .add(egui::Slider::new(&mut self.block_count, 1..=MAX_BLOCKS))
                    .changed()
                {
                    self.needs_respawn = true;
                }

                ui.separator();

                ui.label("Gravity:");
                if ui
                    .add(
                        egui::Slider::new(
                            &mut self.gravitational_constant,
                            0.0..=MAX_GRAVITATIONAL_CONSTANT,
                        )
                        .logarithmic(true),
                    )
                    .changed()
                {
                    self.sim.set_gravitational_constant(self.gravitational_constant);
                }

                ui.separator();
                ui.label(format!("max a: {:.3e}", self.sim.max_acceleration()));

                if let Some(ref error) = self.last_load_error {
                    ui.separator();
                    ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(to_color32(self.sim.config().background)))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;

                if self.needs_respawn {
                    self.respawn(rect.width(), rect.height());
                    self.needs_respawn = false;
                }

                let mut surface = PainterSurface::new(&painter, rect);
                self.sim.tick(&mut surface);
            });

        ctx.request_repaint_after(Duration::from_millis(self.sim.config().tick_interval_ms));
    }
}
