//! nephron viewer - side-by-side healthy and CKD kidney filtration
//!
//! Usage: `nephron-viewer [--config <path>]`

use eframe::egui;
use nephron::prelude::*;
use nephron_viewer::ui::{render_controls_panel, render_gauge_panel, render_info_panel, render_kidney_view};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar.
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config_path() {
        Some(path) => match DemoConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                DemoConfig::default()
            }
        },
        None => DemoConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_title("Renal Filtration Dynamics"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "nephron",
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(config)))),
    )
}

/// Value following `--config` on the command line.
fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

struct ViewerApp {
    controller: Controller,
    input: Input,
    current_file: Option<String>,
    status_message: Option<(String, Instant)>,
}

impl ViewerApp {
    fn new(config: DemoConfig) -> Self {
        let controller = Controller::new(config).unwrap_or_else(|e| {
            log::error!("Invalid config, using defaults: {}", e);
            Controller::default()
        });
        Self {
            controller,
            input: Input::new(),
            current_file: None,
            status_message: None,
        }
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_config(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
            let path_str = path.display().to_string();
            match DemoConfig::load(&path).and_then(Controller::new) {
                Ok(controller) => {
                    self.controller = controller;
                    self.current_file = Some(path_str.clone());
                    self.show_status(format!("Loaded {}", path_str));
                }
                Err(e) => self.show_status(format!("Load failed: {}", e)),
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_config(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("nephron.json")
            .save_file()
        {
            let path_str = path.display().to_string();
            match self.controller.config().save(&path) {
                Ok(()) => {
                    self.show_status(format!("Saved to {}", path_str));
                    self.current_file = Some(path_str);
                }
                Err(e) => self.show_status(format!("Save failed: {}", e)),
            }
        }
    }

    /// Feed this frame's key events through the shortcut map.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        self.input.begin_frame();
        let text_focus = ctx.wants_keyboard_input();
        let input = &mut self.input;
        ctx.input(|i| {
            if i.any_touches() {
                input.set_touch_primary(true);
            }
            for event in &i.events {
                if let egui::Event::Key { key, pressed, .. } = event {
                    input.key_event((*key).into(), *pressed, text_focus);
                }
            }
        });
        for event in self.input.shortcuts() {
            self.controller.handle(event);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let delta_time = ctx.input(|i| i.stable_dt);
        let seconds = ctx.input(|i| i.time) as f32;

        self.handle_keys(ctx);
        self.controller.advance(Duration::from_secs_f32(delta_time.max(0.0)));

        // Menu bar
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        if ui.button("Load config...").clicked() {
                            self.load_config();
                            ui.close_menu();
                        }
                        if ui.button("Save config as...").clicked() {
                            self.save_config();
                            ui.close_menu();
                        }
                        ui.separator();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            for event in render_controls_panel(ui, self.controller.state()) {
                self.controller.handle(event);
            }
        });

        let frame = self.controller.frame();

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((msg, time)) = &self.status_message {
                    if time.elapsed() < STATUS_TIMEOUT {
                        ui.label(msg);
                    } else {
                        self.status_message = None;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("t = {:.3}", frame.time.value()));
                    ui.separator();
                    ui.label(format!("{}", frame.stage));
                    ui.separator();
                    match &self.current_file {
                        Some(file) => ui.label(egui::RichText::new(file).small().weak()),
                        None => ui.label(egui::RichText::new("(default config)").small().weak()),
                    };
                });
            });
        });

        egui::SidePanel::right("indicators")
            .default_width(240.0)
            .show(ctx, |ui| {
                render_gauge_panel(ui, &frame);
                if frame.info_visible {
                    ui.separator();
                    render_info_panel(ui, frame.stage);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(frame.scenes.len().max(1), |columns| {
                for (column, scene) in columns.iter_mut().zip(&frame.scenes) {
                    column.vertical_centered(|ui| {
                        ui.heading(scene.variant.label());
                    });
                    render_kidney_view(column, scene, seconds);
                }
            });
        });

        ctx.request_repaint();
    }
}
