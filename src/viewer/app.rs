//! Main application state and UI

use std::time::Instant;

use egui::{CentralPanel, Key, RichText, SidePanel, TopBottomPanel};
use glam::Vec3;

use super::settings::Settings;
use super::viewport::{Lens, Viewport};
use crate::camera::{ActiveCamera, CameraMode};
use crate::render::{default_asset_root, default_shader_root, PlaneConfig, PlaneMesh, PlaneVariant, TessLevels};
use crate::util::{Error, Result};

/// Format FPS for display (hide decimals for whole numbers)
fn format_fps(fps: f32) -> String {
    if (fps - fps.round()).abs() < 0.001 {
        format!("{:.0}", fps)
    } else {
        format!("{:.1}", fps)
    }
}

/// Plane configuration described by `settings`.
pub fn plane_config(settings: &Settings) -> PlaneConfig {
    let shader_root = settings.shader_root.clone().unwrap_or_else(default_shader_root);
    let asset_root = settings.asset_root.clone().unwrap_or_else(default_asset_root);
    let mut config = PlaneConfig::for_variant(settings.variant, shader_root, asset_root);
    if let Some(tess) = settings.tess_levels {
        config.tess = tess.clamped();
    }
    if let Some(scale) = settings.tex_scale {
        config.tex_scale = scale;
    }
    config
}

/// Main viewer application
pub struct PlaneApp {
    viewport: Viewport,
    settings: Settings,

    // Frame timing
    last_frame_time: Instant,
    fps: f32,

    // Scene info
    vertex_count: usize,
    patch_count: usize,
    textures_loaded: (bool, bool),
    _trace_guard: Option<tracing_chrome::FlushGuard>,
}

impl PlaneApp {
    /// Build the plane on eframe's GL context. Errors here abort start-up.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        trace_guard: Option<tracing_chrome::FlushGuard>,
    ) -> Result<Self> {
        let gl = cc
            .gl
            .as_ref()
            .ok_or_else(|| Error::UnsupportedContext("eframe did not provide a glow context".into()))?;

        let config = plane_config(&settings);
        let plane = PlaneMesh::new(gl, settings.grid_min, settings.grid_max, settings.grid_step, config)?;
        let vertex_count = plane.grid().vertex_count();
        let patch_count = plane.grid().cell_count();
        let textures_loaded = plane.textures_loaded();

        let lens = Lens {
            fov_degrees: settings.fov_degrees,
            near: settings.near,
            far: settings.far,
        };
        let camera = ActiveCamera::new(settings.camera_mode, settings.globe_start);
        let mut viewport = Viewport::new(plane, camera, settings.globe_start, lens);
        viewport.light_pos = Vec3::from_array(settings.light_pos);
        let [r, g, b, _] = settings.background_color;
        viewport.background = egui::Color32::from_rgb(to_u8(r), to_u8(g), to_u8(b));

        Ok(Self {
            viewport,
            settings,
            last_frame_time: Instant::now(),
            fps: 0.0,
            vertex_count,
            patch_count,
            textures_loaded,
            _trace_guard: trace_guard,
        })
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (one, two, three, tab) = ctx.input(|i| {
            (
                i.key_pressed(Key::Num1),
                i.key_pressed(Key::Num2),
                i.key_pressed(Key::Num3),
                i.key_pressed(Key::Tab),
            )
        });
        let mode = if one {
            Some(CameraMode::ThirdPerson)
        } else if two {
            Some(CameraMode::FirstPerson)
        } else if three {
            Some(CameraMode::Globe)
        } else {
            None
        };
        if let Some(mode) = mode {
            self.set_camera_mode(mode);
        }
        if tab {
            self.settings.show_side_panel = !self.settings.show_side_panel;
        }
    }

    fn set_camera_mode(&mut self, mode: CameraMode) {
        if self.settings.camera_mode != mode {
            tracing::info!("camera mode: {}", mode);
        }
        self.settings.camera_mode = mode;
        self.viewport.set_camera_mode(mode);
    }

    fn update_fps(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 { instant } else { self.fps * 0.9 + instant * 0.1 };
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("View", |ui| {
                if ui.checkbox(&mut self.settings.show_side_panel, "Side panel").clicked() {
                    ui.close();
                }
                ui.separator();
                for mode in CameraMode::ALL {
                    if ui.radio(self.settings.camera_mode == mode, mode.label()).clicked() {
                        self.set_camera_mode(mode);
                        ui.close();
                    }
                }
                ui.separator();
                if ui.button("Reset camera").clicked() {
                    self.viewport.reset_camera();
                    ui.close();
                }
            });
        });
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Camera");
        let mut mode = self.settings.camera_mode;
        for m in CameraMode::ALL {
            ui.radio_value(&mut mode, m, m.label());
        }
        if mode != self.settings.camera_mode {
            self.set_camera_mode(mode);
        }
        if ui.button("Reset").clicked() {
            self.viewport.reset_camera();
        }
        if let Some(pose) = self.viewport.last_pose() {
            ui.label(format!("Eye: {:.2}, {:.2}, {:.2}", pose.eye.x, pose.eye.y, pose.eye.z));
        }

        ui.separator();
        ui.heading("Tessellation");
        let current = self.viewport.with_plane(|p| p.config().tess).unwrap_or(TessLevels::PLAIN);
        let mut tess = current;
        ui.add(egui::Slider::new(&mut tess.inner, 1.0..=64.0).text("inner"));
        ui.add(egui::Slider::new(&mut tess.outer, 1.0..=64.0).text("outer"));
        if tess != current {
            self.viewport.with_plane(|p| p.set_tess_levels(tess));
            self.settings.tess_levels = Some(tess);
        }

        ui.separator();
        ui.heading("Lighting");
        let mut light = self.viewport.light_pos.to_array();
        ui.horizontal(|ui| {
            for v in &mut light {
                ui.add(egui::DragValue::new(v).speed(0.1));
            }
        });
        self.viewport.light_pos = Vec3::from_array(light);
        self.settings.light_pos = light;

        if self.settings.variant == PlaneVariant::Water {
            let current = self.viewport.with_plane(|p| p.config().tex_scale).unwrap_or(1.0);
            let mut scale = current;
            ui.add(egui::Slider::new(&mut scale, 0.01..=4.0).logarithmic(true).text("texture scale"));
            if scale != current {
                self.viewport.with_plane(|p| p.set_tex_scale(scale));
                self.settings.tex_scale = Some(scale);
            }
        }

        ui.separator();
        ui.heading("Scene");
        ui.label(format!("Variant: {}", self.settings.variant));
        ui.label(format!("Vertices: {}", self.vertex_count));
        ui.label(format!("Patches: {}", self.patch_count));
        if self.settings.variant == PlaneVariant::Water {
            let (displacement, water) = self.textures_loaded;
            ui.label(texture_status("Displacement", displacement));
            ui.label(texture_status("Water texture", water));
        }
    }
}

fn texture_status(name: &str, loaded: bool) -> RichText {
    if loaded {
        RichText::new(format!("{}: loaded", name))
    } else {
        RichText::new(format!("{}: missing", name)).color(egui::Color32::YELLOW)
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl eframe::App for PlaneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_fps();
        self.handle_shortcuts(ctx);

        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ui);
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} camera", self.settings.camera_mode));
                ui.separator();
                ui.label(format!("{} fps", format_fps(self.fps)));
            });
        });

        if self.settings.show_side_panel {
            let panel = SidePanel::right("controls")
                .default_width(self.settings.side_panel_width)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.side_panel(ui));
                });
            self.settings.side_panel_width = panel.response.rect.width();
        }

        CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui);
            });

        let size = ctx.screen_rect().size();
        self.settings.window_width = size.x;
        self.settings.window_height = size.y;
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy(gl);
        }
        self.settings.save();
    }
}
