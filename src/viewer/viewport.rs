//! 3D viewport widget for egui

use std::sync::Arc;
use std::time::Instant;

use eframe::egui_glow;
use egui::{Key, Response, Sense, Ui, Vec2};
use glam::Vec3;
use glow::HasContext as _;
use parking_lot::Mutex;

use crate::camera::{ActiveCamera, CameraInput, CameraMode, CameraPose};
use crate::render::{FrameInputs, PlaneMesh};
use crate::util::gl_projection;

/// Longest frame step fed to the cameras, so a stalled frame does not
/// teleport them.
const MAX_CAMERA_DT: f32 = 0.1;

/// Projection parameters of the viewport.
#[derive(Clone, Copy, Debug)]
pub struct Lens {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

/// 3D viewport state
pub struct Viewport {
    pub camera: ActiveCamera,
    pub globe_start: f32,
    pub light_pos: Vec3,
    pub lens: Lens,
    pub background: egui::Color32,
    /// Shared with the paint callback, which runs on the UI thread as well
    plane: Arc<Mutex<Option<PlaneMesh>>>,
    start: Instant,
    last_pose: Option<CameraPose>,
}

impl Viewport {
    pub fn new(plane: PlaneMesh, camera: ActiveCamera, globe_start: f32, lens: Lens) -> Self {
        Self {
            camera,
            globe_start,
            light_pos: Vec3::new(5.0, 10.0, 5.0),
            lens,
            background: egui::Color32::from_rgb(13, 18, 26),
            plane: Arc::new(Mutex::new(Some(plane))),
            start: Instant::now(),
            last_pose: None,
        }
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        self.camera.set_mode(mode, self.globe_start);
    }

    /// Restart the current camera from its initial state.
    pub fn reset_camera(&mut self) {
        self.camera = ActiveCamera::new(self.camera.mode(), self.globe_start);
    }

    /// Run `f` against the plane, if it is still alive.
    pub fn with_plane<R>(&self, f: impl FnOnce(&mut PlaneMesh) -> R) -> Option<R> {
        self.plane.lock().as_mut().map(f)
    }

    /// Pose produced by the most recent frame.
    pub fn last_pose(&self) -> Option<&CameraPose> {
        self.last_pose.as_ref()
    }

    /// Seconds since the viewport was created.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Show viewport UI and handle input
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let _span = tracing::trace_span!("viewport_show").entered();
        let available = ui.available_size();
        let size = Vec2::new(available.x.max(64.0), available.y.max(64.0));

        // Allocate space for the viewport
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        let input = self.camera_input(ui, &response);
        let pose = self.camera.update(&input);
        self.last_pose = Some(pose);

        let aspect = rect.width() / rect.height();
        let frame = FrameInputs {
            light_pos: self.light_pos,
            view: pose.view,
            projection: gl_projection(self.lens.fov_degrees.to_radians(), aspect, self.lens.near, self.lens.far),
            time: self.elapsed(),
        };

        ui.painter().rect_filled(rect, 0.0, self.background);

        let plane = self.plane.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                if let Some(plane) = plane.lock().as_ref() {
                    let gl = painter.gl();
                    unsafe {
                        gl.enable(glow::DEPTH_TEST);
                        gl.depth_func(glow::LESS);
                        gl.clear(glow::DEPTH_BUFFER_BIT);
                    }
                    plane.draw(gl, &frame);
                    unsafe {
                        gl.disable(glow::DEPTH_TEST);
                    }
                }
            })),
        };
        ui.painter().add(callback);

        // The surface animates, so keep frames coming.
        ui.ctx().request_repaint();
        response
    }

    fn camera_input(&self, ui: &Ui, response: &Response) -> CameraInput {
        let typing = ui.ctx().wants_keyboard_input();
        ui.input(|i| {
            let held = |key| !typing && i.key_down(key);
            let cursor = if response.is_pointer_button_down_on() && i.pointer.primary_down() {
                i.pointer.interact_pos().map(|p| glam::Vec2::new(p.x, p.y))
            } else {
                None
            };
            CameraInput {
                dt: i.stable_dt.min(MAX_CAMERA_DT),
                left: held(Key::ArrowLeft),
                right: held(Key::ArrowRight),
                up: held(Key::ArrowUp),
                down: held(Key::ArrowDown),
                cursor,
            }
        })
    }

    /// Release GL resources. The viewport draws nothing afterwards.
    pub fn destroy(&self, gl: &glow::Context) {
        if let Some(plane) = self.plane.lock().take() {
            plane.destroy(gl);
        }
    }
}
