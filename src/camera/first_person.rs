//! First-person fly camera: yaw with left/right, walk with up/down.

use glam::{Mat4, Vec3};

use super::{CameraInput, CameraPose};

const START_EYE: Vec3 = Vec3::new(0.0, 1.0, 5.0);
const SPEED: f32 = 6.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Yaw in radians; facing is `(cos, 0, sin)`
    pub theta: f32,
}

impl FirstPersonCamera {
    pub fn new() -> Self {
        Self {
            position: START_EYE,
            theta: (-90.0f32).to_radians(),
        }
    }

    /// Facing direction on the XZ plane.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.theta.cos(), 0.0, self.theta.sin())
    }

    pub fn update(&mut self, input: &CameraInput) -> CameraPose {
        let step = input.dt * SPEED;
        let mut dx = 0.0;
        let mut dy = 0.0;
        if input.up {
            dy += step;
        }
        if input.down {
            dy -= step;
        }
        if input.left {
            dx -= step;
        }
        if input.right {
            dx += step;
        }

        self.theta += dx;
        let dir = self.direction();
        if dy != 0.0 {
            self.position += dir * dy;
        }

        CameraPose {
            view: Mat4::look_at_rh(self.position, self.position + dir, Vec3::Y),
            model: Mat4::IDENTITY,
            eye: self.position,
        }
    }
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_view_looks_down_negative_z() {
        let mut cam = FirstPersonCamera::new();
        let pose = cam.update(&CameraInput::idle(0.016));
        let expected = Mat4::look_at_rh(START_EYE, START_EYE - Vec3::Z, Vec3::Y);
        assert!(pose.view.abs_diff_eq(expected, 1e-5));
        assert_eq!(pose.model, Mat4::IDENTITY);
    }

    #[test]
    fn test_walk_forward_and_back() {
        let mut cam = FirstPersonCamera::new();
        cam.update(&CameraInput { dt: 0.5, up: true, ..Default::default() });
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 1.0, 2.0), 1e-5));

        cam.update(&CameraInput { dt: 0.5, down: true, ..Default::default() });
        assert!(cam.position.abs_diff_eq(START_EYE, 1e-5));
    }

    #[test]
    fn test_turn_right_increases_yaw() {
        let mut cam = FirstPersonCamera::new();
        let before = cam.theta;
        cam.update(&CameraInput { dt: 0.1, right: true, ..Default::default() });
        assert!((cam.theta - (before + 0.6)).abs() < 1e-6);
        // Turning alone does not move the eye.
        assert_eq!(cam.position, START_EYE);
    }
}
