//! Globe (arcball) camera orbiting the origin in spherical coordinates.
//!
//! `theta` is the azimuth in the XZ plane, `phi` the polar angle from +Y.
//! `phi` is kept strictly inside `(0, pi)`: at the poles the view direction
//! becomes parallel to the up vector and `look_at` degenerates.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use super::{CameraInput, CameraPose};

/// Radians per pixel of drag.
const DRAG_SENSITIVITY: f32 = 0.002;
/// Distance from each pole that `phi` may reach.
const PHI_EPSILON: f32 = 1e-6;
/// Zoom speed as a fraction of the current radius per second.
const ZOOM_RATE: f32 = 0.25;
const MIN_RADIUS: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct GlobeCamera {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
    pub target: Vec3,
    /// Cursor at the previous update while the button was held
    last_cursor: Option<Vec2>,
}

impl GlobeCamera {
    /// Start at a distance matching the eye `(start, start/2, start)`.
    pub fn new(start: f32) -> Self {
        let eye = Vec3::new(start, start / 2.0, start);
        Self {
            theta: 0.0,
            phi: 0.392 * PI,
            radius: eye.length().max(MIN_RADIUS),
            target: Vec3::ZERO,
            last_cursor: None,
        }
    }

    /// Unit vector from the target towards the eye.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            self.phi.sin() * self.theta.cos(),
            self.phi.cos(),
            self.phi.sin() * self.theta.sin(),
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.direction() * self.radius
    }

    /// Apply a drag delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.theta = (self.theta + DRAG_SENSITIVITY * delta.x).rem_euclid(TAU);
        self.phi = clamp_phi(self.phi - DRAG_SENSITIVITY * delta.y);
    }

    pub fn update(&mut self, input: &CameraInput) -> CameraPose {
        match input.cursor {
            Some(cursor) => {
                // The first held frame only records the anchor.
                let delta = self.last_cursor.map_or(Vec2::ZERO, |last| cursor - last);
                self.last_cursor = Some(cursor);
                self.rotate(delta);
            }
            None => self.last_cursor = None,
        }

        let speed = ZOOM_RATE * self.radius;
        if input.up {
            self.radius -= input.dt * speed;
        }
        if input.down {
            self.radius += input.dt * speed;
        }
        self.radius = self.radius.max(MIN_RADIUS);

        let eye = self.eye();
        CameraPose {
            view: Mat4::look_at_rh(eye, self.target, Vec3::Y),
            model: Mat4::IDENTITY,
            eye,
        }
    }
}

fn clamp_phi(phi: f32) -> f32 {
    if phi.is_nan() {
        return PI / 2.0;
    }
    phi.clamp(PHI_EPSILON, PI - PHI_EPSILON)
}
