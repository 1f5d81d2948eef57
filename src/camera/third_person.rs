//! Third-person chase camera built on a dolly rig.
//!
//! The rig places the eye at `anchor + R_y(yaw) * (0, 2, -5)`, which keeps it
//! behind and above the followed object whatever its heading.

use dolly::prelude::*;
use glam::{Mat4, Vec3};

use super::{CameraInput, CameraPose};

const ARM_OFFSET: Vec3 = Vec3::new(0.0, 2.0, -5.0);
const START_ANCHOR: Vec3 = Vec3::new(0.0, 0.0, 5.0);
const SPEED: f32 = 3.0;

pub struct ThirdPersonCamera {
    rig: CameraRig,
    /// Followed object position
    pub anchor: Vec3,
    /// Heading in radians; facing is `(sin, 0, cos)`
    pub theta: f32,
}

impl ThirdPersonCamera {
    pub fn new() -> Self {
        let theta = 90.0f32.to_radians();
        let rig = CameraRig::builder()
            .with(Position::new(START_ANCHOR))
            .with(YawPitch::new().yaw_degrees(theta.to_degrees()).pitch_degrees(0.0))
            .with(Arm::new(ARM_OFFSET))
            .build();

        Self {
            rig,
            anchor: START_ANCHOR,
            theta,
        }
    }

    /// Facing direction on the XZ plane.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.theta.sin(), 0.0, self.theta.cos())
    }

    pub fn update(&mut self, input: &CameraInput) -> CameraPose {
        let step = input.dt * SPEED;
        if input.left {
            self.theta += step;
        }
        if input.right {
            self.theta -= step;
        }

        let dir = self.direction();
        if input.up {
            self.anchor += dir * step;
        }
        if input.down {
            self.anchor -= dir * step;
        }

        self.rig.driver_mut::<Position>().position = self.anchor.into();
        self.rig.driver_mut::<YawPitch>().yaw_degrees = self.theta.to_degrees();
        let transform = self.rig.update(input.dt);
        let eye = Vec3::from(transform.position);

        CameraPose {
            view: Mat4::look_at_rh(eye, self.anchor, Vec3::Y),
            model: Mat4::from_translation(self.anchor) * Mat4::from_rotation_y(self.theta),
            eye,
        }
    }
}

impl Default for ThirdPersonCamera {
    fn default() -> Self {
        Self::new()
    }
}
