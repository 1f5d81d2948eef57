//! Camera controllers.
//!
//! Each controller owns its state explicitly and advances it with
//! `update(&mut self, &CameraInput) -> CameraPose`. Nothing is kept in
//! globals, so several cameras can coexist and every step is reproducible
//! from its inputs.

mod first_person;
mod globe;
mod third_person;

pub use first_person::FirstPersonCamera;
pub use globe::GlobeCamera;
pub use third_person::ThirdPersonCamera;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    /// Seconds since the previous update
    pub dt: f32,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Cursor position while the primary button is held, `None` otherwise
    pub cursor: Option<Vec2>,
}

impl CameraInput {
    /// Input with only elapsed time set.
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }
}

/// Result of a camera update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub view: Mat4,
    /// Transform of the followed object (identity for free cameras)
    pub model: Mat4,
    /// World-space eye position
    pub eye: Vec3,
}

/// Selects which controller drives the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    ThirdPerson,
    FirstPerson,
    #[default]
    Globe,
}

impl CameraMode {
    pub const ALL: [CameraMode; 3] = [
        CameraMode::ThirdPerson,
        CameraMode::FirstPerson,
        CameraMode::Globe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::ThirdPerson => "Third person",
            CameraMode::FirstPerson => "First person",
            CameraMode::Globe => "Globe",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CameraMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "third" | "third-person" | "third_person" | "orbit" => Ok(CameraMode::ThirdPerson),
            "first" | "first-person" | "first_person" | "fly" => Ok(CameraMode::FirstPerson),
            "globe" | "arcball" => Ok(CameraMode::Globe),
            other => Err(format!("unknown camera mode '{}'", other)),
        }
    }
}

/// The single camera currently driving the view.
pub enum ActiveCamera {
    ThirdPerson(ThirdPersonCamera),
    FirstPerson(FirstPersonCamera),
    Globe(GlobeCamera),
}

impl ActiveCamera {
    /// Fresh controller for `mode`. `globe_start` sets the globe camera's
    /// initial eye at `(s, s/2, s)`.
    pub fn new(mode: CameraMode, globe_start: f32) -> Self {
        match mode {
            CameraMode::ThirdPerson => Self::ThirdPerson(ThirdPersonCamera::new()),
            CameraMode::FirstPerson => Self::FirstPerson(FirstPersonCamera::new()),
            CameraMode::Globe => Self::Globe(GlobeCamera::new(globe_start)),
        }
    }

    pub fn mode(&self) -> CameraMode {
        match self {
            Self::ThirdPerson(_) => CameraMode::ThirdPerson,
            Self::FirstPerson(_) => CameraMode::FirstPerson,
            Self::Globe(_) => CameraMode::Globe,
        }
    }

    /// Switch controllers. The new controller starts from its initial state;
    /// switching to the current mode keeps the existing state.
    pub fn set_mode(&mut self, mode: CameraMode, globe_start: f32) {
        if self.mode() != mode {
            *self = Self::new(mode, globe_start);
        }
    }

    pub fn update(&mut self, input: &CameraInput) -> CameraPose {
        match self {
            Self::ThirdPerson(c) => c.update(input),
            Self::FirstPerson(c) => c.update(input),
            Self::Globe(c) => c.update(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("third".parse::<CameraMode>().unwrap(), CameraMode::ThirdPerson);
        assert_eq!("Fly".parse::<CameraMode>().unwrap(), CameraMode::FirstPerson);
        assert_eq!("globe".parse::<CameraMode>().unwrap(), CameraMode::Globe);
        assert!("top-down".parse::<CameraMode>().is_err());
    }

    #[test]
    fn test_switch_mode_resets() {
        let mut cam = ActiveCamera::new(CameraMode::FirstPerson, 5.0);
        let moved = cam.update(&CameraInput { dt: 1.0, up: true, ..Default::default() });

        cam.set_mode(CameraMode::FirstPerson, 5.0);
        let same = cam.update(&CameraInput::idle(0.0));
        assert_eq!(moved.eye, same.eye);

        cam.set_mode(CameraMode::Globe, 5.0);
        assert_eq!(cam.mode(), CameraMode::Globe);
        cam.set_mode(CameraMode::FirstPerson, 5.0);
        let fresh = cam.update(&CameraInput::idle(0.0));
        assert_eq!(fresh.eye, Vec3::new(0.0, 1.0, 5.0));
    }
}
