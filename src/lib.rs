//! # water-plane
//!
//! A tessellated, displacement-mapped water plane rendered through the full
//! OpenGL 4 pipeline (vertex, tessellation control, tessellation evaluation,
//! geometry, fragment) and viewed through interchangeable cameras.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`mesh`] - Grid generation (positions, normals, quad patch indices)
//! - [`camera`] - Third-person, first-person and globe controllers
//! - [`render`] - Shader/texture loading, uniform planning, the GPU plane
//!
//! ## Example
//!
//! ```ignore
//! use water_plane::prelude::*;
//!
//! let config = PlaneConfig::water(default_shader_root(), default_asset_root());
//! let plane = PlaneMesh::new(&gl, -10.0, 10.0, 1.0, config)?;
//!
//! let mut camera = GlobeCamera::new(8.0);
//! let pose = camera.update(&CameraInput::idle(dt));
//! plane.draw(&gl, &FrameInputs { light_pos, view: pose.view, projection, time });
//! ```

pub mod util;
pub mod mesh;
pub mod camera;
pub mod render;

// Desktop viewer (optional, enabled with "viewer" feature)
#[cfg(feature = "viewer")]
pub mod viewer;

pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::util::{Mat4, Vec2, Vec3, Vec4};
    pub use crate::mesh::GridMesh;
    pub use crate::camera::{
        ActiveCamera, CameraInput, CameraMode, CameraPose, FirstPersonCamera, GlobeCamera,
        ThirdPersonCamera,
    };
    pub use crate::render::{
        default_asset_root, default_shader_root, FrameInputs, PlaneConfig, PlaneMesh,
        PlaneVariant, ShaderStage, TessLevels,
    };
}
