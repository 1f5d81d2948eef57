//! OpenGL rendering of the tessellated plane.
//!
//! - [`config`] - which uniforms/textures a plane uses, presets
//! - [`uniforms`] - pure per-frame uniform planning
//! - [`shader`] - five-stage program loading
//! - [`texture`] - BMP textures
//! - [`plane`] - GPU resources and the patch draw

pub mod config;
pub mod plane;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use config::{default_asset_root, default_shader_root, PlaneConfig, PlaneVariant, TessLevels};
pub use plane::PlaneMesh;
pub use shader::{ShaderPaths, ShaderSources, ShaderStage};
pub use texture::TextureImage;
pub use uniforms::{FrameInputs, FrameUniforms, UniformValue};

use glow::HasContext as _;

/// Drain and log pending GL errors after `label`. Never fails.
pub(crate) fn check_gl(gl: &glow::Context, label: &str) {
    // Bounded: a lost context can report errors forever.
    for _ in 0..8 {
        let err = unsafe { gl.get_error() };
        if err == glow::NO_ERROR {
            break;
        }
        tracing::warn!("OpenGL error 0x{:04X} after {}", err, label);
    }
}
