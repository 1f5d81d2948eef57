//! Per-frame uniform values.
//!
//! [`FrameUniforms::plan`] turns a [`PlaneConfig`] and the frame's camera and
//! light into the exact list of `(name, value)` pairs the shaders expect.
//! Nothing here touches GL, so the binding contract can be checked without a
//! context; [`super::PlaneMesh::draw`] only uploads what the plan contains.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::config::PlaneConfig;
use crate::util::{eye_from_view, model_view_projection};

/// Uniform names shared with the GLSL sources. Case-sensitive.
pub mod names {
    pub const MVP: &str = "MVP";
    pub const INNER_TESS: &str = "innerTess";
    pub const OUTER_TESS: &str = "outerTess";
    pub const TIME: &str = "time";
    pub const DISPLACEMENT: &str = "distext";
    pub const WATER_TEXTURE: &str = "waterTexture";
    pub const LIGHT_POS: &str = "lightPos";
    pub const VIEW_POS: &str = "viewPos";
    pub const OBJECT_COLOR: &str = "objectColor";
    pub const TEX_SCALE: &str = "texScale";
    pub const TEX_OFFSET: &str = "texOffset";
}

/// Texture unit of the displacement map.
pub const DISPLACEMENT_UNIT: u32 = 0;
/// Texture unit of the water color texture.
pub const WATER_UNIT: u32 = 1;

/// Read-only inputs of one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInputs {
    pub light_pos: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    /// Seconds since start
    pub time: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    F32(f32),
    /// Sampler texture unit
    Sampler(u32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

/// Ordered uniform assignments for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    values: Vec<(&'static str, UniformValue)>,
}

impl FrameUniforms {
    pub fn plan(config: &PlaneConfig, frame: &FrameInputs) -> Self {
        // The plane is never transformed on its own; the camera does all
        // the positioning.
        let model = Mat4::IDENTITY;
        let tess = config.tess.clamped();

        let mut values = vec![
            (names::MVP, UniformValue::Mat4(model_view_projection(frame.projection, frame.view, model))),
            (names::INNER_TESS, UniformValue::F32(tess.inner)),
            (names::OUTER_TESS, UniformValue::F32(tess.outer)),
        ];

        if config.animate_time {
            values.push((names::TIME, UniformValue::F32(frame.time)));
        }
        if config.has_displacement() {
            values.push((names::DISPLACEMENT, UniformValue::Sampler(DISPLACEMENT_UNIT)));
        }
        if config.has_water_texture() {
            values.push((names::WATER_TEXTURE, UniformValue::Sampler(WATER_UNIT)));
        }
        if config.shading {
            values.push((names::LIGHT_POS, UniformValue::Vec3(frame.light_pos)));
            values.push((names::VIEW_POS, UniformValue::Vec3(eye_from_view(frame.view))));
            values.push((names::OBJECT_COLOR, UniformValue::Vec4(config.object_color)));
            values.push((names::TEX_SCALE, UniformValue::F32(config.tex_scale)));
            values.push((names::TEX_OFFSET, UniformValue::Vec2(config.tex_offset)));
        }

        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.values.iter().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Every uniform name `config` will upload, in upload order.
pub fn contract_names(config: &PlaneConfig) -> Vec<&'static str> {
    let frame = FrameInputs {
        light_pos: Vec3::ZERO,
        view: Mat4::IDENTITY,
        projection: Mat4::IDENTITY,
        time: 0.0,
    };
    FrameUniforms::plan(config, &frame).names().collect()
}
