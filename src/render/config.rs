//! Plane render configuration.
//!
//! One [`PlaneConfig`] describes which resources and uniforms a plane uses.
//! The two shipped looks are presets of the same type: [`PlaneConfig::plain`]
//! (flat tessellated grid) and [`PlaneConfig::water`] (displaced, textured,
//! lit and animated).

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::shader::ShaderPaths;

/// Upper bound accepted by every GL 4 implementation (`GL_MAX_TESS_GEN_LEVEL`
/// is at least 64).
pub const MAX_TESS_LEVEL: f32 = 64.0;

/// Inner and outer tessellation levels, applied uniformly to every edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TessLevels {
    pub inner: f32,
    pub outer: f32,
}

impl TessLevels {
    pub const PLAIN: Self = Self { inner: 16.0, outer: 16.0 };
    pub const WATER: Self = Self { inner: 64.0, outer: 64.0 };

    /// Clamp both levels to `[1, MAX_TESS_LEVEL]`.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(1.0, MAX_TESS_LEVEL) } else { 1.0 };
        Self {
            inner: clamp(self.inner),
            outer: clamp(self.outer),
        }
    }
}

/// Named presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneVariant {
    Plain,
    #[default]
    Water,
}

impl PlaneVariant {
    pub fn label(self) -> &'static str {
        match self {
            PlaneVariant::Plain => "Plain",
            PlaneVariant::Water => "Water",
        }
    }
}

impl fmt::Display for PlaneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlaneVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "plane" => Ok(PlaneVariant::Plain),
            "water" => Ok(PlaneVariant::Water),
            other => Err(format!("unknown plane variant '{}'", other)),
        }
    }
}

/// Which uniforms and textures the plane uses, plus their static values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneConfig {
    pub tess: TessLevels,
    /// Height map sampled by the evaluation stage (unit 0, `distext`)
    pub displacement_map: Option<PathBuf>,
    /// Color texture sampled by the fragment stage (unit 1, `waterTexture`)
    pub water_texture: Option<PathBuf>,
    /// Upload `time` every frame
    pub animate_time: bool,
    /// Upload `lightPos`, `viewPos`, `objectColor`, `texScale`, `texOffset`
    pub shading: bool,
    pub object_color: Vec4,
    /// Texture repeats per world unit
    pub tex_scale: f32,
    /// Texture scroll offset; static for now
    pub tex_offset: Vec2,
    pub shaders: ShaderPaths,
}

const DEFAULT_OBJECT_COLOR: Vec4 = Vec4::new(0.0, 1.0, 1.0, 1.0);

impl PlaneConfig {
    /// Flat tessellated grid with the shaders in `<shader_root>/plain`.
    pub fn plain(shader_root: impl AsRef<Path>) -> Self {
        Self {
            tess: TessLevels::PLAIN,
            displacement_map: None,
            water_texture: None,
            animate_time: false,
            shading: false,
            object_color: DEFAULT_OBJECT_COLOR,
            tex_scale: 1.0,
            tex_offset: Vec2::ZERO,
            shaders: ShaderPaths::in_dir(shader_root.as_ref().join("plain")),
        }
    }

    /// Displaced water surface with the shaders in `<shader_root>/water` and
    /// textures from `asset_root`.
    pub fn water(shader_root: impl AsRef<Path>, asset_root: impl AsRef<Path>) -> Self {
        let assets = asset_root.as_ref();
        Self {
            tess: TessLevels::WATER,
            displacement_map: Some(assets.join("displacement-map.bmp")),
            water_texture: Some(assets.join("water.bmp")),
            animate_time: true,
            shading: true,
            object_color: DEFAULT_OBJECT_COLOR,
            tex_scale: 0.25,
            tex_offset: Vec2::ZERO,
            shaders: ShaderPaths::in_dir(shader_root.as_ref().join("water")),
        }
    }

    pub fn for_variant(
        variant: PlaneVariant,
        shader_root: impl AsRef<Path>,
        asset_root: impl AsRef<Path>,
    ) -> Self {
        match variant {
            PlaneVariant::Plain => Self::plain(shader_root),
            PlaneVariant::Water => Self::water(shader_root, asset_root),
        }
    }

    pub fn has_displacement(&self) -> bool {
        self.displacement_map.is_some()
    }

    pub fn has_water_texture(&self) -> bool {
        self.water_texture.is_some()
    }
}

/// Shader directory shipped with the crate.
pub fn default_shader_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

/// Texture directory shipped with the crate.
pub fn default_asset_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let plain = PlaneConfig::plain("shaders");
        assert_eq!(plain.tess, TessLevels::PLAIN);
        assert!(!plain.has_displacement());
        assert!(!plain.has_water_texture());
        assert!(plain.shaders.vertex.ends_with("plain/vertex.glsl"));

        let water = PlaneConfig::water("shaders", "assets");
        assert_eq!(water.tess, TessLevels::WATER);
        assert!(water.has_displacement());
        assert!(water.has_water_texture());
        assert!(water.animate_time && water.shading);
        assert_eq!(water.tex_offset, Vec2::ZERO);
        assert!(water.shaders.fragment.ends_with("water/fragment.glsl"));
    }

    #[test]
    fn test_tess_clamp() {
        let t = TessLevels { inner: 0.0, outer: 500.0 }.clamped();
        assert_eq!(t, TessLevels { inner: 1.0, outer: MAX_TESS_LEVEL });
        let t = TessLevels { inner: f32::NAN, outer: 8.0 }.clamped();
        assert_eq!(t.inner, 1.0);
        assert_eq!(t.outer, 8.0);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("WATER".parse::<PlaneVariant>().unwrap(), PlaneVariant::Water);
        assert_eq!("plain".parse::<PlaneVariant>().unwrap(), PlaneVariant::Plain);
        assert!("lava".parse::<PlaneVariant>().is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let water = PlaneConfig::water("shaders", "assets");
        let json = serde_json::to_string(&water).unwrap();
        let back: PlaneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, water);
    }
}
