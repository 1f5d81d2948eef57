//! The shipped GLSL sources agree with the uniform and attribute contract.

use water_plane::prelude::*;
use water_plane::render::uniforms::contract_names;
use water_plane::render::{ShaderSources, TextureImage};

fn sources(variant: PlaneVariant) -> (PlaneConfig, ShaderSources) {
    let config = PlaneConfig::for_variant(variant, default_shader_root(), default_asset_root());
    let sources = ShaderSources::read(&config.shaders).unwrap();
    (config, sources)
}

fn declares_uniform(sources: &ShaderSources, name: &str) -> bool {
    ShaderStage::ALL.iter().any(|&stage| {
        sources.get(stage).lines().any(|line| {
            let line = line.trim();
            line.starts_with("uniform ")
                && line
                    .trim_end_matches(';')
                    .split_whitespace()
                    .last()
                    .is_some_and(|ident| ident == name)
        })
    })
}

#[test]
fn test_every_uniform_declared() {
    for variant in [PlaneVariant::Plain, PlaneVariant::Water] {
        let (config, sources) = sources(variant);
        for name in contract_names(&config) {
            assert!(declares_uniform(&sources, name), "{} shaders lack uniform {}", variant, name);
        }
    }
}

#[test]
fn test_vertex_attribute_locations() {
    for variant in [PlaneVariant::Plain, PlaneVariant::Water] {
        let (_, sources) = sources(variant);
        let vs = sources.get(ShaderStage::Vertex);
        assert!(vs.contains("layout(location = 0) in vec3"), "{} vertex stage", variant);
        assert!(vs.contains("layout(location = 1) in vec3"), "{} vertex stage", variant);
    }
}

#[test]
fn test_quad_patches() {
    for variant in [PlaneVariant::Plain, PlaneVariant::Water] {
        let (_, sources) = sources(variant);
        assert!(sources.get(ShaderStage::TessControl).contains("layout(vertices = 4) out;"));
        assert!(sources.get(ShaderStage::TessEval).contains("layout(quads"));
    }
}

#[test]
fn test_tessellation_version() {
    for variant in [PlaneVariant::Plain, PlaneVariant::Water] {
        let (_, sources) = sources(variant);
        for stage in ShaderStage::ALL {
            let first = sources.get(stage).lines().next().unwrap_or_default();
            assert_eq!(first.trim(), "#version 400 core", "{} {}", variant, stage);
        }
    }
}

#[test]
fn test_shipped_textures_decode() {
    let config = PlaneConfig::water(default_shader_root(), default_asset_root());
    for path in [config.displacement_map.unwrap(), config.water_texture.unwrap()] {
        let img = TextureImage::decode_bmp(&path).unwrap();
        assert_eq!((img.width, img.height), (128, 128));
    }
}
