//! Five-stage GLSL program loading.
//!
//! Every stage is compiled even after an earlier stage failed, so one run
//! reports all diagnostics. The program is only returned when every stage
//! compiled and the link succeeded.

use glow::HasContext as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::{Error, Result};

/// Minimum desktop GL version with tessellation stages.
pub const MIN_GL_VERSION: (u32, u32) = (4, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEval,
    Geometry,
    Fragment,
}

impl ShaderStage {
    /// Pipeline order.
    pub const ALL: [ShaderStage; 5] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEval,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
    ];

    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
            ShaderStage::TessEval => glow::TESS_EVALUATION_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tessellation control",
            ShaderStage::TessEval => "tessellation evaluation",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// File name used by [`ShaderPaths::in_dir`].
    pub fn file_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex.glsl",
            ShaderStage::TessControl => "tess_control.glsl",
            ShaderStage::TessEval => "tess_eval.glsl",
            ShaderStage::Geometry => "geo.glsl",
            ShaderStage::Fragment => "fragment.glsl",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source file of each stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub tess_control: PathBuf,
    pub tess_eval: PathBuf,
    pub geometry: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    /// Conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vertex: dir.join(ShaderStage::Vertex.file_name()),
            tess_control: dir.join(ShaderStage::TessControl.file_name()),
            tess_eval: dir.join(ShaderStage::TessEval.file_name()),
            geometry: dir.join(ShaderStage::Geometry.file_name()),
            fragment: dir.join(ShaderStage::Fragment.file_name()),
        }
    }

    pub fn path(&self, stage: ShaderStage) -> &Path {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::TessControl => &self.tess_control,
            ShaderStage::TessEval => &self.tess_eval,
            ShaderStage::Geometry => &self.geometry,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// GLSL text of all five stages.
#[derive(Clone, Debug)]
pub struct ShaderSources {
    sources: [String; 5],
}

impl ShaderSources {
    /// Read every stage as UTF-8. Stops at the first unreadable file.
    pub fn read(paths: &ShaderPaths) -> Result<Self> {
        let mut sources: [String; 5] = Default::default();
        for (slot, stage) in sources.iter_mut().zip(ShaderStage::ALL) {
            let path = paths.path(stage);
            *slot = std::fs::read_to_string(path).map_err(|source| {
                tracing::error!("cannot open {} shader {}: {}", stage, path.display(), source);
                Error::ShaderIo {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(Self { sources })
    }

    /// Sources given in pipeline order.
    pub fn from_strings(sources: [String; 5]) -> Self {
        Self { sources }
    }

    pub fn get(&self, stage: ShaderStage) -> &str {
        let idx = ShaderStage::ALL
            .iter()
            .position(|s| *s == stage)
            .unwrap_or_default();
        &self.sources[idx]
    }
}

/// Whether a context of this version can run tessellation shaders.
pub fn supports_tessellation(major: u32, minor: u32, is_embedded: bool) -> bool {
    !is_embedded && (major, minor) >= MIN_GL_VERSION
}

/// Reject contexts that cannot run the five-stage pipeline.
pub fn require_tessellation(gl: &glow::Context) -> Result<()> {
    let v = gl.version();
    if supports_tessellation(v.major, v.minor, v.is_embedded) {
        Ok(())
    } else {
        Err(Error::UnsupportedContext(format!(
            "OpenGL {}.{}{} has no tessellation stages (need {}.{} core)",
            v.major,
            v.minor,
            if v.is_embedded { " ES" } else { "" },
            MIN_GL_VERSION.0,
            MIN_GL_VERSION.1,
        )))
    }
}

/// Compile all stages and link them into one program.
pub fn link_program(gl: &glow::Context, sources: &ShaderSources) -> Result<glow::Program> {
    unsafe {
        let program = gl.create_program().map_err(Error::Gl)?;

        let mut shaders = Vec::with_capacity(ShaderStage::ALL.len());
        let mut first_failure: Option<Error> = None;
        for stage in ShaderStage::ALL {
            tracing::debug!("compiling {} shader", stage);
            let shader = match gl.create_shader(stage.gl_kind()) {
                Ok(shader) => shader,
                Err(e) => {
                    first_failure.get_or_insert(Error::Gl(format!("create {} shader: {}", stage, e)));
                    continue;
                }
            };
            gl.shader_source(shader, sources.get(stage));
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                tracing::error!("{} shader failed to compile:\n{}", stage, log);
                first_failure.get_or_insert(Error::ShaderCompile { stage, log });
            }
            shaders.push(shader);
        }

        if let Some(err) = first_failure {
            for shader in shaders {
                gl.delete_shader(shader);
            }
            gl.delete_program(program);
            return Err(err);
        }

        for &shader in &shaders {
            gl.attach_shader(program, shader);
        }
        tracing::debug!("linking program");
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if !linked {
            let log = gl.get_program_info_log(program);
            tracing::error!("program failed to link:\n{}", log);
            gl.delete_program(program);
            return Err(Error::ProgramLink(log));
        }

        Ok(program)
    }
}

/// Read sources from disk and link them.
pub fn load_program(gl: &glow::Context, paths: &ShaderPaths) -> Result<glow::Program> {
    let _span = tracing::info_span!("load_program", vertex = %paths.vertex.display()).entered();
    let sources = ShaderSources::read(paths)?;
    link_program(gl, &sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_in_dir() {
        let paths = ShaderPaths::in_dir("shaders/water");
        assert_eq!(paths.path(ShaderStage::Vertex), Path::new("shaders/water/vertex.glsl"));
        assert_eq!(paths.path(ShaderStage::TessControl), Path::new("shaders/water/tess_control.glsl"));
        assert_eq!(paths.path(ShaderStage::TessEval), Path::new("shaders/water/tess_eval.glsl"));
        assert_eq!(paths.path(ShaderStage::Geometry), Path::new("shaders/water/geo.glsl"));
        assert_eq!(paths.path(ShaderStage::Fragment), Path::new("shaders/water/fragment.glsl"));
    }

    #[test]
    fn test_read_sources() {
        let dir = tempfile::tempdir().unwrap();
        for stage in ShaderStage::ALL {
            std::fs::write(dir.path().join(stage.file_name()), format!("// {}", stage)).unwrap();
        }
        let sources = ShaderSources::read(&ShaderPaths::in_dir(dir.path())).unwrap();
        assert_eq!(sources.get(ShaderStage::Geometry), "// geometry");
        assert_eq!(sources.get(ShaderStage::Fragment), "// fragment");
    }

    #[test]
    fn test_missing_source_names_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vertex.glsl"), "void main() {}").unwrap();
        let err = ShaderSources::read(&ShaderPaths::in_dir(dir.path())).unwrap_err();
        match err {
            Error::ShaderIo { path, .. } => assert!(path.ends_with("tess_control.glsl")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_version_gate() {
        assert!(supports_tessellation(4, 0, false));
        assert!(supports_tessellation(4, 6, false));
        assert!(!supports_tessellation(3, 3, false));
        assert!(!supports_tessellation(3, 2, true));
    }

    #[test]
    fn test_stage_kinds_distinct() {
        let mut kinds: Vec<u32> = ShaderStage::ALL.iter().map(|s| s.gl_kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), 5);
    }
}
