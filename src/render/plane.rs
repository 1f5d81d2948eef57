//! GPU plane: buffers, program, textures and the per-frame patch draw.

use glow::HasContext as _;
use std::collections::HashMap;

use super::config::{PlaneConfig, TessLevels};
use super::shader::{load_program, require_tessellation};
use super::texture::load_texture;
use super::uniforms::{contract_names, FrameInputs, FrameUniforms, UniformValue, DISPLACEMENT_UNIT, WATER_UNIT};
use super::check_gl;
use crate::mesh::GridMesh;
use crate::util::{Error, Result};

/// Vertex attribute locations shared with `vertex.glsl`.
pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
/// Vertices per tessellation patch.
pub const PATCH_VERTICES: i32 = 4;

/// Tessellated plane and the GL objects that draw it.
///
/// All methods must run on the thread that owns `gl`. GL objects are released
/// by [`PlaneMesh::destroy`]; dropping without it leaks them until the
/// context goes away.
pub struct PlaneMesh {
    grid: GridMesh,
    config: PlaneConfig,
    vao: glow::VertexArray,
    position_buffer: glow::Buffer,
    normal_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
    program: glow::Program,
    displacement: Option<glow::Texture>,
    water: Option<glow::Texture>,
    locations: HashMap<&'static str, glow::UniformLocation>,
    index_count: i32,
}

impl PlaneMesh {
    /// Generate the grid and create every GL resource the plane needs.
    ///
    /// A context without tessellation, or a program that fails to build, is
    /// an error; missing textures are not.
    pub fn new(gl: &glow::Context, min: f32, max: f32, stepsize: f32, config: PlaneConfig) -> Result<Self> {
        let grid = GridMesh::generate(min, max, stepsize)?;
        Self::from_grid(gl, grid, config)
    }

    pub fn from_grid(gl: &glow::Context, grid: GridMesh, config: PlaneConfig) -> Result<Self> {
        let _span = tracing::info_span!("plane_mesh_new", n_cols = grid.n_cols()).entered();
        require_tessellation(gl)?;

        let index_count = i32::try_from(grid.indices.len())
            .map_err(|_| Error::invalid_grid("too many indices for one draw call"))?;

        let program = load_program(gl, &config.shaders)?;

        let (vao, position_buffer, normal_buffer, index_buffer) = match upload_grid(gl, &grid) {
            Ok(objects) => objects,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        let displacement = config.displacement_map.as_deref().and_then(|p| load_texture(gl, p));
        let water = config.water_texture.as_deref().and_then(|p| load_texture(gl, p));

        let mut locations = HashMap::new();
        for name in contract_names(&config) {
            match unsafe { gl.get_uniform_location(program, name) } {
                Some(loc) => {
                    locations.insert(name, loc);
                }
                None => tracing::warn!("uniform '{}' is not active in the program", name),
            }
        }

        tracing::info!(
            "plane ready: {} vertices, {} patches, tess {}/{}",
            grid.vertex_count(),
            grid.cell_count(),
            config.tess.inner,
            config.tess.outer,
        );

        Ok(Self {
            grid,
            config,
            vao,
            position_buffer,
            normal_buffer,
            index_buffer,
            program,
            displacement,
            water,
            locations,
            index_count,
        })
    }

    pub fn grid(&self) -> &GridMesh {
        &self.grid
    }

    pub fn config(&self) -> &PlaneConfig {
        &self.config
    }

    pub fn set_tess_levels(&mut self, tess: TessLevels) {
        self.config.tess = tess.clamped();
    }

    pub fn set_tex_scale(&mut self, scale: f32) {
        self.config.tex_scale = scale;
    }

    /// Whether each configured texture made it to the GPU:
    /// `(displacement, water)`.
    pub fn textures_loaded(&self) -> (bool, bool) {
        (self.displacement.is_some(), self.water.is_some())
    }

    /// Issue this frame's patch draw.
    pub fn draw(&self, gl: &glow::Context, frame: &FrameInputs) {
        let uniforms = FrameUniforms::plan(&self.config, frame);

        unsafe {
            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));
            check_gl(gl, "bind program");

            for (name, value) in uniforms.iter() {
                let loc = self.locations.get(name);
                match value {
                    UniformValue::Mat4(m) => gl.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array()),
                    UniformValue::F32(v) => gl.uniform_1_f32(loc, v),
                    UniformValue::Sampler(unit) => gl.uniform_1_i32(loc, unit as i32),
                    UniformValue::Vec2(v) => gl.uniform_2_f32(loc, v.x, v.y),
                    UniformValue::Vec3(v) => gl.uniform_3_f32(loc, v.x, v.y, v.z),
                    UniformValue::Vec4(v) => gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                }
            }

            for (unit, texture) in texture_bindings(&self.config, self.displacement, self.water) {
                gl.active_texture(glow::TEXTURE0 + unit);
                gl.bind_texture(glow::TEXTURE_2D, texture);
            }
            check_gl(gl, "set uniforms");

            gl.patch_parameter_i32(glow::PATCH_VERTICES, PATCH_VERTICES);
            gl.draw_elements(glow::PATCHES, self.index_count, glow::UNSIGNED_INT, 0);
            check_gl(gl, "draw patches");

            gl.bind_vertex_array(None);
            gl.active_texture(glow::TEXTURE0);
            gl.use_program(None);
        }
    }

    /// Release every GL object owned by the plane.
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.position_buffer);
            gl.delete_buffer(self.normal_buffer);
            gl.delete_buffer(self.index_buffer);
            for texture in [self.displacement, self.water].into_iter().flatten() {
                gl.delete_texture(texture);
            }
        }
        tracing::debug!("plane GL resources released");
    }
}

/// Texture to bind on each sampler unit the config uses.
///
/// A configured texture that failed to load is bound as `None`, so its
/// sampler never reads whatever the unit held before (egui draws on unit 0).
fn texture_bindings<T: Copy>(
    config: &PlaneConfig,
    displacement: Option<T>,
    water: Option<T>,
) -> Vec<(u32, Option<T>)> {
    let mut bindings = Vec::with_capacity(2);
    if config.has_displacement() {
        bindings.push((DISPLACEMENT_UNIT, displacement));
    }
    if config.has_water_texture() {
        bindings.push((WATER_UNIT, water));
    }
    bindings
}

/// Create `count` objects, releasing the ones already made if any creation
/// fails.
fn create_all<T: Copy>(
    count: usize,
    mut create: impl FnMut() -> std::result::Result<T, String>,
    mut release: impl FnMut(T),
) -> Result<Vec<T>> {
    let mut objects = Vec::with_capacity(count);
    for _ in 0..count {
        match create() {
            Ok(object) => objects.push(object),
            Err(e) => {
                for object in objects {
                    release(object);
                }
                return Err(Error::Gl(e));
            }
        }
    }
    Ok(objects)
}

/// Create the vertex array with positions (location 0), normals
/// (location 1) and the patch index buffer.
fn upload_grid(
    gl: &glow::Context,
    grid: &GridMesh,
) -> Result<(glow::VertexArray, glow::Buffer, glow::Buffer, glow::Buffer)> {
    let vao = unsafe { gl.create_vertex_array() }.map_err(Error::Gl)?;
    let buffers = create_all(3, || unsafe { gl.create_buffer() }, |b| unsafe { gl.delete_buffer(b) })
        .inspect_err(|_| unsafe { gl.delete_vertex_array(vao) })?;
    let (position_buffer, normal_buffer, index_buffer) = (buffers[0], buffers[1], buffers[2]);

    unsafe {
        gl.bind_vertex_array(Some(vao));

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(position_buffer));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, grid.vertex_bytes(), glow::STATIC_DRAW);
        gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 3, glow::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(POSITION_LOCATION);

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(normal_buffer));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, grid.normal_bytes(), glow::STATIC_DRAW);
        gl.vertex_attrib_pointer_f32(NORMAL_LOCATION, 3, glow::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(NORMAL_LOCATION);

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
        gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, grid.index_bytes(), glow::STATIC_DRAW);

        // Unbind the VAO first so it keeps its element buffer binding.
        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        check_gl(gl, "upload grid");

        Ok((vao, position_buffer, normal_buffer, index_buffer))
    }
}
