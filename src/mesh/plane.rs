//! Regular XZ grid used as the tessellation base mesh.
//!
//! The grid is generated with `(min, 0, min)` as its origin. One "column" of
//! vertices has a fixed X and increasing Z, and columns are emitted with
//! increasing X, so vertex `(i, j)` lives at index `i * n_cols + j`.
//!
//! Every cell becomes one 4-vertex patch. Displacement happens on the GPU,
//! which is why all generated normals point straight up.

use glam::Vec3;

use crate::util::{BBox3f, Error, Result};

/// Quotients this many ulps from a whole number count as whole, so extents
/// that are a whole number of steps in decimal (`2.0 / 0.1`) keep their last
/// column.
const SNAP_ULPS: f32 = 4.0;

/// Largest index count one `glDrawElements` call accepts (`GLsizei`).
const MAX_DRAW_INDICES: u64 = i32::MAX as u64;

/// Flat grid mesh: positions, normals and quad patch indices.
#[derive(Clone, Debug)]
pub struct GridMesh {
    min: f32,
    max: f32,
    stepsize: f32,
    n_cols: u32,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// Number of vertices along one side of the grid.
///
/// `floor((max - min) / stepsize) + 1`, validated so the whole grid can be
/// drawn with one indexed call. The check runs before anything is allocated.
pub fn grid_columns(min: f32, max: f32, stepsize: f32) -> Result<u32> {
    if !(stepsize.is_finite() && stepsize > 0.0) {
        return Err(Error::invalid_grid(format!(
            "stepsize must be positive and finite, got {}",
            stepsize
        )));
    }
    if !(min.is_finite() && max.is_finite()) {
        return Err(Error::invalid_grid(format!(
            "bounds must be finite, got [{}, {}]",
            min, max
        )));
    }
    if min >= max {
        return Err(Error::invalid_grid(format!(
            "min must be less than max, got [{}, {}]",
            min, max
        )));
    }

    let steps = whole_steps((max - min) / stepsize);
    let n_cols = steps.saturating_add(1);
    let index_count = steps.saturating_mul(steps).saturating_mul(4);
    if index_count > MAX_DRAW_INDICES {
        return Err(Error::invalid_grid(format!(
            "{} x {} vertices need {} indices, more than one draw call allows",
            n_cols, n_cols, index_count
        )));
    }
    Ok(n_cols as u32)
}

/// `floor(q)`, except that `q` within float rounding of a whole number is
/// taken as that number.
fn whole_steps(q: f32) -> u64 {
    let nearest = q.round();
    if (q - nearest).abs() <= q.abs() * SNAP_ULPS * f32::EPSILON {
        nearest as u64
    } else {
        q.floor() as u64
    }
}

impl GridMesh {
    /// Generate the grid spanning `[min, max]` on both X and Z.
    pub fn generate(min: f32, max: f32, stepsize: f32) -> Result<Self> {
        let n_cols = grid_columns(min, max, stepsize)?;
        let n = n_cols as usize;

        let mut vertices = Vec::with_capacity(n * n);
        for i in 0..n_cols {
            let x = min + i as f32 * stepsize;
            for j in 0..n_cols {
                let z = min + j as f32 * stepsize;
                vertices.push(Vec3::new(x, 0.0, z));
            }
        }
        let normals = vec![Vec3::Y; vertices.len()];

        let cells = n.saturating_sub(1);
        let mut indices = Vec::with_capacity(4 * cells * cells);
        for i in 0..n_cols - 1 {
            for j in 0..n_cols - 1 {
                indices.push(i * n_cols + j);
                indices.push(i * n_cols + j + 1);
                indices.push((i + 1) * n_cols + j + 1);
                indices.push((i + 1) * n_cols + j);
            }
        }

        Ok(Self {
            min,
            max,
            stepsize,
            n_cols,
            vertices,
            normals,
            indices,
        })
    }

    /// Vertices per grid side.
    #[inline]
    pub fn n_cols(&self) -> u32 {
        self.n_cols
    }

    /// Number of quad cells (patches).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.indices.len() / 4
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn stepsize(&self) -> f32 {
        self.stepsize
    }

    /// Requested extent `(min, max)`.
    #[inline]
    pub fn extent(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Bounds of the generated vertices. May stop short of `max` when the
    /// extent is not a whole number of steps.
    pub fn bounds(&self) -> BBox3f {
        let mut b = BBox3f::EMPTY;
        for v in &self.vertices {
            b.expand_by_point(*v);
        }
        b
    }

    /// Iterate patches as `[bottom_left, bottom_right, top_right, top_left]`.
    pub fn quads(&self) -> impl Iterator<Item = [u32; 4]> + '_ {
        self.indices
            .chunks_exact(4)
            .map(|q| [q[0], q[1], q[2], q[3]])
    }

    /// Positions as raw bytes for a vertex buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Normals as raw bytes for a vertex buffer upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Indices as raw bytes for an element buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_grid() {
        let mesh = GridMesh::generate(-1.0, 1.0, 1.0).unwrap();
        assert_eq!(mesh.n_cols(), 3);
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.cell_count(), 4);
        assert_eq!(mesh.indices.len(), 16);

        assert_eq!(mesh.vertices[0], Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(mesh.vertices[1], Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[3], Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(mesh.vertices[8], Vec3::new(1.0, 0.0, 1.0));

        let first: Vec<[u32; 4]> = mesh.quads().take(2).collect();
        assert_eq!(first[0], [0, 1, 4, 3]);
        assert_eq!(first[1], [1, 2, 5, 4]);
    }

    #[test]
    fn test_decimal_step_keeps_last_column() {
        let mesh = GridMesh::generate(-1.0, 1.0, 0.1).unwrap();
        assert_eq!(mesh.n_cols(), 21);
        let last = *mesh.vertices.last().unwrap();
        assert!((last.x - 1.0).abs() < 1e-5);
        assert!((last.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_near_whole_extent_is_not_rounded_up() {
        let mesh = GridMesh::generate(0.0, 2.99995, 1.0).unwrap();
        assert_eq!(mesh.n_cols(), 3);
        assert!(mesh.bounds().max.x <= 2.99995);
    }

    #[test]
    fn test_whole_steps() {
        assert_eq!(whole_steps(3.0), 3);
        assert_eq!(whole_steps(2.0 / 0.1), 20);
        assert_eq!(whole_steps(2.99995), 2);
        assert_eq!(whole_steps(0.5), 0);
    }

    #[test]
    fn test_rejects_undrawable_grid_before_allocating() {
        // 30001^2 vertices fit u32 indices, but 4 * 30000^2 indices do not
        // fit one draw call.
        assert!(matches!(grid_columns(0.0, 30000.0, 1.0), Err(Error::InvalidGrid(_))));
        assert!(grid_columns(0.0, 23171.0, 1.0).is_err());
        assert_eq!(grid_columns(0.0, 23170.0, 1.0).unwrap(), 23171);
        assert!(grid_columns(-3.0e38, 3.0e38, 1.0e-30).is_err());
    }

    #[test]
    fn test_partial_extent_drops_remainder() {
        let mesh = GridMesh::generate(0.0, 1.0, 0.3).unwrap();
        assert_eq!(mesh.n_cols(), 4);
        let bounds = mesh.bounds();
        assert!((bounds.max.x - 0.9).abs() < 1e-5);
        assert_eq!(mesh.extent(), (0.0, 1.0));
    }

    #[test]
    fn test_rejects_bad_params() {
        assert!(matches!(
            GridMesh::generate(0.0, 1.0, 0.0),
            Err(Error::InvalidGrid(_))
        ));
        assert!(GridMesh::generate(0.0, 1.0, -0.5).is_err());
        assert!(GridMesh::generate(1.0, 1.0, 0.5).is_err());
        assert!(GridMesh::generate(2.0, -2.0, 0.5).is_err());
        assert!(GridMesh::generate(f32::NAN, 1.0, 0.5).is_err());
        assert!(GridMesh::generate(0.0, 1.0, f32::INFINITY).is_err());
        assert!(GridMesh::generate(0.0, 1.0e6, 1.0e-3).is_err());
    }

    #[test]
    fn test_byte_views() {
        let mesh = GridMesh::generate(0.0, 1.0, 0.5).unwrap();
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertex_count() * 12);
        assert_eq!(mesh.normal_bytes().len(), mesh.vertex_count() * 12);
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
    }
}
