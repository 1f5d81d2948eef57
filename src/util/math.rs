//! Math type re-exports and transform helpers.
//!
//! Matrices follow OpenGL conventions: right-handed view space and a
//! `-1..1` clip-space depth range.

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Axis-aligned bounding box with single precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Check if this box is empty (has no volume).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Get the center of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for BBox3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

/// OpenGL perspective projection (`fov_y` in radians).
#[inline]
pub fn gl_projection(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y, aspect, near, far)
}

/// Combined model-view-projection, applied right to left: `P * V * M`.
#[inline]
pub fn model_view_projection(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}

/// World-space eye position encoded in a view matrix.
///
/// This is the translation column of the inverse view matrix.
#[inline]
pub fn eye_from_view(view: Mat4) -> Vec3 {
    view.inverse().w_axis.truncate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox3f() {
        let mut b = BBox3f::EMPTY;
        assert!(b.is_empty());

        b.expand_by_point(Vec3::new(-1.0, 0.0, -1.0));
        assert!(!b.is_empty());

        b.expand_by_point(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(b.center(), Vec3::ZERO);
        assert_eq!(b.size(), Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_identity_model_reduces_to_pv() {
        let p = gl_projection(45f32.to_radians(), 1.0, 0.1, 100.0);
        let v = Mat4::look_at_rh(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO, Vec3::Y);
        let mvp = model_view_projection(p, v, Mat4::IDENTITY);
        assert!(mvp.abs_diff_eq(p * v, 1e-6));
    }

    #[test]
    fn test_eye_from_view() {
        let eye = Vec3::new(3.0, 1.5, -2.0);
        let v = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        assert!(eye_from_view(v).abs_diff_eq(eye, 1e-5));
    }
}
