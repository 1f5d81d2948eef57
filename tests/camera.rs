//! Camera controller behaviour over input sequences

use std::f32::consts::PI;

use water_plane::prelude::*;

/// Small deterministic generator for drag sequences.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (self.next() as f32 / u32::MAX as f32) * (hi - lo)
    }
}

fn held(x: f32, y: f32) -> CameraInput {
    CameraInput { dt: 0.016, cursor: Some(Vec2::new(x, y)), ..Default::default() }
}

#[test]
fn test_globe_phi_stays_open() {
    for seed in [1u32, 7, 42, 1234, 0xDEAD_BEEF] {
        let mut rng = XorShift(seed);
        let mut cam = GlobeCamera::new(5.0);
        let mut cursor = Vec2::new(400.0, 300.0);

        for step in 0..2000 {
            if step % 97 == 0 {
                // Release the button now and then.
                cam.update(&CameraInput::idle(0.016));
            }
            cursor += Vec2::new(rng.range(-300.0, 300.0), rng.range(-5000.0, 5000.0));
            let pose = cam.update(&held(cursor.x, cursor.y));

            assert!(cam.phi > 0.0 && cam.phi < PI, "phi {} at step {}", cam.phi, step);
            assert!(cam.theta >= 0.0 && cam.theta <= 2.0 * PI);
            assert!(pose.view.is_finite());
        }
    }
}

#[test]
fn test_globe_extreme_drag_clamps() {
    let mut cam = GlobeCamera::new(5.0);
    cam.update(&held(0.0, 0.0));
    cam.update(&held(0.0, 1.0e9));
    assert!(cam.phi > 0.0 && cam.phi < PI);
    cam.update(&held(0.0, -1.0e9));
    assert!(cam.phi > 0.0 && cam.phi < PI);
    assert!(cam.eye().is_finite());
}

#[test]
fn test_globe_idle_is_stable() {
    let mut cam = GlobeCamera::new(5.0);
    let first = cam.update(&CameraInput::idle(0.016));
    for _ in 0..100 {
        assert_eq!(cam.update(&CameraInput::idle(0.016)), first);
    }
    assert!((first.eye.length() - Vec3::new(5.0, 2.5, 5.0).length()).abs() < 1e-4);
}

#[test]
fn test_first_person_round_trip() {
    let mut cam = FirstPersonCamera::new();
    let start = cam.update(&CameraInput::idle(0.0)).eye;

    cam.update(&CameraInput { dt: 0.5, up: true, ..Default::default() });
    let back = cam.update(&CameraInput { dt: 0.5, down: true, ..Default::default() });
    assert!(back.eye.abs_diff_eq(start, 1e-5));
}

#[test]
fn test_first_person_faces_negative_z() {
    let mut cam = FirstPersonCamera::new();
    let pose = cam.update(&CameraInput { dt: 1.0, up: true, ..Default::default() });
    assert!(pose.eye.abs_diff_eq(Vec3::new(0.0, 1.0, -1.0), 1e-4));
}

#[test]
fn test_third_person_follows_anchor() {
    let mut cam = ThirdPersonCamera::new();
    let before = cam.update(&CameraInput::idle(0.0));
    let after = cam.update(&CameraInput { dt: 1.0, up: true, ..Default::default() });

    let anchor_before = before.model.w_axis.truncate();
    let anchor_after = after.model.w_axis.truncate();
    let moved = anchor_after - anchor_before;
    assert!((moved.length() - 3.0).abs() < 1e-4);
    // The eye keeps its offset from the anchor while only translating.
    assert!((after.eye - anchor_after).abs_diff_eq(before.eye - anchor_before, 1e-4));
}

#[test]
fn test_cameras_are_independent() {
    let mut a = ActiveCamera::new(CameraMode::FirstPerson, 5.0);
    let mut b = ActiveCamera::new(CameraMode::FirstPerson, 5.0);
    a.update(&CameraInput { dt: 1.0, left: true, ..Default::default() });
    let pa = a.update(&CameraInput::idle(0.0));
    let pb = b.update(&CameraInput::idle(0.0));
    assert_ne!(pa.view, pb.view);
}
