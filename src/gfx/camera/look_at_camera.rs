use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

use super::camera_utils::OPENGL_TO_WGPU_MATRIX;

/// Smallest gap kept between the near and far clip planes.
pub const CLIP_MARGIN: f32 = 0.5;
pub const NEAR_MIN: f32 = 0.1;
pub const FAR_MAX: f32 = 40.0;
pub const FOVY_MIN: f32 = 1.0;
pub const FOVY_MAX: f32 = 100.0;

/// Position and orientation of the camera, the part restored by a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vector3<f32>,
    pub at: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 3.0, 8.0),
            at: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Look-at camera with a perspective projection.
///
/// `eye`, `at` and `up` are edited freely by navigation and the panel. The
/// projection parameters go through setters so `near <= far - CLIP_MARGIN`
/// holds after every edit.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vector3<f32>,
    pub at: Vector3<f32>,
    pub up: Vector3<f32>,
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
    initial: CameraPose,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraPose::default(), 45.0, 1.0, 0.1, 40.0)
    }
}

impl Camera {
    /// Creates a camera and retains `pose` as the reset snapshot.
    pub fn new(pose: CameraPose, fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            eye: pose.eye,
            at: pose.at,
            up: pose.up,
            fovy: 45.0,
            aspect: 1.0,
            near: NEAR_MIN,
            far: FAR_MAX,
            initial: pose,
        };
        camera.set_fovy(fovy);
        camera.set_aspect(aspect);
        camera.set_far(far);
        camera.set_near(near);
        camera
    }

    /// Right-handed look-at view matrix.
    ///
    /// Undefined when `eye == at` or `up` is parallel to the view direction;
    /// callers are expected not to produce such a pose.
    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::new(self.eye.x, self.eye.y, self.eye.z),
            Point3::new(self.at.x, self.at.y, self.at.z),
            self.up,
        )
    }

    /// Perspective projection with wgpu depth range.
    pub fn projection(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fovy), self.aspect, self.near, self.far)
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye,
            at: self.at,
            up: self.up,
        }
    }

    pub fn initial_pose(&self) -> CameraPose {
        self.initial
    }

    /// Restores eye, at and up from the snapshot taken at construction.
    ///
    /// Projection parameters are left alone; aspect follows the viewport.
    pub fn reset_to_initial(&mut self) {
        self.eye = self.initial.eye;
        self.at = self.initial.at;
        self.up = self.initial.up;
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Ignores non-finite input.
    pub fn set_fovy(&mut self, fovy: f32) {
        if fovy.is_finite() {
            self.fovy = fovy.clamp(FOVY_MIN, FOVY_MAX);
        }
    }

    /// Ignores non-positive or non-finite ratios (e.g. a minimized window).
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.set_aspect(width as f32 / height as f32);
        }
    }

    /// Sets the near plane, pushing the far plane out if they get too close.
    /// Non-finite input is ignored.
    pub fn set_near(&mut self, near: f32) {
        if !near.is_finite() {
            return;
        }
        self.near = near.clamp(NEAR_MIN, FAR_MAX - CLIP_MARGIN);
        if self.far < self.near + CLIP_MARGIN {
            self.far = self.near + CLIP_MARGIN;
        }
    }

    /// Sets the far plane, pulling the near plane in if they get too close.
    /// Non-finite input is ignored.
    pub fn set_far(&mut self, far: f32) {
        if !far.is_finite() {
            return;
        }
        self.far = far.clamp(NEAR_MIN + CLIP_MARGIN, FAR_MAX);
        if self.near > self.far - CLIP_MARGIN {
            self.near = self.far - CLIP_MARGIN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_defaults_match_startup_scene() {
        let camera = Camera::default();
        assert_eq!(camera.eye, Vector3::new(0.0, 3.0, 8.0));
        assert_eq!(camera.at, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(camera.up, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(camera.fovy(), 45.0);
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 40.0);
    }

    #[test]
    fn test_view_moves_eye_to_origin() {
        let camera = Camera::default();
        let eye = camera.view() * camera.eye.extend(1.0);
        assert!(eye.truncate().magnitude() < 1e-5);

        // The target lies straight ahead, down -z in eye space.
        let at = camera.view() * camera.at.extend(1.0);
        assert!(at.x.abs() < 1e-5 && at.y.abs() < 1e-5);
        assert!(at.z < 0.0);
    }

    #[test]
    fn test_projection_maps_clip_planes_to_wgpu_depth() {
        let camera = Camera::default();
        let project = |z: f32| {
            let clip = camera.projection() * Vector4::new(0.0, 0.0, z, 1.0);
            clip.z / clip.w
        };
        assert!(project(-camera.near()).abs() < 1e-4);
        assert!((project(-camera.far()) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_near_edit_pushes_far() {
        let mut camera = Camera::default();
        camera.set_far(5.0);
        camera.set_near(4.8);
        assert_eq!(camera.near(), 4.8);
        assert!((camera.far() - 5.3).abs() < 1e-5);
    }

    #[test]
    fn test_far_edit_pulls_near() {
        let mut camera = Camera::default();
        camera.set_near(10.0);
        camera.set_far(10.2);
        assert_eq!(camera.far(), 10.2);
        assert!((camera.near() - 9.7).abs() < 1e-5);
    }

    #[test]
    fn test_clip_margin_holds_for_random_edit_sequences() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut camera = Camera::default();
        for _ in 0..2_000 {
            let value = rng.random_range(-5.0..50.0);
            if rng.random::<bool>() {
                camera.set_near(value);
            } else {
                camera.set_far(value);
            }
            assert!(
                camera.near() <= camera.far() - CLIP_MARGIN + 1e-4,
                "near {} far {}",
                camera.near(),
                camera.far()
            );
            assert!(camera.near() >= NEAR_MIN);
            assert!(camera.far() <= FAR_MAX);
        }
    }

    #[test]
    fn test_fovy_and_aspect_are_clamped() {
        let mut camera = Camera::default();
        camera.set_fovy(500.0);
        assert_eq!(camera.fovy(), FOVY_MAX);
        camera.set_fovy(0.0);
        assert_eq!(camera.fovy(), FOVY_MIN);

        camera.set_aspect(2.0);
        camera.set_aspect(0.0);
        camera.resize_projection(800, 0);
        assert_eq!(camera.aspect(), 2.0);
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn test_reset_restores_pose_but_not_projection() {
        let mut camera = Camera::default();
        let initial = camera.pose();
        camera.eye += Vector3::new(1.25, -3.0, 0.7);
        camera.at = Vector3::new(9.0, 9.0, 9.0);
        camera.up = Vector3::new(0.3, 0.9, 0.1).normalize();
        camera.set_fovy(70.0);

        camera.reset_to_initial();
        assert_eq!(camera.pose(), initial);
        assert_eq!(camera.fovy(), 70.0);
    }

    #[test]
    fn test_non_finite_clip_and_fovy_edits_are_ignored() {
        let mut camera = Camera::default();
        camera.set_near(2.0);
        camera.set_far(12.0);
        camera.set_fovy(60.0);

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            camera.set_near(bad);
            camera.set_far(bad);
            camera.set_fovy(bad);
        }
        assert_eq!(camera.near(), 2.0);
        assert_eq!(camera.far(), 12.0);
        assert_eq!(camera.fovy(), 60.0);
    }

    #[test]
    fn test_degenerate_basis_does_not_panic() {
        use crate::gfx::camera::{NavKey, NavigationController};

        // The resulting matrices and positions are unspecified; only the
        // absence of a panic is checked.
        let poses = [
            CameraPose {
                eye: Vector3::new(1.0, 2.0, 3.0),
                at: Vector3::new(1.0, 2.0, 3.0),
                up: Vector3::unit_y(),
            },
            CameraPose {
                eye: Vector3::new(0.0, 5.0, 0.0),
                at: Vector3::new(0.0, 0.0, 0.0),
                up: Vector3::unit_y(),
            },
        ];

        for pose in poses {
            let mut camera = Camera::new(pose, 45.0, 1.0, 0.1, 40.0);
            let _ = camera.view();
            let _ = camera.projection();

            let mut nav = NavigationController::default();
            for key in NavKey::ALL {
                nav.set_key(key, true);
            }
            nav.apply_movement(&mut camera);
            nav.pointer_down(0.0, 0.0);
            nav.pointer_moved(4.0, 3.0, &mut camera);
            let _ = camera.view();
        }
    }
}
