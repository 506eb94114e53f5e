use std::collections::HashSet;

use cgmath::{InnerSpace, Matrix3, Rad, Vector3, Zero};
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::look_at_camera::Camera;

pub const MOVE_SPEED: f32 = 0.1;
pub const DRAG_SENSITIVITY: f32 = 2.0;

/// Held-key movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Rise,
    Sink,
}

impl NavKey {
    pub const ALL: [NavKey; 6] = [
        NavKey::Forward,
        NavKey::Back,
        NavKey::StrafeLeft,
        NavKey::StrafeRight,
        NavKey::Rise,
        NavKey::Sink,
    ];
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Nav(NavKey),
    Reset,
}

impl ViewerKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Self::Nav(NavKey::Forward)),
            KeyCode::KeyS => Some(Self::Nav(NavKey::Back)),
            KeyCode::KeyA => Some(Self::Nav(NavKey::StrafeLeft)),
            KeyCode::KeyD => Some(Self::Nav(NavKey::StrafeRight)),
            KeyCode::ArrowUp => Some(Self::Nav(NavKey::Rise)),
            KeyCode::ArrowDown => Some(Self::Nav(NavKey::Sink)),
            KeyCode::KeyR => Some(Self::Reset),
            _ => None,
        }
    }

    /// Maps a winit key event to a viewer key and whether it is held down.
    pub fn from_event(event: &KeyEvent) -> Option<(Self, bool)> {
        match event.physical_key {
            PhysicalKey::Code(code) => {
                Self::from_key_code(code).map(|key| (key, event.state == ElementState::Pressed))
            }
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

/// Fly-style camera navigation.
///
/// Held keys translate eye and at together once per tick. Dragging the
/// pointer orbits the eye around `at`: a pitch about the camera's right axis
/// followed by a yaw about world up.
#[derive(Debug, Clone)]
pub struct NavigationController {
    pub move_speed: f32,
    pub drag_sensitivity: f32,
    held: HashSet<NavKey>,
    dragging: bool,
    last_pointer: (f32, f32),
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(MOVE_SPEED, DRAG_SENSITIVITY)
    }
}

impl NavigationController {
    pub fn new(move_speed: f32, drag_sensitivity: f32) -> Self {
        Self {
            move_speed,
            drag_sensitivity,
            held: HashSet::new(),
            dragging: false,
            last_pointer: (0.0, 0.0),
        }
    }

    pub fn set_key(&mut self, key: NavKey, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: NavKey) -> bool {
        self.held.contains(&key)
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Translates eye and at by the held-key movement vector.
    pub fn apply_movement(&self, camera: &mut Camera) {
        if self.held.is_empty() {
            return;
        }

        let forward = (camera.at - camera.eye).normalize();
        let right = forward.cross(camera.up).normalize();
        let world_up = Vector3::unit_y();

        let mut step = Vector3::zero();
        for key in NavKey::ALL.iter().filter(|key| self.held.contains(key)) {
            step += match key {
                NavKey::Forward => forward,
                NavKey::Back => -forward,
                NavKey::StrafeLeft => -right,
                NavKey::StrafeRight => right,
                NavKey::Rise => world_up,
                NavKey::Sink => -world_up,
            } * self.move_speed;
        }

        if step.magnitude2() > 0.0 {
            camera.eye += step;
            camera.at += step;
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_pointer = (x, y);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn pointer_left(&mut self) {
        self.dragging = false;
    }

    /// Rotates the camera by the pointer delta while a drag is active.
    pub fn pointer_moved(&mut self, x: f32, y: f32, camera: &mut Camera) {
        if !self.dragging {
            return;
        }

        let dx = (x - self.last_pointer.0) * self.drag_sensitivity;
        let dy = (y - self.last_pointer.1) * self.drag_sensitivity;
        self.last_pointer = (x, y);

        if dx != 0.0 || dy != 0.0 {
            rotate_about_target(camera, dx.to_radians(), dy.to_radians());
        }
    }
}

/// Applies pitch about the camera's right axis, then yaw about world up, to
/// the eye offset and the up vector.
pub fn rotate_about_target(camera: &mut Camera, yaw: f32, pitch: f32) {
    let forward = (camera.at - camera.eye).normalize();
    let right = forward.cross(camera.up).normalize();

    let pitch_rotation = Matrix3::from_axis_angle(right, Rad(pitch));
    let yaw_rotation = Matrix3::from_axis_angle(Vector3::unit_y(), Rad(yaw));

    let offset = yaw_rotation * (pitch_rotation * (camera.eye - camera.at));
    camera.eye = camera.at + offset;

    let up = yaw_rotation * (pitch_rotation * camera.up);
    camera.up = up.normalize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_idle_tick_leaves_camera_unchanged() {
        let nav = NavigationController::default();
        let mut camera = Camera::default();
        let before = camera.pose();
        nav.apply_movement(&mut camera);
        assert_eq!(camera.pose(), before);
    }

    #[test]
    fn test_forward_moves_eye_and_at_together() {
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        let before = camera.pose();
        let direction = (before.at - before.eye).normalize();

        nav.set_key(NavKey::Forward, true);
        nav.apply_movement(&mut camera);

        assert!(close(camera.eye, before.eye + direction * 0.1));
        assert!(close(camera.at, before.at + direction * 0.1));
        assert!(close(camera.at - camera.eye, before.at - before.eye));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        let before = camera.pose();

        nav.set_key(NavKey::Rise, true);
        nav.set_key(NavKey::Sink, true);
        nav.apply_movement(&mut camera);
        assert!(close(camera.eye, before.eye));

        nav.set_key(NavKey::Sink, false);
        nav.apply_movement(&mut camera);
        assert!(close(camera.eye, before.eye + Vector3::unit_y() * 0.1));
    }

    #[test]
    fn test_strafe_follows_right_axis() {
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        nav.set_key(NavKey::StrafeRight, true);
        nav.apply_movement(&mut camera);
        // Looking down -z with +y up, right is +x.
        assert!(camera.eye.x > 0.0);
        assert!((camera.eye.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_drag_is_a_no_op() {
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        let before = camera.pose();
        nav.pointer_down(100.0, 100.0);
        nav.pointer_moved(100.0, 100.0, &mut camera);
        assert_eq!(camera.pose(), before);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        let before = camera.pose();
        nav.pointer_moved(40.0, -10.0, &mut camera);
        nav.pointer_down(0.0, 0.0);
        assert!(nav.is_dragging());
        nav.pointer_left();
        assert!(!nav.is_dragging());
        nav.pointer_moved(40.0, -10.0, &mut camera);
        assert_eq!(camera.pose(), before);
    }

    #[test]
    fn test_horizontal_drag_yaws_around_target() {
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        nav.pointer_down(0.0, 0.0);
        // 45 px * sensitivity 2 = 90 degrees of yaw.
        nav.pointer_moved(45.0, 0.0, &mut camera);

        assert!(close(camera.at, Vector3::new(0.0, 0.0, 0.0)));
        assert!(close(camera.eye, Vector3::new(8.0, 3.0, 0.0)));
        assert!(close(camera.up, Vector3::unit_y()));
    }

    #[test]
    fn test_drag_preserves_distance_and_unit_up() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut nav = NavigationController::default();
        let mut camera = Camera::default();
        let distance = (camera.eye - camera.at).magnitude();

        let (mut x, mut y) = (0.0f32, 0.0f32);
        nav.pointer_down(x, y);
        for _ in 0..200 {
            x += rng.random_range(-4.0..4.0);
            y += rng.random_range(-4.0..4.0);
            nav.pointer_moved(x, y, &mut camera);
            assert!(((camera.eye - camera.at).magnitude() - distance).abs() < 1e-3);
            assert!((camera.up.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pitch_is_applied_before_yaw() {
        let mut camera = Camera::default();
        let (yaw, pitch) = (0.6f32, 0.4f32);

        let start = camera.pose();
        let forward = (start.at - start.eye).normalize();
        let right = forward.cross(start.up).normalize();
        let pitched = Matrix3::from_axis_angle(right, Rad(pitch)) * (start.eye - start.at);
        let expected = Matrix3::from_axis_angle(Vector3::unit_y(), Rad(yaw)) * pitched;

        rotate_about_target(&mut camera, yaw, pitch);
        assert!(close(camera.eye - camera.at, expected));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            ViewerKey::from_key_code(KeyCode::KeyW),
            Some(ViewerKey::Nav(NavKey::Forward))
        );
        assert_eq!(
            ViewerKey::from_key_code(KeyCode::ArrowDown),
            Some(ViewerKey::Nav(NavKey::Sink))
        );
        assert_eq!(ViewerKey::from_key_code(KeyCode::KeyR), Some(ViewerKey::Reset));
        assert_eq!(ViewerKey::from_key_code(KeyCode::KeyQ), None);
    }
}
