use super::camera_utils::{Camera, CameraUniform};
use crate::gfx::picking::AABB;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: cgmath::Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Creates a camera at `eye` looking at `target`, deriving the orbit angles
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let (distance, pitch, yaw) = spherical_from_offset(eye - target);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn set_bounds(&mut self, bounds: OrbitCameraBounds) {
        self.bounds = bounds;
        self.set_distance(self.distance);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.clamp(min_yaw, f32::MAX);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.clamp(f32::MIN, max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        self.target += right * delta.0 * pan_scale + up * delta.1 * pan_scale;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    ///
    /// The target and the eye are kept inside their clamp boxes; clamping the
    /// eye re-derives the orbit angles so the next update starts from there.
    fn update(&mut self) {
        if let Some(target_box) = self.bounds.target_box {
            self.target = clamp_to_box(self.target, &target_box);
        }

        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);

        if let Some(eye_box) = self.bounds.eye_box {
            let clamped = clamp_to_box(self.eye, &eye_box);
            if clamped != self.eye {
                self.eye = clamped;
                let (distance, pitch, yaw) = spherical_from_offset(self.eye - self.target);
                self.distance = distance;
                self.pitch = pitch;
                self.yaw = yaw;
            }
        }
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        let view_proj = self.build_view_projection_matrix();
        self.uniform.set(self.eye, view_proj);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
    /// Box the orbit target may not leave
    pub target_box: Option<AABB>,
    /// Box the eye may not leave
    pub eye_box: Option<AABB>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(6.0),
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::PI / 2.0 + 0.001,
            max_pitch: std::f32::consts::PI / 2.0 - 0.001,
            min_yaw: None,
            max_yaw: None,
            target_box: None,
            eye_box: None,
        }
    }
}

fn clamp_to_box(point: Vector3<f32>, aabb: &AABB) -> Vector3<f32> {
    Vector3::new(
        point.x.clamp(aabb.min.x, aabb.max.x),
        point.y.clamp(aabb.min.y, aabb.max.y),
        point.z.clamp(aabb.min.z, aabb.max.z),
    )
}

/// Inverse of `calculate_cartesian_eye_position`: (distance, pitch, yaw)
fn spherical_from_offset(offset: Vector3<f32>) -> (f32, f32, f32) {
    let distance = offset.magnitude();
    if distance <= f32::EPSILON {
        return (f32::EPSILON, 0.0, 0.0);
    }
    let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let yaw = offset.x.atan2(offset.z);
    (distance, pitch, yaw)
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}
