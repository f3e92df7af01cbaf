// camera.rs — orbit camera around the origin

use glam::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = 35.0;
pub const DEFAULT_PITCH: f32 = 25.0;
pub const DEFAULT_DISTANCE: f32 = 12.0;
pub const DEFAULT_FOV: f32 = 46.8;

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 60.0;
const DEGREES_PER_PIXEL: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Degrees around +y.
    pub yaw: f32,
    /// Degrees above the ground plane.
    pub pitch: f32,
    pub distance: f32,
    pub fov: f32,
    pub sensitivity_scale: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            distance: DEFAULT_DISTANCE,
            fov: DEFAULT_FOV,
            sensitivity_scale: 1.0,
        }
    }

    pub fn reset(&mut self) {
        let sensitivity_scale = self.sensitivity_scale;
        *self = Self {
            sensitivity_scale,
            ..Self::new()
        };
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        let k = DEGREES_PER_PIXEL * self.sensitivity_scale;
        self.yaw = (self.yaw - dx * k).rem_euclid(360.0);
        self.pitch = (self.pitch + dy * k).clamp(-89.0, 89.0);
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * 0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_y, cos_y) = self.yaw.to_radians().sin_cos();
        let (sin_p, cos_p) = self.pitch.to_radians().sin_cos();
        Vec3::new(cos_p * cos_y, sin_p, cos_p * sin_y) * self.distance
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov.to_radians(), aspect.max(1e-3), 0.1, 200.0);
        proj * view
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
