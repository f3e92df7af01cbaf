// coords.rs — spherical / Cartesian / cylindrical conversions
//
// Axis convention (world space, y up):
//   x = r·sin(φ)·cos(θ)
//   y = r·cos(φ)
//   z = r·sin(φ)·sin(θ)
// θ is the azimuth measured in the ground (x-z) plane, φ the polar angle from +y.
// No wraparound normalisation happens here; callers hand in slider-clamped values.

use glam::Vec3;

/// One snapshot of the three slider inputs, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalSample {
    pub r: f32,
    pub theta: f32,
    pub phi: f32,
}

impl SphericalSample {
    pub fn new(r: f32, theta: f32, phi: f32) -> Self {
        Self { r, theta, phi }
    }

    pub fn cartesian(&self) -> Vec3 {
        to_cartesian(self.r, self.theta, self.phi)
    }
}

/// Cylindrical readout. `phi` is in degrees, in (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylindricalSample {
    pub rho: f32,
    pub phi: f32,
    pub z: f32,
}

/// Cartesian triple as it is labelled on screen.
///
/// The on-screen "Y" carries the geometric z and the on-screen "Z" carries the
/// geometric y. Point placement keeps the geometric axes; only the readout is
/// relabelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayCartesian {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub fn to_cartesian(r: f32, theta_deg: f32, phi_deg: f32) -> Vec3 {
    let theta = theta_deg.to_radians();
    let phi = phi_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(r * sin_phi * cos_theta, r * cos_phi, r * sin_phi * sin_theta)
}

/// Projection onto the ground plane (y = 0).
pub fn shadow(p: Vec3) -> Vec3 {
    Vec3::new(p.x, 0.0, p.z)
}

/// Foot of the perpendicular from `p` onto the plane x = 0.
///
/// This is the far end of the "point to z-axis" guide line.
pub fn z_axis_foot(p: Vec3) -> Vec3 {
    Vec3::new(0.0, p.y, p.z)
}

/// ρ is measured in the ground plane, the cylinder axis is the geometric y.
pub fn to_cylindrical(p: Vec3) -> CylindricalSample {
    CylindricalSample {
        rho: (p.x * p.x + p.z * p.z).sqrt(),
        phi: p.z.atan2(p.x).to_degrees(),
        z: p.y,
    }
}

pub fn display_cartesian(p: Vec3) -> DisplayCartesian {
    DisplayCartesian {
        x: p.x,
        y: p.z,
        z: p.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const EPS: f32 = 1e-4;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = EPS);
        assert_abs_diff_eq!(a.y, b.y, epsilon = EPS);
        assert_abs_diff_eq!(a.z, b.z, epsilon = EPS);
    }

    #[test]
    fn north_pole_lies_on_the_vertical_axis() {
        for r in [0.0, 0.5, 1.0, 4.75] {
            for theta in [0.0, 45.0, 180.0, 359.0] {
                assert_vec_eq(to_cartesian(r, theta, 0.0), Vec3::new(0.0, r, 0.0));
            }
        }
    }

    #[test]
    fn zero_radius_collapses_to_origin() {
        for theta in [0.0, 90.0, 271.5] {
            for phi in [0.0, 33.0, 90.0, 180.0] {
                assert_vec_eq(to_cartesian(0.0, theta, phi), Vec3::ZERO);
            }
        }
    }

    #[test]
    fn quarter_turn_on_equator_points_along_z() {
        assert_vec_eq(to_cartesian(1.0, 90.0, 90.0), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn south_pole_points_down() {
        assert_vec_eq(to_cartesian(2.0, 10.0, 180.0), Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn cylindrical_radius_matches_r_sin_phi() {
        for r in [0.0_f32, 1.0, 2.5, 5.0] {
            for theta in (0..360).step_by(15) {
                for phi in (0..=180).step_by(15) {
                    let (theta, phi) = (theta as f32, phi as f32);
                    let cyl = to_cylindrical(to_cartesian(r, theta, phi));
                    assert_abs_diff_eq!(cyl.rho, r * phi.to_radians().sin(), epsilon = EPS);
                }
            }
        }
    }

    #[test]
    fn cylindrical_angle_wraps_into_signed_range() {
        let cyl = to_cylindrical(to_cartesian(1.0, 270.0, 90.0));
        assert_relative_eq!(cyl.phi, -90.0, epsilon = 1e-3);

        let cyl = to_cylindrical(to_cartesian(1.0, 135.0, 60.0));
        assert_relative_eq!(cyl.phi, 135.0, epsilon = 1e-3);
    }

    #[test]
    fn cylindrical_height_is_geometric_y() {
        let p = to_cartesian(3.0, 20.0, 60.0);
        assert_relative_eq!(to_cylindrical(p).z, p.y);
        assert_relative_eq!(to_cylindrical(p).z, 1.5, epsilon = EPS);
    }

    #[test]
    fn shadow_drops_height_only() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(shadow(p), Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(z_axis_foot(p), Vec3::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn display_swaps_y_and_z() {
        let d = display_cartesian(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(d, DisplayCartesian { x: 1.0, y: 3.0, z: 2.0 });
    }

    #[test]
    fn sample_delegates_to_to_cartesian() {
        let s = SphericalSample::new(2.0, 30.0, 45.0);
        assert_eq!(s.cartesian(), to_cartesian(2.0, 30.0, 45.0));
    }
}
