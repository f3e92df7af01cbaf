// mesh.rs — auxiliary scene geometry: UV spheres and the guide line list

use glam::Vec3;

use crate::sweep::Rgba;

pub const SPHERE_LAT: usize = 24;
pub const SPHERE_LON: usize = 48;
pub const MARKER_LAT: usize = 8;
pub const MARKER_LON: usize = 16;
pub const MARKER_RADIUS: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Latitude runs from the +y pole (i = 0) to the -y pole (i = lat).
pub fn build_sphere(center: Vec3, radius: f32, lat: usize, lon: usize) -> SphereMesh {
    let mut positions = Vec::with_capacity((lat + 1) * (lon + 1));
    let mut normals = Vec::with_capacity((lat + 1) * (lon + 1));
    let mut indices = Vec::with_capacity(lat * lon * 6);

    for i in 0..=lat {
        let polar = std::f32::consts::PI * (i as f32) / (lat as f32);
        let (sin_p, cos_p) = polar.sin_cos();

        for j in 0..=lon {
            let azimuth = std::f32::consts::TAU * (j as f32) / (lon as f32);
            let (sin_a, cos_a) = azimuth.sin_cos();

            let n = Vec3::new(sin_p * cos_a, cos_p, sin_p * sin_a);
            positions.push(center + n * radius);
            normals.push(n);
        }
    }

    for i in 0..lat {
        for j in 0..lon {
            let a = (i * (lon + 1) + j) as u32;
            let b = a + (lon + 1) as u32;

            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    SphereMesh {
        positions,
        normals,
        indices,
    }
}

pub const X_AXIS_COLOR: Rgba = [1.0, 0.0, 0.0, 1.0];
pub const Y_AXIS_COLOR: Rgba = [0.0, 1.0, 0.0, 1.0];
pub const Z_AXIS_COLOR: Rgba = [0.0, 0.0, 1.0, 1.0];

pub const Z_AXIS_LINE_COLOR: Rgba = [1.0, 0.92, 0.016, 1.0];
pub const SHADOW_LINE_COLOR: Rgba = [1.0, 0.0, 1.0, 1.0];
pub const ORIGIN_LINE_COLOR: Rgba = [0.0, 1.0, 1.0, 1.0];
pub const POINT_LINE_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Rgba,
}

impl LineSegment {
    pub fn new(start: Vec3, end: Vec3, color: Rgba) -> Self {
        Self { start, end, color }
    }
}

/// The three labelled axes, each running `length` out from the origin.
///
/// Labelled X runs along world -z, labelled Y along world +x and labelled Z
/// along world +y. This matches the relabelled Cartesian readout for Z only.
pub fn axis_lines(length: f32) -> [LineSegment; 3] {
    [
        LineSegment::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -length), X_AXIS_COLOR),
        LineSegment::new(Vec3::ZERO, Vec3::new(length, 0.0, 0.0), Y_AXIS_COLOR),
        LineSegment::new(Vec3::ZERO, Vec3::new(0.0, length, 0.0), Z_AXIS_COLOR),
    ]
}
