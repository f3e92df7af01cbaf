// sweep.rs — azimuth sweep fans
//
// The sweep from 0° to θ is drawn as two triangle fans hanging off the origin:
// the primary fan covers [0°, min(θ, 180°)], the secondary covers (180°, θ]
// and is only built when θ > 180°. Both rims sit at height r·cos(φ) with
// radius r·sin(φ), so the fan is a slice of the cone swept by the point.

use glam::Vec3;

/// Angular width of one fan segment, in degrees.
pub const SEGMENT_DEGREES: f32 = 10.0;
/// A fan never has fewer segments than this.
pub const MIN_SEGMENTS: usize = 3;
/// Widest single fan (180°) in segments; sizes the pre-allocated buffers.
pub const MAX_SEGMENTS: usize = 18;

pub type Rgba = [f32; 4];

pub const PRIMARY_COLOR: Rgba = [0.0, 1.0, 1.0, 0.35];
pub const SECONDARY_COLOR: Rgba = [0.0, 1.0, 0.0, 0.5];

/// How the last rim vertex of a fan is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanClosure {
    /// The last rim slot repeats the first rim vertex, pulling the fan shut
    /// at its start angle. The final triangle `(0, n, 0)` has zero area.
    #[default]
    DuplicateFirst,
    /// The last rim slot sits on the true end angle of the sweep.
    TrueEnd,
}

/// Vertex/index buffers of one fan. Buffers are cleared and refilled in place.
#[derive(Debug, Clone, Default)]
pub struct SweepMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl SweepMesh {
    pub fn with_capacity(segments: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(segments + 1),
            normals: Vec::with_capacity(segments + 1),
            triangles: Vec::with_capacity(segments),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.triangles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flat `u32` index list as a GPU index buffer wants it.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.triangles.iter().flatten().copied()
    }

    /// Rebuild every vertex normal from the current triangles.
    ///
    /// Face normals are accumulated unnormalised, so larger faces weigh more
    /// and zero-area faces contribute nothing.
    pub fn recalculate_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), Vec3::ZERO);

        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }
}

/// Segments for a fan spanning `sweep_deg`: one per 10°, rounded up, at least 3.
pub fn segment_count(sweep_deg: f32) -> usize {
    let raw = (sweep_deg.max(0.0) / SEGMENT_DEGREES).ceil() as usize;
    raw.max(MIN_SEGMENTS)
}

/// Geometry of one fan, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fan {
    pub cone_radius: f32,
    pub height: f32,
    pub start_deg: f32,
    pub sweep_deg: f32,
}

/// Fill `mesh` with a fan of `segments` triangles.
///
/// Vertex 0 is the apex at the origin, vertices `1..=segments` form the rim.
/// Rim vertex `i + 1` sits at `start + i·(sweep / segments)`; the last rim slot
/// is then replaced according to `closure`. Triangle `i` is
/// `(0, i + 1, (i + 2) mod (segments + 1))`.
pub fn build_fan(mesh: &mut SweepMesh, fan: Fan, segments: usize, closure: FanClosure) {
    mesh.clear();
    if segments == 0 {
        return;
    }

    let step = fan.sweep_deg / segments as f32;
    let rim = |angle_deg: f32| {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Vec3::new(fan.cone_radius * cos, fan.height, fan.cone_radius * sin)
    };

    mesh.vertices.push(Vec3::ZERO);
    for i in 0..segments {
        mesh.vertices.push(rim(fan.start_deg + i as f32 * step));
    }

    mesh.vertices[segments] = match closure {
        FanClosure::DuplicateFirst => mesh.vertices[1],
        FanClosure::TrueEnd => rim(fan.start_deg + fan.sweep_deg),
    };

    let ring = segments as u32 + 1;
    for i in 0..segments as u32 {
        mesh.triangles.push([0, i + 1, (i + 2) % ring]);
    }

    mesh.recalculate_normals();
}

/// Colours for the two fans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPalette {
    pub primary: Rgba,
    pub secondary: Rgba,
}

impl SweepPalette {
    /// The secondary fan only gets its own colour once θ passes 180°.
    pub fn for_theta(theta_deg: f32) -> Self {
        let secondary = if theta_deg > 180.0 {
            SECONDARY_COLOR
        } else {
            PRIMARY_COLOR
        };
        Self {
            primary: PRIMARY_COLOR,
            secondary,
        }
    }
}

/// Both halves of the sweep.
#[derive(Debug, Clone)]
pub struct SweepPair {
    pub primary: SweepMesh,
    pub secondary: SweepMesh,
}

impl SweepPair {
    pub fn new() -> Self {
        Self {
            primary: SweepMesh::with_capacity(MAX_SEGMENTS),
            secondary: SweepMesh::with_capacity(MAX_SEGMENTS),
        }
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.secondary.clear();
    }
}

impl Default for SweepPair {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepMeshBuilder {
    pub closure: FanClosure,
}

impl SweepMeshBuilder {
    pub fn new(closure: FanClosure) -> Self {
        Self { closure }
    }

    /// Rebuild both fans for (r, θ, φ). A non-positive φ leaves both empty.
    pub fn rebuild(&self, r: f32, theta_deg: f32, phi_deg: f32, out: &mut SweepPair) {
        out.clear();
        if phi_deg <= 0.0 {
            return;
        }

        let (sin_phi, cos_phi) = phi_deg.to_radians().sin_cos();
        let cone_radius = r * sin_phi;
        let height = r * cos_phi;

        let primary_sweep = theta_deg.min(180.0);
        build_fan(
            &mut out.primary,
            Fan {
                cone_radius,
                height,
                start_deg: 0.0,
                sweep_deg: primary_sweep,
            },
            segment_count(primary_sweep),
            self.closure,
        );

        if theta_deg > 180.0 {
            let secondary_sweep = theta_deg - 180.0;
            build_fan(
                &mut out.secondary,
                Fan {
                    cone_radius,
                    height,
                    start_deg: 180.0,
                    sweep_deg: secondary_sweep,
                },
                segment_count(secondary_sweep),
                self.closure,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn build(r: f32, theta: f32, phi: f32) -> SweepPair {
        let mut pair = SweepPair::new();
        SweepMeshBuilder::default().rebuild(r, theta, phi, &mut pair);
        pair
    }

    #[test]
    fn segment_policy() {
        assert_eq!(segment_count(0.0), 3);
        assert_eq!(segment_count(20.0), 3);
        assert_eq!(segment_count(30.0), 3);
        assert_eq!(segment_count(31.0), 4);
        assert_eq!(segment_count(45.0), 5);
        assert_eq!(segment_count(180.0), MAX_SEGMENTS);
    }

    #[test]
    fn primary_counts_follow_segments() {
        for theta in [0.0, 10.0, 45.0, 99.9, 135.0, 180.0] {
            let pair = build(1.0, theta, 90.0);
            let segments = segment_count(theta);
            assert_eq!(pair.primary.vertex_count(), segments + 1, "theta={theta}");
            assert_eq!(pair.primary.triangle_count(), segments, "theta={theta}");
            assert_eq!(pair.primary.normals.len(), segments + 1);
            assert!(pair.secondary.is_empty(), "theta={theta}");
        }
    }

    #[test]
    fn forty_five_degrees_gives_five_segments() {
        let pair = build(1.0, 45.0, 90.0);
        assert_eq!(pair.primary.vertex_count(), 6);
        assert_eq!(pair.primary.triangle_count(), 5);
    }

    #[test]
    fn secondary_enforces_minimum_segments() {
        let pair = build(1.0, 200.0, 90.0);
        assert_eq!(pair.primary.triangle_count(), MAX_SEGMENTS);
        assert_eq!(pair.secondary.vertex_count(), 4);
        assert_eq!(pair.secondary.triangle_count(), 3);
    }

    #[test]
    fn secondary_starts_at_half_turn() {
        let pair = build(2.0, 300.0, 90.0);
        let first_rim = pair.secondary.vertices[1];
        assert_abs_diff_eq!(first_rim.x, -2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(first_rim.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn flat_polar_angle_builds_nothing() {
        for theta in [0.0, 90.0, 250.0] {
            let pair = build(3.0, theta, 0.0);
            assert!(pair.primary.is_empty());
            assert!(pair.secondary.is_empty());
            assert_eq!(pair.primary.triangle_count(), 0);
            assert_eq!(pair.secondary.triangle_count(), 0);
        }
    }

    #[test]
    fn rim_sits_on_cone() {
        let pair = build(2.0, 90.0, 60.0);
        let cone_radius = 2.0 * 60f32.to_radians().sin();
        assert_eq!(pair.primary.vertices[0], Vec3::ZERO);
        for v in &pair.primary.vertices[1..] {
            assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-4);
            assert_abs_diff_eq!((v.x * v.x + v.z * v.z).sqrt(), cone_radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn duplicate_closure_repeats_first_rim_vertex() {
        let pair = build(1.0, 90.0, 90.0);
        let n = pair.primary.vertex_count() - 1;
        assert_eq!(pair.primary.vertices[n], pair.primary.vertices[1]);
    }

    #[test]
    fn final_triangle_is_degenerate() {
        let pair = build(1.0, 120.0, 45.0);
        let segments = segment_count(120.0) as u32;
        assert_eq!(pair.primary.triangles.last(), Some(&[0, segments, 0]));
        assert_eq!(pair.primary.triangles[0], [0, 1, 2]);
    }

    #[test]
    fn true_end_closure_reaches_sweep_end() {
        let mut pair = SweepPair::new();
        SweepMeshBuilder::new(FanClosure::TrueEnd).rebuild(1.0, 90.0, 90.0, &mut pair);
        let last = *pair.primary.vertices.last().unwrap();
        assert_abs_diff_eq!(last.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(last.z, 1.0, epsilon = 1e-4);
        assert_eq!(pair.primary.vertex_count(), segment_count(90.0) + 1);
    }

    #[test]
    fn normals_point_along_height_axis_on_equator() {
        let pair = build(1.0, 90.0, 90.0);
        let apex = pair.primary.normals[0];
        assert_abs_diff_eq!(apex.length(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(apex.y.abs(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn rebuild_reuses_buffers() {
        let mut pair = SweepPair::new();
        let builder = SweepMeshBuilder::default();
        builder.rebuild(1.0, 360.0, 90.0, &mut pair);
        let cap = pair.primary.vertices.capacity();
        builder.rebuild(1.0, 30.0, 90.0, &mut pair);
        assert_eq!(pair.primary.vertices.capacity(), cap);
        assert!(pair.secondary.is_empty());
    }

    #[test]
    fn full_turn_secondary_is_at_capacity() {
        let pair = build(1.0, 360.0, 90.0);
        assert_eq!(pair.secondary.vertex_count(), MAX_SEGMENTS + 1);
        assert_eq!(pair.secondary.triangle_count() * 3, MAX_SEGMENTS * 3);
        assert_eq!(pair.primary.vertex_count(), MAX_SEGMENTS + 1);
    }

    #[test]
    fn palette_splits_at_half_turn() {
        assert_eq!(SweepPalette::for_theta(180.0).secondary, PRIMARY_COLOR);
        assert_eq!(SweepPalette::for_theta(180.5).secondary, SECONDARY_COLOR);
        assert_eq!(SweepPalette::for_theta(300.0).primary, PRIMARY_COLOR);
    }

    #[test]
    fn flat_index_list_has_three_per_triangle() {
        let pair = build(1.0, 60.0, 30.0);
        let indices: Vec<u32> = pair.primary.indices().collect();
        assert_eq!(indices.len(), pair.primary.triangle_count() * 3);
    }
}
