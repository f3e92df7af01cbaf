// presenter.rs — what the visualisation hands to whoever draws it

use glam::Vec3;

use crate::coords::{display_cartesian, to_cylindrical, SphericalSample};
use crate::mesh::LineSegment;
use crate::sweep::{SweepMesh, SweepPalette};

/// Two decimals, the way the readout panel shows every number.
///
/// Anything that rounds to zero prints as `0.00`, never `-0.00`.
pub fn fixed2(value: f32) -> String {
    if (value * 100.0).round() == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", value)
}

/// Label strings for one recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub r: String,
    pub theta: String,
    pub phi: String,
    pub x: String,
    pub y: String,
    pub z: String,
    pub rho: String,
    pub cyl_phi: String,
    pub cyl_z: String,
}

impl Readout {
    pub fn new(sample: &SphericalSample, point: Vec3) -> Self {
        let shown = display_cartesian(point);
        let cyl = to_cylindrical(point);

        Self {
            r: format!("R: {}", fixed2(sample.r)),
            theta: format!("θ: {}°", fixed2(sample.theta)),
            phi: format!("ϕ: {}°", fixed2(sample.phi)),
            x: format!("X: {}", fixed2(shown.x)),
            y: format!("Y: {}", fixed2(shown.y)),
            z: format!("Z: {}", fixed2(shown.z)),
            rho: format!("ρ: {}", fixed2(cyl.rho)),
            cyl_phi: format!("ϕ: {}°", fixed2(cyl.phi)),
            cyl_z: format!("z: {}", fixed2(cyl.z)),
        }
    }

    pub fn spherical(&self) -> [&str; 3] {
        [&self.r, &self.theta, &self.phi]
    }

    pub fn cartesian(&self) -> [&str; 3] {
        [&self.x, &self.y, &self.z]
    }

    pub fn cylindrical(&self) -> [&str; 3] {
        [&self.rho, &self.cyl_phi, &self.cyl_z]
    }
}

/// Everything that changes on a recompute.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub point: Vec3,
    /// point↔z-axis foot, point↔shadow, shadow↔origin, origin↔point.
    pub lines: &'a [LineSegment; 4],
    pub primary: &'a SweepMesh,
    pub secondary: &'a SweepMesh,
    pub palette: SweepPalette,
    pub readout: &'a Readout,
}

/// Receiver of visualisation output. The renderer implements this; tests
/// record the calls.
pub trait ScenePresenter {
    /// Idle → Active. Axes and sweep surfaces are created fresh for `generation`.
    fn show_scene(&mut self, generation: u64);

    /// Called once per recompute while Active.
    fn present(&mut self, frame: &Frame<'_>);

    /// Bounding sphere size and material alpha.
    fn update_sphere(&mut self, radius: f32, alpha: f32);

    /// Active → Idle. Everything created by `show_scene` is discarded.
    fn clear_scene(&mut self);
}
