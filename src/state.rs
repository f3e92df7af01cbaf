// state.rs — Idle/Active state machine driving recomputation
//
// Nothing here runs on a timer. Every change arrives as an `Event`, and the
// full recompute (point, guide lines, both sweep fans, readout) happens
// synchronously inside `handle` and is pushed to the presenter.

use glam::Vec3;

use crate::config::VisualizerConfig;
use crate::coords::{shadow, z_axis_foot, SphericalSample};
use crate::mesh::{
    LineSegment, ORIGIN_LINE_COLOR, POINT_LINE_COLOR, SHADOW_LINE_COLOR, Z_AXIS_LINE_COLOR,
};
use crate::presenter::{Frame, Readout, ScenePresenter};
use crate::sweep::{SweepMeshBuilder, SweepPair, SweepPalette};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Start,
    Clear,
    RadiusChanged(f32),
    ThetaChanged(f32),
    PhiChanged(f32),
    TransparencyChanged(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
}

/// Slider values, already clamped to their ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inputs {
    pub r: f32,
    pub theta: f32,
    pub phi: f32,
    pub transparency: f32,
}

impl Inputs {
    /// Angular/radial sliders at their minimum, transparency at its maximum.
    pub fn at_rest(config: &VisualizerConfig) -> Self {
        Self {
            r: config.radius.min,
            theta: config.theta.min,
            phi: config.phi.min,
            transparency: config.transparency.max,
        }
    }

    pub fn sample(&self) -> SphericalSample {
        SphericalSample::new(self.r, self.theta, self.phi)
    }
}

/// Geometry owned for one Active period.
#[derive(Debug)]
struct ActiveScene {
    generation: u64,
    point: Vec3,
    lines: [LineSegment; 4],
    sweeps: SweepPair,
    readout: Option<Readout>,
}

impl ActiveScene {
    fn new(generation: u64) -> Self {
        let idle_line = LineSegment::new(Vec3::ZERO, Vec3::ZERO, POINT_LINE_COLOR);
        Self {
            generation,
            point: Vec3::ZERO,
            lines: [idle_line; 4],
            sweeps: SweepPair::new(),
            readout: None,
        }
    }
}

pub struct VisualizationState {
    config: VisualizerConfig,
    builder: SweepMeshBuilder,
    inputs: Inputs,
    scene: Option<ActiveScene>,
    generations: u64,
}

impl VisualizationState {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            builder: SweepMeshBuilder::new(config.fan_closure),
            inputs: Inputs::at_rest(&config),
            config,
            scene: None,
            generations: 0,
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn inputs(&self) -> Inputs {
        self.inputs
    }

    pub fn phase(&self) -> Phase {
        if self.scene.is_some() {
            Phase::Active
        } else {
            Phase::Idle
        }
    }

    /// Generation of the live scene, `None` while Idle.
    pub fn generation(&self) -> Option<u64> {
        self.scene.as_ref().map(|s| s.generation)
    }

    #[cfg(test)]
    pub fn point(&self) -> Option<Vec3> {
        self.scene.as_ref().map(|s| s.point)
    }

    #[cfg(test)]
    pub fn sweeps(&self) -> Option<&SweepPair> {
        self.scene.as_ref().map(|s| &s.sweeps)
    }

    #[cfg(test)]
    pub fn readout(&self) -> Option<&Readout> {
        self.scene.as_ref().and_then(|s| s.readout.as_ref())
    }

    pub fn handle(&mut self, event: Event, presenter: &mut impl ScenePresenter) {
        match event {
            Event::Start => self.start(presenter),
            Event::Clear => self.clear(presenter),
            Event::RadiusChanged(r) => {
                self.inputs.r = self.config.radius.clamp(r);
                if self.scene.is_some() {
                    presenter.update_sphere(self.inputs.r, self.inputs.transparency);
                    self.recompute(presenter);
                }
            }
            Event::ThetaChanged(theta) => {
                self.inputs.theta = self.config.theta.clamp(theta);
                self.recompute(presenter);
            }
            Event::PhiChanged(phi) => {
                self.inputs.phi = self.config.phi.clamp(phi);
                self.recompute(presenter);
            }
            Event::TransparencyChanged(alpha) => {
                self.inputs.transparency = self.config.transparency.clamp(alpha);
                if self.scene.is_some() {
                    presenter.update_sphere(self.inputs.r, self.inputs.transparency);
                }
            }
        }
    }

    fn start(&mut self, presenter: &mut impl ScenePresenter) {
        if self.scene.is_some() {
            log::debug!("start ignored: visualisation already active");
            return;
        }

        self.generations += 1;
        self.scene = Some(ActiveScene::new(self.generations));
        log::info!("visualisation started (generation {})", self.generations);

        presenter.show_scene(self.generations);
        presenter.update_sphere(self.inputs.r, self.inputs.transparency);
        self.recompute(presenter);
    }

    fn clear(&mut self, presenter: &mut impl ScenePresenter) {
        if let Some(scene) = self.scene.take() {
            log::info!("visualisation cleared (generation {})", scene.generation);
        }
        self.inputs = Inputs::at_rest(&self.config);
        presenter.clear_scene();
    }

    /// Full rebuild from the current inputs. No-op while Idle.
    fn recompute(&mut self, presenter: &mut impl ScenePresenter) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        let sample = self.inputs.sample();
        let point = sample.cartesian();
        let ground = shadow(point);

        scene.point = point;
        scene.lines = [
            LineSegment::new(point, z_axis_foot(point), Z_AXIS_LINE_COLOR),
            LineSegment::new(point, ground, SHADOW_LINE_COLOR),
            LineSegment::new(ground, Vec3::ZERO, ORIGIN_LINE_COLOR),
            LineSegment::new(Vec3::ZERO, point, POINT_LINE_COLOR),
        ];
        self.builder
            .rebuild(sample.r, sample.theta, sample.phi, &mut scene.sweeps);
        let readout = scene.readout.insert(Readout::new(&sample, point));

        log::debug!(
            "recompute r={:.2} theta={:.2} phi={:.2} -> ({:.3}, {:.3}, {:.3}), fans {}+{} tris",
            sample.r,
            sample.theta,
            sample.phi,
            point.x,
            point.y,
            point.z,
            scene.sweeps.primary.triangle_count(),
            scene.sweeps.secondary.triangle_count(),
        );

        presenter.present(&Frame {
            point,
            lines: &scene.lines,
            primary: &scene.sweeps.primary,
            secondary: &scene.sweeps.secondary,
            palette: SweepPalette::for_theta(sample.theta),
            readout,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::MAX_SEGMENTS;
    use approx::assert_abs_diff_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Show(u64),
        Present {
            point: Vec3,
            primary_tris: usize,
            secondary_tris: usize,
            readout_x: String,
        },
        Sphere(f32, f32),
        Clear,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn presents(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Present { .. }))
                .count()
        }
    }

    impl ScenePresenter for Recorder {
        fn show_scene(&mut self, generation: u64) {
            self.calls.push(Call::Show(generation));
        }

        fn present(&mut self, frame: &Frame<'_>) {
            assert_eq!(frame.lines[3].end, frame.point);
            self.calls.push(Call::Present {
                point: frame.point,
                primary_tris: frame.primary.triangle_count(),
                secondary_tris: frame.secondary.triangle_count(),
                readout_x: frame.readout.x.clone(),
            });
        }

        fn update_sphere(&mut self, radius: f32, alpha: f32) {
            self.calls.push(Call::Sphere(radius, alpha));
        }

        fn clear_scene(&mut self) {
            self.calls.push(Call::Clear);
        }
    }

    fn started() -> (VisualizationState, Recorder) {
        let mut state = VisualizationState::new(VisualizerConfig::default());
        let mut rec = Recorder::default();
        state.handle(Event::Start, &mut rec);
        (state, rec)
    }

    #[test]
    fn starts_idle_at_rest() {
        let state = VisualizationState::new(VisualizerConfig::default());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            state.inputs(),
            Inputs {
                r: 0.0,
                theta: 0.0,
                phi: 0.0,
                transparency: 0.5
            }
        );
        assert!(state.point().is_none());
        assert!(state.readout().is_none());
    }

    #[test]
    fn idle_input_changes_do_not_recompute() {
        let mut state = VisualizationState::new(VisualizerConfig::default());
        let mut rec = Recorder::default();
        state.handle(Event::RadiusChanged(2.0), &mut rec);
        state.handle(Event::ThetaChanged(45.0), &mut rec);
        state.handle(Event::TransparencyChanged(0.3), &mut rec);
        assert!(rec.calls.is_empty());
        assert_eq!(state.inputs().r, 2.0);
        assert_eq!(state.inputs().transparency, 0.3);
    }

    #[test]
    fn start_shows_scene_and_presents_once() {
        let (state, rec) = started();
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(rec.calls[0], Call::Show(1));
        assert_eq!(rec.calls[1], Call::Sphere(0.0, 0.5));
        assert_eq!(rec.presents(), 1);
    }

    #[test]
    fn every_input_change_recomputes() {
        let (mut state, mut rec) = started();
        state.handle(Event::RadiusChanged(1.0), &mut rec);
        state.handle(Event::PhiChanged(90.0), &mut rec);
        state.handle(Event::ThetaChanged(90.0), &mut rec);
        assert_eq!(rec.presents(), 4);

        let point = state.point().expect("active");
        assert_abs_diff_eq!(point.z, 1.0, epsilon = 1e-4);
        assert_eq!(state.readout().map(|r| r.x.as_str()), Some("X: 0.00"));
    }

    #[test]
    fn radius_change_resizes_sphere() {
        let (mut state, mut rec) = started();
        state.handle(Event::RadiusChanged(3.0), &mut rec);
        assert!(rec.calls.contains(&Call::Sphere(3.0, 0.5)));
    }

    #[test]
    fn transparency_only_touches_sphere() {
        let (mut state, mut rec) = started();
        let before = rec.presents();
        state.handle(Event::TransparencyChanged(0.25), &mut rec);
        assert_eq!(rec.presents(), before);
        assert_eq!(rec.calls.last(), Some(&Call::Sphere(0.0, 0.25)));
    }

    #[test]
    fn inputs_are_clamped_to_slider_ranges() {
        let (mut state, mut rec) = started();
        state.handle(Event::PhiChanged(500.0), &mut rec);
        state.handle(Event::RadiusChanged(-1.0), &mut rec);
        assert_eq!(state.inputs().phi, 180.0);
        assert_eq!(state.inputs().r, 0.0);
    }

    #[test]
    fn sweep_split_follows_theta() {
        let (mut state, mut rec) = started();
        state.handle(Event::RadiusChanged(1.0), &mut rec);
        state.handle(Event::PhiChanged(90.0), &mut rec);
        state.handle(Event::ThetaChanged(200.0), &mut rec);

        let sweeps = state.sweeps().expect("active");
        assert_eq!(sweeps.primary.triangle_count(), 18);
        assert_eq!(sweeps.secondary.triangle_count(), 3);

        state.handle(Event::PhiChanged(0.0), &mut rec);
        let sweeps = state.sweeps().expect("active");
        assert!(sweeps.primary.is_empty());
        assert!(sweeps.secondary.is_empty());
        match rec.calls.last() {
            Some(Call::Present {
                primary_tris,
                secondary_tris,
                ..
            }) => assert_eq!((*primary_tris, *secondary_tris), (0, 0)),
            other => panic!("expected a present call, got {other:?}"),
        }
    }

    #[test]
    fn full_turn_fits_the_sweep_buffers() {
        let (mut state, mut rec) = started();
        state.handle(Event::RadiusChanged(1.0), &mut rec);
        state.handle(Event::PhiChanged(90.0), &mut rec);
        state.handle(Event::ThetaChanged(720.0), &mut rec);

        assert_eq!(state.inputs().theta, 360.0);
        let sweeps = state.sweeps().expect("active");
        assert_eq!(sweeps.primary.vertex_count(), MAX_SEGMENTS + 1);
        assert_eq!(sweeps.secondary.vertex_count(), MAX_SEGMENTS + 1);
        assert_eq!(sweeps.secondary.triangle_count(), MAX_SEGMENTS);
    }

    #[test]
    fn clear_resets_inputs_and_drops_scene() {
        let (mut state, mut rec) = started();
        state.handle(Event::RadiusChanged(4.0), &mut rec);
        state.handle(Event::ThetaChanged(250.0), &mut rec);
        state.handle(Event::PhiChanged(70.0), &mut rec);
        state.handle(Event::TransparencyChanged(0.2), &mut rec);

        state.handle(Event::Clear, &mut rec);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(rec.calls.last(), Some(&Call::Clear));
        assert_eq!(state.inputs(), Inputs::at_rest(state.config()));
        assert!(state.sweeps().is_none());
        assert!(state.generation().is_none());
    }

    #[test]
    fn restart_after_clear_uses_a_fresh_generation() {
        let (mut state, mut rec) = started();
        state.handle(Event::Clear, &mut rec);
        state.handle(Event::Start, &mut rec);
        assert_eq!(state.generation(), Some(2));
        assert!(rec.calls.contains(&Call::Show(2)));
        let shows = rec.calls.iter().filter(|c| matches!(c, Call::Show(_))).count();
        assert_eq!(shows, 2);
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut state, mut rec) = started();
        let calls = rec.calls.len();
        state.handle(Event::Start, &mut rec);
        assert_eq!(rec.calls.len(), calls);
        assert_eq!(state.generation(), Some(1));
    }

    #[test]
    fn clear_while_idle_still_resets() {
        let mut state = VisualizationState::new(VisualizerConfig::default());
        let mut rec = Recorder::default();
        state.handle(Event::ThetaChanged(120.0), &mut rec);
        state.handle(Event::Clear, &mut rec);
        assert_eq!(state.inputs().theta, 0.0);
        assert_eq!(rec.calls, vec![Call::Clear]);
    }
}
