//! The animated particle field.
//!
//! [`ParticleField`] owns the particles, the drawing surface and a small loop
//! state machine:
//!
//! ```text
//!            step (visible)                 frame fires
//!   Idle ───────────────────▶ Running ─────────────────▶ Scheduled
//!    ▲  ◀─── step (hidden) ──────┘  ◀──── step ────────────┘
//!    └─────────── set_visible(true) restarts from Idle
//! ```
//!
//! Leaving the viewport cancels the loop rather than pausing it: the next
//! step sees `visible == false`, draws nothing and schedules nothing, so
//! no callback remains pending. Re-entering the viewport must restart it.

use crate::config::FieldConfig;
use crate::connection::connections;
use crate::error::FieldError;
use crate::geometry::{Size, SurfaceGeometry};
use crate::host::{ContainerMetrics, FrameHandle, FrameScheduler, Host};
use crate::particle::Particle;
use crate::prng::Xorshift64;
use crate::surface::DrawSurface;
use glam::DVec2;
use tracing::{debug, trace, warn};

/// Whether a frame is scheduled, executing, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Scheduled(FrameHandle),
    Running,
}

/// Result of one [`ParticleField::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The frame was drawn and the next one requested.
    Drawn { connections: usize },
    /// The surface is off-screen; the loop is now idle.
    Suspended,
}

/// Mutable state of the field, replaced wholesale on resize.
#[derive(Debug, Clone)]
pub struct FieldState {
    particles: Vec<Particle>,
    bounds: Size,
    visible: bool,
    loop_state: LoopState,
}

impl FieldState {
    fn generate(
        rng: &mut Xorshift64,
        bounds: Size,
        config: &FieldConfig,
        visible: bool,
        loop_state: LoopState,
    ) -> Self {
        let particles = (0..config.particle_count)
            .map(|_| Particle::random(rng, bounds, config))
            .collect();
        Self {
            particles,
            bounds,
            visible,
            loop_state,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True while a frame is scheduled or executing.
    pub fn is_running(&self) -> bool {
        !matches!(self.loop_state, LoopState::Idle)
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }
}

/// The decorative particle animation behind the hero section.
pub struct ParticleField<S> {
    surface: S,
    config: FieldConfig,
    rng: Xorshift64,
    geometry: SurfaceGeometry,
    state: FieldState,
    frames_drawn: u64,
}

impl<S: DrawSurface> ParticleField<S> {
    /// Sizes the surface, creates the particles, subscribes to resize and
    /// visibility, and draws the first frame (which schedules the second).
    ///
    /// Returns `Ok(None)` without touching the surface or the host's
    /// scheduler when the viewer prefers reduced motion. The surface starts
    /// out visible; the host corrects that through [`Self::set_visible`] once
    /// its visibility source reports.
    pub fn initialize<H: Host + ?Sized>(
        surface: S,
        host: &mut H,
        config: FieldConfig,
        rng: Xorshift64,
    ) -> Result<Option<Self>, FieldError> {
        config.validate()?;
        if host.prefers_reduced_motion() {
            debug!("reduced motion preferred, particle field disabled");
            return Ok(None);
        }

        let geometry = SurfaceGeometry::fit(Size::default(), 1.0, config.max_pixel_ratio);
        let mut field = Self {
            surface,
            config,
            rng,
            geometry,
            state: FieldState {
                particles: Vec::new(),
                bounds: Size::default(),
                visible: true,
                loop_state: LoopState::Idle,
            },
            frames_drawn: 0,
        };
        field.resize(&*host);
        field.run_frame(host);

        host.watch_resize(field.config.resize_quiet());
        host.watch_visibility();
        debug!(
            particles = field.state.particles.len(),
            width = field.state.bounds.width,
            height = field.state.bounds.height,
            pixel_ratio = field.geometry.pixel_ratio,
            "particle field initialized"
        );
        Ok(Some(field))
    }

    /// Re-measures the container, reconfigures the surface and regenerates
    /// every particle inside the new bounds.
    ///
    /// Visibility and the loop state carry over; nothing is scheduled.
    pub fn resize<H: ContainerMetrics + ?Sized>(&mut self, host: &H) {
        let logical = host.container_size();
        self.geometry = SurfaceGeometry::fit(
            logical,
            host.device_pixel_ratio(),
            self.config.max_pixel_ratio,
        );
        self.surface.configure(self.geometry);
        self.state = FieldState::generate(
            &mut self.rng,
            logical,
            &self.config,
            self.state.visible,
            self.state.loop_state,
        );
        debug!(
            width = logical.width,
            height = logical.height,
            backing_width = self.geometry.backing_width,
            backing_height = self.geometry.backing_height,
            "particle field resized"
        );
    }

    /// Runs one animation frame; called by the host when a scheduled frame fires.
    pub fn step<H: FrameScheduler + ?Sized>(&mut self, host: &mut H) -> StepOutcome {
        self.run_frame(host)
    }

    /// Records a visibility transition from the host.
    ///
    /// Becoming visible while the loop is idle draws a frame immediately,
    /// which schedules exactly one follow-up. If a frame is still pending it
    /// simply continues.
    pub fn set_visible<H: FrameScheduler + ?Sized>(&mut self, visible: bool, host: &mut H) {
        let was_visible = self.state.visible;
        self.state.visible = visible;
        if visible == was_visible {
            return;
        }
        debug!(visible, "particle field visibility changed");
        if visible {
            self.restart(host);
        }
    }

    /// Restarts a cancelled loop. Returns `false` if the field is hidden or
    /// a frame is already scheduled.
    pub fn restart<H: FrameScheduler + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.state.visible || self.state.is_running() {
            return false;
        }
        self.run_frame(host);
        true
    }

    /// Cancels any pending frame and hands the surface back.
    pub fn shutdown<H: FrameScheduler + ?Sized>(mut self, host: &mut H) -> S {
        if let LoopState::Scheduled(handle) = self.state.loop_state {
            host.cancel_frame(handle);
        }
        self.state.loop_state = LoopState::Idle;
        debug!(frames = self.frames_drawn, "particle field shut down");
        self.surface
    }

    fn run_frame<H: FrameScheduler + ?Sized>(&mut self, host: &mut H) -> StepOutcome {
        if !self.state.visible {
            self.state.loop_state = LoopState::Idle;
            trace!("surface hidden, animation loop suspended");
            return StepOutcome::Suspended;
        }
        self.state.loop_state = LoopState::Running;

        let bounds = self.state.bounds;
        self.surface.clear(bounds.width, bounds.height);

        for particle in &mut self.state.particles {
            particle.advance(bounds);
        }

        let color = self.config.color;
        for particle in &self.state.particles {
            self.surface.fill_circle(
                particle.position,
                particle.radius(),
                color.with_alpha(particle.opacity()),
            );
        }

        let mut drawn = 0;
        for line in connections(
            &self.state.particles,
            self.config.connection_distance,
            self.config.max_line_opacity,
        ) {
            self.surface.stroke_line(
                line.from,
                line.to,
                self.config.line_width,
                color.with_alpha(line.alpha),
            );
            drawn += 1;
        }

        self.frames_drawn += 1;
        self.state.loop_state = match host.schedule_frame() {
            Some(handle) => LoopState::Scheduled(handle),
            None => {
                warn!("host refused a frame request, animation loop idle");
                LoopState::Idle
            }
        };
        trace!(frame = self.frames_drawn, connections = drawn, "frame drawn");
        StepOutcome::Drawn { connections: drawn }
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn particles(&self) -> &[Particle] {
        self.state.particles()
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Centroid of all particles, or `None` for an empty field.
    pub fn centroid(&self) -> Option<DVec2> {
        let n = self.state.particles.len();
        (n > 0).then(|| {
            self.state
                .particles
                .iter()
                .map(|p| p.position)
                .sum::<DVec2>()
                / n as f64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TEAL;
    use crate::host::HeadlessHost;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn host_800x600() -> HeadlessHost {
        HeadlessHost::new(Size::new(800.0, 600.0))
    }

    fn init<'a>(
        surface: &'a mut RecordingSurface,
        host: &mut HeadlessHost,
    ) -> ParticleField<&'a mut RecordingSurface> {
        ParticleField::initialize(surface, host, FieldConfig::default(), Xorshift64::new(42))
            .unwrap()
            .expect("motion allowed")
    }

    /// Fires the pending frame the way a browser would.
    fn fire(field: &mut ParticleField<&mut RecordingSurface>, host: &mut HeadlessHost) -> StepOutcome {
        host.take_pending().expect("a frame should be pending");
        field.step(host)
    }

    #[test]
    fn initialize_800x600_creates_40_particles_in_bounds() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let field = init(&mut surface, &mut host);
        assert_eq!(field.particles().len(), 40);
        let bounds = field.state().bounds();
        assert!(field.particles().iter().all(|p| p.is_within(bounds)));
        assert_eq!(bounds, Size::new(800.0, 600.0));
    }

    #[test]
    fn refused_frame_request_leaves_loop_idle_and_restartable() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        host.set_refuse_frames(true);
        let mut field = init(&mut surface, &mut host);
        assert_eq!(field.frames_drawn(), 1);
        assert_eq!(field.state().loop_state(), LoopState::Idle);
        assert!(!field.is_running());
        assert_eq!(host.pending_frame(), None);

        host.set_refuse_frames(false);
        assert!(field.restart(&mut host));
        assert!(field.is_running());
        assert!(host.pending_frame().is_some());
    }

    #[test]
    fn initialize_draws_first_frame_and_schedules_one() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let field = init(&mut surface, &mut host);
        assert_eq!(host.scheduled_count(), 1);
        assert!(host.pending_frame().is_some());
        assert!(field.is_running());
        assert_eq!(field.frames_drawn(), 1);
    }

    #[test]
    fn initialize_subscribes_to_resize_and_visibility() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let _field = init(&mut surface, &mut host);
        assert!(host.is_watching_visibility());
        assert_eq!(
            host.resize_quiet(),
            Some(std::time::Duration::from_millis(200))
        );
    }

    #[test]
    fn reduced_motion_disables_everything() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600().with_reduced_motion(true);
        let field = ParticleField::initialize(
            &mut surface,
            &mut host,
            FieldConfig::default(),
            Xorshift64::new(1),
        )
        .unwrap();
        assert!(field.is_none());
        assert!(surface.is_untouched());
        assert_eq!(host.scheduled_count(), 0);
        assert!(!host.is_watching_visibility());
        assert_eq!(host.resize_quiet(), None);
    }

    #[test]
    fn invalid_config_is_rejected_before_any_side_effect() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let config = FieldConfig {
            particle_count: 0,
            ..FieldConfig::default()
        };
        let result = ParticleField::initialize(&mut surface, &mut host, config, Xorshift64::new(1));
        assert!(matches!(result, Err(FieldError::InvalidConfig(_))));
        assert!(surface.is_untouched());
        assert_eq!(host.scheduled_count(), 0);
    }

    #[test]
    fn visible_step_schedules_exactly_one_frame() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        let before = host.scheduled_count();
        let outcome = fire(&mut field, &mut host);
        assert!(matches!(outcome, StepOutcome::Drawn { .. }));
        assert_eq!(host.scheduled_count(), before + 1);
        assert!(matches!(
            field.state().loop_state(),
            LoopState::Scheduled(_)
        ));
    }

    #[test]
    fn visible_frame_clears_then_draws_every_particle_and_line() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        field.surface_mut().take();

        let outcome = fire(&mut field, &mut host);
        let StepOutcome::Drawn { connections } = outcome else {
            panic!("expected a drawn frame, got {outcome:?}");
        };
        let surface = field.surface();
        assert_eq!(
            surface.commands()[0],
            DrawCommand::Clear {
                width: 800.0,
                height: 600.0
            }
        );
        assert_eq!(surface.circle_count(), 40);
        assert_eq!(surface.line_count(), connections);
    }

    #[test]
    fn circles_use_particle_opacity_and_radius() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        field.surface_mut().take();
        fire(&mut field, &mut host);

        let particles = field.particles().to_vec();
        let circles: Vec<_> = field
            .surface()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect();
        for (p, (center, radius, color)) in particles.iter().zip(circles) {
            assert_eq!(center, p.position);
            assert_eq!(radius, p.radius());
            assert_eq!(color, TEAL.with_alpha(p.opacity()));
        }
    }

    #[test]
    fn lines_are_thin_and_below_max_opacity() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        for _ in 0..20 {
            fire(&mut field, &mut host);
        }
        for cmd in field.surface().commands() {
            if let DrawCommand::Line { width, color, .. } = cmd {
                assert!((width - 0.5).abs() < f64::EPSILON);
                assert!(color.alpha > 0.0 && color.alpha <= 0.12);
                assert_eq!(color.rgb, TEAL);
            }
        }
    }

    #[test]
    fn hidden_step_draws_nothing_and_schedules_nothing() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        field.set_visible(false, &mut host);
        field.surface_mut().take();
        let scheduled = host.scheduled_count();

        let outcome = fire(&mut field, &mut host);
        assert_eq!(outcome, StepOutcome::Suspended);
        assert!(field.surface().is_untouched());
        assert_eq!(host.scheduled_count(), scheduled);
        assert_eq!(host.pending_frame(), None);
        assert!(!field.is_running());
        assert_eq!(field.state().loop_state(), LoopState::Idle);
    }

    #[test]
    fn becoming_visible_again_restarts_with_one_frame() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        field.set_visible(false, &mut host);
        fire(&mut field, &mut host);
        let scheduled = host.scheduled_count();

        field.set_visible(true, &mut host);
        assert_eq!(host.scheduled_count(), scheduled + 1);
        assert!(host.pending_frame().is_some());
        assert!(field.is_running());
    }

    #[test]
    fn visibility_flicker_while_frame_pending_does_not_double_schedule() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        let scheduled = host.scheduled_count();

        field.set_visible(false, &mut host);
        field.set_visible(true, &mut host);
        assert_eq!(host.scheduled_count(), scheduled);

        assert!(matches!(fire(&mut field, &mut host), StepOutcome::Drawn { .. }));
        assert_eq!(host.scheduled_count(), scheduled + 1);
    }

    #[test]
    fn repeated_visible_notifications_are_ignored() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        let scheduled = host.scheduled_count();
        field.set_visible(true, &mut host);
        field.set_visible(true, &mut host);
        assert_eq!(host.scheduled_count(), scheduled);
    }

    #[test]
    fn restart_refuses_when_hidden_or_already_running() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        assert!(!field.restart(&mut host), "already scheduled");
        field.set_visible(false, &mut host);
        fire(&mut field, &mut host);
        assert!(!field.restart(&mut host), "hidden");
    }

    #[test]
    fn resize_regenerates_configured_count_in_new_bounds() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        let before = field.particles().to_vec();

        host.set_container_size(Size::new(320.0, 200.0));
        field.resize(&host);

        let bounds = Size::new(320.0, 200.0);
        assert_eq!(field.particles().len(), 40);
        assert_eq!(field.state().bounds(), bounds);
        assert!(field.particles().iter().all(|p| p.is_within(bounds)));
        assert_ne!(field.particles(), &before[..]);
    }

    #[test]
    fn resize_does_not_touch_loop_or_schedule() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let mut field = init(&mut surface, &mut host);
        let state = field.state().loop_state();
        let scheduled = host.scheduled_count();
        field.resize(&host);
        assert_eq!(field.state().loop_state(), state);
        assert_eq!(host.scheduled_count(), scheduled);
    }

    #[test]
    fn resize_reconfigures_surface_with_capped_ratio() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600().with_pixel_ratio(3.0);
        let mut field = init(&mut surface, &mut host);
        field.surface_mut().take();
        field.resize(&host);

        let DrawCommand::Configure(g) = field.surface().commands()[0] else {
            panic!("resize should configure the surface first");
        };
        assert!((g.pixel_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!((g.backing_width, g.backing_height), (1600, 1200));
    }

    #[test]
    fn resize_with_custom_count_keeps_that_count() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let config = FieldConfig {
            particle_count: 7,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::initialize(&mut surface, &mut host, config, Xorshift64::new(3))
            .unwrap()
            .unwrap();
        for size in [Size::new(100.0, 100.0), Size::new(1920.0, 1080.0)] {
            host.set_container_size(size);
            field.resize(&host);
            assert_eq!(field.particles().len(), 7);
        }
    }

    #[test]
    fn shutdown_cancels_pending_frame() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let field = init(&mut surface, &mut host);
        field.shutdown(&mut host);
        assert_eq!(host.pending_frame(), None);
        assert_eq!(host.cancelled_count(), 1);
    }

    #[test]
    fn same_seed_same_animation() {
        let run = |seed| {
            let mut surface = RecordingSurface::new();
            let mut host = host_800x600();
            let mut field = ParticleField::initialize(
                &mut surface,
                &mut host,
                FieldConfig::default(),
                Xorshift64::new(seed),
            )
            .unwrap()
            .unwrap();
            for _ in 0..30 {
                host.take_pending();
                field.step(&mut host);
            }
            field.particles().to_vec()
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn centroid_of_field_lies_inside_bounds() {
        let mut surface = RecordingSurface::new();
        let mut host = host_800x600();
        let field = init(&mut surface, &mut host);
        let c = field.centroid().unwrap();
        assert!((0.0..800.0).contains(&c.x) && (0.0..600.0).contains(&c.y));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn particles_never_leave_bounds(
                seed: u64,
                w in 1.0_f64..1_500.0,
                h in 1.0_f64..1_500.0,
                frames in 0_usize..200,
            ) {
                let mut host = HeadlessHost::new(Size::new(w, h));
                let mut field = ParticleField::initialize(
                    RecordingSurface::new(),
                    &mut host,
                    FieldConfig { particle_count: 12, speed: 3.0, ..FieldConfig::default() },
                    Xorshift64::new(seed),
                )
                .unwrap()
                .unwrap();
                for _ in 0..frames {
                    host.take_pending();
                    field.step(&mut host);
                    field.surface_mut().take();
                }
                let bounds = field.state().bounds();
                for p in field.particles() {
                    prop_assert!(p.is_within(bounds), "{:?} outside {w}x{h}", p.position);
                }
            }

            #[test]
            fn particle_count_survives_any_resize(
                seed: u64,
                count in 1_usize..60,
                sizes in proptest::collection::vec((0.0_f64..3_000.0, 0.0_f64..3_000.0), 1..5),
            ) {
                let mut host = HeadlessHost::new(Size::new(640.0, 480.0));
                let mut field = ParticleField::initialize(
                    RecordingSurface::new(),
                    &mut host,
                    FieldConfig { particle_count: count, ..FieldConfig::default() },
                    Xorshift64::new(seed),
                )
                .unwrap()
                .unwrap();
                for (w, h) in sizes {
                    host.set_container_size(Size::new(w, h));
                    field.resize(&host);
                    prop_assert_eq!(field.particles().len(), count);
                }
            }
        }
    }
}
