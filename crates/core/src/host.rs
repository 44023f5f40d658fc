//! Host-environment collaborators the particle field depends on.
//!
//! In a browser these are `matchMedia`, `getBoundingClientRect`,
//! `requestAnimationFrame`, an `IntersectionObserver` and a window `resize`
//! listener. Each concern is its own trait so a test can substitute any one
//! of them; [`Host`] bundles them for call sites that need everything.
//!
//! Subscriptions are one-way: the host only learns that the field wants
//! visibility or resize notifications, and later delivers them by calling
//! [`ParticleField::set_visible`](crate::field::ParticleField::set_visible) and
//! [`ParticleField::resize`](crate::field::ParticleField::resize).

use crate::geometry::Size;
use std::time::Duration;

/// Opaque id of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The viewer's reduced-motion preference.
pub trait MotionPreference {
    fn prefers_reduced_motion(&self) -> bool;
}

/// Measurement of the surface's parent container.
pub trait ContainerMetrics {
    /// Current container size in logical units.
    fn container_size(&self) -> Size;

    /// Physical pixels per logical unit, before any cap is applied.
    fn device_pixel_ratio(&self) -> f64;
}

/// The host's frame-scheduling primitive.
pub trait FrameScheduler {
    /// Requests one callback at the host's next frame. The host answers by
    /// calling [`ParticleField::step`](crate::field::ParticleField::step).
    ///
    /// Returns `None` when the request could not be made; no callback will
    /// arrive.
    fn schedule_frame(&mut self) -> Option<FrameHandle>;

    /// Withdraws a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Source of on-screen / off-screen transitions for the surface.
pub trait VisibilitySource {
    fn watch_visibility(&mut self);
}

/// Source of container resize notifications.
pub trait ResizeSource {
    /// Registers interest; notifications are coalesced until `quiet` passes
    /// without a new one.
    fn watch_resize(&mut self, quiet: Duration);
}

/// Everything [`ParticleField`](crate::field::ParticleField) needs from its host.
pub trait Host:
    MotionPreference + ContainerMetrics + FrameScheduler + VisibilitySource + ResizeSource
{
}

impl<T> Host for T where
    T: MotionPreference + ContainerMetrics + FrameScheduler + VisibilitySource + ResizeSource
{
}

/// In-memory host for tests and the CLI.
///
/// Frames are never fired on their own: the driver calls
/// [`HeadlessHost::take_pending`] and then steps the field.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    container: Size,
    pixel_ratio: f64,
    reduced_motion: bool,
    next_handle: u64,
    pending: Option<FrameHandle>,
    scheduled_total: usize,
    cancelled_total: usize,
    visibility_watchers: usize,
    resize_quiet: Option<Duration>,
    refuse_frames: bool,
}

impl HeadlessHost {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            pixel_ratio: 1.0,
            reduced_motion: false,
            next_handle: 1,
            pending: None,
            scheduled_total: 0,
            cancelled_total: 0,
            visibility_watchers: 0,
            resize_quiet: None,
            refuse_frames: false,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn set_container_size(&mut self, size: Size) {
        self.container = size;
    }

    /// Makes later `schedule_frame` calls fail, as a broken frame source would.
    pub fn set_refuse_frames(&mut self, refuse: bool) {
        self.refuse_frames = refuse;
    }

    /// The frame request that has not fired yet, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Fires the pending frame: returns it and forgets it.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Number of frames successfully scheduled so far.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled_total
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled_total
    }

    pub fn is_watching_visibility(&self) -> bool {
        self.visibility_watchers > 0
    }

    pub fn resize_quiet(&self) -> Option<Duration> {
        self.resize_quiet
    }
}

impl MotionPreference for HeadlessHost {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl ContainerMetrics for HeadlessHost {
    fn container_size(&self) -> Size {
        self.container
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

impl FrameScheduler for HeadlessHost {
    fn schedule_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse_frames {
            return None;
        }
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.scheduled_total += 1;
        self.pending = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled_total += 1;
        }
    }
}

impl VisibilitySource for HeadlessHost {
    fn watch_visibility(&mut self) {
        self.visibility_watchers += 1;
    }
}

impl ResizeSource for HeadlessHost {
    fn watch_resize(&mut self, quiet: Duration) {
        self.resize_quiet = Some(quiet);
    }
}
