//! Debounced resizing of a [`ParticleField`].

use crate::debounce::Debouncer;
use crate::field::ParticleField;
use crate::host::ContainerMetrics;
use crate::surface::DrawSurface;
use std::time::Duration;
use tracing::trace;

/// Turns a burst of container resize notifications into one
/// [`ParticleField::resize`] once the burst has been quiet long enough.
#[derive(Debug, Clone)]
pub struct ResizeCoalescer {
    debouncer: Debouncer,
    coalesced: usize,
}

impl ResizeCoalescer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(quiet),
            coalesced: 0,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.debouncer.quiet()
    }

    /// Records a resize notification at `now`.
    pub fn notify(&mut self, now: Duration) {
        self.debouncer.trigger(now);
        self.coalesced += 1;
    }

    /// Resizes `field` if a burst has settled by `now`. Returns whether it did.
    pub fn poll<S, H>(&mut self, now: Duration, field: &mut ParticleField<S>, host: &H) -> bool
    where
        S: DrawSurface,
        H: ContainerMetrics + ?Sized,
    {
        if !self.debouncer.poll(now) {
            return false;
        }
        trace!(notifications = self.coalesced, "resize burst settled");
        self.coalesced = 0;
        field.resize(host);
        true
    }

    /// Time left before a poll can resize, or `None` when nothing is pending.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
