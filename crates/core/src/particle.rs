//! A single drifting point and the toroidal wrap that keeps it on the surface.

use crate::config::FieldConfig;
use crate::geometry::Size;
use crate::prng::Xorshift64;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One particle. Only `position` changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: DVec2,
    velocity: DVec2,
    radius: f64,
    opacity: f64,
}

impl Particle {
    /// Builds a particle with explicit attributes; `position` is wrapped into
    /// `bounds`.
    pub fn new(position: DVec2, velocity: DVec2, radius: f64, opacity: f64, bounds: Size) -> Self {
        Self {
            position: DVec2::new(
                wrap_axis(position.x, bounds.width),
                wrap_axis(position.y, bounds.height),
            ),
            velocity,
            radius,
            opacity,
        }
    }

    /// Draws a particle uniformly inside `bounds` with the configured
    /// velocity, radius and opacity distributions.
    pub fn random(rng: &mut Xorshift64, bounds: Size, config: &FieldConfig) -> Self {
        let x = rng.next_f64() * bounds.width;
        let y = rng.next_f64() * bounds.height;
        let vx = rng.next_centered(config.speed);
        let vy = rng.next_centered(config.speed);
        let radius = rng.next_span(config.min_radius, config.radius_span);
        let opacity = rng.next_span(config.min_opacity, config.opacity_span);
        Self::new(DVec2::new(x, y), DVec2::new(vx, vy), radius, opacity, bounds)
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Moves by one frame of velocity, wrapping each axis independently.
    pub fn advance(&mut self, bounds: Size) {
        let next = self.position + self.velocity;
        self.position = DVec2::new(
            wrap_axis(next.x, bounds.width),
            wrap_axis(next.y, bounds.height),
        );
    }

    pub fn is_within(&self, bounds: Size) -> bool {
        let in_axis = |v: f64, extent: f64| {
            if extent > 0.0 {
                (0.0..extent).contains(&v)
            } else {
                v == 0.0
            }
        };
        in_axis(self.position.x, bounds.width) && in_axis(self.position.y, bounds.height)
    }
}

/// Wraps `v` onto `[0, extent)`; a coordinate leaving one edge re-enters at
/// the opposite one.
///
/// The sub-step overshoot is preserved, so a particle at `x = 0.1` moving
/// `-0.2` lands at `extent - 0.1`. Degenerate extents pin the axis to 0.
pub fn wrap_axis(v: f64, extent: f64) -> f64 {
    if !(extent.is_finite() && extent > 0.0) || !v.is_finite() {
        return 0.0;
    }
    if (0.0..extent).contains(&v) {
        return v;
    }
    let wrapped = v.rem_euclid(extent);
    // rem_euclid rounds tiny negatives up to exactly `extent`.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
