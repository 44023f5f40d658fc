//! Tunable constants of the particle field.
//!
//! The defaults reproduce the hero canvas exactly: 40 teal particles, joined
//! when closer than 150 units by lines fading from 0.12 alpha.

use crate::color::{Rgb, TEAL};
use crate::error::FieldError;
use crate::params::{param_color, param_f64, param_u64, param_usize};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_PARTICLE_COUNT: usize = 40;
pub const DEFAULT_CONNECTION_DISTANCE: f64 = 150.0;
pub const DEFAULT_MAX_LINE_OPACITY: f64 = 0.12;
pub const DEFAULT_LINE_WIDTH: f64 = 0.5;
/// Full width of the per-axis velocity range; velocities lie in [-0.2, 0.2).
pub const DEFAULT_SPEED: f64 = 0.4;
pub const DEFAULT_MIN_RADIUS: f64 = 0.5;
pub const DEFAULT_RADIUS_SPAN: f64 = 1.5;
pub const DEFAULT_MIN_OPACITY: f64 = 0.1;
pub const DEFAULT_OPACITY_SPAN: f64 = 0.4;
/// High-density displays are rendered at no more than 2x.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 200;

/// Configuration for a [`ParticleField`](crate::field::ParticleField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub connection_distance: f64,
    pub max_line_opacity: f64,
    pub line_width: f64,
    pub speed: f64,
    pub min_radius: f64,
    pub radius_span: f64,
    pub min_opacity: f64,
    pub opacity_span: f64,
    pub color: Rgb,
    pub max_pixel_ratio: f64,
    pub resize_debounce_ms: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
            max_line_opacity: DEFAULT_MAX_LINE_OPACITY,
            line_width: DEFAULT_LINE_WIDTH,
            speed: DEFAULT_SPEED,
            min_radius: DEFAULT_MIN_RADIUS,
            radius_span: DEFAULT_RADIUS_SPAN,
            min_opacity: DEFAULT_MIN_OPACITY,
            opacity_span: DEFAULT_OPACITY_SPAN,
            color: TEAL,
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl FieldConfig {
    /// Reads a config from a JSON object, falling back to the default for
    /// every missing or mistyped key.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            particle_count: param_usize(params, "particle_count", d.particle_count),
            connection_distance: param_f64(params, "connection_distance", d.connection_distance),
            max_line_opacity: param_f64(params, "max_line_opacity", d.max_line_opacity),
            line_width: param_f64(params, "line_width", d.line_width),
            speed: param_f64(params, "speed", d.speed),
            min_radius: param_f64(params, "min_radius", d.min_radius),
            radius_span: param_f64(params, "radius_span", d.radius_span),
            min_opacity: param_f64(params, "min_opacity", d.min_opacity),
            opacity_span: param_f64(params, "opacity_span", d.opacity_span),
            color: param_color(params, "color", d.color),
            max_pixel_ratio: param_f64(params, "max_pixel_ratio", d.max_pixel_ratio),
            resize_debounce_ms: param_u64(params, "resize_debounce_ms", d.resize_debounce_ms),
        }
    }

    /// Checks ranges the animation relies on.
    ///
    /// Radii must stay positive and opacities inside [0, 1] for every value
    /// the distributions can produce.
    pub fn validate(&self) -> Result<(), FieldError> {
        let invalid = |msg: &str| Err(FieldError::InvalidConfig(msg.to_string()));
        let finite = [
            self.connection_distance,
            self.max_line_opacity,
            self.line_width,
            self.speed,
            self.min_radius,
            self.radius_span,
            self.min_opacity,
            self.opacity_span,
            self.max_pixel_ratio,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return invalid("all numeric parameters must be finite");
        }
        if self.particle_count == 0 {
            return invalid("particle_count must be > 0");
        }
        if self.connection_distance <= 0.0 {
            return invalid("connection_distance must be > 0");
        }
        if !(0.0..=1.0).contains(&self.max_line_opacity) {
            return invalid("max_line_opacity must be within [0, 1]");
        }
        if self.line_width <= 0.0 {
            return invalid("line_width must be > 0");
        }
        if self.speed < 0.0 {
            return invalid("speed must be >= 0");
        }
        if self.min_radius <= 0.0 || self.radius_span < 0.0 {
            return invalid("min_radius must be > 0 and radius_span >= 0");
        }
        if self.min_opacity <= 0.0
            || self.opacity_span < 0.0
            || self.min_opacity + self.opacity_span > 1.0
        {
            return invalid("particle opacity range must lie within (0, 1]");
        }
        if self.max_pixel_ratio <= 0.0 {
            return invalid("max_pixel_ratio must be > 0");
        }
        Ok(())
    }

    /// Quiet period for coalescing resize notifications.
    pub fn resize_quiet(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Current values as a JSON object.
    pub fn params(&self) -> Value {
        json!({
            "particle_count": self.particle_count,
            "connection_distance": self.connection_distance,
            "max_line_opacity": self.max_line_opacity,
            "line_width": self.line_width,
            "speed": self.speed,
            "min_radius": self.min_radius,
            "radius_span": self.radius_span,
            "min_opacity": self.min_opacity,
            "opacity_span": self.opacity_span,
            "color": self.color.to_hex(),
            "max_pixel_ratio": self.max_pixel_ratio,
            "resize_debounce_ms": self.resize_debounce_ms,
        })
    }

    /// Schema of every parameter: type, default, range and description.
    pub fn param_schema() -> Value {
        json!({
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "min": 1,
                "max": 200,
                "description": "Number of particles; the connection pass is O(n^2) per frame"
            },
            "connection_distance": {
                "type": "number",
                "default": DEFAULT_CONNECTION_DISTANCE,
                "min": 0.0,
                "description": "Pairs closer than this (logical units) are joined by a line"
            },
            "max_line_opacity": {
                "type": "number",
                "default": DEFAULT_MAX_LINE_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Line alpha at distance 0, fading linearly to 0 at the threshold"
            },
            "line_width": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.0,
                "description": "Connection stroke width in logical units"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": 0.0,
                "description": "Width of the uniform per-axis velocity range, centered on 0"
            },
            "min_radius": {
                "type": "number",
                "default": DEFAULT_MIN_RADIUS,
                "min": 0.0,
                "description": "Smallest particle radius"
            },
            "radius_span": {
                "type": "number",
                "default": DEFAULT_RADIUS_SPAN,
                "min": 0.0,
                "description": "Radius range above min_radius"
            },
            "min_opacity": {
                "type": "number",
                "default": DEFAULT_MIN_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Smallest particle fill alpha"
            },
            "opacity_span": {
                "type": "number",
                "default": DEFAULT_OPACITY_SPAN,
                "min": 0.0,
                "max": 1.0,
                "description": "Fill alpha range above min_opacity"
            },
            "color": {
                "type": "string",
                "default": TEAL.to_hex(),
                "description": "Hue shared by particles and lines, as #rrggbb"
            },
            "max_pixel_ratio": {
                "type": "number",
                "default": DEFAULT_MAX_PIXEL_RATIO,
                "min": 0.0,
                "description": "Cap on device pixel ratio used for the backing store"
            },
            "resize_debounce_ms": {
                "type": "integer",
                "default": DEFAULT_RESIZE_DEBOUNCE_MS,
                "min": 0,
                "description": "Quiet period before a resize regenerates the field"
            }
        })
    }
}
