//! Reproducible description of a headless particle-field run.
//!
//! A [`Scene`] captures everything needed to replay a run frame for frame:
//! container size, pixel ratio, parameter overrides, PRNG seed and frame count.

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::geometry::{Size, SurfaceGeometry};
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Scene {
    /// A scene with default params, pixel ratio 1 and no frames.
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: default_pixel_ratio(),
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn config(&self) -> FieldConfig {
        FieldConfig::from_json(&self.params)
    }

    pub fn rng(&self) -> Xorshift64 {
        Xorshift64::new(self.seed)
    }

    /// The backing store this scene's surface will be configured with.
    pub fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::fit(self.size(), self.pixel_ratio, self.config().max_pixel_ratio)
    }

    /// Checks the container is drawable, its backing store fits in memory,
    /// and the params form a valid config.
    pub fn validate(&self) -> Result<(), FieldError> {
        self.size().require_drawable()?;
        self.config().validate()?;
        if !self.geometry().fits_backing_limit() {
            return Err(FieldError::InvalidDimensions);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let s = Scene::new(800.0, 600.0, 42);
        assert_eq!(s.size(), Size::new(800.0, 600.0));
        assert!((s.pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(s.params, serde_json::json!({}));
        assert_eq!(s.frames, 0);
        assert_eq!(s.config(), FieldConfig::default());
    }

    #[test]
    fn json_round_trip_with_params() {
        let mut s = Scene::new(1280.0, 720.0, 7);
        s.params = serde_json::json!({"particle_count": 60, "color": "#ffffff"});
        s.frames = 300;
        let json = serde_json::to_string_pretty(&s).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
        assert_eq!(back.config().particle_count, 60);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let s: Scene = serde_json::from_str(r#"{"width": 10, "height": 20, "seed": 1}"#).unwrap();
        assert!((s.pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(s.frames, 0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_size() {
        assert!(matches!(
            Scene::new(0.0, 600.0, 1).validate(),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn validate_rejects_oversized_backing_store() {
        let mut s = Scene::new(200_000.0, 200_000.0, 1);
        s.pixel_ratio = 2.0;
        assert!(matches!(s.validate(), Err(FieldError::InvalidDimensions)));
    }

    #[test]
    fn geometry_applies_the_ratio_cap() {
        let mut s = Scene::new(100.0, 50.0, 1);
        s.pixel_ratio = 3.0;
        let g = s.geometry();
        assert_eq!((g.backing_width, g.backing_height), (200, 100));
    }

    #[test]
    fn validate_rejects_bad_params() {
        let mut s = Scene::new(100.0, 100.0, 1);
        s.params = serde_json::json!({"max_line_opacity": 3.0});
        assert!(matches!(s.validate(), Err(FieldError::InvalidConfig(_))));
    }
}
