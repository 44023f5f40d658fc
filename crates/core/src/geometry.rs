//! Logical sizes and the device-pixel scaling of the drawing surface.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};

/// A width/height pair in device-independent (CSS) units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides are finite and strictly positive.
    ///
    /// A collapsed container (e.g. `display: none`) measures as 0 x 0; the field
    /// keeps running but every particle sits at the origin.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn require_drawable(self) -> Result<Self, FieldError> {
        if self.is_drawable() {
            Ok(self)
        } else {
            Err(FieldError::InvalidDimensions)
        }
    }
}

/// Largest backing store, in pixels, a headless surface will allocate
/// (8192 x 8192, 256 MiB of RGBA).
pub const MAX_BACKING_PIXELS: u64 = 1 << 26;

/// How a logical size maps onto the surface's backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub logical: Size,
    /// Device pixel ratio after capping; every draw call is scaled by this.
    pub pixel_ratio: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl SurfaceGeometry {
    /// Fits a backing store to `logical` at `device_ratio`, capped at `max_ratio`.
    ///
    /// A missing, non-finite or non-positive device ratio counts as 1. Backing
    /// dimensions truncate to whole pixels, as assigning a fractional size to a
    /// canvas element does.
    pub fn fit(logical: Size, device_ratio: f64, max_ratio: f64) -> Self {
        let device_ratio = if device_ratio.is_finite() && device_ratio > 0.0 {
            device_ratio
        } else {
            1.0
        };
        let pixel_ratio = device_ratio.min(max_ratio);
        let backing = |side: f64| {
            if side.is_finite() && side > 0.0 {
                (side * pixel_ratio).min(u32::MAX as f64) as u32
            } else {
                0
            }
        };
        Self {
            logical,
            pixel_ratio,
            backing_width: backing(logical.width),
            backing_height: backing(logical.height),
        }
    }

    pub fn backing_pixels(&self) -> u64 {
        self.backing_width as u64 * self.backing_height as u64
    }

    /// True when the backing store is within [`MAX_BACKING_PIXELS`].
    pub fn fits_backing_limit(&self) -> bool {
        self.backing_pixels() <= MAX_BACKING_PIXELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ratio_keeps_logical_size() {
        let g = SurfaceGeometry::fit(Size::new(800.0, 600.0), 1.0, 2.0);
        assert_eq!((g.backing_width, g.backing_height), (800, 600));
        assert!((g.pixel_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn retina_ratio_doubles_backing_store() {
        let g = SurfaceGeometry::fit(Size::new(800.0, 600.0), 2.0, 2.0);
        assert_eq!((g.backing_width, g.backing_height), (1600, 1200));
    }

    #[test]
    fn ratio_above_cap_is_clamped() {
        let g = SurfaceGeometry::fit(Size::new(100.0, 50.0), 3.5, 2.0);
        assert!((g.pixel_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!((g.backing_width, g.backing_height), (200, 100));
    }

    #[test]
    fn bogus_device_ratio_counts_as_one() {
        for ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let g = SurfaceGeometry::fit(Size::new(10.0, 10.0), ratio, 2.0);
            assert!((g.pixel_ratio - 1.0).abs() < f64::EPSILON, "ratio {ratio}");
        }
    }

    #[test]
    fn fractional_sizes_truncate() {
        let g = SurfaceGeometry::fit(Size::new(100.7, 33.3), 1.5, 2.0);
        assert_eq!((g.backing_width, g.backing_height), (151, 49));
        assert_eq!(g.logical, Size::new(100.7, 33.3));
    }

    #[test]
    fn collapsed_container_has_empty_backing_store() {
        let g = SurfaceGeometry::fit(Size::new(0.0, 0.0), 2.0, 2.0);
        assert_eq!((g.backing_width, g.backing_height), (0, 0));
        assert!(!g.logical.is_drawable());
    }

    #[test]
    fn backing_limit_counts_physical_pixels() {
        let g = SurfaceGeometry::fit(Size::new(4096.0, 4096.0), 2.0, 2.0);
        assert_eq!(g.backing_pixels(), MAX_BACKING_PIXELS);
        assert!(g.fits_backing_limit());

        let g = SurfaceGeometry::fit(Size::new(200_000.0, 200_000.0), 2.0, 2.0);
        assert!(!g.fits_backing_limit());
    }

    #[test]
    fn require_drawable_rejects_zero_side() {
        assert!(Size::new(0.0, 10.0).require_drawable().is_err());
        assert!(Size::new(10.0, 10.0).require_drawable().is_ok());
    }
}
