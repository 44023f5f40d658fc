//! The drawing surface the field renders onto.
//!
//! Coordinates passed to a surface are always logical units; the surface
//! applies the pixel ratio it was configured with.

use crate::color::Rgba;
use crate::geometry::SurfaceGeometry;
use glam::DVec2;

/// A 2D drawing target: a browser canvas, a CPU raster, or a recorder.
pub trait DrawSurface {
    /// Resizes the backing store and sets the logical-to-pixel scale.
    fn configure(&mut self, geometry: SurfaceGeometry);

    /// Clears the logical rectangle `(0, 0, width, height)` to transparent.
    fn clear(&mut self, width: f64, height: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);
}

/// Lets a caller keep ownership of a surface while a field draws on it.
impl<T: DrawSurface + ?Sized> DrawSurface for &mut T {
    fn configure(&mut self, geometry: SurfaceGeometry) {
        (**self).configure(geometry);
    }

    fn clear(&mut self, width: f64, height: f64) {
        (**self).clear(width, height);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        (**self).fill_circle(center, radius, color);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        (**self).stroke_line(from, to, width, color);
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Configure(SurfaceGeometry),
    Clear {
        width: f64,
        height: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
}

/// A surface that records every call, for tests and headless inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded calls and clears the history.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_untouched(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn configure(&mut self, geometry: SurfaceGeometry) {
        self.commands.push(DrawCommand::Configure(geometry));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
