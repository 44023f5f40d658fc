//! [`DrawSurface`] backed by a `CanvasRenderingContext2d`.

use crate::dom::px;
use glam::DVec2;
use particle_field_core::{DrawSurface, FieldError, Rgba, SurfaceGeometry};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    /// Acquires the canvas's 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, FieldError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(FieldError::MissingContext)?;
        Ok(Self { canvas, ctx })
    }
}

impl DrawSurface for Canvas2dSurface {
    fn configure(&mut self, geometry: SurfaceGeometry) {
        self.canvas.set_width(geometry.backing_width);
        self.canvas.set_height(geometry.backing_height);

        let style = self.canvas.style();
        let _ = style.set_property("width", &px(geometry.logical.width));
        let _ = style.set_property("height", &px(geometry.logical.height));

        // Resizing the backing store resets the transform; reapply it absolutely.
        let r = geometry.pixel_ratio;
        let _ = self.ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}
