//! Antialiased circles and lines drawn with `tiny-skia` into an RGBA pixmap.

use glam::DVec2;
use particle_field_core::color::{Rgb, Rgba};
use particle_field_core::geometry::SurfaceGeometry;
use particle_field_core::surface::DrawSurface;
use tiny_skia::{
    BlendMode, Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// A software canvas with the same logical-unit API as the browser surface.
///
/// The pixmap is premultiplied internally; every accessor returns straight
/// alpha, as `getImageData` does.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixmap: Option<Pixmap>,
    pixel_ratio: f64,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self {
            pixmap: None,
            pixel_ratio: 1.0,
        }
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing-store width in pixels; 0 before a successful `configure`.
    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Straight RGBA8 of pixel `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// The buffer as straight RGBA8, alpha kept.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap.as_ref().map_or_else(Vec::new, straight_rgba8)
    }

    /// The buffer flattened over an opaque background.
    pub fn to_rgba8_on(&self, background: Rgb) -> Vec<u8> {
        let Some(pixmap) = &self.pixmap else {
            return Vec::new();
        };
        let mut flat = pixmap.clone();
        flat.fill(Color::from_rgba8(background.r, background.g, background.b, 255));
        flat.draw_pixmap(
            0,
            0,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        straight_rgba8(&flat)
    }

    fn transform(&self) -> Transform {
        let r = self.pixel_ratio as f32;
        Transform::from_scale(r, r)
    }
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut c = Color::from_rgba8(color.rgb.r, color.rgb.g, color.rgb.b, 255);
    c.set_alpha(color.alpha as f32);
    let mut paint = Paint::default();
    paint.set_color(c);
    paint.anti_alias = true;
    paint
}

fn straight_rgba8(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

impl DrawSurface for RasterSurface {
    /// Reallocates the pixmap, discarding its contents as resizing a canvas
    /// does. A backing store over
    /// [`MAX_BACKING_PIXELS`](particle_field_core::geometry::MAX_BACKING_PIXELS)
    /// or with a zero side leaves the surface unallocated and later draws
    /// are ignored.
    fn configure(&mut self, geometry: SurfaceGeometry) {
        self.pixel_ratio = geometry.pixel_ratio;
        self.pixmap = if geometry.fits_backing_limit() {
            Pixmap::new(geometry.backing_width, geometry.backing_height)
        } else {
            None
        };
    }

    fn clear(&mut self, width: f64, height: f64) {
        let transform = self.transform();
        let (Some(pixmap), Some(rect)) = (
            self.pixmap.as_mut(),
            Rect::from_xywh(0.0, 0.0, width as f32, height as f32),
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = false;
        pixmap.fill_rect(rect, &paint, transform, None);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let transform = self.transform();
        let (Some(pixmap), Some(path)) = (
            self.pixmap.as_mut(),
            PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32),
        ) else {
            return;
        };
        pixmap.fill_path(&path, &paint_for(color), FillRule::Winding, transform, None);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        let transform = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: width as f32,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint_for(color), &stroke, transform, None);
    }
}
