//! PNG output of a [`RasterSurface`].

use crate::pixel::RasterSurface;
use particle_field_core::color::Rgb;
use particle_field_core::error::FieldError;
use std::path::Path;

/// Writes the surface as a PNG, flattened over `background` when given and
/// with transparency kept otherwise.
///
/// Returns `FieldError::InvalidDimensions` for an empty surface, or
/// `FieldError::Io` on write failure.
pub fn write_png(
    surface: &RasterSurface,
    background: Option<Rgb>,
    path: &Path,
) -> Result<(), FieldError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(FieldError::InvalidDimensions);
    }
    let rgba = match background {
        Some(bg) => surface.to_rgba8_on(bg),
        None => surface.to_rgba8(),
    };
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), rgba)
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))
}
