#![deny(unsafe_code)]
//! CPU-side rendering for the particle field.
//!
//! [`RasterSurface`] implements [`DrawSurface`](particle_field_core::DrawSurface)
//! over a `tiny-skia` pixmap so headless runs (the CLI, tests) see the same frames a
//! browser canvas would. PNG output sits behind the `png` feature so builds
//! that only need the buffer do not pull in the `image` crate.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::RasterSurface;
