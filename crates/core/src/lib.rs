#![deny(unsafe_code)]
//! Core of the particle-field hero animation.
//!
//! Provides [`ParticleField`] (the frame-driven animation and its loop state
//! machine), [`Particle`], [`FieldConfig`], the host collaborator traits in
//! [`host`], the [`DrawSurface`] trait, a [`ResizeCoalescer`] for resize
//! bursts, the seedable [`Xorshift64`] PRNG, and the small landing-page
//! behaviors in [`page`].

pub mod color;
pub mod config;
pub mod connection;
pub mod debounce;
pub mod error;
pub mod field;
pub mod geometry;
pub mod host;
pub mod page;
pub mod params;
pub mod particle;
pub mod prng;
pub mod resize;
pub mod scene;
pub mod surface;

pub use color::{Rgb, Rgba, TEAL};
pub use config::FieldConfig;
pub use connection::{connection_alpha, connections, Connection};
pub use debounce::Debouncer;
pub use error::FieldError;
pub use field::{FieldState, LoopState, ParticleField, StepOutcome};
pub use geometry::{Size, SurfaceGeometry};
pub use host::{FrameHandle, HeadlessHost, Host};
pub use particle::Particle;
pub use prng::Xorshift64;
pub use resize::ResizeCoalescer;
pub use scene::Scene;
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};
