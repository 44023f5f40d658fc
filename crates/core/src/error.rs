//! Error types for the particle-field core.

use thiserror::Error;

/// Errors produced by particle-field operations.
///
/// The animation itself never fails once running; these cover construction,
/// configuration, host wiring and the page behaviors.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A drawing surface was requested with a zero or non-finite size.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A `FieldConfig` value was outside its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The target surface element does not exist in the host.
    #[error("missing surface element: {0}")]
    MissingSurface(String),

    /// The host could not provide a 2D drawing context for the surface.
    #[error("2d drawing context unavailable")]
    MissingContext,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A waitlist submission carried an empty email after trimming.
    #[error("email must not be empty")]
    EmptyEmail,

    /// Writing an output artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl FieldError {
    /// True for the errors that permanently disable the canvas without
    /// surfacing anything to the viewer.
    pub fn is_silent_disable(&self) -> bool {
        matches!(self, FieldError::MissingSurface(_) | FieldError::MissingContext)
    }
}
