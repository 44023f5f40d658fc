//! Ids, queries and CSS formatting shared by the browser modules.

/// Id of the hero canvas element.
pub const HERO_CANVAS_ID: &str = "heroCanvas";
/// Id of the navigation bar.
pub const NAV_ID: &str = "nav";
/// Media query matched when the viewer asks for less motion.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
/// Intersection ratio at which the hero counts as on-screen; any overlap does.
pub const HERO_VISIBILITY_THRESHOLD: f64 = 0.0;
pub const EMAIL_INPUT_SELECTOR: &str = "input[type=\"email\"]";
pub const SUBMIT_BUTTON_SELECTOR: &str = "button[type=\"submit\"]";

/// Most verbose level forwarded to the browser console. Per-frame trace
/// events stay out of it.
pub const CONSOLE_MAX_LEVEL: tracing::Level = tracing::Level::DEBUG;

/// A CSS pixel length, e.g. `px(412.5) == "412.5px"`.
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Milliseconds for `setTimeout`, clamped into the `i32` range it accepts.
pub fn timeout_ms(d: std::time::Duration) -> i32 {
    d.as_millis().clamp(1, i32::MAX as u128) as i32
}
