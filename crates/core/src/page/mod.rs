//! Small behaviors of the landing page that sit beside the particle field:
//! the scroll-aware navigation bar, reveal-on-scroll sections and the
//! waitlist form. Each is a plain state type; the DOM wiring lives in the
//! WASM crate.

pub mod nav;
pub mod reveal;
pub mod waitlist;

pub use nav::NavScroll;
pub use reveal::{RevealOptions, RevealTracker};
pub use waitlist::{SubmitButton, WaitlistSubmission};
