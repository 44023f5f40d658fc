#![deny(unsafe_code)]
//! WASM bindings for the landing page.
//!
//! Wires the core types to the DOM: the hero canvas
//! ([`ParticleField`](particle_field_core::ParticleField) on a
//! `CanvasRenderingContext2d`), the scroll-aware nav bar, reveal-on-scroll
//! sections and the waitlist forms. Only [`dom`] builds off `wasm32`; the
//! browser modules are gated on the target.

pub mod dom;

#[cfg(target_arch = "wasm32")]
mod canvas2d;
#[cfg(target_arch = "wasm32")]
mod hero;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod page;

#[cfg(target_arch = "wasm32")]
pub use exports::*;

#[cfg(target_arch = "wasm32")]
mod exports {
    use wasm_bindgen::prelude::*;

    /// Runs once when the module is instantiated: routes panics and
    /// `tracing` events to the browser console.
    #[wasm_bindgen(start)]
    pub fn init_console() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(crate::dom::CONSOLE_MAX_LEVEL)
                .set_report_logs_in_timings(false)
                .build(),
        );
    }

    /// Starts the particle animation on the canvas with id `canvas_id`.
    ///
    /// A missing canvas or 2D context silently leaves the page static.
    #[wasm_bindgen(js_name = mountHeroCanvas)]
    pub fn mount_hero_canvas(canvas_id: &str) -> Result<(), JsValue> {
        crate::hero::mount(canvas_id)
    }

    /// Toggles the scrolled class on the nav element with id `nav_id`.
    #[wasm_bindgen(js_name = mountNav)]
    pub fn mount_nav(nav_id: &str) -> Result<(), JsValue> {
        crate::page::mount_nav(nav_id)
    }

    /// Reveals elements matching `selector` as they scroll into view.
    #[wasm_bindgen(js_name = mountReveal)]
    pub fn mount_reveal(selector: &str) -> Result<(), JsValue> {
        crate::page::mount_reveal(selector)
    }

    /// Posts waitlist forms matching `selector` to `endpoint`.
    #[wasm_bindgen(js_name = mountWaitlist)]
    pub fn mount_waitlist(selector: &str, endpoint: &str) -> Result<(), JsValue> {
        crate::page::mount_waitlist(selector, endpoint)
    }

    /// Mounts every behavior with the page's default ids and selectors.
    #[wasm_bindgen(js_name = mountPage)]
    pub fn mount_page(waitlist_endpoint: &str) -> Result<(), JsValue> {
        use crate::dom::{HERO_CANVAS_ID, NAV_ID};
        use particle_field_core::page::{reveal, waitlist};

        mount_nav(NAV_ID)?;
        mount_reveal(reveal::REVEAL_SELECTOR)?;
        mount_waitlist(waitlist::FORM_SELECTOR, waitlist_endpoint)?;
        mount_hero_canvas(HERO_CANVAS_ID)
    }
}
