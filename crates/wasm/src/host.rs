//! [`Host`](particle_field_core::Host) implementation over `window`.

use js_sys::Function;
use particle_field_core::host::{
    ContainerMetrics, FrameHandle, FrameScheduler, MotionPreference, ResizeSource,
    VisibilitySource,
};
use particle_field_core::Size;
use std::time::Duration;
use tracing::warn;
use web_sys::{Element, Window};

use crate::dom::REDUCED_MOTION_QUERY;

/// The browser side of the field: `matchMedia`, the canvas's parent box and
/// `requestAnimationFrame`.
///
/// Subscriptions are only recorded here; [`crate::hero`] installs the actual
/// observers once the field exists, since their callbacks need it.
pub struct BrowserHost {
    window: Window,
    container: Element,
    reduced_motion: bool,
    frame_callback: Option<Function>,
    watching_visibility: bool,
    resize_quiet: Option<Duration>,
}

impl BrowserHost {
    pub fn new(window: Window, container: Element) -> Self {
        let reduced_motion = window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches());
        Self {
            window,
            container,
            reduced_motion,
            frame_callback: None,
            watching_visibility: false,
            resize_quiet: None,
        }
    }

    /// Sets the function `requestAnimationFrame` invokes.
    pub fn set_frame_callback(&mut self, callback: Function) {
        self.frame_callback = Some(callback);
    }

    pub fn is_watching_visibility(&self) -> bool {
        self.watching_visibility
    }

    pub fn resize_quiet(&self) -> Option<Duration> {
        self.resize_quiet
    }
}

impl MotionPreference for BrowserHost {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl ContainerMetrics for BrowserHost {
    fn container_size(&self) -> Size {
        let rect = self.container.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

impl FrameScheduler for BrowserHost {
    fn schedule_frame(&mut self) -> Option<FrameHandle> {
        let Some(callback) = &self.frame_callback else {
            warn!("frame requested before a callback was installed");
            return None;
        };
        match self.window.request_animation_frame(callback) {
            Ok(id) => Some(FrameHandle(id as u32 as u64)),
            Err(err) => {
                warn!(?err, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0 as u32 as i32);
    }
}

impl VisibilitySource for BrowserHost {
    fn watch_visibility(&mut self) {
        self.watching_visibility = true;
    }
}

impl ResizeSource for BrowserHost {
    fn watch_resize(&mut self, quiet: Duration) {
        self.resize_quiet = Some(quiet);
    }
}
