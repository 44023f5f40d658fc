//! Mounts the particle field on the hero canvas.
//!
//! The field and its host live in `Rc<RefCell<_>>` cells shared by the
//! `requestAnimationFrame`, `resize` and `IntersectionObserver` callbacks.
//! Callbacks run one at a time on the main thread, so the cells are never
//! borrowed re-entrantly.

use crate::canvas2d::Canvas2dSurface;
use crate::dom::{timeout_ms, HERO_VISIBILITY_THRESHOLD};
use crate::host::BrowserHost;
use js_sys::{Array, Function};
use particle_field_core::{
    FieldConfig, FieldError, ParticleField, ResizeCoalescer, Xorshift64,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

type SharedField = Rc<RefCell<Option<ParticleField<Canvas2dSurface>>>>;
type SharedHost = Rc<RefCell<BrowserHost>>;

pub fn mount(canvas_id: &str) -> Result<(), JsValue> {
    let (window, canvas, container, surface) = match acquire(canvas_id) {
        Ok(parts) => parts,
        Err(err) if err.is_silent_disable() => {
            debug!(%err, "hero canvas unavailable, page stays static");
            return Ok(());
        }
        Err(err) => return Err(to_js(err)),
    };

    let host: SharedHost = Rc::new(RefCell::new(BrowserHost::new(window.clone(), container)));
    let field: SharedField = Rc::new(RefCell::new(None));

    // Installed before initialize so the first frame can schedule the second.
    let on_frame = {
        let host = host.clone();
        let field = field.clone();
        Closure::<dyn FnMut()>::new(move || {
            let mut host = host.borrow_mut();
            if let Some(field) = field.borrow_mut().as_mut() {
                field.step(&mut *host);
            }
        })
    };
    host.borrow_mut()
        .set_frame_callback(on_frame.as_ref().unchecked_ref::<Function>().clone());
    on_frame.forget();

    let rng = Xorshift64::from_unit(js_sys::Math::random());
    let initialized = {
        let mut host = host.borrow_mut();
        ParticleField::initialize(surface, &mut *host, FieldConfig::default(), rng)
            .map_err(to_js)?
    };
    let Some(initialized) = initialized else {
        return Ok(());
    };
    *field.borrow_mut() = Some(initialized);

    let (watch_visibility, resize_quiet) = {
        let host = host.borrow();
        (host.is_watching_visibility(), host.resize_quiet())
    };
    if let Some(quiet) = resize_quiet {
        watch_resize(&window, host.clone(), field.clone(), quiet)?;
    }
    if watch_visibility {
        watch_visibility_of(&canvas, host, field)?;
    }
    Ok(())
}

fn acquire(
    canvas_id: &str,
) -> Result<(Window, HtmlCanvasElement, Element, Canvas2dSurface), FieldError> {
    let missing = || FieldError::MissingSurface(canvas_id.to_owned());
    let window = web_sys::window().ok_or_else(missing)?;
    let canvas = window
        .document()
        .and_then(|doc| doc.get_element_by_id(canvas_id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(missing)?;
    let container = canvas.parent_element().ok_or_else(missing)?;
    let surface = Canvas2dSurface::new(canvas.clone())?;
    Ok((window, canvas, container, surface))
}

fn to_js(err: FieldError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
}

/// Timer state around a [`ResizeCoalescer`].
struct ResizeWatch {
    window: Window,
    coalescer: ResizeCoalescer,
    timer: Option<i32>,
    on_timer: Option<Function>,
}

impl ResizeWatch {
    fn arm(&mut self, delay: Duration) {
        if let Some(id) = self.timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
        if let Some(callback) = &self.on_timer {
            self.timer = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback, timeout_ms(delay))
                .ok();
        }
    }
}

fn watch_resize(
    window: &Window,
    host: SharedHost,
    field: SharedField,
    quiet: Duration,
) -> Result<(), JsValue> {
    let watch = Rc::new(RefCell::new(ResizeWatch {
        window: window.clone(),
        coalescer: ResizeCoalescer::new(quiet),
        timer: None,
        on_timer: None,
    }));

    let on_timer = {
        let watch = watch.clone();
        Closure::<dyn FnMut()>::new(move || {
            let mut w = watch.borrow_mut();
            w.timer = None;
            let now = now();
            let resized = match field.borrow_mut().as_mut() {
                Some(field) => w.coalescer.poll(now, field, &*host.borrow()),
                None => false,
            };
            if !resized {
                // Timers may fire a millisecond early against Date.now().
                if let Some(rest) = w.coalescer.remaining(now) {
                    w.arm(rest);
                }
            }
        })
    };
    watch.borrow_mut().on_timer = Some(on_timer.as_ref().unchecked_ref::<Function>().clone());
    on_timer.forget();

    let on_resize = Closure::<dyn FnMut()>::new(move || {
        let mut w = watch.borrow_mut();
        w.coalescer.notify(now());
        let quiet = w.coalescer.quiet();
        w.arm(quiet);
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

fn watch_visibility_of(
    canvas: &HtmlCanvasElement,
    host: SharedHost,
    field: SharedField,
) -> Result<(), JsValue> {
    let on_intersect =
        Closure::<dyn FnMut(Array, IntersectionObserver)>::new(move |entries: Array, _| {
            // Only the latest record for the canvas matters.
            let Some(entry) = entries
                .iter()
                .last()
                .and_then(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
            else {
                return;
            };
            let mut host = host.borrow_mut();
            if let Some(field) = field.borrow_mut().as_mut() {
                field.set_visible(entry.is_intersecting(), &mut *host);
            }
        });

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(HERO_VISIBILITY_THRESHOLD));
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    observer.observe(canvas);
    on_intersect.forget();
    Ok(())
}
