//! Nav bar, reveal-on-scroll and waitlist wiring.

use crate::dom::{EMAIL_INPUT_SELECTOR, SUBMIT_BUTTON_SELECTOR};
use js_sys::Array;
use particle_field_core::page::nav::{NavScroll, SCROLLED_CLASS};
use particle_field_core::page::reveal::{
    RevealAction, RevealOptions, RevealTracker, VISIBLE_CLASS,
};
use particle_field_core::page::waitlist::{SubmitButton, WaitlistSubmission};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, Headers, HtmlButtonElement,
    HtmlFormElement, HtmlInputElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Request, RequestInit, RequestMode, Window,
};

fn window_and_document() -> Result<(Window, Document), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    Ok((window, document))
}

fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

pub fn mount_nav(nav_id: &str) -> Result<(), JsValue> {
    let (window, document) = window_and_document()?;
    let Some(nav) = document.get_element_by_id(nav_id) else {
        debug!(nav_id, "nav element not found");
        return Ok(());
    };

    let mut state = NavScroll::default();
    let scroll_window = window.clone();
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let y = scroll_window.scroll_y().unwrap_or(0.0);
        if let Some(scrolled) = state.update(y) {
            let classes = nav.class_list();
            let _ = if scrolled {
                classes.add_1(SCROLLED_CLASS)
            } else {
                classes.remove_1(SCROLLED_CLASS)
            };
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        on_scroll.as_ref().unchecked_ref(),
        &options,
    )?;
    on_scroll.forget();
    Ok(())
}

pub fn mount_reveal(selector: &str) -> Result<(), JsValue> {
    let (window, document) = window_and_document()?;
    let elements: Vec<Element> = query_all(&document, selector)?;
    let mut tracker = RevealTracker::new(elements.len());

    let supported =
        js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
    if !supported {
        for i in tracker.reveal_all() {
            let _ = elements[i].class_list().add_1(VISIBLE_CLASS);
        }
        return Ok(());
    }

    let observed = elements.clone();
    let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(index) = observed.iter().position(|el| *el == target) else {
                    continue;
                };
                if tracker.observe(index, entry.is_intersecting())
                    == RevealAction::RevealAndUnobserve
                {
                    let _ = target.class_list().add_1(VISIBLE_CLASS);
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = RevealOptions::default();
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
    for el in &elements {
        observer.observe(el);
    }
    on_intersect.forget();
    Ok(())
}

pub fn mount_waitlist(selector: &str, endpoint: &str) -> Result<(), JsValue> {
    let (window, document) = window_and_document()?;
    let forms: Vec<HtmlFormElement> = query_all(&document, selector)?;
    for form in forms {
        let button_state = Rc::new(RefCell::new(SubmitButton::Idle));
        let target = form.clone();
        let window = window.clone();
        let endpoint = endpoint.to_owned();
        let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            submit(&window, &target, &endpoint, button_state.clone());
        });
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();
    }
    Ok(())
}

fn submit(
    window: &Window,
    form: &HtmlFormElement,
    endpoint: &str,
    state: Rc<RefCell<SubmitButton>>,
) {
    let email = form
        .query_selector(EMAIL_INPUT_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();
    let form_id = form.id();
    let Ok(submission) = WaitlistSubmission::from_form(&email, Some(&form_id)) else {
        return;
    };

    let button = form
        .query_selector(SUBMIT_BUTTON_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
    let label = button
        .as_ref()
        .and_then(|b| b.text_content())
        .unwrap_or_default();
    let Some((sending_label, disabled)) = state.borrow_mut().begin(&label) else {
        return;
    };
    if let Some(button) = &button {
        button.set_text_content(Some(sending_label));
        button.set_disabled(disabled);
    }

    let window = window.clone();
    let form = form.clone();
    let endpoint = endpoint.to_owned();
    spawn_local(async move {
        match post(&window, &endpoint, &submission).await {
            Ok(()) => {
                if state.borrow_mut().succeed() {
                    show_success(&form);
                }
            }
            Err(err) => {
                warn!(?err, "waitlist request failed");
                let restored = state.borrow_mut().fail();
                if let (Some(label), Some(button)) = (restored, &button) {
                    button.set_text_content(Some(&label));
                    button.set_disabled(false);
                }
            }
        }
    });
}

async fn post(
    window: &Window,
    endpoint: &str,
    submission: &WaitlistSubmission,
) -> Result<(), JsValue> {
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::NoCors);
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&submission.to_json()));

    let request = Request::new_with_str_and_init(endpoint, &init)?;
    // An opaque no-cors response carries no status; settling is success.
    JsFuture::from(window.fetch_with_request(&request)).await?;
    Ok(())
}

/// Swaps the form for the hidden success message that follows it.
fn show_success(form: &HtmlFormElement) {
    let Some(success) = form.next_element_sibling() else {
        return;
    };
    if success.has_attribute("hidden") {
        let _ = form.style().set_property("display", "none");
        let _ = success.remove_attribute("hidden");
    }
}
