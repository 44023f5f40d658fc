//! The waitlist sign-up form.
//!
//! Submission is fire-and-forget: the endpoint is opaque and called in
//! `no-cors` mode, so any settled request counts as success and only a
//! network failure restores the form.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};

/// Source recorded when the form element has no id.
pub const DEFAULT_SOURCE: &str = "website";
/// Button label while a request is in flight.
pub const SENDING_LABEL: &str = "Sending...";
/// Selector for waitlist forms on the page.
pub const FORM_SELECTOR: &str = ".waitlist-form";

/// JSON body posted to the waitlist endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistSubmission {
    pub email: String,
    pub source: String,
}

impl WaitlistSubmission {
    /// Builds a submission from raw form values.
    ///
    /// The email is trimmed and must not be empty; an empty or missing form
    /// id falls back to [`DEFAULT_SOURCE`].
    pub fn from_form(raw_email: &str, form_id: Option<&str>) -> Result<Self, FieldError> {
        let email = raw_email.trim();
        if email.is_empty() {
            return Err(FieldError::EmptyEmail);
        }
        let source = form_id
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SOURCE);
        Ok(Self {
            email: email.to_string(),
            source: source.to_string(),
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "email": self.email, "source": self.source }).to_string()
    }
}

/// Submit-button state across one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitButton {
    Idle,
    Sending { original_label: String },
    Succeeded,
}

impl SubmitButton {
    /// Enters `Sending`, remembering `label`. Returns the label and disabled
    /// flag to apply, or `None` if a request is already in flight or done.
    pub fn begin(&mut self, label: &str) -> Option<(&'static str, bool)> {
        if !matches!(self, SubmitButton::Idle) {
            return None;
        }
        *self = SubmitButton::Sending {
            original_label: label.to_string(),
        };
        Some((SENDING_LABEL, true))
    }

    /// The request settled: the form is replaced by its success message.
    pub fn succeed(&mut self) -> bool {
        if !matches!(self, SubmitButton::Sending { .. }) {
            return false;
        }
        *self = SubmitButton::Succeeded;
        true
    }

    /// The request failed: returns the label to restore and re-enables the
    /// button.
    pub fn fail(&mut self) -> Option<String> {
        match std::mem::replace(self, SubmitButton::Idle) {
            SubmitButton::Sending { original_label } => Some(original_label),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn is_sending(&self) -> bool {
        matches!(self, SubmitButton::Sending { .. })
    }
}
