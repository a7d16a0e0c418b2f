//! Contact form state
//!
//! Holds what the visitor typed plus the inline status line shown under the
//! form. Submitting goes through [`ContactApi::submit`], so blank fields are
//! rejected before any request is made.
//!
//! [`ContactApi::submit`]: portfolio_api_client::endpoints::ContactApi::submit

use crate::view::{Element, View};
use portfolio_api_client::endpoints::contact::{ContactReceipt, ContactSubmission};
use portfolio_api_client::{ApiError, ApiService, FieldErrors};
use tracing::{debug, info};

/// Status message after a successful submission
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";

/// Status message when a failure carries no message of its own
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

/// Tone of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The message was sent
    Success,
    /// The message was not sent
    Error,
}

/// Status line under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    /// Success or error
    pub kind: StatusKind,
    /// Text shown to the visitor
    pub message: String,
}

impl FormStatus {
    fn success() -> Self {
        Self {
            kind: StatusKind::Success,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    fn error(error: &ApiError) -> Self {
        let message = if error.message.trim().is_empty() {
            FAILURE_MESSAGE.to_string()
        } else {
            error.message.clone()
        };
        Self {
            kind: StatusKind::Error,
            message,
        }
    }
}

/// Public contact form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Visitor name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Message body
    pub message: String,
    status: Option<FormStatus>,
    field_errors: FieldErrors,
    submitting: bool,
}

impl ContactForm {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status line, if any
    #[must_use]
    pub fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    /// Per-field messages from the last failed submission
    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Whether a submission is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// What would be sent right now
    #[must_use]
    pub fn submission(&self) -> ContactSubmission {
        ContactSubmission::new(&self.name, &self.email, &self.message)
    }

    /// Send the form.
    ///
    /// On success the fields are cleared and a thank-you status is shown; on
    /// failure the fields are kept and the error message is shown instead.
    pub async fn submit(&mut self, api: &ApiService) -> Result<ContactReceipt, ApiError> {
        self.status = None;
        self.field_errors.clear();
        self.submitting = true;

        let result = api.contact().submit(&self.submission()).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                info!(contact_id = %receipt.id, "Contact form sent");
                self.name.clear();
                self.email.clear();
                self.message.clear();
                self.status = Some(FormStatus::success());
                Ok(receipt)
            }
            Err(e) => {
                debug!(status = e.status, error = %e, "Contact form rejected");
                self.status = Some(FormStatus::error(&e));
                if let Some(ref fields) = e.field_errors {
                    self.field_errors.clone_from(fields);
                }
                Err(e)
            }
        }
    }

    /// Status line markup
    #[must_use]
    pub fn render_status(&self) -> View {
        match self.status {
            None => View::Empty,
            Some(ref status) => {
                let class = match status.kind {
                    StatusKind::Success => "form-status success",
                    StatusKind::Error => "form-status error",
                };
                Element::new("div")
                    .class(class)
                    .attr("role", "status")
                    .child(status.message.as_str())
                    .into()
            }
        }
    }
}
