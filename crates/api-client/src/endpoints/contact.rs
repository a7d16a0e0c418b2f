//! Contact form endpoints

use crate::client::ApiService;
use crate::endpoints::{resource_path, Ack};
use crate::error::{ApiError, ApiResult, FieldErrors};
use serde::{Deserialize, Serialize};

/// Message used when a submission is missing required fields
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required";

/// Contact API interface
#[derive(Clone)]
pub struct ContactApi {
    client: ApiService,
}

impl ContactApi {
    /// Create a new contact API interface
    pub(crate) fn new(client: ApiService) -> Self {
        Self { client }
    }

    /// Submit the public contact form
    ///
    /// POST /contact
    ///
    /// Blank fields are rejected locally before anything is sent; everything
    /// else is left to the server, whose field errors come back on the
    /// returned [`ApiError`].
    pub async fn submit(&self, submission: &ContactSubmission) -> ApiResult<ContactReceipt> {
        submission.validate()?;
        self.client.post("contact", submission).await
    }

    /// List contact submissions, newest first (admin)
    ///
    /// GET /contacts
    pub async fn list(&self) -> ApiResult<Vec<Contact>> {
        let response: ContactList = self.client.get("contacts").await?;
        Ok(response.contacts)
    }

    /// Mark a submission as read (admin)
    ///
    /// PATCH /contacts/{id}/read
    pub async fn mark_read(&self, contact_id: &str) -> ApiResult<Ack> {
        self.client.patch(&resource_path("contacts", contact_id, Some("read"))).await
    }
}

/// Contact form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    /// Create a submission
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Names of fields that are empty or whitespace only
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Reject submissions with blank fields
    pub fn validate(&self) -> ApiResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }

        let field_errors: FieldErrors = missing
            .into_iter()
            .map(|field| (field.to_string(), "This field is required".to_string()))
            .collect();
        Err(ApiError::validation(MISSING_FIELDS_MESSAGE, field_errors))
    }
}

/// Response to a contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    #[serde(default)]
    pub message: String,
    /// Id of the stored submission
    pub id: String,
    /// Whether the notification email went out
    #[serde(default)]
    pub email_sent: bool,
}

/// Stored contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: String,
}

#[derive(Deserialize)]
struct ContactList {
    contacts: Vec<Contact>,
}
