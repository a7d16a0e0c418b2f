//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one resource of the backend.
//!
//! | Module | Backend routes | Description |
//! |--------|----------------|-------------|
//! | `auth` | `/auth/login`, `/auth/verify`, `/auth/profile` | Admin session |
//! | `contact` | `/contact`, `/contacts`, `/contacts/{id}/read` | Contact form submissions |
//! | `projects` | `/projects[/{id}]` | Project CRUD |
//! | `skills` | `/skills[/{id}]`, `/skills/batch` | Skill CRUD and batch insert |
//! | `analytics` | `/analytics/track`, `/analytics/dashboard`, `/analytics/events` | Event tracking and stats |

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

pub mod analytics;
pub mod auth;
pub mod contact;
pub mod projects;
pub mod skills;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use contact::ContactApi;
pub use projects::ProjectsApi;
pub use skills::SkillsApi;

/// Characters escaped in a single path segment (RFC 3986 `pchar` complement)
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Route for one resource, e.g. `resource_path("projects", id, None)`.
///
/// The id is percent-encoded so it always stays a single path segment.
pub(crate) fn resource_path(collection: &str, id: &str, action: Option<&str>) -> String {
    let id = utf8_percent_encode(id, PATH_SEGMENT);
    match action {
        Some(action) => format!("{collection}/{id}/{action}"),
        None => format!("{collection}/{id}"),
    }
}

/// Acknowledgement returned by update/delete style routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Server confirmation message
    #[serde(default)]
    pub message: String,
}

/// Acknowledgement returned when a document is inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    /// Server confirmation message
    #[serde(default)]
    pub message: String,
    /// Id assigned by the server
    pub id: String,
}
