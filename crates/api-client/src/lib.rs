//! Typed REST client for the portfolio backend
//!
//! This crate provides a single, shareable HTTP client for the portfolio API
//! (contacts, projects, skills, analytics and admin auth).
//!
//! # Features
//!
//! - **Environment-based configuration**: Load the base URL and timeout from environment variables or TOML
//! - **Persisted sessions**: The bearer token survives restarts via a [`TokenStore`]
//! - **Normalized errors**: Every failure becomes an [`ApiError`] with a status, message and field errors
//! - **Fire-and-forget analytics**: Tracking calls log failures instead of returning them
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use portfolio_api_client::{ApiService, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build the one client the application shares
//!     let api = ApiService::with_config(ClientConfig::new("http://localhost:5000/api"))?;
//!
//!     let projects = api.projects().list().await?;
//!     println!("Got {} projects", projects.len());
//!
//!     api.analytics().track_page_view("home").await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod storage;

pub use client::ApiService;
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult, ErrorKind, FieldErrors};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::ApiService;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::analytics::{AnalyticsEvent, DashboardStats};
    pub use crate::endpoints::contact::{Contact, ContactReceipt, ContactSubmission};
    pub use crate::endpoints::projects::{Project, ProjectDraft, ProjectUpdate};
    pub use crate::endpoints::skills::{
        GroupedSkills, Proficiency, Skill, SkillDraft, SkillListing, SkillUpdate,
    };
    pub use crate::endpoints::{
        Ack, AnalyticsApi, AuthApi, ContactApi, Created, ProjectsApi, SkillsApi,
    };
    pub use crate::error::{ApiError, ApiResult, ErrorKind};
    pub use crate::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
}
