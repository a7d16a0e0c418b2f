//! CLI command implementations

pub mod analytics;
pub mod auth;
pub mod contact;
pub mod projects;
pub mod skills;
