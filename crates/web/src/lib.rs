//! Framework-independent UI state for the portfolio site
//!
//! This crate holds the parts of the front end that carry behaviour rather
//! than markup:
//! - An error boundary that swaps in a fallback view when rendering fails
//! - Contact form state and submission
//! - Skills and projects sections with their loading states
//! - Page-view tracking
//!
//! Views are plain [`View`] trees so they can be inspected in tests or turned
//! into HTML by an embedder.

#![warn(missing_docs)]

pub mod boundary;
pub mod contact;
pub mod sections;
pub mod view;

pub use boundary::{
    component, render_child, with_error_boundary, ActionOutcome, BoundaryState, Component,
    ErrorBoundary, FallbackAction, RenderError, RenderFailure,
};
pub use contact::{ContactForm, FormStatus, StatusKind};
pub use sections::{Loadable, PageTracker, ProjectsSection, SkillsSection};
pub use view::{Element, View};
