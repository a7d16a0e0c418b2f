//! Error boundary for component trees
//!
//! [`ErrorBoundary`] supervises a render attempt. When its child fails to
//! render, either by returning a [`RenderError`] or by panicking, the
//! boundary records the failure, logs it and shows a fallback view instead.
//! It stays failed until [`ErrorBoundary::reset`] or
//! [`ErrorBoundary::try_again`] is called; nothing clears it automatically.
//!
//! Only the render phase is supervised. Failures in async tasks, event
//! handlers or timers started by a component are not caught here.

use crate::view::{Element, View};
use portfolio_api_client::Environment;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::error;

/// Heading of the default fallback view
pub const FALLBACK_HEADING: &str = "Oops!";

/// Sub-heading of the default fallback view
pub const FALLBACK_TITLE: &str = "Something went wrong";

/// Apology shown in the default fallback view
pub const FALLBACK_APOLOGY: &str = "We're sorry for the inconvenience. Please try refreshing the page or contact support if the problem persists.";

/// Failure raised while rendering a component
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The component reported an error
    #[error("{0}")]
    Failed(String),
    /// The component panicked
    #[error("render panicked: {0}")]
    Panicked(String),
}

impl RenderError {
    /// Create a reported render failure
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::Panicked(message)
    }
}

/// Something that renders into a [`View`]
pub trait Component {
    /// Name shown in component stacks
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Produce the view for the current state
    fn render(&self) -> Result<View, RenderError>;
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&self) -> Result<View, RenderError> {
        (**self).render()
    }
}

/// A component backed by a closure
pub struct FnComponent<F> {
    name: String,
    render: F,
}

/// Wrap a closure as a named component
pub fn component<F>(name: impl Into<String>, render: F) -> FnComponent<F>
where
    F: Fn() -> Result<View, RenderError>,
{
    FnComponent {
        name: name.into(),
        render,
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn() -> Result<View, RenderError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> Result<View, RenderError> {
        (self.render)()
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ----------------------------------------------------------------------------
// Component stack tracking
// ----------------------------------------------------------------------------

thread_local! {
    static RENDER_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static FAILED_CHAIN: RefCell<Option<FailedChain>> = const { RefCell::new(None) };
}

/// What made a scope record its chain
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cause {
    Panic,
    Error(RenderError),
}

/// Component chain open when a failure left a scope
#[derive(Debug)]
struct FailedChain {
    chain: Vec<String>,
    cause: Cause,
}

/// Marks a component as being rendered for the duration of its lifetime
struct RenderScope;

impl RenderScope {
    fn enter(name: &str) -> Self {
        RENDER_STACK.with(|stack| stack.borrow_mut().push(name.to_string()));
        Self
    }
}

impl Drop for RenderScope {
    fn drop(&mut self) {
        if std::thread::panicking() {
            record_failed_chain(Cause::Panic);
        }
        RENDER_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Record the current chain unless an inner scope already recorded the same
/// failure on its way out.
fn record_failed_chain(cause: Cause) {
    let chain = RENDER_STACK.with(|stack| stack.borrow().clone());
    FAILED_CHAIN.with(|failed| {
        let mut failed = failed.borrow_mut();
        let propagated = failed.as_ref().is_some_and(|inner| {
            inner.cause == cause && inner.chain.len() > chain.len() && inner.chain.starts_with(&chain)
        });
        if !propagated {
            *failed = Some(FailedChain { chain, cause });
        }
    });
}

fn take_failed_chain() -> Option<Vec<String>> {
    FAILED_CHAIN.with(|failed| failed.borrow_mut().take().map(|failed| failed.chain))
}

/// Render a child component, tracking it in the component stack.
///
/// Parents should render their children through this so a failure deep in
/// the tree reports which chain of components it happened in. A parent may
/// recover from a child's error and keep rendering; the recovered chain is
/// forgotten as soon as the next child starts or the parent succeeds.
pub fn render_child<C: Component + ?Sized>(child: &C) -> Result<View, RenderError> {
    take_failed_chain();
    let _scope = RenderScope::enter(child.name());
    let result = child.render();
    match result {
        Ok(_) => {
            take_failed_chain();
        }
        Err(ref error) => record_failed_chain(Cause::Error(error.clone())),
    }
    result
}

fn format_component_stack(chain: &[String]) -> String {
    chain
        .iter()
        .rev()
        .map(|name| format!("\n    in {name}"))
        .collect()
}

// ----------------------------------------------------------------------------
// Boundary
// ----------------------------------------------------------------------------

/// Captured render failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    /// What went wrong
    pub error: RenderError,
    /// Components open when the failure happened, innermost first
    pub component_stack: Option<String>,
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(ref stack) = self.component_stack {
            f.write_str(stack)?;
        }
        Ok(())
    }
}

/// Boundary state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoundaryState {
    /// Children render normally
    #[default]
    Healthy,
    /// A child failed; the fallback is shown
    Failed(RenderFailure),
}

/// Actions offered by the default fallback view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAction {
    /// Restart the whole application
    RefreshPage,
    /// Clear the failure and render the children again
    TryAgain,
}

impl FallbackAction {
    /// Value of the `data-action` attribute on the fallback button
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RefreshPage => "refresh-page",
            Self::TryAgain => "try-again",
        }
    }

    /// Button label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RefreshPage => "Refresh Page",
            Self::TryAgain => "Try Again",
        }
    }
}

/// Result of handling a fallback action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The boundary rendered again
    Rendered(View),
    /// The embedder should restart the application
    ReloadRequested,
}

type Reporter = Box<dyn Fn(&RenderFailure)>;

/// Supervises rendering of a child component
pub struct ErrorBoundary<C> {
    child: C,
    fallback: Option<View>,
    show_details: bool,
    reporter: Option<Reporter>,
    state: BoundaryState,
}

impl<C: fmt::Debug> fmt::Debug for ErrorBoundary<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBoundary")
            .field("child", &self.child)
            .field("fallback", &self.fallback)
            .field("show_details", &self.show_details)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C: Component> ErrorBoundary<C> {
    /// Wrap a child with the default fallback
    pub fn new(child: C) -> Self {
        Self {
            child,
            fallback: None,
            show_details: false,
            reporter: None,
            state: BoundaryState::Healthy,
        }
    }

    /// Show this view verbatim instead of the default fallback
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<View>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Include technical details in the default fallback
    #[must_use]
    pub fn with_details(mut self, show: bool) -> Self {
        self.show_details = show;
        self
    }

    /// Show technical details only in development
    #[must_use]
    pub fn for_environment(self, environment: Environment) -> Self {
        self.with_details(environment.is_development())
    }

    /// Also hand every captured failure to an error-reporting sink
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Fn(&RenderFailure) + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    /// Whether the fallback is being shown
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, BoundaryState::Failed(_))
    }

    /// The captured failure, if any
    #[must_use]
    pub fn failure(&self) -> Option<&RenderFailure> {
        match self.state {
            BoundaryState::Failed(ref failure) => Some(failure),
            BoundaryState::Healthy => None,
        }
    }

    /// The supervised child
    pub fn child(&self) -> &C {
        &self.child
    }

    /// Mutable access to the supervised child
    pub fn child_mut(&mut self) -> &mut C {
        &mut self.child
    }

    /// Render the child, or the fallback if it has failed.
    ///
    /// While failed the child is not rendered again.
    pub fn render(&mut self) -> View {
        if let BoundaryState::Failed(ref failure) = self.state {
            return self.fallback_view(failure);
        }

        take_failed_chain();
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| render_child(&self.child)));
        let error = match attempt {
            Ok(Ok(view)) => return view,
            Ok(Err(error)) => error,
            Err(payload) => RenderError::from_panic(payload.as_ref()),
        };

        let failure = RenderFailure {
            error,
            component_stack: take_failed_chain().map(|chain| format_component_stack(&chain)),
        };

        error!(
            component = self.child.name(),
            error = %failure.error,
            component_stack = failure.component_stack.as_deref().unwrap_or(""),
            "ErrorBoundary caught an error"
        );
        if let Some(ref reporter) = self.reporter {
            reporter(&failure);
        }

        let view = self.fallback_view(&failure);
        self.state = BoundaryState::Failed(failure);
        view
    }

    /// Clear the failure; the next [`render`](Self::render) tries the child again
    pub fn reset(&mut self) {
        self.state = BoundaryState::Healthy;
    }

    /// Clear the failure and render again right away
    pub fn try_again(&mut self) -> View {
        self.reset();
        self.render()
    }

    /// Handle a click on one of the fallback actions
    pub fn handle(&mut self, action: FallbackAction) -> ActionOutcome {
        match action {
            FallbackAction::TryAgain => ActionOutcome::Rendered(self.try_again()),
            FallbackAction::RefreshPage => ActionOutcome::ReloadRequested,
        }
    }

    fn fallback_view(&self, failure: &RenderFailure) -> View {
        match self.fallback {
            Some(ref fallback) => fallback.clone(),
            None => default_fallback(failure, self.show_details),
        }
    }
}

/// Wrap a component in a boundary, optionally with a custom fallback
pub fn with_error_boundary<C: Component>(child: C, fallback: Option<View>) -> ErrorBoundary<C> {
    let boundary = ErrorBoundary::new(child);
    match fallback {
        Some(view) => boundary.with_fallback(view),
        None => boundary,
    }
}

fn action_button(action: FallbackAction, class: &str) -> Element {
    Element::new("button")
        .class(class)
        .attr("data-action", action.as_str())
        .child(action.label())
}

/// The apology view shown when no custom fallback is supplied
#[must_use]
pub fn default_fallback(failure: &RenderFailure, show_details: bool) -> View {
    let mut body = Element::new("div")
        .class("text-center")
        .child(Element::new("h1").child(FALLBACK_HEADING))
        .child(Element::new("h2").child(FALLBACK_TITLE))
        .child(Element::new("p").child(FALLBACK_APOLOGY));

    if show_details {
        body = body.child(
            Element::new("details")
                .class("error-details")
                .child(Element::new("summary").child("Error Details (Development Only)"))
                .child(Element::new("pre").child(failure.to_string())),
        );
    }

    body = body.child(
        Element::new("div")
            .class("actions")
            .child(action_button(FallbackAction::RefreshPage, "btn-primary"))
            .child(action_button(FallbackAction::TryAgain, "btn-secondary")),
    );

    Element::new("div")
        .class("error-boundary")
        .attr("role", "alert")
        .child(body)
        .into()
}
