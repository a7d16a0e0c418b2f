//! Analytics endpoints
//!
//! Tracking calls are fire-and-forget: a failure is logged and dropped so
//! analytics can never break the page that triggered them. The read-only
//! dashboard queries propagate errors like every other endpoint.

use crate::client::ApiService;
use crate::error::ApiResult;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Days covered by the dashboard when not specified
pub const DEFAULT_DASHBOARD_DAYS: u32 = 30;

/// Number of recent events returned when not specified
pub const DEFAULT_EVENT_LIMIT: u32 = 50;

/// Analytics API interface
#[derive(Clone)]
pub struct AnalyticsApi {
    client: ApiService,
}

impl AnalyticsApi {
    /// Create a new analytics API interface
    pub(crate) fn new(client: ApiService) -> Self {
        Self { client }
    }

    /// Record a page view. Never fails.
    ///
    /// POST /analytics/track
    pub async fn track_page_view(&self, page: &str) {
        match self.track(&TrackEvent::PageView { page }).await {
            Ok(()) => debug!(page, "Page view tracked"),
            Err(e) => warn!(page, status = e.status, error = %e, "Failed to track page view"),
        }
    }

    /// Record a click on a project card. Never fails.
    ///
    /// POST /analytics/track
    pub async fn track_project_click(&self, project_id: &str, project_title: &str) {
        let event = TrackEvent::ProjectClick {
            project_id,
            project_title,
        };
        match self.track(&event).await {
            Ok(()) => debug!(project_id, "Project click tracked"),
            Err(e) => warn!(
                project_id,
                status = e.status,
                error = %e,
                "Failed to track project click"
            ),
        }
    }

    async fn track(&self, event: &TrackEvent<'_>) -> ApiResult<()> {
        self.client
            .post::<IgnoredAny, _>("analytics/track", event)
            .await
            .map(|_| ())
    }

    /// Aggregate stats over the last `days` days (default 30)
    ///
    /// GET /analytics/dashboard?days=N
    pub async fn dashboard(&self, days: Option<u32>) -> ApiResult<DashboardStats> {
        let days = days.unwrap_or(DEFAULT_DASHBOARD_DAYS);
        self.client
            .get_with_query("analytics/dashboard", &[("days", days.to_string())])
            .await
    }

    /// Most recent events, newest first (default 50)
    ///
    /// GET /analytics/events?limit=N
    pub async fn recent_events(&self, limit: Option<u32>) -> ApiResult<Vec<AnalyticsEvent>> {
        let limit = limit.unwrap_or(DEFAULT_EVENT_LIMIT);
        let response: EventList = self
            .client
            .get_with_query("analytics/events", &[("limit", limit.to_string())])
            .await?;
        Ok(response.events)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TrackEvent<'a> {
    PageView {
        page: &'a str,
    },
    ProjectClick {
        project_id: &'a str,
        project_title: &'a str,
    },
}

/// Aggregate dashboard numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Human-readable period, e.g. "Last 30 days"
    pub period: String,
    pub total_page_views: u64,
    pub total_project_clicks: u64,
    pub unique_visitors: u64,
    #[serde(default)]
    pub page_views_by_page: Vec<PageViews>,
    #[serde(default)]
    pub popular_projects: Vec<PopularProject>,
    /// Views per day over the last week
    #[serde(default)]
    pub daily_views: Vec<DailyViews>,
}

/// View count for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViews {
    pub page: Option<String>,
    pub views: u64,
}

/// Click count for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularProject {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub clicks: u64,
}

/// View count for one day (`YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
}

/// Stored analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: String,
    /// `page_view` or `project_click`
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: String,
    /// Event-specific fields (page, referrer, project id, ...)
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl AnalyticsEvent {
    /// String value of an event-specific field
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

#[derive(Deserialize)]
struct EventList {
    events: Vec<AnalyticsEvent>,
}
