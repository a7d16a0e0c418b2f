//! Analytics commands

use crate::output::{format_count, print_json, OutputFormat, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use portfolio_api_client::ApiService;
use serde_json::json;

/// Longest bar drawn for the busiest day
const BAR_WIDTH: u64 = 30;

/// Show aggregate stats
pub async fn dashboard(api: &ApiService, days: Option<u32>, format: OutputFormat) -> Result<()> {
    let stats = api.analytics().dashboard(days).await?;

    if format.is_json() {
        return print_json(&stats);
    }

    Status::header(&format!("Analytics: {}", stats.period));
    println!("  {:<16} {}", "Page views".dimmed(), stats.total_page_views.bold());
    println!("  {:<16} {}", "Project clicks".dimmed(), stats.total_project_clicks.bold());
    println!("  {:<16} {}", "Visitors".dimmed(), stats.unique_visitors.bold());

    if !stats.page_views_by_page.is_empty() {
        println!();
        println!("{}", "Top pages".bold());
        for entry in &stats.page_views_by_page {
            println!(
                "  {:<24} {}",
                entry.page.as_deref().unwrap_or("(unknown)"),
                entry.views
            );
        }
    }

    if !stats.popular_projects.is_empty() {
        println!();
        println!("{}", "Popular projects".bold());
        for entry in &stats.popular_projects {
            let title = entry
                .title
                .as_deref()
                .or(entry.project_id.as_deref())
                .unwrap_or("(unknown)");
            let clicks = usize::try_from(entry.clicks).unwrap_or(usize::MAX);
            println!("  {:<24} {}", title, format_count(clicks, "click", "clicks"));
        }
    }

    if !stats.daily_views.is_empty() {
        println!();
        println!("{}", "Daily views".bold());
        let peak = stats.daily_views.iter().map(|d| d.views).max().unwrap_or(0).max(1);
        for day in &stats.daily_views {
            let width = usize::try_from(day.views * BAR_WIDTH / peak).unwrap_or(0);
            println!("  {} {} {}", day.date.dimmed(), "█".repeat(width).green(), day.views);
        }
    }
    Ok(())
}

/// Show recent events
pub async fn events(api: &ApiService, limit: Option<u32>, format: OutputFormat) -> Result<()> {
    let events = api.analytics().recent_events(limit).await?;

    if format.is_json() {
        return print_json(&events);
    }

    Status::header(&format_count(events.len(), "event", "events"));
    for event in &events {
        let subject = event
            .detail("page")
            .or_else(|| event.detail("project_title"))
            .or_else(|| event.detail("project_id"))
            .unwrap_or("");
        println!(
            "  {} {:<14} {}",
            event.timestamp.dimmed(),
            event.event_type.cyan(),
            subject
        );
    }
    Ok(())
}

/// Record a page view; never fails
pub async fn track(api: &ApiService, page: &str, format: OutputFormat) -> Result<()> {
    api.analytics().track_page_view(page).await;

    if format.is_json() {
        return print_json(&json!({"page": page}));
    }

    Status::info(&format!("Page view for '{page}' submitted"));
    Ok(())
}
