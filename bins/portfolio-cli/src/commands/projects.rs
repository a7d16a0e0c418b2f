//! Project commands

use crate::output::{format_count, print_json, truncate, OutputFormat, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use portfolio_api_client::endpoints::projects::{Project, ProjectDraft, ProjectUpdate};
use portfolio_api_client::ApiService;

/// Build a draft from command-line values
pub fn draft(
    title: String,
    description: String,
    tech_stack: Vec<String>,
    github: Option<String>,
    live: Option<String>,
    image: Option<String>,
) -> ProjectDraft {
    ProjectDraft {
        title,
        description,
        tech_stack,
        github_link: github,
        live_link: live,
        image_url: image,
    }
}

fn print_project(project: &Project) {
    println!(
        "{} {} {}",
        format!("#{}", project.order).dimmed(),
        project.title.bold(),
        format!("({})", project.id).dimmed()
    );
    println!("    {}", truncate(&project.description, 72));
    if !project.tech_stack.is_empty() {
        println!("    {}", project.tech_stack.join(", ").cyan());
    }
    for link in [&project.github_link, &project.live_link].into_iter().flatten() {
        println!("    {}", link.underline());
    }
}

/// List projects in display order
pub async fn list(api: &ApiService, format: OutputFormat) -> Result<()> {
    let projects = api.projects().list().await?;

    if format.is_json() {
        return print_json(&projects);
    }

    Status::header(&format_count(projects.len(), "project", "projects"));
    for project in &projects {
        print_project(project);
    }
    Ok(())
}

/// Show one project
pub async fn get(api: &ApiService, id: &str, format: OutputFormat) -> Result<()> {
    let project = api.projects().get(id).await?;

    if format.is_json() {
        return print_json(&project);
    }

    print_project(&project);
    Ok(())
}

/// Create a project
pub async fn create(api: &ApiService, draft: &ProjectDraft, format: OutputFormat) -> Result<()> {
    let created = api.projects().create(draft).await?;

    if format.is_json() {
        return print_json(&created);
    }

    Status::success(&format!("{} (id {})", created.message, created.id));
    Ok(())
}

/// Update a project
pub async fn update(
    api: &ApiService,
    id: &str,
    changes: &ProjectUpdate,
    format: OutputFormat,
) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("Nothing to update; pass at least one field");
    }

    let ack = api.projects().update(id, changes).await?;

    if format.is_json() {
        return print_json(&ack);
    }

    Status::success(&ack.message);
    Ok(())
}

/// Delete a project
pub async fn delete(api: &ApiService, id: &str, format: OutputFormat) -> Result<()> {
    api.projects().delete(id).await?;

    if format.is_json() {
        return print_json(&serde_json::json!({"deleted": id}));
    }

    Status::success(&format!("Deleted project {id}"));
    Ok(())
}
