//! Skill commands

use crate::output::{format_count, print_json, OutputFormat, Status};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use portfolio_api_client::endpoints::skills::{Proficiency, Skill, SkillDraft, SkillListing};
use portfolio_api_client::ApiService;
use std::fs;
use std::path::Path;

fn print_skill(skill: &Skill) {
    println!(
        "  {:<24} {:<13} {}",
        skill.name,
        skill.proficiency.as_str().cyan(),
        skill.id.dimmed()
    );
}

/// List skills grouped by category or flat
pub async fn list(api: &ApiService, grouped: bool, format: OutputFormat) -> Result<()> {
    let listing = api.skills().list(grouped).await?;

    if format.is_json() {
        return match listing {
            SkillListing::Grouped(ref groups) => print_json(groups),
            SkillListing::Flat(ref skills) => print_json(skills),
        };
    }

    Status::header(&format_count(listing.len(), "skill", "skills"));
    match listing {
        SkillListing::Grouped(groups) => {
            for (category, skills) in &groups {
                println!("{}", category.bold());
                skills.iter().for_each(print_skill);
            }
        }
        SkillListing::Flat(skills) => {
            for skill in &skills {
                print!("{:<12} ", skill.category.dimmed());
                print_skill(skill);
            }
        }
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<Proficiency> {
    Proficiency::parse(level).with_context(|| {
        let known: Vec<&str> = Proficiency::LEVELS.iter().map(|l| l.as_str()).collect();
        format!("unknown level '{level}', expected one of {}", known.join(", "))
    })
}

/// Add a skill
pub async fn add(
    api: &ApiService,
    name: String,
    category: String,
    level: &str,
    format: OutputFormat,
) -> Result<()> {
    let draft = SkillDraft::new(name, category, parse_level(level)?);
    let created = api.skills().create(&draft).await?;

    if format.is_json() {
        return print_json(&created);
    }

    Status::success(&format!("{} (id {})", created.message, created.id));
    Ok(())
}

/// Delete a skill
pub async fn delete(api: &ApiService, id: &str, format: OutputFormat) -> Result<()> {
    api.skills().delete(id).await?;

    if format.is_json() {
        return print_json(&serde_json::json!({"deleted": id}));
    }

    Status::success(&format!("Deleted skill {id}"));
    Ok(())
}

/// Insert every skill listed in a JSON file in one request
pub async fn batch(api: &ApiService, file: &Path, format: OutputFormat) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let drafts: Vec<SkillDraft> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of skills", file.display()))?;

    if drafts.is_empty() {
        anyhow::bail!("{} contains no skills", file.display());
    }

    let created = api.skills().create_batch(&drafts).await?;

    if format.is_json() {
        return print_json(&created);
    }

    Status::success(&format!(
        "Inserted {}",
        format_count(created.count, "skill", "skills")
    ));
    Ok(())
}
