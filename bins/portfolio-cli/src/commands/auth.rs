//! Session commands

use crate::output::{print_json, OutputFormat, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use portfolio_api_client::ApiService;
use serde_json::json;

/// Log in and persist the returned token
pub async fn login(api: &ApiService, username: &str, password: &str, format: OutputFormat) -> Result<()> {
    let response = api.auth().login(username, password).await?;

    if response.token.is_none() {
        anyhow::bail!(
            "{}",
            response
                .message
                .unwrap_or_else(|| "Login response carried no token".to_string())
        );
    }

    if format.is_json() {
        return print_json(&json!({
            "authenticated": true,
            "username": username,
            "message": response.message,
        }));
    }

    Status::success(&format!("Logged in as {}", username.bold()));
    Ok(())
}

/// Drop the saved token
pub fn logout(api: &ApiService, format: OutputFormat) -> Result<()> {
    let had_session = api.is_authenticated();
    api.auth().logout()?;

    if format.is_json() {
        return print_json(&json!({"authenticated": false, "had_session": had_session}));
    }

    if had_session {
        Status::success("Logged out");
    } else {
        Status::info("No saved session; nothing to do");
    }
    Ok(())
}

/// Check the saved token and show whose it is
pub async fn whoami(api: &ApiService, format: OutputFormat) -> Result<()> {
    if !api.is_authenticated() {
        anyhow::bail!("Not logged in; run `portfolio login` first");
    }

    let profile = api.auth().profile().await?;

    if format.is_json() {
        return print_json(&profile);
    }

    Status::header("Admin session");
    println!("  {:<12} {}", "Username".dimmed(), profile.username.bold());
    println!("  {:<12} {}", "Since".dimmed(), profile.created_at);
    let state = if profile.is_active {
        "active".green().to_string()
    } else {
        "disabled".red().to_string()
    };
    println!("  {:<12} {}", "Account".dimmed(), state);
    Ok(())
}
