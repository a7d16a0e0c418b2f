//! Contact form commands

use crate::output::{format_count, print_json, truncate, OutputFormat, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use portfolio_api_client::endpoints::contact::ContactSubmission;
use portfolio_api_client::ApiService;

/// Submit the public contact form
pub async fn send(
    api: &ApiService,
    name: String,
    email: String,
    message: String,
    format: OutputFormat,
) -> Result<()> {
    let submission = ContactSubmission {
        name,
        email,
        message,
    };

    let receipt = match api.contact().submit(&submission).await {
        Ok(receipt) => receipt,
        Err(e) => {
            if let Some(ref fields) = e.field_errors {
                for (field, problem) in fields {
                    Status::error(&format!("{field}: {problem}"));
                }
            }
            return Err(e.into());
        }
    };

    if format.is_json() {
        return print_json(&receipt);
    }

    Status::success(&format!("Message sent (id {})", receipt.id));
    if !receipt.email_sent {
        Status::warning("Notification email was not sent");
    }
    Ok(())
}

/// List received messages
pub async fn list(api: &ApiService, unread_only: bool, format: OutputFormat) -> Result<()> {
    let mut contacts = api.contact().list().await?;
    if unread_only {
        contacts.retain(|contact| !contact.read);
    }

    if format.is_json() {
        return print_json(&contacts);
    }

    let unread = contacts.iter().filter(|contact| !contact.read).count();
    Status::header(&format!(
        "{} ({} unread)",
        format_count(contacts.len(), "message", "messages"),
        unread
    ));

    for contact in &contacts {
        let marker = if contact.read {
            " ".to_string()
        } else {
            "●".yellow().to_string()
        };
        println!(
            "{} {} {} <{}> {}",
            marker,
            contact.id.dimmed(),
            contact.name.bold(),
            contact.email,
            contact.created_at.dimmed()
        );
        println!("    {}", truncate(&contact.message, 72));
    }
    Ok(())
}

/// Mark a message as read
pub async fn mark_read(api: &ApiService, id: &str, format: OutputFormat) -> Result<()> {
    let ack = api.contact().mark_read(id).await?;

    if format.is_json() {
        return print_json(&ack);
    }

    Status::success(&ack.message);
    Ok(())
}
