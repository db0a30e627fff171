//! Command handlers for agent registration, search and identity info.
use anyhow::{Context, Result};

use crate::credentials;
use crate::types::AgentCredentials;

use super::super::context::CommandContext;

pub async fn register(parts: &[&str], context: &CommandContext) -> Result<()> {
    if parts.len() < 2 {
        context.say("Usage: register <name> [description...]");
        return Ok(());
    }

    let description = parts[2..].join(" ");
    let description = (!description.is_empty()).then_some(description.as_str());
    register_agent(context, parts[1], description).await?;
    Ok(())
}

/// Registers an agent, prints its credentials and saves them next to the data directory.
///
/// # Errors
///
/// Returns an error if registration fails or the credentials file cannot be written.
pub async fn register_agent(
    context: &CommandContext,
    name: &str,
    description: Option<&str>,
) -> Result<AgentCredentials> {
    // The name becomes a file name; reject it before anything is registered.
    let path = credentials::credentials_path(context.data_dir(), name)?;
    let logger = context.logger();
    logger.info(&format!("Registering agent as '{}'...", name), Some("Registration"));

    let creds = match context.network().register_agent(name, description).await {
        Ok(creds) => creds,
        Err(e) => {
            logger.error(&format!("Agent registration failed: {}", e), Some("Registration"));
            return Err(e.into());
        }
    };

    context.say(format!(
        "\nIMPORTANT: Save these credentials for future use:\n  Account ID: {}\n  Private Key: {}",
        creds.account_id, creds.private_key
    ));

    credentials::save(&path, &creds)
        .with_context(|| format!("failed to save credentials to {}", path.display()))?;
    logger.info(
        &format!("Credentials saved to {}", path.display()),
        Some("Registration"),
    );

    Ok(creds)
}

pub async fn search(parts: &[&str], context: &CommandContext) -> Result<()> {
    if parts.len() < 2 {
        context.say("Usage: search <query>");
        return Ok(());
    }

    let query = parts[1..].join(" ");
    let results = context.network().find_agents(&query).await?;
    context.logger().search_results(&results, &query);
    Ok(())
}

pub async fn show_info(context: &CommandContext) -> Result<()> {
    let account = context
        .network()
        .active_account()
        .await
        .unwrap_or_else(|| "(none, use 'register')".to_string());

    context.say(format!(
        "Network: {}\nActive account: {}\nLibrary output: {}",
        context.network().network_name(),
        account,
        if context.relay().is_installed() {
            "classified"
        } else {
            "passthrough"
        }
    ));
    Ok(())
}
