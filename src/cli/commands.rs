//! CLI command implementations

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::time::Duration;

use crate::auth::{self, SessionManager};
use crate::cli::{error, info, print_navigation, print_session, print_shell, success, warn, OutputFormat};
use crate::client::ApiClient;
use crate::config::{self, Config};
use crate::shell::{self, Shell};

/// Initialize a new smartcollege.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("smartcollege.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created smartcollege.toml");
    info("Set the backend base_url, then run 'smartcollege login'");

    Ok(())
}

/// Log in and persist the session
pub async fn login(username: Option<String>, password: Option<String>) -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;

    let username = match username {
        Some(username) => username,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!("Signing in as {}", username));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = manager.login(&username, &password).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(user) => {
            success(&format!("Logged in as {} ({})", user.name, user.role));
            info(&format!("Home: {}", shell::home_path(user.role)));
            Ok(())
        }
        Err(e) => {
            error(&e.user_message());
            Err(e.into())
        }
    }
}

/// Forget the stored session
pub async fn logout() -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;

    let was_logged_in = manager.is_authenticated().await;
    manager.logout().await;

    if was_logged_in {
        success("Logged out");
    } else {
        info("No active session");
    }
    Ok(())
}

/// Show the current session
pub async fn whoami(format: OutputFormat, remote: bool) -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;

    let Some(mut session) = manager.session().await else {
        info("Not logged in. Run 'smartcollege login'");
        return Ok(());
    };

    if remote {
        let client = ApiClient::new(config.backend.clone(), manager)?;
        let user = client.profile().await?;
        // The request may have refreshed the access token
        if let Some(current) = client.session().session().await {
            session = current;
        }
        session.user = user;
    }

    match format {
        OutputFormat::Table => print_session(&session),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&session.user)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&session.user)?);
        }
    }
    Ok(())
}

/// Refresh the access token
pub async fn refresh() -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;

    match manager.refresh_token().await {
        Ok(_) => {
            success("Access token refreshed");
            Ok(())
        }
        Err(e) => {
            error(&e.user_message());
            warn("Session cleared, log in again");
            Err(e.into())
        }
    }
}

/// List the logged-in role's screens
pub async fn routes() -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;

    match manager.role().await {
        Some(role) => print_shell(&Shell::for_role(role)),
        None => info("Not logged in. Run 'smartcollege login'"),
    }
    Ok(())
}

/// Resolve a portal path for the current session
pub async fn open(path: &str) -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;
    let user = manager.current_user().await;

    let first = shell::navigate(path, user.as_ref());
    print_navigation(path, &first);

    if matches!(first, shell::Navigation::Redirect { .. }) {
        let last = shell::follow(path, user.as_ref());
        print_navigation(path, &last);
    }
    Ok(())
}

/// Send an authenticated request and print the JSON answer
pub async fn request(method: &str, path: &str, body: Option<String>) -> Result<()> {
    let config = load_config()?;
    let manager = restored_session(&config).await?;

    if !manager.is_authenticated().await {
        bail!("Not logged in. Run 'smartcollege login'");
    }

    let method = reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {}", method))?;
    let body = body
        .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
        .transpose()
        .context("Request body is not valid JSON")?;

    let client = ApiClient::new(config.backend.clone(), manager)?;
    let response: serde_json::Value = client.json(method, path, body.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Start the local demo authentication server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting demo authentication server on {}:{}", host, port));
    info("Accounts: admin/admin, teacher/teacher, student/student");

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

// Helper functions

fn load_config() -> Result<Config> {
    config::load_config_or_default().map_err(|e| anyhow::anyhow!("{}", e))
}

async fn restored_session(config: &Config) -> Result<SessionManager> {
    let manager = auth::session_from_config(config)?;
    manager.restore().await;
    Ok(manager)
}
