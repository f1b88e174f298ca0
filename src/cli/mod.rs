//! CLI interface for Smart College

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "smartcollege")]
#[command(version)]
#[command(about = "Smart College portal session and routing client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new smartcollege.toml configuration file
    Init,

    /// Log in and remember the session
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(short, long, env = "SMARTCOLLEGE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Ask the backend for the profile instead of reading the stored session
        #[arg(short, long)]
        remote: bool,
    },

    /// Exchange the refresh token for a new access token
    Refresh,

    /// List the screens available to the logged-in role
    Routes,

    /// Resolve a portal path against the current session
    Open {
        /// Path such as /admin/classes
        path: String,
    },

    /// Send an authenticated request to the backend
    Request {
        /// HTTP method
        method: String,

        /// Path under the backend base URL, e.g. /api/v1/classes/
        path: String,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Start the local demo authentication server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
