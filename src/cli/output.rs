//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{Role, Session};
use crate::shell::{Navigation, Shell};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Red,
        Role::Teacher => Color::Yellow,
        Role::Student => Color::Green,
    }
}

fn token_state(token: &Option<String>) -> &'static str {
    if token.is_some() {
        "present"
    } else {
        "missing"
    }
}

/// Print the current session
pub fn print_session(session: &Session) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Access token").fg(Color::Cyan),
            Cell::new("Refresh token").fg(Color::Cyan),
        ]);

    let user = &session.user;
    table.add_row(vec![
        Cell::new(&user.username),
        Cell::new(&user.name),
        Cell::new(user.role).fg(role_color(user.role)),
        Cell::new(user.email.as_deref().unwrap_or("-")),
        Cell::new(token_state(&session.access_token)),
        Cell::new(token_state(&session.refresh_token)),
    ]);

    println!("{table}");
}

/// Print a shell's sidebar
pub fn print_shell(shell: &Shell) {
    println!("{}", shell.title().bold().underline());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Screen").fg(Color::Cyan),
            Cell::new("Path").fg(Color::Cyan),
        ]);

    for screen in shell.screens() {
        table.add_row(vec![Cell::new(screen.title), Cell::new(shell.path_of(screen))]);
    }

    println!("{table}");
}

/// Print a navigation outcome
pub fn print_navigation(path: &str, navigation: &Navigation) {
    match navigation {
        Navigation::LoginPage => info(&format!("{} → login page", path)),
        Navigation::UnauthorizedPage => warn(&format!("{} → Unauthorized Access", path)),
        Navigation::Screen {
            role,
            path: resolved,
            screen,
        } => success(&format!(
            "{} → {} ({} portal)",
            resolved,
            screen.title.bold(),
            role
        )),
        Navigation::Redirect { to } => info(&format!("{} → redirect to {}", path, to.cyan())),
    }
}
