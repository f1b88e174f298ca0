//! Role-scoped shells and the portal's path router
//!
//! Each role gets a shell: a base path, the sidebar entries, and the screens
//! mounted under it. [`navigate`] combines the route guard with the shells to
//! decide what a path renders for the current user.

mod navigation;

pub use navigation::*;

use serde::Serialize;

use crate::auth::{Role, SessionManager};

/// A feature screen mounted inside a shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Screen {
    /// Path segment under the shell's base path, empty for the index screen
    pub segment: &'static str,
    /// Sidebar label
    pub title: &'static str,
}

const fn screen(segment: &'static str, title: &'static str) -> Screen {
    Screen { segment, title }
}

const ADMIN_SCREENS: &[Screen] = &[
    screen("", "Dashboard"),
    screen("classes", "Classes"),
    screen("examinations", "Examinations"),
    screen("notices", "Notices"),
    screen("subjects", "Subjects"),
    screen("teachers", "Teachers"),
];

const TEACHER_SCREENS: &[Screen] = &[
    screen("", "Dashboard"),
    screen("assignments", "Assignments"),
    screen("attendance", "Attendance"),
    screen("communication", "Communication"),
    screen("feedback", "Feedback"),
    screen("marks", "Marks Entry"),
    screen("reports", "Reports"),
    screen("schedule", "Schedule"),
];

const STUDENT_SCREENS: &[Screen] = &[
    screen("", "Dashboard"),
    screen("assignments", "Assignments"),
    screen("attendance", "Attendance"),
    screen("chat", "Chat/Support"),
    screen("schedule", "Schedule"),
    screen("downloads", "Downloads"),
    screen("feedback", "Feedback"),
    screen("results", "Marks & Results"),
    screen("notifications", "Notifications"),
    screen("performance", "Performance"),
];

/// Persistent chrome for one role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    role: Role,
}

impl Shell {
    pub fn for_role(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// `/admin`, `/teacher` or `/student`
    pub fn base_path(&self) -> &'static str {
        home_path(self.role)
    }

    pub fn title(&self) -> &'static str {
        match self.role {
            Role::Admin => "Admin Portal",
            Role::Teacher => "Teacher Portal",
            Role::Student => "Student Portal",
        }
    }

    pub fn screens(&self) -> &'static [Screen] {
        match self.role {
            Role::Admin => ADMIN_SCREENS,
            Role::Teacher => TEACHER_SCREENS,
            Role::Student => STUDENT_SCREENS,
        }
    }

    /// Full path of a screen in this shell
    pub fn path_of(&self, screen: &Screen) -> String {
        if screen.segment.is_empty() {
            self.base_path().to_string()
        } else {
            format!("{}/{}", self.base_path(), screen.segment)
        }
    }

    /// Find the screen for the part of the path after the base path
    pub fn resolve(&self, rest: &str) -> Option<&'static Screen> {
        let rest = rest.trim_matches('/');
        self.screens().iter().find(|s| s.segment == rest)
    }

    /// Shell owning a path prefix, if any
    pub fn for_path(path: &str) -> Option<(Shell, &str)> {
        Role::ALL.into_iter().find_map(|role| {
            let base = home_path(role);
            let rest = path.strip_prefix(base)?;
            if rest.is_empty() || rest.starts_with('/') {
                Some((Shell::for_role(role), rest))
            } else {
                None
            }
        })
    }

    /// Top bar logout: end the session, then re-evaluate where the user is
    pub async fn logout(&self, manager: &SessionManager, current_path: &str) -> Navigation {
        manager.logout().await;
        let user = manager.current_user().await;
        navigate(current_path, user.as_ref())
    }
}

/// Landing path after login
pub fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::Teacher => "/teacher",
        Role::Student => "/student",
    }
}
