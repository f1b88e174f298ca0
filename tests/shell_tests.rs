//! Route guard and role-scoped shell navigation

use std::sync::Arc;

use smartcollege::auth::{check, GuardDecision, LocalAuthBackend, MemoryStore, TokenIssuer};
use smartcollege::shell::{follow, home_path, navigate, Navigation, Shell};
use smartcollege::{Role, SessionManager, User};

fn user(role: Role) -> User {
    User::new(role.as_str(), role, format!("{} user", role))
}

#[test]
fn test_guard_table() {
    for required in [None, Some(Role::Admin), Some(Role::Teacher), Some(Role::Student)] {
        assert_eq!(check(None, required), GuardDecision::RedirectToLogin);
    }

    let teacher = user(Role::Teacher);
    assert_eq!(
        check(Some(&teacher), Some(Role::Admin)),
        GuardDecision::RedirectToUnauthorized
    );
    assert_eq!(check(Some(&teacher), Some(Role::Teacher)), GuardDecision::Allow);
}

#[test]
fn test_role_screens_render_for_their_role() {
    for role in Role::ALL {
        let shell = Shell::for_role(role);
        let me = user(role);
        for screen in shell.screens() {
            let path = shell.path_of(screen);
            match navigate(&path, Some(&me)) {
                Navigation::Screen {
                    role: rendered_role,
                    path: rendered_path,
                    screen: rendered,
                } => {
                    assert_eq!(rendered_role, role);
                    assert_eq!(rendered_path, path);
                    assert_eq!(&rendered, screen);
                }
                other => panic!("{} should render, got {:?}", path, other),
            }
        }
    }
}

#[test]
fn test_other_roles_are_sent_to_unauthorized() {
    let student = user(Role::Student);
    assert_eq!(
        navigate("/admin/classes", Some(&student)),
        Navigation::Redirect {
            to: "/unauthorized".to_string()
        }
    );
    assert_eq!(
        navigate("/teacher", Some(&student)),
        Navigation::Redirect {
            to: "/unauthorized".to_string()
        }
    );
}

#[test]
fn test_anonymous_is_sent_to_login() {
    for role in Role::ALL {
        assert_eq!(
            follow(home_path(role), None),
            Navigation::LoginPage,
            "{}",
            role
        );
    }
}

#[test]
fn test_student_results_screen() {
    let student = user(Role::Student);
    match navigate("/student/results", Some(&student)) {
        Navigation::Screen { screen, .. } => assert_eq!(screen.title, "Marks & Results"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_shell_logout_redirects_to_login() {
    let backend =
        LocalAuthBackend::with_demo_accounts(TokenIssuer::new("shell-tests", 60, 600)).unwrap();
    let manager = SessionManager::new(Arc::new(backend), Arc::new(MemoryStore::new()));
    manager.restore().await;

    let teacher = manager.login("teacher", "teacher").await.unwrap();
    let shell = Shell::for_role(teacher.role);
    assert!(matches!(
        navigate("/teacher/attendance", Some(&teacher)),
        Navigation::Screen { .. }
    ));

    let next = shell.logout(&manager, "/teacher/attendance").await;
    assert_eq!(
        next,
        Navigation::Redirect {
            to: "/login".to_string()
        }
    );
    assert!(!manager.is_authenticated().await);
}
