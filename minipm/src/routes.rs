//! Deep-link routes.
//!
//! `minipm://` URLs address the three screens: the project list, one
//! project's board, and one task's detail view. Parsing is strict — a
//! foreign scheme, an unknown path shape, or an empty id segment all yield
//! `None` rather than a best-effort route.

use std::fmt;

pub const SCHEME: &str = "minipm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `minipm://projects`
    ProjectList,
    /// `minipm://projects/{projectId}`
    Board { project_id: String },
    /// `minipm://projects/{projectId}/tasks/{taskId}`
    TaskDetails {
        project_id: String,
        task_id: String,
    },
}

impl Route {
    pub fn parse(url: &str) -> Option<Route> {
        let rest = url.strip_prefix(SCHEME)?.strip_prefix("://")?;
        let segments: Vec<&str> = rest
            .trim_end_matches('/')
            .split('/')
            .collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        match segments.as_slice() {
            ["projects"] => Some(Route::ProjectList),
            ["projects", project_id] => Some(Route::Board {
                project_id: (*project_id).to_string(),
            }),
            ["projects", project_id, "tasks", task_id] => Some(Route::TaskDetails {
                project_id: (*project_id).to_string(),
                task_id: (*task_id).to_string(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::ProjectList => write!(f, "{SCHEME}://projects"),
            Route::Board { project_id } => write!(f, "{SCHEME}://projects/{project_id}"),
            Route::TaskDetails {
                project_id,
                task_id,
            } => write!(f, "{SCHEME}://projects/{project_id}/tasks/{task_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_three_screens() {
        assert_eq!(Route::parse("minipm://projects"), Some(Route::ProjectList));
        assert_eq!(
            Route::parse("minipm://projects/p1"),
            Some(Route::Board {
                project_id: "p1".into()
            })
        );
        assert_eq!(
            Route::parse("minipm://projects/p1/tasks/t9"),
            Some(Route::TaskDetails {
                project_id: "p1".into(),
                task_id: "t9".into()
            })
        );
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        assert_eq!(Route::parse("minipm://projects/"), Some(Route::ProjectList));
    }

    #[test]
    fn test_rejects_foreign_and_malformed_urls() {
        assert_eq!(Route::parse("https://projects"), None);
        assert_eq!(Route::parse("minipm://boards/p1"), None);
        assert_eq!(Route::parse("minipm://projects/p1/tasks"), None);
        assert_eq!(Route::parse("minipm://projects//tasks/t9"), None);
        assert_eq!(Route::parse("minipm://"), None);
    }

    #[test]
    fn test_display_round_trips() {
        for route in [
            Route::ProjectList,
            Route::Board {
                project_id: "abc".into(),
            },
            Route::TaskDetails {
                project_id: "abc".into(),
                task_id: "def".into(),
            },
        ] {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }
    }
}
