use super::access::evaluate_display;
use super::domain::{Caller, Quiz, Role, Submission};
use super::facets::{CohortMatch, ManagementFilters};
use super::window::{phase, QuizPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Student listing pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentRoute {
    /// Quizzes that can still be taken: upcoming or active, not yet submitted.
    #[default]
    Default,
    Upcoming,
    Review,
}

impl StudentRoute {
    /// Accepts both route names and the legacy page paths.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_end_matches('/') {
            "" | "default" | "/student/quizzes" => Some(Self::Default),
            "upcoming" | "/student/upcoming-quizzes" => Some(Self::Upcoming),
            "review" | "/student/review-quizzes" => Some(Self::Review),
            _ => None,
        }
    }
}

/// Listing context supplied alongside the caller.
#[derive(Debug, Clone, Copy)]
pub enum BoardView<'a> {
    Student(StudentRoute),
    Manage {
        filters: &'a ManagementFilters,
        cohort_match: CohortMatch,
    },
}

pub fn student_visible(
    quiz: &Quiz,
    route: StudentRoute,
    submission: Option<&Submission>,
    now: DateTime<Utc>,
) -> bool {
    let submitted = submission.is_some_and(Submission::is_final);
    let current = phase(now, quiz.start_time, quiz.end_time);

    match route {
        StudentRoute::Review => submitted,
        StudentRoute::Upcoming => current == QuizPhase::Upcoming && !submitted,
        StudentRoute::Default => {
            matches!(current, QuizPhase::Upcoming | QuizPhase::Active) && !submitted
        }
    }
}

pub fn management_visible(
    quiz: &Quiz,
    filters: &ManagementFilters,
    cohort_match: CohortMatch,
    now: DateTime<Utc>,
) -> bool {
    if !filters.facets.matches(quiz, cohort_match) {
        return false;
    }

    match filters.status.as_deref() {
        None => true,
        Some(status) => evaluate_display(quiz, None, now).status.matches_label(status),
    }
}

/// Decides whether `quiz` appears in the caller's listing.
///
/// Students are routed by page; staff listings are facet filtered. A student
/// caller paired with a management view (or the reverse) sees nothing.
pub fn visible(
    quiz: &Quiz,
    caller: &Caller,
    view: BoardView<'_>,
    submission: Option<&Submission>,
    now: DateTime<Utc>,
) -> bool {
    match (caller.role, view) {
        (Role::Student, BoardView::Student(route)) => {
            student_visible(quiz, route, submission, now)
        }
        (
            Role::Faculty | Role::Admin,
            BoardView::Manage {
                filters,
                cohort_match,
            },
        ) => management_visible(quiz, filters, cohort_match, now),
        _ => false,
    }
}
