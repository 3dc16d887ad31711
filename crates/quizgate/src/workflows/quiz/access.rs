use super::domain::{effective_status, Caller, Quiz, Role, Submission};
use super::window::{phase, QuizPhase};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Derived status shown for a quiz at a given instant. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Upcoming,
    Active,
    Expired,
    Submitted,
}

impl DisplayStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Submitted => "Submitted",
        }
    }

    pub const fn tone(self) -> &'static str {
        match self {
            Self::Upcoming => "info",
            Self::Active => "primary",
            Self::Expired => "error",
            Self::Submitted => "success",
        }
    }

    pub fn matches_label(self, value: &str) -> bool {
        self.label().eq_ignore_ascii_case(value.trim())
    }
}

/// What a student may do with a quiz right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentAction {
    ViewResults,
    Attempt,
    None,
}

/// Outcome of the student access state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub status: DisplayStatus,
    pub action: StudentAction,
    /// Time left before the quiz opens; present only while `Upcoming`.
    pub opens_in: Option<Duration>,
}

impl AccessDecision {
    /// Button label paired with the decision. Upcoming quizzes show a
    /// countdown instead of a button.
    pub const fn action_label(&self) -> Option<&'static str> {
        match (self.status, self.action) {
            (_, StudentAction::ViewResults) => Some("View Results"),
            (_, StudentAction::Attempt) => Some("Start Quiz"),
            (DisplayStatus::Expired, StudentAction::None) => Some("Expired"),
            _ => None,
        }
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.opens_in.map(Countdown)
    }
}

/// Evaluates the student-facing status of `quiz` at `now`.
///
/// A final submission dominates the clock, so a submitted quiz reads as
/// `Submitted` before, during, and after its window.
pub fn evaluate_display(
    quiz: &Quiz,
    submission: Option<&Submission>,
    now: DateTime<Utc>,
) -> AccessDecision {
    if effective_status(submission).is_final() {
        return AccessDecision {
            status: DisplayStatus::Submitted,
            action: StudentAction::ViewResults,
            opens_in: None,
        };
    }

    match phase(now, quiz.start_time, quiz.end_time) {
        QuizPhase::Upcoming => AccessDecision {
            status: DisplayStatus::Upcoming,
            action: StudentAction::None,
            opens_in: Some(quiz.start_time - now),
        },
        QuizPhase::Active => AccessDecision {
            status: DisplayStatus::Active,
            action: StudentAction::Attempt,
            opens_in: None,
        },
        QuizPhase::Expired => AccessDecision {
            status: DisplayStatus::Expired,
            action: StudentAction::None,
            opens_in: None,
        },
    }
}

/// Management permissions granted to faculty and admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManagementActions {
    pub edit: bool,
    pub delete: bool,
    pub view_statistics: bool,
}

impl ManagementActions {
    pub fn for_caller(quiz: &Quiz, caller: &Caller) -> Self {
        let owner_or_admin = caller.role == Role::Admin || quiz.is_owned_by(&caller.user_id);
        Self {
            edit: owner_or_admin,
            delete: owner_or_admin,
            view_statistics: caller.role == Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerActions {
    Student(AccessDecision),
    Manage(ManagementActions),
}

/// Role switch in front of the state machine: staff never attempt quizzes,
/// they manage them.
pub fn actions_for(
    caller: &Caller,
    quiz: &Quiz,
    submission: Option<&Submission>,
    now: DateTime<Utc>,
) -> CallerActions {
    match caller.role {
        Role::Student => CallerActions::Student(evaluate_display(quiz, submission, now)),
        Role::Faculty | Role::Admin => {
            CallerActions::Manage(ManagementActions::for_caller(quiz, caller))
        }
    }
}

/// Time remaining until a quiz opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown(pub Duration);

impl Countdown {
    /// Hour-level summary used on upcoming quiz cards.
    pub fn summary(&self) -> String {
        let (days, hours, minutes, _) = self.parts();
        if days > 0 {
            format!("{days}d {hours}h remaining")
        } else if hours > 0 {
            format!("{hours}h {minutes}m remaining")
        } else {
            format!("{minutes}m remaining")
        }
    }

    fn parts(&self) -> (i64, i64, i64, i64) {
        let total = self.0.num_seconds().max(0);
        (
            total / 86_400,
            (total % 86_400) / 3_600,
            (total % 3_600) / 60,
            total % 60,
        )
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= Duration::zero() {
            return f.write_str("Starting now...");
        }

        let (days, hours, minutes, seconds) = self.parts();
        if days > 0 {
            write!(f, "{days}d ")?;
        }
        if hours > 0 {
            write!(f, "{hours}h ")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}m ")?;
        }
        write!(f, "{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::quiz::domain::{QuizId, SubmissionId, SubmissionStatus, UserId};
    use chrono::TimeZone;

    fn quiz() -> Quiz {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start");
        Quiz {
            id: QuizId("quiz-1".to_string()),
            title: "Data Structures Midterm".to_string(),
            subject: None,
            duration_minutes: 45,
            start_time: start,
            end_time: start + Duration::hours(2),
            allowed_groups: Vec::new(),
            total_authorized_students: 30,
            total_marks: 20.0,
            created_by: Some(UserId("fac-1".to_string())),
        }
    }

    fn submission(status: SubmissionStatus) -> Submission {
        Submission {
            id: SubmissionId("sub-1".to_string()),
            quiz_id: QuizId("quiz-1".to_string()),
            student_id: UserId("stu-1".to_string()),
            status,
            answers: Vec::new(),
        }
    }

    #[test]
    fn evaluated_submission_dominates_every_phase() {
        let quiz = quiz();
        let evaluated = submission(SubmissionStatus::Evaluated);
        for now in [
            quiz.start_time - Duration::days(3),
            quiz.start_time,
            quiz.end_time + Duration::days(365),
        ] {
            let decision = evaluate_display(&quiz, Some(&evaluated), now);
            assert_eq!(decision.status, DisplayStatus::Submitted);
            assert_eq!(decision.action, StudentAction::ViewResults);
        }
    }

    #[test]
    fn in_progress_submission_follows_the_clock() {
        let quiz = quiz();
        let in_progress = submission(SubmissionStatus::InProgress);

        let active = evaluate_display(&quiz, Some(&in_progress), quiz.start_time);
        assert_eq!(active.status, DisplayStatus::Active);
        assert_eq!(active.action, StudentAction::Attempt);
        assert_eq!(active.action_label(), Some("Start Quiz"));

        let expired = evaluate_display(
            &quiz,
            Some(&in_progress),
            quiz.end_time + Duration::seconds(1),
        );
        assert_eq!(expired.status, DisplayStatus::Expired);
        assert_eq!(expired.action, StudentAction::None);
        assert_eq!(expired.action_label(), Some("Expired"));
    }

    #[test]
    fn upcoming_exposes_time_until_start() {
        let quiz = quiz();
        let now = quiz.start_time - Duration::minutes(90);
        let decision = evaluate_display(&quiz, None, now);

        assert_eq!(decision.status, DisplayStatus::Upcoming);
        assert_eq!(decision.opens_in, Some(Duration::minutes(90)));
        assert_eq!(decision.action_label(), None);
        let countdown = decision.countdown().expect("countdown present");
        assert_eq!(countdown.to_string(), "1h 30m 0s");
        assert_eq!(countdown.summary(), "1h 30m remaining");
    }

    #[test]
    fn countdown_formats_like_the_dashboard() {
        let countdown = Countdown(
            Duration::days(2) + Duration::hours(3) + Duration::seconds(7),
        );
        assert_eq!(countdown.to_string(), "2d 3h 7s");
        assert_eq!(countdown.summary(), "2d 3h remaining");
        assert_eq!(Countdown(Duration::seconds(42)).summary(), "0m remaining");
        assert_eq!(Countdown(Duration::zero()).to_string(), "Starting now...");
    }

    #[test]
    fn staff_receive_management_actions() {
        let quiz = quiz();
        let owner = Caller::new("fac-1", Role::Faculty);
        let colleague = Caller::new("fac-2", Role::Faculty);
        let admin = Caller::new("adm-1", Role::Admin);

        match actions_for(&owner, &quiz, None, quiz.start_time) {
            CallerActions::Manage(actions) => {
                assert!(actions.edit && actions.delete);
                assert!(!actions.view_statistics);
            }
            other => panic!("expected management actions, got {other:?}"),
        }
        assert_eq!(
            ManagementActions::for_caller(&quiz, &colleague),
            ManagementActions {
                edit: false,
                delete: false,
                view_statistics: false,
            }
        );
        assert!(ManagementActions::for_caller(&quiz, &admin).view_statistics);
    }

    #[test]
    fn status_labels_match_case_insensitively() {
        assert!(DisplayStatus::Expired.matches_label("expired"));
        assert!(DisplayStatus::Upcoming.matches_label(" UPCOMING "));
        assert!(!DisplayStatus::Active.matches_label("submitted"));
    }
}
