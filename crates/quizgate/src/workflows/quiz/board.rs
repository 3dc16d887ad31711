use super::access::{
    actions_for, evaluate_display, CallerActions, DisplayStatus, ManagementActions, StudentAction,
};
use super::domain::{Caller, Quiz, QuizId, Role, Submission};
use super::facets::{CohortMatch, ManagementFilters};
use super::visibility::StudentRoute;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Card rendered for one quiz on a caller's board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizCard {
    pub quiz_id: QuizId,
    pub title: String,
    pub subject: String,
    pub duration_minutes: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub allowed_groups: Vec<String>,
    pub status: DisplayStatus,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<StudentAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opens_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management: Option<ManagementActions>,
}

impl QuizCard {
    /// Builds the card for `caller`. Students get their access decision;
    /// staff see the clock status and their management permissions.
    pub fn build(
        quiz: &Quiz,
        caller: &Caller,
        submission: Option<&Submission>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut card = Self {
            quiz_id: quiz.id.clone(),
            title: quiz.title.clone(),
            subject: quiz.subject_label(),
            duration_minutes: quiz.duration_minutes,
            start_time: quiz.start_time,
            end_time: quiz.end_time,
            allowed_groups: quiz.allowed_groups.iter().map(|group| group.label()).collect(),
            status: DisplayStatus::Upcoming,
            status_label: DisplayStatus::Upcoming.label(),
            status_tone: DisplayStatus::Upcoming.tone(),
            action: None,
            action_label: None,
            countdown: None,
            opens_in: None,
            management: None,
        };

        let decision = match actions_for(caller, quiz, submission, now) {
            CallerActions::Student(decision) => {
                card.action = Some(decision.action);
                card.action_label = decision.action_label();
                card.countdown = decision.countdown().map(|countdown| countdown.to_string());
                card.opens_in = decision.countdown().map(|countdown| countdown.summary());
                decision
            }
            CallerActions::Manage(actions) => {
                card.management = Some(actions);
                evaluate_display(quiz, None, now)
            }
        };

        card.status = decision.status;
        card.status_label = decision.status.label();
        card.status_tone = decision.status.tone();
        card
    }
}

/// Listing returned to a caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizBoard {
    pub generated_at: DateTime<Utc>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<StudentRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohort_match: Option<CohortMatch>,
    pub cards: Vec<QuizCard>,
}

impl QuizBoard {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, quiz_id: &QuizId) -> Option<&QuizCard> {
        self.cards.iter().find(|card| &card.quiz_id == quiz_id)
    }
}

/// What the caller asked to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardRequest {
    pub route: StudentRoute,
    pub filters: ManagementFilters,
}

impl BoardRequest {
    pub fn student(route: StudentRoute) -> Self {
        Self {
            route,
            filters: ManagementFilters::default(),
        }
    }

    pub fn manage(filters: ManagementFilters) -> Self {
        Self {
            route: StudentRoute::Default,
            filters,
        }
    }
}
