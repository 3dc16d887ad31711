use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::board::{BoardRequest, QuizBoard, QuizCard};
use super::domain::{Caller, Quiz, QuizId, Role, Submission};
use super::facets::{CohortMatch, FacetError, QuizFacets};
use super::repository::{Clock, QuizFilter, QuizRepository, RepositoryError};
use super::stats::{aggregate, views::StatisticsSummary, QuizStatistics};
use super::visibility::{visible, BoardView};
use crate::config::BoardConfig;

/// Service composing the quiz repository, the clock, and the board rules.
pub struct QuizBoardService<R, C> {
    repository: Arc<R>,
    clock: Arc<C>,
    config: BoardConfig,
}

/// Statistics payload returned to admins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub generated_at: DateTime<Utc>,
    pub cohort_match: CohortMatch,
    pub facets: QuizFacets,
    pub statistics: QuizStatistics,
    pub summary: StatisticsSummary,
}

impl<R, C> QuizBoardService<R, C>
where
    R: QuizRepository + 'static,
    C: Clock + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>, config: BoardConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// List the quizzes visible to `caller`, as cards.
    pub fn board(&self, caller: &Caller, request: &BoardRequest) -> Result<QuizBoard, BoardError> {
        let now = self.clock.now();
        let cohort_match = self.config.cohort_match;

        let (quizzes, view) = if caller.is_student() {
            (
                self.repository.list_quizzes(None)?,
                BoardView::Student(request.route),
            )
        } else {
            let filter = QuizFilter {
                facets: &request.filters.facets,
                cohort_match,
            };
            (
                self.repository.list_quizzes(Some(filter))?,
                BoardView::Manage {
                    filters: &request.filters,
                    cohort_match,
                },
            )
        };

        let mut cards = Vec::new();
        for quiz in &quizzes {
            let submission = self.submission_for(caller, quiz)?;
            if visible(quiz, caller, view, submission.as_ref(), now) {
                cards.push(QuizCard::build(quiz, caller, submission.as_ref(), now));
            }
        }

        debug!(
            role = caller.role.label(),
            considered = quizzes.len(),
            visible = cards.len(),
            "quiz board computed"
        );

        Ok(QuizBoard {
            generated_at: now,
            role: caller.role,
            route: caller.is_student().then_some(request.route),
            cohort_match: (!caller.is_student()).then_some(cohort_match),
            cards,
        })
    }

    /// Card for a single quiz regardless of listing route.
    pub fn quiz_card(&self, caller: &Caller, quiz_id: &QuizId) -> Result<QuizCard, BoardError> {
        let quiz = self
            .repository
            .get_quiz(quiz_id)?
            .ok_or_else(|| BoardError::QuizNotFound(quiz_id.clone()))?;
        let submission = self.submission_for(caller, &quiz)?;

        Ok(QuizCard::build(
            &quiz,
            caller,
            submission.as_ref(),
            self.clock.now(),
        ))
    }

    /// Aggregate statistics over the facet-filtered population. Admin only.
    pub fn statistics(
        &self,
        caller: &Caller,
        facets: QuizFacets,
    ) -> Result<StatisticsReport, BoardError> {
        if caller.role != Role::Admin {
            return Err(BoardError::Forbidden {
                role: caller.role,
                action: "view statistics",
            });
        }

        let quizzes = self.repository.list_quizzes(None)?;
        let submissions = self.repository.list_all_submissions()?;
        let cohort_match = self.config.cohort_match;
        let statistics = aggregate(&quizzes, &submissions, &facets, cohort_match);

        debug!(
            quizzes = statistics.quizzes_counted,
            submissions = statistics.submitted_count(),
            cohort_match = cohort_match.label(),
            "quiz statistics aggregated"
        );

        Ok(StatisticsReport {
            generated_at: self.clock.now(),
            cohort_match,
            summary: statistics.summary(),
            facets,
            statistics,
        })
    }

    fn submission_for(
        &self,
        caller: &Caller,
        quiz: &Quiz,
    ) -> Result<Option<Submission>, BoardError> {
        if !caller.is_student() {
            return Ok(None);
        }

        let submission = self
            .repository
            .list_submissions(&quiz.id)?
            .into_iter()
            .find(|submission| submission.student_id == caller.user_id);
        Ok(submission)
    }
}

/// Error raised by the quiz board service.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("{} callers may not {action}", role.label())]
    Forbidden { role: Role, action: &'static str },
    #[error("unknown student route '{0}'")]
    UnknownRoute(String),
    #[error(transparent)]
    Filter(#[from] FacetError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
