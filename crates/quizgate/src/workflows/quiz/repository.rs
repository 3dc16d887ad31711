use chrono::{DateTime, Utc};

use super::domain::{Quiz, QuizId, Submission, SubmissionsByQuiz};
use super::facets::{CohortMatch, QuizFacets};

/// Optional predicate pushed down to `QuizRepository::list_quizzes`.
#[derive(Debug, Clone, Copy)]
pub struct QuizFilter<'a> {
    pub facets: &'a QuizFacets,
    pub cohort_match: CohortMatch,
}

impl QuizFilter<'_> {
    pub fn matches(&self, quiz: &Quiz) -> bool {
        self.facets.matches(quiz, self.cohort_match)
    }
}

/// Read access to quizzes and submissions so boards and statistics can be
/// computed against any store.
pub trait QuizRepository: Send + Sync {
    fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, RepositoryError>;
    fn list_quizzes(&self, filter: Option<QuizFilter<'_>>) -> Result<Vec<Quiz>, RepositoryError>;
    fn list_submissions(&self, quiz_id: &QuizId) -> Result<Vec<Submission>, RepositoryError>;
    fn list_all_submissions(&self) -> Result<SubmissionsByQuiz, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for reports evaluated "as of" a given time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
