use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use quizgate::error::AppError;
use quizgate::workflows::quiz::{
    GradebookImporter, Quiz, QuizFilter, QuizId, QuizRepository, QuizSnapshot, RepositoryError,
    Role, Submission, SubmissionsByQuiz,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) quizzes: InMemoryQuizRepository,
}

/// Process-local quiz store backed by a single snapshot.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQuizRepository {
    snapshot: Arc<RwLock<QuizSnapshot>>,
}

impl InMemoryQuizRepository {
    pub(crate) fn new(snapshot: QuizSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Merges imported submissions into a copy of the live snapshot and swaps
    /// it in only when the result still validates.
    pub(crate) fn import_submissions(
        &self,
        imported: SubmissionsByQuiz,
    ) -> Result<usize, AppError> {
        let count = imported.values().map(Vec::len).sum();
        let mut guard = self.snapshot.write().map_err(|_| poisoned())?;
        let mut next = guard.clone();
        next.merge_submissions(imported);
        next.validate()?;
        *guard = next;
        Ok(count)
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&QuizSnapshot) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let guard = self.snapshot.read().map_err(|_| poisoned())?;
        f(&guard)
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("quiz store lock poisoned".to_string())
}

impl QuizRepository for InMemoryQuizRepository {
    fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, RepositoryError> {
        self.read(|snapshot| snapshot.get_quiz(id))
    }

    fn list_quizzes(&self, filter: Option<QuizFilter<'_>>) -> Result<Vec<Quiz>, RepositoryError> {
        self.read(|snapshot| snapshot.list_quizzes(filter))
    }

    fn list_submissions(&self, quiz_id: &QuizId) -> Result<Vec<Submission>, RepositoryError> {
        self.read(|snapshot| snapshot.list_submissions(quiz_id))
    }

    fn list_all_submissions(&self) -> Result<SubmissionsByQuiz, RepositoryError> {
        self.read(|snapshot| snapshot.list_all_submissions())
    }
}

/// Loads a snapshot file, or the demo population when none is given, then
/// merges an optional gradebook export on top.
pub(crate) fn load_snapshot(
    snapshot: Option<&Path>,
    gradebook: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<(QuizSnapshot, bool), AppError> {
    let (mut loaded, from_file) = match snapshot {
        Some(path) => (QuizSnapshot::from_path(path)?, true),
        None => (crate::demo::demo_snapshot(now), false),
    };

    if let Some(path) = gradebook {
        loaded.merge_submissions(GradebookImporter::from_path(path)?);
        loaded.validate()?;
    }

    Ok((loaded, from_file))
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

pub(crate) fn parse_role(raw: &str) -> Result<Role, String> {
    Role::from_label(raw).ok_or_else(|| format!("unknown role '{raw}' (student|faculty|admin)"))
}
