use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::BoardConfig;
use crate::workflows::quiz::domain::{
    AllowedGroup, Answer, Quiz, QuizId, Subject, Submission, SubmissionId, SubmissionStatus,
    SubmissionsByQuiz, UserId,
};
use crate::workflows::quiz::facets::CohortMatch;
use crate::workflows::quiz::repository::{
    FixedClock, QuizFilter, QuizRepository, RepositoryError,
};
use crate::workflows::quiz::{quiz_router, QuizBoardService, QuizSnapshot};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn id(value: &str) -> QuizId {
    QuizId(value.to_string())
}

fn group(department: &str, year: u8, section: &str) -> AllowedGroup {
    AllowedGroup {
        department: department.to_string(),
        year,
        semester: Some(1),
        section: section.to_string(),
    }
}

fn quiz(
    quiz_id: &str,
    start: DateTime<Utc>,
    minutes: i64,
    groups: Vec<AllowedGroup>,
    owner: &str,
    authorized: u32,
) -> Quiz {
    Quiz {
        id: id(quiz_id),
        title: format!("{quiz_id} quiz"),
        subject: None,
        duration_minutes: 30,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        allowed_groups: groups,
        total_authorized_students: authorized,
        total_marks: 10.0,
        created_by: Some(UserId(owner.to_string())),
    }
}

fn submission(quiz_id: &str, student: &str, status: SubmissionStatus, marks: &[f64]) -> Submission {
    Submission {
        id: SubmissionId(format!("{quiz_id}-{student}")),
        quiz_id: id(quiz_id),
        student_id: UserId(student.to_string()),
        status,
        answers: marks.iter().map(|&marks| Answer { marks }).collect(),
    }
}

/// Four quizzes around `now()`:
/// `q-upcoming` opens in an hour, `q-active` and `q-review` are open,
/// `q-expired` closed two days ago. `stu-1` has an evaluated attempt on
/// `q-review`; `stu-2` is mid-attempt there and submitted `q-expired`.
pub(super) fn snapshot() -> QuizSnapshot {
    let now = now();

    let mut upcoming = quiz(
        "q-upcoming",
        now + Duration::hours(1),
        60,
        vec![group("CS", 2, "A")],
        "fac-1",
        30,
    );
    upcoming.subject = Some(Subject::Inline {
        id: "subj-ds".to_string(),
        name: Some("Data Structures".to_string()),
        code: Some("CS201".to_string()),
    });

    let mut active = quiz(
        "q-active",
        now - Duration::minutes(10),
        60,
        vec![group("CS", 3, "B")],
        "fac-2",
        40,
    );
    active.subject = Some(Subject::Ref("MA101".to_string()));

    let expired = quiz(
        "q-expired",
        now - Duration::days(2),
        60,
        vec![group("EE", 2, "A")],
        "fac-1",
        50,
    );

    let review = quiz(
        "q-review",
        now - Duration::minutes(30),
        90,
        vec![group("CS", 2, "A")],
        "fac-2",
        20,
    );

    let mut submissions = SubmissionsByQuiz::new();
    submissions.insert(
        id("q-review"),
        vec![
            submission("q-review", "stu-1", SubmissionStatus::Evaluated, &[4.0, 4.0]),
            submission("q-review", "stu-2", SubmissionStatus::InProgress, &[]),
        ],
    );
    submissions.insert(
        id("q-expired"),
        vec![submission("q-expired", "stu-2", SubmissionStatus::Submitted, &[2.0])],
    );

    QuizSnapshot::new(vec![upcoming, active, expired, review], submissions)
}

pub(super) fn board_config(cohort_match: CohortMatch) -> BoardConfig {
    BoardConfig { cohort_match }
}

pub(super) fn build_service() -> QuizBoardService<QuizSnapshot, FixedClock> {
    QuizBoardService::new(
        Arc::new(snapshot()),
        Arc::new(FixedClock(now())),
        board_config(CohortMatch::SameGroup),
    )
}

pub(super) fn board_router() -> Router {
    quiz_router(Arc::new(build_service()))
}

pub(super) fn card_ids(board: &crate::workflows::quiz::QuizBoard) -> Vec<&str> {
    board
        .cards
        .iter()
        .map(|card| card.quiz_id.0.as_str())
        .collect()
}

pub(super) struct UnavailableRepository;

impl QuizRepository for UnavailableRepository {
    fn get_quiz(&self, _id: &QuizId) -> Result<Option<Quiz>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_quizzes(&self, _filter: Option<QuizFilter<'_>>) -> Result<Vec<Quiz>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_submissions(&self, _quiz_id: &QuizId) -> Result<Vec<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_all_submissions(&self) -> Result<SubmissionsByQuiz, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
