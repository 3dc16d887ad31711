//! End-to-end quiz board scenarios driven through a JSON snapshot, the board
//! service, and the HTTP router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use quizgate::config::BoardConfig;
use quizgate::workflows::quiz::{
    quiz_router, BoardRequest, Caller, DisplayStatus, FixedClock, QuizBoardService, QuizFacets,
    QuizId, QuizSnapshot, Role, ScoreBand, StudentAction, StudentRoute,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
        .single()
        .expect("valid instant")
}

fn snapshot_json() -> Value {
    let start = start();
    json!({
        "quizzes": [
            {
                "id": "algo-weekly",
                "title": "Algorithms Weekly",
                "subject": { "_id": "subj-algo", "name": "Algorithms", "code": "CS301" },
                "duration_minutes": 30,
                "start_time": start,
                "end_time": start + Duration::hours(2),
                "allowed_groups": [
                    { "department": "CS", "year": 3, "semester": 2, "section": "A" }
                ],
                "total_authorized_students": 45,
                "total_marks": 20,
                "created_by": "fac-lin"
            },
            {
                "id": "phys-final",
                "title": "Physics Final",
                "subject": "PH101",
                "duration_minutes": 90,
                "start_time": start - Duration::days(7),
                "end_time": start - Duration::days(7) + Duration::hours(3),
                "allowed_groups": [
                    { "department": "EE", "year": 1, "semester": 1, "section": "B" }
                ],
                "total_authorized_students": 30,
                "total_marks": 50
            }
        ],
        "submissions": {
            "phys-final": [
                {
                    "id": "sub-1",
                    "quiz_id": "phys-final",
                    "student_id": "stu-ana",
                    "status": "evaluated",
                    "answers": [{ "marks": 20 }, { "marks": 22 }]
                },
                {
                    "id": "sub-2",
                    "quiz_id": "phys-final",
                    "student_id": "stu-ben",
                    "status": "submitted",
                    "answers": [{ "marks": 12 }]
                }
            ]
        }
    })
}

fn load_snapshot() -> QuizSnapshot {
    let raw = serde_json::to_vec(&snapshot_json()).expect("snapshot serializes");
    QuizSnapshot::from_reader(raw.as_slice()).expect("snapshot loads")
}

fn service_at(now: DateTime<Utc>) -> Arc<QuizBoardService<QuizSnapshot, FixedClock>> {
    Arc::new(QuizBoardService::new(
        Arc::new(load_snapshot()),
        Arc::new(FixedClock(now)),
        BoardConfig::default(),
    ))
}

#[test]
fn quiz_moves_from_upcoming_to_hidden_once_its_window_closes() {
    let student = Caller::new("stu-ana", Role::Student);
    let quiz_id = QuizId("algo-weekly".to_string());

    let before = service_at(start() - Duration::hours(1));
    let board = before
        .board(&student, &BoardRequest::student(StudentRoute::Default))
        .expect("board builds");
    let card = board.card(&quiz_id).expect("upcoming quiz listed");
    assert_eq!(card.status, DisplayStatus::Upcoming);
    assert_eq!(card.action, Some(StudentAction::None));
    assert!(card.countdown.is_some());

    let upcoming = before
        .board(&student, &BoardRequest::student(StudentRoute::Upcoming))
        .expect("board builds");
    assert!(upcoming.card(&quiz_id).is_some());

    let after = service_at(start() + Duration::hours(3));
    let board = after
        .board(&student, &BoardRequest::student(StudentRoute::Default))
        .expect("board builds");
    assert!(board.card(&quiz_id).is_none());

    let card = after.quiz_card(&student, &quiz_id).expect("card resolves");
    assert_eq!(card.status, DisplayStatus::Expired);
    assert!(card.countdown.is_none());
}

#[test]
fn submitted_quizzes_move_to_the_review_route() {
    let service = service_at(start());
    let student = Caller::new("stu-ben", Role::Student);

    let review = service
        .board(&student, &BoardRequest::student(StudentRoute::Review))
        .expect("board builds");
    let card = review
        .card(&QuizId("phys-final".to_string()))
        .expect("submitted quiz listed for review");
    assert_eq!(card.status, DisplayStatus::Submitted);

    let open = service
        .board(&student, &BoardRequest::student(StudentRoute::Default))
        .expect("board builds");
    let ids: Vec<&str> = open.cards.iter().map(|card| card.quiz_id.0.as_str()).collect();
    assert_eq!(ids, vec!["algo-weekly"]);
}

#[test]
fn statistics_cover_the_snapshot_population() {
    let service = service_at(start());
    let report = service
        .statistics(&Caller::new("adm-1", Role::Admin), QuizFacets::default())
        .expect("admin statistics");

    let stats = &report.statistics;
    assert_eq!(stats.quizzes_counted, 2);
    assert_eq!(stats.total_students, 75);
    assert_eq!(stats.submitted_count(), 2);
    // 42/50 is 84% and 12/50 is 24%
    assert_eq!(stats.score_distribution.count(ScoreBand::Good), 1);
    assert_eq!(stats.score_distribution.count(ScoreBand::Poor), 1);
    assert!((stats.overall.average_score_percent - 27.0).abs() < 1e-9);
}

#[tokio::test]
async fn status_endpoint_reports_expired_after_the_window() {
    let router = quiz_router(service_at(start() + Duration::days(1)));

    let response = router
        .oneshot(
            Request::get("/api/v1/quizzes/algo-weekly/status")
                .header("x-user-id", "stu-ana")
                .header("x-user-role", "student")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["status"], "expired");
    assert_eq!(body["subject"], "Algorithms (CS301)");
}

#[test]
fn snapshots_with_inverted_windows_are_rejected() {
    let mut raw = snapshot_json();
    raw["quizzes"][0]["end_time"] = raw["quizzes"][0]["start_time"].clone();
    let bytes = serde_json::to_vec(&raw).expect("snapshot serializes");

    let err = QuizSnapshot::from_reader(bytes.as_slice()).expect_err("window rejected");
    assert!(err.to_string().contains("algo-weekly"));
}
