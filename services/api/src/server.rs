use crate::cli::ServeArgs;
use crate::demo::load_ranges;
use crate::infra::{load_snapshot, AppState, InMemoryQuizRepository};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use quizgate::config::AppConfig;
use quizgate::error::AppError;
use quizgate::telemetry;
use quizgate::workflows::admission::AdmissionValidator;
use quizgate::workflows::quiz::{QuizBoardService, SystemClock};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (snapshot, from_file) = load_snapshot(args.snapshot.as_deref(), None, Utc::now())?;
    let quiz_count = snapshot.quizzes.len();
    let quizzes = InMemoryQuizRepository::new(snapshot);
    let ranges = load_ranges(args.ranges.as_deref())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        quizzes: quizzes.clone(),
    };

    let board_service = Arc::new(QuizBoardService::new(
        Arc::new(quizzes),
        Arc::new(SystemClock),
        config.board,
    ));
    let admission_validator = Arc::new(AdmissionValidator::new(
        Arc::new(ranges),
        config.admission,
    ));

    let app = with_quiz_routes(board_service, admission_validator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        quizzes = quiz_count,
        demo_data = !from_file,
        cohort_match = config.board.cohort_match.label(),
        "quiz gate service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
