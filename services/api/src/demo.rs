use crate::infra::{load_snapshot, parse_instant, parse_role};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use quizgate::config::{AdmissionConfig, AppConfig};
use quizgate::error::AppError;
use quizgate::workflows::admission::{
    AdmissionCheck, AdmissionRange, AdmissionValidator, EntryRange, StaticAdmissionRanges,
};
use quizgate::workflows::quiz::{
    AllowedGroup, Answer, BoardError, BoardRequest, Caller, CohortMatch, FacetQuery, FixedClock,
    Quiz, QuizBoard, QuizBoardService, QuizId, QuizSnapshot, Role, StatisticsReport, StudentRoute,
    Subject, Submission, SubmissionId, SubmissionStatus, SubmissionsByQuiz, UserId,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct SnapshotArgs {
    /// Quiz snapshot JSON. Defaults to the built-in demo population.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Gradebook CSV export merged over the snapshot's submissions.
    #[arg(long)]
    pub(crate) gradebook: Option<PathBuf>,
    /// Evaluate as of this instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FacetArgs {
    #[arg(long)]
    pub(crate) department: Option<String>,
    #[arg(long)]
    pub(crate) year: Option<String>,
    #[arg(long)]
    pub(crate) semester: Option<String>,
    #[arg(long)]
    pub(crate) section: Option<String>,
    /// Subject identity or course code
    #[arg(long)]
    pub(crate) subject: Option<String>,
}

impl FacetArgs {
    fn query(&self, status: Option<String>) -> FacetQuery {
        FacetQuery {
            department: self.department.clone(),
            year: self.year.clone(),
            semester: self.semester.clone(),
            section: self.section.clone(),
            subject: self.subject.clone(),
            status,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BoardArgs {
    #[command(flatten)]
    pub(crate) source: SnapshotArgs,
    /// Caller user id
    #[arg(long, default_value = "stu-mei")]
    pub(crate) user: String,
    /// Caller role: student, faculty, or admin
    #[arg(long, default_value = "student", value_parser = parse_role)]
    pub(crate) role: Role,
    /// Student listing: default, upcoming, review (or the legacy page path)
    #[arg(long)]
    pub(crate) route: Option<String>,
    #[command(flatten)]
    pub(crate) facets: FacetArgs,
    /// Staff listings only: display status label to keep
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Print the board as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    #[command(flatten)]
    pub(crate) source: SnapshotArgs,
    #[command(flatten)]
    pub(crate) facets: FacetArgs,
    /// Override QUIZGATE_COHORT_MATCH (same_group or any_group)
    #[arg(long)]
    pub(crate) cohort_match: Option<String>,
    /// Print the full statistics report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AdmissionArgs {
    #[arg(long)]
    pub(crate) department: String,
    #[arg(long)]
    pub(crate) year: u8,
    #[arg(long)]
    pub(crate) section: String,
    #[arg(long)]
    pub(crate) admission_number: String,
    /// Admission ranges JSON. Defaults to the demo ranges.
    #[arg(long)]
    pub(crate) ranges: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluate as of this instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_board(args: BoardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let now = args.source.now.unwrap_or_else(Utc::now);
    let (snapshot, from_file) = load_snapshot(
        args.source.snapshot.as_deref(),
        args.source.gradebook.as_deref(),
        now,
    )?;

    let caller = Caller::new(args.user, args.role);
    let request = if caller.is_student() {
        let raw = args.route.unwrap_or_default();
        let route = StudentRoute::parse(&raw).ok_or_else(|| BoardError::UnknownRoute(raw))?;
        BoardRequest::student(route)
    } else {
        let filters = args
            .facets
            .query(args.status)
            .into_filters()
            .map_err(BoardError::from)?;
        BoardRequest::manage(filters)
    };

    let service = board_service(snapshot, now, config.board.cohort_match);
    let board = service.board(&caller, &request)?;

    if args.json {
        print_json(&board);
    } else {
        println!(
            "Quiz board for {} ({}) as of {} [{}]",
            caller.user_id.0,
            caller.role.label(),
            now.format("%Y-%m-%d %H:%M UTC"),
            data_source(from_file)
        );
        render_board(&board);
    }

    Ok(())
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let now = args.source.now.unwrap_or_else(Utc::now);
    let (snapshot, from_file) = load_snapshot(
        args.source.snapshot.as_deref(),
        args.source.gradebook.as_deref(),
        now,
    )?;

    let cohort_match = match args.cohort_match.as_deref() {
        Some(raw) => CohortMatch::from_label(raw).ok_or_else(|| {
            quizgate::config::ConfigError::InvalidCohortMatch {
                value: raw.to_string(),
            }
        })?,
        None => config.board.cohort_match,
    };
    let facets = args
        .facets
        .query(None)
        .into_filters()
        .map_err(BoardError::from)?
        .facets;

    let service = board_service(snapshot, now, cohort_match);
    let report = service.statistics(&Caller::new("cli", Role::Admin), facets)?;

    if args.json {
        print_json(&report);
    } else {
        println!("Quiz statistics [{}]", data_source(from_file));
        render_statistics(&report);
    }

    Ok(())
}

pub(crate) fn run_admission(args: AdmissionArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ranges = load_ranges(args.ranges.as_deref())?;
    let validator = AdmissionValidator::new(Arc::new(ranges), config.admission);

    let check = AdmissionCheck {
        department: args.department,
        year: args.year,
        section: args.section,
        admission_number: args.admission_number,
    };
    let outcome = validator.validate(&check)?;
    println!(
        "{} accepted as {} entry (ordinal {}, range {} - {})",
        outcome.admission_number,
        outcome.entry.label(),
        outcome.ordinal,
        outcome.bounds.start,
        outcome.bounds.end
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let service = board_service(demo_snapshot(now), now, CohortMatch::default());

    println!("Quizgate demo as of {}", now.format("%Y-%m-%d %H:%M UTC"));

    let student = Caller::new("stu-mei", Role::Student);
    for route in [StudentRoute::Default, StudentRoute::Review] {
        let board = service.board(&student, &BoardRequest::student(route))?;
        println!("\nStudent {} / {:?} route", student.user_id.0, route);
        render_board(&board);
    }

    let faculty = Caller::new("fac-ada", Role::Faculty);
    let filters = FacetQuery {
        department: Some("CS".to_string()),
        ..FacetQuery::default()
    }
    .into_filters()
    .map_err(BoardError::from)?;
    let board = service.board(&faculty, &BoardRequest::manage(filters))?;
    println!("\nFaculty {} / department CS", faculty.user_id.0);
    render_board(&board);

    let admin = Caller::new("adm-root", Role::Admin);
    let report = service.statistics(&admin, Default::default())?;
    println!("\nAdmin statistics");
    render_statistics(&report);

    println!("\nAdmission checks (CS year 2 section A)");
    let validator = AdmissionValidator::new(
        Arc::new(demo_admission_ranges()),
        AdmissionConfig::default(),
    );
    for admission_number in ["y23cs045", "y23cs099", "l24cs105", "y23cs4x"] {
        let check = AdmissionCheck {
            department: "CS".to_string(),
            year: 2,
            section: "A".to_string(),
            admission_number: admission_number.to_string(),
        };
        match validator.validate(&check) {
            Ok(outcome) => println!(
                "- {}: accepted ({} entry)",
                admission_number,
                outcome.entry.label()
            ),
            Err(err) => println!("- {}: rejected ({})", admission_number, err),
        }
    }

    Ok(())
}

fn board_service(
    snapshot: QuizSnapshot,
    now: DateTime<Utc>,
    cohort_match: CohortMatch,
) -> QuizBoardService<QuizSnapshot, FixedClock> {
    QuizBoardService::new(
        Arc::new(snapshot),
        Arc::new(FixedClock(now)),
        quizgate::config::BoardConfig { cohort_match },
    )
}

fn data_source(from_file: bool) -> &'static str {
    if from_file {
        "snapshot file"
    } else {
        "demo population"
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("unable to render JSON: {err}"),
    }
}

fn render_board(board: &QuizBoard) {
    if board.is_empty() {
        println!("- no quizzes to show");
        return;
    }

    for card in &board.cards {
        let mut line = format!(
            "- [{}] {} | {} | {} min",
            card.status_label, card.title, card.subject, card.duration_minutes
        );
        if let Some(label) = card.action_label {
            line.push_str(&format!(" | {label}"));
        }
        if let Some(countdown) = &card.countdown {
            line.push_str(&format!(" | opens in {countdown}"));
        }
        if let Some(actions) = card.management {
            let mut allowed = Vec::new();
            if actions.edit {
                allowed.push("edit");
            }
            if actions.delete {
                allowed.push("delete");
            }
            if actions.view_statistics {
                allowed.push("statistics");
            }
            if allowed.is_empty() {
                line.push_str(" | view only");
            } else {
                line.push_str(&format!(" | {}", allowed.join(", ")));
            }
        }
        println!("{line}");
    }
}

fn render_statistics(report: &StatisticsReport) {
    let stats = &report.statistics;
    println!(
        "- {} quizzes | {} authorized students | {} submissions | mean raw score {:.1}",
        stats.quizzes_counted,
        stats.total_students,
        stats.submitted_count(),
        stats.overall.average_score_percent
    );

    let summary = &report.summary;
    for entry in &summary.submission_status {
        println!("  {}: {}", entry.label, entry.value);
    }
    if !summary.score_bands.is_empty() {
        println!("Score bands");
        for entry in &summary.score_bands {
            println!("  {}: {}", entry.band_label, entry.count);
        }
    }

    for (title, entries) in [
        ("Subjects", &summary.subjects),
        ("Departments", &summary.departments),
        ("Years", &summary.years),
    ] {
        if entries.is_empty() {
            continue;
        }
        println!("{title}");
        for entry in entries {
            println!(
                "  {}: {} submissions, average {:.1}",
                entry.label, entry.submissions, entry.average
            );
        }
    }
}

pub(crate) fn load_ranges(path: Option<&Path>) -> Result<StaticAdmissionRanges, AppError> {
    match path {
        Some(path) => Ok(StaticAdmissionRanges::from_path(path)?),
        None => Ok(demo_admission_ranges()),
    }
}

fn group(department: &str, year: u8, semester: u8, section: &str) -> AllowedGroup {
    AllowedGroup {
        department: department.to_string(),
        year,
        semester: Some(semester),
        section: section.to_string(),
    }
}

fn submission(quiz_id: &str, student: &str, status: SubmissionStatus, marks: &[f64]) -> Submission {
    Submission {
        id: SubmissionId(format!("{quiz_id}:{student}")),
        quiz_id: QuizId(quiz_id.to_string()),
        student_id: UserId(student.to_string()),
        status,
        answers: marks.iter().map(|&marks| Answer { marks }).collect(),
    }
}

/// Demo population laid out around `now`: one open quiz, one opening
/// tomorrow, and two closed ones with graded work.
pub(crate) fn demo_snapshot(now: DateTime<Utc>) -> QuizSnapshot {
    let quizzes = vec![
        Quiz {
            id: QuizId("ds-midterm".to_string()),
            title: "Data Structures Midterm".to_string(),
            subject: Some(Subject::Inline {
                id: "subj-ds".to_string(),
                name: Some("Data Structures".to_string()),
                code: Some("CS201".to_string()),
            }),
            duration_minutes: 45,
            start_time: now - Duration::minutes(15),
            end_time: now + Duration::minutes(45),
            allowed_groups: vec![group("CS", 2, 1, "A"), group("CS", 2, 1, "B")],
            total_authorized_students: 60,
            total_marks: 20.0,
            created_by: Some(UserId("fac-ada".to_string())),
        },
        Quiz {
            id: QuizId("ma-discrete".to_string()),
            title: "Discrete Math Quiz".to_string(),
            subject: Some(Subject::Ref("MA101".to_string())),
            duration_minutes: 20,
            start_time: now + Duration::hours(26),
            end_time: now + Duration::hours(27),
            allowed_groups: vec![group("CS", 3, 1, "A"), group("EE", 3, 1, "B")],
            total_authorized_students: 40,
            total_marks: 10.0,
            created_by: Some(UserId("fac-grace".to_string())),
        },
        Quiz {
            id: QuizId("net-lab".to_string()),
            title: "Networks Lab Check".to_string(),
            subject: Some(Subject::Inline {
                id: "subj-net".to_string(),
                name: Some("Computer Networks".to_string()),
                code: Some("CS302".to_string()),
            }),
            duration_minutes: 30,
            start_time: now - Duration::days(3),
            end_time: now - Duration::days(3) + Duration::hours(1),
            allowed_groups: vec![group("CS", 3, 2, "B")],
            total_authorized_students: 35,
            total_marks: 25.0,
            created_by: Some(UserId("fac-ada".to_string())),
        },
        Quiz {
            id: QuizId("ws-orientation".to_string()),
            title: "Orientation Warmup".to_string(),
            subject: None,
            duration_minutes: 10,
            start_time: now - Duration::days(10),
            end_time: now - Duration::days(10) + Duration::minutes(30),
            allowed_groups: vec![group("ME", 1, 1, "C")],
            total_authorized_students: 25,
            total_marks: 0.0,
            created_by: None,
        },
    ];

    let mut submissions = SubmissionsByQuiz::new();
    submissions.insert(
        QuizId("ds-midterm".to_string()),
        vec![
            submission("ds-midterm", "stu-ravi", SubmissionStatus::Evaluated, &[9.0, 9.5]),
            submission("ds-midterm", "stu-mei", SubmissionStatus::InProgress, &[4.0]),
        ],
    );
    submissions.insert(
        QuizId("net-lab".to_string()),
        vec![
            submission("net-lab", "stu-ravi", SubmissionStatus::Evaluated, &[10.0, 8.0, 5.0]),
            submission("net-lab", "stu-omar", SubmissionStatus::Submitted, &[6.0, 4.0]),
            submission("net-lab", "stu-mei", SubmissionStatus::Evaluated, &[12.0, 11.0]),
        ],
    );
    submissions.insert(
        QuizId("ws-orientation".to_string()),
        vec![submission("ws-orientation", "stu-omar", SubmissionStatus::Submitted, &[])],
    );

    QuizSnapshot::new(quizzes, submissions)
}

pub(crate) fn demo_admission_ranges() -> StaticAdmissionRanges {
    StaticAdmissionRanges::new(vec![
        AdmissionRange {
            id: "range-cs-2-a".to_string(),
            department: "CS".to_string(),
            year: 2,
            section: "A".to_string(),
            is_active: true,
            regular_entry: EntryRange {
                start: "y23cs001".to_string(),
                end: "y23cs060".to_string(),
            },
            lateral_entry: EntryRange {
                start: "l24cs101".to_string(),
                end: "l24cs110".to_string(),
            },
        },
        AdmissionRange {
            id: "range-cs-3-b".to_string(),
            department: "CS".to_string(),
            year: 3,
            section: "B".to_string(),
            is_active: true,
            regular_entry: EntryRange {
                start: "y22cs001".to_string(),
                end: "y22cs055".to_string(),
            },
            lateral_entry: EntryRange {
                start: "l23cs101".to_string(),
                end: "l23cs120".to_string(),
            },
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgate::workflows::admission::RangeLoadError;
    use quizgate::workflows::quiz::DisplayStatus;

    #[test]
    fn demo_snapshot_is_valid_and_covers_every_status() {
        let now = Utc::now();
        let snapshot = demo_snapshot(now);
        snapshot.validate().expect("demo snapshot validates");

        let service = board_service(snapshot, now, CohortMatch::SameGroup);
        let admin = Caller::new("adm-root", Role::Admin);
        let board = service
            .board(&admin, &BoardRequest::manage(Default::default()))
            .expect("board builds");

        let statuses: Vec<DisplayStatus> = board.cards.iter().map(|card| card.status).collect();
        assert_eq!(
            statuses,
            vec![
                DisplayStatus::Active,
                DisplayStatus::Upcoming,
                DisplayStatus::Expired,
                DisplayStatus::Expired
            ]
        );
    }

    #[test]
    fn demo_student_sees_review_and_open_quizzes() {
        let now = Utc::now();
        let service = board_service(demo_snapshot(now), now, CohortMatch::SameGroup);
        let student = Caller::new("stu-mei", Role::Student);

        let open = service
            .board(&student, &BoardRequest::student(StudentRoute::Default))
            .expect("board builds");
        let review = service
            .board(&student, &BoardRequest::student(StudentRoute::Review))
            .expect("board builds");

        assert_eq!(open.cards.len(), 2);
        assert_eq!(review.cards.len(), 1);
        assert_eq!(review.cards[0].quiz_id.0, "net-lab");
    }

    #[test]
    fn demo_ranges_have_ordered_bounds() {
        demo_admission_ranges()
            .validate()
            .expect("demo ranges validate");
    }

    #[test]
    fn unreadable_range_files_surface_as_range_errors() {
        let missing = std::env::temp_dir().join("quizgate-missing-ranges.json");
        let err = load_ranges(Some(&missing)).expect_err("missing file rejected");
        assert!(matches!(err, AppError::Ranges(RangeLoadError::Io(_))));
    }
}
