use super::super::domain::{
    AllowedGroup, Quiz, Submission, SubmissionsByQuiz, MISSING_SUBJECT_LABEL,
};
use super::super::facets::{CohortMatch, QuizFacets};
use super::super::scoring::{score_submission, ScoreBand, ScoredSubmission};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Group key for quizzes without a subject reference.
pub const UNASSIGNED_SUBJECT: &str = "unassigned";

/// Submission count and mean raw score for one slice of the population.
///
/// `average_score_percent` keeps the dashboard's column name but holds the
/// mean of raw scores, not of percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateBucket {
    pub total_submissions: u64,
    pub average_score_percent: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketAccumulator {
    count: u64,
    score_sum: f64,
}

impl BucketAccumulator {
    fn record(&mut self, score: f64) {
        self.count += 1;
        self.score_sum += score;
    }

    fn finish(&self) -> AggregateBucket {
        let average_score_percent = if self.count == 0 {
            0.0
        } else {
            self.score_sum / self.count as f64
        };

        AggregateBucket {
            total_submissions: self.count,
            average_score_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub excellent: u64,
    pub good: u64,
    pub average: u64,
    pub poor: u64,
}

impl ScoreDistribution {
    fn record(&mut self, band: ScoreBand) {
        match band {
            ScoreBand::Excellent => self.excellent += 1,
            ScoreBand::Good => self.good += 1,
            ScoreBand::Average => self.average += 1,
            ScoreBand::Poor => self.poor += 1,
        }
    }

    pub fn count(&self, band: ScoreBand) -> u64 {
        match band {
            ScoreBand::Excellent => self.excellent,
            ScoreBand::Good => self.good,
            ScoreBand::Average => self.average,
            ScoreBand::Poor => self.poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectBucket {
    pub label: String,
    #[serde(flatten)]
    pub stats: AggregateBucket,
}

/// Statistics over the quizzes retained by a facet filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizStatistics {
    pub quizzes_counted: usize,
    /// Sum of each quiz's authorized headcount; a student eligible for two
    /// quizzes is counted twice.
    pub total_students: u64,
    pub overall: AggregateBucket,
    pub score_distribution: ScoreDistribution,
    pub by_subject: BTreeMap<String, SubjectBucket>,
    pub by_department: BTreeMap<String, AggregateBucket>,
    pub by_year: BTreeMap<u8, AggregateBucket>,
}

impl QuizStatistics {
    pub fn submitted_count(&self) -> u64 {
        self.overall.total_submissions
    }
}

#[derive(Debug, Default)]
struct StatisticsBuilder {
    quizzes_counted: usize,
    total_students: u64,
    overall: BucketAccumulator,
    distribution: ScoreDistribution,
    subjects: BTreeMap<String, (String, BucketAccumulator)>,
    departments: BTreeMap<String, BucketAccumulator>,
    years: BTreeMap<u8, BucketAccumulator>,
}

impl StatisticsBuilder {
    fn add_quiz(
        &mut self,
        quiz: &Quiz,
        submissions: &[Submission],
        facets: &QuizFacets,
        cohort_match: CohortMatch,
    ) {
        self.quizzes_counted += 1;
        self.total_students += u64::from(quiz.total_authorized_students);

        let (subject_key, subject_label) = match &quiz.subject {
            Some(subject) => (subject.id().to_string(), subject.display()),
            None => (
                UNASSIGNED_SUBJECT.to_string(),
                MISSING_SUBJECT_LABEL.to_string(),
            ),
        };

        let (departments, years): (BTreeSet<&str>, BTreeSet<u8>) = match cohort_match {
            CohortMatch::SameGroup => {
                let matching: Vec<&AllowedGroup> = quiz
                    .allowed_groups
                    .iter()
                    .filter(|group| facets.group_matches(group))
                    .collect();
                (
                    matching.iter().map(|&group| group.department.as_str()).collect(),
                    matching.iter().map(|group| group.year).collect(),
                )
            }
            CohortMatch::AnyGroup => (
                quiz.allowed_groups
                    .iter()
                    .filter(|group| facets.department_matches(group))
                    .map(|group| group.department.as_str())
                    .collect(),
                quiz.allowed_groups
                    .iter()
                    .filter(|group| facets.year_matches(group))
                    .map(|group| group.year)
                    .collect(),
            ),
        };

        let scored: Vec<ScoredSubmission> = submissions
            .iter()
            .map(|submission| score_submission(quiz, submission))
            .collect();

        let subject = &mut self
            .subjects
            .entry(subject_key)
            .or_insert_with(|| (subject_label, BucketAccumulator::default()))
            .1;
        for entry in &scored {
            subject.record(entry.score);
            self.overall.record(entry.score);
            self.distribution.record(entry.band);
        }

        for department in departments {
            let bucket = self.departments.entry(department.to_string()).or_default();
            scored.iter().for_each(|entry| bucket.record(entry.score));
        }

        for year in years {
            let bucket = self.years.entry(year).or_default();
            scored.iter().for_each(|entry| bucket.record(entry.score));
        }
    }

    fn finish(self) -> QuizStatistics {
        QuizStatistics {
            quizzes_counted: self.quizzes_counted,
            total_students: self.total_students,
            overall: self.overall.finish(),
            score_distribution: self.distribution,
            by_subject: self
                .subjects
                .into_iter()
                .map(|(key, (label, bucket))| {
                    (
                        key,
                        SubjectBucket {
                            label,
                            stats: bucket.finish(),
                        },
                    )
                })
                .collect(),
            by_department: self
                .departments
                .into_iter()
                .map(|(key, bucket)| (key, bucket.finish()))
                .collect(),
            by_year: self
                .years
                .into_iter()
                .map(|(key, bucket)| (key, bucket.finish()))
                .collect(),
        }
    }
}

/// Reduces the quiz population to overall, per-subject, per-department, and
/// per-year statistics.
///
/// Quizzes are visited in slice order and submissions in list order, so the
/// floating point sums (and therefore the output) are reproducible.
pub fn aggregate(
    quizzes: &[Quiz],
    submissions: &SubmissionsByQuiz,
    facets: &QuizFacets,
    cohort_match: CohortMatch,
) -> QuizStatistics {
    let mut builder = StatisticsBuilder::default();

    for quiz in quizzes
        .iter()
        .filter(|quiz| facets.matches(quiz, cohort_match))
    {
        let quiz_submissions = submissions
            .get(&quiz.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        builder.add_quiz(quiz, quiz_submissions, facets, cohort_match);
    }

    builder.finish()
}
