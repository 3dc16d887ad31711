use super::super::scoring::ScoreBand;
use super::aggregate::{AggregateBucket, QuizStatistics};
use super::views::{
    GroupPerformanceEntry, ScoreBandEntry, StatisticsSummary, SubmissionStatusEntry,
};

impl QuizStatistics {
    pub fn summary(&self) -> StatisticsSummary {
        let submitted = self.submitted_count();
        let submission_status = [
            ("Submitted", submitted),
            (
                "Not Submitted",
                self.total_students.saturating_sub(submitted),
            ),
        ]
        .into_iter()
        .filter(|(_, value)| *value > 0)
        .map(|(label, value)| SubmissionStatusEntry { label, value })
        .collect();

        let score_bands = ScoreBand::ordered()
            .into_iter()
            .map(|band| ScoreBandEntry {
                band,
                band_label: band.label(),
                count: self.score_distribution.count(band),
            })
            .filter(|entry| entry.count > 0)
            .collect();

        let subjects = self
            .by_subject
            .iter()
            .filter_map(|(key, bucket)| {
                group_entry(key.clone(), bucket.label.clone(), &bucket.stats)
            })
            .collect();

        let departments = self
            .by_department
            .iter()
            .filter_map(|(key, bucket)| group_entry(key.clone(), key.clone(), bucket))
            .collect();

        let years = self
            .by_year
            .iter()
            .filter_map(|(year, bucket)| {
                group_entry(year.to_string(), format!("Year {year}"), bucket)
            })
            .collect();

        StatisticsSummary {
            submission_status,
            score_bands,
            subjects,
            departments,
            years,
        }
    }
}

fn group_entry(
    key: String,
    label: String,
    bucket: &AggregateBucket,
) -> Option<GroupPerformanceEntry> {
    (bucket.total_submissions > 0).then(|| GroupPerformanceEntry {
        key,
        label,
        submissions: bucket.total_submissions,
        average: round_one_decimal(bucket.average_score_percent),
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
