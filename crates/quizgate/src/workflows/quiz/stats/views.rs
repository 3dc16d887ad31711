use super::super::scoring::ScoreBand;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionStatusEntry {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBandEntry {
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPerformanceEntry {
    pub key: String,
    pub label: String,
    pub submissions: u64,
    pub average: f64,
}

/// Chart-ready projection of a statistics aggregate. Empty slices are
/// omitted and averages are rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub submission_status: Vec<SubmissionStatusEntry>,
    pub score_bands: Vec<ScoreBandEntry>,
    pub subjects: Vec<GroupPerformanceEntry>,
    pub departments: Vec<GroupPerformanceEntry>,
    pub years: Vec<GroupPerformanceEntry>,
}
