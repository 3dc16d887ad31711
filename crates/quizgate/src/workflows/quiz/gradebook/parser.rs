use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct GradebookRow {
    pub(crate) line: u64,
    pub(crate) quiz_id: String,
    pub(crate) student_id: String,
    pub(crate) submission_id: Option<String>,
    pub(crate) status: String,
    pub(crate) marks: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<GradebookRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        let raw = record?;
        rows.push(GradebookRow {
            // header is line 1
            line: index as u64 + 2,
            quiz_id: raw.quiz_id,
            student_id: raw.student_id,
            submission_id: raw.submission_id,
            status: raw.status,
            marks: raw.marks,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Quiz ID")]
    quiz_id: String,
    #[serde(rename = "Student ID")]
    student_id: String,
    #[serde(
        rename = "Submission ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    submission_id: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Marks", default, deserialize_with = "empty_string_as_none")]
    marks: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Splits a `;`-separated marks cell. Blank entries are skipped.
pub(crate) fn parse_marks(cell: &str) -> Result<Vec<f64>, String> {
    cell.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value
                .parse::<f64>()
                .ok()
                .filter(|marks| marks.is_finite())
                .ok_or_else(|| value.to_string())
        })
        .collect()
}
