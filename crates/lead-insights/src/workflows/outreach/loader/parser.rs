use super::normalizer::normalize_category;
use super::LoadError;
use crate::workflows::outreach::domain::LeadRecord;
use calamine::Data;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;

pub const APPROACHED_AT_COLUMN: &str = "DATA_ABORDAGEM";
pub const SEGMENT_COLUMN: &str = "SEGMENTO";
pub const CHANNEL_COLUMN: &str = "CANAL";
pub const OUTCOME_COLUMN: &str = "RESULTADO";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    APPROACHED_AT_COLUMN,
    SEGMENT_COLUMN,
    CHANNEL_COLUMN,
    OUTCOME_COLUMN,
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

static EMPTY_CELL: SourceCell = SourceCell::Empty;

/// A single spreadsheet cell, independent of the file format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCell {
    Empty,
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
}

impl SourceCell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// The value as a spreadsheet would display it.
    pub fn display(&self) -> String {
        match self {
            SourceCell::Empty => String::new(),
            SourceCell::Text(value) => value.clone(),
            SourceCell::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    value.to_string()
                }
            }
            SourceCell::Timestamp(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SourceCell::Timestamp(value) => Some(*value),
            SourceCell::Text(value) => parse_timestamp(value),
            SourceCell::Empty | SourceCell::Number(_) => None,
        }
    }
}

impl From<&Data> for SourceCell {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::String(value) => SourceCell::text(value.as_str()),
            Data::Float(value) => SourceCell::Number(*value),
            Data::Int(value) => SourceCell::Number(*value as f64),
            Data::Bool(value) => SourceCell::Text(if *value { "True" } else { "False" }.into()),
            Data::DateTime(value) => value
                .as_datetime()
                .map(SourceCell::Timestamp)
                .unwrap_or(SourceCell::Empty),
            Data::DateTimeIso(value) | Data::DurationIso(value) => SourceCell::text(value.as_str()),
            Data::Error(_) | Data::Empty => SourceCell::Empty,
        }
    }
}

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    approached_at: usize,
    segment: usize,
    channel: usize,
    outcome: usize,
}

impl ColumnLayout {
    pub(crate) fn resolve(headers: &[SourceCell]) -> Result<Self, LoadError> {
        let names: Vec<String> = headers
            .iter()
            .map(|cell| normalize_category(&cell.display()))
            .collect();
        let position = |column: &'static str| {
            names
                .iter()
                .position(|name| name == column)
                .ok_or(LoadError::MissingColumn { column })
        };

        Ok(Self {
            approached_at: position(APPROACHED_AT_COLUMN)?,
            segment: position(SEGMENT_COLUMN)?,
            channel: position(CHANNEL_COLUMN)?,
            outcome: position(OUTCOME_COLUMN)?,
        })
    }
}

/// Output of a parse pass: kept records and how many rows were filtered out.
#[derive(Debug, Default)]
pub(crate) struct ParsedRows {
    pub(crate) records: Vec<LeadRecord>,
    pub(crate) dropped: usize,
}

/// Parses a header row followed by data rows. Rows without a parseable
/// timestamp are counted and skipped; fully blank rows are ignored.
pub(crate) fn parse_rows<I>(rows: I) -> Result<ParsedRows, LoadError>
where
    I: IntoIterator<Item = Vec<SourceCell>>,
{
    let mut rows = rows.into_iter();
    let headers = rows.next().unwrap_or_default();
    let layout = ColumnLayout::resolve(&headers)?;
    let mut parsed = ParsedRows::default();

    for row in rows {
        if row.iter().all(|cell| *cell == SourceCell::Empty) {
            continue;
        }

        let cell = |index: usize| row.get(index).unwrap_or(&EMPTY_CELL);
        let Some(approached_at) = cell(layout.approached_at).timestamp() else {
            parsed.dropped += 1;
            continue;
        };

        parsed.records.push(LeadRecord::new(
            approached_at,
            normalize_category(&cell(layout.segment).display()),
            normalize_category(&cell(layout.channel).display()),
            normalize_category(&cell(layout.outcome).display()),
        ));
    }

    Ok(parsed)
}

/// Reads a CSV export into cells, header row first.
pub(crate) fn read_csv_cells<R: Read>(reader: R) -> Result<Vec<Vec<SourceCell>>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(SourceCell::text).collect());
    }

    Ok(rows)
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
