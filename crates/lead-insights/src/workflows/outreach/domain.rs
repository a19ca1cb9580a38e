use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use super::loader::vocabulary;

/// Calendar month bucket used for the monthly rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How an outcome value is classified against the fixed vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    NoResponse,
    Positive,
    Negative,
    Other,
}

impl OutcomeClass {
    /// Classifies an already-normalized outcome string.
    pub fn classify(outcome: &str) -> Self {
        if vocabulary::NO_RESPONSE.contains(&outcome) {
            Self::NoResponse
        } else if vocabulary::POSITIVE.contains(&outcome) {
            Self::Positive
        } else if outcome == vocabulary::NEGATIVE {
            Self::Negative
        } else {
            Self::Other
        }
    }

    pub const fn had_return(self) -> bool {
        !matches!(self, Self::NoResponse)
    }

    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }

    pub const fn is_effective(self) -> bool {
        matches!(self, Self::Positive | Self::Negative)
    }
}

/// One cleaned outreach row. Derived fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRecord {
    approached_at: NaiveDateTime,
    segment: String,
    channel: String,
    outcome: String,
    day: NaiveDate,
    month: YearMonth,
    class: OutcomeClass,
}

impl LeadRecord {
    /// Builds a record from normalized categorical values.
    pub fn new(
        approached_at: NaiveDateTime,
        segment: String,
        channel: String,
        outcome: String,
    ) -> Self {
        let day = approached_at.date();
        let class = OutcomeClass::classify(&outcome);
        Self {
            approached_at,
            segment,
            channel,
            outcome,
            day,
            month: YearMonth::of(day),
            class,
        }
    }

    pub fn approached_at(&self) -> NaiveDateTime {
        self.approached_at
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn outcome_class(&self) -> OutcomeClass {
        self.class
    }

    pub fn had_return(&self) -> bool {
        self.class.had_return()
    }

    pub fn positive_response(&self) -> bool {
        self.class.is_positive()
    }

    pub fn effective_response(&self) -> bool {
        self.class.is_effective()
    }

    pub fn is_no_response(&self) -> bool {
        !self.had_return()
    }

    pub fn is_negative(&self) -> bool {
        self.class == OutcomeClass::Negative
    }
}

/// Cleaned, immutable snapshot of one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadTable {
    source: PathBuf,
    records: Vec<LeadRecord>,
    dropped_rows: usize,
}

impl LeadTable {
    pub fn new(source: impl Into<PathBuf>, records: Vec<LeadRecord>, dropped_rows: usize) -> Self {
        Self {
            source: source.into(),
            records,
            dropped_rows,
        }
    }

    pub fn empty(source: impl Into<PathBuf>) -> Self {
        Self::new(source, Vec::new(), 0)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[LeadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows excluded because their timestamp did not parse.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.records.iter().map(LeadRecord::day).max()
    }
}
