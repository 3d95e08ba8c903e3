// ⏰ Temporal Classifier - Current vs Former from an end-date field
// The classification is recomputed on every read, never stored: an end
// date in the future flips to Former by itself when the date passes.
//
// Fail-open rule: an unparseable end date is a data artifact, not
// evidence of departure. Only a parseable date strictly in the past
// makes a record Former.

use chrono::{DateTime, NaiveDate, Utc};

use crate::fields::{self, Attribute, RawRecord};

// ============================================================================
// TENURE
// ============================================================================

/// Temporal status of a personnel record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Tenure {
    /// No end date, a future end date, or an unparseable one
    Current,

    /// A parseable end date strictly before today
    Former,
}

impl Tenure {
    pub fn is_current(&self) -> bool {
        matches!(self, Tenure::Current)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tenure::Current => "Current",
            Tenure::Former => "Former",
        }
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classify a raw record as Current or Former, evaluated against today.
pub fn classify(record: &RawRecord) -> Tenure {
    classify_at(record, Utc::now().date_naive())
}

/// Classify against an explicit reference date. Total over all inputs.
pub fn classify_at(record: &RawRecord, today: NaiveDate) -> Tenure {
    let end_date = match fields::resolve(record, Attribute::EndDate).as_text() {
        Some(text) => text,
        None => return Tenure::Current, // absent → still serving
    };

    match parse_flexible_date(&end_date) {
        Some(date) if date < today => Tenure::Former,
        // Future end date: departure is scheduled, not effective
        Some(_) => Tenure::Current,
        // Unparseable → fail open
        None => Tenure::Current,
    }
}

/// Parse a date in any of the formats importers have produced.
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

// ============================================================================
// TESTS
// ============================================================================
