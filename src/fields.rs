// 🗂️ Field Normalizer - Resolve messy source keys to canonical attributes
// The remote store grew by accretion: every importer used its own casing
// and naming for the same personnel fields. This module maps them back.

use serde_json::{Map, Value};
use tracing::warn;

/// A raw record as it comes off the wire: an untyped JSON object.
pub type RawRecord = Map<String, Value>;

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Canonical attributes a personnel or compliance record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Name,
    Contact,
    DateOfBirth,
    BirthPlace,
    StartDate,
    EndDate,
    CaseCount,
    RiskScore,
    Position,
    Department,
    ReasonForLeaving,
    Source,
}

impl Attribute {
    /// Ordered alias list. Earlier entries win.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Attribute::Name => &["name", "Name", "NAME", "full_name", "fullName"],
            Attribute::Contact => &["contact", "Contact", "phone", "contact_info", "contactInfo"],
            Attribute::DateOfBirth => &["date_of_birth", "dob", "birth_date", "birthDate"],
            Attribute::BirthPlace => &["birth_place", "place_of_birth", "birthPlace"],
            Attribute::StartDate => &[
                "appointment_date",
                "start_date",
                "startDate",
                "appointed_on",
            ],
            Attribute::EndDate => &["end_date", "termination_date", "endDate"],
            Attribute::CaseCount => &["case_count", "cases", "caseCount"],
            Attribute::RiskScore => &["risk_score", "riskScore", "risk"],
            Attribute::Position => &["position", "title", "job_title", "jobTitle"],
            Attribute::Department => &["department", "dept"],
            Attribute::ReasonForLeaving => &["reason_for_leaving", "leaving_reason", "reasonForLeaving"],
            Attribute::Source => &["source", "data_source", "dataSource"],
        }
    }
}

/// Fields that must never be mistaken for a name during the heuristic scan.
const NAME_SCAN_DENYLIST: &[&str] = &[
    "contact",
    "contact_info",
    "phone",
    "telephone",
    "mobile",
    "email",
    "address",
    "fax",
    "website",
    "id",
    "source",
    "notes",
];

/// Values that mean "nothing here" even though the key is present.
const EMPTY_SENTINELS: &[&str] = &["", "n/a", "na", "none", "null", "undefined", "-"];

// ============================================================================
// RESOLUTION
// ============================================================================

/// Outcome of resolving one attribute against a raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Found under a known alias.
    Direct(Value),

    /// Recovered by scanning arbitrary string fields. Audit-flagged:
    /// the caller must surface this, never treat it as a clean read.
    Heuristic(String),

    /// No alias matched and no fallback applied.
    Invalid,
}

impl Resolution {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Resolution::Invalid)
    }

    /// The resolved value as a trimmed string, if it is one (or a number).
    pub fn as_text(&self) -> Option<String> {
        match self {
            Resolution::Direct(Value::String(s)) => Some(s.trim().to_string()),
            Resolution::Direct(Value::Number(n)) => Some(n.to_string()),
            Resolution::Direct(_) => None,
            Resolution::Heuristic(s) => Some(s.clone()),
            Resolution::Invalid => None,
        }
    }
}

/// Resolve `attribute` against `record` via its alias list.
///
/// Null values and empty sentinels count as absent: a record that carries
/// `"end_date": "null"` has no end date.
pub fn resolve(record: &RawRecord, attribute: Attribute) -> Resolution {
    for alias in attribute.aliases() {
        if let Some(value) = record.get(*alias) {
            if is_present(value) {
                return Resolution::Direct(value.clone());
            }
        }
    }

    // Only names get the last-resort scan; guessing an end date or a risk
    // score from an arbitrary field would manufacture data.
    if attribute == Attribute::Name {
        if let Some(candidate) = scan_for_name(record) {
            warn!(candidate = %candidate, "name recovered heuristically; flagging for audit");
            return Resolution::Heuristic(candidate);
        }
    }

    Resolution::Invalid
}

/// True if a value is actually carrying data.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !EMPTY_SENTINELS.contains(&s.trim().to_lowercase().as_str()),
        _ => true,
    }
}

/// Last-resort scan: first string field not on the denylist whose trimmed
/// length is 2..=199. Importers have been seen stuffing names under keys
/// like "director" or "person_1".
fn scan_for_name(record: &RawRecord) -> Option<String> {
    for (key, value) in record {
        let key_lower = key.to_lowercase();
        if NAME_SCAN_DENYLIST.iter().any(|d| key_lower.contains(d)) {
            continue;
        }
        if let Value::String(s) = value {
            let trimmed = s.trim();
            if EMPTY_SENTINELS.contains(&trimmed.to_lowercase().as_str()) {
                continue;
            }
            if (2..=199).contains(&trimmed.len()) {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> RawRecord {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_resolve_direct_alias() {
        let rec = record(json!({"fullName": "Jane Doe"}));
        let res = resolve(&rec, Attribute::Name);
        assert_eq!(res, Resolution::Direct(json!("Jane Doe")));
        assert_eq!(res.as_text().as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_alias_order_wins() {
        let rec = record(json!({"full_name": "Alias Name", "name": "Primary Name"}));
        let res = resolve(&rec, Attribute::Name);
        assert_eq!(res.as_text().as_deref(), Some("Primary Name"));
    }

    #[test]
    fn test_sentinel_values_are_absent() {
        for sentinel in ["", "n/a", "NULL", "undefined", "-"] {
            let rec = record(json!({"end_date": sentinel}));
            assert!(
                resolve(&rec, Attribute::EndDate).is_invalid(),
                "sentinel {:?} should resolve as absent",
                sentinel
            );
        }
    }

    #[test]
    fn test_heuristic_name_scan() {
        let rec = record(json!({"director": "Mary Jones", "phone": "555-0100"}));
        match resolve(&rec, Attribute::Name) {
            Resolution::Heuristic(name) => assert_eq!(name, "Mary Jones"),
            other => panic!("expected heuristic recovery, got {:?}", other),
        }
    }

    #[test]
    fn test_heuristic_scan_respects_denylist() {
        let rec = record(json!({"email": "jane@example.com", "contact": "555-0100"}));
        assert!(resolve(&rec, Attribute::Name).is_invalid());
    }

    #[test]
    fn test_heuristic_scan_length_bounds() {
        // One char is too short to be a name
        let rec = record(json!({"person": "X"}));
        assert!(resolve(&rec, Attribute::Name).is_invalid());

        let long = "x".repeat(200);
        let rec = record(json!({"person": long}));
        assert!(resolve(&rec, Attribute::Name).is_invalid());
    }

    #[test]
    fn test_no_heuristic_for_non_name_attributes() {
        // A stray string must not be mistaken for an end date
        let rec = record(json!({"whatever": "2020-01-01"}));
        assert!(resolve(&rec, Attribute::EndDate).is_invalid());
    }

    #[test]
    fn test_numeric_value_as_text() {
        let rec = record(json!({"case_count": 3}));
        assert_eq!(resolve(&rec, Attribute::CaseCount).as_text().as_deref(), Some("3"));
    }
}
