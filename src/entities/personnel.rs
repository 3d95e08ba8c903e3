// 👤 Personnel Record - Normalized view of a director/secretary/employee
// Raw wire records stay untyped (RawRecord); this is the normalized
// value the admin renders and edits. Building one is fallible exactly
// once: a record with no resolvable name is Invalid and never persisted.

use serde::{Deserialize, Serialize};

use crate::fields::{self, Attribute, RawRecord, Resolution};

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonnelRole {
    Director,
    BoardMember,
    Secretary,
    Employee,
}

impl PersonnelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonnelRole::Director => "Director",
            PersonnelRole::BoardMember => "Board Member",
            PersonnelRole::Secretary => "Secretary",
            PersonnelRole::Employee => "Employee",
        }
    }
}

// ============================================================================
// PERSONNEL RECORD
// ============================================================================

/// A coerced record whose name could not be resolved. Surfaced for audit,
/// never silently dropped and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRecord {
    pub reason: String,
}

/// Normalized personnel record.
///
/// Date fields are kept as the original wire strings: edit forms must show
/// what the store holds, and the Temporal Classifier parses on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelRecord {
    /// Required; non-empty after trim
    pub name: String,
    pub contact: Option<String>,
    pub date_of_birth: Option<String>,
    pub birth_place: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub case_count: Option<i64>,
    pub risk_score: Option<f64>,

    // Employee-only fields; None for the other roles
    pub position: Option<String>,
    pub department: Option<String>,
    pub reason_for_leaving: Option<String>,
    pub source: Option<String>,

    /// Set when the name came from the heuristic field scan.
    /// Audit flag: the admin shows these records with a review marker.
    #[serde(default)]
    pub recovered_heuristically: bool,
}

impl PersonnelRecord {
    /// Normalize a raw wire record. Fails only on a missing/empty name.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, InvalidRecord> {
        let (name, recovered) = match fields::resolve(raw, Attribute::Name) {
            Resolution::Direct(value) => {
                let text = Resolution::Direct(value).as_text().unwrap_or_default();
                (text, false)
            }
            Resolution::Heuristic(name) => (name, true),
            Resolution::Invalid => {
                return Err(InvalidRecord {
                    reason: "no resolvable name field".to_string(),
                })
            }
        };

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(InvalidRecord {
                reason: "name empty after trim".to_string(),
            });
        }

        Ok(PersonnelRecord {
            name,
            contact: text_of(raw, Attribute::Contact),
            date_of_birth: text_of(raw, Attribute::DateOfBirth),
            birth_place: text_of(raw, Attribute::BirthPlace),
            start_date: text_of(raw, Attribute::StartDate),
            end_date: text_of(raw, Attribute::EndDate),
            case_count: fields::resolve(raw, Attribute::CaseCount)
                .as_text()
                .and_then(|t| t.parse().ok()),
            risk_score: fields::resolve(raw, Attribute::RiskScore)
                .as_text()
                .and_then(|t| t.parse().ok()),
            position: text_of(raw, Attribute::Position),
            department: text_of(raw, Attribute::Department),
            reason_for_leaving: text_of(raw, Attribute::ReasonForLeaving),
            source: text_of(raw, Attribute::Source),
            recovered_heuristically: recovered,
        })
    }

    /// Serialize back to the wire shape, canonical keys only.
    pub fn to_raw(&self) -> RawRecord {
        let mut map = RawRecord::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "contact", &self.contact);
        insert_opt(&mut map, "date_of_birth", &self.date_of_birth);
        insert_opt(&mut map, "birth_place", &self.birth_place);
        insert_opt(&mut map, "start_date", &self.start_date);
        insert_opt(&mut map, "end_date", &self.end_date);
        if let Some(n) = self.case_count {
            map.insert("case_count".into(), n.into());
        }
        if let Some(r) = self.risk_score {
            map.insert("risk_score".into(), r.into());
        }
        insert_opt(&mut map, "position", &self.position);
        insert_opt(&mut map, "department", &self.department);
        insert_opt(&mut map, "reason_for_leaving", &self.reason_for_leaving);
        insert_opt(&mut map, "source", &self.source);
        map
    }
}

fn text_of(raw: &RawRecord, attribute: Attribute) -> Option<String> {
    fields::resolve(raw, attribute)
        .as_text()
        .filter(|t| !t.is_empty())
}

fn insert_opt(map: &mut RawRecord, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(key.to_string(), v.clone().into());
    }
}

// ============================================================================
// TESTS
// ============================================================================
