// 🏛️ Parent Entity - Company / Bank / Insurer
// The parent owns the array-backed personnel fields. Those fields are
// kept as raw `serde_json::Value` on purpose: each one is independently
// JSON-string-or-native-array typed on the wire, and only the Shape
// Coercer is allowed to interpret them.

use serde_json::Value;

use crate::coerce;
use crate::entities::personnel::PersonnelRole;
use crate::fields::RawRecord;

// ============================================================================
// ENTITY KIND
// ============================================================================

/// Which register the entity lives in. Selects the API namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    Company,
    Bank,
    Insurer,
}

impl EntityKind {
    /// Path segment of the per-entity endpoints.
    pub fn namespace(&self) -> &'static str {
        match self {
            EntityKind::Company => "companies",
            EntityKind::Bank => "banks",
            EntityKind::Insurer => "insurance",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Company => "Company",
            EntityKind::Bank => "Bank",
            EntityKind::Insurer => "Insurer",
        }
    }
}

// ============================================================================
// PERSONNEL FIELDS
// ============================================================================

/// The four array-backed personnel fields a parent entity carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonnelField {
    Directors,
    Board,
    Secretary,
    Employees,
}

impl PersonnelField {
    /// Field name on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            PersonnelField::Directors => "directors",
            PersonnelField::Board => "board_of_directors",
            PersonnelField::Secretary => "secretary",
            PersonnelField::Employees => "key_personnel",
        }
    }

    /// Secretary is 0..1; everything else is a list.
    pub fn is_singleton(&self) -> bool {
        matches!(self, PersonnelField::Secretary)
    }

    /// Role the records in this field hold.
    pub fn role(&self) -> PersonnelRole {
        match self {
            PersonnelField::Directors => PersonnelRole::Director,
            PersonnelField::Board => PersonnelRole::BoardMember,
            PersonnelField::Secretary => PersonnelRole::Secretary,
            PersonnelField::Employees => PersonnelRole::Employee,
        }
    }

    pub fn all() -> [PersonnelField; 4] {
        [
            PersonnelField::Directors,
            PersonnelField::Board,
            PersonnelField::Secretary,
            PersonnelField::Employees,
        ]
    }
}

// ============================================================================
// PARENT ENTITY
// ============================================================================

/// A registered legal entity as fetched from the store.
///
/// `raw` holds the complete wire object; typed accessors carve out what the
/// engine needs. Re-fetching after every mutation replaces `raw` wholesale,
/// so projections never drift from the store's canonical representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentEntity {
    /// Opaque store identifier (the wire sends strings or numbers)
    pub id: String,
    pub kind: EntityKind,
    pub name: String,
    /// Full wire object, untouched
    pub raw: Value,
}

impl ParentEntity {
    /// Build from a GET response body. Only the id is mandatory.
    pub fn from_value(kind: EntityKind, value: Value) -> Option<Self> {
        let id = value
            .get("id")
            .and_then(|id| {
                id.as_i64()
                    .map(|n| n.to_string())
                    .or_else(|| id.as_str().map(String::from))
            })?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(ParentEntity {
            id,
            kind,
            name,
            raw: value,
        })
    }

    /// The raw wire value of one personnel field (Null when absent).
    pub fn personnel_field(&self, field: PersonnelField) -> &Value {
        self.raw.get(field.wire_name()).unwrap_or(&Value::Null)
    }

    /// Canonical record list for one personnel field, whatever shape the
    /// store returned it in.
    pub fn personnel_records(&self, field: PersonnelField) -> Vec<RawRecord> {
        coerce::coerce(self.personnel_field(field))
    }
}

// ============================================================================
// TESTS
// ============================================================================
