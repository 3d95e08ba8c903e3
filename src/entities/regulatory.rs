// 📋 Compliance Records - Regulatory filings, case links, bulletins
// Unlike the personnel fields these are id-backed: each record is
// individually addressable once the store has assigned it an id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// REGULATORY STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegulatoryStatus {
    Active,
    Valid,
    Expired,
    Suspended,
    Pending,
}

impl RegulatoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegulatoryStatus::Active => "Active",
            RegulatoryStatus::Valid => "Valid",
            RegulatoryStatus::Expired => "Expired",
            RegulatoryStatus::Suspended => "Suspended",
            RegulatoryStatus::Pending => "Pending",
        }
    }

    /// Case-insensitive parse; unknown statuses come back as None so the
    /// caller decides whether to default or reject.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "active" => Some(RegulatoryStatus::Active),
            "valid" => Some(RegulatoryStatus::Valid),
            "expired" => Some(RegulatoryStatus::Expired),
            "suspended" => Some(RegulatoryStatus::Suspended),
            "pending" => Some(RegulatoryStatus::Pending),
            _ => None,
        }
    }
}

// ============================================================================
// REGULATORY RECORD
// ============================================================================

/// A regulatory filing attached to a parent entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryRecord {
    /// Stable once persisted; None before the first POST
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub entity_id: String,
    pub regulatory_body: String,
    pub license_number: String,
    pub status: RegulatoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RegulatoryRecord {
    /// Absorb the server-assigned id from a create response.
    pub fn with_id_from(mut self, response: &Value) -> Self {
        if let Some(id) = value_id(response) {
            self.id = Some(id);
        }
        self
    }
}

// ============================================================================
// CASE LINK
// ============================================================================

/// Association between a parent entity and a case, with a role label.
/// The link id is optional: links created through the legacy path never
/// received one and can only be removed by local filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub entity_id: String,
    pub case_id: String,
    pub role: String,
}

// ============================================================================
// BULLETIN ENTRY
// ============================================================================

/// A gazette notice concerning a parent entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub entity_id: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_on: Option<String>,
}

/// Extract an id that may arrive as a string or a number.
pub fn value_id(value: &Value) -> Option<String> {
    value.get("id").and_then(|id| {
        id.as_i64()
            .map(|n| n.to_string())
            .or_else(|| id.as_str().map(String::from))
    })
}

// ============================================================================
// TESTS
// ============================================================================
