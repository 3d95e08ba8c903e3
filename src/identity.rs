// 🔍 Identity Resolver - Map a displayed record back to its raw position
// Array-backed collections carry no persisted id, so the normalized name
// is the de-facto identity key. First match wins; duplicate names within
// one collection resolve to the earliest raw entry (known limitation,
// see DESIGN.md).
//
// `synthetic_id` is the migration path off name identity: a stable
// content hash over the normalized fields.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::entities::PersonnelRecord;
use crate::fields::{self, Attribute, RawRecord};

// ============================================================================
// NAME NORMALIZATION
// ============================================================================

/// Normalize a name for identity comparison: trim, collapse internal
/// whitespace, lowercase.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// A displayed record located in its raw list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity<'a> {
    /// Splice index for save/delete
    pub raw_index: usize,
    /// Original unformatted wire record, for edit forms
    pub raw: &'a RawRecord,
}

/// Locate a displayed record in the raw list by normalized-name equality.
pub fn resolve_by_name<'a>(
    displayed_name: &str,
    raw_list: &'a [RawRecord],
) -> Option<ResolvedIdentity<'a>> {
    let wanted = normalize_name(displayed_name);
    if wanted.is_empty() {
        return None;
    }

    raw_list.iter().enumerate().find_map(|(raw_index, raw)| {
        let name = fields::resolve(raw, Attribute::Name).as_text()?;
        if normalize_name(&name) == wanted {
            Some(ResolvedIdentity { raw_index, raw })
        } else {
            None
        }
    })
}

/// Convenience wrapper taking the normalized record.
pub fn resolve<'a>(
    displayed: &PersonnelRecord,
    raw_list: &'a [RawRecord],
) -> Option<ResolvedIdentity<'a>> {
    resolve_by_name(&displayed.name, raw_list)
}

/// Remove every raw entry whose normalized name matches. Returns the new
/// list and how many entries were dropped (delete path for array-backed
/// collections).
pub fn filter_out_name(raw_list: &[RawRecord], name: &str) -> (Vec<RawRecord>, usize) {
    let wanted = normalize_name(name);
    let mut kept = Vec::with_capacity(raw_list.len());
    let mut removed = 0;

    for raw in raw_list {
        let matches = fields::resolve(raw, Attribute::Name)
            .as_text()
            .map(|n| normalize_name(&n) == wanted)
            .unwrap_or(false);
        if matches {
            removed += 1;
        } else {
            kept.push(raw.clone());
        }
    }

    (kept, removed)
}

// ============================================================================
// SYNTHETIC ID
// ============================================================================

/// Stable synthetic id: sha-256 over the record's normalized fields.
///
/// Deterministic for equal content regardless of key order or alias
/// spelling. Not yet used as the match key (the store round-trips records
/// without it); exposed so a future store migration can require real ids.
pub fn synthetic_id(raw: &RawRecord) -> String {
    let mut canonical = BTreeMap::new();
    for attribute in [
        Attribute::Name,
        Attribute::Contact,
        Attribute::DateOfBirth,
        Attribute::BirthPlace,
        Attribute::StartDate,
        Attribute::EndDate,
        Attribute::Position,
        Attribute::Department,
    ] {
        if let Some(text) = fields::resolve(raw, attribute).as_text() {
            canonical.insert(format!("{:?}", attribute), normalize_name(&text));
        }
    }

    let mut hasher = Sha256::new();
    for (key, value) in &canonical {
        hasher.update(key.as_bytes());
        hasher.update([b'=']);
        hasher.update(value.as_bytes());
        hasher.update([b'\n']);
    }
    format!("pr-{:x}", hasher.finalize())
}

// ============================================================================
// TESTS
// ============================================================================
