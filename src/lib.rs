// Entity Registry - Personnel & Compliance Record Reconciliation Engine
// Exposes all modules for use in the admin frontends and tests

pub mod fields;      // Field Normalizer - alias resolution + heuristic scan
pub mod coerce;      // Shape Coercer - any wire shape → record list
pub mod temporal;    // Temporal Classifier - Current vs Former
pub mod projection;  // Record Projection - memoized {current, former} views
pub mod identity;    // Identity Resolver - name matching + synthetic ids
pub mod gateway;     // Reconciliation Gateway - mutations + re-fetch
pub mod client;      // HTTP client for the registry API
pub mod entities;    // Entity Models - parents, personnel, compliance

// Re-export commonly used types
pub use fields::{Attribute, RawRecord, Resolution};
pub use coerce::coerce;
pub use temporal::{classify, classify_at, parse_flexible_date, Tenure};
pub use projection::{project, project_at, Projection, ProjectionCache, ProjectionWarning};
pub use identity::{normalize_name, resolve_by_name, synthetic_id, ResolvedIdentity};
pub use gateway::{
    ApiClient, ApiError, DeleteOutcome, GatewaySettings, ReconciliationGateway, SaveOutcome,
};
pub use client::HttpApiClient;
pub use entities::{
    BulletinEntry, CaseLink, EntityKind, InvalidRecord, ParentEntity, PersonnelField,
    PersonnelRecord, PersonnelRole, RegulatoryRecord, RegulatoryStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
