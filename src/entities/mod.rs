// Entity Models - Parents, personnel, compliance records

pub mod parent;
pub mod personnel;
pub mod regulatory;

pub use parent::{EntityKind, ParentEntity, PersonnelField};
pub use personnel::{InvalidRecord, PersonnelRecord, PersonnelRole};
pub use regulatory::{value_id, BulletinEntry, CaseLink, RegulatoryRecord, RegulatoryStatus};
