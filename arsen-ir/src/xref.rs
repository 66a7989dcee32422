use serde::Serialize;

use crate::address::Address;

/// Kind of relationship a cross-reference records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum XrefKind {
    Call,
    Jump,
    DataRead,
    DataWrite,
}

/// A recorded control/data relationship between two addresses.
///
/// Appended once per qualifying instruction; never deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrossReference {
    pub from: Address,
    pub to: Address,
    pub kind: XrefKind,
}
