use serde::Serialize;

/// A virtual address: an opaque 64-bit offset with total numeric order.
///
/// Used as the map key throughout the analysis core. Comparison and
/// hashing are purely numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(pub u64);

impl Address {
    pub fn new(value: u64) -> Self {
        Address(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Offset this address by a signed displacement, wrapping on overflow.
    pub fn add(self, offset: i64) -> Address {
        Address(self.0.wrapping_add(offset as u64))
    }

    /// Absolute distance in bytes between two addresses.
    pub fn distance(self, other: Address) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018X}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address(value)
    }
}
