//! Fixed-capacity value set for one facet.
//!
//! A `Mask` is the set of values chosen (or carried, for a record) along a
//! single facet. It is stored as a bit-packed `u32` but behaves as an
//! explicit set: union, intersection, symmetric difference, membership,
//! equality. Capacity is a checked constant, not a side effect of the
//! storage width — `single` and `all` refuse positions past `CAPACITY`.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign};

use serde::{Deserialize, Serialize};

/// Set of value positions within one facet.
///
/// Bit `i` corresponds to the facet's `i`-th value in catalog order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mask(u32);

impl Mask {
    /// Maximum number of values a single facet may declare.
    ///
    /// 31 keeps every mask representable in a 32-bit signed integer, so the
    /// raw bits survive round-trips through JSON consumers that only have
    /// doubles or signed ints.
    pub const CAPACITY: usize = 31;

    /// The empty set (facet unconstrained).
    pub const EMPTY: Mask = Mask(0);

    /// Set containing exactly the value at `position`.
    ///
    /// Returns `None` when `position` is outside the supported capacity.
    pub fn single(position: usize) -> Option<Mask> {
        (position < Self::CAPACITY).then(|| Mask(1 << position))
    }

    /// Set containing all of the first `count` values (a facet's full mask).
    ///
    /// Returns `None` when `count` exceeds the supported capacity.
    pub fn all(count: usize) -> Option<Mask> {
        (count <= Self::CAPACITY).then(|| Mask(((1u64 << count) - 1) as u32))
    }

    /// Reinterpret raw bits from an inbound document. Validation against a
    /// facet's full mask happens at load time, not here.
    pub fn from_bits(bits: u32) -> Mask {
        Mask(bits)
    }

    /// Raw bit representation, for the outbound boundary.
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when the set holds exactly one value.
    pub fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }

    /// Number of values in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when every value in `other` is also in `self`.
    pub fn contains(self, other: Mask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when the two sets share at least one value.
    pub fn intersects(self, other: Mask) -> bool {
        self.0 & other.0 != 0
    }

    /// Iterate the positions present in the set, ascending.
    pub fn positions(self) -> impl Iterator<Item = usize> {
        (0..Self::CAPACITY).filter(move |p| self.0 >> p & 1 == 1)
    }
}

impl BitOr for Mask {
    type Output = Mask;
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Mask;
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl BitAndAssign for Mask {
    fn bitand_assign(&mut self, rhs: Mask) {
        self.0 &= rhs.0;
    }
}

impl BitXor for Mask {
    type Output = Mask;
    fn bitxor(self, rhs: Mask) -> Mask {
        Mask(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Mask {
    fn bitxor_assign(&mut self, rhs: Mask) {
        self.0 ^= rhs.0;
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, pos) in self.positions().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{pos}")?;
        }
        write!(f, "}}")
    }
}

// ============================================================================
// Tests
// ============================================================================
