//! Quaternion storage conventions
//!
//! A convention is a pair of independent binary choices: where the real
//! component lives in the 4-vector (first or last slot), and which
//! multiplication handedness is used (traditional Hamilton order, or the
//! reversed order defined as the traditional product with swapped operands).
//!
//! The convention is carried as a type parameter so the derived component
//! indices are resolved at compile time.

/// Storage index of the real component.
pub const fn real_index(real_first: bool) -> usize {
    if real_first {
        0
    } else {
        3
    }
}

/// Storage index of the i component.
pub const fn i_index(real_first: bool) -> usize {
    if real_first {
        1
    } else {
        0
    }
}

/// Storage index of the j component.
pub const fn j_index(real_first: bool) -> usize {
    if real_first {
        2
    } else {
        1
    }
}

/// Storage index of the k component.
pub const fn k_index(real_first: bool) -> usize {
    if real_first {
        3
    } else {
        2
    }
}

/// A quaternion component-ordering and multiplication-order convention.
///
/// Exactly four implementations exist, one per combination of the two
/// boolean axes. The derived indices address the logical (real, i, j, k)
/// roles within the physical 4-vector storage.
pub trait Convention: Copy + Clone + Default + PartialEq + std::fmt::Debug + 'static {
    /// Real component stored in slot 0 (otherwise slot 3).
    const REAL_FIRST: bool;
    /// Traditional Hamilton multiplication order (otherwise reversed).
    const TRADITIONAL_ORDER: bool;

    /// Index of the real component in the 4-vector.
    const REAL: usize = real_index(Self::REAL_FIRST);
    /// Index of the i component in the 4-vector.
    const I: usize = i_index(Self::REAL_FIRST);
    /// Index of the j component in the 4-vector.
    const J: usize = j_index(Self::REAL_FIRST);
    /// Index of the k component in the 4-vector.
    const K: usize = k_index(Self::REAL_FIRST);

    // Pure-imaginary quaternions are stored as plain 3-vectors; the indices
    // are fixed by definition but kept named for symmetry of the kernel code.
    const PURE_I: usize = 0;
    const PURE_J: usize = 1;
    const PURE_K: usize = 2;
}

/// Real part in slot 0, traditional Hamilton multiplication order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealFirstTraditional;

/// Real part in slot 0, reversed multiplication order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealFirstReversed;

/// Real part in slot 3, traditional Hamilton multiplication order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealLastTraditional;

/// Real part in slot 3, reversed multiplication order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealLastReversed;

impl Convention for RealFirstTraditional {
    const REAL_FIRST: bool = true;
    const TRADITIONAL_ORDER: bool = true;
}

impl Convention for RealFirstReversed {
    const REAL_FIRST: bool = true;
    const TRADITIONAL_ORDER: bool = false;
}

impl Convention for RealLastTraditional {
    const REAL_FIRST: bool = false;
    const TRADITIONAL_ORDER: bool = true;
}

impl Convention for RealLastReversed {
    const REAL_FIRST: bool = false;
    const TRADITIONAL_ORDER: bool = false;
}

/// The convention used when none is named explicitly.
pub type DefaultConvention = RealFirstTraditional;
