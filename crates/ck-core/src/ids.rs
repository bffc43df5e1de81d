use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable handle used for curves and probe labels.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
///
/// Handles are never reused within one curve set, so a stale handle simply
/// fails to resolve after its curve was removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// Returns `None` only for `u32::MAX`, which has no successor.
    pub fn from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Monotonic allocator for [`Id`]s.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id, or `None` once the `u32` space is exhausted.
    pub fn allocate(&mut self) -> Option<Id> {
        let id = Id::from_index(self.next)?;
        self.next += 1;
        Some(id)
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type CurveHandle = Id;
pub type LabelId = Id;
