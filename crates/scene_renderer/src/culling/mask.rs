//! Visibility masks
//!
//! A node's visibility is one of three states: fully inside the frustum,
//! fully outside it, or straddling some subset of its planes. Only the last
//! state carries data, a bit per plane that still needs testing for the
//! node's descendants.

use bitflags::bitflags;

bitflags! {
    /// Set of frustum planes, one bit per plane index
    ///
    /// The named flags follow the frustum's plane order. Masks built from
    /// [`PlaneMask::for_plane`] or [`PlaneMask::all_planes`] may carry bits
    /// beyond the six named ones for user-supplied plane sets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PlaneMask: u32 {
        /// Right side plane
        const RIGHT = 1 << 0;
        /// Left side plane
        const LEFT = 1 << 1;
        /// Bottom side plane
        const BOTTOM = 1 << 2;
        /// Top side plane
        const TOP = 1 << 3;
        /// Far depth plane
        const FAR = 1 << 4;
        /// Near depth plane
        const NEAR = 1 << 5;

        /// The four side planes
        const SIDES = Self::RIGHT.bits() | Self::LEFT.bits() | Self::BOTTOM.bits() | Self::TOP.bits();
        /// The two depth planes
        const DEPTH = Self::FAR.bits() | Self::NEAR.bits();
    }
}

impl PlaneMask {
    /// Number of plane indices the mask can track
    pub const CAPACITY: usize = u32::BITS as usize;

    /// Mask with every trackable bit set
    pub const fn all_planes() -> Self {
        Self::from_bits_retain(u32::MAX)
    }

    /// Single-bit mask for a plane index, `None` past [`PlaneMask::CAPACITY`]
    pub const fn for_plane(index: usize) -> Option<Self> {
        if index < Self::CAPACITY {
            Some(Self::from_bits_retain(1 << index))
        } else {
            None
        }
    }

    /// Whether the plane at `index` still needs testing under this mask
    ///
    /// Planes past the mask capacity have no bit and are always tested.
    pub const fn needs_test(self, index: usize) -> bool {
        match Self::for_plane(index) {
            Some(flag) => self.bits() & flag.bits() != 0,
            None => true,
        }
    }
}

/// Resolved visibility of a node against a frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityMask {
    /// Entirely inside every plane; descendants need no testing
    Inside,
    /// Entirely outside at least one plane; descendants are outside too
    Outside,
    /// Straddles the planes in the set; descendants re-test only those
    ///
    /// An empty set means only planes past [`PlaneMask::CAPACITY`] still
    /// straddle.
    Intersecting(PlaneMask),
}

impl VisibilityMask {
    /// Mask fed to nodes without a parent constraint: every plane is tested
    pub const INDETERMINATE: Self = Self::Intersecting(PlaneMask::all_planes());

    /// Build a mask from the set of straddled planes
    ///
    /// An empty set means the node is fully inside.
    pub const fn from_planes(planes: PlaneMask) -> Self {
        if planes.is_empty() {
            Self::Inside
        } else {
            Self::Intersecting(planes)
        }
    }

    /// Whether anything under this mask can be visible
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Outside)
    }

    /// Whether this mask settles descendants without any plane tests
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Inside | Self::Outside)
    }

    /// Planes that still need testing for descendants
    pub const fn intersecting_planes(self) -> PlaneMask {
        match self {
            Self::Intersecting(planes) => planes,
            Self::Inside | Self::Outside => PlaneMask::empty(),
        }
    }
}

impl Default for VisibilityMask {
    fn default() -> Self {
        Self::INDETERMINATE
    }
}
