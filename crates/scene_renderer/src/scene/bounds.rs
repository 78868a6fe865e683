//! Planes and axis-aligned bounding boxes
//!
//! These are the only geometric primitives the culling pass needs. A plane
//! splits space into an inside and an outside half; an AABB answers which of
//! its corners lies furthest along (or against) a plane normal, so a box can be
//! classified against a plane with two point tests instead of eight.

use crate::foundation::math::{Vec3, Vec4};

/// Oriented half-space bounding a convex region
///
/// A point `p` is on the inside when `dot(normal, p) + distance >= 0`.
/// Points exactly on the plane count as inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing towards the inside half-space
    pub normal: Vec3,
    /// Signed offset of the plane along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal and distance, renormalizing both
    ///
    /// When the normal has zero or non-finite length the plane cannot be
    /// normalized; a permissive plane is returned instead, which keeps every
    /// point inside. A degenerate camera therefore over-draws rather than
    /// culling visible content.
    pub fn from_normal_and_distance(normal: Vec3, distance: f32) -> Self {
        let length = normal.norm();
        if length == 0.0 || !length.is_finite() || !distance.is_finite() {
            return Self::permissive();
        }

        Self {
            normal: normal / length,
            distance: distance / length,
        }
    }

    /// Create a plane from `(a, b, c, d)` coefficients of `ax + by + cz + d = 0`
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        Self::from_normal_and_distance(coefficients.xyz(), coefficients.w)
    }

    /// Plane that contains every point on its inside
    pub fn permissive() -> Self {
        Self {
            normal: Vec3::zeros(),
            distance: 0.0,
        }
    }

    /// Whether this plane came from a degenerate normal
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::zeros()
    }

    /// Signed distance from the plane to a point (positive inside)
    #[inline]
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Whether a point lies on the inside of the plane (boundary inclusive)
    #[inline]
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.signed_distance(point) >= 0.0
    }
}

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Center of the box
    pub center: Vec3,
    /// Half size along each axis, all components >= 0
    pub half_extents: Vec3,
}

impl AABB {
    /// Create an AABB from a center point and half extents
    ///
    /// Negative extents are folded to their absolute value.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Create an AABB spanning two corners
    ///
    /// The corners may be given in any order.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let lo = min.inf(&max);
        let hi = min.sup(&max);
        Self {
            center: (lo + hi) * 0.5,
            half_extents: (hi - lo) * 0.5,
        }
    }

    /// Zero-sized box at a point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            center: point,
            half_extents: Vec3::zeros(),
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Smallest box enclosing both boxes
    #[must_use]
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::from_min_max(self.min().inf(&other.min()), self.max().sup(&other.max()))
    }

    /// Check if this AABB contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x &&
        point.y >= min.y && point.y <= max.y &&
        point.z >= min.z && point.z <= max.z
    }

    /// Whether center and extents are all finite numbers
    pub fn is_finite(&self) -> bool {
        self.center.iter().chain(self.half_extents.iter()).all(|v| v.is_finite())
    }

    /// Corner most aligned with the plane normal (the "p-vertex")
    ///
    /// If this corner is outside the plane, the whole box is.
    #[inline]
    pub fn positive_far_point(&self, plane: &Plane) -> Vec3 {
        self.center + self.half_extents.zip_map(&plane.normal, |h, n| if n >= 0.0 { h } else { -h })
    }

    /// Corner least aligned with the plane normal (the "n-vertex")
    ///
    /// If this corner is inside the plane, the whole box is.
    #[inline]
    pub fn negative_far_point(&self, plane: &Plane) -> Vec3 {
        self.center + self.half_extents.zip_map(&plane.normal, |h, n| if n >= 0.0 { -h } else { h })
    }
}
