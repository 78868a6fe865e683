//! View frustum
//!
//! Six inward-facing planes bounding the region a camera can see, extracted
//! from a view-projection matrix with the Gribb-Hartmann row method.

use crate::culling::mask::{PlaneMask, VisibilityMask};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::scene::bounds::{Plane, AABB};

/// Number of planes in a frustum
pub const FRUSTUM_PLANE_COUNT: usize = 6;

/// Named frustum planes in storage order
///
/// The discriminant is the plane's index in [`Frustum::planes`] and its bit
/// position in a [`PlaneMask`]. Depth planes sit at indices 4 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    /// `x <= w` in clip space
    Right = 0,
    /// `x >= -w` in clip space
    Left = 1,
    /// `y >= -w` in clip space
    Bottom = 2,
    /// `y <= w` in clip space
    Top = 3,
    /// `z <= w` in clip space
    Far = 4,
    /// `z >= -w` in clip space
    Near = 5,
}

impl FrustumPlane {
    /// All planes in storage order
    pub const ALL: [FrustumPlane; FRUSTUM_PLANE_COUNT] = [
        FrustumPlane::Right,
        FrustumPlane::Left,
        FrustumPlane::Bottom,
        FrustumPlane::Top,
        FrustumPlane::Far,
        FrustumPlane::Near,
    ];

    /// Storage index of this plane
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Plane stored at `index`, if any
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < FRUSTUM_PLANE_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Whether this is the near or far plane
    pub const fn is_depth(self) -> bool {
        matches!(self, Self::Far | Self::Near)
    }

    /// Mask bit for this plane
    pub const fn mask(self) -> PlaneMask {
        PlaneMask::from_bits_retain(1 << self.index())
    }
}

/// Whether a plane index addresses the near or far plane of a frustum
pub const fn is_depth_plane(index: usize) -> bool {
    index == FrustumPlane::Far.index() || index == FrustumPlane::Near.index()
}

/// Frustum for visibility culling
///
/// Immutable once built; a camera change produces a new frustum rather than
/// editing planes in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    planes: [Plane; FRUSTUM_PLANE_COUNT],
}

impl Frustum {
    /// Create a frustum from six planes in [`FrustumPlane`] order
    pub fn new(planes: [Plane; FRUSTUM_PLANE_COUNT]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix
    ///
    /// `vp` maps world space to clip space with column vectors and the
    /// `-w..w` clip volume. Each plane is `row3 ± row{0,1,2}` of the matrix,
    /// then normalized. Normals point into the frustum.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let x = vp.row_vector(0);
        let y = vp.row_vector(1);
        let z = vp.row_vector(2);
        let w = vp.row_vector(3);

        Self {
            planes: [
                Plane::from_coefficients(w - x), // right
                Plane::from_coefficients(w + x), // left
                Plane::from_coefficients(w + y), // bottom
                Plane::from_coefficients(w - y), // top
                Plane::from_coefficients(w - z), // far
                Plane::from_coefficients(w + z), // near
            ],
        }
    }

    /// Replace every plane with those extracted from `vp`
    pub fn extract_from_view_projection(&mut self, vp: &Mat4) {
        *self = Self::from_view_projection(vp);
    }

    /// All planes in [`FrustumPlane`] order
    pub fn planes(&self) -> &[Plane; FRUSTUM_PLANE_COUNT] {
        &self.planes
    }

    /// A single named plane
    pub fn plane(&self, which: FrustumPlane) -> &Plane {
        &self.planes[which.index()]
    }

    /// Whether any plane collapsed during extraction
    pub fn is_degenerate(&self) -> bool {
        self.planes.iter().any(Plane::is_degenerate)
    }

    /// Check if a point lies inside every plane (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.planes.iter().all(|plane| plane.contains_point(point))
    }

    /// Check if an AABB is inside or intersects the frustum
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb).is_visible()
    }

    /// Classify an AABB against all six planes without a parent constraint
    #[allow(clippy::neg_cmp_op_on_partial_ord)] // NaN counts as straddling
    pub fn classify_aabb(&self, aabb: &AABB) -> VisibilityMask {
        let mut straddled = PlaneMask::empty();
        for (which, plane) in FrustumPlane::ALL.iter().zip(&self.planes) {
            if plane.signed_distance(&aabb.positive_far_point(plane)) < 0.0 {
                return VisibilityMask::Outside;
            }
            if !(plane.signed_distance(&aabb.negative_far_point(plane)) >= 0.0) {
                straddled |= which.mask();
            }
        }
        VisibilityMask::from_planes(straddled)
    }
}

impl Default for Frustum {
    /// Frustum of permissive planes that contains everything
    fn default() -> Self {
        Self {
            planes: [Plane::permissive(); FRUSTUM_PLANE_COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    /// Orthographic [-1, 1]^3 projection combined with the world transform of
    /// a camera placed at (0, 0, 10) looking at the origin.
    fn reference_view_projection() -> Mat4 {
        let projection = Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let camera_world = Mat4::look_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .try_inverse()
        .expect("look-at matrix is invertible");
        projection * camera_world
    }

    fn assert_plane(frustum: &Frustum, which: FrustumPlane, normal: Vec3, distance: f32) {
        let plane = frustum.plane(which);
        assert_relative_eq!(plane.normal, normal, epsilon = 1e-6);
        assert_relative_eq!(plane.distance, distance, epsilon = 1e-5);
    }

    #[test]
    fn test_extracts_six_planes_from_reference_matrix() {
        let frustum = Frustum::from_view_projection(&reference_view_projection());

        assert_plane(&frustum, FrustumPlane::Right, Vec3::new(-1.0, 0.0, 0.0), 1.0);
        assert_plane(&frustum, FrustumPlane::Left, Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert_plane(&frustum, FrustumPlane::Bottom, Vec3::new(0.0, 1.0, 0.0), 1.0);
        assert_plane(&frustum, FrustumPlane::Top, Vec3::new(0.0, -1.0, 0.0), 1.0);
        assert_plane(&frustum, FrustumPlane::Far, Vec3::new(0.0, 0.0, 1.0), 11.0);
        assert_plane(&frustum, FrustumPlane::Near, Vec3::new(0.0, 0.0, -1.0), -9.0);
        assert!(!frustum.is_degenerate());
    }

    #[test]
    fn test_reference_frustum_bounds_the_clip_volume() {
        let vp = reference_view_projection();
        let frustum = Frustum::from_view_projection(&vp);

        // Clip volume maps back to z in [-11, -9]
        assert!(frustum.contains_point(&Vec3::new(0.0, 0.0, -10.0)));
        assert!(frustum.contains_point(&Vec3::new(1.0, -1.0, -9.0)));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, -8.5)));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, -11.5)));
        assert!(!frustum.contains_point(&Vec3::new(1.5, 0.0, -10.0)));

        let clip = vp * Vec4::new(0.5, -0.5, -10.5, 1.0);
        assert!(clip.x.abs() <= clip.w && clip.y.abs() <= clip.w && clip.z.abs() <= clip.w);
    }

    #[test]
    fn test_perspective_frustum_contains_view_axis() {
        let view = Mat4::look_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let projection = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let frustum = Frustum::from_view_projection(&(projection * view));

        assert!(frustum.contains_point(&Vec3::zeros()));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 2.0, 9.0))); // behind the eye
        for plane in frustum.planes() {
            assert_relative_eq!(plane.normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_extraction_is_deterministic_and_replaces_planes() {
        let vp = reference_view_projection();
        let mut frustum = Frustum::default();
        assert!(frustum.is_degenerate());

        frustum.extract_from_view_projection(&vp);
        assert_eq!(frustum, Frustum::from_view_projection(&vp));
    }

    #[test]
    fn test_zero_matrix_yields_permissive_frustum() {
        let frustum = Frustum::from_view_projection(&Mat4::zeros());
        assert!(frustum.is_degenerate());
        let far_away = AABB::from_point(Vec3::new(1.0e5, -1.0e5, 1.0e5));
        assert!(frustum.intersects_aabb(&far_away));
    }

    #[test]
    fn test_wide_orthographic_frustum_still_culls() {
        let projection = Mat4::orthographic(-1.0e7, 1.0e7, -1.0e7, 1.0e7, -1.0, 1.0);
        let frustum = Frustum::from_view_projection(&projection);

        assert!(!frustum.is_degenerate());
        assert!(frustum.contains_point(&Vec3::new(5.0e6, 0.0, 0.0)));
        assert!(!frustum.contains_point(&Vec3::new(5.0e7, 0.0, 0.0)));
        assert!(!frustum.contains_point(&Vec3::new(0.0, -5.0e7, 0.0)));
    }

    #[test]
    fn test_classify_aabb() {
        let frustum = Frustum::from_view_projection(&reference_view_projection());

        let inside = AABB::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.5, 0.5, 0.5));
        let straddling = AABB::from_center_half_extents(Vec3::new(1.0, 0.0, -10.0), Vec3::new(0.5, 0.5, 0.5));
        let outside = AABB::from_center_half_extents(Vec3::new(0.0, 5.0, -10.0), Vec3::new(0.5, 0.5, 0.5));

        assert_eq!(frustum.classify_aabb(&inside), VisibilityMask::Inside);
        assert_eq!(
            frustum.classify_aabb(&straddling),
            VisibilityMask::Intersecting(PlaneMask::RIGHT)
        );
        assert_eq!(frustum.classify_aabb(&outside), VisibilityMask::Outside);
    }

    #[test]
    fn test_plane_index_mapping() {
        for (index, plane) in FrustumPlane::ALL.iter().enumerate() {
            assert_eq!(plane.index(), index);
            assert_eq!(FrustumPlane::from_index(index), Some(*plane));
            assert_eq!(plane.is_depth(), is_depth_plane(index));
        }
        assert_eq!(FrustumPlane::from_index(6), None);
        assert_eq!(FrustumPlane::Near.mask(), PlaneMask::NEAR);
    }
}
