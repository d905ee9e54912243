//! Auto-framing: camera placement derived from mesh bounds.
//!
//! Given the axis-aligned bounding box of a loaded mesh and the camera's
//! vertical field of view, computes a centering translation, a viewing
//! axis, a fitting camera distance, and zoom-distance clamps. Pure
//! geometry — no GPU state, no side effects.
//!
//! Flat or elongated objects are viewed along their thinnest dimension so
//! the widest face is presented; roughly cubic objects are viewed along
//! the normalized `(1,1,1)` diagonal.

use glam::Vec3;

/// Multiplier applied to the raw fit distance to leave visual margin
/// around the framed model.
pub const PADDING_FACTOR: f32 = 1.5;

/// Ratio below which the smallest extent is considered "thin" relative to
/// the largest, triggering axis-aligned framing instead of diagonal
/// framing.
pub const FLATNESS_RATIO: f32 = 0.2;

/// Floor applied to the largest extent before distance/clamp computation.
/// Keeps degenerate (point-like) meshes from collapsing the camera onto
/// the origin.
pub const MIN_EXTENT: f32 = 1e-4;

/// Zoom clamp ratios relative to the largest extent.
const MIN_ZOOM_RATIO: f32 = 0.2;
const MAX_ZOOM_RATIO: f32 = 2.0;

/// Axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Component-wise minimum corner.
    pub min: Vec3,
    /// Component-wise maximum corner.
    pub max: Vec3,
}

impl BoundingBox {
    /// Tight box around the given points (one-pass scan).
    ///
    /// Returns `None` for an empty point set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
        Some(Self { min, max })
    }

    /// Extent along each axis (`max - min`, component-wise non-negative
    /// for any box produced by [`from_points`](Self::from_points)).
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box center (`(max + min) / 2`).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.max + self.min) * 0.5
    }

    /// Translation that moves the box center onto the origin.
    ///
    /// Applied to mesh vertices before camera placement, so the placement
    /// can always look at `(0,0,0)`.
    #[must_use]
    pub fn centering_translation(&self) -> Vec3 {
        -self.center()
    }
}

/// Unit direction from which the camera observes the centered model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewingAxis {
    /// Look along +X (thinnest dimension is X).
    X,
    /// Look along +Y (thinnest dimension is Y).
    Y,
    /// Look along +Z (thinnest dimension is Z).
    Z,
    /// Look along the normalized `(1,1,1)` diagonal (roughly cubic model).
    Diagonal,
}

impl ViewingAxis {
    /// Pick the viewing axis from the box extents.
    ///
    /// A model is flat/elongated when its smallest extent is below
    /// [`FLATNESS_RATIO`] of its largest; the axis is then the principal
    /// axis of that smallest extent so the widest face is presented.
    /// Ties resolve Z, then Y, then X (first-match scan order).
    #[must_use]
    pub fn select(size: Vec3) -> Self {
        let smallest = size.min_element();
        let largest = size.max_element();

        if largest > 0.0 && smallest < largest * FLATNESS_RATIO {
            if smallest == size.z {
                Self::Z
            } else if smallest == size.y {
                Self::Y
            } else {
                Self::X
            }
        } else {
            Self::Diagonal
        }
    }

    /// The axis as a unit vector.
    #[must_use]
    pub fn direction(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
            Self::Diagonal => Vec3::ONE.normalize(),
        }
    }
}

/// Camera position, target, and zoom clamps for a framed model.
///
/// Consumed once by the caller to set camera and control-clamp state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    /// Eye position in model space (model assumed pre-centered).
    pub position: Vec3,
    /// Look-at target — always the origin.
    pub look_at: Vec3,
    /// Closest allowed zoom distance.
    pub min_distance: f32,
    /// Farthest allowed zoom distance.
    pub max_distance: f32,
}

impl CameraPlacement {
    /// Eye distance from the look-at target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.position - self.look_at).length()
    }
}

/// Distance at which a model of the given largest extent fills the
/// vertical field of view, times [`PADDING_FACTOR`].
#[must_use]
pub fn fit_distance(max_dim: f32, fovy_degrees: f32) -> f32 {
    let fov = fovy_degrees.to_radians();
    (max_dim / 2.0 / (fov / 2.0).tan()).abs() * PADDING_FACTOR
}

/// Zoom-distance clamps for a model of the given largest extent.
#[must_use]
pub fn zoom_limits(max_dim: f32) -> (f32, f32) {
    (max_dim * MIN_ZOOM_RATIO, max_dim * MAX_ZOOM_RATIO)
}

/// Compute a full camera placement for a model with the given bounds,
/// viewed with the given vertical field of view in degrees.
///
/// The largest extent is floored at [`MIN_EXTENT`] so the output distance
/// is finite and positive even for a point-like mesh. Deterministic for
/// identical inputs.
#[must_use]
pub fn frame(bounds: &BoundingBox, fovy_degrees: f32) -> CameraPlacement {
    let size = bounds.size();
    let axis = ViewingAxis::select(size);

    let max_dim = size.max_element().max(MIN_EXTENT);
    let (min_distance, max_distance) = zoom_limits(max_dim);
    let distance = fit_distance(max_dim, fovy_degrees);

    CameraPlacement {
        position: axis.direction() * distance,
        look_at: Vec3::ZERO,
        min_distance,
        max_distance,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cubic_model_uses_diagonal_axis() {
        for s in [0.5_f32, 1.0, 10.0, 250.0] {
            let size = Vec3::splat(s);
            assert_eq!(ViewingAxis::select(size), ViewingAxis::Diagonal);

            let bounds = BoundingBox {
                min: Vec3::splat(-s / 2.0),
                max: Vec3::splat(s / 2.0),
            };
            let placement = frame(&bounds, 60.0);
            assert_relative_eq!(placement.min_distance, 0.2 * s);
            assert_relative_eq!(placement.max_distance, 2.0 * s);
        }
    }

    #[test]
    fn diagonal_direction_is_unit_length() {
        assert_relative_eq!(
            ViewingAxis::Diagonal.direction().length(),
            1.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn thin_dimension_selects_principal_axis() {
        assert_eq!(
            ViewingAxis::select(Vec3::new(10.0, 10.0, 1.0)),
            ViewingAxis::Z
        );
        assert_eq!(
            ViewingAxis::select(Vec3::new(10.0, 1.0, 10.0)),
            ViewingAxis::Y
        );
        assert_eq!(
            ViewingAxis::select(Vec3::new(1.0, 10.0, 10.0)),
            ViewingAxis::X
        );
    }

    #[test]
    fn thin_tie_prefers_z_over_x() {
        // X and Z both equal the smallest extent — Z wins the scan.
        assert_eq!(
            ViewingAxis::select(Vec3::new(1.0, 10.0, 1.0)),
            ViewingAxis::Z
        );
        // Y and X tie without Z — Y wins over X.
        assert_eq!(
            ViewingAxis::select(Vec3::new(1.0, 1.0, 10.0)),
            ViewingAxis::Y
        );
    }

    #[test]
    fn exactly_at_threshold_is_not_flat() {
        // smallest == largest * ratio — strict comparison keeps the
        // diagonal path.
        assert_eq!(
            ViewingAxis::select(Vec3::new(10.0, 10.0, 2.0)),
            ViewingAxis::Diagonal
        );
    }

    #[test]
    fn distance_increases_with_extent() {
        let mut previous = 0.0;
        for max_dim in [0.1_f32, 1.0, 5.0, 50.0, 500.0] {
            let d = fit_distance(max_dim, 60.0);
            assert!(d > previous, "distance {d} not above {previous}");
            previous = d;
        }
    }

    #[test]
    fn narrower_fov_needs_more_distance() {
        let mut previous = f32::INFINITY;
        for fovy in [20.0_f32, 45.0, 60.0, 90.0, 120.0] {
            let d = fit_distance(2.0, fovy);
            assert!(d < previous, "distance {d} not below {previous}");
            previous = d;
        }
    }

    #[test]
    fn degenerate_bounds_yield_finite_positive_distance() {
        let bounds = BoundingBox {
            min: Vec3::splat(3.0),
            max: Vec3::splat(3.0),
        };
        let placement = frame(&bounds, 60.0);
        let distance = placement.distance();
        assert!(distance.is_finite());
        assert!(distance > 0.0);
        assert!(placement.min_distance > 0.0);
        assert!(placement.max_distance > placement.min_distance);
    }

    #[test]
    fn thin_plate_end_to_end() {
        // 2 x 2 x 0.2 plate viewed with a 60-degree field of view.
        let bounds = BoundingBox {
            min: Vec3::new(-1.0, -1.0, -0.1),
            max: Vec3::new(1.0, 1.0, 0.1),
        };
        let placement = frame(&bounds, 60.0);

        let direction = placement.position.normalize();
        assert_relative_eq!(direction.x, 0.0);
        assert_relative_eq!(direction.y, 0.0);
        assert_relative_eq!(direction.z, 1.0);

        // 1.5 * (1 / tan(30 deg))
        assert_relative_eq!(
            placement.distance(),
            2.598_076,
            epsilon = 1e-4
        );
        assert_relative_eq!(placement.min_distance, 0.4);
        assert_relative_eq!(placement.max_distance, 4.0);
        assert_eq!(placement.look_at, Vec3::ZERO);
    }

    #[test]
    fn bounding_box_from_points_one_pass() {
        let points = [
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-3.0, 4.0, 0.0),
            Vec3::new(2.0, 0.0, -1.5),
        ];
        let bounds = BoundingBox::from_points(points).unwrap();
        assert_eq!(bounds.min, Vec3::new(-3.0, -2.0, -1.5));
        assert_eq!(bounds.max, Vec3::new(2.0, 4.0, 0.5));

        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn centering_translation_moves_center_to_origin() {
        let bounds = BoundingBox {
            min: Vec3::new(2.0, 4.0, -6.0),
            max: Vec3::new(4.0, 8.0, -2.0),
        };
        let t = bounds.centering_translation();
        assert_eq!(bounds.center() + t, Vec3::ZERO);
    }
}
