//! Scene graph and model normalization.
//!
//! The loaded model arrives with arbitrary dimensions; [`fit_to_bounds`]
//! derives the uniform scale and translation that place it inside the
//! canonical viewing box: footprint centered at the origin, base resting on
//! the ground plane.

use glam::{Mat4, Vec3};

use crate::error::LoadError;

/// An axis-aligned bounding box accumulated over world-space points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box that any inserted point will replace.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for p in points {
            bounds.insert(p);
        }
        bounds
    }

    pub fn insert(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Horizontal footprint: the larger of the X and Z extents.
    pub fn footprint(&self) -> f32 {
        let size = self.size();
        size.x.max(size.z)
    }

    pub fn height(&self) -> f32 {
        self.size().y
    }

    /// True when no point was inserted or the box has no usable extent.
    pub fn is_degenerate(&self) -> bool {
        self.min.x > self.max.x || self.footprint() <= 0.0 || self.height() <= 0.0
    }

    /// Transform the eight corners and rebuild the box around them.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let mut out = Self::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.insert(matrix.transform_point3(corner));
        }
        out
    }
}

/// The uniform scale and translation that fit a model into the viewing box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitResult {
    pub scale: f32,
    pub translation: Vec3,
}

impl FitResult {
    /// Root transform applying the fit: scale about the origin, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Derive the transform that fits `bounds` into a `target_width` wide,
/// `target_height` tall box.
///
/// The scale is the minimum of the width and height ratios so the model fits
/// both constraints without distortion. The translation then centers the
/// scaled footprint at x=0, z=0 and rests its minimum on y=0. Deterministic
/// and idempotent: fitting an already-fitted box yields scale 1 and zero
/// translation.
pub fn fit_to_bounds(
    bounds: &Aabb,
    target_width: f32,
    target_height: f32,
) -> Result<FitResult, LoadError> {
    if bounds.is_degenerate() {
        return Err(LoadError::DegenerateBounds);
    }

    let scale = (target_width / bounds.footprint()).min(target_height / bounds.height());

    let center = bounds.center() * scale;
    let min_y = bounds.min.y * scale;
    let translation = Vec3::new(-center.x, -min_y, -center.z);

    Ok(FitResult { scale, translation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fitted(bounds: &Aabb, width: f32, height: f32) -> Aabb {
        let fit = fit_to_bounds(bounds, width, height).unwrap();
        bounds.transformed(fit.matrix())
    }

    #[test]
    fn scale_is_min_of_width_and_height_ratios() {
        // Footprint 10, height 5 into a 45 x 15 box: min(4.5, 3.0) = 3.0.
        let bounds = Aabb {
            min: Vec3::new(-5.0, 0.0, -2.0),
            max: Vec3::new(5.0, 5.0, 2.0),
        };
        let fit = fit_to_bounds(&bounds, 45.0, 15.0).unwrap();
        assert_relative_eq!(fit.scale, 3.0);
    }

    #[test]
    fn fitted_box_is_centered_and_grounded() {
        let bounds = Aabb {
            min: Vec3::new(1.0, -3.0, 4.0),
            max: Vec3::new(9.0, 7.0, 10.0),
        };
        let result = fitted(&bounds, 45.0, 15.0);
        assert_relative_eq!(result.center().x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(result.center().z, 0.0, epsilon = 1e-4);
        assert_relative_eq!(result.min.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn fitted_box_respects_both_targets() {
        let bounds = Aabb {
            min: Vec3::new(-0.3, 0.2, -80.0),
            max: Vec3::new(0.3, 0.9, 80.0),
        };
        let result = fitted(&bounds, 45.0, 15.0);
        assert!(result.footprint() <= 45.0 + 1e-3);
        assert!(result.height() <= 15.0 + 1e-3);
    }

    #[test]
    fn fitting_is_idempotent() {
        let bounds = Aabb {
            min: Vec3::new(-2.0, 1.0, -1.0),
            max: Vec3::new(2.0, 3.0, 1.0),
        };
        let once = fitted(&bounds, 45.0, 15.0);
        let fit_again = fit_to_bounds(&once, 45.0, 15.0).unwrap();
        assert_relative_eq!(fit_again.scale, 1.0, epsilon = 1e-4);
        assert_relative_eq!(fit_again.translation.length(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        let flat = Aabb {
            min: Vec3::ZERO,
            max: Vec3::new(4.0, 0.0, 4.0),
        };
        assert!(matches!(
            fit_to_bounds(&flat, 45.0, 15.0),
            Err(LoadError::DegenerateBounds)
        ));
        assert!(matches!(
            fit_to_bounds(&Aabb::EMPTY, 45.0, 15.0),
            Err(LoadError::DegenerateBounds)
        ));
    }

    #[test]
    fn union_covers_both_boxes() {
        let a = Aabb {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        };
        let b = Aabb {
            min: Vec3::new(2.0, -1.0, 0.0),
            max: Vec3::new(3.0, 0.5, 4.0),
        };
        let joined = a.union(&b);
        assert_eq!(joined.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(joined.max, Vec3::new(3.0, 1.0, 4.0));
        // The empty box is the identity.
        assert_eq!(Aabb::EMPTY.union(&a), a);
    }

    #[test]
    fn transformed_box_tracks_corners() {
        let bounds = Aabb {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        let moved = bounds.transformed(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_relative_eq!(moved.center().x, 5.0);
        assert_relative_eq!(moved.size().x, 2.0);
    }
}
