use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Easing curves available to camera animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    EaseOutCubic,
    EaseInOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::EaseInOutCubic
    }
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Interpolatable for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }
}

impl Interpolatable for LatLng {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        LatLng::new(self.lat.lerp(&other.lat, t), self.lng.lerp(&other.lng, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseOutCubic,
            EasingFunction::EaseInOutCubic,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let easing = EasingFunction::EaseInOutCubic;
        assert!((easing.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((easing.apply(0.25) + easing.apply(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_lerp() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), Point::new(5.0, 15.0));
    }
}
