//! Animatable value types
//!
//! [`Interpolate`] is the value-level half of interpolation: each bundled
//! type knows how to blend itself with another instance. The default
//! lerpers in [`crate::lerp`] delegate to these implementations.
//!
//! Fractions are not clamped here unless the type cannot represent values
//! outside its endpoints (colors clamp, text clamps outside numeric twins).

use kinetic_core::{Color, Point, Rect, Size, Vec2, Vec3};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Interpolate between `self` (at 0) and `other` (at 1) by factor `t`
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// Scalars
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t as f64
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon as f64
    }
}

macro_rules! impl_integer_interpolate {
    ($($ty:ty),*) => {
        $(
            impl Interpolate for $ty {
                /// Rounds to the nearest integer, saturating at the type's bounds
                fn lerp(&self, other: &Self, t: f32) -> Self {
                    let from = *self as f64;
                    let to = *other as f64;
                    (from + (to - from) * t as f64).round() as $ty
                }

                fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
                    ((*self as f64) - (*other as f64)).abs() < epsilon.max(1.0) as f64
                }
            }
        )*
    };
}

impl_integer_interpolate!(i32, i64, u32, u8);

// ============================================================================
// Geometry
// ============================================================================

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for Size {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Size::new(
            self.width.lerp(&other.width, t),
            self.height.lerp(&other.height, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.width.approx_eq(&other.width, epsilon)
            && self.height.approx_eq(&other.height, epsilon)
    }
}

impl Interpolate for Rect {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rect::from_origin_size(
            self.origin.lerp(&other.origin, t),
            self.size.lerp(&other.size, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.origin.approx_eq(&other.origin, epsilon) && self.size.approx_eq(&other.size, epsilon)
    }
}

impl Interpolate for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl Interpolate for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

// ============================================================================
// Color
// ============================================================================

impl Interpolate for Color {
    /// Channels cannot leave `0.0..=1.0`, so `t` is clamped
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Color::rgba(
            self.r.lerp(&other.r, t),
            self.g.lerp(&other.g, t),
            self.b.lerp(&other.b, t),
            self.a.lerp(&other.a, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

// ============================================================================
// Text
// ============================================================================

impl Interpolate for String {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        crate::text::interpolate(self, other, t)
    }

    fn approx_eq(&self, other: &Self, _epsilon: f32) -> bool {
        self == other
    }
}
