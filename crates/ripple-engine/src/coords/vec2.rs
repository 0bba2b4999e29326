use core::ops::{Add, Mul, Sub};

/// 2D vector (logical pixels or normalized pointer space, depending on use).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Scales the vector down so its length does not exceed `max`.
    ///
    /// Vectors already within `max` are returned unchanged (bit-for-bit).
    #[inline]
    pub fn clamp_length_max(self, max: f32) -> Vec2 {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_of_3_4_is_5() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn clamp_shortens_long_vectors() {
        let v = Vec2::new(3.0, 4.0).clamp_length_max(0.5);
        assert!((v.length() - 0.5).abs() < 1e-6);
        // Direction is preserved.
        assert!((v.x / v.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn clamp_keeps_short_vectors_exact() {
        let v = Vec2::new(0.01, -0.02);
        assert_eq!(v.clamp_length_max(0.05), v);
    }

    #[test]
    fn clamp_zero_is_zero() {
        assert_eq!(Vec2::zero().clamp_length_max(0.05), Vec2::zero());
    }
}
