use std::ops::{Add, AddAssign, Div, Neg, Sub, SubAssign};

/// Fixed-point angle: 65536 units are one full turn, arithmetic wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(pub i16);

const UNITS_PER_TURN: f64 = 65536.0;

impl Angle {
    pub const ZERO: Angle = Angle(0);

    /// Build an angle from degrees. Fractions of a unit are truncated.
    #[inline]
    pub const fn from_degrees(deg: f64) -> Self {
        Angle((deg * UNITS_PER_TURN / 360.0) as i64 as i16)
    }

    #[inline]
    pub fn to_degrees(self) -> f64 {
        self.0 as f64 * 360.0 / UNITS_PER_TURN
    }

    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0 as f64 * std::f64::consts::TAU / UNITS_PER_TURN
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.to_radians().sin()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.to_radians().cos()
    }

    /// Absolute value; `-180°` stays `-180°`.
    #[inline]
    pub fn abs(self) -> Self {
        Angle(self.0.wrapping_abs())
    }

    /// Raw units widened to `i32`, handy for comparisons without wrapping.
    #[inline]
    pub fn units(self) -> i32 {
        self.0 as i32
    }

    /// One `step` closer to zero, snapping to zero once within reach.
    pub fn eased_to_zero(self, step: Angle) -> Self {
        let (a, s) = (self.units(), step.units().abs());
        if a.abs() <= s {
            Angle::ZERO
        } else if a < 0 {
            Angle((a + s) as i16)
        } else {
            Angle((a - s) as i16)
        }
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

impl Div<i16> for Angle {
    type Output = Angle;
    #[inline]
    fn div(self, rhs: i16) -> Angle {
        Angle(self.0.wrapping_div(rhs))
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Angle) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_conversion() {
        assert_eq!(Angle::from_degrees(90.0), Angle(16384));
        assert_eq!(Angle::from_degrees(-90.0), Angle(-16384));
        assert_eq!(Angle::from_degrees(180.0), Angle(i16::MIN));
        assert_eq!(Angle::from_degrees(2.25), Angle(409));
    }

    #[test]
    fn arithmetic_wraps_around_the_circle() {
        let a = Angle::from_degrees(170.0) + Angle::from_degrees(20.0);
        assert!((a.to_degrees() + 170.0).abs() < 0.05);
        assert_eq!(Angle::from_degrees(180.0).abs(), Angle(i16::MIN));
    }

    #[test]
    fn easing_snaps_to_zero_within_one_step() {
        let step = Angle(100);
        assert_eq!(Angle(250).eased_to_zero(step), Angle(150));
        assert_eq!(Angle(-250).eased_to_zero(step), Angle(-150));
        assert_eq!(Angle(-100).eased_to_zero(step), Angle::ZERO);
        assert_eq!(Angle(i16::MIN).eased_to_zero(step), Angle(i16::MIN + 100));
    }
}
