use glam::IVec3;

use super::Angle;

/// Cardinal heading on the sector grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    PosZ,
    PosX,
    NegZ,
    NegX,
}

impl Axis {
    /// Heading that points exactly along this axis.
    #[inline]
    pub fn angle(self) -> Angle {
        match self {
            Axis::PosZ => Angle::from_degrees(0.0),
            Axis::PosX => Angle::from_degrees(90.0),
            Axis::NegZ => Angle::from_degrees(-180.0),
            Axis::NegX => Angle::from_degrees(-90.0),
        }
    }

    /// Unit step on the grid, `y` is always 0.
    #[inline]
    pub fn step(self) -> IVec3 {
        match self {
            Axis::PosZ => IVec3::new(0, 0, 1),
            Axis::PosX => IVec3::new(1, 0, 0),
            Axis::NegZ => IVec3::new(0, 0, -1),
            Axis::NegX => IVec3::new(-1, 0, 0),
        }
    }
}

/// Cardinal axis within `margin` of `angle`, tested in +Z, +X, -Z, -X order.
pub fn axis_from_angle(angle: Angle, margin: Angle) -> Option<Axis> {
    let a = angle.units();
    let m = margin.units().abs();
    let quarter = 16384;
    if a.abs() <= m {
        Some(Axis::PosZ)
    } else if (a - quarter).abs() <= m {
        Some(Axis::PosX)
    } else if a.abs() >= 2 * quarter - m {
        Some(Axis::NegZ)
    } else if (a + quarter).abs() <= m {
        Some(Axis::NegX)
    } else {
        None
    }
}

/// Snap `angle` to its cardinal axis, if one lies within `margin`.
#[inline]
pub fn align_rotation(angle: Angle, margin: Angle) -> Option<Angle> {
    axis_from_angle(angle, margin).map(Axis::angle)
}

/// Horizontal displacement of length `len` along heading `angle`.
#[inline]
pub fn pitch(len: i32, angle: Angle) -> IVec3 {
    IVec3::new(
        (len as f64 * angle.sin()) as i32,
        0,
        (len as f64 * angle.cos()) as i32,
    )
}

/// Displacement of length `len` along heading `yaw` tilted by `tilt` (positive tilt points up).
#[inline]
pub fn pitch_3d(len: i32, yaw: Angle, tilt: Angle) -> IVec3 {
    let flat = len as f64 * tilt.cos();
    IVec3::new(
        (flat * yaw.sin()) as i32,
        -(len as f64 * tilt.sin()) as i32,
        (flat * yaw.cos()) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_margins() {
        let margin = Angle::from_degrees(35.0);
        assert_eq!(axis_from_angle(Angle::from_degrees(30.0), margin), Some(Axis::PosZ));
        assert_eq!(axis_from_angle(Angle::from_degrees(100.0), margin), Some(Axis::PosX));
        assert_eq!(axis_from_angle(Angle::from_degrees(-170.0), margin), Some(Axis::NegZ));
        assert_eq!(axis_from_angle(Angle::from_degrees(-80.0), margin), Some(Axis::NegX));
        assert_eq!(axis_from_angle(Angle::from_degrees(45.0), margin), None);
    }

    #[test]
    fn pitch_follows_heading() {
        assert_eq!(pitch(256, Angle::from_degrees(0.0)), IVec3::new(0, 0, 256));
        let east = pitch(256, Angle::from_degrees(90.0));
        assert_eq!((east.x, east.z), (256, 0));
    }
}
