//! Fixed-point units shared by the world model and the simulation.
//!
//! Lengths are plain `i32` world units (1024 per sector, y grows downwards),
//! positions are `glam::IVec3`.

mod angle;
mod axis;
mod bbox;

pub use angle::Angle;
pub use axis::{Axis, align_rotation, axis_from_angle, pitch, pitch_3d};
pub use bbox::BoundingBox;
