//! Outside collaborators the state machine talks to.
//!
//! Every method has a no-op default so a caller only implements what it
//! cares about. Nothing here is ever read back by the simulation.

use super::components::ItemType;
use crate::defs::SoundId;
use crate::units::Angle;
use crate::world::CommandSequence;

/// Third-person camera framing requested by a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Chase,
    Fixed,
    Look,
    Combat,
}

pub trait Hooks {
    fn play_sound(&mut self, _sound: SoundId) {}

    fn stop_sound(&mut self, _sound: SoundId) {}

    /// Orbit the camera around Lara, `x` pitch and `y` yaw.
    fn set_camera_rotation(&mut self, _x: Angle, _y: Angle) {}

    /// Pitch the camera, leaving its yaw alone.
    fn set_camera_rotation_x(&mut self, _x: Angle) {}

    fn set_camera_distance(&mut self, _distance: i32) {}

    fn set_camera_mode(&mut self, _mode: CameraMode) {}

    fn put_inventory(&mut self, _item: ItemType, _quantity: u32) {}

    /// A floor command sequence was stepped on (or settled on by a heavy
    /// object when `from_heavy` is set).
    fn command_sequence(&mut self, _sequence: &CommandSequence, _from_heavy: bool) {}
}

/// Hooks that ignore everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl Hooks for NullHooks {}
