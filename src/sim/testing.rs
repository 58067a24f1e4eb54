//! Fixtures shared by the unit tests of the simulation.

use glam::IVec3;

use super::anim::{AnimationSet, Animator};
use super::components::{InputState, ItemType};
use super::hooks::{CameraMode, Hooks};
use super::lara::handler::StateCtx;
use super::lara::state::LaraState;
use crate::defs::{AnimationId, Frame, SoundId};
use crate::units::Angle;
use crate::world::{CommandSequence, FloorDataIndex, Level, LevelBuilder};

/// Hooks that remember every call.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub sounds: Vec<SoundId>,
    pub stopped: Vec<SoundId>,
    pub camera_rotation: Option<(Angle, Angle)>,
    pub camera_distance: Option<i32>,
    pub camera_mode: CameraMode,
    pub inventory: Vec<(ItemType, u32)>,
    pub sequences: Vec<(FloorDataIndex, bool)>,
}

impl Hooks for RecordingHooks {
    fn play_sound(&mut self, sound: SoundId) {
        self.sounds.push(sound);
    }

    fn stop_sound(&mut self, sound: SoundId) {
        self.stopped.push(sound);
    }

    fn set_camera_rotation(&mut self, x: Angle, y: Angle) {
        self.camera_rotation = Some((x, y));
    }

    fn set_camera_rotation_x(&mut self, x: Angle) {
        let y = self.camera_rotation.map_or(Angle::ZERO, |(_, y)| y);
        self.camera_rotation = Some((x, y));
    }

    fn set_camera_distance(&mut self, distance: i32) {
        self.camera_distance = Some(distance);
    }

    fn set_camera_mode(&mut self, mode: CameraMode) {
        self.camera_mode = mode;
    }

    fn put_inventory(&mut self, item: ItemType, quantity: u32) {
        self.inventory.push((item, quantity));
    }

    fn command_sequence(&mut self, sequence: &CommandSequence, from_heavy: bool) {
        self.sequences.push((sequence.index, from_heavy));
    }
}

/// A level, Lara standing in room 0 and the stock animations.
pub struct Harness {
    pub level: Level,
    pub anims: AnimationSet,
    pub hooks: RecordingHooks,
    pub lara: LaraState,
}

impl Harness {
    pub fn new(level: Level, pos: IVec3) -> Self {
        Self {
            level,
            anims: AnimationSet::stock().expect("stock table is valid"),
            hooks: RecordingHooks::default(),
            lara: LaraState::new(pos, 0, Angle::ZERO),
        }
    }

    /// 5x5 room with a flat floor at 0, Lara in the middle facing +z.
    pub fn flat() -> Self {
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).build();
        Self::new(level, IVec3::new(2560, 0, 2560))
    }

    /// Put Lara into `id` at `frame`, state included.
    pub fn set_anim(&mut self, id: AnimationId, frame: Frame) {
        self.lara.current_state = self
            .anims
            .set_animation(&mut self.lara.anim, id, Some(frame))
            .expect("animation exists");
    }

    pub fn ctx(&mut self, input: InputState) -> StateCtx<'_> {
        StateCtx {
            lara: &mut self.lara,
            level: &self.level,
            anims: &self.anims,
            hooks: &mut self.hooks,
            input,
        }
    }
}
