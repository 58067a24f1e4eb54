use glam::IVec3;

use crate::defs::constants::{LARA_AIR, LARA_HEALTH};
use crate::defs::{AnimationId, LaraStateId};
use crate::sim::anim::AnimState;
use crate::sim::components::ItemType;
use crate::units::Angle;
use crate::world::{RoomId, RoomPos};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandStatus {
    #[default]
    None,
    Grabbing,
    Unholster,
    Holster,
    Combat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnderwaterStatus {
    #[default]
    OnLand,
    /// Below the surface.
    Diving,
    /// On the surface.
    Swimming,
}

/// Euler rotation: `x` pitch, `y` yaw (heading), `z` roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rotation {
    pub x: Angle,
    pub y: Angle,
    pub z: Angle,
}

/// Everything the state handlers read and write about Lara.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaraState {
    pub position: RoomPos,
    /// Floor height seen by the last room update or landing.
    pub floor: i32,
    pub rotation: Rotation,
    pub anim: AnimState,
    /// State of the playing animation, kept in sync by `set_animation`.
    pub current_state: LaraStateId,
    pub goal_state: LaraStateId,

    pub health: i32,
    pub air: i32,
    /// Vertical speed while falling, swim speed in water.
    pub fall_speed: i32,
    pub speed: i32,
    pub falling: bool,
    /// Replaces the fall speed of the next jump command, 0 when unset.
    pub fall_speed_override: i32,

    pub hand_status: HandStatus,
    pub underwater_status: UnderwaterStatus,

    /// Heading of horizontal motion, decoupled from `rotation.y`.
    pub movement_angle: Angle,
    pub y_rotation_speed: Angle,
    pub slide_angle: Angle,

    /// Tics the dive key has been held on the surface.
    pub swim_to_dive_count: i32,
    /// Item handed over once the pickup animation grabs it.
    pub pending_pickup: Option<(ItemType, u32)>,
}

impl LaraState {
    /// Lara standing idle at `pos`.
    pub fn new(pos: IVec3, room: RoomId, heading: Angle) -> Self {
        Self {
            position: RoomPos::new(pos, room),
            floor: pos.y,
            rotation: Rotation {
                y: heading,
                ..Rotation::default()
            },
            anim: AnimState {
                id: AnimationId::STAY_IDLE,
                frame: 1637,
            },
            current_state: LaraStateId::Stop,
            goal_state: LaraStateId::Stop,
            health: LARA_HEALTH,
            air: LARA_AIR,
            fall_speed: 0,
            speed: 0,
            falling: false,
            fall_speed_override: 0,
            hand_status: HandStatus::None,
            underwater_status: UnderwaterStatus::OnLand,
            movement_angle: heading,
            y_rotation_speed: Angle::ZERO,
            slide_angle: Angle::ZERO,
            swim_to_dive_count: 0,
            pending_pickup: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec3 {
        self.position.pos
    }

    #[inline]
    pub fn pos_mut(&mut self) -> &mut IVec3 {
        &mut self.position.pos
    }

    #[inline]
    pub fn is_dying(&self) -> bool {
        self.health <= 0
    }

    #[inline]
    pub fn is_in_water(&self) -> bool {
        self.underwater_status != UnderwaterStatus::OnLand
    }
}
