//! Animation ids and the plain data an animation table is made of.
//!
//! Frame numbers are absolute, i.e. they index one global frame list shared by
//! every animation of the model, exactly as the level data stores them.

use glam::IVec3;
use smallvec::SmallVec;

use super::{LaraStateId, SoundId};
use crate::units::BoundingBox;

/// Absolute frame number.
pub type Frame = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub u16);

impl AnimationId {
    pub const RUN: Self = Self(0);
    pub const WALK_FORWARD: Self = Self(1);
    pub const END_WALK_RIGHT: Self = Self(2);
    pub const END_WALK_LEFT: Self = Self(3);
    pub const RUN_TO_STAY_LEFT: Self = Self(8);
    pub const RUN_TO_STAY_RIGHT: Self = Self(9);
    pub const STAY_SOLID: Self = Self(11);
    pub const TURN_RIGHT_SLOW: Self = Self(12);
    pub const TURN_LEFT_SLOW: Self = Self(13);
    pub const LANDING_FORWARD_BOTH: Self = Self(14);
    pub const FREE_FALL_LONG: Self = Self(23);
    pub const LANDING_HARD: Self = Self(24);
    pub const DEATH_BREAK: Self = Self(25);
    pub const TRY_HANG_VERTICAL: Self = Self(28);
    pub const LANDING_LIGHT: Self = Self(31);
    pub const SMASH_JUMP: Self = Self(32);
    pub const FREE_FALL_FORWARD: Self = Self(34);
    pub const WALK_BACK: Self = Self(40);
    pub const CLIMB_3CLICK: Self = Self(42);
    pub const FLY_FORWARD_TRY_TO_HANG: Self = Self(46);
    pub const ROLL_ALTERNATE: Self = Self(47);
    pub const CLIMB_2CLICK: Self = Self(50);
    pub const WALL_SMASH_LEFT: Self = Self(53);
    pub const WALL_SMASH_RIGHT: Self = Self(54);
    pub const RUN_UP_STEP_RIGHT: Self = Self(55);
    pub const RUN_UP_STEP_LEFT: Self = Self(56);
    pub const WALK_UP_STEP_RIGHT: Self = Self(57);
    pub const WALK_UP_STEP_LEFT: Self = Self(58);
    pub const WALK_DOWN_LEFT: Self = Self(59);
    pub const WALK_DOWN_RIGHT: Self = Self(60);
    pub const WALK_DOWN_BACK_LEFT: Self = Self(61);
    pub const WALK_DOWN_BACK_RIGHT: Self = Self(62);
    pub const PULL_SWITCH_DOWN: Self = Self(63);
    pub const PULL_SWITCH_UP: Self = Self(64);
    pub const WALK_LEFT: Self = Self(65);
    pub const WALK_RIGHT: Self = Self(67);
    pub const SLIDE_FORWARD: Self = Self(70);
    pub const JUMP_PREPARE: Self = Self(73);
    pub const JUMP_BACK_BEGIN: Self = Self(74);
    pub const JUMP_BACK: Self = Self(75);
    pub const JUMP_FORWARD_BEGIN: Self = Self(76);
    pub const CONTINUE_FLY_FORWARD: Self = Self(77);
    pub const JUMP_LEFT_BEGIN: Self = Self(78);
    pub const JUMP_LEFT: Self = Self(79);
    pub const JUMP_RIGHT_BEGIN: Self = Self(80);
    pub const JUMP_RIGHT: Self = Self(81);
    pub const LANDING_MIDDLE: Self = Self(82);
    pub const UNDERWATER_SWIM_FORWARD: Self = Self(86);
    pub const UNDERWATER_SWIM_SOLID: Self = Self(87);
    pub const RUN_BACK: Self = Self(89);
    pub const TRY_HANG_VERTICAL_BEGIN: Self = Self(91);
    pub const LANDING_FROM_RUN: Self = Self(92);
    pub const FREE_FALL_BACK: Self = Self(93);
    pub const HANG_IDLE: Self = Self(96);
    pub const CLIMB_ON: Self = Self(97);
    pub const STAY_IDLE: Self = Self(103);
    pub const START_SLIDE_BACKWARD: Self = Self(104);
    pub const SLIDE_BACKWARD: Self = Self(105);
    pub const UNDERWATER_IDLE: Self = Self(108);
    pub const ONWATER_IDLE: Self = Self(110);
    pub const CLIMB_OUT_OF_WATER: Self = Self(111);
    pub const FREE_FALL_TO_UNDERWATER: Self = Self(112);
    pub const UNDERWATER_TO_ONWATER: Self = Self(114);
    pub const ONWATER_DIVE: Self = Self(115);
    pub const ONWATER_SWIM_FORWARD: Self = Self(116);
    pub const FREE_FALL_TO_UNDERWATER_ALTERNATE: Self = Self(119);
    pub const START_OBJECT_MOVING: Self = Self(120);
    pub const STOP_OBJECT_MOVING: Self = Self(121);
    pub const OBJECT_PULL: Self = Self(122);
    pub const OBJECT_PUSH: Self = Self(123);
    pub const UNDERWATER_DEATH: Self = Self(124);
    pub const USE_KEY: Self = Self(131);
    pub const ONWATER_DEATH: Self = Self(132);
    pub const USE_PUZZLE: Self = Self(134);
    pub const PICKUP: Self = Self(135);
    pub const CLIMB_LEFT: Self = Self(136);
    pub const CLIMB_RIGHT: Self = Self(137);
    pub const STAY_TO_DEATH: Self = Self(138);
    pub const SQUASH_BOULDER: Self = Self(139);
    pub const ONWATER_SWIM_BACK: Self = Self(141);
    pub const ONWATER_SWIM_LEFT: Self = Self(143);
    pub const ONWATER_SWIM_RIGHT: Self = Self(144);
    pub const ROLL_BEGIN: Self = Self(146);
    pub const OSCILLATE_HANG_ON: Self = Self(150);

    // Not part of the retail set; the stock table fills the remaining states with these.
    pub const TURN_FAST: Self = Self(160);
    pub const POSE: Self = Self(161);
    pub const ROLL_BACKWARD: Self = Self(162);
    pub const SWANDIVE_BEGIN: Self = Self(163);
    pub const SWANDIVE_END: Self = Self(164);
    pub const HANDSTAND: Self = Self(165);
    pub const USE_MIDAS: Self = Self(166);
    pub const MIDAS_DEATH: Self = Self(167);
}

/// Command attached to an animation. `PlaySound` fires on its frame, every other
/// command runs when the animation wraps to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimCommand {
    /// Move the item by a model-space offset (rotated by the item's yaw).
    SetPosition(IVec3),
    /// Launch into the air; a pending fall speed override wins over `fall_speed`.
    JumpVelocity { fall_speed: i32, speed: i32 },
    EmptyHands,
    /// Turn the item around once the animation has played.
    Turn180,
    PlaySound { frame: Frame, sound: SoundId },
}

/// One frame window of a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCase {
    pub first_frame: Frame,
    pub last_frame: Frame,
    pub target: AnimationId,
    pub target_frame: Frame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub goal: LaraStateId,
    pub cases: SmallVec<[TransitionCase; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimDef {
    pub id: AnimationId,
    pub state: LaraStateId,
    pub first_frame: Frame,
    pub last_frame: Frame,
    pub next: AnimationId,
    pub next_frame: Frame,
    /// 16.16 fixed point, units per frame.
    pub velocity: i32,
    /// 16.16 fixed point, units per frame².
    pub acceleration: i32,
    pub transitions: Vec<Transition>,
    pub commands: Vec<AnimCommand>,
    pub bbox: BoundingBox,
}

impl AnimDef {
    /// Animation looping onto itself, standing still, standing box.
    pub fn new(id: AnimationId, state: LaraStateId, first_frame: Frame, last_frame: Frame) -> Self {
        Self {
            id,
            state,
            first_frame,
            last_frame,
            next: id,
            next_frame: first_frame,
            velocity: 0,
            acceleration: 0,
            transitions: Vec::new(),
            commands: Vec::new(),
            bbox: BoundingBox::new(IVec3::new(-110, -762, -110), IVec3::new(110, 0, 110)),
        }
    }

    pub fn next(mut self, next: AnimationId, frame: Frame) -> Self {
        self.next = next;
        self.next_frame = frame;
        self
    }

    /// Hold the last frame once played.
    pub fn hold(mut self) -> Self {
        self.next = self.id;
        self.next_frame = self.last_frame;
        self
    }

    /// Speed in whole units per frame plus a raw 16.16 acceleration.
    pub fn speed(mut self, units: i32, acceleration: i32) -> Self {
        self.velocity = units << 16;
        self.acceleration = acceleration;
        self
    }

    pub fn bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn command(mut self, cmd: AnimCommand) -> Self {
        self.commands.push(cmd);
        self
    }

    /// Change to `goal` from anywhere in the animation.
    pub fn on(self, goal: LaraStateId, target: AnimationId, target_frame: Frame) -> Self {
        let (first, last) = (self.first_frame, self.last_frame);
        self.on_frames(goal, first, last, target, target_frame)
    }

    /// Change to `goal` while the frame is inside `first ..= last`.
    pub fn on_frames(
        mut self,
        goal: LaraStateId,
        first: Frame,
        last: Frame,
        target: AnimationId,
        target_frame: Frame,
    ) -> Self {
        let case = TransitionCase {
            first_frame: first,
            last_frame: last,
            target,
            target_frame,
        };
        match self.transitions.iter_mut().find(|t| t.goal == goal) {
            Some(t) => t.cases.push(case),
            None => self.transitions.push(Transition {
                goal,
                cases: smallvec::smallvec![case],
            }),
        }
        self
    }

    #[inline]
    pub fn contains_frame(&self, frame: Frame) -> bool {
        (self.first_frame..=self.last_frame).contains(&frame)
    }
}
