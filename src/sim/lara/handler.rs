//! Machinery shared by every state handler.
//!
//! A handler is a stateless value; everything it touches is lent to it for
//! one call through [`StateCtx`]. The context also carries the algorithms
//! several states share: ledge grabbing, climbing, sliding, wall response,
//! landing damage and the common post-processing of each state family.
//!
//! None of the `try_*` helpers report failure as an error. They return
//! `false` and leave Lara untouched so the caller can fall through to its
//! default behaviour.

use glam::IVec3;

use super::state::{HandStatus, LaraState};
use crate::defs::constants::{
    CLIMB_ALIGN_MARGIN, CLIMB_LIMIT_2_CLICK_MAX, CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_3_CLICK_MAX,
    DAMAGE_FALL_SPEED_THRESHOLD, DEADLY_FALL_SPEED_THRESHOLD, DEFAULT_COLLISION_RADIUS,
    GRAB_ALIGN_MARGIN, GRAVITY, GRAVITY_TERMINAL, HEIGHT_LIMIT, JUMP_REACHABLE_HEIGHT,
    LARA_HEALTH, LARA_WALK_HEIGHT, NO_FLOOR, PROBE_AXIS_MARGIN, QUARTER_SECTOR_SIZE,
    TERMINAL_FALL_SPEED, WALL_SLIDE_TURN,
};
use crate::defs::{AnimCommand, AnimationId, Frame, LaraStateId, SoundId};
use crate::sim::TickError;
use crate::sim::anim::Animator;
use crate::sim::collision::{AxisColl, CollisionInfo, VerticalSpaceInfo};
use crate::sim::components::InputState;
use crate::sim::hooks::Hooks;
use crate::units::{Angle, Axis, BoundingBox, align_rotation, axis_from_angle, pitch};
use crate::world::floordata::{self, ChunkType};
use crate::world::{FloorDataIndex, HeightInfo, Level, SequenceCondition, WorldError};

pub type StateResult = Result<(), TickError>;

/// Head clearance below which a standing Lara cannot grab a ledge.
const GRAB_MIN_FLOOR: i32 = 200;
const CLIMB_ONTO_HEIGHT: i32 = 400;

/// One locomotion state.
pub trait StateHandler: Sync {
    fn id(&self) -> LaraStateId;

    /// Turn the input into a goal state. Never probes the level.
    fn handle_input(&self, _ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        Ok(())
    }

    /// Probe the level after the animation advanced and resolve the result.
    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult;
}

/// Everything a handler may use during one call.
pub struct StateCtx<'a> {
    pub lara: &'a mut LaraState,
    pub level: &'a Level,
    pub anims: &'a dyn Animator,
    pub hooks: &'a mut dyn Hooks,
    pub input: InputState,
}

// ──────────────────────────────────────────────────────────────────────────
//                       Small accessors
// ──────────────────────────────────────────────────────────────────────────
impl StateCtx<'_> {
    #[inline]
    pub fn goal(&self) -> LaraStateId {
        self.lara.goal_state
    }

    #[inline]
    pub fn current(&self) -> LaraStateId {
        self.lara.current_state
    }

    #[inline]
    pub fn set_goal(&mut self, goal: LaraStateId) {
        if self.lara.goal_state != goal {
            log::trace!("goal {} -> {goal}", self.lara.goal_state);
        }
        self.lara.goal_state = goal;
    }

    /// Jump straight into `id`; the current state follows the animation.
    pub fn set_animation(&mut self, id: AnimationId, frame: Frame) -> StateResult {
        let state = self.anims.set_animation(&mut self.lara.anim, id, Some(frame))?;
        if state != self.lara.current_state {
            log::debug!("{} -> {state} via {id:?}@{frame}", self.lara.current_state);
        }
        self.lara.current_state = state;
        Ok(())
    }

    /// Absolute frame of the playing animation.
    #[inline]
    pub fn frame(&self) -> Frame {
        self.lara.anim.frame
    }

    #[inline]
    pub fn bounding_box(&self) -> Result<BoundingBox, TickError> {
        Ok(self.anims.bounding_box(&self.lara.anim)?)
    }

    #[inline]
    pub fn apply_shift(&mut self, coll: &mut CollisionInfo) {
        *self.lara.pos_mut() += coll.shift;
        coll.shift = IVec3::ZERO;
    }

    #[inline]
    pub fn place_on_floor(&mut self, coll: &CollisionInfo) {
        self.lara.pos_mut().y += coll.mid.floor.y;
    }

    /// Run the height probe for a body `height` units tall.
    #[inline]
    pub fn probe(&self, coll: &mut CollisionInfo, height: i32) {
        coll.init_height_info(self.level, self.lara.position, height);
    }

    /// Accelerate the turn to the right, capped at `limit`.
    pub fn add_y_rotation_speed(&mut self, val: Angle, limit: Angle) {
        let speed = self.lara.y_rotation_speed.units() + val.units();
        self.lara.y_rotation_speed = Angle(speed.min(limit.units()) as i16);
    }

    /// Accelerate the turn to the left, capped at `limit` (negative).
    pub fn sub_y_rotation_speed(&mut self, val: Angle, limit: Angle) {
        let speed = self.lara.y_rotation_speed.units() - val.units();
        self.lara.y_rotation_speed = Angle(speed.max(limit.units()) as i16);
    }

    /// Left / right turn input at `rate`, limited to `limit` either way.
    pub fn turn_by_input(&mut self, rate: Angle, limit: Angle) {
        use crate::sim::components::AxisMovement;
        match self.input.x_movement {
            AxisMovement::Left => self.sub_y_rotation_speed(rate, -limit),
            AxisMovement::Right => self.add_y_rotation_speed(rate, limit),
            _ => {}
        }
    }

    pub fn dampen_horizontal_speed(&mut self) {
        self.lara.speed = self.lara.speed * 95 / 100;
    }

    pub fn set_camera_rotation(&mut self, x: Angle, y: Angle) {
        self.hooks.set_camera_rotation(x, y);
    }

    pub fn set_camera_rotation_x(&mut self, x: Angle) {
        self.hooks.set_camera_rotation_x(x);
    }

    pub fn play_sound(&mut self, sound: SoundId) {
        self.hooks.play_sound(sound);
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Animation and motion
// ──────────────────────────────────────────────────────────────────────────
impl StateCtx<'_> {
    /// Advance the animation one frame, run its commands and move Lara by
    /// the resulting speed.
    pub fn update_impl(&mut self) -> StateResult {
        let step = self.anims.advance(&mut self.lara.anim, self.lara.goal_state)?;
        if let Some(state) = step.new_state {
            log::debug!("{} -> {state} at {:?}@{}", self.lara.current_state, self.lara.anim.id, self.lara.anim.frame);
            self.lara.current_state = state;
        }

        for cmd in &step.end_commands {
            match *cmd {
                AnimCommand::SetPosition(offset) => {
                    let yaw = self.lara.rotation.y;
                    let (s, c) = (yaw.sin(), yaw.cos());
                    let world = IVec3::new(
                        (offset.x as f64 * c + offset.z as f64 * s) as i32,
                        offset.y,
                        (-offset.x as f64 * s + offset.z as f64 * c) as i32,
                    );
                    *self.lara.pos_mut() += world;
                }
                AnimCommand::JumpVelocity { fall_speed, speed } => {
                    self.lara.fall_speed = if self.lara.fall_speed_override != 0 {
                        std::mem::take(&mut self.lara.fall_speed_override)
                    } else {
                        fall_speed
                    };
                    self.lara.speed = speed;
                    self.lara.falling = true;
                }
                AnimCommand::EmptyHands => self.lara.hand_status = HandStatus::None,
                AnimCommand::Turn180 => {
                    self.lara.rotation.y += Angle::from_degrees(180.0);
                }
                AnimCommand::PlaySound { .. } => {}
            }
        }
        for &sound in &step.sounds {
            self.hooks.play_sound(sound);
        }

        let (v, a) = (step.velocity, step.acceleration);
        if self.lara.falling {
            self.lara.speed += (v >> 16) - ((v - a) >> 16);
            self.lara.fall_speed += if self.lara.fall_speed < TERMINAL_FALL_SPEED {
                GRAVITY
            } else {
                GRAVITY_TERMINAL
            };
            self.lara.pos_mut().y += self.lara.fall_speed;
        } else {
            self.lara.speed = v >> 16;
        }
        let motion = pitch(self.lara.speed, self.lara.movement_angle);
        *self.lara.pos_mut() += motion;
        Ok(())
    }

    /// Floor height straight below Lara, absolute.
    pub fn floor_below(&self) -> HeightInfo {
        let mut room = self.lara.position.room;
        let pos = self.lara.pos();
        let sector = self.level.find_real_floor_sector(pos, &mut room);
        HeightInfo::from_floor(self.level, sector, pos - IVec3::new(0, LARA_WALK_HEIGHT, 0))
    }

    /// Deadly floors and floor command sequences under Lara.
    pub fn handle_command_sequence(
        &mut self,
        index: Option<FloorDataIndex>,
        from_heavy: bool,
    ) -> StateResult {
        let Some(index) = index else {
            return Ok(());
        };
        let chunks =
            floordata::scan(&self.level.floor_data, index).map_err(WorldError::from)?;
        let mut rest = chunks.as_slice();

        if let Some((first, tail)) = rest.split_first() {
            if first.header.kind == ChunkType::Death {
                if !from_heavy
                    && (self.lara.pos().y == self.lara.floor || self.lara.is_in_water())
                {
                    log::debug!("Lara burns on a deadly floor");
                    self.lara.health = -1;
                }
                rest = tail;
            }
        }

        let Some(chunk) = rest
            .iter()
            .find(|c| c.header.kind == ChunkType::CommandSequence)
        else {
            return Ok(());
        };
        let seq = self.level.command_sequence(chunk.payload - 1)?;
        let fire = if from_heavy {
            seq.condition == SequenceCondition::ItemIsHere
        } else {
            match seq.condition {
                SequenceCondition::LaraOnGround | SequenceCondition::LaraOnGroundInverted => {
                    self.lara.pos().y == self.lara.floor
                }
                SequenceCondition::LaraInCombatMode => {
                    self.lara.hand_status == HandStatus::Combat
                }
                SequenceCondition::ItemIsHere | SequenceCondition::Dummy => false,
                _ => true,
            }
        };
        if fire {
            log::debug!("command sequence at {} fires ({:?})", seq.index, seq.condition);
            self.hooks.command_sequence(&seq, from_heavy);
        }
        Ok(())
    }

    /// Take fall damage for the current fall speed. Returns `true` if Lara
    /// did not survive.
    pub fn apply_landing_damage(&mut self) -> Result<bool, TickError> {
        let floor = self.floor_below();
        self.lara.floor = floor.y;
        self.handle_command_sequence(floor.last_command_sequence_or_death, false)?;

        let damage_speed = self.lara.fall_speed - DAMAGE_FALL_SPEED_THRESHOLD;
        if damage_speed <= 0 {
            return Ok(false);
        }
        const DEATH_SPEED_LIMIT: i32 = DEADLY_FALL_SPEED_THRESHOLD - DAMAGE_FALL_SPEED_THRESHOLD;
        if self.lara.fall_speed >= DEADLY_FALL_SPEED_THRESHOLD {
            self.lara.health = -1;
        } else {
            self.lara.health -=
                LARA_HEALTH * damage_speed * damage_speed / (DEATH_SPEED_LIMIT * DEATH_SPEED_LIMIT);
        }
        log::debug!("landing at fall speed {} leaves health {}", self.lara.fall_speed, self.lara.health);
        Ok(self.lara.health <= 0)
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Ledges and climbing
// ──────────────────────────────────────────────────────────────────────────
impl StateCtx<'_> {
    /// Room to stand on top of the ledge a quarter sector ahead.
    pub fn can_climb_onto(&self, axis: Axis) -> bool {
        let pos = self.lara.pos() + axis.step() * QUARTER_SECTOR_SIZE;
        let space =
            VerticalSpaceInfo::init(self.level, pos, self.lara.position.room, pos.y, CLIMB_ONTO_HEIGHT);
        space.floor.y != NO_FLOOR && space.floor.y > 0 && space.ceiling.y < 0
    }

    /// Shared gate of every grab: wall in front, action held, free hands,
    /// even ledge.
    fn may_grab(&self, coll: &CollisionInfo) -> bool {
        coll.collision_type == AxisColl::Front
            && self.input.action
            && self.lara.hand_status == HandStatus::None
            && !coll.too_steep_to_grab()
    }

    /// Whether the hands cross the ledge within this tic's fall.
    fn ledge_in_reach(&self, space_to_reach: i32) -> bool {
        let fs = self.lara.fall_speed;
        !(space_to_reach < 0 && fs + space_to_reach < 0)
            && !(space_to_reach > 0 && fs + space_to_reach > 0)
    }

    /// Grab a ledge while jumping with the arms up.
    pub fn try_reach(&mut self, coll: &mut CollisionInfo) -> Result<bool, TickError> {
        if !self.may_grab(coll) {
            return Ok(false);
        }
        if coll.front.ceiling.y > 0
            || coll.mid.ceiling.y > -CLIMB_LIMIT_2_CLICK_MIN
            || coll.mid.floor.y < GRAB_MIN_FLOOR
        {
            return Ok(false);
        }

        let space_to_reach = coll.front.floor.y - self.bounding_box()?.min.y;
        if !self.ledge_in_reach(space_to_reach) {
            return Ok(false);
        }
        let yaw = self.lara.rotation.y;
        let (Some(aligned), Some(axis)) = (
            align_rotation(yaw, GRAB_ALIGN_MARGIN),
            axis_from_angle(yaw, GRAB_ALIGN_MARGIN),
        ) else {
            return Ok(false);
        };

        if self.can_climb_onto(axis) {
            self.set_animation(AnimationId::OSCILLATE_HANG_ON, 3974)?;
        } else {
            self.set_animation(AnimationId::HANG_IDLE, 1493)?;
        }
        self.set_goal(LaraStateId::Hang);
        *self.lara.pos_mut() += IVec3::new(coll.shift.x, space_to_reach, coll.shift.z);
        self.lara.speed = 0;
        self.lara.rotation.y = aligned;
        self.lara.falling = false;
        self.lara.fall_speed = 0;
        self.lara.hand_status = HandStatus::Grabbing;
        log::debug!("reached ledge {space_to_reach} above the hands");
        Ok(true)
    }

    /// Grab a ledge from a vertical jump.
    pub fn try_grab_edge(&mut self, coll: &mut CollisionInfo) -> Result<bool, TickError> {
        if !self.may_grab(coll) {
            return Ok(false);
        }
        if coll.front.ceiling.y > 0 || coll.mid.ceiling.y > -CLIMB_LIMIT_2_CLICK_MIN {
            return Ok(false);
        }
        let space_to_reach = coll.front.floor.y - self.bounding_box()?.min.y;
        if !self.ledge_in_reach(space_to_reach) {
            return Ok(false);
        }
        let Some(aligned) = align_rotation(self.lara.rotation.y, GRAB_ALIGN_MARGIN) else {
            return Ok(false);
        };

        self.set_goal(LaraStateId::Hang);
        self.set_animation(AnimationId::HANG_IDLE, 1505)?;
        // the hanging box differs from the jumping one
        let space_to_reach = coll.front.floor.y - self.bounding_box()?.min.y;
        self.lara.pos_mut().y += space_to_reach;
        self.apply_shift(coll);
        self.lara.speed = 0;
        self.lara.fall_speed = 0;
        self.lara.falling = false;
        self.lara.hand_status = HandStatus::Grabbing;
        self.lara.rotation.y = aligned;
        log::debug!("grabbed edge from a jump");
        Ok(true)
    }

    /// Climb a 2- or 3-click step, or jump up to anything lower than the
    /// reachable height.
    pub fn try_climb(&mut self, coll: &mut CollisionInfo) -> Result<bool, TickError> {
        if !self.may_grab(coll) {
            return Ok(false);
        }
        let Some(aligned) = align_rotation(self.lara.rotation.y, CLIMB_ALIGN_MARGIN) else {
            return Ok(false);
        };

        let blocked_above = |coll: &CollisionInfo| {
            coll.front.floor.y < coll.front.ceiling.y
                || coll.front_left.floor.y < coll.front_left.ceiling.y
                || coll.front_right.floor.y < coll.front_right.ceiling.y
        };

        let h = coll.front.floor.y;
        if (-CLIMB_LIMIT_2_CLICK_MAX..=-CLIMB_LIMIT_2_CLICK_MIN).contains(&h) {
            if blocked_above(coll) {
                return Ok(false);
            }
            self.set_goal(LaraStateId::Stop);
            self.set_animation(AnimationId::CLIMB_2CLICK, 759)?;
            self.lara.pos_mut().y += 2 * QUARTER_SECTOR_SIZE + h;
            self.lara.hand_status = HandStatus::Grabbing;
        } else if (-CLIMB_LIMIT_3_CLICK_MAX..=-CLIMB_LIMIT_2_CLICK_MAX).contains(&h) {
            if blocked_above(coll) {
                return Ok(false);
            }
            self.set_goal(LaraStateId::Stop);
            self.set_animation(AnimationId::CLIMB_3CLICK, 614)?;
            self.lara.pos_mut().y += 3 * QUARTER_SECTOR_SIZE + h;
            self.lara.hand_status = HandStatus::Grabbing;
        } else if (-JUMP_REACHABLE_HEIGHT..=-CLIMB_LIMIT_3_CLICK_MAX).contains(&h) {
            self.set_goal(LaraStateId::JumpUp);
            self.set_animation(AnimationId::STAY_SOLID, 185)?;
            let lift = (12.0 * -(h + 800) as f64).sqrt() as i32;
            self.lara.fall_speed_override = -(lift + 3);
            self.update_impl()?;
        } else {
            return Ok(false);
        }

        log::debug!("climbing a ledge {h} high");
        self.lara.rotation.y = aligned;
        self.apply_shift(coll);
        Ok(true)
    }

    /// Floor height `dist` units away along `angle`, relative to Lara, or the
    /// "no floor" sentinel.
    pub fn relative_height_at(&self, angle: Angle, dist: i32) -> i32 {
        let mut pos = self.lara.pos() + pitch(dist, angle);
        pos.y -= LARA_WALK_HEIGHT;
        let mut room = self.lara.position.room;
        let sector = self.level.find_real_floor_sector(pos, &mut room);
        let h = HeightInfo::from_floor(self.level, sector, pos);
        if h.y == NO_FLOOR {
            h.y
        } else {
            h.y - self.lara.pos().y
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Walls, ceilings and slopes
// ──────────────────────────────────────────────────────────────────────────
impl StateCtx<'_> {
    /// Undo this tic's motion if the head hit the ceiling.
    pub fn stop_if_ceiling_blocked(&mut self, coll: &CollisionInfo) -> Result<bool, TickError> {
        if !matches!(coll.collision_type, AxisColl::Top | AxisColl::TopFront) {
            return Ok(false);
        }
        self.lara.position.pos = coll.old_position;
        self.set_goal(LaraStateId::Stop);
        self.set_animation(AnimationId::STAY_SOLID, 185)?;
        self.lara.speed = 0;
        self.lara.fall_speed = 0;
        self.lara.falling = false;
        Ok(true)
    }

    /// Stop at a wall ahead, glance off a wall at the side.
    pub fn check_wall_collision(&mut self, coll: &mut CollisionInfo) -> bool {
        match coll.collision_type {
            AxisColl::Front | AxisColl::TopBottom => {
                self.apply_shift(coll);
                self.set_goal(LaraStateId::Stop);
                self.lara.falling = false;
                self.lara.speed = 0;
                true
            }
            AxisColl::Left => {
                self.apply_shift(coll);
                self.lara.rotation.y += WALL_SLIDE_TURN;
                false
            }
            AxisColl::Right => {
                self.apply_shift(coll);
                self.lara.rotation.y -= WALL_SLIDE_TURN;
                false
            }
            _ => false,
        }
    }

    /// Start sliding down a steep floor. Sliding on in the same direction
    /// leaves the running slide animation alone.
    pub fn try_start_slide(&mut self, coll: &mut CollisionInfo) -> Result<bool, TickError> {
        let sx = coll.floor_slant_x as i32;
        let sz = coll.floor_slant_z as i32;
        if sx.abs() <= 2 && sz.abs() <= 2 {
            return Ok(false);
        }

        let mut target = Angle::ZERO;
        if sx < -2 {
            target = Angle::from_degrees(90.0);
        } else if sx > 2 {
            target = Angle::from_degrees(-90.0);
        }
        if sz > 2.max(sx.abs()) {
            target = Angle::from_degrees(180.0);
        } else if sz < (-2).min(-sx.abs()) {
            target = Angle::ZERO;
        }

        let dy = (target - self.lara.rotation.y).abs().units();
        self.apply_shift(coll);
        let quarter = Angle::from_degrees(90.0).units();
        if dy > quarter || dy < -quarter {
            if self.current() != LaraStateId::SlideBackward || target != self.lara.slide_angle {
                self.set_animation(AnimationId::START_SLIDE_BACKWARD, 1677)?;
                self.set_goal(LaraStateId::SlideBackward);
                self.lara.movement_angle = target;
                self.lara.slide_angle = target;
                self.lara.rotation.y = target - Angle::from_degrees(180.0);
                log::debug!("sliding backwards towards {target:?}");
            }
        } else if self.current() != LaraStateId::SlideForward || target != self.lara.slide_angle {
            self.set_animation(AnimationId::SLIDE_FORWARD, 1133)?;
            self.set_goal(LaraStateId::SlideForward);
            self.lara.movement_angle = target;
            self.lara.slide_angle = target;
            self.lara.rotation.y = target;
            log::debug!("sliding forwards towards {target:?}");
        }
        Ok(true)
    }

    /// Wall response while flying without the smash.
    pub fn jump_against_wall(&mut self, coll: &mut CollisionInfo) {
        self.apply_shift(coll);
        match coll.collision_type {
            AxisColl::Left => self.lara.rotation.y += WALL_SLIDE_TURN,
            AxisColl::Right => self.lara.rotation.y -= WALL_SLIDE_TURN,
            AxisColl::Top => {
                if self.lara.fall_speed <= 0 {
                    self.lara.fall_speed = 1;
                }
            }
            AxisColl::TopFront => {
                let offset = pitch(DEFAULT_COLLISION_RADIUS, self.lara.rotation.y);
                *self.lara.pos_mut() += offset;
                self.lara.speed = 0;
                coll.mid.floor.y = 0;
                if self.lara.fall_speed < 0 {
                    self.lara.fall_speed = 16;
                }
            }
            _ => {}
        }
    }

    /// Wall response while flying; a head-on hit bounces Lara back.
    pub fn check_jump_wall_smash(&mut self, coll: &mut CollisionInfo) -> StateResult {
        self.apply_shift(coll);
        match coll.collision_type {
            AxisColl::None => {}
            AxisColl::Front | AxisColl::TopBottom => {
                self.set_goal(LaraStateId::FreeFall);
                self.lara.speed /= 2;
                self.lara.movement_angle -= Angle::from_degrees(180.0);
                self.set_animation(AnimationId::SMASH_JUMP, 481)?;
                if self.lara.fall_speed <= 0 {
                    self.lara.fall_speed = 1;
                }
                log::debug!("smashed into a wall mid-jump");
            }
            AxisColl::Left => self.lara.rotation.y += WALL_SLIDE_TURN,
            AxisColl::Right => self.lara.rotation.y -= WALL_SLIDE_TURN,
            AxisColl::TopFront => {
                *self.lara.pos_mut() += pitch(DEFAULT_COLLISION_RADIUS, coll.facing_angle);
                self.lara.speed = 0;
                coll.mid.floor.y = 0;
                if self.lara.fall_speed <= 0 {
                    self.lara.fall_speed = 16;
                }
            }
            AxisColl::Top => {
                if self.lara.fall_speed <= 0 {
                    self.lara.fall_speed = 1;
                }
            }
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Per-family post-processing
// ──────────────────────────────────────────────────────────────────────────
impl StateCtx<'_> {
    /// Flight along the movement angle; lands when the floor is reached.
    pub fn common_jump_handling(&mut self, coll: &mut CollisionInfo) -> StateResult {
        coll.bad_positive_distance = HEIGHT_LIMIT;
        coll.bad_negative_distance = -CLIMB_LIMIT_2_CLICK_MIN;
        coll.bad_ceiling_distance = 192;
        coll.facing_angle = self.lara.movement_angle;
        self.probe(coll, LARA_WALK_HEIGHT);
        self.check_jump_wall_smash(coll)?;
        if self.lara.fall_speed <= 0 || coll.mid.floor.y > 0 {
            return Ok(());
        }

        if self.apply_landing_damage()? {
            self.set_goal(LaraStateId::Death);
        } else {
            self.set_goal(LaraStateId::Stop);
        }
        self.lara.fall_speed = 0;
        self.place_on_floor(coll);
        self.lara.falling = false;
        Ok(())
    }

    pub fn common_slide_handling(&mut self, coll: &mut CollisionInfo) -> StateResult {
        coll.bad_positive_distance = HEIGHT_LIMIT;
        coll.bad_negative_distance = -2 * QUARTER_SECTOR_SIZE;
        coll.bad_ceiling_distance = 0;
        coll.facing_angle = self.lara.movement_angle;
        self.probe(coll, LARA_WALK_HEIGHT);

        if self.stop_if_ceiling_blocked(coll)? {
            return Ok(());
        }
        self.check_wall_collision(coll);

        if coll.mid.floor.y <= 200 {
            self.try_start_slide(coll)?;
            self.place_on_floor(coll);
            if !coll.on_steep_slant() {
                self.set_goal(LaraStateId::Stop);
            }
            return Ok(());
        }

        if self.current() == LaraStateId::SlideForward {
            self.set_animation(AnimationId::FREE_FALL_FORWARD, 492)?;
            self.set_goal(LaraStateId::JumpForward);
        } else {
            self.set_animation(AnimationId::FREE_FALL_BACK, 1473)?;
            self.set_goal(LaraStateId::FallBackward);
        }
        self.lara.fall_speed = 0;
        self.lara.falling = true;
        Ok(())
    }

    /// Keep the grip on a ledge, or let go.
    pub fn common_edge_hang_handling(&mut self, coll: &mut CollisionInfo) -> StateResult {
        coll.bad_positive_distance = HEIGHT_LIMIT;
        coll.bad_negative_distance = -HEIGHT_LIMIT;
        coll.bad_ceiling_distance = 0;
        coll.facing_angle = self.lara.movement_angle;
        self.probe(coll, LARA_WALK_HEIGHT);
        // before the nudge the front probe still sees the floor below Lara
        let floor_too_close = coll.front.floor.y < GRAB_MIN_FLOOR;

        self.lara.fall_speed = 0;
        self.lara.falling = false;
        self.lara.movement_angle = self.lara.rotation.y;
        let axis = axis_from_angle(self.lara.movement_angle, PROBE_AXIS_MARGIN).unwrap_or(Axis::PosZ);
        *self.lara.pos_mut() += axis.step() * 2;

        coll.bad_positive_distance = HEIGHT_LIMIT;
        coll.bad_negative_distance = -CLIMB_LIMIT_2_CLICK_MIN;
        coll.bad_ceiling_distance = 0;
        coll.facing_angle = self.lara.movement_angle;
        self.probe(coll, LARA_WALK_HEIGHT);

        if !self.input.action || self.lara.is_dying() {
            self.set_animation(AnimationId::TRY_HANG_VERTICAL, 448)?;
            self.set_goal(LaraStateId::JumpUp);
            self.lara.hand_status = HandStatus::None;
            let hang_distance = coll.front.floor.y - self.bounding_box()?.min.y + 2;
            *self.lara.pos_mut() += IVec3::new(coll.shift.x, hang_distance, coll.shift.z);
            self.lara.speed = 2;
            self.lara.fall_speed = 1;
            self.lara.falling = true;
            log::debug!("let go of the ledge");
            return Ok(());
        }

        if coll.too_steep_to_grab()
            || coll.mid.ceiling.y >= 0
            || coll.collision_type != AxisColl::Front
            || floor_too_close
        {
            self.lara.position.pos = coll.old_position;
            if matches!(self.current(), LaraStateId::ShimmyLeft | LaraStateId::ShimmyRight) {
                self.set_animation(AnimationId::HANG_IDLE, 1514)?;
                self.set_goal(LaraStateId::Hang);
            }
            return Ok(());
        }

        match axis {
            Axis::PosZ | Axis::NegZ => self.lara.pos_mut().z += coll.shift.z,
            Axis::PosX | Axis::NegX => self.lara.pos_mut().x += coll.shift.x,
        }

        let space_to_reach = coll.front.floor.y - self.bounding_box()?.min.y;
        if (-QUARTER_SECTOR_SIZE..=QUARTER_SECTOR_SIZE).contains(&space_to_reach) {
            self.lara.pos_mut().y += space_to_reach;
        }
        Ok(())
    }
}
