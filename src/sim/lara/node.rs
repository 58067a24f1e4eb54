//! One tic of Lara: water status, vitals, then the state machine for the
//! medium she is in.

use glam::IVec3;

use super::dispatch::handler_for;
use super::handler::{StateCtx, StateResult};
use super::state::{HandStatus, LaraState, UnderwaterStatus};
use crate::defs::constants::{
    AIR_REFILL_PER_TIC, DEFAULT_COLLISION_RADIUS, DIVE_PITCH_LIMIT, DIVE_ROLL_LIMIT,
    DROWN_DAMAGE_PER_TIC, LARA_AIR, LARA_LEAN_UNDO, LARA_TURN_UNDO, LARA_WALK_HEIGHT,
    ON_WATER_RADIUS, SURFACE_REACH, UNDERWATER_RADIUS,
};
use crate::defs::{AnimationId, CollisionPolicy, LaraStateId, SoundId};
use crate::sim::anim::Animator;
use crate::sim::collision::CollisionInfo;
use crate::sim::components::{InputState, ItemType};
use crate::sim::hooks::Hooks;
use crate::sim::tic::{SimConfig, TickError};
use crate::units::{Angle, pitch, pitch_3d};
use crate::world::{HeightInfo, Level, RoomId};

/// Roll and pitch recovery per tic in water.
const WATER_ROLL_UNDO: Angle = Angle::from_degrees(2.0);
/// How far Lara sinks on entering the water.
const DIVE_IN_DEPTH: i32 = 100;
/// Room probe offsets per medium, relative to Lara's origin.
const LAND_ROOM_PROBE: i32 = -LARA_WALK_HEIGHT / 2;
const SURFACE_ROOM_PROBE: i32 = 100;
const SURFACE_CAMERA_PITCH: Angle = Angle::from_degrees(-22.0);
const FORCE_STATE_FRAMES: usize = 64;

/// Lara as an entity of the tic runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaraNode {
    pub state: LaraState,
}

impl LaraNode {
    pub fn new(pos: IVec3, room: RoomId, heading: Angle, config: &SimConfig) -> Self {
        let mut state = LaraState::new(pos, room, heading);
        state.health = config.initial_health;
        Self { state }
    }

    /// Bend down for `quantity` of `item`. The item is handed over on the
    /// grab frame of the pickup animation. Returns `false` if Lara is busy.
    pub fn start_pickup(
        &mut self,
        level: &Level,
        anims: &dyn Animator,
        hooks: &mut dyn Hooks,
        item: ItemType,
        quantity: u32,
    ) -> Result<bool, TickError> {
        let lara = &self.state;
        if lara.current_state != LaraStateId::Stop
            || lara.hand_status != HandStatus::None
            || lara.falling
            || lara.is_in_water()
            || lara.is_dying()
        {
            return Ok(false);
        }
        let mut ctx = StateCtx {
            lara: &mut self.state,
            level,
            anims,
            hooks,
            input: InputState::default(),
        };
        if !force_state(&mut ctx, LaraStateId::PickUp)? {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(false);
        }
        log::debug!("Lara bends down for {quantity} x {item:?}");
        ctx.lara.pending_pickup = Some((item, quantity));
        ctx.set_goal(LaraStateId::Stop);
        ctx.lara.hand_status = HandStatus::Grabbing;
        Ok(true)
    }

    /// Run one tic.
    pub fn update(
        &mut self,
        level: &Level,
        anims: &dyn Animator,
        hooks: &mut dyn Hooks,
        input: InputState,
        config: &SimConfig,
    ) -> Result<(), TickError> {
        let mut ctx = StateCtx {
            lara: &mut self.state,
            level,
            anims,
            hooks,
            input,
        };
        update_water_status(&mut ctx)?;
        if config.simulate_air {
            update_air(ctx.lara);
        }

        match ctx.lara.underwater_status {
            UnderwaterStatus::OnLand => on_land(&mut ctx)?,
            UnderwaterStatus::Diving => diving(&mut ctx)?,
            UnderwaterStatus::Swimming => swimming(&mut ctx)?,
        }

        log::trace!(
            "{} -> {} {:?}@{} at {} room {}",
            ctx.lara.current_state,
            ctx.lara.goal_state,
            ctx.lara.anim.id,
            ctx.lara.anim.frame,
            ctx.lara.pos(),
            ctx.lara.position.room
        );
        Ok(())
    }
}

/// Play frames towards `target` until Lara is in it. Interactions use this
/// to take over before the next input pass can change the goal.
fn force_state(ctx: &mut StateCtx<'_>, target: LaraStateId) -> Result<bool, TickError> {
    ctx.set_goal(target);
    for _ in 0..FORCE_STATE_FRAMES {
        if ctx.current() == target {
            return Ok(true);
        }
        ctx.update_impl()?;
    }
    if ctx.current() != target {
        log::warn!("{} never reached {target}", ctx.current());
    }
    Ok(ctx.current() == target)
}

/* ---- medium changes -------------------------------------------------- */

fn room_is_water(ctx: &StateCtx<'_>) -> bool {
    ctx.level
        .room(ctx.lara.position.room)
        .is_ok_and(|r| r.is_water())
}

fn set_water_status(ctx: &mut StateCtx<'_>, status: UnderwaterStatus) {
    log::debug!("water status {:?} -> {status:?}", ctx.lara.underwater_status);
    ctx.lara.underwater_status = status;
}

/// Drop out of the water into a free fall.
fn fall_out_of_water(ctx: &mut StateCtx<'_>) -> StateResult {
    set_water_status(ctx, UnderwaterStatus::OnLand);
    ctx.set_animation(AnimationId::FREE_FALL_FORWARD, 492)?;
    ctx.set_goal(LaraStateId::JumpForward);
    ctx.lara.speed = ctx.lara.fall_speed / 4;
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = true;
    ctx.lara.rotation.x = Angle::ZERO;
    ctx.lara.rotation.z = Angle::ZERO;
    Ok(())
}

fn update_water_status(ctx: &mut StateCtx<'_>) -> StateResult {
    let in_water_room = room_is_water(ctx);
    match ctx.lara.underwater_status {
        UnderwaterStatus::OnLand if in_water_room => {
            set_water_status(ctx, UnderwaterStatus::Diving);
            ctx.lara.air = LARA_AIR;
            ctx.lara.falling = false;
            ctx.lara.pos_mut().y += DIVE_IN_DEPTH;
            update_room(ctx, 0);
            ctx.hooks.stop_sound(SoundId::LARA_FALL);
            ctx.play_sound(SoundId::SPLASH);

            let dive_pitch = match ctx.current() {
                LaraStateId::SwandiveBegin => Some(Angle::from_degrees(-45.0)),
                LaraStateId::SwandiveEnd => Some(Angle::from_degrees(-85.0)),
                _ => None,
            };
            if let Some(dive_pitch) = dive_pitch {
                ctx.lara.rotation.x = dive_pitch;
                ctx.set_goal(LaraStateId::UnderwaterDiving);
                ctx.update_impl()?;
                ctx.lara.fall_speed *= 2;
            } else {
                ctx.lara.rotation.x = Angle::from_degrees(-45.0);
                ctx.set_animation(AnimationId::FREE_FALL_TO_UNDERWATER, 1895)?;
                ctx.set_goal(LaraStateId::UnderwaterForward);
                ctx.lara.fall_speed = ctx.lara.fall_speed * 3 / 2;
            }
        }
        UnderwaterStatus::Diving if !in_water_room => {
            let depth = ctx
                .level
                .water_surface_height(ctx.lara.pos(), ctx.lara.position.room)
                .map(|surface| ctx.lara.pos().y - surface);
            match depth {
                Some(depth) if depth.abs() < SURFACE_REACH => {
                    set_water_status(ctx, UnderwaterStatus::Swimming);
                    ctx.set_animation(AnimationId::UNDERWATER_TO_ONWATER, 1937)?;
                    ctx.set_goal(LaraStateId::OnWaterStop);
                    ctx.lara.fall_speed = 0;
                    ctx.lara.pos_mut().y += 1 - depth;
                    ctx.lara.rotation.x = Angle::ZERO;
                    ctx.lara.rotation.z = Angle::ZERO;
                    ctx.lara.swim_to_dive_count = 0;
                    update_room(ctx, LAND_ROOM_PROBE);
                    ctx.play_sound(SoundId::LARA_BREATHE);
                }
                _ => fall_out_of_water(ctx)?,
            }
        }
        UnderwaterStatus::Swimming if !in_water_room => fall_out_of_water(ctx)?,
        _ => {}
    }
    Ok(())
}

fn update_air(lara: &mut LaraState) {
    match lara.underwater_status {
        UnderwaterStatus::Diving => {
            if lara.health < 0 {
                return;
            }
            lara.air -= 1;
            if lara.air < 0 {
                lara.air = -1;
                lara.health -= DROWN_DAMAGE_PER_TIC;
            }
        }
        UnderwaterStatus::OnLand | UnderwaterStatus::Swimming => {
            if lara.health >= 0 {
                lara.air = (lara.air + AIR_REFILL_PER_TIC).min(LARA_AIR);
            }
        }
    }
}

/// Re-resolve Lara's room and floor from a point `offset` below her origin.
fn update_room(ctx: &mut StateCtx<'_>, offset: i32) {
    let probe = ctx.lara.pos() + IVec3::new(0, offset, 0);
    let mut room = ctx.lara.position.room;
    let sector = ctx.level.find_real_floor_sector(probe, &mut room);
    ctx.lara.floor = HeightInfo::from_floor(ctx.level, sector, probe).y;
    if room != ctx.lara.position.room {
        log::debug!("Lara enters room {room}");
        ctx.lara.position.room = room;
    }
}

/* ---- per medium ------------------------------------------------------ */

fn fresh_collision(ctx: &StateCtx<'_>, radius: i32, policy: CollisionPolicy) -> CollisionInfo {
    CollisionInfo {
        old_position: ctx.lara.pos(),
        collision_radius: radius,
        policy,
        ..CollisionInfo::default()
    }
}

fn on_land(ctx: &mut StateCtx<'_>) -> StateResult {
    let mut coll = fresh_collision(ctx, DEFAULT_COLLISION_RADIUS, CollisionPolicy::SPAZ_PUSH);
    let was_falling = ctx.lara.falling;

    handler_for(ctx.current()).handle_input(ctx, &mut coll)?;

    ctx.lara.rotation.z = ctx.lara.rotation.z.eased_to_zero(LARA_LEAN_UNDO);
    ctx.lara.y_rotation_speed = ctx.lara.y_rotation_speed.eased_to_zero(LARA_TURN_UNDO);
    ctx.lara.rotation.y += ctx.lara.y_rotation_speed;

    ctx.update_impl()?;
    handler_for(ctx.current()).post_process(ctx, &mut coll)?;
    update_room(ctx, LAND_ROOM_PROBE);

    // a landing already ran the floor under Lara
    if was_falling && !ctx.lara.falling {
        return Ok(());
    }
    let floor = ctx.floor_below();
    ctx.handle_command_sequence(floor.last_command_sequence_or_death, false)
}

fn diving(ctx: &mut StateCtx<'_>) -> StateResult {
    let mut coll = fresh_collision(ctx, UNDERWATER_RADIUS, CollisionPolicy::empty());

    handler_for(ctx.current()).handle_input(ctx, &mut coll)?;

    let rot = &mut ctx.lara.rotation;
    rot.z = rot.z.eased_to_zero(WATER_ROLL_UNDO);
    rot.x = rot.x.clamp(-DIVE_PITCH_LIMIT, DIVE_PITCH_LIMIT);
    rot.z = rot.z.clamp(-DIVE_ROLL_LIMIT, DIVE_ROLL_LIMIT);

    ctx.update_impl()?;
    let (yaw, tilt) = (ctx.lara.rotation.y, ctx.lara.rotation.x);
    let motion = pitch_3d(ctx.lara.fall_speed / 4, yaw, tilt);
    *ctx.lara.pos_mut() += motion;

    handler_for(ctx.current()).post_process(ctx, &mut coll)?;
    update_room(ctx, 0);
    let floor = ctx.floor_below();
    ctx.handle_command_sequence(floor.last_command_sequence_or_death, false)
}

fn swimming(ctx: &mut StateCtx<'_>) -> StateResult {
    let mut coll = fresh_collision(ctx, ON_WATER_RADIUS, CollisionPolicy::empty());
    ctx.set_camera_rotation(SURFACE_CAMERA_PITCH, Angle::ZERO);

    handler_for(ctx.current()).handle_input(ctx, &mut coll)?;

    ctx.lara.rotation.z = ctx.lara.rotation.z.eased_to_zero(WATER_ROLL_UNDO);

    ctx.update_impl()?;
    if ctx.current() != LaraStateId::WaterDeath {
        let heading = ctx.lara.movement_angle;
        let motion = pitch(ctx.lara.fall_speed / 4, heading);
        *ctx.lara.pos_mut() += motion;
    }

    handler_for(ctx.current()).post_process(ctx, &mut coll)?;
    update_room(ctx, SURFACE_ROOM_PROBE);
    let floor = ctx.floor_below();
    ctx.handle_command_sequence(floor.last_command_sequence_or_death, false)
}
