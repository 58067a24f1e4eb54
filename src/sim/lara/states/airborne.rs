//! Jumps, falls and dives through the air.

use crate::defs::constants::{
    CLIMB_LIMIT_2_CLICK_MIN, CLIMB_PROBE_HEIGHT, DEADLY_FALL_SPEED_THRESHOLD,
    FREE_FALL_SPEED_THRESHOLD, HEIGHT_LIMIT, LARA_JUMP_TURN, LARA_TURN_RATE, LARA_WALK_HEIGHT,
};
use crate::defs::{AnimationId, LaraStateId, SoundId};
use crate::sim::TickError;
use crate::sim::collision::CollisionInfo;
use crate::sim::components::AxisMovement;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::sim::lara::state::HandStatus;
use crate::units::Angle;

/// Ceiling clearance kept while flying.
const FLIGHT_CEILING: i32 = 192;
/// A swan dive ending faster than this breaks Lara's neck.
const SWANDIVE_DEADLY_SPEED: i32 = 133;

/// Fast enough to scream and flail.
fn check_free_fall(ctx: &mut StateCtx<'_>) {
    if ctx.lara.fall_speed > FREE_FALL_SPEED_THRESHOLD {
        ctx.set_goal(LaraStateId::FreeFall);
    }
}

/// Flight probe facing `facing`, with the head clearance of a jump.
fn flight_probe(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo, facing: Angle, height: i32) {
    coll.set_bad_distances(HEIGHT_LIMIT, -CLIMB_LIMIT_2_CLICK_MIN, FLIGHT_CEILING);
    coll.facing_angle = facing;
    ctx.probe(coll, height);
}

/// Touch down after a jump with the arms up, unless still rising or above
/// the floor.
fn land_upright(ctx: &mut StateCtx<'_>, coll: &CollisionInfo) -> StateResult {
    if ctx.lara.fall_speed < 0 || coll.mid.floor.y > 0 {
        return Ok(());
    }
    if ctx.apply_landing_damage()? {
        ctx.set_goal(LaraStateId::Death);
    } else {
        ctx.set_goal(LaraStateId::Stop);
    }
    ctx.lara.fall_speed = 0;
    ctx.place_on_floor(coll);
    ctx.lara.falling = false;
    Ok(())
}

/* ---- jumps ----------------------------------------------------------- */

pub struct JumpForward;

impl StateHandler for JumpForward {
    fn id(&self) -> LaraStateId {
        LaraStateId::JumpForward
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if matches!(ctx.goal(), LaraStateId::SwandiveBegin | LaraStateId::Reach) {
            ctx.set_goal(LaraStateId::JumpForward);
        }
        if !matches!(ctx.goal(), LaraStateId::Death | LaraStateId::Stop) && !ctx.lara.is_dying() {
            if ctx.input.action && ctx.lara.hand_status == HandStatus::None {
                ctx.set_goal(LaraStateId::Reach);
            }
            if ctx.input.move_slow && ctx.lara.hand_status == HandStatus::None {
                ctx.set_goal(LaraStateId::SwandiveBegin);
            }
            check_free_fall(ctx);
        }
        ctx.turn_by_input(LARA_TURN_RATE, LARA_JUMP_TURN);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let facing = ctx.lara.rotation.y;
        ctx.lara.movement_angle = facing;
        flight_probe(ctx, coll, facing, LARA_WALK_HEIGHT);
        ctx.check_jump_wall_smash(coll)?;

        if ctx.lara.fall_speed <= 0 || coll.mid.floor.y > 0 {
            return Ok(());
        }
        if ctx.apply_landing_damage()? {
            ctx.set_goal(LaraStateId::Death);
        } else if ctx.input.z_movement == AxisMovement::Forward && !ctx.input.move_slow {
            ctx.set_goal(LaraStateId::RunForward);
        } else {
            ctx.set_goal(LaraStateId::Stop);
        }
        ctx.lara.fall_speed = 0;
        ctx.lara.falling = false;
        ctx.lara.speed = 0;
        ctx.place_on_floor(coll);
        ctx.update_impl()
    }
}

pub struct JumpBack;

impl StateHandler for JumpBack {
    fn id(&self) -> LaraStateId {
        LaraStateId::JumpBack
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.set_camera_rotation(Angle::ZERO, Angle::from_degrees(135.0));
        check_free_fall(ctx);
        if ctx.goal() == LaraStateId::RunForward {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y + Angle::from_degrees(180.0);
        ctx.common_jump_handling(coll)
    }
}

/// Sideways jump; `offset` is the flight direction relative to the heading.
pub struct JumpSide {
    id: LaraStateId,
    offset: Angle,
}

impl JumpSide {
    pub const LEFT: Self = Self {
        id: LaraStateId::JumpLeft,
        offset: Angle::from_degrees(-90.0),
    };
    pub const RIGHT: Self = Self {
        id: LaraStateId::JumpRight,
        offset: Angle::from_degrees(90.0),
    };
}

impl StateHandler for JumpSide {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        check_free_fall(ctx);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y + self.offset;
        ctx.common_jump_handling(coll)
    }
}

/// Straight up, arms raised for a ledge.
pub struct JumpUp;

impl StateHandler for JumpUp {
    fn id(&self) -> LaraStateId {
        LaraStateId::JumpUp
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        check_free_fall(ctx);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let mut facing = ctx.lara.rotation.y;
        if ctx.lara.speed < 0 {
            facing += Angle::from_degrees(180.0);
        }
        flight_probe(ctx, coll, facing, CLIMB_PROBE_HEIGHT);

        if ctx.try_grab_edge(coll)? {
            return Ok(());
        }
        ctx.jump_against_wall(coll);
        land_upright(ctx, coll)
    }
}

/* ---- falls ----------------------------------------------------------- */

pub struct FreeFall;

impl StateHandler for FreeFall {
    fn id(&self) -> LaraStateId {
        LaraStateId::FreeFall
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.dampen_horizontal_speed();
        if ctx.lara.fall_speed == DEADLY_FALL_SPEED_THRESHOLD {
            ctx.play_sound(SoundId::LARA_FALL);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let facing = ctx.lara.movement_angle;
        flight_probe(ctx, coll, facing, LARA_WALK_HEIGHT);
        ctx.jump_against_wall(coll);
        if coll.mid.floor.y > 0 {
            return Ok(());
        }

        if ctx.apply_landing_damage()? {
            ctx.set_goal(LaraStateId::Death);
        } else {
            ctx.set_goal(LaraStateId::Stop);
            ctx.set_animation(AnimationId::LANDING_HARD, 358)?;
        }
        ctx.hooks.stop_sound(SoundId::LARA_FALL);
        ctx.lara.fall_speed = 0;
        ctx.place_on_floor(coll);
        ctx.lara.falling = false;
        Ok(())
    }
}

pub struct FallBackward;

impl StateHandler for FallBackward {
    fn id(&self) -> LaraStateId {
        LaraStateId::FallBackward
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        check_free_fall(ctx);
        if ctx.input.action && ctx.lara.hand_status == HandStatus::None {
            ctx.set_goal(LaraStateId::Reach);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y + Angle::from_degrees(180.0);
        ctx.common_jump_handling(coll)
    }
}

/// Arms stretched out for a ledge while flying forward.
pub struct Reach;

impl StateHandler for Reach {
    fn id(&self) -> LaraStateId {
        LaraStateId::Reach
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.set_camera_rotation(Angle::ZERO, Angle::from_degrees(85.0));
        check_free_fall(ctx);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        coll.set_bad_distances(HEIGHT_LIMIT, 0, FLIGHT_CEILING);
        coll.facing_angle = ctx.lara.rotation.y;
        ctx.probe(coll, LARA_WALK_HEIGHT);

        if ctx.try_reach(coll)? {
            return Ok(());
        }
        ctx.jump_against_wall(coll);
        land_upright(ctx, coll)
    }
}

/* ---- swan dive ------------------------------------------------------- */

/// Post-processing of both swan dive halves. Returns `true` on touch down.
fn swandive_flight(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> Result<bool, TickError> {
    let facing = ctx.lara.rotation.y;
    ctx.lara.movement_angle = facing;
    flight_probe(ctx, coll, facing, LARA_WALK_HEIGHT);
    ctx.check_jump_wall_smash(coll)?;
    if coll.mid.floor.y > 0 || ctx.lara.fall_speed <= 0 {
        return Ok(false);
    }
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = false;
    ctx.place_on_floor(coll);
    Ok(true)
}

pub struct SwandiveBegin;

impl StateHandler for SwandiveBegin {
    fn id(&self) -> LaraStateId {
        LaraStateId::SwandiveBegin
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.fall_speed > FREE_FALL_SPEED_THRESHOLD
            && ctx.goal() != LaraStateId::UnderwaterDiving
        {
            ctx.set_goal(LaraStateId::SwandiveEnd);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        if swandive_flight(ctx, coll)? {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }
}

pub struct SwandiveEnd;

impl StateHandler for SwandiveEnd {
    fn id(&self) -> LaraStateId {
        LaraStateId::SwandiveEnd
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.dampen_horizontal_speed();
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let impact = ctx.lara.fall_speed;
        if !swandive_flight(ctx, coll)? {
            return Ok(());
        }
        if impact > SWANDIVE_DEADLY_SPEED {
            log::debug!("swan dive hit the floor at {impact}");
            ctx.lara.health = -1;
            ctx.set_goal(LaraStateId::Death);
        } else {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }
}
