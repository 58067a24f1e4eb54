//! One handler per locomotion state, grouped by family.

pub mod airborne;
pub mod death;
pub mod ground;
pub mod hang;
pub mod interaction;
pub mod on_water;
pub mod slide;
pub mod standing;
pub mod underwater;

use super::handler::{StateCtx, StateResult};
use crate::defs::constants::{CLIMB_LIMIT_2_CLICK_MIN, LARA_WALK_HEIGHT};
use crate::defs::{AnimationId, CollisionPolicy, LaraStateId};
use crate::sim::collision::CollisionInfo;

/// Drop off a ledge face first.
pub(crate) fn start_fall_forward(ctx: &mut StateCtx<'_>) -> StateResult {
    ctx.set_animation(AnimationId::FREE_FALL_FORWARD, 492)?;
    ctx.set_goal(LaraStateId::JumpForward);
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = true;
    Ok(())
}

/// Drop off a ledge back first.
pub(crate) fn start_fall_backward(ctx: &mut StateCtx<'_>) -> StateResult {
    ctx.set_animation(AnimationId::FREE_FALL_BACK, 1473)?;
    ctx.set_goal(LaraStateId::FallBackward);
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = true;
    Ok(())
}

/// Stop dead where Lara stands.
pub(crate) fn stand_still(ctx: &mut StateCtx<'_>) -> StateResult {
    ctx.set_animation(AnimationId::STAY_SOLID, 185)
}

/// Probe for states driven by their animation alone. Nothing is resolved.
pub(crate) fn probe_only(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
    coll.set_bad_distances(CLIMB_LIMIT_2_CLICK_MIN, -CLIMB_LIMIT_2_CLICK_MIN, 0);
    coll.facing_angle = ctx.lara.rotation.y;
    ctx.lara.movement_angle = coll.facing_angle;
    coll.policy |= CollisionPolicy::SLOPE_BLOCKING;
    ctx.probe(coll, LARA_WALK_HEIGHT);
    Ok(())
}
