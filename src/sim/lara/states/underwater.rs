//! Swimming below the surface.

use glam::IVec3;

use crate::defs::constants::{
    HEIGHT_LIMIT, SWIM_ACCELERATION, UNDERWATER_HEIGHT, UNDERWATER_MAX_SPEED,
    UNDERWATER_MIN_PROBE_HEIGHT, UNDERWATER_RADIUS, WALL_SLIDE_TURN, WATER_FRICTION,
};
use crate::defs::LaraStateId;
use crate::sim::collision::{AxisColl, CollisionInfo};
use crate::sim::components::AxisMovement;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::sim::lara::state::HandStatus;
use crate::units::Angle;
use crate::world::RoomPos;

const PITCH_RATE: Angle = Angle::from_degrees(2.0);
const YAW_RATE: Angle = Angle::from_degrees(6.0);
const ROLL_RATE: Angle = Angle::from_degrees(3.0);
/// Pitch beyond which a wall ahead deflects Lara instead of stopping her.
const DEFLECT_PITCH: Angle = Angle::from_degrees(35.0);
/// Glide speed below which Lara stops swimming.
const GLIDE_STOP_SPEED: i32 = UNDERWATER_MAX_SPEED * 2 / 3;
const FLOAT_UP_RATE: i32 = 5;
const FLOAT_DEPTH: i32 = 100;
const WATER_DEATH_FRICTION: i32 = 8;

/// Steer with the stick: pitch on forward/back, yaw and roll on left/right.
fn handle_dive_rotation_input(ctx: &mut StateCtx<'_>) {
    let rot = &mut ctx.lara.rotation;
    match ctx.input.z_movement {
        AxisMovement::Forward => rot.x -= PITCH_RATE,
        AxisMovement::Backward => rot.x += PITCH_RATE,
        _ => {}
    }
    match ctx.input.x_movement {
        AxisMovement::Left => {
            rot.y -= YAW_RATE;
            rot.z -= ROLL_RATE;
        }
        AxisMovement::Right => {
            rot.y += YAW_RATE;
            rot.z += ROLL_RATE;
        }
        _ => {}
    }
}

/// Probe around a swimming Lara and deflect her off walls, ceilings and the
/// bottom.
pub(crate) fn swim_collision(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) {
    let pitch = ctx.lara.rotation.x;
    // upside down
    ctx.lara.movement_angle = if pitch.units().abs() > Angle::from_degrees(90.0).units() {
        ctx.lara.rotation.y + Angle::from_degrees(180.0)
    } else {
        ctx.lara.rotation.y
    };
    coll.facing_angle = ctx.lara.movement_angle;

    let height = ((UNDERWATER_HEIGHT as f64 * pitch.sin()).abs() as i32)
        .max(UNDERWATER_MIN_PROBE_HEIGHT);
    coll.collision_radius = UNDERWATER_RADIUS;
    coll.set_bad_distances(HEIGHT_LIMIT, -height, UNDERWATER_HEIGHT);
    let centre = RoomPos::new(
        ctx.lara.pos() + IVec3::new(0, height / 2, 0),
        ctx.lara.position.room,
    );
    coll.init_height_info(ctx.level, centre, height);
    ctx.apply_shift(coll);

    let rot = &mut ctx.lara.rotation;
    match coll.collision_type {
        AxisColl::Front => {
            if rot.x > DEFLECT_PITCH {
                rot.x += PITCH_RATE;
            } else if rot.x < -DEFLECT_PITCH {
                rot.x -= PITCH_RATE;
            } else {
                ctx.lara.fall_speed = 0;
            }
        }
        AxisColl::Top => {
            if rot.x >= Angle::from_degrees(-45.0) {
                rot.x -= PITCH_RATE;
            }
        }
        AxisColl::TopFront => ctx.lara.fall_speed = 0,
        AxisColl::Left => rot.y += WALL_SLIDE_TURN,
        AxisColl::Right => rot.y -= WALL_SLIDE_TURN,
        AxisColl::TopBottom => {
            ctx.lara.position.pos = coll.old_position;
            ctx.lara.fall_speed = 0;
            return;
        }
        AxisColl::None => {}
    }

    if coll.mid.floor.y < 0 {
        ctx.lara.pos_mut().y += coll.mid.floor.y;
        ctx.lara.rotation.x += PITCH_RATE;
    }
}

fn glide_friction(ctx: &mut StateCtx<'_>) {
    ctx.lara.fall_speed = (ctx.lara.fall_speed - WATER_FRICTION).max(0);
}

pub struct UnderwaterStop;

impl StateHandler for UnderwaterStop {
    fn id(&self) -> LaraStateId {
        LaraStateId::UnderwaterStop
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::WaterDeath);
            return Ok(());
        }
        handle_dive_rotation_input(ctx);
        if ctx.input.jump {
            ctx.set_goal(LaraStateId::UnderwaterForward);
        }
        glide_friction(ctx);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        swim_collision(ctx, coll);
        Ok(())
    }
}

pub struct UnderwaterForward;

impl StateHandler for UnderwaterForward {
    fn id(&self) -> LaraStateId {
        LaraStateId::UnderwaterForward
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::WaterDeath);
            return Ok(());
        }
        handle_dive_rotation_input(ctx);
        ctx.lara.fall_speed = (ctx.lara.fall_speed + SWIM_ACCELERATION).min(UNDERWATER_MAX_SPEED);
        if !ctx.input.jump {
            ctx.set_goal(LaraStateId::UnderwaterInertia);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        swim_collision(ctx, coll);
        Ok(())
    }
}

/// Gliding on after a stroke.
pub struct UnderwaterInertia;

impl StateHandler for UnderwaterInertia {
    fn id(&self) -> LaraStateId {
        LaraStateId::UnderwaterInertia
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::WaterDeath);
            return Ok(());
        }
        handle_dive_rotation_input(ctx);
        if ctx.input.jump {
            ctx.set_goal(LaraStateId::UnderwaterForward);
        }
        glide_friction(ctx);
        if ctx.lara.fall_speed <= GLIDE_STOP_SPEED {
            ctx.set_goal(LaraStateId::UnderwaterStop);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        swim_collision(ctx, coll);
        Ok(())
    }
}

/// Entering the water head first.
pub struct UnderwaterDiving;

impl StateHandler for UnderwaterDiving {
    fn id(&self) -> LaraStateId {
        LaraStateId::UnderwaterDiving
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::WaterDeath);
            return Ok(());
        }
        if ctx.input.z_movement == AxisMovement::Forward {
            ctx.lara.rotation.x -= Angle::from_degrees(1.0);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        swim_collision(ctx, coll);
        Ok(())
    }
}

/// Drowned or killed in the water; the body drifts up to the surface.
pub struct WaterDeath;

impl StateHandler for WaterDeath {
    fn id(&self) -> LaraStateId {
        LaraStateId::WaterDeath
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.set_goal(LaraStateId::WaterDeath);
        ctx.lara.fall_speed = (ctx.lara.fall_speed - WATER_DEATH_FRICTION).max(0);
        ctx.lara.rotation.x = ctx.lara.rotation.x.eased_to_zero(PITCH_RATE);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.health = -1;
        ctx.lara.air = -1;
        ctx.lara.hand_status = HandStatus::Grabbing;
        let surface = ctx
            .level
            .water_surface_height(ctx.lara.pos(), ctx.lara.position.room);
        if surface.is_some_and(|wh| wh < ctx.lara.pos().y - FLOAT_DEPTH) {
            ctx.lara.pos_mut().y -= FLOAT_UP_RATE;
        }
        swim_collision(ctx, coll);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::AnimationId;
    use crate::sim::components::InputState;
    use crate::sim::lara::state::UnderwaterStatus;
    use crate::sim::testing::Harness;
    use crate::world::LevelBuilder;

    /// Deep pool, surface at 0 and bottom at 4096.
    fn deep(pos: IVec3) -> Harness {
        let level = LevelBuilder::new().room(0, 0, 6, 6, 4096, 0).water().build();
        let mut h = Harness::new(level, pos);
        h.set_anim(AnimationId::UNDERWATER_SWIM_FORWARD, 1295);
        h.lara.underwater_status = UnderwaterStatus::Diving;
        h
    }

    fn post(h: &mut Harness, handler: &dyn StateHandler) {
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        handler.post_process(&mut h.ctx(InputState::default()), &mut coll).unwrap();
    }

    #[test]
    fn stroke_accelerates_and_glides_out() {
        let mut h = deep(IVec3::new(2560, 2000, 2560));
        let mut coll = CollisionInfo::default();
        let stroke = InputState::default().with_jump();
        for _ in 0..30 {
            UnderwaterForward.handle_input(&mut h.ctx(stroke), &mut coll).unwrap();
        }
        assert_eq!(h.lara.fall_speed, UNDERWATER_MAX_SPEED);

        UnderwaterForward.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::UnderwaterInertia);

        let mut ticks = 0;
        while h.lara.goal_state != LaraStateId::UnderwaterStop {
            UnderwaterInertia.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
            ticks += 1;
        }
        assert_eq!(h.lara.fall_speed, 128);
        assert_eq!(ticks, 12);
    }

    #[test]
    fn stick_steers_pitch_yaw_and_roll() {
        let mut h = deep(IVec3::new(2560, 2000, 2560));
        let mut coll = CollisionInfo::default();
        let input = InputState {
            x_movement: AxisMovement::Left,
            ..InputState::default().forward()
        };
        UnderwaterStop.handle_input(&mut h.ctx(input), &mut coll).unwrap();
        assert_eq!(h.lara.rotation.x, -PITCH_RATE);
        assert_eq!(h.lara.rotation.y, -YAW_RATE);
        assert_eq!(h.lara.rotation.z, -ROLL_RATE);
    }

    #[test]
    fn swimming_upside_down_reverses_the_heading() {
        let mut h = deep(IVec3::new(2560, 2000, 2560));
        h.lara.rotation.x = Angle::from_degrees(120.0);
        post(&mut h, &UnderwaterForward);
        assert_eq!(h.lara.movement_angle, Angle::from_degrees(180.0));
    }

    #[test]
    fn bottom_pushes_lara_up_and_tilts_her() {
        let mut h = deep(IVec3::new(2560, 4096 + 50, 2560));
        post(&mut h, &UnderwaterForward);
        assert!(h.lara.pos().y < 4096 + 50);
        assert_eq!(h.lara.rotation.x, PITCH_RATE);
    }

    #[test]
    fn dead_body_floats_up() {
        let mut h = deep(IVec3::new(2560, 2000, 2560));
        h.set_anim(AnimationId::UNDERWATER_DEATH, 2370);
        h.lara.rotation.x = Angle::from_degrees(3.0);
        let mut coll = CollisionInfo::default();
        WaterDeath.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert_eq!(h.lara.rotation.x, Angle::from_degrees(1.0));

        post(&mut h, &WaterDeath);
        assert_eq!(h.lara.pos().y, 2000 - FLOAT_UP_RATE);
        assert_eq!(h.lara.health, -1);
        assert_eq!(h.lara.air, -1);
    }
}
