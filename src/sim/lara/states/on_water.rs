//! Treading water and swimming on the surface.

use glam::IVec3;

use crate::defs::constants::{
    CLIMB_LIMIT_2_CLICK_MIN, CLIMB_OUT_MAX, CLIMB_OUT_MIN, GRAB_ALIGN_MARGIN, HEIGHT_LIMIT,
    ON_WATER_HEIGHT, ON_WATER_MAX_SPEED, ON_WATER_RADIUS, QUARTER_SECTOR_SIZE, SECTOR_SIZE,
    SWIM_ACCELERATION, SWIM_TO_DIVE_TICS, WALL_SLIDE_TURN,
};
use crate::defs::{AnimationId, LaraStateId};
use crate::sim::TickError;
use crate::sim::collision::{AxisColl, CollisionInfo};
use crate::sim::components::{AxisMovement, InputState};
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::sim::lara::state::{HandStatus, Rotation, UnderwaterStatus};
use crate::units::{Angle, Axis, align_rotation, axis_from_angle};
use crate::world::{RoomPos, SlantClass};

/// How far below the surface Lara may drift before she dives.
const SINK_LIMIT: i32 = 100;
/// Fall speed Lara dives with.
const DIVE_SPEED: i32 = 80;
const ON_WATER_TURN: Angle = Angle::from_degrees(4.0);
const ON_WATER_SLOW_TURN: Angle = Angle::from_degrees(2.0);
const TREAD_FRICTION: i32 = 4;

/// Head first below the surface.
pub(crate) fn start_surface_dive(ctx: &mut StateCtx<'_>) -> StateResult {
    ctx.set_animation(AnimationId::ONWATER_DIVE, 1951)?;
    ctx.set_goal(LaraStateId::UnderwaterForward);
    ctx.lara.rotation.x = Angle::from_degrees(-45.0);
    ctx.lara.fall_speed = DIVE_SPEED;
    ctx.lara.underwater_status = UnderwaterStatus::Diving;
    log::debug!("diving from the surface");
    Ok(())
}

/// Pull out onto a ledge at the pool edge.
fn try_climb_out_of_water(
    ctx: &mut StateCtx<'_>,
    coll: &CollisionInfo,
) -> Result<bool, TickError> {
    if coll.collision_type != AxisColl::Front
        || !ctx.input.action
        || ctx.lara.hand_status != HandStatus::None
    {
        return Ok(false);
    }

    let hdif = coll.front.floor.y + ON_WATER_HEIGHT;
    if hdif <= CLIMB_OUT_MIN || hdif > CLIMB_OUT_MAX {
        return Ok(false);
    }
    if coll.front.ceiling.y > 0 || coll.mid.ceiling.y > -CLIMB_LIMIT_2_CLICK_MIN {
        return Ok(false);
    }
    let yaw = ctx.lara.rotation.y;
    let (Some(aligned), Some(axis)) = (
        align_rotation(yaw, GRAB_ALIGN_MARGIN),
        axis_from_angle(yaw, GRAB_ALIGN_MARGIN),
    ) else {
        return Ok(false);
    };

    let pos = ctx.lara.pos_mut();
    pos.y += hdif - 5;
    // onto the ledge, just past the sector edge
    let edge = |v: i32| v & !(SECTOR_SIZE - 1);
    match axis {
        Axis::PosZ => pos.z = edge(pos.z) + SECTOR_SIZE + ON_WATER_RADIUS,
        Axis::PosX => pos.x = edge(pos.x) + SECTOR_SIZE + ON_WATER_RADIUS,
        Axis::NegZ => pos.z = edge(pos.z) - ON_WATER_RADIUS,
        Axis::NegX => pos.x = edge(pos.x) - ON_WATER_RADIUS,
    }

    ctx.set_animation(AnimationId::CLIMB_OUT_OF_WATER, 1849)?;
    ctx.set_goal(LaraStateId::Stop);
    ctx.lara.rotation = Rotation {
        y: aligned,
        ..Rotation::default()
    };
    ctx.lara.speed = 0;
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = false;
    ctx.lara.hand_status = HandStatus::Grabbing;
    ctx.lara.underwater_status = UnderwaterStatus::OnLand;
    log::debug!("climbing out of the water onto a ledge {} up", -hdif);
    Ok(true)
}

/// Probe, wall response, sinking and climbing out, for every surface state.
pub(crate) fn common_on_water_handling(
    ctx: &mut StateCtx<'_>,
    coll: &mut CollisionInfo,
) -> StateResult {
    coll.set_bad_distances(HEIGHT_LIMIT, -QUARTER_SECTOR_SIZE / 2, ON_WATER_RADIUS);
    coll.collision_radius = ON_WATER_RADIUS;
    coll.facing_angle = ctx.lara.movement_angle;
    // the probe hangs below the surface so the body is underwater
    let below = RoomPos::new(
        ctx.lara.pos() + IVec3::new(0, ON_WATER_HEIGHT, 0),
        ctx.lara.position.room,
    );
    coll.init_height_info(ctx.level, below, ON_WATER_HEIGHT);
    ctx.apply_shift(coll);

    let steep_under = coll.mid.floor.y < 0 && coll.mid.floor.slant_class == SlantClass::Steep;
    match coll.collision_type {
        AxisColl::Front | AxisColl::Top | AxisColl::TopBottom | AxisColl::TopFront => {
            ctx.lara.fall_speed = 0;
            ctx.lara.position.pos = coll.old_position;
        }
        _ if steep_under => {
            ctx.lara.fall_speed = 0;
            ctx.lara.position.pos = coll.old_position;
        }
        AxisColl::Left => ctx.lara.rotation.y += WALL_SLIDE_TURN,
        AxisColl::Right => ctx.lara.rotation.y -= WALL_SLIDE_TURN,
        AxisColl::None => {}
    }

    let surface = ctx
        .level
        .water_surface_height(ctx.lara.pos(), ctx.lara.position.room);
    if surface.is_some_and(|wh| wh - ctx.lara.pos().y <= -SINK_LIMIT) {
        return start_surface_dive(ctx);
    }
    try_climb_out_of_water(ctx, coll)?;
    Ok(())
}

/* ---- treading water -------------------------------------------------- */

pub struct OnWaterStop;

impl StateHandler for OnWaterStop {
    fn id(&self) -> LaraStateId {
        LaraStateId::OnWaterStop
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::WaterDeath);
            return Ok(());
        }
        ctx.lara.fall_speed = (ctx.lara.fall_speed - TREAD_FRICTION).max(0);

        match ctx.input.x_movement {
            AxisMovement::Left => ctx.lara.rotation.y -= ON_WATER_TURN,
            AxisMovement::Right => ctx.lara.rotation.y += ON_WATER_TURN,
            _ => {}
        }
        match ctx.input.z_movement {
            AxisMovement::Forward => ctx.set_goal(LaraStateId::OnWaterForward),
            AxisMovement::Backward => ctx.set_goal(LaraStateId::OnWaterBackward),
            _ => {}
        }
        match ctx.input.step_movement {
            AxisMovement::Left => ctx.set_goal(LaraStateId::OnWaterLeft),
            AxisMovement::Right => ctx.set_goal(LaraStateId::OnWaterRight),
            _ => {}
        }

        if !ctx.input.jump {
            ctx.lara.swim_to_dive_count = 0;
            return Ok(());
        }
        ctx.lara.swim_to_dive_count += 1;
        if ctx.lara.swim_to_dive_count == SWIM_TO_DIVE_TICS {
            start_surface_dive(ctx)?;
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y;
        common_on_water_handling(ctx, coll)
    }
}

/* ---- swimming -------------------------------------------------------- */

/// Surface swimming in one direction, for as long as `keeps` holds.
pub struct SurfaceSwim {
    id: LaraStateId,
    keeps: fn(&InputState) -> bool,
    turn: Angle,
    offset: Angle,
}

impl SurfaceSwim {
    pub const FORWARD: Self = Self {
        id: LaraStateId::OnWaterForward,
        keeps: |input| input.z_movement == AxisMovement::Forward && !input.jump,
        turn: ON_WATER_TURN,
        offset: Angle::ZERO,
    };
    pub const BACKWARD: Self = Self {
        id: LaraStateId::OnWaterBackward,
        keeps: |input| input.z_movement == AxisMovement::Backward,
        turn: ON_WATER_SLOW_TURN,
        offset: Angle::from_degrees(180.0),
    };
    pub const LEFT: Self = Self {
        id: LaraStateId::OnWaterLeft,
        keeps: |input| input.step_movement == AxisMovement::Left,
        turn: ON_WATER_SLOW_TURN,
        offset: Angle::from_degrees(-90.0),
    };
    pub const RIGHT: Self = Self {
        id: LaraStateId::OnWaterRight,
        keeps: |input| input.step_movement == AxisMovement::Right,
        turn: ON_WATER_SLOW_TURN,
        offset: Angle::from_degrees(90.0),
    };
}

impl StateHandler for SurfaceSwim {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::WaterDeath);
            return Ok(());
        }
        ctx.lara.swim_to_dive_count = 0;
        match ctx.input.x_movement {
            AxisMovement::Left => ctx.lara.rotation.y -= self.turn,
            AxisMovement::Right => ctx.lara.rotation.y += self.turn,
            _ => {}
        }
        if !(self.keeps)(&ctx.input) {
            ctx.set_goal(LaraStateId::OnWaterStop);
        }
        ctx.lara.fall_speed = (ctx.lara.fall_speed + SWIM_ACCELERATION).min(ON_WATER_MAX_SPEED);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y + self.offset;
        common_on_water_handling(ctx, coll)
    }
}

/// Hauling out of the pool; the animation does the work.
pub struct OnWaterExit;

impl StateHandler for OnWaterExit {
    fn id(&self) -> LaraStateId {
        LaraStateId::OnWaterExit
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        super::probe_only(ctx, coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::Harness;
    use crate::world::LevelBuilder;

    /// Water room 0 under air room 1, surface at 0. Row `dz = 3` is a ledge
    /// 200 above the surface.
    fn pool(pos: IVec3) -> Harness {
        let mut level = LevelBuilder::new()
            .room(0, 0, 6, 6, 2048, 0)
            .water()
            .room(0, 0, 6, 6, 0, -2048);
        for dx in 1..5 {
            level = level.floor(0, dx, 3, -200).floor(1, dx, 3, -200);
        }
        let mut h = Harness::new(level.stack(0, 1).build(), pos);
        h.set_anim(AnimationId::ONWATER_IDLE, 1800);
        h.lara.goal_state = LaraStateId::OnWaterStop;
        h.lara.underwater_status = UnderwaterStatus::Swimming;
        h
    }

    fn post(h: &mut Harness, handler: &dyn StateHandler, input: InputState) {
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        handler.post_process(&mut h.ctx(input), &mut coll).unwrap();
    }

    #[test]
    fn action_at_the_edge_climbs_out() {
        let mut h = pool(IVec3::new(2560, 0, 2990));
        post(&mut h, &OnWaterStop, InputState::default().with_action());
        assert_eq!(h.lara.anim.id, AnimationId::CLIMB_OUT_OF_WATER);
        assert_eq!(h.lara.current_state, LaraStateId::OnWaterExit);
        assert_eq!(h.lara.underwater_status, UnderwaterStatus::OnLand);
        assert_eq!(h.lara.hand_status, HandStatus::Grabbing);
        assert_eq!(h.lara.pos(), IVec3::new(2560, -205, 3072 + 100));
    }

    #[test]
    fn edge_without_action_blocks() {
        let mut h = pool(IVec3::new(2560, 0, 2990));
        h.lara.fall_speed = 30;
        post(&mut h, &OnWaterStop, InputState::default());
        assert_eq!(h.lara.fall_speed, 0);
        assert_eq!(h.lara.underwater_status, UnderwaterStatus::Swimming);
        assert_eq!(h.lara.pos(), IVec3::new(2560, 0, 2990));
    }

    #[test]
    fn sinking_below_the_surface_dives() {
        let mut h = pool(IVec3::new(2560, 150, 2560));
        post(&mut h, &OnWaterStop, InputState::default());
        assert_eq!(h.lara.anim.id, AnimationId::ONWATER_DIVE);
        assert_eq!(h.lara.underwater_status, UnderwaterStatus::Diving);
        assert_eq!(h.lara.rotation.x, Angle::from_degrees(-45.0));
        assert_eq!(h.lara.fall_speed, DIVE_SPEED);
    }

    #[test]
    fn holding_jump_dives_after_a_while() {
        let mut h = pool(IVec3::new(2560, 0, 2560));
        let mut coll = CollisionInfo::default();
        let jump = InputState::default().with_jump();
        for _ in 1..SWIM_TO_DIVE_TICS {
            OnWaterStop.handle_input(&mut h.ctx(jump), &mut coll).unwrap();
        }
        assert_eq!(h.lara.underwater_status, UnderwaterStatus::Swimming);
        OnWaterStop.handle_input(&mut h.ctx(jump), &mut coll).unwrap();
        assert_eq!(h.lara.underwater_status, UnderwaterStatus::Diving);
        assert_eq!(h.lara.current_state, LaraStateId::UnderwaterDiving);
    }

    #[test]
    fn releasing_jump_resets_the_dive_count() {
        let mut h = pool(IVec3::new(2560, 0, 2560));
        let mut coll = CollisionInfo::default();
        OnWaterStop
            .handle_input(&mut h.ctx(InputState::default().with_jump()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.swim_to_dive_count, 1);
        OnWaterStop.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert_eq!(h.lara.swim_to_dive_count, 0);
    }

    #[test]
    fn surface_swim_accelerates_to_its_cap() {
        let mut h = pool(IVec3::new(2560, 0, 2560));
        let mut coll = CollisionInfo::default();
        h.lara.goal_state = LaraStateId::OnWaterForward;
        for _ in 0..10 {
            SurfaceSwim::FORWARD
                .handle_input(&mut h.ctx(InputState::default().forward()), &mut coll)
                .unwrap();
        }
        assert_eq!(h.lara.fall_speed, ON_WATER_MAX_SPEED);
        assert_eq!(h.lara.goal_state, LaraStateId::OnWaterForward);

        SurfaceSwim::FORWARD
            .handle_input(&mut h.ctx(InputState::default().forward().with_jump()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::OnWaterStop);
    }

    #[test]
    fn dying_on_the_surface() {
        let mut h = pool(IVec3::new(2560, 0, 2560));
        let mut coll = CollisionInfo::default();
        h.lara.health = 0;
        SurfaceSwim::LEFT
            .handle_input(&mut h.ctx(InputState::default()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::WaterDeath);
    }
}
