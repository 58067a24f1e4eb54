//! States in which Lara stands on the spot.

use super::ground::{RunForward, WalkBackward, WalkForward};
use super::start_fall_forward;
use crate::defs::constants::{
    CLIMB_LIMIT_2_CLICK_MIN, LARA_FAST_TURN, LARA_WALK_HEIGHT, QUARTER_SECTOR_SIZE,
    STEP_DOWN_TOLERANCE,
};
use crate::defs::{AnimationId, CollisionPolicy, LaraStateId};
use crate::sim::collision::CollisionInfo;
use crate::sim::components::AxisMovement;
use crate::sim::hooks::CameraMode;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::units::Angle;

/// Shared by every standing state: stay on the floor, slide off slopes, fall
/// off edges.
pub(crate) fn standing_post(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = false;
    coll.facing_angle = ctx.lara.rotation.y;
    ctx.lara.movement_angle = coll.facing_angle;
    coll.policy |= CollisionPolicy::SLOPE_BLOCKING;
    coll.set_bad_distances(CLIMB_LIMIT_2_CLICK_MIN, -CLIMB_LIMIT_2_CLICK_MIN, 0);
    ctx.probe(coll, LARA_WALK_HEIGHT);

    if ctx.stop_if_ceiling_blocked(coll)? {
        return Ok(());
    }
    if coll.mid.floor.y > STEP_DOWN_TOLERANCE {
        return start_fall_forward(ctx);
    }
    if !ctx.try_start_slide(coll)? {
        ctx.apply_shift(coll);
        ctx.place_on_floor(coll);
    }
    Ok(())
}

pub struct Stop;

impl StateHandler for Stop {
    fn id(&self) -> LaraStateId {
        LaraStateId::Stop
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Death);
            return Ok(());
        }
        if ctx.input.roll {
            ctx.set_animation(AnimationId::ROLL_BEGIN, 3857)?;
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }

        ctx.set_goal(LaraStateId::Stop);
        match ctx.input.step_movement {
            AxisMovement::Left => ctx.set_goal(LaraStateId::StepLeft),
            AxisMovement::Right => ctx.set_goal(LaraStateId::StepRight),
            _ => {}
        }
        match ctx.input.x_movement {
            AxisMovement::Left => ctx.set_goal(LaraStateId::TurnLeftSlow),
            AxisMovement::Right => ctx.set_goal(LaraStateId::TurnRightSlow),
            _ => {}
        }

        if ctx.input.jump {
            ctx.set_goal(LaraStateId::JumpPrepare);
        } else if ctx.input.z_movement == AxisMovement::Forward {
            if ctx.input.move_slow {
                WalkForward.handle_input(ctx, coll)?;
            } else {
                RunForward.handle_input(ctx, coll)?;
            }
        } else if ctx.input.z_movement == AxisMovement::Backward {
            if ctx.input.move_slow {
                WalkBackward.handle_input(ctx, coll)?;
            } else {
                ctx.set_goal(LaraStateId::RunBack);
            }
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        standing_post(ctx, coll)
    }
}

/// Idle flourish.
pub struct Pose;

impl StateHandler for Pose {
    fn id(&self) -> LaraStateId {
        LaraStateId::Pose
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.hooks.set_camera_mode(CameraMode::Fixed);
        ctx.set_camera_rotation(Angle::from_degrees(-25.0), Angle::from_degrees(170.0));
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        standing_post(ctx, coll)
    }
}

/// Bounced off a wall while running.
pub struct Splat;

impl StateHandler for Splat {
    fn id(&self) -> LaraStateId {
        LaraStateId::Unknown12
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y;
        coll.facing_angle = ctx.lara.rotation.y;
        coll.policy |= CollisionPolicy::SLOPE_BLOCKING;
        coll.set_bad_distances(CLIMB_LIMIT_2_CLICK_MIN, -CLIMB_LIMIT_2_CLICK_MIN, 0);
        ctx.probe(coll, LARA_WALK_HEIGHT);
        ctx.apply_shift(coll);
        if (-QUARTER_SECTOR_SIZE..=QUARTER_SECTOR_SIZE).contains(&coll.mid.floor.y) {
            ctx.place_on_floor(coll);
        }
        Ok(())
    }
}

/// Landing after a drop; no control until the landing has played.
pub struct GrabToFall;

impl StateHandler for GrabToFall {
    fn id(&self) -> LaraStateId {
        LaraStateId::GrabToFall
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        standing_post(ctx, coll)
    }
}

pub struct TurnFast;

impl StateHandler for TurnFast {
    fn id(&self) -> LaraStateId {
        LaraStateId::TurnFast
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }
        let (speed, held) = if ctx.lara.y_rotation_speed >= Angle::ZERO {
            (LARA_FAST_TURN, AxisMovement::Right)
        } else {
            (-LARA_FAST_TURN, AxisMovement::Left)
        };
        ctx.lara.y_rotation_speed = speed;
        if ctx.input.x_movement != held {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        standing_post(ctx, coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::InputState;
    use crate::sim::testing::Harness;
    use glam::IVec3;

    fn input(h: &mut Harness, input: InputState) {
        let mut coll = CollisionInfo::default();
        Stop.handle_input(&mut h.ctx(input), &mut coll).unwrap();
    }

    #[test]
    fn forward_runs_and_slow_forward_walks() {
        let mut h = Harness::flat();
        input(&mut h, InputState::default().forward());
        assert_eq!(h.lara.goal_state, LaraStateId::RunForward);
        input(&mut h, InputState::default().forward().slow());
        assert_eq!(h.lara.goal_state, LaraStateId::WalkForward);
        input(&mut h, InputState::default().backward());
        assert_eq!(h.lara.goal_state, LaraStateId::RunBack);
        input(&mut h, InputState::default());
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn jump_beats_movement() {
        let mut h = Harness::flat();
        input(&mut h, InputState::default().forward().with_jump());
        assert_eq!(h.lara.goal_state, LaraStateId::JumpPrepare);
    }

    #[test]
    fn dead_lara_only_dies() {
        let mut h = Harness::flat();
        h.lara.health = 0;
        input(&mut h, InputState::default().forward().with_jump());
        assert_eq!(h.lara.goal_state, LaraStateId::Death);
    }

    #[test]
    fn roll_starts_at_once() {
        let mut h = Harness::flat();
        let roll = InputState {
            roll: true,
            ..InputState::default()
        };
        input(&mut h, roll);
        assert_eq!(h.lara.anim.id, AnimationId::ROLL_BEGIN);
        assert_eq!(h.lara.current_state, LaraStateId::RollForward);
    }

    #[test]
    fn standing_over_a_drop_falls() {
        let level = crate::world::LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -2048)
            .floor(0, 2, 2, 512)
            .build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        Stop.post_process(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert!(h.lara.falling);
        assert_eq!(h.lara.goal_state, LaraStateId::JumpForward);
        assert_eq!(h.lara.anim.id, AnimationId::FREE_FALL_FORWARD);
    }

    #[test]
    fn standing_follows_a_small_step_down() {
        let level = crate::world::LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -2048)
            .floor(0, 2, 2, 64)
            .build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        Stop.post_process(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert!(!h.lara.falling);
        assert_eq!(h.lara.pos().y, 64);
    }

    #[test]
    fn fast_turn_keeps_its_direction() {
        let mut h = Harness::flat();
        h.lara.y_rotation_speed = Angle::from_degrees(-1.0);
        let mut coll = CollisionInfo::default();
        let left = InputState {
            x_movement: AxisMovement::Left,
            ..InputState::default()
        };
        h.lara.goal_state = LaraStateId::TurnFast;
        TurnFast.handle_input(&mut h.ctx(left), &mut coll).unwrap();
        assert_eq!(h.lara.y_rotation_speed, -LARA_FAST_TURN);
        assert_eq!(h.lara.goal_state, LaraStateId::TurnFast);

        TurnFast.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
    }
}
