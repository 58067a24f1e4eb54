//! Walking, running, turning, stepping and rolling.

use super::{stand_still, start_fall_backward, start_fall_forward};
use crate::defs::constants::{
    CLIMB_LIMIT_2_CLICK_MAX, CLIMB_LIMIT_2_CLICK_MIN, DEFAULT_COLLISION_RADIUS,
    FREE_FALL_SPEED_THRESHOLD, HEIGHT_LIMIT, LARA_FAST_TURN, LARA_LEAN_MAX, LARA_LEAN_RATE,
    LARA_MED_TURN, LARA_SLOW_TURN, LARA_TURN_RATE, LARA_WALK_HEIGHT, QUARTER_SECTOR_SIZE,
    SCALP_HEIGHT,
};
use crate::defs::{AnimationId, CollisionPolicy, LaraStateId};
use crate::sim::collision::CollisionInfo;
use crate::sim::components::AxisMovement;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::units::Angle;
use crate::world::SlantClass;

/// Largest step a run climbs without slowing down.
const RUN_STEP_UP_LIMIT: i32 = 50;
/// Floor drop that ends a roll in a fall.
const ROLL_DROP_LIMIT: i32 = 200;

fn lean(ctx: &mut StateCtx<'_>, delta: Angle) {
    let z = (ctx.lara.rotation.z.units() + delta.units())
        .clamp(-LARA_LEAN_MAX.units(), LARA_LEAN_MAX.units());
    ctx.lara.rotation.z = Angle(z as i16);
}

/// Probe set-up shared by walking, stepping and turning.
fn ground_probe(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo, facing: Angle, bad: i32) {
    ctx.lara.fall_speed = 0;
    ctx.lara.falling = false;
    coll.facing_angle = facing;
    ctx.lara.movement_angle = facing;
    coll.policy |= CollisionPolicy::SLOPE_BLOCKING;
    coll.set_bad_distances(bad, -bad, 0);
    ctx.probe(coll, LARA_WALK_HEIGHT);
}

/* ---- walking --------------------------------------------------------- */

pub struct WalkForward;

impl StateHandler for WalkForward {
    fn id(&self) -> LaraStateId {
        LaraStateId::WalkForward
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }
        ctx.turn_by_input(LARA_TURN_RATE, LARA_SLOW_TURN);
        if ctx.input.z_movement == AxisMovement::Forward {
            ctx.set_goal(if ctx.input.move_slow {
                LaraStateId::WalkForward
            } else {
                LaraStateId::RunForward
            });
        } else {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        coll.policy |= CollisionPolicy::LAVA_IS_PIT;
        ground_probe(ctx, coll, ctx.lara.rotation.y, CLIMB_LIMIT_2_CLICK_MIN);

        if ctx.stop_if_ceiling_blocked(coll)? || ctx.try_climb(coll)? {
            return Ok(());
        }

        if ctx.check_wall_collision(coll) {
            match ctx.frame() {
                29..=47 => ctx.set_animation(AnimationId::END_WALK_RIGHT, 58)?,
                22..=28 | 48..=57 => ctx.set_animation(AnimationId::END_WALK_LEFT, 74)?,
                _ => stand_still(ctx)?,
            }
        }

        if coll.mid.floor.y > CLIMB_LIMIT_2_CLICK_MIN {
            return start_fall_forward(ctx);
        }

        let frame = ctx.frame();
        if coll.mid.floor.y > QUARTER_SECTOR_SIZE / 2 {
            if (28..=45).contains(&frame) {
                ctx.set_animation(AnimationId::WALK_DOWN_RIGHT, 887)?;
            } else {
                ctx.set_animation(AnimationId::WALK_DOWN_LEFT, 874)?;
            }
        }
        if (-CLIMB_LIMIT_2_CLICK_MIN..-QUARTER_SECTOR_SIZE / 2).contains(&coll.mid.floor.y) {
            if (27..=44).contains(&frame) {
                ctx.set_animation(AnimationId::WALK_UP_STEP_RIGHT, 844)?;
            } else {
                ctx.set_animation(AnimationId::WALK_UP_STEP_LEFT, 858)?;
            }
        }

        if !ctx.try_start_slide(coll)? {
            ctx.place_on_floor(coll);
        }
        Ok(())
    }
}

pub struct WalkBackward;

impl StateHandler for WalkBackward {
    fn id(&self) -> LaraStateId {
        LaraStateId::WalkBackward
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }
        if ctx.input.z_movement == AxisMovement::Backward && ctx.input.move_slow {
            ctx.set_goal(LaraStateId::WalkBackward);
        } else {
            ctx.set_goal(LaraStateId::Stop);
        }
        ctx.turn_by_input(LARA_TURN_RATE, LARA_SLOW_TURN);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let facing = ctx.lara.rotation.y + Angle::from_degrees(180.0);
        ground_probe(ctx, coll, facing, CLIMB_LIMIT_2_CLICK_MIN);

        if ctx.stop_if_ceiling_blocked(coll)? {
            return Ok(());
        }
        if ctx.check_wall_collision(coll) {
            stand_still(ctx)?;
        }
        if coll.mid.floor.y > QUARTER_SECTOR_SIZE && coll.mid.floor.y < CLIMB_LIMIT_2_CLICK_MIN {
            if (964..=993).contains(&ctx.frame()) {
                ctx.set_animation(AnimationId::WALK_DOWN_BACK_RIGHT, 930)?;
            } else {
                ctx.set_animation(AnimationId::WALK_DOWN_BACK_LEFT, 899)?;
            }
        }
        if !ctx.try_start_slide(coll)? {
            ctx.place_on_floor(coll);
        }
        Ok(())
    }
}

/* ---- running --------------------------------------------------------- */

pub struct RunForward;

impl StateHandler for RunForward {
    fn id(&self) -> LaraStateId {
        LaraStateId::RunForward
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Death);
            return Ok(());
        }
        if ctx.input.roll {
            ctx.set_animation(AnimationId::ROLL_BEGIN, 3857)?;
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }

        match ctx.input.x_movement {
            AxisMovement::Left => {
                ctx.sub_y_rotation_speed(LARA_TURN_RATE, -LARA_FAST_TURN);
                lean(ctx, -LARA_LEAN_RATE);
            }
            AxisMovement::Right => {
                ctx.add_y_rotation_speed(LARA_TURN_RATE, LARA_FAST_TURN);
                lean(ctx, LARA_LEAN_RATE);
            }
            _ => {}
        }

        if ctx.input.jump && !ctx.lara.falling {
            ctx.set_goal(LaraStateId::JumpForward);
        } else if ctx.input.z_movement != AxisMovement::Forward {
            ctx.set_goal(LaraStateId::Stop);
        } else if ctx.input.move_slow {
            ctx.set_goal(LaraStateId::WalkForward);
        } else {
            ctx.set_goal(LaraStateId::RunForward);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let facing = ctx.lara.rotation.y;
        coll.facing_angle = facing;
        ctx.lara.movement_angle = facing;
        coll.policy |= CollisionPolicy::SLOPES_ARE_WALLS;
        coll.set_bad_distances(HEIGHT_LIMIT, -CLIMB_LIMIT_2_CLICK_MIN, 0);
        ctx.probe(coll, LARA_WALK_HEIGHT);

        if ctx.stop_if_ceiling_blocked(coll)? || ctx.try_climb(coll)? {
            return Ok(());
        }

        if ctx.check_wall_collision(coll) {
            ctx.lara.rotation.z = Angle::ZERO;
            let sheer = coll.front.floor.slant_class == SlantClass::None
                && coll.front.floor.y < -CLIMB_LIMIT_2_CLICK_MAX;
            match ctx.frame() {
                0..=9 if sheer => return ctx.set_animation(AnimationId::WALL_SMASH_LEFT, 800),
                10..=21 if sheer => return ctx.set_animation(AnimationId::WALL_SMASH_RIGHT, 815),
                _ => stand_still(ctx)?,
            }
        }

        if coll.mid.floor.y > CLIMB_LIMIT_2_CLICK_MIN {
            return start_fall_forward(ctx);
        }

        if (-CLIMB_LIMIT_2_CLICK_MIN..-QUARTER_SECTOR_SIZE / 2).contains(&coll.mid.floor.y) {
            if (3..=14).contains(&ctx.frame()) {
                ctx.set_animation(AnimationId::RUN_UP_STEP_LEFT, 837)?;
            } else {
                ctx.set_animation(AnimationId::RUN_UP_STEP_RIGHT, 830)?;
            }
        }

        if !ctx.try_start_slide(coll)? {
            ctx.lara.pos_mut().y += coll.mid.floor.y.min(RUN_STEP_UP_LIMIT);
        }
        Ok(())
    }
}

pub struct RunBack;

impl StateHandler for RunBack {
    fn id(&self) -> LaraStateId {
        LaraStateId::RunBack
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.set_goal(LaraStateId::Stop);
        ctx.turn_by_input(LARA_TURN_RATE, LARA_MED_TURN);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.fall_speed = 0;
        ctx.lara.falling = false;
        let facing = ctx.lara.rotation.y + Angle::from_degrees(180.0);
        coll.facing_angle = facing;
        ctx.lara.movement_angle = facing;
        coll.policy |= CollisionPolicy::SLOPE_BLOCKING;
        coll.set_bad_distances(HEIGHT_LIMIT, -CLIMB_LIMIT_2_CLICK_MIN, 0);
        ctx.probe(coll, LARA_WALK_HEIGHT);

        if ctx.stop_if_ceiling_blocked(coll)? {
            return Ok(());
        }
        if coll.mid.floor.y > ROLL_DROP_LIMIT {
            return start_fall_backward(ctx);
        }
        if ctx.check_wall_collision(coll) {
            stand_still(ctx)?;
        }
        ctx.place_on_floor(coll);
        Ok(())
    }
}

/* ---- turning on the spot --------------------------------------------- */

/// Slow turn to either side.
pub struct TurnSlow {
    id: LaraStateId,
    held: AxisMovement,
}

impl TurnSlow {
    pub const LEFT: Self = Self {
        id: LaraStateId::TurnLeftSlow,
        held: AxisMovement::Left,
    };
    pub const RIGHT: Self = Self {
        id: LaraStateId::TurnRightSlow,
        held: AxisMovement::Right,
    };
}

impl StateHandler for TurnSlow {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }

        // mirror left turns so one rule covers both directions
        let sign = if self.held == AxisMovement::Right { 1 } else { -1 };
        let speed = sign * ctx.lara.y_rotation_speed.units() + LARA_TURN_RATE.units();
        let speed = if speed < 0 {
            0
        } else if speed > LARA_SLOW_TURN.units() {
            if ctx.input.move_slow {
                LARA_SLOW_TURN.units()
            } else {
                ctx.set_goal(LaraStateId::TurnFast);
                speed
            }
        } else {
            speed
        };
        ctx.lara.y_rotation_speed = Angle((sign * speed) as i16);

        if ctx.input.z_movement == AxisMovement::Forward {
            ctx.set_goal(if ctx.input.move_slow {
                LaraStateId::WalkForward
            } else {
                LaraStateId::RunForward
            });
        } else if ctx.input.x_movement != self.held {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ground_probe(ctx, coll, ctx.lara.rotation.y, CLIMB_LIMIT_2_CLICK_MIN);
        if coll.mid.floor.y <= DEFAULT_COLLISION_RADIUS {
            if !ctx.try_start_slide(coll)? {
                ctx.place_on_floor(coll);
            }
            return Ok(());
        }
        start_fall_forward(ctx)
    }
}

/* ---- side steps ------------------------------------------------------ */

pub struct Sidestep {
    id: LaraStateId,
    held: AxisMovement,
    offset: Angle,
}

impl Sidestep {
    pub const LEFT: Self = Self {
        id: LaraStateId::StepLeft,
        held: AxisMovement::Left,
        offset: Angle::from_degrees(-90.0),
    };
    pub const RIGHT: Self = Self {
        id: LaraStateId::StepRight,
        held: AxisMovement::Right,
        offset: Angle::from_degrees(90.0),
    };
}

impl StateHandler for Sidestep {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }
        if ctx.input.step_movement != self.held {
            ctx.set_goal(LaraStateId::Stop);
        }
        ctx.turn_by_input(LARA_TURN_RATE, LARA_SLOW_TURN);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        let facing = ctx.lara.rotation.y + self.offset;
        ground_probe(ctx, coll, facing, QUARTER_SECTOR_SIZE / 2);

        if ctx.stop_if_ceiling_blocked(coll)? {
            return Ok(());
        }
        if ctx.check_wall_collision(coll) {
            stand_still(ctx)?;
            ctx.set_goal(LaraStateId::Stop);
        }
        if !ctx.try_start_slide(coll)? {
            ctx.place_on_floor(coll);
        }
        Ok(())
    }
}

/* ---- rolls ----------------------------------------------------------- */

pub struct RollForward;

impl StateHandler for RollForward {
    fn id(&self) -> LaraStateId {
        LaraStateId::RollForward
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ground_probe(ctx, coll, ctx.lara.rotation.y, CLIMB_LIMIT_2_CLICK_MIN);

        if ctx.stop_if_ceiling_blocked(coll)? || ctx.try_start_slide(coll)? {
            return Ok(());
        }
        if coll.mid.floor.y > ROLL_DROP_LIMIT {
            return start_fall_forward(ctx);
        }
        ctx.apply_shift(coll);
        ctx.place_on_floor(coll);
        Ok(())
    }
}

pub struct RollBackward;

impl StateHandler for RollBackward {
    fn id(&self) -> LaraStateId {
        LaraStateId::RollBackward
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.fall_speed = 0;
        ctx.lara.falling = false;
        let facing = ctx.lara.rotation.y + Angle::from_degrees(180.0);
        coll.facing_angle = facing;
        ctx.lara.movement_angle = facing;
        coll.policy |= CollisionPolicy::SLOPES_ARE_WALLS;
        coll.set_bad_distances(HEIGHT_LIMIT, -CLIMB_LIMIT_2_CLICK_MIN, 0);
        ctx.probe(coll, SCALP_HEIGHT);

        if ctx.stop_if_ceiling_blocked(coll)? || ctx.try_start_slide(coll)? {
            return Ok(());
        }
        if coll.mid.floor.y <= ROLL_DROP_LIMIT {
            ctx.apply_shift(coll);
            ctx.place_on_floor(coll);
            return Ok(());
        }
        start_fall_backward(ctx)
    }
}

/* ---- crouch before a jump -------------------------------------------- */

pub struct JumpPrepare;

impl JumpPrepare {
    /// Jump direction for the held input, if the floor that way allows it.
    fn pick_direction(ctx: &StateCtx<'_>) -> Option<(LaraStateId, Angle)> {
        let yaw = ctx.lara.rotation.y;
        let candidates = [
            (ctx.input.z_movement == AxisMovement::Forward, LaraStateId::JumpForward, Angle::ZERO),
            (ctx.input.x_movement == AxisMovement::Left, LaraStateId::JumpLeft, Angle::from_degrees(-90.0)),
            (ctx.input.x_movement == AxisMovement::Right, LaraStateId::JumpRight, Angle::from_degrees(90.0)),
            (ctx.input.z_movement == AxisMovement::Backward, LaraStateId::JumpBack, Angle::from_degrees(180.0)),
        ];
        // only the first held direction is tried, like the input priority
        let (_, goal, offset) = candidates.into_iter().find(|(held, _, _)| *held)?;
        let angle = yaw + offset;
        (ctx.relative_height_at(angle, QUARTER_SECTOR_SIZE) >= -CLIMB_LIMIT_2_CLICK_MIN)
            .then_some((goal, angle))
    }
}

impl StateHandler for JumpPrepare {
    fn id(&self) -> LaraStateId {
        LaraStateId::JumpPrepare
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        if ctx.lara.fall_speed > FREE_FALL_SPEED_THRESHOLD {
            ctx.set_goal(LaraStateId::FreeFall);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        if let Some((goal, angle)) = Self::pick_direction(ctx) {
            ctx.set_goal(goal);
            ctx.lara.movement_angle = angle;
        }

        ctx.lara.fall_speed = 0;
        ctx.lara.falling = false;
        coll.facing_angle = ctx.lara.rotation.y;
        coll.set_bad_distances(HEIGHT_LIMIT, -HEIGHT_LIMIT, 0);
        ctx.probe(coll, LARA_WALK_HEIGHT);

        if coll.mid.ceiling.y > -DEFAULT_COLLISION_RADIUS {
            stand_still(ctx)?;
            ctx.set_goal(LaraStateId::Stop);
            ctx.lara.speed = 0;
            ctx.lara.position.pos = coll.old_position;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::AxisColl;
    use crate::sim::components::InputState;
    use crate::sim::testing::Harness;
    use crate::world::LevelBuilder;
    use glam::IVec3;

    fn walled_room() -> Harness {
        // row dz = 3 is solid rock
        let mut level = LevelBuilder::new().room(0, 0, 6, 6, 0, -4096);
        for dx in 1..5 {
            level = level.wall(0, dx, 3);
        }
        Harness::new(level.build(), IVec3::new(2560, 0, 3000))
    }

    fn post(h: &mut Harness, handler: &dyn StateHandler, input: InputState) -> CollisionInfo {
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        handler.post_process(&mut h.ctx(input), &mut coll).unwrap();
        coll
    }

    #[test]
    fn walking_turn_is_capped() {
        let mut h = Harness::flat();
        let input = InputState {
            x_movement: AxisMovement::Right,
            ..InputState::default().forward().slow()
        };
        let mut coll = CollisionInfo::default();
        for _ in 0..5 {
            WalkForward.handle_input(&mut h.ctx(input), &mut coll).unwrap();
        }
        assert_eq!(h.lara.y_rotation_speed, LARA_SLOW_TURN);
        assert_eq!(h.lara.goal_state, LaraStateId::WalkForward);
    }

    #[test]
    fn running_into_rock_smashes() {
        let mut h = walled_room();
        h.set_anim(AnimationId::RUN, 4);
        let coll = post(&mut h, &RunForward, InputState::default().forward());
        assert_eq!(coll.collision_type, AxisColl::Front);
        assert!(coll.front.floor.y < -CLIMB_LIMIT_2_CLICK_MAX);
        assert_eq!(h.lara.anim.id, AnimationId::WALL_SMASH_LEFT);
        assert_eq!(h.lara.current_state, LaraStateId::Unknown12);
        assert_eq!(h.lara.speed, 0);
    }

    #[test]
    fn smash_is_not_undone_by_a_step_underfoot() {
        let mut level = LevelBuilder::new().room(0, 0, 6, 6, 0, -4096).floor(0, 2, 2, -256);
        for dx in 1..5 {
            level = level.wall(0, dx, 3);
        }
        let mut h = Harness::new(level.build(), IVec3::new(2560, 0, 3000));
        h.set_anim(AnimationId::RUN, 4);
        let coll = post(&mut h, &RunForward, InputState::default().forward());
        assert_eq!(coll.collision_type, AxisColl::Front);
        assert_eq!(coll.mid.floor.y, -256);
        assert_eq!(h.lara.anim.id, AnimationId::WALL_SMASH_LEFT);
        assert_eq!(h.lara.pos().y, 0);
    }

    #[test]
    fn dying_runner_heads_for_death() {
        let mut h = Harness::flat();
        h.set_anim(AnimationId::RUN, 4);
        h.lara.health = 0;
        let mut coll = CollisionInfo::default();
        RunForward
            .handle_input(&mut h.ctx(InputState::default().forward()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::Death);
    }

    #[test]
    fn walking_into_rock_ends_the_walk() {
        let mut h = walled_room();
        h.set_anim(AnimationId::WALK_FORWARD, 30);
        post(&mut h, &WalkForward, InputState::default().forward().slow());
        assert_eq!(h.lara.anim.id, AnimationId::END_WALK_RIGHT);
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn run_climbs_small_steps_gradually() {
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).floor(0, 2, 2, -100).build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        h.set_anim(AnimationId::RUN, 0);
        post(&mut h, &RunForward, InputState::default().forward());
        assert_eq!(h.lara.pos().y, -100);

        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).floor(0, 2, 2, 100).build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        h.set_anim(AnimationId::RUN, 0);
        post(&mut h, &RunForward, InputState::default().forward());
        assert_eq!(h.lara.pos().y, RUN_STEP_UP_LIMIT);
    }

    #[test]
    fn slow_turn_speeds_up_into_a_fast_turn() {
        let mut h = Harness::flat();
        let right = InputState {
            x_movement: AxisMovement::Right,
            ..InputState::default()
        };
        let mut coll = CollisionInfo::default();
        h.lara.goal_state = LaraStateId::TurnRightSlow;
        h.lara.y_rotation_speed = LARA_SLOW_TURN;
        TurnSlow::RIGHT.handle_input(&mut h.ctx(right), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::TurnFast);

        h.lara.goal_state = LaraStateId::TurnLeftSlow;
        h.lara.y_rotation_speed = Angle::ZERO;
        TurnSlow::LEFT.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
        assert_eq!(h.lara.y_rotation_speed, -LARA_TURN_RATE);
    }

    #[test]
    fn jump_direction_needs_a_floor_that_way() {
        let mut h = walled_room();
        h.set_anim(AnimationId::JUMP_PREPARE, 1161);
        h.lara.goal_state = LaraStateId::JumpPrepare;
        post(&mut h, &JumpPrepare, InputState::default().forward());
        // solid rock ahead
        assert_eq!(h.lara.goal_state, LaraStateId::JumpPrepare);

        post(&mut h, &JumpPrepare, InputState::default().backward());
        assert_eq!(h.lara.goal_state, LaraStateId::JumpBack);
        assert_eq!(h.lara.movement_angle, Angle::from_degrees(180.0));
    }

    #[test]
    fn low_ceiling_cancels_the_jump() {
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -800).build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        h.set_anim(AnimationId::JUMP_PREPARE, 1161);
        post(&mut h, &JumpPrepare, InputState::default().forward());
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
        assert_eq!(h.lara.anim.id, AnimationId::STAY_SOLID);
    }

    #[test]
    fn back_roll_drops_off_an_edge() {
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).floor(0, 2, 2, 300).build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        h.set_anim(AnimationId::ROLL_BACKWARD, 4061);
        post(&mut h, &RollBackward, InputState::default());
        assert_eq!(h.lara.goal_state, LaraStateId::FallBackward);
        assert!(h.lara.falling);
    }
}
