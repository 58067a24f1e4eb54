//! Hanging from a ledge and pulling up onto it.

use super::probe_only;
use crate::defs::{CollisionPolicy, LaraStateId};
use crate::sim::collision::CollisionInfo;
use crate::sim::components::AxisMovement;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::units::Angle;

/// Ledge heights, relative to the hanging Lara, she can pull herself onto.
const PULL_UP_MIN: i32 = -850;
const PULL_UP_MAX: i32 = -650;

fn wants(ctx: &StateCtx<'_>, side: AxisMovement) -> bool {
    ctx.input.x_movement == side || ctx.input.step_movement == side
}

pub struct Hang;

impl Hang {
    /// Standing room on top of the ledge across the whole front.
    fn room_on_top(coll: &CollisionInfo) -> bool {
        (PULL_UP_MIN + 1..PULL_UP_MAX).contains(&coll.front.floor.y)
            && [coll.front, coll.front_left, coll.front_right]
                .iter()
                .all(|space| space.floor.y - space.ceiling.y >= 0)
    }
}

impl StateHandler for Hang {
    fn id(&self) -> LaraStateId {
        LaraStateId::Hang
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.set_camera_rotation(Angle::from_degrees(-60.0), Angle::ZERO);
        coll.policy
            .remove(CollisionPolicy::ENABLE_BADDIE_PUSH | CollisionPolicy::ENABLE_SPAZ);
        if ctx.lara.is_dying() {
            ctx.set_goal(LaraStateId::Stop);
            return Ok(());
        }
        if wants(ctx, AxisMovement::Left) {
            ctx.set_goal(LaraStateId::ShimmyLeft);
        } else if wants(ctx, AxisMovement::Right) {
            ctx.set_goal(LaraStateId::ShimmyRight);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y;
        ctx.common_edge_hang_handling(coll)?;

        if ctx.goal() != LaraStateId::Hang || ctx.input.z_movement != AxisMovement::Forward {
            return Ok(());
        }
        if Self::room_on_top(coll) {
            log::debug!("pulling up onto a ledge {} high", -coll.front.floor.y);
            ctx.set_goal(if ctx.input.move_slow {
                LaraStateId::Handstand
            } else {
                LaraStateId::Climbing
            });
        }
        Ok(())
    }
}

/// Hand over hand along the ledge.
pub struct Shimmy {
    id: LaraStateId,
    held: AxisMovement,
    offset: Angle,
}

impl Shimmy {
    pub const LEFT: Self = Self {
        id: LaraStateId::ShimmyLeft,
        held: AxisMovement::Left,
        offset: Angle::from_degrees(-90.0),
    };
    pub const RIGHT: Self = Self {
        id: LaraStateId::ShimmyRight,
        held: AxisMovement::Right,
        offset: Angle::from_degrees(90.0),
    };
}

impl StateHandler for Shimmy {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.set_camera_rotation(Angle::from_degrees(-60.0), Angle::ZERO);
        coll.policy
            .remove(CollisionPolicy::ENABLE_BADDIE_PUSH | CollisionPolicy::ENABLE_SPAZ);
        if ctx.lara.is_dying() || !wants(ctx, self.held) {
            ctx.set_goal(LaraStateId::Hang);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y + self.offset;
        ctx.common_edge_hang_handling(coll)?;
        // the hang handling resets it to the heading
        ctx.lara.movement_angle = ctx.lara.rotation.y + self.offset;
        Ok(())
    }
}

/// Pulling up onto the ledge, normally or with a handstand. Runs on
/// animation alone.
pub struct PullUp(pub LaraStateId);

impl StateHandler for PullUp {
    fn id(&self) -> LaraStateId {
        self.0
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        probe_only(ctx, coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::AnimationId;
    use crate::sim::components::InputState;
    use crate::sim::lara::state::HandStatus;
    use crate::sim::testing::Harness;
    use crate::world::LevelBuilder;
    use glam::IVec3;

    /// Lara hangs from a ledge 1400 up that runs along row `dz = 3`.
    fn hanging() -> Harness {
        let mut level = LevelBuilder::new().room(0, 0, 6, 6, 0, -4096);
        for dx in 1..5 {
            level = level.floor(0, dx, 3, -1400);
        }
        let mut h = Harness::new(level.build(), IVec3::new(2560, -640, 2971));
        h.set_anim(AnimationId::HANG_IDLE, 1514);
        h.lara.goal_state = LaraStateId::Hang;
        h.lara.hand_status = HandStatus::Grabbing;
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
    fn grip_holds_while_action_is_held() {
        let mut h = hanging();
        post(&mut h, &Hang, InputState::default().with_action());
        assert_eq!(h.lara.goal_state, LaraStateId::Hang);
        assert_eq!(h.lara.pos().y, -640);
        assert!(!h.lara.falling);
    }

    #[test]
    fn releasing_action_drops() {
        let mut h = hanging();
        post(&mut h, &Hang, InputState::default());
        assert_eq!(h.lara.goal_state, LaraStateId::JumpUp);
        assert_eq!(h.lara.hand_status, HandStatus::None);
        assert!(h.lara.falling);
    }

    #[test]
    fn forward_climbs_and_walk_key_does_a_handstand() {
        let mut h = hanging();
        post(&mut h, &Hang, InputState::default().with_action().forward());
        assert_eq!(h.lara.goal_state, LaraStateId::Climbing);

        let mut h = hanging();
        post(&mut h, &Hang, InputState::default().with_action().forward().slow());
        assert_eq!(h.lara.goal_state, LaraStateId::Handstand);
    }

    #[test]
    fn uneven_ledge_can_still_be_climbed() {
        let mut level = LevelBuilder::new().room(0, 0, 6, 6, 0, -4096);
        for dx in 1..5 {
            level = level.floor(0, dx, 3, if dx == 1 { -1300 } else { -1400 });
        }
        let mut h = Harness::new(level.build(), IVec3::new(2100, -640, 2971));
        h.set_anim(AnimationId::HANG_IDLE, 1514);
        h.lara.goal_state = LaraStateId::Hang;
        h.lara.hand_status = HandStatus::Grabbing;

        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        let input = InputState::default().with_action().forward();
        Hang.post_process(&mut h.ctx(input), &mut coll).unwrap();
        assert!(coll.too_steep_to_grab());
        assert_eq!(h.lara.goal_state, LaraStateId::Climbing);
    }

    #[test]
    fn side_input_shimmies() {
        let mut h = hanging();
        let mut coll = CollisionInfo::default();
        let input = InputState {
            step_movement: AxisMovement::Right,
            ..InputState::default().with_action()
        };
        Hang.handle_input(&mut h.ctx(input), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::ShimmyRight);
        assert_eq!(h.hooks.camera_rotation, Some((Angle::from_degrees(-60.0), Angle::ZERO)));

        Shimmy::RIGHT
            .handle_input(&mut h.ctx(InputState::default().with_action()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::Hang);
    }

    #[test]
    fn shimmy_moves_sideways_along_the_ledge() {
        let mut h = hanging();
        h.set_anim(AnimationId::CLIMB_RIGHT, 3070);
        post(&mut h, &Shimmy::RIGHT, InputState::default().with_action());
        assert_eq!(h.lara.movement_angle, Angle::from_degrees(90.0));
        assert_eq!(h.lara.current_state, LaraStateId::ShimmyRight);
    }

    #[test]
    fn dead_lara_lets_go() {
        let mut h = hanging();
        let mut coll = CollisionInfo::default();
        h.lara.health = 0;
        Hang.handle_input(&mut h.ctx(InputState::default().with_action()), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
        post(&mut h, &Hang, InputState::default().with_action());
        assert_eq!(h.lara.goal_state, LaraStateId::JumpUp);
    }
}
