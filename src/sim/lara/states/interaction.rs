//! Scripted interactions. The object Lara works with drives the goal state;
//! the handlers only frame the camera and keep her on the floor.

use super::probe_only;
use crate::defs::stock::PICKUP_GRAB_FRAME;
use crate::defs::{CollisionPolicy, LaraStateId};
use crate::sim::collision::CollisionInfo;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::units::Angle;

const CLOSE_UP: i32 = 1024;

fn hands_busy(ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo, camera: (Angle, Angle)) {
    coll.policy.remove(CollisionPolicy::SPAZ_PUSH);
    ctx.set_camera_rotation(camera.0, camera.1);
}

/// Animation-only interaction with a fixed camera.
pub struct Scripted {
    id: LaraStateId,
    camera: (Angle, Angle),
    distance: Option<i32>,
}

impl Scripted {
    const BLOCK_CAMERA: (Angle, Angle) = (Angle::from_degrees(-25.0), Angle::from_degrees(35.0));

    pub const PUSH: Self = Self {
        id: LaraStateId::PushablePush,
        camera: Self::BLOCK_CAMERA,
        distance: None,
    };
    pub const PULL: Self = Self {
        id: LaraStateId::PushablePull,
        camera: Self::BLOCK_CAMERA,
        distance: None,
    };
    pub const SWITCH_DOWN: Self = Self {
        id: LaraStateId::SwitchDown,
        camera: (Angle::from_degrees(-25.0), Angle::from_degrees(80.0)),
        distance: Some(CLOSE_UP),
    };
    pub const SWITCH_UP: Self = Self {
        id: LaraStateId::SwitchUp,
        camera: (Angle::from_degrees(-25.0), Angle::from_degrees(80.0)),
        distance: Some(CLOSE_UP),
    };
    pub const INSERT_KEY: Self = Self {
        id: LaraStateId::InsertKey,
        camera: (Angle::from_degrees(-25.0), Angle::from_degrees(-80.0)),
        distance: Some(CLOSE_UP),
    };
    pub const INSERT_PUZZLE: Self = Self {
        id: LaraStateId::InsertPuzzle,
        camera: (Angle::from_degrees(-25.0), Angle::from_degrees(-80.0)),
        distance: Some(CLOSE_UP),
    };
    pub const USE_MIDAS: Self = Self {
        id: LaraStateId::UseMidas,
        camera: (Angle::from_degrees(-25.0), Angle::from_degrees(170.0)),
        distance: None,
    };
}

impl StateHandler for Scripted {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        hands_busy(ctx, coll, self.camera);
        if let Some(distance) = self.distance {
            ctx.hooks.set_camera_distance(distance);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        probe_only(ctx, coll)
    }
}

/// Holding a block, waiting for push or pull.
pub struct PushableGrab;

impl StateHandler for PushableGrab {
    fn id(&self) -> LaraStateId {
        LaraStateId::PushableGrab
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        hands_busy(ctx, coll, Scripted::BLOCK_CAMERA);
        if !ctx.input.action {
            ctx.set_goal(LaraStateId::Stop);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        probe_only(ctx, coll)
    }
}

/// Bending down for an item. The item changes hands on the grab frame.
pub struct PickUp;

impl StateHandler for PickUp {
    fn id(&self) -> LaraStateId {
        LaraStateId::PickUp
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        hands_busy(
            ctx,
            coll,
            (Angle::from_degrees(-15.0), Angle::from_degrees(-130.0)),
        );
        ctx.hooks.set_camera_distance(CLOSE_UP);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        if ctx.frame() == PICKUP_GRAB_FRAME {
            if let Some((item, quantity)) = ctx.lara.pending_pickup.take() {
                log::debug!("picked up {quantity} x {item:?}");
                ctx.hooks.put_inventory(item, quantity);
            }
        }
        probe_only(ctx, coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::AnimationId;
    use crate::sim::components::{InputState, ItemType};
    use crate::sim::testing::Harness;

    fn post(h: &mut Harness, handler: &dyn StateHandler) {
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        handler.post_process(&mut h.ctx(InputState::default()), &mut coll).unwrap();
    }

    #[test]
    fn item_changes_hands_on_the_grab_frame_only() {
        let mut h = Harness::flat();
        h.lara.pending_pickup = Some((ItemType(84), 2));
        h.set_anim(AnimationId::PICKUP, PICKUP_GRAB_FRAME - 1);
        post(&mut h, &PickUp);
        assert!(h.hooks.inventory.is_empty());

        h.set_anim(AnimationId::PICKUP, PICKUP_GRAB_FRAME);
        post(&mut h, &PickUp);
        post(&mut h, &PickUp);
        assert_eq!(h.hooks.inventory, vec![(ItemType(84), 2)]);
        assert_eq!(h.lara.pending_pickup, None);
    }

    #[test]
    fn letting_go_of_a_block_stands_up() {
        let mut h = Harness::flat();
        h.set_anim(AnimationId::START_OBJECT_MOVING, 2080);
        h.lara.goal_state = LaraStateId::PushableGrab;
        let mut coll = CollisionInfo {
            policy: CollisionPolicy::SPAZ_PUSH,
            ..CollisionInfo::default()
        };
        PushableGrab
            .handle_input(&mut h.ctx(InputState::default().with_action()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::PushableGrab);
        assert!(coll.policy.is_empty());

        PushableGrab.handle_input(&mut h.ctx(InputState::default()), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn switches_frame_the_camera_close_up() {
        let mut h = Harness::flat();
        let mut coll = CollisionInfo::default();
        Scripted::SWITCH_DOWN
            .handle_input(&mut h.ctx(InputState::default()), &mut coll)
            .unwrap();
        assert_eq!(
            h.hooks.camera_rotation,
            Some((Angle::from_degrees(-25.0), Angle::from_degrees(80.0)))
        );
        assert_eq!(h.hooks.camera_distance, Some(CLOSE_UP));
    }

    #[test]
    fn interactions_ignore_a_dying_lara() {
        let mut h = Harness::flat();
        h.lara.health = 0;
        h.lara.goal_state = LaraStateId::PushablePush;
        let mut coll = CollisionInfo::default();
        Scripted::PUSH
            .handle_input(&mut h.ctx(InputState::default()), &mut coll)
            .unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::PushablePush);
    }
}
