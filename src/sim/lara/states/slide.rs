//! Sliding down steep slopes.

use crate::defs::LaraStateId;
use crate::sim::collision::CollisionInfo;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};
use crate::units::Angle;

pub struct Slide {
    id: LaraStateId,
    jump: LaraStateId,
    offset: Angle,
}

impl Slide {
    pub const FORWARD: Self = Self {
        id: LaraStateId::SlideForward,
        jump: LaraStateId::JumpForward,
        offset: Angle::ZERO,
    };
    pub const BACKWARD: Self = Self {
        id: LaraStateId::SlideBackward,
        jump: LaraStateId::JumpBack,
        offset: Angle::from_degrees(180.0),
    };
}

impl StateHandler for Slide {
    fn id(&self) -> LaraStateId {
        self.id
    }

    fn handle_input(&self, ctx: &mut StateCtx<'_>, _coll: &mut CollisionInfo) -> StateResult {
        ctx.set_camera_rotation_x(Angle::from_degrees(-45.0));
        if ctx.input.jump {
            ctx.set_goal(self.jump);
        }
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y + self.offset;
        ctx.common_slide_handling(coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::AnimationId;
    use crate::sim::components::InputState;
    use crate::sim::testing::Harness;
    use crate::world::LevelBuilder;
    use glam::IVec3;

    fn post(h: &mut Harness, handler: &dyn StateHandler) {
        let mut coll = CollisionInfo {
            old_position: h.lara.pos(),
            ..CollisionInfo::default()
        };
        handler.post_process(&mut h.ctx(InputState::default()), &mut coll).unwrap();
    }

    #[test]
    fn jump_leaves_the_slope_the_way_lara_faces() {
        let mut h = Harness::flat();
        let mut coll = CollisionInfo::default();
        let jump = InputState::default().with_jump();
        Slide::BACKWARD.handle_input(&mut h.ctx(jump), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::JumpBack);
        Slide::FORWARD.handle_input(&mut h.ctx(jump), &mut coll).unwrap();
        assert_eq!(h.lara.goal_state, LaraStateId::JumpForward);
    }

    #[test]
    fn sliding_tilts_the_camera_but_keeps_its_yaw() {
        let mut h = Harness::flat();
        h.hooks.camera_rotation = Some((Angle::ZERO, Angle::from_degrees(135.0)));
        let mut coll = CollisionInfo::default();
        Slide::FORWARD
            .handle_input(&mut h.ctx(InputState::default()), &mut coll)
            .unwrap();
        assert_eq!(
            h.hooks.camera_rotation,
            Some((Angle::from_degrees(-45.0), Angle::from_degrees(135.0)))
        );
    }

    #[test]
    fn flat_ground_ends_the_slide() {
        let mut h = Harness::flat();
        h.set_anim(AnimationId::SLIDE_FORWARD, 1135);
        h.lara.goal_state = LaraStateId::SlideForward;
        post(&mut h, &Slide::FORWARD);
        assert_eq!(h.lara.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn steep_ground_keeps_sliding() {
        let level = LevelBuilder::new()
            .room(0, 0, 5, 5, 0, -2048)
            .floor_slant(0, 2, 2, 0, -4)
            .build();
        // near the top edge of the slope
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2088));
        h.set_anim(AnimationId::SLIDE_FORWARD, 1135);
        h.lara.goal_state = LaraStateId::SlideForward;
        post(&mut h, &Slide::FORWARD);
        assert_eq!(h.lara.goal_state, LaraStateId::SlideForward);
        assert_eq!(h.lara.movement_angle, Angle::ZERO);
        assert_eq!(h.lara.pos().y, 40);
    }

    #[test]
    fn sliding_off_an_edge_falls_backwards() {
        let level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).floor(0, 2, 2, 600).build();
        let mut h = Harness::new(level, IVec3::new(2560, 0, 2560));
        h.set_anim(AnimationId::SLIDE_BACKWARD, 1690);
        post(&mut h, &Slide::BACKWARD);
        assert_eq!(h.lara.goal_state, LaraStateId::FallBackward);
        assert!(h.lara.falling);
    }
}
