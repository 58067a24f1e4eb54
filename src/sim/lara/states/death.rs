//! Lying dead on the floor.

use crate::defs::constants::{CLIMB_LIMIT_2_CLICK_MIN, DEATH_COLLISION_RADIUS, LARA_WALK_HEIGHT, NO_FLOOR};
use crate::defs::{CollisionPolicy, LaraStateId};
use crate::sim::collision::CollisionInfo;
use crate::sim::lara::handler::{StateCtx, StateHandler, StateResult};

/// Death, crushed by a boulder, or turned to gold. Shared by the three.
pub struct Dead(pub LaraStateId);

impl StateHandler for Dead {
    fn id(&self) -> LaraStateId {
        self.0
    }

    fn handle_input(&self, _ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        coll.policy.remove(CollisionPolicy::SPAZ_PUSH);
        Ok(())
    }

    fn post_process(&self, ctx: &mut StateCtx<'_>, coll: &mut CollisionInfo) -> StateResult {
        ctx.lara.movement_angle = ctx.lara.rotation.y;
        coll.facing_angle = ctx.lara.rotation.y;
        coll.set_bad_distances(CLIMB_LIMIT_2_CLICK_MIN, -CLIMB_LIMIT_2_CLICK_MIN, 0);
        coll.collision_radius = DEATH_COLLISION_RADIUS;
        ctx.probe(coll, LARA_WALK_HEIGHT);
        ctx.apply_shift(coll);
        if coll.mid.floor.y != NO_FLOOR {
            ctx.place_on_floor(coll);
        }
        ctx.lara.health = -1;
        ctx.lara.air = -1;
        Ok(())
    }
}
