//! State id → handler lookup.

use super::handler::StateHandler;
use super::states::airborne::{
    FallBackward, FreeFall, JumpBack, JumpForward, JumpSide, JumpUp, Reach, SwandiveBegin,
    SwandiveEnd,
};
use super::states::death::Dead;
use super::states::ground::{
    JumpPrepare, RollBackward, RollForward, RunBack, RunForward, Sidestep, TurnSlow, WalkBackward,
    WalkForward,
};
use super::states::hang::{Hang, PullUp, Shimmy};
use super::states::interaction::{PickUp, PushableGrab, Scripted};
use super::states::on_water::{OnWaterExit, OnWaterStop, SurfaceSwim};
use super::states::slide::Slide;
use super::states::standing::{GrabToFall, Pose, Splat, Stop, TurnFast};
use super::states::underwater::{
    UnderwaterDiving, UnderwaterForward, UnderwaterInertia, UnderwaterStop, WaterDeath,
};
use crate::defs::{LaraStateId, StateError};

/// Indexed by raw state id.
static HANDLERS: [&dyn StateHandler; LaraStateId::COUNT] = [
    &WalkForward,
    &RunForward,
    &Stop,
    &JumpForward,
    &Pose,
    &RunBack,
    &TurnSlow::RIGHT,
    &TurnSlow::LEFT,
    &Dead(LaraStateId::Death),
    &FreeFall,
    &Hang,
    &Reach,
    &Splat,
    &UnderwaterStop,
    &GrabToFall,
    &JumpPrepare,
    &WalkBackward,
    &UnderwaterForward,
    &UnderwaterInertia,
    &PullUp(LaraStateId::Climbing),
    &TurnFast,
    &Sidestep::RIGHT,
    &Sidestep::LEFT,
    &RollBackward,
    &Slide::FORWARD,
    &JumpBack,
    &JumpSide::LEFT,
    &JumpSide::RIGHT,
    &JumpUp,
    &FallBackward,
    &Shimmy::LEFT,
    &Shimmy::RIGHT,
    &Slide::BACKWARD,
    &OnWaterStop,
    &SurfaceSwim::FORWARD,
    &UnderwaterDiving,
    &Scripted::PUSH,
    &Scripted::PULL,
    &PushableGrab,
    &PickUp,
    &Scripted::SWITCH_DOWN,
    &Scripted::SWITCH_UP,
    &Scripted::INSERT_KEY,
    &Scripted::INSERT_PUZZLE,
    &WaterDeath,
    &RollForward,
    &Dead(LaraStateId::BoulderDeath),
    &SurfaceSwim::BACKWARD,
    &SurfaceSwim::LEFT,
    &SurfaceSwim::RIGHT,
    &Scripted::USE_MIDAS,
    &Dead(LaraStateId::MidasDeath),
    &SwandiveBegin,
    &SwandiveEnd,
    &PullUp(LaraStateId::Handstand),
    &OnWaterExit,
];

#[inline]
pub fn handler_for(id: LaraStateId) -> &'static dyn StateHandler {
    HANDLERS[id.raw() as usize]
}

/// Handler for a raw id read from level or save data.
pub fn handler_for_raw(raw: u16) -> Result<&'static dyn StateHandler, StateError> {
    match LaraStateId::try_from(raw) {
        Ok(id) => Ok(handler_for(id)),
        Err(e) => {
            log::error!("no handler for state {raw}");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::CollisionInfo;
    use crate::sim::components::InputState;
    use crate::sim::testing::Harness;

    #[test]
    fn every_state_has_its_own_handler() {
        for id in LaraStateId::ALL {
            assert_eq!(handler_for(id).id(), id);
        }
        assert_eq!(handler_for_raw(19).map(|h| h.id()), Ok(LaraStateId::Climbing));
        assert!(matches!(handler_for_raw(56), Err(StateError::UnknownState(56))));
    }

    fn dying_goal(id: LaraStateId) -> LaraStateId {
        use LaraStateId::*;
        match id {
            Stop | RunForward => Death,
            WalkForward | RunBack | TurnRightSlow | TurnLeftSlow | WalkBackward
            | StepLeft | StepRight | TurnFast => Stop,
            Hang => Stop,
            ShimmyLeft | ShimmyRight => Hang,
            OnWaterStop | OnWaterForward | OnWaterBackward | OnWaterLeft | OnWaterRight
            | UnderwaterStop | UnderwaterForward | UnderwaterInertia | UnderwaterDiving
            | WaterDeath => WaterDeath,
            // releasing the block is all a dead Lara can do
            PushableGrab => Stop,
            other => other,
        }
    }

    #[test]
    fn dying_lara_asks_each_family_for_its_death_goal() {
        for id in LaraStateId::ALL {
            let mut h = Harness::flat();
            h.lara.health = 0;
            h.lara.goal_state = id;
            let mut coll = CollisionInfo::default();
            handler_for(id)
                .handle_input(&mut h.ctx(InputState::default()), &mut coll)
                .unwrap();
            assert_eq!(h.lara.goal_state, dying_goal(id), "from {id}");
        }
    }
}
