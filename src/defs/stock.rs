//! Stock animation table for Lara.
//!
//! Retail ids keep their retail frame numbers wherever the state handlers
//! address frames directly; the remaining animations are laid out after them.
//! The transition graph follows the retail one closely enough for every state
//! to be entered and left the way the handlers expect.

use glam::IVec3;
use once_cell::sync::Lazy;

use super::anim::{AnimCommand, AnimDef, AnimationId as A, Frame};
use super::{LaraStateId as S, SoundId};
use crate::units::BoundingBox;

/// Arms-up box used while jumping, reaching and hanging.
pub const REACH_BOX: BoundingBox =
    BoundingBox::new(IVec3::new(-110, -760, -110), IVec3::new(110, 0, 110));

/// Frame of `START_OBJECT_MOVING` at which a push or pull may start.
pub const PUSHABLE_READY_FRAME: Frame = 2091;
/// Frame of `PICKUP` at which the item is in Lara's hand.
pub const PICKUP_GRAB_FRAME: Frame = 3000;

const JUMP_FALL_SPEED: i32 = -20;
const JUMP_SPEED: i32 = 25;
const UP_JUMP_FALL_SPEED: i32 = -20;

pub static STOCK: Lazy<Vec<AnimDef>> = Lazy::new(build);

/* ---- shared edge sets ------------------------------------------------ */

/// Everything a standing Lara can start.
fn stop_edges(a: AnimDef) -> AnimDef {
    a.on(S::WalkForward, A::WALK_FORWARD, 22)
        .on(S::RunForward, A::RUN, 0)
        .on(S::WalkBackward, A::WALK_BACK, 964)
        .on(S::RunBack, A::RUN_BACK, 1380)
        .on(S::TurnRightSlow, A::TURN_RIGHT_SLOW, 186)
        .on(S::TurnLeftSlow, A::TURN_LEFT_SLOW, 206)
        .on(S::StepLeft, A::WALK_LEFT, 1074)
        .on(S::StepRight, A::WALK_RIGHT, 1103)
        .on(S::JumpPrepare, A::JUMP_PREPARE, 1160)
        .on(S::JumpUp, A::TRY_HANG_VERTICAL_BEGIN, 1420)
        .on(S::Death, A::STAY_TO_DEATH, 3088)
        .on(S::BoulderDeath, A::SQUASH_BOULDER, 3134)
        .on(S::PushableGrab, A::START_OBJECT_MOVING, 2076)
        .on(S::PickUp, A::PICKUP, 2980)
        .on(S::SwitchDown, A::PULL_SWITCH_DOWN, 994)
        .on(S::SwitchUp, A::PULL_SWITCH_UP, 1034)
        .on(S::InsertKey, A::USE_KEY, 2700)
        .on(S::InsertPuzzle, A::USE_PUZZLE, 2900)
        .on(S::UseMidas, A::USE_MIDAS, 4176)
        .on(S::Pose, A::POSE, 4020)
}

/// Landing, long fall and death for anything airborne.
fn air_edges(a: AnimDef, landing: A, landing_frame: Frame) -> AnimDef {
    a.on(S::Stop, landing, landing_frame)
        .on(S::FreeFall, A::FREE_FALL_LONG, 340)
        .on(S::Death, A::DEATH_BREAK, 388)
        .bbox(REACH_BOX)
}

fn forward_flight_edges(a: AnimDef) -> AnimDef {
    air_edges(a, A::LANDING_FORWARD_BOTH, 226)
        .on(S::Reach, A::FLY_FORWARD_TRY_TO_HANG, 700)
        .on(S::SwandiveBegin, A::SWANDIVE_BEGIN, 4080)
        .on(S::RunForward, A::LANDING_FROM_RUN, 1450)
}

fn hang_edges(a: AnimDef) -> AnimDef {
    a.on(S::ShimmyLeft, A::CLIMB_LEFT, 3040)
        .on(S::ShimmyRight, A::CLIMB_RIGHT, 3064)
        .on(S::Climbing, A::CLIMB_ON, 1521)
        .on(S::Handstand, A::HANDSTAND, 4106)
        .bbox(REACH_BOX)
}

fn on_water_edges(a: AnimDef) -> AnimDef {
    a.on(S::OnWaterForward, A::ONWATER_SWIM_FORWARD, 1974)
        .on(S::OnWaterBackward, A::ONWATER_SWIM_BACK, 3200)
        .on(S::OnWaterLeft, A::ONWATER_SWIM_LEFT, 3260)
        .on(S::OnWaterRight, A::ONWATER_SWIM_RIGHT, 3282)
        .on(S::WaterDeath, A::ONWATER_DEATH, 2780)
}

fn swim_stop_edges(a: AnimDef) -> AnimDef {
    a.on(S::OnWaterStop, A::ONWATER_IDLE, 1800)
        .on(S::WaterDeath, A::ONWATER_DEATH, 2780)
}

fn jump_begin(id: A, state: S, first: Frame, last: Frame, flight: A) -> AnimDef {
    AnimDef::new(id, state, first, last)
        .next(flight, last + 1)
        .command(AnimCommand::JumpVelocity {
            fall_speed: JUMP_FALL_SPEED,
            speed: JUMP_SPEED,
        })
        .on(S::Death, A::DEATH_BREAK, 388)
}

fn climb(id: A, first: Frame, last: Frame, offset: IVec3) -> AnimDef {
    AnimDef::new(id, S::Climbing, first, last)
        .next(A::STAY_SOLID, 185)
        .command(AnimCommand::SetPosition(offset))
        .command(AnimCommand::EmptyHands)
        .bbox(REACH_BOX)
}

fn build() -> Vec<AnimDef> {
    vec![
        /* ---- ground locomotion ----------------------------------------- */
        AnimDef::new(A::RUN, S::RunForward, 0, 21)
            .speed(32, 0)
            .command(AnimCommand::PlaySound { frame: 5, sound: SoundId::FOOTSTEP })
            .command(AnimCommand::PlaySound { frame: 16, sound: SoundId::FOOTSTEP })
            .on(S::WalkForward, A::WALK_FORWARD, 22)
            .on_frames(S::Stop, 0, 10, A::RUN_TO_STAY_LEFT, 140)
            .on_frames(S::Stop, 11, 21, A::RUN_TO_STAY_RIGHT, 155)
            .on(S::JumpForward, A::JUMP_FORWARD_BEGIN, 1192)
            .on(S::Death, A::STAY_TO_DEATH, 3088),
        AnimDef::new(A::WALK_FORWARD, S::WalkForward, 22, 57)
            .speed(12, 0)
            .on(S::RunForward, A::RUN, 0)
            .on_frames(S::Stop, 22, 28, A::END_WALK_RIGHT, 58)
            .on_frames(S::Stop, 48, 57, A::END_WALK_RIGHT, 58)
            .on_frames(S::Stop, 29, 47, A::END_WALK_LEFT, 74),
        AnimDef::new(A::END_WALK_RIGHT, S::Stop, 58, 73).next(A::STAY_SOLID, 185),
        AnimDef::new(A::END_WALK_LEFT, S::Stop, 74, 86).next(A::STAY_SOLID, 185),
        AnimDef::new(A::RUN_TO_STAY_LEFT, S::Stop, 140, 154)
            .speed(12, -(1 << 16))
            .next(A::STAY_SOLID, 185),
        AnimDef::new(A::RUN_TO_STAY_RIGHT, S::Stop, 155, 169)
            .speed(12, -(1 << 16))
            .next(A::STAY_SOLID, 185),
        stop_edges(AnimDef::new(A::STAY_SOLID, S::Stop, 185, 185)),
        stop_edges(AnimDef::new(A::STAY_IDLE, S::Stop, 1637, 1676)),
        AnimDef::new(A::TURN_RIGHT_SLOW, S::TurnRightSlow, 186, 205)
            .on(S::Stop, A::STAY_SOLID, 185)
            .on(S::TurnFast, A::TURN_FAST, 4000)
            .on(S::WalkForward, A::WALK_FORWARD, 22)
            .on(S::RunForward, A::RUN, 0),
        AnimDef::new(A::TURN_LEFT_SLOW, S::TurnLeftSlow, 206, 225)
            .on(S::Stop, A::STAY_SOLID, 185)
            .on(S::TurnFast, A::TURN_FAST, 4000)
            .on(S::WalkForward, A::WALK_FORWARD, 22)
            .on(S::RunForward, A::RUN, 0),
        AnimDef::new(A::TURN_FAST, S::TurnFast, 4000, 4019).on(S::Stop, A::STAY_SOLID, 185),
        AnimDef::new(A::POSE, S::Pose, 4020, 4059).on(S::Stop, A::STAY_SOLID, 185),
        AnimDef::new(A::WALK_BACK, S::WalkBackward, 964, 993)
            .speed(8, 0)
            .on(S::Stop, A::STAY_SOLID, 185),
        AnimDef::new(A::RUN_BACK, S::RunBack, 1380, 1400)
            .speed(16, -(1 << 15))
            .next(A::STAY_SOLID, 185),
        AnimDef::new(A::WALK_LEFT, S::StepLeft, 1074, 1093)
            .speed(8, 0)
            .on(S::Stop, A::STAY_SOLID, 185),
        AnimDef::new(A::WALK_RIGHT, S::StepRight, 1103, 1122)
            .speed(8, 0)
            .on(S::Stop, A::STAY_SOLID, 185),
        AnimDef::new(A::RUN_UP_STEP_RIGHT, S::RunForward, 830, 836).speed(32, 0).next(A::RUN, 0),
        AnimDef::new(A::RUN_UP_STEP_LEFT, S::RunForward, 837, 843).speed(32, 0).next(A::RUN, 11),
        AnimDef::new(A::WALK_UP_STEP_RIGHT, S::WalkForward, 844, 857).speed(12, 0).next(A::WALK_FORWARD, 22),
        AnimDef::new(A::WALK_UP_STEP_LEFT, S::WalkForward, 858, 873).speed(12, 0).next(A::WALK_FORWARD, 40),
        AnimDef::new(A::WALK_DOWN_LEFT, S::WalkForward, 874, 886).speed(12, 0).next(A::WALK_FORWARD, 40),
        AnimDef::new(A::WALK_DOWN_RIGHT, S::WalkForward, 887, 898).speed(12, 0).next(A::WALK_FORWARD, 22),
        AnimDef::new(A::WALK_DOWN_BACK_LEFT, S::WalkBackward, 899, 929).speed(8, 0).next(A::WALK_BACK, 964),
        AnimDef::new(A::WALK_DOWN_BACK_RIGHT, S::WalkBackward, 930, 963).speed(8, 0).next(A::WALK_BACK, 979),
        AnimDef::new(A::WALL_SMASH_LEFT, S::Unknown12, 800, 814).next(A::STAY_SOLID, 185),
        AnimDef::new(A::WALL_SMASH_RIGHT, S::Unknown12, 815, 829).next(A::STAY_SOLID, 185),
        AnimDef::new(A::ROLL_BEGIN, S::RollForward, 3857, 3871)
            .speed(10, 0)
            .next(A::ROLL_ALTERNATE, 3872),
        AnimDef::new(A::ROLL_ALTERNATE, S::RollForward, 3872, 3889)
            .speed(4, 0)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::Turn180),
        AnimDef::new(A::ROLL_BACKWARD, S::RollBackward, 4060, 4079)
            .speed(8, 0)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::Turn180),
        /* ---- jumping --------------------------------------------------- */
        AnimDef::new(A::JUMP_PREPARE, S::JumpPrepare, 1160, 1169)
            .next(A::TRY_HANG_VERTICAL_BEGIN, 1420)
            .on(S::JumpForward, A::JUMP_FORWARD_BEGIN, 1192)
            .on(S::JumpBack, A::JUMP_BACK_BEGIN, 1170)
            .on(S::JumpLeft, A::JUMP_LEFT_BEGIN, 1214)
            .on(S::JumpRight, A::JUMP_RIGHT_BEGIN, 1236)
            .on(S::FreeFall, A::FREE_FALL_LONG, 340)
            .on(S::Stop, A::STAY_SOLID, 185),
        jump_begin(A::JUMP_BACK_BEGIN, S::JumpBack, 1170, 1180, A::JUMP_BACK),
        air_edges(AnimDef::new(A::JUMP_BACK, S::JumpBack, 1181, 1191), A::LANDING_MIDDLE, 1258),
        jump_begin(A::JUMP_FORWARD_BEGIN, S::JumpForward, 1192, 1202, A::CONTINUE_FLY_FORWARD),
        forward_flight_edges(AnimDef::new(A::CONTINUE_FLY_FORWARD, S::JumpForward, 1203, 1213)),
        jump_begin(A::JUMP_LEFT_BEGIN, S::JumpLeft, 1214, 1224, A::JUMP_LEFT),
        air_edges(AnimDef::new(A::JUMP_LEFT, S::JumpLeft, 1225, 1235), A::LANDING_MIDDLE, 1258),
        jump_begin(A::JUMP_RIGHT_BEGIN, S::JumpRight, 1236, 1246, A::JUMP_RIGHT),
        air_edges(AnimDef::new(A::JUMP_RIGHT, S::JumpRight, 1247, 1257), A::LANDING_MIDDLE, 1258),
        AnimDef::new(A::TRY_HANG_VERTICAL_BEGIN, S::JumpUp, 1420, 1428)
            .next(A::TRY_HANG_VERTICAL, 448)
            .command(AnimCommand::JumpVelocity {
                fall_speed: UP_JUMP_FALL_SPEED,
                speed: 0,
            })
            .bbox(REACH_BOX),
        air_edges(AnimDef::new(A::TRY_HANG_VERTICAL, S::JumpUp, 448, 466), A::LANDING_LIGHT, 467),
        forward_flight_edges(AnimDef::new(A::FREE_FALL_FORWARD, S::JumpForward, 492, 503)),
        air_edges(AnimDef::new(A::FREE_FALL_BACK, S::FallBackward, 1473, 1480), A::LANDING_MIDDLE, 1258)
            .on(S::Reach, A::FLY_FORWARD_TRY_TO_HANG, 700),
        air_edges(AnimDef::new(A::FLY_FORWARD_TRY_TO_HANG, S::Reach, 700, 711), A::LANDING_FORWARD_BOTH, 226),
        AnimDef::new(A::SMASH_JUMP, S::FreeFall, 481, 491)
            .next(A::FREE_FALL_LONG, 340)
            .on(S::Death, A::DEATH_BREAK, 388),
        AnimDef::new(A::FREE_FALL_LONG, S::FreeFall, 340, 357)
            .on(S::Death, A::DEATH_BREAK, 388)
            .on(S::Stop, A::LANDING_HARD, 358),
        air_edges(AnimDef::new(A::SWANDIVE_BEGIN, S::SwandiveBegin, 4080, 4095), A::LANDING_FORWARD_BOTH, 226)
            .on(S::SwandiveEnd, A::SWANDIVE_END, 4096)
            .on(S::UnderwaterDiving, A::FREE_FALL_TO_UNDERWATER, 1895),
        AnimDef::new(A::SWANDIVE_END, S::SwandiveEnd, 4096, 4105)
            .on(S::Stop, A::LANDING_HARD, 358)
            .on(S::Death, A::DEATH_BREAK, 388)
            .on(S::UnderwaterDiving, A::FREE_FALL_TO_UNDERWATER, 1895),
        /* ---- landing --------------------------------------------------- */
        AnimDef::new(A::LANDING_FORWARD_BOTH, S::GrabToFall, 226, 257).next(A::STAY_SOLID, 185),
        AnimDef::new(A::LANDING_MIDDLE, S::GrabToFall, 1258, 1281).next(A::STAY_SOLID, 185),
        AnimDef::new(A::LANDING_LIGHT, S::GrabToFall, 467, 480).next(A::STAY_SOLID, 185),
        AnimDef::new(A::LANDING_HARD, S::Stop, 358, 387)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::PlaySound { frame: 358, sound: SoundId::LARA_LAND }),
        AnimDef::new(A::LANDING_FROM_RUN, S::RunForward, 1450, 1472).speed(20, 0).next(A::RUN, 0),
        AnimDef::new(A::DEATH_BREAK, S::Death, 388, 447).hold(),
        /* ---- hanging and climbing ----------------------------------------- */
        hang_edges(AnimDef::new(A::HANG_IDLE, S::Hang, 1493, 1520).next(A::HANG_IDLE, 1514)),
        hang_edges(AnimDef::new(A::OSCILLATE_HANG_ON, S::Hang, 3974, 3994).next(A::HANG_IDLE, 1514)),
        AnimDef::new(A::CLIMB_LEFT, S::ShimmyLeft, 3040, 3063)
            .speed(6, 0)
            .on(S::Hang, A::HANG_IDLE, 1514)
            .bbox(REACH_BOX),
        AnimDef::new(A::CLIMB_RIGHT, S::ShimmyRight, 3064, 3087)
            .speed(6, 0)
            .on(S::Hang, A::HANG_IDLE, 1514)
            .bbox(REACH_BOX),
        climb(A::CLIMB_ON, 1521, 1574, IVec3::new(0, -760, 200)),
        climb(A::CLIMB_2CLICK, 759, 799, IVec3::new(0, -512, 256)),
        climb(A::CLIMB_3CLICK, 614, 664, IVec3::new(0, -768, 256)),
        AnimDef::new(A::HANDSTAND, S::Handstand, 4106, 4175)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::SetPosition(IVec3::new(0, -760, 200)))
            .command(AnimCommand::EmptyHands)
            .bbox(REACH_BOX),
        /* ---- sliding ----------------------------------------------------- */
        AnimDef::new(A::SLIDE_FORWARD, S::SlideForward, 1133, 1144)
            .speed(40, 0)
            .on(S::Stop, A::STAY_SOLID, 185)
            .on(S::JumpForward, A::JUMP_FORWARD_BEGIN, 1192),
        AnimDef::new(A::START_SLIDE_BACKWARD, S::SlideBackward, 1677, 1688)
            .speed(40, 0)
            .next(A::SLIDE_BACKWARD, 1689)
            .on(S::Stop, A::STAY_SOLID, 185)
            .on(S::JumpBack, A::JUMP_BACK_BEGIN, 1170),
        AnimDef::new(A::SLIDE_BACKWARD, S::SlideBackward, 1689, 1700)
            .speed(40, 0)
            .on(S::Stop, A::STAY_SOLID, 185)
            .on(S::JumpBack, A::JUMP_BACK_BEGIN, 1170),
        /* ---- on the surface ---------------------------------------------- */
        on_water_edges(AnimDef::new(A::ONWATER_IDLE, S::OnWaterStop, 1800, 1831)),
        on_water_edges(AnimDef::new(A::UNDERWATER_TO_ONWATER, S::OnWaterStop, 1937, 1950).next(A::ONWATER_IDLE, 1800)),
        swim_stop_edges(AnimDef::new(A::ONWATER_SWIM_FORWARD, S::OnWaterForward, 1974, 1995)),
        swim_stop_edges(AnimDef::new(A::ONWATER_SWIM_BACK, S::OnWaterBackward, 3200, 3230)),
        swim_stop_edges(AnimDef::new(A::ONWATER_SWIM_LEFT, S::OnWaterLeft, 3260, 3281)),
        swim_stop_edges(AnimDef::new(A::ONWATER_SWIM_RIGHT, S::OnWaterRight, 3282, 3303)),
        AnimDef::new(A::ONWATER_DEATH, S::WaterDeath, 2780, 2819).hold(),
        AnimDef::new(A::ONWATER_DIVE, S::UnderwaterDiving, 1951, 1973).next(A::UNDERWATER_SWIM_FORWARD, 1290),
        AnimDef::new(A::CLIMB_OUT_OF_WATER, S::OnWaterExit, 1849, 1894)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        /* ---- underwater -------------------------------------------------- */
        AnimDef::new(A::UNDERWATER_IDLE, S::UnderwaterStop, 1735, 1774)
            .on(S::UnderwaterForward, A::UNDERWATER_SWIM_FORWARD, 1290)
            .on(S::WaterDeath, A::UNDERWATER_DEATH, 2364),
        AnimDef::new(A::UNDERWATER_SWIM_FORWARD, S::UnderwaterForward, 1290, 1307)
            .command(AnimCommand::PlaySound { frame: 1290, sound: SoundId::LARA_SWIM })
            .on(S::UnderwaterInertia, A::UNDERWATER_SWIM_SOLID, 1308)
            .on(S::WaterDeath, A::UNDERWATER_DEATH, 2364),
        AnimDef::new(A::UNDERWATER_SWIM_SOLID, S::UnderwaterInertia, 1308, 1367)
            .on(S::UnderwaterStop, A::UNDERWATER_IDLE, 1735)
            .on(S::UnderwaterForward, A::UNDERWATER_SWIM_FORWARD, 1290)
            .on(S::WaterDeath, A::UNDERWATER_DEATH, 2364),
        AnimDef::new(A::FREE_FALL_TO_UNDERWATER, S::UnderwaterDiving, 1895, 1912)
            .next(A::UNDERWATER_SWIM_FORWARD, 1290),
        AnimDef::new(A::FREE_FALL_TO_UNDERWATER_ALTERNATE, S::UnderwaterDiving, 2041, 2058)
            .next(A::UNDERWATER_SWIM_FORWARD, 1290),
        AnimDef::new(A::UNDERWATER_DEATH, S::WaterDeath, 2364, 2409).hold(),
        /* ---- interaction ------------------------------------------------- */
        AnimDef::new(A::START_OBJECT_MOVING, S::PushableGrab, 2076, PUSHABLE_READY_FRAME)
            .next(A::START_OBJECT_MOVING, PUSHABLE_READY_FRAME)
            .on_frames(S::PushablePush, PUSHABLE_READY_FRAME, PUSHABLE_READY_FRAME, A::OBJECT_PUSH, 2236)
            .on_frames(S::PushablePull, PUSHABLE_READY_FRAME, PUSHABLE_READY_FRAME, A::OBJECT_PULL, 2108)
            .on(S::Stop, A::STOP_OBJECT_MOVING, 2092),
        AnimDef::new(A::STOP_OBJECT_MOVING, S::Stop, 2092, 2107)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        AnimDef::new(A::OBJECT_PULL, S::PushablePull, 2108, 2235)
            .speed(-8, 0)
            .next(A::START_OBJECT_MOVING, PUSHABLE_READY_FRAME)
            .command(AnimCommand::PlaySound { frame: 2108, sound: SoundId::PUSHABLE_SCRAPE }),
        AnimDef::new(A::OBJECT_PUSH, S::PushablePush, 2236, 2363)
            .speed(8, 0)
            .next(A::START_OBJECT_MOVING, PUSHABLE_READY_FRAME)
            .command(AnimCommand::PlaySound { frame: 2236, sound: SoundId::PUSHABLE_SCRAPE }),
        AnimDef::new(A::PICKUP, S::PickUp, 2980, 3039)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        AnimDef::new(A::PULL_SWITCH_DOWN, S::SwitchDown, 994, 1033)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        AnimDef::new(A::PULL_SWITCH_UP, S::SwitchUp, 1034, 1073)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        AnimDef::new(A::USE_KEY, S::InsertKey, 2700, 2779)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        AnimDef::new(A::USE_PUZZLE, S::InsertPuzzle, 2900, 2979)
            .next(A::STAY_SOLID, 185)
            .command(AnimCommand::EmptyHands),
        AnimDef::new(A::USE_MIDAS, S::UseMidas, 4176, 4235)
            .next(A::STAY_SOLID, 185)
            .on(S::MidasDeath, A::MIDAS_DEATH, 4236),
        /* ---- deaths ------------------------------------------------------ */
        AnimDef::new(A::STAY_TO_DEATH, S::Death, 3088, 3133).hold(),
        AnimDef::new(A::SQUASH_BOULDER, S::BoulderDeath, 3134, 3163).hold(),
        AnimDef::new(A::MIDAS_DEATH, S::MidasDeath, 4236, 4295).hold(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_state_has_an_animation() {
        let states: HashSet<S> = STOCK.iter().map(|a| a.state).collect();
        for id in S::ALL {
            assert!(states.contains(&id), "no stock animation for {id}");
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut seen = HashSet::new();
        for a in STOCK.iter() {
            assert!(seen.insert(a.id), "duplicate animation {:?}", a.id);
        }
    }
}
