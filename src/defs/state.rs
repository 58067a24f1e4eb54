//! Locomotion state ids, numbered as in the level files.

use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    /// Raw id outside `0 .. LaraStateId::COUNT`.
    #[error("unknown Lara state id {0}")]
    UnknownState(u16),
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaraStateId {
    WalkForward = 0,
    RunForward = 1,
    Stop = 2,
    JumpForward = 3,
    Pose = 4,
    RunBack = 5,
    TurnRightSlow = 6,
    TurnLeftSlow = 7,
    Death = 8,
    FreeFall = 9,
    Hang = 10,
    Reach = 11,
    Unknown12 = 12,
    UnderwaterStop = 13,
    GrabToFall = 14,
    JumpPrepare = 15,
    WalkBackward = 16,
    UnderwaterForward = 17,
    UnderwaterInertia = 18,
    Climbing = 19,
    TurnFast = 20,
    StepRight = 21,
    StepLeft = 22,
    RollBackward = 23,
    SlideForward = 24,
    JumpBack = 25,
    JumpLeft = 26,
    JumpRight = 27,
    JumpUp = 28,
    FallBackward = 29,
    ShimmyLeft = 30,
    ShimmyRight = 31,
    SlideBackward = 32,
    OnWaterStop = 33,
    OnWaterForward = 34,
    UnderwaterDiving = 35,
    PushablePush = 36,
    PushablePull = 37,
    PushableGrab = 38,
    PickUp = 39,
    SwitchDown = 40,
    SwitchUp = 41,
    InsertKey = 42,
    InsertPuzzle = 43,
    WaterDeath = 44,
    RollForward = 45,
    BoulderDeath = 46,
    OnWaterBackward = 47,
    OnWaterLeft = 48,
    OnWaterRight = 49,
    UseMidas = 50,
    MidasDeath = 51,
    SwandiveBegin = 52,
    SwandiveEnd = 53,
    Handstand = 54,
    OnWaterExit = 55,
}

impl LaraStateId {
    pub const COUNT: usize = 56;

    /// Every state, indexed by its raw id.
    pub const ALL: [LaraStateId; Self::COUNT] = {
        use LaraStateId::*;
        [
            WalkForward, RunForward, Stop, JumpForward, Pose, RunBack, TurnRightSlow,
            TurnLeftSlow, Death, FreeFall, Hang, Reach, Unknown12, UnderwaterStop, GrabToFall,
            JumpPrepare, WalkBackward, UnderwaterForward, UnderwaterInertia, Climbing, TurnFast,
            StepRight, StepLeft, RollBackward, SlideForward, JumpBack, JumpLeft, JumpRight,
            JumpUp, FallBackward, ShimmyLeft, ShimmyRight, SlideBackward, OnWaterStop,
            OnWaterForward, UnderwaterDiving, PushablePush, PushablePull, PushableGrab, PickUp,
            SwitchDown, SwitchUp, InsertKey, InsertPuzzle, WaterDeath, RollForward, BoulderDeath,
            OnWaterBackward, OnWaterLeft, OnWaterRight, UseMidas, MidasDeath, SwandiveBegin,
            SwandiveEnd, Handstand, OnWaterExit,
        ]
    };

    #[inline]
    pub fn raw(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for LaraStateId {
    type Error = StateError;

    fn try_from(raw: u16) -> Result<Self, StateError> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(StateError::UnknownState(raw))
    }
}

impl fmt::Display for LaraStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_raw_id() {
        for (i, id) in LaraStateId::ALL.iter().enumerate() {
            assert_eq!(id.raw() as usize, i);
        }
    }

    #[test]
    fn raw_ids_round_trip_and_reject_garbage() {
        assert_eq!(LaraStateId::try_from(10), Ok(LaraStateId::Hang));
        assert_eq!(LaraStateId::try_from(55), Ok(LaraStateId::OnWaterExit));
        assert_eq!(LaraStateId::try_from(56), Err(StateError::UnknownState(56)));
    }
}
