//! Table-driven animation playback for Lara.
//!
//! An animation belongs to exactly one state, so the state Lara is in always
//! follows from the animation playing. State changes happen in two ways only:
//! `advance` takes a transition whose frame window matches the goal state, or
//! an animation runs off its last frame and continues with its successor.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::defs::{AnimCommand, AnimDef, AnimationId, Frame, LaraStateId, SoundId, STOCK};
use crate::units::BoundingBox;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnimError {
    #[error("animation {0:?} is defined twice")]
    Duplicate(AnimationId),

    #[error("animation {0:?} does not exist")]
    Missing(AnimationId),

    #[error("frame {frame} is outside animation {anim:?}")]
    FrameOutOfRange { anim: AnimationId, frame: Frame },

    #[error("animation {anim:?} continues with missing animation {next:?}")]
    DanglingNext { anim: AnimationId, next: AnimationId },

    #[error("animation {anim:?} changes to missing animation {target:?}")]
    DanglingTransition { anim: AnimationId, target: AnimationId },

    #[error("animation {0:?} has no frames")]
    EmptyRange(AnimationId),
}

/// Which animation is playing and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimState {
    pub id: AnimationId,
    /// Absolute frame number.
    pub frame: Frame,
}

/// What one call to [`Animator::advance`] produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStep {
    /// Set when the playing animation changed.
    pub new_state: Option<LaraStateId>,
    /// Commands of an animation that just ran off its end.
    pub end_commands: SmallVec<[AnimCommand; 4]>,
    pub sounds: SmallVec<[SoundId; 2]>,
    /// Speed at the new frame, 16.16 fixed point.
    pub velocity: i32,
    pub acceleration: i32,
}

pub trait Animator {
    /// Start `id` at `frame`, or at its first frame. Returns the state the
    /// animation belongs to.
    fn set_animation(
        &self,
        anim: &mut AnimState,
        id: AnimationId,
        frame: Option<Frame>,
    ) -> Result<LaraStateId, AnimError>;

    /// Move one frame on, changing towards `goal` where the table allows it.
    fn advance(&self, anim: &mut AnimState, goal: LaraStateId) -> Result<FrameStep, AnimError>;

    /// Frame number counted from the start of the playing animation.
    fn local_frame(&self, anim: &AnimState) -> Result<Frame, AnimError>;

    fn bounding_box(&self, anim: &AnimState) -> Result<BoundingBox, AnimError>;

    /// State of the playing animation.
    fn state_of(&self, anim: &AnimState) -> Result<LaraStateId, AnimError>;
}

/// Validated animation table.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    anims: HashMap<AnimationId, AnimDef>,
}

impl AnimationSet {
    pub fn new(defs: Vec<AnimDef>) -> Result<Self, AnimError> {
        let mut anims = HashMap::with_capacity(defs.len());
        for def in defs {
            let id = def.id;
            if anims.insert(id, def).is_some() {
                log::error!("animation {id:?} defined twice");
                return Err(AnimError::Duplicate(id));
            }
        }
        let set = Self { anims };
        set.validate()?;
        Ok(set)
    }

    /// The built-in table.
    pub fn stock() -> Result<Self, AnimError> {
        Self::new(STOCK.clone())
    }

    #[inline]
    pub fn get(&self, id: AnimationId) -> Result<&AnimDef, AnimError> {
        self.anims.get(&id).ok_or(AnimError::Missing(id))
    }

    pub fn len(&self) -> usize {
        self.anims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anims.is_empty()
    }

    /// Check every frame range and every reference between animations.
    pub fn validate(&self) -> Result<(), AnimError> {
        for def in self.anims.values() {
            let id = def.id;
            if def.first_frame > def.last_frame {
                return Err(AnimError::EmptyRange(id));
            }

            let next = self.anims.get(&def.next).ok_or(AnimError::DanglingNext {
                anim: id,
                next: def.next,
            })?;
            if !next.contains_frame(def.next_frame) {
                return Err(AnimError::FrameOutOfRange {
                    anim: def.next,
                    frame: def.next_frame,
                });
            }

            for case in def.transitions.iter().flat_map(|t| t.cases.iter()) {
                let target = self.anims.get(&case.target).ok_or(AnimError::DanglingTransition {
                    anim: id,
                    target: case.target,
                })?;
                if !target.contains_frame(case.target_frame) {
                    return Err(AnimError::FrameOutOfRange {
                        anim: case.target,
                        frame: case.target_frame,
                    });
                }
                if case.first_frame > case.last_frame {
                    return Err(AnimError::EmptyRange(id));
                }
            }

            for cmd in &def.commands {
                if let AnimCommand::PlaySound { frame, .. } = *cmd {
                    if !def.contains_frame(frame) {
                        return Err(AnimError::FrameOutOfRange { anim: id, frame });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Animator for AnimationSet {
    fn set_animation(
        &self,
        anim: &mut AnimState,
        id: AnimationId,
        frame: Option<Frame>,
    ) -> Result<LaraStateId, AnimError> {
        let def = self.get(id)?;
        let frame = frame.unwrap_or(def.first_frame);
        if !def.contains_frame(frame) {
            log::error!("frame {frame} requested outside animation {id:?}");
            return Err(AnimError::FrameOutOfRange { anim: id, frame });
        }
        *anim = AnimState { id, frame };
        Ok(def.state)
    }

    fn advance(&self, anim: &mut AnimState, goal: LaraStateId) -> Result<FrameStep, AnimError> {
        let mut step = FrameStep::default();
        let mut def = self.get(anim.id)?;
        anim.frame += 1;

        if def.state != goal {
            // a transition covering the last frame may still fire on the wrap
            let probe = anim.frame.min(def.last_frame);
            let hit = def
                .transitions
                .iter()
                .filter(|t| t.goal == goal)
                .flat_map(|t| t.cases.iter())
                .find(|c| (c.first_frame..=c.last_frame).contains(&probe));
            if let Some(case) = hit {
                log::trace!("{:?} -> {:?} for goal {goal}", anim.id, case.target);
                anim.id = case.target;
                anim.frame = case.target_frame;
                def = self.get(case.target)?;
                step.new_state = Some(def.state);
            }
        }

        if anim.frame > def.last_frame {
            step.end_commands = def
                .commands
                .iter()
                .filter(|c| !matches!(c, AnimCommand::PlaySound { .. }))
                .copied()
                .collect();
            anim.id = def.next;
            anim.frame = def.next_frame;
            let prev_state = def.state;
            def = self.get(def.next)?;
            if def.state != prev_state || step.new_state.is_some() {
                step.new_state = Some(def.state);
            }
        }

        for cmd in &def.commands {
            if let AnimCommand::PlaySound { frame, sound } = *cmd {
                if frame == anim.frame {
                    step.sounds.push(sound);
                }
            }
        }

        let elapsed = (anim.frame - def.first_frame) as i32;
        step.velocity = def.velocity + def.acceleration * elapsed;
        step.acceleration = def.acceleration;
        Ok(step)
    }

    fn local_frame(&self, anim: &AnimState) -> Result<Frame, AnimError> {
        let def = self.get(anim.id)?;
        Ok(anim.frame.saturating_sub(def.first_frame))
    }

    fn bounding_box(&self, anim: &AnimState) -> Result<BoundingBox, AnimError> {
        Ok(self.get(anim.id)?.bbox)
    }

    fn state_of(&self, anim: &AnimState) -> Result<LaraStateId, AnimError> {
        Ok(self.get(anim.id)?.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::LaraStateId as S;

    fn stock() -> AnimationSet {
        AnimationSet::stock().expect("stock table is valid")
    }

    #[test]
    fn stock_table_validates() {
        let set = stock();
        assert_eq!(set.len(), STOCK.len());
    }

    #[test]
    fn duplicate_and_dangling_entries_are_rejected() {
        let a = AnimDef::new(AnimationId::STAY_SOLID, S::Stop, 185, 185);
        assert_eq!(
            AnimationSet::new(vec![a.clone(), a.clone()]).err(),
            Some(AnimError::Duplicate(AnimationId::STAY_SOLID))
        );
        let dangling = a.next(AnimationId::RUN, 0);
        assert_eq!(
            AnimationSet::new(vec![dangling]).err(),
            Some(AnimError::DanglingNext {
                anim: AnimationId::STAY_SOLID,
                next: AnimationId::RUN
            })
        );
    }

    #[test]
    fn goal_change_takes_the_matching_transition() {
        let set = stock();
        let mut anim = AnimState {
            id: AnimationId::STAY_SOLID,
            frame: 185,
        };
        let step = set.advance(&mut anim, S::RunForward).unwrap();
        assert_eq!(step.new_state, Some(S::RunForward));
        assert_eq!(anim.id, AnimationId::RUN);
    }

    #[test]
    fn unreachable_goal_keeps_the_state() {
        let set = stock();
        let mut anim = AnimState {
            id: AnimationId::STAY_SOLID,
            frame: 185,
        };
        for _ in 0..5 {
            let step = set.advance(&mut anim, S::OnWaterForward).unwrap();
            assert_eq!(step.new_state, None);
            assert_eq!(set.state_of(&anim).unwrap(), S::Stop);
        }
    }

    #[test]
    fn end_of_animation_reports_its_commands() {
        let set = stock();
        let mut anim = AnimState {
            id: AnimationId::JUMP_FORWARD_BEGIN,
            frame: 1202,
        };
        let step = set.advance(&mut anim, S::JumpForward).unwrap();
        assert_eq!(anim.id, AnimationId::CONTINUE_FLY_FORWARD);
        assert_eq!(step.new_state, None);
        assert!(matches!(
            step.end_commands.as_slice(),
            [AnimCommand::JumpVelocity { .. }]
        ));
    }

    #[test]
    fn sounds_fire_on_their_frame() {
        let set = stock();
        let mut anim = AnimState {
            id: AnimationId::RUN,
            frame: 4,
        };
        let step = set.advance(&mut anim, S::RunForward).unwrap();
        assert_eq!(step.sounds.as_slice(), &[SoundId::FOOTSTEP]);
        assert_eq!(step.velocity, 32 << 16);
    }

    #[test]
    fn set_animation_rejects_foreign_frames() {
        let set = stock();
        let mut anim = AnimState {
            id: AnimationId::STAY_SOLID,
            frame: 185,
        };
        assert_eq!(
            set.set_animation(&mut anim, AnimationId::RUN, Some(500)),
            Err(AnimError::FrameOutOfRange {
                anim: AnimationId::RUN,
                frame: 500
            })
        );
        assert_eq!(
            set.set_animation(&mut anim, AnimationId::HANG_IDLE, Some(1505)),
            Ok(S::Hang)
        );
    }
}
