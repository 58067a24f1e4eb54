pub mod anim;
pub mod constants;
pub mod flags;
pub mod sound;
pub mod state;
pub mod stock;

pub use self::{
    anim::{AnimCommand, AnimDef, AnimationId, Frame, Transition, TransitionCase},
    flags::{CollisionPolicy, RoomFlags},
    sound::SoundId,
    state::{LaraStateId, StateError},
    stock::STOCK,
};

