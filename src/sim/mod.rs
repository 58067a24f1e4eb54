pub mod anim;
pub mod collision;
pub mod components;
pub mod hooks;
pub mod items;
pub mod lara;
mod tic;

#[cfg(test)]
pub(crate) mod testing;

pub use anim::{AnimError, AnimState, AnimationSet, Animator};
pub use collision::CollisionInfo;
pub use components::{AxisMovement, InputState, ItemType};
pub use hooks::{CameraMode, Hooks, NullHooks};
pub use items::{Block, BlockMotion};
pub use lara::{LaraNode, LaraState};
pub use tic::{SIM_FPS, SimConfig, TicRunner, TickError};
