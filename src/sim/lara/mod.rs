//! Lara's locomotion state machine.
//!
//! `state` holds her persistent data, `handler` the per-state trait and the
//! algorithms the states share, `states` the handlers themselves, `dispatch`
//! the id to handler table and `node` the per-tic driver.

pub mod dispatch;
pub mod handler;
pub mod node;
pub mod state;
pub mod states;

pub use dispatch::{handler_for, handler_for_raw};
pub use handler::{StateCtx, StateHandler, StateResult};
pub use node::LaraNode;
pub use state::{HandStatus, LaraState, Rotation, UnderwaterStatus};
