//! Tomb Raider style character locomotion core.
//!
//! * `units` – fixed-point angles, axes and boxes
//! * `defs`  – static game data (state ids, animation ids, tuning constants)
//! * `world` – rooms, sectors, floor data and height queries
//! * `sim`   – collision probes, animation, the Lara state machine and the tic runner

pub mod defs;
pub mod sim;
pub mod units;
pub mod world;
