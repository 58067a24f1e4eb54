//! Named tuning constants shared by the height probes and every state handler.
//!
//! Lengths are world units, speeds are units per tic, angles are `Angle`s.

use crate::units::Angle;

/* ---- grid ------------------------------------------------------------ */
pub const SECTOR_SIZE: i32 = 1024;
pub const QUARTER_SECTOR_SIZE: i32 = SECTOR_SIZE / 4;
/// `-HEIGHT_LIMIT` is the "no floor" sentinel of a solid sector.
pub const HEIGHT_LIMIT: i32 = 32512;
pub const NO_FLOOR: i32 = -HEIGHT_LIMIT;

/* ---- climbing -------------------------------------------------------- */
pub const CLIMB_LIMIT_2_CLICK_MIN: i32 = 384;
pub const CLIMB_LIMIT_2_CLICK_MAX: i32 = 640;
pub const CLIMB_LIMIT_3_CLICK_MAX: i32 = 896;
pub const JUMP_REACHABLE_HEIGHT: i32 = 1920;
pub const MAX_GRABBABLE_GRADIENT: i32 = 60;

/* ---- body ------------------------------------------------------------ */
pub const DEFAULT_COLLISION_RADIUS: i32 = 100;
pub const LARA_WALK_HEIGHT: i32 = 762;
pub const SCALP_HEIGHT: i32 = 220;
pub const SCALP_TO_HANDS_HEIGHT: i32 = 160;
pub const DEATH_COLLISION_RADIUS: i32 = 400;
/// Probe band a pulled-up Lara occupies above the floor.
pub const CLIMB_PROBE_HEIGHT: i32 = 870;

/* ---- falling --------------------------------------------------------- */
pub const FREE_FALL_SPEED_THRESHOLD: i32 = 131;
pub const DAMAGE_FALL_SPEED_THRESHOLD: i32 = 140;
pub const DEADLY_FALL_SPEED_THRESHOLD: i32 = 154;
pub const GRAVITY: i32 = 6;
pub const GRAVITY_TERMINAL: i32 = 1;
/// Fall speed from which the reduced gravity applies.
pub const TERMINAL_FALL_SPEED: i32 = 128;
/// Standing states fall once the floor is further below than this.
pub const STEP_DOWN_TOLERANCE: i32 = 100;

/* ---- vitals ---------------------------------------------------------- */
pub const LARA_HEALTH: i32 = 1000;
pub const LARA_AIR: i32 = 1800;
pub const AIR_REFILL_PER_TIC: i32 = 10;
pub const DROWN_DAMAGE_PER_TIC: i32 = 5;

/* ---- water ----------------------------------------------------------- */
pub const UNDERWATER_MAX_SPEED: i32 = 200;
pub const ON_WATER_MAX_SPEED: i32 = 60;
pub const UNDERWATER_RADIUS: i32 = 300;
pub const UNDERWATER_HEIGHT: i32 = 400;
pub const UNDERWATER_MIN_PROBE_HEIGHT: i32 = 200;
pub const ON_WATER_RADIUS: i32 = 100;
pub const ON_WATER_HEIGHT: i32 = 700;
pub const WATER_FRICTION: i32 = 6;
pub const SWIM_ACCELERATION: i32 = 8;
pub const SWIM_TO_DIVE_TICS: i32 = 10;
/// Maximum distance below the surface from which Lara surfaces.
pub const SURFACE_REACH: i32 = QUARTER_SECTOR_SIZE;
pub const CLIMB_OUT_MIN: i32 = -2 * QUARTER_SECTOR_SIZE;
pub const CLIMB_OUT_MAX: i32 = 316;

/* ---- turning --------------------------------------------------------- */
pub const LARA_TURN_RATE: Angle = Angle::from_degrees(2.25);
pub const LARA_JUMP_TURN: Angle = Angle::from_degrees(3.0);
pub const LARA_SLOW_TURN: Angle = Angle::from_degrees(4.0);
pub const LARA_MED_TURN: Angle = Angle::from_degrees(6.0);
pub const LARA_FAST_TURN: Angle = Angle::from_degrees(8.0);
pub const LARA_LEAN_RATE: Angle = Angle::from_degrees(1.5);
pub const LARA_LEAN_MAX: Angle = Angle::from_degrees(11.0);
pub const LARA_LEAN_UNDO: Angle = Angle::from_degrees(1.0);
pub const LARA_TURN_UNDO: Angle = Angle::from_degrees(2.0);
pub const WALL_SLIDE_TURN: Angle = Angle::from_degrees(5.0);

/* ---- alignment margins ----------------------------------------------- */
pub const GRAB_ALIGN_MARGIN: Angle = Angle::from_degrees(35.0);
pub const CLIMB_ALIGN_MARGIN: Angle = Angle::from_degrees(30.0);
pub const PROBE_AXIS_MARGIN: Angle = Angle::from_degrees(45.0);

/* ---- underwater attitude --------------------------------------------- */
pub const DIVE_PITCH_LIMIT: Angle = Angle::from_degrees(85.0);
pub const DIVE_ROLL_LIMIT: Angle = Angle::from_degrees(22.0);
