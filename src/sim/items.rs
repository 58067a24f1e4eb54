//! Pushable blocks.
//!
//! A resting block raises the floor of its sector by one sector height, so
//! it needs no collision of its own. Pushing frees the sector, drags the
//! block along with Lara and raises the floor again where it comes to rest.
//! Level patches are queued and applied by the tic runner once every system
//! has finished reading the level.

use glam::IVec3;

use super::anim::Animator;
use super::components::{AxisMovement, InputState};
use super::hooks::Hooks;
use super::lara::handler::{StateCtx, StateResult};
use super::lara::state::{HandStatus, LaraState};
use crate::defs::constants::{LARA_WALK_HEIGHT, NO_FLOOR, SECTOR_SIZE};
use crate::defs::stock::PUSHABLE_READY_FRAME;
use crate::defs::{LaraStateId, SoundId};
use crate::units::{Angle, Axis, axis_from_angle};
use crate::world::{HeightInfo, Level, RoomPos};

/// Where Lara may stand, in the block's frame: x across its face, z along
/// the push direction.
const REACH_X: (i32, i32) = (-300, 200);
const REACH_Z: (i32, i32) = (-SECTOR_SIZE / 2 - 180, -SECTOR_SIZE / 2);
const REACH_YAW: Angle = Angle::from_degrees(30.0);
const GRAB_MARGIN: Angle = Angle::from_degrees(45.0);
/// Distance between Lara and the block face once she has a grip.
const GRIP_GAP: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMotion {
    Resting,
    Moving {
        /// Lara's position when the move started.
        lara_origin: IVec3,
        block_origin: IVec3,
        axis: Axis,
        /// `1` for a push, `-1` for a pull.
        dir: i32,
    },
}

/// A pushable block, one sector wide and one sector high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub yaw: Angle,
    pub motion: BlockMotion,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            yaw: Angle::ZERO,
            motion: BlockMotion::Resting,
        }
    }
}

/// Level change a block asked for during the tic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPatch {
    pub at: RoomPos,
    /// `-SECTOR_SIZE` raises the floor, `SECTOR_SIZE` frees it again.
    pub height: i32,
    /// Set when the block came to rest here; its floor sequence fires.
    pub settled: bool,
}

/* ---- level queries --------------------------------------------------- */

fn floor_at(level: &Level, at: RoomPos) -> i32 {
    let mut room = at.room;
    let sector = level.find_real_floor_sector(at.pos, &mut room);
    HeightInfo::from_floor(level, sector, at.pos).y
}

fn ceiling_at(level: &Level, at: RoomPos) -> i32 {
    let mut room = at.room;
    let sector = level.find_real_floor_sector(at.pos, &mut room);
    HeightInfo::from_ceiling(level, sector, at.pos).y
}

fn offset(at: RoomPos, d: IVec3) -> RoomPos {
    RoomPos::new(at.pos + d, at.room)
}

/// `true` if nothing was stacked on the block.
pub fn is_on_floor(level: &Level, at: RoomPos) -> bool {
    let mut room = at.room;
    let floor = level.find_real_floor_sector(at.pos, &mut room).floor_height;
    floor == NO_FLOOR || floor == at.pos.y - SECTOR_SIZE
}

/// Free floor at `at` and room for something `height` tall above it.
fn has_room(level: &Level, at: RoomPos, height: i32) -> bool {
    floor_at(level, at) == at.pos.y && ceiling_at(level, offset(at, IVec3::new(0, -height, 0))) <= at.pos.y - height
}

/// The block at `at` can move one sector along `axis`.
pub fn can_push_block(level: &Level, at: RoomPos, axis: Axis) -> bool {
    is_on_floor(level, at) && has_room(level, offset(at, axis.step() * SECTOR_SIZE), SECTOR_SIZE)
}

/// The block at `at` can come one sector back against `axis`, with Lara
/// backing off a sector ahead of it.
pub fn can_pull_block(level: &Level, at: RoomPos, axis: Axis) -> bool {
    let back = -axis.step() * SECTOR_SIZE;
    is_on_floor(level, at)
        && has_room(level, offset(at, back), SECTOR_SIZE)
        && has_room(level, offset(at, back * 2), LARA_WALK_HEIGHT)
}

/* ---- interaction ----------------------------------------------------- */

/// Lara's position in the frame of a block facing `yaw`.
fn local_to_block(lara: IVec3, block: IVec3, yaw: Angle) -> IVec3 {
    let d = lara - block;
    let (s, c) = (yaw.sin(), yaw.cos());
    IVec3::new(
        (d.x as f64 * c - d.z as f64 * s) as i32,
        d.y,
        (d.x as f64 * s + d.z as f64 * c) as i32,
    )
}

fn in_reach(lara: &LaraState, block: IVec3, yaw: Angle) -> bool {
    let local = local_to_block(lara.pos(), block, yaw);
    (REACH_X.0..=REACH_X.1).contains(&local.x)
        && (REACH_Z.0..=REACH_Z.1).contains(&local.z)
        && (lara.rotation.y - yaw).abs() <= REACH_YAW
}

/// Put Lara flush against the face of the block in front of her.
fn snap_to_face(lara: &mut LaraState, axis: Axis) {
    let pos = lara.pos_mut();
    let base = |v: i32| v.div_euclid(SECTOR_SIZE) * SECTOR_SIZE;
    match axis {
        Axis::PosZ => pos.z = base(pos.z) + SECTOR_SIZE - GRIP_GAP,
        Axis::NegZ => pos.z = base(pos.z) + GRIP_GAP,
        Axis::PosX => pos.x = base(pos.x) + SECTOR_SIZE - GRIP_GAP,
        Axis::NegX => pos.x = base(pos.x) + GRIP_GAP,
    }
}

/// Let Lara grab a resting block or start moving the one she holds.
fn interact(
    ctx: &mut StateCtx<'_>,
    block: &mut Block,
    at: RoomPos,
    patches: &mut Vec<BlockPatch>,
) -> StateResult {
    if !ctx.input.action
        || block.motion != BlockMotion::Resting
        || ctx.lara.falling
        || ctx.lara.pos().y != at.pos.y
        || ctx.lara.is_dying()
    {
        return Ok(());
    }
    let Some(axis) = axis_from_angle(ctx.lara.rotation.y, GRAB_MARGIN) else {
        return Ok(());
    };

    match ctx.current() {
        LaraStateId::Stop => {
            if ctx.input.z_movement != AxisMovement::Null
                || ctx.lara.hand_status != HandStatus::None
            {
                return Ok(());
            }
            block.yaw = axis.angle();
            if !in_reach(ctx.lara, at.pos, block.yaw) {
                return Ok(());
            }
            ctx.lara.rotation.y = block.yaw;
            snap_to_face(ctx.lara, axis);
            ctx.set_goal(LaraStateId::PushableGrab);
            ctx.update_impl()?;
            if ctx.current() == LaraStateId::PushableGrab {
                log::debug!("Lara grabs the block at {}", at.pos);
                ctx.lara.hand_status = HandStatus::Grabbing;
            }
        }
        LaraStateId::PushableGrab
            if ctx.frame() == PUSHABLE_READY_FRAME && in_reach(ctx.lara, at.pos, axis.angle()) =>
        {
            let (goal, dir) = match ctx.input.z_movement {
                AxisMovement::Forward if can_push_block(ctx.level, at, axis) => {
                    (LaraStateId::PushablePush, 1)
                }
                AxisMovement::Backward if can_pull_block(ctx.level, at, axis) => {
                    (LaraStateId::PushablePull, -1)
                }
                _ => return Ok(()),
            };
            block.motion = BlockMotion::Moving {
                lara_origin: ctx.lara.pos(),
                block_origin: at.pos,
                axis,
                dir,
            };
            patches.push(BlockPatch {
                at,
                height: SECTOR_SIZE,
                settled: false,
            });
            ctx.set_goal(goal);
            ctx.update_impl()?;
            // one move per grab; the next one is decided here again
            ctx.set_goal(LaraStateId::PushableGrab);
            log::debug!("block at {} starts moving {axis:?} ({dir})", at.pos);
        }
        _ => {}
    }
    Ok(())
}

/// Drag a moving block along with Lara, or set it down once she is done.
fn carry(
    lara: &LaraState,
    level: &Level,
    hooks: &mut dyn Hooks,
    block: &mut Block,
    at: &mut RoomPos,
    patches: &mut Vec<BlockPatch>,
) {
    let BlockMotion::Moving {
        lara_origin,
        block_origin,
        axis,
        dir,
    } = block.motion
    else {
        return;
    };

    let moving = matches!(
        lara.current_state,
        LaraStateId::PushablePush | LaraStateId::PushablePull
    );
    if moving {
        let shift = lara.pos() - lara_origin;
        at.pos.x = block_origin.x + shift.x;
        at.pos.z = block_origin.z + shift.z;
    } else {
        at.pos = block_origin + axis.step() * (dir * SECTOR_SIZE);
    }
    let mut room = at.room;
    level.find_real_floor_sector(at.pos, &mut room);
    at.room = room;

    if !moving {
        block.motion = BlockMotion::Resting;
        hooks.play_sound(SoundId::TREX_FOOTSTEP);
        patches.push(BlockPatch {
            at: *at,
            height: -SECTOR_SIZE,
            settled: true,
        });
        log::debug!("block settles at {} in room {}", at.pos, at.room);
    }
}

/// Run the interaction and movement of every block against Lara.
pub fn block_system(
    world: &hecs::World,
    lara: &mut LaraState,
    level: &Level,
    anims: &dyn Animator,
    hooks: &mut dyn Hooks,
    input: InputState,
    patches: &mut Vec<BlockPatch>,
) -> StateResult {
    for (_, (block, at)) in world.query::<(&mut Block, &mut RoomPos)>().iter() {
        let mut ctx = StateCtx {
            lara: &mut *lara,
            level,
            anims,
            hooks: &mut *hooks,
            input,
        };
        interact(&mut ctx, block, *at, patches)?;
        carry(lara, level, hooks, block, at, patches);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anim::AnimationSet;
    use crate::sim::testing::RecordingHooks;
    use crate::world::LevelBuilder;

    fn raise_block(level: &mut Level, at: RoomPos) {
        level.patch_heights_for_block(at.pos, at.room, -SECTOR_SIZE).unwrap();
    }

    /// 6x6 room, floor 0, with a block raised on sector (2, 3).
    fn level_with_block() -> (Level, RoomPos) {
        let mut level = LevelBuilder::new().room(0, 0, 6, 6, 0, -2048).build();
        let at = RoomPos::new(IVec3::new(2560, 0, 3584), 0);
        raise_block(&mut level, at);
        (level, at)
    }

    #[test]
    fn resting_block_reads_as_on_floor() {
        let (level, at) = level_with_block();
        assert!(is_on_floor(&level, at));
        assert_eq!(floor_at(&level, at), -SECTOR_SIZE);
    }

    #[test]
    fn push_needs_open_floor_beyond() {
        let (mut level, at) = level_with_block();
        assert!(can_push_block(&level, at, Axis::PosZ));
        // the room's outer wall is one sector further on
        let edge = RoomPos::new(IVec3::new(2560, 0, 4608), 0);
        raise_block(&mut level, edge);
        assert!(!can_push_block(&level, edge, Axis::PosZ));
        // and the first block now has the second one in its way
        assert!(!can_push_block(&level, at, Axis::PosZ));
    }

    #[test]
    fn pull_needs_room_for_lara_too() {
        let (level, at) = level_with_block();
        assert!(can_pull_block(&level, at, Axis::PosZ));

        let mut cramped = LevelBuilder::new()
            .room(0, 0, 6, 6, 0, -2048)
            .wall(0, 2, 1)
            .build();
        raise_block(&mut cramped, at);
        assert!(!can_pull_block(&cramped, at, Axis::PosZ));
    }

    #[test]
    fn block_frame_puts_lara_in_front_at_negative_z() {
        let local = local_to_block(
            IVec3::new(2560, 0, 2984),
            IVec3::new(2560, 0, 3584),
            Angle::ZERO,
        );
        assert_eq!(local, IVec3::new(0, 0, -600));
        let turned = local_to_block(
            IVec3::new(1960, 0, 3584),
            IVec3::new(2560, 0, 3584),
            Angle::from_degrees(90.0),
        );
        assert_eq!(turned.z, -600);
        assert!(turned.x.abs() <= 1);
    }

    #[test]
    fn grabbing_snaps_lara_to_the_face() {
        let (level, at) = level_with_block();
        let anims = AnimationSet::stock().unwrap();
        let mut hooks = RecordingHooks::default();
        let mut lara = LaraState::new(IVec3::new(2600, 0, 2984), 0, Angle::from_degrees(10.0));
        let mut block = Block::default();
        let mut patches = Vec::new();
        let mut ctx = StateCtx {
            lara: &mut lara,
            level: &level,
            anims: &anims,
            hooks: &mut hooks,
            input: InputState::default().with_action(),
        };
        interact(&mut ctx, &mut block, at, &mut patches).unwrap();

        assert_eq!(lara.current_state, LaraStateId::PushableGrab);
        assert_eq!(lara.hand_status, HandStatus::Grabbing);
        assert_eq!(lara.rotation.y, Angle::ZERO);
        assert_eq!(lara.pos().z, 2048 + SECTOR_SIZE - GRIP_GAP);
        assert_eq!(block.yaw, Angle::ZERO);
        assert!(patches.is_empty());
    }

    #[test]
    fn no_grab_without_action_or_out_of_reach() {
        let (level, at) = level_with_block();
        let anims = AnimationSet::stock().unwrap();
        let mut hooks = RecordingHooks::default();
        let mut patches = Vec::new();
        for (pos, input) in [
            (IVec3::new(2560, 0, 2984), InputState::default()),
            (IVec3::new(2560, 0, 2500), InputState::default().with_action()),
            (IVec3::new(2560, 0, 2984), InputState::default().with_action().forward()),
        ] {
            let mut lara = LaraState::new(pos, 0, Angle::ZERO);
            let mut block = Block::default();
            let mut ctx = StateCtx {
                lara: &mut lara,
                level: &level,
                anims: &anims,
                hooks: &mut hooks,
                input,
            };
            interact(&mut ctx, &mut block, at, &mut patches).unwrap();
            assert_eq!(lara.current_state, LaraStateId::Stop, "at {pos}");
            assert_eq!(lara.pos(), pos);
        }
    }

    #[test]
    fn finished_push_sets_the_block_down_a_sector_on() {
        let (level, mut at) = level_with_block();
        let mut hooks = RecordingHooks::default();
        let mut lara = LaraState::new(IVec3::new(2560, 0, 2972), 0, Angle::ZERO);
        let mut block = Block {
            yaw: Angle::ZERO,
            motion: BlockMotion::Moving {
                lara_origin: lara.pos(),
                block_origin: at.pos,
                axis: Axis::PosZ,
                dir: 1,
            },
        };
        let mut patches = Vec::new();

        lara.current_state = LaraStateId::PushablePush;
        lara.pos_mut().z += 400;
        carry(&lara, &level, &mut hooks, &mut block, &mut at, &mut patches);
        assert_eq!(at.pos, IVec3::new(2560, 0, 3984));
        assert!(patches.is_empty());

        lara.current_state = LaraStateId::PushableGrab;
        carry(&lara, &level, &mut hooks, &mut block, &mut at, &mut patches);
        assert_eq!(at.pos, IVec3::new(2560, 0, 3584 + SECTOR_SIZE));
        assert_eq!(block.motion, BlockMotion::Resting);
        assert_eq!(
            patches,
            vec![BlockPatch {
                at,
                height: -SECTOR_SIZE,
                settled: true
            }]
        );
        assert!(hooks.sounds.contains(&SoundId::TREX_FOOTSTEP));
    }
}
