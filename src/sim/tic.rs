use glam::IVec3;
use hecs::{Entity, World};
use std::time::{Duration, Instant};

use super::anim::{AnimError, AnimationSet};
use super::components::{InputState, ItemType};
use super::hooks::Hooks;
use super::items::{self, Block, BlockPatch};
use super::lara::handler::StateCtx;
use super::lara::node::LaraNode;
use crate::defs::StateError;
use crate::defs::constants::{LARA_HEALTH, SECTOR_SIZE};
use crate::units::Angle;
use crate::world::{HeightInfo, Level, RoomId, RoomPos, WorldError};

pub const SIM_FPS: u32 = 30;

/// Anything that stops a tic from completing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TickError {
    #[error(transparent)]
    Anim(#[from] AnimError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("no Lara has been spawned")]
    NoLara,
}

/// Knobs of the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Tics per second of wall-clock time for `pump`.
    pub fps: u32,
    /// Count air down underwater and drown when it runs out.
    pub simulate_air: bool,
    pub initial_health: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fps: SIM_FPS,
            simulate_air: true,
            initial_health: LARA_HEALTH,
        }
    }
}

/// Owns the ECS world and drives Lara and the blocks at a fixed rate.
pub struct TicRunner {
    world: World,
    anims: AnimationSet,
    config: SimConfig,
    lara: Option<Entity>,
    last: Instant,
}

impl TicRunner {
    pub fn new(anims: AnimationSet, config: SimConfig) -> Self {
        Self {
            world: World::new(),
            anims,
            config,
            lara: None,
            last: Instant::now(),
        }
    }

    /// Runner over the built-in animation table.
    pub fn stock(config: SimConfig) -> Result<Self, TickError> {
        Ok(Self::new(AnimationSet::stock()?, config))
    }

    #[inline]
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    #[inline]
    pub fn anims(&self) -> &AnimationSet {
        &self.anims
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Spawn Lara standing at `pos`, replacing any previous one.
    pub fn spawn_lara(&mut self, pos: IVec3, room: RoomId, heading: Angle) -> Entity {
        if let Some(old) = self.lara.take() {
            let _ = self.world.despawn(old);
        }
        let e = self
            .world
            .spawn((LaraNode::new(pos, room, heading, &self.config),));
        self.lara = Some(e);
        e
    }

    /// Place a block standing on the floor at `pos` and raise the floor
    /// under it.
    pub fn spawn_block(
        &mut self,
        level: &mut Level,
        pos: IVec3,
        room: RoomId,
    ) -> Result<Entity, TickError> {
        level.patch_heights_for_block(pos, room, -SECTOR_SIZE)?;
        Ok(self.world.spawn((Block::default(), RoomPos::new(pos, room))))
    }

    pub fn lara(&self) -> Result<hecs::Ref<'_, LaraNode>, TickError> {
        let e = self.lara.ok_or(TickError::NoLara)?;
        self.world.get::<&LaraNode>(e).map_err(|_| TickError::NoLara)
    }

    pub fn lara_mut(&self) -> Result<hecs::RefMut<'_, LaraNode>, TickError> {
        let e = self.lara.ok_or(TickError::NoLara)?;
        self.world
            .get::<&mut LaraNode>(e)
            .map_err(|_| TickError::NoLara)
    }

    /// Have Lara pick up `quantity` of `item` if she stands idle.
    pub fn start_pickup(
        &mut self,
        level: &Level,
        hooks: &mut dyn Hooks,
        item: ItemType,
        quantity: u32,
    ) -> Result<bool, TickError> {
        let mut lara = self.lara_mut()?;
        lara.start_pickup(level, &self.anims, hooks, item, quantity)
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns how many ran.
    pub fn pump(
        &mut self,
        level: &mut Level,
        input: InputState,
        hooks: &mut dyn Hooks,
    ) -> Result<u32, TickError> {
        let tic = Duration::from_micros(1_000_000 / u64::from(self.config.fps.max(1)));
        let mut ran = 0;
        while self.last.elapsed() >= tic {
            self.tick(level, input, hooks)?;
            self.last += tic;
            ran += 1;
        }
        Ok(ran)
    }

    /* ---------------------------------------------------------------- */
    /* one fixed-rate game tic                                          */
    /* ---------------------------------------------------------------- */
    pub fn tick(
        &mut self,
        level: &mut Level,
        input: InputState,
        hooks: &mut dyn Hooks,
    ) -> Result<(), TickError> {
        let mut patches: Vec<BlockPatch> = Vec::new();
        {
            let mut lara = self.lara_mut()?;
            lara.update(level, &self.anims, hooks, input, &self.config)?;
            items::block_system(
                &self.world,
                &mut lara.state,
                level,
                &self.anims,
                hooks,
                input,
                &mut patches,
            )?;
        }

        for patch in &patches {
            level.patch_heights_for_block(patch.at.pos, patch.at.room, patch.height)?;
        }

        for patch in patches.iter().filter(|p| p.settled) {
            let mut room = patch.at.room;
            let sector = level.find_real_floor_sector(patch.at.pos, &mut room);
            let floor = HeightInfo::from_floor(level, sector, patch.at.pos);
            let mut lara = self.lara_mut()?;
            let mut ctx = StateCtx {
                lara: &mut lara.state,
                level: &*level,
                anims: &self.anims,
                hooks: &mut *hooks,
                input,
            };
            ctx.handle_command_sequence(floor.last_command_sequence_or_death, true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::LaraStateId;
    use crate::defs::stock::PUSHABLE_READY_FRAME;
    use crate::sim::hooks::NullHooks;
    use crate::sim::items::BlockMotion;
    use crate::sim::testing::RecordingHooks;
    use crate::world::{Command, CommandOp, LevelBuilder, SequenceCondition};

    fn run_until(
        runner: &mut TicRunner,
        level: &mut Level,
        hooks: &mut RecordingHooks,
        input: InputState,
        limit: usize,
        done: impl Fn(&TicRunner) -> bool,
    ) -> bool {
        for _ in 0..limit {
            runner.tick(level, input, hooks).unwrap();
            if done(runner) {
                return true;
            }
        }
        false
    }

    #[test]
    fn ticking_without_lara_fails() {
        let mut level = LevelBuilder::new().room(0, 0, 5, 5, 0, -2048).build();
        let mut runner = TicRunner::stock(SimConfig::default()).unwrap();
        assert_eq!(
            runner.tick(&mut level, InputState::default(), &mut NullHooks),
            Err(TickError::NoLara)
        );
    }

    #[test]
    fn config_sets_starting_health() {
        let config = SimConfig {
            initial_health: 250,
            ..SimConfig::default()
        };
        let mut runner = TicRunner::stock(config).unwrap();
        runner.spawn_lara(IVec3::new(2560, 0, 2560), 0, Angle::ZERO);
        assert_eq!(runner.lara().unwrap().state.health, 250);
    }

    #[test]
    fn lara_pushes_a_block_one_sector() {
        let mut level = LevelBuilder::new()
            .room(0, 0, 7, 7, 0, -2048)
            .command_sequence(
                0,
                2,
                4,
                SequenceCondition::ItemIsHere,
                &[Command {
                    op: CommandOp::FlipMap,
                    parameter: 1,
                    camera: None,
                }],
            )
            .build();
        let mut hooks = RecordingHooks::default();
        let mut runner = TicRunner::stock(SimConfig::default()).unwrap();
        runner.spawn_lara(IVec3::new(2560, 0, 2980), 0, Angle::ZERO);
        let block = runner
            .spawn_block(&mut level, IVec3::new(2560, 0, 3584), 0)
            .unwrap();

        let grab = InputState::default().with_action();
        assert!(run_until(&mut runner, &mut level, &mut hooks, grab, 40, |r| {
            let lara = r.lara().unwrap();
            lara.state.current_state == LaraStateId::PushableGrab
                && lara.state.anim.frame == PUSHABLE_READY_FRAME
        }));
        assert_eq!(runner.lara().unwrap().state.pos().z, 2048 + 924);

        let push = grab.forward();
        runner.tick(&mut level, push, &mut hooks).unwrap();
        assert!(matches!(
            runner.world().get::<&Block>(block).unwrap().motion,
            BlockMotion::Moving { dir: 1, .. }
        ));
        assert!(run_until(&mut runner, &mut level, &mut hooks, push, 200, |r| {
            r.world().get::<&Block>(block).unwrap().motion == BlockMotion::Resting
        }));

        let at = *runner.world().get::<&RoomPos>(block).unwrap();
        assert_eq!(at.pos, IVec3::new(2560, 0, 3584 + SECTOR_SIZE));
        let floor = |level: &Level, z: i32| {
            let mut room = 0;
            level
                .find_real_floor_sector(IVec3::new(2560, 0, z), &mut room)
                .floor_height
        };
        assert_eq!(floor(&level, 3584), 0);
        assert_eq!(floor(&level, 3584 + SECTOR_SIZE), -SECTOR_SIZE);
        assert!(hooks.sequences.iter().any(|&(_, heavy)| heavy));
        assert!(hooks.sounds.contains(&crate::defs::SoundId::PUSHABLE_SCRAPE));
    }
}
