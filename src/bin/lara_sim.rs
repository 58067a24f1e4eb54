//! lara_sim - run Lara through a scripted scenario and log what happens.
//!
//! USAGE:
//! ```bash
//! cargo run --bin lara_sim -- --scenario ledge --ticks 120 --log-level debug
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glam::IVec3;

use tomb_rs::defs::SoundId;
use tomb_rs::sim::{CameraMode, Hooks, InputState, ItemType, SimConfig, TicRunner};
use tomb_rs::units::Angle;
use tomb_rs::world::{CommandSequence, Level, LevelBuilder, RoomId};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Scripted situation to play
    #[arg(long, value_enum, default_value_t = Scenario::Run)]
    scenario: Scenario,

    /// Number of tics to simulate
    #[arg(long, default_value_t = 150)]
    ticks: u32,

    /// `env_logger` filter, e.g. `info` or `tomb_rs=trace`
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Lara's health at spawn
    #[arg(long)]
    health: Option<i32>,

    /// Pace the tics against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Walk,
    Run,
    JumpWall,
    Fall,
    Ledge,
    Swim,
    Slide,
    Push,
    Pickup,
}

/// Level, start and input script of a scenario.
struct Setup {
    level: Level,
    start: IVec3,
    room: RoomId,
    heading: Angle,
    block: Option<IVec3>,
    script: fn(u32) -> InputState,
}

fn flat_room() -> LevelBuilder {
    LevelBuilder::new().room(0, 0, 8, 8, 0, -3072)
}

fn setup(scenario: Scenario) -> Setup {
    let centre = IVec3::new(2560, 0, 2560);
    let base = |level: Level, script: fn(u32) -> InputState| Setup {
        level,
        start: centre,
        room: 0,
        heading: Angle::ZERO,
        block: None,
        script,
    };
    match scenario {
        Scenario::Walk => base(flat_room().build(), |_| InputState::default().forward().slow()),
        Scenario::Run => base(flat_room().build(), |_| InputState::default().forward()),
        Scenario::JumpWall => base(flat_room().build(), |t| {
            let input = InputState::default().forward();
            if t > 20 { input.with_jump() } else { input }
        }),
        Scenario::Fall => base(
            flat_room().open(0, 2, 4, 3072, -3072).open(0, 2, 5, 3072, -3072).build(),
            |_| InputState::default().forward(),
        ),
        Scenario::Ledge => base(
            flat_room().floor(0, 2, 3, -1536).build(),
            |t| {
                if t < 40 {
                    InputState::default().with_jump().with_action()
                } else {
                    InputState::default().with_action().forward()
                }
            },
        ),
        Scenario::Swim => {
            let level = LevelBuilder::new()
                .room(0, 0, 8, 8, 3072, 0)
                .water()
                .room(0, 0, 8, 8, 0, -3072)
                .stack(0, 1)
                .build();
            Setup {
                level,
                start: IVec3::new(2560, -1024, 2560),
                room: 1,
                heading: Angle::ZERO,
                block: None,
                script: |t| {
                    if t < 30 {
                        InputState::default()
                    } else {
                        InputState::default().with_jump()
                    }
                },
            }
        }
        Scenario::Slide => base(
            flat_room().floor_slant(0, 2, 3, 0, 4).floor_slant(0, 2, 4, 0, 4).build(),
            |t| {
                if t < 10 { InputState::default().forward() } else { InputState::default() }
            },
        ),
        Scenario::Push => Setup {
            level: flat_room().build(),
            start: IVec3::new(2560, 0, 2980),
            room: 0,
            heading: Angle::ZERO,
            block: Some(IVec3::new(2560, 0, 3584)),
            script: |t| {
                let input = InputState::default().with_action();
                if t < 20 { input } else { input.forward() }
            },
        },
        Scenario::Pickup => base(flat_room().build(), |_| InputState::default()),
    }
}

/// Hooks that log every request.
struct LogHooks;

impl Hooks for LogHooks {
    fn play_sound(&mut self, sound: SoundId) {
        log::info!("sound {sound:?}");
    }

    fn stop_sound(&mut self, sound: SoundId) {
        log::info!("stop sound {sound:?}");
    }

    fn set_camera_rotation(&mut self, x: Angle, y: Angle) {
        log::trace!("camera {:.1}° {:.1}°", x.to_degrees(), y.to_degrees());
    }

    fn set_camera_rotation_x(&mut self, x: Angle) {
        log::trace!("camera pitch {:.1}°", x.to_degrees());
    }

    fn set_camera_distance(&mut self, distance: i32) {
        log::trace!("camera distance {distance}");
    }

    fn set_camera_mode(&mut self, mode: CameraMode) {
        log::debug!("camera mode {mode:?}");
    }

    fn put_inventory(&mut self, item: ItemType, quantity: u32) {
        log::info!("inventory += {quantity} x {item:?}");
    }

    fn command_sequence(&mut self, sequence: &CommandSequence, from_heavy: bool) {
        log::info!(
            "command sequence {} ({:?}, heavy: {from_heavy})",
            sequence.index,
            sequence.condition
        );
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&opts.log_level))
        .init();

    let mut config = SimConfig::default();
    if let Some(health) = opts.health {
        config.initial_health = health;
    }
    let Setup {
        mut level,
        start,
        room,
        heading,
        block,
        script,
    } = setup(opts.scenario);
    level.validate().context("scenario level is malformed")?;

    let mut runner = TicRunner::stock(config).context("stock animations are broken")?;
    runner.spawn_lara(start, room, heading);
    if let Some(pos) = block {
        runner.spawn_block(&mut level, pos, room)?;
    }
    let mut hooks = LogHooks;
    if opts.scenario == Scenario::Pickup
        && !runner.start_pickup(&level, &mut hooks, ItemType(84), 1)?
    {
        log::warn!("Lara is too busy to pick anything up");
    }

    let mut t = 0;
    while t < opts.ticks {
        let input = script(t);
        if opts.realtime {
            t += runner.pump(&mut level, input, &mut hooks)?;
            std::thread::sleep(std::time::Duration::from_millis(1));
        } else {
            runner.tick(&mut level, input, &mut hooks)?;
            t += 1;
        }

        let lara = runner.lara()?;
        let s = &lara.state;
        log::debug!(
            "#{t:4} {:<18} goal {:<18} pos {} room {} hp {} air {}",
            s.current_state.to_string(),
            s.goal_state.to_string(),
            s.pos(),
            s.position.room,
            s.health,
            s.air
        );
    }

    let lara = runner.lara()?;
    let s = &lara.state;
    println!(
        "{:?} after {t} tics: {} at {} in room {}, facing {:.1}°, health {}",
        opts.scenario,
        s.current_state,
        s.pos(),
        s.position.room,
        s.rotation.y.to_degrees(),
        s.health
    );
    Ok(())
}
