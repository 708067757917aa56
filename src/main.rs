//! Groundwork - headless demo host
//!
//! Builds the test arena, spawns a player and a chaser and plays a scripted
//! input session through the fixed-timestep simulation, logging what the
//! movement core publishes.
//!
//! Usage: `groundwork [config.toml]`. Without a path the defaults are used.

use std::path::Path;

use anyhow::{Context, Result};
use groundwork_game::{Level, PlayerInput, Simulation, SimulationConfig};

/// Render frame time the scripted session pretends to run at.
const FRAME_TIME: f32 = 1.0 / 144.0;

/// One scripted stretch of held input.
struct Phase {
    name: &'static str,
    seconds: f32,
    input: PlayerInput,
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn script() -> Vec<Phase> {
    let mut walk = PlayerInput::default();
    walk.movement.forward = true;

    let mut sprint = walk.clone();
    sprint.actions.sprint = true;

    let mut jump = sprint.clone();
    jump.actions.jump = true;

    let mut turn = walk.clone();
    turn.mouse_delta = (4.0, 0.0);

    let mut strafe = PlayerInput::default();
    strafe.movement.right = true;

    vec![
        Phase { name: "settle", seconds: 0.5, input: PlayerInput::default() },
        Phase { name: "walk", seconds: 1.5, input: walk },
        Phase { name: "sprint", seconds: 1.0, input: sprint },
        Phase { name: "jump", seconds: 1.5, input: jump },
        Phase { name: "turn", seconds: 1.0, input: turn },
        Phase { name: "strafe", seconds: 1.0, input: strafe },
        Phase { name: "stop", seconds: 1.5, input: PlayerInput::default() },
    ]
}

fn main() -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => SimulationConfig::default(),
    };
    tracing::info!("Starting groundwork at {} ticks/s", config.tick_rate);

    let mut simulation =
        Simulation::on_spawn(config, Level::test_arena()).context("building simulation")?;
    let player_id = simulation.add_player("Player1");
    let enemy_id = simulation.add_enemy(Some(player_id));

    let mut frame_input = 0u32;
    for phase in script() {
        let frames = (phase.seconds / FRAME_TIME).round() as u32;
        for _ in 0..frames {
            let mut input = phase.input.clone();
            input.frame = frame_input;
            simulation.on_tick(FRAME_TIME, &[input]);
            frame_input += 1;
        }

        if let Some(player) = simulation.get_player(player_id) {
            let animator = player.animator;
            tracing::info!(
                phase = phase.name,
                frame = simulation.frame,
                position = ?player.position(),
                speed = animator.speed,
                grounded = animator.grounded,
                free_fall = animator.free_fall,
                jumps = animator.jump_triggers,
                "player"
            );
        }
        if let Some(enemy) = simulation.get_enemy(enemy_id) {
            tracing::info!(
                phase = phase.name,
                position = ?enemy.position(),
                chasing = enemy.chaser.chasing,
                "enemy"
            );
        }
    }

    tracing::info!("Session finished after {} physics ticks", simulation.frame);
    Ok(())
}
