//! Game simulation - the main game loop.
//!
//! The host drives this with `on_tick` once per rendered frame. Frame time
//! accumulates and is spent in fixed `on_physics_tick` steps, so the same
//! inputs always produce the same bodies regardless of frame rate.

use glam::Vec3;
use groundwork_physics::{ConfigError, MovementConfig, MovementController};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chase::{ChaseConfig, Chaser, Enemy};
use crate::input::PlayerInput;
use crate::level::{Level, SpawnType};
use crate::player::{EntityId, Player};

/// Physics steps allowed per frame before leftover time is dropped.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement physics configuration for players.
    pub movement: MovementConfig,

    /// Movement physics configuration for enemies. Its `move_speed` is
    /// replaced by the chase speed.
    pub enemy_movement: MovementConfig,

    /// Pursuit tuning.
    pub chase: ChaseConfig,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            movement: MovementConfig::default(),
            enemy_movement: MovementConfig::default(),
            chase: ChaseConfig::default(),
            mouse_sensitivity: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Enemy movement config with the chase speed applied.
    pub fn enemy_movement_config(&self) -> MovementConfig {
        let mut config = self.enemy_movement.clone();
        config.move_speed = self.chase.chase_speed;
        config.sprint_speed = config.sprint_speed.max(config.move_speed);
        config
    }
}

/// Simulation setup failures.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("tick_rate must be greater than zero")]
    ZeroTickRate,

    #[error("invalid {role} movement config: {source}")]
    Movement {
        role: &'static str,
        #[source]
        source: ConfigError,
    },
}

/// The main game simulation.
///
/// Holds the level and every body and advances them deterministically from
/// player inputs. Bodies are stepped one after another in a fixed order.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    /// AI-driven bodies.
    pub enemies: Vec<Enemy>,

    player_controller: MovementController,
    enemy_controller: MovementController,

    /// Frame time not yet spent on physics steps.
    accumulated_time: f32,

    /// Next entity ID to assign.
    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a simulation with the given configuration and level.
    ///
    /// Validates every config up front; nothing after this point fails.
    pub fn on_spawn(config: SimulationConfig, level: Level) -> Result<Self, SimulationError> {
        if config.tick_rate == 0 {
            return Err(SimulationError::ZeroTickRate);
        }

        let enemy_movement = config.enemy_movement_config();
        config
            .movement
            .validate()
            .map_err(|source| SimulationError::Movement { role: "player", source })?;
        enemy_movement
            .validate()
            .map_err(|source| SimulationError::Movement { role: "enemy", source })?;

        if config.delta_time() > config.movement.max_delta_time {
            log::warn!(
                "tick_rate {} is below the movement delta time clamp; physics will run slow",
                config.tick_rate
            );
        }
        if level.collision.is_empty() {
            log::warn!("level '{}' has no collision geometry; bodies will fall forever", level.id);
        }

        Ok(Self {
            frame: 0,
            player_controller: MovementController::new(config.movement.clone()),
            enemy_controller: MovementController::new(enemy_movement),
            config,
            level,
            players: Vec::new(),
            enemies: Vec::new(),
            accumulated_time: 0.0,
            next_entity_id: 1,
        })
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Result<Self, SimulationError> {
        Self::on_spawn(SimulationConfig::default(), Level::test_arena())
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Add a player to the simulation, standing on the ground below the next
    /// player spawn point.
    ///
    /// Returns the player's ID.
    pub fn add_player(&mut self, name: &str) -> EntityId {
        let id = self.allocate_id();

        let spawn_index = self.players.len() % self.level.player_spawn_count().max(1);
        let spawn = self.level.get_player_spawn(spawn_index);
        let position = spawn.map(|s| s.position).unwrap_or(Vec3::ZERO);
        let facing = spawn.map(|s| s.facing).unwrap_or(0.0);

        let mut player = Player::new(id, name.to_string(), position, facing);
        self.player_controller
            .spawn_at(&mut player.body, position, &self.level.collision);
        log::debug!("player {id} '{name}' spawned at {:?}", player.position());

        self.players.push(player);
        id
    }

    /// Add an enemy at the next enemy spawn point.
    ///
    /// The target is fixed here: the given player, or the first player when
    /// `None`. An enemy with no target idles.
    pub fn add_enemy(&mut self, target: Option<EntityId>) -> EntityId {
        let id = self.allocate_id();

        let target = target.or_else(|| self.players.first().map(|p| p.id));
        if target.is_none() {
            log::warn!("enemy {id} has no target to chase");
        }

        let spawn_count = self
            .level
            .spawn_points
            .iter()
            .filter(|s| s.spawn_type == SpawnType::Enemy)
            .count();
        let position = self
            .level
            .spawn(SpawnType::Enemy, self.enemies.len() % spawn_count.max(1))
            .map(|s| s.position)
            .unwrap_or(Vec3::ZERO);

        let mut enemy = Enemy::new(id, position, Chaser::new(self.config.chase.clone()), target);
        self.enemy_controller
            .spawn_at(&mut enemy.body, position, &self.level.collision);
        log::debug!("enemy {id} spawned at {:?} targeting {target:?}", enemy.position());

        self.enemies.push(enemy);
        id
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get an enemy by ID.
    pub fn get_enemy(&self, enemy_id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == enemy_id)
    }

    /// Advance by one rendered frame.
    ///
    /// `inputs` are indexed by player position in `players`; players without
    /// an entry get default input. Returns the number of physics steps run.
    pub fn on_tick(&mut self, frame_delta: f32, inputs: &[PlayerInput]) -> u32 {
        for (i, player) in self.players.iter_mut().enumerate() {
            let input = inputs.get(i).cloned().unwrap_or_default();
            player.apply_input(&input, self.config.mouse_sensitivity);
        }

        if frame_delta.is_finite() && frame_delta > 0.0 {
            self.accumulated_time += frame_delta;
        }

        let delta_time = self.config.delta_time();
        let mut steps = 0;
        while self.accumulated_time >= delta_time {
            if steps == MAX_STEPS_PER_FRAME {
                log::debug!("dropping {:.3}s of frame time", self.accumulated_time);
                self.accumulated_time = 0.0;
                break;
            }
            self.on_physics_tick();
            self.accumulated_time -= delta_time;
            steps += 1;
        }
        steps
    }

    /// Run one fixed physics step for every body.
    pub fn on_physics_tick(&mut self) {
        let delta_time = self.config.delta_time();
        let world = Some(&self.level.collision);

        for player in &mut self.players {
            self.player_controller.tick(
                &mut player.body,
                &mut player.pending,
                player.camera_yaw,
                world,
                delta_time,
                &mut player.animator,
            );
        }

        for enemy in &mut self.enemies {
            let target = enemy
                .target
                .and_then(|id| self.players.iter().find(|p| p.id == id))
                .map(Player::position);
            let mut intent = enemy.chaser.update(enemy.position(), target);
            // Chaser intents are in the world frame
            self.enemy_controller
                .tick(&mut enemy.body, &mut intent, 0.0, world, delta_time, &mut ());
        }

        self.frame += 1;
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================
