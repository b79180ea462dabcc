//! Enemy spawning
//!
//! After every kill the spawner recomputes how many enemies the current kill
//! count allows and schedules the missing ones after short random delays.
//! The population cap is checked again when each delayed spawn comes due,
//! so scheduled spawns never push the arena past the limit.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{Actor, EnemyStats, Faction, GameState};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, SPAWN_PADDING};
use crate::services::{AssetProvider, SpriteKey};

/// Kills per difficulty step
pub const DIFFICULTY_STEP_KILLS: u32 = 10;
/// Difficulty stops growing here
pub const MAX_DIFFICULTY: u32 = 10;
/// Fire enemies scale their difficulty by this factor
pub const FIRE_DIFFICULTY_FACTOR: u32 = 10;
/// Difficulty the opening enemy is generated with
pub const OPENING_DIFFICULTY: u32 = 1;

/// Bullet colors regular enemies pick from
pub const ENEMY_PALETTE: [u32; 7] = [
    0xeb4034, 0x635a19, 0xb34a09, 0x0a6349, 0x0b1852, 0x380613, 0x000000,
];
pub const FIRE_BULLET_COLOR: u32 = 0xffa500;

/// A spawn waiting for its delay to elapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpawn {
    pub due_at: f64,
    /// Population limit in force when this spawn was scheduled
    pub max_allowed: usize,
    /// Kill count the spawn was scheduled for (drives difficulty)
    pub kill_count: u32,
}

/// Spawns scheduled but not yet executed
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    pending: Vec<PendingSpawn>,
}

impl Spawner {
    pub fn pending(&self) -> &[PendingSpawn] {
        &self.pending
    }
}

/// Difficulty scalar for a kill count: `min(kills / 10, 10)`, x10 for fire enemies
pub fn difficulty_for(kill_count: u32, faction: Faction) -> u32 {
    let difficulty = (kill_count / DIFFICULTY_STEP_KILLS).min(MAX_DIFFICULTY);
    if faction == Faction::Fire {
        difficulty * FIRE_DIFFICULTY_FACTOR
    } else {
        difficulty
    }
}

/// Pick the enemy type for a spawn
pub fn roll_faction(rng: &mut impl Rng, fire_chance: f64) -> Faction {
    if rng.random::<f64>() < fire_chance {
        Faction::Fire
    } else {
        Faction::Default
    }
}

/// Generate combat stats. Regular enemies scale with difficulty up to fixed
/// ceilings; fire enemies always get the same high stats.
pub fn enemy_stats(faction: Faction, difficulty: u32, rng: &mut impl Rng) -> EnemyStats {
    if faction == Faction::Fire {
        return EnemyStats {
            move_speed: 5.0,
            fire_rate_ms: 800.0,
            bullet_speed: 2.0,
            bullet_color: FIRE_BULLET_COLOR,
        };
    }

    let multiplier = (1.0 + difficulty as f32 * 0.1).min(2.5);
    let base_bullet_speed = 1.2 + rng.random::<f32>();
    let base_fire_rate = 2500.0 + rng.random::<f64>() * 1500.0;
    let base_move_speed = 0.3 + rng.random::<f32>() * 0.4;
    let color = ENEMY_PALETTE[rng.random_range(0..ENEMY_PALETTE.len())];

    EnemyStats {
        move_speed: (base_move_speed * multiplier).min(1.5),
        fire_rate_ms: (base_fire_rate / multiplier as f64).max(800.0),
        bullet_speed: (base_bullet_speed * multiplier).min(4.0),
        bullet_color: color,
    }
}

/// Create one enemy at a random point inside the spawn padding.
///
/// Returns the new enemy's id, or `None` when the hard cap is reached.
/// A missing sprite is logged; the enemy is still created.
pub fn create_enemy(
    state: &mut GameState,
    faction: Faction,
    difficulty: u32,
    armed_at: f64,
    assets: &dyn AssetProvider,
) -> Option<u32> {
    if state.enemies.len() >= state.tuning.max_enemies {
        return None;
    }

    let pos = Vec2::new(
        SPAWN_PADDING + state.rng.random::<f32>() * (CANVAS_WIDTH - SPAWN_PADDING * 2.0),
        SPAWN_PADDING + state.rng.random::<f32>() * (CANVAS_HEIGHT - SPAWN_PADDING * 2.0),
    );
    let stats = enemy_stats(faction, difficulty, &mut state.rng);
    let sprite = match faction {
        Faction::Fire => SpriteKey::Fire,
        _ => SpriteKey::Enemy(state.rng.random_range(0..assets.enemy_variants().max(1))),
    };
    let handle = assets.sprite(sprite);
    if handle.is_none() {
        log::error!("No sprite for {:?} enemy ({:?})", faction, sprite);
    }

    let id = state.next_entity_id();
    let mut enemy = Actor::enemy(id, faction, pos, stats, sprite);
    enemy.armed_at = armed_at;
    enemy.sprite_handle = handle;
    state.enemies.push(enemy);
    state.push_event(GameEvent::EnemySpawned { enemy_id: id, faction });
    log::debug!("Spawned {:?} enemy {} at ({:.0}, {:.0})", faction, id, pos.x, pos.y);
    Some(id)
}

/// Evaluate the population for a kill count.
///
/// Kill count zero (session start) creates one regular enemy immediately,
/// holding its fire for the opening grace period. Otherwise every free slot
/// under the allowed population gets a delayed spawn.
pub fn request_spawns(state: &mut GameState, kill_count: u32, now: f64, assets: &dyn AssetProvider) {
    if kill_count == 0 {
        let armed_at = now + state.tuning.first_enemy_grace_ms;
        create_enemy(state, Faction::Default, OPENING_DIFFICULTY, armed_at, assets);
        return;
    }

    let max_allowed = state.tuning.max_allowed_enemies(kill_count);
    let population = state.enemies.len();
    if population >= max_allowed {
        return;
    }

    let (min_delay, max_delay) = (state.tuning.spawn_delay_min_ms, state.tuning.spawn_delay_max_ms);
    for _ in population..max_allowed {
        let delay = state.rng.random_range(min_delay..max_delay);
        state.spawner.pending.push(PendingSpawn {
            due_at: now + delay,
            max_allowed,
            kill_count,
        });
    }
}

/// Execute every spawn whose delay has elapsed, re-checking the cap for each
pub fn run_due_spawns(state: &mut GameState, now: f64, assets: &dyn AssetProvider) {
    if state.spawner.pending.is_empty() {
        return;
    }

    let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.spawner.pending)
        .into_iter()
        .partition(|spawn| spawn.due_at <= now);
    state.spawner.pending = waiting;
    due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at));

    for spawn in due {
        if state.enemies.len() >= spawn.max_allowed {
            log::debug!("Dropped spawn: population already at {}", spawn.max_allowed);
            continue;
        }
        let faction = roll_faction(&mut state.rng, state.tuning.fire_enemy_chance);
        let difficulty = difficulty_for(spawn.kill_count, faction);
        create_enemy(state, faction, difficulty, now, assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StaticAssets;
    use crate::sim::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state_with(base_enemies: usize) -> GameState {
        let tuning = Tuning {
            base_enemies,
            ..Tuning::default()
        };
        GameState::new(42, tuning)
    }

    #[test]
    fn test_session_start_spawns_one_regular_enemy() {
        let mut state = state_with(3);
        let assets = StaticAssets::default();
        request_spawns(&mut state, 0, 1000.0, &assets);

        assert_eq!(state.enemies.len(), 1);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.faction, Faction::Default);
        assert_eq!(enemy.armed_at, 4000.0);
        assert!(enemy.sprite_handle.is_some());
        assert!(state.spawner.pending().is_empty());
    }

    #[test]
    fn test_raised_cap_schedules_one_spawn() {
        let mut state = state_with(5);
        let assets = StaticAssets::default();
        for _ in 0..5 {
            create_enemy(&mut state, Faction::Default, 0, 0.0, &assets);
        }

        request_spawns(&mut state, 9, 0.0, &assets);
        assert!(state.spawner.pending().is_empty());

        request_spawns(&mut state, 10, 0.0, &assets);
        assert_eq!(state.spawner.pending().len(), 1);
        let due = state.spawner.pending()[0].due_at;
        assert!((150.0..430.0).contains(&due));

        run_due_spawns(&mut state, 500.0, &assets);
        assert_eq!(state.enemies.len(), 6);
    }

    #[test]
    fn test_scheduled_spawn_dropped_when_slot_filled() {
        let mut state = state_with(5);
        let assets = StaticAssets::default();
        for _ in 0..5 {
            create_enemy(&mut state, Faction::Default, 0, 0.0, &assets);
        }
        request_spawns(&mut state, 10, 0.0, &assets);
        assert_eq!(state.spawner.pending().len(), 1);

        // Another mechanism fills the slot before the delay elapses
        create_enemy(&mut state, Faction::Default, 0, 0.0, &assets);
        run_due_spawns(&mut state, 500.0, &assets);

        assert_eq!(state.enemies.len(), 6);
        assert!(state.spawner.pending().is_empty());
    }

    #[test]
    fn test_spawns_wait_for_their_delay() {
        let mut state = state_with(3);
        let assets = StaticAssets::default();
        request_spawns(&mut state, 1, 0.0, &assets);
        assert_eq!(state.spawner.pending().len(), 3);

        run_due_spawns(&mut state, 100.0, &assets);
        assert!(state.enemies.is_empty());

        run_due_spawns(&mut state, 430.0, &assets);
        assert_eq!(state.enemies.len(), 3);
    }

    #[test]
    fn test_population_never_exceeds_cap() {
        let mut state = state_with(3);
        let assets = StaticAssets::default();
        let mut now = 0.0;
        for kills in 1..400 {
            request_spawns(&mut state, kills, now, &assets);
            now += 50.0;
            run_due_spawns(&mut state, now, &assets);
            assert!(state.enemies.len() <= state.tuning.max_enemies);
        }
        assert_eq!(state.enemies.len(), state.tuning.max_enemies);
    }

    #[test]
    fn test_missing_sprite_still_spawns() {
        let mut state = state_with(3);
        let assets = StaticAssets {
            enemy_variants: 0,
            ..Default::default()
        };
        let id = create_enemy(&mut state, Faction::Default, 0, 0.0, &assets);
        assert!(id.is_some());
        assert!(state.enemies[0].sprite_handle.is_none());
    }

    #[test]
    fn test_difficulty_scalar() {
        assert_eq!(difficulty_for(0, Faction::Default), 0);
        assert_eq!(difficulty_for(25, Faction::Default), 2);
        assert_eq!(difficulty_for(500, Faction::Default), 10);
        assert_eq!(difficulty_for(25, Faction::Fire), 20);
    }

    #[test]
    fn test_stats_respect_ceilings() {
        let mut rng = Pcg32::seed_from_u64(3);
        for difficulty in [0, 5, 10, 100] {
            for _ in 0..100 {
                let stats = enemy_stats(Faction::Default, difficulty, &mut rng);
                assert!(stats.bullet_speed <= 4.0);
                assert!(stats.move_speed <= 1.5);
                assert!(stats.fire_rate_ms >= 800.0);
                assert!(ENEMY_PALETTE.contains(&stats.bullet_color));
            }
        }
        let fire = enemy_stats(Faction::Fire, 100, &mut rng);
        assert_eq!(fire.fire_rate_ms, 800.0);
        assert_eq!(fire.move_speed, 5.0);
        assert_eq!(fire.bullet_color, FIRE_BULLET_COLOR);
    }

    #[test]
    fn test_spawn_points_inside_padding() {
        let mut state = state_with(3);
        let assets = StaticAssets::default();
        for _ in 0..12 {
            create_enemy(&mut state, Faction::Default, 0, 0.0, &assets);
        }
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= SPAWN_PADDING && enemy.pos.x <= CANVAS_WIDTH - SPAWN_PADDING);
            assert!(enemy.pos.y >= SPAWN_PADDING && enemy.pos.y <= CANVAS_HEIGHT - SPAWN_PADDING);
        }
    }
}
