//! Per-frame simulation tick
//!
//! Runs once per display frame while the session is playing. The resolver
//! phases run in a fixed order; later phases rely on removals made by
//! earlier ones.

use glam::Vec2;

use super::collision::{advance_projectile, first_hit, out_of_bounds, within};
use super::events::GameEvent;
use super::spawner;
use super::state::{
    DamageOutcome, ENEMY_EXPLOSION_SIZE, Explosion, Faction, GamePhase, GameState,
    PLAYER_EXPLOSION_SIZE, Pickup, PickupKind, Projectile,
};
use crate::consts::PICKUP_REACH;
use crate::services::{Cue, Services};

/// Input snapshot sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Aim target in canvas space
    pub pointer: Vec2,
    pub firing: bool,
}

impl TickInput {
    /// Per-axis movement intent; diagonals are not normalized
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }
}

/// Timing for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Wall-clock ms; cooldowns and lifetimes compare against this
    pub now_ms: f64,
    /// Scales every per-frame position delta
    pub multiplier: f32,
}

impl FrameTime {
    pub fn new(now_ms: f64, multiplier: f32) -> Self {
        Self { now_ms, multiplier }
    }
}

/// Advance the session by one frame.
///
/// Outside `Playing` nothing moves and nothing is pruned.
pub fn tick(state: &mut GameState, input: &TickInput, frame: FrameTime, services: &mut Services) {
    state.now_ms = frame.now_ms;
    if state.phase != GamePhase::Playing {
        return;
    }
    let now = frame.now_ms;
    let multiplier = frame.multiplier;

    // Steps what the host drew last frame; explosions born below show frame 0
    advance_explosions(state, multiplier, services.assets.explosion_frames());
    expire_buff(state, now);
    advance_shake(state);
    steer_player(state, input, frame, services);

    // Resolver, strict order
    prune_projectiles(state, now);
    advance_projectiles(state, multiplier);
    resolve_enemy_fire(state, now, services);
    resolve_player_fire(state, now, services);
    resolve_pickups(state, now, services);
    run_enemy_ai(state, now, multiplier);

    spawner::run_due_spawns(state, now, &*services.assets);
    apply_veteran_rule(state);
}

fn expire_buff(state: &mut GameState, now: f64) {
    if state.player.buff.is_some_and(|b| now >= b.expires_at) {
        state.player.buff = None;
        state.push_event(GameEvent::BuffExpired);
    }
}

fn advance_shake(state: &mut GameState) {
    state.player.shake.advance(&mut state.rng);
    for enemy in &mut state.enemies {
        enemy.shake.advance(&mut state.rng);
    }
}

fn steer_player(state: &mut GameState, input: &TickInput, frame: FrameTime, services: &mut Services) {
    if state.player.dead {
        return;
    }

    let direction = input.direction();
    if direction != Vec2::ZERO {
        let step = state.player.speed * frame.multiplier;
        state.player.move_by(direction * step);
    }
    state.player.aim_at(input.pointer);

    if input.firing {
        if let Some(shot) = state.player.try_fire(frame.now_ms) {
            add_projectile(state, shot);
            services.audio.play_cue(Cue::Shoot);
        }
    }
}

fn add_projectile(state: &mut GameState, projectile: Projectile) {
    state.push_event(GameEvent::Shot {
        faction: projectile.kind,
    });
    state.projectiles.push(projectile);
}

/// Phase 1: drop projectiles past their lifetime, out of bounces or off the map
fn prune_projectiles(state: &mut GameState, now: f64) {
    let lifetime = state.tuning.bullet_lifetime_ms;
    let max_bounces = state.tuning.max_bounces;
    let map = &state.map;
    state
        .projectiles
        .retain(|p| !p.is_expired(now, lifetime, max_bounces) && !out_of_bounds(p, map));
}

/// Phase 2: move and bounce
fn advance_projectiles(state: &mut GameState, multiplier: f32) {
    let max_bounces = state.tuning.max_bounces;
    for projectile in &mut state.projectiles {
        advance_projectile(projectile, &state.map, multiplier, max_bounces);
    }
}

/// Phase 3: enemy projectiles against the player
fn resolve_enemy_fire(state: &mut GameState, now: f64, services: &mut Services) {
    let radius = state.player.hit_radius();
    let mut i = 0;
    while i < state.projectiles.len() {
        let p = &state.projectiles[i];
        if p.is_player || !within(p.pos, state.player.pos, radius) {
            i += 1;
            continue;
        }
        let shot = state.projectiles.remove(i);
        damage_player(state, shot.damage, now, services);
    }
}

fn damage_player(state: &mut GameState, damage: i32, now: f64, services: &mut Services) {
    let shake_frames = state.tuning.shake_frames;
    let outcome = state.player.take_damage(damage, &mut state.rng, shake_frames);
    if outcome == DamageOutcome::AlreadyDead {
        return;
    }

    state.stats.damage_taken += damage.max(0) as u32;
    let health = state.player.health;
    state.push_event(GameEvent::PlayerDamaged { damage, health });

    if outcome != DamageOutcome::Destroyed {
        services.audio.play_cue(Cue::Hit);
        return;
    }

    let pos = state.player.pos;
    log::info!(
        "Player destroyed: score {}, kills {}",
        state.stats.total_score,
        state.stats.kill_count
    );
    state.explosions.push(Explosion::new(pos, PLAYER_EXPLOSION_SIZE));
    state.push_event(GameEvent::PlayerDied { pos });
    services.scores.record_kill_or_death(state.stats.total_score, true);
    services.audio.play_cue(Cue::Death);
    state.timers.game_over_at = Some(now + state.tuning.game_over_delay_ms);
}

/// Phase 4: player projectiles against enemies; each shot hits at most once
fn resolve_player_fire(state: &mut GameState, now: f64, services: &mut Services) {
    let mut i = 0;
    while i < state.projectiles.len() {
        let p = &state.projectiles[i];
        if !p.is_player {
            i += 1;
            continue;
        }
        let Some(target) = first_hit(p.pos, &state.enemies) else {
            i += 1;
            continue;
        };
        let shot = state.projectiles.remove(i);
        damage_enemy(state, target, shot.damage, now, services);
    }
}

fn damage_enemy(state: &mut GameState, index: usize, damage: i32, now: f64, services: &mut Services) {
    let shake_frames = state.tuning.shake_frames;
    let outcome = state.enemies[index].take_damage(damage, &mut state.rng, shake_frames);
    let enemy_id = state.enemies[index].id;

    match outcome {
        DamageOutcome::Survived => {
            state.stats.damage_given += damage.max(0) as u32;
            state.push_event(GameEvent::EnemyDamaged { enemy_id, damage });
            services.audio.play_cue(Cue::Hit);
        }
        DamageOutcome::Killed(drop) => {
            state.stats.damage_given += damage.max(0) as u32;
            let enemy = state.enemies.remove(index);
            state.explosions.push(Explosion::new(enemy.pos, ENEMY_EXPLOSION_SIZE));
            state.pickups.push(Pickup {
                kind: drop.into(),
                pos: enemy.pos,
                spawned_at: now,
            });

            let points = state.stats.record_kill(enemy.faction);
            state.push_event(GameEvent::EnemyKilled {
                enemy_id,
                faction: enemy.faction,
                pos: enemy.pos,
                drop,
                points,
            });
            log::debug!(
                "Killed {:?} enemy {} (+{}), kills {}",
                enemy.faction,
                enemy_id,
                points,
                state.stats.kill_count
            );

            let kill_count = state.stats.kill_count;
            services.scores.record_kill_or_death(state.stats.total_score, false);
            if enemy.faction == Faction::Fire && state.tuning.mint_on_boss_kill {
                services.scores.record_mint(kill_count);
            }
            services.audio.play_cue(Cue::Kill);
            spawner::request_spawns(state, kill_count, now, &*services.assets);
        }
        // Dead enemies are removed on the lethal hit
        DamageOutcome::Destroyed | DamageOutcome::AlreadyDead => {}
    }
}

/// Phase 5: pickup collection and expiry
fn resolve_pickups(state: &mut GameState, now: f64, services: &mut Services) {
    let lifetime = state.tuning.pickup_lifetime_ms;
    let buff_duration = state.tuning.buff_duration_ms;
    let mut i = 0;
    while i < state.pickups.len() {
        let Pickup { kind, pos, .. } = state.pickups[i];
        if state.pickups[i].is_expired(now, lifetime) {
            state.pickups.remove(i);
            state.push_event(GameEvent::PickupExpired { kind });
            continue;
        }
        if state.player.dead || !within(pos, state.player.pos, PICKUP_REACH) {
            i += 1;
            continue;
        }

        match kind {
            PickupKind::Heart => {
                if !state.player.heal() {
                    // Full health: leave it for later
                    i += 1;
                    continue;
                }
                state.stats.heals_used += 1;
                let health = state.player.health;
                state.push_event(GameEvent::Healed { health });
            }
            PickupKind::Buff => {
                let expires_at = state.player.apply_buff(now, buff_duration);
                state.stats.buffs_taken += 1;
                state.push_event(GameEvent::BuffApplied { expires_at });
            }
        }
        state.pickups.remove(i);
        services.audio.play_cue(Cue::Heal);
    }
}

/// Phase 6: enemies chase and shoot
fn run_enemy_ai(state: &mut GameState, now: f64, multiplier: f32) {
    let target = state.player.pos;
    let fired: Vec<Projectile> = state
        .enemies
        .iter_mut()
        .filter_map(|enemy| enemy.update_ai(target, now, multiplier))
        .collect();
    for shot in fired {
        add_projectile(state, shot);
    }
}

/// Veteran players get a larger health pool; current health is untouched
fn apply_veteran_rule(state: &mut GameState) {
    let veteran_max = state.tuning.veteran_max_health;
    if state.stats.kill_count > state.tuning.veteran_kills && state.player.max_health != veteran_max {
        log::info!("Veteran: max health {} -> {}", state.player.max_health, veteran_max);
        state.player.max_health = veteran_max;
        state.player.health = state.player.health.min(veteran_max);
    }
}

fn advance_explosions(state: &mut GameState, multiplier: f32, frame_count: u32) {
    for explosion in &mut state.explosions {
        explosion.advance(multiplier);
    }
    state.explosions.retain(|e| !e.is_finished(frame_count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Recorder, ScoreCall};
    use crate::services::{SpriteKey, StaticAssets};
    use crate::sim::state::{Actor, EnemyStats, player_start};
    use crate::sim::tuning::Tuning;

    fn playing(tuning: Tuning) -> GameState {
        let mut state = GameState::new(11, tuning);
        state.phase = GamePhase::Playing;
        state
    }

    fn frame(now_ms: f64) -> FrameTime {
        FrameTime::new(now_ms, 1.0)
    }

    /// Enemy that stays put and never shoots
    fn idle_enemy(state: &mut GameState, faction: Faction, pos: Vec2) -> u32 {
        let stats = EnemyStats {
            move_speed: 0.0,
            fire_rate_ms: 2500.0,
            bullet_speed: 2.0,
            bullet_color: 0,
        };
        let id = state.next_entity_id();
        let mut enemy = Actor::enemy(id, faction, pos, stats, SpriteKey::Enemy(0));
        enemy.armed_at = f64::INFINITY;
        state.enemies.push(enemy);
        id
    }

    /// Stationary projectile
    fn parked_shot(pos: Vec2, kind: Faction, damage: i32, now: f64) -> Projectile {
        Projectile::new(pos, 0.0, 0.0, kind, damage, 6.0, 0, now)
    }

    fn count_events(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.events.iter().filter(|&e| pred(e)).count()
    }

    #[test]
    fn test_direction_from_keys() {
        let input = TickInput {
            move_up: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(1.0, -1.0));
        let cancel = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(cancel.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_frozen_outside_playing() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = GameState::new(1, Tuning::default());
        let start = state.player.pos;
        state
            .projectiles
            .push(Projectile::new(Vec2::new(300.0, 300.0), 0.0, 5.0, Faction::Default, 1, 6.0, 0, 0.0));
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };

        tick(&mut state, &input, frame(100_000.0), &mut services);

        assert_eq!(state.player.pos, start);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_player_movement_scales_with_multiplier() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let start = state.player.pos;
        let input = TickInput {
            move_right: true,
            pointer: start + Vec2::new(100.0, 0.0),
            ..Default::default()
        };

        tick(&mut state, &input, FrameTime::new(0.0, 2.0), &mut services);
        assert!((state.player.pos.x - (start.x + 6.0)).abs() < 0.001);
        assert!(state.player.angle.abs() < 0.001);
    }

    #[test]
    fn test_firing_spawns_projectile_and_cue() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let input = TickInput {
            pointer: player_start() + Vec2::new(0.0, -100.0),
            firing: true,
            ..Default::default()
        };

        tick(&mut state, &input, frame(1000.0), &mut services);
        tick(&mut state, &input, frame(1100.0), &mut services);

        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].is_player);
        assert_eq!(recorder.cue_count(Cue::Shoot), 1);
    }

    #[test]
    fn test_enemy_shot_damages_player() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = state.player.pos;
        state.projectiles.push(parked_shot(pos, Faction::Default, 1, 0.0));

        tick(&mut state, &TickInput::default(), frame(10.0), &mut services);

        assert_eq!(state.player.health, 3);
        assert_eq!(state.stats.damage_taken, 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(recorder.cue_count(Cue::Hit), 1);
        assert!(state.player.shake.is_active());
    }

    #[test]
    fn test_player_ignores_own_projectiles() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = state.player.pos;
        state.projectiles.push(parked_shot(pos, Faction::Player, 1, 0.0));

        tick(&mut state, &TickInput::default(), frame(10.0), &mut services);

        assert_eq!(state.player.health, 4);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_death_fires_once_for_simultaneous_hits() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        state.player.health = 1;
        let pos = state.player.pos;
        state.projectiles.push(parked_shot(pos, Faction::Default, 1, 0.0));
        state.projectiles.push(parked_shot(pos, Faction::Fire, 4, 0.0));

        tick(&mut state, &TickInput::default(), frame(500.0), &mut services);

        assert_eq!(state.player.health, 0);
        assert!(state.projectiles.is_empty());
        assert_eq!(count_events(&state, |e| matches!(e, GameEvent::PlayerDied { .. })), 1);
        assert_eq!(recorder.cue_count(Cue::Death), 1);
        assert_eq!(
            *recorder.scores.borrow(),
            vec![ScoreCall::KillOrDeath {
                total_score: 0,
                is_death: true
            }]
        );
        assert_eq!(state.timers.game_over_at, Some(1500.0));
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].size, PLAYER_EXPLOSION_SIZE);
    }

    #[test]
    fn test_dead_player_stops_moving() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        state.player.dead = true;
        state.player.health = 0;
        let start = state.player.pos;
        let input = TickInput {
            move_left: true,
            firing: true,
            ..Default::default()
        };

        tick(&mut state, &input, frame(0.0), &mut services);
        assert_eq!(state.player.pos, start);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_kill_scores_drops_and_requests_spawns() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = Vec2::new(300.0, 300.0);
        idle_enemy(&mut state, Faction::Default, pos);
        state.enemies[0].health = 1;
        state.projectiles.push(parked_shot(pos, Faction::Player, 1, 0.0));

        tick(&mut state, &TickInput::default(), frame(20.0), &mut services);

        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.stats.kill_count, 1);
        assert_eq!(state.stats.total_score, 1);
        assert_eq!(state.stats.damage_given, 1);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].pos, pos);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(recorder.cue_count(Cue::Kill), 1);
        assert_eq!(
            *recorder.scores.borrow(),
            vec![ScoreCall::KillOrDeath {
                total_score: 1,
                is_death: false
            }]
        );
        // One kill allows the base population of three
        assert_eq!(state.spawner.pending().len(), 3);
    }

    #[test]
    fn test_fire_kill_worth_three_and_mints() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let tuning = Tuning {
            mint_on_boss_kill: true,
            ..Tuning::default()
        };
        let mut state = playing(tuning);
        let pos = Vec2::new(300.0, 300.0);
        idle_enemy(&mut state, Faction::Fire, pos);
        state.enemies[0].health = 2;
        state.projectiles.push(parked_shot(pos, Faction::Player, 2, 0.0));

        tick(&mut state, &TickInput::default(), frame(20.0), &mut services);

        assert_eq!(state.stats.total_score, 3);
        assert_eq!(state.stats.kill_count, 1);
        assert_eq!(state.stats.fire_kill_count, 1);
        assert!(recorder
            .scores
            .borrow()
            .contains(&ScoreCall::Mint { kill_count: 1 }));
    }

    #[test]
    fn test_projectile_consumed_by_first_hit() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = Vec2::new(300.0, 300.0);
        idle_enemy(&mut state, Faction::Default, pos);
        idle_enemy(&mut state, Faction::Default, pos + Vec2::new(5.0, 0.0));
        state.projectiles.push(parked_shot(pos, Faction::Player, 1, 0.0));

        tick(&mut state, &TickInput::default(), frame(20.0), &mut services);

        let damaged = state.enemies.iter().filter(|e| e.health < e.max_health).count();
        assert_eq!(damaged, 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(count_events(&state, |e| matches!(e, GameEvent::EnemyDamaged { .. })), 1);
    }

    #[test]
    fn test_expired_projectile_pruned_before_hitting() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = state.player.pos;
        state.projectiles.push(parked_shot(pos, Faction::Default, 1, 0.0));

        tick(&mut state, &TickInput::default(), frame(3001.0), &mut services);

        assert_eq!(state.player.health, 4);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_heart_heals_only_when_hurt() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = state.player.pos;
        state.pickups.push(Pickup {
            kind: PickupKind::Heart,
            pos,
            spawned_at: 0.0,
        });

        tick(&mut state, &TickInput::default(), frame(10.0), &mut services);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.stats.heals_used, 0);

        state.player.health = 2;
        tick(&mut state, &TickInput::default(), frame(20.0), &mut services);
        assert!(state.pickups.is_empty());
        assert_eq!(state.player.health, 3);
        assert_eq!(state.stats.heals_used, 1);
        assert_eq!(recorder.cue_count(Cue::Heal), 1);
    }

    #[test]
    fn test_second_buff_restarts_timer() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        let pos = state.player.pos;
        let buff_at = |t: f64| Pickup {
            kind: PickupKind::Buff,
            pos,
            spawned_at: t,
        };

        state.pickups.push(buff_at(0.0));
        tick(&mut state, &TickInput::default(), frame(1000.0), &mut services);
        state.pickups.push(buff_at(5000.0));
        tick(&mut state, &TickInput::default(), frame(6000.0), &mut services);

        assert_eq!(state.stats.buffs_taken, 2);
        assert_eq!(state.player.buff.map(|b| b.expires_at), Some(16_000.0));

        // The first buff's expiry passes without ending the refreshed buff
        tick(&mut state, &TickInput::default(), frame(11_500.0), &mut services);
        assert!(state.player.is_buffed(11_500.0));
        assert_eq!(count_events(&state, |e| *e == GameEvent::BuffExpired), 0);

        tick(&mut state, &TickInput::default(), frame(16_000.0), &mut services);
        assert!(state.player.buff.is_none());
        assert_eq!(count_events(&state, |e| *e == GameEvent::BuffExpired), 1);
    }

    #[test]
    fn test_pickup_expires_out_of_reach() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        state.pickups.push(Pickup {
            kind: PickupKind::Buff,
            pos: Vec2::new(200.0, 200.0),
            spawned_at: 0.0,
        });

        tick(&mut state, &TickInput::default(), frame(7000.0), &mut services);
        assert_eq!(state.pickups.len(), 1);
        tick(&mut state, &TickInput::default(), frame(8001.0), &mut services);
        assert!(state.pickups.is_empty());
        assert_eq!(
            count_events(&state, |e| matches!(e, GameEvent::PickupExpired { .. })),
            1
        );
    }

    #[test]
    fn test_armed_enemy_fires_at_player() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        idle_enemy(&mut state, Faction::Default, Vec2::new(300.0, 360.0));
        state.enemies[0].armed_at = 0.0;

        tick(&mut state, &TickInput::default(), frame(100.0), &mut services);

        assert_eq!(state.projectiles.len(), 1);
        let shot = &state.projectiles[0];
        assert!(!shot.is_player);
        assert!(shot.vel.x > 0.0);
        assert_eq!(recorder.cue_count(Cue::Shoot), 0);
    }

    #[test]
    fn test_veteran_raises_max_health_only() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        state.stats.kill_count = 10;
        tick(&mut state, &TickInput::default(), frame(0.0), &mut services);
        assert_eq!(state.player.max_health, 4);

        state.stats.kill_count = 11;
        state.player.health = 3;
        tick(&mut state, &TickInput::default(), frame(16.0), &mut services);
        assert_eq!(state.player.max_health, 8);
        assert_eq!(state.player.health, 3);
    }

    #[test]
    fn test_explosions_advance_and_finish() {
        let recorder = Recorder::default();
        let mut services = recorder.services_with(StaticAssets {
            explosion_frames: 3,
            ..Default::default()
        });
        let mut state = playing(Tuning::default());
        state.explosions.push(Explosion::new(Vec2::ZERO, ENEMY_EXPLOSION_SIZE));

        tick(&mut state, &TickInput::default(), FrameTime::new(0.0, 1.5), &mut services);
        assert_eq!(state.explosions[0].frame, 2);
        tick(&mut state, &TickInput::default(), FrameTime::new(16.0, 1.0), &mut services);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_every_explosion_frame_is_visible_after_a_tick() {
        let recorder = Recorder::default();
        let mut services = recorder.services_with(StaticAssets {
            explosion_frames: 3,
            ..Default::default()
        });
        let mut state = playing(Tuning::default());
        let pos = Vec2::new(300.0, 300.0);
        idle_enemy(&mut state, Faction::Default, pos);
        state.enemies[0].health = 1;
        state.projectiles.push(parked_shot(pos, Faction::Player, 1, 0.0));

        let mut shown = Vec::new();
        let mut now = 20.0;
        for _ in 0..6 {
            tick(&mut state, &TickInput::default(), frame(now), &mut services);
            shown.extend(state.explosions.iter().map(|e| e.frame));
            now += 16.0;
        }
        assert_eq!(shown, vec![0, 1, 2]);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_spent_projectile_is_pruned_next_tick() {
        let recorder = Recorder::default();
        let mut services = recorder.services();
        let mut state = playing(Tuning::default());
        // Heading into the left border wall with the bounce budget used up
        let mut shot = Projectile::new(
            Vec2::new(42.0, 300.0),
            std::f32::consts::PI,
            5.0,
            Faction::Default,
            1,
            6.0,
            0,
            0.0,
        );
        shot.bounces = state.tuning.max_bounces;
        state.projectiles.push(shot);

        tick(&mut state, &TickInput::default(), frame(16.0), &mut services);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].spent);
        assert_eq!(state.projectiles[0].bounces, state.tuning.max_bounces);

        tick(&mut state, &TickInput::default(), frame(32.0), &mut services);
        assert!(state.projectiles.is_empty());
    }
}
