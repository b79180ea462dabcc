//! Game state and core simulation types
//!
//! Everything one session owns lives in `GameState`: the actors, the live
//! projectile/pickup/explosion collections, stats and timers. Components
//! mutate those collections only through the orchestrator.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::map::ArenaMap;
use super::spawner::Spawner;
use super::tuning::Tuning;
use crate::consts::*;
use crate::services::{AssetHandle, SpriteKey};
use crate::{angle_between, clamp_to_arena, heading};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session running
    Menu,
    /// 3-2-1 before play starts
    Countdown,
    /// Active gameplay
    Playing,
    /// Player destroyed, final stats shown
    GameOver,
}

/// Who an actor fights for; drives its stat profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Default,
    /// Boss-tier enemy: bigger, tougher, hits harder
    Fire,
}

/// Fixed per-faction stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionProfile {
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    pub bullet_radius: f32,
    pub bullet_damage: i32,
    /// Score awarded for destroying one
    pub points: u64,
}

const PLAYER_PROFILE: FactionProfile = FactionProfile {
    width: 70.0,
    height: 35.0,
    max_health: 4,
    bullet_radius: 7.0,
    bullet_damage: 1,
    points: 0,
};

const DEFAULT_PROFILE: FactionProfile = FactionProfile {
    width: 70.0,
    height: 35.0,
    max_health: 2,
    bullet_radius: 6.0,
    bullet_damage: 1,
    points: 1,
};

const FIRE_PROFILE: FactionProfile = FactionProfile {
    width: 100.0,
    height: 75.0,
    max_health: 4,
    bullet_radius: 18.0,
    bullet_damage: 4,
    points: 3,
};

/// Bullet radius while buffed
pub const BUFFED_BULLET_RADIUS: f32 = 18.0;
/// Damage multiplier while buffed
pub const BUFFED_DAMAGE_MULTIPLIER: i32 = 2;

impl Faction {
    pub fn profile(self) -> &'static FactionProfile {
        match self {
            Faction::Player => &PLAYER_PROFILE,
            Faction::Default => &DEFAULT_PROFILE,
            Faction::Fire => &FIRE_PROFILE,
        }
    }

    pub fn is_player(self) -> bool {
        self == Faction::Player
    }
}

/// What a destroyed enemy leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    Heart,
    Buff,
}

impl DropKind {
    /// Roll the drop for a kill: `r` uniform in [0, 10), `r > 7` is a buff
    pub fn roll(rng: &mut impl Rng) -> Self {
        let r: u32 = rng.random_range(0..10);
        if r > 7 { DropKind::Buff } else { DropKind::Heart }
    }
}

/// Result of applying damage to an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still standing
    Survived,
    /// Player health hit zero (reported once)
    Destroyed,
    /// Enemy health hit zero, with its drop
    Killed(DropKind),
    /// Hit landed on an actor already at zero health
    AlreadyDead,
}

/// Transient hit-shake, advanced once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shake {
    pub frames_left: u8,
    pub offset: Vec2,
}

impl Shake {
    pub fn start(&mut self, frames: u8) {
        self.frames_left = frames;
    }

    pub fn advance(&mut self, rng: &mut impl Rng) {
        if self.frames_left == 0 {
            self.offset = Vec2::ZERO;
            return;
        }
        self.offset = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
        self.frames_left -= 1;
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }
}

/// Active damage buff; refreshing replaces the expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub expires_at: f64,
}

/// Generated combat stats for an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub move_speed: f32,
    pub fire_rate_ms: f64,
    pub bullet_speed: f32,
    pub bullet_color: u32,
}

/// A player or enemy tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub faction: Faction,
    pub pos: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
    /// Movement speed (px/frame at multiplier 1)
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub width: f32,
    pub height: f32,
    /// Minimum ms between shots
    pub fire_rate_ms: f64,
    /// Wall-clock ms of the last shot
    pub last_shot: Option<f64>,
    /// Cannot fire before this wall-clock ms
    pub armed_at: f64,
    pub bullet_speed: f32,
    pub bullet_color: u32,
    pub buff: Option<Buff>,
    /// Set on the lethal hit; guards the terminal event
    pub dead: bool,
    pub shake: Shake,
    pub sprite: SpriteKey,
    #[serde(skip)]
    pub sprite_handle: Option<AssetHandle>,
}

impl Actor {
    fn with_profile(id: u32, faction: Faction, pos: Vec2, sprite: SpriteKey) -> Self {
        let profile = faction.profile();
        Self {
            id,
            faction,
            pos,
            angle: 0.0,
            speed: 0.0,
            health: profile.max_health,
            max_health: profile.max_health,
            width: profile.width,
            height: profile.height,
            fire_rate_ms: 0.0,
            last_shot: None,
            armed_at: f64::NEG_INFINITY,
            bullet_speed: 0.0,
            bullet_color: 0,
            buff: None,
            dead: false,
            shake: Shake::default(),
            sprite,
            sprite_handle: None,
        }
    }

    pub fn player(id: u32, pos: Vec2, tuning: &Tuning) -> Self {
        let mut actor = Self::with_profile(id, Faction::Player, pos, SpriteKey::Player);
        actor.speed = tuning.player_speed;
        actor.fire_rate_ms = tuning.player_fire_rate_ms;
        actor.bullet_speed = tuning.player_bullet_speed;
        actor.bullet_color = tuning.player_bullet_color;
        actor
    }

    pub fn enemy(id: u32, faction: Faction, pos: Vec2, stats: EnemyStats, sprite: SpriteKey) -> Self {
        let mut actor = Self::with_profile(id, faction, pos, sprite);
        actor.speed = stats.move_speed;
        actor.fire_rate_ms = stats.fire_rate_ms;
        actor.bullet_speed = stats.bullet_speed;
        actor.bullet_color = stats.bullet_color;
        actor
    }

    /// Move by a (pre-scaled) delta, staying inside the arena inset
    pub fn move_by(&mut self, delta: Vec2) {
        self.pos = clamp_to_arena(self.pos + delta);
    }

    /// Face a canvas-space point
    pub fn aim_at(&mut self, target: Vec2) {
        self.angle = angle_between(self.pos, target);
    }

    pub fn is_buffed(&self, now: f64) -> bool {
        self.buff.is_some_and(|b| now < b.expires_at)
    }

    /// Start or restart the buff; never stacks
    pub fn apply_buff(&mut self, now: f64, duration_ms: f64) -> f64 {
        let expires_at = now + duration_ms;
        self.buff = Some(Buff { expires_at });
        expires_at
    }

    /// Fire if the cooldown allows; the projectile leaves from the muzzle
    pub fn try_fire(&mut self, now: f64) -> Option<Projectile> {
        if now < self.armed_at {
            return None;
        }
        if let Some(last) = self.last_shot {
            if now - last <= self.fire_rate_ms {
                return None;
            }
        }
        self.last_shot = Some(now);

        let profile = self.faction.profile();
        let (radius, damage) = if self.is_buffed(now) {
            (BUFFED_BULLET_RADIUS, profile.bullet_damage * BUFFED_DAMAGE_MULTIPLIER)
        } else {
            (profile.bullet_radius, profile.bullet_damage)
        };
        let muzzle = self.pos + heading(self.angle) * MUZZLE_OFFSET;

        Some(Projectile::new(
            muzzle,
            self.angle,
            self.bullet_speed,
            self.faction,
            damage,
            radius,
            self.bullet_color,
            now,
        ))
    }

    /// Apply damage; health is clamped at zero on the lethal hit
    pub fn take_damage(&mut self, amount: i32, rng: &mut impl Rng, shake_frames: u8) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::AlreadyDead;
        }
        self.health = (self.health - amount).max(0);
        self.shake.start(shake_frames);

        if self.health > 0 {
            return DamageOutcome::Survived;
        }
        self.dead = true;
        if self.faction.is_player() {
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Killed(DropKind::roll(rng))
        }
    }

    /// Restore one point of health; false when already full
    pub fn heal(&mut self) -> bool {
        if self.health < self.max_health {
            self.health += 1;
            true
        } else {
            false
        }
    }

    /// Chase the target, face it, and shoot when the cooldown allows
    pub fn update_ai(&mut self, target: Vec2, now: f64, multiplier: f32) -> Option<Projectile> {
        self.aim_at(target);

        let to_target = target - self.pos;
        let dist = to_target.length();
        let step = self.speed * multiplier;
        if dist > step {
            self.move_by(to_target / dist * step);
        } else {
            self.move_by(to_target);
        }

        self.try_fire(now)
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Projectiles closer than this to the center hit the actor
    pub fn hit_radius(&self) -> f32 {
        if self.faction.is_player() {
            PLAYER_HIT_RADIUS
        } else {
            self.width / 2.0
        }
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Velocity (px/frame at multiplier 1), fixed at creation
    pub vel: Vec2,
    pub is_player: bool,
    /// Visual/damage tag
    pub kind: Faction,
    pub damage: i32,
    pub radius: f32,
    pub color: u32,
    pub bounces: u32,
    /// Hit a wall with no bounces left
    pub spent: bool,
    pub spawned_at: f64,
}

impl Projectile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pos: Vec2,
        angle: f32,
        speed: f32,
        kind: Faction,
        damage: i32,
        radius: f32,
        color: u32,
        now: f64,
    ) -> Self {
        Self {
            pos,
            vel: heading(angle) * speed,
            is_player: kind.is_player(),
            kind,
            damage,
            radius,
            color,
            bounces: 0,
            spent: false,
            spawned_at: now,
        }
    }

    pub fn is_expired(&self, now: f64, lifetime_ms: f64, max_bounces: u32) -> bool {
        now - self.spawned_at > lifetime_ms || self.spent || self.bounces > max_bounces
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Heart,
    Buff,
}

impl From<DropKind> for PickupKind {
    fn from(drop: DropKind) -> Self {
        match drop {
            DropKind::Heart => PickupKind::Heart,
            DropKind::Buff => PickupKind::Buff,
        }
    }
}

/// A heart or buff lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub spawned_at: f64,
}

impl Pickup {
    pub fn is_expired(&self, now: f64, lifetime_ms: f64) -> bool {
        now - self.spawned_at > lifetime_ms
    }
}

/// Explosion sprite size for a destroyed enemy
pub const ENEMY_EXPLOSION_SIZE: Vec2 = Vec2::new(100.0, 96.0);
/// Explosion sprite size for the player's death
pub const PLAYER_EXPLOSION_SIZE: Vec2 = Vec2::new(400.0, 395.0);

/// Explosion animation marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame: u32,
    pub size: Vec2,
}

impl Explosion {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, frame: 0, size }
    }

    /// Step the animation by `ceil(multiplier)` frames
    pub fn advance(&mut self, multiplier: f32) {
        self.frame += (multiplier.ceil() as u32).max(1);
    }

    pub fn is_finished(&self, frame_count: u32) -> bool {
        self.frame >= frame_count
    }
}

/// Per-session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_score: u64,
    pub kill_count: u32,
    pub fire_kill_count: u32,
    pub damage_taken: u32,
    pub damage_given: u32,
    pub heals_used: u32,
    pub buffs_taken: u32,
}

impl GameStats {
    /// Count a kill; returns the points awarded
    pub fn record_kill(&mut self, faction: Faction) -> u64 {
        let points = faction.profile().points;
        self.kill_count += 1;
        self.total_score += points;
        if faction == Faction::Fire {
            self.fire_kill_count += 1;
        }
        points
    }
}

/// Countdown progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub remaining: u32,
    pub next_tick_at: f64,
}

/// Wall-clock timers owned by the session; replaced wholesale on reset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTimers {
    pub countdown: Option<Countdown>,
    /// When the death delay ends and the session moves to game over
    pub game_over_at: Option<f64>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub map: ArenaMap,
    pub phase: GamePhase,
    pub player: Actor,
    pub enemies: Vec<Actor>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub explosions: Vec<Explosion>,
    pub stats: GameStats,
    pub spawner: Spawner,
    pub timers: SessionTimers,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    /// Wall-clock ms of the latest frame
    pub now_ms: f64,
    next_id: u32,
}

/// Where the player starts each session
pub fn player_start() -> Vec2 {
    Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0)
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Actor::player(0, player_start(), &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            map: ArenaMap::default(),
            phase: GamePhase::Menu,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            explosions: Vec::new(),
            stats: GameStats::default(),
            spawner: Spawner::default(),
            timers: SessionTimers::default(),
            events: Vec::new(),
            now_ms: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace every session-scoped value: entities, stats, timers, pending spawns
    pub fn reset_session(&mut self, now: f64) {
        let id = self.next_entity_id();
        self.player = Actor::player(id, player_start(), &self.tuning);
        self.enemies = Vec::new();
        self.projectiles = Vec::new();
        self.pickups = Vec::new();
        self.explosions = Vec::new();
        self.stats = GameStats::default();
        self.spawner = Spawner::default();
        self.timers = SessionTimers::default();
        self.now_ms = now;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Change phase, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            log::info!("Phase {:?} -> {:?}", from, to);
            self.phase = to;
            self.push_event(GameEvent::PhaseChanged { from, to });
        }
    }
}
