//! Post-frame entity snapshots and the draw contract
//!
//! The simulation never draws. After each frame the host captures a
//! `FrameSnapshot` and replays it into a `DrawSink` in fixed layer order.

use glam::Vec2;

use crate::services::{AssetHandle, SpriteKey};
use crate::settings::Settings;
use crate::sim::map::Cell;
use crate::sim::state::{Actor, Faction, GamePhase, GameState, GameStats, PickupKind};

/// A tank as drawn this frame
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSprite {
    pub id: u32,
    pub faction: Faction,
    pub sprite: SpriteKey,
    /// `None` when the asset was missing; the sink decides the fallback
    pub handle: Option<AssetHandle>,
    /// Center, shake offset already applied
    pub pos: Vec2,
    pub angle: f32,
    pub size: Vec2,
    pub health_ratio: f32,
    pub buffed: bool,
}

impl ActorSprite {
    fn capture(actor: &Actor, now: f64, shake: bool) -> Self {
        let offset = if shake { actor.shake.offset } else { Vec2::ZERO };
        Self {
            id: actor.id,
            faction: actor.faction,
            sprite: actor.sprite,
            handle: actor.sprite_handle,
            pos: actor.pos + offset,
            angle: actor.angle,
            size: Vec2::new(actor.width, actor.height),
            health_ratio: actor.health_ratio(),
            buffed: actor.is_buffed(now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub kind: Faction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupSprite {
    pub kind: PickupKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionSprite {
    pub pos: Vec2,
    pub frame: u32,
    pub size: Vec2,
}

/// Overlay numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub phase: GamePhase,
    /// Seconds left while counting down
    pub countdown: Option<u32>,
    pub stats: GameStats,
    pub health: i32,
    pub max_health: i32,
    /// Ms of buff left
    pub buff_remaining_ms: Option<f64>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub walls: Vec<Cell>,
    /// `None` once the player has exploded
    pub player: Option<ActorSprite>,
    pub enemies: Vec<ActorSprite>,
    pub projectiles: Vec<ProjectileSprite>,
    pub pickups: Vec<PickupSprite>,
    pub explosions: Vec<ExplosionSprite>,
    pub health_bars: bool,
    pub hud: Hud,
}

/// Draw contract, invoked once per entity in layer order
pub trait DrawSink {
    fn clear(&mut self);
    fn wall(&mut self, cell: Cell);
    fn pickup(&mut self, pickup: &PickupSprite);
    fn projectile(&mut self, projectile: &ProjectileSprite);
    fn actor(&mut self, actor: &ActorSprite);
    fn health_bar(&mut self, actor: &ActorSprite);
    fn explosion(&mut self, explosion: &ExplosionSprite);
    fn hud(&mut self, hud: &Hud);
}

impl FrameSnapshot {
    pub fn capture(state: &GameState, now: f64, settings: &Settings) -> Self {
        let shake = settings.effective_screen_shake();
        let in_session = matches!(
            state.phase,
            GamePhase::Countdown | GamePhase::Playing | GamePhase::GameOver
        );
        // Tanks and shots only show while a round is running
        let live = matches!(state.phase, GamePhase::Countdown | GamePhase::Playing);

        let player = (in_session && !state.player.dead)
            .then(|| ActorSprite::capture(&state.player, now, shake));

        let buff_remaining_ms = state
            .player
            .buff
            .map(|b| b.expires_at - now)
            .filter(|left| *left > 0.0);

        Self {
            walls: state.map.walls().collect(),
            player,
            enemies: state
                .enemies
                .iter()
                .filter(|_| live)
                .map(|e| ActorSprite::capture(e, now, shake))
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .filter(|_| live)
                .map(|p| ProjectileSprite {
                    pos: p.pos,
                    radius: p.radius,
                    color: p.color,
                    kind: p.kind,
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupSprite {
                    kind: p.kind,
                    pos: p.pos,
                })
                .collect(),
            explosions: state
                .explosions
                .iter()
                .map(|e| ExplosionSprite {
                    pos: e.pos,
                    frame: e.frame,
                    size: e.size,
                })
                .collect(),
            health_bars: settings.health_bars,
            hud: Hud {
                phase: state.phase,
                countdown: state.timers.countdown.map(|c| c.remaining),
                stats: state.stats.clone(),
                health: state.player.health,
                max_health: state.player.max_health,
                buff_remaining_ms,
            },
        }
    }

    /// Replay into a sink: map, pickups, projectiles, enemies, player,
    /// explosions, then the HUD
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        sink.clear();
        for cell in &self.walls {
            sink.wall(*cell);
        }
        for pickup in &self.pickups {
            sink.pickup(pickup);
        }
        for projectile in &self.projectiles {
            sink.projectile(projectile);
        }
        for enemy in self.enemies.iter().chain(self.player.as_ref()) {
            sink.actor(enemy);
            if self.health_bars {
                sink.health_bar(enemy);
            }
        }
        for explosion in &self.explosions {
            sink.explosion(explosion);
        }
        sink.hud(&self.hud);
    }
}
