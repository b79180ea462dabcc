//! Canvas 2D draw sink
//!
//! Draws every layer with primitive shapes; sprite handles only select a
//! tint, so a missing asset still renders.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::snapshot::{ActorSprite, DrawSink, ExplosionSprite, Hud, PickupSprite, ProjectileSprite};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, CELL_SIZE};
use crate::services::SpriteKey;
use crate::sim::map::Cell;
use crate::sim::state::{GamePhase, PickupKind};

const BACKGROUND: &str = "#1b1f1a";
const WALL: &str = "#4a4f3a";
const PLAYER_BODY: &str = "#c005c7";
const FIRE_BODY: &str = "#d9480f";
const ENEMY_BODIES: [&str; 5] = ["#6b7d3a", "#7a6a45", "#3f6b5a", "#5d5d75", "#7d4e3a"];
const BUFF_GLOW: &str = "#ffd43b";

fn css(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

pub struct CanvasSink {
    ctx: CanvasRenderingContext2d,
    /// Total explosion frames, for the fade
    explosion_frames: u32,
}

impl CanvasSink {
    pub fn new(ctx: CanvasRenderingContext2d, explosion_frames: u32) -> Self {
        Self {
            ctx,
            explosion_frames: explosion_frames.max(1),
        }
    }

    fn circle(&self, x: f32, y: f32, r: f32, fill: &str) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x as f64, y as f64, r.max(0.0) as f64, 0.0, TAU);
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str, align: &str) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align);
        self.ctx.set_fill_style_str("#ffffff");
        let _ = self.ctx.fill_text(text, x, y);
    }
}

impl DrawSink for CanvasSink {
    fn clear(&mut self) {
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx
            .fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    }

    fn wall(&mut self, cell: Cell) {
        self.ctx.set_fill_style_str(WALL);
        self.ctx.fill_rect(
            (cell.col as f32 * CELL_SIZE) as f64,
            (cell.row as f32 * CELL_SIZE) as f64,
            CELL_SIZE as f64,
            CELL_SIZE as f64,
        );
    }

    fn pickup(&mut self, pickup: &PickupSprite) {
        let color = match pickup.kind {
            PickupKind::Heart => "#e03131",
            PickupKind::Buff => BUFF_GLOW,
        };
        self.circle(pickup.pos.x, pickup.pos.y, 12.0, color);
    }

    fn projectile(&mut self, projectile: &ProjectileSprite) {
        self.circle(projectile.pos.x, projectile.pos.y, projectile.radius, &css(projectile.color));
    }

    fn actor(&mut self, actor: &ActorSprite) {
        let body = match actor.sprite {
            SpriteKey::Player => PLAYER_BODY,
            SpriteKey::Fire => FIRE_BODY,
            SpriteKey::Enemy(i) => ENEMY_BODIES[i as usize % ENEMY_BODIES.len()],
        };
        if actor.handle.is_none() {
            log::trace!("Drawing {:?} without sprite", actor.sprite);
        }

        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(actor.pos.x as f64, actor.pos.y as f64);
        let _ = ctx.rotate(actor.angle as f64);

        let (w, h) = (actor.size.x as f64, actor.size.y as f64);
        if actor.buffed {
            ctx.set_fill_style_str(BUFF_GLOW);
            ctx.fill_rect(-w / 2.0 - 3.0, -h / 2.0 - 3.0, w + 6.0, h + 6.0);
        }
        ctx.set_fill_style_str(body);
        ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        // Barrel
        ctx.set_fill_style_str("#222222");
        ctx.fill_rect(0.0, -4.0, w / 2.0 + 8.0, 8.0);
        ctx.restore();
    }

    fn health_bar(&mut self, actor: &ActorSprite) {
        let width = actor.size.x as f64;
        let x = actor.pos.x as f64 - width / 2.0;
        let y = (actor.pos.y - actor.size.y / 2.0) as f64 - 12.0;
        self.ctx.set_fill_style_str("#330000");
        self.ctx.fill_rect(x, y, width, 5.0);
        self.ctx.set_fill_style_str("#2f9e44");
        self.ctx
            .fill_rect(x, y, width * actor.health_ratio.clamp(0.0, 1.0) as f64, 5.0);
    }

    fn explosion(&mut self, explosion: &ExplosionSprite) {
        let progress = (explosion.frame as f32 / self.explosion_frames as f32).min(1.0);
        let radius = explosion.size.x.max(explosion.size.y) / 2.0 * (0.4 + 0.6 * progress);
        self.ctx.set_global_alpha((1.0 - progress) as f64);
        self.circle(explosion.pos.x, explosion.pos.y, radius, "#ff922b");
        self.ctx.set_global_alpha(1.0);
    }

    fn hud(&mut self, hud: &Hud) {
        let stats = &hud.stats;
        self.text(
            &format!("Score: {}   Kills: {}", stats.total_score, stats.kill_count),
            20.0,
            30.0,
            "20px sans-serif",
            "left",
        );
        self.text(
            &format!("HP: {}/{}", hud.health, hud.max_health),
            20.0,
            56.0,
            "20px sans-serif",
            "left",
        );
        if let Some(ms) = hud.buff_remaining_ms {
            self.text(
                &format!("Buff: {:.1}s", ms / 1000.0),
                20.0,
                82.0,
                "20px sans-serif",
                "left",
            );
        }

        let (cx, cy) = (CANVAS_WIDTH as f64 / 2.0, CANVAS_HEIGHT as f64 / 2.0);
        match hud.phase {
            GamePhase::Menu => {
                self.text("MONDALAK", cx, cy - 20.0, "64px sans-serif", "center");
                self.text("Press Enter to start", cx, cy + 40.0, "24px sans-serif", "center");
            }
            GamePhase::Countdown => {
                if let Some(n) = hud.countdown {
                    self.text(&n.to_string(), cx, cy, "96px sans-serif", "center");
                }
            }
            GamePhase::Playing => {}
            GamePhase::GameOver => {
                self.text("GAME OVER", cx, cy - 60.0, "64px sans-serif", "center");
                let lines = [
                    format!("Score: {}", stats.total_score),
                    format!("Kills: {} (fire: {})", stats.kill_count, stats.fire_kill_count),
                    format!("Damage dealt: {}  taken: {}", stats.damage_given, stats.damage_taken),
                    format!("Heals: {}  Buffs: {}", stats.heals_used, stats.buffs_taken),
                    "Press Enter to play again".to_string(),
                ];
                for (i, line) in lines.iter().enumerate() {
                    self.text(line, cx, cy + i as f64 * 30.0, "22px sans-serif", "center");
                }
            }
        }
    }
}
