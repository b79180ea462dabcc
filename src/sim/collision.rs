//! Collision detection and response
//!
//! Populations are tens of entities, so every check is a direct distance
//! test; no spatial partitioning.

use glam::Vec2;

use super::map::{ArenaMap, Cell};
use super::state::{Actor, Projectile};

/// Outcome of moving a projectile one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallContact {
    /// Open space
    Clear,
    /// Reflected off a wall
    Bounced,
    /// Hit a wall with no bounces left; pruned on the next lifetime check
    Spent,
}

/// Center distance strictly below `radius`
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Move a projectile by its velocity scaled by the frame multiplier,
/// reflecting off wall cells.
///
/// On entering a blocked cell the velocity component for each crossed axis
/// is flipped and the projectile restarts from its previous position along
/// the reflected velocity, which points away from the wall it just hit.
/// A projectile already inside a wall turns straight back each frame until
/// its bounce budget runs out.
pub fn advance_projectile(
    projectile: &mut Projectile,
    map: &ArenaMap,
    multiplier: f32,
    max_bounces: u32,
) -> WallContact {
    let prev = projectile.pos;
    projectile.pos += projectile.vel * multiplier;

    let next_cell = Cell::containing(projectile.pos);
    if !map.is_blocked(next_cell) {
        return WallContact::Clear;
    }
    if projectile.bounces >= max_bounces {
        projectile.spent = true;
        return WallContact::Spent;
    }

    let prev_cell = Cell::containing(prev);
    let crossed_x = next_cell.col != prev_cell.col;
    let crossed_y = next_cell.row != prev_cell.row;

    if crossed_x {
        projectile.vel.x = -projectile.vel.x;
    }
    if crossed_y {
        projectile.vel.y = -projectile.vel.y;
    }
    if !crossed_x && !crossed_y {
        // Started inside a wall: turn straight back
        projectile.vel = -projectile.vel;
    }

    projectile.bounces += 1;
    projectile.pos = prev + projectile.vel * multiplier;
    WallContact::Bounced
}

/// Whether the projectile has left the map entirely
pub fn out_of_bounds(projectile: &Projectile, map: &ArenaMap) -> bool {
    !map.contains(projectile.pos)
}

/// Index of the first actor whose hit radius contains `point`
pub fn first_hit(point: Vec2, actors: &[Actor]) -> Option<usize> {
    actors
        .iter()
        .position(|actor| within(point, actor.pos, actor.hit_radius()))
}
