//! Collections are scanned from the back so that removals never disturb the
//! indices still to be visited.

use log::debug;
use rand::Rng;

use crate::entities::{Asteroid, Bullet, Ship};
use crate::types::circles_overlap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    pub ship_hit: bool,
    pub asteroids_hit: u32,
    pub points: u32,
}

/// Explodes the ship on the first overlapping asteroid. Invulnerable or
/// already exploding ships are never hit.
pub fn ship_vs_asteroids(ship: &mut Ship, asteroids: &[Asteroid]) -> bool {
    if !ship.can_collide() {
        return false;
    }
    let hit = asteroids
        .iter()
        .rev()
        .any(|asteroid| circles_overlap(ship.position, ship.radius, asteroid.position, asteroid.radius()));
    if hit {
        ship.explode();
    }
    hit
}

/// Removes the asteroid at `index`, appending its children. Returns the removed asteroid.
pub fn break_asteroid(asteroids: &mut Vec<Asteroid>, index: usize, rng: &mut impl Rng) -> Asteroid {
    let children = asteroids[index].split(rng);
    asteroids.extend(children);
    asteroids.remove(index)
}

/// Each live bullet destroys at most one asteroid per tick. Returns (hits, points).
pub fn bullets_vs_asteroids(bullets: &mut [Bullet], asteroids: &mut Vec<Asteroid>, rng: &mut impl Rng) -> (u32, u32) {
    let mut hits = 0;
    let mut points = 0;
    for bullet in bullets.iter_mut().rev() {
        if bullet.is_exploding() {
            continue;
        }
        let target = (0..asteroids.len()).rev().find(|&j| {
            circles_overlap(bullet.position, bullet.radius(), asteroids[j].position, asteroids[j].radius())
        });
        if let Some(j) = target {
            bullet.explode();
            let destroyed = break_asteroid(asteroids, j, rng);
            let value = destroyed.score_value();
            debug!("Asteroid of radius {} destroyed for {} points", destroyed.radius(), value);
            hits += 1;
            points += value;
        }
    }
    (hits, points)
}

/// Runs every check for one tick: the ship first, then the bullets.
pub fn resolve(
    ship: Option<&mut Ship>,
    bullets: &mut [Bullet],
    asteroids: &mut Vec<Asteroid>,
    rng: &mut impl Rng,
) -> CollisionReport {
    let ship_hit = ship.is_some_and(|ship| ship_vs_asteroids(ship, asteroids));
    let (asteroids_hit, points) = bullets_vs_asteroids(bullets, asteroids, rng);
    CollisionReport { ship_hit, asteroids_hit, points }
}
