use log::{debug, info, warn};
use rand::Rng;

use crate::collision;
use crate::constants::*;
use crate::entities::{Asteroid, Bullet, Ship, ShipEvent};
use crate::input::KeyState;
use crate::types::Vector2D;

/// Centred banner text that fades after being set.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub text: String,
    pub alpha: f64,
}

impl Overlay {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.alpha = 1.0;
    }

    /// Linear fade; alpha keeps dropping below zero and is never clamped.
    pub fn fade(&mut self) {
        if self.alpha >= 0.0 {
            self.alpha -= 1.0 / TEXT_FADE_SECONDS / FPS as f64;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.alpha >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    LevelCleared,
    GameOver,
}

pub struct Session {
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub ship: Option<Ship>,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub overlay: Overlay,
}

impl Session {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut session = Session {
            level: 0,
            score: 0,
            lives: GAME_LIVES,
            ship: Some(Ship::spawn()),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            overlay: Overlay { text: String::new(), alpha: 1.0 },
        };
        session.new_level(rng);
        session
    }

    /// Announces the level and spawns `ASTEROID_NUM + level` large asteroids.
    pub fn new_level(&mut self, rng: &mut impl Rng) {
        self.overlay.show(format!("Level {}", self.level + 1));
        let ship = self.ship.as_ref().map(|ship| (ship.position, ship.radius));
        self.asteroids = (0..ASTEROID_NUM + self.level as usize)
            .map(|_| Asteroid::new(spawn_position(ship, rng), ASTEROID_SIZE, rng))
            .collect();
        info!("Level {} started with {} asteroids", self.level + 1, self.asteroids.len());
    }

    pub fn is_over(&self) -> bool {
        self.ship.is_none()
    }

    pub fn update(&mut self, keys: &KeyState, rng: &mut impl Rng) -> SessionEvent {
        if self.is_over() {
            return SessionEvent::GameOver;
        }

        if let Some(ship) = self.ship.as_mut() {
            match ship.update(keys) {
                ShipEvent::Fired(bullet) => self.bullets.push(bullet),
                ShipEvent::ExplosionFinished => self.lose_life(),
                ShipEvent::None => {}
            }
        }

        self.bullets.retain_mut(|bullet| bullet.update());
        for asteroid in self.asteroids.iter_mut() {
            asteroid.update();
        }

        if self.is_over() {
            return SessionEvent::GameOver;
        }

        let report = collision::resolve(self.ship.as_mut(), &mut self.bullets, &mut self.asteroids, rng);
        if report.ship_hit {
            info!("Ship hit an asteroid with {} lives left", self.lives);
        }
        if report.asteroids_hit > 0 {
            debug!("{} asteroids hit for {} points", report.asteroids_hit, report.points);
        }
        self.score += report.points;

        let event = if self.asteroids.is_empty() {
            self.level += 1;
            self.new_level(rng);
            SessionEvent::LevelCleared
        } else {
            SessionEvent::None
        };

        self.overlay.fade();
        event
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            info!("Last life lost with score {}", self.score);
            self.ship = None;
        } else {
            info!("Respawning ship, {} lives left", self.lives);
            self.ship = Some(Ship::spawn());
        }
    }
}

/// Uniform integer position at least `2 * ASTEROID_SIZE + ship radius` from
/// the ship. Gives up after `MAX_SPAWN_ATTEMPTS` and uses the point furthest
/// from the ship on the torus.
pub fn spawn_position(ship: Option<(Vector2D, f64)>, rng: &mut impl Rng) -> Vector2D {
    let Some((ship_position, ship_radius)) = ship else {
        return random_world_point(rng);
    };
    let exclusion = ASTEROID_SIZE * 2.0 + ship_radius;
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = random_world_point(rng);
        if candidate.distance(ship_position) >= exclusion {
            return candidate;
        }
    }
    warn!("No asteroid spawn point found after {} attempts", MAX_SPAWN_ATTEMPTS);
    Vector2D::new(
        (ship_position.x + WORLD_WIDTH / 2.0).rem_euclid(WORLD_WIDTH),
        (ship_position.y + WORLD_HEIGHT / 2.0).rem_euclid(WORLD_HEIGHT),
    )
}

fn random_world_point(rng: &mut impl Rng) -> Vector2D {
    Vector2D::new(
        (rng.gen_range(0.0..1.0) * WORLD_WIDTH).floor(),
        (rng.gen_range(0.0..1.0) * WORLD_HEIGHT).floor(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn new_session_starts_on_level_one() {
        let mut rng = StdRng::seed_from_u64(21);
        let session = Session::new(&mut rng);
        assert_eq!((session.level, session.score, session.lives), (0, 0, GAME_LIVES));
        assert_eq!(session.asteroids.len(), ASTEROID_NUM);
        assert_eq!(session.overlay.text, "Level 1");
        let ship = session.ship.as_ref().unwrap();
        for asteroid in &session.asteroids {
            assert!(asteroid.position.distance(ship.position) >= 2.0 * ASTEROID_SIZE + ship.radius);
            assert_eq!(asteroid.radius(), ASTEROID_SIZE);
        }
    }

    #[test]
    fn spawn_gives_up_when_no_point_is_far_enough() {
        struct Fixed;
        impl rand::RngCore for Fixed {
            fn next_u32(&mut self) -> u32 { 0 }
            fn next_u64(&mut self) -> u64 { 0 }
            fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0) }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }
        // Every draw lands on the ship at the origin.
        let p = spawn_position(Some((Vector2D::new(0.0, 0.0), 15.0)), &mut Fixed);
        assert_eq!(p, Vector2D::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0));
    }

    #[test]
    fn overlay_fades_linearly_and_goes_negative() {
        let mut overlay = Overlay { text: String::new(), alpha: 0.0 };
        overlay.show("Level 2");
        for _ in 0..frames(TEXT_FADE_SECONDS) {
            overlay.fade();
        }
        assert!(overlay.alpha.abs() < 1e-9);
        overlay.fade();
        assert!(!overlay.is_visible());
        let after = overlay.alpha;
        overlay.fade();
        assert_eq!(overlay.alpha, after);
    }

    #[test]
    fn clearing_the_field_starts_the_next_level() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut session = Session::new(&mut rng);
        session.asteroids.clear();
        let event = session.update(&KeyState::default(), &mut rng);
        assert_eq!(event, SessionEvent::LevelCleared);
        assert_eq!(session.level, 1);
        assert_eq!(session.asteroids.len(), ASTEROID_NUM + 1);
        assert_eq!(session.overlay.text, "Level 2");
    }

    #[test]
    fn losing_the_last_life_ends_the_session() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::new(&mut rng);
        session.lives = 1;
        session.ship.as_mut().unwrap().explode();
        let mut event = SessionEvent::None;
        for _ in 0..frames(SHIP_EXPLODE_SECONDS) {
            event = session.update(&KeyState::default(), &mut rng);
        }
        assert_eq!(event, SessionEvent::GameOver);
        assert_eq!(session.lives, 0);
        assert!(session.ship.is_none());
    }

    #[test]
    fn losing_a_life_respawns_an_invulnerable_ship() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::new(&mut rng);
        session.ship.as_mut().unwrap().explode();
        for _ in 0..frames(SHIP_EXPLODE_SECONDS) {
            session.update(&KeyState::default(), &mut rng);
        }
        assert_eq!(session.lives, GAME_LIVES - 1);
        let ship = session.ship.as_ref().unwrap();
        assert!(!ship.is_exploding());
        assert!(ship.is_invulnerable());
    }
}
