use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use log::debug;
use rand::Rng;

use crate::assets::AsciiArt;
use crate::constants::*;
use crate::input::KeyState;
use crate::rendering::{Canvas, Color, Fill};
use crate::types::{Vector2D, heading, wrap_coordinate};

// --- Ship ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipPhase {
    Alive,
    Exploding { remaining: u32 },
}

/// What happened to the ship during one tick.
#[derive(Debug)]
pub enum ShipEvent {
    None,
    Fired(Bullet),
    /// The explosion countdown ran out; the session decides between respawn and game over.
    ExplosionFinished,
}

pub struct Ship {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub angle: f64, // Radians, y-up: 0 faces right, pi/2 faces up
    pub radius: f64,
    pub phase: ShipPhase,
    pub blink_num: u32, // Ticks of invulnerability left
    pub shoot_cooldown: u32,
    thrusting: bool,
    age: u32,
}

impl Ship {
    pub fn new(x: f64, y: f64) -> Self {
        Ship {
            position: Vector2D::new(x, y),
            velocity: Vector2D::default(),
            angle: FRAC_PI_2, // Facing upwards initially
            radius: ship_radius(),
            phase: ShipPhase::Alive,
            blink_num: frames(SHIP_INVULNERABLE_SECONDS),
            shoot_cooldown: 0,
            thrusting: false,
            age: 0,
        }
    }

    pub fn spawn() -> Self {
        Ship::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.phase, ShipPhase::Exploding { .. })
    }

    pub fn is_invulnerable(&self) -> bool {
        self.blink_num > 0
    }

    /// Only a solid, non-exploding ship takes part in collisions.
    pub fn can_collide(&self) -> bool {
        !self.is_exploding() && !self.is_invulnerable()
    }

    /// Blink duty cycle: visible for one period, hidden for the next.
    pub fn is_visible(&self) -> bool {
        if self.is_exploding() {
            return false;
        }
        if self.blink_num == 0 {
            return true;
        }
        let elapsed = frames(SHIP_INVULNERABLE_SECONDS) - self.blink_num;
        (elapsed / frames(1.0 / SHIP_BLINKS_PER_SECOND)) % 2 == 0
    }

    pub fn explode(&mut self) {
        if self.is_exploding() {
            return;
        }
        self.phase = ShipPhase::Exploding { remaining: frames(SHIP_EXPLODE_SECONDS) };
        self.velocity = Vector2D::default();
        self.thrusting = false;
        debug!("Ship exploding at ({:.1}, {:.1})", self.position.x, self.position.y);
    }

    pub fn shoot(&mut self) -> Option<Bullet> {
        if self.shoot_cooldown > 0 || self.is_exploding() {
            return None;
        }
        self.shoot_cooldown = frames(SHOOT_COOLDOWN_SECONDS);
        Some(Bullet::new(self.position, self.angle))
    }

    pub fn update(&mut self, keys: &KeyState) -> ShipEvent {
        self.age = self.age.wrapping_add(1);

        if let ShipPhase::Exploding { remaining } = self.phase {
            let remaining = remaining.saturating_sub(1);
            self.phase = ShipPhase::Exploding { remaining };
            return if remaining == 0 { ShipEvent::ExplosionFinished } else { ShipEvent::None };
        }

        if self.blink_num > 0 {
            self.blink_num -= 1;
        }

        self.steer(keys);
        self.position = self.position.add(self.velocity);

        // Screen wrapping
        self.position.x = wrap_coordinate(self.position.x, WORLD_WIDTH, self.radius);
        self.position.y = wrap_coordinate(self.position.y, WORLD_HEIGHT, self.radius);

        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }

        if keys.shoot {
            if let Some(bullet) = self.shoot() {
                return ShipEvent::Fired(bullet);
            }
        }
        ShipEvent::None
    }

    /// Velocity is reset every tick; each held direction sets its own axis at full speed.
    fn steer(&mut self, keys: &KeyState) {
        let speed = per_frame(SHIP_SPEED);
        self.velocity = Vector2D::default();

        if keys.left {
            self.velocity.x = -speed;
            self.angle = PI;
        }
        if keys.right {
            self.velocity.x = speed;
            self.angle = 0.0;
        }
        if keys.up {
            self.velocity.y = -speed;
            self.angle = FRAC_PI_2;
        }
        if keys.down {
            self.velocity.y = speed;
            self.angle = 3.0 * FRAC_PI_2;
        }

        if keys.up && keys.left {
            self.angle = 3.0 * FRAC_PI_4;
        } else if keys.up && keys.right {
            self.angle = FRAC_PI_4;
        } else if keys.down && keys.left {
            self.angle = 5.0 * FRAC_PI_4;
        } else if keys.down && keys.right {
            self.angle = 7.0 * FRAC_PI_4;
        }

        self.thrusting = keys.any_direction();
    }

    /// Nose, then the two rear wing tips.
    pub fn hull(&self) -> [Vector2D; 3] {
        [
            self.position.offset(self.angle, self.radius * 1.5),
            self.position.offset(self.angle + 0.7 * PI, self.radius * 0.5),
            self.position.offset(self.angle - 0.7 * PI, self.radius * 0.5),
        ]
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.is_exploding() {
            for (scale, color) in [
                (1.7, Color::DARK_RED),
                (1.4, Color::RED),
                (1.1, Color::ORANGE),
                (0.8, Color::YELLOW),
                (0.5, Color::WHITE),
            ] {
                canvas.fill_circle(self.position, self.radius * scale, color);
            }
            return;
        }
        if !self.is_visible() {
            return;
        }

        let hull = self.hull();
        canvas.fill_polygon(&hull, Fill::Solid(Color::GREY));
        canvas.stroke_polygon(&hull, Color::WHITE);

        let engine = self.position.offset(self.angle, -self.radius * 0.7);
        canvas.fill_circle(engine, self.radius * 0.4, Color::DARK_GREY);
        if self.thrusting {
            let flicker = (self.age % 3) as f64 * 0.05;
            canvas.fill_circle(engine, self.radius * (0.3 + flicker), Color::CYAN);
        }
        canvas.fill_circle(self.position.offset(self.angle, self.radius * 0.5), self.radius * 0.3, Color::SKY_BLUE);
    }
}

/// Small ship outline used for the lives counter.
pub fn draw_life_icon(canvas: &mut dyn Canvas, center: Vector2D, color: Color) {
    let half = SHIP_SIZE / 2.0;
    let nose = Vector2D::new(center.x, center.y - half);
    let rear_left = Vector2D::new(center.x - half, center.y + half);
    let rear_right = Vector2D::new(center.x + half, center.y + half);
    canvas.stroke_polygon(&[nose, rear_left, rear_right], color);
}

// --- Bullet ---

#[derive(Debug, Clone)]
pub struct Bullet {
    pub position: Vector2D,
    velocity: Vector2D,
    radius: f64,
    pub distance_traveled: f64,
    explode_time: u32,
}

impl Bullet {
    pub fn new(position: Vector2D, angle: f64) -> Self {
        Bullet {
            position,
            velocity: heading(angle).scale(per_frame(BULLET_SPEED)),
            radius: bullet_radius(),
            distance_traveled: 0.0,
            explode_time: 0,
        }
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_exploding(&self) -> bool {
        self.explode_time > 0
    }

    pub fn explode(&mut self) {
        self.explode_time = frames(BULLET_EXPLODE_SECONDS);
    }

    /// Advances one tick. Returns false once the bullet should leave the collection.
    pub fn update(&mut self) -> bool {
        if self.is_exploding() {
            self.explode_time -= 1;
            return self.explode_time > 0;
        }

        self.position = self.position.add(self.velocity);
        self.distance_traveled += self.velocity.length();

        // Screen wrapping
        self.position.x = wrap_coordinate(self.position.x, WORLD_WIDTH, 0.0);
        self.position.y = wrap_coordinate(self.position.y, WORLD_HEIGHT, 0.0);

        self.distance_traveled <= BULLET_MAX_DIST * WORLD_WIDTH
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.is_exploding() {
            canvas.fill_circle(self.position, self.radius, Color::LIME);
            return;
        }
        canvas.fill_circle(self.position, self.radius * 0.75, Color::ORANGE_RED);
        canvas.fill_circle(self.position, self.radius * 0.5, Color::SALMON);
        canvas.fill_circle(self.position, self.radius * 0.25, Color::PINK);
    }
}

// --- Asteroid ---

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    radius: f64,
    pub angle: f64,
    pub rotation_speed: f64,
    offsets: Vec<f64>, // One radius multiplier per vertex, fixed for life
}

fn random_signed(rng: &mut impl Rng, max: f64) -> f64 {
    let magnitude = rng.gen_range(0.0..1.0) * max;
    if rng.gen_bool(0.5) { magnitude } else { -magnitude }
}

impl Asteroid {
    pub fn new(position: Vector2D, radius: f64, rng: &mut impl Rng) -> Self {
        let step = per_frame(ASTEROID_SPEED);
        let velocity = Vector2D::new(random_signed(rng, step), random_signed(rng, step));
        let angle = rng.gen_range(0.0..2.0 * PI);
        let rotation_speed = random_signed(rng, step);

        let average = ASTEROID_VERTICES as f64;
        let vertices = (rng.gen_range(0.0..1.0) * (average + 1.0) + average / 2.0).floor() as usize;
        let offsets = (0..vertices)
            .map(|_| rng.gen_range(0.0..1.0) * ASTEROID_JAGGEDNESS * 2.0 + 1.0 - ASTEROID_JAGGEDNESS)
            .collect();

        Asteroid { position, velocity, radius, angle, rotation_speed, offsets }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn is_minimum_tier(&self) -> bool {
        self.radius <= min_asteroid_radius()
    }

    /// Points awarded for destroying this asteroid; smaller is worth more.
    pub fn score_value(&self) -> u32 {
        ((ASTEROID_SIZE - self.radius) / ASTEROID_SIZE * 100.0 + 50.0).round() as u32
    }

    /// Replacement asteroids after a hit: none at the smallest tier, otherwise
    /// two at half the radius with their own motion and silhouette.
    pub fn split(&self, rng: &mut impl Rng) -> Vec<Asteroid> {
        if self.is_minimum_tier() {
            return Vec::new();
        }
        let radius = (self.radius / 2.0).ceil();
        vec![
            Asteroid::new(self.position, radius, rng),
            Asteroid::new(self.position, radius, rng),
        ]
    }

    /// Silhouette in world coordinates at the current rotation.
    pub fn vertices(&self) -> Vec<Vector2D> {
        let count = self.offsets.len() as f64;
        self.offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let theta = i as f64 * 2.0 * PI / count + self.angle;
                let r = self.radius * offset;
                Vector2D::new(self.position.x + r * theta.cos(), self.position.y + r * theta.sin())
            })
            .collect()
    }

    pub fn update(&mut self) {
        self.position = self.position.add(self.velocity);
        self.angle += self.rotation_speed / FPS as f64;

        // Screen wrapping
        self.position.x = wrap_coordinate(self.position.x, WORLD_WIDTH, self.radius);
        self.position.y = wrap_coordinate(self.position.y, WORLD_HEIGHT, self.radius);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, texture: Option<&AsciiArt>) {
        let outline = self.vertices();
        let fill = match texture {
            Some(art) => Fill::Texture(art, Color::DARK_GREY),
            None => Fill::Solid(Color::SLATE_GREY),
        };
        canvas.fill_polygon(&outline, fill);
        canvas.stroke_polygon(&outline, Color::WHITE);
    }
}
