use rand::Rng;

use crate::constants::*;
use crate::rendering::{Canvas, Color};
use crate::types::Vector2D;

pub struct Star {
    pub position: Vector2D,
    pub radius: f64,
}

fn inward(rng: &mut impl Rng) -> f64 {
    (rng.gen_range(0.0..1.0) * 0.5 + 0.5) * per_frame(SHOOTING_STAR_SPEED)
}

/// Sideways drift along the edge it entered from.
fn drift(rng: &mut impl Rng) -> f64 {
    (rng.gen_range(0.0..1.0) - 0.5) * per_frame(SHOOTING_STAR_SPEED)
}

pub struct ShootingStar {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub alpha: f64,
    pub fade_rate: f64,
}

impl ShootingStar {
    /// Enters from a random edge heading broadly inwards.
    pub fn spawn(rng: &mut impl Rng) -> Self {
        let (position, velocity) = match rng.gen_range(0..4) {
            0 => (
                Vector2D::new(rng.gen_range(0.0..WORLD_WIDTH), -SHOOTING_STAR_LENGTH),
                Vector2D::new(drift(rng), inward(rng)),
            ),
            1 => (
                Vector2D::new(WORLD_WIDTH + SHOOTING_STAR_LENGTH, rng.gen_range(0.0..WORLD_HEIGHT)),
                Vector2D::new(-inward(rng), drift(rng)),
            ),
            2 => (
                Vector2D::new(rng.gen_range(0.0..WORLD_WIDTH), WORLD_HEIGHT + SHOOTING_STAR_LENGTH),
                Vector2D::new(drift(rng), -inward(rng)),
            ),
            _ => (
                Vector2D::new(-SHOOTING_STAR_LENGTH, rng.gen_range(0.0..WORLD_HEIGHT)),
                Vector2D::new(inward(rng), drift(rng)),
            ),
        };
        ShootingStar {
            position,
            velocity,
            alpha: 1.0,
            // Fades out over twice the time it takes to cross its own length.
            fade_rate: 1.0 / (FPS as f64 * (SHOOTING_STAR_LENGTH / SHOOTING_STAR_SPEED) * 2.0),
        }
    }

    /// Returns false once faded or off screen.
    pub fn update(&mut self) -> bool {
        self.position = self.position.add(self.velocity);
        self.alpha -= self.fade_rate;
        let margin = SHOOTING_STAR_LENGTH;
        self.alpha > 0.0
            && self.position.x >= -margin
            && self.position.x <= WORLD_WIDTH + margin
            && self.position.y >= -margin
            && self.position.y <= WORLD_HEIGHT + margin
    }

    pub fn tail(&self) -> Vector2D {
        let scale = SHOOTING_STAR_LENGTH / per_frame(SHOOTING_STAR_SPEED);
        Vector2D::new(self.position.x - self.velocity.x * scale, self.position.y - self.velocity.y * scale)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.line(self.position, self.tail(), Color::STARLIGHT.with_alpha(self.alpha));
    }
}

pub struct StarField {
    pub stars: Vec<Star>,
    pub shooting_stars: Vec<ShootingStar>,
}

impl StarField {
    pub fn new(rng: &mut impl Rng) -> Self {
        let stars = (0..NUM_STARS)
            .map(|_| Star {
                position: Vector2D::new(rng.gen_range(0.0..WORLD_WIDTH), rng.gen_range(0.0..WORLD_HEIGHT)),
                radius: rng.gen_range(STAR_SIZE_MIN..STAR_SIZE_MAX),
            })
            .collect();
        StarField { stars, shooting_stars: Vec::new() }
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        if rng.gen_bool(SHOOTING_STAR_CHANCE) {
            self.shooting_stars.push(ShootingStar::spawn(rng));
        }
        self.shooting_stars.retain_mut(|star| star.update());
    }

    pub fn draw_stars(&self, canvas: &mut dyn Canvas) {
        for star in &self.stars {
            canvas.fill_circle(star.position, star.radius, Color::WHITE);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.draw_stars(canvas);
        for star in &self.shooting_stars {
            star.draw(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn field_has_fixed_star_count_inside_world() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = StarField::new(&mut rng);
        assert_eq!(field.stars.len(), NUM_STARS);
        for star in &field.stars {
            assert!(star.position.x >= 0.0 && star.position.x < WORLD_WIDTH);
            assert!(star.radius >= STAR_SIZE_MIN && star.radius < STAR_SIZE_MAX);
        }
    }

    #[test]
    fn shooting_stars_head_into_the_world() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let star = ShootingStar::spawn(&mut rng);
            let p = star.position;
            let v = star.velocity;
            if p.y < 0.0 {
                assert!(v.y > 0.0);
            } else if p.y > WORLD_HEIGHT {
                assert!(v.y < 0.0);
            } else if p.x < 0.0 {
                assert!(v.x > 0.0);
            } else {
                assert!(p.x > WORLD_WIDTH && v.x < 0.0);
            }
        }
    }

    #[test]
    fn shooting_star_fades_out_and_is_dropped() {
        let mut star = ShootingStar {
            position: Vector2D::new(400.0, 300.0),
            velocity: Vector2D::default(),
            alpha: 1.0,
            fade_rate: 0.25,
        };
        assert!(star.update());
        assert!(star.update());
        assert!(star.update());
        assert!(!star.update());
    }

    #[test]
    fn tail_trails_behind_direction_of_travel() {
        let star = ShootingStar {
            position: Vector2D::new(400.0, 300.0),
            velocity: Vector2D::new(per_frame(SHOOTING_STAR_SPEED), 0.0),
            alpha: 1.0,
            fade_rate: 0.1,
        };
        assert!((star.tail().x - 300.0).abs() < 1e-9);
        assert!((star.tail().y - 300.0).abs() < 1e-9);
    }
}
