// --- Timing ---
pub const FPS: u32 = 30; // Fixed ticks per second, every tick is one time slice

// --- World ---
pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;

// --- Ship ---
pub const SHIP_SIZE: f64 = 30.0;
pub const SHIP_SPEED: f64 = 200.0; // Pixels per second
pub const SHIP_EXPLODE_SECONDS: f64 = 1.5;
pub const SHIP_INVULNERABLE_SECONDS: f64 = 3.0;
pub const SHIP_BLINKS_PER_SECOND: f64 = 5.0;
pub const SHOOT_COOLDOWN_SECONDS: f64 = 0.2;

// --- Bullets ---
pub const BULLET_SPEED: f64 = 500.0; // Pixels per second
pub const BULLET_MAX_DIST: f64 = 0.4; // Fraction of world width
pub const BULLET_EXPLODE_SECONDS: f64 = 0.1;

// --- Asteroids ---
pub const ASTEROID_NUM: usize = 5; // Asteroids on level 0
pub const ASTEROID_SPEED: f64 = 50.0; // Max speed per axis, pixels per second
pub const ASTEROID_SIZE: f64 = 100.0; // Radius of the largest tier
pub const ASTEROID_VERTICES: usize = 10; // Average vertex count
pub const ASTEROID_JAGGEDNESS: f64 = 0.4;
pub const MAX_SPAWN_ATTEMPTS: u32 = 1_000;

// --- Session ---
pub const GAME_LIVES: u32 = 3;
pub const TEXT_FADE_SECONDS: f64 = 2.5;
pub const GAME_OVER_TEXT: &str = "GAME OVER";
pub const HIGH_SCORE_NAME: &str = "asteroids_high_score";

// --- Gamepad ---
pub const GAMEPAD_THRESHOLD: f32 = 0.5;
pub const GAMEPAD_FIRE_BUTTON: usize = 0;
pub const GAMEPAD_UP_BUTTON: usize = 12;
pub const GAMEPAD_DOWN_BUTTON: usize = 13;
pub const GAMEPAD_LEFT_BUTTON: usize = 14;
pub const GAMEPAD_RIGHT_BUTTON: usize = 15;

// --- Star field ---
pub const NUM_STARS: usize = 100;
pub const STAR_SIZE_MIN: f64 = 1.0;
pub const STAR_SIZE_MAX: f64 = 3.0;
pub const SHOOTING_STAR_CHANCE: f64 = 0.005; // Per frame
pub const SHOOTING_STAR_SPEED: f64 = 300.0; // Pixels per second
pub const SHOOTING_STAR_LENGTH: f64 = 100.0;

/// Converts a duration in seconds to a whole number of ticks, rounding up.
pub fn frames(seconds: f64) -> u32 {
    (FPS as f64 * seconds).ceil() as u32
}

/// Converts a per-second rate to a per-tick step.
pub fn per_frame(per_second: f64) -> f64 {
    per_second / FPS as f64
}

pub fn ship_radius() -> f64 {
    SHIP_SIZE / 2.0
}

pub fn bullet_radius() -> f64 {
    SHIP_SIZE / 15.0
}

/// Radius of the smallest asteroid tier; these are destroyed without splitting.
pub fn min_asteroid_radius() -> f64 {
    (ASTEROID_SIZE / 4.0).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_round_up_to_whole_ticks() {
        assert_eq!(frames(SHIP_EXPLODE_SECONDS), 45);
        assert_eq!(frames(SHIP_INVULNERABLE_SECONDS), 90);
        assert_eq!(frames(SHOOT_COOLDOWN_SECONDS), 6);
        assert_eq!(frames(BULLET_EXPLODE_SECONDS), 3);
        assert_eq!(frames(1.0 / SHIP_BLINKS_PER_SECOND), 6);
    }

    #[test]
    fn asteroid_tiers_halve_down_to_minimum() {
        assert_eq!(min_asteroid_radius(), 25.0);
        assert_eq!((ASTEROID_SIZE / 2.0).ceil(), 50.0);
    }
}
