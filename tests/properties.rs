use asteroid_arcade::constants::*;
use asteroid_arcade::entities::{Asteroid, Ship};
use asteroid_arcade::input::KeyState;
use asteroid_arcade::session::spawn_position;
use asteroid_arcade::types::{Vector2D, wrap_coordinate};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

proptest! {
    #[test]
    fn wrapped_coordinate_stays_within_margin(value in -2000.0f64..2000.0, margin in 0.0f64..150.0) {
        let wrapped = wrap_coordinate(value, WORLD_WIDTH, margin);
        prop_assert!(wrapped >= -margin - 1e-9 && wrapped <= WORLD_WIDTH + margin + 1e-9);
    }

    #[test]
    fn asteroids_stay_within_wrapped_bounds(seed in any::<u64>(), radius in prop::sample::select(vec![25.0, 50.0, 100.0]), ticks in 1usize..600) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut asteroid = Asteroid::new(Vector2D::new(400.0, 300.0), radius, &mut rng);
        for _ in 0..ticks {
            asteroid.update();
            let p = asteroid.position;
            prop_assert!(p.x >= -radius && p.x <= WORLD_WIDTH + radius);
            prop_assert!(p.y >= -radius && p.y <= WORLD_HEIGHT + radius);
        }
    }

    #[test]
    fn ship_stays_within_wrapped_bounds(up: bool, down: bool, left: bool, right: bool, ticks in 1usize..400) {
        let mut ship = Ship::spawn();
        let keys = KeyState { up, down, left, right, shoot: false };
        for _ in 0..ticks {
            ship.update(&keys);
            let (p, r) = (ship.position, ship.radius);
            prop_assert!(p.x >= -r && p.x <= WORLD_WIDTH + r);
            prop_assert!(p.y >= -r && p.y <= WORLD_HEIGHT + r);
        }
    }

    #[test]
    fn split_yields_two_halves_or_nothing(seed in any::<u64>(), radius in 1.0f64..=ASTEROID_SIZE) {
        let mut rng = StdRng::seed_from_u64(seed);
        let asteroid = Asteroid::new(Vector2D::new(200.0, 200.0), radius, &mut rng);
        let children = asteroid.split(&mut rng);
        if radius <= min_asteroid_radius() {
            prop_assert!(children.is_empty());
        } else {
            prop_assert_eq!(children.len(), 2);
            for child in &children {
                prop_assert_eq!(child.radius(), (radius / 2.0).ceil());
                prop_assert_eq!(child.position, asteroid.position);
            }
        }
    }

    #[test]
    fn score_is_at_least_fifty(seed in any::<u64>(), radius in 1.0f64..=ASTEROID_SIZE) {
        let mut rng = StdRng::seed_from_u64(seed);
        let asteroid = Asteroid::new(Vector2D::default(), radius, &mut rng);
        let expected = ((ASTEROID_SIZE - radius) / ASTEROID_SIZE * 100.0 + 50.0).round() as u32;
        prop_assert_eq!(asteroid.score_value(), expected);
        prop_assert!(asteroid.score_value() >= 50);
    }

    #[test]
    fn spawn_keeps_clear_of_the_ship(seed in any::<u64>(), x in 0.0f64..WORLD_WIDTH, y in 0.0f64..WORLD_HEIGHT) {
        let mut rng = StdRng::seed_from_u64(seed);
        let ship = Vector2D::new(x, y);
        let p = spawn_position(Some((ship, ship_radius())), &mut rng);
        prop_assert!(p.distance(ship) >= 2.0 * ASTEROID_SIZE + ship_radius());
        prop_assert!(p.x >= 0.0 && p.x < WORLD_WIDTH && p.y >= 0.0 && p.y < WORLD_HEIGHT);
    }
}
