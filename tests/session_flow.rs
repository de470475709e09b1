use asteroid_arcade::assets::{AsciiArt, AssetId, Assets};
use asteroid_arcade::constants::*;
use asteroid_arcade::entities::{Asteroid, Bullet};
use asteroid_arcade::game::{Game, GameState};
use asteroid_arcade::highscore::MemoryStore;
use asteroid_arcade::input::{Control, InputAggregator, InputEvent, KeyState};
use asteroid_arcade::rendering::GameGrid;
use asteroid_arcade::session::{Session, SessionEvent};
use asteroid_arcade::types::Vector2D;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn still_asteroid(x: f64, y: f64, radius: f64, rng: &mut StdRng) -> Asteroid {
    let mut asteroid = Asteroid::new(Vector2D::new(x, y), radius, rng);
    asteroid.velocity = Vector2D::default();
    asteroid
}

fn playing_game(seed: u64) -> Game {
    let mut game = Game::new(
        Assets::preloaded(Vec::new()),
        Box::new(MemoryStore::with_value(1000)),
        InputAggregator::new(None),
        Some(seed),
    );
    game.update();
    assert_eq!(game.state(), GameState::Intro);
    game.handle_event(InputEvent::KeyDown(None));
    assert_eq!(game.state(), GameState::Playing);
    game
}

#[test]
fn respawned_ship_ignores_asteroids_until_blinking_stops() {
    let mut rng = StdRng::seed_from_u64(10);
    let mut session = Session::new(&mut rng);
    let center = session.ship.as_ref().unwrap().position;
    session.asteroids = vec![still_asteroid(center.x, center.y, ASTEROID_SIZE, &mut rng)];

    let idle = KeyState::default();
    for _ in 1..frames(SHIP_INVULNERABLE_SECONDS) {
        session.update(&idle, &mut rng);
        assert!(!session.ship.as_ref().unwrap().is_exploding());
    }
    session.update(&idle, &mut rng);
    assert!(session.ship.as_ref().unwrap().is_exploding());
}

#[test]
fn unaimed_bullets_expire_without_touching_asteroids() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut session = Session::new(&mut rng);
    session.asteroids = vec![still_asteroid(100.0, 100.0, 25.0, &mut rng)];
    session.bullets.push(Bullet::new(Vector2D::new(400.0, 300.0), 0.0));

    for _ in 0..=frames(BULLET_MAX_DIST * WORLD_WIDTH / BULLET_SPEED) {
        session.update(&KeyState::default(), &mut rng);
    }
    assert!(session.bullets.is_empty());
    assert_eq!(session.asteroids.len(), 1);
    assert_eq!(session.score, 0);
}

#[test]
fn bullet_hit_splits_and_scores_once() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut session = Session::new(&mut rng);
    session.asteroids = vec![still_asteroid(500.0, 300.0, 50.0, &mut rng)];
    session.bullets.push(Bullet::new(Vector2D::new(440.0, 300.0), 0.0));

    let event = session.update(&KeyState::default(), &mut rng);
    assert_eq!(event, SessionEvent::None);
    assert_eq!(session.score, 100);
    assert_eq!(session.asteroids.len(), 2);
    assert!(session.asteroids.iter().all(|a| a.radius() == 25.0));
    assert!(session.bullets[0].is_exploding());

    // The exploding bullet does not score again.
    session.update(&KeyState::default(), &mut rng);
    assert_eq!(session.score, 100);
}

#[test]
fn shooting_down_the_last_asteroid_advances_the_level() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut session = Session::new(&mut rng);
    session.level = 2;
    session.asteroids = vec![still_asteroid(500.0, 300.0, 25.0, &mut rng)];
    session.bullets.push(Bullet::new(Vector2D::new(470.0, 300.0), 0.0));

    let event = session.update(&KeyState::default(), &mut rng);
    assert_eq!(event, SessionEvent::LevelCleared);
    assert_eq!(session.score, 125);
    assert_eq!(session.level, 3);
    assert_eq!(session.asteroids.len(), ASTEROID_NUM + 3);
    assert_eq!(session.overlay.text, "Level 4");
}

#[test]
fn game_over_then_any_input_starts_a_fresh_session() {
    let mut game = playing_game(14);
    game.handle_event(InputEvent::KeyDown(Some(Control::Up)));
    {
        let session = game.session_mut();
        session.level = 3;
        session.score = 2400;
        session.lives = 1;
        session.ship.as_mut().unwrap().explode();
    }
    for _ in 0..frames(SHIP_EXPLODE_SECONDS) {
        game.update();
    }
    assert_eq!(game.state(), GameState::GameOver);
    assert!(game.session().ship.is_none());
    assert_eq!(game.high_score(), 2400);

    // Frozen while game over.
    let asteroids = game.session().asteroids.len();
    game.update();
    assert_eq!(game.session().asteroids.len(), asteroids);

    game.handle_event(InputEvent::TouchStart(Control::Shoot));
    assert_eq!(game.state(), GameState::Playing);
    let session = game.session();
    assert_eq!((session.level, session.score, session.lives), (0, 0, GAME_LIVES));
    assert_eq!(session.asteroids.len(), ASTEROID_NUM);
    let ship = session.ship.as_ref().unwrap();
    assert!(ship.is_invulnerable() && !ship.is_exploding());
    assert_eq!(game.input().keys(), KeyState::default());
}

#[test]
fn lower_score_keeps_the_stored_high_score() {
    let mut game = playing_game(15);
    {
        let session = game.session_mut();
        session.score = 300;
        session.lives = 1;
        session.ship.as_mut().unwrap().explode();
    }
    while game.state() == GameState::Playing {
        game.update();
    }
    assert_eq!(game.high_score(), 1000);
}

#[test]
fn playing_frame_renders_hud_and_world() {
    let texture = AsciiArt::parse("%%\n%%").unwrap();
    let mut game = Game::new(
        Assets::preloaded(vec![(AssetId::AsteroidTexture, texture)]),
        Box::new(MemoryStore::default()),
        InputAggregator::new(None),
        Some(16),
    );
    let mut grid = GameGrid::new(120, 40);
    game.frame(&mut grid);
    assert_eq!(game.state(), GameState::Intro);
    assert!(grid.contains("ASTEROIDS"));

    game.handle_event(InputEvent::Tap);
    game.frame(&mut grid);
    assert!(grid.contains("SCORE: 0"));
    assert!(grid.contains("HIGH SCORE: 0"));
    assert!(grid.contains("Level 1"));
    assert!(grid.contains("%"));
}

#[test]
fn untouched_level_keeps_its_asteroids_while_idle() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut session = Session::new(&mut rng);
    assert_eq!(session.asteroids.len(), ASTEROID_NUM);

    let idle = KeyState::default();
    let bullet_ticks = frames(BULLET_MAX_DIST * WORLD_WIDTH / BULLET_SPEED) + 1;
    for _ in 0..bullet_ticks {
        assert_eq!(session.update(&idle, &mut rng), SessionEvent::None);
    }
    assert!(session.bullets.is_empty());
    assert_eq!(session.asteroids.len(), ASTEROID_NUM);
    assert_eq!(session.score, 0);
    assert_eq!(session.lives, GAME_LIVES);
}
