use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::{AssetId, Assets};
use crate::highscore::HighScoreStore;
use crate::hud;
use crate::input::{GamepadSource, InputAggregator, InputEvent, NoGamepads};
use crate::rendering::{Canvas, Color};
use crate::session::{Session, SessionEvent};
use crate::starfield::StarField;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Loading,
    Intro,
    Playing,
    GameOver,
}

pub struct Game {
    state: GameState,
    session: Session,
    stars: StarField,
    input: InputAggregator,
    assets: Assets,
    high_score: u32,
    store: Box<dyn HighScoreStore>,
    gamepads: Box<dyn GamepadSource>,
    rng: StdRng,
}

impl Game {
    pub fn new(assets: Assets, mut store: Box<dyn HighScoreStore>, input: InputAggregator, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let high_score = store.load();
        Game {
            state: GameState::Loading,
            session: Session::new(&mut rng),
            stars: StarField::new(&mut rng),
            input,
            assets,
            high_score,
            store,
            gamepads: Box::new(NoGamepads),
            rng,
        }
    }

    pub fn with_gamepads(mut self, gamepads: Box<dyn GamepadSource>) -> Self {
        self.gamepads = gamepads;
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn input(&self) -> &InputAggregator {
        &self.input
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn new_game(&mut self) {
        self.session = Session::new(&mut self.rng);
        self.input.clear();
        self.set_state(GameState::Playing);
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            info!("Game state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match self.state {
            GameState::Loading => {}
            GameState::Intro | GameState::GameOver => {
                if matches!(event, InputEvent::KeyDown(_) | InputEvent::Tap | InputEvent::TouchStart(_)) {
                    self.new_game();
                }
            }
            GameState::Playing => match event {
                InputEvent::KeyDown(Some(control)) | InputEvent::KeyRepeat(Some(control)) => self.input.press(control),
                InputEvent::KeyUp(control) => self.input.release(control),
                InputEvent::TouchStart(control) => self.input.touch_start(control),
                InputEvent::TouchEnd(control) => self.input.touch_end(control),
                InputEvent::KeyDown(None) | InputEvent::KeyRepeat(None) | InputEvent::Tap => {}
            },
        }
    }

    pub fn update(&mut self) {
        if self.state == GameState::Loading {
            if self.assets.poll() {
                info!(
                    "Assets settled, {} of {} ready",
                    AssetId::ALL.iter().filter(|&&id| self.assets.is_ready(id)).count(),
                    self.assets.total()
                );
                self.set_state(GameState::Intro);
            }
            self.input.tick();
            return;
        }

        let pads = self.gamepads.poll();
        let gamepad_started = self.input.apply_gamepads(&pads);

        match self.state {
            GameState::Loading => {}
            GameState::Intro => {
                if gamepad_started {
                    self.new_game();
                }
            }
            GameState::Playing => {
                self.stars.update(&mut self.rng);
                let keys = self.input.keys();
                match self.session.update(&keys, &mut self.rng) {
                    SessionEvent::GameOver => self.finish_session(),
                    SessionEvent::LevelCleared | SessionEvent::None => {}
                }
            }
            GameState::GameOver => {
                self.stars.update(&mut self.rng);
                if gamepad_started {
                    self.new_game();
                }
            }
        }

        self.input.tick();
    }

    fn finish_session(&mut self) {
        info!("Game over at level {} with score {}", self.session.level + 1, self.session.score);
        if self.session.score > self.high_score {
            info!("New high score {} (was {})", self.session.score, self.high_score);
            self.high_score = self.session.score;
            self.store.save(self.high_score);
        }
        self.set_state(GameState::GameOver);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(Color::BLACK);
        match self.state {
            GameState::Loading => hud::draw_loading_screen(canvas, &self.assets),
            GameState::Intro => {
                self.stars.draw_stars(canvas);
                hud::draw_intro_screen(canvas, &self.assets);
            }
            GameState::Playing | GameState::GameOver => {
                self.stars.draw(canvas);
                if let Some(ship) = &self.session.ship {
                    ship.draw(canvas);
                }
                for bullet in &self.session.bullets {
                    bullet.draw(canvas);
                }
                let texture = self.assets.get(AssetId::AsteroidTexture);
                for asteroid in &self.session.asteroids {
                    asteroid.draw(canvas, texture);
                }
                hud::draw_hud(canvas, &self.session, self.high_score, self.state == GameState::GameOver);
                hud::draw_watermark(canvas, &self.assets);
            }
        }
    }

    pub fn frame(&mut self, canvas: &mut dyn Canvas) {
        self.update();
        self.draw(canvas);
    }
}
