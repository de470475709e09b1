use crate::assets::{AssetId, Assets};
use crate::constants::*;
use crate::entities::draw_life_icon;
use crate::rendering::{Canvas, Color, TextAlign};
use crate::session::Session;
use crate::types::Vector2D;

// --- Screen text ---
pub const LOADING_TEXT: &str = "Loading Assets...";
pub const TITLE_TEXT: &str = "ASTEROIDS";
pub const INTRO_PLACEHOLDER_TEXT: &str = "[Intro Image Placeholder]";
pub const CREDITS_TEXT: &str = "Original game by Rayyan";
pub const CONTROLS_TEXT: &str = "Arrows / WASD to move, Space to fire";
pub const START_TEXT: &str = "Press Any Key / Click to Start";
pub const RESTART_TEXT: &str = "Press Any Key or Gamepad Button to Restart";

// --- Layout ---
const INTRO_IMAGE_WIDTH: f64 = 150.0;
const WATERMARK_WIDTH: f64 = 60.0;
const WATERMARK_PADDING: f64 = 10.0;
const WATERMARK_ALPHA: f64 = 0.3;
const LINE_HEIGHT: f64 = 40.0;

fn centered(text: &str, y: f64, canvas: &mut dyn Canvas, color: Color) {
    canvas.text(Vector2D::new(WORLD_WIDTH / 2.0, y), text, TextAlign::Center, color);
}

/// Target size for `art` scaled to `width` while keeping its aspect ratio.
fn scaled_size(natural: (usize, usize), width: f64) -> Vector2D {
    let (cols, rows) = natural;
    let scale = width / cols.max(1) as f64;
    Vector2D::new(width, rows as f64 * scale)
}

pub fn loading_text(assets: &Assets) -> String {
    format!("({} / {} images loaded)", assets.settled_count(), assets.total())
}

pub fn draw_loading_screen(canvas: &mut dyn Canvas, assets: &Assets) {
    centered(LOADING_TEXT, WORLD_HEIGHT / 2.0, canvas, Color::WHITE);
    centered(&loading_text(assets), WORLD_HEIGHT / 2.0 + LINE_HEIGHT, canvas, Color::WHITE);
}

pub fn draw_intro_screen(canvas: &mut dyn Canvas, assets: &Assets) {
    centered(TITLE_TEXT, WORLD_HEIGHT * 0.2, canvas, Color::WHITE);

    match assets.get(AssetId::IntroImage) {
        Some(art) => {
            let size = scaled_size(art.natural_size(), INTRO_IMAGE_WIDTH);
            let top_left = Vector2D::new(
                WORLD_WIDTH / 2.0 - size.x / 2.0,
                WORLD_HEIGHT * 0.4 - size.y / 2.0 + 20.0,
            );
            canvas.image(art, top_left, size, 1.0);
        }
        None => centered(INTRO_PLACEHOLDER_TEXT, WORLD_HEIGHT * 0.4 + 20.0, canvas, Color::WHITE),
    }

    centered(CREDITS_TEXT, WORLD_HEIGHT * 0.65 + LINE_HEIGHT, canvas, Color::WHITE);
    centered(CONTROLS_TEXT, WORLD_HEIGHT * 0.75 + LINE_HEIGHT, canvas, Color::WHITE);
    centered(START_TEXT, WORLD_HEIGHT * 0.85 + LINE_HEIGHT, canvas, Color::WHITE);
}

/// Score, high score, lives and the centred banner.
pub fn draw_hud(canvas: &mut dyn Canvas, session: &Session, high_score: u32, game_over: bool) {
    canvas.text(
        Vector2D::new(WORLD_WIDTH - SHIP_SIZE / 2.0, SHIP_SIZE),
        &format!("SCORE: {}", session.score),
        TextAlign::Right,
        Color::WHITE,
    );
    centered(&format!("HIGH SCORE: {}", high_score), SHIP_SIZE, canvas, Color::WHITE);

    let exploding = session.ship.as_ref().is_some_and(|ship| ship.is_exploding());
    for i in 0..session.lives {
        let color = if exploding && i == session.lives - 1 { Color::RED } else { Color::WHITE };
        let center = Vector2D::new(SHIP_SIZE + i as f64 * SHIP_SIZE * 1.2, SHIP_SIZE);
        draw_life_icon(canvas, center, color);
    }

    if game_over {
        centered(GAME_OVER_TEXT, WORLD_HEIGHT * 0.75, canvas, Color::WHITE);
        centered(RESTART_TEXT, WORLD_HEIGHT * 0.85, canvas, Color::WHITE);
    } else if session.overlay.is_visible() {
        let color = Color::WHITE.with_alpha(session.overlay.alpha);
        centered(&session.overlay.text, WORLD_HEIGHT * 0.75, canvas, color);
    }
}

/// Bottom-right corner, translucent. Skipped when the image is unavailable.
pub fn draw_watermark(canvas: &mut dyn Canvas, assets: &Assets) {
    let Some(art) = assets.get(AssetId::Watermark) else {
        return;
    };
    let size = scaled_size(art.natural_size(), WATERMARK_WIDTH);
    let top_left = Vector2D::new(
        WORLD_WIDTH - size.x - WATERMARK_PADDING,
        WORLD_HEIGHT - size.y - WATERMARK_PADDING,
    );
    canvas.image(art, top_left, size, WATERMARK_ALPHA);
}
