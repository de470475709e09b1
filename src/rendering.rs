use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::{Color as TermColor, SetForegroundColor, ResetColor},
};

use crate::assets::AsciiArt;
use crate::constants::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::types::Vector2D;

// --- Device-independent drawing ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const DARK_GREY: Color = Color::rgb(169, 169, 169);
    pub const SLATE_GREY: Color = Color::rgb(112, 128, 144);
    pub const SKY_BLUE: Color = Color::rgb(135, 206, 235);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const DARK_RED: Color = Color::rgb(139, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const LIME: Color = Color::rgb(0, 255, 0);
    pub const ORANGE_RED: Color = Color::rgb(255, 69, 0);
    pub const SALMON: Color = Color::rgb(250, 128, 114);
    pub const PINK: Color = Color::rgb(255, 192, 203);
    pub const STARLIGHT: Color = Color::rgb(255, 255, 200);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Color { a, ..self }
    }

    /// Blends toward black, which is what a translucent colour looks like on
    /// the black background.
    fn premultiplied(self) -> TermColor {
        let a = self.a.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f64 * a).round() as u8;
        TermColor::Rgb { r: scale(self.r), g: scale(self.g), b: scale(self.b) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug)]
pub enum Fill<'a> {
    Solid(Color),
    /// Texture clipped to the polygon, tinted with the given colour.
    Texture(&'a AsciiArt, Color),
}

/// A drawing surface addressed in world coordinates.
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vector2D, radius: f64, color: Color);
    fn fill_polygon(&mut self, points: &[Vector2D], fill: Fill<'_>);
    fn stroke_polygon(&mut self, points: &[Vector2D], color: Color);
    fn line(&mut self, from: Vector2D, to: Vector2D, color: Color);
    fn text(&mut self, position: Vector2D, text: &str, align: TextAlign, color: Color);
    fn image(&mut self, art: &AsciiArt, top_left: Vector2D, size: Vector2D, alpha: f64);
}

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row_text(&self, y: u16) -> String {
        self.buffer
            .get(y as usize)
            .map(|row| row.iter().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn queue_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            },
        }
    }

    /// Styling is dropped in the screen buffer.
    pub fn queue_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }

    pub fn screen_buffer(&self) -> Option<&ScreenBuffer> {
        match self {
            OutputTarget::ScreenBuffer(sb) => Some(sb),
            OutputTarget::Stdout(_) => None,
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

// --- GameGrid: rasterizes world-space primitives onto terminal cells ---

const FILL_GLYPH: char = '#';
const DOT_GLYPH: char = '.';
const ALPHA_CUTOFF: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', color: Color::BLACK };
}

pub struct GameGrid {
    pub grid: Vec<Vec<Cell>>,
    pub width: u16,
    pub height: u16,
    scale_x: f64,
    scale_y: f64,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![Cell::BLANK; width as usize]; height as usize],
            width,
            height,
            scale_x: width as f64 / WORLD_WIDTH,
            scale_y: height as f64 / WORLD_HEIGHT,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = GameGrid::new(width, height);
    }

    pub fn set_char(&mut self, x: i64, y: i64, c: char, color: Color) {
        if color.a < ALPHA_CUTOFF {
            return;
        }
        if x >= 0 && y >= 0 && (y as usize) < self.grid.len() && (x as usize) < self.width as usize {
            self.grid[y as usize][x as usize] = Cell { ch: c, color };
        }
    }

    pub fn char_at(&self, x: u16, y: u16) -> char {
        self.grid
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map(|cell| cell.ch)
            .unwrap_or(' ')
    }

    pub fn row_text(&self, y: u16) -> String {
        self.grid
            .get(y as usize)
            .map(|row| row.iter().map(|cell| cell.ch).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    fn to_cell(&self, p: Vector2D) -> (i64, i64) {
        ((p.x * self.scale_x).floor() as i64, (p.y * self.scale_y).floor() as i64)
    }

    fn cell_center(&self, cx: i64, cy: i64) -> Vector2D {
        Vector2D::new((cx as f64 + 0.5) / self.scale_x, (cy as f64 + 0.5) / self.scale_y)
    }

    fn cell_bounds(&self, points: &[Vector2D]) -> Option<(i64, i64, i64, i64)> {
        let first = points.first()?;
        let (mut x0, mut y0) = self.to_cell(*first);
        let (mut x1, mut y1) = (x0, y0);
        for p in &points[1..] {
            let (x, y) = self.to_cell(*p);
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Some((x0, y0, x1, y1))
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.queue_move_to(MoveTo(0, y))?;
            let row = &self.grid[y as usize];
            let mut start = 0;
            while start < row.len() {
                let color = row[start].color;
                let mut end = start;
                while end < row.len() && row[end].color == color {
                    end += 1;
                }
                stdout.queue_other_command(SetForegroundColor(color.premultiplied()))?;
                let run: String = row[start..end].iter().map(|cell| cell.ch).collect();
                write!(stdout, "{}", run)?;
                start = end;
            }
        }
        stdout.queue_other_command(ResetColor)?;
        Ok(())
    }

    pub fn clear_screen_manual(&self, stdout: &mut OutputTarget, terminal_width: u16, terminal_height: u16) -> io::Result<()> {
        for y in 0..terminal_height {
            stdout.queue_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(terminal_width as usize))?;
        }
        stdout.queue_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

fn line_glyph(dx: i64, dy: i64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax == 0 && ay == 0 {
        DOT_GLYPH
    } else if ay * 2 <= ax {
        '-'
    } else if ax * 2 <= ay {
        '|'
    } else if (dx > 0) == (dy > 0) {
        '\u{005C}'
    } else {
        '/'
    }
}

fn point_in_polygon(p: Vector2D, points: &[Vector2D]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Canvas for GameGrid {
    fn clear(&mut self, color: Color) {
        let blank = Cell { ch: ' ', color };
        for row in self.grid.iter_mut() {
            row.fill(blank);
        }
    }

    fn fill_circle(&mut self, center: Vector2D, radius: f64, color: Color) {
        let (x0, y0) = self.to_cell(Vector2D::new(center.x - radius, center.y - radius));
        let (x1, y1) = self.to_cell(Vector2D::new(center.x + radius, center.y + radius));
        let mut painted = false;
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                if self.cell_center(cx, cy).distance(center) <= radius {
                    self.set_char(cx, cy, FILL_GLYPH, color);
                    painted = true;
                }
            }
        }
        // Circles smaller than a cell still show up as a dot.
        if !painted {
            let (cx, cy) = self.to_cell(center);
            let glyph = if radius * self.scale_x >= 0.25 { 'o' } else { DOT_GLYPH };
            self.set_char(cx, cy, glyph, color);
        }
    }

    fn fill_polygon(&mut self, points: &[Vector2D], fill: Fill<'_>) {
        let Some((x0, y0, x1, y1)) = self.cell_bounds(points) else {
            return;
        };
        if points.len() < 3 {
            return;
        }
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                if !point_in_polygon(self.cell_center(cx, cy), points) {
                    continue;
                }
                match fill {
                    Fill::Solid(color) => self.set_char(cx, cy, FILL_GLYPH, color),
                    Fill::Texture(art, color) => {
                        let c = match art.tile(cx - x0, cy - y0) {
                            ' ' => DOT_GLYPH,
                            c => c,
                        };
                        self.set_char(cx, cy, c, color);
                    }
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Vector2D], color: Color) {
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.line(from, to, color);
        }
    }

    fn line(&mut self, from: Vector2D, to: Vector2D, color: Color) {
        let (ax, ay) = self.to_cell(from);
        let (bx, by) = self.to_cell(to);
        let (dx, dy) = (bx - ax, by - ay);
        let glyph = line_glyph(dx, dy);
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.set_char(ax, ay, glyph, color);
            return;
        }
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = (ax as f64 + dx as f64 * t).round() as i64;
            let y = (ay as f64 + dy as f64 * t).round() as i64;
            self.set_char(x, y, glyph, color);
        }
    }

    fn text(&mut self, position: Vector2D, text: &str, align: TextAlign, color: Color) {
        let (cx, cy) = self.to_cell(position);
        let len = text.chars().count() as i64;
        let start = match align {
            TextAlign::Left => cx,
            TextAlign::Center => cx - len / 2,
            TextAlign::Right => cx - len,
        };
        for (i, c) in text.chars().enumerate() {
            self.set_char(start + i as i64, cy, c, color);
        }
    }

    fn image(&mut self, art: &AsciiArt, top_left: Vector2D, size: Vector2D, alpha: f64) {
        let (x0, y0) = self.to_cell(top_left);
        let (x1, y1) = self.to_cell(top_left.add(size));
        let (w, h) = ((x1 - x0).max(1), (y1 - y0).max(1));
        let color = Color::WHITE.with_alpha(alpha);
        for cy in 0..h {
            for cx in 0..w {
                let c = art.sample(cx as f64 / w as f64, cy as f64 / h as f64);
                if c != ' ' {
                    self.set_char(x0 + cx, y0 + cy, c, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GameGrid {
        // 10 world pixels per column, 25 per row.
        GameGrid::new(80, 24)
    }

    #[test]
    fn text_is_aligned_around_anchor() {
        let mut g = grid();
        g.text(Vector2D::new(400.0, 300.0), "SCORE", TextAlign::Center, Color::WHITE);
        assert_eq!(g.row_text(12).trim(), "SCORE");
        assert_eq!(g.char_at(38, 12), 'S');

        g.text(Vector2D::new(800.0, 0.0), "END", TextAlign::Right, Color::WHITE);
        assert!(g.row_text(0).ends_with("END"));
    }

    #[test]
    fn transparent_colours_are_not_drawn() {
        let mut g = grid();
        g.text(Vector2D::new(0.0, 0.0), "faded", TextAlign::Left, Color::WHITE.with_alpha(0.0));
        assert!(!g.contains("faded"));
    }

    #[test]
    fn tiny_circles_still_leave_a_mark() {
        let mut g = grid();
        g.fill_circle(Vector2D::new(105.0, 110.0), 2.0, Color::LIME);
        assert_eq!(g.char_at(10, 4), DOT_GLYPH);
    }

    #[test]
    fn polygon_fill_covers_interior_cells() {
        let mut g = grid();
        let square = [
            Vector2D::new(100.0, 100.0),
            Vector2D::new(200.0, 100.0),
            Vector2D::new(200.0, 200.0),
            Vector2D::new(100.0, 200.0),
        ];
        g.fill_polygon(&square, Fill::Solid(Color::SLATE_GREY));
        assert_eq!(g.char_at(15, 6), FILL_GLYPH);
        assert_eq!(g.char_at(25, 6), ' ');
    }

    #[test]
    fn strokes_pick_glyph_by_slope() {
        assert_eq!(line_glyph(5, 0), '-');
        assert_eq!(line_glyph(0, 5), '|');
        assert_eq!(line_glyph(4, 4), '\u{005C}');
        assert_eq!(line_glyph(4, -4), '/');
    }

    #[test]
    fn render_into_screen_buffer_copies_glyphs() {
        let mut g = GameGrid::new(20, 5);
        g.text(Vector2D::new(0.0, 0.0), "hi", TextAlign::Left, Color::WHITE);
        let mut out = OutputTarget::ScreenBuffer(ScreenBuffer::new(20, 5));
        g.render(&mut out).unwrap();
        let sb = out.screen_buffer().unwrap();
        assert!(sb.row_text(0).starts_with("hi"));
    }
}
