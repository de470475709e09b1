//! ASCII-art assets, loaded off the frame thread.
//!
//! The loader thread reports each asset exactly once over a channel. The game
//! drains the channel between frames and only leaves the loading screen once
//! every asset has settled, either ready or failed.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    IntroImage,
    Watermark,
    AsteroidTexture,
}

impl AssetId {
    pub const ALL: [AssetId; 3] = [AssetId::IntroImage, AssetId::Watermark, AssetId::AsteroidTexture];

    pub fn file_name(&self) -> &'static str {
        match self {
            AssetId::IntroImage => "intro.txt",
            AssetId::Watermark => "watermark.txt",
            AssetId::AsteroidTexture => "asteroid.txt",
        }
    }
}

/// A rectangular block of characters. Spaces are transparent when drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct AsciiArt {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl AsciiArt {
    /// Returns `None` for art with no visible rows.
    pub fn parse(text: &str) -> Option<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect())
            .collect();
        let first = rows.iter().position(|row: &Vec<char>| !row.is_empty())?;
        let last = rows.iter().rposition(|row| !row.is_empty())?;
        let rows = rows[first..=last].to_vec();
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        Some(AsciiArt { rows, width })
    }

    /// Natural dimensions as (columns, rows).
    pub fn natural_size(&self) -> (usize, usize) {
        (self.width, self.rows.len())
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(' ')
    }

    /// Nearest-neighbour lookup with `u` and `v` in `[0, 1)`.
    pub fn sample(&self, u: f64, v: f64) -> char {
        let (w, h) = self.natural_size();
        if w == 0 || h == 0 {
            return ' ';
        }
        let x = ((u.clamp(0.0, 1.0) * w as f64) as usize).min(w - 1);
        let y = ((v.clamp(0.0, 1.0) * h as f64) as usize).min(h - 1);
        self.char_at(x, y)
    }

    /// Tiled lookup used for texture fills.
    pub fn tile(&self, x: i64, y: i64) -> char {
        let (w, h) = self.natural_size();
        if w == 0 || h == 0 {
            return ' ';
        }
        self.char_at(x.rem_euclid(w as i64) as usize, y.rem_euclid(h as i64) as usize)
    }
}

#[derive(Debug)]
pub enum AssetEvent {
    Loaded(AssetId, AsciiArt),
    Failed(AssetId, String),
}

#[derive(Debug)]
enum Slot {
    Pending,
    Ready(AsciiArt),
    Failed,
}

pub struct Assets {
    slots: HashMap<AssetId, Slot>,
    events: Option<Receiver<AssetEvent>>,
}

impl Assets {
    fn pending(events: Option<Receiver<AssetEvent>>) -> Self {
        let slots = AssetId::ALL.iter().map(|&id| (id, Slot::Pending)).collect();
        Assets { slots, events }
    }

    /// Starts a background thread that reads every asset from `dir`.
    pub fn spawn_loader(dir: PathBuf) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                for id in AssetId::ALL {
                    let event = match load_art(&dir.join(id.file_name())) {
                        Ok(art) => AssetEvent::Loaded(id, art),
                        Err(e) => AssetEvent::Failed(id, e.to_string()),
                    };
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| { error!("Failed to start asset loader: {}", e); e })?;
        Ok(Assets::pending(Some(rx)))
    }

    /// Assets fed by an external producer.
    pub fn from_receiver(events: Receiver<AssetEvent>) -> Self {
        Assets::pending(Some(events))
    }

    /// Every asset already settled: the given ones ready, the rest failed.
    pub fn preloaded(arts: Vec<(AssetId, AsciiArt)>) -> Self {
        let mut assets = Assets::pending(None);
        for slot in assets.slots.values_mut() {
            *slot = Slot::Failed;
        }
        for (id, art) in arts {
            assets.slots.insert(id, Slot::Ready(art));
        }
        assets
    }

    /// Drains pending loader notifications. Returns true once everything has settled.
    pub fn poll(&mut self) -> bool {
        let mut disconnected = false;
        if let Some(events) = &self.events {
            loop {
                match events.try_recv() {
                    Ok(AssetEvent::Loaded(id, art)) => {
                        let (w, h) = art.natural_size();
                        info!("Asset {:?} loaded ({}x{})", id, w, h);
                        self.slots.insert(id, Slot::Ready(art));
                    }
                    Ok(AssetEvent::Failed(id, reason)) => {
                        warn!("Asset {:?} failed to load: {}", id, reason);
                        self.slots.insert(id, Slot::Failed);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected || self.all_settled() {
            self.events = None;
        }
        self.all_settled()
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn settled_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| !matches!(slot, Slot::Pending))
            .count()
    }

    pub fn all_settled(&self) -> bool {
        self.settled_count() == self.total()
    }

    pub fn get(&self, id: AssetId) -> Option<&AsciiArt> {
        match self.slots.get(&id) {
            Some(Slot::Ready(art)) => Some(art),
            _ => None,
        }
    }

    pub fn is_ready(&self, id: AssetId) -> bool {
        self.get(id).is_some()
    }

    pub fn natural_size(&self, id: AssetId) -> Option<(usize, usize)> {
        self.get(id).map(AsciiArt::natural_size)
    }
}

fn load_art(path: &Path) -> io::Result<AsciiArt> {
    let text = fs::read_to_string(path)?;
    AsciiArt::parse(&text).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, format!("{} holds no art", path.display()))
    })
}
