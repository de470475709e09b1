use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement},
};
use log::{error, info, warn};

use asteroid_arcade::assets::Assets;
use asteroid_arcade::config::Args;
use asteroid_arcade::constants::FPS;
use asteroid_arcade::game::Game;
use asteroid_arcade::gamepad::open_gamepads;
use asteroid_arcade::highscore::{HighScoreStore, JsonFileStore, MemoryStore};
use asteroid_arcade::input::{InputAggregator, translate_event};
use asteroid_arcade::rendering::{GameGrid, OutputTarget, ScreenBuffer};
use asteroid_arcade::terminal_io::{SimulatedInput, debug_script};

fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => {
            matches!(code, KeyCode::Char('q') | KeyCode::Esc)
                || (*code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
        }
        _ => false,
    }
}

/// Blocks until `deadline`, collecting terminal events as they arrive.
fn poll_until(deadline: Instant) -> io::Result<Vec<Event>> {
    let mut events = Vec::new();
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(events);
        }
        if event::poll(deadline - now).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
            events.push(event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?);
        }
    }
}

fn run(
    game: &mut Game,
    stdout_target: &mut OutputTarget,
    mut simulated_input: Option<SimulatedInput>,
    terminal_width: u16,
    terminal_height: u16,
    max_frames: Option<u64>,
) -> io::Result<()> {
    let tick = Duration::from_secs_f64(1.0 / FPS as f64);
    let mut game_grid = GameGrid::new(terminal_width, terminal_height);
    let mut frame_count: u64 = 0;
    let mut next_tick = Instant::now();

    while max_frames.is_none_or(|max| frame_count < max) {
        next_tick += tick;

        let events = match simulated_input.as_mut() {
            Some(sim_input) => {
                let events = if sim_input.poll(frame_count)? { sim_input.read()? } else { Vec::new() };
                std::thread::sleep(next_tick.saturating_duration_since(Instant::now()));
                events
            }
            None => poll_until(next_tick)?,
        };
        // No catch-up after a slow frame.
        next_tick = next_tick.max(Instant::now());

        for event in events {
            if is_quit(&event) {
                info!("Quit requested at frame {}.", frame_count);
                return Ok(());
            }
            if let Event::Resize(width, height) = event {
                info!("Terminal resized to {}x{}", width, height);
                game_grid.resize(width, height);
                game_grid.clear_screen_manual(stdout_target, width, height)?;
                continue;
            }
            if let Some(input) = translate_event(&event) {
                game.handle_event(input);
            }
        }

        game.frame(&mut game_grid);
        game_grid.render(stdout_target).map_err(|e| { error!("Failed to render frame: {}", e); e })?;
        stdout_target.flush().map_err(|e| { error!("Failed to flush frame: {}", e); e })?;

        if let Some(screen) = stdout_target.screen_buffer() {
            screen.print_to_log();
        }
        frame_count += 1;
    }
    info!("Stopped after {} frames.", frame_count);
    Ok(())
}

fn run_headless(args: &Args) -> Result<()> {
    info!("Debug mode enabled, resolution {}x{}", args.width, args.height);
    let assets = Assets::spawn_loader(args.assets.clone()).context("starting the asset loader")?;
    let store: Box<dyn HighScoreStore> = Box::new(MemoryStore::default());
    let input = InputAggregator::new(None).with_gamepad_threshold(args.gamepad_threshold);
    let mut game = Game::new(assets, store, input, args.seed);
    let mut stdout_target = OutputTarget::ScreenBuffer(ScreenBuffer::new(args.width, args.height));
    run(&mut game, &mut stdout_target, Some(debug_script()), args.width, args.height, args.max_frames)
        .context("running the headless game loop")?;
    info!("Headless run finished with score {}", game.session().score);
    Ok(())
}

fn restore_terminal(stdout_target: &mut OutputTarget, enhanced: bool, width: u16, height: u16) {
    if enhanced {
        if let Err(e) = stdout_target.execute_other_command(PopKeyboardEnhancementFlags) {
            warn!("Failed to pop keyboard enhancement flags: {}", e);
        }
    }
    let cleanup = GameGrid::new(width, height)
        .clear_screen_manual(stdout_target, width, height)
        .and_then(|_| stdout_target.execute_other_command(DisableMouseCapture))
        .and_then(|_| stdout_target.execute_other_command(Show))
        .and_then(|_| stdout_target.flush());
    if let Err(e) = cleanup {
        error!("Failed to restore terminal: {}", e);
    }
    if let Err(e) = disable_raw_mode() {
        error!("Failed to disable raw mode: {}", e);
    }
    info!("Terminal restored.");
}

fn run_terminal(args: &Args) -> Result<()> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode()
        .map_err(|e| { error!("Failed to enable raw mode: {}", e); e })
        .context("enabling raw mode")?;
    let mut stdout_target = OutputTarget::Stdout(io::stdout());

    let (terminal_width, terminal_height) = match size() {
        Ok(size) => size,
        Err(e) => {
            error!("Failed to get terminal size: {}", e);
            restore_terminal(&mut stdout_target, false, 0, 0);
            return Err(e).context("reading the terminal size");
        }
    };
    info!("Terminal size: {}x{}", terminal_width, terminal_height);

    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    info!("Key release events {}", if enhanced { "supported" } else { "unavailable, using hold window" });

    let result = (|| -> Result<()> {
        if enhanced {
            stdout_target.execute_other_command(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        GameGrid::new(terminal_width, terminal_height).clear_screen_manual(
            &mut stdout_target,
            terminal_width,
            terminal_height,
        )?;
        stdout_target.execute_other_command(Hide)?;
        stdout_target.execute_other_command(EnableMouseCapture)?;
        stdout_target.flush()?;
        info!("Screen cleared and cursor hidden.");

        let assets = Assets::spawn_loader(args.assets.clone()).context("starting the asset loader")?;
        let store: Box<dyn HighScoreStore> = Box::new(JsonFileStore::new(&args.high_score_file));
        let input = InputAggregator::new(args.hold_ticks(enhanced)).with_gamepad_threshold(args.gamepad_threshold);
        let mut game = Game::new(assets, store, input, args.seed).with_gamepads(open_gamepads());
        run(&mut game, &mut stdout_target, None, terminal_width, terminal_height, args.max_frames)
            .context("running the game loop")
    })();

    restore_terminal(&mut stdout_target, enhanced, terminal_width, terminal_height);
    result
}

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logging::log_to_file(&args.log_file, args.log_level.into())
        .with_context(|| format!("opening log file {}", args.log_file.display()))?;
    info!("Starting asteroid-arcade.");

    let result = if args.debug { run_headless(&args) } else { run_terminal(&args) };
    if let Err(e) = &result {
        error!("Exiting with error: {:#}", e);
    }
    info!("asteroid-arcade finished.");
    result
}
