mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use lunar_lander::compute::{init_state, jump, steer};
use lunar_lander::entities::{Outcome, SimulationState, Vec2};
use lunar_lander::render::draw_list;
use lunar_lander::{FrameDriver, Tuning};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so 6 frames (≈100 ms) is refreshed
/// before expiry.
const HOLD_WINDOW: u64 = 6;

#[derive(Parser)]
#[command(name = "lunar_lander")]
#[command(about = "Land on a pad before the fuel runs out")]
struct Args {
    /// JSON file overriding any tuning constants
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Seed for the background starfield
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write logs here (filtered by RUST_LOG); nothing is logged otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Raw thrust intent from the held direction keys.
fn held_intent(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Vec2 {
    let left = any_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
    let right = any_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
    let up = any_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
    let down = any_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);

    let axis = |neg: bool, pos: bool| match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    Vec2::new(axis(left, right), axis(down, up))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RoundEnd {
    Quit,
    Restart,
}

fn game_loop<W: Write>(
    out: &mut W,
    state: &mut SimulationState,
    tuning: &Tuning,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<RoundEnd> {
    let mut driver = FrameDriver::from_tuning(tuning);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(RoundEnd::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(RoundEnd::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.outcome != Outcome::Flying =>
                        {
                            return Ok(RoundEnd::Restart);
                        }
                        KeyCode::Char(' ') => *state = jump(state),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── One intent per rendered frame, consumed by the first step ─────────
        *state = steer(state, held_intent(&key_frame, frame));

        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;
        let (next, _steps) = driver.advance(state, delta, tuning);
        *state = next;

        display::render(out, state, &draw_list(state))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    // Resolve configuration before touching the terminal so a bad file
    // aborts with a readable diagnostic.
    let tuning = match &args.tuning {
        Some(path) => Tuning::from_path(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &tuning, args.seed, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    tuning: &Tuning,
    seed: u64,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut round = 0u32;
    loop {
        round += 1;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = init_state(tuning, &mut rng);
        tracing::info!(round, "round started");

        match game_loop(out, &mut state, tuning, rx).context("terminal I/O failed")? {
            RoundEnd::Quit => {
                tracing::info!(round, outcome = ?state.outcome, fuel = state.player.fuel, "quit");
                return Ok(());
            }
            RoundEnd::Restart => {
                tracing::info!(round, outcome = ?state.outcome, "restarting");
            }
        }
    }
}
