/// Terminal front end: projects draw calls onto character cells.
///
/// Each frame receives the draw list produced by `render::draw_list` plus an
/// immutable view of the state for the HUD.  No game logic is performed;
/// this module only maps world-space transforms onto terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use lunar_lander::entities::{EntityKind, Outcome, SimulationState, Transform, Vec2};
use lunar_lander::render::{DrawCall, SpriteRegion};

// ── World view ────────────────────────────────────────────────────────────────

const VIEW_HALF_WIDTH: f32 = 5.0;
const VIEW_HALF_HEIGHT: f32 = 3.75;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STAR: Color = Color::DarkGrey;
const C_HUD_FUEL: Color = Color::Yellow;
const C_HUD_FUEL_LOW: Color = Color::Red;
const C_HUD_VELOCITY: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_FLAME: Color = Color::DarkYellow;
const C_SAFE: Color = Color::Green;
const C_HAZARD: Color = Color::Red;
const C_SOLID: Color = Color::Grey;
const C_HINT: Color = Color::DarkGrey;

/// Lander body glyph per atlas row (up, left, right, down).
const BODY_GLYPHS: [char; 4] = ['▲', '◄', '►', '▼'];
/// Exhaust glyph per animation frame.
const FLAME_GLYPHS: [char; 4] = ['˙', '*', '+', '*'];

/// Terminal area the world view is projected onto (rows 1 ..= height-2).
#[derive(Clone, Copy)]
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    fn play_rows(&self) -> f32 {
        self.height.saturating_sub(2).max(1) as f32
    }

    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let col = (p.x + VIEW_HALF_WIDTH) / (2.0 * VIEW_HALF_WIDTH) * self.width as f32;
        let row = (VIEW_HALF_HEIGHT - p.y) / (2.0 * VIEW_HALF_HEIGHT) * self.play_rows();
        (col.floor() as i32, 1 + row.floor() as i32)
    }

    /// Cell span of a world-space size, at least one cell each way.
    fn span(&self, size: Vec2) -> (i32, i32) {
        let cols = size.x / (2.0 * VIEW_HALF_WIDTH) * self.width as f32;
        let rows = size.y / (2.0 * VIEW_HALF_HEIGHT) * self.play_rows();
        ((cols.round() as i32).max(1), (rows.round() as i32).max(1))
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.width as i32 && row >= 1 && row < self.height as i32 - 1
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &SimulationState,
    calls: &[DrawCall],
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport { width, height };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for call in calls {
        match call.kind {
            EntityKind::Background => draw_background(out, view, state)?,
            EntityKind::Player => draw_player(out, view, call.transform, call.region)?,
            EntityKind::SafePlatform => draw_platform(out, view, call.transform, '▀', C_SAFE)?,
            EntityKind::HazardPlatform => {
                draw_platform(out, view, call.transform, '♣', C_HAZARD)?
            }
            EntityKind::SolidPlatform => draw_platform(out, view, call.transform, '█', C_SOLID)?,
            EntityKind::WinOverlay => {
                draw_banner(out, view, call.transform, "LANDED SAFELY", Color::Green)?
            }
            EntityKind::LoseOverlay => {
                draw_banner(out, view, call.transform, "CRASHED", Color::Red)?
            }
            EntityKind::NoFuelOverlay => {
                draw_banner(out, view, call.transform, "OUT OF FUEL", Color::Yellow)?
            }
        }
    }

    draw_hud(out, view, state)?;
    draw_controls_hint(out, view, state)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(out: &mut W, view: Viewport, col: i32, row: i32, ch: char) -> std::io::Result<()> {
    if view.contains(col, row) {
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(Print(ch))?;
    }
    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(
    out: &mut W,
    view: Viewport,
    state: &SimulationState,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STAR))?;
    for star in &state.background.stars {
        let (col, row) = view.to_cell(*star);
        put(out, view, col, row, '·')?;
    }
    Ok(())
}

fn draw_platform<W: Write>(
    out: &mut W,
    view: Viewport,
    transform: Transform,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let (cx, cy) = view.to_cell(transform.translation);
    let (w, h) = view.span(transform.scale);
    out.queue(style::SetForegroundColor(color))?;
    for row in cy - h / 2..cy - h / 2 + h {
        for col in cx - w / 2..cx - w / 2 + w {
            put(out, view, col, row, glyph)?;
        }
    }
    Ok(())
}

// ── Lander ────────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    view: Viewport,
    transform: Transform,
    region: Option<SpriteRegion>,
) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ►       ← body, picked by atlas row
    //  /*\      ← legs + exhaust, picked by atlas column
    let (atlas_row, atlas_col) = region
        .map(|r| {
            (
                (r.v / r.height).round() as usize,
                (r.u / r.width).round() as usize,
            )
        })
        .unwrap_or((0, 0));
    let body = BODY_GLYPHS[atlas_row % BODY_GLYPHS.len()];
    let flame = FLAME_GLYPHS[atlas_col % FLAME_GLYPHS.len()];

    let (col, row) = view.to_cell(transform.translation);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    put(out, view, col, row, body)?;
    put(out, view, col - 1, row + 1, '/')?;
    put(out, view, col + 1, row + 1, '\\')?;
    out.queue(style::SetForegroundColor(C_FLAME))?;
    put(out, view, col, row + 1, flame)?;
    Ok(())
}

// ── Result banners ────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    view: Viewport,
    transform: Transform,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let (cx, cy) = view.to_cell(transform.translation);
    let (span, _) = view.span(transform.scale);
    let inner = (span as usize).max(text.chars().count() + 4);

    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║{:^inner$}║", text),
        format!("╚{}╝", "═".repeat(inner)),
    ];

    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let row = cy - 1 + i as i32;
        let col = cx - (line.chars().count() as i32) / 2;
        if view.contains(col.max(0), row) {
            out.queue(cursor::MoveTo(col.max(0) as u16, row as u16))?;
            out.queue(Print(line))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: Viewport,
    state: &SimulationState,
) -> std::io::Result<()> {
    let p = &state.player;

    out.queue(cursor::MoveTo(1, 0))?;
    let fuel_color = if p.fuel < 20.0 { C_HUD_FUEL_LOW } else { C_HUD_FUEL };
    out.queue(style::SetForegroundColor(fuel_color))?;
    out.queue(Print(format!("Fuel:{:>6.1}", p.fuel)))?;

    out.queue(style::SetForegroundColor(C_HUD_VELOCITY))?;
    out.queue(Print(format!(
        "  Vx:{:>+6.2}  Vy:{:>+6.2}",
        p.velocity.x, p.velocity.y
    )))?;

    let (status, color) = match state.outcome {
        Outcome::Flying => ("[ FLYING ]", Color::White),
        Outcome::Won => ("[ LANDED ]", Color::Green),
        Outcome::Lost => ("[ CRASHED ]", Color::Red),
        Outcome::OutOfFuel => ("[ NO FUEL ]", Color::Yellow),
    };
    let sx = view
        .width
        .saturating_sub(status.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(status))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    view: Viewport,
    state: &SimulationState,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let hint = if state.outcome == Outcome::Flying {
        "← → ↑ ↓ / WASD : Thrust   SPACE : Hop   Q : Quit"
    } else {
        "R : Play Again   Q : Quit"
    };
    out.queue(Print(hint))?;
    Ok(())
}
