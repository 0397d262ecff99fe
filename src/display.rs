/// Rendering layer: all terminal I/O for the game scene lives here.
///
/// Each function receives a mutable writer and an immutable `FrameSnapshot`.
/// No game logic is performed; world coordinates are scaled onto whatever
/// terminal size is current.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_patrol::entities::EnemyKind;
use sky_patrol::level::WinProgress;
use sky_patrol::snapshot::{DrawItem, DrawKind, FrameSnapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEART: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_SMALL_STONE: Color = Color::DarkYellow;
const C_BIG_STONE: Color = Color::Yellow;
const C_SCOUT: Color = Color::Green;
const C_WARRIOR: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_STAR: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_PANEL: Color = Color::White;

/// Fixed star field, in fractions of the world size.
const STARS: [(f32, f32); 14] = [
    (0.05, 0.12), (0.13, 0.71), (0.21, 0.33), (0.29, 0.88), (0.36, 0.05),
    (0.44, 0.52), (0.51, 0.27), (0.58, 0.93), (0.66, 0.64), (0.72, 0.18),
    (0.79, 0.45), (0.85, 0.81), (0.91, 0.09), (0.97, 0.58),
];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps world pixels onto the play area inside the border: columns
/// `1..cols-1`, rows `2..rows-2`. The terminal size is read once when the
/// viewport is built, and every part of the frame draws against it.
pub struct Viewport {
    cols: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    pub fn new(snapshot: &FrameSnapshot) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(cols, rows, snapshot))
    }

    fn with_size(cols: u16, rows: u16, snapshot: &FrameSnapshot) -> Self {
        Self {
            cols,
            rows,
            world_w: snapshot.screen.w().max(1.0),
            world_h: snapshot.screen.h().max(1.0),
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn inner_cols(&self) -> f32 {
        self.cols.saturating_sub(2) as f32
    }

    fn inner_rows(&self) -> f32 {
        self.rows.saturating_sub(4) as f32
    }

    /// Terminal cell for a world point, or `None` outside the play area.
    fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.world_w || y >= self.world_h {
            return None;
        }
        let col = 1 + (x / self.world_w * self.inner_cols()) as u16;
        let row = 2 + (y / self.world_h * self.inner_rows()) as u16;
        (col < self.cols.saturating_sub(1) && row < self.rows.saturating_sub(2))
            .then_some((col, row))
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame of the running game.
pub fn render<W: Write>(out: &mut W, snapshot: &FrameSnapshot, paused: bool) -> std::io::Result<()> {
    let view = Viewport::new(snapshot)?;
    draw_scene(out, &view, snapshot)?;
    draw_controls_hint(out, &view)?;
    if paused {
        draw_panel(
            out,
            &view,
            &[
                ("PAUSED", Color::Yellow),
                ("", Color::White),
                ("[R] Resume", Color::White),
                ("[M] Main menu", Color::White),
                ("[Q] Exit", Color::White),
            ],
        )?;
    }
    finish(out, view.rows)
}

/// Border, backdrop, HUD and every entity in the snapshot.
pub fn draw_scene<W: Write>(
    out: &mut W,
    view: &Viewport,
    snapshot: &FrameSnapshot,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_backdrop(out, view, snapshot)?;
    for item in &snapshot.items {
        draw_item(out, view, item)?;
    }
    draw_hud(out, view, snapshot)?;
    Ok(())
}

/// A bordered box centred on the screen with one line per entry.
pub fn draw_panel<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let (cols, rows) = (view.cols, view.rows);
    let inner = lines
        .iter()
        .map(|(text, _)| text.chars().count())
        .max()
        .unwrap_or(0)
        + 4;
    let width = inner as u16 + 2;
    let left = (cols / 2).saturating_sub(width / 2);
    let top = (rows / 2).saturating_sub(lines.len() as u16 / 2 + 1);

    out.queue(style::SetForegroundColor(C_PANEL))?;
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    for (i, (text, color)) in lines.iter().enumerate() {
        let row = top + 1 + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(C_PANEL))?;
        out.queue(Print(format!("║{}║", " ".repeat(inner))))?;
        let pad = (inner - text.chars().count()) / 2;
        out.queue(cursor::MoveTo(left + 1 + pad as u16, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    out.queue(style::SetForegroundColor(C_PANEL))?;
    out.queue(cursor::MoveTo(left, top + 1 + lines.len() as u16))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
    Ok(())
}

/// Reset colours, park the cursor on the last of `rows` and flush.
pub fn finish<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()
}

pub fn progress_text(progress: WinProgress) -> String {
    match progress {
        WinProgress::MilesToStation(miles) => format!("Station in {} miles", miles),
        WinProgress::EnemiesLeft(n) => format!("Enemies left: {}", n),
        WinProgress::DangerZone => "You are in the danger zone!".to_string(),
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

fn draw_backdrop<W: Write>(
    out: &mut W,
    view: &Viewport,
    snapshot: &FrameSnapshot,
) -> std::io::Result<()> {
    let (glyph, color) = match snapshot.level_id {
        0 => ("·", C_STAR),
        1 => ("+", C_STAR),
        _ => ("·", Color::DarkRed),
    };
    out.queue(style::SetForegroundColor(color))?;
    for (fx, fy) in STARS {
        let x = (fx * view.world_w + snapshot.backdrop_offset).rem_euclid(view.world_w);
        if let Some((col, row)) = view.to_cell(x, fy * view.world_h) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, snapshot: &FrameSnapshot) -> std::io::Result<()> {
    // Hearts, left
    let full = snapshot.hp as usize;
    let empty = snapshot.max_hp.saturating_sub(snapshot.hp) as usize;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEART))?;
    out.queue(Print(format!("{}{}", "♥".repeat(full), "♡".repeat(empty))))?;

    // Win condition after the hearts
    let progress = progress_text(snapshot.progress);
    let progress_color = match snapshot.progress {
        WinProgress::DangerZone => Color::Red,
        _ => Color::White,
    };
    out.queue(cursor::MoveTo(2 + snapshot.max_hp as u16 + 1, 0))?;
    out.queue(style::SetForegroundColor(progress_color))?;
    out.queue(Print(&progress))?;

    // Level, centre
    let level_str = format!("[ {} ]", snapshot.level_name.to_uppercase());
    let lx = (view.cols / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    // Score, right
    let score_str = format!("Score:{:>6}", snapshot.score);
    let rx = view.cols.saturating_sub(score_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn sprite_for(item: &DrawItem) -> (&'static str, Color) {
    // Anything rotated past a quarter turn is drawn facing the other way.
    let flipped = item.rotation.abs() > 90.0;
    match item.kind {
        DrawKind::Player => ("»═►", C_PLAYER),
        DrawKind::Enemy(EnemyKind::SmallStone) => ("o", C_SMALL_STONE),
        DrawKind::Enemy(EnemyKind::BigStone) => ("(@)", C_BIG_STONE),
        DrawKind::Enemy(EnemyKind::Scout) if flipped => ("=►", C_SCOUT),
        DrawKind::Enemy(EnemyKind::Scout) => ("◄=", C_SCOUT),
        DrawKind::Enemy(EnemyKind::Warrior) => ("◄█═", C_WARRIOR),
        DrawKind::PlayerBullet => ("-", C_BULLET_PLAYER),
        DrawKind::EnemyBullet => ("•", C_BULLET_ENEMY),
    }
}

fn draw_item<W: Write>(out: &mut W, view: &Viewport, item: &DrawItem) -> std::io::Result<()> {
    let cx = item.bounds.left + item.bounds.width / 2.0;
    let cy = item.bounds.center_y();
    let Some((col, row)) = view.to_cell(cx, cy) else {
        return Ok(());
    };
    let (glyph, color) = sprite_for(item);
    let half = glyph.chars().count() as u16 / 2;
    let start = col.saturating_sub(half).max(1);
    // Clip on the right border.
    let room = view.cols.saturating_sub(1).saturating_sub(start) as usize;
    let visible: String = glyph.chars().take(room).collect();

    out.queue(cursor::MoveTo(start, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(visible))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD / arrows : Move   SPACE : Shoot   ESC / P : Pause"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_patrol::geometry::ScreenSize;
    use sky_patrol::scene::GameScene;

    fn snapshot() -> FrameSnapshot {
        GameScene::new(0, ScreenSize::new(800, 600)).snapshot()
    }

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn world_maps_inside_the_border() {
        let view = Viewport::with_size(80, 24, &snapshot());
        assert_eq!(view.to_cell(0.0, 0.0), Some((1, 2)));
        assert_eq!(view.to_cell(799.0, 599.0), Some((78, 21)));
        assert_eq!(view.to_cell(800.0, 0.0), None);
        assert_eq!(view.to_cell(-1.0, 10.0), None);
    }

    #[test]
    fn hint_and_cursor_follow_the_viewport_rows() {
        let snap = snapshot();
        for (cols, rows) in [(80, 24), (120, 40)] {
            let view = Viewport::with_size(cols, rows, &snap);
            let hint = rendered(|out| draw_controls_hint(out, &view));
            assert!(hint.contains(&format!("\x1b[{};2H", rows)), "{:?}", hint);

            let parked = rendered(|out| finish(out, view.rows()));
            assert!(parked.contains(&format!("\x1b[{};1H", rows)), "{:?}", parked);
        }
    }

    #[test]
    fn panel_is_centred_in_the_viewport() {
        let view = Viewport::with_size(80, 24, &snapshot());
        let panel = rendered(|out| draw_panel(out, &view, &[("X", Color::White)]));
        // inner width 5, box width 7: left = 40 - 3, top = 12 - 1
        assert!(panel.contains("\x1b[12;38H"), "{:?}", panel);
    }
}
