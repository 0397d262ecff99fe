/// Full-screen menus around the game scene: login, main menu, level select,
/// leaderboard, game over and victory.
///
/// Every screen draws once, then blocks on the input channel until the
/// player picks something.

use std::io::Write;
use std::sync::mpsc;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_patrol::level::LevelPolicy;
use sky_patrol::profile::{NameEntry, MAX_NAME_LEN};
use sky_patrol::progress::Progress;
use sky_patrol::scores::LeaderboardEntry;
use sky_patrol::snapshot::FrameSnapshot;

use crate::display;

const TITLE: &str = "★  SKY  PATROL  ★";

// ── Choices ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainMenuChoice {
    Play,
    SelectLevel,
    Leaderboard,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverChoice {
    Retry,
    Menu,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VictoryChoice {
    Next,
    Retry,
    Menu,
    Quit,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Block until the next key press. `None` once the input thread is gone.
fn next_key(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(key),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn draw_centered<W: Write>(out: &mut W, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let (width, _) = terminal::size()?;
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Clears the screen and draws the title. Returns the centre cell and the
/// row count for `display::finish`.
fn begin<W: Write>(out: &mut W) -> std::io::Result<(u16, u16, u16)> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    draw_centered(out, (height / 2).saturating_sub(7), TITLE, Color::Cyan)?;
    Ok((width / 2, height / 2, height))
}

// ── Login ─────────────────────────────────────────────────────────────────────

/// Ask for the player's name. `None` if the player quits instead.
pub fn login<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<Option<String>> {
    let mut entry = NameEntry::new();
    loop {
        let (_, cy, rows) = begin(out)?;
        draw_centered(out, cy.saturating_sub(2), "Enter your name:", Color::White)?;
        let field = format!(
            "[ {}{} ]",
            entry.as_str(),
            "_".repeat(MAX_NAME_LEN - entry.as_str().chars().count())
        );
        draw_centered(out, cy, &field, Color::Yellow)?;
        draw_centered(out, cy + 3, "ENTER : Confirm   ESC : Quit", Color::DarkGrey)?;
        display::finish(out, rows)?;

        let Some(key) = next_key(rx) else {
            return Ok(None);
        };
        if is_interrupt(&key) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => {
                if let Some(name) = entry.confirm() {
                    tracing::info!(player = %name, "player logged in");
                    return Ok(Some(name));
                }
            }
            KeyCode::Backspace => entry.backspace(),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char(c) => {
                entry.push(c);
            }
            _ => {}
        }
    }
}

// ── Main menu ─────────────────────────────────────────────────────────────────

pub fn main_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    player: &str,
    current_level: i32,
) -> std::io::Result<MainMenuChoice> {
    let (cx, cy, rows) = begin(out)?;
    draw_centered(out, cy.saturating_sub(5), &format!("Pilot: {}", player), Color::Yellow)?;

    let level = LevelPolicy::for_level(current_level);
    let options: &[(&str, String)] = &[
        ("1", format!("Play  — level {}: {}", current_level + 1, level.name)),
        ("2", "Select level".to_string()),
        ("3", "Leaderboard".to_string()),
        ("Q", "Quit".to_string()),
    ];
    for (i, (key, label)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(label))?;
    }
    draw_centered(
        out,
        cy + 4,
        "WASD / arrows : Move   SPACE : Shoot   ESC / P : Pause",
        Color::DarkGrey,
    )?;
    display::finish(out, rows)?;

    loop {
        let Some(key) = next_key(rx) else {
            return Ok(MainMenuChoice::Quit);
        };
        if is_interrupt(&key) {
            return Ok(MainMenuChoice::Quit);
        }
        match key.code {
            KeyCode::Char('1') | KeyCode::Enter => return Ok(MainMenuChoice::Play),
            KeyCode::Char('2') => return Ok(MainMenuChoice::SelectLevel),
            KeyCode::Char('3') => return Ok(MainMenuChoice::Leaderboard),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MainMenuChoice::Quit);
            }
            _ => {}
        }
    }
}

// ── Level select ──────────────────────────────────────────────────────────────

/// Pick one of the unlocked levels. `None` goes back to the main menu.
pub fn level_select<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    progress: &Progress,
) -> std::io::Result<Option<i32>> {
    let (cx, cy, rows) = begin(out)?;
    draw_centered(out, cy.saturating_sub(4), "Select level:", Color::White)?;

    for id in 0..=progress.max_level() {
        let row = cy.saturating_sub(2) + id as u16;
        let name = LevelPolicy::for_level(id).name;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", id + 1)))?;
        if progress.is_level_unlocked(id) {
            out.queue(style::SetForegroundColor(Color::Green))?;
            out.queue(Print(name))?;
        } else {
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("{} (locked)", name)))?;
        }
    }
    draw_centered(out, cy + 3, "ESC : Back", Color::DarkGrey)?;
    display::finish(out, rows)?;

    loop {
        let Some(key) = next_key(rx) else {
            return Ok(None);
        };
        if is_interrupt(&key) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let id = c as i32 - '1' as i32;
                if progress.is_level_unlocked(id) {
                    return Ok(Some(id));
                }
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(None),
            _ => {}
        }
    }
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

pub fn leaderboard<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    entries: &[LeaderboardEntry],
    level_count: usize,
) -> std::io::Result<()> {
    let (cx, cy, rows) = begin(out)?;
    let left = cx.saturating_sub(22);
    let top = cy.saturating_sub(5);

    let mut header = format!("{:<4}{:<8}", "#", "Name");
    for level in 1..=level_count {
        header.push_str(&format!("{:>7}", format!("L{}", level)));
    }
    header.push_str(&format!("{:>8}", "Total"));
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(&header))?;

    if entries.is_empty() {
        out.queue(cursor::MoveTo(left, top + 2))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("No scores yet."))?;
    }
    for (rank, entry) in entries.iter().enumerate() {
        let mut line = format!("{:<4}{:<8}", rank + 1, entry.name);
        for level in 0..level_count {
            let score = entry.scores_per_level.get(level).copied().unwrap_or(0);
            line.push_str(&format!("{:>7}", score));
        }
        line.push_str(&format!("{:>8}", entry.total()));
        out.queue(cursor::MoveTo(left, top + 1 + rank as u16))?;
        out.queue(style::SetForegroundColor(if rank == 0 { Color::Yellow } else { Color::White }))?;
        out.queue(Print(&line))?;
    }
    draw_centered(out, top + 13, "Press any key to go back", Color::DarkGrey)?;
    display::finish(out, rows)?;

    next_key(rx);
    Ok(())
}

// ── Game over ─────────────────────────────────────────────────────────────────

/// The frozen moment of death with the retry panel on top.
pub fn game_over<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    snapshot: &FrameSnapshot,
) -> std::io::Result<GameOverChoice> {
    let view = display::Viewport::new(snapshot)?;
    display::draw_scene(out, &view, snapshot)?;
    let score = format!("Score: {}", snapshot.score);
    display::draw_panel(
        out,
        &view,
        &[
            ("GAME OVER", Color::Red),
            (score.as_str(), Color::Yellow),
            ("", Color::White),
            ("[R] Retry", Color::White),
            ("[M] Main menu", Color::White),
            ("[Q] Quit", Color::White),
        ],
    )?;
    display::finish(out, view.rows())?;

    loop {
        let Some(key) = next_key(rx) else {
            return Ok(GameOverChoice::Quit);
        };
        if is_interrupt(&key) {
            return Ok(GameOverChoice::Quit);
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
                return Ok(GameOverChoice::Retry);
            }
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => {
                return Ok(GameOverChoice::Menu);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(GameOverChoice::Quit),
            _ => {}
        }
    }
}

// ── Victory ───────────────────────────────────────────────────────────────────

pub struct VictoryInfo<'a> {
    pub player: &'a str,
    pub level_id: i32,
    pub score: i32,
    pub best: Option<i32>,
    /// Whether a following level exists and is unlocked.
    pub next_available: bool,
}

pub fn victory<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    info: &VictoryInfo<'_>,
) -> std::io::Result<VictoryChoice> {
    let (_, cy, rows) = begin(out)?;
    let level = LevelPolicy::for_level(info.level_id);
    draw_centered(out, cy.saturating_sub(4), "LEVEL CLEARED!", Color::Green)?;
    draw_centered(
        out,
        cy.saturating_sub(3),
        &format!("Well flown, {}. {} is behind you.", info.player, level.name),
        Color::White,
    )?;
    draw_centered(out, cy.saturating_sub(1), &format!("Score: {}", info.score), Color::Yellow)?;
    if let Some(best) = info.best {
        draw_centered(out, cy, &format!("Best: {}", best), Color::DarkYellow)?;
    }

    let mut row = cy + 2;
    if info.next_available {
        draw_centered(out, row, "[N] Next level", Color::White)?;
        row += 1;
    }
    draw_centered(out, row, "[R] Retry", Color::White)?;
    draw_centered(out, row + 1, "[M] Main menu", Color::White)?;
    draw_centered(out, row + 2, "[Q] Quit", Color::White)?;
    display::finish(out, rows)?;

    loop {
        let Some(key) = next_key(rx) else {
            return Ok(VictoryChoice::Quit);
        };
        if is_interrupt(&key) {
            return Ok(VictoryChoice::Quit);
        }
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter if info.next_available => {
                return Ok(VictoryChoice::Next);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => return Ok(VictoryChoice::Retry),
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => {
                return Ok(VictoryChoice::Menu);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(VictoryChoice::Quit),
            _ => {}
        }
    }
}
