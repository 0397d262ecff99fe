mod display;
mod menus;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::filter::EnvFilter;

use sky_patrol::config::{self, Config};
use sky_patrol::level::MAX_LEVEL_ID;
use sky_patrol::movement::InputState;
use sky_patrol::progress::Progress;
use sky_patrol::scene::{
    clamp_frame_delta, FrameContext, GameScene, HostRequest, PauseButton, SceneEvent, SceneOutcome,
};
use sky_patrol::scores::{LeaderboardEntry, ScoreStore, LEADERBOARD_SIZE};
use sky_patrol::snapshot::FrameSnapshot;

use menus::{GameOverChoice, MainMenuChoice, VictoryChoice, VictoryInfo};

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const FIRE_KEYS: [KeyCode; 1] = [KeyCode::Char(' ')];

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

fn sample_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    InputState {
        up: any_held(key_frame, &UP_KEYS, frame),
        down: any_held(key_frame, &DOWN_KEYS, frame),
        left: any_held(key_frame, &LEFT_KEYS, frame),
        right: any_held(key_frame, &RIGHT_KEYS, frame),
        fire: any_held(key_frame, &FIRE_KEYS, frame),
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Everything that lives across scenes for one logged-in player.
struct Session {
    config: Config,
    player: String,
    progress: Progress,
    /// `None` when the database could not be opened; scores are then not saved.
    scores: Option<ScoreStore>,
    current_level: i32,
}

impl Session {
    /// Record a won level: best score, next level unlock, saved progress.
    /// Returns the player's best score on the level, when known.
    fn finish_level(&mut self, level_id: i32, score: i32) -> Option<i32> {
        let best = self.scores.as_ref().and_then(|store| {
            if let Err(e) = store.record_score(&self.player, level_id, score) {
                tracing::error!(error = %e, level = level_id, score, "failed to record score");
            }
            store.best_score(&self.player, level_id).ok().flatten()
        });

        let next = level_id + 1;
        if self.progress.unlock_level(next) {
            tracing::info!(level = next, "level unlocked");
            self.current_level = next;
            self.save_progress();
        }
        best
    }

    fn save_progress(&self) {
        if let Err(e) = self.progress.save(&self.config.progress_path) {
            tracing::error!(error = %e, "failed to save progress");
        }
    }

    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let Some(store) = &self.scores else {
            return Vec::new();
        };
        store.leaderboard(LEADERBOARD_SIZE).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read leaderboard");
            Vec::new()
        })
    }
}

enum Screen {
    MainMenu,
    LevelSelect,
    Leaderboard,
    Playing(i32),
    GameOver { level_id: i32, snapshot: FrameSnapshot },
    Victory { level_id: i32, score: i32 },
    Quit,
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Run one level until it ends or the player leaves it.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the still-fresh keys (within
/// `HOLD_WINDOW` frames) become the scene's `InputState`, so Space and the
/// direction keys can all be held together.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    level_id: i32,
) -> std::io::Result<Screen> {
    let mut rng = thread_rng();
    let mut scene = GameScene::new(level_id, config.world);
    let frame_budget = config.frame_duration();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    let scene_event = match code {
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(Screen::Quit);
                        }
                        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => {
                            Some(SceneEvent::TogglePause)
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            Some(SceneEvent::PauseMenu(PauseButton::Resume))
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            Some(SceneEvent::PauseMenu(PauseButton::MainMenu))
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            Some(SceneEvent::PauseMenu(PauseButton::Exit))
                        }
                        _ => None,
                    };
                    match scene_event.and_then(|ev| scene.handle_event(ev)) {
                        Some(HostRequest::MainMenu) => return Ok(Screen::MainMenu),
                        Some(HostRequest::Exit) => return Ok(Screen::Quit),
                        None => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Advance the scene ─────────────────────────────────────────────────
        let now = Instant::now();
        let dt = clamp_frame_delta(now.duration_since(last_frame).as_secs_f32());
        last_frame = now;

        let ctx = FrameContext { dt, screen: config.world, input: sample_input(&key_frame, frame) };
        match scene.update(&ctx, &mut rng) {
            Some(SceneOutcome::GameOver(snapshot)) => {
                return Ok(Screen::GameOver { level_id, snapshot });
            }
            Some(SceneOutcome::Victory { level_id, score }) => {
                return Ok(Screen::Victory { level_id, score });
            }
            None => {}
        }

        display::render(out, &scene.snapshot(), scene.is_paused())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The alternate screen owns stdout, so log lines go to a file. Without one,
/// logging is silent.
fn init_logging(path: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

fn main() -> std::io::Result<()> {
    init_logging(&config::log_path_from_env());
    let config = Config::from_env();
    tracing::info!(
        "starting sky patrol: world={}x{} fps={} progress={} db={}",
        config.world.width,
        config.world.height,
        config.fps,
        config.progress_path.display(),
        config.database_path.display(),
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal i/o failed");
    }
    tracing::info!("sky patrol exited");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: Config,
) -> std::io::Result<()> {
    let Some(player) = menus::login(out, rx)? else {
        return Ok(());
    };

    let progress = Progress::load(&config.progress_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load progress, starting fresh");
        Progress::default()
    });
    let scores = match ScoreStore::open(&config.database_path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "score database unavailable, scores will not be saved");
            None
        }
    };
    let current_level = progress.max_unlocked_level().unwrap_or(0);
    let mut session = Session { config, player, progress, scores, current_level };

    let mut screen = Screen::MainMenu;
    loop {
        screen = match screen {
            Screen::MainMenu => {
                match menus::main_menu(out, rx, &session.player, session.current_level)? {
                    MainMenuChoice::Play => Screen::Playing(session.current_level),
                    MainMenuChoice::SelectLevel => Screen::LevelSelect,
                    MainMenuChoice::Leaderboard => Screen::Leaderboard,
                    MainMenuChoice::Quit => Screen::Quit,
                }
            }
            Screen::LevelSelect => match menus::level_select(out, rx, &session.progress)? {
                Some(level_id) => {
                    session.current_level = level_id;
                    Screen::Playing(level_id)
                }
                None => Screen::MainMenu,
            },
            Screen::Leaderboard => {
                let entries = session.leaderboard();
                menus::leaderboard(out, rx, &entries, (MAX_LEVEL_ID + 1) as usize)?;
                Screen::MainMenu
            }
            Screen::Playing(level_id) => game_loop(out, rx, &session.config, level_id)?,
            Screen::GameOver { level_id, snapshot } => {
                match menus::game_over(out, rx, &snapshot)? {
                    GameOverChoice::Retry => Screen::Playing(level_id),
                    GameOverChoice::Menu => Screen::MainMenu,
                    GameOverChoice::Quit => Screen::Quit,
                }
            }
            Screen::Victory { level_id, score } => {
                let best = session.finish_level(level_id, score);
                let next = level_id + 1;
                let info = VictoryInfo {
                    player: &session.player,
                    level_id,
                    score,
                    best,
                    next_available: session.progress.is_level_unlocked(next),
                };
                match menus::victory(out, rx, &info)? {
                    VictoryChoice::Next => Screen::Playing(next),
                    VictoryChoice::Retry => Screen::Playing(level_id),
                    VictoryChoice::Menu => Screen::MainMenu,
                    VictoryChoice::Quit => Screen::Quit,
                }
            }
            Screen::Quit => break,
        };
    }

    session.save_progress();
    Ok(())
}
