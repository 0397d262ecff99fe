/// The game scene: one level session, advanced once per frame by the host.
///
/// `update` runs the frame in a fixed order:
///   1. terminal check (dead player → snapshot + game over)
///   2. spawn tick
///   3. pending player shot
///   4. backdrop, level timer and win condition
///   5. player, bullets and enemies advance
///   6-9. collision passes (see `collisions`)
///
/// All randomness comes through the injected `rng`.

use rand::Rng;

use crate::collisions;
use crate::entities::{Bullet, EnemyKind, EnemyRoster, Player, RemainingEnemies};
use crate::geometry::{ScreenSize, Vec2};
use crate::level::{spawn_wave, LevelPolicy, WinCondition, WinProgress};
use crate::movement::InputState;
use crate::snapshot::FrameSnapshot;

// ── Timing ────────────────────────────────────────────────────────────────────

/// Upper bound on a single frame's elapsed time, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Clamp a measured frame time so long stalls (window drags, terminal
/// resizes) do not teleport entities.
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Bonus per hit point left when a level is won.
pub const HEALTH_BONUS: i32 = 10;
/// The ship-clearing level awards `(SPEED_BONUS_BASE - seconds) * SPEED_BONUS_RATE`.
pub const SPEED_BONUS_BASE: f32 = 200.0;
pub const SPEED_BONUS_RATE: f32 = 3.0;

/// Backdrop scrolls at this fraction of the player's speed.
const BACKDROP_SPEED_FACTOR: f32 = 0.4;

// ── Host interface ────────────────────────────────────────────────────────────

/// Everything the host hands the scene for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Already clamped with `clamp_frame_delta`.
    pub dt: f32,
    pub screen: ScreenSize,
    pub input: InputState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseButton {
    Resume,
    MainMenu,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// The dedicated pause key.
    TogglePause,
    /// A pause-menu button; ignored unless paused.
    PauseMenu(PauseButton),
}

/// Navigation the scene asks of its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest {
    MainMenu,
    Exit,
}

/// One-way hand-off at the end of a session. Emitted exactly once.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOutcome {
    GameOver(FrameSnapshot),
    Victory { level_id: i32, score: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneStatus {
    Running,
    GameOver,
    Victory,
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

/// Two screen-wide tiles laid side by side; a tile that scrolls fully off
/// the left edge is moved behind the other one.
#[derive(Clone, Debug, PartialEq)]
pub struct Backdrop {
    tiles: [f32; 2],
    tile_width: f32,
    scrolling: bool,
}

impl Backdrop {
    pub fn new(screen: ScreenSize, scrolling: bool) -> Self {
        Self { tiles: [0.0, screen.w()], tile_width: screen.w(), scrolling }
    }

    pub fn update(&mut self, dt: f32, speed: f32) {
        if !self.scrolling {
            return;
        }
        for tile in &mut self.tiles {
            *tile -= speed * dt;
        }
        let w = self.tile_width;
        if self.tiles[0] + w < 0.0 {
            self.tiles[0] = self.tiles[1] + w;
        }
        if self.tiles[1] + w < 0.0 {
            self.tiles[1] = self.tiles[0] + w;
        }
    }

    /// Left edge of the first tile.
    pub fn offset(&self) -> f32 {
        self.tiles[0]
    }

    pub fn tiles(&self) -> [f32; 2] {
        self.tiles
    }
}

// ── Scene state ───────────────────────────────────────────────────────────────

/// Session state. The scene owns every entity; none outlives it.
#[derive(Clone, Debug)]
pub struct GameScene {
    pub policy: LevelPolicy,
    pub screen: ScreenSize,
    /// Simulation seconds since the level started.
    pub level_time: f32,
    pub spawn_timer: f32,
    /// Spawn ticks fired so far this session.
    pub spawn_tick: u32,
    pub score: i32,
    pub remaining: RemainingEnemies,
    pub paused: bool,
    pub status: SceneStatus,
    pub player: Player,
    pub roster: EnemyRoster,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub backdrop: Backdrop,
}

impl GameScene {
    pub fn new(level_id: i32, screen: ScreenSize) -> Self {
        let policy = LevelPolicy::for_level(level_id);
        tracing::info!(level = level_id, name = policy.name, "level started");
        Self {
            policy,
            screen,
            level_time: 0.0,
            spawn_timer: 0.0,
            spawn_tick: 0,
            score: 0,
            remaining: RemainingEnemies::default(),
            paused: false,
            status: SceneStatus::Running,
            player: Player::new(Vec2::new(screen.w() / 6.0, screen.h() / 2.0)),
            roster: EnemyRoster::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            backdrop: Backdrop::new(screen, policy.scrolling_backdrop),
        }
    }

    pub fn handle_event(&mut self, event: SceneEvent) -> Option<HostRequest> {
        match event {
            SceneEvent::TogglePause => {
                self.paused = !self.paused;
                tracing::debug!(paused = self.paused, "pause toggled");
                None
            }
            SceneEvent::PauseMenu(_) if !self.paused => None,
            SceneEvent::PauseMenu(PauseButton::Resume) => {
                self.paused = false;
                None
            }
            SceneEvent::PauseMenu(PauseButton::MainMenu) => Some(HostRequest::MainMenu),
            SceneEvent::PauseMenu(PauseButton::Exit) => Some(HostRequest::Exit),
        }
    }

    /// Advance the session by one frame. Returns the outcome on the frame
    /// the session ends and `None` on every other call, including all calls
    /// after the end.
    pub fn update(&mut self, frame: &FrameContext, rng: &mut impl Rng) -> Option<SceneOutcome> {
        if self.paused || self.status != SceneStatus::Running {
            return None;
        }
        self.screen = frame.screen;
        let dt = frame.dt;

        // ── 1. Terminal check ─────────────────────────────────────────────────
        if !self.player.is_alive() {
            let snapshot = self.snapshot();
            self.status = SceneStatus::GameOver;
            tracing::info!(level = self.policy.id, score = self.score, "game over");
            return Some(SceneOutcome::GameOver(snapshot));
        }

        // ── 2. Spawn ──────────────────────────────────────────────────────────
        self.spawn_timer += dt;
        if self.spawn_timer > self.policy.spawn_interval {
            let wave = spawn_wave(
                &self.policy,
                self.spawn_tick,
                self.level_time,
                self.screen,
                &self.roster,
                &self.remaining,
                rng,
            );
            for enemy in wave {
                self.roster.push(enemy);
            }
            self.spawn_tick = self.spawn_tick.wrapping_add(1);
            self.spawn_timer = 0.0;
        }

        // ── 3. Player shot ────────────────────────────────────────────────────
        if self.player.take_shot_request() {
            self.player_bullets.push(Bullet::from_player(self.player.muzzle()));
        }

        // ── 4. Backdrop, timer, win condition ─────────────────────────────────
        self.backdrop.update(dt, self.player.speed * BACKDROP_SPEED_FACTOR);
        self.level_time += dt;
        if let Some(outcome) = self.check_victory() {
            return Some(outcome);
        }

        // ── 5. Advance entities ───────────────────────────────────────────────
        let screen = self.screen;
        self.player.update(dt, &frame.input, screen);
        self.player_bullets.retain_mut(|b| {
            b.update(dt);
            !b.is_out_of_bounds(screen)
        });
        self.enemy_bullets.retain_mut(|b| {
            b.update(dt);
            !b.is_out_of_bounds(screen)
        });
        self.advance_enemies(dt);

        // ── 6-9. Collisions ───────────────────────────────────────────────────
        self.resolve_collisions();
        None
    }

    /// Live description of the current frame for drawing.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }

    pub fn win_progress(&self) -> WinProgress {
        self.policy.progress(self.level_time, &self.remaining)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn advance_enemies(&mut self, dt: f32) {
        let screen = self.screen;
        for kind in EnemyKind::RESOLUTION_ORDER {
            let enemies = self.roster.of_kind_mut(kind);
            let mut i = 0;
            while i < enemies.len() {
                let enemy = &mut enemies[i];
                enemy.update(dt, screen);
                if enemy.take_shot_request() {
                    self.enemy_bullets.push(Bullet::from_enemy(enemy.muzzle()));
                }
                if enemy.has_left_screen(screen) {
                    enemies.remove(i);
                    self.remaining.record_down(kind);
                } else {
                    i += 1;
                }
            }
        }
    }

    fn resolve_collisions(&mut self) {
        // ── 6. Enemy ↔ player ─────────────────────────────────────────────────
        if collisions::resolve_enemy_contacts(&mut self.player, &mut self.roster, &mut self.remaining)
        {
            return;
        }

        // ── 7. Player bullet ↔ enemy bullet ───────────────────────────────────
        collisions::resolve_bullet_clashes(&mut self.player_bullets, &mut self.enemy_bullets);

        // ── 8. Player bullet ↔ enemy ──────────────────────────────────────────
        self.score += collisions::resolve_player_hits(
            &mut self.player_bullets,
            &mut self.roster,
            &mut self.remaining,
        );

        // ── 9. Enemy bullet ↔ player ──────────────────────────────────────────
        collisions::resolve_enemy_fire(&mut self.enemy_bullets, &mut self.player);
    }

    fn check_victory(&mut self) -> Option<SceneOutcome> {
        let hp = self.player.health.current() as i32;
        match self.policy.win {
            WinCondition::Survive => {
                if self.policy.remaining_seconds(self.level_time)? > 0 {
                    return None;
                }
                self.score += hp * HEALTH_BONUS;
            }
            WinCondition::ClearShips => {
                if self.remaining.total() > 0 {
                    return None;
                }
                self.score += ((SPEED_BONUS_BASE - self.level_time) * SPEED_BONUS_RATE) as i32;
                self.score += hp * HEALTH_BONUS;
            }
            WinCondition::Endless => return None,
        }
        self.status = SceneStatus::Victory;
        tracing::info!(level = self.policy.id, score = self.score, "level cleared");
        Some(SceneOutcome::Victory { level_id: self.policy.id, score: self.score })
    }
}
