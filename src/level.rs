/// Level catalog and the level-specific spawn policy.
///
/// All randomness comes through the injected `rng`, so a seeded RNG gives a
/// reproducible spawn sequence.

use rand::Rng;

use crate::entities::{Enemy, EnemyKind, EnemyRoster, RemainingEnemies};
use crate::geometry::{ScreenSize, Vec2};

/// Highest level id the game ships with.
pub const MAX_LEVEL_ID: i32 = 2;

/// Timed levels stop spawning this many seconds before the end.
pub const SPAWN_QUIET_PERIOD: f32 = 5.0;

/// Scouts spawned together on a scout tick.
const SCOUTS_PER_WAVE: usize = 2;

// ── Policy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinCondition {
    /// Stay alive until the level timer runs out.
    Survive,
    /// Deal with every scout and warrior in the level's budget.
    ClearShips,
    /// The level cannot be won.
    Endless,
}

/// What the HUD shows about the win condition. The host formats the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinProgress {
    MilesToStation(i32),
    EnemiesLeft(u32),
    DangerZone,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelPolicy {
    pub id: i32,
    pub name: &'static str,
    /// Seconds; `None` for untimed levels.
    pub duration: Option<f32>,
    /// Seconds between spawn ticks.
    pub spawn_interval: f32,
    pub win: WinCondition,
    pub scrolling_backdrop: bool,
}

impl LevelPolicy {
    pub fn for_level(id: i32) -> Self {
        match id {
            0 => Self {
                id,
                name: "Meteor field",
                duration: Some(120.0),
                spawn_interval: 1.5,
                win: WinCondition::Survive,
                scrolling_backdrop: true,
            },
            1 => Self {
                id,
                name: "Ships",
                duration: None,
                spawn_interval: 3.0,
                win: WinCondition::ClearShips,
                scrolling_backdrop: false,
            },
            _ => Self {
                id,
                name: "Danger zone",
                duration: None,
                spawn_interval: 3.0,
                win: WinCondition::Endless,
                scrolling_backdrop: false,
            },
        }
    }

    /// Whole seconds left on a timed level, truncated toward zero.
    pub fn remaining_seconds(&self, elapsed: f32) -> Option<i32> {
        self.duration.map(|d| (d - elapsed) as i32)
    }

    /// True inside the final `SPAWN_QUIET_PERIOD` seconds of a timed level.
    pub fn in_quiet_period(&self, elapsed: f32) -> bool {
        matches!(self.duration, Some(d) if elapsed > d - SPAWN_QUIET_PERIOD)
    }

    pub fn progress(&self, elapsed: f32, remaining: &RemainingEnemies) -> WinProgress {
        match self.win {
            WinCondition::Survive => {
                let secs = self.remaining_seconds(elapsed).unwrap_or(0);
                WinProgress::MilesToStation((secs / 2).max(0))
            }
            WinCondition::ClearShips => WinProgress::EnemiesLeft(remaining.total()),
            WinCondition::Endless => WinProgress::DangerZone,
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Enemies to add on spawn tick number `tick` (0-based, per scene).
///
/// Level 0 drops a small stone every tick and a big stone beside it on two
/// ticks out of three. Level 1 sends two scouts every third tick and one
/// warrior otherwise, never keeping more of a kind alive than its remaining
/// budget. Other levels spawn nothing.
pub fn spawn_wave(
    policy: &LevelPolicy,
    tick: u32,
    elapsed: f32,
    screen: ScreenSize,
    roster: &EnemyRoster,
    remaining: &RemainingEnemies,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let mut wave = Vec::new();
    if policy.in_quiet_period(elapsed) {
        return wave;
    }

    match policy.id {
        0 => {
            let x = rng.gen_range(0..screen.width.max(1)) as f32 + screen.w() / 6.0;
            if tick % 3 != 0 {
                wave.push(Enemy::new(EnemyKind::BigStone, Vec2::new(x + 150.0, -100.0)));
            }
            wave.push(Enemy::new(EnemyKind::SmallStone, Vec2::new(x + 50.0, -100.0)));
        }
        1 => {
            let spawn_x = screen.w() + 50.0;
            if tick % 3 == 0 {
                let alive = roster.count(EnemyKind::Scout);
                let budget = remaining.scouts as usize;
                for n in 0..SCOUTS_PER_WAVE {
                    if alive + n >= budget {
                        break;
                    }
                    let span = screen.height.saturating_sub(100).max(1);
                    let y = rng.gen_range(0..span) as f32 + 50.0;
                    wave.push(Enemy::new(EnemyKind::Scout, Vec2::new(spawn_x, y)));
                }
            } else if roster.count(EnemyKind::Warrior) < remaining.warriors as usize {
                let y = rng.gen_range(0..(screen.height / 2).max(1)) as f32;
                wave.push(Enemy::new(EnemyKind::Warrior, Vec2::new(spawn_x, y)));
            }
        }
        _ => {}
    }

    if !wave.is_empty() {
        tracing::debug!(level = policy.id, tick, spawned = wave.len(), "spawn tick");
    }
    wave
}
