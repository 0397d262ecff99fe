use sky_patrol::entities::*;
use sky_patrol::geometry::{ScreenSize, Vec2};
use sky_patrol::level::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const SCREEN: ScreenSize = ScreenSize::new(800, 600);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn kinds(wave: &[Enemy]) -> Vec<EnemyKind> {
    wave.iter().map(|e| e.kind).collect()
}

fn wave_at(level: i32, tick: u32, roster: &EnemyRoster, remaining: &RemainingEnemies) -> Vec<Enemy> {
    let policy = LevelPolicy::for_level(level);
    spawn_wave(&policy, tick, 0.0, SCREEN, roster, remaining, &mut seeded_rng())
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[test]
fn level_catalog() {
    let meteors = LevelPolicy::for_level(0);
    assert_eq!(meteors.win, WinCondition::Survive);
    assert_eq!(meteors.duration, Some(120.0));
    assert_eq!(meteors.spawn_interval, 1.5);
    assert!(meteors.scrolling_backdrop);

    let ships = LevelPolicy::for_level(1);
    assert_eq!(ships.win, WinCondition::ClearShips);
    assert_eq!(ships.duration, None);
    assert_eq!(ships.spawn_interval, 3.0);

    assert_eq!(LevelPolicy::for_level(2).win, WinCondition::Endless);
    assert_eq!(LevelPolicy::for_level(MAX_LEVEL_ID + 5).win, WinCondition::Endless);
}

#[test]
fn remaining_seconds_truncate() {
    let policy = LevelPolicy::for_level(0);
    assert_eq!(policy.remaining_seconds(0.0), Some(120));
    assert_eq!(policy.remaining_seconds(119.5), Some(0));
    assert_eq!(LevelPolicy::for_level(1).remaining_seconds(10.0), None);
}

#[test]
fn win_progress_per_level() {
    let remaining = RemainingEnemies::default();
    let meteors = LevelPolicy::for_level(0);
    assert_eq!(meteors.progress(0.0, &remaining), WinProgress::MilesToStation(60));
    assert_eq!(meteors.progress(119.0, &remaining), WinProgress::MilesToStation(0));
    assert_eq!(meteors.progress(500.0, &remaining), WinProgress::MilesToStation(0));
    assert_eq!(
        LevelPolicy::for_level(1).progress(0.0, &remaining),
        WinProgress::EnemiesLeft(24)
    );
    assert_eq!(LevelPolicy::for_level(2).progress(0.0, &remaining), WinProgress::DangerZone);
}

// ── Level 0 ───────────────────────────────────────────────────────────────────

#[test]
fn meteor_pattern_over_ticks() {
    let roster = EnemyRoster::new();
    let remaining = RemainingEnemies::default();

    assert_eq!(kinds(&wave_at(0, 0, &roster, &remaining)), vec![EnemyKind::SmallStone]);
    for tick in [1, 2, 4, 5] {
        assert_eq!(
            kinds(&wave_at(0, tick, &roster, &remaining)),
            vec![EnemyKind::BigStone, EnemyKind::SmallStone],
            "tick {}",
            tick
        );
    }
    assert_eq!(kinds(&wave_at(0, 3, &roster, &remaining)), vec![EnemyKind::SmallStone]);
}

#[test]
fn meteors_drop_from_above_right_of_the_player() {
    let wave = wave_at(0, 1, &EnemyRoster::new(), &RemainingEnemies::default());
    let big = &wave[0];
    let small = &wave[1];

    assert_eq!(small.body.position.y, -100.0);
    assert_eq!(big.body.position.y, -100.0);
    assert!((big.body.position.x - small.body.position.x - 100.0).abs() < 1e-3);

    let min_x = SCREEN.w() / 6.0 + 50.0;
    assert!(small.body.position.x >= min_x);
    assert!(small.body.position.x < min_x + SCREEN.w());
}

#[test]
fn no_spawns_in_the_final_seconds() {
    let policy = LevelPolicy::for_level(0);
    let wave = spawn_wave(
        &policy,
        1,
        116.0,
        SCREEN,
        &EnemyRoster::new(),
        &RemainingEnemies::default(),
        &mut seeded_rng(),
    );
    assert!(wave.is_empty());
    assert!(!policy.in_quiet_period(114.0));
}

// ── Level 1 ───────────────────────────────────────────────────────────────────

#[test]
fn ships_alternate_scouts_and_warriors() {
    let roster = EnemyRoster::new();
    let remaining = RemainingEnemies::default();

    let scouts = wave_at(1, 0, &roster, &remaining);
    assert_eq!(kinds(&scouts), vec![EnemyKind::Scout, EnemyKind::Scout]);
    for s in &scouts {
        assert_eq!(s.body.position.x, 850.0);
        assert!(s.body.position.y >= 50.0 && s.body.position.y < 550.0);
    }

    let warriors = wave_at(1, 1, &roster, &remaining);
    assert_eq!(kinds(&warriors), vec![EnemyKind::Warrior]);
    assert_eq!(warriors[0].body.position.x, 850.0);
    assert!(warriors[0].body.position.y < 300.0);

    assert_eq!(kinds(&wave_at(1, 3, &roster, &remaining)), vec![EnemyKind::Scout; 2]);
}

#[test]
fn scouts_capped_by_remaining_budget() {
    let mut roster = EnemyRoster::new();
    let last_one = RemainingEnemies { scouts: 1, warriors: 8 };
    assert_eq!(wave_at(1, 0, &roster, &last_one).len(), 1);

    roster.push(Enemy::new(EnemyKind::Scout, Vec2::new(500.0, 100.0)));
    roster.push(Enemy::new(EnemyKind::Scout, Vec2::new(500.0, 200.0)));
    let three_left = RemainingEnemies { scouts: 3, warriors: 8 };
    assert_eq!(wave_at(1, 0, &roster, &three_left).len(), 1);

    let two_left = RemainingEnemies { scouts: 2, warriors: 8 };
    assert!(wave_at(1, 0, &roster, &two_left).is_empty());
}

#[test]
fn warriors_capped_by_remaining_budget() {
    let mut roster = EnemyRoster::new();
    for i in 0..3 {
        roster.push(Enemy::new(EnemyKind::Warrior, Vec2::new(700.0, 50.0 * i as f32)));
    }
    let remaining = RemainingEnemies { scouts: 16, warriors: 3 };
    assert!(wave_at(1, 1, &roster, &remaining).is_empty());

    let remaining = RemainingEnemies { scouts: 16, warriors: 4 };
    assert_eq!(wave_at(1, 1, &roster, &remaining).len(), 1);
}

#[test]
fn danger_zone_spawns_nothing() {
    for tick in 0..6 {
        assert!(wave_at(2, tick, &EnemyRoster::new(), &RemainingEnemies::default()).is_empty());
    }
}

#[test]
fn same_seed_same_wave() {
    let roster = EnemyRoster::new();
    let remaining = RemainingEnemies::default();
    assert_eq!(wave_at(1, 0, &roster, &remaining), wave_at(1, 0, &roster, &remaining));
    assert_eq!(wave_at(0, 2, &roster, &remaining), wave_at(0, 2, &roster, &remaining));
}
