use sky_patrol::entities::*;
use sky_patrol::geometry::{ScreenSize, Vec2};
use sky_patrol::movement::*;

const SCREEN: ScreenSize = ScreenSize::new(800, 600);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn held(f: impl FnOnce(&mut InputState)) -> InputState {
    let mut input = InputState::default();
    f(&mut input);
    input
}

fn scout_phase(e: &Enemy) -> ScoutPhase {
    match e.motion {
        Motion::Scout(s) => s.phase,
        other => panic!("not a scout: {:?}", other),
    }
}

fn warrior_state(e: &Enemy) -> WarriorMotion {
    match e.motion {
        Motion::Warrior(w) => w,
        other => panic!("not a warrior: {:?}", other),
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_band_is_left_quarter_inset() {
    assert_eq!(player_band_x(SCREEN), (50.0, 150.0));
    assert_eq!(player_band_y(SCREEN), (50.0, 550.0));
}

#[test]
fn player_band_collapses_on_tiny_screens() {
    let tiny = ScreenSize::new(100, 80);
    assert_eq!(player_band_x(tiny), (50.0, 50.0));
    assert_eq!(player_band_y(tiny), (50.0, 50.0));
}

#[test]
fn player_moves_and_is_clamped() {
    let mut p = Player::new(Vec2::new(100.0, 300.0));
    p.update(0.1, &held(|i| i.right = true), SCREEN);
    assert!(approx(p.body.position.x, 130.0));

    p.update(1.0, &held(|i| i.right = true), SCREEN);
    assert_eq!(p.body.position.x, 150.0);

    p.update(10.0, &held(|i| i.up = true), SCREEN);
    assert_eq!(p.body.position.y, 50.0);

    p.update(10.0, &held(|i| i.left = true), SCREEN);
    assert_eq!(p.body.position.x, 50.0);
}

#[test]
fn opposite_keys_cancel_out() {
    let mut p = Player::new(Vec2::new(100.0, 300.0));
    p.update(0.5, &held(|i| { i.up = true; i.down = true }), SCREEN);
    assert_eq!(p.body.position.y, 300.0);
}

#[test]
fn fire_respects_cooldown() {
    let mut p = Player::new(Vec2::new(100.0, 300.0));
    let fire = held(|i| i.fire = true);

    p.update(0.5, &fire, SCREEN);
    assert!(!p.take_shot_request());

    p.update(0.3, &fire, SCREEN); // 0.8 s since start
    assert!(p.take_shot_request());
    assert!(!p.take_shot_request());

    p.update(0.5, &fire, SCREEN); // cooldown restarted
    assert!(!p.take_shot_request());
}

#[test]
fn releasing_fire_clears_the_flag() {
    let mut p = Player::new(Vec2::new(100.0, 300.0));
    p.update(1.0, &held(|i| i.fire = true), SCREEN);
    assert!(p.wants_to_shoot);
    p.update(1.0, &InputState::default(), SCREEN);
    assert!(!p.wants_to_shoot);
}

#[test]
fn muzzle_is_right_centre_of_collision_box() {
    let p = Player::new(Vec2::new(200.0, 300.0));
    let m = p.muzzle();
    assert!(approx(m.x, 232.0));
    assert!(approx(m.y, 306.25));
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn player_bullet_leaves_on_the_right() {
    let mut b = Bullet::from_player(Vec2::new(790.0, 300.0));
    assert!(!b.is_out_of_bounds(SCREEN));
    b.update(0.1);
    assert!(approx(b.body.position.x, 870.0));
    assert!(b.is_out_of_bounds(SCREEN));
}

#[test]
fn enemy_bullet_leaves_on_the_left() {
    let mut b = Bullet::from_enemy(Vec2::new(100.0, 300.0));
    assert!(!b.is_out_of_bounds(SCREEN));
    b.update(0.2);
    assert!(b.is_out_of_bounds(SCREEN));
}

// ── Stones ────────────────────────────────────────────────────────────────────

#[test]
fn stones_drift_in_a_straight_line() {
    let mut e = Enemy::new(EnemyKind::SmallStone, Vec2::new(400.0, 0.0));
    e.update(0.5, SCREEN);
    assert!(approx(e.body.position.x, 175.0));
    assert!(approx(e.body.position.y, 100.0));
    assert!(!e.take_shot_request());
}

#[test]
fn enemy_past_left_edge_has_left_the_screen() {
    let e = Enemy::new(EnemyKind::BigStone, Vec2::new(-61.0, 300.0));
    assert!(e.has_left_screen(SCREEN));
    let e = Enemy::new(EnemyKind::BigStone, Vec2::new(-20.0, 300.0));
    assert!(!e.has_left_screen(SCREEN));
}

// ── Scout ─────────────────────────────────────────────────────────────────────

#[test]
fn scout_turns_around_at_the_turn_line() {
    let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(1000.0, 100.0));

    for _ in 0..6 {
        e.update(0.25, SCREEN);
    }
    assert_eq!(e.body.position.x, 400.0);
    assert_eq!(scout_phase(&e), ScoutPhase::Left);

    e.update(0.25, SCREEN);
    assert_eq!(e.body.position.x, 300.0);
    assert_eq!(scout_phase(&e), ScoutPhase::Turning);

    // Halfway through the half circle.
    e.update(0.25, SCREEN);
    e.update(0.25, SCREEN);
    assert!(approx(e.body.position.x, 200.0));
    assert!(approx(e.body.position.y, 200.0));

    e.update(0.25, SCREEN);
    e.update(0.25, SCREEN);
    assert_eq!(scout_phase(&e), ScoutPhase::Right);
    assert_eq!(e.velocity.x, 500.0);
    assert!(approx(e.body.position.x, 300.0));
    assert!(approx(e.body.position.y, 300.0));
    assert!(approx(e.body.sprite.rotation, -180.0));

    e.update(0.25, SCREEN);
    assert!(approx(e.body.position.x, 425.0));
}

#[test]
fn scout_in_lower_half_turns_upward() {
    let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(400.0, 500.0));
    e.update(0.25, SCREEN); // reaches the turn line
    for _ in 0..4 {
        e.update(0.25, SCREEN);
    }
    assert_eq!(scout_phase(&e), ScoutPhase::Right);
    assert!(approx(e.body.position.y, 300.0));
    assert!(approx(e.body.sprite.rotation, 180.0));
}

#[test]
fn scout_only_escapes_right_on_the_way_back() {
    let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(900.0, 300.0));
    assert!(!e.has_left_screen(SCREEN));

    if let Motion::Scout(state) = &mut e.motion {
        state.phase = ScoutPhase::Right;
    }
    assert!(e.has_left_screen(SCREEN));
}

#[test]
fn scouts_never_shoot() {
    let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(900.0, 300.0));
    for _ in 0..20 {
        e.update(0.25, SCREEN);
        assert!(!e.take_shot_request());
    }
}

// ── Warrior ───────────────────────────────────────────────────────────────────

#[test]
fn warrior_approaches_holds_fires_then_retreats() {
    let mut e = Enemy::new(EnemyKind::Warrior, Vec2::new(850.0, 100.0));

    e.update(0.5, SCREEN);
    e.update(0.5, SCREEN);
    assert_eq!(e.body.position.x, 600.0);
    e.update(0.5, SCREEN); // past the hold line: stop
    assert_eq!(e.velocity.x, 0.0);
    assert_eq!(e.body.position.x, 600.0);

    e.update(0.5, SCREEN);
    assert!(!e.take_shot_request());
    e.update(0.5, SCREEN);
    assert!(e.take_shot_request());
    assert!(warrior_state(&e).has_fired);
    assert!(!e.take_shot_request());

    e.update(0.5, SCREEN);
    assert_eq!(e.velocity, Vec2::new(0.0, 0.0));
    e.update(0.5, SCREEN);
    assert_eq!(e.velocity, Vec2::new(-250.0, -150.0)); // upper half flees upward

    e.update(0.5, SCREEN);
    assert!(approx(e.body.position.x, 475.0));
    assert!(approx(e.body.position.y, 25.0));
    assert!(!e.take_shot_request());
}

#[test]
fn warrior_in_lower_half_retreats_downward() {
    let mut e = Enemy::new(EnemyKind::Warrior, Vec2::new(600.0, 450.0));
    e.velocity.x = 0.0;
    e.update(1.0, SCREEN);
    assert!(e.take_shot_request());
    e.update(1.0, SCREEN);
    assert_eq!(e.velocity, Vec2::new(-250.0, 150.0));
}

#[test]
fn retreating_warrior_escapes_over_the_top() {
    let mut e = Enemy::new(EnemyKind::Warrior, Vec2::new(500.0, -100.0));
    assert!(!e.has_left_screen(SCREEN)); // not retreating yet

    if let Motion::Warrior(state) = &mut e.motion {
        state.has_fired = true;
    }
    e.velocity = Vec2::new(-250.0, -150.0);
    assert!(e.has_left_screen(SCREEN));
}

#[test]
fn mismatched_motion_leaves_enemy_in_place() {
    let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(500.0, 300.0));
    e.motion = Motion::Drift;
    e.update(1.0, SCREEN);
    e.update(1.0, SCREEN);
    assert_eq!(e.body.position, Vec2::new(500.0, 300.0));
    assert!(e.motion_fault_logged);
}
