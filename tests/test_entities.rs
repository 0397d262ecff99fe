use sky_patrol::entities::*;
use sky_patrol::geometry::{Rect, Vec2};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Health ────────────────────────────────────────────────────────────────────

#[test]
fn health_starts_full() {
    let h = Health::new(3);
    assert_eq!(h.current(), 3);
    assert_eq!(h.max(), 3);
    assert!(h.is_alive());
}

#[test]
fn take_damage_reports_only_the_killing_hit() {
    let mut h = Health::new(3);
    assert!(!h.take_damage(1));
    assert_eq!(h.current(), 2);
    assert!(h.take_damage(5)); // overkill saturates at 0
    assert_eq!(h.current(), 0);
    assert!(!h.is_alive());
}

#[test]
fn damaging_a_dead_unit_changes_nothing() {
    let mut h = Health::new(1);
    assert!(h.take_damage(1));
    assert!(!h.take_damage(1));
    assert_eq!(h.current(), 0);
}

#[test]
fn zero_damage_is_a_no_op() {
    let mut h = Health::new(2);
    assert!(!h.take_damage(0));
    assert_eq!(h.current(), 2);
}

#[test]
fn heal_is_capped_at_max() {
    let mut h = Health::new(3);
    h.take_damage(2);
    h.heal(10);
    assert_eq!(h.current(), 3);
}

#[test]
fn heal_zero_is_a_no_op() {
    let mut h = Health::new(3);
    h.take_damage(1);
    h.heal(0);
    assert_eq!(h.current(), 2);
}

#[test]
fn dead_unit_can_be_healed() {
    let mut h = Health::new(2);
    assert!(h.take_damage(2));
    assert!(!h.is_alive());
    h.heal(1);
    assert_eq!(h.current(), 1);
    assert!(h.is_alive());
}

// ── Enemy stats ───────────────────────────────────────────────────────────────

#[test]
fn enemy_kinds_have_expected_hp_and_score() {
    let cases = [
        (EnemyKind::SmallStone, 1, 1),
        (EnemyKind::BigStone, 2, 2),
        (EnemyKind::Scout, 2, 1),
        (EnemyKind::Warrior, 2, 2),
    ];
    for (kind, hp, score) in cases {
        let e = Enemy::new(kind, Vec2::new(0.0, 0.0));
        assert_eq!(e.health.current(), hp, "{}", kind.name());
        assert_eq!(e.score_value(), score, "{}", kind.name());
    }
}

#[test]
fn only_ships_are_ships() {
    assert!(EnemyKind::Scout.is_ship());
    assert!(EnemyKind::Warrior.is_ship());
    assert!(!EnemyKind::SmallStone.is_ship());
    assert!(!EnemyKind::BigStone.is_ship());
}

#[test]
fn small_stone_hitbox_is_trimmed() {
    let e = Enemy::new(EnemyKind::SmallStone, Vec2::new(0.0, 0.0));
    let b = e.bounds();
    assert!(approx(b.left, -9.0));
    assert!(approx(b.top, -6.0));
    assert!(approx(b.width, 18.0));
    assert!(approx(b.height, 12.0));
}

#[test]
fn big_stone_hitbox_keeps_positive_size() {
    let e = Enemy::new(EnemyKind::BigStone, Vec2::new(0.0, 0.0));
    let b = e.bounds();
    assert!(approx(b.width, 60.0));
    assert!(approx(b.height, 60.0));
    assert!(!b.is_empty());
}

#[test]
fn ship_hitbox_is_the_visual_box() {
    let e = Enemy::new(EnemyKind::Warrior, Vec2::new(100.0, 100.0));
    assert_eq!(e.bounds(), e.body.visual_bounds());
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_collision_box_hugs_the_hull() {
    let p = Player::new(Vec2::new(100.0, 100.0));
    let b = p.bounds();
    assert!(approx(b.left, 68.0));
    assert!(approx(b.top, 93.75));
    assert!(approx(b.width, 64.0));
    assert!(approx(b.height, 25.0));
}

#[test]
fn shot_request_is_read_and_clear() {
    let mut p = Player::new(Vec2::new(100.0, 100.0));
    p.wants_to_shoot = true;
    assert!(p.take_shot_request());
    assert!(!p.take_shot_request());
}

#[test]
fn empty_sprite_gives_empty_box() {
    let body = Body::new(Vec2::new(10.0, 10.0), Sprite::EMPTY);
    assert!(body.visual_bounds().is_empty());
}

// ── Collections ───────────────────────────────────────────────────────────────

#[test]
fn roster_groups_enemies_by_kind() {
    let mut roster = EnemyRoster::new();
    roster.push(Enemy::new(EnemyKind::Warrior, Vec2::new(0.0, 0.0)));
    roster.push(Enemy::new(EnemyKind::SmallStone, Vec2::new(0.0, 0.0)));
    roster.push(Enemy::new(EnemyKind::Warrior, Vec2::new(1.0, 0.0)));

    assert_eq!(roster.len(), 3);
    assert_eq!(roster.count(EnemyKind::Warrior), 2);
    assert_eq!(roster.count(EnemyKind::Scout), 0);
    let kinds: Vec<EnemyKind> = roster.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EnemyKind::SmallStone, EnemyKind::Warrior, EnemyKind::Warrior]);
}

#[test]
fn remaining_enemies_count_down_ships_only() {
    let mut r = RemainingEnemies::default();
    assert_eq!((r.scouts, r.warriors), (16, 8));
    r.record_down(EnemyKind::Scout);
    r.record_down(EnemyKind::BigStone);
    r.record_down(EnemyKind::Warrior);
    assert_eq!((r.scouts, r.warriors), (15, 7));
    assert_eq!(r.total(), 22);
}

#[test]
fn remaining_enemies_never_underflow() {
    let mut r = RemainingEnemies { scouts: 0, warriors: 0 };
    r.record_down(EnemyKind::Scout);
    r.record_down(EnemyKind::Warrior);
    assert_eq!(r.total(), 0);
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn touching_rects_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    let c = Rect::new(9.0, 9.0, 10.0, 10.0);
    assert!(!a.intersects(&b));
    assert!(a.intersects(&c));
}

#[test]
fn quarter_turn_swaps_box_dimensions() {
    let r = Rect::rotated(Vec2::new(0.0, 0.0), Vec2::new(80.0, 48.0), 90.0);
    assert!(approx(r.width, 48.0));
    assert!(approx(r.height, 80.0));
}
