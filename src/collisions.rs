/// Pairwise collision passes of the game scene, run in this order each frame:
/// enemy ↔ player, player bullet ↔ enemy bullet, player bullet ↔ enemy,
/// enemy bullet ↔ player.
///
/// Every pass walks its vectors by index and removes in place, advancing the
/// index only when nothing was removed at it.

use crate::entities::{Bullet, EnemyKind, EnemyRoster, Player, RemainingEnemies};

/// Damage dealt by any single contact or bullet.
pub const HIT_DAMAGE: u32 = 1;

/// Enemies touching the player deal one damage and are removed.
/// Returns true when a contact killed the player; that enemy is left in
/// place for the game-over snapshot and no further contacts are resolved.
pub fn resolve_enemy_contacts(
    player: &mut Player,
    roster: &mut EnemyRoster,
    remaining: &mut RemainingEnemies,
) -> bool {
    let player_box = player.bounds();
    for kind in EnemyKind::RESOLUTION_ORDER {
        let enemies = roster.of_kind_mut(kind);
        let mut i = 0;
        while i < enemies.len() {
            if !enemies[i].bounds().intersects(&player_box) {
                i += 1;
                continue;
            }
            let killed = player.health.take_damage(HIT_DAMAGE);
            remaining.record_down(kind);
            tracing::debug!(enemy = kind.name(), hp = player.health.current(), "player rammed");
            if killed {
                return true;
            }
            enemies.remove(i);
        }
    }
    false
}

/// A player bullet meeting an enemy bullet destroys both. Each player bullet
/// cancels at most one enemy bullet.
pub fn resolve_bullet_clashes(player_bullets: &mut Vec<Bullet>, enemy_bullets: &mut Vec<Bullet>) {
    let mut i = 0;
    while i < player_bullets.len() {
        let bullet_box = player_bullets[i].bounds();
        match enemy_bullets.iter().position(|e| e.bounds().intersects(&bullet_box)) {
            Some(j) => {
                enemy_bullets.remove(j);
                player_bullets.remove(i);
            }
            None => i += 1,
        }
    }
}

/// Player bullets damage the first enemy they overlap and are spent on that
/// hit. Destroyed enemies are removed and their score returned.
pub fn resolve_player_hits(
    player_bullets: &mut Vec<Bullet>,
    roster: &mut EnemyRoster,
    remaining: &mut RemainingEnemies,
) -> i32 {
    let mut gained = 0;
    let mut i = 0;
    'bullets: while i < player_bullets.len() {
        let bullet_box = player_bullets[i].bounds();
        for kind in EnemyKind::RESOLUTION_ORDER {
            let enemies = roster.of_kind_mut(kind);
            let Some(j) = enemies.iter().position(|e| e.bounds().intersects(&bullet_box)) else {
                continue;
            };
            if enemies[j].health.take_damage(HIT_DAMAGE) {
                let destroyed = enemies.remove(j);
                gained += destroyed.score_value();
                remaining.record_down(kind);
                tracing::debug!(enemy = kind.name(), "enemy destroyed");
            }
            player_bullets.remove(i);
            continue 'bullets;
        }
        i += 1;
    }
    gained
}

/// Enemy bullets hitting the player deal one damage and are removed.
/// Returns true when one killed the player; that bullet stays and the
/// remaining bullets are not checked.
pub fn resolve_enemy_fire(enemy_bullets: &mut Vec<Bullet>, player: &mut Player) -> bool {
    let player_box = player.bounds();
    let mut i = 0;
    while i < enemy_bullets.len() {
        if !enemy_bullets[i].bounds().intersects(&player_box) {
            i += 1;
            continue;
        }
        if player.health.take_damage(HIT_DAMAGE) {
            return true;
        }
        tracing::debug!(hp = player.health.current(), "player shot");
        enemy_bullets.remove(i);
    }
    false
}
