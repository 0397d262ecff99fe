/// Immutable description of one rendered frame of the game scene.
///
/// The host draws the live scene from a fresh snapshot every frame, and the
/// scene hands over the last one when the player dies so the game-over
/// screen can show the moment of death.

use crate::entities::{Bullet, BulletOwner, Enemy, EnemyKind};
use crate::geometry::{Rect, ScreenSize};
use crate::level::WinProgress;
use crate::scene::GameScene;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    Player,
    Enemy(EnemyKind),
    PlayerBullet,
    EnemyBullet,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub kind: DrawKind,
    /// Visual box, not the collision box.
    pub bounds: Rect,
    pub rotation: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub screen: ScreenSize,
    pub level_id: i32,
    pub level_name: &'static str,
    /// Horizontal offset of the scrolling backdrop, 0 for static ones.
    pub backdrop_offset: f32,
    pub progress: WinProgress,
    pub score: i32,
    pub hp: u32,
    pub max_hp: u32,
    /// Back to front.
    pub items: Vec<DrawItem>,
}

/// Back-to-front order enemies are drawn in.
const ENEMY_DRAW_ORDER: [EnemyKind; 4] = [
    EnemyKind::BigStone,
    EnemyKind::SmallStone,
    EnemyKind::Warrior,
    EnemyKind::Scout,
];

impl FrameSnapshot {
    pub fn capture(scene: &GameScene) -> Self {
        let mut items = Vec::with_capacity(
            1 + scene.player_bullets.len() + scene.roster.len() + scene.enemy_bullets.len(),
        );

        let player = &scene.player.body;
        items.push(DrawItem {
            kind: DrawKind::Player,
            bounds: player.visual_bounds(),
            rotation: player.sprite.rotation,
        });
        items.extend(scene.player_bullets.iter().map(bullet_item));
        for kind in ENEMY_DRAW_ORDER {
            items.extend(scene.roster.of_kind(kind).iter().map(enemy_item));
        }
        items.extend(scene.enemy_bullets.iter().map(bullet_item));

        Self {
            screen: scene.screen,
            level_id: scene.policy.id,
            level_name: scene.policy.name,
            backdrop_offset: scene.backdrop.offset(),
            progress: scene.win_progress(),
            score: scene.score,
            hp: scene.player.health.current(),
            max_hp: scene.player.health.max(),
            items,
        }
    }

    pub fn count(&self, kind: DrawKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }
}

fn enemy_item(enemy: &Enemy) -> DrawItem {
    DrawItem {
        kind: DrawKind::Enemy(enemy.kind),
        bounds: enemy.body.visual_bounds(),
        rotation: enemy.body.sprite.rotation,
    }
}

fn bullet_item(bullet: &Bullet) -> DrawItem {
    let kind = match bullet.owner {
        BulletOwner::Player => DrawKind::PlayerBullet,
        BulletOwner::Enemy => DrawKind::EnemyBullet,
    };
    DrawItem { kind, bounds: bullet.bounds(), rotation: 0.0 }
}
