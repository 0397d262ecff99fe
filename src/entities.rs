/// All game entity types: plain data plus the hit-point contract.
/// Movement and shooting behaviour lives in `movement`.

use crate::geometry::{Rect, Vec2};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const PLAYER_MAX_HP: u32 = 3;
/// Pixels per second.
pub const PLAYER_SPEED: f32 = 300.0;
/// Seconds between two player shots.
pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.7;

pub const PLAYER_BULLET_VELOCITY: Vec2 = Vec2::new(800.0, 0.0);
pub const ENEMY_BULLET_VELOCITY: Vec2 = Vec2::new(-600.0, 0.0);

// ── Visuals ───────────────────────────────────────────────────────────────────

/// Opaque visual handle: the extent the renderer draws around the entity's
/// position (origin centred) and its rotation. An entity without a usable
/// visual carries `Sprite::EMPTY` and still has a well-defined, empty box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub size: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
}

impl Sprite {
    pub const EMPTY: Sprite = Sprite { size: Vec2::ZERO, rotation: 0.0 };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { size: Vec2::new(width, height), rotation: 0.0 }
    }
}

/// Position plus visual: the common part of every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub sprite: Sprite,
}

impl Body {
    pub fn new(position: Vec2, sprite: Sprite) -> Self {
        Self { position, sprite }
    }

    /// Box the sprite covers on screen at the current position.
    pub fn visual_bounds(&self) -> Rect {
        Rect::rotated(self.position, self.sprite.size, self.sprite.rotation)
    }
}

// ── Hit points ────────────────────────────────────────────────────────────────

/// Current / maximum hit points of a unit. `current` never exceeds `max`
/// and reaches 0 at most once unless healed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// A zero maximum is promoted to 1 so every unit starts alive.
    pub fn new(max: u32) -> Self {
        debug_assert!(max > 0, "max HP must be positive");
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Apply `amount` damage. Returns true only on the hit that takes the
    /// unit from alive to 0 HP; damaging a dead unit changes nothing.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if amount == 0 || self.current == 0 {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.current == 0
    }

    /// Restore `amount` HP, capped at the maximum.
    pub fn heal(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
    pub velocity: Vec2,
    pub owner: BulletOwner,
}

impl Bullet {
    /// Player bullet centred on `origin`, flying right.
    pub fn from_player(origin: Vec2) -> Self {
        Self {
            body: Body::new(origin, Sprite::new(24.0, 8.0)),
            velocity: PLAYER_BULLET_VELOCITY,
            owner: BulletOwner::Player,
        }
    }

    /// Enemy bullet centred on `origin`, flying left.
    pub fn from_enemy(origin: Vec2) -> Self {
        Self {
            body: Body::new(origin, Sprite::new(24.0, 10.0)),
            velocity: ENEMY_BULLET_VELOCITY,
            owner: BulletOwner::Enemy,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.body.visual_bounds()
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    pub speed: f32,
    pub shoot_cooldown: f32,
    /// Simulation seconds since the last requested shot.
    pub since_last_shot: f32,
    /// Set by `update`, consumed by `take_shot_request`. The simulation is
    /// single-threaded, so a plain flag with read-and-clear is enough.
    pub wants_to_shoot: bool,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            body: Body::new(position, Sprite::new(80.0, 50.0)),
            health: Health::new(PLAYER_MAX_HP),
            speed: PLAYER_SPEED,
            shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            since_last_shot: 0.0,
            wants_to_shoot: false,
        }
    }

    /// Collision box: trimmed 10% horizontally and 25% vertically, and moved
    /// down by half the vertical margin so it hugs the hull.
    pub fn bounds(&self) -> Rect {
        let visual = self.body.visual_bounds();
        let mx = visual.width * 0.1;
        let my = visual.height * 0.25;
        Rect::new(
            visual.left + mx,
            visual.top + my * 1.5,
            visual.width - mx * 2.0,
            visual.height - my * 2.0,
        )
    }

    /// Read-and-clear the pending shot flag.
    pub fn take_shot_request(&mut self) -> bool {
        std::mem::take(&mut self.wants_to_shoot)
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    SmallStone,
    BigStone,
    Scout,
    Warrior,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::SmallStone,
        EnemyKind::BigStone,
        EnemyKind::Scout,
        EnemyKind::Warrior,
    ];

    /// Order in which collision and movement passes visit the kinds.
    pub const RESOLUTION_ORDER: [EnemyKind; 4] = [
        EnemyKind::BigStone,
        EnemyKind::Scout,
        EnemyKind::SmallStone,
        EnemyKind::Warrior,
    ];

    pub fn index(self) -> usize {
        match self {
            EnemyKind::SmallStone => 0,
            EnemyKind::BigStone => 1,
            EnemyKind::Scout => 2,
            EnemyKind::Warrior => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::SmallStone => "small_stone",
            EnemyKind::BigStone => "big_stone",
            EnemyKind::Scout => "scout",
            EnemyKind::Warrior => "warrior",
        }
    }

    pub fn max_hp(self) -> u32 {
        match self {
            EnemyKind::SmallStone => 1,
            EnemyKind::BigStone | EnemyKind::Scout | EnemyKind::Warrior => 2,
        }
    }

    /// Score awarded when destroyed by the player.
    pub fn score_value(self) -> i32 {
        match self {
            EnemyKind::SmallStone | EnemyKind::Scout => 1,
            EnemyKind::BigStone | EnemyKind::Warrior => 2,
        }
    }

    pub fn initial_velocity(self) -> Vec2 {
        match self {
            EnemyKind::SmallStone => Vec2::new(-450.0, 200.0),
            EnemyKind::BigStone => Vec2::new(-250.0, 400.0),
            EnemyKind::Scout => Vec2::new(-400.0, 0.0),
            EnemyKind::Warrior => WARRIOR_VELOCITY,
        }
    }

    pub fn sprite(self) -> Sprite {
        match self {
            EnemyKind::SmallStone => Sprite::new(60.0, 60.0),
            EnemyKind::BigStone => Sprite::new(120.0, 120.0),
            EnemyKind::Scout => Sprite::new(80.0, 48.0),
            EnemyKind::Warrior => Sprite::new(90.0, 60.0),
        }
    }

    /// Collision box derived from the visual box. Stones are drawn with a
    /// lot of empty space around the rock, so their boxes are trimmed.
    pub fn hitbox(self, visual: Rect) -> Rect {
        match self {
            EnemyKind::SmallStone => visual.shrink(0.35, 0.4),
            EnemyKind::BigStone => visual.shrink(0.25, 0.25),
            EnemyKind::Scout | EnemyKind::Warrior => visual,
        }
    }

    /// Ships count toward the "clear all enemies" win condition.
    pub fn is_ship(self) -> bool {
        matches!(self, EnemyKind::Scout | EnemyKind::Warrior)
    }
}

pub const WARRIOR_VELOCITY: Vec2 = Vec2::new(-250.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoutPhase {
    Left,
    Turning,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoutMotion {
    pub phase: ScoutPhase,
    pub turn_start: Vec2,
    pub turn_timer: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WarriorMotion {
    pub sleep_timer: f32,
    /// The warrior has fired its shot and is now retreating.
    pub has_fired: bool,
    /// Shot requested by `update`, consumed by `take_shot_request`.
    pub shot_pending: bool,
}

/// Variant-specific movement state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Straight line at constant velocity.
    Drift,
    Scout(ScoutMotion),
    Warrior(WarriorMotion),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Body,
    pub health: Health,
    pub velocity: Vec2,
    pub motion: Motion,
    /// Whether a motion/kind mismatch has already been reported.
    pub motion_fault_logged: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, position: Vec2) -> Self {
        let motion = match kind {
            EnemyKind::SmallStone | EnemyKind::BigStone => Motion::Drift,
            EnemyKind::Scout => Motion::Scout(ScoutMotion {
                phase: ScoutPhase::Left,
                turn_start: Vec2::ZERO,
                turn_timer: 0.0,
            }),
            EnemyKind::Warrior => Motion::Warrior(WarriorMotion::default()),
        };
        Self {
            kind,
            body: Body::new(position, kind.sprite()),
            health: Health::new(kind.max_hp()),
            velocity: kind.initial_velocity(),
            motion,
            motion_fault_logged: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.kind.hitbox(self.body.visual_bounds())
    }

    pub fn score_value(&self) -> i32 {
        self.kind.score_value()
    }
}

// ── Collections ───────────────────────────────────────────────────────────────

/// Live enemies grouped by kind, one vector per `EnemyKind`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyRoster {
    groups: [Vec<Enemy>; 4],
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, enemy: Enemy) {
        self.groups[enemy.kind.index()].push(enemy);
    }

    pub fn of_kind(&self, kind: EnemyKind) -> &[Enemy] {
        &self.groups[kind.index()]
    }

    pub fn of_kind_mut(&mut self, kind: EnemyKind) -> &mut Vec<Enemy> {
        &mut self.groups[kind.index()]
    }

    pub fn count(&self, kind: EnemyKind) -> usize {
        self.groups[kind.index()].len()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    /// Every live enemy, grouped in `EnemyKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.groups.iter().flatten()
    }
}

pub const SCOUT_BUDGET: u32 = 16;
pub const WARRIOR_BUDGET: u32 = 8;

/// Ships still to be dealt with before the "clear all enemies" level is won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemainingEnemies {
    pub scouts: u32,
    pub warriors: u32,
}

impl Default for RemainingEnemies {
    fn default() -> Self {
        Self { scouts: SCOUT_BUDGET, warriors: WARRIOR_BUDGET }
    }
}

impl RemainingEnemies {
    /// Count one enemy of `kind` as dealt with. Stones are not tracked.
    pub fn record_down(&mut self, kind: EnemyKind) {
        match kind {
            EnemyKind::Scout => self.scouts = self.scouts.saturating_sub(1),
            EnemyKind::Warrior => self.warriors = self.warriors.saturating_sub(1),
            EnemyKind::SmallStone | EnemyKind::BigStone => {}
        }
    }

    pub fn budget(&self, kind: EnemyKind) -> Option<u32> {
        match kind {
            EnemyKind::Scout => Some(self.scouts),
            EnemyKind::Warrior => Some(self.warriors),
            EnemyKind::SmallStone | EnemyKind::BigStone => None,
        }
    }

    pub fn total(&self) -> u32 {
        self.scouts + self.warriors
    }
}
