/// Per-frame behaviour of the entities: player control and shoot gating,
/// bullet flight, and the enemy movement state machines.
///
/// Every update takes the elapsed simulation time `dt` (seconds) and, where
/// the rule depends on it, the current screen size.

use std::f32::consts::PI;

use crate::entities::{
    Body, Bullet, Enemy, EnemyKind, Motion, Player, ScoutMotion, ScoutPhase, WarriorMotion,
    WARRIOR_VELOCITY,
};
use crate::geometry::{ScreenSize, Vec2};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Distance the player keeps from the edges of its band.
pub const PLAYER_EDGE_MARGIN: f32 = 50.0;

/// Scouts start their U-turn once they reach this x.
pub const SCOUT_TURN_X: f32 = 300.0;
pub const SCOUT_TURN_DURATION: f32 = 1.0;
pub const SCOUT_TURN_RADIUS: f32 = 100.0;
/// Extra speed a scout gains coming out of the turn.
pub const SCOUT_SPEED_BOOST: f32 = 100.0;

/// Warriors stop once they are left of this fraction of the screen width.
pub const WARRIOR_HOLD_FRACTION: f32 = 0.8;
/// Pause before firing, and again before retreating.
pub const WARRIOR_SLEEP_TIME: f32 = 1.0;
pub const WARRIOR_RETREAT_SPEED: f32 = 150.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Key state the host samples once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Player {
    /// Move according to the held keys, clamp into the player's band, and
    /// raise the shot flag if fire is held and the cooldown has elapsed.
    pub fn update(&mut self, dt: f32, input: &InputState, screen: ScreenSize) {
        let step = self.speed * dt;
        let mut pos = self.body.position;
        if input.up {
            pos.y -= step;
        }
        if input.down {
            pos.y += step;
        }
        if input.left {
            pos.x -= step;
        }
        if input.right {
            pos.x += step;
        }

        let (min_x, max_x) = player_band_x(screen);
        let (min_y, max_y) = player_band_y(screen);
        pos.x = pos.x.clamp(min_x, max_x);
        pos.y = pos.y.clamp(min_y, max_y);
        self.body.position = pos;

        self.since_last_shot += dt;
        if input.fire && self.since_last_shot > self.shoot_cooldown {
            self.wants_to_shoot = true;
            self.since_last_shot = 0.0;
        } else {
            self.wants_to_shoot = false;
        }
    }

    /// Where a new player bullet appears: right-centre of the collision box.
    pub fn muzzle(&self) -> Vec2 {
        let b = self.bounds();
        Vec2::new(b.right(), b.center_y())
    }
}

/// Horizontal range of the player: the left quarter of the screen, inset.
/// Screens too small for the inset collapse the range to the margin.
pub fn player_band_x(screen: ScreenSize) -> (f32, f32) {
    let max = (screen.w() / 4.0 - PLAYER_EDGE_MARGIN).max(PLAYER_EDGE_MARGIN);
    (PLAYER_EDGE_MARGIN, max)
}

pub fn player_band_y(screen: ScreenSize) -> (f32, f32) {
    let max = (screen.h() - PLAYER_EDGE_MARGIN).max(PLAYER_EDGE_MARGIN);
    (PLAYER_EDGE_MARGIN, max)
}

// ── Bullets ───────────────────────────────────────────────────────────────────

impl Bullet {
    pub fn update(&mut self, dt: f32) {
        self.body.position += self.velocity * dt;
    }

    /// A bullet is gone once its top-left corner leaves the screen.
    pub fn is_out_of_bounds(&self, screen: ScreenSize) -> bool {
        let b = self.bounds();
        b.left < 0.0 || b.left > screen.w() || b.top < 0.0 || b.top > screen.h()
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

impl Enemy {
    /// Advance this enemy's movement state machine by `dt`.
    ///
    /// A motion state that does not belong to the enemy's kind is a logic
    /// error; it is reported once per enemy and the enemy stays put.
    pub fn update(&mut self, dt: f32, screen: ScreenSize) {
        let Enemy { kind, body, velocity, motion, motion_fault_logged, .. } = self;
        match (*kind, motion) {
            (EnemyKind::SmallStone | EnemyKind::BigStone, Motion::Drift) => {
                body.position += *velocity * dt;
            }
            (EnemyKind::Scout, Motion::Scout(state)) => {
                update_scout(state, body, velocity, dt, screen);
            }
            (EnemyKind::Warrior, Motion::Warrior(state)) => {
                update_warrior(state, body, velocity, dt, screen);
            }
            (kind, motion) => {
                if !*motion_fault_logged {
                    tracing::error!(
                        enemy = kind.name(),
                        ?motion,
                        "enemy has an invalid movement state"
                    );
                    *motion_fault_logged = true;
                }
            }
        }
    }

    /// Read-and-clear a pending shot. The first consumed shot switches a
    /// warrior into its retreat phase. Other kinds never shoot.
    pub fn take_shot_request(&mut self) -> bool {
        match &mut self.motion {
            Motion::Warrior(state) => {
                if state.shot_pending {
                    state.has_fired = true;
                }
                std::mem::take(&mut state.shot_pending)
            }
            Motion::Drift | Motion::Scout(_) => false,
        }
    }

    /// Where an enemy bullet appears: left-centre of the collision box.
    pub fn muzzle(&self) -> Vec2 {
        let b = self.bounds();
        Vec2::new(b.left, b.center_y())
    }

    /// True once the enemy has left the play area for good: past the left
    /// edge for everyone, past the right edge for a scout on its way back,
    /// past the top or bottom for a retreating warrior.
    pub fn has_left_screen(&self, screen: ScreenSize) -> bool {
        let b = self.bounds();
        if b.right() < 0.0 {
            return true;
        }
        match self.motion {
            Motion::Scout(state) if state.phase == ScoutPhase::Right => b.left > screen.w(),
            Motion::Warrior(state) if state.has_fired && self.velocity.y != 0.0 => {
                b.bottom() < 0.0 || b.top > screen.h()
            }
            _ => false,
        }
    }
}

/// Left → Turning (half circle over `SCOUT_TURN_DURATION`) → Right.
fn update_scout(
    state: &mut ScoutMotion,
    body: &mut Body,
    velocity: &mut Vec2,
    dt: f32,
    screen: ScreenSize,
) {
    let mut pos = body.position;
    match state.phase {
        ScoutPhase::Right => {
            pos.x += velocity.x * dt;
        }
        ScoutPhase::Left => {
            pos.x += velocity.x * dt;
            if pos.x <= SCOUT_TURN_X {
                state.phase = ScoutPhase::Turning;
                state.turn_timer = 0.0;
                state.turn_start = pos;
            }
        }
        ScoutPhase::Turning => {
            // Turn toward the roomier half of the screen.
            let downward = state.turn_start.y < screen.h() / 2.0;
            state.turn_timer += dt;
            let t = (state.turn_timer / SCOUT_TURN_DURATION).min(1.0);

            let angle = 180.0 * t;
            body.sprite.rotation = if downward { -angle } else { angle };

            let start = state.turn_start;
            let end_y = if downward {
                start.y + SCOUT_TURN_RADIUS * 2.0
            } else {
                start.y - SCOUT_TURN_RADIUS * 2.0
            };
            pos.y = start.y + (end_y - start.y) * t;
            pos.x = start.x - SCOUT_TURN_RADIUS * (t * PI).sin();

            if t >= 1.0 {
                velocity.x = velocity.x.abs() + SCOUT_SPEED_BOOST;
                state.phase = ScoutPhase::Right;
            }
        }
    }
    body.position = pos;
}

/// Approach, hold, fire once, hold again, then retreat diagonally away from
/// the screen's horizontal centre line.
fn update_warrior(
    state: &mut WarriorMotion,
    body: &mut Body,
    velocity: &mut Vec2,
    dt: f32,
    screen: ScreenSize,
) {
    let moving = velocity.x.abs() > f32::EPSILON;

    if state.has_fired {
        if moving {
            body.position += *velocity * dt;
        } else {
            state.sleep_timer += dt;
            if state.sleep_timer >= WARRIOR_SLEEP_TIME {
                *velocity = WARRIOR_VELOCITY;
                velocity.y = if body.position.y < screen.h() / 2.0 {
                    -WARRIOR_RETREAT_SPEED
                } else {
                    WARRIOR_RETREAT_SPEED
                };
                state.sleep_timer = 0.0;
            }
        }
    } else if moving {
        if body.position.x < screen.w() * WARRIOR_HOLD_FRACTION {
            velocity.x = 0.0;
        } else {
            body.position += *velocity * dt;
        }
    } else {
        state.sleep_timer += dt;
        if state.sleep_timer >= WARRIOR_SLEEP_TIME {
            state.shot_pending = true;
            state.sleep_timer = 0.0;
        }
    }
}
