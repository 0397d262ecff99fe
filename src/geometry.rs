/// Plane geometry shared by the simulation: points, screen sizes and
/// axis-aligned rectangles in world pixels (y grows downward).

use std::ops::{Add, AddAssign, Mul, Sub};

// ── Vectors ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

// ── Screen size ───────────────────────────────────────────────────────────────

/// Size of the visible play area, as reported by the host every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn w(&self) -> f32 {
        self.width as f32
    }

    pub fn h(&self) -> f32 {
        self.height as f32
    }
}

// ── Rectangles ────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle stored as top-left corner plus size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Rectangle of `size` whose centre sits on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when the two rectangles share an area of non-zero size.
    /// Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        left < right && top < bottom
    }

    /// Shrink by a margin on each side expressed as fractions of the size.
    pub fn shrink(&self, frac_x: f32, frac_y: f32) -> Rect {
        let mx = self.width * frac_x;
        let my = self.height * frac_y;
        Rect::new(
            self.left + mx,
            self.top + my,
            self.width - mx * 2.0,
            self.height - my * 2.0,
        )
    }

    /// Bounding box of a `size` extent centred on `center` after rotating it
    /// by `degrees`.
    pub fn rotated(center: Vec2, size: Vec2, degrees: f32) -> Self {
        if degrees == 0.0 {
            return Rect::centered(center, size);
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = (size.x * cos).abs() + (size.y * sin).abs();
        let h = (size.x * sin).abs() + (size.y * cos).abs();
        Rect::centered(center, Vec2::new(w, h))
    }
}
