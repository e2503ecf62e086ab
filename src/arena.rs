use rand::Rng;
use std::time::SystemTime;

/// Playing field dimensions in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arena {
    pub width: u16,
    pub height: u16,
}

/// Size of the tappable target in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u16,
    pub height: u16,
}

impl Default for TargetSize {
    fn default() -> Self {
        // terminal cells are roughly twice as tall as wide
        Self {
            width: 8,
            height: 3,
        }
    }
}

/// A placed target; `x`/`y` is the top-left cell relative to the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub x: u16,
    pub y: u16,
    pub spawned_at: SystemTime,
}

impl Arena {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Largest top-left coordinate that keeps a target of `size` inside the arena.
    /// Collapses to 0 on an axis where the arena is smaller than the target.
    pub fn max_origin(&self, size: TargetSize) -> (u16, u16) {
        (
            self.width.saturating_sub(size.width),
            self.height.saturating_sub(size.height),
        )
    }

    pub fn place<R: Rng + ?Sized>(&self, size: TargetSize, rng: &mut R) -> (u16, u16) {
        let (max_x, max_y) = self.max_origin(size);
        (rng.gen_range(0..=max_x), rng.gen_range(0..=max_y))
    }

    pub fn fits(&self, x: u16, y: u16, size: TargetSize) -> bool {
        let (max_x, max_y) = self.max_origin(size);
        x <= max_x && y <= max_y
    }
}

impl Target {
    pub fn contains(&self, x: u16, y: u16, size: TargetSize) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + size.width as u32
            && (y as u32) < self.y as u32 + size.height as u32
    }
}
