//! Torch-driven sight radius and the persistent explored mask.
//! Sight is a flat-radius heuristic: no occlusion, no light transport.
//! Enemy awareness reuses the same radius so a dim torch also hides the player.

use crate::dungeon::Grid;
use crate::types::Pos;

pub const TORCH_MAX: f32 = 100.0;
/// Sight radius in cells at full fuel.
pub const BASE_SIGHT_RADIUS: f32 = 3.5;
pub const MIN_SIGHT_RADIUS: f32 = 0.5;
/// Half-width of the square neighbourhood marked explored around the player.
pub const EXPLORE_RADIUS: i32 = 3;

/// Two-sine shimmer, at most an eighth of a cell either way.
pub fn flicker(elapsed: f32) -> f32 {
    0.075 * (elapsed * 15.0).sin() + 0.05 * (elapsed * 23.0).sin()
}

pub fn sight_radius(torch_fuel: f32, elapsed: f32) -> f32 {
    let fuel = if torch_fuel.is_nan() { 0.0 } else { torch_fuel.clamp(0.0, TORCH_MAX) };
    let shimmer = if elapsed.is_finite() { flicker(elapsed) } else { 0.0 };
    (BASE_SIGHT_RADIUS * (fuel / TORCH_MAX) + shimmer).max(MIN_SIGHT_RADIUS)
}

pub fn detection_range(sight: f32, multiplier: f32) -> f32 {
    sight * multiplier
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExploredMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ExploredMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![false; width * height] }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx])
    }

    pub fn explored_count(&self) -> usize {
        self.cells.iter().filter(|&&explored| explored).count()
    }

    /// Sets the square around `center` to explored and returns how many cells flipped.
    /// Never clears a cell.
    pub fn mark_explored(&mut self, center: Pos, radius: i32) -> usize {
        let radius = radius.max(0);
        let mut newly = 0;
        for y in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                let Some(idx) = self.index(Pos { y, x }) else {
                    continue;
                };
                if !self.cells[idx] {
                    self.cells[idx] = true;
                    newly += 1;
                }
            }
        }
        newly
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

pub fn mark_explored(mask: &mut ExploredMask, player_cell: Pos) -> usize {
    mask.mark_explored(player_cell, EXPLORE_RADIUS)
}
