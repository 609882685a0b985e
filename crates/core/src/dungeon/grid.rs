//! Cell grid storage, bounds handling, and axis-separated collision.

use crate::types::{CellKind, Pos, Vec2};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, kind: CellKind) -> Self {
        Self { width, height, cells: vec![kind; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-range lookups read as wall so edge entities never index past the grid.
    pub fn tile_at(&self, pos: Pos) -> CellKind {
        if !self.in_bounds(pos) {
            return CellKind::Wall;
        }
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, kind: CellKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.cells[idx] = kind;
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.tile_at(pos) == CellKind::Wall
    }

    pub fn is_wall_at(&self, point: Vec2) -> bool {
        if !point.x.is_finite() || !point.y.is_finite() {
            return true;
        }
        self.is_wall(point.cell())
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    /// True when an axis-aligned box of `half_extent` around `center` touches no wall.
    pub fn box_is_clear(&self, center: Vec2, half_extent: f32) -> bool {
        [
            Vec2::new(center.x - half_extent, center.y - half_extent),
            Vec2::new(center.x + half_extent, center.y - half_extent),
            Vec2::new(center.x - half_extent, center.y + half_extent),
            Vec2::new(center.x + half_extent, center.y + half_extent),
        ]
        .into_iter()
        .all(|corner| !self.is_wall_at(corner))
    }

    /// Moves along each axis independently so bodies slide along walls.
    pub fn slide_move(&self, from: Vec2, step: Vec2, half_extent: f32) -> Vec2 {
        let mut pos = from;
        let along_x = Vec2::new(pos.x + step.x, pos.y);
        if step.x != 0.0 && self.box_is_clear(along_x, half_extent) {
            pos = along_x;
        }
        let along_y = Vec2::new(pos.x, pos.y + step.y);
        if step.y != 0.0 && self.box_is_clear(along_y, half_extent) {
            pos = along_y;
        }
        pos
    }

    /// Clamps a free-moving body to the grid rectangle.
    pub fn clamp_inside(&self, point: Vec2, half_extent: f32) -> Vec2 {
        Vec2::new(
            point.x.clamp(half_extent, self.width as f32 - half_extent),
            point.y.clamp(half_extent, self.height as f32 - half_extent),
        )
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub(super) fn farthest_floor_from(grid: &Grid, start: Pos) -> Pos {
    let mut best = start;
    let mut best_distance = 0_u32;
    for pos in grid.positions() {
        if grid.tile_at(pos) != CellKind::Floor {
            continue;
        }
        let distance = manhattan(start, pos);
        if distance > best_distance
            || (distance == best_distance && (pos.y, pos.x) > (best.y, best.x))
        {
            best = pos;
            best_distance = distance;
        }
    }
    best
}
