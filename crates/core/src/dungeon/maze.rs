//! Depth-first maze carving and the loop-opening repair pass.

use crate::rng::SimRng;
use crate::types::{CellKind, Pos};

use super::grid::Grid;

const TWO_STEP_OFFSETS: [(i32, i32); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

struct Frame {
    cell: Pos,
    order: [usize; 4],
    cursor: usize,
}

impl Frame {
    fn new(cell: Pos, rng: &mut SimRng) -> Self {
        let mut order = [0, 1, 2, 3];
        rng.shuffle(&mut order);
        Self { cell, order, cursor: 0 }
    }
}

/// Recursive-backtracker carving driven by an explicit frame stack.
///
/// Each frame remembers its shuffled direction order and how far it got, so the
/// traversal matches the recursive formulation while stack depth lives on the heap.
pub(super) fn carve_backtracker(grid: &mut Grid, start: Pos, rng: &mut SimRng) {
    grid.set(start, CellKind::Floor);
    let mut stack = vec![Frame::new(start, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.cursor == TWO_STEP_OFFSETS.len() {
            stack.pop();
            continue;
        }
        let (dx, dy) = TWO_STEP_OFFSETS[frame.order[frame.cursor]];
        frame.cursor += 1;
        let from = frame.cell;

        let target = Pos { y: from.y + dy, x: from.x + dx };
        if !is_interior(grid, target) || grid.tile_at(target) != CellKind::Wall {
            continue;
        }
        grid.set(Pos { y: from.y + dy / 2, x: from.x + dx / 2 }, CellKind::Floor);
        grid.set(target, CellKind::Floor);
        stack.push(Frame::new(target, rng));
    }
}

/// Opens sampled interior walls that already touch two or more floor cells.
///
/// A newly opened cell is always adjacent to existing floor, so no isolated pocket
/// can appear. Returns how many walls were opened.
pub(super) fn open_loops(grid: &mut Grid, rng: &mut SimRng, samples: usize) -> usize {
    if grid.width() < 3 || grid.height() < 3 {
        return 0;
    }
    let mut opened = 0;
    for _ in 0..samples {
        let pos = Pos {
            y: (1 + rng.below(grid.height() - 2)) as i32,
            x: (1 + rng.below(grid.width() - 2)) as i32,
        };
        if grid.tile_at(pos) != CellKind::Wall {
            continue;
        }
        let floor_neighbors = pos
            .neighbors4()
            .into_iter()
            .filter(|&neighbor| grid.tile_at(neighbor) == CellKind::Floor)
            .count();
        if floor_neighbors >= 2 {
            grid.set(pos, CellKind::Floor);
            opened += 1;
        }
    }
    opened
}

fn is_interior(grid: &Grid, pos: Pos) -> bool {
    pos.x >= 1
        && pos.y >= 1
        && (pos.x as usize) < grid.width() - 1
        && (pos.y as usize) < grid.height() - 1
}
