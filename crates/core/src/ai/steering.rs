//! Direct steering: wander, hold, and chase. No path search.

use std::iter;

use crate::dungeon::Grid;
use crate::rng::SimRng;
use crate::types::{Pos, Vec2};

use super::{AiContext, ENEMY_HALF_EXTENT, Enemy};

const PATROL_TIMER_MIN: f32 = 1.0;
const PATROL_TIMER_MAX: f32 = 3.0;
/// Longest single collision-checked move; a body must travel `1 - 2 * ENEMY_HALF_EXTENT`
/// past a one-cell wall before its box clears, so shorter moves cannot tunnel.
const MAX_SUBSTEP: f32 = 0.5;
/// Caps per-tick travel at `MAX_SUBSTEP * MAX_SUBSTEPS` cells.
const MAX_SUBSTEPS: usize = 16;

/// Drifts along `wander_dir`, re-rolling it on a 1-3s timer or whenever a wall blocks the step.
pub(super) fn wander(enemy: &mut Enemy, ctx: &AiContext<'_>, rng: &mut SimRng, speed: f32) {
    enemy.patrol_timer -= ctx.dt;
    if enemy.patrol_timer <= 0.0 {
        enemy.wander_dir = rng.angle();
        enemy.patrol_timer = rng.range_f32(PATROL_TIMER_MIN, PATROL_TIMER_MAX);
    }
    let step = Vec2::from_angle(enemy.wander_dir) * (speed * ctx.dt);
    if advance(enemy, ctx, step, false) {
        enemy.wander_dir = rng.angle();
    }
}

/// Dormant archetypes wait in place until aggroed.
pub(super) fn hold_position(_: &mut Enemy, _: &AiContext<'_>, _: &mut SimRng, _: f32) {}

pub(super) fn chase(enemy: &mut Enemy, ctx: &AiContext<'_>, speed: f32, permeable: bool) {
    let heading = (ctx.player_pos - enemy.pos).normalized();
    if heading != Vec2::ZERO {
        enemy.wander_dir = heading.angle();
    }
    advance(enemy, ctx, heading * (speed * ctx.dt), permeable);
}

/// Applies `step`, returning true when a wall rejected either axis.
///
/// A solid body caught overlapping a wall (a phase walker whose window closed
/// mid-wall) ignores `step` and backs out toward the nearest open cell instead.
fn advance(enemy: &mut Enemy, ctx: &AiContext<'_>, step: Vec2, permeable: bool) -> bool {
    if permeable {
        enemy.pos = ctx.grid.clamp_inside(enemy.pos + step, ENEMY_HALF_EXTENT);
        return false;
    }
    if !ctx.grid.box_is_clear(enemy.pos, ENEMY_HALF_EXTENT) {
        if let Some(cell) = nearest_open_cell(ctx.grid, enemy.pos) {
            enemy.pos = move_toward(enemy.pos, cell.center(), step.length());
        }
        return false;
    }

    let length = step.length();
    if !length.is_finite() {
        return true;
    }
    let substeps = ((length / MAX_SUBSTEP).ceil() as usize).clamp(1, MAX_SUBSTEPS);
    let part = if length > 0.0 {
        step * ((length / substeps as f32).min(MAX_SUBSTEP) / length)
    } else {
        step
    };
    let mut blocked = false;
    for _ in 0..substeps {
        let from = enemy.pos;
        let moved = ctx.grid.slide_move(from, part, ENEMY_HALF_EXTENT);
        enemy.pos = moved;
        blocked |= (part.x != 0.0 && moved.x == from.x) || (part.y != 0.0 && moved.y == from.y);
    }
    blocked
}

/// The open cell whose center is closest to `pos`: its own cell or an orthogonal
/// neighbor when possible, otherwise the nearest ring that holds one.
fn nearest_open_cell(grid: &Grid, pos: Vec2) -> Option<Pos> {
    let home = pos.cell();
    if let Some(cell) = closest_open(grid, pos, iter::once(home).chain(home.neighbors4())) {
        return Some(cell);
    }
    let reach = grid.width().max(grid.height()) as i32;
    (2..=reach).find_map(|radius| {
        let ring = (-radius..=radius)
            .flat_map(|dy| (-radius..=radius).map(move |dx| (dy, dx)))
            .filter(|&(dy, dx)| dy.abs().max(dx.abs()) == radius)
            .map(|(dy, dx)| Pos { y: home.y + dy, x: home.x + dx });
        closest_open(grid, pos, ring)
    })
}

fn closest_open(grid: &Grid, pos: Vec2, cells: impl Iterator<Item = Pos>) -> Option<Pos> {
    cells
        .filter(|&cell| !grid.is_wall(cell))
        .min_by(|a, b| pos.distance(a.center()).total_cmp(&pos.distance(b.center())))
}

fn move_toward(from: Vec2, target: Vec2, max_distance: f32) -> Vec2 {
    let offset = target - from;
    let distance = offset.length();
    if distance <= max_distance || !max_distance.is_finite() {
        return target;
    }
    from + offset * (max_distance / distance)
}
