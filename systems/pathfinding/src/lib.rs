#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid A* search used by every agent that needs a route.
//!
//! Movement is 4-directional and only passable cells are traversed. Without
//! a danger field every step costs one; with one, stepping onto a cell costs
//! `1 + min(danger / 10, 10)` so routes drift away from enemy threat. The
//! Manhattan heuristic is admissible for unit costs and an accepted
//! underestimate under danger bias.
//!
//! Ties on `f = g + h` are broken by insertion order, which keeps repeated
//! searches over the same inputs reproducible.

use std::{cmp::Ordering, collections::BinaryHeap};

use skirmish_core::CellCoord;
use skirmish_world::{DangerField, TerrainGrid};

/// Upper bound on the danger surcharge added to a single step.
const MAX_DANGER_SURCHARGE: u32 = 10;

/// Danger points that add one unit of step cost.
const DANGER_PER_COST: u32 = 10;

/// Entry in the open set, ordered so the binary heap pops the lowest `f`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    estimate: u32,
    sequence: u64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable A* planner holding scratch buffers sized to the last board.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    costs: Vec<u32>,
    parents: Vec<Option<usize>>,
    closed: Vec<bool>,
    open: BinaryHeap<OpenNode>,
}

impl Pathfinder {
    /// Creates a planner with empty scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans a route from `start` to `goal`.
    ///
    /// Returns the cells to walk, excluding `start` and including `goal`.
    /// `start == goal` succeeds with an empty route. `None` means the goal is
    /// unreachable through passable cells. The start cell itself is never
    /// checked for passability.
    pub fn find_path(
        &mut self,
        terrain: &TerrainGrid,
        start: CellCoord,
        goal: CellCoord,
        danger: Option<&DangerField>,
    ) -> Option<Vec<CellCoord>> {
        if start == goal {
            return Some(Vec::new());
        }

        let size = terrain.size();
        let start_index = cell_index(size, start)?;
        let goal_index = cell_index(size, goal)?;
        if !terrain.passable(goal) {
            return None;
        }

        self.reset(size);
        let mut sequence = 0_u64;
        self.costs[start_index] = 0;
        self.open.push(OpenNode {
            estimate: start.manhattan_distance(goal),
            sequence,
            index: start_index,
        });

        while let Some(node) = self.open.pop() {
            if self.closed[node.index] {
                continue;
            }
            self.closed[node.index] = true;

            if node.index == goal_index {
                return Some(self.reconstruct(size, start_index, goal_index));
            }

            let current = cell_at(size, node.index);
            let current_cost = self.costs[node.index];

            for neighbor in current.cardinal_neighbors() {
                let Some(neighbor_index) = cell_index(size, neighbor) else {
                    continue;
                };
                if self.closed[neighbor_index] || !terrain.passable(neighbor) {
                    continue;
                }

                let tentative = current_cost.saturating_add(step_cost(danger, neighbor));
                if tentative >= self.costs[neighbor_index] {
                    continue;
                }

                self.costs[neighbor_index] = tentative;
                self.parents[neighbor_index] = Some(node.index);
                sequence += 1;
                self.open.push(OpenNode {
                    estimate: tentative.saturating_add(neighbor.manhattan_distance(goal)),
                    sequence,
                    index: neighbor_index,
                });
            }
        }

        None
    }

    fn reset(&mut self, size: u32) {
        let count = usize::try_from(size).unwrap_or(0).pow(2);
        self.costs.clear();
        self.costs.resize(count, u32::MAX);
        self.parents.clear();
        self.parents.resize(count, None);
        self.closed.clear();
        self.closed.resize(count, false);
        self.open.clear();
    }

    fn reconstruct(&self, size: u32, start_index: usize, goal_index: usize) -> Vec<CellCoord> {
        let mut route = Vec::new();
        let mut cursor = goal_index;
        while cursor != start_index {
            route.push(cell_at(size, cursor));
            match self.parents[cursor] {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        route.reverse();
        route
    }
}

/// Convenience wrapper that plans with a throwaway [`Pathfinder`].
#[must_use]
pub fn find_path(
    terrain: &TerrainGrid,
    start: CellCoord,
    goal: CellCoord,
    danger: Option<&DangerField>,
) -> Option<Vec<CellCoord>> {
    Pathfinder::new().find_path(terrain, start, goal, danger)
}

/// Cost of stepping onto `cell`.
#[must_use]
pub fn step_cost(danger: Option<&DangerField>, cell: CellCoord) -> u32 {
    danger.map_or(1, |field| {
        1 + (u32::from(field.value_at(cell)) / DANGER_PER_COST).min(MAX_DANGER_SURCHARGE)
    })
}

fn cell_index(size: u32, cell: CellCoord) -> Option<usize> {
    if !cell.is_within(size) {
        return None;
    }
    let width = usize::try_from(size).ok()?;
    Some(usize::try_from(cell.row()).ok()? * width + usize::try_from(cell.column()).ok()?)
}

fn cell_at(size: u32, index: usize) -> CellCoord {
    let width = usize::try_from(size).unwrap_or(1).max(1);
    let row = i32::try_from(index / width).unwrap_or(i32::MAX);
    let column = i32::try_from(index % width).unwrap_or(i32::MAX);
    CellCoord::new(row, column)
}
