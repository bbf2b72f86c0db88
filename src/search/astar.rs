use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, HashSet},
    rc::Rc,
};

use super::{SearchResult, TrackedCell};
use crate::maze::{Maze, neighbors};

/// Manhattan distance. Admissible for 4-directional unit-cost movement, so
/// the first time the goal is popped its cost is optimal.
fn heuristic(a: (u8, u8), b: (u8, u8)) -> u32 {
    let dx = (a.0 as i32 - b.0 as i32).unsigned_abs();
    let dy = (a.1 as i32 - b.1 as i32).unsigned_abs();
    dx + dy
}

/// Shortest path between two cells over the four cardinal directions.
///
/// The maze is only read. Unreachable goals are a normal result, not an
/// error: the returned [`SearchResult`] carries the expansion trace and no
/// path, and callers react by re-targeting.
pub fn find_path(maze: &Maze, start: (u8, u8), goal: (u8, u8)) -> SearchResult {
    let mut expanded = Vec::new();
    if !maze.is_passable(start) || !maze.is_passable(goal) {
        return SearchResult {
            expanded,
            path: None,
        };
    }

    // Min-heap on f = traveling + heuristic, then discovery order.
    // Using Reverse to turn the max-heap into a min-heap.
    let mut open: BinaryHeap<Reverse<TrackedCell>> = BinaryHeap::new();
    let mut seq = 0u64;
    open.push(Reverse(TrackedCell {
        coord: start,
        parent: None,
        traveling_cost: 0,
        heuristic_cost: heuristic(start, goal),
        seq,
    }));

    let mut visited: HashSet<(u8, u8)> = HashSet::new();

    // Cheapest known cost to reach each discovered cell
    let mut costs: HashMap<(u8, u8), u32> = HashMap::new();
    costs.insert(start, 0);

    while let Some(Reverse(current)) = open.pop() {
        // A cell can sit in the heap more than once when a cheaper route to
        // it is discovered later; only the first pop expands it.
        if !visited.insert(current.coord) {
            continue;
        }
        expanded.push(current.coord);

        if current.coord == goal {
            // Walk the parent chain back to the start, then reverse
            let mut path = Vec::with_capacity(current.traveling_cost as usize + 1);
            let mut node = Rc::new(current);
            loop {
                path.push(node.coord);
                match node.parent.clone() {
                    Some(parent) => node = parent,
                    None => break,
                }
            }
            path.reverse();
            return SearchResult {
                expanded,
                path: Some(path),
            };
        }

        let rc_current = Rc::new(current);
        let next_cost = rc_current.traveling_cost + 1; // Uniform cost for each step

        for coord in neighbors(rc_current.coord) {
            if !maze.is_passable(coord) || visited.contains(&coord) {
                continue;
            }
            let cheaper = match costs.get(&coord) {
                Some(&existing) => next_cost < existing,
                None => true,
            };
            if !cheaper {
                continue;
            }
            costs.insert(coord, next_cost);
            seq += 1;
            open.push(Reverse(TrackedCell {
                coord,
                parent: Some(rc_current.clone()),
                traveling_cost: next_cost,
                heuristic_cost: heuristic(coord, goal),
                seq,
            }));
        }
    }

    SearchResult {
        expanded,
        path: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Grid, Tile};

    fn board(width: u8, height: u8, walls: &[(u8, u8)]) -> Maze {
        let mut grid = Grid::new(width, height, Tile::Open);
        for y in 0..height {
            for x in 0..width {
                if grid.is_boundary(x, y) {
                    grid.set((x, y), Tile::Wall);
                }
            }
        }
        for &coord in walls {
            grid.set(coord, Tile::Wall);
        }
        Maze::new(grid, (1, 1), (width - 2, height - 2))
    }

    #[test]
    fn test_unique_shortest_path_is_returned_exactly() {
        // 3x3 interior with column x=2 walled except its bottom cell: the
        // only route from (1,1) to (3,3) hugs the left edge then crosses.
        let maze = board(5, 5, &[(2, 1), (2, 2)]);
        let result = find_path(&maze, (1, 1), (3, 3));
        assert_eq!(
            result.path,
            Some(vec![(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)])
        );
    }

    #[test]
    fn test_path_cost_is_optimal_on_open_board() {
        let maze = board(9, 7, &[]);
        let result = find_path(&maze, (1, 1), (7, 5));
        let path = result.path.expect("open board must be solvable");
        // Manhattan distance 6 + 4 = 10 steps, 11 cells
        assert_eq!(path.len(), 11);
        assert_eq!(path.first(), Some(&(1, 1)));
        assert_eq!(path.last(), Some(&(7, 5)));
        for pair in path.windows(2) {
            assert_eq!(heuristic(pair[0], pair[1]), 1);
        }
    }

    #[test]
    fn test_separating_wall_yields_no_path() {
        // Full wall column between start and goal
        let maze = board(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let result = find_path(&maze, (1, 1), (3, 3));
        assert!(!result.found());
        assert!(result.path.is_none());
        // The trace still shows what was explored
        assert!(!result.expanded.is_empty());
        assert_eq!(result.expanded[0], (1, 1));
    }

    #[test]
    fn test_start_equals_goal() {
        let maze = board(5, 5, &[]);
        let result = find_path(&maze, (2, 2), (2, 2));
        assert_eq!(result.path, Some(vec![(2, 2)]));
    }

    #[test]
    fn test_blocked_endpoints_fail_without_expanding() {
        let maze = board(5, 5, &[(3, 3)]);
        assert!(!find_path(&maze, (1, 1), (3, 3)).found());
        assert!(!find_path(&maze, (0, 0), (3, 1)).found());
    }

    #[test]
    fn test_expansion_order_is_deterministic() {
        let maze = board(9, 9, &[(4, 2), (4, 3), (4, 4), (2, 6)]);
        let a = find_path(&maze, (1, 1), (7, 7));
        let b = find_path(&maze, (1, 1), (7, 7));
        assert_eq!(a.expanded, b.expanded);
        assert_eq!(a.path, b.path);
    }
}
