mod astar;

pub use astar::find_path;

use std::rc::Rc;

/// Outcome of one shortest-path query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Cells in the order the search expanded them, for replay displays.
    pub expanded: Vec<(u8, u8)>,
    /// Start-to-goal route if the goal was reached: start first, goal last,
    /// consecutive cells one cardinal step apart.
    pub path: Option<Vec<(u8, u8)>>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

struct TrackedCell {
    /// Coordinates of the cell in the maze
    coord: (u8, u8),
    /// The parent cell from which this cell was reached
    parent: Option<Rc<TrackedCell>>,
    /// Cost to reach this cell from the start
    traveling_cost: u32,
    /// Estimated cost to reach the goal from this cell
    heuristic_cost: u32,
    /// Discovery sequence number. Breaks ties between equal-cost frontier
    /// entries so the same query always returns the same route.
    seq: u64,
}

impl TrackedCell {
    fn priority(&self) -> (u32, u64) {
        (self.traveling_cost + self.heuristic_cost, self.seq)
    }
}

impl PartialEq for TrackedCell {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl Eq for TrackedCell {}

impl PartialOrd for TrackedCell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrackedCell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority().cmp(&other.priority())
    }
}
