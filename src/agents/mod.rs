use std::collections::VecDeque;

use crate::maze::Maze;

/// Cardinal facing of an agent marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The facing matching a unit cardinal step, if the step is one.
    fn from_step(step: (i8, i8)) -> Option<Direction> {
        match step {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Offset a cell by a signed step. None when the result leaves the u8 range;
/// anything else out of bounds is caught by the passability check.
pub(crate) fn offset_cell(pos: (u8, u8), step: (i8, i8)) -> Option<(u8, u8)> {
    Some((
        pos.0.checked_add_signed(step.0)?,
        pos.1.checked_add_signed(step.1)?,
    ))
}

/// Pacing counter limiting discrete grid steps to one per `delay` ticks.
///
/// The counter resets whenever a step window opens, whether or not the step
/// is then applied: bumping into a wall consumes the window instead of
/// letting repeated intents fire the moment it clears.
#[derive(Debug, Clone)]
pub struct MovePacer {
    counter: u32,
    delay: u32,
}

impl MovePacer {
    pub fn new(delay: u32) -> Self {
        MovePacer { counter: 0, delay }
    }

    /// Advance one tick. Returns true when a step window opened.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.delay {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// The player-controlled agent: a position, a facing for display, and a
/// pacer gating how often input intent becomes a step.
#[derive(Debug, Clone)]
pub struct Player {
    pos: (u8, u8),
    facing: Direction,
    pacer: MovePacer,
}

impl Player {
    pub fn new(pos: (u8, u8), move_delay: u32) -> Self {
        Player {
            pos,
            facing: Direction::default(),
            pacer: MovePacer::new(move_delay),
        }
    }

    pub fn position(&self) -> (u8, u8) {
        self.pos
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// One game tick. On a due tick the step is applied only when the
    /// destination is passable, and the facing updates only on an applied
    /// non-zero step.
    pub fn apply_intent(&mut self, intent: (i8, i8), maze: &Maze) {
        if !self.pacer.tick() {
            return;
        }
        let Some(dest) = offset_cell(self.pos, intent) else {
            return;
        };
        if !maze.is_passable(dest) {
            return;
        }
        self.pos = dest;
        if let Some(direction) = Direction::from_step(intent) {
            self.facing = direction;
        }
    }
}

/// How a sentry closes in once the player is spotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChasePolicy {
    /// Replan a full route to the player, and patrol to random reachable
    /// cells while the player is hidden.
    #[default]
    Planned,
    /// Step straight toward the player on clear line of sight, and stand
    /// still otherwise.
    Greedy,
}

/// A pursuing agent. Owns its current route and patrol target; the pursuit
/// controller rewrites both each time its pacer opens a step window.
#[derive(Debug, Clone)]
pub struct Sentry {
    pub(crate) pos: (u8, u8),
    pub(crate) vision_range: u8,
    pub(crate) policy: ChasePolicy,
    pub(crate) path: VecDeque<(u8, u8)>,
    pub(crate) target: Option<(u8, u8)>,
    pub(crate) pacer: MovePacer,
}

impl Sentry {
    pub fn new(pos: (u8, u8), vision_range: u8, move_delay: u32, policy: ChasePolicy) -> Self {
        Sentry {
            pos,
            vision_range,
            policy,
            path: VecDeque::new(),
            target: None,
            pacer: MovePacer::new(move_delay),
        }
    }

    pub fn position(&self) -> (u8, u8) {
        self.pos
    }

    pub fn vision_range(&self) -> u8 {
        self.vision_range
    }

    pub fn policy(&self) -> ChasePolicy {
        self.policy
    }

    /// Patrol destination, if one is set.
    pub fn current_target(&self) -> Option<(u8, u8)> {
        self.target
    }

    /// Remaining cells of the route being walked, next step first.
    pub fn planned_path(&self) -> &VecDeque<(u8, u8)> {
        &self.path
    }
}
