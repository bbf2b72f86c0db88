mod sight;

pub use sight::line_of_sight;

use std::collections::VecDeque;

use rand::{Rng, rngs::StdRng};

use crate::agents::{ChasePolicy, Player, Sentry, offset_cell};
use crate::maze::Maze;
use crate::search::find_path;

/// Patrol candidates drawn within one step window before the sentry gives
/// up until its next window. Keeps a tick's worth of work bounded even on a
/// board whose open cells are mostly unreachable from the sentry.
const PATROL_RETARGET_DRAWS: u32 = 16;

/// Spawn spacing in units of vision range.
const SPAWN_SPACING_FACTOR: f64 = 2.0;

/// The sighting gate: an axis-aligned box, not a radius. A cell is in range
/// when both axis distances are within the vision range.
pub fn in_vision_range(a: (u8, u8), b: (u8, u8), range: u8) -> bool {
    let dx = (a.0 as i16 - b.0 as i16).unsigned_abs();
    let dy = (a.1 as i16 - b.1 as i16).unsigned_abs();
    dx <= range as u16 && dy <= range as u16
}

/// Advance one sentry by one tick.
///
/// The pacer gates everything: off-window ticks return immediately, so
/// sighting checks and replanning happen once per step window rather than
/// every frame.
pub fn tick_sentry(sentry: &mut Sentry, player: &Player, maze: &Maze, rng: &mut StdRng) {
    if !sentry.pacer.tick() {
        return;
    }
    match sentry.policy {
        ChasePolicy::Planned => tick_planned(sentry, player, maze, rng),
        ChasePolicy::Greedy => tick_greedy(sentry, player, maze),
    }
}

/// Route-planning pursuit: chase on a fresh path while the player is inside
/// the vision box, otherwise patrol toward a random reachable cell.
fn tick_planned(sentry: &mut Sentry, player: &Player, maze: &Maze, rng: &mut StdRng) {
    let player_pos = player.position();
    if in_vision_range(sentry.pos, player_pos, sentry.vision_range) {
        // Player spotted: replace the route with one to the player's current
        // cell and drop any patrol target.
        let result = find_path(maze, sentry.pos, player_pos);
        if let Some(path) = result.path {
            sentry.path = without_own_cell(path);
        }
        sentry.target = None;
        tracing::trace!(
            "[pursuit] sentry at {:?} chasing player at {:?}",
            sentry.pos,
            player_pos
        );
    } else if sentry.target.is_none() || sentry.target == Some(sentry.pos) {
        retarget_patrol(sentry, maze, rng);
    }

    if let Some(next) = sentry.path.pop_front() {
        // No passability re-check: the route was valid when computed and the
        // board never changes mid-run.
        sentry.pos = next;
    }
}

/// Straight-line pursuit: one axis-priority step toward the player when the
/// vision box and the line of sight both agree, standing still otherwise.
fn tick_greedy(sentry: &mut Sentry, player: &Player, maze: &Maze) {
    let player_pos = player.position();
    if !in_vision_range(sentry.pos, player_pos, sentry.vision_range)
        || !line_of_sight(maze, sentry.pos, player_pos)
    {
        return;
    }

    let (sx, sy) = sentry.pos;
    let (px, py) = player_pos;
    let candidates = [
        (px > sx, (1i8, 0i8)),
        (px < sx, (-1, 0)),
        (py > sy, (0, 1)),
        (py < sy, (0, -1)),
    ];
    for (wanted, step) in candidates {
        if !wanted {
            continue;
        }
        if let Some(dest) = offset_cell(sentry.pos, step)
            && maze.is_passable(dest)
        {
            sentry.pos = dest;
            return;
        }
    }
}

/// Drop the leading element of a search path: the agent's own cell.
fn without_own_cell(path: Vec<(u8, u8)>) -> VecDeque<(u8, u8)> {
    let mut route = VecDeque::from(path);
    route.pop_front();
    route
}

fn retarget_patrol(sentry: &mut Sentry, maze: &Maze, rng: &mut StdRng) {
    for _ in 0..PATROL_RETARGET_DRAWS {
        let candidate = (
            rng.random_range(1..maze.width() - 1),
            rng.random_range(1..maze.height() - 1),
        );
        // The sentry's own cell would count as reached on the next window
        if candidate == sentry.pos || !maze.is_passable(candidate) {
            continue;
        }
        // Never adopt a failed search: an unreachable candidate is redrawn
        let result = find_path(maze, sentry.pos, candidate);
        if let Some(path) = result.path {
            sentry.target = Some(candidate);
            sentry.path = without_own_cell(path);
            tracing::trace!(
                "[pursuit] sentry at {:?} patrolling toward {:?}",
                sentry.pos,
                candidate
            );
            return;
        }
    }
    tracing::debug!(
        "[pursuit] sentry at {:?} found no reachable patrol target",
        sentry.pos
    );
}

/// Placement parameters for a squad of sentries.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    pub count: usize,
    pub vision_range: u8,
    pub move_delay: u32,
    pub policy: ChasePolicy,
    /// Candidate draws allowed across the whole placement.
    pub max_attempts: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 5,
            vision_range: 5,
            move_delay: 30,
            policy: ChasePolicy::Planned,
            max_attempts: 10_000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("no sentry placement satisfied the spacing rule after {attempts} draws")]
    AttemptsExhausted { attempts: u32 },
}

/// Place sentries on open interior cells, each at least `2 x vision_range`
/// (Euclidean) from the player start and from every sentry placed before
/// it. Rejected candidates are redrawn up to the configured cap.
pub fn place_sentries(
    maze: &Maze,
    player_start: (u8, u8),
    config: &SpawnConfig,
    rng: &mut StdRng,
) -> Result<Vec<Sentry>, SpawnError> {
    let min_distance = SPAWN_SPACING_FACTOR * f64::from(config.vision_range);
    let mut placed: Vec<Sentry> = Vec::with_capacity(config.count);
    let mut draws = 0;

    while placed.len() < config.count {
        if draws >= config.max_attempts {
            tracing::warn!(
                "[pursuit] placed {}/{} sentries before exhausting {} draws",
                placed.len(),
                config.count,
                draws
            );
            return Err(SpawnError::AttemptsExhausted { attempts: draws });
        }
        draws += 1;

        let candidate = (
            rng.random_range(1..maze.width() - 1),
            rng.random_range(1..maze.height() - 1),
        );
        if !maze.is_passable(candidate) {
            continue;
        }
        if euclidean(candidate, player_start) < min_distance {
            continue;
        }
        if placed
            .iter()
            .any(|sentry| euclidean(candidate, sentry.position()) < min_distance)
        {
            continue;
        }
        placed.push(Sentry::new(
            candidate,
            config.vision_range,
            config.move_delay,
            config.policy,
        ));
    }

    tracing::debug!(
        "[pursuit] placed {} sentries in {} draws",
        placed.len(),
        draws
    );
    Ok(placed)
}

fn euclidean(a: (u8, u8), b: (u8, u8)) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    (dx * dx + dy * dy).sqrt()
}
