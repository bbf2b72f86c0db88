use rand::rngs::StdRng;

use crate::agents::{Player, Sentry};
use crate::generator::{self, GeneratedMaze, GenerationError, GeneratorConfig};
use crate::maze::Maze;
use crate::pursuit::{self, SpawnConfig, SpawnError};

/// Terminal state of a run, checked once per tick after every agent moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Neither side has won yet.
    Running,
    /// A sentry shares the player's cell.
    Captured,
    /// The player stands on the exit cell.
    Escaped,
}

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub generator: GeneratorConfig,
    pub sentries: SpawnConfig,
    /// Ticks between player steps.
    pub player_move_delay: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            sentries: SpawnConfig::default(),
            player_move_delay: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// True when any sentry occupies the player's cell.
pub fn is_captured(player: &Player, sentries: &[Sentry]) -> bool {
    sentries
        .iter()
        .any(|sentry| sentry.position() == player.position())
}

/// True when the player stands on the exit cell.
pub fn has_escaped(player: &Player, exit: (u8, u8)) -> bool {
    player.position() == exit
}

/// One full run: the board, the player, the sentry squad, and the runtime
/// randomness that drives patrol targets. Owns the board; everything else
/// borrows it read-only.
pub struct Scenario {
    maze: Maze,
    reference_path: Vec<(u8, u8)>,
    search_trace: Vec<(u8, u8)>,
    player: Player,
    sentries: Vec<Sentry>,
    rng: StdRng,
    ticks: u64,
}

impl Scenario {
    /// Generate a board and place the agents. Deterministic for a given
    /// seed, including sentry placement and later patrol draws.
    pub fn new(config: &ScenarioConfig, seed: Option<u64>) -> Result<Self, ScenarioError> {
        let GeneratedMaze {
            maze,
            reference_path,
            search_trace,
        } = generator::generate(&config.generator, seed)?;

        let mut rng = generator::get_rng(seed);
        let player = Player::new(maze.entry(), config.player_move_delay);
        let sentries = pursuit::place_sentries(&maze, player.position(), &config.sentries, &mut rng)?;

        tracing::info!(
            "[scenario] ready: {}x{} board, {} sentries, reference route of {} cells",
            maze.width(),
            maze.height(),
            sentries.len(),
            reference_path.len()
        );

        Ok(Scenario {
            maze,
            reference_path,
            search_trace,
            player,
            sentries,
            rng,
            ticks: 0,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sentries(&self) -> &[Sentry] {
        &self.sentries
    }

    /// Entry-to-exit route found while validating the board.
    pub fn reference_path(&self) -> &[(u8, u8)] {
        &self.reference_path
    }

    /// Expansion order of the validating search, for replay displays.
    pub fn search_trace(&self) -> &[(u8, u8)] {
        &self.search_trace
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one tick: the player first, then each sentry in list order,
    /// so a sentry always reacts to the player's position from this tick.
    /// Terminal checks run after every agent has moved; capture wins over
    /// escape on the same tick.
    pub fn tick(&mut self, intent: (i8, i8)) -> Outcome {
        self.ticks += 1;
        self.player.apply_intent(intent, &self.maze);
        for sentry in &mut self.sentries {
            pursuit::tick_sentry(sentry, &self.player, &self.maze, &mut self.rng);
        }
        self.outcome()
    }

    pub fn outcome(&self) -> Outcome {
        if is_captured(&self.player, &self.sentries) {
            Outcome::Captured
        } else if has_escaped(&self.player, self.maze.exit()) {
            Outcome::Escaped
        } else {
            Outcome::Running
        }
    }

    /// Drive the player along the reference route until a terminal state is
    /// reached or `max_ticks` pass. Returns the outcome and the ticks spent.
    pub fn run_autopilot(&mut self, max_ticks: u64) -> (Outcome, u64) {
        let route = self.reference_path.clone();
        let mut next = 1; // route[0] is the entry the player starts on
        for tick in 1..=max_ticks {
            if route.get(next) == Some(&self.player.position()) {
                next += 1;
            }
            let intent = match route.get(next) {
                Some(&(tx, ty)) => {
                    let (px, py) = self.player.position();
                    (
                        (tx as i16 - px as i16).signum() as i8,
                        (ty as i16 - py as i16).signum() as i8,
                    )
                }
                None => (0, 0),
            };
            let outcome = self.tick(intent);
            if outcome != Outcome::Running {
                tracing::debug!("[scenario] autopilot finished: {:?} after {} ticks", outcome, tick);
                return (outcome, tick);
            }
        }
        (Outcome::Running, max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ChasePolicy;
    use crate::generator::get_rng;
    use crate::maze::{Grid, Tile};

    fn board(width: u8, height: u8) -> Maze {
        let mut grid = Grid::new(width, height, Tile::Open);
        for y in 0..height {
            for x in 0..width {
                if grid.is_boundary(x, y) {
                    grid.set((x, y), Tile::Wall);
                }
            }
        }
        Maze::new(grid, (1, 1), (width - 2, height - 2))
    }

    fn scenario_on(maze: Maze, player: Player, sentries: Vec<Sentry>) -> Scenario {
        Scenario {
            maze,
            reference_path: Vec::new(),
            search_trace: Vec::new(),
            player,
            sentries,
            rng: get_rng(Some(0)),
            ticks: 0,
        }
    }

    #[test]
    fn test_capture_when_a_sentry_reaches_the_player() {
        let maze = board(8, 8);
        let player = Player::new((1, 1), 10);
        let sentry = Sentry::new((1, 2), 5, 1, ChasePolicy::Planned);
        let mut scenario = scenario_on(maze, player, vec![sentry]);

        assert_eq!(scenario.tick((0, 0)), Outcome::Captured);
        assert!(is_captured(scenario.player(), scenario.sentries()));
    }

    #[test]
    fn test_escape_at_the_exit_cell() {
        let maze = board(8, 8);
        let player = Player::new((6, 5), 1);
        let mut scenario = scenario_on(maze, player, Vec::new());

        assert_eq!(scenario.tick((0, 1)), Outcome::Escaped);
        assert!(has_escaped(scenario.player(), (6, 6)));
    }

    #[test]
    fn test_capture_wins_over_escape_on_the_same_tick() {
        let maze = board(8, 8);
        // Player already on the exit; a sentry arrives this tick
        let player = Player::new((6, 6), 10);
        let sentry = Sentry::new((6, 5), 5, 1, ChasePolicy::Planned);
        let mut scenario = scenario_on(maze, player, vec![sentry]);

        assert_eq!(scenario.tick((0, 0)), Outcome::Captured);
    }

    #[test]
    fn test_sentry_reacts_to_the_player_position_of_this_tick() {
        let maze = board(12, 12);
        // Out of the vision box until the player's step this tick
        let player = Player::new((4, 4), 1);
        let sentry = Sentry::new((8, 4), 3, 1, ChasePolicy::Planned);
        let mut scenario = scenario_on(maze, player, vec![sentry]);

        scenario.tick((1, 0));
        // Player moved to (5,4) first, dx became 3: the sentry saw it and
        // stepped toward the fresh position within the same tick
        assert_eq!(scenario.player().position(), (5, 4));
        assert_eq!(scenario.sentries()[0].position(), (7, 4));
        assert!(scenario.sentries()[0].current_target().is_none());
    }

    #[test]
    fn test_autopilot_escapes_an_unguarded_board() {
        let config = ScenarioConfig {
            generator: GeneratorConfig {
                width: 16,
                height: 12,
                wall_density: 0.25,
                max_attempts: 1000,
            },
            sentries: SpawnConfig {
                count: 0,
                ..SpawnConfig::default()
            },
            player_move_delay: 2,
        };
        let mut scenario = Scenario::new(&config, Some(3)).expect("scenario must build");
        let (outcome, ticks) = scenario.run_autopilot(10_000);
        assert_eq!(outcome, Outcome::Escaped);
        assert!(ticks < 10_000);
        assert_eq!(scenario.ticks(), ticks);
    }

    #[test]
    fn test_outcome_running_on_a_quiet_tick() {
        let maze = board(8, 8);
        let player = Player::new((1, 1), 10);
        let sentry = Sentry::new((5, 5), 1, 30, ChasePolicy::Planned);
        let mut scenario = scenario_on(maze, player, vec![sentry]);

        assert_eq!(scenario.tick((0, 0)), Outcome::Running);
        assert_eq!(scenario.outcome(), Outcome::Running);
    }
}
