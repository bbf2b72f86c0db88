use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::maze::{Grid, Maze, Tile};
use crate::search::find_path;

/// Get a random number generator, optionally seeded for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Board shape and obstacle parameters.
///
/// The defaults mirror the classic 40x30 board with roughly a third of the
/// interior blocked, which keeps the solvability retry loop short.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub width: u8,
    pub height: u8,
    /// Probability that any interior cell is blocked.
    pub wall_density: f64,
    /// Candidate boards to try before giving up. A density high enough to
    /// exhaust this is a configuration problem, not bad luck.
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            wall_density: 0.35,
            max_attempts: 1000,
        }
    }
}

impl GeneratorConfig {
    /// Cell the player starts on.
    pub fn entry(&self) -> (u8, u8) {
        (1, 1)
    }

    /// Cell the player must reach, in the corner opposite the entry.
    pub fn exit(&self) -> (u8, u8) {
        (self.width - 2, self.height - 2)
    }

    /// Reject parameters before entering the retry loop; a bad density or
    /// degenerate board would otherwise only show up as exhausted attempts.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width < 4 || self.height < 4 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.wall_density.is_finite() || !(0.0..=1.0).contains(&self.wall_density) {
            return Err(GenerationError::InvalidDensity(self.wall_density));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("board dimensions {width}x{height} leave no room for an interior")]
    InvalidDimensions { width: u8, height: u8 },
    #[error("wall density {0} is outside [0.0, 1.0]")]
    InvalidDensity(f64),
    #[error("no solvable board found after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// A solvable board plus the search evidence that proved it solvable.
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    pub maze: Maze,
    /// Entry-to-exit route found during validation.
    pub reference_path: Vec<(u8, u8)>,
    /// Expansion order of the validating search, for replay displays.
    pub search_trace: Vec<(u8, u8)>,
}

/// Generate a board with guaranteed entry-to-exit reachability.
///
/// Each attempt scatters walls over the interior at `wall_density`, seals
/// the border, forces the entry and exit open, and keeps the board only if
/// the path search connects entry to exit. Deterministic for a given seed.
pub fn generate(
    config: &GeneratorConfig,
    seed: Option<u64>,
) -> Result<GeneratedMaze, GenerationError> {
    config.validate()?;
    let mut rng = get_rng(seed);
    let entry = config.entry();
    let exit = config.exit();

    for attempt in 1..=config.max_attempts {
        let maze = random_board(config, entry, exit, &mut rng);
        let result = find_path(&maze, entry, exit);
        if let Some(path) = result.path {
            tracing::debug!(
                "[generator] solvable {}x{} board on attempt {}",
                config.width,
                config.height,
                attempt
            );
            return Ok(GeneratedMaze {
                maze,
                reference_path: path,
                search_trace: result.expanded,
            });
        }
    }

    tracing::warn!(
        "[generator] gave up after {} attempts at density {}",
        config.max_attempts,
        config.wall_density
    );
    Err(GenerationError::AttemptsExhausted {
        attempts: config.max_attempts,
    })
}

fn random_board(
    config: &GeneratorConfig,
    entry: (u8, u8),
    exit: (u8, u8),
    rng: &mut StdRng,
) -> Maze {
    let mut grid = Grid::new(config.width, config.height, Tile::Open);
    for y in 0..config.height {
        for x in 0..config.width {
            if grid.is_boundary(x, y) || rng.random_bool(config.wall_density) {
                grid.set((x, y), Tile::Wall);
            }
        }
    }
    grid.set(exit, Tile::Open);
    grid.set(entry, Tile::Open);
    Maze::new(grid, entry, exit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            width: 20,
            height: 15,
            wall_density: 0.3,
            max_attempts: 1000,
        }
    }

    #[test]
    fn test_generated_board_invariants() {
        let generated = generate(&small_config(), Some(7)).expect("generation must succeed");
        let maze = &generated.maze;

        assert!(maze.is_passable(maze.entry()));
        assert!(maze.is_passable(maze.exit()));
        for x in 0..maze.width() {
            assert!(!maze.is_passable((x, 0)));
            assert!(!maze.is_passable((x, maze.height() - 1)));
        }
        for y in 0..maze.height() {
            assert!(!maze.is_passable((0, y)));
            assert!(!maze.is_passable((maze.width() - 1, y)));
        }

        assert!(find_path(maze, maze.entry(), maze.exit()).found());
    }

    #[test]
    fn test_reference_path_connects_entry_to_exit() {
        let generated = generate(&small_config(), Some(11)).expect("generation must succeed");
        let path = &generated.reference_path;
        assert_eq!(path.first(), Some(&generated.maze.entry()));
        assert_eq!(path.last(), Some(&generated.maze.exit()));
        for &coord in path {
            assert!(generated.maze.is_passable(coord));
        }
        assert!(!generated.search_trace.is_empty());
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = generate(&small_config(), Some(42)).expect("generation must succeed");
        let b = generate(&small_config(), Some(42)).expect("generation must succeed");
        assert_eq!(a.maze.tiles(), b.maze.tiles());
        assert_eq!(a.reference_path, b.reference_path);
    }

    #[test]
    fn test_full_density_exhausts_attempts() {
        let config = GeneratorConfig {
            wall_density: 1.0,
            max_attempts: 3,
            ..small_config()
        };
        let err = generate(&config, Some(1)).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::AttemptsExhausted { attempts: 3 }
        ));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let too_small = GeneratorConfig {
            width: 3,
            ..small_config()
        };
        assert!(matches!(
            generate(&too_small, Some(1)),
            Err(GenerationError::InvalidDimensions { .. })
        ));

        let bad_density = GeneratorConfig {
            wall_density: 1.5,
            ..small_config()
        };
        assert!(matches!(
            generate(&bad_density, Some(1)),
            Err(GenerationError::InvalidDensity(_))
        ));
    }
}
