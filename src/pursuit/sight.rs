use crate::maze::Maze;

/// Whether two cells see each other along the Bresenham ray between them.
/// A wall anywhere on the ray, endpoints included, blocks sight.
pub fn line_of_sight(maze: &Maze, from: (u8, u8), to: (u8, u8)) -> bool {
    let (mut x0, mut y0) = (from.0 as i16, from.1 as i16);
    let (x1, y1) = (to.0 as i16, to.1 as i16);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if !maze.is_passable((x0 as u8, y0 as u8)) {
            return false;
        }
        if x0 == x1 && y0 == y1 {
            return true;
        }
        let e2 = err * 2;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Grid, Maze, Tile};

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
    fn test_clear_straight_line() {
        let maze = board(8, 8, &[]);
        assert!(line_of_sight(&maze, (1, 3), (6, 3)));
        assert!(line_of_sight(&maze, (3, 1), (3, 6)));
    }

    #[test]
    fn test_wall_on_the_ray_blocks() {
        let maze = board(8, 8, &[(4, 3)]);
        assert!(!line_of_sight(&maze, (1, 3), (6, 3)));
        // The wall does not shadow a different row
        assert!(line_of_sight(&maze, (1, 4), (6, 4)));
    }

    #[test]
    fn test_diagonal_sight() {
        let maze = board(8, 8, &[]);
        assert!(line_of_sight(&maze, (1, 1), (6, 6)));

        let blocked = board(8, 8, &[(3, 3), (3, 4), (4, 3), (4, 4)]);
        assert!(!line_of_sight(&blocked, (1, 1), (6, 6)));
    }

    #[test]
    fn test_same_cell_sees_itself() {
        let maze = board(8, 8, &[]);
        assert!(line_of_sight(&maze, (2, 2), (2, 2)));
    }
}
