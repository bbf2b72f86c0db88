use std::io::{Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{agents::Direction, maze::Tile, scenario::Scenario};

/// Width of each board cell when rendered, in character columns.
pub const CELL_WIDTH: u16 = 2;

fn tile_glyph(tile: Tile) -> StyledContent<&'static str> {
    match tile {
        Tile::Wall => "⬜".with(Color::White),
        Tile::Open => "  ".with(Color::Reset),
    }
}

fn exit_glyph() -> StyledContent<&'static str> {
    "🟦".with(Color::Blue)
}

fn sentry_glyph() -> StyledContent<&'static str> {
    "🟥".with(Color::Red)
}

fn trace_glyph() -> StyledContent<&'static str> {
    "🟨".with(Color::Yellow)
}

fn route_glyph() -> StyledContent<&'static str> {
    "🟩".with(Color::Green)
}

/// The player marker points where it is facing.
fn player_glyph(facing: Direction) -> StyledContent<&'static str> {
    match facing {
        Direction::Up => "▲ ",
        Direction::Down => "▼ ",
        Direction::Left => "◀ ",
        Direction::Right => "▶ ",
    }
    .with(Color::Green)
}

/// Draws the board once, then repaints only the cells agents vacate or
/// enter. The scenario stays the single source of truth; this only mirrors
/// it onto the terminal.
pub struct Renderer {
    stdout: Stdout,
    /// Cells holding an agent marker last frame, repainted before agents
    /// are drawn again.
    occupied: Vec<(u8, u8)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            stdout: std::io::stdout(),
            occupied: Vec::new(),
        }
    }

    /// Check that the terminal fits the board plus the status line.
    pub fn fits_terminal(&self, scenario: &Scenario) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let needed_width = scenario.maze().width() as u16 * CELL_WIDTH;
        let needed_height = scenario.maze().height() as u16 + 1;
        Ok(term_width >= needed_width && term_height >= needed_height)
    }

    /// Full repaint: every tile, the exit marker, then the agents.
    pub fn draw_board(&mut self, scenario: &Scenario) -> std::io::Result<()> {
        let maze = scenario.maze();
        queue!(self.stdout, cursor::MoveTo(0, 0))?;
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                queue!(self.stdout, style::Print(tile_glyph(maze[(x, y)])))?;
            }
            queue!(self.stdout, style::Print("\r\n"))?;
        }
        self.draw_cell(maze.exit(), exit_glyph())?;
        self.occupied.clear();
        self.draw_agents(scenario)?;
        self.stdout.flush()
    }

    /// Repaint the cells agents left, then draw them where they are now.
    pub fn draw_agents(&mut self, scenario: &Scenario) -> std::io::Result<()> {
        let maze = scenario.maze();
        let occupied = std::mem::take(&mut self.occupied);
        for coord in occupied {
            let glyph = if coord == maze.exit() {
                exit_glyph()
            } else {
                tile_glyph(maze[coord])
            };
            self.draw_cell(coord, glyph)?;
        }

        let player = scenario.player();
        self.draw_cell(player.position(), player_glyph(player.facing()))?;
        self.occupied.push(player.position());
        for sentry in scenario.sentries() {
            self.draw_cell(sentry.position(), sentry_glyph())?;
            self.occupied.push(sentry.position());
        }
        self.stdout.flush()
    }

    /// Paint one highlight cell during the pre-round search replay.
    pub fn draw_highlight(&mut self, coord: (u8, u8), on_route: bool) -> std::io::Result<()> {
        let glyph = if on_route {
            route_glyph()
        } else {
            trace_glyph()
        };
        self.draw_cell(coord, glyph)?;
        self.stdout.flush()
    }

    fn draw_cell(
        &mut self,
        coord: (u8, u8),
        glyph: StyledContent<&'static str>,
    ) -> std::io::Result<()> {
        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                glyph.content().width(),
                CELL_WIDTH as usize,
                "Each cell must occupy exactly two character columns."
            );
        }
        queue!(
            self.stdout,
            cursor::MoveTo(coord.0 as u16 * CELL_WIDTH, coord.1 as u16),
            style::Print(glyph)
        )
    }

    /// Print a message on the line below the board, truncated to the
    /// terminal width.
    pub fn status_line(&mut self, row: u16, message: &str, color: Color) -> std::io::Result<()> {
        let (term_width, _) = terminal::size()?;
        let (visible, _) = message.unicode_truncate(term_width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(visible.to_string().with(color))
        )?;
        self.stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
