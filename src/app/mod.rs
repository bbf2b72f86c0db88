mod renderer;

use std::{
    io::{Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, queue,
    style::Color,
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::Renderer,
    scenario::{Outcome, Scenario, ScenarioConfig},
};

#[derive(Debug, PartialEq)]
enum RoundResult {
    /// The player reached the exit
    Escaped,
    /// A sentry caught the player
    Captured,
    /// The round was canceled by the user
    Canceled,
}

/// The interactive terminal game: one scenario per round, replayed until
/// the user backs out.
pub struct App {
    /// Frame duration driving the tick loop.
    tick_interval: Duration,
    config: ScenarioConfig,
}

impl Default for App {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(16),
            config: ScenarioConfig::default(),
        }
    }
}

impl App {
    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop: build a scenario, play it out, offer a rerun.
    pub fn run(&self, stdout: &mut Stdout, seed: Option<u64>) -> std::io::Result<()> {
        loop {
            let mut scenario =
                Scenario::new(&self.config, seed).map_err(std::io::Error::other)?;
            tracing::info!("[app] round started (seed {:?})", seed);

            let round_result = self.play_round(&mut scenario)?;
            tracing::info!("[app] round finished: {:?}", round_result);

            let status_row = scenario.maze().height() as u16;
            let mut renderer = Renderer::new();
            match round_result {
                RoundResult::Escaped => {
                    renderer.status_line(
                        status_row,
                        "You escaped the maze! Press Enter to play again, or Esc to exit.",
                        Color::Green,
                    )?;
                }
                RoundResult::Captured => {
                    renderer.status_line(
                        status_row,
                        "A sentry caught you! Press Enter to play again, or Esc to exit.",
                        Color::Red,
                    )?;
                }
                RoundResult::Canceled => return Ok(()),
            }

            loop {
                if let Event::Key(event::KeyEvent { code, kind, .. }) = event::read()?
                    && kind == event::KeyEventKind::Press
                {
                    match code {
                        KeyCode::Enter => break,
                        KeyCode::Esc => return Ok(()),
                        _ => {}
                    }
                }
            }
            execute!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
    }

    /// Run one scenario to a terminal state at a fixed frame cadence. Input
    /// is polled without blocking; the latest arrow key becomes the intent
    /// fed to every following tick, so the player keeps walking until
    /// redirected, stopped with Space, or stopped by a wall.
    fn play_round(&self, scenario: &mut Scenario) -> std::io::Result<RoundResult> {
        let mut renderer = Renderer::new();
        let status_row = scenario.maze().height() as u16;

        if !renderer.fits_terminal(scenario)? {
            renderer.status_line(
                0,
                "Terminal is too small for the board. Press any key to exit.",
                Color::Yellow,
            )?;
            event::read()?;
            return Ok(RoundResult::Canceled);
        }

        // Replay the search that proved the board solvable, then the route
        // it found, before handing control to the player
        renderer.draw_board(scenario)?;
        renderer.status_line(status_row, "Scouting the board...", Color::Yellow)?;
        for &coord in scenario.search_trace() {
            renderer.draw_highlight(coord, false)?;
            std::thread::sleep(Duration::from_millis(2));
        }
        for &coord in scenario.reference_path() {
            renderer.draw_highlight(coord, true)?;
            std::thread::sleep(Duration::from_millis(10));
        }
        std::thread::sleep(Duration::from_millis(500));

        renderer.draw_board(scenario)?;
        renderer.status_line(
            status_row,
            "Reach the blue exit, avoid the red sentries. Arrows to move, Esc to quit.",
            Color::Cyan,
        )?;

        let mut intent: (i8, i8) = (0, 0);
        loop {
            let frame_start = Instant::now();

            // Drain whatever input arrived since the last frame
            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()?
                    && key.kind == event::KeyEventKind::Press
                {
                    match key.code {
                        KeyCode::Esc => return Ok(RoundResult::Canceled),
                        KeyCode::Left => intent = (-1, 0),
                        KeyCode::Right => intent = (1, 0),
                        KeyCode::Up => intent = (0, -1),
                        KeyCode::Down => intent = (0, 1),
                        KeyCode::Char(' ') => intent = (0, 0),
                        _ => {}
                    }
                }
            }

            let outcome = scenario.tick(intent);
            renderer.draw_agents(scenario)?;
            match outcome {
                Outcome::Running => {}
                Outcome::Captured => return Ok(RoundResult::Captured),
                Outcome::Escaped => return Ok(RoundResult::Escaped),
            }

            // Keep the frame cadence
            if let Some(remaining) = self.tick_interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    /// Headless batch of autopilot runs, for profiling and regression
    /// sweeps. Consecutive seeds starting at `base_seed` keep every run
    /// reproducible.
    pub fn profile(
        &self,
        runs: u64,
        base_seed: u64,
        max_ticks: u64,
    ) -> std::io::Result<()> {
        let mut escaped = 0u64;
        let mut captured = 0u64;
        let mut unresolved = 0u64;
        let mut failed = 0u64;
        let mut total_ticks = 0u64;

        let started = Instant::now();
        for run in 0..runs {
            let seed = base_seed + run;
            let mut scenario = match Scenario::new(&self.config, Some(seed)) {
                Ok(scenario) => scenario,
                Err(e) => {
                    tracing::warn!("[app] run {} failed to build: {}", run, e);
                    failed += 1;
                    continue;
                }
            };
            let (outcome, ticks) = scenario.run_autopilot(max_ticks);
            total_ticks += ticks;
            match outcome {
                Outcome::Escaped => escaped += 1,
                Outcome::Captured => captured += 1,
                Outcome::Running => unresolved += 1,
            }
            tracing::info!(
                "[app] run {} (seed {}): {:?} after {} ticks",
                run,
                seed,
                outcome,
                ticks
            );
        }

        let attempted = runs - failed;
        println!(
            "{} runs in {:.2?}: {} escaped, {} captured, {} unresolved, {} failed to build",
            runs,
            started.elapsed(),
            escaped,
            captured,
            unresolved,
            failed
        );
        if attempted > 0 {
            println!("average ticks per run: {}", total_ticks / attempted);
        }
        Ok(())
    }
}
