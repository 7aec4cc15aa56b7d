//! Keyboard play
//!
//! The same engine the agent trains on, driven by arrow keys or WASD. The
//! snake keeps its heading between key presses and cannot reverse onto itself.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Action, Direction, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{RenderConfig, Renderer, StatusItem};

/// Game clock for keyboard play
const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut engine = GameEngine::new(config).context("Invalid game configuration")?;
        let state = engine.reset().context("Failed to start game")?;

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(RenderConfig::human()),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(TICK_INTERVAL);

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if self.state.is_alive && !self.paused {
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
                    if self.state.is_alive && !self.paused {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        let status = self.status();
                        self.renderer.render(frame, &self.state, &status, None);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(Action::Steer(dir)) => self.pending_direction = Some(dir),
            KeyAction::GameAction(Action::Turn(_)) => {}
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::Restart => self.reset_game()?,
            KeyAction::Quit => self.should_quit = true,
            KeyAction::SetSpeed(_) | KeyAction::None => {}
        }

        Ok(())
    }

    /// Advance one frame with the latest requested heading
    fn update_game(&mut self) {
        let direction = self
            .pending_direction
            .take()
            .unwrap_or_else(|| self.state.direction());

        let result = self.engine.step(&mut self.state, Action::Steer(direction));

        if result.terminated {
            self.metrics.on_game_over(result.score);
        }
    }

    fn reset_game(&mut self) -> Result<()> {
        self.state = self.engine.reset().context("Failed to restart game")?;
        self.metrics.on_game_start();
        self.pending_direction = None;
        self.paused = false;
        Ok(())
    }

    fn status(&self) -> Vec<StatusItem> {
        let mut status = vec![
            ("Score", self.state.score.to_string()),
            ("High", self.metrics.high_score.to_string()),
            ("Games", self.metrics.games_played.to_string()),
            ("Mean", format!("{:.2}", self.metrics.mean_score())),
            ("Time", self.metrics.format_time()),
        ];
        if self.paused {
            status.push(("State", "PAUSED".to_string()));
        }
        status
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
