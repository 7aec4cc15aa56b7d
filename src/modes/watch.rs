//! Live training view
//!
//! Trains the agent exactly like the headless mode while drawing the board and
//! a chart of per-game scores and their running mean.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=unthrottled)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use super::train::{EpisodeReport, TrainConfig, TrainMode};
use crate::input::{InputHandler, KeyAction};
use crate::render::{RenderConfig, Renderer, StatusItem};

/// Simulation speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchSpeed {
    /// 10 frames per second
    Slow,
    /// 40 frames per second
    Normal,
    /// 200 frames per second
    Fast,
    /// As many frames as the trainer can do, drawn at the render rate
    Unthrottled,
}

impl WatchSpeed {
    fn from_key(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::Unthrottled),
            _ => None,
        }
    }

    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(100),
            Self::Normal => Duration::from_millis(25),
            Self::Fast => Duration::from_millis(5),
            Self::Unthrottled => Duration::from_millis(1),
        }
    }

    /// Frames simulated per tick
    fn frames_per_tick(&self) -> usize {
        match self {
            Self::Unthrottled => 50,
            _ => 1,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Unthrottled => "Max",
        }
    }
}

/// Training with a live board and score chart
pub struct WatchMode<B: AutodiffBackend> {
    session: TrainMode<B>,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: WatchSpeed,
    last_report: Option<EpisodeReport>,
}

impl<B: AutodiffBackend> WatchMode<B> {
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        Ok(Self {
            session: TrainMode::new(config, device)?,
            renderer: Renderer::new(RenderConfig::training()),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed: WatchSpeed::Normal,
            last_report: None,
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

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        if let Some(report) = self.last_report {
            println!(
                "Stopped after game {} | best score {} | mean score {:.2}",
                report.game, report.best_score, report.mean_score
            );
        }

        result
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.advance()?;
                    }
                }

                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        let status = self.status();
                        self.renderer.render(
                            frame,
                            self.session.env().state(),
                            &status,
                            Some(self.session.stats()),
                        );
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit || self.session.is_finished() {
                break;
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> Result<()> {
        for _ in 0..self.speed.frames_per_tick() {
            if let Some(report) = self.session.step()? {
                self.last_report = Some(report);
                if self.session.is_finished() {
                    break;
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        let Event::Key(key) = event else {
            return;
        };

        match self.input_handler.handle_key_event(key) {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::SetSpeed(level) => {
                if let Some(speed) = WatchSpeed::from_key(level) {
                    self.change_speed(speed, tick_timer);
                }
            }
            KeyAction::GameAction(_) | KeyAction::Restart | KeyAction::None => {}
        }
    }

    fn change_speed(&mut self, new_speed: WatchSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        *tick_timer = interval(self.speed.tick_interval());
    }

    fn status(&self) -> Vec<StatusItem> {
        let stats = self.session.stats();
        let agent = self.session.agent();
        let mut status = vec![
            ("Game", (agent.games_played() + 1).to_string()),
            ("Score", self.session.env().state().score.to_string()),
            ("Best", stats.best_score().to_string()),
            ("Mean", format!("{:.2}", stats.mean_score())),
            ("Epsilon", agent.epsilon().to_string()),
            ("Speed", self.speed.as_str().to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::rl::{AgentConfig, TrainingBackend, default_device};
    use tempfile::TempDir;

    fn create_watch_mode(dir: &TempDir) -> WatchMode<TrainingBackend> {
        let mut config = TrainConfig::new(dir.path().to_path_buf());
        config.game_config = GameConfig::small().with_seed(4);
        config.agent_config = AgentConfig {
            hidden_size: 16,
            batch_size: 32,
            seed: Some(4),
            ..Default::default()
        };
        WatchMode::new(config, default_device()).unwrap()
    }

    #[test]
    fn test_watch_speed() {
        assert_eq!(WatchSpeed::Slow.tick_interval(), Duration::from_millis(100));
        assert_eq!(WatchSpeed::Normal.tick_interval(), Duration::from_millis(25));
        assert_eq!(WatchSpeed::Unthrottled.frames_per_tick(), 50);
        assert_eq!(WatchSpeed::from_key(3), Some(WatchSpeed::Fast));
        assert_eq!(WatchSpeed::from_key(9), None);
    }

    #[test]
    fn test_watch_mode_creation() {
        let dir = TempDir::new().unwrap();
        let mode = create_watch_mode(&dir);

        assert!(!mode.paused);
        assert_eq!(mode.speed, WatchSpeed::Normal);
        assert!(mode.last_report.is_none());
    }

    #[test]
    fn test_advance_trains_agent() {
        let dir = TempDir::new().unwrap();
        let mut mode = create_watch_mode(&dir);
        mode.speed = WatchSpeed::Unthrottled;

        while mode.last_report.is_none() {
            mode.advance().unwrap();
        }

        let games = mode.session.agent().games_played();
        assert!(games >= 1);
        assert_eq!(mode.session.stats().games(), games as usize);
        assert_eq!(mode.last_report.map(|r| r.game), Some(games));
    }

    #[test]
    fn test_status_shows_pause() {
        let dir = TempDir::new().unwrap();
        let mut mode = create_watch_mode(&dir);

        assert!(!mode.status().iter().any(|(label, _)| *label == "State"));
        mode.paused = true;
        assert!(mode.status().iter().any(|(_, value)| value == "PAUSED"));
    }
}
