use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::TrainingStats;

/// A labelled value shown in the header
pub type StatusItem = (&'static str, String);

/// Presentation settings, passed explicitly to the renderer
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Title drawn on the board frame
    pub title: String,
    /// Draw the score chart next to the board
    pub show_chart: bool,
    /// `(keys, description)` pairs for the footer
    pub controls: Vec<(&'static str, &'static str)>,
}

impl RenderConfig {
    /// Keyboard play: board only
    pub fn human() -> Self {
        Self {
            title: " Snake ".to_string(),
            show_chart: false,
            controls: vec![
                ("↑↓←→/WASD", "move"),
                ("Space", "pause"),
                ("R", "restart"),
                ("Q", "quit"),
            ],
        }
    }

    /// Live training: board and score chart
    pub fn training() -> Self {
        Self {
            title: " Snake Agent ".to_string(),
            show_chart: true,
            controls: vec![("1-4", "speed"), ("Space", "pause"), ("Q", "quit")],
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::human()
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw one frame from read-only snapshots
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        status: &[StatusItem],
        stats: Option<&TrainingStats>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and chart
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_status(status), chunks[0]);

        let (board_area, chart_area) = self.split_main_area(chunks[1], stats);

        if state.is_alive {
            frame.render_widget(self.render_grid(state), board_area);
        } else {
            frame.render_widget(self.render_game_over(state), board_area);
        }

        if let (Some(area), Some(stats)) = (chart_area, stats) {
            let (scores, means) = stats.chart_series();
            frame.render_widget(self.render_chart(&scores, &means), area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn split_main_area(&self, area: Rect, stats: Option<&TrainingStats>) -> (Rect, Option<Rect>) {
        if self.config.show_chart && stats.is_some() {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            (halves[0], Some(halves[1]))
        } else {
            let centered = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(10),
                    Constraint::Percentage(80),
                    Constraint::Percentage(10),
                ])
                .split(area);
            (centered[1], None)
        }
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let head = state.head();
        let block = state.block_size;

        let lines: Vec<Line> = (0..state.rows())
            .map(|row| {
                let spans: Vec<Span> = (0..state.columns())
                    .map(|col| {
                        let pos = Position::new(col * block, row * block);
                        if pos == head {
                            Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if state.snake.contains(pos) {
                            Span::styled("□ ", Style::default().fg(Color::Blue))
                        } else if pos == state.food {
                            Span::styled(
                                "● ",
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled(". ", Style::default().fg(Color::DarkGray))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(self.config.title.as_str()),
            )
            .alignment(Alignment::Center)
    }

    fn render_status(&self, status: &[StatusItem]) -> Paragraph<'_> {
        let mut spans = Vec::with_capacity(status.len() * 3);
        for (i, (label, value)) in status.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            spans.push(Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_chart<'a>(&self, scores: &'a [(f64, f64)], means: &'a [(f64, f64)]) -> Chart<'a> {
        let x_max = scores.len().max(1) as f64;
        let y_max = scores
            .iter()
            .map(|&(_, y)| y)
            .fold(1.0_f64, f64::max)
            .ceil();

        let datasets = vec![
            Dataset::default()
                .name("score")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(scores),
            Dataset::default()
                .name("mean")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(means),
        ];

        let x_axis = Axis::default()
            .title("Games")
            .style(Style::default().fg(Color::Gray))
            .bounds([0.0, x_max])
            .labels(["0".to_string(), format!("{}", x_max as u64)]);
        let y_axis = Axis::default()
            .title("Score")
            .style(Style::default().fg(Color::Gray))
            .bounds([0.0, y_max])
            .labels([
                "0".to_string(),
                format!("{:.0}", y_max / 2.0),
                format!("{:.0}", y_max),
            ]);

        Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Training... "),
            )
            .x_axis(x_axis)
            .y_axis(y_axis)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for (i, (keys, description)) in self.config.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*keys, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {description}")));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction as Heading, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn test_state() -> GameState {
        let snake = Snake::new(Position::new(100, 100), Heading::Right, 3, 20);
        GameState::new(snake, Position::new(20, 20), 200, 200, 20)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_board_and_status() {
        let renderer = Renderer::new(RenderConfig::human());
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let state = test_state();
        let status = vec![("Score", "7".to_string())];

        terminal
            .draw(|frame| renderer.render(frame, &state, &status, None))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Snake"));
        assert!(text.contains("Score: 7"));
        assert!(text.contains("■"));
        assert!(text.contains("●"));
    }

    #[test]
    fn test_render_game_over() {
        let renderer = Renderer::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut state = test_state();
        state.is_alive = false;

        terminal
            .draw(|frame| renderer.render(frame, &state, &[], None))
            .unwrap();

        assert!(buffer_text(&terminal).contains("GAME OVER"));
    }

    #[test]
    fn test_render_training_chart() {
        let renderer = Renderer::new(RenderConfig::training());
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let state = test_state();
        let mut stats = TrainingStats::new(10);
        stats.record_episode(1, 10);
        stats.record_episode(3, 10);

        terminal
            .draw(|frame| renderer.render(frame, &state, &[], Some(&stats)))
            .unwrap();

        assert!(buffer_text(&terminal).contains("Training"));
    }
}
