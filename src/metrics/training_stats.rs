//! Training statistics for the Q-learning loop
//!
//! Keeps the full per-game score history and its running mean (the two series
//! plotted by the watch mode), the best score, and rolling windows for the
//! per-frame and replay-memory losses.

use std::collections::VecDeque;

/// Training statistics tracker
///
/// # Example
///
/// ```rust
/// use snake_qlearn::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// assert!(stats.record_episode(4, 120));
/// assert!(!stats.record_episode(2, 80));
/// stats.record_loss(0.5);
/// stats.record_replay_loss(0.2);
///
/// assert_eq!(stats.best_score(), 4);
/// assert_eq!(stats.mean_scores(), &[4.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Score of every finished game, oldest first
    scores: Vec<u32>,

    /// Mean of all scores up to and including each game
    mean_scores: Vec<f32>,

    total_score: u64,

    best_score: u32,

    /// Frames played over all games
    total_steps: usize,

    /// Recent single-transition losses (rolling window)
    losses: VecDeque<f32>,

    /// Recent replay-memory losses, one per finished game (rolling window)
    replay_losses: VecDeque<f32>,

    /// Window size for the loss averages
    window_size: usize,
}

impl TrainingStats {
    /// Create an empty tracker averaging losses over `window_size` updates
    pub fn new(window_size: usize) -> Self {
        Self {
            scores: Vec::new(),
            mean_scores: Vec::new(),
            total_score: 0,
            best_score: 0,
            total_steps: 0,
            losses: VecDeque::with_capacity(window_size),
            replay_losses: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Start from a best score carried over from a checkpoint
    pub fn with_best_score(mut self, best_score: u32) -> Self {
        self.best_score = best_score;
        self
    }

    /// Record a finished game; returns true if it set a new best score
    pub fn record_episode(&mut self, score: u32, length: usize) -> bool {
        self.scores.push(score);
        self.total_score += u64::from(score);
        self.total_steps += length;
        self.mean_scores
            .push(self.total_score as f32 / self.scores.len() as f32);

        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Record the loss of a single-transition update
    pub fn record_loss(&mut self, loss: f32) {
        push_window(&mut self.losses, self.window_size, loss);
    }

    /// Record the loss of a replay-memory update
    pub fn record_replay_loss(&mut self, loss: f32) {
        push_window(&mut self.replay_losses, self.window_size, loss);
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn mean_scores(&self) -> &[f32] {
        &self.mean_scores
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Games recorded by this tracker
    pub fn games(&self) -> usize {
        self.scores.len()
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Mean score over every recorded game, 0.0 before the first one
    pub fn mean_score(&self) -> f32 {
        self.mean_scores.last().copied().unwrap_or(0.0)
    }

    pub fn last_score(&self) -> Option<u32> {
        self.scores.last().copied()
    }

    pub fn last_loss(&self) -> Option<f32> {
        self.losses.back().copied()
    }

    /// Mean single-transition loss over the window, 0.0 if nothing was recorded
    pub fn mean_loss(&self) -> f32 {
        window_mean(&self.losses)
    }

    /// Mean replay-memory loss over the window, 0.0 if nothing was recorded
    pub fn mean_replay_loss(&self) -> f32 {
        window_mean(&self.replay_losses)
    }

    /// `(game, score)` and `(game, mean score)` series for plotting, games numbered from 1
    pub fn chart_series(&self) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
        let scores = self
            .scores
            .iter()
            .enumerate()
            .map(|(i, &s)| ((i + 1) as f64, f64::from(s)))
            .collect();
        let means = self
            .mean_scores
            .iter()
            .enumerate()
            .map(|(i, &m)| ((i + 1) as f64, f64::from(m)))
            .collect();
        (scores, means)
    }

    /// Format a one-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Games: {} | Steps: {} | Best: {} | Mean: {:.2} | Loss: {:.4} | Replay loss: {:.4}",
            self.games(),
            self.total_steps,
            self.best_score,
            self.mean_score(),
            self.mean_loss(),
            self.mean_replay_loss(),
        )
    }
}

fn push_window(window: &mut VecDeque<f32>, size: usize, value: f32) {
    if size == 0 {
        return;
    }
    if window.len() >= size {
        window.pop_front();
    }
    window.push_back(value);
}

fn window_mean(window: &VecDeque<f32>) -> f32 {
    if window.is_empty() {
        0.0
    } else {
        window.iter().sum::<f32>() / window.len() as f32
    }
}

impl Default for TrainingStats {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = TrainingStats::new(100);
        assert_eq!(stats.games(), 0);
        assert_eq!(stats.total_steps(), 0);
        assert_eq!(stats.mean_score(), 0.0);
        assert_eq!(stats.mean_loss(), 0.0);
        assert!(stats.last_score().is_none());
        assert!(stats.last_loss().is_none());
    }

    #[test]
    fn test_running_mean() {
        let mut stats = TrainingStats::new(10);
        stats.record_episode(1, 10);
        stats.record_episode(2, 20);
        stats.record_episode(6, 30);

        assert_eq!(stats.scores(), &[1, 2, 6]);
        assert_eq!(stats.mean_scores(), &[1.0, 1.5, 3.0]);
        assert_eq!(stats.total_steps(), 60);
        assert_eq!(stats.last_score(), Some(6));
    }

    #[test]
    fn test_best_score_tracking() {
        let mut stats = TrainingStats::new(10);

        assert!(!stats.record_episode(0, 5));
        assert!(stats.record_episode(3, 5));
        assert!(!stats.record_episode(3, 5));
        assert!(!stats.record_episode(1, 5));
        assert!(stats.record_episode(4, 5));
        assert_eq!(stats.best_score(), 4);
    }

    #[test]
    fn test_resumed_best_score() {
        let mut stats = TrainingStats::new(10).with_best_score(20);
        assert!(!stats.record_episode(15, 100));
        assert!(stats.record_episode(21, 100));
    }

    #[test]
    fn test_rolling_loss_window() {
        let mut stats = TrainingStats::new(2);

        stats.record_loss(0.1);
        stats.record_loss(0.2);
        assert!((stats.mean_loss() - 0.15).abs() < 1e-5);

        stats.record_loss(0.3);
        assert!((stats.mean_loss() - 0.25).abs() < 1e-5);
        assert_eq!(stats.last_loss(), Some(0.3));
    }

    #[test]
    fn test_replay_loss_kept_apart() {
        let mut stats = TrainingStats::new(10);

        stats.record_loss(0.1);
        stats.record_loss(0.3);
        stats.record_replay_loss(5.0);

        assert!((stats.mean_loss() - 0.2).abs() < 1e-5);
        assert!((stats.mean_replay_loss() - 5.0).abs() < 1e-5);
        assert_eq!(stats.last_loss(), Some(0.3));
    }

    #[test]
    fn test_chart_series() {
        let mut stats = TrainingStats::new(10);
        stats.record_episode(2, 1);
        stats.record_episode(4, 1);

        let (scores, means) = stats.chart_series();
        assert_eq!(scores, vec![(1.0, 2.0), (2.0, 4.0)]);
        assert_eq!(means, vec![(1.0, 2.0), (2.0, 3.0)]);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(5, 150);
        stats.record_loss(0.02);

        let summary = stats.format_summary();
        assert!(summary.contains("Games: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Best: 5"));
        assert!(summary.contains("Mean: 5.00"));
        assert!(summary.contains("| Loss: 0.0200"));
        assert!(summary.contains("Replay loss: 0.0000"));
    }
}
