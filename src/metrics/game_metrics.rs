use std::time::{Duration, Instant};

/// Session metrics for keyboard play
pub struct GameMetrics {
    pub start_time: Instant,
    /// Time spent in the current game
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Sum of final scores over the session
    pub total_score: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            total_score: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Record a finished game; returns true on a new high score
    pub fn on_game_over(&mut self, final_score: u32) -> bool {
        self.games_played += 1;
        self.total_score += final_score;
        if final_score > self.high_score {
            self.high_score = final_score;
            true
        } else {
            false
        }
    }

    pub fn mean_score(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f32 / self.games_played as f32
        }
    }

    /// Elapsed time as `MM:SS`
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_and_mean() {
        let mut metrics = GameMetrics::new();
        assert_eq!(metrics.mean_score(), 0.0);

        assert!(metrics.on_game_over(10));
        assert!(!metrics.on_game_over(5));
        assert!(metrics.on_game_over(15));

        assert_eq!(metrics.high_score, 15);
        assert_eq!(metrics.games_played, 3);
        assert!((metrics.mean_score() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(30);

        metrics.on_game_start();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);

        metrics.update();
        assert!(metrics.elapsed_time < Duration::from_secs(30));
    }
}
