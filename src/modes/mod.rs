pub mod human;
pub mod train;
pub mod watch;

pub use human::HumanMode;
pub use train::{EpisodeReport, TrainConfig, TrainMode};
pub use watch::WatchMode;
