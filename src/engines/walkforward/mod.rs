pub mod runner;
pub mod schedule;

pub use runner::WalkForwardRunner;
pub use schedule::WalkForwardSchedule;
