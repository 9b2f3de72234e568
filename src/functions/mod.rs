pub mod registry;
pub mod scores;
pub mod traits;

pub use registry::{RegisteredScore, ScoringRegistry};
pub use traits::{score_fn, ScoreArgs, ScoreDescriptor, ScoreSignature, ScoringFunction};
