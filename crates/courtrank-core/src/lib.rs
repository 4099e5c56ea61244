// Library root: the player ranking pipeline and the types it passes between
// stages.

pub mod error;
pub mod features;
pub mod loader;
pub mod pipeline;
pub mod ranking;
pub mod stats;
pub mod table;

pub use error::PipelineError;
pub use features::{Feature, FeatureSpec};
pub use pipeline::normalize::Normalization;
pub use ranking::{RankedPlayer, Ranking};
pub use table::{FeatureTable, PlayerRecord};
