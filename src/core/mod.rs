pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, TrainingPolicy, UsagePolicy, ValidationBand};
pub use error::{ProgressionError, Result};
pub use types::{MinionId, Rank, SpiritId};
