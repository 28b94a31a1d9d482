pub mod config;
pub mod error;
pub mod geo;
pub mod schedule;
pub mod slug;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ParseTagError, ValidationError};
pub use schedule::{DailyInterval, OpeningHours};
pub use types::*;
