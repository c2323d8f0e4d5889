pub mod config;
pub mod table;
pub mod types;

pub use config::{ConfigError, CronScaleConfig, read_metrics};
pub use table::ExpressionTable;
pub use types::*;
