//! cronscale-strategy — schedule-driven scaling decisions.
//!
//! Given a check's strategy map, the current count, a metric series and the
//! current time, computes a target count and the direction of change.
//!
//! # Configuration
//!
//! ```text
//! count              = "2"                              # default target
//! hysteresis         = "2,4,6"                          # optional band
//! period_business    = "* * 9-17 * * mon-fri * -> 5"    # window -> count
//! period_peak        = "* * 12-13 * * * * -> busy"      # window -> expression
//! expression_busy    = "MetricsMax > 80 ? 8 : 6"
//! ```
//!
//! # Algorithm
//!
//! ```text
//! 1. evaluate expression_* into a table (failures are logged and skipped)
//! 2. default = count (literal or expression), 1 if unset
//! 3. band    = hysteresis thresholds (literal or expression)
//! 4. rules   = period_* active at now
//! 5. target  = winning rule's count, or default
//! 6. target  = band.apply(current, target)
//! ```

pub mod calculator;
pub mod clock;
pub mod config;
pub mod error;
pub mod hysteresis;
pub mod runner;
pub mod strategy;

pub use calculator::{FALLBACK_COUNT, TargetCalculator};
pub use clock::{Clock, FixedClock, LocalClock, UtcClock};
pub use config::{CheckConfig, StrategyOptions};
pub use error::{StrategyError, StrategyResult};
pub use hysteresis::HysteresisBand;
pub use runner::CheckRunner;
pub use strategy::{CronStrategy, STRATEGY_NAME, Strategy};
