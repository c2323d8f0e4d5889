//! cronscale-schedule — period rules and calendar matching.
//!
//! A period is written as
//!
//! ```text
//! <second> <minute> <hour> <day-of-month> <month> <day-of-week> <year> -> <count or expression>
//! ```
//!
//! and is active while the current instant matches every field of its
//! window. When several periods are active at once, [`resolve`] picks one
//! deterministically.
//!
//! # Architecture
//!
//! ```text
//! parse_rule()
//!   ├── CalendarWindow::parse() (7 fields, wrapping ranges, names)
//!   └── ExpressionTable::resolve() (literal or expression name)
//! Rule::is_active(now)
//! resolve(active rules) → winner
//! ```

pub mod error;
pub mod resolver;
pub mod rule;
pub mod window;

pub use error::{ScheduleError, ScheduleResult};
pub use resolver::resolve;
pub use rule::{DEFAULT_SEPARATOR, Rule, parse_rule};
pub use window::{CalendarWindow, Field, FieldKind};
