//! Period rules — a calendar window plus a count reference.

use chrono::{Datelike, Timelike};

use cronscale_core::ExpressionTable;

use crate::error::{ScheduleError, ScheduleResult};
use crate::window::CalendarWindow;

/// Default token between a period's window and its reference.
pub const DEFAULT_SEPARATOR: &str = "->";

/// One parsed `period_<label>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The config key the rule came from, for diagnostics.
    pub key: String,
    pub window: CalendarWindow,
    /// The trimmed reference token; used as the tie-break priority.
    pub priority: String,
    /// The count the reference resolved to.
    pub count: i64,
}

impl Rule {
    /// Window text as written in the period.
    pub fn period(&self) -> &str {
        self.window.as_str()
    }

    /// Whether `now` falls inside this rule's window.
    pub fn is_active<T: Datelike + Timelike>(&self, now: &T) -> bool {
        self.window.contains(now)
    }
}

/// Parse a period value of the form `<window> <separator> <reference>`.
///
/// The value is split on the first occurrence of `separator`. The reference
/// is an integer literal or the name of an entry in `expressions`.
pub fn parse_rule(
    key: &str,
    value: &str,
    separator: &str,
    expressions: &ExpressionTable,
) -> ScheduleResult<Rule> {
    let (window, reference) = value
        .split_once(separator)
        .filter(|_| !separator.is_empty())
        .ok_or_else(|| ScheduleError::MissingSeparator {
            key: key.to_string(),
            separator: separator.to_string(),
            value: value.to_string(),
        })?;

    let window = CalendarWindow::parse(window).map_err(|e| ScheduleError::Window {
        key: key.to_string(),
        source: Box::new(e),
    })?;

    let priority = reference.trim().to_string();
    let count = expressions
        .resolve(&priority)
        .ok_or_else(|| ScheduleError::UnresolvedReference {
            key: key.to_string(),
            value: value.to_string(),
        })?;

    Ok(Rule {
        key: key.to_string(),
        window,
        priority,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expressions() -> ExpressionTable {
        [("busy".to_string(), 7)].into_iter().collect()
    }

    #[test]
    fn parses_literal_reference() {
        let rule = parse_rule("day", "* * 9-17 * * mon-fri * -> 5", "->", &expressions()).unwrap();
        assert_eq!(rule.key, "day");
        assert_eq!(rule.period(), "* * 9-17 * * mon-fri *");
        assert_eq!(rule.priority, "5");
        assert_eq!(rule.count, 5);

        let wednesday = NaiveDate::from_ymd_opt(2026, 10, 21)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert!(rule.is_active(&wednesday));
    }

    #[test]
    fn parses_expression_reference() {
        let rule = parse_rule("peak", "* * * * * * * ->  busy ", "->", &expressions()).unwrap();
        assert_eq!(rule.priority, "busy");
        assert_eq!(rule.count, 7);
    }

    #[test]
    fn custom_separator_splits_on_first_occurrence() {
        let rule = parse_rule("p", "* * * * * * * => 3 => 4", "=>", &expressions());
        // "3 => 4" is not a valid reference.
        assert!(matches!(rule, Err(ScheduleError::UnresolvedReference { .. })));

        let rule = parse_rule("p", "* * * * * * * => 3", "=>", &expressions()).unwrap();
        assert_eq!(rule.count, 3);
    }

    #[test]
    fn missing_separator() {
        assert!(matches!(
            parse_rule("p", "* * * * * * * 3", "->", &expressions()),
            Err(ScheduleError::MissingSeparator { .. })
        ));
        assert!(matches!(
            parse_rule("p", "* * * * * * * 3", "", &expressions()),
            Err(ScheduleError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn unknown_expression_names_the_key() {
        let err = parse_rule("night", "* * * * * * * -> idle", "->", &expressions()).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnresolvedReference {
                key: "night".to_string(),
                value: "* * * * * * * -> idle".to_string(),
            }
        );
        assert!(err.to_string().contains("night"));
    }

    #[test]
    fn invalid_window_names_the_key() {
        let err = parse_rule("bad", "* * 99 * * * * -> 1", "->", &expressions()).unwrap_err();
        assert!(matches!(&err, ScheduleError::Window { key, .. } if key == "bad"));
    }
}
