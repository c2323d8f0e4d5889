//! Calendar windows — the time part of a period.
//!
//! A window has seven whitespace-separated fields:
//!
//! ```text
//! second minute hour day-of-month month day-of-week year
//! ```
//!
//! A five-field window (`minute hour day-of-month month day-of-week`) is
//! also accepted; seconds and year are then wildcards.
//!
//! Each field is `*` (or `?`), a value, a range `a-b`, or a comma list of
//! those. Ranges and `*` may carry a step (`*/15`, `9-17/2`). A range whose
//! start is greater than its end wraps around the field (`22-2` for hours,
//! `fri-mon` for weekdays). Months and weekdays accept case-insensitive
//! three-letter names. Sunday is both 0 and 7.
//!
//! Years are limited to 1970-2099. A window naming a year outside that
//! range fails to parse, and a window with an explicit year list never
//! matches an instant after 2099. A `*` year matches any year.

use std::fmt;

use chrono::{Datelike, Timelike};

use crate::error::{ScheduleError, ScheduleResult};

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Second,
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::DayOfMonth,
        FieldKind::Month,
        FieldKind::DayOfWeek,
        FieldKind::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Second => "second",
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
            FieldKind::Year => "year",
        }
    }

    /// Inclusive bounds accepted in the field text.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            FieldKind::Second | FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (0, 7),
            FieldKind::Year => (1970, 2099),
        }
    }

    /// Parse a single value, accepting names where the field has them.
    fn value(&self, text: &str) -> Result<u32, String> {
        let (min, max) = self.bounds();
        let lower = text.to_ascii_lowercase();
        let named = match self {
            FieldKind::Month => MONTH_NAMES.iter().position(|n| *n == lower).map(|i| i as u32 + 1),
            FieldKind::DayOfWeek => WEEKDAY_NAMES.iter().position(|n| *n == lower).map(|i| i as u32),
            _ => None,
        };
        let value = match named {
            Some(v) => v,
            None => text
                .parse::<u32>()
                .map_err(|_| format!("'{text}' is not a valid value"))?,
        };
        if value < min || value > max {
            return Err(format!("{value} is outside {min}-{max}"));
        }
        Ok(value)
    }
}

/// One parsed field of a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    kind: FieldKind,
    /// `None` matches every value; otherwise indexed by `value - min`.
    allowed: Option<Vec<bool>>,
}

impl Field {
    pub fn parse(kind: FieldKind, text: &str) -> ScheduleResult<Self> {
        let invalid = |reason: String| ScheduleError::InvalidField {
            field: kind.name(),
            value: text.to_string(),
            reason,
        };

        let (min, max) = kind.bounds();
        let mut allowed = vec![false; (max - min + 1) as usize];

        for item in text.split(',') {
            if item == "*" || item == "?" {
                return Ok(Self::any(kind));
            }

            let (range, step) = match item.split_once('/') {
                Some((range, step)) => {
                    let step = step
                        .parse::<usize>()
                        .ok()
                        .filter(|s| *s > 0)
                        .ok_or_else(|| invalid(format!("invalid step '{step}'")))?;
                    (range, Some(step))
                }
                None => (item, None),
            };

            let (start, end) = if range == "*" || range == "?" {
                (min, max)
            } else if let Some((a, b)) = range.split_once('-') {
                (kind.value(a).map_err(&invalid)?, kind.value(b).map_err(&invalid)?)
            } else {
                let v = kind.value(range).map_err(&invalid)?;
                // `a/n` runs from `a` to the end of the field.
                (v, if step.is_some() { max } else { v })
            };

            for v in expand(start, end, min, max).step_by(step.unwrap_or(1)) {
                let v = if kind == FieldKind::DayOfWeek && v == 7 { 0 } else { v };
                allowed[(v - min) as usize] = true;
            }
        }

        Ok(Self {
            kind,
            allowed: Some(allowed),
        })
    }

    pub fn any(kind: FieldKind) -> Self {
        Self { kind, allowed: None }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_wildcard(&self) -> bool {
        self.allowed.is_none()
    }

    pub fn matches(&self, value: u32) -> bool {
        let Some(allowed) = &self.allowed else {
            return true;
        };
        let (min, _) = self.kind.bounds();
        value
            .checked_sub(min)
            .and_then(|i| allowed.get(i as usize))
            .copied()
            .unwrap_or(false)
    }
}

/// Values from `start` to `end` inclusive, wrapping past `max` back to `min`.
fn expand(start: u32, end: u32, min: u32, max: u32) -> impl Iterator<Item = u32> {
    let (head, tail) = if start <= end {
        (start..=end, 1..=0)
    } else {
        (start..=max, min..=end)
    };
    head.chain(tail)
}

/// A parsed seven-field calendar window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    text: String,
    fields: Vec<Field>,
}

impl CalendarWindow {
    pub fn parse(text: &str) -> ScheduleResult<Self> {
        let text = text.trim();
        let parts: Vec<&str> = text.split_whitespace().collect();
        let parts = match parts.len() {
            7 => parts,
            5 => {
                let mut full = Vec::with_capacity(7);
                full.push("*");
                full.extend_from_slice(&parts);
                full.push("*");
                full
            }
            n => return Err(ScheduleError::FieldCount(n, text.to_string())),
        };

        let fields = FieldKind::ALL
            .iter()
            .zip(parts)
            .map(|(kind, part)| Field::parse(*kind, part))
            .collect::<ScheduleResult<Vec<_>>>()?;

        Ok(Self {
            text: text.to_string(),
            fields,
        })
    }

    /// The window text as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn field(&self, kind: FieldKind) -> &Field {
        &self.fields[kind as usize]
    }

    /// Whether every field matches the corresponding component of `now`.
    pub fn contains<T: Datelike + Timelike>(&self, now: &T) -> bool {
        let Ok(year) = u32::try_from(now.year()) else {
            return false;
        };
        let components = [
            now.second(),
            now.minute(),
            now.hour(),
            now.day(),
            now.month(),
            now.weekday().num_days_from_sunday(),
            year,
        ];
        self.fields
            .iter()
            .zip(components)
            .all(|(field, value)| field.matches(value))
    }
}

impl fmt::Display for CalendarWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
