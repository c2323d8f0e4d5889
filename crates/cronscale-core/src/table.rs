//! Expression table — evaluated expression values for one evaluation.

use std::collections::BTreeMap;

/// Maps expression names to the integer each one evaluated to.
///
/// Built once per evaluation, before any rule or threshold is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionTable {
    values: BTreeMap<String, i64>,
}

impl ExpressionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve a reference token: an integer literal first, then an
    /// expression name. Both are matched after trimming whitespace.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        let token = token.trim();
        match token.parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => self.get(token),
        }
    }
}

impl FromIterator<(String, i64)> for ExpressionTable {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
