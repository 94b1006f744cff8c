//! Built-in scalar merge strategies
//!
//! Settings files and the command line cannot carry closures, so they name
//! one of the strategies below instead. Each strategy works on any backend
//! implementing [`ScalarAccess`]. When a strategy does not apply to the
//! operands it was registered for (for example `concat` on two booleans) the
//! left value is kept and a warning is logged.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::ScalarMerger;
use crate::error::{Error, Result};

/// Read and construct scalar values of a backend.
pub trait ScalarAccess: Clone {
    /// The value as an integer, if it is one.
    fn as_int(&self) -> Option<i64>;
    /// The value as a float. Integers convert as well.
    fn as_float(&self) -> Option<f64>;
    /// The value as text, if it is a string.
    fn as_text(&self) -> Option<&str>;
    fn from_int(value: i64) -> Self;
    fn from_float(value: f64) -> Self;
    fn from_text(value: String) -> Self;
}

/// A named way to combine two scalars.
///
/// Names are the kebab-case variant names, shared by settings files, the
/// command line, and `Display`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Strategy {
    /// Keep the left value
    KeepLeft,
    /// Replace with the right value
    KeepRight,
    /// Add numbers; integer overflow falls back to float
    Sum,
    /// Smaller of two numbers or strings
    Min,
    /// Larger of two numbers or strings
    Max,
    /// Concatenate two strings
    Concat,
}

impl Strategy {
    /// Combine two scalars.
    pub fn apply<V: ScalarAccess>(self, lhs: &V, rhs: &V) -> V {
        let merged = match self {
            Strategy::KeepLeft => Some(lhs.clone()),
            Strategy::KeepRight => Some(rhs.clone()),
            Strategy::Sum => sum(lhs, rhs),
            Strategy::Min => pick(lhs, rhs, |ordering| ordering.is_le()),
            Strategy::Max => pick(lhs, rhs, |ordering| ordering.is_ge()),
            Strategy::Concat => match (lhs.as_text(), rhs.as_text()) {
                (Some(a), Some(b)) => Some(V::from_text(format!("{}{}", a, b))),
                _ => None,
            },
        };

        merged.unwrap_or_else(|| {
            warn!(
                "Strategy '{}' does not apply to these operands, keeping the left value",
                self
            );
            lhs.clone()
        })
    }

    /// Wrap the strategy as a merger for [`crate::config::MergeConfig`].
    pub fn into_merger<V: ScalarAccess + 'static>(self) -> ScalarMerger<V> {
        Box::new(move |lhs: &V, rhs: &V| self.apply(lhs, rhs))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        <Strategy as ValueEnum>::from_str(wanted, false).map_err(|_| {
            let known: Vec<String> = Strategy::value_variants()
                .iter()
                .map(ToString::to_string)
                .collect();
            Error::Settings {
                message: format!(
                    "unknown strategy '{}' (expected one of: {})",
                    wanted,
                    known.join(", ")
                ),
            }
        })
    }
}

fn sum<V: ScalarAccess>(lhs: &V, rhs: &V) -> Option<V> {
    if let (Some(a), Some(b)) = (lhs.as_int(), rhs.as_int()) {
        return Some(match a.checked_add(b) {
            Some(total) => V::from_int(total),
            None => V::from_float(a as f64 + b as f64),
        });
    }
    Some(V::from_float(lhs.as_float()? + rhs.as_float()?))
}

/// Returns the left operand when `keep_left` accepts the ordering of left
/// against right, else the right operand.
fn pick<V, F>(lhs: &V, rhs: &V, keep_left: F) -> Option<V>
where
    V: ScalarAccess,
    F: Fn(std::cmp::Ordering) -> bool,
{
    let ordering = if let (Some(a), Some(b)) = (lhs.as_int(), rhs.as_int()) {
        a.cmp(&b)
    } else if let (Some(a), Some(b)) = (lhs.as_float(), rhs.as_float()) {
        a.partial_cmp(&b)?
    } else if let (Some(a), Some(b)) = (lhs.as_text(), rhs.as_text()) {
        a.cmp(b)
    } else {
        return None;
    };

    if keep_left(ordering) {
        Some(lhs.clone())
    } else {
        Some(rhs.clone())
    }
}
