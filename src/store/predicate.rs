use std::cmp::Ordering;

use crate::core::{Result, StoreError, Value};
use crate::model::Player;
use crate::query::Predicate;
use crate::store::pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Evaluates query predicates against a single player record.
pub struct PredicateEvaluator;

impl PredicateEvaluator {
    /// True when the player satisfies every predicate. An empty list matches.
    pub fn matches_all(&self, player: &Player, predicates: &[Predicate]) -> Result<bool> {
        for predicate in predicates {
            if !self.matches(player, predicate)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn matches(&self, player: &Player, predicate: &Predicate) -> Result<bool> {
        let actual = player.value_of(predicate.field());

        match predicate {
            Predicate::Equals { value, .. } => self.compare(&actual, value, CompareOp::Eq),
            Predicate::AtLeast { bound, .. } => self.compare(&actual, bound, CompareOp::GtEq),
            Predicate::AtMost { bound, .. } => self.compare(&actual, bound, CompareOp::LtEq),
            Predicate::Between { low, high, .. } => {
                let ge_low = self.compare(&actual, low, CompareOp::GtEq)?;
                let le_high = self.compare(&actual, high, CompareOp::LtEq)?;
                Ok(ge_low && le_high)
            }
            Predicate::Contains { field, needle } => {
                let text = actual.as_str().ok_or_else(|| {
                    StoreError::TypeMismatch(format!(
                        "substring match needs a text column, {field} is {}",
                        actual.type_name()
                    ))
                })?;
                pattern::eval_like(text, &pattern::contains_pattern(needle), true)
            }
        }
    }

    pub fn compare(&self, left: &Value, right: &Value, op: CompareOp) -> Result<bool> {
        let ordering = left.compare(right)?;
        Ok(match op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        })
    }
}
