// ============================================================================
// Query descriptors
// ============================================================================
//
// The builder turns raw request parameters into these descriptors; record
// stores execute them. Nothing here touches storage.
//
// ============================================================================

pub mod builder;
pub mod params;

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

use crate::core::Value;
use crate::model::PlayerField;

pub use builder::{build_count_query, build_filter, build_list_query};
pub use params::{EffectiveParams, FilterParams};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid value '{value}' for filter '{key}'")]
    InvalidFilter { key: String, value: String },

    #[error("filter '{key}' expects an integer, got '{value}'")]
    InvalidNumber {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// A single condition; a query matches records satisfying all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals { field: PlayerField, value: Value },
    /// Case-sensitive substring match on a text column.
    Contains { field: PlayerField, needle: String },
    AtLeast { field: PlayerField, bound: Value },
    AtMost { field: PlayerField, bound: Value },
    /// Inclusive on both ends.
    Between {
        field: PlayerField,
        low: Value,
        high: Value,
    },
}

impl Predicate {
    pub fn field(&self) -> PlayerField {
        match self {
            Self::Equals { field, .. }
            | Self::Contains { field, .. }
            | Self::AtLeast { field, .. }
            | Self::AtMost { field, .. }
            | Self::Between { field, .. } => *field,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { field, value } => write!(f, "{field} = {value}"),
            Self::Contains { field, needle } => write!(f, "{field} LIKE '%{needle}%'"),
            Self::AtLeast { field, bound } => write!(f, "{field} >= {bound}"),
            Self::AtMost { field, bound } => write!(f, "{field} <= {bound}"),
            Self::Between { field, low, high } => {
                write!(f, "{field} BETWEEN {low} AND {high}")
            }
        }
    }
}

/// Ascending sort on one column. Equal keys keep id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: PlayerField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        let offset = u64::from(page_number) * u64::from(page_size);
        Self {
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
            limit: page_size as usize,
        }
    }
}

/// Filtered, sorted, paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub predicates: Vec<Predicate>,
    pub sort: SortKey,
    pub page: Page,
}

/// Number of records matching the predicates; no sort or pagination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountQuery {
    pub predicates: Vec<Predicate>,
}

fn join_predicates(predicates: &[Predicate]) -> String {
    predicates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}

impl fmt::Display for ListQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT players")?;
        if !self.predicates.is_empty() {
            write!(f, " WHERE {}", join_predicates(&self.predicates))?;
        }
        write!(
            f,
            " ORDER BY {} ASC LIMIT {} OFFSET {}",
            self.sort.field, self.page.limit, self.page.offset
        )
    }
}

impl fmt::Display for CountQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COUNT players")?;
        if !self.predicates.is_empty() {
            write!(f, " WHERE {}", join_predicates(&self.predicates))?;
        }
        Ok(())
    }
}
