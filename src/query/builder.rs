use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::core::Value;
use crate::model::{PlayerField, Profession, Race};
use crate::query::params::{EffectiveParams, FilterParams, ORDER, PAGE_NUMBER, PAGE_SIZE};
use crate::query::{CountQuery, ListQuery, Page, Predicate, QueryError, SortKey};

const BANNED: &str = "banned";
const NAME: &str = "name";
const TITLE: &str = "title";
const RACE: &str = "race";
const PROFESSION: &str = "profession";
const AFTER: &str = "after";
const BEFORE: &str = "before";
const MIN_EXPERIENCE: &str = "minExperience";
const MAX_EXPERIENCE: &str = "maxExperience";
const MIN_LEVEL: &str = "minLevel";
const MAX_LEVEL: &str = "maxLevel";

/// Builds a sorted, paginated listing query from request parameters.
pub fn build_list_query(params: &FilterParams) -> Result<ListQuery, QueryError> {
    let effective = params.effective();

    let field = PlayerField::parse_ignore_case(effective.order).ok_or_else(|| {
        QueryError::InvalidFilter {
            key: ORDER.to_string(),
            value: effective.order.to_string(),
        }
    })?;
    let page_number = parse_number::<u32>(PAGE_NUMBER, effective.page_number)?;
    let page_size = parse_number::<u32>(PAGE_SIZE, effective.page_size)?;

    Ok(ListQuery {
        predicates: collect_predicates(&effective)?,
        sort: SortKey { field },
        page: Page::new(page_number, page_size),
    })
}

/// Builds the counting twin of [`build_list_query`].
///
/// Ordering and paging parameters are ignored, but the filters are parsed
/// with the same rules, so a bad filter fails both the same way.
pub fn build_count_query(params: &FilterParams) -> Result<CountQuery, QueryError> {
    Ok(CountQuery {
        predicates: build_filter(params)?,
    })
}

/// Translates the recognized filter keys into predicates, in a fixed order.
pub fn build_filter(params: &FilterParams) -> Result<Vec<Predicate>, QueryError> {
    collect_predicates(&params.effective())
}

fn collect_predicates(params: &EffectiveParams<'_>) -> Result<Vec<Predicate>, QueryError> {
    let mut predicates = Vec::new();

    if let Some(raw) = params.get(BANNED) {
        predicates.push(Predicate::Equals {
            field: PlayerField::Banned,
            value: Value::Boolean(parse_flag(raw)),
        });
    }

    for (key, field) in [(NAME, PlayerField::Name), (TITLE, PlayerField::Title)] {
        if let Some(raw) = params.get(key) {
            predicates.push(Predicate::Contains {
                field,
                needle: raw.to_string(),
            });
        }
    }

    if let Some(raw) = params.get(RACE) {
        let race = Race::parse_ignore_case(raw).map_err(|_| invalid(RACE, raw))?;
        predicates.push(Predicate::Equals {
            field: PlayerField::Race,
            value: race.to_value(),
        });
    }

    if let Some(raw) = params.get(PROFESSION) {
        let profession =
            Profession::parse_ignore_case(raw).map_err(|_| invalid(PROFESSION, raw))?;
        predicates.push(Predicate::Equals {
            field: PlayerField::Profession,
            value: profession.to_value(),
        });
    }

    if let Some(raw) = params.get(AFTER) {
        predicates.push(Predicate::AtLeast {
            field: PlayerField::Birthday,
            bound: parse_timestamp(AFTER, raw)?,
        });
    }

    if let Some(raw) = params.get(BEFORE) {
        predicates.push(Predicate::AtMost {
            field: PlayerField::Birthday,
            bound: parse_timestamp(BEFORE, raw)?,
        });
    }

    push_range(
        &mut predicates,
        params,
        PlayerField::Experience,
        MIN_EXPERIENCE,
        MAX_EXPERIENCE,
    )?;
    push_range(
        &mut predicates,
        params,
        PlayerField::Level,
        MIN_LEVEL,
        MAX_LEVEL,
    )?;

    Ok(predicates)
}

/// A lower bound, optionally paired with an upper bound, collapses into one
/// `Between`; an upper bound alone becomes `AtMost`.
fn push_range(
    predicates: &mut Vec<Predicate>,
    params: &EffectiveParams<'_>,
    field: PlayerField,
    min_key: &str,
    max_key: &str,
) -> Result<(), QueryError> {
    let predicate = match (params.get(min_key), params.get(max_key)) {
        (Some(min), Some(max)) => Predicate::Between {
            field,
            low: Value::Integer(parse_number(min_key, min)?),
            high: Value::Integer(parse_number(max_key, max)?),
        },
        (Some(min), None) => Predicate::AtLeast {
            field,
            bound: Value::Integer(parse_number(min_key, min)?),
        },
        (None, Some(max)) => Predicate::AtMost {
            field,
            bound: Value::Integer(parse_number(max_key, max)?),
        },
        (None, None) => return Ok(()),
    };
    predicates.push(predicate);
    Ok(())
}

/// Only `true`, in any case, is true; every other value reads as false.
fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, QueryError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    raw.parse::<T>().map_err(|source| QueryError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
        source,
    })
}

fn parse_timestamp(key: &str, raw: &str) -> Result<Value, QueryError> {
    let millis = parse_number::<i64>(key, raw)?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(Value::Timestamp)
        .ok_or_else(|| invalid(key, raw))
}

fn invalid(key: &str, raw: &str) -> QueryError {
    QueryError::InvalidFilter {
        key: key.to_string(),
        value: raw.to_string(),
    }
}
