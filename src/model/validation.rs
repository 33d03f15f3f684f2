use chrono::Datelike;
use thiserror::Error;

use crate::model::player::{PlayerForm, birthday_from_millis};

pub const MAX_NAME_LEN: usize = 12;
pub const MAX_TITLE_LEN: usize = 30;
pub const MAX_EXPERIENCE: i64 = 10_000_000;
pub const MIN_BIRTH_YEAR: i32 = 2000;
pub const MAX_BIRTH_YEAR: i32 = 3000;

/// The first rule a form breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be at most {max} characters, got {len}")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("experience must be between 0 and 10000000, got {0}")]
    ExperienceOutOfRange(i64),

    #[error("birthday {0} must fall in years 2000 to 3000")]
    BirthdayOutOfRange(i64),
}

/// Checks a form for creation: every field except `banned` must be present.
pub fn check_create(form: &PlayerForm) -> Result<(), Violation> {
    let name = form.name.as_deref().ok_or(Violation::Missing("name"))?;
    check_length("name", name, MAX_NAME_LEN)?;

    let title = form.title.as_deref().ok_or(Violation::Missing("title"))?;
    check_length("title", title, MAX_TITLE_LEN)?;

    form.race.ok_or(Violation::Missing("race"))?;
    form.profession.ok_or(Violation::Missing("profession"))?;

    let experience = form.experience.ok_or(Violation::Missing("experience"))?;
    check_experience(experience)?;

    let birthday = form.birthday.ok_or(Violation::Missing("birthday"))?;
    check_birthday(birthday)
}

/// Checks a partial update: absent fields are always acceptable.
pub fn check_update(form: &PlayerForm) -> Result<(), Violation> {
    if let Some(name) = form.name.as_deref() {
        check_length("name", name, MAX_NAME_LEN)?;
    }
    if let Some(title) = form.title.as_deref() {
        check_length("title", title, MAX_TITLE_LEN)?;
    }
    if let Some(experience) = form.experience {
        check_experience(experience)?;
    }
    if let Some(birthday) = form.birthday {
        check_birthday(birthday)?;
    }
    Ok(())
}

pub fn is_valid_for_create(form: &PlayerForm) -> bool {
    check_create(form).is_ok()
}

pub fn is_valid_for_update(form: &PlayerForm) -> bool {
    check_update(form).is_ok()
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), Violation> {
    let len = value.chars().count();
    if len > max {
        return Err(Violation::TooLong { field, max, len });
    }
    Ok(())
}

fn check_experience(experience: i64) -> Result<(), Violation> {
    if !(0..=MAX_EXPERIENCE).contains(&experience) {
        return Err(Violation::ExperienceOutOfRange(experience));
    }
    Ok(())
}

fn check_birthday(millis: i64) -> Result<(), Violation> {
    if millis < 0 {
        return Err(Violation::BirthdayOutOfRange(millis));
    }
    let year = birthday_from_millis(millis)
        .map_err(|_| Violation::BirthdayOutOfRange(millis))?
        .year();
    if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&year) {
        return Err(Violation::BirthdayOutOfRange(millis));
    }
    Ok(())
}
