use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Value;
use crate::model::level::Progression;

/// Returned when a string does not name a member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed enumeration exchanged as its upper-case name.
///
/// Generates declaration-order ordinals, a case-insensitive total parser and
/// a conversion into a comparable [`Value`].
macro_rules! closed_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident as $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "UPPERCASE")]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn ordinal(self) -> u8 {
                self as u8
            }

            pub fn parse_ignore_case(raw: &str) -> Result<Self, UnknownVariant> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(raw.trim()))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }

            pub fn to_value(self) -> Value {
                Value::Enum {
                    kind: $kind,
                    ordinal: self.ordinal(),
                    name: self.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    pub enum Race as "race" {
        Human => "HUMAN",
        Dwarf => "DWARF",
        Elf => "ELF",
        Giant => "GIANT",
        Orc => "ORC",
        Troll => "TROLL",
        Hobbit => "HOBBIT",
    }
}

closed_enum! {
    pub enum Profession as "profession" {
        Warrior => "WARRIOR",
        Rogue => "ROGUE",
        Sorcerer => "SORCERER",
        Cleric => "CLERIC",
        Paladin => "PALADIN",
        Nazgul => "NAZGUL",
        Warlock => "WARLOCK",
        Druid => "DRUID",
    }
}

/// Columns of the player table that filters and ordering can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    Id,
    Name,
    Title,
    Race,
    Profession,
    Birthday,
    Banned,
    Experience,
    Level,
}

impl PlayerField {
    const ALL: [PlayerField; 9] = [
        PlayerField::Id,
        PlayerField::Name,
        PlayerField::Title,
        PlayerField::Race,
        PlayerField::Profession,
        PlayerField::Birthday,
        PlayerField::Banned,
        PlayerField::Experience,
        PlayerField::Level,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Title => "title",
            Self::Race => "race",
            Self::Profession => "profession",
            Self::Birthday => "birthday",
            Self::Banned => "banned",
            Self::Experience => "experience",
            Self::Level => "level",
        }
    }

    /// Resolves an order name such as `ID` or `experience`.
    pub fn parse_ignore_case(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for PlayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted game character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub birthday: DateTime<Utc>,
    pub banned: bool,
    pub experience: i64,
    pub level: i64,
    pub until_next_level: i64,
}

impl Player {
    pub fn value_of(&self, field: PlayerField) -> Value {
        match field {
            PlayerField::Id => Value::Integer(self.id),
            PlayerField::Name => Value::Text(self.name.clone()),
            PlayerField::Title => Value::Text(self.title.clone()),
            PlayerField::Race => self.race.to_value(),
            PlayerField::Profession => self.profession.to_value(),
            PlayerField::Birthday => Value::Timestamp(self.birthday),
            PlayerField::Banned => Value::Boolean(self.banned),
            PlayerField::Experience => Value::Integer(self.experience),
            PlayerField::Level => Value::Integer(self.level),
        }
    }

    /// Applies every field present in `form`, leaving the others untouched.
    ///
    /// Returns whether any field was present. Presence counts as a change even
    /// when the new value equals the current one. Derived attributes are not
    /// refreshed here; callers do that once the merge is complete.
    pub fn merge(&mut self, form: &PlayerForm) -> Result<bool, InvalidBirthday> {
        let mut changed = false;

        if let Some(name) = &form.name {
            self.name = name.clone();
            changed = true;
        }
        if let Some(title) = &form.title {
            self.title = title.clone();
            changed = true;
        }
        if let Some(race) = form.race {
            self.race = race;
            changed = true;
        }
        if let Some(profession) = form.profession {
            self.profession = profession;
            changed = true;
        }
        if let Some(birthday) = form.birthday {
            self.birthday = birthday_from_millis(birthday)?;
            changed = true;
        }
        if let Some(banned) = form.banned {
            self.banned = banned;
            changed = true;
        }
        if let Some(experience) = form.experience {
            self.experience = experience;
            changed = true;
        }

        Ok(changed)
    }

    pub fn refresh_progression(&mut self) {
        let progression = Progression::from_experience(self.experience);
        self.level = progression.level;
        self.until_next_level = progression.until_next_level;
    }
}

/// A player that has been validated but not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: DateTime<Utc>,
    pub banned: bool,
    pub experience: i64,
    pub level: i64,
    pub until_next_level: i64,
}

impl NewPlayer {
    /// Builds a record from a creation form and computes its level.
    ///
    /// Fails on the first missing required field, so the form should already
    /// have passed creation validation.
    pub fn from_form(form: &PlayerForm) -> Result<Self, MissingField> {
        let experience = form.experience.ok_or(MissingField("experience"))?;
        let birthday = form.birthday.ok_or(MissingField("birthday"))?;
        let progression = Progression::from_experience(experience);

        Ok(Self {
            name: form.name.clone().ok_or(MissingField("name"))?,
            title: form.title.clone().ok_or(MissingField("title"))?,
            race: form.race.ok_or(MissingField("race"))?,
            profession: form.profession.ok_or(MissingField("profession"))?,
            birthday: birthday_from_millis(birthday).map_err(|_| MissingField("birthday"))?,
            banned: form.banned.unwrap_or(false),
            experience,
            level: progression.level,
            until_next_level: progression.until_next_level,
        })
    }

    pub fn into_player(self, id: i64) -> Player {
        Player {
            id,
            name: self.name,
            title: self.title,
            race: self.race,
            profession: self.profession,
            birthday: self.birthday,
            banned: self.banned,
            experience: self.experience,
            level: self.level,
            until_next_level: self.until_next_level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is required")]
pub struct MissingField(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("birthday {0} is not a representable timestamp")]
pub struct InvalidBirthday(pub i64);

/// Client input for creating or partially updating a player.
///
/// Every field is optional; which ones are required depends on the operation.
/// Unknown JSON keys such as `level` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerForm {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<i64>,
    pub banned: Option<bool>,
    pub experience: Option<i64>,
}

pub fn birthday_from_millis(millis: i64) -> Result<DateTime<Utc>, InvalidBirthday> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or(InvalidBirthday(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form() -> PlayerForm {
        PlayerForm {
            name: Some("Ragnar".into()),
            title: Some("Jarl of Kattegat".into()),
            race: Some(Race::Human),
            profession: Some(Profession::Warrior),
            birthday: Some(Utc.with_ymd_and_hms(2010, 5, 1, 0, 0, 0).unwrap().timestamp_millis()),
            banned: None,
            experience: Some(750),
        }
    }

    #[test]
    fn enum_parse_is_case_insensitive() {
        assert_eq!(Race::parse_ignore_case("elf").unwrap(), Race::Elf);
        assert_eq!(
            Profession::parse_ignore_case("Nazgul").unwrap(),
            Profession::Nazgul
        );
    }

    #[test]
    fn enum_parse_reports_unknown_variant() {
        let err = Race::parse_ignore_case("vampire").unwrap_err();
        assert_eq!(err.kind, "race");
        assert_eq!(err.value, "vampire");
    }

    #[test]
    fn enums_serialize_as_upper_case_names() {
        assert_eq!(serde_json::to_string(&Race::Hobbit).unwrap(), "\"HOBBIT\"");
        let parsed: Profession = serde_json::from_str("\"DRUID\"").unwrap();
        assert_eq!(parsed, Profession::Druid);
        assert!(serde_json::from_str::<Race>("\"hobbit\"").is_err());
    }

    #[test]
    fn field_names_resolve_ignoring_case() {
        assert_eq!(PlayerField::parse_ignore_case("ID"), Some(PlayerField::Id));
        assert_eq!(
            PlayerField::parse_ignore_case("Experience"),
            Some(PlayerField::Experience)
        );
        assert_eq!(PlayerField::parse_ignore_case("untilNextLevel"), None);
    }

    #[test]
    fn new_player_defaults_banned_and_computes_level() {
        let player = NewPlayer::from_form(&form()).unwrap();
        assert!(!player.banned);
        assert_eq!(player.level, 3);
        assert_eq!(player.until_next_level, 250);
    }

    #[test]
    fn new_player_requires_fields() {
        let mut incomplete = form();
        incomplete.title = None;
        assert_eq!(
            NewPlayer::from_form(&incomplete).unwrap_err(),
            MissingField("title")
        );
    }

    #[test]
    fn merge_applies_only_present_fields() {
        let mut player = NewPlayer::from_form(&form()).unwrap().into_player(7);
        let patch = PlayerForm {
            title: Some("King".into()),
            banned: Some(true),
            ..PlayerForm::default()
        };

        assert!(player.merge(&patch).unwrap());
        assert_eq!(player.name, "Ragnar");
        assert_eq!(player.title, "King");
        assert!(player.banned);
        assert_eq!(player.id, 7);
    }

    #[test]
    fn merge_of_empty_form_reports_no_change() {
        let mut player = NewPlayer::from_form(&form()).unwrap().into_player(1);
        let before = player.clone();
        assert!(!player.merge(&PlayerForm::default()).unwrap());
        assert_eq!(player, before);
    }

    #[test]
    fn player_json_uses_camel_case_and_millis() {
        let player = NewPlayer::from_form(&form()).unwrap().into_player(1);
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["untilNextLevel"], 250);
        assert_eq!(json["birthday"], form().birthday.unwrap());
        assert_eq!(json["race"], "HUMAN");
    }
}
