pub mod level;
pub mod player;
pub mod validation;

pub use level::Progression;
pub use player::{
    InvalidBirthday, MissingField, NewPlayer, Player, PlayerField, PlayerForm, Profession, Race,
    UnknownVariant,
};
pub use validation::{Violation, check_create, check_update, is_valid_for_create, is_valid_for_update};
