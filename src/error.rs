//! Error types for combat resolution.
//!
//! Three families of errors exist:
//! - [`ValidationError`]: raised while constructing value objects
//!   (characters, effects, skills, equipment). Never occurs mid-combat.
//! - [`PositionError`]: raised by the positional grid of a [`Team`](crate::Team).
//!   Row-full and occupied conflicts are recovered by automatic assignment.
//! - [`CombatError`]: misuse of the scheduler and unsupported skill targets.

use crate::character_id::CharacterId;
use crate::stat::Stat;
use thiserror::Error;

/// Errors raised when a value object fails validation.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{Stat, ValidationError};
///
/// let err = ValidationError::NotPrimaryStat(Stat::Damage);
/// assert_eq!(err.to_string(), "Stat damage is not a primary stat");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field was empty.
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),

    /// A stat-bearing effect (buff/debuff) was created without a target stat.
    #[error("Effect {0} of type {1} requires a target stat")]
    MissingStat(String, &'static str),

    /// A finite effect duration must be at least one round.
    #[error("Effect {0} has a non-positive duration")]
    NonPositiveDuration(String),

    /// A stat name could not be recognised.
    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    /// The stat is not one of the five primary stats.
    #[error("Stat {0} is not a primary stat")]
    NotPrimaryStat(Stat),

    /// A numeric field was outside its allowed range.
    #[error("Field {field} has invalid value {value}")]
    OutOfRange { field: &'static str, value: i64 },

    /// Weapon types are only allowed on items in the weapon slot.
    #[error("Equipment {0} has a weapon type but is not a weapon")]
    WeaponTypeOnNonWeapon(u32),

    /// The initiative formula could not be parsed.
    #[error("Invalid initiative formula: {0}")]
    InvalidFormula(String),
}

/// Errors raised by the positional grid of a team.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PositionError {
    /// The character is not a member of the team.
    #[error("Character {0} is not a member of the team")]
    NotMember(CharacterId),

    /// The row already holds the maximum number of characters.
    #[error("Row {row} is full")]
    RowFull { row: u32 },

    /// Another character already stands on the cell.
    #[error("Position {row}:{column} is occupied")]
    PositionOccupied { row: u32, column: u32 },
}

/// Errors raised by the combat scheduler and its actions.
///
/// None of these are retried: they indicate misuse by the caller or a skill
/// configuration the engine refuses to silently ignore.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombatError {
    /// `execute` was called before teams were assigned.
    #[error("Teams are not set")]
    TeamsNotSet,

    /// Teams can be assigned only once per combat.
    #[error("Teams have already been set")]
    TeamsAlreadySet,

    /// The same character id appears more than once across both teams.
    #[error("Character {0} appears more than once in the combat")]
    DuplicateCharacter(CharacterId),

    /// The character does not take part in the combat.
    #[error("Character {0} does not take part in the combat")]
    UnknownCharacter(CharacterId),

    /// No effect with the given id is attached to the character.
    #[error("Effect {0} to remove was not found")]
    EffectNotFound(String),

    /// The skill target mode is not implemented for this action.
    #[error("Target {target} for {action} is not implemented")]
    UnsupportedTarget {
        action: &'static str,
        target: &'static str,
    },

    /// The combat configuration is invalid.
    #[error("Invalid combat configuration: {0}")]
    Config(String),

    /// A configuration or log document could not be read or written as JSON.
    ///
    /// Holds the rendered `serde_json` error so the enum stays `Clone` and
    /// `PartialEq`.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CombatError {
    fn from(err: serde_json::Error) -> Self {
        CombatError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CombatError::UnknownCharacter(CharacterId::from("hero"));
        assert!(err.to_string().contains("hero"));
    }

    #[test]
    fn test_unsupported_target_display() {
        let err = CombatError::UnsupportedTarget {
            action: "skill_attack",
            target: "party",
        };
        let display = err.to_string();
        assert!(display.contains("party"));
        assert!(display.contains("not implemented"));
    }

    #[test]
    fn test_position_error_converts() {
        let err: CombatError = PositionError::RowFull { row: 2 }.into();
        assert_eq!(err.to_string(), "Row 2 is full");
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let message = json_err.to_string();
        let err: CombatError = json_err.into();
        assert_eq!(err, CombatError::Serialization(message));
        assert!(err.to_string().starts_with("Serialization failed"));
    }
}
