//! Initiative formulas.
//!
//! A formula has the shape `XdY+TERM/N`: X dice with Y sides, plus a term
//! divided by N. The term is either a number or one of the stat tokens
//! `STR`, `DEX`, `CON`, `INT`, `CHAR`, which read the character's current
//! primary stats.

use crate::character::Character;
use crate::error::ValidationError;
use crate::stat::Stat;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The term added to the dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaTerm {
    Stat(Stat),
    Constant(i32),
}

impl FormulaTerm {
    fn token(self) -> String {
        match self {
            FormulaTerm::Stat(Stat::Strength) => "STR".to_string(),
            FormulaTerm::Stat(Stat::Dexterity) => "DEX".to_string(),
            FormulaTerm::Stat(Stat::Constitution) => "CON".to_string(),
            FormulaTerm::Stat(Stat::Intelligence) => "INT".to_string(),
            FormulaTerm::Stat(Stat::Charisma) => "CHAR".to_string(),
            FormulaTerm::Stat(stat) => stat.to_string(),
            FormulaTerm::Constant(value) => value.to_string(),
        }
    }

    fn parse(token: &str) -> Option<Self> {
        let stat = match token {
            "STR" => Stat::Strength,
            "DEX" => Stat::Dexterity,
            "CON" => Stat::Constitution,
            "INT" => Stat::Intelligence,
            "CHAR" => Stat::Charisma,
            _ => return token.parse().ok().map(FormulaTerm::Constant),
        };
        Some(FormulaTerm::Stat(stat))
    }
}

/// A parsed initiative formula.
///
/// # Examples
///
/// ```rust
/// use zzcombat::InitiativeFormula;
///
/// let formula: InitiativeFormula = "1d2+DEX/4".parse().unwrap();
/// assert_eq!(formula.dice(), 1);
/// assert_eq!(formula.sides(), 2);
/// assert_eq!(formula.to_string(), "1d2+DEX/4");
///
/// assert!("d6".parse::<InitiativeFormula>().is_err());
/// assert!("1d6+DEX/0".parse::<InitiativeFormula>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InitiativeFormula {
    dice: u32,
    sides: u32,
    addend: Option<(FormulaTerm, i32)>,
}

impl InitiativeFormula {
    pub fn dice(&self) -> u32 {
        self.dice
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Term and divisor of the `+TERM/N` part, if present.
    pub fn addend(&self) -> Option<(FormulaTerm, i32)> {
        self.addend
    }

    /// Value of the `+TERM/N` part for a character, truncated toward zero.
    pub fn addend_value(&self, character: &Character) -> i32 {
        match self.addend {
            Some((FormulaTerm::Stat(stat), divisor)) => character.stat(stat) / divisor,
            Some((FormulaTerm::Constant(value), divisor)) => value / divisor,
            None => 0,
        }
    }
}

impl FromStr for InitiativeFormula {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormula(s.to_string());
        let (roll, addend) = match s.split_once('+') {
            Some((roll, addend)) => (roll, Some(addend)),
            None => (s, None),
        };
        let (dice, sides) = roll.trim().split_once('d').ok_or_else(invalid)?;
        let dice: u32 = dice.parse().map_err(|_| invalid())?;
        let sides: u32 = sides.parse().map_err(|_| invalid())?;
        if dice == 0 || sides == 0 {
            return Err(invalid());
        }
        let addend = match addend {
            Some(addend) => {
                let (term, divisor) = addend.trim().split_once('/').ok_or_else(invalid)?;
                let term = FormulaTerm::parse(term).ok_or_else(invalid)?;
                let divisor: i32 = divisor.parse().map_err(|_| invalid())?;
                if divisor <= 0 {
                    return Err(invalid());
                }
                Some((term, divisor))
            }
            None => None,
        };
        Ok(Self {
            dice,
            sides,
            addend,
        })
    }
}

impl TryFrom<String> for InitiativeFormula {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InitiativeFormula> for String {
    fn from(formula: InitiativeFormula) -> Self {
        formula.to_string()
    }
}

impl fmt::Display for InitiativeFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.dice, self.sides)?;
        if let Some((term, divisor)) = self.addend {
            write!(f, "+{}/{}", term.token(), divisor)?;
        }
        Ok(())
    }
}

/// Computes a character's base initiative.
pub trait InitiativeFormulaParser: Send + Sync {
    fn calculate_initiative(&self, character: &Character) -> i32;
}

/// Rolls the dice of the character's formula.
pub struct DiceInitiativeFormulaParser {
    rng: Mutex<ChaCha8Rng>,
}

impl DiceInitiativeFormulaParser {
    /// A parser seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// A parser with reproducible rolls.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for DiceInitiativeFormulaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiceInitiativeFormulaParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceInitiativeFormulaParser").finish_non_exhaustive()
    }
}

impl InitiativeFormulaParser for DiceInitiativeFormulaParser {
    fn calculate_initiative(&self, character: &Character) -> i32 {
        let formula = character.initiative_formula();
        let mut rng = self.rng.lock();
        let rolled: u32 = (0..formula.dice())
            .map(|_| rng.gen_range(1..=formula.sides()))
            .sum();
        i32::try_from(rolled)
            .unwrap_or(i32::MAX)
            .saturating_add(formula.addend_value(character))
    }
}

/// Always returns the same initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantInitiativeFormulaParser(pub i32);

impl InitiativeFormulaParser for ConstantInitiativeFormulaParser {
    fn calculate_initiative(&self, _character: &Character) -> i32 {
        self.0
    }
}
