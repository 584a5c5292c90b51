//! Character stats.
//!
//! Every character carries eleven stats, each stored as a base value and a
//! current value. The five primary stats are set when the character is
//! built; the secondary stats are derived from them.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stat tracked on every character.
///
/// # Examples
///
/// ```rust
/// use zzcombat::Stat;
///
/// assert!(Stat::Strength.is_primary());
/// assert!(!Stat::Damage.is_primary());
/// assert_eq!("maxHitpoints".parse::<Stat>().unwrap(), Stat::MaxHitpoints);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Charisma,
    MaxHitpoints,
    Damage,
    Defense,
    Hit,
    Dodge,
    Initiative,
}

impl Stat {
    /// All stats, in storage order.
    pub const ALL: [Stat; 11] = [
        Stat::Strength,
        Stat::Dexterity,
        Stat::Constitution,
        Stat::Intelligence,
        Stat::Charisma,
        Stat::MaxHitpoints,
        Stat::Damage,
        Stat::Defense,
        Stat::Hit,
        Stat::Dodge,
        Stat::Initiative,
    ];

    /// The five primary stats.
    pub const PRIMARY: [Stat; 5] = [
        Stat::Strength,
        Stat::Dexterity,
        Stat::Constitution,
        Stat::Intelligence,
        Stat::Charisma,
    ];

    /// Returns true for strength, dexterity, constitution, intelligence and charisma.
    pub fn is_primary(self) -> bool {
        Self::PRIMARY.contains(&self)
    }

    /// The camel-case name used in serialized data.
    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Dexterity => "dexterity",
            Stat::Constitution => "constitution",
            Stat::Intelligence => "intelligence",
            Stat::Charisma => "charisma",
            Stat::MaxHitpoints => "maxHitpoints",
            Stat::Damage => "damage",
            Stat::Defense => "defense",
            Stat::Hit => "hit",
            Stat::Dodge => "dodge",
            Stat::Initiative => "initiative",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .iter()
            .copied()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStat(s.to_string()))
    }
}

/// Base and current value of a single stat.
///
/// The difference `current - base` is the gain produced by effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatPair {
    pub base: i32,
    pub current: i32,
}

impl StatPair {
    /// A pair whose base and current values are equal.
    pub fn new(value: i32) -> Self {
        Self {
            base: value,
            current: value,
        }
    }

    /// Gain applied on top of the base value.
    pub fn gain(&self) -> i32 {
        self.current - self.base
    }
}

/// Storage for all eleven stats of a character.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{Stat, StatBlock};
///
/// let mut block = StatBlock::default();
/// block.set_base(Stat::Strength, 10);
/// block.set_current(Stat::Strength, 12);
///
/// assert_eq!(block.get(Stat::Strength).gain(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pairs: [StatPair; 11],
}

impl StatBlock {
    pub fn get(&self, stat: Stat) -> StatPair {
        self.pairs[stat.index()]
    }

    pub fn base(&self, stat: Stat) -> i32 {
        self.pairs[stat.index()].base
    }

    pub fn current(&self, stat: Stat) -> i32 {
        self.pairs[stat.index()].current
    }

    pub fn set(&mut self, stat: Stat, pair: StatPair) {
        self.pairs[stat.index()] = pair;
    }

    pub fn set_base(&mut self, stat: Stat, value: i32) {
        self.pairs[stat.index()].base = value;
    }

    pub fn set_current(&mut self, stat: Stat, value: i32) {
        self.pairs[stat.index()].current = value;
    }

    /// Iterate over all stats with their values.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, StatPair)> + '_ {
        Stat::ALL.iter().map(move |stat| (*stat, self.get(*stat)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_names_round_trip() {
        for stat in Stat::ALL {
            assert_eq!(stat.as_str().parse::<Stat>().unwrap(), stat);
        }
    }

    #[test]
    fn test_unknown_stat() {
        assert_eq!(
            "luck".parse::<Stat>(),
            Err(ValidationError::UnknownStat("luck".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_string(&Stat::MaxHitpoints).unwrap();
        assert_eq!(json, "\"maxHitpoints\"");
    }

    #[test]
    fn test_stat_block_defaults_to_zero() {
        let block = StatBlock::default();
        assert!(block.iter().all(|(_, pair)| pair == StatPair::new(0)));
    }
}
