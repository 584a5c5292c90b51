//! Teams and the positional grid.
//!
//! Members stand on a grid of rows and columns, both numbered from 1. A row
//! holds at most `max_row_size` characters. Melee attackers may only reach
//! the lowest row that still has a living member.

use crate::character::Character;
use crate::character_id::CharacterId;
use crate::config::CombatConfig;
use crate::error::PositionError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Default number of characters per row.
pub const DEFAULT_MAX_ROW_SIZE: u32 = 5;

/// The living character with the lowest hitpoints whose hitpoints are at or
/// below `threshold` of their maximum. Ties go to the earlier character.
pub fn lowest_hp_character<'a>(
    candidates: impl IntoIterator<Item = &'a Character>,
    threshold: f64,
) -> Option<&'a Character> {
    let mut lowest: Option<&Character> = None;
    for character in candidates {
        if !character.is_alive() {
            continue;
        }
        if f64::from(character.hitpoints()) > f64::from(character.max_hitpoints()) * threshold {
            continue;
        }
        if lowest.map_or(true, |current| character.hitpoints() < current.hitpoints()) {
            lowest = Some(character);
        }
    }
    lowest
}

/// A uniformly random living character among `candidates`.
pub fn random_character<'a, R: Rng + ?Sized>(
    candidates: impl IntoIterator<Item = &'a Character>,
    rng: &mut R,
) -> Option<&'a Character> {
    let living: Vec<&Character> = candidates.into_iter().filter(|c| c.is_alive()).collect();
    living.choose(rng).copied()
}

/// A named group of characters fighting on the same side.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{Character, CharacterData, Team};
///
/// let data = |id: &str| CharacterData {
///     id: id.into(),
///     name: id.to_string(),
///     level: 1,
///     strength: 10,
///     dexterity: 10,
///     constitution: 10,
///     intelligence: 10,
///     charisma: 10,
///     initiative_formula: "1d2+DEX/4".parse().unwrap(),
/// };
///
/// let mut team = Team::new("Heroes").with_max_row_size(2);
/// for id in ["a", "b", "c"] {
///     team.push(Character::new(data(id)).unwrap());
/// }
/// team.assign_positions().unwrap();
///
/// assert_eq!(team.get(&"c".into()).unwrap().position_row(), 2);
/// assert_eq!(team.row_to_attack(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Team {
    name: String,
    members: Vec<Character>,
    max_row_size: u32,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            max_row_size: DEFAULT_MAX_ROW_SIZE,
        }
    }

    /// A team using the row size from a combat configuration.
    pub fn with_config(name: impl Into<String>, config: &CombatConfig) -> Self {
        Self::new(name).with_max_row_size(config.max_row_size)
    }

    /// Rows hold at least one character.
    pub fn with_max_row_size(mut self, max_row_size: u32) -> Self {
        self.max_row_size = max_row_size.max(1);
        self
    }

    pub fn with_members(mut self, members: Vec<Character>) -> Self {
        self.members = members;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_row_size(&self) -> u32 {
        self.max_row_size
    }

    pub fn push(&mut self, character: Character) {
        self.members.push(character);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Character] {
        &mut self.members
    }

    pub fn get(&self, id: &CharacterId) -> Option<&Character> {
        self.members.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: &CharacterId) -> Option<&mut Character> {
        self.members.iter_mut().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: &CharacterId) -> bool {
        self.get(id).is_some()
    }

    /// Members matching a predicate, in team order.
    pub fn members_where<F>(&self, predicate: F) -> Vec<&Character>
    where
        F: Fn(&Character) -> bool,
    {
        self.members.iter().filter(|c| predicate(c)).collect()
    }

    pub fn alive_members(&self) -> Vec<&Character> {
        self.members_where(Character::is_alive)
    }

    /// Members that can take an action this round.
    pub fn usable_members(&self) -> Vec<&Character> {
        self.members_where(Character::can_act)
    }

    pub fn has_alive_members(&self) -> bool {
        self.members.iter().any(Character::is_alive)
    }

    /// Place a member on the grid.
    pub fn set_character_position(
        &mut self,
        id: &CharacterId,
        row: u32,
        column: u32,
    ) -> Result<(), PositionError> {
        if !self.contains(id) {
            return Err(PositionError::NotMember(id.clone()));
        }
        let in_row = self
            .members
            .iter()
            .filter(|c| c.position_row() == row)
            .count();
        if in_row >= self.max_row_size as usize {
            return Err(PositionError::RowFull { row });
        }
        if self
            .members
            .iter()
            .any(|c| c.position_row() == row && c.position_column() == column)
        {
            return Err(PositionError::PositionOccupied { row, column });
        }
        if let Some(character) = self.get_mut(id) {
            character.set_position(row, column);
        }
        Ok(())
    }

    /// Give every unplaced member a position.
    ///
    /// Members are walked in order. Columns advance with each member and a
    /// full row moves placement to column 1 of the next row. Members that
    /// already have a position keep it.
    pub fn assign_positions(&mut self) -> Result<(), PositionError> {
        let mut row = 1;
        let mut column = 0;
        let ids: Vec<CharacterId> = self.members.iter().map(|c| c.id().clone()).collect();
        for id in ids {
            column += 1;
            if self.get(&id).is_some_and(Character::has_position) {
                continue;
            }
            loop {
                match self.set_character_position(&id, row, column) {
                    Ok(()) => break,
                    Err(PositionError::RowFull { .. }) => {
                        row += 1;
                        column = 1;
                    }
                    Err(PositionError::PositionOccupied { .. }) => column += 1,
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }

    /// The lowest row with a living member.
    pub fn row_to_attack(&self) -> Option<u32> {
        self.members
            .iter()
            .filter(|c| c.is_alive())
            .map(Character::position_row)
            .min()
    }

    /// See [`lowest_hp_character`].
    pub fn lowest_hp_character(&self, threshold: f64) -> Option<&Character> {
        lowest_hp_character(&self.members, threshold)
    }

    /// See [`random_character`].
    pub fn random_character<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Character> {
        random_character(&self.members, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterData;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn member(id: u32) -> Character {
        Character::new(CharacterData {
            id: id.into(),
            name: format!("Player {id}"),
            level: 1,
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            charisma: 10,
            initiative_formula: "1d2+DEX/4".parse().unwrap(),
        })
        .unwrap()
    }

    fn team(size: u32) -> Team {
        Team::new("Team 1").with_members((1..=size).map(member).collect())
    }

    #[test]
    fn test_zero_row_size_is_raised() {
        assert_eq!(Team::new("t").with_max_row_size(0).max_row_size(), 1);
    }

    #[test]
    fn test_assign_keeps_existing_positions() {
        let mut team = team(3).with_max_row_size(2);
        team.set_character_position(&2u32.into(), 1, 1).unwrap();
        team.assign_positions().unwrap();
        let positions: Vec<(u32, u32)> = team
            .members()
            .iter()
            .map(|c| (c.position_row(), c.position_column()))
            .collect();
        assert_eq!(positions, vec![(1, 2), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_random_character_skips_dead() {
        let mut team = team(2);
        team.get_mut(&1u32.into()).unwrap().harm(100);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(
                team.random_character(&mut rng).unwrap().id(),
                &CharacterId::from(2u32)
            );
        }
        team.get_mut(&2u32.into()).unwrap().harm(100);
        assert!(team.random_character(&mut rng).is_none());
    }

    #[test]
    fn test_lowest_hp_prefers_first_on_tie() {
        let mut team = team(2);
        for character in team.members_mut() {
            character.harm(30);
        }
        assert_eq!(
            team.lowest_hp_character(0.5).unwrap().id(),
            &CharacterId::from(1u32)
        );
    }
}
