//! Combat log.
//!
//! Every resolved action is recorded as a [`CombatLogEntry`] holding
//! snapshots of both characters taken right after the action. Records are
//! grouped by round. The final result is stored under the sentinel round
//! [`ROUND_COMBAT_END`]. Rendering the log as text is left to the caller;
//! [`CombatLogger::to_json`] exports it for that purpose.

use crate::character::Character;
use crate::character_id::CharacterId;
use crate::error::CombatError;
use crate::stat::{Stat, StatBlock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Round number under which the combat result is logged.
pub const ROUND_COMBAT_END: u32 = 5000;

/// What kind of action produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack,
    SkillAttack,
    SkillSpecial,
    Healing,
    Poison,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Attack => "attack",
            ActionKind::SkillAttack => "skill_attack",
            ActionKind::SkillSpecial => "skill_special",
            ActionKind::Healing => "healing",
            ActionKind::Poison => "poison",
        }
    }
}

/// State of a character at the moment an entry was logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    pub hitpoints: i32,
    pub stats: StatBlock,
    pub position_row: u32,
    pub position_column: u32,
    pub stunned: bool,
}

impl From<&Character> for CharacterSnapshot {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id().clone(),
            name: character.name().to_string(),
            level: character.level(),
            hitpoints: character.hitpoints(),
            stats: character.stats().clone(),
            position_row: character.position_row(),
            position_column: character.position_column(),
            stunned: character.is_stunned(),
        }
    }
}

impl CharacterSnapshot {
    pub fn max_hitpoints(&self) -> i32 {
        self.stats.current(Stat::MaxHitpoints)
    }
}

/// One resolved action.
///
/// `character1` acted on `character2`. For poison ticks both are the
/// poisoned character. `name` is the skill name for skill actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub character1: CharacterSnapshot,
    pub character2: CharacterSnapshot,
    pub action: ActionKind,
    pub name: String,
    pub result: bool,
    pub amount: i32,
}

/// Final outcome of a combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub team1_name: String,
    pub team1_damage: i64,
    pub team2_name: String,
    pub team2_damage: i64,
    pub winner: u8,
    pub winner_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogRecord {
    Action(CombatLogEntry),
    CombatEnd(CombatResult),
}

/// Round-grouped record of a combat.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{CombatLogger, CombatResult};
///
/// let mut log = CombatLogger::new();
/// log.set_round(5000);
/// log.log_result(CombatResult {
///     team1_name: "Heroes".to_string(),
///     team1_damage: 12,
///     team2_name: "Goblins".to_string(),
///     team2_damage: 3,
///     winner: 1,
///     winner_name: "Heroes".to_string(),
/// });
///
/// assert_eq!(log.len(), 1);
/// assert!(log.to_json().unwrap().contains("Goblins"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatLogger {
    title: String,
    round: u32,
    rounds: BTreeMap<u32, Vec<LogRecord>>,
}

impl CombatLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Round new records are filed under.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    pub fn log(&mut self, entry: CombatLogEntry) {
        self.push(LogRecord::Action(entry));
    }

    pub fn log_result(&mut self, result: CombatResult) {
        self.push(LogRecord::CombatEnd(result));
    }

    fn push(&mut self, record: LogRecord) {
        self.rounds.entry(self.round).or_default().push(record);
    }

    /// Number of rounds with at least one record.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Records of one round, in logging order.
    pub fn round_records(&self, round: u32) -> &[LogRecord] {
        self.rounds.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rounds in ascending order with their records.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[LogRecord])> {
        self.rounds
            .iter()
            .map(|(round, records)| (*round, records.as_slice()))
    }

    /// All action entries in order.
    pub fn entries(&self) -> impl Iterator<Item = &CombatLogEntry> {
        self.rounds.values().flatten().filter_map(|record| match record {
            LogRecord::Action(entry) => Some(entry),
            LogRecord::CombatEnd(_) => None,
        })
    }

    /// The logged combat result, if the combat has ended.
    pub fn result(&self) -> Option<&CombatResult> {
        self.round_records(ROUND_COMBAT_END)
            .iter()
            .find_map(|record| match record {
                LogRecord::CombatEnd(result) => Some(result),
                LogRecord::Action(_) => None,
            })
    }

    pub fn to_json(&self) -> Result<String, CombatError> {
        Ok(serde_json::to_string(self)?)
    }
}
