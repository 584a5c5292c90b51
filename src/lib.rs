//! # zzcombat - Deterministic, Round-Based Team Combat Engine
//!
//! A combat simulation engine for RPGs where two teams of characters fight
//! until a victory condition is met. It provides:
//! - **Deterministic** resolution when seeded (same input → same log)
//! - **Pluggable** strategies for success rolls, action selection, victory
//!   and healer selection
//! - **Effect-driven** stats: buffs, debuffs, stuns, poison and hiding
//! - **Phase-based** round pipeline with user-registrable hooks
//!
//! ## Core Concepts
//!
//! ### Round Pipeline
//!
//! ```text
//! CombatStart → [RoundStart → Round → RoundEnd]* → CombatEnd
//! ```
//!
//! 1. **RoundStart** refreshes provider effects, ticks durations, recalculates
//!    stats and applies poison
//! 2. **Round** lets every usable character act, highest initiative first
//! 3. **RoundEnd** ticks skill cooldowns and resets initiative
//!
//! The victory condition is checked after `RoundStart` and after `RoundEnd`.
//!
//! ### Stats
//!
//! Every character has five primary stats and six derived ones, each with a
//! base and a current value. Current values are recomputed from base values
//! and active effects; debuffs never take away more than 80% of a stat.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use zzcombat::*;
//!
//! let fighter = |id: &str, strength: i32| {
//!     Character::new(CharacterData {
//!         id: id.into(),
//!         name: id.to_string(),
//!         level: 1,
//!         strength,
//!         dexterity: 10,
//!         constitution: 10,
//!         intelligence: 10,
//!         charisma: 10,
//!         initiative_formula: "1d2+DEX/4".parse().unwrap(),
//!     })
//!     .unwrap()
//! };
//!
//! let mut combat = Combat::with_config(CombatConfig::new().with_seed(42))
//!     .unwrap()
//!     .with_success_calculator(Arc::new(StaticSuccessCalculator));
//! combat
//!     .set_duel_participants(fighter("Brute", 40), fighter("Weakling", 4))
//!     .unwrap();
//!
//! assert_eq!(combat.execute().unwrap(), 1);
//! assert_eq!(combat.log().result().unwrap().winner_name, "Brute");
//! ```
//!
//! ## Modules
//!
//! - [`character`] - Characters and stat recalculation
//! - [`effect`] - Effects and effect hooks
//! - [`team`] - Teams and the positional grid
//! - [`action`] - Combat actions
//! - [`selector`] - Action selection
//! - [`victory`] - Victory conditions and healer selection
//! - [`hook`] - Phase hooks
//! - [`combat`] - The combat scheduler
//! - [`log`] - Combat log
//! - [`error`] - Error types

pub mod action;
pub mod character;
pub mod character_id;
pub mod combat;
pub mod config;
pub mod effect;
pub mod equipment;
pub mod error;
pub mod hook;
pub mod initiative;
pub mod log;
pub mod pet;
pub mod provider;
pub mod selector;
pub mod skill;
pub mod stat;
pub mod status;
pub mod success;
pub mod team;
pub mod victory;

// Re-export main types for convenience
pub use character::{Character, CharacterData};
pub use character_id::CharacterId;
pub use combat::{Combat, TeamSide};
pub use config::CombatConfig;
pub use error::{CombatError, PositionError, ValidationError};
pub use stat::{Stat, StatBlock, StatPair};
pub use team::Team;

// Re-export effects and their providers
pub use effect::{CharacterEffect, DefaultEffectHook, EffectDuration, EffectHook, EffectType};
pub use equipment::{Durability, Equipment, EquipmentData, EquipmentSlot, WeaponType};
pub use pet::{Pet, PetData};
pub use provider::{CharacterEffectsProvider, StaticEffectsProvider};
pub use status::{StatusRegistry, StatusValue};

// Re-export skills and initiative
pub use initiative::{
    ConstantInitiativeFormulaParser, DiceInitiativeFormulaParser, InitiativeFormula,
    InitiativeFormulaParser,
};
pub use skill::{
    CharacterAttackSkill, CharacterSkill, CharacterSpecialSkill, SkillAttack, SkillAttackData,
    SkillSpecial, SkillSpecialData, SkillTarget,
};

// Re-export strategies
pub use action::{Attack, CombatAction, Heal, PoisonTick, SkillAttackAction, SkillSpecialAction};
pub use hook::{CombatHook, CombatPhase, HookRegistry};
pub use selector::{CombatActionSelector, DefaultCombatActionSelector, IdleActionSelector};
pub use success::{RandomSuccessCalculator, StaticSuccessCalculator, SuccessCalculator};
pub use victory::{HealerSelector, VictoryCondition};

// Re-export log types
pub use log::{
    ActionKind, CharacterSnapshot, CombatLogEntry, CombatLogger, CombatResult, LogRecord,
    ROUND_COMBAT_END,
};
