//! Characters.
//!
//! A [`Character`] owns its stats, hitpoints, gear, skills and active
//! effects. Stats are recalculated from the base values and the effect list
//! whenever an effect is added or removed, and at the start of each round.

use crate::character_id::CharacterId;
use crate::effect::{CharacterEffect, EffectDuration, EffectType};
use crate::equipment::{Equipment, EquipmentSlot};
use crate::error::{CombatError, ValidationError};
use crate::initiative::{DiceInitiativeFormulaParser, InitiativeFormula, InitiativeFormulaParser};
use crate::pet::Pet;
use crate::provider::CharacterEffectsProvider;
use crate::skill::CharacterSkill;
use crate::stat::{Stat, StatBlock, StatPair};
use crate::status::{StatusRegistry, StatusValue, STATUS_HIDDEN, STATUS_POISONED, STATUS_STUNNED};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Debuffs on a stat can remove at most this share of its value.
pub const MAX_DEBUFF_RATIO: f64 = 0.8;

/// Plain data needed to build a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub charisma: i32,
    pub initiative_formula: InitiativeFormula,
}

/// A combatant.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{Character, CharacterData, CharacterEffect, EffectType, Stat};
///
/// let mut hero = Character::new(CharacterData {
///     id: "hero".into(),
///     name: "Hero".to_string(),
///     level: 1,
///     strength: 10,
///     dexterity: 10,
///     constitution: 10,
///     intelligence: 10,
///     charisma: 10,
///     initiative_formula: "1d2+DEX/4".parse().unwrap(),
/// })
/// .unwrap();
///
/// assert_eq!(hero.max_hitpoints(), 50);
/// assert_eq!(hero.damage(), 5);
/// assert_eq!(hero.hit(), 30);
///
/// let might = CharacterEffect::builder("might", EffectType::Buff)
///     .stat(Stat::Strength)
///     .value(20)
///     .build()
///     .unwrap();
/// hero.add_effect(might);
/// assert_eq!(hero.strength(), 12);
/// assert_eq!(hero.damage(), 6);
/// ```
#[derive(Clone)]
pub struct Character {
    id: CharacterId,
    name: String,
    level: u32,
    stats: StatBlock,
    hitpoints: i32,
    initiative_formula: InitiativeFormula,
    initiative_parser: Arc<dyn InitiativeFormulaParser>,
    initiative_roll: i32,
    position_row: u32,
    position_column: u32,
    equipment: Vec<Equipment>,
    pets: Vec<Pet>,
    skills: Vec<CharacterSkill>,
    effects: Vec<CharacterEffect>,
    effect_providers: Vec<Arc<dyn CharacterEffectsProvider>>,
    statuses: StatusRegistry,
}

impl Character {
    /// Build a character with full hitpoints and no gear.
    pub fn new(data: CharacterData) -> Result<Self, ValidationError> {
        if data.name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if data.id.as_str().is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        let primaries = [
            (Stat::Strength, data.strength),
            (Stat::Dexterity, data.dexterity),
            (Stat::Constitution, data.constitution),
            (Stat::Intelligence, data.intelligence),
            (Stat::Charisma, data.charisma),
        ];
        let mut stats = StatBlock::default();
        for (stat, value) in primaries {
            if value < 0 {
                return Err(ValidationError::OutOfRange {
                    field: stat.as_str(),
                    value: i64::from(value),
                });
            }
            stats.set(stat, StatPair::new(value));
        }
        let mut character = Self {
            id: data.id,
            name: data.name,
            level: data.level,
            stats,
            hitpoints: 0,
            initiative_formula: data.initiative_formula,
            initiative_parser: Arc::new(DiceInitiativeFormulaParser::new()),
            initiative_roll: 0,
            position_row: 0,
            position_column: 0,
            equipment: Vec::new(),
            pets: Vec::new(),
            skills: Vec::new(),
            effects: Vec::new(),
            effect_providers: Vec::new(),
            statuses: StatusRegistry::default(),
        };
        character.roll_initiative();
        character.hitpoints = character.max_hitpoints();
        Ok(character)
    }

    pub fn with_equipment(mut self, equipment: Vec<Equipment>) -> Self {
        self.equipment = equipment;
        self.recalculate_secondary_stats();
        self
    }

    pub fn with_pets(mut self, pets: Vec<Pet>) -> Self {
        self.pets = pets;
        self
    }

    pub fn with_skills(mut self, skills: Vec<CharacterSkill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_initiative_parser(mut self, parser: Arc<dyn InitiativeFormulaParser>) -> Self {
        self.set_initiative_parser(parser);
        self
    }

    pub fn with_effect_provider(mut self, provider: Arc<dyn CharacterEffectsProvider>) -> Self {
        self.add_effect_provider(provider);
        self
    }

    pub fn id(&self) -> &CharacterId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current value of a stat.
    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats.current(stat)
    }

    pub fn stat_base(&self, stat: Stat) -> i32 {
        self.stats.base(stat)
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn strength(&self) -> i32 {
        self.stat(Stat::Strength)
    }

    pub fn dexterity(&self) -> i32 {
        self.stat(Stat::Dexterity)
    }

    pub fn constitution(&self) -> i32 {
        self.stat(Stat::Constitution)
    }

    pub fn intelligence(&self) -> i32 {
        self.stat(Stat::Intelligence)
    }

    pub fn charisma(&self) -> i32 {
        self.stat(Stat::Charisma)
    }

    pub fn max_hitpoints(&self) -> i32 {
        self.stat(Stat::MaxHitpoints)
    }

    pub fn damage(&self) -> i32 {
        self.stat(Stat::Damage)
    }

    pub fn defense(&self) -> i32 {
        self.stat(Stat::Defense)
    }

    pub fn hit(&self) -> i32 {
        self.stat(Stat::Hit)
    }

    pub fn dodge(&self) -> i32 {
        self.stat(Stat::Dodge)
    }

    pub fn initiative(&self) -> i32 {
        self.stat(Stat::Initiative)
    }

    pub fn hitpoints(&self) -> i32 {
        self.hitpoints
    }

    pub fn initiative_formula(&self) -> &InitiativeFormula {
        &self.initiative_formula
    }

    pub fn set_initiative_parser(&mut self, parser: Arc<dyn InitiativeFormulaParser>) {
        self.initiative_parser = parser;
        self.roll_initiative();
    }

    pub fn position_row(&self) -> u32 {
        self.position_row
    }

    pub fn position_column(&self) -> u32 {
        self.position_column
    }

    /// Place the character on the grid without any checks.
    ///
    /// Use [`Team::set_character_position`](crate::Team::set_character_position)
    /// to validate against the rest of the team.
    pub fn set_position(&mut self, row: u32, column: u32) {
        self.position_row = row;
        self.position_column = column;
    }

    pub fn has_position(&self) -> bool {
        self.position_row >= 1 && self.position_column >= 1
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn item(&self, id: u32) -> Option<&Equipment> {
        self.equipment.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: u32) -> Option<&mut Equipment> {
        self.equipment.iter_mut().find(|item| item.id() == id)
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn pet(&self, id: u32) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id() == id)
    }

    pub fn pet_mut(&mut self, id: u32) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.id() == id)
    }

    /// Id of the first deployed pet.
    pub fn active_pet(&self) -> Option<u32> {
        self.pets.iter().find(|pet| pet.is_deployed()).map(Pet::id)
    }

    pub fn skills(&self) -> &[CharacterSkill] {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut [CharacterSkill] {
        &mut self.skills
    }

    /// Skills whose cooldown has run out.
    pub fn usable_skills(&self) -> impl Iterator<Item = &CharacterSkill> {
        self.skills.iter().filter(|skill| skill.is_usable())
    }

    /// Index into [`skills`](Self::skills) of the first usable skill.
    pub fn first_usable_skill(&self) -> Option<usize> {
        self.skills.iter().position(CharacterSkill::is_usable)
    }

    pub fn effects(&self) -> &[CharacterEffect] {
        &self.effects
    }

    pub fn effect_providers(&self) -> &[Arc<dyn CharacterEffectsProvider>] {
        &self.effect_providers
    }

    pub fn add_effect_provider(&mut self, provider: Arc<dyn CharacterEffectsProvider>) {
        self.effect_providers.push(provider);
    }

    /// Attach an effect and run its apply hooks.
    pub fn add_effect(&mut self, effect: CharacterEffect) {
        trace!(character = %self.id, effect = effect.id(), "effect applied");
        self.effects.push(effect.clone());
        for hook in effect.hooks() {
            hook.on_apply(self, &effect);
        }
    }

    /// Detach the first effect with the given id and run its remove hooks.
    pub fn remove_effect(&mut self, id: &str) -> Result<CharacterEffect, CombatError> {
        let index = self
            .effects
            .iter()
            .position(|effect| effect.id() == id)
            .ok_or_else(|| CombatError::EffectNotFound(id.to_string()))?;
        Ok(self.remove_effect_at(index))
    }

    fn remove_effect_at(&mut self, index: usize) -> CharacterEffect {
        let effect = self.effects.remove(index);
        trace!(character = %self.id, effect = effect.id(), "effect removed");
        for hook in effect.hooks() {
            hook.on_remove(self, &effect);
        }
        effect
    }

    fn remove_effects_where(&mut self, predicate: impl Fn(&CharacterEffect) -> bool) -> Vec<CharacterEffect> {
        let mut removed = Vec::new();
        while let Some(index) = self.effects.iter().position(&predicate) {
            removed.push(self.remove_effect_at(index));
        }
        removed
    }

    /// Count finite effects down by one round and remove the expired ones.
    pub fn tick_effect_durations(&mut self) -> Vec<CharacterEffect> {
        for effect in &mut self.effects {
            effect.tick();
        }
        self.remove_effects_where(|effect| effect.duration().is_expired())
    }

    /// Remove every effect that does not outlive the combat.
    pub fn remove_combat_effects(&mut self) -> Vec<CharacterEffect> {
        self.remove_effects_where(|effect| effect.duration() != EffectDuration::Forever)
    }

    /// Refresh the effects granted by equipment, pets and attached providers.
    ///
    /// An effect already present under the same id is removed first.
    pub fn apply_effect_providers(&mut self) {
        let effects: Vec<CharacterEffect> = self
            .equipment
            .iter()
            .flat_map(CharacterEffectsProvider::combat_effects)
            .chain(self.pets.iter().flat_map(CharacterEffectsProvider::combat_effects))
            .chain(
                self.effect_providers
                    .iter()
                    .flat_map(|provider| provider.combat_effects()),
            )
            .collect();
        for effect in effects {
            if let Some(index) = self.effects.iter().position(|e| e.id() == effect.id()) {
                self.remove_effect_at(index);
            }
            self.add_effect(effect);
        }
    }

    pub fn statuses(&self) -> &StatusRegistry {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusRegistry {
        &mut self.statuses
    }

    /// Evaluate a named status. Unknown names yield `None`.
    pub fn get_status(&self, name: &str) -> Option<StatusValue> {
        self.statuses.evaluate(name, &self.effects)
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.get_status(name).is_some_and(StatusValue::is_active)
    }

    pub fn is_stunned(&self) -> bool {
        self.has_status(STATUS_STUNNED)
    }

    pub fn is_hidden(&self) -> bool {
        self.has_status(STATUS_HIDDEN)
    }

    /// Total poison damage per round.
    pub fn poison(&self) -> i32 {
        self.get_status(STATUS_POISONED)
            .map(StatusValue::amount)
            .unwrap_or(0)
    }

    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0
    }

    pub fn can_act(&self) -> bool {
        !self.is_stunned() && self.is_alive()
    }

    pub fn can_defend(&self) -> bool {
        !self.is_stunned()
    }

    /// Lose up to `amount` hitpoints. Never drops below zero.
    pub fn harm(&mut self, amount: i32) {
        self.hitpoints -= amount.min(self.hitpoints).max(0);
    }

    /// Regain up to `amount` hitpoints. Never exceeds max hitpoints.
    pub fn heal(&mut self, amount: i32) {
        self.hitpoints += amount.min(self.max_hitpoints() - self.hitpoints).max(0);
    }

    pub(crate) fn restore_hitpoints(&mut self, hitpoints: i32) {
        self.hitpoints = hitpoints.min(self.max_hitpoints()).max(0);
    }

    /// Primary stat that drives damage, chosen by the last worn weapon.
    pub fn damage_stat(&self) -> Stat {
        self.worn_weapon()
            .and_then(Equipment::weapon_type)
            .map(|weapon_type| weapon_type.damage_stat())
            .unwrap_or(Stat::Strength)
    }

    pub fn has_ranged_weapon(&self) -> bool {
        self.worn_weapon().is_some_and(Equipment::is_ranged)
    }

    fn worn_weapon(&self) -> Option<&Equipment> {
        self.equipment
            .iter()
            .rev()
            .find(|item| item.is_worn() && item.slot() == EquipmentSlot::Weapon)
    }

    /// Roll a fresh initiative with the character's parser.
    ///
    /// The roll is kept until the next call, so recalculating stats in
    /// between reuses it.
    pub fn roll_initiative(&mut self) {
        let parser = Arc::clone(&self.initiative_parser);
        self.initiative_roll = parser.calculate_initiative(self);
        self.recalculate_secondary_stats();
    }

    /// Re-derive secondary base values from the current primary stats.
    ///
    /// Gains from effects (`current - base`) are carried over. Initiative
    /// takes the last roll from [`Character::roll_initiative`].
    pub fn recalculate_secondary_stats(&mut self) {
        let damage_stat = self.stat(self.damage_stat());
        let dexterity = self.dexterity();
        let constitution = self.constitution();
        let initiative = self.initiative_roll;
        let derived = [
            (Stat::Damage, (f64::from(damage_stat) / 2.0).round() as i32),
            (Stat::MaxHitpoints, constitution * 5),
            (Stat::Hit, dexterity * 3),
            (Stat::Dodge, dexterity * 3),
            (Stat::Initiative, initiative),
        ];
        for (stat, base) in derived {
            let gain = self.stats.get(stat).gain();
            self.stats.set(
                stat,
                StatPair {
                    base,
                    current: base + gain,
                },
            );
        }
    }

    /// Recompute all current stats from base values and active effects.
    ///
    /// Buffs are added in effect order. Debuffs are pooled per stat and the
    /// pool is capped at [`MAX_DEBUFF_RATIO`] of the buffed value.
    pub fn recalculate_stats(&mut self) {
        let mut values = [0.0f64; 11];
        let mut debuffs = [0.0f64; 11];
        for stat in Stat::ALL {
            values[stat.index()] = f64::from(self.stats.base(stat));
        }
        for effect in &self.effects {
            if effect.duration().is_expired() {
                continue;
            }
            let Some(stat) = effect.stat() else {
                continue;
            };
            let value = f64::from(effect.value());
            let bonus = if effect.is_value_absolute() {
                value
            } else {
                values[stat.index()] / 100.0 * value
            };
            match effect.effect_type() {
                EffectType::Buff => values[stat.index()] += bonus,
                EffectType::Debuff => debuffs[stat.index()] += bonus,
                _ => {}
            }
        }
        for stat in Stat::ALL {
            let value = values[stat.index()];
            let cap = (value * MAX_DEBUFF_RATIO).max(0.0);
            let current = value - debuffs[stat.index()].min(cap);
            self.stats.set_current(stat, current.round() as i32);
        }
        self.recalculate_secondary_stats();
        self.restore_hitpoints(self.hitpoints);
        trace!(character = %self.id, "stats recalculated");
    }

    /// Set current initiative to zero until the next recalculation.
    pub fn reset_initiative(&mut self) {
        self.stats.set_current(Stat::Initiative, 0);
    }
}

impl fmt::Debug for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Character")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("level", &self.level)
            .field("hitpoints", &self.hitpoints)
            .field("stats", &self.stats)
            .field("position", &(self.position_row, self.position_column))
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}
