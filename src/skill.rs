//! Skills.
//!
//! A skill definition ([`SkillAttack`] or [`SkillSpecial`]) is shared by
//! every character that knows it. A character's copy wraps the definition
//! together with the learned level and the current cooldown.

use crate::effect::EffectType;
use crate::error::ValidationError;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cooldown of attack skills, in rounds.
pub const ATTACK_SKILL_COOLDOWN: u32 = 3;
/// Cooldown of special skills, in rounds.
pub const SPECIAL_SKILL_COOLDOWN: u32 = 5;

/// Who a skill is aimed at.
///
/// Attack skills support `Single`, `Row` and `Column`; special skills support
/// `SelfOnly`, `Enemy`, `Party` and `EnemyParty`. Other combinations fail
/// when the skill is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTarget {
    Single,
    Row,
    Column,
    #[serde(rename = "self")]
    SelfOnly,
    Enemy,
    Party,
    EnemyParty,
}

impl SkillTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillTarget::Single => "single",
            SkillTarget::Row => "row",
            SkillTarget::Column => "column",
            SkillTarget::SelfOnly => "self",
            SkillTarget::Enemy => "enemy",
            SkillTarget::Party => "party",
            SkillTarget::EnemyParty => "enemy_party",
        }
    }
}

/// Parse a value such as `"60%"`. Values without a trailing `%` are ignored.
fn parse_percent(value: &str) -> Option<i32> {
    value.strip_suffix('%')?.trim().parse().ok()
}

fn validate_common(name: &str, levels: u32) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }
    if levels == 0 {
        return Err(ValidationError::OutOfRange {
            field: "levels",
            value: 0,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAttackData {
    pub id: u32,
    pub name: String,
    pub target: SkillTarget,
    pub levels: u32,
    pub base_damage: String,
    pub damage_growth: String,
    pub strikes: u32,
    #[serde(default)]
    pub hit_rate: Option<String>,
}

/// Definition of a damaging skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SkillAttackData", into = "SkillAttackData")]
pub struct SkillAttack {
    data: SkillAttackData,
}

impl SkillAttack {
    pub fn new(data: SkillAttackData) -> Result<Self, ValidationError> {
        validate_common(&data.name, data.levels)?;
        if data.strikes == 0 {
            return Err(ValidationError::OutOfRange {
                field: "strikes",
                value: 0,
            });
        }
        Ok(Self { data })
    }

    pub fn id(&self) -> u32 {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn target(&self) -> SkillTarget {
        self.data.target
    }

    pub fn levels(&self) -> u32 {
        self.data.levels
    }

    pub fn base_damage(&self) -> &str {
        &self.data.base_damage
    }

    pub fn damage_growth(&self) -> &str {
        &self.data.damage_growth
    }

    pub fn strikes(&self) -> u32 {
        self.data.strikes
    }

    pub fn hit_rate(&self) -> Option<&str> {
        self.data.hit_rate.as_deref()
    }

    pub fn cooldown(&self) -> u32 {
        ATTACK_SKILL_COOLDOWN
    }
}

impl TryFrom<SkillAttackData> for SkillAttack {
    type Error = ValidationError;

    fn try_from(data: SkillAttackData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<SkillAttack> for SkillAttackData {
    fn from(skill: SkillAttack) -> Self {
        skill.data
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSpecialData {
    pub id: u32,
    pub name: String,
    pub target: SkillTarget,
    pub levels: u32,
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default)]
    pub stat: Option<Stat>,
    pub value: i32,
    pub value_growth: i32,
    pub duration: u32,
}

/// Definition of a skill that attaches an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SkillSpecialData", into = "SkillSpecialData")]
pub struct SkillSpecial {
    data: SkillSpecialData,
}

impl SkillSpecial {
    pub fn new(data: SkillSpecialData) -> Result<Self, ValidationError> {
        validate_common(&data.name, data.levels)?;
        if data.effect_type.requires_stat() && data.stat.is_none() {
            return Err(ValidationError::MissingStat(
                data.name,
                data.effect_type.as_str(),
            ));
        }
        if data.duration == 0 {
            return Err(ValidationError::NonPositiveDuration(data.name));
        }
        if data.value < 0 || data.value_growth < 0 {
            return Err(ValidationError::OutOfRange {
                field: "value",
                value: i64::from(data.value.min(data.value_growth)),
            });
        }
        Ok(Self { data })
    }

    pub fn id(&self) -> u32 {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn target(&self) -> SkillTarget {
        self.data.target
    }

    pub fn levels(&self) -> u32 {
        self.data.levels
    }

    pub fn effect_type(&self) -> EffectType {
        self.data.effect_type
    }

    /// The stat to modify; always `None` for stun, poison and hide.
    pub fn stat(&self) -> Option<Stat> {
        if self.data.effect_type.requires_stat() {
            self.data.stat
        } else {
            None
        }
    }

    pub fn value(&self) -> i32 {
        self.data.value
    }

    pub fn value_growth(&self) -> i32 {
        self.data.value_growth
    }

    pub fn duration(&self) -> u32 {
        self.data.duration
    }

    pub fn cooldown(&self) -> u32 {
        SPECIAL_SKILL_COOLDOWN
    }

    pub fn effect_id(&self) -> String {
        format!("skill{}Effect", self.data.id)
    }
}

impl TryFrom<SkillSpecialData> for SkillSpecial {
    type Error = ValidationError;

    fn try_from(data: SkillSpecialData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<SkillSpecial> for SkillSpecialData {
    fn from(skill: SkillSpecial) -> Self {
        skill.data
    }
}

/// An attack skill as learned by a character.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use zzcombat::{CharacterAttackSkill, SkillAttack, SkillAttackData, SkillTarget};
///
/// let skill = SkillAttack::new(SkillAttackData {
///     id: 1,
///     name: "Double slash".to_string(),
///     target: SkillTarget::Single,
///     levels: 5,
///     base_damage: "60%".to_string(),
///     damage_growth: "20%".to_string(),
///     strikes: 2,
///     hit_rate: None,
/// })
/// .unwrap();
///
/// let learned = CharacterAttackSkill::new(Arc::new(skill), 2);
/// assert_eq!(learned.damage_percent(), 80);
/// assert_eq!(learned.hit_rate(), 100);
/// assert!(!learned.is_usable());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterAttackSkill {
    skill: Arc<SkillAttack>,
    level: u32,
    cooldown: u32,
}

impl CharacterAttackSkill {
    /// The level is clamped to `0..=levels`; the skill starts on cooldown.
    pub fn new(skill: Arc<SkillAttack>, level: u32) -> Self {
        let level = level.min(skill.levels());
        let cooldown = skill.cooldown();
        Self {
            skill,
            level,
            cooldown,
        }
    }

    pub fn skill(&self) -> &SkillAttack {
        &self.skill
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Damage multiplier in percent at the learned level.
    pub fn damage_percent(&self) -> i32 {
        let growth_steps = i32::try_from(self.level).unwrap_or(i32::MAX) - 1;
        let base = parse_percent(self.skill.base_damage()).unwrap_or(0);
        let growth = parse_percent(self.skill.damage_growth()).unwrap_or(0);
        base + growth * growth_steps
    }

    /// Hit-rate modifier in percent, 100 when unspecified.
    pub fn hit_rate(&self) -> i32 {
        self.skill.hit_rate().and_then(parse_percent).unwrap_or(100)
    }

    pub fn is_usable(&self) -> bool {
        self.cooldown < 1
    }

    pub fn reset_cooldown(&mut self) {
        self.cooldown = self.skill.cooldown();
    }

    pub fn decrease_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

/// A special skill as learned by a character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSpecialSkill {
    skill: Arc<SkillSpecial>,
    level: u32,
    cooldown: u32,
}

impl CharacterSpecialSkill {
    pub fn new(skill: Arc<SkillSpecial>, level: u32) -> Self {
        let level = level.min(skill.levels());
        let cooldown = skill.cooldown();
        Self {
            skill,
            level,
            cooldown,
        }
    }

    pub fn skill(&self) -> &SkillSpecial {
        &self.skill
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Effect strength at the learned level. Stuns carry no value.
    pub fn value(&self) -> i32 {
        if self.skill.effect_type() == EffectType::Stun {
            return 0;
        }
        let growth_steps = i32::try_from(self.level).unwrap_or(i32::MAX) - 1;
        self.skill.value() + self.skill.value_growth() * growth_steps
    }

    pub fn is_usable(&self) -> bool {
        self.cooldown < 1
    }

    pub fn reset_cooldown(&mut self) {
        self.cooldown = self.skill.cooldown();
    }

    pub fn decrease_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

/// A learned skill of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterSkill {
    Attack(CharacterAttackSkill),
    Special(CharacterSpecialSkill),
}

impl CharacterSkill {
    pub fn name(&self) -> &str {
        match self {
            CharacterSkill::Attack(skill) => skill.skill().name(),
            CharacterSkill::Special(skill) => skill.skill().name(),
        }
    }

    pub fn target(&self) -> SkillTarget {
        match self {
            CharacterSkill::Attack(skill) => skill.skill().target(),
            CharacterSkill::Special(skill) => skill.skill().target(),
        }
    }

    pub fn skill_type(&self) -> &'static str {
        match self {
            CharacterSkill::Attack(_) => "attack",
            CharacterSkill::Special(_) => "special",
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            CharacterSkill::Attack(skill) => skill.level(),
            CharacterSkill::Special(skill) => skill.level(),
        }
    }

    pub fn cooldown(&self) -> u32 {
        match self {
            CharacterSkill::Attack(skill) => skill.cooldown(),
            CharacterSkill::Special(skill) => skill.cooldown(),
        }
    }

    pub fn is_usable(&self) -> bool {
        match self {
            CharacterSkill::Attack(skill) => skill.is_usable(),
            CharacterSkill::Special(skill) => skill.is_usable(),
        }
    }

    pub fn reset_cooldown(&mut self) {
        match self {
            CharacterSkill::Attack(skill) => skill.reset_cooldown(),
            CharacterSkill::Special(skill) => skill.reset_cooldown(),
        }
    }

    pub fn decrease_cooldown(&mut self) {
        match self {
            CharacterSkill::Attack(skill) => skill.decrease_cooldown(),
            CharacterSkill::Special(skill) => skill.decrease_cooldown(),
        }
    }
}

impl From<CharacterAttackSkill> for CharacterSkill {
    fn from(skill: CharacterAttackSkill) -> Self {
        CharacterSkill::Attack(skill)
    }
}

impl From<CharacterSpecialSkill> for CharacterSkill {
    fn from(skill: CharacterSpecialSkill) -> Self {
        CharacterSkill::Special(skill)
    }
}
