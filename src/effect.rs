//! Character effects.
//!
//! An effect is a timed modifier attached to a character: a buff or debuff
//! on one stat, or a flag-like condition (stun, poison, hide) read through
//! the status registry. Effects are built with a builder that validates
//! them, then handed to [`Character::add_effect`](crate::Character::add_effect).

use crate::character::Character;
use crate::error::ValidationError;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Buff,
    Debuff,
    Stun,
    Poison,
    Hide,
}

impl EffectType {
    /// Types that do not modify a stat.
    pub const NO_STAT_TYPES: [EffectType; 3] =
        [EffectType::Stun, EffectType::Poison, EffectType::Hide];

    /// Buffs and debuffs must name the stat they modify.
    pub fn requires_stat(self) -> bool {
        !Self::NO_STAT_TYPES.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectType::Buff => "buff",
            EffectType::Debuff => "debuff",
            EffectType::Stun => "stun",
            EffectType::Poison => "poison",
            EffectType::Hide => "hide",
        }
    }
}

/// How long an effect lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDuration {
    /// Expires after the given number of rounds.
    Rounds(u32),
    /// Removed when the combat ends.
    Combat,
    /// Survives the end of combat.
    Forever,
}

impl EffectDuration {
    /// A finite duration that has run out.
    pub fn is_expired(self) -> bool {
        matches!(self, EffectDuration::Rounds(0))
    }

    /// Count one round down. Combat and forever durations are unaffected.
    pub fn tick(&mut self) {
        if let EffectDuration::Rounds(rounds) = self {
            *rounds = rounds.saturating_sub(1);
        }
    }
}

/// Callbacks run when an effect is attached to or removed from a character.
///
/// Both run after the effect list has been updated.
pub trait EffectHook: Send + Sync {
    fn on_apply(&self, character: &mut Character, effect: &CharacterEffect);

    fn on_remove(&self, character: &mut Character, effect: &CharacterEffect);
}

/// Recalculates stats and carries max-hitpoint changes over to the current
/// hitpoints.
///
/// Raising max hitpoints by `n` raises hitpoints by `n`; lowering it lowers
/// hitpoints by the same amount. Dead characters stay dead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEffectHook;

impl DefaultEffectHook {
    fn recalculate(character: &mut Character, effect: &CharacterEffect) {
        let hitpoints_before = character.hitpoints();
        let max_before = character.max_hitpoints();
        character.recalculate_stats();
        if effect.stat() != Some(Stat::MaxHitpoints) || hitpoints_before <= 0 {
            return;
        }
        let delta = character.max_hitpoints() - max_before;
        character.restore_hitpoints(hitpoints_before + delta);
    }
}

impl EffectHook for DefaultEffectHook {
    fn on_apply(&self, character: &mut Character, effect: &CharacterEffect) {
        Self::recalculate(character, effect);
    }

    fn on_remove(&self, character: &mut Character, effect: &CharacterEffect) {
        Self::recalculate(character, effect);
    }
}

fn default_hooks() -> Vec<Arc<dyn EffectHook>> {
    vec![Arc::new(DefaultEffectHook)]
}

/// Plain data form of an effect, used for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectData {
    pub id: String,
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default)]
    pub stat: Option<Stat>,
    pub value: i32,
    #[serde(default)]
    pub value_absolute: bool,
    pub duration: EffectDuration,
}

/// A validated effect attached to a character.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{CharacterEffect, EffectDuration, EffectType, Stat};
///
/// let effect = CharacterEffect::builder("blessing", EffectType::Buff)
///     .stat(Stat::Strength)
///     .value(10)
///     .duration(EffectDuration::Rounds(3))
///     .build()
///     .unwrap();
///
/// assert_eq!(effect.stat(), Some(Stat::Strength));
/// assert!(!effect.is_value_absolute());
///
/// // Buffs need a stat
/// assert!(CharacterEffect::builder("broken", EffectType::Buff).build().is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "EffectData", into = "EffectData")]
pub struct CharacterEffect {
    data: EffectData,
    hooks: Vec<Arc<dyn EffectHook>>,
}

impl CharacterEffect {
    /// Validate effect data.
    pub fn new(data: EffectData) -> Result<Self, ValidationError> {
        if data.id.is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }
        if data.effect_type.requires_stat() && data.stat.is_none() {
            return Err(ValidationError::MissingStat(
                data.id,
                data.effect_type.as_str(),
            ));
        }
        if data.duration == EffectDuration::Rounds(0) {
            return Err(ValidationError::NonPositiveDuration(data.id));
        }
        Ok(Self {
            data,
            hooks: default_hooks(),
        })
    }

    /// Start building an effect.
    pub fn builder(id: impl Into<String>, effect_type: EffectType) -> EffectBuilder {
        EffectBuilder {
            data: EffectData {
                id: id.into(),
                effect_type,
                stat: None,
                value: 0,
                value_absolute: false,
                duration: EffectDuration::Combat,
            },
            hooks: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn effect_type(&self) -> EffectType {
        self.data.effect_type
    }

    pub fn stat(&self) -> Option<Stat> {
        self.data.stat
    }

    pub fn value(&self) -> i32 {
        self.data.value
    }

    pub fn set_value(&mut self, value: i32) {
        self.data.value = value;
    }

    pub fn is_value_absolute(&self) -> bool {
        self.data.value_absolute
    }

    pub fn duration(&self) -> EffectDuration {
        self.data.duration
    }

    pub(crate) fn tick(&mut self) {
        self.data.duration.tick();
    }

    pub fn hooks(&self) -> &[Arc<dyn EffectHook>] {
        &self.hooks
    }

    pub fn data(&self) -> &EffectData {
        &self.data
    }
}

impl fmt::Debug for CharacterEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterEffect")
            .field("data", &self.data)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl PartialEq for CharacterEffect {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl TryFrom<EffectData> for CharacterEffect {
    type Error = ValidationError;

    fn try_from(data: EffectData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<CharacterEffect> for EffectData {
    fn from(effect: CharacterEffect) -> Self {
        effect.data
    }
}

/// Builder for [`CharacterEffect`].
pub struct EffectBuilder {
    data: EffectData,
    hooks: Option<Vec<Arc<dyn EffectHook>>>,
}

impl EffectBuilder {
    pub fn stat(mut self, stat: Stat) -> Self {
        self.data.stat = Some(stat);
        self
    }

    pub fn value(mut self, value: i32) -> Self {
        self.data.value = value;
        self
    }

    /// Treat the value as an absolute amount instead of a percentage.
    pub fn absolute(mut self) -> Self {
        self.data.value_absolute = true;
        self
    }

    /// Defaults to [`EffectDuration::Combat`].
    pub fn duration(mut self, duration: EffectDuration) -> Self {
        self.data.duration = duration;
        self
    }

    /// Replace the default hooks.
    pub fn hooks(mut self, hooks: Vec<Arc<dyn EffectHook>>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn build(self) -> Result<CharacterEffect, ValidationError> {
        let mut effect = CharacterEffect::new(self.data)?;
        if let Some(hooks) = self.hooks {
            effect.hooks = hooks;
        }
        Ok(effect)
    }
}
