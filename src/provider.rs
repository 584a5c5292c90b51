//! Effect providers.
//!
//! Providers produce combat-scoped effects for a character. Equipment and
//! pets are providers; callers may attach their own. Providers are queried
//! at the start of every round, so their output may change between rounds.

use crate::effect::CharacterEffect;

/// Trait for anything that grants effects during combat.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{CharacterEffect, CharacterEffectsProvider, EffectType, Stat, StaticEffectsProvider};
///
/// let aura = CharacterEffect::builder("aura", EffectType::Buff)
///     .stat(Stat::Defense)
///     .value(3)
///     .absolute()
///     .build()
///     .unwrap();
/// let provider = StaticEffectsProvider::new(vec![aura]);
///
/// assert_eq!(provider.combat_effects().len(), 1);
/// ```
pub trait CharacterEffectsProvider: Send + Sync {
    /// Effects to (re)apply this round.
    fn combat_effects(&self) -> Vec<CharacterEffect>;
}

/// A provider that always yields the same effects.
#[derive(Debug, Clone, Default)]
pub struct StaticEffectsProvider(Vec<CharacterEffect>);

impl StaticEffectsProvider {
    pub fn new(effects: Vec<CharacterEffect>) -> Self {
        Self(effects)
    }
}

impl CharacterEffectsProvider for StaticEffectsProvider {
    fn combat_effects(&self) -> Vec<CharacterEffect> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectType;

    #[test]
    fn test_static_provider_is_stable() {
        let stun = CharacterEffect::builder("stun", EffectType::Stun)
            .build()
            .unwrap();
        let provider = StaticEffectsProvider::new(vec![stun.clone()]);
        assert_eq!(provider.combat_effects(), vec![stun.clone()]);
        assert_eq!(provider.combat_effects(), vec![stun]);
    }

    #[test]
    fn test_empty_provider() {
        assert!(StaticEffectsProvider::default().combat_effects().is_empty());
    }
}
