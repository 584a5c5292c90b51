//! Status registry.
//!
//! Statuses are derived from a character's effect list by named predicates.
//! Three are registered by default: `stunned`, `poisoned` and `hidden`.

use crate::effect::{CharacterEffect, EffectType};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const STATUS_STUNNED: &str = "stunned";
pub const STATUS_POISONED: &str = "poisoned";
pub const STATUS_HIDDEN: &str = "hidden";

/// Value produced by a status predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusValue {
    Flag(bool),
    Amount(i32),
}

impl StatusValue {
    /// A zero amount counts as inactive.
    pub fn is_active(self) -> bool {
        match self {
            StatusValue::Flag(flag) => flag,
            StatusValue::Amount(amount) => amount != 0,
        }
    }

    pub fn amount(self) -> i32 {
        match self {
            StatusValue::Flag(flag) => i32::from(flag),
            StatusValue::Amount(amount) => amount,
        }
    }
}

/// A predicate over a character's current effects.
pub type StatusPredicate = Arc<dyn Fn(&[CharacterEffect]) -> StatusValue + Send + Sync>;

/// Named status predicates.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{StatusRegistry, StatusValue, CharacterEffect, EffectType};
///
/// let registry = StatusRegistry::default();
/// let poison = CharacterEffect::builder("venom", EffectType::Poison)
///     .value(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.evaluate("poisoned", &[poison]), Some(StatusValue::Amount(5)));
/// assert_eq!(registry.evaluate("blessed", &[]), None);
/// ```
#[derive(Clone)]
pub struct StatusRegistry {
    predicates: HashMap<String, StatusPredicate>,
}

impl StatusRegistry {
    /// A registry without any predicates.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Register or replace a predicate.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&[CharacterEffect]) -> StatusValue + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Evaluate a status. Unknown names yield `None`.
    pub fn evaluate(&self, name: &str, effects: &[CharacterEffect]) -> Option<StatusValue> {
        self.predicates.get(name).map(|predicate| predicate(effects))
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(STATUS_STUNNED, |effects| {
            StatusValue::Flag(has_type(effects, EffectType::Stun))
        });
        registry.register(STATUS_POISONED, |effects| {
            StatusValue::Amount(
                effects
                    .iter()
                    .filter(|effect| effect.effect_type() == EffectType::Poison)
                    .map(CharacterEffect::value)
                    .sum(),
            )
        });
        registry.register(STATUS_HIDDEN, |effects| {
            StatusValue::Flag(has_type(effects, EffectType::Hide))
        });
        registry
    }
}

impl fmt::Debug for StatusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.predicates.keys().collect();
        names.sort();
        f.debug_struct("StatusRegistry")
            .field("statuses", &names)
            .finish()
    }
}

fn has_type(effects: &[CharacterEffect], effect_type: EffectType) -> bool {
    effects
        .iter()
        .any(|effect| effect.effect_type() == effect_type)
}
