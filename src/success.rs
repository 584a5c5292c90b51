//! Hit and heal resolution.

use crate::character::Character;
use crate::skill::CharacterAttackSkill;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

pub const MIN_HIT_CHANCE: i32 = 15;
pub const MAX_HIT_CHANCE: i32 = 100;

/// Decides whether attacks land and heals succeed.
pub trait SuccessCalculator: Send + Sync {
    fn has_hit(
        &self,
        attacker: &Character,
        defender: &Character,
        skill: Option<&CharacterAttackSkill>,
    ) -> bool;

    fn has_healed(&self, healer: &Character) -> bool;
}

/// Chance in percent that `attacker` hits `defender`.
///
/// Hit rate is the attacker's hit stat, scaled by the skill's hit rate when
/// a skill is used. The chance is hit rate minus the defender's dodge,
/// clamped to `MIN_HIT_CHANCE..=MAX_HIT_CHANCE`.
pub fn hit_chance(
    attacker: &Character,
    defender: &Character,
    skill: Option<&CharacterAttackSkill>,
) -> i32 {
    let mut hit_rate = f64::from(attacker.hit());
    if let Some(skill) = skill {
        hit_rate = hit_rate / 100.0 * f64::from(skill.hit_rate());
    }
    let chance = (hit_rate - f64::from(defender.dodge())) as i32;
    chance.clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}

/// Chance in percent that `healer` succeeds: `INT * round(level / 5) + 30`.
pub fn heal_chance(healer: &Character) -> i32 {
    let level_factor = (f64::from(healer.level()) / 5.0).round() as i32;
    healer.intelligence() * level_factor + 30
}

/// Rolls `0..=100` against the hit and heal chances.
///
/// Defenders that cannot defend are always hit.
///
/// # Examples
///
/// ```rust
/// use zzcombat::RandomSuccessCalculator;
///
/// // Same seed, same rolls
/// let a = RandomSuccessCalculator::seeded(7);
/// let b = RandomSuccessCalculator::seeded(7);
/// assert_eq!(a.roll(), b.roll());
/// ```
pub struct RandomSuccessCalculator {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomSuccessCalculator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Draw a roll in `0..=100`.
    pub fn roll(&self) -> i32 {
        self.rng.lock().gen_range(0..=100)
    }
}

impl Default for RandomSuccessCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RandomSuccessCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSuccessCalculator").finish_non_exhaustive()
    }
}

impl SuccessCalculator for RandomSuccessCalculator {
    fn has_hit(
        &self,
        attacker: &Character,
        defender: &Character,
        skill: Option<&CharacterAttackSkill>,
    ) -> bool {
        if !defender.can_defend() {
            return true;
        }
        self.roll() <= hit_chance(attacker, defender, skill)
    }

    fn has_healed(&self, healer: &Character) -> bool {
        self.roll() <= heal_chance(healer)
    }
}

/// Every attack hits and every heal succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSuccessCalculator;

impl SuccessCalculator for StaticSuccessCalculator {
    fn has_hit(&self, _: &Character, _: &Character, _: Option<&CharacterAttackSkill>) -> bool {
        true
    }

    fn has_healed(&self, _: &Character) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterData;
    use crate::effect::{CharacterEffect, EffectType};
    use crate::stat::Stat;

    fn character(id: &str, dexterity: i32, level: u32) -> Character {
        Character::new(CharacterData {
            id: id.into(),
            name: id.to_string(),
            level,
            strength: 10,
            dexterity,
            constitution: 10,
            intelligence: 10,
            charisma: 10,
            initiative_formula: "1d2+DEX/4".parse().unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_hit_chance_is_clamped() {
        let strong = character("a", 60, 1);
        let weak = character("b", 1, 1);
        assert_eq!(hit_chance(&strong, &weak, None), MAX_HIT_CHANCE);
        assert_eq!(hit_chance(&weak, &strong, None), MIN_HIT_CHANCE);
    }

    #[test]
    fn test_hit_chance_in_range() {
        let a = character("a", 20, 1);
        let b = character("b", 10, 1);
        assert_eq!(hit_chance(&a, &b, None), 30);
    }

    #[test]
    fn test_heal_chance() {
        assert_eq!(heal_chance(&character("a", 10, 1)), 30);
        assert_eq!(heal_chance(&character("a", 10, 3)), 40);
        assert_eq!(heal_chance(&character("a", 10, 10)), 50);
    }

    #[test]
    fn test_stunned_defender_always_hit() {
        let attacker = character("a", 1, 1);
        let mut defender = character("b", 60, 1);
        defender.add_effect(
            CharacterEffect::builder("stun", EffectType::Stun)
                .build()
                .unwrap(),
        );
        let calculator = RandomSuccessCalculator::seeded(1);
        for _ in 0..50 {
            assert!(calculator.has_hit(&attacker, &defender, None));
        }
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let calculator = RandomSuccessCalculator::seeded(3);
        for _ in 0..200 {
            assert!((0..=100).contains(&calculator.roll()));
        }
    }

    #[test]
    fn test_static_calculator() {
        let a = character("a", 1, 1);
        let mut b = character("b", 60, 1);
        b.add_effect(
            CharacterEffect::builder("dodge", EffectType::Buff)
                .stat(Stat::Dodge)
                .value(100)
                .build()
                .unwrap(),
        );
        assert!(StaticSuccessCalculator.has_hit(&a, &b, None));
        assert!(StaticSuccessCalculator.has_healed(&a));
    }
}
