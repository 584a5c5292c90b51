//! Combat actions.
//!
//! An action is something a character does on its turn. The action
//! selector asks each registered action whether it applies and executes the
//! first one that does. Actions address characters by id and reach them
//! through the [`Combat`], so they can read and mutate both sides.

use crate::character::Character;
use crate::character_id::CharacterId;
use crate::combat::Combat;
use crate::effect::{CharacterEffect, EffectDuration};
use crate::error::CombatError;
use crate::log::ActionKind;
use crate::skill::{CharacterAttackSkill, CharacterSkill, CharacterSpecialSkill, SkillTarget};
use std::sync::Arc;

/// Something a character can do on its turn.
///
/// Lower priorities are considered first by the default selector.
pub trait CombatAction: Send + Sync {
    fn kind(&self) -> ActionKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn priority(&self) -> i32;

    /// Whether the character should take this action now. Must not mutate.
    fn should_use(&self, combat: &Combat, character: &CharacterId) -> bool;

    fn execute(&self, combat: &mut Combat, character: &CharacterId) -> Result<(), CombatError>;
}

fn lookup<'a>(combat: &'a Combat, id: &CharacterId) -> Result<&'a Character, CombatError> {
    combat
        .character(id)
        .ok_or_else(|| CombatError::UnknownCharacter(id.clone()))
}

fn lookup_mut<'a>(combat: &'a mut Combat, id: &CharacterId) -> Result<&'a mut Character, CombatError> {
    combat
        .character_mut(id)
        .ok_or_else(|| CombatError::UnknownCharacter(id.clone()))
}

/// Damage dealt by one hit, before clamping to the target's hitpoints.
fn hit_damage(attacker: &Character, defender: &Character, percent: Option<i32>) -> i32 {
    let raw = attacker.damage() - defender.defense();
    match percent {
        Some(percent) => (f64::from(raw) / 100.0 * f64::from(percent)) as i32,
        None => raw,
    }
}

/// Resolve one hit, apply the damage and log it.
fn strike(
    combat: &mut Combat,
    attacker: &CharacterId,
    defender: &CharacterId,
    skill: Option<&CharacterAttackSkill>,
) -> Result<(), CombatError> {
    let calculator = combat.success_calculator();
    let (result, amount) = {
        let a = lookup(combat, attacker)?;
        let d = lookup(combat, defender)?;
        let result = calculator.has_hit(a, d, skill);
        let amount = if result {
            hit_damage(a, d, skill.map(CharacterAttackSkill::damage_percent))
                .min(d.hitpoints())
                .max(0)
        } else {
            0
        };
        (result, amount)
    };
    lookup_mut(combat, defender)?.harm(amount);
    combat.log_damage(attacker, amount);
    let (kind, name) = match skill {
        Some(skill) => (ActionKind::SkillAttack, skill.skill().name()),
        None => (ActionKind::Attack, ""),
    };
    combat.log_action(kind, name, attacker, defender, result, amount)
}

/// Basic weapon attack on a reachable enemy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Attack;

impl CombatAction for Attack {
    fn kind(&self) -> ActionKind {
        ActionKind::Attack
    }

    fn priority(&self) -> i32 {
        0
    }

    fn should_use(&self, combat: &Combat, character: &CharacterId) -> bool {
        combat.has_attack_target(character)
    }

    fn execute(&self, combat: &mut Combat, character: &CharacterId) -> Result<(), CombatError> {
        let Some(target) = combat.select_attack_target(character) else {
            return Ok(());
        };
        strike(combat, character, &target, None)
    }
}

/// Healers restore half their intelligence to the most wounded teammate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heal;

impl CombatAction for Heal {
    fn kind(&self) -> ActionKind {
        ActionKind::Healing
    }

    fn priority(&self) -> i32 {
        1000
    }

    fn should_use(&self, combat: &Combat, character: &CharacterId) -> bool {
        combat.is_healer(character) && combat.select_healing_target(character).is_some()
    }

    fn execute(&self, combat: &mut Combat, character: &CharacterId) -> Result<(), CombatError> {
        let Some(patient) = combat.select_healing_target(character) else {
            return Ok(());
        };
        let calculator = combat.success_calculator();
        let (result, amount) = {
            let healer = lookup(combat, character)?;
            let target = lookup(combat, &patient)?;
            let result = calculator.has_healed(healer);
            let amount = if result { healer.intelligence() / 2 } else { 0 };
            let missing = target.max_hitpoints() - target.hitpoints();
            (result, amount.min(missing).max(0))
        };
        lookup_mut(combat, &patient)?.heal(amount);
        combat.log_action(ActionKind::Healing, "", character, &patient, result, amount)
    }
}

fn first_usable_skill(combat: &Combat, character: &CharacterId) -> Option<(usize, CharacterSkill)> {
    let character = combat.character(character)?;
    let index = character.first_usable_skill()?;
    Some((index, character.skills()[index].clone()))
}

fn reset_skill_cooldown(
    combat: &mut Combat,
    character: &CharacterId,
    index: usize,
) -> Result<(), CombatError> {
    if let Some(skill) = lookup_mut(combat, character)?.skills_mut().get_mut(index) {
        skill.reset_cooldown();
    }
    Ok(())
}

/// Uses the character's first usable skill when it is an attack skill.
///
/// Single-target skills strike the chosen enemy; row and column skills
/// strike every member of the enemy team sharing the chosen enemy's row or
/// column. Each target takes up to `strikes` hits and is skipped once dead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillAttackAction;

impl CombatAction for SkillAttackAction {
    fn kind(&self) -> ActionKind {
        ActionKind::SkillAttack
    }

    fn priority(&self) -> i32 {
        1001
    }

    fn should_use(&self, combat: &Combat, character: &CharacterId) -> bool {
        matches!(
            first_usable_skill(combat, character),
            Some((_, CharacterSkill::Attack(_)))
        ) && combat.has_attack_target(character)
    }

    fn execute(&self, combat: &mut Combat, character: &CharacterId) -> Result<(), CombatError> {
        let Some((index, CharacterSkill::Attack(skill))) = first_usable_skill(combat, character)
        else {
            return Ok(());
        };
        let mode = skill.skill().target();
        if !matches!(mode, SkillTarget::Single | SkillTarget::Row | SkillTarget::Column) {
            return Err(CombatError::UnsupportedTarget {
                action: self.name(),
                target: mode.as_str(),
            });
        }
        let Some(primary) = combat.select_attack_target(character) else {
            return Ok(());
        };
        let targets = skill_attack_targets(combat, &primary, mode)?;
        for target in &targets {
            for _ in 0..skill.skill().strikes() {
                if !lookup(combat, target)?.is_alive() {
                    break;
                }
                strike(combat, character, target, Some(&skill))?;
            }
        }
        reset_skill_cooldown(combat, character, index)
    }
}

fn skill_attack_targets(
    combat: &Combat,
    primary: &CharacterId,
    mode: SkillTarget,
) -> Result<Vec<CharacterId>, CombatError> {
    let anchor = lookup(combat, primary)?;
    let (row, column) = (anchor.position_row(), anchor.position_column());
    let team = combat
        .side_of(primary)
        .and_then(|side| combat.team(side))
        .ok_or_else(|| CombatError::UnknownCharacter(primary.clone()))?;
    let members = match mode {
        SkillTarget::Row => team.members_where(|c| c.position_row() == row),
        SkillTarget::Column => team.members_where(|c| c.position_column() == column),
        _ => return Ok(vec![primary.clone()]),
    };
    Ok(members.into_iter().map(|c| c.id().clone()).collect())
}

/// Uses the character's first usable skill when it is a special skill.
///
/// Attaches the skill's effect to every target. Special skills always
/// succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillSpecialAction;

impl SkillSpecialAction {
    fn effect(skill: &CharacterSpecialSkill) -> Result<CharacterEffect, CombatError> {
        let definition = skill.skill();
        let mut builder = CharacterEffect::builder(definition.effect_id(), definition.effect_type())
            .value(skill.value())
            .duration(EffectDuration::Rounds(definition.duration()));
        if let Some(stat) = definition.stat() {
            builder = builder.stat(stat);
        }
        Ok(builder.build()?)
    }
}

impl CombatAction for SkillSpecialAction {
    fn kind(&self) -> ActionKind {
        ActionKind::SkillSpecial
    }

    fn priority(&self) -> i32 {
        1000
    }

    fn should_use(&self, combat: &Combat, character: &CharacterId) -> bool {
        let Some((_, CharacterSkill::Special(skill))) = first_usable_skill(combat, character)
        else {
            return false;
        };
        match skill.skill().target() {
            SkillTarget::Enemy => combat.has_attack_target(character),
            SkillTarget::EnemyParty => combat
                .side_of(character)
                .and_then(|side| combat.team(side.opposite()))
                .is_some_and(|team| team.has_alive_members()),
            _ => true,
        }
    }

    fn execute(&self, combat: &mut Combat, character: &CharacterId) -> Result<(), CombatError> {
        let Some((index, CharacterSkill::Special(skill))) = first_usable_skill(combat, character)
        else {
            return Ok(());
        };
        let side = combat
            .side_of(character)
            .ok_or_else(|| CombatError::UnknownCharacter(character.clone()))?;
        let team_ids = |combat: &Combat, side| -> Vec<CharacterId> {
            combat
                .team(side)
                .map(|team| team.members().iter().map(|c| c.id().clone()).collect())
                .unwrap_or_default()
        };
        let targets = match skill.skill().target() {
            SkillTarget::SelfOnly => vec![character.clone()],
            SkillTarget::Enemy => match combat.select_attack_target(character) {
                Some(target) => vec![target],
                None => return Ok(()),
            },
            SkillTarget::Party => team_ids(combat, side),
            SkillTarget::EnemyParty => team_ids(combat, side.opposite()),
            mode => {
                return Err(CombatError::UnsupportedTarget {
                    action: self.name(),
                    target: mode.as_str(),
                })
            }
        };
        for target in &targets {
            let effect = Self::effect(&skill)?;
            lookup_mut(combat, target)?.add_effect(effect);
            combat.log_action(
                ActionKind::SkillSpecial,
                skill.skill().name(),
                character,
                target,
                true,
                0,
            )?;
        }
        reset_skill_cooldown(combat, character, index)
    }
}

/// Deals a poisoned character its accumulated poison damage.
///
/// Not offered to the action selector; the round-start hook runs it for
/// every living poisoned character. Poison damage is not credited to
/// either team.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoisonTick;

impl CombatAction for PoisonTick {
    fn kind(&self) -> ActionKind {
        ActionKind::Poison
    }

    fn priority(&self) -> i32 {
        0
    }

    fn should_use(&self, combat: &Combat, character: &CharacterId) -> bool {
        combat
            .character(character)
            .is_some_and(|c| c.is_alive() && c.poison() > 0)
    }

    fn execute(&self, combat: &mut Combat, character: &CharacterId) -> Result<(), CombatError> {
        let target = lookup_mut(combat, character)?;
        let amount = target.poison().min(target.hitpoints()).max(0);
        target.harm(amount);
        combat.log_action(ActionKind::Poison, "", character, character, true, amount)
    }
}

/// The actions a combat starts with.
pub fn default_actions() -> Vec<Arc<dyn CombatAction>> {
    vec![
        Arc::new(Attack),
        Arc::new(Heal),
        Arc::new(SkillAttackAction),
        Arc::new(SkillSpecialAction),
    ]
}
