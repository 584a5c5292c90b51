//! Phase hooks.
//!
//! Each phase of a combat runs an ordered list of hooks. The default
//! registry carries the built-in pipeline:
//!
//! | Phase | Hooks |
//! |---|---|
//! | `CombatStart` | [`ResetSkillCooldowns`], [`AssignPositions`] |
//! | `RoundStart` | [`ApplyEffectProviders`], [`DecreaseEffectDurations`], [`RollInitiative`], [`RecalculateStats`], [`AdvanceRound`], [`ApplyPoison`] |
//! | `Round` | [`MainStage`] |
//! | `RoundEnd` | [`DecreaseSkillCooldowns`], [`ResetInitiative`] |
//! | `CombatEnd` | [`RemoveCombatEffects`], [`LogCombatResult`], [`ResetInitiative`] |

use crate::action::{CombatAction, PoisonTick};
use crate::character::Character;
use crate::character_id::CharacterId;
use crate::combat::{Combat, TeamSide};
use crate::error::CombatError;
use crate::log::{CombatResult, ROUND_COMBAT_END};
use crate::team::Team;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Points in the combat lifecycle where hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CombatPhase {
    CombatStart,
    RoundStart,
    Round,
    RoundEnd,
    CombatEnd,
}

/// A step of the combat pipeline.
pub trait CombatHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError>;
}

/// Hooks per phase, in registration order.
#[derive(Clone)]
pub struct HookRegistry {
    hooks: BTreeMap<CombatPhase, Vec<Arc<dyn CombatHook>>>,
}

impl HookRegistry {
    /// A registry without any hooks.
    pub fn empty() -> Self {
        Self {
            hooks: BTreeMap::new(),
        }
    }

    /// Append a hook to a phase.
    pub fn register(&mut self, phase: CombatPhase, hook: Arc<dyn CombatHook>) {
        self.hooks.entry(phase).or_default().push(hook);
    }

    /// The hooks of a phase.
    pub fn hooks(&self, phase: CombatPhase) -> Vec<Arc<dyn CombatHook>> {
        self.hooks.get(&phase).cloned().unwrap_or_default()
    }

    /// Names of the hooks of a phase.
    pub fn names(&self, phase: CombatPhase) -> Vec<&'static str> {
        self.hooks
            .get(&phase)
            .map(|hooks| hooks.iter().map(|hook| hook.name()).collect())
            .unwrap_or_default()
    }

    /// Drop every hook of a phase.
    pub fn clear(&mut self, phase: CombatPhase) {
        self.hooks.remove(&phase);
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        let builtin: [(CombatPhase, Arc<dyn CombatHook>); 14] = [
            (CombatPhase::CombatStart, Arc::new(ResetSkillCooldowns)),
            (CombatPhase::CombatStart, Arc::new(AssignPositions)),
            (CombatPhase::RoundStart, Arc::new(ApplyEffectProviders)),
            (CombatPhase::RoundStart, Arc::new(DecreaseEffectDurations)),
            (CombatPhase::RoundStart, Arc::new(RollInitiative)),
            (CombatPhase::RoundStart, Arc::new(RecalculateStats)),
            (CombatPhase::RoundStart, Arc::new(AdvanceRound)),
            (CombatPhase::RoundStart, Arc::new(ApplyPoison)),
            (CombatPhase::Round, Arc::new(MainStage)),
            (CombatPhase::RoundEnd, Arc::new(DecreaseSkillCooldowns)),
            (CombatPhase::RoundEnd, Arc::new(ResetInitiative)),
            (CombatPhase::CombatEnd, Arc::new(RemoveCombatEffects)),
            (CombatPhase::CombatEnd, Arc::new(LogCombatResult)),
            (CombatPhase::CombatEnd, Arc::new(ResetInitiative)),
        ];
        for (phase, hook) in builtin {
            registry.register(phase, hook);
        }
        registry
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for phase in self.hooks.keys() {
            map.entry(phase, &self.names(*phase));
        }
        map.finish()
    }
}

fn for_each_character(combat: &mut Combat, f: impl Fn(&mut Character)) {
    for character in combat.characters_mut() {
        f(character);
    }
}

/// Put every skill on its full cooldown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetSkillCooldowns;

impl CombatHook for ResetSkillCooldowns {
    fn name(&self) -> &'static str {
        "reset_skill_cooldowns"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, |character| {
            for skill in character.skills_mut() {
                skill.reset_cooldown();
            }
        });
        Ok(())
    }
}

/// Place every unplaced character on its team's grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignPositions;

impl CombatHook for AssignPositions {
    fn name(&self) -> &'static str {
        "assign_positions"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for side in [TeamSide::First, TeamSide::Second] {
            if let Some(team) = combat.team_mut(side) {
                team.assign_positions()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyEffectProviders;

impl CombatHook for ApplyEffectProviders {
    fn name(&self) -> &'static str {
        "apply_effect_providers"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, |character| character.apply_effect_providers());
        Ok(())
    }
}

/// Count finite effects down and drop the expired ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecreaseEffectDurations;

impl CombatHook for DecreaseEffectDurations {
    fn name(&self) -> &'static str {
        "decrease_effect_durations"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, |character| {
            character.tick_effect_durations();
        });
        Ok(())
    }
}

/// Roll this round's initiative for every character.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollInitiative;

impl CombatHook for RollInitiative {
    fn name(&self) -> &'static str {
        "roll_initiative"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, Character::roll_initiative);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecalculateStats;

impl CombatHook for RecalculateStats {
    fn name(&self) -> &'static str {
        "recalculate_stats"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, Character::recalculate_stats);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceRound;

impl CombatHook for AdvanceRound {
    fn name(&self) -> &'static str {
        "advance_round"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        combat.advance_round();
        Ok(())
    }
}

/// Deal poison damage to every living poisoned character.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyPoison;

impl CombatHook for ApplyPoison {
    fn name(&self) -> &'static str {
        "apply_poison"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for id in combat.character_ids() {
            if PoisonTick.should_use(combat, &id) {
                PoisonTick.execute(combat, &id)?;
            }
        }
        Ok(())
    }
}

/// Let every usable character act, highest initiative first.
///
/// Initiative is compared as a number, so 10 goes before 9; ordering the
/// values as strings would put 9 first. Equal initiative keeps team 1 ahead
/// of team 2 and member order within a team.
///
/// The turn order is fixed when the stage begins. Characters that fall or
/// get stunned before their turn are skipped by the action selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainStage;

impl MainStage {
    fn turn_order(combat: &Combat) -> Vec<CharacterId> {
        let mut acting: Vec<&Character> = [TeamSide::First, TeamSide::Second]
            .into_iter()
            .filter_map(|side| combat.team(side))
            .flat_map(Team::usable_members)
            .collect();
        acting.sort_by(|a, b| b.initiative().cmp(&a.initiative()));
        acting.into_iter().map(|c| c.id().clone()).collect()
    }
}

impl CombatHook for MainStage {
    fn name(&self) -> &'static str {
        "main_stage"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        let selector = combat.action_selector();
        for id in Self::turn_order(combat) {
            if let Some(action) = selector.choose_action(combat, &id) {
                action.execute(combat, &id)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecreaseSkillCooldowns;

impl CombatHook for DecreaseSkillCooldowns {
    fn name(&self) -> &'static str {
        "decrease_skill_cooldowns"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, |character| {
            for skill in character.skills_mut() {
                skill.decrease_cooldown();
            }
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResetInitiative;

impl CombatHook for ResetInitiative {
    fn name(&self) -> &'static str {
        "reset_initiative"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, Character::reset_initiative);
        Ok(())
    }
}

/// Strip every effect that does not outlive the combat.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveCombatEffects;

impl CombatHook for RemoveCombatEffects {
    fn name(&self) -> &'static str {
        "remove_combat_effects"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        for_each_character(combat, |character| {
            character.remove_combat_effects();
        });
        Ok(())
    }
}

/// File the outcome under [`ROUND_COMBAT_END`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCombatResult;

impl CombatHook for LogCombatResult {
    fn name(&self) -> &'static str {
        "log_combat_result"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        let winner = combat.winner();
        let (team1, team2) = combat.teams().ok_or(CombatError::TeamsNotSet)?;
        let result = CombatResult {
            team1_name: team1.name().to_string(),
            team1_damage: combat.team1_damage(),
            team2_name: team2.name().to_string(),
            team2_damage: combat.team2_damage(),
            winner,
            winner_name: if winner == 1 { team1.name() } else { team2.name() }.to_string(),
        };
        let log = combat.log_mut();
        log.set_round(ROUND_COMBAT_END);
        log.log_result(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterData;
    use crate::effect::{CharacterEffect, EffectDuration, EffectType};

    fn character(id: &str) -> Character {
        Character::new(CharacterData {
            id: id.into(),
            name: id.to_string(),
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

    fn duel() -> Combat {
        let mut combat = Combat::new();
        combat
            .set_duel_participants(character("1"), character("2"))
            .unwrap();
        combat
    }

    #[test]
    fn test_default_pipeline_order() {
        let registry = HookRegistry::default();
        assert_eq!(
            registry.names(CombatPhase::RoundStart),
            vec![
                "apply_effect_providers",
                "decrease_effect_durations",
                "roll_initiative",
                "recalculate_stats",
                "advance_round",
                "apply_poison",
            ]
        );
        assert_eq!(registry.names(CombatPhase::Round), vec!["main_stage"]);
        assert_eq!(
            registry.names(CombatPhase::CombatEnd),
            vec!["remove_combat_effects", "log_combat_result", "reset_initiative"]
        );
    }

    #[test]
    fn test_clear_phase() {
        let mut registry = HookRegistry::default();
        registry.clear(CombatPhase::Round);
        assert!(registry.hooks(CombatPhase::Round).is_empty());
        assert!(HookRegistry::empty().names(CombatPhase::CombatStart).is_empty());
    }

    #[test]
    fn test_assign_positions_hook() {
        let mut combat = duel();
        AssignPositions.run(&mut combat).unwrap();
        for character in combat.characters() {
            assert_eq!(
                (character.position_row(), character.position_column()),
                (1, 1)
            );
        }
    }

    #[test]
    fn test_apply_poison_hook() {
        let mut combat = duel();
        let poison = CharacterEffect::builder("venom", EffectType::Poison)
            .value(7)
            .duration(EffectDuration::Rounds(2))
            .build()
            .unwrap();
        combat.character_mut(&"2".into()).unwrap().add_effect(poison);
        ApplyPoison.run(&mut combat).unwrap();
        assert_eq!(combat.character(&"2".into()).unwrap().hitpoints(), 43);
        assert_eq!(combat.team2_damage(), 0);
        assert_eq!(combat.team1_damage(), 0);
        let entry = combat.log().entries().next().unwrap();
        assert_eq!(entry.character1.id, entry.character2.id);
    }

    #[test]
    fn test_log_combat_result_hook() {
        let mut combat = duel();
        combat.character_mut(&"2".into()).unwrap().harm(1000);
        LogCombatResult.run(&mut combat).unwrap();
        let result = combat.log().result().unwrap();
        assert_eq!(result.winner, 1);
        assert_eq!(result.winner_name, "1");
        assert_eq!(combat.log().round(), ROUND_COMBAT_END);
    }
}
