//! Combat scheduler.
//!
//! Provides the [`Combat`] type, the main entry point of the crate. It owns
//! both teams and the pluggable strategies, runs the round loop, and exposes
//! the targeting and bookkeeping operations actions and hooks rely on.

use crate::action::{self, CombatAction};
use crate::character::Character;
use crate::character_id::CharacterId;
use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::hook::{CombatHook, CombatPhase, HookRegistry};
use crate::log::{ActionKind, CharacterSnapshot, CombatLogEntry, CombatLogger};
use crate::selector::{CombatActionSelector, DefaultCombatActionSelector};
use crate::success::{RandomSuccessCalculator, SuccessCalculator};
use crate::team::{lowest_hp_character, random_character, Team};
use crate::victory::{self, HealerSelector, VictoryCondition};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// One of the two sides of a combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    First,
    Second,
}

impl TeamSide {
    /// Team number as used by victory conditions: 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            TeamSide::First => 1,
            TeamSide::Second => 2,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            TeamSide::First => TeamSide::Second,
            TeamSide::Second => TeamSide::First,
        }
    }

    fn index(self) -> usize {
        match self {
            TeamSide::First => 0,
            TeamSide::Second => 1,
        }
    }
}

/// A combat between two teams.
///
/// The combat runs in rounds. Each round fires the hooks registered for
/// [`CombatPhase::RoundStart`], [`CombatPhase::Round`] and
/// [`CombatPhase::RoundEnd`], checking the victory condition after the
/// first and the last. [`CombatPhase::CombatStart`] and
/// [`CombatPhase::CombatEnd`] hooks run once around the loop.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use zzcombat::*;
///
/// let data = |id: &str| CharacterData {
///     id: id.into(),
///     name: id.to_string(),
///     level: 1,
///     strength: 10,
///     dexterity: 10,
///     constitution: 10,
///     intelligence: 10,
///     charisma: 10,
///     initiative_formula: "1d2+DEX/4".parse().unwrap(),
/// };
///
/// let mut combat = Combat::with_config(CombatConfig::new().with_seed(1))
///     .unwrap()
///     .with_success_calculator(Arc::new(StaticSuccessCalculator));
/// combat
///     .set_duel_participants(
///         Character::new(data("hero")).unwrap(),
///         Character::new(data("villain")).unwrap(),
///     )
///     .unwrap();
///
/// let winner = combat.execute().unwrap();
/// assert!(winner == 1 || winner == 2);
/// assert_eq!(combat.log().round(), ROUND_COMBAT_END);
/// ```
pub struct Combat {
    team1: Option<Team>,
    team2: Option<Team>,
    config: CombatConfig,
    round: u32,
    damage: [i64; 2],
    winner: u8,
    log: CombatLogger,
    hooks: HookRegistry,
    actions: Vec<Arc<dyn CombatAction>>,
    victory_condition: Arc<dyn VictoryCondition>,
    healers: Arc<dyn HealerSelector>,
    success_calculator: Arc<dyn SuccessCalculator>,
    action_selector: Arc<dyn CombatActionSelector>,
    rng: ChaCha8Rng,
}

impl Combat {
    /// A combat with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(CombatConfig::default())
    }

    /// A combat built from a configuration.
    ///
    /// The seed, when present, drives target picks and the default success
    /// calculator.
    pub fn with_config(config: CombatConfig) -> Result<Self, CombatError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CombatConfig) -> Self {
        let (rng, success_calculator) = match config.seed {
            Some(seed) => (
                ChaCha8Rng::seed_from_u64(seed),
                RandomSuccessCalculator::seeded(seed.wrapping_add(1)),
            ),
            None => (ChaCha8Rng::from_entropy(), RandomSuccessCalculator::new()),
        };
        Self {
            team1: None,
            team2: None,
            config,
            round: 0,
            damage: [0; 2],
            winner: 0,
            log: CombatLogger::new(),
            hooks: HookRegistry::default(),
            actions: action::default_actions(),
            victory_condition: Arc::new(victory::more_damage),
            healers: Arc::new(victory::no_healers),
            success_calculator: Arc::new(success_calculator),
            action_selector: Arc::new(DefaultCombatActionSelector),
            rng,
        }
    }

    pub fn with_success_calculator(mut self, calculator: Arc<dyn SuccessCalculator>) -> Self {
        self.success_calculator = calculator;
        self
    }

    pub fn with_action_selector(mut self, selector: Arc<dyn CombatActionSelector>) -> Self {
        self.action_selector = selector;
        self
    }

    pub fn with_victory_condition(mut self, condition: impl VictoryCondition + 'static) -> Self {
        self.set_victory_condition(condition);
        self
    }

    pub fn with_healers(mut self, healers: impl HealerSelector + 'static) -> Self {
        self.set_healers(healers);
        self
    }

    pub fn set_success_calculator(&mut self, calculator: Arc<dyn SuccessCalculator>) {
        self.success_calculator = calculator;
    }

    pub fn set_action_selector(&mut self, selector: Arc<dyn CombatActionSelector>) {
        self.action_selector = selector;
    }

    pub fn set_victory_condition(&mut self, condition: impl VictoryCondition + 'static) {
        self.victory_condition = Arc::new(condition);
    }

    pub fn set_healers(&mut self, healers: impl HealerSelector + 'static) {
        self.healers = Arc::new(healers);
    }

    /// Add an action to the pool the selector chooses from.
    pub fn register_action(&mut self, action: Arc<dyn CombatAction>) {
        self.actions.push(action);
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    pub fn actions(&self) -> &[Arc<dyn CombatAction>] {
        &self.actions
    }

    /// Add a hook to run in the given phase, after the hooks already there.
    pub fn register_hook(&mut self, phase: CombatPhase, hook: Arc<dyn CombatHook>) {
        self.hooks.register(phase, hook);
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn success_calculator(&self) -> Arc<dyn SuccessCalculator> {
        Arc::clone(&self.success_calculator)
    }

    pub fn action_selector(&self) -> Arc<dyn CombatActionSelector> {
        Arc::clone(&self.action_selector)
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Assign both teams. Allowed once per combat.
    pub fn set_teams(&mut self, team1: Team, team2: Team) -> Result<(), CombatError> {
        if self.team1.is_some() || self.team2.is_some() {
            return Err(CombatError::TeamsAlreadySet);
        }
        let mut seen: Vec<&CharacterId> = Vec::new();
        for character in team1.members().iter().chain(team2.members()) {
            if seen.contains(&character.id()) {
                return Err(CombatError::DuplicateCharacter(character.id().clone()));
            }
            seen.push(character.id());
        }
        self.log.set_title(format!("{} vs {}", team1.name(), team2.name()));
        self.team1 = Some(team1);
        self.team2 = Some(team2);
        Ok(())
    }

    /// One-on-one combat with each team named after its character.
    pub fn set_duel_participants(
        &mut self,
        first: Character,
        second: Character,
    ) -> Result<(), CombatError> {
        let team1 = Team::with_config(first.name(), &self.config).with_members(vec![first]);
        let team2 = Team::with_config(second.name(), &self.config).with_members(vec![second]);
        self.set_teams(team1, team2)
    }

    pub fn team1(&self) -> Option<&Team> {
        self.team1.as_ref()
    }

    pub fn team2(&self) -> Option<&Team> {
        self.team2.as_ref()
    }

    /// Both teams, once assigned.
    pub fn teams(&self) -> Option<(&Team, &Team)> {
        self.team1.as_ref().zip(self.team2.as_ref())
    }

    pub fn team(&self, side: TeamSide) -> Option<&Team> {
        match side {
            TeamSide::First => self.team1.as_ref(),
            TeamSide::Second => self.team2.as_ref(),
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> Option<&mut Team> {
        match side {
            TeamSide::First => self.team1.as_mut(),
            TeamSide::Second => self.team2.as_mut(),
        }
    }

    /// The side a character fights on.
    pub fn side_of(&self, id: &CharacterId) -> Option<TeamSide> {
        if self.team1.as_ref().is_some_and(|team| team.contains(id)) {
            Some(TeamSide::First)
        } else if self.team2.as_ref().is_some_and(|team| team.contains(id)) {
            Some(TeamSide::Second)
        } else {
            None
        }
    }

    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters().find(|c| c.id() == id)
    }

    pub fn character_mut(&mut self, id: &CharacterId) -> Option<&mut Character> {
        self.characters_mut().find(|c| c.id() == id)
    }

    /// All characters, first team first.
    pub fn characters(&self) -> impl Iterator<Item = &Character> + '_ {
        self.team1
            .iter()
            .chain(self.team2.iter())
            .flat_map(|team| team.members().iter())
    }

    pub fn characters_mut(&mut self) -> impl Iterator<Item = &mut Character> + '_ {
        self.team1
            .iter_mut()
            .chain(self.team2.iter_mut())
            .flat_map(|team| team.members_mut().iter_mut())
    }

    pub fn character_ids(&self) -> Vec<CharacterId> {
        self.characters().map(|c| c.id().clone()).collect()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn round_limit(&self) -> u32 {
        self.config.round_limit
    }

    pub fn set_round_limit(&mut self, round_limit: u32) {
        self.config.round_limit = round_limit;
    }

    pub fn heal_threshold(&self) -> f64 {
        self.config.heal_threshold
    }

    /// Start the next round and file new log records under it.
    pub fn advance_round(&mut self) {
        self.round += 1;
        self.log.set_round(self.round);
        trace!(round = self.round, "round started");
    }

    pub fn log(&self) -> &CombatLogger {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut CombatLogger {
        &mut self.log
    }

    /// Total damage dealt by a team.
    pub fn damage(&self, side: TeamSide) -> i64 {
        self.damage[side.index()]
    }

    pub fn team1_damage(&self) -> i64 {
        self.damage(TeamSide::First)
    }

    pub fn team2_damage(&self) -> i64 {
        self.damage(TeamSide::Second)
    }

    /// Credit damage to the attacker's team.
    pub fn log_damage(&mut self, attacker: &CharacterId, amount: i32) {
        if let Some(side) = self.side_of(attacker) {
            self.damage[side.index()] += i64::from(amount);
        }
    }

    /// Record an action with snapshots of both characters.
    pub fn log_action(
        &mut self,
        action: ActionKind,
        name: &str,
        actor: &CharacterId,
        target: &CharacterId,
        result: bool,
        amount: i32,
    ) -> Result<(), CombatError> {
        let character1 = self
            .character(actor)
            .map(CharacterSnapshot::from)
            .ok_or_else(|| CombatError::UnknownCharacter(actor.clone()))?;
        let character2 = self
            .character(target)
            .map(CharacterSnapshot::from)
            .ok_or_else(|| CombatError::UnknownCharacter(target.clone()))?;
        debug!(
            round = self.round,
            action = action.as_str(),
            actor = %actor,
            target = %target,
            result,
            amount,
            "action resolved"
        );
        self.log.log(CombatLogEntry {
            character1,
            character2,
            action,
            name: name.to_string(),
            result,
            amount,
        });
        Ok(())
    }

    /// Whether the character is designated a healer for this combat.
    pub fn is_healer(&self, id: &CharacterId) -> bool {
        self.teams()
            .is_some_and(|(team1, team2)| self.healers.healers(team1, team2).contains(id))
    }

    fn attack_candidates(&self, attacker: &CharacterId) -> Vec<&Character> {
        let (Some(character), Some(side)) = (self.character(attacker), self.side_of(attacker))
        else {
            return Vec::new();
        };
        match self.team(side.opposite()) {
            Some(enemies) => reachable_enemies(enemies, character.has_ranged_weapon()),
            None => Vec::new(),
        }
    }

    /// Whether the attacker can reach any enemy.
    pub fn has_attack_target(&self, attacker: &CharacterId) -> bool {
        !self.attack_candidates(attacker).is_empty()
    }

    /// Pick the enemy to attack.
    ///
    /// Melee attackers reach only the enemy's front row; ranged attackers
    /// reach every enemy that is not hidden. The most wounded reachable
    /// enemy is preferred, otherwise one is drawn at random.
    pub fn select_attack_target(&mut self, attacker: &CharacterId) -> Option<CharacterId> {
        let ranged = self.character(attacker)?.has_ranged_weapon();
        let enemies = match self.side_of(attacker)?.opposite() {
            TeamSide::First => self.team1.as_ref(),
            TeamSide::Second => self.team2.as_ref(),
        }?;
        let candidates = reachable_enemies(enemies, ranged);
        let target = lowest_hp_character(candidates.iter().copied(), self.config.heal_threshold)
            .or_else(|| random_character(candidates.iter().copied(), &mut self.rng))?;
        Some(target.id().clone())
    }

    /// The most wounded member of the healer's own team, if any needs healing.
    pub fn select_healing_target(&self, healer: &CharacterId) -> Option<CharacterId> {
        let team = self.team(self.side_of(healer)?)?;
        team.lowest_hp_character(self.config.heal_threshold)
            .map(|c| c.id().clone())
    }

    /// The winning team: 0 while undecided, otherwise 1 or 2.
    ///
    /// The first decided result is kept for the rest of the combat.
    pub fn winner(&mut self) -> u8 {
        if self.winner == 0 {
            let condition = Arc::clone(&self.victory_condition);
            let result = condition.winner(self);
            if result > 2 {
                warn!(result, "victory condition returned an invalid team");
            }
            self.winner = result.min(2);
        }
        self.winner
    }

    /// Name of the winning team, empty while undecided.
    pub fn winner_name(&self) -> &str {
        let side = match self.winner {
            1 => TeamSide::First,
            2 => TeamSide::Second,
            _ => return "",
        };
        self.team(side).map(Team::name).unwrap_or("")
    }

    /// Run the hooks of one phase in registration order.
    pub fn fire(&mut self, phase: CombatPhase) -> Result<(), CombatError> {
        for hook in self.hooks.hooks(phase) {
            trace!(?phase, hook = hook.name(), "running hook");
            hook.run(self)?;
        }
        Ok(())
    }

    /// Run the combat to its end and return the winning team.
    pub fn execute(&mut self) -> Result<u8, CombatError> {
        let Some((team1, team2)) = self.teams() else {
            return Err(CombatError::TeamsNotSet);
        };
        info!(team1 = team1.name(), team2 = team2.name(), "combat started");
        self.fire(CombatPhase::CombatStart)?;
        while self.round <= self.config.round_limit {
            self.fire(CombatPhase::RoundStart)?;
            if self.winner() > 0 {
                break;
            }
            self.fire(CombatPhase::Round)?;
            self.fire(CombatPhase::RoundEnd)?;
            if self.winner() > 0 {
                break;
            }
        }
        self.fire(CombatPhase::CombatEnd)?;
        let winner = self.winner();
        info!(
            winner,
            winner_name = self.winner_name(),
            rounds = self.round,
            team1_damage = self.team1_damage(),
            team2_damage = self.team2_damage(),
            "combat finished"
        );
        Ok(winner)
    }
}

impl Default for Combat {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Combat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combat")
            .field("team1", &self.team1)
            .field("team2", &self.team2)
            .field("config", &self.config)
            .field("round", &self.round)
            .field("damage", &self.damage)
            .field("winner", &self.winner)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

/// Enemies an attacker can reach: the front row for melee, every visible
/// enemy for ranged weapons.
fn reachable_enemies(enemies: &Team, ranged: bool) -> Vec<&Character> {
    if ranged {
        return enemies.members_where(|c| c.is_alive() && !c.is_hidden());
    }
    match enemies.row_to_attack() {
        Some(row) => enemies.members_where(|c| c.is_alive() && c.position_row() == row),
        None => Vec::new(),
    }
}
