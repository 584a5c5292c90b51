//! Victory conditions and healer selection.
//!
//! A victory condition returns 0 while the combat is undecided, otherwise
//! the number of the winning team. Every built-in condition hands the win
//! to the side with survivors once the other side is wiped out, and only
//! differs in how it settles a combat that ran past its round limit.
//!
//! Plain functions and closures implement both traits.

use crate::character_id::CharacterId;
use crate::combat::Combat;
use crate::team::Team;

/// Decides whether, and by whom, a combat has been won.
pub trait VictoryCondition: Send + Sync {
    fn winner(&self, combat: &Combat) -> u8;
}

impl<F> VictoryCondition for F
where
    F: Fn(&Combat) -> u8 + Send + Sync,
{
    fn winner(&self, combat: &Combat) -> u8 {
        self(combat)
    }
}

/// Chooses which characters may heal.
pub trait HealerSelector: Send + Sync {
    fn healers(&self, team1: &Team, team2: &Team) -> Vec<CharacterId>;
}

impl<F> HealerSelector for F
where
    F: Fn(&Team, &Team) -> Vec<CharacterId> + Send + Sync,
{
    fn healers(&self, team1: &Team, team2: &Team) -> Vec<CharacterId> {
        self(team1, team2)
    }
}

fn decide(combat: &Combat, at_limit: impl Fn(&Combat, &Team, &Team) -> u8) -> u8 {
    let Some((team1, team2)) = combat.teams() else {
        return 0;
    };
    if combat.round() > combat.round_limit() {
        at_limit(combat, team1, team2)
    } else if !team1.has_alive_members() {
        2
    } else if !team2.has_alive_members() {
        1
    } else {
        0
    }
}

/// At the round limit the team that dealt more damage wins; ties go to
/// team 2.
pub fn more_damage(combat: &Combat) -> u8 {
    decide(combat, |combat, _, _| {
        if combat.team1_damage() > combat.team2_damage() {
            1
        } else {
            2
        }
    })
}

/// Team 1 must wipe out team 2 before the round limit.
pub fn eliminate_second_team(combat: &Combat) -> u8 {
    decide(combat, |_, _, team2| if team2.has_alive_members() { 2 } else { 1 })
}

/// Team 1 wins if any of its members is still standing at the round limit.
pub fn first_team_survives(combat: &Combat) -> u8 {
    decide(combat, |_, team1, _| if team1.has_alive_members() { 1 } else { 2 })
}

/// Nobody heals.
pub fn no_healers(_: &Team, _: &Team) -> Vec<CharacterId> {
    Vec::new()
}

/// Every member of both teams may heal.
pub fn all_members(team1: &Team, team2: &Team) -> Vec<CharacterId> {
    team1
        .members()
        .iter()
        .chain(team2.members())
        .map(|c| c.id().clone())
        .collect()
}

/// Only team 1 may heal.
pub fn first_team_members(team1: &Team, _: &Team) -> Vec<CharacterId> {
    team1.members().iter().map(|c| c.id().clone()).collect()
}
