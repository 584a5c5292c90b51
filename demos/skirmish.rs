//! Skirmish Example
//!
//! Two parties of four fight on the positional grid:
//! - Configuration loaded from JSON
//! - Attack and special skills with cooldowns
//! - Healers chosen by a custom selector
//! - A custom victory condition and an extra round hook
//! - Exporting the log as JSON for an external renderer

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zzcombat::*;

const CONFIG: &str = r#"{
    "round_limit": 15,
    "max_row_size": 2,
    "heal_threshold": 0.5,
    "seed": 7
}"#;

fn hero(id: &str, name: &str, stats: [i32; 5]) -> Result<Character, CombatError> {
    let [strength, dexterity, constitution, intelligence, charisma] = stats;
    Ok(Character::new(CharacterData {
        id: id.into(),
        name: name.to_string(),
        level: 10,
        strength,
        dexterity,
        constitution,
        intelligence,
        charisma,
        initiative_formula: "2d4+DEX/4".parse()?,
    })?)
}

fn cleave() -> Result<CharacterSkill, CombatError> {
    let skill = SkillAttack::new(SkillAttackData {
        id: 1,
        name: "Cleave".to_string(),
        target: SkillTarget::Row,
        levels: 5,
        base_damage: "80%".to_string(),
        damage_growth: "5%".to_string(),
        strikes: 1,
        hit_rate: Some("90%".to_string()),
    })?;
    Ok(CharacterAttackSkill::new(Arc::new(skill), 3).into())
}

fn war_cry() -> Result<CharacterSkill, CombatError> {
    let skill = SkillSpecial::new(SkillSpecialData {
        id: 2,
        name: "War Cry".to_string(),
        target: SkillTarget::Party,
        levels: 3,
        effect_type: EffectType::Buff,
        stat: Some(Stat::Strength),
        value: 10,
        value_growth: 5,
        duration: 3,
    })?;
    Ok(CharacterSpecialSkill::new(Arc::new(skill), 2).into())
}

fn venom() -> Result<CharacterSkill, CombatError> {
    let skill = SkillSpecial::new(SkillSpecialData {
        id: 3,
        name: "Venom Cloud".to_string(),
        target: SkillTarget::EnemyParty,
        levels: 3,
        effect_type: EffectType::Poison,
        stat: None,
        value: 3,
        value_growth: 1,
        duration: 2,
    })?;
    Ok(CharacterSpecialSkill::new(Arc::new(skill), 1).into())
}

/// Members whose name marks them as clerics may heal.
fn clerics(team1: &Team, team2: &Team) -> Vec<CharacterId> {
    team1
        .members()
        .iter()
        .chain(team2.members())
        .filter(|c| c.name().starts_with("Cleric"))
        .map(|c| c.id().clone())
        .collect()
}

/// Logs the standing of both teams after every round.
struct Standings;

impl CombatHook for Standings {
    fn name(&self) -> &'static str {
        "standings"
    }

    fn run(&self, combat: &mut Combat) -> Result<(), CombatError> {
        if let Some((team1, team2)) = combat.teams() {
            info!(
                round = combat.round(),
                team1_alive = team1.alive_members().len(),
                team2_alive = team2.alive_members().len(),
                "round finished"
            );
        }
        Ok(())
    }
}

fn main() -> Result<(), CombatError> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = CombatConfig::from_json(CONFIG)?;

    let mut wardens = Team::with_config("Wardens", &config);
    wardens.push(hero("w1", "Brakka", [16, 10, 14, 6, 8])?.with_skills(vec![cleave()?]));
    wardens.push(hero("w2", "Ilse", [13, 12, 12, 8, 12])?.with_skills(vec![war_cry()?]));
    wardens.push(hero("w3", "Cleric Oden", [8, 9, 11, 16, 12])?);
    wardens.push(hero("w4", "Tamsin", [10, 16, 10, 9, 9])?);
    // The scout starts in the back row
    wardens.set_character_position(&"w4".into(), 2, 2)?;

    let mut marauders = Team::with_config("Marauders", &config);
    marauders.push(hero("m1", "Gorr", [17, 8, 15, 5, 6])?);
    marauders.push(hero("m2", "Sable", [11, 14, 10, 12, 7])?.with_skills(vec![venom()?]));
    marauders.push(hero("m3", "Cleric Vex", [7, 10, 10, 15, 11])?);
    marauders.push(hero("m4", "Hask", [14, 11, 13, 7, 8])?);

    let mut combat = Combat::with_config(config)?
        .with_healers(clerics)
        .with_victory_condition(victory::eliminate_second_team);
    combat.register_hook(CombatPhase::RoundEnd, Arc::new(Standings));
    combat.set_teams(wardens, marauders)?;

    let winner = combat.execute()?;
    println!(
        "{}: team {winner} ({}) wins after {} rounds",
        combat.log().title(),
        combat.winner_name(),
        combat.round().min(combat.round_limit())
    );

    for entry in combat.log().entries() {
        if !entry.name.is_empty() {
            println!(
                "  {} used {} on {}",
                entry.character1.name, entry.name, entry.character2.name
            );
        }
    }

    let json = combat.log().to_json()?;
    println!("Log export: {} bytes", json.len());

    Ok(())
}
