//! Duel Example
//!
//! A one-on-one fight between a knight and an archer:
//! - Characters built from plain data
//! - Equipment granting combat bonuses
//! - A seeded combat for reproducible results
//! - Reading the round-grouped log afterwards
//!
//! Run with `RUST_LOG=zzcombat=debug` to see every resolved action.

use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zzcombat::*;

fn knight() -> Result<Character, CombatError> {
    let sword = Equipment::new(EquipmentData {
        id: 1,
        name: "Longsword".to_string(),
        slot: EquipmentSlot::Weapon,
        weapon_type: Some(WeaponType::Sword),
        strength: 4,
        worn: true,
        durability: None,
    })?;
    let shield = Equipment::new(EquipmentData {
        id: 2,
        name: "Kite Shield".to_string(),
        slot: EquipmentSlot::Shield,
        weapon_type: None,
        strength: 5,
        worn: true,
        durability: Some(Durability { current: 6, max: 10 }),
    })?;
    let character = Character::new(CharacterData {
        id: "knight".into(),
        name: "Sir Aldric".to_string(),
        level: 5,
        strength: 14,
        dexterity: 9,
        constitution: 13,
        intelligence: 6,
        charisma: 8,
        initiative_formula: "1d4+DEX/4".parse()?,
    })?;
    Ok(character.with_equipment(vec![sword, shield]))
}

fn archer() -> Result<Character, CombatError> {
    let bow = Equipment::new(EquipmentData {
        id: 3,
        name: "Yew Bow".to_string(),
        slot: EquipmentSlot::Weapon,
        weapon_type: Some(WeaponType::Bow),
        strength: 3,
        worn: true,
        durability: None,
    })?;
    let character = Character::new(CharacterData {
        id: "archer".into(),
        name: "Mira".to_string(),
        level: 5,
        strength: 8,
        dexterity: 15,
        constitution: 10,
        intelligence: 9,
        charisma: 10,
        initiative_formula: "1d4+DEX/3".parse()?,
    })?;
    Ok(character.with_equipment(vec![bow]))
}

fn main() -> Result<(), CombatError> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let mut combat = Combat::with_config(CombatConfig::new().with_seed(2024))?;
    combat.set_duel_participants(knight()?, archer()?)?;
    let winner = combat.execute()?;

    println!("=== {} ===", combat.log().title());
    for (round, records) in combat.log().iter() {
        if round == ROUND_COMBAT_END {
            continue;
        }
        println!("Round {round}");
        for record in records {
            if let LogRecord::Action(entry) = record {
                let verb = if entry.result { "hits" } else { "misses" };
                println!(
                    "  {} {} {} for {} ({}/{} left)",
                    entry.character1.name,
                    verb,
                    entry.character2.name,
                    entry.amount,
                    entry.character2.hitpoints,
                    entry.character2.max_hitpoints(),
                );
            }
        }
    }

    if let Some(result) = combat.log().result() {
        println!(
            "{} dealt {} damage, {} dealt {} damage",
            result.team1_name, result.team1_damage, result.team2_name, result.team2_damage
        );
    }
    println!("Winner: team {winner} ({})", combat.winner_name());

    // Replay with a fixed hit table to show how strategies are swapped
    let mut replay = Combat::with_config(CombatConfig::new().with_seed(2024))?
        .with_success_calculator(Arc::new(StaticSuccessCalculator));
    replay.set_duel_participants(knight()?, archer()?)?;
    println!(
        "With every attack landing, team {} wins after {} rounds",
        replay.execute()?,
        replay.round()
    );

    Ok(())
}
