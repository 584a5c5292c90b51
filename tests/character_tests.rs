use proptest::prelude::*;
use std::sync::Arc;
use zzcombat::*;

fn data(id: &str, strength: i32) -> CharacterData {
    CharacterData {
        id: id.into(),
        name: format!("Player {id}"),
        level: 1,
        strength,
        dexterity: 10,
        constitution: 10,
        intelligence: 10,
        charisma: 10,
        initiative_formula: "1d2+DEX/4".parse().unwrap(),
    }
}

fn character() -> Character {
    Character::new(data("1", 10)).unwrap()
}

fn effect(id: &str, effect_type: EffectType, stat: Stat, value: i32) -> CharacterEffect {
    CharacterEffect::builder(id, effect_type)
        .stat(stat)
        .value(value)
        .absolute()
        .build()
        .unwrap()
}

fn item(id: u32, slot: EquipmentSlot, strength: u32) -> Equipment {
    Equipment::new(EquipmentData {
        id,
        name: format!("Item {id}"),
        slot,
        weapon_type: None,
        strength,
        worn: true,
        durability: None,
    })
    .unwrap()
}

#[test]
fn test_base_character() {
    let character = character();
    assert_eq!(character.max_hitpoints(), 50);
    assert_eq!(character.hitpoints(), 50);
    assert_eq!(character.damage(), 5);
    assert_eq!(character.hit(), 30);
    assert_eq!(character.dodge(), 30);
    assert_eq!(character.defense(), 0);
    assert!(character.can_act());
    assert!(!character.has_position());
}

#[test]
fn test_empty_name_rejected() {
    let mut data = data("1", 10);
    data.name = String::new();
    assert!(matches!(
        Character::new(data),
        Err(ValidationError::EmptyField(_))
    ));
}

#[test]
fn test_absolute_buff_and_removal() {
    let mut character = character();
    character.add_effect(effect("rage", EffectType::Buff, Stat::Strength, 6));
    assert_eq!(character.strength(), 16);
    assert_eq!(character.stat_base(Stat::Strength), 10);
    assert_eq!(character.damage(), 8);
    character.remove_effect("rage").unwrap();
    assert_eq!(character.strength(), 10);
    assert_eq!(character.damage(), 5);
}

#[test]
fn test_percentage_buff() {
    let mut character = character();
    let buff = CharacterEffect::builder("focus", EffectType::Buff)
        .stat(Stat::Dexterity)
        .value(50)
        .build()
        .unwrap();
    character.add_effect(buff);
    assert_eq!(character.dexterity(), 15);
    assert_eq!(character.hit(), 45);
}

#[test]
fn test_debuffs_are_capped() {
    let mut character = character();
    character.add_effect(effect("curse1", EffectType::Debuff, Stat::Strength, 5));
    character.add_effect(effect("curse2", EffectType::Debuff, Stat::Strength, 5));
    assert_eq!(character.strength(), 2);

    let mut character = self::character();
    character.add_effect(effect("curse", EffectType::Debuff, Stat::Strength, 3));
    assert_eq!(character.strength(), 7);
}

#[test]
fn test_max_hitpoints_effect_tracks_hitpoints() {
    let mut character = character();
    character.harm(20);
    character.add_effect(effect("vigor", EffectType::Buff, Stat::MaxHitpoints, 10));
    assert_eq!(character.max_hitpoints(), 60);
    assert_eq!(character.hitpoints(), 40);
    character.remove_effect("vigor").unwrap();
    assert_eq!(character.max_hitpoints(), 50);
    assert_eq!(character.hitpoints(), 30);
}

#[test]
fn test_max_hitpoints_effect_never_revives() {
    let mut character = character();
    character.harm(100);
    character.add_effect(effect("vigor", EffectType::Buff, Stat::MaxHitpoints, 10));
    assert_eq!(character.hitpoints(), 0);
    assert!(!character.is_alive());
}

#[test]
fn test_stun_blocks_acting_and_defending() {
    let mut character = character();
    let stun = CharacterEffect::builder("stun", EffectType::Stun)
        .duration(EffectDuration::Rounds(1))
        .build()
        .unwrap();
    character.add_effect(stun);
    assert!(character.is_stunned());
    assert!(!character.can_act());
    assert!(!character.can_defend());
    character.tick_effect_durations();
    assert!(character.can_act());
}

#[test]
fn test_remove_combat_effects_keeps_forever() {
    let mut character = character();
    let forever = CharacterEffect::builder("blessing", EffectType::Buff)
        .stat(Stat::Charisma)
        .value(5)
        .absolute()
        .duration(EffectDuration::Forever)
        .build()
        .unwrap();
    character.add_effect(forever);
    character.add_effect(effect("rage", EffectType::Buff, Stat::Strength, 6));
    let rounds = CharacterEffect::builder("haste", EffectType::Buff)
        .stat(Stat::Dexterity)
        .value(2)
        .absolute()
        .duration(EffectDuration::Rounds(3))
        .build()
        .unwrap();
    character.add_effect(rounds);

    let removed = character.remove_combat_effects();
    assert_eq!(removed.len(), 2);
    assert_eq!(character.effects().len(), 1);
    assert_eq!(character.charisma(), 15);
    assert_eq!(character.strength(), 10);
}

#[test]
fn test_equipment_refresh_keeps_hitpoints_consistent() {
    let mut character = character().with_equipment(vec![item(1, EquipmentSlot::Helmet, 10)]);
    character.apply_effect_providers();
    assert_eq!((character.hitpoints(), character.max_hitpoints()), (60, 60));
    character.apply_effect_providers();
    assert_eq!((character.hitpoints(), character.max_hitpoints()), (60, 60));
    assert_eq!(character.effects().len(), 1);
    character.remove_combat_effects();
    assert_eq!((character.hitpoints(), character.max_hitpoints()), (50, 50));
}

#[test]
fn test_weapon_drives_damage_stat() {
    let bow = Equipment::new(EquipmentData {
        id: 2,
        name: "Bow".to_string(),
        slot: EquipmentSlot::Weapon,
        weapon_type: Some(WeaponType::Bow),
        strength: 0,
        worn: true,
        durability: None,
    })
    .unwrap();
    let mut data = data("1", 10);
    data.dexterity = 20;
    let character = Character::new(data).unwrap().with_equipment(vec![bow]);
    assert!(character.has_ranged_weapon());
    assert_eq!(character.damage_stat(), Stat::Dexterity);
    assert_eq!(character.damage(), 10);
}

#[test]
fn test_last_worn_weapon_wins() {
    let weapon = |id, name: &str, weapon_type| {
        Equipment::new(EquipmentData {
            id,
            name: name.to_string(),
            slot: EquipmentSlot::Weapon,
            weapon_type: Some(weapon_type),
            strength: 0,
            worn: true,
            durability: None,
        })
        .unwrap()
    };
    let character = character().with_equipment(vec![
        weapon(1, "Bow", WeaponType::Bow),
        weapon(2, "Club", WeaponType::Club),
    ]);
    assert_eq!(character.damage_stat(), Stat::Constitution);
    assert!(!character.has_ranged_weapon());

    let character = self::character().with_equipment(vec![
        weapon(2, "Club", WeaponType::Club),
        weapon(1, "Bow", WeaponType::Bow),
    ]);
    assert_eq!(character.damage_stat(), Stat::Dexterity);
    assert!(character.has_ranged_weapon());
}

#[test]
fn test_pet_and_extra_provider() {
    let pet = Pet::new(PetData {
        id: 1,
        deployed: true,
        bonus_stat: Stat::Strength,
        bonus_value: 20,
    })
    .unwrap();
    let extra = StaticEffectsProvider::new(vec![effect(
        "aura",
        EffectType::Buff,
        Stat::Defense,
        3,
    )]);
    let mut character = character()
        .with_pets(vec![pet])
        .with_effect_provider(Arc::new(extra));
    character.apply_effect_providers();
    assert_eq!(character.active_pet(), Some(1));
    assert_eq!(character.strength(), 12);
    assert_eq!(character.defense(), 3);
}

#[test]
fn test_constant_initiative() {
    let mut character = character().with_initiative_parser(Arc::new(ConstantInitiativeFormulaParser(9)));
    character.recalculate_stats();
    assert_eq!(character.initiative(), 9);
    character.reset_initiative();
    assert_eq!(character.initiative(), 0);
    character.recalculate_stats();
    assert_eq!(character.initiative(), 9);
}

#[test]
fn test_dice_initiative_in_range() {
    let parser = Arc::new(DiceInitiativeFormulaParser::seeded(3));
    let mut character = character().with_initiative_parser(parser);
    for _ in 0..20 {
        character.roll_initiative();
        character.recalculate_stats();
        assert!((3..=4).contains(&character.initiative()));
    }
}

proptest! {
    #[test]
    fn prop_hitpoints_stay_in_bounds(
        steps in prop::collection::vec((any::<bool>(), 0i32..80), 0..30)
    ) {
        let mut character = character();
        for (heal, amount) in steps {
            if heal {
                character.heal(amount);
            } else {
                character.harm(amount);
            }
            prop_assert!(character.hitpoints() >= 0);
            prop_assert!(character.hitpoints() <= character.max_hitpoints());
        }
    }

    #[test]
    fn prop_debuffs_leave_a_fifth(strength in 0i32..200, debuffs in prop::collection::vec(0i32..500, 1..5)) {
        let mut character = Character::new(data("1", strength)).unwrap();
        for (i, value) in debuffs.into_iter().enumerate() {
            character.add_effect(effect(&format!("curse{i}"), EffectType::Debuff, Stat::Strength, value));
        }
        let floor = (f64::from(strength) * 0.2).floor() as i32;
        prop_assert!(character.strength() >= floor);
        prop_assert!(character.strength() <= strength);
    }
}
