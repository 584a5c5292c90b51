use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use zzcombat::victory;
use zzcombat::*;

fn data(id: &str, strength: i32) -> CharacterData {
    CharacterData {
        id: id.into(),
        name: id.to_string(),
        level: 1,
        strength,
        dexterity: 10,
        constitution: 10,
        intelligence: 10,
        charisma: 10,
        initiative_formula: "1d2+DEX/4".parse().unwrap(),
    }
}

fn fighter(id: &str, strength: i32) -> Character {
    Character::new(data(id, strength))
        .unwrap()
        .with_initiative_parser(Arc::new(ConstantInitiativeFormulaParser(5)))
}

fn certain_combat(config: CombatConfig) -> Combat {
    Combat::with_config(config)
        .unwrap()
        .with_success_calculator(Arc::new(StaticSuccessCalculator))
}

fn attack_skill(target: SkillTarget, strikes: u32) -> CharacterSkill {
    let skill = SkillAttack::new(SkillAttackData {
        id: 1,
        name: "Cleave".to_string(),
        target,
        levels: 5,
        base_damage: "110%".to_string(),
        damage_growth: "10%".to_string(),
        strikes,
        hit_rate: None,
    })
    .unwrap();
    CharacterAttackSkill::new(Arc::new(skill), 1).into()
}

fn special_skill(
    target: SkillTarget,
    effect_type: EffectType,
    stat: Option<Stat>,
    value: i32,
) -> CharacterSkill {
    let skill = SkillSpecial::new(SkillSpecialData {
        id: 2,
        name: "Shout".to_string(),
        target,
        levels: 5,
        effect_type,
        stat,
        value,
        value_growth: 0,
        duration: 1,
    })
    .unwrap();
    CharacterSpecialSkill::new(Arc::new(skill), 1).into()
}

fn ready(mut character: Character) -> Character {
    for skill in character.skills_mut() {
        while !skill.is_usable() {
            skill.decrease_cooldown();
        }
    }
    character
}

#[test]
fn test_stronger_fighter_wins() {
    let mut combat = certain_combat(CombatConfig::new().with_seed(1));
    combat
        .set_duel_participants(fighter("Brute", 40), fighter("Weakling", 4))
        .unwrap();

    assert_eq!(combat.execute().unwrap(), 1);
    assert_eq!(combat.round(), 3);
    assert_eq!(combat.team1_damage(), 50);
    assert_eq!(combat.team2_damage(), 4);
    assert_eq!(combat.winner_name(), "Brute");

    let result = combat.log().result().unwrap();
    assert_eq!(result.winner, 1);
    assert_eq!(result.team1_damage, 50);
    assert_eq!(combat.log().round(), ROUND_COMBAT_END);
    assert_eq!(combat.log().round_records(1).len(), 2);
}

#[test]
fn test_round_limit_tie_goes_to_second_team() {
    let mut combat = certain_combat(CombatConfig::new().with_round_limit(3));
    combat
        .set_duel_participants(fighter("a", 0), fighter("b", 0))
        .unwrap();

    assert_eq!(combat.execute().unwrap(), 2);
    assert_eq!(combat.round(), 4);
    assert!(combat.log().round_records(4).is_empty());
    assert_eq!(combat.log().round_records(3).len(), 2);
    assert!(combat.log().entries().all(|entry| entry.amount == 0));
}

#[test]
fn test_stalemate_runs_to_default_round_limit() {
    let mut combat = certain_combat(CombatConfig::new());
    combat
        .set_duel_participants(fighter("a", 0), fighter("b", 0))
        .unwrap();

    assert_eq!(combat.round_limit(), 30);
    assert_eq!(combat.execute().unwrap(), 2);
    assert_eq!(combat.round(), 31);
    assert_eq!(combat.log().round(), ROUND_COMBAT_END);
    assert_eq!(combat.log().round_records(30).len(), 2);
    assert!(combat.log().round_records(31).is_empty());
    assert!(combat.characters().all(|c| c.hitpoints() == 50));
    assert!(combat.characters().all(|c| c.initiative() == 0));
}

#[test]
fn test_first_team_survives_at_limit() {
    let mut combat = certain_combat(CombatConfig::new().with_round_limit(2))
        .with_victory_condition(victory::first_team_survives);
    combat
        .set_duel_participants(fighter("a", 0), fighter("b", 0))
        .unwrap();
    assert_eq!(combat.execute().unwrap(), 1);
}

#[test]
fn test_seeded_combats_are_identical() {
    let run = || {
        let mut combat = Combat::with_config(CombatConfig::new().with_seed(99)).unwrap();
        let team1 = Team::new("Red").with_members(vec![
            fighter("r1", 14),
            fighter("r2", 12),
            fighter("r3", 16),
        ]);
        let team2 = Team::new("Blue").with_members(vec![
            fighter("b1", 13),
            fighter("b2", 15),
            fighter("b3", 12),
        ]);
        combat.set_teams(team1, team2).unwrap();
        let winner = combat.execute().unwrap();
        (winner, combat.log().to_json().unwrap())
    };
    let (winner, log) = run();
    assert!(winner == 1 || winner == 2);
    assert_eq!(run(), (winner, log));
}

#[test]
fn test_effects_stripped_and_initiative_reset_at_end() {
    let helmet = Equipment::new(EquipmentData {
        id: 1,
        name: "Helmet".to_string(),
        slot: EquipmentSlot::Helmet,
        weapon_type: None,
        strength: 10,
        worn: true,
        durability: None,
    })
    .unwrap();
    let mut combat = certain_combat(CombatConfig::new().with_seed(3));
    combat
        .set_duel_participants(
            fighter("a", 40).with_equipment(vec![helmet]),
            fighter("b", 4),
        )
        .unwrap();
    combat.execute().unwrap();

    let a = combat.character(&"a".into()).unwrap();
    assert!(a.effects().is_empty());
    assert_eq!(a.max_hitpoints(), 50);
    assert_eq!(a.initiative(), 0);
}

#[test]
fn test_step_by_step_phases() {
    let mut combat = certain_combat(CombatConfig::new().with_seed(4));
    combat
        .set_duel_participants(fighter("a", 10), fighter("b", 10))
        .unwrap();

    combat.fire(CombatPhase::CombatStart).unwrap();
    assert!(combat.characters().all(Character::has_position));
    assert_eq!(combat.round(), 0);

    combat.fire(CombatPhase::RoundStart).unwrap();
    assert_eq!(combat.round(), 1);
    assert_eq!(combat.log().round(), 1);
    assert!(combat.characters().all(|c| c.initiative() == 5));

    combat.fire(CombatPhase::Round).unwrap();
    assert_eq!(combat.log().round_records(1).len(), 2);
    assert!(combat.characters().all(|c| c.hitpoints() == 45));

    combat.fire(CombatPhase::RoundEnd).unwrap();
    assert!(combat.characters().all(|c| c.initiative() == 0));
    assert_eq!(combat.winner(), 0);
}

struct CountRounds(Arc<AtomicU32>);

impl CombatHook for CountRounds {
    fn name(&self) -> &'static str {
        "count_rounds"
    }

    fn run(&self, _: &mut Combat) -> Result<(), CombatError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_custom_hook_runs_every_round() {
    let counter = Arc::new(AtomicU32::new(0));
    let mut combat = certain_combat(CombatConfig::new().with_round_limit(4));
    combat.register_hook(CombatPhase::RoundEnd, Arc::new(CountRounds(counter.clone())));
    combat
        .set_duel_participants(fighter("a", 0), fighter("b", 0))
        .unwrap();
    combat.execute().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_idle_selector_leaves_everyone_unharmed() {
    let mut combat = certain_combat(CombatConfig::new().with_round_limit(2))
        .with_action_selector(Arc::new(IdleActionSelector));
    combat
        .set_duel_participants(fighter("a", 40), fighter("b", 40))
        .unwrap();
    assert_eq!(combat.execute().unwrap(), 2);
    assert!(combat.characters().all(|c| c.hitpoints() == 50));
    assert_eq!(combat.log().entries().count(), 0);
}

#[test]
fn test_heal_restores_half_intelligence() {
    let mut combat = certain_combat(CombatConfig::new()).with_healers(victory::first_team_members);
    let team1 = Team::new("Red").with_members(vec![fighter("medic", 10), fighter("tank", 10)]);
    let team2 = Team::new("Blue").with_members(vec![fighter("foe", 10)]);
    combat.set_teams(team1, team2).unwrap();

    assert!(!Heal.should_use(&combat, &"medic".into()));
    assert!(!Heal.should_use(&combat, &"foe".into()));
    combat.character_mut(&"tank".into()).unwrap().harm(30);
    assert!(Heal.should_use(&combat, &"medic".into()));
    assert!(!Heal.should_use(&combat, &"foe".into()));

    Heal.execute(&mut combat, &"medic".into()).unwrap();
    assert_eq!(combat.character(&"tank".into()).unwrap().hitpoints(), 25);
    assert_eq!(combat.team1_damage(), 0);
    let entry = combat.log().entries().last().unwrap();
    assert_eq!(entry.action, ActionKind::Healing);
    assert_eq!(entry.amount, 5);
}

#[test]
fn test_attack_skill_strikes_and_cools_down() {
    let mut combat = certain_combat(CombatConfig::new());
    let attacker = ready(fighter("a", 10).with_skills(vec![attack_skill(SkillTarget::Single, 2)]));
    combat
        .set_duel_participants(attacker, fighter("b", 10))
        .unwrap();

    assert!(SkillAttackAction.should_use(&combat, &"a".into()));
    SkillAttackAction.execute(&mut combat, &"a".into()).unwrap();

    assert_eq!(combat.character(&"b".into()).unwrap().hitpoints(), 40);
    assert_eq!(combat.team1_damage(), 10);
    let entries: Vec<&CombatLogEntry> = combat.log().entries().collect();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|e| e.action == ActionKind::SkillAttack && e.name == "Cleave" && e.amount == 5));
    let skill = &combat.character(&"a".into()).unwrap().skills()[0];
    assert_eq!(skill.cooldown(), zzcombat::skill::ATTACK_SKILL_COOLDOWN);
    assert!(!SkillAttackAction.should_use(&combat, &"a".into()));
}

#[test]
fn test_attack_skill_level_growth() {
    let skill = SkillAttack::new(SkillAttackData {
        id: 3,
        name: "Twin Slash".to_string(),
        target: SkillTarget::Single,
        levels: 5,
        base_damage: "60%".to_string(),
        damage_growth: "20%".to_string(),
        strikes: 2,
        hit_rate: None,
    })
    .unwrap();
    let slash = CharacterAttackSkill::new(Arc::new(skill), 2);
    assert_eq!(slash.damage_percent(), 80);

    let mut combat = certain_combat(CombatConfig::new());
    let attacker = ready(fighter("a", 10).with_skills(vec![slash.into()]));
    combat
        .set_duel_participants(attacker, fighter("b", 10))
        .unwrap();

    SkillAttackAction.execute(&mut combat, &"a".into()).unwrap();
    assert_eq!(combat.character(&"b".into()).unwrap().hitpoints(), 42);
    assert_eq!(combat.team1_damage(), 8);
    assert!(combat.log().entries().all(|e| e.amount == 4));
}

#[test]
fn test_row_skill_hits_whole_row() {
    let mut combat = certain_combat(CombatConfig::new().with_seed(8));
    let attacker = ready(fighter("a", 10).with_skills(vec![attack_skill(SkillTarget::Row, 1)]));
    let mut enemies = Team::new("Blue")
        .with_max_row_size(2)
        .with_members(vec![fighter("x", 10), fighter("y", 10), fighter("z", 10)]);
    enemies.assign_positions().unwrap();
    combat
        .set_teams(Team::new("Red").with_members(vec![attacker]), enemies)
        .unwrap();

    SkillAttackAction.execute(&mut combat, &"a".into()).unwrap();
    let hp = |id: &str| combat.character(&id.into()).unwrap().hitpoints();
    assert_eq!((hp("x"), hp("y"), hp("z")), (45, 45, 50));
}

#[test]
fn test_attack_skill_with_unsupported_target_fails() {
    let mut combat = certain_combat(CombatConfig::new());
    let attacker = ready(fighter("a", 10).with_skills(vec![attack_skill(SkillTarget::Party, 1)]));
    combat
        .set_duel_participants(attacker, fighter("b", 10))
        .unwrap();
    assert_eq!(
        SkillAttackAction.execute(&mut combat, &"a".into()),
        Err(CombatError::UnsupportedTarget {
            action: "skill_attack",
            target: "party",
        })
    );
}

#[test]
fn test_stun_skill_disables_enemy() {
    let mut combat = certain_combat(CombatConfig::new());
    let caster = ready(fighter("a", 10).with_skills(vec![special_skill(
        SkillTarget::Enemy,
        EffectType::Stun,
        None,
        0,
    )]));
    combat
        .set_duel_participants(caster, fighter("b", 10))
        .unwrap();

    assert!(SkillSpecialAction.should_use(&combat, &"a".into()));
    SkillSpecialAction.execute(&mut combat, &"a".into()).unwrap();

    let target = combat.character(&"b".into()).unwrap();
    assert!(target.is_stunned());
    assert!(DefaultCombatActionSelector
        .choose_action(&combat, &"b".into())
        .is_none());
    let entry = combat.log().entries().last().unwrap();
    assert_eq!(entry.action, ActionKind::SkillSpecial);
    assert!(entry.result);
    assert_eq!(entry.amount, 0);

    combat
        .character_mut(&"b".into())
        .unwrap()
        .tick_effect_durations();
    assert!(!combat.character(&"b".into()).unwrap().is_stunned());
}

#[test]
fn test_party_buff_reaches_every_member() {
    let mut combat = certain_combat(CombatConfig::new());
    let caster = ready(fighter("a", 10).with_skills(vec![special_skill(
        SkillTarget::Party,
        EffectType::Buff,
        Some(Stat::Strength),
        50,
    )]));
    let team1 = Team::new("Red").with_members(vec![caster, fighter("c", 10)]);
    let team2 = Team::new("Blue").with_members(vec![fighter("b", 10)]);
    combat.set_teams(team1, team2).unwrap();

    SkillSpecialAction.execute(&mut combat, &"a".into()).unwrap();
    let strength = |id: &str| combat.character(&id.into()).unwrap().strength();
    assert_eq!((strength("a"), strength("c"), strength("b")), (15, 15, 10));
    assert_eq!(combat.log().entries().count(), 2);
}

#[test]
fn test_default_selector_prefers_attack() {
    let mut combat = certain_combat(CombatConfig::new());
    let attacker = ready(fighter("a", 10).with_skills(vec![attack_skill(SkillTarget::Single, 1)]));
    combat
        .set_duel_participants(attacker, fighter("b", 10))
        .unwrap();
    let action = DefaultCombatActionSelector
        .choose_action(&combat, &"a".into())
        .unwrap();
    assert_eq!(action.kind(), ActionKind::Attack);

    combat.clear_actions();
    combat.register_action(Arc::new(SkillAttackAction));
    let action = DefaultCombatActionSelector
        .choose_action(&combat, &"a".into())
        .unwrap();
    assert_eq!(action.kind(), ActionKind::SkillAttack);
}

#[test]
fn test_ranged_attacker_ignores_hidden() {
    let bow = Equipment::new(EquipmentData {
        id: 5,
        name: "Bow".to_string(),
        slot: EquipmentSlot::Weapon,
        weapon_type: Some(WeaponType::Bow),
        strength: 0,
        worn: true,
        durability: None,
    })
    .unwrap();
    let mut combat = certain_combat(CombatConfig::new().with_seed(2));
    let archer = fighter("archer", 10).with_equipment(vec![bow]);
    let mut scout = fighter("scout", 10);
    scout.add_effect(
        CharacterEffect::builder("shadows", EffectType::Hide)
            .build()
            .unwrap(),
    );
    let team2 = Team::new("Blue").with_members(vec![scout, fighter("guard", 10)]);
    combat
        .set_teams(Team::new("Red").with_members(vec![archer]), team2)
        .unwrap();

    for _ in 0..10 {
        assert_eq!(
            combat.select_attack_target(&"archer".into()),
            Some("guard".into())
        );
    }
}

#[test]
fn test_config_from_json_drives_combat() {
    let config = CombatConfig::from_json(r#"{"round_limit": 1, "seed": 11}"#).unwrap();
    let mut combat = Combat::with_config(config)
        .unwrap()
        .with_success_calculator(Arc::new(StaticSuccessCalculator));
    combat
        .set_duel_participants(fighter("a", 2), fighter("b", 0))
        .unwrap();
    assert_eq!(combat.execute().unwrap(), 1);
    assert_eq!(combat.team1_damage(), 1);
}
