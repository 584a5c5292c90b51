use proptest::prelude::*;
use zzcombat::*;

fn member(id: u32) -> Character {
    Character::new(CharacterData {
        id: id.into(),
        name: format!("Player {id}"),
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

fn team(size: u32, max_row_size: u32) -> Team {
    Team::new("Team")
        .with_max_row_size(max_row_size)
        .with_members((1..=size).map(member).collect())
}

fn positions(team: &Team) -> Vec<(u32, u32)> {
    team.members()
        .iter()
        .map(|c| (c.position_row(), c.position_column()))
        .collect()
}

#[test]
fn test_position_errors() {
    let mut team = team(3, 1);
    assert_eq!(
        team.set_character_position(&9u32.into(), 1, 1),
        Err(PositionError::NotMember(9u32.into()))
    );
    team.set_character_position(&1u32.into(), 1, 1).unwrap();
    assert_eq!(
        team.set_character_position(&2u32.into(), 1, 2),
        Err(PositionError::RowFull { row: 1 })
    );

    let mut team = self::team(3, 5);
    team.set_character_position(&1u32.into(), 1, 1).unwrap();
    assert_eq!(
        team.set_character_position(&2u32.into(), 1, 1),
        Err(PositionError::PositionOccupied { row: 1, column: 1 })
    );
}

#[test]
fn test_assign_positions_wraps_rows() {
    let mut team = team(7, 3);
    team.assign_positions().unwrap();
    assert_eq!(
        positions(&team),
        vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3), (3, 1)]
    );
}

#[test]
fn test_assign_positions_from_config() {
    let config = CombatConfig {
        max_row_size: 2,
        ..CombatConfig::default()
    };
    let mut team = Team::with_config("Team", &config).with_members((1..=3).map(member).collect());
    team.assign_positions().unwrap();
    assert_eq!(positions(&team), vec![(1, 1), (1, 2), (2, 1)]);
}

#[test]
fn test_row_to_attack_moves_back() {
    let mut team = team(4, 2);
    team.assign_positions().unwrap();
    assert_eq!(team.row_to_attack(), Some(1));
    team.get_mut(&1u32.into()).unwrap().harm(100);
    assert_eq!(team.row_to_attack(), Some(1));
    team.get_mut(&2u32.into()).unwrap().harm(100);
    assert_eq!(team.row_to_attack(), Some(2));
    team.get_mut(&3u32.into()).unwrap().harm(100);
    team.get_mut(&4u32.into()).unwrap().harm(100);
    assert_eq!(team.row_to_attack(), None);
    assert!(!team.has_alive_members());
}

#[test]
fn test_member_queries() {
    let mut team = team(3, 5);
    assert_eq!(team.len(), 3);
    assert!(team.contains(&2u32.into()));
    team.get_mut(&2u32.into()).unwrap().harm(100);
    let stun = CharacterEffect::builder("stun", EffectType::Stun)
        .build()
        .unwrap();
    team.get_mut(&3u32.into()).unwrap().add_effect(stun);
    assert_eq!(team.alive_members().len(), 2);
    assert_eq!(team.usable_members().len(), 1);
}

#[test]
fn test_lowest_hp_respects_threshold() {
    let mut team = team(3, 5);
    assert!(team.lowest_hp_character(0.5).is_none());
    team.get_mut(&2u32.into()).unwrap().harm(30);
    team.get_mut(&3u32.into()).unwrap().harm(40);
    assert_eq!(team.lowest_hp_character(0.5).unwrap().id(), &CharacterId::from(3u32));
    team.get_mut(&3u32.into()).unwrap().harm(100);
    assert_eq!(team.lowest_hp_character(0.5).unwrap().id(), &CharacterId::from(2u32));
}

proptest! {
    #[test]
    fn prop_assigned_positions_are_unique(size in 1u32..20, max_row_size in 1u32..6) {
        let mut team = team(size, max_row_size);
        team.assign_positions().unwrap();
        let positions = positions(&team);
        for (i, a) in positions.iter().enumerate() {
            prop_assert!(a.0 >= 1 && a.1 >= 1);
            prop_assert!(a.1 <= max_row_size);
            prop_assert!(!positions[i + 1..].contains(a));
        }
    }
}
