//! Equipment and weapons.

use crate::effect::{CharacterEffect, EffectDuration, EffectType};
use crate::error::ValidationError;
use crate::provider::CharacterEffectsProvider;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};

/// Slot an item is worn in. Each slot boosts one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Shield,
    Amulet,
    Helmet,
}

impl EquipmentSlot {
    pub fn bonus_stat(self) -> Stat {
        match self {
            EquipmentSlot::Weapon => Stat::Damage,
            EquipmentSlot::Armor => Stat::Defense,
            EquipmentSlot::Helmet => Stat::MaxHitpoints,
            EquipmentSlot::Shield => Stat::Dodge,
            EquipmentSlot::Amulet => Stat::Initiative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Sword,
    Axe,
    Club,
    Dagger,
    Spear,
    Staff,
    Bow,
    Crossbow,
    #[serde(rename = "throwing knife")]
    ThrowingKnife,
    Instrument,
}

impl WeaponType {
    pub fn is_ranged(self) -> bool {
        matches!(
            self,
            WeaponType::Staff
                | WeaponType::Bow
                | WeaponType::Crossbow
                | WeaponType::ThrowingKnife
                | WeaponType::Instrument
        )
    }

    /// Primary stat that drives damage when wielding this weapon.
    pub fn damage_stat(self) -> Stat {
        match self {
            WeaponType::Staff => Stat::Intelligence,
            WeaponType::Club => Stat::Constitution,
            WeaponType::Bow | WeaponType::ThrowingKnife => Stat::Dexterity,
            WeaponType::Instrument => Stat::Charisma,
            _ => Stat::Strength,
        }
    }
}

/// Wear state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durability {
    pub current: u32,
    pub max: u32,
}

impl Durability {
    /// Percentage of the item's strength still in effect.
    ///
    /// ```rust
    /// use zzcombat::Durability;
    ///
    /// assert_eq!(Durability { current: 8, max: 10 }.strength_percent(), 100);
    /// assert_eq!(Durability { current: 5, max: 10 }.strength_percent(), 75);
    /// assert_eq!(Durability { current: 0, max: 10 }.strength_percent(), 0);
    /// ```
    pub fn strength_percent(&self) -> u32 {
        let ratio = |percent: u32| u64::from(self.current) * 100 >= u64::from(self.max) * u64::from(percent);
        if ratio(70) {
            100
        } else if ratio(50) {
            75
        } else if ratio(25) {
            50
        } else if ratio(10) {
            25
        } else {
            0
        }
    }
}

/// Plain data form of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentData {
    pub id: u32,
    pub name: String,
    pub slot: EquipmentSlot,
    #[serde(default, rename = "type")]
    pub weapon_type: Option<WeaponType>,
    pub strength: u32,
    pub worn: bool,
    #[serde(default)]
    pub durability: Option<Durability>,
}

/// A validated piece of equipment.
///
/// Worn items grant an absolute, combat-scoped buff to their slot's stat.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{CharacterEffectsProvider, Equipment, EquipmentData, EquipmentSlot, Stat, WeaponType};
///
/// let sword = Equipment::new(EquipmentData {
///     id: 1,
///     name: "Sword".to_string(),
///     slot: EquipmentSlot::Weapon,
///     weapon_type: Some(WeaponType::Sword),
///     strength: 4,
///     worn: true,
///     durability: None,
/// })
/// .unwrap();
///
/// let effects = sword.combat_effects();
/// assert_eq!(effects[0].id(), "equipment1bonusEffect");
/// assert_eq!(effects[0].stat(), Some(Stat::Damage));
/// assert_eq!(effects[0].value(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EquipmentData", into = "EquipmentData")]
pub struct Equipment {
    data: EquipmentData,
}

impl Equipment {
    pub fn new(data: EquipmentData) -> Result<Self, ValidationError> {
        if data.name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if data.weapon_type.is_some() && data.slot != EquipmentSlot::Weapon {
            return Err(ValidationError::WeaponTypeOnNonWeapon(data.id));
        }
        if let Some(durability) = data.durability {
            if durability.current > durability.max {
                return Err(ValidationError::OutOfRange {
                    field: "durability",
                    value: i64::from(durability.current),
                });
            }
        }
        Ok(Self { data })
    }

    pub fn id(&self) -> u32 {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn slot(&self) -> EquipmentSlot {
        self.data.slot
    }

    pub fn weapon_type(&self) -> Option<WeaponType> {
        self.data.weapon_type
    }

    pub fn strength(&self) -> u32 {
        self.data.strength
    }

    /// Strength after durability wear.
    pub fn effective_strength(&self) -> u32 {
        match self.data.durability {
            Some(durability) => self.data.strength * durability.strength_percent() / 100,
            None => self.data.strength,
        }
    }

    pub fn durability(&self) -> Option<Durability> {
        self.data.durability
    }

    pub fn is_worn(&self) -> bool {
        self.data.worn
    }

    pub fn set_worn(&mut self, worn: bool) {
        self.data.worn = worn;
    }

    pub fn is_ranged(&self) -> bool {
        self.data.weapon_type.is_some_and(WeaponType::is_ranged)
    }

    pub fn effect_id(&self) -> String {
        format!("equipment{}bonusEffect", self.data.id)
    }
}

impl CharacterEffectsProvider for Equipment {
    fn combat_effects(&self) -> Vec<CharacterEffect> {
        if !self.data.worn {
            return Vec::new();
        }
        let value = i32::try_from(self.effective_strength()).unwrap_or(i32::MAX);
        CharacterEffect::builder(self.effect_id(), EffectType::Buff)
            .stat(self.data.slot.bonus_stat())
            .value(value)
            .absolute()
            .duration(EffectDuration::Combat)
            .build()
            .into_iter()
            .collect()
    }
}

impl TryFrom<EquipmentData> for Equipment {
    type Error = ValidationError;

    fn try_from(data: EquipmentData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<Equipment> for EquipmentData {
    fn from(equipment: Equipment) -> Self {
        equipment.data
    }
}
