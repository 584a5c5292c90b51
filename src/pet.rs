//! Pets.

use crate::effect::{CharacterEffect, EffectDuration, EffectType};
use crate::error::ValidationError;
use crate::provider::CharacterEffectsProvider;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetData {
    pub id: u32,
    pub deployed: bool,
    pub bonus_stat: Stat,
    pub bonus_value: u32,
}

/// A companion that boosts one primary stat by a percentage while deployed.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{CharacterEffectsProvider, Pet, PetData, Stat};
///
/// let pet = Pet::new(PetData {
///     id: 3,
///     deployed: true,
///     bonus_stat: Stat::Constitution,
///     bonus_value: 10,
/// })
/// .unwrap();
///
/// let effects = pet.combat_effects();
/// assert_eq!(effects[0].id(), "pet3bonusEffect");
/// assert!(!effects[0].is_value_absolute());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PetData", into = "PetData")]
pub struct Pet {
    data: PetData,
}

impl Pet {
    pub fn new(data: PetData) -> Result<Self, ValidationError> {
        if !data.bonus_stat.is_primary() {
            return Err(ValidationError::NotPrimaryStat(data.bonus_stat));
        }
        Ok(Self { data })
    }

    pub fn id(&self) -> u32 {
        self.data.id
    }

    pub fn is_deployed(&self) -> bool {
        self.data.deployed
    }

    pub fn set_deployed(&mut self, deployed: bool) {
        self.data.deployed = deployed;
    }

    pub fn bonus_stat(&self) -> Stat {
        self.data.bonus_stat
    }

    pub fn bonus_value(&self) -> u32 {
        self.data.bonus_value
    }

    pub fn effect_id(&self) -> String {
        format!("pet{}bonusEffect", self.data.id)
    }
}

impl CharacterEffectsProvider for Pet {
    fn combat_effects(&self) -> Vec<CharacterEffect> {
        if !self.data.deployed {
            return Vec::new();
        }
        let value = i32::try_from(self.data.bonus_value).unwrap_or(i32::MAX);
        CharacterEffect::builder(self.effect_id(), EffectType::Buff)
            .stat(self.data.bonus_stat)
            .value(value)
            .duration(EffectDuration::Combat)
            .build()
            .into_iter()
            .collect()
    }
}

impl TryFrom<PetData> for Pet {
    type Error = ValidationError;

    fn try_from(data: PetData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<Pet> for PetData {
    fn from(pet: Pet) -> Self {
        pet.data
    }
}
