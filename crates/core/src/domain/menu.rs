// Menu Domain Model - drinks and the equipment that makes them

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Drink Type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkType {
    #[default]
    Unspecified,
    Espresso,
    Latte,
    Frappe,
    Matcha,
}

impl DrinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkType::Unspecified => "unspecified",
            DrinkType::Espresso => "espresso",
            DrinkType::Latte => "latte",
            DrinkType::Frappe => "frappe",
            DrinkType::Matcha => "matcha",
        }
    }
}

impl std::fmt::Display for DrinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrinkType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unspecified" => Ok(DrinkType::Unspecified),
            "espresso" => Ok(DrinkType::Espresso),
            "latte" => Ok(DrinkType::Latte),
            "frappe" => Ok(DrinkType::Frappe),
            "matcha" => Ok(DrinkType::Matcha),
            other => Err(DomainError::ValidationError(format!(
                "unknown drink type: {}",
                other
            ))),
        }
    }
}

/// Equipment Type - identifies which resource pool a recipe step needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    Grinder,
    EspressoMachine,
    MilkSteamer,
    Blender,
    Whisk,
}

impl EquipmentType {
    /// Every equipment type, in declaration order
    pub const ALL: [EquipmentType; 5] = [
        EquipmentType::Grinder,
        EquipmentType::EspressoMachine,
        EquipmentType::MilkSteamer,
        EquipmentType::Blender,
        EquipmentType::Whisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Grinder => "grinder",
            EquipmentType::EspressoMachine => "espresso_machine",
            EquipmentType::MilkSteamer => "milk_steamer",
            EquipmentType::Blender => "blender",
            EquipmentType::Whisk => "whisk",
        }
    }
}

impl std::fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentType {
    type Err = DomainError;

    /// Accepts snake_case, SCREAMING_SNAKE_CASE and kebab-case spellings
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EquipmentType::ALL
            .into_iter()
            .find(|e| e.as_str() == normalized)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown equipment type: {}", s)))
    }
}
