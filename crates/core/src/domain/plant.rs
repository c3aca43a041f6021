use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Grow-time ceiling (days) under which a plant counts as quick-growing.
pub const QUICK_GROWING_MAX_DAYS: u32 = 60;

/// Grow-time floor (days) above which a plant counts as slow-growing.
pub const SLOW_GROWING_MIN_DAYS: u32 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantCategory {
    Vegetable,
    Fruit,
    Herb,
}

impl PlantCategory {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "vegetable" | "vegetables" => Ok(Self::Vegetable),
            "fruit" | "fruits" => Ok(Self::Fruit),
            "herb" | "herbs" => Ok(Self::Herb),
            other => {
                Err(DomainError::InvalidValue { field: "category", value: other.to_string() })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetable => "vegetable",
            Self::Fruit => "fruit",
            Self::Herb => "herb",
        }
    }
}

/// Upstream catalog data spells sunlight two ways (`full`/`full_sun`,
/// `partial`/`partial_sun`, `low`/`shade`); the parser accepts both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sunlight {
    FullSun,
    PartialSun,
    Shade,
}

impl Sunlight {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full_sun" | "full" => Ok(Self::FullSun),
            "partial_sun" | "partial" | "partial_shade" => Ok(Self::PartialSun),
            "shade" | "low" => Ok(Self::Shade),
            other => {
                Err(DomainError::InvalidValue { field: "sunlight", value: other.to_string() })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullSun => "full_sun",
            Self::PartialSun => "partial_sun",
            Self::Shade => "shade",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    Small,
    Medium,
    Large,
}

impl Space {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(DomainError::InvalidValue { field: "space", value: other.to_string() }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maintenance {
    Low,
    Medium,
    High,
}

impl Maintenance {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => {
                Err(DomainError::InvalidValue { field: "maintenance", value: other.to_string() })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One catalog entry. Loaded once at startup and read-only afterwards;
/// identity is the case-insensitive name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub name: String,
    pub category: PlantCategory,
    pub sunlight: Sunlight,
    pub space: Space,
    pub maintenance: Maintenance,
    pub grow_time_days: u32,
    pub grow_time_label: String,
    pub indoor: bool,
    pub description: String,
    pub image_url: String,
    pub tags: Vec<String>,
}

impl PlantRecord {
    pub fn is_quick_growing(&self) -> bool {
        self.grow_time_days <= QUICK_GROWING_MAX_DAYS
    }

    pub fn is_slow_growing(&self) -> bool {
        self.grow_time_days > SLOW_GROWING_MIN_DAYS
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }

    pub fn name_matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other.trim())
    }
}
