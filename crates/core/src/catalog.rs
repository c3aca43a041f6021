//! Plant catalog: loaded once at startup, read-only afterwards.
//!
//! The catalog handle is built by the bootstrap path and injected into
//! request handlers; nothing in this crate holds it as a global. When the
//! configured flat file is missing or unparseable the embedded seed list is
//! substituted so the service stays usable in a degraded state.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::plant::{Maintenance, PlantCategory, PlantRecord, Space, Sunlight};
use crate::errors::DomainError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("catalog line {line}: {source}")]
    Record { line: usize, source: DomainError },
    #[error("catalog line {line}: expected {expected} columns, found {found}")]
    ColumnCount { line: usize, expected: usize, found: usize },
    #[error("catalog line {line}: invalid grow time `{value}`")]
    GrowTime { line: usize, value: String },
    #[error("catalog file contains no plant records")]
    Empty,
}

/// Where the active catalog came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Embedded { reason: String },
}

#[derive(Clone, Debug)]
pub struct Catalog {
    plants: Vec<PlantRecord>,
}

const COLUMNS: usize = 10;

impl Catalog {
    pub fn from_records(plants: Vec<PlantRecord>) -> Self {
        Self { plants }
    }

    pub fn plants(&self) -> &[PlantRecord] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&PlantRecord> {
        self.plants.iter().find(|plant| plant.name_matches(name))
    }

    /// Parse the delimited catalog format. Columns:
    /// name, category, sunlight, space, maintenance, grow_time, indoor,
    /// description, image_url, tags (tags separated by `;`). The first line
    /// is a header and is skipped. Fields may be double-quoted; `""` inside a
    /// quoted field is a literal quote.
    pub fn parse_delimited(raw: &str) -> Result<Self, CatalogError> {
        let mut plants = Vec::new();

        for (index, line) in raw.lines().enumerate() {
            if index == 0 || line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            let fields = split_delimited(line);
            if fields.len() != COLUMNS {
                return Err(CatalogError::ColumnCount {
                    line: line_number,
                    expected: COLUMNS,
                    found: fields.len(),
                });
            }

            let record = |source| CatalogError::Record { line: line_number, source };
            let grow_time_label = fields[5].trim().to_string();
            let grow_time_days = leading_days(&grow_time_label)
                .ok_or_else(|| CatalogError::GrowTime {
                    line: line_number,
                    value: grow_time_label.clone(),
                })?;

            plants.push(PlantRecord {
                name: fields[0].trim().to_string(),
                category: PlantCategory::parse(&fields[1]).map_err(record)?,
                sunlight: Sunlight::parse(&fields[2]).map_err(record)?,
                space: Space::parse(&fields[3]).map_err(record)?,
                maintenance: Maintenance::parse(&fields[4]).map_err(record)?,
                grow_time_days,
                grow_time_label,
                indoor: matches!(
                    fields[6].trim().to_ascii_lowercase().as_str(),
                    "true" | "yes" | "1" | "indoor"
                ),
                description: fields[7].trim().to_string(),
                image_url: fields[8].trim().to_string(),
                tags: fields[9]
                    .split(';')
                    .map(|tag| tag.trim().to_ascii_lowercase())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
            });
        }

        if plants.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { plants })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::parse_delimited(&raw)
    }

    /// Load from disk, substituting the embedded seed list on any failure.
    pub fn load_or_embedded(path: &Path) -> (Self, CatalogSource) {
        match Self::load(path) {
            Ok(catalog) => (catalog, CatalogSource::File(path.to_path_buf())),
            Err(error) => {
                (Self::embedded(), CatalogSource::Embedded { reason: error.to_string() })
            }
        }
    }

    pub fn embedded() -> Self {
        let plants = PLANT_SEEDS
            .iter()
            .map(|seed| PlantRecord {
                name: seed.name.to_owned(),
                category: seed.category,
                sunlight: seed.sunlight,
                space: seed.space,
                maintenance: seed.maintenance,
                grow_time_days: seed.grow_time_days,
                grow_time_label: seed.grow_time_label.to_owned(),
                indoor: seed.indoor,
                description: seed.description.to_owned(),
                image_url: seed.image_url.to_owned(),
                tags: seed.tags.iter().map(|tag| (*tag).to_owned()).collect(),
            })
            .collect();
        Self { plants }
    }
}

fn split_delimited(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && matches!(chars.peek(), Some('"')) => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// `"55"`, `"50-70 days"`, and `"2-3 years"` all resolve to the leading
/// number; a `year`/`season` suffix scales it to days.
fn leading_days(label: &str) -> Option<u32> {
    let digits: String = label.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    let value = digits.parse::<u32>().ok()?;

    let lowered = label.to_ascii_lowercase();
    if lowered.contains("year") {
        Some(value.saturating_mul(365))
    } else if lowered.contains("season") {
        Some(value.saturating_mul(120))
    } else {
        Some(value)
    }
}

struct PlantSeed {
    name: &'static str,
    category: PlantCategory,
    sunlight: Sunlight,
    space: Space,
    maintenance: Maintenance,
    grow_time_days: u32,
    grow_time_label: &'static str,
    indoor: bool,
    description: &'static str,
    image_url: &'static str,
    tags: &'static [&'static str],
}

const PLANT_SEEDS: &[PlantSeed] = &[
    PlantSeed {
        name: "Cherry Tomato",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 60,
        grow_time_label: "55-65 days",
        indoor: true,
        description: "Compact vining tomato that thrives in containers on a sunny sill.",
        image_url: "/images/plants/cherry-tomato.jpg",
        tags: &["salad", "containers"],
    },
    PlantSeed {
        name: "Strawberry",
        category: PlantCategory::Fruit,
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 60,
        grow_time_label: "60 days",
        indoor: true,
        description: "Everbearing variety that fruits through the season in hanging baskets.",
        image_url: "/images/plants/strawberry.jpg",
        tags: &["smoothie", "sweet"],
    },
    PlantSeed {
        name: "Sweet Basil",
        category: PlantCategory::Herb,
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 25,
        grow_time_label: "20-30 days",
        indoor: true,
        description: "Fast, fragrant herb for pesto and caprese; pinch tops to keep it bushy.",
        image_url: "/images/plants/sweet-basil.jpg",
        tags: &["salad", "aromatic"],
    },
    PlantSeed {
        name: "Fresh Mint",
        category: PlantCategory::Herb,
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 20,
        grow_time_label: "15-25 days",
        indoor: true,
        description: "Vigorous spreader best kept to its own pot; endless tea and mojitos.",
        image_url: "/images/plants/fresh-mint.jpg",
        tags: &["smoothie", "tea", "aromatic"],
    },
    PlantSeed {
        name: "Bell Pepper",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        maintenance: Maintenance::Medium,
        grow_time_days: 75,
        grow_time_label: "70-80 days",
        indoor: false,
        description: "Sweet peppers that color up from green to red with steady warmth.",
        image_url: "/images/plants/bell-pepper.jpg",
        tags: &["salad"],
    },
    PlantSeed {
        name: "Lettuce",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 45,
        grow_time_label: "40-50 days",
        indoor: true,
        description: "Cut-and-come-again leaves; sow every two weeks for a steady supply.",
        image_url: "/images/plants/lettuce.jpg",
        tags: &["salad"],
    },
    PlantSeed {
        name: "Spinach",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 40,
        grow_time_label: "35-45 days",
        indoor: true,
        description: "Cool-season green that bolts in heat; harvest outer leaves first.",
        image_url: "/images/plants/spinach.jpg",
        tags: &["salad", "smoothie"],
    },
    PlantSeed {
        name: "Kale",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        maintenance: Maintenance::Low,
        grow_time_days: 55,
        grow_time_label: "50-60 days",
        indoor: false,
        description: "Hardy brassica that sweetens after a light frost.",
        image_url: "/images/plants/kale.jpg",
        tags: &["smoothie", "salad"],
    },
    PlantSeed {
        name: "Radish",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 25,
        grow_time_label: "22-30 days",
        indoor: false,
        description: "The fastest payoff in the garden; ready in under a month.",
        image_url: "/images/plants/radish.jpg",
        tags: &["salad"],
    },
    PlantSeed {
        name: "Carrot",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        maintenance: Maintenance::Low,
        grow_time_days: 70,
        grow_time_label: "65-75 days",
        indoor: false,
        description: "Needs loose, stone-free soil for straight roots.",
        image_url: "/images/plants/carrot.jpg",
        tags: &["snack"],
    },
    PlantSeed {
        name: "Cucumber",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        maintenance: Maintenance::Medium,
        grow_time_days: 55,
        grow_time_label: "50-60 days",
        indoor: false,
        description: "Train up a trellis to save space and keep fruit straight.",
        image_url: "/images/plants/cucumber.jpg",
        tags: &["salad"],
    },
    PlantSeed {
        name: "Zucchini",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        maintenance: Maintenance::Medium,
        grow_time_days: 50,
        grow_time_label: "45-55 days",
        indoor: false,
        description: "Two plants feed a family; harvest small for the best texture.",
        image_url: "/images/plants/zucchini.jpg",
        tags: &["versatile"],
    },
    PlantSeed {
        name: "Blueberry",
        category: PlantCategory::Fruit,
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        maintenance: Maintenance::Medium,
        grow_time_days: 730,
        grow_time_label: "2-3 years",
        indoor: false,
        description: "Acid-loving shrub; a patient investment that bears for decades.",
        image_url: "/images/plants/blueberry.jpg",
        tags: &["smoothie", "perennial"],
    },
    PlantSeed {
        name: "Watermelon",
        category: PlantCategory::Fruit,
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        maintenance: Maintenance::Medium,
        grow_time_days: 95,
        grow_time_label: "90-100 days",
        indoor: false,
        description: "Sprawling vines that want heat, room, and consistent water.",
        image_url: "/images/plants/watermelon.jpg",
        tags: &["smoothie", "summer"],
    },
    PlantSeed {
        name: "Pumpkin",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        maintenance: Maintenance::Medium,
        grow_time_days: 110,
        grow_time_label: "100-120 days",
        indoor: false,
        description: "Sow after the last frost for an autumn harvest.",
        image_url: "/images/plants/pumpkin.jpg",
        tags: &["autumn"],
    },
    PlantSeed {
        name: "Rosemary",
        category: PlantCategory::Herb,
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 90,
        grow_time_label: "85-95 days",
        indoor: true,
        description: "Drought-tolerant woody herb; more plants die of kindness than neglect.",
        image_url: "/images/plants/rosemary.jpg",
        tags: &["aromatic", "perennial"],
    },
    PlantSeed {
        name: "Thyme",
        category: PlantCategory::Herb,
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 70,
        grow_time_label: "65-75 days",
        indoor: true,
        description: "Low, spreading herb that shrugs off poor soil.",
        image_url: "/images/plants/thyme.jpg",
        tags: &["aromatic"],
    },
    PlantSeed {
        name: "Parsley",
        category: PlantCategory::Herb,
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 75,
        grow_time_label: "70-80 days",
        indoor: true,
        description: "Slow to germinate, generous once established.",
        image_url: "/images/plants/parsley.jpg",
        tags: &["salad", "garnish"],
    },
    PlantSeed {
        name: "Cilantro",
        category: PlantCategory::Herb,
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        maintenance: Maintenance::Low,
        grow_time_days: 45,
        grow_time_label: "40-50 days",
        indoor: true,
        description: "Quick herb that bolts fast; succession-sow for a steady supply.",
        image_url: "/images/plants/cilantro.jpg",
        tags: &["salad", "salsa"],
    },
    PlantSeed {
        name: "Asparagus",
        category: PlantCategory::Vegetable,
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        maintenance: Maintenance::High,
        grow_time_days: 365,
        grow_time_label: "1-2 seasons",
        indoor: false,
        description: "Perennial bed that produces for twenty years once settled.",
        image_url: "/images/plants/asparagus.jpg",
        tags: &["perennial"],
    },
];
