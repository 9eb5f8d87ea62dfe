use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScentEngineError;

/// Gender classification, normalized from free-text source labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unisex,
}

impl Gender {
    /// String label as serialized in the durable documents
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unisex => "Unisex",
        }
    }

    /// Two classifications are compatible when equal or either side is Unisex
    pub fn compatible_with(&self, other: Gender) -> bool {
        *self == other || *self == Gender::Unisex || other == Gender::Unisex
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = ScentEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "unisex" => Ok(Gender::Unisex),
            other => Err(ScentEngineError::Other(format!(
                "unknown gender label: '{}'",
                other
            ))),
        }
    }
}

/// Primary scent family, derived from the highest-weighted main accord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScentType {
    Floral,
    Woody,
    Fresh,
    Citrus,
    Oriental,
    Gourmand,
    Green,
    Leather,
    Musk,
    Aquatic,
    #[default]
    Unclassified,
}

impl ScentType {
    /// The ten canonical families, excluding the Unclassified sentinel
    pub const CANONICAL: [ScentType; 10] = [
        ScentType::Floral,
        ScentType::Woody,
        ScentType::Fresh,
        ScentType::Citrus,
        ScentType::Oriental,
        ScentType::Gourmand,
        ScentType::Green,
        ScentType::Leather,
        ScentType::Musk,
        ScentType::Aquatic,
    ];

    /// String label as serialized in the durable documents
    pub fn label(&self) -> &'static str {
        match self {
            ScentType::Floral => "Floral",
            ScentType::Woody => "Woody",
            ScentType::Fresh => "Fresh",
            ScentType::Citrus => "Citrus",
            ScentType::Oriental => "Oriental",
            ScentType::Gourmand => "Gourmand",
            ScentType::Green => "Green",
            ScentType::Leather => "Leather",
            ScentType::Musk => "Musk",
            ScentType::Aquatic => "Aquatic",
            ScentType::Unclassified => "Unclassified",
        }
    }

    /// Classify an accord label into a canonical family.
    ///
    /// Exact label matches win; otherwise keyword containment decides
    /// ("fruity floral" is Floral, "woody aromatic" is Woody). Returns
    /// `None` when nothing in the vocabulary applies.
    pub fn classify(accord_label: &str) -> Option<ScentType> {
        let label = accord_label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        for scent in ScentType::CANONICAL {
            if label == scent.label().to_lowercase() {
                return Some(scent);
            }
        }
        // Containment checks in fixed order so mixed labels resolve
        // deterministically ("fresh floral" is Floral, not Fresh).
        const KEYWORDS: [(&str, ScentType); 16] = [
            ("floral", ScentType::Floral),
            ("woody", ScentType::Woody),
            ("wood", ScentType::Woody),
            ("citrus", ScentType::Citrus),
            ("oriental", ScentType::Oriental),
            ("spicy", ScentType::Oriental),
            ("sweet", ScentType::Gourmand),
            ("gourmand", ScentType::Gourmand),
            ("green", ScentType::Green),
            ("herbal", ScentType::Green),
            ("leather", ScentType::Leather),
            ("musk", ScentType::Musk),
            ("aquatic", ScentType::Aquatic),
            ("marine", ScentType::Aquatic),
            ("ozonic", ScentType::Aquatic),
            ("fresh", ScentType::Fresh),
        ];
        KEYWORDS
            .iter()
            .find(|(keyword, _)| label.contains(*keyword))
            .map(|(_, scent)| *scent)
    }
}

impl fmt::Display for ScentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScentType {
    type Err = ScentEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ScentType::CANONICAL
            .into_iter()
            .chain([ScentType::Unclassified])
            .find(|scent| scent.label().to_lowercase() == lowered)
            .ok_or_else(|| ScentEngineError::Other(format!("unknown scent type: '{}'", s)))
    }
}

/// One weighted main accord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accord {
    pub label: String,
    /// Relative strength in [0, 1]
    pub weight: f64,
}

impl Accord {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// Per-season suitability, each 1-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Seasonality {
    pub winter: u8,
    pub spring: u8,
    pub summer: u8,
    pub fall: u8,
}

impl Default for Seasonality {
    fn default() -> Self {
        Self {
            winter: 3,
            spring: 3,
            summer: 3,
            fall: 3,
        }
    }
}

/// Day/Night suitability, each 1-5, folded from richer source vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OccasionProfile {
    pub day: u8,
    pub night: u8,
}

impl Default for OccasionProfile {
    fn default() -> Self {
        Self { day: 3, night: 3 }
    }
}

/// Canonical perfume entity, independent of any provider's schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perfume {
    /// Stable unique identifier, synthesized at normalization time
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub brand: String,

    /// Non-negative price, currency implicit
    #[serde(default)]
    pub price: f64,

    /// Declared size such as "50ml"
    #[serde(default)]
    pub size: String,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub scent_type: ScentType,

    /// Synthesized description, not authoritative
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub image_url: String,

    /// Ordered note pyramid, tiers may be empty but never null
    #[serde(default)]
    pub top_notes: Vec<String>,

    #[serde(default)]
    pub heart_notes: Vec<String>,

    #[serde(default)]
    pub base_notes: Vec<String>,

    /// Weighted accord labels, weights in [0, 1], need not sum to 1
    #[serde(default)]
    pub main_accords: Vec<Accord>,

    #[serde(default)]
    pub seasonality: Seasonality,

    #[serde(default)]
    pub occasion: OccasionProfile,
}

impl Perfume {
    /// Create a new Perfume with required fields, everything else defaulted
    pub fn new(id: impl Into<String>, name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            price: 0.0,
            size: String::new(),
            gender: Gender::Unisex,
            scent_type: ScentType::Unclassified,
            description: String::new(),
            image_url: String::new(),
            top_notes: Vec::new(),
            heart_notes: Vec::new(),
            base_notes: Vec::new(),
            main_accords: Vec::new(),
            seasonality: Seasonality::default(),
            occasion: OccasionProfile::default(),
        }
    }

    /// Display name for logging/UI
    pub fn display_name(&self) -> String {
        if self.brand.is_empty() {
            self.name.clone()
        } else {
            format!("{} by {}", self.name, self.brand)
        }
    }

    /// Distinct lowercased accord labels, with the scent-type label included
    /// as if it were an accord. Basis for the questionnaire projection.
    pub fn accord_vocabulary(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::with_capacity(self.main_accords.len() + 1);
        for accord in &self.main_accords {
            let label = accord.label.trim().to_lowercase();
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        if self.scent_type != ScentType::Unclassified {
            let label = self.scent_type.label().to_lowercase();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}
