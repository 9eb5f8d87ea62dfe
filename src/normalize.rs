//! Record Normalizer: converts arbitrary provider records into canonical
//! [`Perfume`] entities.
//!
//! Normalization is pure, deterministic and total. One malformed record can
//! never fail an ingestion pass; every missing or unusable field degrades to
//! a value from the [`defaults`] table, and each degradation is reported in
//! the [`NormalizedRecord::warnings`] side-channel instead of being raised.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::{Accord, Gender, OccasionProfile, Perfume, ScentType, Seasonality};

/// Fallback values for every field the normalizer can default.
///
/// Kept in one place so every degradation path is enumerable.
pub mod defaults {
    use crate::core::{Gender, ScentType};

    pub const NAME: &str = "Unknown";
    pub const BRAND: &str = "Unknown";
    pub const PRICE: f64 = 0.0;
    pub const SIZE: &str = "50ml";
    /// Standard bottle size inferred for eau de parfum / eau de toilette
    pub const SIZE_EDP_EDT: &str = "100ml";
    pub const GENDER: Gender = Gender::Unisex;
    pub const SCENT_TYPE: ScentType = ScentType::Unclassified;
    /// Midpoint for seasonality and occasion axes
    pub const AXIS_MIDPOINT: u8 = 3;
    pub const LONGEVITY: &str = "moderate";
    pub const SILLAGE: &str = "moderate";
    pub const IMAGE_URL: &str = "https://via.placeholder.com/300x400/c8b8d8/FFFFFF?text=Perfume";
}

/// Source occasion labels containing one of these fold into the Day bucket.
/// Checked before the night keywords, so ambiguous labels resolve to Day.
const DAY_KEYWORDS: [&str; 7] = [
    "casual", "daily", "day", "office", "sport", "work", "business",
];

/// Source occasion labels containing one of these fold into the Night bucket
const NIGHT_KEYWORDS: [&str; 7] = [
    "evening", "night", "date", "romantic", "party", "formal", "special",
];

/// Synthesized accord weights ramp down from 1.0 and never fall below this
const MIN_SYNTH_WEIGHT: f64 = 0.3;

/// One raw provider record: an arbitrary JSON object whose shape is not
/// trusted anywhere past this module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord(Map<String, Value>);

impl SourceRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; anything other than an object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.0.get(*key))
    }

    fn str_of(&self, keys: &[&str]) -> Option<&str> {
        self.first_of(keys)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A data-quality degradation observed while normalizing one record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeWarning {
    #[error("source record has no name")]
    MissingName,

    #[error("source record has no brand")]
    MissingBrand,

    #[error("price '{0}' is not parsable, defaulted to 0")]
    UnparsablePrice(String),

    #[error("price {0} is negative, defaulted to 0")]
    NegativePrice(f64),

    #[error("gender label '{0}' not recognized, defaulted to Unisex")]
    UnknownGender(String),

    #[error("no usable main accords, scent type left unclassified")]
    MissingAccords,

    #[error("accord '{0}' matches no scent family, scent type left unclassified")]
    UnclassifiedScent(String),
}

/// A canonical perfume together with the degradations met producing it
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub perfume: Perfume,
    pub warnings: Vec<NormalizeWarning>,
}

/// Normalize one raw provider record into a canonical [`Perfume`].
///
/// `origin` names the provider and prefixes the synthesized identifier, so
/// the same source record always maps to the same id and content.
pub fn normalize(source: &SourceRecord, origin: &str) -> NormalizedRecord {
    let mut warnings = Vec::new();

    let name = match source.str_of(&["Name", "name"]) {
        Some(name) => name.to_string(),
        None => {
            warnings.push(NormalizeWarning::MissingName);
            defaults::NAME.to_string()
        }
    };
    let brand = match source.str_of(&["Brand", "brand"]) {
        Some(brand) => brand.to_string(),
        None => {
            warnings.push(NormalizeWarning::MissingBrand);
            defaults::BRAND.to_string()
        }
    };
    let id = synthesize_id(source, origin, &brand, &name);

    let (price, price_warning) = parse_price(source.first_of(&["Price", "price"]));
    if let Some(warning) = price_warning {
        warnings.push(warning);
    }

    let (gender, gender_warning) = fold_gender(source.str_of(&["Gender", "gender"]));
    if let Some(warning) = gender_warning {
        warnings.push(warning);
    }

    let main_accords = parse_accords(source.first_of(&["Main Accords", "MainAccords", "main_accords"]));
    let scent_type = match strongest_accord(&main_accords) {
        None => {
            warnings.push(NormalizeWarning::MissingAccords);
            defaults::SCENT_TYPE
        }
        Some(accord) => match ScentType::classify(&accord.label) {
            Some(scent) => scent,
            None => {
                warnings.push(NormalizeWarning::UnclassifiedScent(accord.label.clone()));
                defaults::SCENT_TYPE
            }
        },
    };

    let (top_notes, heart_notes, base_notes) = parse_notes(source.first_of(&["Notes", "notes"]));

    let seasonality = parse_seasonality(source.first_of(&[
        "Season Ranking",
        "SeasonRanking",
        "season_ranking",
    ]));
    let occasion = parse_occasion(source.first_of(&[
        "Occasion Ranking",
        "OccasionRanking",
        "occasion_ranking",
    ]));

    let size = parse_size(source.str_of(&["OilType", "oil_type"]), &name);

    let longevity = source
        .str_of(&["Longevity", "longevity"])
        .unwrap_or(defaults::LONGEVITY);
    let sillage = source
        .str_of(&["Sillage", "sillage"])
        .unwrap_or(defaults::SILLAGE);
    let description = format!("A {} fragrance with {} projection.", longevity, sillage);

    let image_url = source
        .str_of(&["Image URL", "ImageURL", "image_url"])
        .unwrap_or(defaults::IMAGE_URL)
        .to_string();

    let perfume = Perfume {
        id,
        name,
        brand,
        price,
        size,
        gender,
        scent_type,
        description,
        image_url,
        top_notes,
        heart_notes,
        base_notes,
        main_accords,
        seasonality,
        occasion,
    };

    NormalizedRecord { perfume, warnings }
}

/// `{origin}_{raw id}` when the source carries an id, else
/// `{origin}_{slug(brand)}_{slug(name)}`
fn synthesize_id(source: &SourceRecord, origin: &str, brand: &str, name: &str) -> String {
    match source.first_of(&["Id", "ID", "id"]) {
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            format!("{}_{}", origin, raw.trim())
        }
        Some(Value::Number(raw)) => format!("{}_{}", origin, raw),
        _ => format!("{}_{}_{}", origin, slug(brand), slug(name)),
    }
}

/// Lowercase alphanumeric runs joined by underscores ("No 5" -> "no_5")
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut gap = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.extend(c.to_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

fn parse_price(value: Option<&Value>) -> (f64, Option<NormalizeWarning>) {
    let Some(value) = value else {
        return (defaults::PRICE, None);
    };
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(price) if price < 0.0 => {
                (defaults::PRICE, Some(NormalizeWarning::NegativePrice(price)))
            }
            Some(price) => (price, None),
            None => (
                defaults::PRICE,
                Some(NormalizeWarning::UnparsablePrice(n.to_string())),
            ),
        },
        Value::String(raw) => {
            let stripped: String = raw
                .chars()
                .filter(|c| *c != '$' && *c != '€' && *c != ',' && !c.is_whitespace())
                .collect();
            match stripped.parse::<f64>() {
                Ok(price) if price < 0.0 => {
                    (defaults::PRICE, Some(NormalizeWarning::NegativePrice(price)))
                }
                Ok(price) if price.is_finite() => (price, None),
                _ => (
                    defaults::PRICE,
                    Some(NormalizeWarning::UnparsablePrice(raw.clone())),
                ),
            }
        }
        other => (
            defaults::PRICE,
            Some(NormalizeWarning::UnparsablePrice(other.to_string())),
        ),
    }
}

/// Fold a free-text gender label into the canonical enum.
///
/// "women" must be checked before "men" since it contains it.
fn fold_gender(raw: Option<&str>) -> (Gender, Option<NormalizeWarning>) {
    let Some(raw) = raw else {
        return (defaults::GENDER, None);
    };
    let lowered = raw.to_lowercase();
    if lowered.contains("women") {
        (Gender::Female, None)
    } else if lowered.contains("men") {
        (Gender::Male, None)
    } else if lowered.contains("unisex") {
        (Gender::Unisex, None)
    } else {
        (
            defaults::GENDER,
            Some(NormalizeWarning::UnknownGender(raw.to_string())),
        )
    }
}

/// Parse main accords from either bare label strings or
/// `{name, weight|score}` objects.
///
/// Bare labels get synthesized weights ramping down from 1.0 in source
/// order, floored at [`MIN_SYNTH_WEIGHT`]. Explicit weights above 1 are
/// treated as percentages; everything is clamped into [0, 1].
fn parse_accords(value: Option<&Value>) -> Vec<Accord> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    let mut collected: Vec<(String, Option<f64>)> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::String(label) if !label.trim().is_empty() => {
                collected.push((label.trim().to_string(), None));
            }
            Value::Object(fields) => {
                let label = fields
                    .get("name")
                    .or_else(|| fields.get("label"))
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty());
                if let Some(label) = label {
                    let weight = fields
                        .get("weight")
                        .or_else(|| fields.get("score"))
                        .and_then(value_as_f64);
                    collected.push((label.to_string(), weight));
                }
            }
            _ => {}
        }
    }

    let count = collected.len();
    if count == 0 {
        return Vec::new();
    }
    let step = (0.7 / count as f64).min(0.07);
    collected
        .into_iter()
        .enumerate()
        .map(|(i, (label, weight))| {
            let weight = match weight {
                Some(w) if w > 1.0 => (w / 100.0).clamp(0.0, 1.0),
                Some(w) => w.clamp(0.0, 1.0),
                None => (1.0 - step * i as f64).max(MIN_SYNTH_WEIGHT),
            };
            Accord::new(label, weight)
        })
        .collect()
}

/// The accord with the greatest weight; earlier entries win ties
fn strongest_accord(accords: &[Accord]) -> Option<&Accord> {
    accords
        .iter()
        .fold(None, |best: Option<&Accord>, accord| match best {
            Some(current) if current.weight >= accord.weight => Some(current),
            _ => Some(accord),
        })
}

/// Note names from the nested `Notes.Top/Middle/Base` tiers.
/// Missing tiers become empty lists, never null.
fn parse_notes(value: Option<&Value>) -> (Vec<String>, Vec<String>, Vec<String>) {
    let tier = |key: &str| -> Vec<String> {
        let Some(Value::Object(notes)) = value else {
            return Vec::new();
        };
        let Some(Value::Array(entries)) = notes.get(key) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name.trim()),
                Value::Object(fields) => fields.get("name").and_then(Value::as_str).map(str::trim),
                _ => None,
            })
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    };
    (tier("Top"), tier("Middle"), tier("Base"))
}

fn parse_seasonality(value: Option<&Value>) -> Seasonality {
    let mut seasonality = Seasonality::default();
    let Some(Value::Array(entries)) = value else {
        return seasonality;
    };
    for entry in entries {
        let Value::Object(fields) = entry else {
            continue;
        };
        let name = fields
            .get("name")
            .or_else(|| fields.get("season"))
            .and_then(Value::as_str)
            .map(str::to_lowercase)
            .unwrap_or_default();
        let score = fields
            .get("score")
            .or_else(|| fields.get("value"))
            .and_then(value_as_f64)
            .unwrap_or(defaults::AXIS_MIDPOINT as f64);
        let score = clamp_axis(score);
        if name.contains("winter") {
            seasonality.winter = score;
        } else if name.contains("fall") || name.contains("autumn") {
            seasonality.fall = score;
        } else if name.contains("spring") {
            seasonality.spring = score;
        } else if name.contains("summer") {
            seasonality.summer = score;
        }
    }
    seasonality
}

/// Fold a richer occasion vocabulary into the Day/Night buckets.
///
/// Multiple source entries landing in the same bucket combine by maximum,
/// never by sum, so the 1-5 scale cannot inflate. Entries matching no
/// keyword are ignored; untouched buckets keep the midpoint default.
fn parse_occasion(value: Option<&Value>) -> OccasionProfile {
    let mut day: Option<f64> = None;
    let mut night: Option<f64> = None;
    if let Some(Value::Array(entries)) = value {
        for entry in entries {
            let Value::Object(fields) = entry else {
                continue;
            };
            let name = fields
                .get("name")
                .or_else(|| fields.get("occasion"))
                .and_then(Value::as_str)
                .map(str::to_lowercase)
                .unwrap_or_default();
            let score = fields
                .get("score")
                .or_else(|| fields.get("value"))
                .and_then(value_as_f64)
                .unwrap_or(defaults::AXIS_MIDPOINT as f64);
            if DAY_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
                day = Some(day.map_or(score, |current| current.max(score)));
            } else if NIGHT_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
                night = Some(night.map_or(score, |current| current.max(score)));
            }
        }
    }
    OccasionProfile {
        day: day.map(clamp_axis).unwrap_or(defaults::AXIS_MIDPOINT),
        night: night.map(clamp_axis).unwrap_or(defaults::AXIS_MIDPOINT),
    }
}

/// Explicit size field wins when it names a volume; otherwise infer the
/// standard bottle for eau de parfum / eau de toilette names.
fn parse_size(oil_type: Option<&str>, name: &str) -> String {
    if let Some(oil_type) = oil_type {
        if oil_type.to_lowercase().contains("ml") {
            return oil_type.to_string();
        }
    }
    let name_lower = name.to_lowercase();
    if name_lower.contains("eau de parfum") || name_lower.contains("eau de toilette") {
        defaults::SIZE_EDP_EDT.to_string()
    } else {
        defaults::SIZE.to_string()
    }
}

fn clamp_axis(score: f64) -> u8 {
    if !score.is_finite() {
        return defaults::AXIS_MIDPOINT;
    }
    (score.round() as i64).clamp(1, 5) as u8
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
