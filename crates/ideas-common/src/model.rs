/// Idea records as served by the spreadsheet-backed ideas endpoint.
///
/// Spreadsheet exports are loosely typed, so decoding accepts a few shapes per field:
/// - `id`: string or number
/// - `category`: JSON array of labels, or one comma-separated string
/// - `prize`: number or numeric string (blank cell is 0)
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Facet name meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_category")]
    pub category: Vec<String>,
    #[serde(default, deserialize_with = "de_prize")]
    pub prize: f64,
    #[serde(default)]
    pub difficulty: String,
}

impl Idea {
    pub fn has_category(&self, name: &str) -> bool {
        self.category.iter().any(|c| c == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    List(Vec<String>),
    Joined(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrize {
    Number(f64),
    Text(String),
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

fn de_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<RawCategory>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawCategory::List(labels)) => labels,
        Some(RawCategory::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

fn de_prize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let prize = match Option::<RawPrize>::deserialize(deserializer)? {
        None => 0.0,
        Some(RawPrize::Number(n)) => n,
        Some(RawPrize::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                0.0
            } else {
                text.parse::<f64>()
                    .map_err(|_| de::Error::custom(format!("prize is not a number: {text:?}")))?
            }
        }
    };
    if !prize.is_finite() || prize < 0.0 {
        return Err(de::Error::custom(format!(
            "prize must be a non-negative amount, got {prize}"
        )));
    }
    Ok(prize)
}
