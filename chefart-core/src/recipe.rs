//! Recipe input and the enriched recipe record.
//!
//! The enriched record keeps the wire names the enrichment prompt asks for
//! (`judul`, `bahan_detail`, `langkah`, ...) so that responses deserialize
//! directly; Rust-side field names are English.

use serde::{Deserialize, Deserializer, Serialize};

/// Raw recipe fields as typed by the user. Any field may be fragmentary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInput {
    pub title: String,
    pub ingredients: String,
    pub steps: String,
    #[serde(default)]
    pub tip: String,
}

impl RecipeInput {
    pub fn new(
        title: impl Into<String>,
        ingredients: impl Into<String>,
        steps: impl Into<String>,
        tip: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            ingredients: ingredients.into(),
            steps: steps.into(),
            tip: tip.into(),
        }
    }

    /// Strict validation: title and ingredients must not be blank.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.title.trim().is_empty() {
            return Err(InputError::MissingField("title"));
        }
        if self.ingredients.trim().is_empty() {
            return Err(InputError::MissingField("ingredients"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please fill in the recipe {0}")]
    MissingField(&'static str),
}

/// One ingredient line, optionally paired with a Font Awesome icon name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IngredientWire")]
pub struct IngredientEntry {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl IngredientEntry {
    pub fn new(name: impl Into<String>, icon: Option<&str>) -> Self {
        Self {
            name: name.into(),
            icon: icon.map(str::to_string),
        }
    }
}

/// Ingredients arrive either as `{"nama", "icon"}` objects or bare strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientWire {
    Detailed {
        nama: String,
        #[serde(default)]
        icon: Option<String>,
    },
    Plain(String),
}

impl From<IngredientWire> for IngredientEntry {
    fn from(wire: IngredientWire) -> Self {
        match wire {
            IngredientWire::Detailed { nama, icon } => IngredientEntry {
                name: nama,
                icon: icon.filter(|i| !i.trim().is_empty()),
            },
            IngredientWire::Plain(name) => IngredientEntry { name, icon: None },
        }
    }
}

/// Rough nutrition estimate. Values are free text ("250", "12g").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(rename = "kalori", default, deserialize_with = "text_or_number")]
    pub calories: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub protein: String,
    #[serde(rename = "karbo", default, deserialize_with = "text_or_number")]
    pub carbohydrate: String,
    #[serde(rename = "lemak", default, deserialize_with = "text_or_number")]
    pub fat: String,
}

/// Structured recipe returned by enrichment. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecipe {
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "deskripsi", default)]
    pub description: String,
    #[serde(rename = "bahan_detail", alias = "bahan")]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(rename = "langkah", deserialize_with = "one_or_many")]
    pub steps: Vec<String>,
    #[serde(rename = "trik", default, deserialize_with = "one_or_many")]
    pub tips: Vec<String>,
    #[serde(rename = "nutrisi", default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

/// Keys a response must carry before it is accepted. Each inner slice lists
/// accepted spellings of one key.
pub const REQUIRED_KEYS: &[&[&str]] = &[&["judul"], &["bahan_detail", "bahan"], &["langkah"]];

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Accept a JSON string, number or null as text. Models often answer
/// `"kalori": 180` instead of `"180"`.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}
