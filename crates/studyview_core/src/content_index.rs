use serde::{Deserialize, Serialize};

use crate::{UnitNumber, UnitSeed};

/// Unit identifier as it appears in page data: producers mix numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitKey {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl UnitKey {
    /// Decimal string used for comparison; `3`, `3.0` and `"3"` all normalize to `"3"`.
    pub fn normalized(&self) -> String {
        match self {
            UnitKey::Integer(value) => value.to_string(),
            UnitKey::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                format!("{value:.0}")
            }
            UnitKey::Float(value) => value.to_string(),
            UnitKey::Text(text) => text.trim().to_string(),
        }
    }

    pub fn as_unit_number(&self) -> Option<UnitNumber> {
        self.normalized()
            .parse::<UnitNumber>()
            .ok()
            .filter(|number| *number > 0)
    }
}

impl From<UnitNumber> for UnitKey {
    fn from(value: UnitNumber) -> Self {
        UnitKey::Integer(i64::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedUnit {
    pub unit_number: UnitKey,
    #[serde(default)]
    pub detailed_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexMicroUnit {
    #[serde(default)]
    pub unit_number: Option<UnitKey>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexSection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub micro_units: Vec<IndexMicroUnit>,
}

/// Page-supplied content: sections plus the lazily shown detailed units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentIndex {
    #[serde(default)]
    pub sections: Vec<IndexSection>,
    #[serde(default)]
    pub detailed_units: Vec<DetailedUnit>,
}

/// Lookup seam for detailed unit content.
pub trait DetailSource {
    fn detailed_content(&self, unit: UnitNumber) -> Option<String>;
}

impl ContentIndex {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Unit seeds in document order.
    ///
    /// Sections without an id become `section-<n>`; micro units without a
    /// usable number take their 1-based position across the whole document.
    pub fn unit_seeds(&self) -> Vec<UnitSeed> {
        let mut seeds = Vec::new();
        let mut position: UnitNumber = 0;
        for (section_index, section) in self.sections.iter().enumerate() {
            let section_id = section
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("section-{}", section_index + 1));
            for micro in &section.micro_units {
                position += 1;
                let number = micro
                    .unit_number
                    .as_ref()
                    .and_then(UnitKey::as_unit_number)
                    .unwrap_or(position);
                let summary = micro
                    .content
                    .clone()
                    .or_else(|| micro.title.clone())
                    .unwrap_or_default();
                seeds.push(UnitSeed::new(number, section_id.clone(), summary));
            }
        }
        seeds
    }
}

impl DetailSource for ContentIndex {
    fn detailed_content(&self, unit: UnitNumber) -> Option<String> {
        let wanted = unit.to_string();
        self.detailed_units
            .iter()
            .find(|entry| entry.unit_number.normalized() == wanted)
            .and_then(|entry| entry.detailed_content.clone())
            .filter(|content| !content.trim().is_empty())
    }
}
