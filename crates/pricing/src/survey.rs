//! Market comparable surveys and the subject property record.
//!
//! Both are owned by the data-fetching layer. The pricing crate only reads
//! them: factor values are looked up by code and read leniently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use appraise_engine::{Precision, RoundingPolicy};

use crate::lenient::decimal_from_json;

/// Factor codes the rule builders read.
pub mod factor {
    pub const OFFERING_PRICE: &str = "offeringPrice";
    pub const SELLING_PRICE: &str = "sellingPrice";
    pub const NUMBER_OF_YEARS: &str = "numberOfYears";
    pub const LAND_AREA: &str = "landArea";
    pub const USABLE_AREA: &str = "usableArea";
}

/// One `{factorCode, value, dataType, fieldDecimal}` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorDatum {
    pub factor_code: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub field_decimal: Option<u32>,
}

impl FactorDatum {
    /// True when the entry carries a non-null, non-blank value.
    pub fn is_present(&self) -> bool {
        match &self.value {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Numeric reading, rounded to `fieldDecimal` places when declared.
    /// Uses the same midpoint rule as every engine write.
    pub fn number(&self) -> Option<Decimal> {
        let d = decimal_from_json(self.value.as_ref()?)?;
        Some(match self.field_decimal {
            Some(dp) => RoundingPolicy::default().apply(d, Precision::Scale(dp)),
            None => d,
        })
    }
}

fn lookup<'a>(data: &'a [FactorDatum], code: &str) -> Option<&'a FactorDatum> {
    data.iter().find(|f| f.factor_code == code && f.is_present())
}

/// A market comparable (survey) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    #[serde(default)]
    pub factor_data: Vec<FactorDatum>,
}

impl Survey {
    pub fn new(id: impl Into<String>) -> Self {
        Survey {
            id: id.into(),
            factor_data: Vec::new(),
        }
    }

    /// Builder-style helper used by fixtures and the CLI.
    pub fn with_factor(mut self, code: &str, value: serde_json::Value) -> Self {
        self.factor_data.push(FactorDatum {
            factor_code: code.to_string(),
            value: Some(value),
            data_type: None,
            field_decimal: None,
        });
        self
    }

    pub fn has_factor(&self, code: &str) -> bool {
        lookup(&self.factor_data, code).is_some()
    }

    pub fn factor_number(&self, code: &str) -> Option<Decimal> {
        lookup(&self.factor_data, code).and_then(FactorDatum::number)
    }

    /// How this survey's adjusted value is derived.
    pub fn price_basis(&self) -> PriceBasis {
        if self.factor_number(factor::OFFERING_PRICE).is_some() {
            PriceBasis::Offering
        } else if self.factor_number(factor::SELLING_PRICE).is_some() {
            PriceBasis::Selling
        } else {
            PriceBasis::None
        }
    }
}

/// Offering price first, selling price as fallback, otherwise nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBasis {
    Offering,
    Selling,
    None,
}

/// The subject property being valued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub factor_data: Vec<FactorDatum>,
}

impl PropertyRecord {
    pub fn factor_number(&self, code: &str) -> Option<Decimal> {
        lookup(&self.factor_data, code).and_then(FactorDatum::number)
    }
}

/// Coarse comparison of a comparator against the subject on one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualitativeLevel {
    #[serde(rename = "E")]
    Equal,
    #[serde(rename = "I")]
    Inferior,
    #[serde(rename = "B")]
    Better,
}

impl QualitativeLevel {
    /// Accepts the stored codes (`E`, `I`, `B`) and the full words.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "E" | "EQUAL" => Some(QualitativeLevel::Equal),
            "I" | "INFERIOR" => Some(QualitativeLevel::Inferior),
            "B" | "BETTER" => Some(QualitativeLevel::Better),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            QualitativeLevel::Equal => "E",
            QualitativeLevel::Inferior => "I",
            QualitativeLevel::Better => "B",
        }
    }
}

/// One factor row of a qualitative / adjustment / score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeRow {
    pub factor_code: String,
    /// Score weight (WQS only); other methods ignore it.
    #[serde(default, deserialize_with = "crate::lenient::option_decimal")]
    pub weight: Option<Decimal>,
}

impl QualitativeRow {
    pub fn new(factor_code: impl Into<String>) -> Self {
        QualitativeRow {
            factor_code: factor_code.into(),
            weight: None,
        }
    }
}
