use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;

// ── Request DTOs ─────────────────────────────────────────────────────────────

/// One line of a [`DraftRequest`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLineRequest {
    pub product_id: String,
    /// Whatever was typed into the quantity field. Missing, below 1 or not
    /// an integer ends up as 1.
    #[serde(default)]
    pub quantity: Option<RawQuantity>,
    /// Decimal price as a string, e.g. "9.99". Overrides the catalog price;
    /// anything unparseable or negative becomes 0.
    #[serde(default)]
    pub unit_price: Option<String>,
}

/// A quantity as sent by the form: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for RawQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawQuantity::Number(n) => write!(f, "{n}"),
            RawQuantity::Text(s) => f.write_str(s),
        }
    }
}

/// The fields of the create-invoice form, as the command-line driver reads
/// them from a JSON file. Ids are resolved against the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    #[serde(default)]
    pub number: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub customer_id: Option<String>,
    pub payment_term_id: Option<String>,
    pub salesperson_id: Option<String>,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub lines: Vec<DraftLineRequest>,
}
