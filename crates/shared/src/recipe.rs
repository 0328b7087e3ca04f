use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Orange,
}

/// Unit marking a dimensionless quantity ("3 eggs").
pub const COUNT_UNIT: &str = "count";

#[derive(Validate, Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Ingredient {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[validate(length(max = 40))]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }

    pub fn is_count(&self) -> bool {
        self.unit == COUNT_UNIT
    }

    /// `range` lets NaN through, so finiteness is checked on its own.
    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}
