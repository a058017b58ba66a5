use crate::error::ValidationError;
use crate::models::Property;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A hypothetical deal on one property. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DealAnalysisInput {
    pub purchase_price: f64,
    pub rehab_cost: f64,
    pub arv: f64,
    pub holding_costs: f64,
}

impl DealAnalysisInput {
    pub fn new(purchase_price: f64, rehab_cost: f64, arv: f64, holding_costs: f64) -> Self {
        Self {
            purchase_price,
            rehab_cost,
            arv,
            holding_costs,
        }
    }

    /// Starting scenario for a listing: purchase price from the asking price, everything else zero
    pub fn for_property(property: &Property) -> Self {
        Self {
            purchase_price: property.price,
            ..Default::default()
        }
    }

    pub fn with_rehab_cost(mut self, value: f64) -> Self {
        self.rehab_cost = value;
        self
    }

    pub fn with_arv(mut self, value: f64) -> Self {
        self.arv = value;
        self
    }

    pub fn with_holding_costs(mut self, value: f64) -> Self {
        self.holding_costs = value;
        self
    }

    /// Rejects negative or non-finite amounts. The calculator itself does not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("purchase price", self.purchase_price),
            ("rehab cost", self.rehab_cost),
            ("after-repair value", self.arv),
            ("holding costs", self.holding_costs),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite(field));
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }
}

/// Return on investment as a percentage.
///
/// `Undefined` is produced when nothing was invested. It serializes as `null`
/// and is never equal to any percentage, including zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Roi {
    Percent(f64),
    Undefined,
}

impl Roi {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Roi::Percent(value) => Some(*value),
            Roi::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Roi::Undefined)
    }
}

impl From<Option<f64>> for Roi {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Roi::Percent(v),
            _ => Roi::Undefined,
        }
    }
}

impl From<Roi> for Option<f64> {
    fn from(roi: Roi) -> Self {
        roi.percent()
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Roi::Percent(value) => write!(f, "{:.2}%", value),
            Roi::Undefined => f.write_str("n/a"),
        }
    }
}

/// Profitability of a deal, at full precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealMetrics {
    pub total_investment: f64,
    pub potential_profit: f64,
    pub roi: Roi,
}

impl fmt::Display for DealMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Investment: ${:.2}", self.total_investment)?;
        writeln!(f, "Potential Profit: ${:.2}", self.potential_profit)?;
        write!(f, "Return on Investment: {}", self.roi)
    }
}
