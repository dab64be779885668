//! Portfolio holdings

use crate::error::{check_range, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol
    pub ticker: String,

    /// Display name
    pub name: String,

    /// Fraction of the portfolio in [0, 1]
    pub weight: f64,

    /// Share count, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,

    /// Last price, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
}

impl Holding {
    /// Create a holding without share or price data
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            weight,
            shares: None,
            current_price: None,
        }
    }

    /// Check the weight bound
    pub fn validate(&self) -> Result<(), DomainError> {
        check_range(&self.ticker, "holding.weight", self.weight, 0.0, 1.0, "[0, 1]")
    }
}

/// A named set of holdings
///
/// Weights are not required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Positions, in source order
    pub holdings: Vec<Holding>,

    /// When the portfolio was created
    pub created_at: DateTime<Utc>,

    /// When the holdings were last replaced
    pub updated_at: DateTime<Utc>,
}

impl Portfolio {
    /// Create a portfolio
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        holdings: Vec<Holding>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            holdings,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every holding at once
    pub fn replace_holdings(&mut self, holdings: Vec<Holding>, now: DateTime<Utc>) {
        self.holdings = holdings;
        self.updated_at = now;
    }

    /// Sum of holding weights
    pub fn total_weight(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }

    /// Whether the portfolio has no holdings
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Check every holding
    pub fn validate(&self) -> Result<(), DomainError> {
        self.holdings.iter().try_for_each(Holding::validate)
    }
}
