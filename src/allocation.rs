//! Deterministic risk-profile to asset-class allocation.
//!
//! Every result covers all eight asset classes, in enumeration order, and sums
//! to 100. The rationale is rendered from the final weights with
//! [`format_percentage`], so narrative and chart data always agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{AdvisorError, Result};
use crate::investor::RiskProfile;

/// Allowed drift of the weight total from 100.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Decimal places kept on weights and shown in text.
const DISPLAY_DECIMALS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
    RealEstate,
    Commodities,
    Cryptocurrency,
    Etfs,
    Reits,
}

impl AssetClass {
    /// Display order.
    pub const ALL: [AssetClass; 8] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Cash,
        AssetClass::RealEstate,
        AssetClass::Commodities,
        AssetClass::Cryptocurrency,
        AssetClass::Etfs,
        AssetClass::Reits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::Cash => "cash",
            AssetClass::RealEstate => "real_estate",
            AssetClass::Commodities => "commodities",
            AssetClass::Cryptocurrency => "cryptocurrency",
            AssetClass::Etfs => "etfs",
            AssetClass::Reits => "reits",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "Stocks",
            AssetClass::Bonds => "Bonds",
            AssetClass::Cash => "Cash",
            AssetClass::RealEstate => "Real Estate",
            AssetClass::Commodities => "Commodities",
            AssetClass::Cryptocurrency => "Cryptocurrency",
            AssetClass::Etfs => "ETFs",
            AssetClass::Reits => "REITs",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AssetClass {
    type Err = AdvisorError;

    /// Accepts the snake_case identifier, spaced or hyphenated variants and a
    /// few common aliases ("crypto", "real estate").
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "stocks" | "stock" | "equities" => Ok(AssetClass::Stocks),
            "bonds" | "bond" => Ok(AssetClass::Bonds),
            "cash" => Ok(AssetClass::Cash),
            "real_estate" | "realestate" => Ok(AssetClass::RealEstate),
            "commodities" | "commodity" => Ok(AssetClass::Commodities),
            "cryptocurrency" | "crypto" => Ok(AssetClass::Cryptocurrency),
            "etfs" | "etf" => Ok(AssetClass::Etfs),
            "reits" | "reit" => Ok(AssetClass::Reits),
            _ => Err(AdvisorError::unknown_asset_class(s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationWeight {
    pub asset_class: AssetClass,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    risk_profile: RiskProfile,
    weights: Vec<AllocationWeight>,
    rationale: String,
}

impl AllocationResult {
    pub fn risk_profile(&self) -> RiskProfile {
        self.risk_profile
    }

    /// One entry per asset class, in [`AssetClass::ALL`] order.
    pub fn weights(&self) -> &[AllocationWeight] {
        &self.weights
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn weight_of(&self, asset_class: AssetClass) -> f64 {
        self.weights
            .iter()
            .find(|w| w.asset_class == asset_class)
            .map(|w| w.percentage)
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|w| w.percentage).sum()
    }
}

/// Render a percentage the way it appears in every piece of narrative text.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Nominal policy weights for every class but cash, in [`AssetClass::ALL`]
/// order. Cash takes the remainder.
fn policy_table(profile: RiskProfile) -> [f64; 8] {
    // stocks, bonds, cash, real_estate, commodities, crypto, etfs, reits
    let mut table = match profile {
        RiskProfile::Conservative => [25.0, 45.0, 0.0, 5.0, 5.0, 0.0, 3.0, 2.0],
        RiskProfile::Moderate => [50.0, 25.0, 0.0, 5.0, 5.0, 2.0, 2.0, 1.0],
        RiskProfile::Aggressive => [65.0, 15.0, 0.0, 5.0, 5.0, 3.0, 1.0, 1.0],
    };
    let allocated: f64 = table.iter().sum();
    table[2] = (100.0 - allocated).max(0.0);
    table
}

fn round_to_display(value: f64) -> f64 {
    let factor = 10f64.powi(DISPLAY_DECIMALS);
    (value * factor).round() / factor
}

/// Force the total to 100 by moving the residual onto the largest weight.
///
/// Ties go to the class listed first. Returns the residual applied, or `None`
/// when the total was already within [`SUM_TOLERANCE`].
pub fn normalize(weights: &mut [AllocationWeight]) -> Option<f64> {
    let total: f64 = weights.iter().map(|w| w.percentage).sum();
    let residual = 100.0 - total;
    if residual.abs() <= SUM_TOLERANCE {
        return None;
    }

    // Strict `>` keeps the first of equal weights.
    let mut largest = 0;
    for (idx, w) in weights.iter().enumerate() {
        if w.percentage > weights[largest].percentage {
            largest = idx;
        }
    }
    let target = weights.get_mut(largest)?;
    warn!(
        asset_class = target.asset_class.as_str(),
        residual, "allocation total drifted from 100, adjusting largest class"
    );
    target.percentage += residual;
    Some(residual)
}

fn profile_explanation(profile: RiskProfile) -> &'static str {
    match profile {
        RiskProfile::Conservative => {
            "This mix prioritises capital preservation: bonds and cash carry most of the \
             portfolio, equity exposure is limited and there is no cryptocurrency."
        }
        RiskProfile::Moderate => {
            "This mix balances growth and stability: stocks lead, bonds and cash cushion \
             drawdowns and a small cryptocurrency position adds upside."
        }
        RiskProfile::Aggressive => {
            "This mix targets long-term growth: stocks dominate, fixed income is kept low \
             and cryptocurrency receives its largest share."
        }
    }
}

fn build_rationale(profile: RiskProfile, weights: &[AllocationWeight]) -> String {
    let breakdown = weights
        .iter()
        .map(|w| format!("{} {}", w.asset_class.display_name(), format_percentage(w.percentage)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} allocation: {}. {}",
        profile.title(),
        breakdown,
        profile_explanation(profile)
    )
}

/// Compute the target allocation for a risk profile.
pub fn compute_allocation(profile: RiskProfile) -> AllocationResult {
    let table = policy_table(profile);
    let mut weights: Vec<AllocationWeight> = AssetClass::ALL
        .iter()
        .zip(table.iter())
        .map(|(&asset_class, &nominal)| AllocationWeight {
            asset_class,
            percentage: round_to_display(nominal),
        })
        .collect();

    normalize(&mut weights);

    let rationale = build_rationale(profile, &weights);
    debug!(profile = profile.as_str(), "computed allocation");

    AllocationResult {
        risk_profile: profile,
        weights,
        rationale,
    }
}

/// Decode an untyped risk tolerance and compute its allocation.
pub fn compute_allocation_str(value: &str) -> Result<AllocationResult> {
    let profile: RiskProfile = value.parse()?;
    Ok(compute_allocation(profile))
}
