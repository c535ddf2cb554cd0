use serde::Serialize;
use tracing::{debug, info};

use crate::allocation::{AllocationResult, AllocationWeight, AssetClass};
use crate::error::{AdvisorError, Result};

// Differences at or below these (in percentage points) are ignored
const REBALANCE_THRESHOLD: f64 = 1.0;
const EQUAL_WEIGHT_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RebalanceAction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceSuggestion {
    pub asset_class: AssetClass,
    pub action: RebalanceAction,
    /// Signed change in percentage points (target - current).
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAnalysis {
    pub current_allocation: Vec<AllocationWeight>,
    pub diversification_score: f64,
    pub rebalancing_needed: bool,
    pub rebalancing_suggestions: Vec<RebalanceSuggestion>,
}

/// Convert market values per asset class into percentages of the total.
///
/// Duplicate classes are merged; output follows [`AssetClass::ALL`] order and
/// only lists classes that appear in `holdings`.
pub fn current_allocation(holdings: &[(AssetClass, f64)]) -> Result<Vec<AllocationWeight>> {
    let mut totals: Vec<(AssetClass, f64)> = Vec::new();
    for &(asset_class, value) in holdings {
        if !value.is_finite() || value < 0.0 {
            return Err(AdvisorError::InvalidHolding {
                asset: asset_class.as_str().to_string(),
                value,
            });
        }
        match totals.iter_mut().find(|(a, _)| *a == asset_class) {
            Some((_, v)) => *v += value,
            None => totals.push((asset_class, value)),
        }
    }

    let total_value: f64 = totals.iter().map(|(_, v)| v).sum();
    if total_value <= 0.0 {
        return Err(AdvisorError::EmptyPortfolio);
    }

    totals.sort_by_key(|(a, _)| *a);
    Ok(totals
        .into_iter()
        .map(|(asset_class, value)| AllocationWeight {
            asset_class,
            percentage: value / total_value * 100.0,
        })
        .collect())
}

/// `(1 - HHI) * 100` where HHI is the Herfindahl-Hirschman index of the weights.
pub fn diversification_score(weights: &[AllocationWeight]) -> f64 {
    let hhi: f64 = weights.iter().map(|w| (w.percentage / 100.0).powi(2)).sum();
    (1.0 - hhi) * 100.0
}

fn suggestion(asset_class: AssetClass, change: f64) -> RebalanceSuggestion {
    RebalanceSuggestion {
        asset_class,
        action: if change > 0.0 {
            RebalanceAction::Increase
        } else {
            RebalanceAction::Decrease
        },
        change,
    }
}

/// Describe a portfolio and flag classes far from an equal split.
pub fn analyze_portfolio(holdings: &[(AssetClass, f64)]) -> Result<PortfolioAnalysis> {
    let current = current_allocation(holdings)?;
    let score = diversification_score(&current);

    let equal_target = 100.0 / current.len() as f64;
    let rebalancing_suggestions: Vec<RebalanceSuggestion> = current
        .iter()
        .filter_map(|w| {
            let change = equal_target - w.percentage;
            (change.abs() > EQUAL_WEIGHT_THRESHOLD).then(|| suggestion(w.asset_class, change))
        })
        .collect();

    debug!(
        classes = current.len(),
        diversification_score = score,
        "analyzed portfolio"
    );

    Ok(PortfolioAnalysis {
        current_allocation: current,
        diversification_score: score,
        rebalancing_needed: !rebalancing_suggestions.is_empty(),
        rebalancing_suggestions,
    })
}

/// Changes needed to move `holdings` onto `target`, skipping anything within
/// one percentage point.
pub fn rebalance_portfolio(
    holdings: &[(AssetClass, f64)],
    target: &AllocationResult,
) -> Result<Vec<RebalanceSuggestion>> {
    let current = current_allocation(holdings)?;
    let current_of = |asset_class: AssetClass| {
        current
            .iter()
            .find(|w| w.asset_class == asset_class)
            .map(|w| w.percentage)
            .unwrap_or(0.0)
    };

    let suggestions: Vec<RebalanceSuggestion> = AssetClass::ALL
        .iter()
        .filter_map(|&asset_class| {
            let change = target.weight_of(asset_class) - current_of(asset_class);
            (change.abs() > REBALANCE_THRESHOLD).then(|| suggestion(asset_class, change))
        })
        .collect();

    info!(
        profile = target.risk_profile().as_str(),
        suggestions = suggestions.len(),
        "computed rebalancing suggestions"
    );

    Ok(suggestions)
}
