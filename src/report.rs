use serde::Serialize;
use tracing::info;

use crate::allocation::{compute_allocation, AllocationResult};
use crate::investor::InvestorProfile;

const MARKET_OUTLOOK: &str = "Current market conditions suggest a balanced approach to asset \
allocation. Diversification across multiple asset classes helps manage risk while maintaining \
growth potential.";

/// Chart row as the frontend expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationEntry {
    pub asset_type: String,
    pub allocation_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentReport {
    pub risk_level: String,
    pub allocation: Vec<AllocationEntry>,
    pub report: String,
}

/// Build the allocation chart and report text from a single allocation.
pub fn generate_report(profile: &InvestorProfile) -> InvestmentReport {
    let result = compute_allocation(profile.risk_tolerance);
    let report = render_report(profile, &result);

    info!(
        profile = profile.risk_tolerance.as_str(),
        name = %profile.name,
        "generated investment report"
    );

    InvestmentReport {
        risk_level: profile.risk_tolerance.as_str().to_string(),
        allocation: result
            .weights()
            .iter()
            .map(|w| AllocationEntry {
                asset_type: w.asset_class.as_str().to_string(),
                allocation_percentage: w.percentage,
            })
            .collect(),
        report,
    }
}

fn render_report(profile: &InvestorProfile, result: &AllocationResult) -> String {
    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let goal = profile.investment_goal.as_deref().unwrap_or("N/A");
    let horizon = profile.investment_horizon.map(|h| h.as_str());
    let risk = profile.risk_tolerance.as_str();

    let summary = format!(
        "Based on your profile (Age: {}, Risk Tolerance: {}, Investment Goal: {}, \
         Time Horizon: {}), we recommend a {} investment approach.",
        age,
        profile.risk_tolerance.title(),
        goal,
        horizon.unwrap_or("N/A"),
        risk
    );

    let recommendations = format!(
        "{} This allocation balances risk and return potential based on your {} risk profile and \
         {} investment horizon.",
        result.rationale(),
        risk,
        horizon.unwrap_or("long-term")
    );

    format!(
        "Summary:\n{}\n\nMarket Outlook:\n{}\n\nRecommendations:\n{}",
        summary, MARKET_OUTLOOK, recommendations
    )
}
