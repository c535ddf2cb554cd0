//! Property tests for portfolio analysis and rebalancing.

use proptest::prelude::*;

use wealth_advisor::portfolio::{
    analyze_portfolio, current_allocation, rebalance_portfolio, RebalanceAction,
};
use wealth_advisor::{compute_allocation, AssetClass, RiskProfile};

fn arb_asset_class() -> impl Strategy<Value = AssetClass> {
    prop::sample::select(AssetClass::ALL.to_vec())
}

fn arb_profile() -> impl Strategy<Value = RiskProfile> {
    prop_oneof![
        Just(RiskProfile::Conservative),
        Just(RiskProfile::Moderate),
        Just(RiskProfile::Aggressive),
    ]
}

/// Holdings with at least one strictly positive value.
fn arb_holdings() -> impl Strategy<Value = Vec<(AssetClass, f64)>> {
    (
        (arb_asset_class(), 1.0f64..1_000_000.0),
        prop::collection::vec((arb_asset_class(), 0.0f64..1_000_000.0), 0..12),
    )
        .prop_map(|(first, mut rest)| {
            rest.insert(0, first);
            rest
        })
}

proptest! {
    #[test]
    fn current_allocation_sums_to_100(holdings in arb_holdings()) {
        let current = current_allocation(&holdings).unwrap();
        let total: f64 = current.iter().map(|w| w.percentage).sum();
        prop_assert!((total - 100.0).abs() < 1e-6);

        // sorted, unique
        for pair in current.windows(2) {
            prop_assert!(pair[0].asset_class < pair[1].asset_class);
        }
    }

    #[test]
    fn diversification_score_in_range(holdings in arb_holdings()) {
        let analysis = analyze_portfolio(&holdings).unwrap();
        prop_assert!(analysis.diversification_score >= -1e-9);
        prop_assert!(analysis.diversification_score < 100.0);
        prop_assert_eq!(analysis.rebalancing_needed, !analysis.rebalancing_suggestions.is_empty());
    }

    #[test]
    fn rebalancing_suggestions_exceed_threshold(
        holdings in arb_holdings(),
        profile in arb_profile(),
    ) {
        let target = compute_allocation(profile);
        let suggestions = rebalance_portfolio(&holdings, &target).unwrap();
        for s in &suggestions {
            prop_assert!(s.change.abs() > 1.0);
            match s.action {
                RebalanceAction::Increase => prop_assert!(s.change > 0.0),
                RebalanceAction::Decrease => prop_assert!(s.change < 0.0),
            }
        }
        // All eight differences sum to zero and each skipped one is within a point.
        let net: f64 = suggestions.iter().map(|s| s.change).sum();
        prop_assert!(net.abs() <= 8.0);
    }
}
