//! Integration tests for the allocation engine.

use regex::Regex;
use std::collections::HashSet;
use std::thread;

use wealth_advisor::allocation::{format_percentage, SUM_TOLERANCE};
use wealth_advisor::{
    compute_allocation, compute_allocation_str, AdvisorError, AssetClass, RiskProfile,
};

#[test]
fn test_every_class_exactly_once() {
    for profile in RiskProfile::ALL {
        let result = compute_allocation(profile);
        assert_eq!(result.weights().len(), 8);

        let seen: HashSet<AssetClass> = result.weights().iter().map(|w| w.asset_class).collect();
        assert_eq!(seen.len(), 8);

        // Display order is the enumeration order
        let order: Vec<AssetClass> = result.weights().iter().map(|w| w.asset_class).collect();
        assert_eq!(order, AssetClass::ALL.to_vec());
    }
}

#[test]
fn test_weights_sum_to_100() {
    for profile in RiskProfile::ALL {
        let result = compute_allocation(profile);
        assert!(
            (result.total() - 100.0).abs() <= SUM_TOLERANCE,
            "{profile} sums to {}",
            result.total()
        );
        assert!(result
            .weights()
            .iter()
            .all(|w| (0.0..=100.0).contains(&w.percentage)));
    }
}

#[test]
fn test_monotonic_across_profiles() {
    let [c, m, a] = RiskProfile::ALL.map(compute_allocation);

    let stocks = |r: &wealth_advisor::AllocationResult| r.weight_of(AssetClass::Stocks);
    let bonds = |r: &wealth_advisor::AllocationResult| r.weight_of(AssetClass::Bonds);
    let crypto = |r: &wealth_advisor::AllocationResult| r.weight_of(AssetClass::Cryptocurrency);

    assert!(stocks(&c) < stocks(&m) && stocks(&m) < stocks(&a));
    assert!(bonds(&c) > bonds(&m) && bonds(&m) > bonds(&a));
    assert_eq!(crypto(&c), 0.0);
    assert!(crypto(&c) < crypto(&m) && crypto(&m) < crypto(&a));
}

#[test]
fn test_deterministic() {
    let first = compute_allocation(RiskProfile::Moderate);
    let second = compute_allocation(RiskProfile::Moderate);
    assert_eq!(first, second);

    for (x, y) in first.weights().iter().zip(second.weights()) {
        assert_eq!(x.percentage.to_bits(), y.percentage.to_bits());
    }
}

#[test]
fn test_concurrent_calls_agree() {
    let expected = compute_allocation(RiskProfile::Aggressive);
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| compute_allocation(RiskProfile::Aggressive)))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_rationale_matches_weights() {
    let re = Regex::new(
        r"(Stocks|Bonds|Cash|Real Estate|Commodities|Cryptocurrency|ETFs|REITs) (\d+\.\d)%",
    )
    .unwrap();

    for profile in RiskProfile::ALL {
        let result = compute_allocation(profile);
        let mut mentioned = 0;
        for cap in re.captures_iter(result.rationale()) {
            let asset_class: AssetClass = cap[1].parse().unwrap();
            let expected = format_percentage(result.weight_of(asset_class));
            assert_eq!(format!("{}%", &cap[2]), expected, "{profile} {asset_class}");
            mentioned += 1;
        }
        assert_eq!(mentioned, 8, "rationale for {profile} should mention every class");
    }
}

#[test]
fn test_conservative_scenario() {
    let result = compute_allocation(RiskProfile::Conservative);
    assert_eq!(result.weight_of(AssetClass::Stocks), 25.0);
    assert_eq!(result.weight_of(AssetClass::Bonds), 45.0);
    assert_eq!(result.weight_of(AssetClass::Cryptocurrency), 0.0);

    let others: f64 = result
        .weights()
        .iter()
        .filter(|w| {
            !matches!(
                w.asset_class,
                AssetClass::Stocks | AssetClass::Bonds | AssetClass::Cryptocurrency
            )
        })
        .map(|w| w.percentage)
        .sum();
    assert!((others - 30.0).abs() <= SUM_TOLERANCE);
}

#[test]
fn test_invalid_profile_at_boundary() {
    for bad in ["", "medium", "very aggressive", "conservative!"] {
        match compute_allocation_str(bad) {
            Err(AdvisorError::InvalidProfile { value }) => assert_eq!(value, bad),
            other => panic!("expected InvalidProfile for {bad:?}, got {other:?}"),
        }
    }
    assert!(compute_allocation_str("MODERATE").is_ok());
}
