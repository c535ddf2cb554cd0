//! Portfolio allocation and advisory helpers for a personal-finance backend.
//!
//! The core is [`allocation::compute_allocation`], a pure mapping from a
//! [`RiskProfile`] to an eight-class allocation summing to 100. The other
//! modules decode investor profiles, analyze holdings, render reports and
//! fetch market quotes around it.

pub mod allocation;
pub mod config;
pub mod error;
pub mod investor;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod telemetry;

pub use allocation::{
    compute_allocation, compute_allocation_str, AllocationResult, AllocationWeight, AssetClass,
};
pub use error::{AdvisorError, Result};
pub use investor::{InvestorProfile, RiskProfile};
