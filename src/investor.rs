use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{AdvisorError, Result};

#[derive(Debug, Deserialize)]
pub struct ContextResponse {
    pub message: String,
}

/// A user's stated tolerance for volatility. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "moderate" => Ok(RiskProfile::Moderate),
            "aggressive" => Ok(RiskProfile::Aggressive),
            _ => Err(AdvisorError::invalid_profile(s)),
        }
    }
}

impl TryFrom<String> for RiskProfile {
    type Error = AdvisorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl InvestmentHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentHorizon::ShortTerm => "short-term",
            InvestmentHorizon::MediumTerm => "medium-term",
            InvestmentHorizon::LongTerm => "long-term",
        }
    }
}

/// Stored user profile. Optional attributes are only used for narrative text
/// and risk assessment; the allocation depends on `risk_tolerance` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub income: Option<f64>,
    pub risk_tolerance: RiskProfile,
    #[serde(default)]
    pub investment_goal: Option<String>,
    #[serde(default)]
    pub investment_horizon: Option<InvestmentHorizon>,
}

// Used by the age heuristic when the brief does not mention an age.
const DEFAULT_AGE: u32 = 45;

impl InvestorProfile {
    pub fn new(name: impl Into<String>, risk_tolerance: RiskProfile) -> Self {
        Self {
            name: name.into(),
            age: None,
            income: None,
            risk_tolerance,
            investment_goal: None,
            investment_horizon: None,
        }
    }

    /// Decode a `{"message": "..."}` payload and read the brief inside it.
    pub fn from_context(context_json: &str) -> Result<Self> {
        let ctx: ContextResponse = serde_json::from_str(context_json)
            .map_err(|e| AdvisorError::profile_parse(e.to_string()))?;
        Ok(Self::from_message(&ctx.message))
    }

    /// Build a profile from a free-text investor brief.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // "X-year-old" or "X years old"
        let age = Self::extract_number(&msg_lower, r"(\d+)-year-old")
            .or_else(|| Self::extract_number(&msg_lower, r"(\d+)\s+years?\s+old"));

        let income = Self::extract_money(&msg_lower, r"income of \$([0-9,]+)")
            .or_else(|| Self::extract_money(&msg_lower, r"income is \$([0-9,]+)"))
            .or_else(|| Self::extract_money(&msg_lower, r"earns? \$([0-9,]+)"))
            .or_else(|| Self::extract_money(&msg_lower, r"making \$([0-9,]+)"));

        let name = Self::extract_name(msg).unwrap_or_else(|| "Investor".to_string());

        // Prefer an explicit mention in the brief, fall back to age.
        let explicit_risk = if msg_lower.contains("conservative")
            || msg_lower.contains("risk averse")
            || msg_lower.contains("risk-averse")
            || msg_lower.contains("low risk")
        {
            Some(RiskProfile::Conservative)
        } else if msg_lower.contains("aggressive")
            || msg_lower.contains("high risk")
            || msg_lower.contains("risk seeking")
            || msg_lower.contains("risk-seeking")
        {
            Some(RiskProfile::Aggressive)
        } else if msg_lower.contains("moderate")
            || msg_lower.contains("balanced")
            || msg_lower.contains("medium risk")
        {
            Some(RiskProfile::Moderate)
        } else {
            None
        };

        let risk_tolerance = explicit_risk.unwrap_or_else(|| {
            debug!(age = ?age, "no explicit risk tolerance in brief, using age heuristic");
            risk_for_age(age.unwrap_or(DEFAULT_AGE))
        });

        InvestorProfile {
            name,
            age,
            income,
            risk_tolerance,
            investment_goal: Self::extract_goal(&msg_lower),
            investment_horizon: Self::extract_horizon(&msg_lower),
        }
    }

    fn extract_number(text: &str, pattern: &str) -> Option<u32> {
        regex::Regex::new(pattern)
            .ok()?
            .captures(text)?
            .get(1)?
            .as_str()
            .parse()
            .ok()
    }

    fn extract_money(text: &str, pattern: &str) -> Option<f64> {
        regex::Regex::new(pattern)
            .ok()?
            .captures(text)?
            .get(1)?
            .as_str()
            .replace(",", "")
            .parse()
            .ok()
    }

    fn extract_name(text: &str) -> Option<String> {
        regex::Regex::new(r"[Mm]y name is ([A-Z][a-z]+(?: [A-Z][a-z]+)?)")
            .ok()?
            .captures(text)?
            .get(1)
            .map(|m| m.as_str().to_string())
    }

    fn extract_horizon(text: &str) -> Option<InvestmentHorizon> {
        if text.contains("long-term") || text.contains("long term") {
            Some(InvestmentHorizon::LongTerm)
        } else if text.contains("medium-term") || text.contains("medium term") {
            Some(InvestmentHorizon::MediumTerm)
        } else if text.contains("short-term") || text.contains("short term") {
            Some(InvestmentHorizon::ShortTerm)
        } else {
            None
        }
    }

    fn extract_goal(text: &str) -> Option<String> {
        let goals = [
            ("retire", "retirement"),
            ("house", "home purchase"),
            ("home", "home purchase"),
            ("college", "education"),
            ("education", "education"),
            ("tuition", "education"),
            ("wealth", "wealth building"),
            ("income generation", "income generation"),
            ("generate income", "income generation"),
            ("passive income", "income generation"),
        ];
        goals
            .iter()
            .find(|(pat, _)| text.contains(pat))
            .map(|(_, goal)| goal.to_string())
    }
}

fn risk_for_age(age: u32) -> RiskProfile {
    match age {
        0..=39 => RiskProfile::Aggressive,
        40..=59 => RiskProfile::Moderate,
        _ => RiskProfile::Conservative,
    }
}

/// Coarse bucket of the overall risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Mean of the age, income and tolerance factors, in [0, 1].
    pub score: f64,
    pub level: RiskLevel,
    pub recommendations: Vec<&'static str>,
}

/// Score a profile on age, income and stated tolerance.
pub fn assess_risk(profile: &InvestorProfile) -> RiskAssessment {
    let age_factor = match profile.age.unwrap_or(DEFAULT_AGE) {
        0..=29 => 0.8,
        30..=49 => 0.5,
        _ => 0.2,
    };

    let income_factor = match profile.income {
        Some(income) if income > 200_000.0 => 0.8,
        Some(income) if income > 100_000.0 => 0.5,
        // Unknown income scores as a middle earner at exactly 100k.
        Some(_) | None => 0.3,
    };

    let tolerance_factor = match profile.risk_tolerance {
        RiskProfile::Aggressive => 0.8,
        RiskProfile::Moderate => 0.5,
        RiskProfile::Conservative => 0.2,
    };

    let score = (age_factor + income_factor + tolerance_factor) / 3.0;

    let level = if score >= 0.7 {
        RiskLevel::High
    } else if score >= 0.4 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let recommendations = match level {
        RiskLevel::High => vec![
            "Consider a growth-oriented portfolio",
            "Focus on equities with some alternative investments",
            "Regular portfolio rebalancing recommended",
        ],
        RiskLevel::Moderate => vec![
            "Balanced portfolio of stocks and bonds",
            "Consider index funds for core holdings",
            "Quarterly portfolio review recommended",
        ],
        RiskLevel::Low => vec![
            "Conservative portfolio with focus on stability",
            "Higher allocation to bonds and cash equivalents",
            "Annual portfolio review sufficient",
        ],
    };

    RiskAssessment {
        score,
        level,
        recommendations,
    }
}
