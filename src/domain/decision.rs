use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Explanation attached to every approval.
pub const APPROVED_EXPLANATION: &str = "Applicant approved based on healthy DTI and credit score.";

/// Eligibility outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approved,
    Declined,
}

impl Outcome {
    /// Stable lowercase label, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Approved => "approved",
            Outcome::Declined => "declined",
        }
    }

    /// Parse from the stored label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approved" => Some(Outcome::Approved),
            "declined" => Some(Outcome::Declined),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one application.
///
/// Computed fresh for every request; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Debt-to-income percentage, two decimal places
    pub dti_ratio: Decimal,

    /// Approved or declined
    pub outcome: Outcome,

    /// Human-readable reason for the outcome
    pub explanation: String,

    /// Rule that declined the application, if any
    pub rule_id: Option<String>,
}

impl Decision {
    /// An approval at the given DTI.
    pub fn approved(dti_ratio: Decimal) -> Self {
        Decision {
            dti_ratio,
            outcome: Outcome::Approved,
            explanation: APPROVED_EXPLANATION.to_string(),
            rule_id: None,
        }
    }

    /// A decline driven by a single rule.
    pub fn declined(
        dti_ratio: Decimal,
        rule_id: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Decision {
            dti_ratio,
            outcome: Outcome::Declined,
            explanation: explanation.into(),
            rule_id: Some(rule_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&Outcome::Approved).unwrap();
        assert_eq!(json, "\"approved\"");

        let parsed: Outcome = serde_json::from_str("\"declined\"").unwrap();
        assert_eq!(parsed, Outcome::Declined);
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!(Outcome::parse("approved"), Some(Outcome::Approved));
        assert_eq!(Outcome::parse("DECLINED"), Some(Outcome::Declined));
        assert_eq!(Outcome::parse("pending"), None);
    }

    #[test]
    fn test_declined_carries_rule() {
        let decision = Decision::declined(Decimal::new(5000, 2), "DTI_CEILING", "too high");

        assert_eq!(decision.outcome, Outcome::Declined);
        assert_eq!(decision.rule_id.as_deref(), Some("DTI_CEILING"));
    }
}
