use serde::{Deserialize, Serialize};

/// Evidence captured when a rule triggers.
///
/// Records what was checked and against which limit, for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// The rule that triggered
    pub rule_id: String,

    /// Key identifying what was checked (e.g., "credit_score", "dti_ratio")
    pub key: String,

    /// The observed value
    pub value: String,

    /// The threshold that was crossed
    pub limit: String,
}

impl Evidence {
    pub fn new(
        rule_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        limit: impl Into<String>,
    ) -> Self {
        Evidence {
            rule_id: rule_id.into(),
            key: key.into(),
            value: value.into(),
            limit: limit.into(),
        }
    }
}

/// Result of evaluating a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    /// Whether the rule declined the application
    pub hit: bool,

    /// Explanation to report when the rule triggered
    pub explanation: Option<String>,

    /// Evidence if the rule triggered
    pub evidence: Option<Evidence>,
}

impl RuleResult {
    /// The rule passed.
    #[inline]
    pub fn pass() -> Self {
        RuleResult {
            hit: false,
            explanation: None,
            evidence: None,
        }
    }

    /// The rule declined the application.
    pub fn decline(explanation: impl Into<String>, evidence: Evidence) -> Self {
        RuleResult {
            hit: true,
            explanation: Some(explanation.into()),
            evidence: Some(evidence),
        }
    }
}

impl Default for RuleResult {
    fn default() -> Self {
        RuleResult::pass()
    }
}
