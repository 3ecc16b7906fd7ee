use rust_decimal::Decimal;
use std::fmt::Debug;

use crate::domain::{LoanApplication, RuleResult};

/// Trait for stateless underwriting rules.
///
/// Rules see only the validated application and the DTI computed for it.
/// They never fail: a rule either passes or declines with an explanation.
pub trait UnderwritingRule: Send + Sync + Debug {
    /// Unique identifier for this rule.
    fn id(&self) -> &str;

    /// Evaluate the rule against an application.
    fn evaluate(&self, application: &LoanApplication, dti_ratio: Decimal) -> RuleResult;
}
