pub mod credit_score;
pub mod debt_to_income;
pub mod traits;

pub use credit_score::{CreditScoreRule, LOW_CREDIT_EXPLANATION};
pub use debt_to_income::{DebtToIncomeRule, HIGH_DTI_EXPLANATION};
pub use traits::UnderwritingRule;

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{Decision, LoanApplication};

/// Minimum credit score for approval.
pub const MIN_APPROVAL_CREDIT_SCORE: u16 = 600;

/// Identifier of the standard credit score rule.
pub const CREDIT_SCORE_RULE_ID: &str = "CREDIT_SCORE_FLOOR";

/// Identifier of the standard DTI rule.
pub const DTI_RULE_ID: &str = "DTI_CEILING";

/// Maximum DTI percentage for approval.
pub const MAX_APPROVAL_DTI: Decimal = Decimal::from_parts(45, 0, 0, false, 0);

/// Compute the debt-to-income percentage, rounded to two places.
///
/// `monthly_income` is positive for any validated application. Overflow
/// saturates to `Decimal::MAX`.
pub fn debt_to_income_ratio(monthly_debts: Decimal, monthly_income: Decimal) -> Decimal {
    monthly_debts
        .checked_div(monthly_income)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .unwrap_or(Decimal::MAX)
}

/// Ordered collection of rules.
///
/// Rules run in order and the first one that declines decides the outcome.
pub struct RuleSet {
    pub rules: Vec<Arc<dyn UnderwritingRule>>,
}

impl RuleSet {
    /// Credit score floor of 600, then DTI ceiling of 45%.
    pub fn standard() -> Self {
        RuleSet {
            rules: vec![
                Arc::new(CreditScoreRule::new(
                    CREDIT_SCORE_RULE_ID.to_string(),
                    MIN_APPROVAL_CREDIT_SCORE,
                )),
                Arc::new(DebtToIncomeRule::new(
                    DTI_RULE_ID.to_string(),
                    MAX_APPROVAL_DTI,
                )),
            ],
        }
    }

    /// Evaluate an application. Pure; never fails.
    pub fn evaluate(&self, application: &LoanApplication) -> Decision {
        let dti_ratio =
            debt_to_income_ratio(application.monthly_debts(), application.monthly_income());

        for rule in &self.rules {
            let result = rule.evaluate(application, dti_ratio);
            if !result.hit {
                continue;
            }

            if let Some(ev) = &result.evidence {
                debug!(
                    rule_id = %ev.rule_id,
                    key = %ev.key,
                    value = %ev.value,
                    limit = %ev.limit,
                    "Rule declined application"
                );
            }

            let explanation = result.explanation.unwrap_or_default();
            return Decision::declined(dti_ratio, rule.id(), explanation);
        }

        Decision::approved(dti_ratio)
    }
}

/// Evaluate an application against the standard rules.
pub fn evaluate(application: &LoanApplication) -> Decision {
    RuleSet::standard().evaluate(application)
}
