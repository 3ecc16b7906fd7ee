use rust_decimal::Decimal;

use crate::domain::{Evidence, LoanApplication, RuleResult};
use crate::rules::traits::UnderwritingRule;

/// Explanation reported when the credit score is too low.
pub const LOW_CREDIT_EXPLANATION: &str = "Declined due to low credit score.";

/// Minimum credit score rule.
///
/// Declines any applicant whose score is strictly below the floor.
#[derive(Debug)]
pub struct CreditScoreRule {
    id: String,
    minimum: u16,
}

impl CreditScoreRule {
    pub fn new(id: String, minimum: u16) -> Self {
        CreditScoreRule { id, minimum }
    }
}

impl UnderwritingRule for CreditScoreRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn evaluate(&self, application: &LoanApplication, _dti_ratio: Decimal) -> RuleResult {
        let score = application.credit_score().value();

        if score < self.minimum {
            return RuleResult::decline(
                LOW_CREDIT_EXPLANATION,
                Evidence::new(
                    &self.id,
                    "credit_score",
                    score.to_string(),
                    self.minimum.to_string(),
                ),
            );
        }

        RuleResult::pass()
    }
}
