use rust_decimal::Decimal;

use crate::domain::{Evidence, LoanApplication, RuleResult};
use crate::rules::traits::UnderwritingRule;

/// Explanation reported when the DTI ratio is too high.
pub const HIGH_DTI_EXPLANATION: &str = "Declined due to high debt-to-income ratio.";

/// Maximum debt-to-income rule.
///
/// Declines when the DTI percentage is strictly above the ceiling.
#[derive(Debug)]
pub struct DebtToIncomeRule {
    id: String,
    /// Ceiling as a percentage (45.00 means 45%)
    maximum: Decimal,
}

impl DebtToIncomeRule {
    pub fn new(id: String, maximum: Decimal) -> Self {
        DebtToIncomeRule { id, maximum }
    }
}

impl UnderwritingRule for DebtToIncomeRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn evaluate(&self, _application: &LoanApplication, dti_ratio: Decimal) -> RuleResult {
        if dti_ratio > self.maximum {
            return RuleResult::decline(
                HIGH_DTI_EXPLANATION,
                Evidence::new(
                    &self.id,
                    "dti_ratio",
                    dti_ratio.to_string(),
                    self.maximum.to_string(),
                ),
            );
        }

        RuleResult::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> LoanApplication {
        LoanApplication::new(
            "Bob Johnson",
            Decimal::new(5000, 0),
            Decimal::new(2500, 0),
            720,
            Decimal::new(250000, 0),
        )
        .unwrap()
    }

    fn rule() -> DebtToIncomeRule {
        DebtToIncomeRule::new("DTI_CEILING".to_string(), Decimal::new(45, 0))
    }

    #[test]
    fn test_over_ceiling() {
        let result = rule().evaluate(&app(), Decimal::new(50, 0));

        assert!(result.hit);
        assert_eq!(result.explanation.as_deref(), Some(HIGH_DTI_EXPLANATION));
        assert_eq!(result.evidence.unwrap().key, "dti_ratio");
    }

    #[test]
    fn test_at_ceiling() {
        // 45.00 is allowed, 45.01 is not
        assert!(!rule().evaluate(&app(), Decimal::new(4500, 2)).hit);
        assert!(rule().evaluate(&app(), Decimal::new(4501, 2)).hit);
    }
}
