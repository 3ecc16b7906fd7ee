use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::application::LoanApplication;
use super::decision::{Decision, Outcome};

/// Persisted, immutable result of one evaluated and saved application.
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: i64,
    pub applicant_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_debts: Decimal,
    pub credit_score: u16,
    #[serde(with = "rust_decimal::serde::float")]
    pub loan_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub dti_ratio: Decimal,
    pub decision: Outcome,
    pub decision_message: String,
    pub created_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// Denormalize an application and its decision into a record.
    pub fn new(
        id: i64,
        application: &LoanApplication,
        decision: &Decision,
        created_at: DateTime<Utc>,
    ) -> Self {
        ApplicationRecord {
            id,
            applicant_name: application.applicant_name().to_string(),
            monthly_income: application.monthly_income(),
            monthly_debts: application.monthly_debts(),
            credit_score: application.credit_score().value(),
            loan_amount: application.loan_amount(),
            dti_ratio: decision.dti_ratio,
            decision: decision.outcome,
            decision_message: decision.explanation.clone(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_numbers() {
        let app = LoanApplication::new(
            "Test User",
            Decimal::new(6000, 0),
            Decimal::new(2000, 0),
            700,
            Decimal::new(300000, 0),
        )
        .unwrap();
        let decision = Decision::approved(Decimal::new(3333, 2));
        let record = ApplicationRecord::new(7, &app, &decision, Utc::now());

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["applicant_name"], "Test User");
        assert_eq!(json["monthly_income"], 6000.0);
        assert_eq!(json["dti_ratio"], 33.33);
        assert_eq!(json["decision"], "approved");
        assert_eq!(json["credit_score"], 700);
    }
}
