use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{CreditScore, LoanApplication, ValidationError};

/// Loan application as submitted by the client.
///
/// Numbers are accepted as JSON numbers or numeric strings. The credit score
/// is read as a number too, so `720.0` is a valid score and `720.5` fails on
/// `credit_score` rather than on the whole body. Nothing here is trusted until
/// [`LoanApplicationRequest::validate`] succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplicationRequest {
    pub applicant_name: String,
    pub monthly_income: Decimal,
    pub monthly_debts: Decimal,
    pub credit_score: Decimal,
    pub loan_amount: Decimal,
}

impl LoanApplicationRequest {
    /// Check every constraint and produce a typed application.
    pub fn validate(&self) -> Result<LoanApplication, ValidationError> {
        LoanApplication::assemble(
            &self.applicant_name,
            self.monthly_income,
            self.monthly_debts,
            CreditScore::from_decimal(self.credit_score),
            self.loan_amount,
        )
    }
}
