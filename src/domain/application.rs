use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest credit score accepted at the boundary.
pub const MIN_CREDIT_SCORE: i64 = 300;

/// Highest credit score accepted at the boundary.
pub const MAX_CREDIT_SCORE: i64 = 850;

/// Longest applicant name the store will hold.
pub const MAX_APPLICANT_NAME_LEN: usize = 100;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input rejected before it reaches the evaluator.
///
/// Carries every failing field, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid loan application: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Create an error for one field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            fields: vec![FieldError::new(field, message)],
        }
    }
}

#[cfg(test)]
impl ValidationError {
    pub(crate) fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// FICO-style credit score, guaranteed to lie in [300, 850].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CreditScore(u16);

impl CreditScore {
    /// Validate a raw score.
    pub fn new(raw: i64) -> Result<Self, FieldError> {
        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&raw) {
            return Err(score_out_of_range());
        }

        // In range, so the narrowing is lossless.
        Ok(CreditScore(raw as u16))
    }

    /// Validate a score that arrived as an arbitrary JSON number.
    ///
    /// Whole values such as `720.0` are accepted, fractions are not.
    pub fn from_decimal(raw: Decimal) -> Result<Self, FieldError> {
        if !raw.fract().is_zero() {
            return Err(FieldError::new("credit_score", "must be a whole number"));
        }

        raw.to_i64()
            .ok_or_else(score_out_of_range)
            .and_then(CreditScore::new)
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.0
    }
}

fn score_out_of_range() -> FieldError {
    FieldError::new(
        "credit_score",
        format!(
            "must be between {} and {}",
            MIN_CREDIT_SCORE, MAX_CREDIT_SCORE
        ),
    )
}

impl fmt::Display for CreditScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loan application that has passed boundary validation.
///
/// Fields are private so the only way to obtain one is through
/// [`LoanApplication::new`], which enforces every input constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanApplication {
    applicant_name: String,
    monthly_income: Decimal,
    monthly_debts: Decimal,
    credit_score: CreditScore,
    loan_amount: Decimal,
}

impl LoanApplication {
    /// Validate raw inputs, collecting all field failures.
    pub fn new(
        applicant_name: &str,
        monthly_income: Decimal,
        monthly_debts: Decimal,
        credit_score: i64,
        loan_amount: Decimal,
    ) -> Result<Self, ValidationError> {
        LoanApplication::assemble(
            applicant_name,
            monthly_income,
            monthly_debts,
            CreditScore::new(credit_score),
            loan_amount,
        )
    }

    /// Like [`LoanApplication::new`], with the score already checked.
    pub(crate) fn assemble(
        applicant_name: &str,
        monthly_income: Decimal,
        monthly_debts: Decimal,
        credit_score: Result<CreditScore, FieldError>,
        loan_amount: Decimal,
    ) -> Result<Self, ValidationError> {
        let mut fields = Vec::new();

        let name = applicant_name.trim();
        if name.is_empty() {
            fields.push(FieldError::new("applicant_name", "must not be empty"));
        } else if name.chars().count() > MAX_APPLICANT_NAME_LEN {
            fields.push(FieldError::new(
                "applicant_name",
                format!("must be at most {} characters", MAX_APPLICANT_NAME_LEN),
            ));
        }

        if monthly_income <= Decimal::ZERO {
            fields.push(FieldError::new("monthly_income", "must be greater than 0"));
        }

        if monthly_debts < Decimal::ZERO {
            fields.push(FieldError::new("monthly_debts", "must not be negative"));
        }

        let score = match credit_score {
            Ok(score) => Some(score),
            Err(e) => {
                fields.push(e);
                None
            }
        };

        if loan_amount <= Decimal::ZERO {
            fields.push(FieldError::new("loan_amount", "must be greater than 0"));
        }

        match score {
            Some(credit_score) if fields.is_empty() => Ok(LoanApplication {
                applicant_name: name.to_string(),
                monthly_income,
                monthly_debts,
                credit_score,
                loan_amount,
            }),
            _ => Err(ValidationError { fields }),
        }
    }

    pub fn applicant_name(&self) -> &str {
        &self.applicant_name
    }

    pub fn monthly_income(&self) -> Decimal {
        self.monthly_income
    }

    pub fn monthly_debts(&self) -> Decimal {
        self.monthly_debts
    }

    pub fn credit_score(&self) -> CreditScore {
        self.credit_score
    }

    pub fn loan_amount(&self) -> Decimal {
        self.loan_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Result<LoanApplication, ValidationError> {
        LoanApplication::new(
            "John Doe",
            Decimal::new(5000, 0),
            Decimal::new(1500, 0),
            720,
            Decimal::new(250000, 0),
        )
    }

    #[test]
    fn test_valid_application() {
        let app = valid().unwrap();

        assert_eq!(app.applicant_name(), "John Doe");
        assert_eq!(app.credit_score().value(), 720);
        assert_eq!(app.monthly_income(), Decimal::new(5000, 0));
    }

    #[test]
    fn test_name_is_trimmed() {
        let app = LoanApplication::new(
            "  Jane  ",
            Decimal::ONE,
            Decimal::ZERO,
            600,
            Decimal::ONE,
        )
        .unwrap();

        assert_eq!(app.applicant_name(), "Jane");
    }

    #[test]
    fn test_credit_score_bounds() {
        assert!(CreditScore::new(300).is_ok());
        assert!(CreditScore::new(850).is_ok());
        assert!(CreditScore::new(299).is_err());
        assert!(CreditScore::new(851).is_err());
        assert!(CreditScore::new(-1).is_err());
    }

    #[test]
    fn test_whole_decimal_score_accepted() {
        let score = CreditScore::from_decimal(Decimal::new(7200, 1)).unwrap();
        assert_eq!(score.value(), 720);
    }

    #[test]
    fn test_fractional_or_huge_score_rejected() {
        let err = CreditScore::from_decimal(Decimal::new(7205, 1)).unwrap_err();
        assert_eq!(err.message, "must be a whole number");

        let err = CreditScore::from_decimal(Decimal::MAX).unwrap_err();
        assert_eq!(err.message, "must be between 300 and 850");
    }

    #[test]
    fn test_zero_debts_allowed() {
        let app = LoanApplication::new(
            "No Debt",
            Decimal::new(5000, 0),
            Decimal::ZERO,
            700,
            Decimal::new(1000, 0),
        );

        assert!(app.is_ok());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let err = LoanApplication::new(
            "   ",
            Decimal::ZERO,
            Decimal::new(-1, 0),
            900,
            Decimal::ZERO,
        )
        .unwrap_err();

        assert_eq!(err.fields.len(), 5);
        assert!(err.has_field("applicant_name"));
        assert!(err.has_field("monthly_income"));
        assert!(err.has_field("monthly_debts"));
        assert!(err.has_field("credit_score"));
        assert!(err.has_field("loan_amount"));
    }

    #[test]
    fn test_name_too_long() {
        let name = "x".repeat(MAX_APPLICANT_NAME_LEN + 1);
        let err = LoanApplication::new(
            &name,
            Decimal::ONE,
            Decimal::ZERO,
            700,
            Decimal::ONE,
        )
        .unwrap_err();

        assert!(err.has_field("applicant_name"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::single("credit_score", "must be between 300 and 850");
        assert_eq!(
            err.to_string(),
            "invalid loan application: credit_score: must be between 300 and 850"
        );
    }
}
