use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{ApplicationRecord, Decision, FieldError, LoanApplication, Outcome};

/// Message returned by the health check.
pub const HEALTH_MESSAGE: &str = "Mortgage Pre-Approval API is running";

/// Response from a simulation.
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub decision: Outcome,
    pub message: String,
    /// Percentage, two decimal places. A ratio too large to represent is
    /// reported as `Decimal::MAX` (about 7.92e28) and always declines.
    #[serde(with = "rust_decimal::serde::float")]
    pub dti_ratio: Decimal,
    pub credit_score: u16,
}

impl SimulationResponse {
    pub fn new(application: &LoanApplication, decision: Decision) -> Self {
        SimulationResponse {
            decision: decision.outcome,
            message: decision.explanation,
            dti_ratio: decision.dti_ratio,
            credit_score: application.credit_score().value(),
        }
    }
}

/// Response from saving an application.
#[derive(Debug, Serialize)]
pub struct ApplicationCreatedResponse {
    pub id: i64,
    pub decision: Outcome,
    pub message: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub dti_ratio: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<ApplicationRecord> for ApplicationCreatedResponse {
    fn from(record: ApplicationRecord) -> Self {
        ApplicationCreatedResponse {
            id: record.id,
            decision: record.decision,
            message: record.decision_message,
            dti_ratio: record.dti_ratio,
            created_at: record.created_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        HealthResponse {
            status: "healthy".to_string(),
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            code: code.into(),
            fields: Vec::new(),
        }
    }

    pub fn validation(fields: Vec<FieldError>) -> Self {
        ErrorResponse {
            error: "Request validation failed".to_string(),
            code: "VALIDATION_ERROR".to_string(),
            fields,
        }
    }

    pub fn forbidden() -> Self {
        ErrorResponse::new("Forbidden", "FORBIDDEN")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "NOT_FOUND")
    }

    pub fn internal_error() -> Self {
        ErrorResponse::new("Internal server error", "INTERNAL_ERROR")
    }
}
