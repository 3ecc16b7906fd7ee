pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod observability;
pub mod rules;
pub mod storage;

pub use auth::ApiKeyGuard;
pub use config::Config;
pub use domain::{ApplicationRecord, Decision, LoanApplication, Outcome};
pub use rules::{evaluate, RuleSet, UnderwritingRule};
pub use storage::{Storage, StorageError};
