pub mod application;
pub mod decision;
pub mod evidence;
pub mod record;

pub use application::{CreditScore, FieldError, LoanApplication, ValidationError};
pub use decision::{Decision, Outcome};
pub use evidence::{Evidence, RuleResult};
pub use record::ApplicationRecord;
