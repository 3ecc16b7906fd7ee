use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::debug;

use crate::domain::{ApplicationRecord, Decision, LoanApplication, Outcome};

use super::traits::{Storage, StorageError};

/// Row shape of `loan_applications`. Money is stored as TEXT so decimals
/// round-trip exactly.
#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: i64,
    applicant_name: String,
    monthly_income: String,
    monthly_debts: String,
    credit_score: i64,
    loan_amount: String,
    dti_ratio: String,
    decision: String,
    decision_message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for ApplicationRecord {
    type Error = StorageError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |reason: String| StorageError::Corrupt { id, reason };
        let decimal = |column: &str, raw: &str| {
            Decimal::from_str(raw).map_err(|e| corrupt(format!("{column}: {e}")))
        };

        Ok(ApplicationRecord {
            id,
            applicant_name: row.applicant_name,
            monthly_income: decimal("monthly_income", &row.monthly_income)?,
            monthly_debts: decimal("monthly_debts", &row.monthly_debts)?,
            credit_score: u16::try_from(row.credit_score)
                .map_err(|e| corrupt(format!("credit_score: {e}")))?,
            loan_amount: decimal("loan_amount", &row.loan_amount)?,
            dti_ratio: decimal("dti_ratio", &row.dti_ratio)?,
            decision: Outcome::parse(&row.decision)
                .ok_or_else(|| corrupt(format!("decision: unknown value {:?}", row.decision)))?,
            decision_message: row.decision_message,
            created_at: row.created_at,
        })
    }
}

/// SQLite implementation of the Storage trait.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open a connection pool, creating the database file if needed.
    ///
    /// An in-memory database lives only as long as its connection, so it is
    /// pinned to a single connection that never idles out.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let storage = Self::connect("sqlite::memory:", 1).await?;
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create(
        &self,
        application: &LoanApplication,
        decision: &Decision,
    ) -> Result<ApplicationRecord, StorageError> {
        let created_at = Utc::now().trunc_subsecs(6);

        // Returned to the pool when dropped, on every path.
        let mut conn = self.pool.acquire().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO loan_applications (
                applicant_name,
                monthly_income,
                monthly_debts,
                credit_score,
                loan_amount,
                dti_ratio,
                decision,
                decision_message,
                created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(application.applicant_name())
        .bind(application.monthly_income().to_string())
        .bind(application.monthly_debts().to_string())
        .bind(i64::from(application.credit_score().value()))
        .bind(application.loan_amount().to_string())
        .bind(decision.dti_ratio.to_string())
        .bind(decision.outcome.as_str())
        .bind(&decision.explanation)
        .bind(created_at)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        debug!(id, decision = %decision.outcome, "Stored application");

        Ok(ApplicationRecord::new(id, application, decision, created_at))
    }

    async fn get(&self, id: i64) -> Result<ApplicationRecord, StorageError> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<ApplicationRow> = sqlx::query_as(
            r#"
            SELECT
                id,
                applicant_name,
                monthly_income,
                monthly_debts,
                credit_score,
                loan_amount,
                dti_ratio,
                decision,
                decision_message,
                created_at
            FROM loan_applications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(id));
        };

        ApplicationRecord::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::evaluate;

    fn application(income: i64, debts: i64, score: i64) -> LoanApplication {
        LoanApplication::new(
            "Test User",
            Decimal::new(income, 0),
            Decimal::new(debts, 0),
            score,
            Decimal::new(300000, 0),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_ids_are_one_then_two() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let app = application(5000, 1500, 720);
        let decision = evaluate(&app);

        let first = storage.create(&app, &decision).await.unwrap();
        let second = storage.create(&app, &decision).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let app = LoanApplication::new(
            "Ana Lima",
            Decimal::new(612_550, 2),
            Decimal::new(200_010, 2),
            701,
            Decimal::new(31_000_000, 2),
        )
        .unwrap();
        let decision = evaluate(&app);

        let created = storage.create(&app, &decision).await.unwrap();
        let fetched = storage.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.applicant_name, "Ana Lima");
        assert_eq!(fetched.monthly_income, Decimal::new(612_550, 2));
        assert_eq!(fetched.decision, Outcome::Approved);
    }

    #[tokio::test]
    async fn test_declined_record_keeps_explanation() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let app = application(2000, 1500, 720);
        let decision = evaluate(&app);

        let created = storage.create(&app, &decision).await.unwrap();
        let fetched = storage.get(created.id).await.unwrap();

        assert_eq!(fetched.decision, Outcome::Declined);
        assert_eq!(fetched.dti_ratio, Decimal::new(75, 0));
        assert_eq!(fetched.decision_message, decision.explanation);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let storage = SqliteStorage::in_memory().await.unwrap();

        let err = storage.get(999).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("apps.db").display());
        let app = application(5000, 1500, 720);
        let decision = evaluate(&app);

        let storage = SqliteStorage::connect(&url, 2).await.unwrap();
        storage.run_migrations().await.unwrap();
        let created = storage.create(&app, &decision).await.unwrap();
        storage.close().await;

        let reopened = SqliteStorage::connect(&url, 2).await.unwrap();
        reopened.run_migrations().await.unwrap();
        let fetched = reopened.get(created.id).await.unwrap();
        let next = reopened.create(&app, &decision).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(next.id, created.id + 1);
    }
}
