//! Repository for cleaned historical records (`risk_factors`).

use std::sync::Arc;

use likely_common::{Ethnicity, HistoricalRecord};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::database::Database;
use crate::error::{sql_int, Result};

#[derive(Clone)]
pub struct HistoricalRepository {
    db: Arc<Database>,
}

impl HistoricalRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Replace every stored record with `records` in one transaction.
    pub async fn replace_all(&self, records: &[HistoricalRecord]) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;
        write_records(&mut *tx, records).await?;
        tx.commit().await?;
        debug!(n = records.len(), "historical records replaced");
        Ok(records.len())
    }

    /// Load every stored record. Values that no longer decode (negative
    /// numbers, unknown ethnicity labels) come back as absent fields.
    pub async fn load_all(&self) -> Result<Vec<HistoricalRecord>> {
        let rows: Vec<(Option<i64>, Option<String>, Option<i64>)> =
            sqlx::query_as("SELECT age, ethnicity, cases FROM risk_factors ORDER BY id")
                .fetch_all(self.db.pool())
                .await?;

        Ok(rows
            .into_iter()
            .map(|(age, ethnicity, cases)| HistoricalRecord {
                age: age.and_then(|a| u32::try_from(a).ok()),
                ethnicity: ethnicity.and_then(|e| e.parse::<Ethnicity>().ok()),
                cases: cases.and_then(|c| u64::try_from(c).ok()),
            })
            .collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM risk_factors")
            .fetch_one(self.db.pool())
            .await?;
        Ok(n)
    }
}

pub(crate) async fn write_records(conn: &mut SqliteConnection, records: &[HistoricalRecord]) -> Result<()> {
    sqlx::query("DELETE FROM risk_factors").execute(&mut *conn).await?;
    for record in records {
        sqlx::query("INSERT INTO risk_factors (age, ethnicity, cases) VALUES (?, ?, ?)")
            .bind(record.age.map(i64::from))
            .bind(record.ethnicity.map(|e| e.as_str()))
            .bind(record.cases.map(|c| sql_int("cases", c)).transpose()?)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use pretty_assertions::assert_eq;

    async fn repo() -> HistoricalRepository {
        let db = Database::open_in_memory().await.unwrap();
        db.initialize().await.unwrap();
        HistoricalRepository::new(Arc::new(db))
    }

    #[tokio::test]
    async fn test_round_trip_keeps_missing_fields() {
        let repo = repo().await;
        let records = vec![
            HistoricalRecord::new(30, Ethnicity::White, 2),
            HistoricalRecord { age: None, ethnicity: Some(Ethnicity::Black), cases: Some(1) },
        ];
        repo.replace_all(&records).await.unwrap();
        assert_eq!(repo.load_all().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_replace_discards_previous_rows() {
        let repo = repo().await;
        repo.replace_all(&[HistoricalRecord::new(30, Ethnicity::White, 2)]).await.unwrap();
        repo.replace_all(&[HistoricalRecord::new(40, Ethnicity::Hispanic, 0)]).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.load_all().await.unwrap()[0].age, Some(40));
    }

    #[tokio::test]
    async fn test_oversized_cases_rolls_back() {
        let repo = repo().await;
        repo.replace_all(&[HistoricalRecord::new(30, Ethnicity::White, 2)]).await.unwrap();

        let err = repo
            .replace_all(&[HistoricalRecord::new(40, Ethnicity::White, u64::MAX)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::OutOfRange { column: "cases", .. }));
        assert_eq!(repo.load_all().await.unwrap(), vec![HistoricalRecord::new(30, Ethnicity::White, 2)]);
    }
}
