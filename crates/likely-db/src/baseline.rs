//! Repository for the baseline rate table.
//!
//! Writes never touch the live table row by row: the new table is filled
//! under a staging name and renamed over `risk_baseline` inside the same
//! transaction, so a reader sees either the previous table or the new one.

use std::sync::Arc;

use likely_common::{BaselineEntry, BaselineTable, Ethnicity, HistoricalRecord};
use sqlx::SqliteConnection;
use tracing::info;

use crate::database::Database;
use crate::error::{sql_int, DbError, Result};
use crate::historical::write_records;
use crate::schema::{baseline_table_ddl, TABLE_RISK_BASELINE, TABLE_RISK_BASELINE_STAGING};

#[derive(Clone)]
pub struct BaselineRepository {
    db: Arc<Database>,
}

impl BaselineRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Swap the persisted table for `table`.
    pub async fn replace(&self, table: &BaselineTable) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;
        swap_table(&mut *tx, table).await?;
        tx.commit().await?;
        info!(entries = table.len(), "baseline table swapped");
        Ok(table.len())
    }

    /// Store `records` and the table built from them in one transaction.
    /// Either both land or neither does.
    pub async fn replace_with_records(&self, records: &[HistoricalRecord], table: &BaselineTable) -> Result<usize> {
        let mut tx = self.db.pool().begin().await?;
        write_records(&mut *tx, records).await?;
        swap_table(&mut *tx, table).await?;
        tx.commit().await?;
        info!(records = records.len(), entries = table.len(), "historical records and baseline table replaced");
        Ok(table.len())
    }

    /// Load the live table.
    pub async fn load(&self) -> Result<BaselineTable> {
        let rows: Vec<(i64, String, i64, i64, f64)> = sqlx::query_as(
            r#"
            SELECT age, ethnicity, total_cases, total_records, risk_rate
            FROM risk_baseline
            ORDER BY ethnicity, age
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let entries = rows
            .into_iter()
            .map(|(age, ethnicity, total_cases, total_records, risk_rate)| -> Result<BaselineEntry> {
                let corrupt = |detail: String| DbError::CorruptRow { table: TABLE_RISK_BASELINE, detail };
                Ok(BaselineEntry {
                    age: u32::try_from(age).map_err(|_| corrupt(format!("age {age}")))?,
                    ethnicity: ethnicity
                        .parse::<Ethnicity>()
                        .map_err(|e| corrupt(e.to_string()))?,
                    total_cases: u64::try_from(total_cases)
                        .map_err(|_| corrupt(format!("total_cases {total_cases}")))?,
                    total_records: u64::try_from(total_records)
                        .map_err(|_| corrupt(format!("total_records {total_records}")))?,
                    risk_rate,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BaselineTable::from_entries(entries))
    }

    pub async fn count(&self) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM risk_baseline")
            .fetch_one(self.db.pool())
            .await?;
        Ok(n)
    }
}

async fn swap_table(conn: &mut SqliteConnection, table: &BaselineTable) -> Result<()> {
    sqlx::query(&format!("DROP TABLE IF EXISTS {TABLE_RISK_BASELINE_STAGING}"))
        .execute(&mut *conn)
        .await?;
    sqlx::query(&baseline_table_ddl(TABLE_RISK_BASELINE_STAGING))
        .execute(&mut *conn)
        .await?;

    let insert = format!(
        "INSERT INTO {TABLE_RISK_BASELINE_STAGING} \
         (age, ethnicity, total_cases, total_records, risk_rate) VALUES (?, ?, ?, ?, ?)"
    );
    for entry in table.entries() {
        sqlx::query(&insert)
            .bind(i64::from(entry.age))
            .bind(entry.ethnicity.as_str())
            .bind(sql_int("total_cases", entry.total_cases)?)
            .bind(sql_int("total_records", entry.total_records)?)
            .bind(entry.risk_rate)
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query(&format!("DROP TABLE IF EXISTS {TABLE_RISK_BASELINE}"))
        .execute(&mut *conn)
        .await?;
    sqlx::query(&format!(
        "ALTER TABLE {TABLE_RISK_BASELINE_STAGING} RENAME TO {TABLE_RISK_BASELINE}"
    ))
    .execute(&mut *conn)
    .await?;
    Ok(())
}
