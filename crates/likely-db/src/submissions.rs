//! Audit log of scored questionnaires (`risk_submissions`).

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::schema::TABLE_SUBMISSIONS;

/// Submission as handed over by the scoring endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub age: u32,
    pub ethnicity: String,
    pub relatives_with_cancer: u32,
    pub brca_known: String,
    pub anxiety_level: String,
    pub risk_level: String,
    pub risk_percentage: f64,
    /// The full questionnaire as submitted.
    pub full_data: serde_json::Value,
}

/// Stored submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: NewSubmission,
}

type SubmissionRow = (String, String, i64, String, i64, String, String, String, f64, String);

#[derive(Clone)]
pub struct SubmissionRepository {
    db: Arc<Database>,
}

impl SubmissionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn insert(&self, submission: &NewSubmission) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let submitted_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO risk_submissions
                (id, submitted_at, age, ethnicity, relatives_with_cancer,
                 brca_known, anxiety_level, risk_level, risk_percentage, full_data)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(submitted_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(i64::from(submission.age))
        .bind(&submission.ethnicity)
        .bind(i64::from(submission.relatives_with_cancer))
        .bind(&submission.brca_known)
        .bind(&submission.anxiety_level)
        .bind(&submission.risk_level)
        .bind(submission.risk_percentage)
        .bind(serde_json::to_string(&submission.full_data)?)
        .execute(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Most recent submissions first.
    pub async fn list(&self, limit: u32) -> Result<Vec<Submission>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT id, submitted_at, age, ethnicity, relatives_with_cancer,
                   brca_known, anxiety_level, risk_level, risk_percentage, full_data
            FROM risk_submissions
            ORDER BY submitted_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(decode_row).collect()
    }
}

fn decode_row(row: SubmissionRow) -> Result<Submission> {
    let (id, submitted_at, age, ethnicity, relatives, brca_known, anxiety_level, risk_level, risk_percentage, full_data) = row;
    let corrupt = |detail: String| DbError::CorruptRow { table: TABLE_SUBMISSIONS, detail };

    Ok(Submission {
        id: Uuid::parse_str(&id).map_err(|e| corrupt(format!("id {id}: {e}")))?,
        submitted_at: DateTime::parse_from_rfc3339(&submitted_at)
            .map_err(|e| corrupt(format!("submitted_at {submitted_at}: {e}")))?
            .with_timezone(&Utc),
        data: NewSubmission {
            age: u32::try_from(age).map_err(|_| corrupt(format!("age {age}")))?,
            ethnicity,
            relatives_with_cancer: u32::try_from(relatives)
                .map_err(|_| corrupt(format!("relatives_with_cancer {relatives}")))?,
            brca_known,
            anxiety_level,
            risk_level,
            risk_percentage,
            full_data: serde_json::from_str(&full_data)?,
        },
    })
}
