//! Interaction check history.

use rusqlite::{params, Row};

use super::{Database, DbError, DbResult};
use crate::models::CheckRecord;

impl Database {
    /// Store a check result.
    pub fn insert_check(&self, record: &CheckRecord) -> DbResult<()> {
        let result_json = record.result.to_canonical_json()?;

        self.conn.execute(
            r#"
            INSERT INTO interaction_checks (
                id, pet_id, checked_by, overall_risk_level, result, fingerprint, checked_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.id,
                record.pet_id,
                record.checked_by,
                record.result.overall_risk_level.as_str(),
                result_json,
                record.fingerprint,
                record.checked_at,
            ],
        )?;
        Ok(())
    }

    /// Stored checks for a pet, newest first.
    ///
    /// Fails if a stored result no longer matches its fingerprint.
    pub fn list_checks(&self, pet_id: &str, limit: usize) -> DbResult<Vec<CheckRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pet_id, checked_by, result, fingerprint, checked_at
            FROM interaction_checks
            WHERE pet_id = ?1
            ORDER BY checked_at DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![pet_id, limit as i64], CheckRow::from_row)?;

        let mut checks = Vec::new();
        for row in rows {
            checks.push(row?.try_into()?);
        }
        Ok(checks)
    }
}

/// Intermediate row struct for database mapping.
struct CheckRow {
    id: String,
    pet_id: String,
    checked_by: String,
    result: String,
    fingerprint: String,
    checked_at: String,
}

impl CheckRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pet_id: row.get(1)?,
            checked_by: row.get(2)?,
            result: row.get(3)?,
            fingerprint: row.get(4)?,
            checked_at: row.get(5)?,
        })
    }
}

impl TryFrom<CheckRow> for CheckRecord {
    type Error = DbError;

    fn try_from(row: CheckRow) -> Result<Self, Self::Error> {
        let record = CheckRecord {
            id: row.id,
            pet_id: row.pet_id,
            checked_by: row.checked_by,
            result: serde_json::from_str(&row.result)?,
            fingerprint: row.fingerprint,
            checked_at: row.checked_at,
        };

        if !record.verify() {
            return Err(DbError::Constraint(format!(
                "Fingerprint mismatch for check {}",
                record.id
            )));
        }
        Ok(record)
    }
}
