//! Pet medication database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_tag, Database, DbError, DbResult};
use crate::models::PetMedication;

const MEDICATION_COLUMNS: &str = r#"
    id, pet_id, name, brand_name, dosage, frequency, route, start_date, end_date,
    prescribed_by, reason, instructions, status, created_at
"#;

impl Database {
    /// Insert a new medication.
    pub fn insert_medication(&self, med: &PetMedication) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pet_medications (
                id, pet_id, name, brand_name, dosage, frequency, route, start_date, end_date,
                prescribed_by, reason, instructions, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                med.id,
                med.pet_id,
                med.name,
                med.brand_name,
                med.dosage,
                med.frequency,
                med.route.as_str(),
                med.start_date,
                med.end_date,
                med.prescribed_by,
                med.reason,
                med.instructions,
                med.status.as_str(),
                med.created_at,
            ],
        )?;
        Ok(())
    }

    /// Persist the mutable fields of a medication.
    pub fn update_medication(&self, med: &PetMedication) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE pet_medications SET
                dosage = ?2,
                frequency = ?3,
                end_date = ?4,
                instructions = ?5,
                status = ?6
            WHERE id = ?1
            "#,
            params![
                med.id,
                med.dosage,
                med.frequency,
                med.end_date,
                med.instructions,
                med.status.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: &str) -> DbResult<Option<PetMedication>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pet_medications WHERE id = ?", MEDICATION_COLUMNS),
                [id],
                MedicationRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Active medications for a pet, oldest first.
    pub fn list_active_medications(&self, pet_id: &str) -> DbResult<Vec<PetMedication>> {
        self.list_medications_where(pet_id, "status = 'active'", "start_date ASC")
    }

    /// Completed and discontinued medications for a pet, most recent first.
    pub fn list_medication_history(&self, pet_id: &str) -> DbResult<Vec<PetMedication>> {
        self.list_medications_where(pet_id, "status != 'active'", "end_date DESC, start_date DESC")
    }

    /// Number of active medications for a pet.
    pub fn count_active_medications(&self, pet_id: &str) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pet_medications WHERE pet_id = ? AND status = 'active'",
            [pet_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn list_medications_where(
        &self,
        pet_id: &str,
        filter: &str,
        order: &str,
    ) -> DbResult<Vec<PetMedication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pet_medications WHERE pet_id = ? AND {} ORDER BY {}",
            MEDICATION_COLUMNS, filter, order
        ))?;

        let rows = stmt.query_map([pet_id], MedicationRow::from_row)?;

        let mut meds = Vec::new();
        for row in rows {
            meds.push(row?.try_into()?);
        }
        Ok(meds)
    }
}

/// Intermediate row struct for database mapping.
struct MedicationRow {
    id: String,
    pet_id: String,
    name: String,
    brand_name: Option<String>,
    dosage: Option<String>,
    frequency: Option<String>,
    route: String,
    start_date: String,
    end_date: Option<String>,
    prescribed_by: Option<String>,
    reason: Option<String>,
    instructions: Option<String>,
    status: String,
    created_at: String,
}

impl MedicationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pet_id: row.get(1)?,
            name: row.get(2)?,
            brand_name: row.get(3)?,
            dosage: row.get(4)?,
            frequency: row.get(5)?,
            route: row.get(6)?,
            start_date: row.get(7)?,
            end_date: row.get(8)?,
            prescribed_by: row.get(9)?,
            reason: row.get(10)?,
            instructions: row.get(11)?,
            status: row.get(12)?,
            created_at: row.get(13)?,
        })
    }
}

impl TryFrom<MedicationRow> for PetMedication {
    type Error = DbError;

    fn try_from(row: MedicationRow) -> Result<Self, Self::Error> {
        Ok(PetMedication {
            id: row.id,
            pet_id: row.pet_id,
            name: row.name,
            brand_name: row.brand_name,
            dosage: row.dosage,
            frequency: row.frequency,
            route: parse_tag("route", &row.route)?,
            start_date: row.start_date,
            end_date: row.end_date,
            prescribed_by: row.prescribed_by,
            reason: row.reason,
            instructions: row.instructions,
            status: parse_tag("status", &row.status)?,
            created_at: row.created_at,
        })
    }
}
