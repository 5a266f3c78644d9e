//! Appointment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_tag, Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str = r#"
    id, pet_id, kind, title, date, time, veterinarian, clinic, notes, status,
    reminder_days_before, created_at
"#;

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appt: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, pet_id, kind, title, date, time, veterinarian, clinic, notes, status,
                reminder_days_before, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                appt.id,
                appt.pet_id,
                appt.kind.as_str(),
                appt.title,
                appt.date,
                appt.time,
                appt.veterinarian,
                appt.clinic,
                appt.notes,
                appt.status.as_str(),
                appt.reminder_days_before,
                appt.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS),
                [id],
                AppointmentRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Appointments for a pet, soonest first.
    pub fn list_appointments(&self, pet_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments WHERE pet_id = ? ORDER BY date ASC",
            APPOINTMENT_COLUMNS
        ))?;

        let rows = stmt.query_map([pet_id], AppointmentRow::from_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// Change an appointment's status.
    pub fn set_appointment_status(&self, id: &str, status: AppointmentStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    pet_id: String,
    kind: String,
    title: Option<String>,
    date: String,
    time: Option<String>,
    veterinarian: Option<String>,
    clinic: Option<String>,
    notes: Option<String>,
    status: String,
    reminder_days_before: Option<u32>,
    created_at: String,
}

impl AppointmentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pet_id: row.get(1)?,
            kind: row.get(2)?,
            title: row.get(3)?,
            date: row.get(4)?,
            time: row.get(5)?,
            veterinarian: row.get(6)?,
            clinic: row.get(7)?,
            notes: row.get(8)?,
            status: row.get(9)?,
            reminder_days_before: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: row.id,
            pet_id: row.pet_id,
            kind: parse_tag("kind", &row.kind)?,
            title: row.title,
            date: row.date,
            time: row.time,
            veterinarian: row.veterinarian,
            clinic: row.clinic,
            notes: row.notes,
            status: parse_tag("status", &row.status)?,
            reminder_days_before: row.reminder_days_before,
            created_at: row.created_at,
        })
    }
}
