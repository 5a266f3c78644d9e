//! Adverse reaction database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_tag, Database, DbError, DbResult};
use crate::models::AdverseReaction;

const REACTION_COLUMNS: &str = r#"
    id, pet_id, medication, date, severity, symptoms, duration, treatment,
    outcome, reported_by, notes, created_at
"#;

impl Database {
    /// Insert a new adverse reaction.
    pub fn insert_reaction(&self, reaction: &AdverseReaction) -> DbResult<()> {
        let symptoms_json = serde_json::to_string(&reaction.symptoms)?;

        self.conn.execute(
            r#"
            INSERT INTO adverse_reactions (
                id, pet_id, medication, date, severity, symptoms, duration, treatment,
                outcome, reported_by, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                reaction.id,
                reaction.pet_id,
                reaction.medication,
                reaction.date,
                reaction.severity.as_str(),
                symptoms_json,
                reaction.duration,
                reaction.treatment,
                reaction.outcome.as_str(),
                reaction.reported_by,
                reaction.notes,
                reaction.created_at,
            ],
        )?;
        Ok(())
    }

    /// Persist the editable fields of a reaction.
    pub fn update_reaction(&self, reaction: &AdverseReaction) -> DbResult<bool> {
        let symptoms_json = serde_json::to_string(&reaction.symptoms)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE adverse_reactions SET
                severity = ?2,
                symptoms = ?3,
                duration = ?4,
                treatment = ?5,
                outcome = ?6,
                notes = ?7
            WHERE id = ?1
            "#,
            params![
                reaction.id,
                reaction.severity.as_str(),
                symptoms_json,
                reaction.duration,
                reaction.treatment,
                reaction.outcome.as_str(),
                reaction.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a reaction by ID.
    pub fn get_reaction(&self, id: &str) -> DbResult<Option<AdverseReaction>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM adverse_reactions WHERE id = ?", REACTION_COLUMNS),
                [id],
                ReactionRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Reactions for a pet, newest first.
    pub fn list_reactions(&self, pet_id: &str) -> DbResult<Vec<AdverseReaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM adverse_reactions WHERE pet_id = ? ORDER BY date DESC, created_at DESC",
            REACTION_COLUMNS
        ))?;

        let rows = stmt.query_map([pet_id], ReactionRow::from_row)?;

        let mut reactions = Vec::new();
        for row in rows {
            reactions.push(row?.try_into()?);
        }
        Ok(reactions)
    }
}

/// Intermediate row struct for database mapping.
struct ReactionRow {
    id: String,
    pet_id: String,
    medication: String,
    date: String,
    severity: String,
    symptoms: String,
    duration: Option<String>,
    treatment: Option<String>,
    outcome: String,
    reported_by: Option<String>,
    notes: Option<String>,
    created_at: String,
}

impl ReactionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            pet_id: row.get(1)?,
            medication: row.get(2)?,
            date: row.get(3)?,
            severity: row.get(4)?,
            symptoms: row.get(5)?,
            duration: row.get(6)?,
            treatment: row.get(7)?,
            outcome: row.get(8)?,
            reported_by: row.get(9)?,
            notes: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

impl TryFrom<ReactionRow> for AdverseReaction {
    type Error = DbError;

    fn try_from(row: ReactionRow) -> Result<Self, Self::Error> {
        Ok(AdverseReaction {
            id: row.id,
            pet_id: row.pet_id,
            medication: row.medication,
            date: row.date,
            severity: parse_tag("severity", &row.severity)?,
            symptoms: serde_json::from_str(&row.symptoms)?,
            duration: row.duration,
            treatment: row.treatment,
            outcome: parse_tag("outcome", &row.outcome)?,
            reported_by: row.reported_by,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pet, ReactionOutcome, ReactionSeverity, Species};

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let pet = Pet::new("owner-1".into(), "Max".into(), Species::Dog);
        db.insert_pet(&pet).unwrap();
        (db, pet.id)
    }

    fn reaction(pet_id: &str, date: &str) -> AdverseReaction {
        AdverseReaction::new(
            pet_id.into(),
            "Carprofen".into(),
            date.into(),
            ReactionSeverity::Moderate,
            vec!["vomiting".into(), "lethargy".into()],
        )
    }

    #[test]
    fn test_insert_and_get_reaction() {
        let (db, pet_id) = setup_db();
        let mut r = reaction(&pet_id, "2024-03-01T10:00:00Z");
        r.reported_by = Some("Alex".into());
        db.insert_reaction(&r).unwrap();

        let retrieved = db.get_reaction(&r.id).unwrap().unwrap();
        assert_eq!(retrieved, r);
    }

    #[test]
    fn test_list_newest_first() {
        let (db, pet_id) = setup_db();
        let older = reaction(&pet_id, "2024-01-01T00:00:00Z");
        let newer = reaction(&pet_id, "2024-06-01T00:00:00Z");
        db.insert_reaction(&older).unwrap();
        db.insert_reaction(&newer).unwrap();

        let list = db.list_reactions(&pet_id).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, newer.id);
        assert_eq!(list[1].id, older.id);
    }

    #[test]
    fn test_update_reaction() {
        let (db, pet_id) = setup_db();
        let mut r = reaction(&pet_id, "2024-03-01T10:00:00Z");
        db.insert_reaction(&r).unwrap();

        r.outcome = ReactionOutcome::Ongoing;
        r.treatment = Some("IV fluids".into());
        assert!(db.update_reaction(&r).unwrap());

        let retrieved = db.get_reaction(&r.id).unwrap().unwrap();
        assert_eq!(retrieved.outcome, ReactionOutcome::Ongoing);
        assert_eq!(retrieved.treatment, Some("IV fluids".into()));
    }
}
