//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_tag, Database, DbError, DbResult};
use crate::models::Pet;

const PET_COLUMNS: &str = r#"
    id, owner_id, name, species, breed, weight, weight_unit, age, age_unit,
    sex, neutered, allergies, chronic_conditions, microchip_id, created_at, updated_at
"#;

impl Database {
    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        let allergies_json = serde_json::to_string(&pet.allergies)?;
        let conditions_json = serde_json::to_string(&pet.chronic_conditions)?;

        self.conn.execute(
            r#"
            INSERT INTO pets (
                id, owner_id, name, species, breed, weight, weight_unit, age, age_unit,
                sex, neutered, allergies, chronic_conditions, microchip_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                pet.id,
                pet.owner_id,
                pet.name,
                pet.species.as_str(),
                pet.breed,
                pet.weight,
                pet.weight_unit.as_str(),
                pet.age,
                pet.age_unit.as_str(),
                pet.sex.as_str(),
                pet.neutered,
                allergies_json,
                conditions_json,
                pet.microchip_id,
                pet.created_at,
                pet.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing pet. The owner cannot change.
    pub fn update_pet(&self, pet: &Pet) -> DbResult<bool> {
        let allergies_json = serde_json::to_string(&pet.allergies)?;
        let conditions_json = serde_json::to_string(&pet.chronic_conditions)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE pets SET
                name = ?2,
                species = ?3,
                breed = ?4,
                weight = ?5,
                weight_unit = ?6,
                age = ?7,
                age_unit = ?8,
                sex = ?9,
                neutered = ?10,
                allergies = ?11,
                chronic_conditions = ?12,
                microchip_id = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
            params![
                pet.id,
                pet.name,
                pet.species.as_str(),
                pet.breed,
                pet.weight,
                pet.weight_unit.as_str(),
                pet.age,
                pet.age_unit.as_str(),
                pet.sex.as_str(),
                pet.neutered,
                allergies_json,
                conditions_json,
                pet.microchip_id,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, id: &str) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pets WHERE id = ?", PET_COLUMNS),
                [id],
                PetRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a pet by ID, failing if it does not exist.
    pub fn require_pet(&self, id: &str) -> DbResult<Pet> {
        self.get_pet(id)?
            .ok_or_else(|| DbError::NotFound(format!("pet {}", id)))
    }

    /// List an owner's pets, ordered by name.
    pub fn list_pets_for_owner(&self, owner_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pets WHERE owner_id = ? ORDER BY name",
            PET_COLUMNS
        ))?;

        let rows = stmt.query_map([owner_id], PetRow::from_row)?;

        let mut pets = Vec::new();
        for row in rows {
            pets.push(row?.try_into()?);
        }
        Ok(pets)
    }

    /// Delete a pet and, through cascading keys, all of its records.
    pub fn delete_pet(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM pets WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct PetRow {
    id: String,
    owner_id: String,
    name: String,
    species: String,
    breed: Option<String>,
    weight: f64,
    weight_unit: String,
    age: f64,
    age_unit: String,
    sex: String,
    neutered: bool,
    allergies: String,
    chronic_conditions: String,
    microchip_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PetRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            species: row.get(3)?,
            breed: row.get(4)?,
            weight: row.get(5)?,
            weight_unit: row.get(6)?,
            age: row.get(7)?,
            age_unit: row.get(8)?,
            sex: row.get(9)?,
            neutered: row.get(10)?,
            allergies: row.get(11)?,
            chronic_conditions: row.get(12)?,
            microchip_id: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }
}

impl TryFrom<PetRow> for Pet {
    type Error = DbError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        Ok(Pet {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            species: parse_tag("species", &row.species)?,
            breed: row.breed,
            weight: row.weight,
            weight_unit: parse_tag("weight_unit", &row.weight_unit)?,
            age: row.age,
            age_unit: parse_tag("age_unit", &row.age_unit)?,
            sex: parse_tag("sex", &row.sex)?,
            neutered: row.neutered,
            allergies: serde_json::from_str(&row.allergies)?,
            chronic_conditions: serde_json::from_str(&row.chronic_conditions)?,
            microchip_id: row.microchip_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
