//! Pet models.

use serde::{Deserialize, Serialize};

use super::species::Species;
use super::ValidationError;

/// Maximum length of a pet's name and breed.
const MAX_NAME_LEN: usize = 50;

string_enum! {
    /// Unit the weight was recorded in.
    pub enum WeightUnit {
        Kg => "kg",
        Lbs => "lbs",
    }
}

string_enum! {
    /// Unit the age was recorded in.
    pub enum AgeUnit {
        Days => "days",
        Weeks => "weeks",
        Months => "months",
        Years => "years",
    }
}

string_enum! {
    pub enum Sex {
        Male => "male",
        Female => "female",
        Unknown => "unknown",
    }
}

/// A pet record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Local UUID
    pub id: String,
    /// Owning user
    pub owner_id: String,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub age: f64,
    pub age_unit: AgeUnit,
    pub sex: Sex,
    pub neutered: bool,
    /// Known allergies (free text)
    pub allergies: Vec<String>,
    /// Chronic conditions (free text)
    pub chronic_conditions: Vec<String>,
    pub microchip_id: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(owner_id: String, name: String, species: Species) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            name,
            species,
            breed: None,
            weight: 0.0,
            weight_unit: WeightUnit::Kg,
            age: 0.0,
            age_unit: AgeUnit::Years,
            sex: Sex::Unknown,
            neutered: false,
            allergies: Vec::new(),
            chronic_conditions: Vec::new(),
            microchip_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check field constraints before the record is stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("Pet name is required".into()));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError(format!(
                "Pet name cannot exceed {} characters",
                MAX_NAME_LEN
            )));
        }
        if self
            .breed
            .as_ref()
            .is_some_and(|b| b.chars().count() > MAX_NAME_LEN)
        {
            return Err(ValidationError(format!(
                "Breed cannot exceed {} characters",
                MAX_NAME_LEN
            )));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ValidationError("Weight must be a non-negative number".into()));
        }
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(ValidationError("Age must be a non-negative number".into()));
        }
        Ok(())
    }

    /// Weight in kilograms regardless of the recorded unit.
    pub fn weight_kg(&self) -> f64 {
        match self.weight_unit {
            WeightUnit::Kg => self.weight,
            WeightUnit::Lbs => self.weight * 0.453_592,
        }
    }

    /// Whether the given user owns this pet.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pet() {
        let pet = Pet::new("owner-1".into(), "Max".into(), Species::Dog);
        assert_eq!(pet.name, "Max");
        assert_eq!(pet.species, Species::Dog);
        assert_eq!(pet.id.len(), 36); // UUID format
        assert!(pet.is_owned_by("owner-1"));
        assert!(!pet.is_owned_by("owner-2"));
    }

    #[test]
    fn test_validate() {
        let mut pet = Pet::new("owner-1".into(), "Max".into(), Species::Dog);
        assert!(pet.validate().is_ok());

        pet.name = "   ".into();
        assert!(pet.validate().is_err());

        pet.name = "x".repeat(51);
        assert!(pet.validate().is_err());

        pet.name = "Max".into();
        pet.weight = -1.0;
        assert!(pet.validate().is_err());
    }

    #[test]
    fn test_weight_kg() {
        let mut pet = Pet::new("owner-1".into(), "Max".into(), Species::Dog);
        pet.weight = 10.0;
        assert_eq!(pet.weight_kg(), 10.0);

        pet.weight_unit = WeightUnit::Lbs;
        assert!((pet.weight_kg() - 4.53592).abs() < 0.0001);
    }

    #[test]
    fn test_unit_tags() {
        assert_eq!("LBS".parse::<WeightUnit>(), Ok(WeightUnit::Lbs));
        assert_eq!(AgeUnit::Months.as_str(), "months");
        assert!("stone".parse::<WeightUnit>().is_err());
    }
}
