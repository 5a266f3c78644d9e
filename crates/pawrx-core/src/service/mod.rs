//! Request handling for pets, medication records and safety checks.
//!
//! Callers arrive already identified. A caller may act on a pet they own;
//! veterinarians may act on any pet.

mod catalog;
mod checks;
mod records;

pub use catalog::*;
pub use checks::*;
pub use records::*;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::engine::InteractionEngine;
use crate::models::{Pet, ValidationError};
use crate::notify::NotificationGateway;

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(DbError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) => 400,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Storage(_) | ServiceError::Serialization(_) => 500,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => ServiceError::NotFound(what),
            other => ServiceError::Storage(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        ServiceError::InvalidInput(e.0)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Role of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Vet,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub user_id: String,
    /// Display name, recorded on reactions the caller reports
    pub name: String,
    pub role: Role,
}

impl Caller {
    pub fn owner(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::Owner,
        }
    }

    pub fn vet(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::Vet,
        }
    }

    /// Whether the caller may read and change the pet's records.
    pub fn can_access(&self, pet: &Pet) -> bool {
        self.role == Role::Vet || pet.is_owned_by(&self.user_id)
    }
}

/// Entry point for all record and check operations.
///
/// Borrows the store and notifier for the duration of a request and holds an
/// engine snapshot, so a dataset swap never affects a request in flight.
pub struct SafetyService<'a> {
    db: &'a Database,
    engine: Arc<InteractionEngine>,
    notifier: &'a dyn NotificationGateway,
    record_checks: bool,
}

impl<'a> SafetyService<'a> {
    /// Create a service that records every check.
    pub fn new(
        db: &'a Database,
        engine: Arc<InteractionEngine>,
        notifier: &'a dyn NotificationGateway,
    ) -> Self {
        Self {
            db,
            engine,
            notifier,
            record_checks: true,
        }
    }

    /// Turn check recording on or off.
    pub fn with_check_history(mut self, record_checks: bool) -> Self {
        self.record_checks = record_checks;
        self
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    /// Load a pet the caller is allowed to act on.
    fn authorized_pet(&self, caller: &Caller, pet_id: &str) -> ServiceResult<Pet> {
        if pet_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Pet ID is required".into()));
        }
        let pet = self.db.require_pet(pet_id)?;
        if !caller.can_access(&pet) {
            tracing::warn!(user_id = %caller.user_id, pet_id, "Denied access to pet");
            return Err(ServiceError::Forbidden(format!(
                "Not authorized to access pet {}",
                pet_id
            )));
        }
        Ok(pet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(ServiceError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(
            ServiceError::Storage(DbError::Constraint("x".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: ServiceError = DbError::NotFound("Pet abc".into()).into();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Pet abc"));
    }

    #[test]
    fn test_caller_access() {
        let pet = Pet::new("owner-1".into(), "Max".into(), Species::Dog);

        assert!(Caller::owner("owner-1", "Sam").can_access(&pet));
        assert!(!Caller::owner("owner-2", "Alex").can_access(&pet));
        assert!(Caller::vet("vet-9", "Dr. Reyes").can_access(&pet));
    }
}
