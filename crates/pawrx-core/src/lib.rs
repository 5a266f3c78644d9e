//! PawRx Core Library
//!
//! Pet medication records with rule-based medication safety checks.
//!
//! # Architecture
//!
//! ```text
//! Caller ──→ SafetyService: validate → load pet → authorize
//!                                   │
//!                     InteractionEngine (immutable snapshot)
//!        Normalize → Pair Matching → Toxicity → Aggregate Risk → Recommendations
//!                                   │
//!             ┌─────────────────────┼─────────────────────┐
//!             │                     │                     │
//!             ▼                     ▼                     ▼
//!       Check History          Owner Alert           AI Narrative
//!      (SHA-256 stamped)     (high/critical)     (fallback on failure)
//! ```
//!
//! # Core Principle
//!
//! **Unknown medications are never flagged.** They are reported back as
//! unmatched so the caller can see what the reference data did not cover.
//!
//! # Modules
//!
//! - [`engine`]: Interaction engine (normalizer, pair index, recommendations)
//! - [`reference`]: Interaction/toxicity datasets and the medication catalog
//! - [`db`]: SQLite store for pets, medications, reactions, appointments, checks
//! - [`service`]: Validation, authorization and orchestration
//! - [`notify`]: Owner notification gateway
//! - [`config`]: Environment configuration and logging setup

pub mod config;
pub mod db;
pub mod engine;
pub mod models;
pub mod notify;
pub mod reference;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use engine::{InteractionEngine, SharedEngine};
pub use models::{
    InteractionCheckRequest, InteractionCheckResult, MedicationEntry, Pet, PetMedication,
    RiskLevel, Species,
};
pub use reference::{MedicationCatalog, ReferenceData};
pub use service::{Caller, Role, SafetyService, ServiceError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use models::{
    AdverseReaction, Appointment, AppointmentStatus, AppointmentType, MedicationReference,
    MedicationStatus, MedicationUpdate, ReactionSeverity, ReactionUpdate, Route,
};
use notify::{NotificationGateway, TracingNotifier};
use pawrx_ai::{
    analyze_or_fallback, AiAnalysis, AnalysisError, AnalysisGateway, AnalysisRequest,
    AnalysisResult, HttpAnalysisClient,
};
use service::ServiceResult;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PawrxError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Reference data error: {0}")]
    ReferenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for PawrxError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => PawrxError::NotFound(what),
            other => PawrxError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ServiceError> for PawrxError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidInput(msg) => PawrxError::InvalidInput(msg),
            ServiceError::NotFound(what) => PawrxError::NotFound(what),
            ServiceError::Forbidden(msg) => PawrxError::Forbidden(msg),
            ServiceError::Storage(e) => e.into(),
            ServiceError::Serialization(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for PawrxError {
    fn from(e: serde_json::Error) -> Self {
        PawrxError::SerializationError(e.to_string())
    }
}

impl From<reference::ReferenceError> for PawrxError {
    fn from(e: reference::ReferenceError) -> Self {
        PawrxError::ReferenceError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PawrxError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PawrxError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_field<T>(value: &str) -> Result<T, PawrxError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e: T::Err| PawrxError::InvalidInput(e.to_string()))
}

fn parse_species(species: Option<String>) -> Result<Option<Species>, PawrxError> {
    species.as_deref().map(parse_field).transpose()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the global log subscriber. `RUST_LOG` overrides `filter`.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    config::init_tracing(filter.as_deref().unwrap_or(config::DEFAULT_LOG_FILTER));
}

/// Open or create a database at the given path with the bundled datasets.
#[uniffi::export]
pub fn open_pawrx(path: String) -> Result<Arc<PawrxCore>, PawrxError> {
    let config = Config {
        db_path: path.into(),
        ..Config::default()
    };
    Ok(Arc::new(PawrxCore::from_config(&config)?))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_pawrx_in_memory() -> Result<Arc<PawrxCore>, PawrxError> {
    let engine = InteractionEngine::builtin()?;
    Ok(Arc::new(PawrxCore::new(
        Database::open_in_memory()?,
        engine,
        Arc::new(TracingNotifier),
        None,
        true,
    )))
}

/// Open using `PAWRX_*` environment configuration.
#[uniffi::export]
pub fn open_pawrx_from_env() -> Result<Arc<PawrxCore>, PawrxError> {
    Ok(Arc::new(PawrxCore::from_config(&Config::from_env())?))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Analyzer used when no AI service is configured.
struct Unconfigured;

impl AnalysisGateway for Unconfigured {
    fn analyze(&self, _request: &AnalysisRequest) -> AnalysisResult<AiAnalysis> {
        Err(AnalysisError::Connection("no AI service configured".into()))
    }
}

/// Thread-safe store and engine wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PawrxCore {
    db: Arc<Mutex<Database>>,
    engine: SharedEngine,
    notifier: Arc<dyn NotificationGateway>,
    analyzer: Option<Box<dyn AnalysisGateway + Send + Sync>>,
    record_checks: bool,
}

impl PawrxCore {
    /// Assemble a core from its parts.
    pub fn new(
        db: Database,
        engine: InteractionEngine,
        notifier: Arc<dyn NotificationGateway>,
        analyzer: Option<Box<dyn AnalysisGateway + Send + Sync>>,
        record_checks: bool,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            engine: SharedEngine::new(engine),
            notifier,
            analyzer,
            record_checks,
        }
    }

    /// Open the database and datasets named by `config`.
    pub fn from_config(config: &Config) -> Result<Self, PawrxError> {
        let engine = InteractionEngine::new(config.load_reference()?, config.load_catalog()?);
        let analyzer: Option<Box<dyn AnalysisGateway + Send + Sync>> = match &config.ai_url {
            Some(url) => Some(Box::new(
                HttpAnalysisClient::new(url, config.ai_timeout_secs)
                    .map_err(|e| PawrxError::ConfigError(e.to_string()))?,
            )),
            None => None,
        };

        tracing::info!(
            db_path = %config.db_path.display(),
            ai_enabled = analyzer.is_some(),
            "Opening PawRx core"
        );
        Ok(Self::new(
            Database::open(&config.db_path)?,
            engine,
            Arc::new(TracingNotifier),
            analyzer,
            config.record_checks,
        ))
    }

    /// Run `f` against a service bound to the locked store and current engine.
    pub fn with_service<T, F>(&self, f: F) -> Result<T, PawrxError>
    where
        F: FnOnce(&SafetyService<'_>) -> ServiceResult<T>,
    {
        let db = self.db.lock()?;
        let service = SafetyService::new(&db, self.engine.current(), self.notifier.as_ref())
            .with_check_history(self.record_checks);
        Ok(f(&service)?)
    }

    /// Replace the interaction engine. Checks in flight finish on the old one.
    pub fn install_engine(&self, engine: InteractionEngine) {
        self.engine.swap(engine);
        tracing::info!("Reference datasets replaced");
    }
}

#[uniffi::export]
impl PawrxCore {
    // =========================================================================
    // Pet Operations
    // =========================================================================

    /// Register a pet owned by the caller.
    pub fn create_pet(&self, caller: FfiCaller, pet: FfiPet) -> Result<FfiPet, PawrxError> {
        let pet = Pet::try_from(pet)?;
        let pet = self.with_service(|s| s.create_pet(&caller.into(), pet))?;
        Ok(pet.into())
    }

    pub fn get_pet(&self, caller: FfiCaller, pet_id: String) -> Result<FfiPet, PawrxError> {
        let pet = self.with_service(|s| s.get_pet(&caller.into(), &pet_id))?;
        Ok(pet.into())
    }

    /// Pets owned by the caller.
    pub fn list_pets(&self, caller: FfiCaller) -> Result<Vec<FfiPet>, PawrxError> {
        let pets = self.with_service(|s| s.list_pets(&caller.into()))?;
        Ok(pets.into_iter().map(|p| p.into()).collect())
    }

    pub fn update_pet(&self, caller: FfiCaller, pet: FfiPet) -> Result<FfiPet, PawrxError> {
        let pet = Pet::try_from(pet)?;
        let pet = self.with_service(|s| s.update_pet(&caller.into(), pet))?;
        Ok(pet.into())
    }

    pub fn delete_pet(&self, caller: FfiCaller, pet_id: String) -> Result<(), PawrxError> {
        self.with_service(|s| s.delete_pet(&caller.into(), &pet_id))
    }

    // =========================================================================
    // Medication Operations
    // =========================================================================

    pub fn add_medication(
        &self,
        caller: FfiCaller,
        pet_id: String,
        medication: FfiMedication,
    ) -> Result<FfiMedication, PawrxError> {
        let medication = PetMedication::try_from(medication)?;
        let med = self.with_service(|s| s.add_medication(&caller.into(), &pet_id, medication))?;
        Ok(med.into())
    }

    /// Change dosage, frequency, end date, instructions or status.
    pub fn update_medication(
        &self,
        caller: FfiCaller,
        medication_id: String,
        update: FfiMedicationUpdate,
    ) -> Result<FfiMedication, PawrxError> {
        let update = MedicationUpdate::try_from(update)?;
        let med = self.with_service(|s| {
            s.update_medication(&caller.into(), &medication_id, &update)
        })?;
        Ok(med.into())
    }

    pub fn discontinue_medication(
        &self,
        caller: FfiCaller,
        medication_id: String,
    ) -> Result<FfiMedication, PawrxError> {
        let med = self.with_service(|s| s.discontinue_medication(&caller.into(), &medication_id))?;
        Ok(med.into())
    }

    pub fn current_medications(
        &self,
        caller: FfiCaller,
        pet_id: String,
    ) -> Result<Vec<FfiMedication>, PawrxError> {
        let meds = self.with_service(|s| s.current_medications(&caller.into(), &pet_id))?;
        Ok(meds.into_iter().map(|m| m.into()).collect())
    }

    pub fn medication_history(
        &self,
        caller: FfiCaller,
        pet_id: String,
    ) -> Result<Vec<FfiMedication>, PawrxError> {
        let meds = self.with_service(|s| s.medication_history(&caller.into(), &pet_id))?;
        Ok(meds.into_iter().map(|m| m.into()).collect())
    }

    // =========================================================================
    // Reaction and Appointment Operations
    // =========================================================================

    pub fn record_reaction(
        &self,
        caller: FfiCaller,
        pet_id: String,
        reaction: FfiReaction,
    ) -> Result<FfiReaction, PawrxError> {
        let reaction = AdverseReaction::try_from(reaction)?;
        let saved = self.with_service(|s| s.record_reaction(&caller.into(), &pet_id, reaction))?;
        Ok(saved.into())
    }

    pub fn list_reactions(
        &self,
        caller: FfiCaller,
        pet_id: String,
    ) -> Result<Vec<FfiReaction>, PawrxError> {
        let reactions = self.with_service(|s| s.list_reactions(&caller.into(), &pet_id))?;
        Ok(reactions.into_iter().map(|r| r.into()).collect())
    }

    pub fn update_reaction(
        &self,
        caller: FfiCaller,
        reaction_id: String,
        update: FfiReactionUpdate,
    ) -> Result<FfiReaction, PawrxError> {
        let update = ReactionUpdate::try_from(update)?;
        let reaction =
            self.with_service(|s| s.update_reaction(&caller.into(), &reaction_id, &update))?;
        Ok(reaction.into())
    }

    pub fn add_appointment(
        &self,
        caller: FfiCaller,
        pet_id: String,
        appointment: FfiAppointment,
    ) -> Result<FfiAppointment, PawrxError> {
        let appointment = Appointment::try_from(appointment)?;
        let saved = self.with_service(|s| s.add_appointment(&caller.into(), &pet_id, appointment))?;
        Ok(saved.into())
    }

    pub fn list_appointments(
        &self,
        caller: FfiCaller,
        pet_id: String,
    ) -> Result<Vec<FfiAppointment>, PawrxError> {
        let appts = self.with_service(|s| s.list_appointments(&caller.into(), &pet_id))?;
        Ok(appts.into_iter().map(|a| a.into()).collect())
    }

    pub fn update_appointment_status(
        &self,
        caller: FfiCaller,
        appointment_id: String,
        status: String,
    ) -> Result<FfiAppointment, PawrxError> {
        let status: AppointmentStatus = parse_field(&status)?;
        let appt = self.with_service(|s| {
            s.update_appointment_status(&caller.into(), &appointment_id, status)
        })?;
        Ok(appt.into())
    }

    // =========================================================================
    // Safety Check Operations
    // =========================================================================

    /// Check a list of medications for a pet.
    pub fn check_interactions(
        &self,
        caller: FfiCaller,
        pet_id: String,
        medications: Vec<String>,
    ) -> Result<FfiCheckReport, PawrxError> {
        let request = InteractionCheckRequest {
            pet_id,
            medications: medications.into_iter().map(MedicationEntry::named).collect(),
        };
        let report = self.with_service(|s| s.check_interactions(&caller.into(), &request))?;
        FfiCheckReport::try_from(report)
    }

    /// Check a pet's active medications plus proposed additions.
    pub fn check_pet_medications(
        &self,
        caller: FfiCaller,
        pet_id: String,
        proposed: Vec<String>,
    ) -> Result<FfiCheckReport, PawrxError> {
        let report =
            self.with_service(|s| s.check_pet_medications(&caller.into(), &pet_id, &proposed))?;
        FfiCheckReport::try_from(report)
    }

    /// Recorded checks for a pet as JSON, newest first.
    pub fn check_history_json(
        &self,
        caller: FfiCaller,
        pet_id: String,
        limit: u32,
    ) -> Result<String, PawrxError> {
        let history =
            self.with_service(|s| s.check_history(&caller.into(), &pet_id, limit as usize))?;
        Ok(serde_json::to_string(&history)?)
    }

    /// AI narrative for the pet's active medications as JSON.
    ///
    /// The store lock is released before the AI service is called, so checks
    /// and record updates proceed while the analysis is in flight. Carries
    /// `"degraded": true` when the fallback was substituted.
    pub fn analyze_medications_json(
        &self,
        caller: FfiCaller,
        pet_id: String,
        query: Option<String>,
    ) -> Result<String, PawrxError> {
        let request = self.with_service(|s| {
            s.prepare_analysis(&caller.into(), &pet_id, &[], query.as_deref())
        })?;

        let analyzer: &dyn AnalysisGateway = match &self.analyzer {
            Some(analyzer) => analyzer.as_ref(),
            None => &Unconfigured,
        };
        let outcome = analyze_or_fallback(analyzer, &request);
        Ok(serde_json::to_string(&outcome)?)
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    pub fn search_medications(
        &self,
        query: String,
        species: Option<String>,
    ) -> Result<Vec<FfiMedicationReference>, PawrxError> {
        let species = parse_species(species)?;
        let found = self.engine.current().catalog().search(&query, species);
        Ok(found.into_iter().map(|m| m.into()).collect())
    }

    pub fn common_doses(&self, name: String) -> Vec<String> {
        self.engine.current().catalog().common_doses(&name)
    }

    pub fn medication_alternatives(
        &self,
        medication: String,
        species: Option<String>,
        condition: Option<String>,
    ) -> Result<Vec<FfiMedicationReference>, PawrxError> {
        let species = parse_species(species)?;
        let found = self.with_service(|s| {
            s.medication_alternatives(&medication, species, condition.as_deref())
        })?;
        Ok(found.into_iter().map(|m| m.into()).collect())
    }

    /// Replace the reference datasets from JSON fixtures.
    pub fn reload_reference(
        &self,
        reference_json: String,
        catalog_json: String,
    ) -> Result<(), PawrxError> {
        let engine = InteractionEngine::new(
            ReferenceData::from_json(&reference_json)?,
            MedicationCatalog::from_json(&catalog_json)?,
        );
        self.install_engine(engine);
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe authenticated caller.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaller {
    pub user_id: String,
    pub name: String,
    pub is_vet: bool,
}

impl From<FfiCaller> for Caller {
    fn from(caller: FfiCaller) -> Self {
        if caller.is_vet {
            Caller::vet(caller.user_id, caller.name)
        } else {
            Caller::owner(caller.user_id, caller.name)
        }
    }
}

/// FFI-safe pet. Leave `id` empty when creating.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub weight: f64,
    pub weight_unit: String,
    pub age: f64,
    pub age_unit: String,
    pub sex: String,
    pub neutered: bool,
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub microchip_id: Option<String>,
}

impl From<Pet> for FfiPet {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            owner_id: pet.owner_id,
            name: pet.name,
            species: pet.species.as_str().to_string(),
            breed: pet.breed,
            weight: pet.weight,
            weight_unit: pet.weight_unit.as_str().to_string(),
            age: pet.age,
            age_unit: pet.age_unit.as_str().to_string(),
            sex: pet.sex.as_str().to_string(),
            neutered: pet.neutered,
            allergies: pet.allergies,
            chronic_conditions: pet.chronic_conditions,
            microchip_id: pet.microchip_id,
        }
    }
}

impl TryFrom<FfiPet> for Pet {
    type Error = PawrxError;

    fn try_from(ffi: FfiPet) -> Result<Self, Self::Error> {
        let mut pet = Pet::new(ffi.owner_id, ffi.name, parse_field(&ffi.species)?);
        if !ffi.id.trim().is_empty() {
            pet.id = ffi.id;
        }
        pet.breed = ffi.breed;
        pet.weight = ffi.weight;
        pet.weight_unit = parse_field(&ffi.weight_unit)?;
        pet.age = ffi.age;
        pet.age_unit = parse_field(&ffi.age_unit)?;
        pet.sex = parse_field(&ffi.sex)?;
        pet.neutered = ffi.neutered;
        pet.allergies = ffi.allergies;
        pet.chronic_conditions = ffi.chronic_conditions;
        pet.microchip_id = ffi.microchip_id;
        Ok(pet)
    }
}

/// FFI-safe pet medication. Leave `id` empty when adding.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub pet_id: String,
    pub name: String,
    pub brand_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub route: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub prescribed_by: Option<String>,
    pub reason: Option<String>,
    pub instructions: Option<String>,
    pub status: String,
}

impl From<PetMedication> for FfiMedication {
    fn from(med: PetMedication) -> Self {
        Self {
            id: med.id,
            pet_id: med.pet_id,
            name: med.name,
            brand_name: med.brand_name,
            dosage: med.dosage,
            frequency: med.frequency,
            route: med.route.as_str().to_string(),
            start_date: Some(med.start_date),
            end_date: med.end_date,
            prescribed_by: med.prescribed_by,
            reason: med.reason,
            instructions: med.instructions,
            status: med.status.as_str().to_string(),
        }
    }
}

impl TryFrom<FfiMedication> for PetMedication {
    type Error = PawrxError;

    fn try_from(ffi: FfiMedication) -> Result<Self, Self::Error> {
        let mut med = PetMedication::new(ffi.pet_id, ffi.name);
        if !ffi.id.trim().is_empty() {
            med.id = ffi.id;
        }
        if !ffi.route.trim().is_empty() {
            med.route = parse_field::<Route>(&ffi.route)?;
        }
        if !ffi.status.trim().is_empty() {
            med.status = parse_field::<MedicationStatus>(&ffi.status)?;
        }
        if let Some(start) = ffi.start_date.filter(|d| !d.trim().is_empty()) {
            med.start_date = start;
        }
        med.brand_name = ffi.brand_name;
        med.dosage = ffi.dosage;
        med.frequency = ffi.frequency;
        med.end_date = ffi.end_date;
        med.prescribed_by = ffi.prescribed_by;
        med.reason = ffi.reason;
        med.instructions = ffi.instructions;
        Ok(med)
    }
}

/// Medication fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiMedicationUpdate {
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub end_date: Option<String>,
    pub instructions: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<FfiMedicationUpdate> for MedicationUpdate {
    type Error = PawrxError;

    fn try_from(ffi: FfiMedicationUpdate) -> Result<Self, Self::Error> {
        Ok(Self {
            dosage: ffi.dosage,
            frequency: ffi.frequency,
            end_date: ffi.end_date,
            instructions: ffi.instructions,
            status: ffi.status.as_deref().map(parse_field).transpose()?,
        })
    }
}

/// FFI-safe adverse reaction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReaction {
    pub id: String,
    pub medication: String,
    pub date: String,
    pub severity: String,
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub treatment: Option<String>,
    pub outcome: String,
    pub reported_by: Option<String>,
    pub notes: Option<String>,
}

impl From<AdverseReaction> for FfiReaction {
    fn from(reaction: AdverseReaction) -> Self {
        Self {
            id: reaction.id,
            medication: reaction.medication,
            date: reaction.date,
            severity: reaction.severity.as_str().to_string(),
            symptoms: reaction.symptoms,
            duration: reaction.duration,
            treatment: reaction.treatment,
            outcome: reaction.outcome.as_str().to_string(),
            reported_by: reaction.reported_by,
            notes: reaction.notes,
        }
    }
}

impl TryFrom<FfiReaction> for AdverseReaction {
    type Error = PawrxError;

    fn try_from(ffi: FfiReaction) -> Result<Self, Self::Error> {
        let severity: ReactionSeverity = parse_field(&ffi.severity)?;
        let mut reaction =
            AdverseReaction::new(String::new(), ffi.medication, ffi.date, severity, ffi.symptoms);
        if !ffi.outcome.trim().is_empty() {
            reaction.outcome = parse_field(&ffi.outcome)?;
        }
        reaction.duration = ffi.duration;
        reaction.treatment = ffi.treatment;
        reaction.notes = ffi.notes;
        Ok(reaction)
    }
}

/// Reaction fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiReactionUpdate {
    pub severity: Option<String>,
    pub symptoms: Option<Vec<String>>,
    pub duration: Option<String>,
    pub treatment: Option<String>,
    pub outcome: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<FfiReactionUpdate> for ReactionUpdate {
    type Error = PawrxError;

    fn try_from(ffi: FfiReactionUpdate) -> Result<Self, Self::Error> {
        Ok(Self {
            severity: ffi.severity.as_deref().map(parse_field).transpose()?,
            symptoms: ffi.symptoms,
            duration: ffi.duration,
            treatment: ffi.treatment,
            outcome: ffi.outcome.as_deref().map(parse_field).transpose()?,
            notes: ffi.notes,
        })
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub kind: String,
    pub title: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub reminder_days_before: Option<u32>,
}

impl From<Appointment> for FfiAppointment {
    fn from(appt: Appointment) -> Self {
        Self {
            id: appt.id,
            kind: appt.kind.as_str().to_string(),
            title: appt.title,
            date: appt.date,
            time: appt.time,
            veterinarian: appt.veterinarian,
            clinic: appt.clinic,
            notes: appt.notes,
            status: appt.status.as_str().to_string(),
            reminder_days_before: appt.reminder_days_before,
        }
    }
}

impl TryFrom<FfiAppointment> for Appointment {
    type Error = PawrxError;

    fn try_from(ffi: FfiAppointment) -> Result<Self, Self::Error> {
        let kind: AppointmentType = parse_field(&ffi.kind)?;
        let mut appt = Appointment::new(String::new(), kind, ffi.date);
        if !ffi.status.trim().is_empty() {
            appt.status = parse_field(&ffi.status)?;
        }
        appt.title = ffi.title;
        appt.time = ffi.time;
        appt.veterinarian = ffi.veterinarian;
        appt.clinic = ffi.clinic;
        appt.notes = ffi.notes;
        appt.reminder_days_before = ffi.reminder_days_before;
        Ok(appt)
    }
}

/// FFI-safe catalog entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationReference {
    pub canonical_name: String,
    pub brand_names: Vec<String>,
    pub category: Option<String>,
    pub common_doses: Vec<String>,
}

impl From<MedicationReference> for FfiMedicationReference {
    fn from(med: MedicationReference) -> Self {
        Self {
            canonical_name: med.canonical_name,
            brand_names: med.brand_names,
            category: med.category,
            common_doses: med.common_doses,
        }
    }
}

/// FFI-safe check summary with the full report as JSON.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCheckReport {
    pub overall_risk_level: String,
    pub interaction_count: u32,
    pub toxic_count: u32,
    pub unmatched_medications: Vec<String>,
    pub alert_sent: bool,
    pub check_id: Option<String>,
    pub report_json: String,
}

impl TryFrom<service::InteractionReport> for FfiCheckReport {
    type Error = PawrxError;

    fn try_from(report: service::InteractionReport) -> Result<Self, Self::Error> {
        let report_json = serde_json::to_string(&report)?;
        Ok(Self {
            overall_risk_level: report.result.overall_risk_level.as_str().to_string(),
            interaction_count: report.result.drug_interactions.len() as u32,
            toxic_count: report.result.toxic_medications.len() as u32,
            unmatched_medications: report.result.unmatched_medications,
            alert_sent: report.alert_sent,
            check_id: report.check_id,
            report_json,
        })
    }
}
