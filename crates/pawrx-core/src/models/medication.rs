//! Pet medication and adverse reaction records.

use serde::{Deserialize, Serialize};

string_enum! {
    /// Route of administration.
    pub enum Route {
        Oral => "oral",
        Topical => "topical",
        Injection => "injection",
        Inhalation => "inhalation",
        Other => "other",
    }
}

string_enum! {
    pub enum MedicationStatus {
        Active => "active",
        Completed => "completed",
        Discontinued => "discontinued",
    }
}

string_enum! {
    pub enum ReactionSeverity {
        Mild => "mild",
        Moderate => "moderate",
        Severe => "severe",
        LifeThreatening => "life-threatening",
    }
}

string_enum! {
    pub enum ReactionOutcome {
        Recovered => "recovered",
        Recovering => "recovering",
        Ongoing => "ongoing",
        Fatal => "fatal",
    }
}

/// A medication a pet is taking or has taken.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetMedication {
    pub id: String,
    pub pet_id: String,
    pub name: String,
    pub brand_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub route: Route,
    pub start_date: String,
    pub end_date: Option<String>,
    pub prescribed_by: Option<String>,
    pub reason: Option<String>,
    pub instructions: Option<String>,
    pub status: MedicationStatus,
    pub created_at: String,
}

impl PetMedication {
    /// Create an active oral medication starting now.
    pub fn new(pet_id: String, name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id,
            name,
            brand_name: None,
            dosage: None,
            frequency: None,
            route: Route::Oral,
            start_date: now.clone(),
            end_date: None,
            prescribed_by: None,
            reason: None,
            instructions: None,
            status: MedicationStatus::Active,
            created_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MedicationStatus::Active
    }

    /// Drop optional text fields that are blank.
    pub fn clear_blank_fields(&mut self) {
        for field in [
            &mut self.brand_name,
            &mut self.dosage,
            &mut self.frequency,
            &mut self.end_date,
            &mut self.prescribed_by,
            &mut self.reason,
            &mut self.instructions,
        ] {
            if field.as_ref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
    }

    /// Mark discontinued as of now.
    pub fn discontinue(&mut self) {
        self.status = MedicationStatus::Discontinued;
        self.end_date = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Changes allowed on an existing medication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicationUpdate {
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub end_date: Option<String>,
    pub instructions: Option<String>,
    pub status: Option<MedicationStatus>,
}

impl MedicationUpdate {
    /// Apply the set fields; others are left untouched.
    pub fn apply(&self, medication: &mut PetMedication) {
        if let Some(dosage) = &self.dosage {
            medication.dosage = Some(dosage.clone());
        }
        if let Some(frequency) = &self.frequency {
            medication.frequency = Some(frequency.clone());
        }
        if let Some(end_date) = &self.end_date {
            medication.end_date = Some(end_date.clone());
        }
        if let Some(instructions) = &self.instructions {
            medication.instructions = Some(instructions.clone());
        }
        if let Some(status) = self.status {
            medication.status = status;
        }
    }
}

/// A recorded adverse reaction to a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdverseReaction {
    pub id: String,
    pub pet_id: String,
    pub medication: String,
    /// When the reaction occurred (RFC 3339)
    pub date: String,
    pub severity: ReactionSeverity,
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub treatment: Option<String>,
    pub outcome: ReactionOutcome,
    pub reported_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl AdverseReaction {
    pub fn new(
        pet_id: String,
        medication: String,
        date: String,
        severity: ReactionSeverity,
        symptoms: Vec<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id,
            medication,
            date,
            severity,
            symptoms,
            duration: None,
            treatment: None,
            outcome: ReactionOutcome::Recovered,
            reported_by: None,
            notes: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Changes allowed on an existing adverse reaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReactionUpdate {
    pub severity: Option<ReactionSeverity>,
    pub symptoms: Option<Vec<String>>,
    pub duration: Option<String>,
    pub treatment: Option<String>,
    pub outcome: Option<ReactionOutcome>,
    pub notes: Option<String>,
}

impl ReactionUpdate {
    pub fn apply(&self, reaction: &mut AdverseReaction) {
        if let Some(severity) = self.severity {
            reaction.severity = severity;
        }
        if let Some(symptoms) = &self.symptoms {
            reaction.symptoms = symptoms.clone();
        }
        if let Some(duration) = &self.duration {
            reaction.duration = Some(duration.clone());
        }
        if let Some(treatment) = &self.treatment {
            reaction.treatment = Some(treatment.clone());
        }
        if let Some(outcome) = self.outcome {
            reaction.outcome = outcome;
        }
        if let Some(notes) = &self.notes {
            reaction.notes = Some(notes.clone());
        }
    }
}
