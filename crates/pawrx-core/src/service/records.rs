//! Pet, medication, adverse reaction and appointment records.

use super::{Caller, SafetyService, ServiceError, ServiceResult};
use crate::db::DbError;
use crate::models::{
    AdverseReaction, Appointment, AppointmentStatus, MedicationUpdate, Pet, PetMedication,
    ReactionUpdate,
};
use crate::notify::{dispatch, Notification, ReactionAlert};

fn require_text(value: &str, what: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} is required", what)));
    }
    Ok(())
}

impl SafetyService<'_> {
    // =========================================================================
    // Pets
    // =========================================================================

    /// Register a pet owned by the caller.
    pub fn create_pet(&self, caller: &Caller, mut pet: Pet) -> ServiceResult<Pet> {
        pet.owner_id = caller.user_id.clone();
        pet.name = pet.name.trim().to_string();
        pet.validate()?;
        self.db.insert_pet(&pet)?;
        tracing::info!(
            pet_id = %pet.id,
            owner_id = %pet.owner_id,
            species = %pet.species,
            "Pet created"
        );
        Ok(pet)
    }

    pub fn get_pet(&self, caller: &Caller, pet_id: &str) -> ServiceResult<Pet> {
        self.authorized_pet(caller, pet_id)
    }

    /// Pets owned by the caller, by name.
    pub fn list_pets(&self, caller: &Caller) -> ServiceResult<Vec<Pet>> {
        Ok(self.db.list_pets_for_owner(&caller.user_id)?)
    }

    /// Replace a pet's details. Ownership and creation time are kept.
    pub fn update_pet(&self, caller: &Caller, mut pet: Pet) -> ServiceResult<Pet> {
        let existing = self.authorized_pet(caller, &pet.id)?;
        pet.owner_id = existing.owner_id;
        pet.created_at = existing.created_at;
        pet.name = pet.name.trim().to_string();
        pet.validate()?;
        pet.touch();

        if !self.db.update_pet(&pet)? {
            return Err(ServiceError::NotFound(format!("pet {}", pet.id)));
        }
        Ok(pet)
    }

    /// Delete a pet and everything recorded for it.
    pub fn delete_pet(&self, caller: &Caller, pet_id: &str) -> ServiceResult<()> {
        let pet = self.authorized_pet(caller, pet_id)?;
        self.db.delete_pet(&pet.id)?;
        tracing::info!(pet_id = %pet.id, user_id = %caller.user_id, "Pet deleted");
        Ok(())
    }

    // =========================================================================
    // Medications
    // =========================================================================

    fn authorized_medication(&self, caller: &Caller, id: &str) -> ServiceResult<PetMedication> {
        let med = self
            .db
            .get_medication(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("medication {}", id)))?;
        self.authorized_pet(caller, &med.pet_id)?;
        Ok(med)
    }

    /// Add a medication to a pet. Blank optional fields are dropped.
    pub fn add_medication(
        &self,
        caller: &Caller,
        pet_id: &str,
        mut medication: PetMedication,
    ) -> ServiceResult<PetMedication> {
        require_text(&medication.name, "Medication name")?;
        let pet = self.authorized_pet(caller, pet_id)?;

        medication.pet_id = pet.id;
        medication.name = medication.name.trim().to_string();
        medication.clear_blank_fields();
        self.db.insert_medication(&medication)?;

        tracing::info!(
            pet_id = %medication.pet_id,
            medication = %medication.name,
            "Medication added"
        );
        Ok(medication)
    }

    /// Change the editable fields of a medication.
    pub fn update_medication(
        &self,
        caller: &Caller,
        medication_id: &str,
        update: &MedicationUpdate,
    ) -> ServiceResult<PetMedication> {
        let mut med = self.authorized_medication(caller, medication_id)?;
        update.apply(&mut med);
        med.clear_blank_fields();
        self.db.update_medication(&med)?;
        Ok(med)
    }

    /// Stop a medication, moving it to the pet's history.
    pub fn discontinue_medication(
        &self,
        caller: &Caller,
        medication_id: &str,
    ) -> ServiceResult<PetMedication> {
        let mut med = self.authorized_medication(caller, medication_id)?;
        med.discontinue();
        self.db.update_medication(&med)?;
        tracing::info!(pet_id = %med.pet_id, medication = %med.name, "Medication discontinued");
        Ok(med)
    }

    pub fn current_medications(
        &self,
        caller: &Caller,
        pet_id: &str,
    ) -> ServiceResult<Vec<PetMedication>> {
        let pet = self.authorized_pet(caller, pet_id)?;
        Ok(self.db.list_active_medications(&pet.id)?)
    }

    /// Completed and discontinued medications, most recently ended first.
    pub fn medication_history(
        &self,
        caller: &Caller,
        pet_id: &str,
    ) -> ServiceResult<Vec<PetMedication>> {
        let pet = self.authorized_pet(caller, pet_id)?;
        Ok(self.db.list_medication_history(&pet.id)?)
    }

    // =========================================================================
    // Adverse reactions
    // =========================================================================

    /// Record a reaction reported by the caller and notify the owner.
    pub fn record_reaction(
        &self,
        caller: &Caller,
        pet_id: &str,
        mut reaction: AdverseReaction,
    ) -> ServiceResult<AdverseReaction> {
        require_text(&reaction.medication, "Medication")?;
        require_text(&reaction.date, "Reaction date")?;
        let pet = self.authorized_pet(caller, pet_id)?;

        reaction.pet_id = pet.id.clone();
        reaction.medication = reaction.medication.trim().to_string();
        reaction.reported_by = Some(caller.name.clone());
        reaction.symptoms.retain(|s| !s.trim().is_empty());
        self.db.insert_reaction(&reaction)?;

        tracing::info!(
            pet_id = %pet.id,
            medication = %reaction.medication,
            severity = %reaction.severity,
            "Adverse reaction recorded"
        );

        dispatch(
            self.notifier,
            &Notification::AdverseReaction(ReactionAlert {
                owner_id: pet.owner_id,
                pet_id: pet.id,
                pet_name: pet.name,
                medication: reaction.medication.clone(),
                severity: reaction.severity,
                symptoms: reaction.symptoms.clone(),
            }),
        );
        Ok(reaction)
    }

    /// Reactions for a pet, newest first.
    pub fn list_reactions(
        &self,
        caller: &Caller,
        pet_id: &str,
    ) -> ServiceResult<Vec<AdverseReaction>> {
        let pet = self.authorized_pet(caller, pet_id)?;
        Ok(self.db.list_reactions(&pet.id)?)
    }

    pub fn update_reaction(
        &self,
        caller: &Caller,
        reaction_id: &str,
        update: &ReactionUpdate,
    ) -> ServiceResult<AdverseReaction> {
        let mut reaction = self
            .db
            .get_reaction(reaction_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("reaction {}", reaction_id)))?;
        self.authorized_pet(caller, &reaction.pet_id)?;

        update.apply(&mut reaction);
        reaction.symptoms.retain(|s| !s.trim().is_empty());
        self.db.update_reaction(&reaction)?;
        Ok(reaction)
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    pub fn add_appointment(
        &self,
        caller: &Caller,
        pet_id: &str,
        mut appointment: Appointment,
    ) -> ServiceResult<Appointment> {
        require_text(&appointment.date, "Appointment date")?;
        let pet = self.authorized_pet(caller, pet_id)?;

        appointment.pet_id = pet.id;
        self.db.insert_appointment(&appointment)?;
        Ok(appointment)
    }

    /// Appointments for a pet, soonest first.
    pub fn list_appointments(
        &self,
        caller: &Caller,
        pet_id: &str,
    ) -> ServiceResult<Vec<Appointment>> {
        let pet = self.authorized_pet(caller, pet_id)?;
        Ok(self.db.list_appointments(&pet.id)?)
    }

    pub fn update_appointment_status(
        &self,
        caller: &Caller,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> ServiceResult<Appointment> {
        let mut appointment = self
            .db
            .get_appointment(appointment_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("appointment {}", appointment_id)))?;
        self.authorized_pet(caller, &appointment.pet_id)?;

        if !self.db.set_appointment_status(&appointment.id, status)? {
            return Err(DbError::NotFound(format!("appointment {}", appointment.id)).into());
        }
        appointment.status = status;
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::engine::InteractionEngine;
    use crate::models::{
        AppointmentType, MedicationStatus, ReactionOutcome, ReactionSeverity, Species,
    };
    use crate::notify::{MemoryNotifier, NotificationGateway, NotifyError, NotifyResult};
    use std::sync::Arc;

    struct DownNotifier;

    impl NotificationGateway for DownNotifier {
        fn send(&self, _notification: &Notification) -> NotifyResult<()> {
            Err(NotifyError::Delivery("push token expired".into()))
        }
    }

    fn owner() -> Caller {
        Caller::owner("owner-1", "Sam")
    }

    fn with_service<F: FnOnce(&SafetyService<'_>, &MemoryNotifier)>(f: F) {
        let db = Database::open_in_memory().unwrap();
        let notifier = MemoryNotifier::new();
        let engine = Arc::new(InteractionEngine::builtin().unwrap());
        let service = SafetyService::new(&db, engine, &notifier);
        f(&service, &notifier);
    }

    fn new_pet(service: &SafetyService<'_>) -> Pet {
        service
            .create_pet(&owner(), Pet::new(String::new(), " Luna ".into(), Species::Cat))
            .unwrap()
    }

    #[test]
    fn test_pet_lifecycle() {
        with_service(|service, _| {
            let pet = new_pet(service);
            assert_eq!(pet.owner_id, "owner-1");
            assert_eq!(pet.name, "Luna");

            let mut changed = pet.clone();
            changed.weight = 4.5;
            changed.owner_id = "someone-else".into();
            let updated = service.update_pet(&owner(), changed).unwrap();
            assert_eq!(updated.owner_id, "owner-1");
            assert_eq!(service.get_pet(&owner(), &pet.id).unwrap().weight, 4.5);

            assert_eq!(service.list_pets(&owner()).unwrap().len(), 1);
            assert!(service.list_pets(&Caller::owner("owner-2", "Alex")).unwrap().is_empty());

            service.delete_pet(&owner(), &pet.id).unwrap();
            assert_eq!(
                service.get_pet(&owner(), &pet.id).unwrap_err().status_code(),
                404
            );
        });
    }

    #[test]
    fn test_invalid_pet_rejected() {
        with_service(|service, _| {
            let result =
                service.create_pet(&owner(), Pet::new(String::new(), "  ".into(), Species::Dog));
            assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        });
    }

    #[test]
    fn test_medication_lifecycle() {
        with_service(|service, _| {
            let pet = new_pet(service);

            let mut med = PetMedication::new(String::new(), " Methimazole ".into());
            med.dosage = Some("2.5mg".into());
            med.reason = Some("   ".into());
            let med = service.add_medication(&owner(), &pet.id, med).unwrap();
            assert_eq!(med.pet_id, pet.id);
            assert_eq!(med.name, "Methimazole");
            assert!(med.reason.is_none());

            let update = MedicationUpdate {
                dosage: Some("5mg".into()),
                ..Default::default()
            };
            let med = service.update_medication(&owner(), &med.id, &update).unwrap();
            assert_eq!(med.dosage.as_deref(), Some("5mg"));

            assert_eq!(service.current_medications(&owner(), &pet.id).unwrap().len(), 1);

            let stopped = service.discontinue_medication(&owner(), &med.id).unwrap();
            assert_eq!(stopped.status, MedicationStatus::Discontinued);
            assert!(stopped.end_date.is_some());

            assert!(service.current_medications(&owner(), &pet.id).unwrap().is_empty());
            assert_eq!(service.medication_history(&owner(), &pet.id).unwrap().len(), 1);
        });
    }

    #[test]
    fn test_medication_requires_name_and_access() {
        with_service(|service, _| {
            let pet = new_pet(service);

            let blank = service.add_medication(
                &owner(),
                &pet.id,
                PetMedication::new(String::new(), " ".into()),
            );
            assert!(matches!(blank, Err(ServiceError::InvalidInput(_))));

            let med = service
                .add_medication(
                    &owner(),
                    &pet.id,
                    PetMedication::new(String::new(), "Gabapentin".into()),
                )
                .unwrap();
            let stranger = Caller::owner("owner-2", "Alex");
            assert!(matches!(
                service.discontinue_medication(&stranger, &med.id),
                Err(ServiceError::Forbidden(_))
            ));
            assert!(matches!(
                service.discontinue_medication(&owner(), "missing"),
                Err(ServiceError::NotFound(_))
            ));
        });
    }

    #[test]
    fn test_reaction_records_reporter_and_notifies() {
        with_service(|service, notifier| {
            let pet = new_pet(service);
            let reaction = AdverseReaction::new(
                String::new(),
                "Methimazole".into(),
                "2024-03-01T08:00:00+00:00".into(),
                ReactionSeverity::Moderate,
                vec!["vomiting".into(), " ".into()],
            );

            let vet = Caller::vet("vet-1", "Dr. Reyes");
            let saved = service.record_reaction(&vet, &pet.id, reaction).unwrap();
            assert_eq!(saved.reported_by.as_deref(), Some("Dr. Reyes"));
            assert_eq!(saved.symptoms, vec!["vomiting"]);
            assert_eq!(saved.outcome, ReactionOutcome::Recovered);

            let sent = notifier.sent();
            assert_eq!(sent.len(), 1);
            assert!(matches!(
                &sent[0],
                Notification::AdverseReaction(a) if a.owner_id == "owner-1"
            ));

            let update = ReactionUpdate {
                outcome: Some(ReactionOutcome::Ongoing),
                ..Default::default()
            };
            let updated = service.update_reaction(&owner(), &saved.id, &update).unwrap();
            assert_eq!(updated.outcome, ReactionOutcome::Ongoing);
            assert_eq!(service.list_reactions(&owner(), &pet.id).unwrap(), vec![updated]);
        });
    }

    #[test]
    fn test_appointment_status() {
        with_service(|service, _| {
            let pet = new_pet(service);
            let appt = service
                .add_appointment(
                    &owner(),
                    &pet.id,
                    Appointment::new(
                        String::new(),
                        AppointmentType::Vaccination,
                        "2024-05-01".into(),
                    ),
                )
                .unwrap();

            let done = service
                .update_appointment_status(&owner(), &appt.id, AppointmentStatus::Completed)
                .unwrap();
            assert!(!done.is_upcoming());

            let listed = service.list_appointments(&owner(), &pet.id).unwrap();
            assert_eq!(listed[0].status, AppointmentStatus::Completed);
        });
    }

    #[test]
    fn test_reaction_saved_when_notification_fails() {
        let db = Database::open_in_memory().unwrap();
        let engine = Arc::new(InteractionEngine::builtin().unwrap());
        let service = SafetyService::new(&db, engine, &DownNotifier);
        let pet = new_pet(&service);

        let reaction = AdverseReaction::new(
            String::new(),
            "Methimazole".into(),
            "2024-03-01T08:00:00+00:00".into(),
            ReactionSeverity::Severe,
            vec!["facial pruritus".into()],
        );
        let saved = service.record_reaction(&owner(), &pet.id, reaction).unwrap();

        assert_eq!(service.list_reactions(&owner(), &pet.id).unwrap(), vec![saved]);
    }
}
