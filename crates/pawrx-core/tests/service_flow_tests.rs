//! End-to-end flows through the FFI facade.

use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use pawrx_ai::{
    AiAnalysis, AnalysisError, AnalysisGateway, AnalysisRequest, AnalysisResult, MockAnalyzer,
};
use pawrx_core::notify::{MemoryNotifier, Notification};
use pawrx_core::{
    open_pawrx, open_pawrx_in_memory, Database, FfiAppointment, FfiCaller, FfiMedication,
    FfiMedicationUpdate, FfiPet, FfiReaction, FfiReactionUpdate, InteractionEngine, PawrxCore,
    PawrxError,
};

fn owner() -> FfiCaller {
    FfiCaller {
        user_id: "owner-1".into(),
        name: "Sam".into(),
        is_vet: false,
    }
}

fn stranger() -> FfiCaller {
    FfiCaller {
        user_id: "owner-2".into(),
        name: "Alex".into(),
        is_vet: false,
    }
}

fn vet() -> FfiCaller {
    FfiCaller {
        user_id: "vet-1".into(),
        name: "Dr. Reyes".into(),
        is_vet: true,
    }
}

fn make_pet(name: &str, species: &str) -> FfiPet {
    FfiPet {
        id: String::new(),
        owner_id: String::new(),
        name: name.into(),
        species: species.into(),
        breed: Some("Labrador".into()),
        weight: 30.0,
        weight_unit: "kg".into(),
        age: 9.0,
        age_unit: "years".into(),
        sex: "male".into(),
        neutered: true,
        allergies: vec![],
        chronic_conditions: vec!["osteoarthritis".into()],
        microchip_id: None,
    }
}

fn make_medication(name: &str) -> FfiMedication {
    FfiMedication {
        id: String::new(),
        pet_id: String::new(),
        name: name.into(),
        brand_name: None,
        dosage: Some("75mg".into()),
        frequency: Some("twice daily".into()),
        route: String::new(),
        start_date: None,
        end_date: None,
        prescribed_by: None,
        reason: Some(String::new()),
        instructions: None,
        status: String::new(),
    }
}

#[test]
fn test_owner_checks_pet_medications() {
    let core = open_pawrx_in_memory().unwrap();
    let pet = core.create_pet(owner(), make_pet("Max", "dog")).unwrap();
    assert_eq!(pet.owner_id, "owner-1");

    let med = core
        .add_medication(owner(), pet.id.clone(), make_medication("Carprofen"))
        .unwrap();
    assert_eq!(med.route, "oral");
    assert_eq!(med.status, "active");
    assert!(med.reason.is_none());

    let report = core
        .check_pet_medications(owner(), pet.id.clone(), vec!["Aspirin".into()])
        .unwrap();
    assert_eq!(report.overall_risk_level, "high");
    assert_eq!(report.interaction_count, 1);
    assert!(report.alert_sent);

    let json: serde_json::Value = serde_json::from_str(&report.report_json).unwrap();
    assert_eq!(json["petName"], "Max");
    assert_eq!(json["medicationsChecked"][0], "Carprofen");

    let history: serde_json::Value =
        serde_json::from_str(&core.check_history_json(owner(), pet.id.clone(), 10).unwrap())
            .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], report.check_id.unwrap().as_str());
}

#[test]
fn test_access_rules() {
    let core = open_pawrx_in_memory().unwrap();
    let pet = core.create_pet(owner(), make_pet("Max", "dog")).unwrap();

    let denied = core.check_interactions(stranger(), pet.id.clone(), vec!["Carprofen".into()]);
    assert!(matches!(denied, Err(PawrxError::Forbidden(_))));

    let missing = core.check_interactions(owner(), "no-such-pet".into(), vec!["Carprofen".into()]);
    assert!(matches!(missing, Err(PawrxError::NotFound(_))));

    let invalid = core.check_interactions(owner(), pet.id.clone(), vec![]);
    assert!(matches!(invalid, Err(PawrxError::InvalidInput(_))));

    let as_vet = core.check_interactions(vet(), pet.id.clone(), vec!["Carprofen".into()]);
    assert!(as_vet.is_ok());

    assert!(core.list_pets(stranger()).unwrap().is_empty());
}

#[test]
fn test_invalid_enum_values_rejected() {
    let core = open_pawrx_in_memory().unwrap();

    let result = core.create_pet(owner(), make_pet("Nibbles", "dragon"));
    assert!(matches!(result, Err(PawrxError::InvalidInput(_))));

    let pet = core.create_pet(owner(), make_pet("Nibbles", "Guinea Pig")).unwrap();
    assert_eq!(pet.species, "guinea pig");

    let mut med = make_medication("Amoxicillin");
    med.route = "teleport".into();
    let result = core.add_medication(owner(), pet.id, med);
    assert!(matches!(result, Err(PawrxError::InvalidInput(_))));
}

#[test]
fn test_medication_history_and_reactions() {
    let core = open_pawrx_in_memory().unwrap();
    let pet = core.create_pet(owner(), make_pet("Luna", "cat")).unwrap();
    let med = core
        .add_medication(owner(), pet.id.clone(), make_medication("Methimazole"))
        .unwrap();

    core.discontinue_medication(owner(), med.id.clone()).unwrap();
    assert!(core.current_medications(owner(), pet.id.clone()).unwrap().is_empty());
    let history = core.medication_history(owner(), pet.id.clone()).unwrap();
    assert_eq!(history[0].status, "discontinued");

    let reaction = FfiReaction {
        id: String::new(),
        medication: "Methimazole".into(),
        date: "2024-03-01T08:00:00+00:00".into(),
        severity: "life-threatening".into(),
        symptoms: vec!["facial pruritus".into()],
        duration: None,
        treatment: Some("Stopped medication".into()),
        outcome: String::new(),
        reported_by: None,
        notes: None,
    };
    let saved = core.record_reaction(vet(), pet.id.clone(), reaction).unwrap();
    assert_eq!(saved.reported_by.as_deref(), Some("Dr. Reyes"));
    assert_eq!(saved.outcome, "recovered");
    assert_eq!(core.list_reactions(owner(), pet.id).unwrap().len(), 1);
}

#[test]
fn test_appointments() {
    let core = open_pawrx_in_memory().unwrap();
    let pet = core.create_pet(owner(), make_pet("Max", "dog")).unwrap();

    let appt = core
        .add_appointment(
            owner(),
            pet.id.clone(),
            FfiAppointment {
                id: String::new(),
                kind: "check-up".into(),
                title: Some("Annual exam".into()),
                date: "2024-06-01".into(),
                time: Some("10:30".into()),
                veterinarian: None,
                clinic: None,
                notes: None,
                status: String::new(),
                reminder_days_before: Some(2),
            },
        )
        .unwrap();
    assert_eq!(appt.status, "scheduled");

    let updated = core
        .update_appointment_status(owner(), appt.id.clone(), "cancelled".into())
        .unwrap();
    assert_eq!(updated.status, "cancelled");

    let bad = core.update_appointment_status(owner(), appt.id, "postponed".into());
    assert!(matches!(bad, Err(PawrxError::InvalidInput(_))));
}

#[test]
fn test_catalog_and_ai_fallback() {
    let core = open_pawrx_in_memory().unwrap();
    assert!(!core.search_medications("rima".into(), Some("dog".into())).unwrap().is_empty());
    assert!(core.search_medications("rimadyl".into(), Some("unicorn".into())).is_err());
    assert_eq!(core.common_doses("Deramaxx".into()), vec!["12mg", "25mg", "75mg"]);

    let pet = core.create_pet(owner(), make_pet("Max", "dog")).unwrap();
    core.add_medication(owner(), pet.id.clone(), make_medication("Carprofen"))
        .unwrap();

    // No AI service configured
    let outcome: serde_json::Value =
        serde_json::from_str(&core.analyze_medications_json(owner(), pet.id, None).unwrap())
            .unwrap();
    assert_eq!(outcome["degraded"], true);
    assert_eq!(outcome["riskLevel"], "unknown");
}

#[test]
fn test_reload_reference_swaps_engine() {
    let core = open_pawrx_in_memory().unwrap();
    let pet = core.create_pet(owner(), make_pet("Max", "dog")).unwrap();

    let reference = r#"{
        "drug_interactions": [{
            "drug1": "Gabapentin", "drug2": "Omeprazole", "species": ["all"],
            "severity": "moderate", "riskLevel": "medium", "mechanism": "Test",
            "clinicalEffects": ["Drowsiness"], "management": "Monitor",
            "alternatives": []
        }],
        "toxic_medications": {}
    }"#;
    let catalog = r#"{"dog": [], "cat": [], "all": []}"#;
    core.reload_reference(reference.into(), catalog.into()).unwrap();

    let report = core
        .check_interactions(owner(), pet.id, vec!["Gabapentin".into(), "Omeprazole".into()])
        .unwrap();
    assert_eq!(report.overall_risk_level, "medium");

    let broken = core.reload_reference("{".into(), catalog.into());
    assert!(matches!(broken, Err(PawrxError::ReferenceError(_))));
}

#[test]
fn test_alerts_reach_custom_gateway() {
    let notifier = Arc::new(MemoryNotifier::new());
    let core = PawrxCore::new(
        Database::open_in_memory().unwrap(),
        InteractionEngine::builtin().unwrap(),
        notifier.clone(),
        None,
        false,
    );
    let pet = core.create_pet(owner(), make_pet("Luna", "cat")).unwrap();

    let report = core
        .check_interactions(owner(), pet.id, vec!["Tylenol".into()])
        .unwrap();
    assert_eq!(report.overall_risk_level, "critical");
    assert!(report.check_id.is_none());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(
        &sent[0],
        Notification::Interaction(alert) if alert.subjects == vec!["Tylenol"]
    ));
}

#[test]
fn test_database_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pawrx.db").to_string_lossy().to_string();

    let pet_id = {
        let core = open_pawrx(path.clone()).unwrap();
        core.create_pet(owner(), make_pet("Max", "dog")).unwrap().id
    };

    let core = open_pawrx(path).unwrap();
    assert_eq!(core.get_pet(owner(), pet_id).unwrap().name, "Max");
}

/// Analyzer that holds each request open until the test releases it.
struct GatedAnalyzer {
    started: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl AnalysisGateway for GatedAnalyzer {
    fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult<AiAnalysis> {
        self.started.lock().unwrap().send(()).unwrap();
        match self.release.lock().unwrap().recv_timeout(Duration::from_secs(5)) {
            Ok(()) => MockAnalyzer::low_risk().analyze(request),
            Err(_) => Err(AnalysisError::Timeout(5)),
        }
    }
}

#[test]
fn test_checks_run_while_analysis_in_flight() {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let analyzer = GatedAnalyzer {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    };
    let core = Arc::new(PawrxCore::new(
        Database::open_in_memory().unwrap(),
        InteractionEngine::builtin().unwrap(),
        Arc::new(MemoryNotifier::new()),
        Some(Box::new(analyzer)),
        true,
    ));
    let pet = core.create_pet(owner(), make_pet("Max", "dog")).unwrap();
    core.add_medication(owner(), pet.id.clone(), make_medication("Carprofen"))
        .unwrap();

    let analysis = {
        let core = Arc::clone(&core);
        let pet_id = pet.id.clone();
        thread::spawn(move || core.analyze_medications_json(owner(), pet_id, None))
    };
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    // The analysis is now blocked inside the gateway
    let report = core
        .check_interactions(owner(), pet.id.clone(), vec!["Rimadyl".into(), "Aspirin".into()])
        .unwrap();
    assert_eq!(report.overall_risk_level, "high");
    release_tx.send(()).unwrap();

    let outcome: serde_json::Value =
        serde_json::from_str(&analysis.join().unwrap().unwrap()).unwrap();
    assert_eq!(outcome["degraded"], false);
}

#[test]
fn test_update_medication_and_reaction() {
    let core = open_pawrx_in_memory().unwrap();
    let pet = core.create_pet(owner(), make_pet("Luna", "cat")).unwrap();
    let med = core
        .add_medication(owner(), pet.id.clone(), make_medication("Methimazole"))
        .unwrap();

    let updated = core
        .update_medication(
            owner(),
            med.id.clone(),
            FfiMedicationUpdate {
                dosage: Some("5mg".into()),
                status: Some("completed".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.dosage.as_deref(), Some("5mg"));
    assert_eq!(updated.frequency.as_deref(), Some("twice daily"));
    assert_eq!(updated.status, "completed");

    let bad_status = core.update_medication(
        owner(),
        med.id,
        FfiMedicationUpdate {
            status: Some("paused".into()),
            ..Default::default()
        },
    );
    assert!(matches!(bad_status, Err(PawrxError::InvalidInput(_))));

    let reaction = core
        .record_reaction(
            owner(),
            pet.id.clone(),
            FfiReaction {
                id: String::new(),
                medication: "Methimazole".into(),
                date: "2024-03-01T08:00:00+00:00".into(),
                severity: "mild".into(),
                symptoms: vec!["vomiting".into()],
                duration: None,
                treatment: None,
                outcome: String::new(),
                reported_by: None,
                notes: None,
            },
        )
        .unwrap();

    let changed = core
        .update_reaction(
            owner(),
            reaction.id.clone(),
            FfiReactionUpdate {
                severity: Some("severe".into()),
                outcome: Some("ongoing".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(changed.severity, "severe");
    assert_eq!(changed.outcome, "ongoing");
    assert_eq!(changed.symptoms, vec!["vomiting"]);

    let denied = core.update_reaction(stranger(), reaction.id, FfiReactionUpdate::default());
    assert!(matches!(denied, Err(PawrxError::Forbidden(_))));
}
