//! Risk aggregation and recommendation generation.

use crate::models::{
    DrugInteraction, Recommendation, RecommendationType, RecommendedAction, RiskLevel, Species,
    ToxicMedication,
};

/// Active medication count above which a polypharmacy note is added.
pub const POLYPHARMACY_THRESHOLD: usize = 4;

/// Overall risk for a check. First rule wins:
/// any toxic medication is critical, then any high or critical interaction
/// is high, then any medium interaction is medium, otherwise low.
pub fn aggregate_risk(interactions: &[DrugInteraction], toxic: &[ToxicMedication]) -> RiskLevel {
    if !toxic.is_empty() {
        RiskLevel::Critical
    } else if interactions.iter().any(|i| i.risk_level.is_alerting()) {
        RiskLevel::High
    } else if interactions.iter().any(|i| i.risk_level == RiskLevel::Medium) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn recommendation(
    kind: RecommendationType,
    message: String,
    action: RecommendedAction,
) -> Recommendation {
    Recommendation {
        kind,
        message,
        action,
    }
}

fn toxicity_message(toxic: &ToxicMedication, species: Species) -> String {
    format!(
        "DANGER: {} is {} toxic to {}. {}. Discontinue immediately and contact your veterinarian.",
        toxic.medication,
        toxic.toxic_data.toxicity_level,
        species.plural(),
        toxic.toxic_data.reason.trim().trim_end_matches('.'),
    )
}

/// Build the ordered recommendation list.
///
/// Order: one entry per toxic medication, aggregate entries for critical,
/// high and medium interactions, per-interaction monitoring and alternative
/// notes, a polypharmacy note, and finally the all-clear entry when nothing
/// was matched.
pub fn build_recommendations(
    interactions: &[DrugInteraction],
    toxic: &[ToxicMedication],
    species: Species,
    active_medication_count: usize,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for med in toxic {
        recommendations.push(recommendation(
            RecommendationType::Critical,
            toxicity_message(med, species),
            RecommendedAction::ImmediateVetContact,
        ));
    }

    let count = |level: RiskLevel| interactions.iter().filter(|i| i.risk_level == level).count();

    let critical = count(RiskLevel::Critical);
    if critical > 0 {
        recommendations.push(recommendation(
            RecommendationType::Critical,
            format!(
                "CRITICAL: {} life-threatening drug interaction(s) detected. Contact veterinarian immediately.",
                critical
            ),
            RecommendedAction::EmergencyVetContact,
        ));
    }

    let high = count(RiskLevel::High);
    if high > 0 {
        recommendations.push(recommendation(
            RecommendationType::High,
            format!(
                "HIGH RISK: {} serious drug interaction(s) detected. Veterinary consultation required before continuing.",
                high
            ),
            RecommendedAction::UrgentVetConsultation,
        ));
    }

    let medium = count(RiskLevel::Medium);
    if medium > 0 {
        recommendations.push(recommendation(
            RecommendationType::Medium,
            format!(
                "CAUTION: {} moderate drug interaction(s) detected. Enhanced monitoring recommended.",
                medium
            ),
            RecommendedAction::IncreasedMonitoring,
        ));
    }

    for interaction in interactions {
        if !interaction.clinical_effects.is_empty() {
            recommendations.push(recommendation(
                RecommendationType::Monitoring,
                format!(
                    "Monitor for: {} when using {} with {}",
                    interaction.clinical_effects.join(", "),
                    interaction.drug1,
                    interaction.drug2
                ),
                RecommendedAction::CloseMonitoring,
            ));
        }
        if !interaction.alternatives.is_empty() {
            recommendations.push(recommendation(
                RecommendationType::Info,
                format!(
                    "Consider alternatives: {} instead of current combination",
                    interaction.alternatives.join(", ")
                ),
                RecommendedAction::ConsiderAlternatives,
            ));
        }
    }

    if active_medication_count > POLYPHARMACY_THRESHOLD {
        recommendations.push(recommendation(
            RecommendationType::Info,
            "Your pet is on multiple medications. Regular veterinary check-ups and blood work are recommended to monitor for side effects.".to_string(),
            RecommendedAction::RegularCheckups,
        ));
    }

    if toxic.is_empty() && interactions.is_empty() {
        recommendations.push(recommendation(
            RecommendationType::Low,
            "No dangerous interactions detected with the current medication combination."
                .to_string(),
            RecommendedAction::RoutineMonitoring,
        ));
    }

    recommendations
}
