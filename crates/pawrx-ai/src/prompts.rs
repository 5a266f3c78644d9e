//! Prompts for veterinary medication analysis.

use crate::analysis::{MedicationContext, PetContext};

/// System prompt for the analysis model.
pub const SYSTEM_PROMPT: &str =
    "You are a veterinary pharmacology expert providing medication safety analysis.";

/// Query used when the caller does not ask anything specific.
pub const DEFAULT_QUERY: &str = "Analyze these medications for potential risks and interactions";

/// One line per medication: `- name (brand): dosage, frequency, route`.
fn medication_lines(medications: &[MedicationContext]) -> String {
    medications
        .iter()
        .map(|med| {
            format!(
                "- {} ({}): {}, {}, {}",
                med.name,
                med.brand_name.as_deref().unwrap_or("generic"),
                med.dosage.as_deref().unwrap_or("dose not specified"),
                med.frequency.as_deref().unwrap_or("frequency not specified"),
                med.route.as_deref().unwrap_or("oral"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn medical_history_lines(pet: &PetContext) -> String {
    let mut lines = String::new();
    if let Some(history) = &pet.medical_history {
        if !history.allergies.is_empty() {
            lines.push_str(&format!("Allergies: {}\n", history.allergies.join(", ")));
        }
        if !history.chronic_conditions.is_empty() {
            lines.push_str(&format!(
                "Chronic Conditions: {}\n",
                history.chronic_conditions.join(", ")
            ));
        }
    }
    lines
}

/// User prompt for a full regimen analysis.
pub fn make_analysis_prompt(
    pet: &PetContext,
    medications: &[MedicationContext],
    query: Option<&str>,
) -> String {
    format!(
        r#"Analyze the following medication regimen for potential risks, interactions, and safety concerns.

Pet Information:
- Species: {species}
- Breed: {breed}
- Weight: {weight} {weight_unit}
- Age: {age} {age_unit}
{history}
Current Medications:
{medications}

Analysis Request: {query}

Provide a CONCISE analysis (maximum 3-4 sentences) that MATCHES the risk level you assign:
- Low: routine monitoring and standard precautions
- Medium: moderate concerns and increased monitoring
- High: significant safety concerns requiring close supervision
- Critical: immediate danger and need for emergency intervention

Format your response as JSON with this structure:
{{
    "analysis": "brief 3-4 sentence analysis",
    "riskLevel": "Low/Medium/High/Critical",
    "recommendations": ["max 3 short, actionable recommendations"],
    "alternatives": ["max 2 brief alternatives if needed"],
    "warnings": ["max 2 key warnings if needed"],
    "sources": ["max 3 relevant veterinary sources"]
}}"#,
        species = pet.species,
        breed = pet.breed.as_deref().unwrap_or("Not specified"),
        weight = pet.weight,
        weight_unit = pet.weight_unit,
        age = pet.age,
        age_unit = pet.age_unit,
        history = medical_history_lines(pet),
        medications = medication_lines(medications),
        query = query.unwrap_or(DEFAULT_QUERY),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MedicalHistory;

    fn pet() -> PetContext {
        PetContext {
            species: "dog".into(),
            breed: None,
            weight: 30.0,
            weight_unit: "kg".into(),
            age: 9.0,
            age_unit: "years".into(),
            medical_history: Some(MedicalHistory {
                allergies: vec![],
                chronic_conditions: vec!["osteoarthritis".into()],
            }),
        }
    }

    #[test]
    fn test_prompt_includes_pet_and_medications() {
        let meds = vec![MedicationContext {
            name: "Carprofen".into(),
            brand_name: Some("Rimadyl".into()),
            dosage: Some("75mg".into()),
            frequency: Some("twice daily".into()),
            route: None,
        }];

        let prompt = make_analysis_prompt(&pet(), &meds, None);

        assert!(prompt.contains("- Species: dog"));
        assert!(prompt.contains("- Breed: Not specified"));
        assert!(prompt.contains("Chronic Conditions: osteoarthritis"));
        assert!(!prompt.contains("Allergies:"));
        assert!(prompt.contains("- Carprofen (Rimadyl): 75mg, twice daily, oral"));
        assert!(prompt.contains(DEFAULT_QUERY));
        assert!(prompt.contains("\"riskLevel\""));
    }

    #[test]
    fn test_prompt_uses_custom_query() {
        let prompt = make_analysis_prompt(&pet(), &[], Some("Is this safe before surgery?"));
        assert!(prompt.contains("Analysis Request: Is this safe before surgery?"));
    }
}
