//! Appointment models.

use serde::{Deserialize, Serialize};

string_enum! {
    pub enum AppointmentType {
        CheckUp => "check-up",
        Checkup => "checkup",
        Vaccination => "vaccination",
        Surgery => "surgery",
        Grooming => "grooming",
        Dental => "dental",
        Emergency => "emergency",
        Other => "other",
    }
}

string_enum! {
    pub enum AppointmentStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
        Rescheduled => "rescheduled",
    }
}

/// A scheduled visit for a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub pet_id: String,
    pub kind: AppointmentType,
    pub title: Option<String>,
    /// Appointment date (RFC 3339)
    pub date: String,
    pub time: Option<String>,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    /// Days before the appointment to remind the owner; None disables it
    pub reminder_days_before: Option<u32>,
    pub created_at: String,
}

impl Appointment {
    pub fn new(pet_id: String, kind: AppointmentType, date: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id,
            kind,
            title: None,
            date,
            time: None,
            veterinarian: None,
            clinic: None,
            notes: None,
            status: AppointmentStatus::Scheduled,
            reminder_days_before: Some(1),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the appointment still needs to happen.
    pub fn is_upcoming(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Scheduled | AppointmentStatus::Rescheduled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appointment() {
        let appt = Appointment::new(
            "pet-1".into(),
            AppointmentType::Vaccination,
            "2024-06-01T09:00:00Z".into(),
        );
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(appt.reminder_days_before, Some(1));
        assert!(appt.is_upcoming());
    }

    #[test]
    fn test_type_tags() {
        assert_eq!("check-up".parse::<AppointmentType>(), Ok(AppointmentType::CheckUp));
        assert_eq!("Dental".parse::<AppointmentType>(), Ok(AppointmentType::Dental));
        assert!("spa".parse::<AppointmentType>().is_err());
    }
}
