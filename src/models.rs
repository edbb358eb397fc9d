use serde::{Deserialize, Serialize};

/// Review state of a time log, owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: String,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub task_name: Option<String>,
    pub hours: f64,
    #[serde(default)]
    pub note: Option<String>,
    pub logged_at: String,
    pub approval_status: ApprovalStatus,
}

impl TimeLog {
    pub fn employee(&self) -> &str {
        self.employee_name.as_deref().unwrap_or("Unknown")
    }

    pub fn project(&self) -> &str {
        self.project_title.as_deref().unwrap_or("-")
    }

    pub fn task(&self) -> &str {
        self.task_name.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "In progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    pub service_type: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

/// Body for POST /appointments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub customer_id: String,
    pub vehicle_id: String,
    pub service_type: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Query parameters for GET /appointments. `None` fields are omitted so the
/// server returns the unfiltered set.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub status: Option<AppointmentStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_status_uses_uppercase_wire_names() {
        let json = r#"{
            "id": "tl-1",
            "employeeName": "Dana",
            "projectTitle": "Brake job",
            "taskName": "Pads",
            "hours": 1.5,
            "loggedAt": "2026-08-20T09:00:00Z",
            "approvalStatus": "PENDING"
        }"#;
        let log: TimeLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.approval_status, ApprovalStatus::Pending);
        assert_eq!(log.employee(), "Dana");
        assert!(log.note.is_none());
    }

    #[test]
    fn missing_display_fields_fall_back() {
        let json = r#"{
            "id": "tl-2",
            "hours": 0.25,
            "loggedAt": "2026-08-20T09:00:00Z",
            "approvalStatus": "REJECTED"
        }"#;
        let log: TimeLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.employee(), "Unknown");
        assert_eq!(log.project(), "-");
        assert_eq!(log.task(), "-");
    }

    #[test]
    fn appointment_status_round_trips_screaming_snake() {
        let status: AppointmentStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, AppointmentStatus::InProgress);
        assert_eq!(status.as_wire(), "IN_PROGRESS");
    }

    #[test]
    fn appointment_request_omits_empty_notes() {
        let request = AppointmentRequest {
            customer_id: "c-1".to_string(),
            vehicle_id: "v-1".to_string(),
            service_type: "Oil change".to_string(),
            start_time: "2026-08-21T08:00:00Z".to_string(),
            end_time: "2026-08-21T09:00:00Z".to_string(),
            notes: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("notes"));
        assert!(json.contains("\"customerId\":\"c-1\""));
    }
}
