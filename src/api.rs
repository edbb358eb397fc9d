use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::models::{
    Appointment, AppointmentQuery, AppointmentRequest, AppointmentStatus, TimeLog,
};

#[derive(Debug, Clone)]
pub enum ApiError {
    Unauthorized,
    NotFound,
    RateLimited,
    ServerError(String),
    Api(String),
    Network(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Not authorized. Check your API token."),
            ApiError::NotFound => write!(f, "Not found on the server."),
            ApiError::RateLimited => write!(f, "Rate limited by the server."),
            ApiError::ServerError(message) => write!(f, "Server error: {message}"),
            ApiError::Api(message) => write!(f, "API error: {message}"),
            ApiError::Network(message) => write!(f, "Network error: {message}"),
        }
    }
}

/// Time-log review endpoints. The review board is generic over this trait so
/// tests can drive it with an in-memory double.
pub trait TimeLogApi {
    fn fetch_pending_time_logs(&self) -> Result<Vec<TimeLog>, ApiError>;
    fn approve_time_log(&self, id: &str) -> Result<(), ApiError>;
    fn reject_time_log(&self, id: &str, reason: &str) -> Result<(), ApiError>;
}

/// Appointment intake endpoints.
pub trait AppointmentApi {
    fn list_appointments(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, ApiError>;
    fn list_customer_appointments(&self, customer_id: &str) -> Result<Vec<Appointment>, ApiError>;
    fn create_appointment(&self, request: &AppointmentRequest) -> Result<Appointment, ApiError>;
    fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError>;
    fn reschedule_appointment(
        &self,
        id: &str,
        start: &str,
        end: &str,
    ) -> Result<Appointment, ApiError>;
    fn cancel_appointment(&self, id: &str, cancelled_by: Option<&str>) -> Result<(), ApiError>;
    fn check_availability(&self, start: &str, end: &str) -> Result<bool, ApiError>;
}

#[derive(Clone)]
pub struct ShopClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ShopClient {
    pub fn new(base_url: &str, token: String) -> Self {
        let client = Client::builder()
            .user_agent("wrenchdesk-tui")
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(params)
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let response = check_status(response)?;
        response
            .json::<T>()
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let response = check_status(response)?;
        response
            .json::<T>()
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    fn post_json_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        check_status(response)?;
        Ok(())
    }

    fn post_empty(&self, path: &str, params: &[(&str, &str)]) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .query(params)
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        check_status(response)?;
        Ok(())
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status == 401 || status == 403 {
        return Err(ApiError::Unauthorized);
    }
    if status == 404 {
        return Err(ApiError::NotFound);
    }
    if status == 429 {
        return Err(ApiError::RateLimited);
    }
    if status.is_server_error() {
        return Err(ApiError::ServerError(format!("shop API error: {status}")));
    }
    if !status.is_success() {
        return Err(ApiError::Api(format!("shop API error: {status}")));
    }
    Ok(response)
}

impl TimeLogApi for ShopClient {
    fn fetch_pending_time_logs(&self) -> Result<Vec<TimeLog>, ApiError> {
        self.get("/time-logs", &[("status", "PENDING")])
    }

    fn approve_time_log(&self, id: &str) -> Result<(), ApiError> {
        self.post_empty(&format!("/time-logs/{id}/approve"), &[])
    }

    fn reject_time_log(&self, id: &str, reason: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct RejectBody<'a> {
            reason: &'a str,
        }
        self.post_json_empty(&format!("/time-logs/{id}/reject"), &RejectBody { reason })
    }
}

impl AppointmentApi for ShopClient {
    fn list_appointments(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, ApiError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        let status = query.status.map(AppointmentStatus::as_wire);
        if let Some(status) = status {
            params.push(("status", status));
        }
        if let Some(start) = query.start_date.as_deref() {
            params.push(("startDate", start));
        }
        if let Some(end) = query.end_date.as_deref() {
            params.push(("endDate", end));
        }
        self.get("/appointments", &params)
    }

    fn list_customer_appointments(&self, customer_id: &str) -> Result<Vec<Appointment>, ApiError> {
        self.get(&format!("/appointments/customer/{customer_id}"), &[])
    }

    fn create_appointment(&self, request: &AppointmentRequest) -> Result<Appointment, ApiError> {
        self.post_json("/appointments", request)
    }

    fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        #[derive(Serialize)]
        struct StatusBody<'a> {
            status: &'a str,
        }
        self.post_json(
            &format!("/appointments/{id}/status"),
            &StatusBody {
                status: status.as_wire(),
            },
        )
    }

    fn reschedule_appointment(
        &self,
        id: &str,
        start: &str,
        end: &str,
    ) -> Result<Appointment, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/appointments/{id}/reschedule")))
            .query(&[("start", start), ("end", end)])
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let response = check_status(response)?;
        response
            .json::<Appointment>()
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    fn cancel_appointment(&self, id: &str, cancelled_by: Option<&str>) -> Result<(), ApiError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(name) = cancelled_by {
            params.push(("cancelledBy", name));
        }
        self.post_empty(&format!("/appointments/{id}/cancel"), &params)
    }

    fn check_availability(&self, start: &str, end: &str) -> Result<bool, ApiError> {
        self.get(
            "/appointments/availability",
            &[("start", start), ("end", end)],
        )
    }
}
