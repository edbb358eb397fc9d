use std::fmt;

use chrono::NaiveDate;

use crate::api::{ApiError, AppointmentApi};
use crate::dates;
use crate::models::{Appointment, AppointmentQuery, AppointmentRequest, AppointmentStatus};

/// Status selector for the intake board. Unlike the review filters this one is
/// applied server-side: changing it triggers a reload with a new query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakeFilter {
    All,
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl IntakeFilter {
    pub fn as_status(self) -> Option<AppointmentStatus> {
        match self {
            IntakeFilter::All => None,
            IntakeFilter::Pending => Some(AppointmentStatus::Pending),
            IntakeFilter::Confirmed => Some(AppointmentStatus::Confirmed),
            IntakeFilter::InProgress => Some(AppointmentStatus::InProgress),
            IntakeFilter::Completed => Some(AppointmentStatus::Completed),
            IntakeFilter::Cancelled => Some(AppointmentStatus::Cancelled),
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            IntakeFilter::All => IntakeFilter::Pending,
            IntakeFilter::Pending => IntakeFilter::Confirmed,
            IntakeFilter::Confirmed => IntakeFilter::InProgress,
            IntakeFilter::InProgress => IntakeFilter::Completed,
            IntakeFilter::Completed => IntakeFilter::Cancelled,
            IntakeFilter::Cancelled => IntakeFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntakeFilter::All => "All",
            IntakeFilter::Pending => "Pending",
            IntakeFilter::Confirmed => "Confirmed",
            IntakeFilter::InProgress => "In progress",
            IntakeFilter::Completed => "Completed",
            IntakeFilter::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone)]
pub enum IntakeError {
    Api(ApiError),
    SlotTaken,
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::Api(err) => write!(f, "{err}"),
            IntakeError::SlotTaken => write!(f, "That slot is not available."),
        }
    }
}

impl From<ApiError> for IntakeError {
    fn from(err: ApiError) -> Self {
        IntakeError::Api(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub converted: usize,
}

/// Appointment intake board: server-filtered snapshot, client-side search,
/// mutate-then-reload transitions.
pub struct AppointmentBoard {
    snapshot: Vec<Appointment>,
    pub status_filter: IntakeFilter,
    pub from_date: Option<NaiveDate>,
    pub search: String,
    pub submitting: Option<String>,
    pub loading: bool,
    generation: u64,
}

impl AppointmentBoard {
    pub fn new() -> Self {
        Self {
            snapshot: Vec::new(),
            status_filter: IntakeFilter::Pending,
            from_date: None,
            search: String::new(),
            submitting: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn snapshot(&self) -> &[Appointment] {
        &self.snapshot
    }

    fn query(&self) -> AppointmentQuery {
        AppointmentQuery {
            status: self.status_filter.as_status(),
            start_date: self.from_date.map(dates::day_start_rfc3339),
            end_date: None,
        }
    }

    pub fn load(&mut self, api: &impl AppointmentApi) -> Result<(), ApiError> {
        let generation = self.begin_load();
        let result = api.list_appointments(&self.query());
        self.finish_load(generation, result)
    }

    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Same stale-completion guard as the review board: only the newest
    /// stamped load may replace the snapshot.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Vec<Appointment>, ApiError>,
    ) -> Result<(), ApiError> {
        if generation != self.generation {
            return Ok(());
        }
        self.loading = false;
        self.snapshot = result?;
        Ok(())
    }

    /// Case-insensitive search over service type, customer id, and vehicle
    /// id. Derived on demand; the snapshot itself is never touched.
    pub fn visible(&self) -> Vec<&Appointment> {
        let term = self.search.trim().to_lowercase();
        self.snapshot
            .iter()
            .filter(|appt| {
                term.is_empty()
                    || [&appt.service_type, &appt.customer_id, &appt.vehicle_id]
                        .into_iter()
                        .any(|field| field.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn stats(&self) -> IntakeStats {
        let count = |status: AppointmentStatus| {
            self.snapshot
                .iter()
                .filter(|appt| appt.status == status)
                .count()
        };
        IntakeStats {
            total: self.snapshot.len(),
            pending: count(AppointmentStatus::Pending),
            confirmed: count(AppointmentStatus::Confirmed),
            converted: count(AppointmentStatus::InProgress),
        }
    }

    pub fn update_status(
        &mut self,
        api: &impl AppointmentApi,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        self.submitting = Some(id.to_string());
        let result = api
            .update_appointment_status(id, status)
            .map(|_| ())
            .and_then(|()| self.load(api));
        self.submitting = None;
        result
    }

    pub fn cancel(
        &mut self,
        api: &impl AppointmentApi,
        id: &str,
        cancelled_by: Option<&str>,
    ) -> Result<(), ApiError> {
        self.submitting = Some(id.to_string());
        let result = api
            .cancel_appointment(id, cancelled_by)
            .and_then(|()| self.load(api));
        self.submitting = None;
        result
    }

    /// Moves an appointment to a new slot. The slot is checked for
    /// availability first; a taken slot fails before the reschedule call.
    pub fn reschedule(
        &mut self,
        api: &impl AppointmentApi,
        id: &str,
        start: &str,
        end: &str,
    ) -> Result<(), IntakeError> {
        if !api.check_availability(start, end)? {
            return Err(IntakeError::SlotTaken);
        }
        api.reschedule_appointment(id, start, end)?;
        self.load(api)?;
        Ok(())
    }

    /// Books a new appointment after an availability check, then reconciles.
    pub fn book(
        &mut self,
        api: &impl AppointmentApi,
        request: &AppointmentRequest,
    ) -> Result<(), IntakeError> {
        if !api.check_availability(&request.start_time, &request.end_time)? {
            return Err(IntakeError::SlotTaken);
        }
        api.create_appointment(request)?;
        self.load(api)?;
        Ok(())
    }
}

impl Default for AppointmentBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct FakeApi {
        store: RefCell<Vec<Appointment>>,
        last_query: RefCell<Option<AppointmentQuery>>,
        reschedules: RefCell<Vec<(String, String, String)>>,
        cancellations: RefCell<Vec<(String, Option<String>)>>,
        available: Cell<bool>,
    }

    impl FakeApi {
        fn with(store: Vec<Appointment>) -> Self {
            Self {
                store: RefCell::new(store),
                last_query: RefCell::new(None),
                reschedules: RefCell::new(Vec::new()),
                cancellations: RefCell::new(Vec::new()),
                available: Cell::new(true),
            }
        }
    }

    impl AppointmentApi for FakeApi {
        fn list_appointments(
            &self,
            query: &AppointmentQuery,
        ) -> Result<Vec<Appointment>, ApiError> {
            *self.last_query.borrow_mut() = Some(query.clone());
            let matching = self
                .store
                .borrow()
                .iter()
                .filter(|appt| query.status.is_none_or(|status| appt.status == status))
                .cloned()
                .collect();
            Ok(matching)
        }

        fn list_customer_appointments(
            &self,
            customer_id: &str,
        ) -> Result<Vec<Appointment>, ApiError> {
            Ok(self
                .store
                .borrow()
                .iter()
                .filter(|appt| appt.customer_id == customer_id)
                .cloned()
                .collect())
        }

        fn create_appointment(
            &self,
            request: &AppointmentRequest,
        ) -> Result<Appointment, ApiError> {
            let appt = appointment("new", &request.customer_id, AppointmentStatus::Pending);
            self.store.borrow_mut().push(appt.clone());
            Ok(appt)
        }

        fn update_appointment_status(
            &self,
            id: &str,
            status: AppointmentStatus,
        ) -> Result<Appointment, ApiError> {
            let mut store = self.store.borrow_mut();
            let appt = store
                .iter_mut()
                .find(|appt| appt.id == id)
                .ok_or(ApiError::NotFound)?;
            appt.status = status;
            Ok(appt.clone())
        }

        fn reschedule_appointment(
            &self,
            id: &str,
            start: &str,
            end: &str,
        ) -> Result<Appointment, ApiError> {
            self.reschedules
                .borrow_mut()
                .push((id.to_string(), start.to_string(), end.to_string()));
            self.store
                .borrow()
                .iter()
                .find(|appt| appt.id == id)
                .cloned()
                .ok_or(ApiError::NotFound)
        }

        fn cancel_appointment(
            &self,
            id: &str,
            cancelled_by: Option<&str>,
        ) -> Result<(), ApiError> {
            self.cancellations
                .borrow_mut()
                .push((id.to_string(), cancelled_by.map(str::to_string)));
            let mut store = self.store.borrow_mut();
            let appt = store
                .iter_mut()
                .find(|appt| appt.id == id)
                .ok_or(ApiError::NotFound)?;
            appt.status = AppointmentStatus::Cancelled;
            Ok(())
        }

        fn check_availability(&self, _start: &str, _end: &str) -> Result<bool, ApiError> {
            Ok(self.available.get())
        }
    }

    fn appointment(id: &str, customer: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.to_string(),
            customer_id: customer.to_string(),
            vehicle_id: format!("veh-{id}"),
            service_type: "Tire rotation".to_string(),
            start_time: Some("2026-08-21T08:00:00Z".to_string()),
            end_time: Some("2026-08-21T09:00:00Z".to_string()),
            created_at: Some("2026-08-19T12:00:00Z".to_string()),
            notes: None,
            status,
        }
    }

    #[test]
    fn load_sends_the_status_filter_server_side() {
        let api = FakeApi::with(vec![
            appointment("1", "c-1", AppointmentStatus::Pending),
            appointment("2", "c-2", AppointmentStatus::Confirmed),
        ]);
        let mut board = AppointmentBoard::new();
        board.load(&api).unwrap();

        assert_eq!(board.snapshot().len(), 1);
        let query = api.last_query.borrow();
        assert_eq!(query.as_ref().unwrap().status, Some(AppointmentStatus::Pending));
    }

    #[test]
    fn all_filter_omits_status_from_the_query() {
        let api = FakeApi::with(vec![
            appointment("1", "c-1", AppointmentStatus::Pending),
            appointment("2", "c-2", AppointmentStatus::Completed),
        ]);
        let mut board = AppointmentBoard::new();
        board.status_filter = IntakeFilter::All;
        board.load(&api).unwrap();

        assert!(api.last_query.borrow().as_ref().unwrap().status.is_none());
        assert_eq!(board.snapshot().len(), 2);
    }

    #[test]
    fn from_date_is_encoded_as_day_start() {
        let api = FakeApi::with(Vec::new());
        let mut board = AppointmentBoard::new();
        board.from_date = NaiveDate::from_ymd_opt(2026, 8, 21);
        board.load(&api).unwrap();

        let query = api.last_query.borrow();
        let start = query.as_ref().unwrap().start_date.as_deref().unwrap();
        assert!(start.starts_with("2026-08-21T00:00:00"));
    }

    #[test]
    fn search_narrows_the_visible_list_only() {
        let api = FakeApi::with(vec![
            appointment("1", "c-garcia", AppointmentStatus::Pending),
            appointment("2", "c-okafor", AppointmentStatus::Pending),
        ]);
        let mut board = AppointmentBoard::new();
        board.load(&api).unwrap();

        board.search = "GARCIA".to_string();
        assert_eq!(board.visible().len(), 1);
        assert_eq!(board.visible()[0].id, "1");
        assert_eq!(board.snapshot().len(), 2);
    }

    #[test]
    fn stats_cover_the_full_snapshot() {
        let api = FakeApi::with(vec![
            appointment("1", "c-1", AppointmentStatus::Pending),
            appointment("2", "c-2", AppointmentStatus::Confirmed),
            appointment("3", "c-3", AppointmentStatus::InProgress),
            appointment("4", "c-4", AppointmentStatus::InProgress),
        ]);
        let mut board = AppointmentBoard::new();
        board.status_filter = IntakeFilter::All;
        board.load(&api).unwrap();

        let stats = board.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.converted, 2);
    }

    #[test]
    fn update_status_reloads_and_clears_submitting() {
        let api = FakeApi::with(vec![appointment("1", "c-1", AppointmentStatus::Pending)]);
        let mut board = AppointmentBoard::new();
        board.load(&api).unwrap();

        board
            .update_status(&api, "1", AppointmentStatus::Confirmed)
            .unwrap();
        assert!(board.submitting.is_none());
        // Pending filter is still active, so the confirmed entry drops out.
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn cancel_passes_the_operator_name() {
        let api = FakeApi::with(vec![appointment("1", "c-1", AppointmentStatus::Pending)]);
        let mut board = AppointmentBoard::new();
        board.load(&api).unwrap();

        board.cancel(&api, "1", Some("Priya")).unwrap();
        let cancellations = api.cancellations.borrow();
        assert_eq!(cancellations[0], ("1".to_string(), Some("Priya".to_string())));
    }

    #[test]
    fn reschedule_refuses_a_taken_slot_before_calling_the_server() {
        let api = FakeApi::with(vec![appointment("1", "c-1", AppointmentStatus::Pending)]);
        let mut board = AppointmentBoard::new();
        board.load(&api).unwrap();
        api.available.set(false);

        let err = board
            .reschedule(&api, "1", "2026-08-22T08:00:00Z", "2026-08-22T09:00:00Z")
            .unwrap_err();
        assert!(matches!(err, IntakeError::SlotTaken));
        assert!(api.reschedules.borrow().is_empty());
    }

    #[test]
    fn book_creates_after_an_availability_check() {
        let api = FakeApi::with(Vec::new());
        let mut board = AppointmentBoard::new();
        let request = AppointmentRequest {
            customer_id: "c-9".to_string(),
            vehicle_id: "veh-9".to_string(),
            service_type: "Inspection".to_string(),
            start_time: "2026-08-22T08:00:00Z".to_string(),
            end_time: "2026-08-22T09:00:00Z".to_string(),
            notes: Some("walk-in".to_string()),
        };
        board.book(&api, &request).unwrap();
        assert_eq!(board.snapshot().len(), 1);
    }

    #[test]
    fn stale_load_completion_is_discarded() {
        let mut board = AppointmentBoard::new();
        let older = board.begin_load();
        let newer = board.begin_load();

        board
            .finish_load(newer, Ok(vec![appointment("2", "c-2", AppointmentStatus::Pending)]))
            .unwrap();
        board
            .finish_load(older, Ok(vec![appointment("1", "c-1", AppointmentStatus::Pending)]))
            .unwrap();

        assert_eq!(board.snapshot()[0].id, "2");
    }
}
