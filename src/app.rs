use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::{ListState, TableState};
use std::time::{Duration, Instant};

use crate::api::{ApiError, AppointmentApi, ShopClient};
use crate::appointments::{AppointmentBoard, IntakeError};
use crate::dates;
use crate::models::{Appointment, AppointmentRequest, AppointmentStatus, ApprovalStatus};
use crate::review::{ReviewBoard, ReviewError};
use crate::storage::{self, ThemePreference};
use arboard::Clipboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Review,
    Appointments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Loading,
    Browse,
    Login,
    Reject,
    Search,
    FromDate,
    Reschedule,
    Booking,
    CustomerHistory,
}

#[derive(Debug, Clone, Default)]
pub struct SlotForm {
    pub start: String,
    pub end: String,
    pub focus_end: bool,
}

impl SlotForm {
    fn active_field(&mut self) -> &mut String {
        if self.focus_end {
            &mut self.end
        } else {
            &mut self.start
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    CustomerId,
    VehicleId,
    ServiceType,
    Start,
    End,
    Notes,
}

impl BookingField {
    pub const ALL: [BookingField; 6] = [
        BookingField::CustomerId,
        BookingField::VehicleId,
        BookingField::ServiceType,
        BookingField::Start,
        BookingField::End,
        BookingField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BookingField::CustomerId => "Customer ID",
            BookingField::VehicleId => "Vehicle ID",
            BookingField::ServiceType => "Service",
            BookingField::Start => "Start (YYYY-MM-DD HH:MM)",
            BookingField::End => "End   (YYYY-MM-DD HH:MM)",
            BookingField::Notes => "Notes",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub customer_id: String,
    pub vehicle_id: String,
    pub service_type: String,
    pub start: String,
    pub end: String,
    pub notes: String,
    pub focus: usize,
}

impl BookingForm {
    pub fn field(&self, field: BookingField) -> &str {
        match field {
            BookingField::CustomerId => &self.customer_id,
            BookingField::VehicleId => &self.vehicle_id,
            BookingField::ServiceType => &self.service_type,
            BookingField::Start => &self.start,
            BookingField::End => &self.end,
            BookingField::Notes => &self.notes,
        }
    }

    fn field_mut(&mut self, field: BookingField) -> &mut String {
        match field {
            BookingField::CustomerId => &mut self.customer_id,
            BookingField::VehicleId => &mut self.vehicle_id,
            BookingField::ServiceType => &mut self.service_type,
            BookingField::Start => &mut self.start,
            BookingField::End => &mut self.end,
            BookingField::Notes => &mut self.notes,
        }
    }

    pub fn focused(&self) -> BookingField {
        BookingField::ALL[self.focus % BookingField::ALL.len()]
    }
}

/// Mutations queued from key handlers and executed after the next draw, so
/// loading overlays get a frame before a blocking network call starts.
enum PendingAction {
    Approve(String),
    SubmitRejection,
    UpdateStatus(String, AppointmentStatus),
    CancelAppointment(String),
    Reschedule { id: String, start: String, end: String },
    Book(AppointmentRequest),
    CustomerHistory(String),
}

pub struct App {
    pub should_quit: bool,
    pub needs_refresh: bool,
    pub mode: Mode,
    pub view: View,
    pub status: Option<String>,
    pub input: String,
    pub token: Option<String>,
    pub operator: Option<String>,
    pub theme: ThemePreference,
    pub review: ReviewBoard,
    pub intake: AppointmentBoard,
    pub review_state: TableState,
    pub intake_state: ListState,
    pub history_state: ListState,
    pub customer_history: Vec<Appointment>,
    pub slot_form: SlotForm,
    pub booking: BookingForm,
    pub last_refresh: Option<DateTime<Local>>,
    pub show_help: bool,
    server_url: String,
    client: Option<ShopClient>,
    reschedule_target: Option<String>,
    saved_search: String,
    pending: Option<PendingAction>,
    toast: Option<Toast>,
}

impl App {
    pub fn new(server_url: String, force_login: bool, initial_view: View) -> Self {
        let token = if force_login {
            None
        } else {
            storage::read_token()
        };
        let client = token
            .as_ref()
            .map(|token| ShopClient::new(&server_url, token.clone()));
        let mode = if token.is_some() {
            Mode::Loading
        } else {
            Mode::Login
        };
        let theme = storage::read_theme().unwrap_or(ThemePreference::Terminal);
        let operator = storage::read_operator();

        let mut review_state = TableState::default();
        review_state.select(Some(0));
        let mut intake_state = ListState::default();
        intake_state.select(Some(0));

        App {
            should_quit: false,
            needs_refresh: token.is_some(),
            mode,
            view: initial_view,
            status: None,
            input: String::new(),
            token,
            operator,
            theme,
            review: ReviewBoard::new(),
            intake: AppointmentBoard::new(),
            review_state,
            intake_state,
            history_state: ListState::default(),
            customer_history: Vec::new(),
            slot_form: SlotForm::default(),
            booking: BookingForm::default(),
            last_refresh: None,
            show_help: false,
            server_url,
            client,
            reschedule_target: None,
            saved_search: String::new(),
            pending: None,
            toast: None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Login => self.handle_login_input(key),
            Mode::Reject => self.handle_reject_input(key),
            Mode::Search => self.handle_search_input(key),
            Mode::FromDate => self.handle_from_date_input(key),
            Mode::Reschedule => self.handle_reschedule_input(key),
            Mode::Booking => self.handle_booking_input(key),
            Mode::CustomerHistory => self.handle_history_input(key),
            Mode::Browse | Mode::Loading => self.handle_browse_input(key),
        }
    }

    pub fn has_pending_action(&self) -> bool {
        self.pending.is_some()
    }

    pub fn refresh_data(&mut self) {
        self.needs_refresh = false;
        self.status = None;

        let Some(client) = self.client.clone() else {
            self.mode = Mode::Login;
            return;
        };

        let result = match self.view {
            View::Review => self.review.load(&client),
            View::Appointments => self.intake.load(&client),
        };

        match result {
            Ok(()) => {
                self.last_refresh = Some(Local::now());
                self.mode = Mode::Browse;
                self.clamp_selection();
            }
            Err(err) => self.handle_api_error(err),
        }
    }

    /// Executes the queued mutation, if any. Called from the main loop after
    /// the frame that shows its loading state has been drawn.
    pub fn run_pending_action(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        let Some(client) = self.client.clone() else {
            self.mode = Mode::Login;
            return;
        };

        match action {
            PendingAction::Approve(id) => match self.review.approve(&client, &id) {
                Ok(()) => {
                    self.after_reload();
                    self.set_toast("Time log approved.", false);
                }
                Err(err) => self.handle_api_error(err),
            },
            PendingAction::SubmitRejection => match self.review.submit_rejection(&client) {
                Ok(()) => {
                    self.mode = Mode::Browse;
                    self.after_reload();
                    self.set_toast("Time log rejected.", false);
                }
                Err(ReviewError::EmptyReason) => {
                    self.status = Some(ReviewError::EmptyReason.to_string());
                }
                Err(ReviewError::Api(err)) => {
                    // A consumed draft means the rejection itself landed and
                    // only the reconciling reload failed.
                    if self.review.draft.is_none() {
                        self.mode = Mode::Browse;
                    }
                    self.handle_api_error(err);
                }
            },
            PendingAction::UpdateStatus(id, status) => {
                match self.intake.update_status(&client, &id, status) {
                    Ok(()) => {
                        self.after_reload();
                        self.set_toast(format!("Appointment marked {}.", status.label()), false);
                    }
                    Err(err) => self.handle_api_error(err),
                }
            }
            PendingAction::CancelAppointment(id) => {
                let operator = self.operator.clone();
                match self.intake.cancel(&client, &id, operator.as_deref()) {
                    Ok(()) => {
                        self.after_reload();
                        self.set_toast("Appointment cancelled.", false);
                    }
                    Err(err) => self.handle_api_error(err),
                }
            }
            PendingAction::Reschedule { id, start, end } => {
                match self.intake.reschedule(&client, &id, &start, &end) {
                    Ok(()) => {
                        self.mode = Mode::Browse;
                        self.reschedule_target = None;
                        self.slot_form = SlotForm::default();
                        self.after_reload();
                        self.set_toast("Appointment rescheduled.", false);
                    }
                    Err(IntakeError::SlotTaken) => {
                        self.status = Some(IntakeError::SlotTaken.to_string());
                    }
                    Err(IntakeError::Api(err)) => self.handle_api_error(err),
                }
            }
            PendingAction::Book(request) => match self.intake.book(&client, &request) {
                Ok(()) => {
                    self.mode = Mode::Browse;
                    self.booking = BookingForm::default();
                    self.after_reload();
                    self.set_toast("Appointment booked.", false);
                }
                Err(IntakeError::SlotTaken) => {
                    self.status = Some(IntakeError::SlotTaken.to_string());
                }
                Err(IntakeError::Api(err)) => self.handle_api_error(err),
            },
            PendingAction::CustomerHistory(customer_id) => {
                match client.list_customer_appointments(&customer_id) {
                    Ok(history) => {
                        self.customer_history = history;
                        self.history_state.select(Some(0));
                        self.mode = Mode::CustomerHistory;
                    }
                    Err(err) => self.handle_api_error(err),
                }
            }
        }
    }

    fn after_reload(&mut self) {
        self.last_refresh = Some(Local::now());
        if self.mode == Mode::Loading {
            self.mode = Mode::Browse;
        }
        self.clamp_selection();
    }

    fn handle_api_error(&mut self, err: ApiError) {
        if matches!(err, ApiError::Unauthorized) {
            self.token = None;
            self.client = None;
            self.mode = Mode::Login;
            self.status = Some("Invalid token. Please login.".to_string());
            return;
        }
        // Non-fatal: report once, keep the last good snapshot on screen.
        if self.mode == Mode::Loading {
            self.mode = Mode::Browse;
        }
        let message = err.to_string();
        self.status = Some(message.clone());
        self.set_toast(message, true);
    }

    fn handle_browse_input(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => self.show_help = true,
            KeyCode::Char('r') => self.trigger_refresh(),
            KeyCode::Tab => self.switch_view(),
            KeyCode::Char('1') => self.set_view(View::Review),
            KeyCode::Char('2') => self.set_view(View::Appointments),
            KeyCode::Char('f') => self.cycle_status_filter(),
            KeyCode::Char('/') => self.enter_search(),
            KeyCode::Char('m') => self.cycle_theme(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            _ => match self.view {
                View::Review => self.handle_review_key(key),
                View::Appointments => self.handle_intake_key(key),
            },
        }
    }

    fn handle_review_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => {
                let Some(log) = self.selected_log().cloned() else {
                    return;
                };
                if log.approval_status != ApprovalStatus::Pending {
                    self.set_toast("Only pending time logs can be reviewed.", true);
                    return;
                }
                self.pending = Some(PendingAction::Approve(log.id));
            }
            KeyCode::Char('x') => {
                let Some(log) = self.selected_log().cloned() else {
                    return;
                };
                if log.approval_status != ApprovalStatus::Pending {
                    self.set_toast("Only pending time logs can be reviewed.", true);
                    return;
                }
                self.review.open_rejection(log);
                self.status = None;
                self.mode = Mode::Reject;
            }
            KeyCode::Char('c') => self.copy_filtered_to_clipboard(),
            _ => {}
        }
    }

    fn handle_intake_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') => self.queue_status_update(AppointmentStatus::Confirmed),
            KeyCode::Char('s') => self.queue_status_update(AppointmentStatus::InProgress),
            KeyCode::Char('o') => self.queue_status_update(AppointmentStatus::Completed),
            KeyCode::Char('x') => {
                if self.intake.submitting.is_some() {
                    return;
                }
                if let Some(id) = self.selected_appointment().map(|appt| appt.id.clone()) {
                    self.pending = Some(PendingAction::CancelAppointment(id));
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_appointment().map(|appt| appt.id.clone()) {
                    self.reschedule_target = Some(id);
                    self.slot_form = SlotForm::default();
                    self.status = None;
                    self.mode = Mode::Reschedule;
                }
            }
            KeyCode::Char('n') => {
                self.booking = BookingForm::default();
                self.status = None;
                self.mode = Mode::Booking;
            }
            KeyCode::Char('u') => {
                let customer = self
                    .selected_appointment()
                    .map(|appt| appt.customer_id.clone());
                if let Some(customer_id) = customer {
                    self.pending = Some(PendingAction::CustomerHistory(customer_id));
                }
            }
            KeyCode::Char('d') => {
                self.input = self
                    .intake
                    .from_date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                self.status = None;
                self.mode = Mode::FromDate;
            }
            _ => {}
        }
    }

    fn queue_status_update(&mut self, status: AppointmentStatus) {
        if self.intake.submitting.is_some() {
            return;
        }
        if let Some(id) = self.selected_appointment().map(|appt| appt.id.clone()) {
            self.pending = Some(PendingAction::UpdateStatus(id, status));
        }
    }

    fn handle_login_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if self.input.is_empty() => self.should_quit = true,
            KeyCode::Enter => {
                let token = self.input.trim().to_string();
                if token.is_empty() {
                    return;
                }
                if let Err(err) = storage::write_token(&token) {
                    self.status = Some(format!("Failed to save token: {err}"));
                    return;
                }
                self.client = Some(ShopClient::new(&self.server_url, token.clone()));
                self.token = Some(token);
                self.input.clear();
                self.mode = Mode::Loading;
                self.needs_refresh = true;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.input.push(ch);
                }
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_reject_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let blank = self
                    .review
                    .draft
                    .as_ref()
                    .is_none_or(|draft| draft.reason.trim().is_empty());
                if blank {
                    self.status = Some(ReviewError::EmptyReason.to_string());
                    return;
                }
                self.status = None;
                self.pending = Some(PendingAction::SubmitRejection);
            }
            KeyCode::Backspace => {
                if let Some(draft) = self.review.draft.as_mut() {
                    draft.reason.pop();
                }
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    if let Some(draft) = self.review.draft.as_mut() {
                        draft.reason.push(ch);
                    }
                }
            }
            KeyCode::Esc => {
                self.review.cancel_rejection();
                self.mode = Mode::Browse;
            }
            _ => {}
        }
    }

    fn enter_search(&mut self) {
        self.saved_search = match self.view {
            View::Review => self.review.search.clone(),
            View::Appointments => self.intake.search.clone(),
        };
        self.input = self.saved_search.clone();
        self.mode = Mode::Search;
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Esc => {
                let saved = self.saved_search.clone();
                self.apply_search(saved);
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                self.input.pop();
                let term = self.input.clone();
                self.apply_search(term);
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.input.push(ch);
                    let term = self.input.clone();
                    self.apply_search(term);
                }
            }
            _ => {}
        }
    }

    fn apply_search(&mut self, term: String) {
        match self.view {
            View::Review => self.review.set_search(term),
            View::Appointments => self.intake.search = term,
        }
        self.clamp_selection();
    }

    fn handle_from_date_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if self.input.trim().is_empty() {
                    self.intake.from_date = None;
                } else {
                    match dates::parse_date(self.input.trim()) {
                        Ok(date) => self.intake.from_date = Some(date),
                        Err(err) => {
                            self.status = Some(err);
                            return;
                        }
                    }
                }
                self.input.clear();
                self.status = None;
                self.trigger_refresh();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.input.push(ch);
                }
            }
            KeyCode::Esc => {
                self.input.clear();
                self.status = None;
                self.mode = Mode::Browse;
            }
            _ => {}
        }
    }

    fn handle_reschedule_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.slot_form.focus_end = !self.slot_form.focus_end;
            }
            KeyCode::Enter => {
                let Some(id) = self.reschedule_target.clone() else {
                    self.mode = Mode::Browse;
                    return;
                };
                match self.parse_slot_form() {
                    Ok((start, end)) => {
                        self.status = None;
                        self.pending = Some(PendingAction::Reschedule { id, start, end });
                    }
                    Err(err) => self.status = Some(err),
                }
            }
            KeyCode::Backspace => {
                self.slot_form.active_field().pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.slot_form.active_field().push(ch);
                }
            }
            KeyCode::Esc => {
                self.reschedule_target = None;
                self.slot_form = SlotForm::default();
                self.status = None;
                self.mode = Mode::Browse;
            }
            _ => {}
        }
    }

    fn parse_slot_form(&self) -> Result<(String, String), String> {
        let start = dates::parse_slot(&self.slot_form.start)?;
        let end = dates::parse_slot(&self.slot_form.end)?;
        if end <= start {
            return Err("End must be after start.".to_string());
        }
        Ok((start.to_rfc3339(), end.to_rfc3339()))
    }

    fn handle_booking_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.booking.focus = (self.booking.focus + 1) % BookingField::ALL.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.booking.focus =
                    (self.booking.focus + BookingField::ALL.len() - 1) % BookingField::ALL.len();
            }
            KeyCode::Enter => match self.parse_booking_form() {
                Ok(request) => {
                    self.status = None;
                    self.pending = Some(PendingAction::Book(request));
                }
                Err(err) => self.status = Some(err),
            },
            KeyCode::Backspace => {
                let field = self.booking.focused();
                self.booking.field_mut(field).pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    let field = self.booking.focused();
                    self.booking.field_mut(field).push(ch);
                }
            }
            KeyCode::Esc => {
                self.booking = BookingForm::default();
                self.status = None;
                self.mode = Mode::Browse;
            }
            _ => {}
        }
    }

    fn parse_booking_form(&self) -> Result<AppointmentRequest, String> {
        let customer_id = self.booking.customer_id.trim();
        let vehicle_id = self.booking.vehicle_id.trim();
        let service_type = self.booking.service_type.trim();
        if customer_id.is_empty() || vehicle_id.is_empty() || service_type.is_empty() {
            return Err("Customer, vehicle, and service are required.".to_string());
        }
        let start = dates::parse_slot(&self.booking.start)?;
        let end = dates::parse_slot(&self.booking.end)?;
        if end <= start {
            return Err("End must be after start.".to_string());
        }
        let notes = self.booking.notes.trim();
        Ok(AppointmentRequest {
            customer_id: customer_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            service_type: service_type.to_string(),
            start_time: start.to_rfc3339(),
            end_time: end.to_rfc3339(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }

    fn handle_history_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('u') => {
                self.customer_history.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Up => move_selection(&mut self.history_state, self.customer_history.len(), -1),
            KeyCode::Down => move_selection(&mut self.history_state, self.customer_history.len(), 1),
            _ => {}
        }
    }

    fn cycle_status_filter(&mut self) {
        match self.view {
            View::Review => {
                // Review filters are a pure re-derivation of the snapshot.
                let next = self.review.status_filter.cycle();
                self.review.set_status_filter(next);
                self.clamp_selection();
            }
            View::Appointments => {
                // Intake filters are applied by the server; refetch.
                self.intake.status_filter = self.intake.status_filter.cycle();
                self.trigger_refresh();
            }
        }
    }

    fn cycle_theme(&mut self) {
        self.theme = match self.theme {
            ThemePreference::Terminal => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Terminal,
        };
        if let Err(err) = storage::write_theme(self.theme) {
            self.set_toast(format!("Failed to save theme: {err}"), true);
        }
    }

    fn switch_view(&mut self) {
        let next = match self.view {
            View::Review => View::Appointments,
            View::Appointments => View::Review,
        };
        self.set_view(next);
    }

    fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.trigger_refresh();
        }
    }

    fn trigger_refresh(&mut self) {
        self.mode = Mode::Loading;
        self.needs_refresh = true;
    }

    pub fn visible_rows(&self) -> usize {
        match self.view {
            View::Review => self.review.filtered().len(),
            View::Appointments => self.intake.visible().len(),
        }
    }

    fn select_previous(&mut self) {
        let len = self.visible_rows();
        match self.view {
            View::Review => move_table_selection(&mut self.review_state, len, -1),
            View::Appointments => move_selection(&mut self.intake_state, len, -1),
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_rows();
        match self.view {
            View::Review => move_table_selection(&mut self.review_state, len, 1),
            View::Appointments => move_selection(&mut self.intake_state, len, 1),
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.review.filtered().len();
        if rows == 0 {
            self.review_state.select(None);
        } else if self.review_state.selected().is_none_or(|index| index >= rows) {
            self.review_state.select(Some(0));
        }

        let rows = self.intake.visible().len();
        if rows == 0 {
            self.intake_state.select(None);
        } else if self.intake_state.selected().is_none_or(|index| index >= rows) {
            self.intake_state.select(Some(0));
        }
    }

    pub fn selected_log(&self) -> Option<&crate::models::TimeLog> {
        self.review_state
            .selected()
            .and_then(|index| self.review.filtered().get(index))
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.intake_state
            .selected()
            .and_then(|index| self.intake.visible().get(index).copied())
    }

    fn copy_filtered_to_clipboard(&mut self) {
        if self.review.filtered().is_empty() {
            self.set_toast("No time logs to copy.", true);
            return;
        }

        let text = self.format_filtered_logs();
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(_) => self.set_toast("Copied filtered time logs.", false),
            Err(err) => self.set_toast(format!("Clipboard error: {err}"), true),
        }
    }

    fn format_filtered_logs(&self) -> String {
        let mut lines: Vec<String> = self
            .review
            .filtered()
            .iter()
            .map(|log| {
                format!(
                    "• {} — {} / {} ({:.2}h) [{}]",
                    log.employee(),
                    log.project(),
                    log.task(),
                    log.hours,
                    log.approval_status.label()
                )
            })
            .collect();
        lines.push(format!(
            "Total {:.2}h over {} entries",
            self.review.total_hours(),
            self.review.filtered().len()
        ));
        lines.join("\n")
    }

    pub fn active_toast(&mut self) -> Option<ToastView> {
        let toast = self.toast.as_ref()?;
        if toast.created_at.elapsed() > Duration::from_secs(3) {
            self.toast = None;
            return None;
        }
        Some(ToastView {
            message: toast.message.clone(),
            is_error: toast.is_error,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            created_at: Instant::now(),
            is_error,
        });
    }
}

fn move_selection(state: &mut ListState, len: usize, delta: i64) {
    if len == 0 {
        return;
    }
    let selected = state.selected().unwrap_or(0) as i64;
    let next = (selected + delta).rem_euclid(len as i64) as usize;
    state.select(Some(next));
}

fn move_table_selection(state: &mut TableState, len: usize, delta: i64) {
    if len == 0 {
        return;
    }
    let selected = state.selected().unwrap_or(0) as i64;
    let next = (selected + delta).rem_euclid(len as i64) as usize;
    state.select(Some(next));
}

struct Toast {
    message: String,
    created_at: Instant,
    is_error: bool,
}

pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeLog;
    use crossterm::event::KeyModifiers;

    fn pending_log() -> TimeLog {
        TimeLog {
            id: "tl-1".to_string(),
            employee_name: Some("Dana".to_string()),
            project_title: Some("Brake job".to_string()),
            task_name: Some("Pads".to_string()),
            hours: 1.5,
            note: None,
            logged_at: "2026-08-20T09:00:00Z".to_string(),
            approval_status: ApprovalStatus::Pending,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn blank_rejection_reason_keeps_dialog_open_with_an_error() {
        let mut app = App::new("http://localhost".to_string(), true, View::Review);
        app.review.open_rejection(pending_log());
        app.mode = Mode::Reject;

        app.handle_key_event(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Reject);
        assert!(!app.has_pending_action());
        assert!(app.review.draft.is_some());
        assert!(app.status.as_deref().unwrap().contains("rejection reason"));
    }

    #[test]
    fn typed_reason_clears_the_error_and_queues_the_submission() {
        let mut app = App::new("http://localhost".to_string(), true, View::Review);
        app.review.open_rejection(pending_log());
        app.mode = Mode::Reject;

        app.handle_key_event(key(KeyCode::Enter));
        assert!(app.status.is_some());

        for ch in "no job card".chars() {
            app.handle_key_event(key(KeyCode::Char(ch)));
        }
        app.handle_key_event(key(KeyCode::Enter));

        assert!(app.has_pending_action());
        assert!(app.status.is_none());
    }

    #[test]
    fn booking_form_focus_wraps() {
        let mut form = BookingForm::default();
        assert_eq!(form.focused(), BookingField::CustomerId);
        form.focus = BookingField::ALL.len() - 1;
        assert_eq!(form.focused(), BookingField::Notes);
        form.focus = (form.focus + 1) % BookingField::ALL.len();
        assert_eq!(form.focused(), BookingField::CustomerId);
    }

    #[test]
    fn slot_form_switches_active_field() {
        let mut form = SlotForm::default();
        form.active_field().push_str("2026-08-22 08:00");
        form.focus_end = true;
        form.active_field().push_str("2026-08-22 09:00");
        assert_eq!(form.start, "2026-08-22 08:00");
        assert_eq!(form.end, "2026-08-22 09:00");
    }
}
