use std::fmt;

use crate::api::{ApiError, TimeLogApi};
use crate::filter::{self, StatusFilter};
use crate::models::TimeLog;

#[derive(Debug, Clone)]
pub enum ReviewError {
    Api(ApiError),
    EmptyReason,
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::Api(err) => write!(f, "{err}"),
            ReviewError::EmptyReason => write!(f, "Please provide a rejection reason."),
        }
    }
}

impl From<ApiError> for ReviewError {
    fn from(err: ApiError) -> Self {
        ReviewError::Api(err)
    }
}

/// The entry picked for rejection plus the operator-entered reason. Lives only
/// while the rejection dialog is open.
#[derive(Debug, Clone)]
pub struct RejectionDraft {
    pub log: TimeLog,
    pub reason: String,
}

/// Client-side state of the time-log review workflow.
///
/// The snapshot is whatever the server returned last; the visible list is
/// always re-derived from it. Mutations never touch local state directly: a
/// successful approve or reject triggers a full reload, so the board only ever
/// shows server-confirmed data.
pub struct ReviewBoard {
    snapshot: Vec<TimeLog>,
    filtered: Vec<TimeLog>,
    pub status_filter: StatusFilter,
    pub search: String,
    pub draft: Option<RejectionDraft>,
    pub loading: bool,
    generation: u64,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self {
            snapshot: Vec::new(),
            filtered: Vec::new(),
            status_filter: StatusFilter::Pending,
            search: String::new(),
            draft: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn snapshot(&self) -> &[TimeLog] {
        &self.snapshot
    }

    pub fn filtered(&self) -> &[TimeLog] {
        &self.filtered
    }

    /// Sum of hours over the currently filtered view.
    pub fn total_hours(&self) -> f64 {
        filter::total_hours(&self.filtered)
    }

    /// Pending entries over the full snapshot, regardless of filters.
    pub fn pending_count(&self) -> usize {
        filter::pending_count(&self.snapshot)
    }

    pub fn load(&mut self, api: &impl TimeLogApi) -> Result<(), ApiError> {
        let generation = self.begin_load();
        let result = api.fetch_pending_time_logs();
        self.finish_load(generation, result)
    }

    /// Stamps a new load. Any load started earlier becomes stale from here on.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Applies a load result unless a newer load has been stamped since.
    /// Stale completions are dropped wholesale, success and failure alike.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Vec<TimeLog>, ApiError>,
    ) -> Result<(), ApiError> {
        if generation != self.generation {
            return Ok(());
        }
        self.loading = false;
        let logs = result?;
        self.snapshot = logs;
        self.reapply();
        Ok(())
    }

    pub fn set_status_filter(&mut self, status_filter: StatusFilter) {
        self.status_filter = status_filter;
        self.reapply();
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.reapply();
    }

    fn reapply(&mut self) {
        self.filtered = filter::filter_logs(&self.snapshot, self.status_filter, &self.search);
    }

    /// Approve one entry, then reconcile with a full reload. The snapshot is
    /// untouched when the call fails.
    pub fn approve(&mut self, api: &impl TimeLogApi, id: &str) -> Result<(), ApiError> {
        api.approve_time_log(id)?;
        self.load(api)
    }

    /// Opens the rejection dialog for `log`, discarding any earlier reason.
    pub fn open_rejection(&mut self, log: TimeLog) {
        self.draft = Some(RejectionDraft {
            log,
            reason: String::new(),
        });
    }

    pub fn cancel_rejection(&mut self) {
        self.draft = None;
    }

    /// Submits the open rejection. A blank or whitespace-only reason is
    /// refused before any network call; the dialog stays open on any failure.
    pub fn submit_rejection(&mut self, api: &impl TimeLogApi) -> Result<(), ReviewError> {
        let Some(draft) = &self.draft else {
            return Ok(());
        };
        let reason = draft.reason.trim();
        if reason.is_empty() {
            return Err(ReviewError::EmptyReason);
        }
        api.reject_time_log(&draft.log.id, reason)?;
        self.draft = None;
        self.load(api)?;
        Ok(())
    }
}

impl Default for ReviewBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApprovalStatus;
    use std::cell::{Cell, RefCell};

    struct FakeApi {
        store: RefCell<Vec<TimeLog>>,
        fetches: Cell<usize>,
        approvals: RefCell<Vec<String>>,
        rejections: RefCell<Vec<(String, String)>>,
        fail_mutations: Cell<bool>,
        fail_fetch: Cell<bool>,
    }

    impl FakeApi {
        fn with(store: Vec<TimeLog>) -> Self {
            Self {
                store: RefCell::new(store),
                fetches: Cell::new(0),
                approvals: RefCell::new(Vec::new()),
                rejections: RefCell::new(Vec::new()),
                fail_mutations: Cell::new(false),
                fail_fetch: Cell::new(false),
            }
        }

        fn set_status(&self, id: &str, status: ApprovalStatus) {
            for log in self.store.borrow_mut().iter_mut() {
                if log.id == id {
                    log.approval_status = status;
                }
            }
        }
    }

    impl TimeLogApi for FakeApi {
        fn fetch_pending_time_logs(&self) -> Result<Vec<TimeLog>, ApiError> {
            self.fetches.set(self.fetches.get() + 1);
            if self.fail_fetch.get() {
                return Err(ApiError::Network("connection reset".to_string()));
            }
            Ok(self.store.borrow().clone())
        }

        fn approve_time_log(&self, id: &str) -> Result<(), ApiError> {
            if self.fail_mutations.get() {
                return Err(ApiError::ServerError("boom".to_string()));
            }
            self.approvals.borrow_mut().push(id.to_string());
            self.set_status(id, ApprovalStatus::Approved);
            Ok(())
        }

        fn reject_time_log(&self, id: &str, reason: &str) -> Result<(), ApiError> {
            if self.fail_mutations.get() {
                return Err(ApiError::ServerError("boom".to_string()));
            }
            self.rejections
                .borrow_mut()
                .push((id.to_string(), reason.to_string()));
            self.set_status(id, ApprovalStatus::Rejected);
            Ok(())
        }
    }

    fn log(id: &str, status: ApprovalStatus, hours: f64) -> TimeLog {
        TimeLog {
            id: id.to_string(),
            employee_name: Some(format!("Employee {id}")),
            project_title: Some("Suspension".to_string()),
            task_name: Some("Alignment".to_string()),
            hours,
            note: None,
            logged_at: "2026-08-20T09:00:00Z".to_string(),
            approval_status: status,
        }
    }

    #[test]
    fn load_replaces_snapshot_and_reapplies_filters() {
        let api = FakeApi::with(vec![
            log("1", ApprovalStatus::Pending, 2.0),
            log("2", ApprovalStatus::Approved, 3.0),
        ]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        assert_eq!(board.snapshot().len(), 2);
        assert_eq!(board.filtered().len(), 1);
        assert_eq!(board.filtered()[0].id, "1");
        assert!((board.total_hours() - 2.0).abs() < f64::EPSILON);
        assert_eq!(board.pending_count(), 1);
        assert!(!board.loading);
    }

    #[test]
    fn failed_load_keeps_prior_snapshot() {
        let api = FakeApi::with(vec![log("1", ApprovalStatus::Pending, 2.0)]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        api.fail_fetch.set(true);
        assert!(board.load(&api).is_err());
        assert_eq!(board.snapshot().len(), 1);
        assert_eq!(board.filtered().len(), 1);
    }

    #[test]
    fn filter_changes_are_pure_and_do_not_fetch() {
        let api = FakeApi::with(vec![
            log("1", ApprovalStatus::Pending, 2.0),
            log("2", ApprovalStatus::Approved, 3.0),
        ]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();
        let fetches_after_load = api.fetches.get();

        board.set_status_filter(StatusFilter::Approved);
        board.set_search("employee 2".to_string());
        assert_eq!(board.filtered().len(), 1);
        assert_eq!(board.filtered()[0].id, "2");
        assert_eq!(api.fetches.get(), fetches_after_load);
    }

    #[test]
    fn total_hours_follows_the_filtered_view() {
        let api = FakeApi::with(vec![
            log("1", ApprovalStatus::Pending, 2.5),
            log("2", ApprovalStatus::Pending, 1.25),
            log("3", ApprovalStatus::Approved, 4.0),
        ]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        assert!((board.total_hours() - 3.75).abs() < f64::EPSILON);
        board.set_status_filter(StatusFilter::Approved);
        assert!((board.total_hours() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pending_count_is_invariant_under_filter_changes() {
        let api = FakeApi::with(vec![
            log("1", ApprovalStatus::Pending, 2.0),
            log("2", ApprovalStatus::Rejected, 3.0),
        ]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        assert_eq!(board.pending_count(), 1);
        board.set_status_filter(StatusFilter::Rejected);
        board.set_search("nothing matches this".to_string());
        assert_eq!(board.pending_count(), 1);
    }

    #[test]
    fn approve_reconciles_and_entry_leaves_pending_view() {
        let api = FakeApi::with(vec![
            log("1", ApprovalStatus::Pending, 2.0),
            log("2", ApprovalStatus::Approved, 3.0),
        ]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();
        assert_eq!(board.filtered().len(), 1);

        board.approve(&api, "1").unwrap();
        assert_eq!(api.approvals.borrow().as_slice(), ["1"]);
        assert_eq!(api.fetches.get(), 2);
        assert!(board.filtered().is_empty());
        assert_eq!(board.pending_count(), 0);
    }

    #[test]
    fn failed_approve_leaves_snapshot_unchanged() {
        let api = FakeApi::with(vec![log("1", ApprovalStatus::Pending, 2.0)]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        api.fail_mutations.set(true);
        assert!(board.approve(&api, "1").is_err());
        assert_eq!(api.fetches.get(), 1);
        assert_eq!(board.filtered().len(), 1);
    }

    #[test]
    fn blank_rejection_reason_never_reaches_the_network() {
        let api = FakeApi::with(vec![log("1", ApprovalStatus::Pending, 2.0)]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        let target = board.filtered()[0].clone();
        board.open_rejection(target);
        board.draft.as_mut().unwrap().reason = "   \t ".to_string();

        let err = board.submit_rejection(&api).unwrap_err();
        assert!(matches!(err, ReviewError::EmptyReason));
        assert!(api.rejections.borrow().is_empty());
        assert!(board.draft.is_some());
    }

    #[test]
    fn opening_a_rejection_clears_the_previous_reason() {
        let mut board = ReviewBoard::new();
        let first = log("1", ApprovalStatus::Pending, 2.0);
        let second = log("2", ApprovalStatus::Pending, 1.0);

        board.open_rejection(first);
        board.draft.as_mut().unwrap().reason = "half-finished".to_string();
        board.open_rejection(second);

        let draft = board.draft.as_ref().unwrap();
        assert_eq!(draft.log.id, "2");
        assert!(draft.reason.is_empty());
    }

    #[test]
    fn successful_rejection_closes_dialog_and_reloads() {
        let api = FakeApi::with(vec![
            log("1", ApprovalStatus::Pending, 2.0),
            log("2", ApprovalStatus::Pending, 1.0),
        ]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        let target = board.filtered()[0].clone();
        board.open_rejection(target);
        board.draft.as_mut().unwrap().reason = "  hours do not match the job card  ".to_string();
        board.submit_rejection(&api).unwrap();

        assert!(board.draft.is_none());
        let rejections = api.rejections.borrow();
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].0, "1");
        assert_eq!(rejections[0].1, "hours do not match the job card");
        assert_eq!(board.filtered().len(), 1);
        assert_eq!(board.filtered()[0].id, "2");
    }

    #[test]
    fn rejection_that_lands_but_fails_to_reload_consumes_the_draft() {
        let api = FakeApi::with(vec![log("1", ApprovalStatus::Pending, 2.0)]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        let target = board.filtered()[0].clone();
        board.open_rejection(target);
        board.draft.as_mut().unwrap().reason = "no job card".to_string();
        api.fail_fetch.set(true);

        let err = board.submit_rejection(&api).unwrap_err();
        assert!(matches!(err, ReviewError::Api(_)));
        assert!(board.draft.is_none());
        assert_eq!(api.rejections.borrow().len(), 1);
    }

    #[test]
    fn failed_rejection_keeps_dialog_open() {
        let api = FakeApi::with(vec![log("1", ApprovalStatus::Pending, 2.0)]);
        let mut board = ReviewBoard::new();
        board.load(&api).unwrap();

        let target = board.filtered()[0].clone();
        board.open_rejection(target);
        board.draft.as_mut().unwrap().reason = "no job card".to_string();
        api.fail_mutations.set(true);

        let err = board.submit_rejection(&api).unwrap_err();
        assert!(matches!(err, ReviewError::Api(_)));
        assert!(board.draft.is_some());
        assert_eq!(board.filtered().len(), 1);
    }

    #[test]
    fn stale_load_completion_is_discarded() {
        let mut board = ReviewBoard::new();
        let older = board.begin_load();
        let newer = board.begin_load();

        board
            .finish_load(newer, Ok(vec![log("2", ApprovalStatus::Pending, 1.0)]))
            .unwrap();
        board
            .finish_load(older, Ok(vec![log("1", ApprovalStatus::Pending, 9.0)]))
            .unwrap();

        assert_eq!(board.snapshot().len(), 1);
        assert_eq!(board.snapshot()[0].id, "2");
        assert!(!board.loading);
    }

    #[test]
    fn stale_load_error_is_swallowed() {
        let mut board = ReviewBoard::new();
        let older = board.begin_load();
        let newer = board.begin_load();

        board
            .finish_load(newer, Ok(vec![log("2", ApprovalStatus::Pending, 1.0)]))
            .unwrap();
        let result = board.finish_load(older, Err(ApiError::Network("late".to_string())));
        assert!(result.is_ok());
        assert_eq!(board.snapshot().len(), 1);
    }
}
