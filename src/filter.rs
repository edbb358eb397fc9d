use crate::models::{ApprovalStatus, TimeLog};

/// Status selector for the review table. `All` disables the status predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    All,
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub fn matches(self, status: ApprovalStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == ApprovalStatus::Pending,
            StatusFilter::Approved => status == ApprovalStatus::Approved,
            StatusFilter::Rejected => status == ApprovalStatus::Rejected,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Approved,
            StatusFilter::Approved => StatusFilter::Rejected,
            StatusFilter::Rejected => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Approved => "Approved",
            StatusFilter::Rejected => "Rejected",
        }
    }
}

/// Pure derivation of the visible list: status match AND case-insensitive
/// substring match over employee, project, and task.
pub fn filter_logs(logs: &[TimeLog], status: StatusFilter, search: &str) -> Vec<TimeLog> {
    let term = search.trim().to_lowercase();
    logs.iter()
        .filter(|log| status.matches(log.approval_status))
        .filter(|log| term.is_empty() || matches_search(log, &term))
        .cloned()
        .collect()
}

fn matches_search(log: &TimeLog, term: &str) -> bool {
    [&log.employee_name, &log.project_title, &log.task_name]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(term))
}

/// Sum of hours over the view passed in. Callers hand this the filtered view.
pub fn total_hours(logs: &[TimeLog]) -> f64 {
    logs.iter().map(|log| log.hours).sum()
}

/// Pending entries in the full snapshot, independent of any filter.
pub fn pending_count(logs: &[TimeLog]) -> usize {
    logs.iter()
        .filter(|log| log.approval_status == ApprovalStatus::Pending)
        .count()
}
