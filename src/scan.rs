//! Restartable page-scan task.
//!
//! Rather than hanging a mutation observer and a rescan timer off ambient
//! page state, the scan is an explicit task: the caller owns a
//! change-notification subscription (a watch channel) and an event channel,
//! and the task snapshots an [`InstructorSource`] once at startup and once
//! per notification, dispatching one independent lookup per plausible name
//! per cell. Rendering stays with the consumer of the events.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::matcher::{LookupRequest, LookupResponse, ProfessorMatcher};

/// Snapshot of one instructor cell found on the page.
#[derive(Debug, Clone)]
pub struct InstructorCell {
    /// Stable identifier the consumer uses to place the badge.
    pub cell_id: String,
    /// Raw scraped names, unvalidated. Cells can list several instructors.
    pub raw_names: Vec<String>,
}

/// Provider of the current page contents. Implementations snapshot the DOM
/// (or any other table-shaped source) at call time.
pub trait InstructorSource: Send + Sync {
    fn instructor_cells(&self) -> Vec<InstructorCell>;

    /// Page-level course-subject text used as the department tiebreak hint.
    fn department_hint(&self) -> Option<String> {
        None
    }
}

/// One lookup outcome for one name in one cell.
#[derive(Debug)]
pub struct ScanEvent {
    pub cell_id: String,
    pub raw_name: String,
    pub response: LookupResponse,
}

/// Vocabulary that marks a cell as a placeholder or course title rather
/// than a person.
const EXCLUDED_TERMS: &[&str] = &[
    "staff",
    "teaching",
    "tba",
    "instructor",
    "professor",
    "introduction",
    "accounting",
    "financial",
    "business",
    "management",
    "economics",
    "finance",
    "marketing",
    "analysis",
    "principles",
    "fundamentals",
    "advanced",
    "intermediate",
    "basic",
    "theory",
    "practice",
    "application",
    "methods",
    "systems",
    "concepts",
    "overview",
    "survey",
    "linear",
    "integrated",
    "applied",
];

/// Heuristic gate applied before any lookup is dispatched: reject
/// placeholder vocabulary, out-of-range lengths, single bare tokens, and
/// anything with characters a name would not carry.
pub fn plausible_instructor_name(name: &str) -> bool {
    let cleaned = name.trim().to_lowercase();

    if EXCLUDED_TERMS.iter().any(|term| cleaned.contains(term)) {
        return false;
    }

    if cleaned.len() < 5 || cleaned.len() > 50 {
        return false;
    }

    if !cleaned.contains(',') && !cleaned.contains(' ') {
        return false;
    }

    cleaned
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, ',' | '\'' | '-'))
}

/// Drives lookups for every plausible instructor name the source exposes.
pub struct ScanTask<S> {
    source: S,
    matcher: Arc<ProfessorMatcher>,
    changes: watch::Receiver<u64>,
    events: mpsc::Sender<ScanEvent>,
}

impl<S: InstructorSource> ScanTask<S> {
    pub fn new(
        source: S,
        matcher: Arc<ProfessorMatcher>,
        changes: watch::Receiver<u64>,
        events: mpsc::Sender<ScanEvent>,
    ) -> Self {
        Self {
            source,
            matcher,
            changes,
            events,
        }
    }

    /// Runs until the change subscription closes or the event receiver is
    /// dropped. Scans once immediately, then once per notification.
    pub async fn run(mut self) {
        if !self.scan_once().await {
            return;
        }

        loop {
            if self.changes.changed().await.is_err() {
                info!("change subscription closed, scan task stopping");
                return;
            }
            if !self.scan_once().await {
                return;
            }
        }
    }

    /// Returns false once the event receiver is gone.
    async fn scan_once(&self) -> bool {
        let department = self.source.department_hint();
        let cells = self.source.instructor_cells();
        debug!(cells = cells.len(), "scanning instructor cells");

        for cell in cells {
            for raw_name in cell.raw_names {
                if !plausible_instructor_name(&raw_name) {
                    continue;
                }

                // Every occurrence gets its own lookup; duplicates across
                // cells are not coalesced.
                let request = LookupRequest {
                    professor_name: raw_name.clone(),
                    department: department.clone(),
                    school_id: None,
                };
                let response = self.matcher.lookup(request).await;

                let event = ScanEvent {
                    cell_id: cell.cell_id.clone(),
                    raw_name,
                    response,
                };
                if self.events.send(event).await.is_err() {
                    info!("event receiver dropped, scan task stopping");
                    return false;
                }
            }
        }

        true
    }
}
