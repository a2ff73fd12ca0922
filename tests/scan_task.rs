use async_trait::async_trait;
use rmp_bridge::matcher::domain::CandidateRecord;
use rmp_bridge::matcher::remote::{encode_school_id, CandidateSource, RemoteError};
use rmp_bridge::matcher::ProfessorMatcher;
use rmp_bridge::scan::{InstructorCell, InstructorSource, ScanEvent, ScanTask};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

struct RosterSource;

#[async_trait]
impl CandidateSource for RosterSource {
    async fn search(
        &self,
        _text: &str,
        _school_id: &str,
    ) -> Result<Vec<CandidateRecord>, RemoteError> {
        Ok(vec![
            CandidateRecord::named("Leo", "Tang", Some("Mathematics")),
            CandidateRecord::named("Bright", "Asante-Appiah", Some("Economics")),
        ])
    }
}

/// Fixed page snapshot: two real instructors (one listed twice), one
/// placeholder cell the scan must skip.
struct FixedPage;

impl InstructorSource for FixedPage {
    fn instructor_cells(&self) -> Vec<InstructorCell> {
        vec![
            InstructorCell {
                cell_id: "row-1".to_string(),
                raw_names: vec!["Tang, Leo".to_string()],
            },
            InstructorCell {
                cell_id: "row-2".to_string(),
                raw_names: vec!["Staff".to_string()],
            },
            InstructorCell {
                cell_id: "row-3".to_string(),
                raw_names: vec![
                    "Tang, Leo".to_string(),
                    "Asante-Appiah, Bright".to_string(),
                ],
            },
        ]
    }

    fn department_hint(&self) -> Option<String> {
        Some("MATH".to_string())
    }
}

fn test_matcher() -> Arc<ProfessorMatcher> {
    Arc::new(ProfessorMatcher::new(
        Arc::new(RosterSource),
        encode_school_id("509"),
    ))
}

async fn next_event(events: &mut mpsc::Receiver<ScanEvent>) -> ScanEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event arrives in time")
        .expect("event channel open")
}

#[tokio::test]
async fn initial_scan_emits_one_event_per_valid_name_per_cell() {
    let (_changes_tx, changes_rx) = watch::channel(0u64);
    let (events_tx, mut events_rx) = mpsc::channel(16);

    let task = ScanTask::new(FixedPage, test_matcher(), changes_rx, events_tx);
    let handle = tokio::spawn(task.run());

    let first = next_event(&mut events_rx).await;
    assert_eq!(first.cell_id, "row-1");
    assert_eq!(first.raw_name, "Tang, Leo");
    assert!(first.response.is_success());

    // row-2 ("Staff") is skipped entirely; row-3 repeats Tang and adds
    // Asante-Appiah, each with its own lookup.
    let second = next_event(&mut events_rx).await;
    assert_eq!(second.cell_id, "row-3");
    assert_eq!(second.raw_name, "Tang, Leo");

    let third = next_event(&mut events_rx).await;
    assert_eq!(third.cell_id, "row-3");
    assert_eq!(third.raw_name, "Asante-Appiah, Bright");
    assert!(third.response.is_success());

    drop(_changes_tx);
    timeout(Duration::from_secs(5), handle)
        .await
        .expect("task stops after subscription closes")
        .expect("task does not panic");
}

#[tokio::test]
async fn change_notification_triggers_a_rescan() {
    let (changes_tx, changes_rx) = watch::channel(0u64);
    let (events_tx, mut events_rx) = mpsc::channel(16);

    let task = ScanTask::new(FixedPage, test_matcher(), changes_rx, events_tx);
    let handle = tokio::spawn(task.run());

    for _ in 0..3 {
        next_event(&mut events_rx).await;
    }

    changes_tx.send(1).expect("subscriber alive");
    for _ in 0..3 {
        next_event(&mut events_rx).await;
    }

    drop(changes_tx);
    timeout(Duration::from_secs(5), handle)
        .await
        .expect("task stops after subscription closes")
        .expect("task does not panic");
}

#[tokio::test]
async fn dropping_the_event_receiver_stops_the_task() {
    let (_changes_tx, changes_rx) = watch::channel(0u64);
    let (events_tx, events_rx) = mpsc::channel(1);

    let task = ScanTask::new(FixedPage, test_matcher(), changes_rx, events_tx);
    let handle = tokio::spawn(task.run());

    drop(events_rx);
    timeout(Duration::from_secs(5), handle)
        .await
        .expect("task stops once the consumer is gone")
        .expect("task does not panic");
}
