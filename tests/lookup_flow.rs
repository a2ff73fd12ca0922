use async_trait::async_trait;
use rmp_bridge::matcher::domain::CandidateRecord;
use rmp_bridge::matcher::remote::{encode_school_id, CandidateSource, RemoteError};
use rmp_bridge::matcher::{LookupRequest, LookupResponse, ProfessorMatcher};
use std::sync::{Arc, Mutex};

/// Records every search the matcher issues so tests can assert on the
/// normalized text and school id that reach the remote boundary.
struct RecordingSource {
    calls: Mutex<Vec<(String, String)>>,
    candidates: Vec<CandidateRecord>,
}

impl RecordingSource {
    fn with(candidates: Vec<CandidateRecord>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            candidates,
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl CandidateSource for RecordingSource {
    async fn search(
        &self,
        text: &str,
        school_id: &str,
    ) -> Result<Vec<CandidateRecord>, RemoteError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((text.to_string(), school_id.to_string()));
        Ok(self.candidates.clone())
    }
}

fn lehigh_roster() -> Vec<CandidateRecord> {
    vec![
        CandidateRecord::named("Bright", "Asante-Appiah", Some("Economics")),
        CandidateRecord::named("Leo", "Tang", Some("Computer Science")),
        CandidateRecord::named("Leo", "Tang", Some("Mathematics")),
        CandidateRecord::named("Bob", "Smith", Some("Computer Science")),
    ]
}

#[tokio::test]
async fn comma_name_is_normalized_before_the_remote_call() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = ProfessorMatcher::new(source.clone(), encode_school_id("509"));

    let response = matcher
        .lookup(LookupRequest::named("Asante-Appiah, Bright (Primary)"))
        .await;

    match response {
        LookupResponse::Found { professor } => {
            assert_eq!(professor.last_name, "Asante-Appiah");
        }
        other => panic!("expected match, got {other:?}"),
    }

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Bright Asante-Appiah");
    assert_eq!(calls[0].1, "U2Nob29sLTUwOQ==");
}

#[tokio::test]
async fn request_school_id_overrides_the_configured_default() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = ProfessorMatcher::new(source.clone(), encode_school_id("509"));

    let request = LookupRequest {
        school_id: Some(encode_school_id("1381")),
        ..LookupRequest::named("Bob Smith")
    };
    matcher.lookup(request).await;

    assert_eq!(source.calls()[0].1, encode_school_id("1381"));
}

#[tokio::test]
async fn blank_name_never_reaches_the_remote_service() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = ProfessorMatcher::new(source.clone(), encode_school_id("509"));

    let response = matcher.lookup(LookupRequest::named("")).await;

    assert!(!response.is_success());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn department_hint_resolves_same_name_ambiguity() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = ProfessorMatcher::new(source, encode_school_id("509"));

    let request = LookupRequest {
        department: Some("math".to_string()),
        ..LookupRequest::named("Tang, Leo")
    };

    match matcher.lookup(request).await {
        LookupResponse::Found { professor } => {
            assert_eq!(professor.department.as_deref(), Some("Mathematics"));
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[tokio::test]
async fn ambiguity_without_hint_takes_the_earliest_candidate() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = ProfessorMatcher::new(source, encode_school_id("509"));

    match matcher.lookup(LookupRequest::named("Tang, Leo")).await {
        LookupResponse::Found { professor } => {
            assert_eq!(professor.department.as_deref(), Some("Computer Science"));
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[tokio::test]
async fn unmatched_name_reports_both_search_terms() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = ProfessorMatcher::new(source, encode_school_id("509"));

    match matcher.lookup(LookupRequest::named("Gonzalez, Maria")).await {
        LookupResponse::NotFound {
            error,
            search_term,
            converted_name,
        } => {
            assert_eq!(error, "Professor not found");
            assert_eq!(search_term.as_deref(), Some("Gonzalez, Maria"));
            assert_eq!(converted_name.as_deref(), Some("Maria Gonzalez"));
        }
        other => panic!("expected miss, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_lookups_share_one_matcher() {
    let source = RecordingSource::with(lehigh_roster());
    let matcher = Arc::new(ProfessorMatcher::new(source.clone(), encode_school_id("509")));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let matcher = matcher.clone();
        handles.push(tokio::spawn(async move {
            matcher.lookup(LookupRequest::named("Bob Smith")).await
        }));
    }

    for handle in handles {
        let response = handle.await.expect("lookup task completes");
        assert!(response.is_success());
    }

    // No dedup across invocations: eight lookups, eight remote calls.
    assert_eq!(source.calls().len(), 8);
}
