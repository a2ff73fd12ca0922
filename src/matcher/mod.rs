pub mod domain;
pub mod filter;
pub mod normalizer;
pub mod remote;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, warn};

use domain::CandidateRecord;
use remote::CandidateSource;

/// Lookup request as it arrives over the overlay boundary. `professorName`
/// is required; a missing or blank value fails fast without touching the
/// network. Field names stay camelCase to match the overlay message
/// contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    #[serde(default)]
    pub professor_name: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Already-encoded school id; defaults to the configured school.
    #[serde(default, rename = "schoolID")]
    pub school_id: Option<String>,
}

impl LookupRequest {
    pub fn named(professor_name: impl Into<String>) -> Self {
        Self {
            professor_name: professor_name.into(),
            ..Self::default()
        }
    }
}

/// Single outcome of a lookup. Serializes to the wire shapes the overlay
/// consumes: `{"success":true,"professor":{..}}` or
/// `{"success":false,"error":"..","searchTerm":"..","convertedName":".."}`.
#[derive(Debug, Clone)]
pub enum LookupResponse {
    Found {
        professor: CandidateRecord,
    },
    NotFound {
        error: String,
        search_term: Option<String>,
        converted_name: Option<String>,
    },
}

impl LookupResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupResponse::Found { .. })
    }

    fn not_found(search_term: &str, converted_name: &str) -> Self {
        LookupResponse::NotFound {
            error: "Professor not found".to_string(),
            search_term: Some(search_term.to_string()),
            converted_name: Some(converted_name.to_string()),
        }
    }

    fn missing_name() -> Self {
        LookupResponse::NotFound {
            error: "Professor name is required".to_string(),
            search_term: None,
            converted_name: None,
        }
    }
}

impl Serialize for LookupResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LookupResponse::Found { professor } => {
                let mut state = serializer.serialize_struct("LookupResponse", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("professor", professor)?;
                state.end()
            }
            LookupResponse::NotFound {
                error,
                search_term,
                converted_name,
            } => {
                let fields = 2
                    + usize::from(search_term.is_some())
                    + usize::from(converted_name.is_some());
                let mut state = serializer.serialize_struct("LookupResponse", fields)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                if let Some(term) = search_term {
                    state.serialize_field("searchTerm", term)?;
                }
                if let Some(name) = converted_name {
                    state.serialize_field("convertedName", name)?;
                }
                state.end()
            }
        }
    }
}

/// Request handler driving normalize -> remote search -> filter for one
/// instructor name. Stateless per invocation and safe to share across
/// concurrent lookups; nothing is cached between calls, so the same name
/// in two cells costs two remote round-trips.
pub struct ProfessorMatcher {
    source: Arc<dyn CandidateSource>,
    default_school_id: String,
}

impl ProfessorMatcher {
    /// `default_school_id` is the already-encoded id used when a request
    /// does not carry one.
    pub fn new(source: Arc<dyn CandidateSource>, default_school_id: impl Into<String>) -> Self {
        Self {
            source,
            default_school_id: default_school_id.into(),
        }
    }

    /// Never fails across the boundary: transport errors, malformed
    /// payloads, empty result sets, and filter misses all come back as the
    /// not-found shape, with diagnostics left to tracing.
    pub async fn lookup(&self, request: LookupRequest) -> LookupResponse {
        let raw_name = request.professor_name.trim();
        if raw_name.is_empty() {
            warn!("lookup rejected: professor name missing");
            return LookupResponse::missing_name();
        }

        let converted = normalizer::canonical_name(raw_name);
        let school_id = request
            .school_id
            .as_deref()
            .unwrap_or(&self.default_school_id);
        debug!(raw = raw_name, converted = %converted, "looking up professor");

        let candidates = match self.source.search(&converted, school_id).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(raw = raw_name, error = %err, "ratings lookup failed");
                return LookupResponse::not_found(raw_name, &converted);
            }
        };

        if candidates.is_empty() {
            debug!(converted = %converted, "no candidates returned");
            return LookupResponse::not_found(raw_name, &converted);
        }

        match filter::select_candidate(&candidates, &converted, request.department.as_deref()) {
            Some(record) => {
                debug!(
                    first = %record.first_name,
                    last = %record.last_name,
                    "professor matched"
                );
                LookupResponse::Found {
                    professor: record.clone(),
                }
            }
            None => LookupResponse::not_found(raw_name, &converted),
        }
    }
}
