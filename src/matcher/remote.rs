use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::domain::CandidateRecord;
use crate::config::RatingsConfig;

/// Prefix the ratings service expects on a school id before base64 encoding.
const SCHOOL_ID_PREFIX: &str = "School-";

/// Teacher-search document sent with every lookup. The field list mirrors
/// what the badge UI renders: rating averages, tags, and the single most
/// useful review with its optional professor reply.
const TEACHER_SEARCH_QUERY: &str = r#"query NewSearchTeachersQuery(
$query: TeacherSearchQuery!) {
    newSearch {
        teachers(query: $query) {
            didFallback
            edges {
                cursor
                node {
                    id
                    legacyId
                    firstName
                    lastName
                    avgRatingRounded
                    numRatings
                    wouldTakeAgainPercentRounded
                    wouldTakeAgainCount
                    teacherRatingTags {
                        id
                        legacyId
                        tagCount
                        tagName
                    }
                    mostUsefulRating {
                        id
                        class
                        isForOnlineClass
                        legacyId
                        comment
                        helpfulRatingRounded
                        ratingTags
                        grade
                        date
                        iWouldTakeAgain
                        qualityRating
                        difficultyRatingRounded
                        teacherNote{
                            id
                            comment
                            createdAt
                            class
                        }
                        thumbsDownTotal
                        thumbsUpTotal
                    }
                    avgDifficultyRounded
                    school {
                        name
                        id
                    }
                    department
                }
            }
        }
    }
}"#;

/// Encodes a raw numeric school id into the opaque form the search query
/// takes: base64 of `School-<id>`.
pub fn encode_school_id(raw: &str) -> String {
    BASE64.encode(format!("{SCHOOL_ID_PREFIX}{raw}"))
}

#[derive(Debug)]
pub enum RemoteError {
    Http(reqwest::Error),
    Status(StatusCode),
    Shape(&'static str),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Http(err) => write!(f, "ratings request failed: {err}"),
            RemoteError::Status(status) => {
                write!(f, "ratings service answered with status {status}")
            }
            RemoteError::Shape(path) => {
                write!(f, "ratings response missing expected field '{path}'")
            }
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::Http(err) => Some(err),
            RemoteError::Status(_) | RemoteError::Shape(_) => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

/// Source of professor candidates for a normalized search name. Fronts the
/// live GraphQL client so the request handler and scan task can run against
/// an in-memory stand-in under test.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn search(
        &self,
        text: &str,
        school_id: &str,
    ) -> Result<Vec<CandidateRecord>, RemoteError>;
}

/// Live client for the ratings GraphQL endpoint. One POST per lookup, no
/// retries, no pagination: the first page of edges is all the filter sees.
pub struct RatingsClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    auth_token: String,
    origin: String,
}

impl RatingsClient {
    pub fn new(config: &RatingsConfig) -> Self {
        let origin = config.graphql_url.origin().ascii_serialization();
        Self {
            http: reqwest::Client::new(),
            endpoint: config.graphql_url.clone(),
            auth_token: config.auth_token.clone(),
            origin,
        }
    }
}

#[async_trait]
impl CandidateSource for RatingsClient {
    async fn search(
        &self,
        text: &str,
        school_id: &str,
    ) -> Result<Vec<CandidateRecord>, RemoteError> {
        let payload = SearchPayload {
            query: TEACHER_SEARCH_QUERY,
            variables: SearchVariables {
                query: TeacherSearchQuery { text, school_id },
            },
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(header::AUTHORIZATION, self.auth_token.as_str())
            .header(header::ACCEPT, "application/json")
            .header(header::ORIGIN, self.origin.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let envelope: SearchEnvelope = response.json().await?;
        let candidates = extract_candidates(envelope)?;
        debug!(%text, count = candidates.len(), "ratings search returned");
        Ok(candidates)
    }
}

#[derive(Serialize)]
struct SearchPayload<'a> {
    query: &'static str,
    variables: SearchVariables<'a>,
}

#[derive(Serialize)]
struct SearchVariables<'a> {
    query: TeacherSearchQuery<'a>,
}

#[derive(Serialize)]
struct TeacherSearchQuery<'a> {
    text: &'a str,
    #[serde(rename = "schoolID")]
    school_id: &'a str,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeData {
    #[serde(default)]
    new_search: Option<NewSearch>,
}

#[derive(Deserialize)]
struct NewSearch {
    #[serde(default)]
    teachers: Option<TeacherConnection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeacherConnection {
    #[serde(default)]
    edges: Vec<TeacherEdge>,
}

#[derive(Deserialize)]
struct TeacherEdge {
    // Pagination cursor, returned by the service but never followed.
    #[serde(default)]
    #[allow(dead_code)]
    cursor: Option<String>,
    node: CandidateRecord,
}

fn extract_candidates(envelope: SearchEnvelope) -> Result<Vec<CandidateRecord>, RemoteError> {
    let teachers = envelope
        .data
        .ok_or(RemoteError::Shape("data"))?
        .new_search
        .ok_or(RemoteError::Shape("data.newSearch"))?
        .teachers
        .ok_or(RemoteError::Shape("data.newSearch.teachers"))?;

    Ok(teachers.edges.into_iter().map(|edge| edge.node).collect())
}
