use serde::{Deserialize, Serialize};

/// One professor record as returned by the ratings search service.
///
/// Everything beyond the name and department is a ratings summary the
/// service may omit for sparsely-reviewed professors, so those fields
/// tolerate absence. Records are never mutated after deserialization;
/// the candidate filter only borrows them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub legacy_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub avg_rating_rounded: Option<f64>,
    #[serde(default)]
    pub avg_difficulty_rounded: Option<f64>,
    #[serde(default)]
    pub num_ratings: Option<u32>,
    #[serde(default)]
    pub would_take_again_percent_rounded: Option<f64>,
    #[serde(default)]
    pub would_take_again_count: Option<i64>,
    #[serde(default)]
    pub school: Option<SchoolRef>,
    #[serde(default)]
    pub teacher_rating_tags: Vec<RatingTag>,
    #[serde(default)]
    pub most_useful_rating: Option<MostUsefulRating>,
}

impl CandidateRecord {
    /// Builds a minimal record with just the fields the filter inspects.
    pub fn named(first: &str, last: &str, department: Option<&str>) -> Self {
        Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
            department: department.map(str::to_string),
            ..Self::default()
        }
    }
}

/// School reference attached to a candidate, used for deep links only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Aggregated review tag, e.g. "Tough grader" with a count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingTag {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub legacy_id: Option<i64>,
    #[serde(default)]
    pub tag_count: Option<u32>,
    #[serde(default)]
    pub tag_name: String,
}

/// The single review the service flags as most useful for a professor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostUsefulRating {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub legacy_id: Option<i64>,
    #[serde(default, rename = "class")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub is_for_online_class: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub helpful_rating_rounded: Option<f64>,
    #[serde(default)]
    pub rating_tags: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub i_would_take_again: Option<bool>,
    #[serde(default)]
    pub quality_rating: Option<f64>,
    #[serde(default)]
    pub difficulty_rating_rounded: Option<f64>,
    #[serde(default)]
    pub teacher_note: Option<TeacherNote>,
    #[serde(default)]
    pub thumbs_up_total: Option<i64>,
    #[serde(default)]
    pub thumbs_down_total: Option<i64>,
}

/// Professor's public reply attached to a review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherNote {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "class")]
    pub class_name: Option<String>,
}
