use super::domain::CandidateRecord;

/// Picks at most one candidate for a canonical `"First Last"` search name.
///
/// A candidate is kept when both names overlap: first names by equality,
/// prefix in either direction, or a one-letter initial; last names by
/// equality, substring in either direction, or per hyphen-delimited segment
/// when either side is hyphenated. Ties go to the department hint when one
/// is supplied, otherwise to the earliest candidate in the service's result
/// ordering. The returned reference always points into `candidates`.
pub fn select_candidate<'a>(
    candidates: &'a [CandidateRecord],
    canonical: &str,
    department_hint: Option<&str>,
) -> Option<&'a CandidateRecord> {
    let tokens: Vec<&str> = canonical.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }

    let search_first = tokens[0].to_lowercase();
    let search_last = tokens[1..].join(" ").to_lowercase();

    let name_matches: Vec<&CandidateRecord> = candidates
        .iter()
        .filter(|candidate| {
            first_name_matches(&candidate.first_name.to_lowercase(), &search_first)
                && last_name_matches(&candidate.last_name.to_lowercase(), &search_last)
        })
        .collect();

    if name_matches.len() > 1 {
        if let Some(hint) = department_hint.map(str::trim).filter(|hint| !hint.is_empty()) {
            let hint = hint.to_lowercase();
            let by_department = name_matches
                .iter()
                .find(|candidate| {
                    let department = candidate
                        .department
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase();
                    department.contains(&hint) || hint.contains(&department)
                })
                .copied();
            if by_department.is_some() {
                return by_department;
            }
        }
    }

    // With several matches and no usable department, the earliest match in
    // the source ordering wins. Known heuristic weakness, kept as-is.
    name_matches.first().copied()
}

fn first_name_matches(candidate: &str, search: &str) -> bool {
    candidate == search
        || candidate.starts_with(search)
        || search.starts_with(candidate)
        || (search.chars().count() == 1 && candidate.starts_with(search))
}

fn last_name_matches(candidate: &str, search: &str) -> bool {
    if candidate == search || candidate.contains(search) || search.contains(candidate) {
        return true;
    }

    let segments_overlap = |hyphenated: &str, other: &str| {
        hyphenated
            .split('-')
            .any(|segment| other.contains(segment) || segment.contains(other))
    };

    (search.contains('-') && segments_overlap(search, candidate))
        || (candidate.contains('-') && segments_overlap(candidate, search))
}
