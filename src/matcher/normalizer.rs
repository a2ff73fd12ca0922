/// Rewrites a scraped instructor name into the `"First Last"` form the
/// ratings search expects.
///
/// Handles the two shapes registration pages produce: `"Last, First Middle"`
/// (the last name is kept whole, hyphens included) and `"First Last"` with
/// any number of trailing last-name tokens. Anything with fewer than two
/// tokens is returned as-is. This is a best-effort heuristic, not a name
/// grammar: in the space-separated form the first token is always taken as
/// the first name.
pub fn canonical_name(raw: &str) -> String {
    let cleaned = strip_primary_marker(raw.trim());
    let cleaned = cleaned.trim();

    if let Some((last, first_middle)) = cleaned.split_once(',') {
        if let Some(first) = first_middle.split_whitespace().next() {
            return format!("{} {}", first, last.trim());
        }
        // Comma with nothing after it: fall through to the token path.
    }

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() < 2 {
        return cleaned.to_string();
    }

    format!("{} {}", tokens[0], tokens[1..].join(" "))
}

/// Drops a literal `(Primary)` marker, case-insensitively, first occurrence
/// only. Registration pages append it to the lead instructor of a section.
fn strip_primary_marker(value: &str) -> String {
    const MARKER: &str = "(Primary)";
    let len = MARKER.len();
    if value.len() >= len {
        for start in 0..=value.len() - len {
            if value.is_char_boundary(start)
                && value.is_char_boundary(start + len)
                && value[start..start + len].eq_ignore_ascii_case(MARKER)
            {
                let mut stripped = String::with_capacity(value.len() - len);
                stripped.push_str(&value[..start]);
                stripped.push_str(&value[start + len..]);
                return stripped;
            }
        }
    }
    value.to_string()
}
