// 🪪 Identity Cleaner - company_id + display name normalization
//
// Both cleaners fail soft: an unusable value comes back as None and the
// caller decides whether to drop the row or repair it from a sibling.

// ============================================================================
// COMPANY IDENTIFIER
// ============================================================================

/// Clean a raw company identifier into a lowercase hex token.
///
/// Returns None when the value is missing or blank, contains the `*`
/// wildcard, or has anything outside `[0-9a-f]` once trimmed, lower-cased
/// and stripped of internal whitespace.
pub fn clean_identifier(raw: Option<&str>) -> Option<String> {
    let raw = raw?;

    if raw.contains('*') {
        return None;
    }

    let cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(cleaned)
}

/// True when `value` is already a clean identifier (non-empty lowercase hex).
pub fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

// ============================================================================
// COMPANY NAME
// ============================================================================

/// Clean a raw display name.
///
/// Whitespace runs collapse to a single space. A name with no letter at all
/// ("", "1234", "#$%") is unusable and returns None; anything else comes
/// back title-cased.
pub fn clean_name(raw: Option<&str>) -> Option<String> {
    let collapsed = raw?.split_whitespace().collect::<Vec<_>>().join(" ");

    if !collapsed.chars().any(char::is_alphabetic) {
        return None;
    }

    Some(title_case(&collapsed))
}

/// Upper-case the first letter of every word, lower-case the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// "o'neil 3m" becomes "O'Neil 3M".
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_letter = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
