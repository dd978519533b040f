//! XML whitespace helpers.
//!
//! XML whitespace is exactly space, tab, carriage return and line feed
//! (XML 1.0 §2.3 `[3] S`); Unicode whitespace such as U+00A0 is content.

/// Returns `true` for the four XML whitespace characters.
#[must_use]
pub fn is_xml_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Returns `true` if the string is empty or consists only of XML whitespace.
#[must_use]
pub fn is_all_whitespace(s: &str) -> bool {
    s.chars().all(is_xml_whitespace)
}

/// Strips leading XML whitespace.
#[must_use]
pub fn trim_left(s: &str) -> &str {
    s.trim_start_matches(is_xml_whitespace)
}

/// Strips trailing XML whitespace.
#[must_use]
pub fn trim_right(s: &str) -> &str {
    s.trim_end_matches(is_xml_whitespace)
}

/// Strips leading and trailing XML whitespace.
#[must_use]
pub fn trim_both(s: &str) -> &str {
    s.trim_matches(is_xml_whitespace)
}

/// Replaces every maximal run of XML whitespace with a single space.
///
/// Leading and trailing runs are collapsed too, not removed.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for ch in s.chars() {
        if is_xml_whitespace(ch) {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}
