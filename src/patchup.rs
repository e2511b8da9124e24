//! Post-print text patch-up for fast-path promotions.
//!
//! A fast-path promotion leaves its tag clean, so the printer reproduces the
//! selector as written. Each pending [`Replacement`] then appends `=true` to
//! the first free occurrence of its selector: a whole token that is not
//! already followed by `=`.

use crate::ops::promote::Replacement;

/// Characters that continue a path token on either side of a match.
fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '$' | '/' | ':' | '=')
}

/// Apply `replacements` to `text` in order.
///
/// A replacement with no free occurrence left is skipped, so patching text
/// that already reads `data-test-foo=true` changes nothing.
///
/// Matching is purely textual and ignores `Replacement::loc`. An earlier
/// comment or HTML attribute spelling the same selector receives the
/// `=true` instead of the mustache argument.
pub fn apply_replacements(text: &str, replacements: &[Replacement]) -> String {
    let mut output = text.to_string();
    for replacement in replacements {
        if let Some(end) = find_free_occurrence(&output, &replacement.original) {
            output.insert_str(end, "=true");
        } else {
            tracing::debug!("no occurrence of `{}` left to patch", replacement.original);
        }
    }
    output
}

/// Byte offset just past the first whole-token occurrence of `needle`.
fn find_free_occurrence(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.match_indices(needle).find_map(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        let free = !before.is_some_and(is_token_char) && !after.is_some_and(is_token_char);
        free.then_some(end)
    })
}
