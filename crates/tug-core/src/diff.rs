//! Unified diff generation utilities.
//!
//! Produces a single-hunk unified diff between two versions of a file. The
//! hunk covers everything between the longest common line prefix and suffix,
//! with up to [`CONTEXT_LINES`] lines of context on each side. Template
//! migrations touch a handful of nearby lines, so a single hunk is enough
//! for review output.

/// Lines of unchanged context printed around the changed region.
pub const CONTEXT_LINES: usize = 3;

/// Generate a unified diff for one file.
///
/// Returns an empty string when the texts are identical.
pub fn generate_unified_diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let max_suffix = old_lines.len().min(new_lines.len()) - prefix;
    let suffix = old_lines
        .iter()
        .rev()
        .zip(new_lines.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let ctx_start = prefix.saturating_sub(CONTEXT_LINES);
    let old_changed_end = old_lines.len() - suffix;
    let new_changed_end = new_lines.len() - suffix;
    let old_ctx_end = (old_changed_end + CONTEXT_LINES).min(old_lines.len());
    let new_ctx_end = (new_changed_end + CONTEXT_LINES).min(new_lines.len());

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{}\n", path));
    diff.push_str(&format!("+++ b/{}\n", path));
    diff.push_str(&format!(
        "@@ -{},{} +{},{} @@\n",
        ctx_start + 1,
        old_ctx_end - ctx_start,
        ctx_start + 1,
        new_ctx_end - ctx_start
    ));

    for line in &old_lines[ctx_start..prefix] {
        diff.push_str(&format!(" {}\n", line));
    }
    for line in &old_lines[prefix..old_changed_end] {
        diff.push_str(&format!("-{}\n", line));
    }
    for line in &new_lines[prefix..new_changed_end] {
        diff.push_str(&format!("+{}\n", line));
    }
    for line in &old_lines[old_changed_end..old_ctx_end] {
        diff.push_str(&format!(" {}\n", line));
    }

    diff
}

// ============================================================================
// Tests
// ============================================================================
