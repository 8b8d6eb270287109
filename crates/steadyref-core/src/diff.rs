//! Unified diff generation utilities.
//!
//! Produces a single zero-context hunk covering every line an edit touches.
//! Suggested fixes are local (one declaration plus one use site, or one
//! rewritten function body), so one hunk per file keeps previews short.

/// Generate a unified diff between `before` and `after` for `path`.
///
/// Returns an empty string when the two texts are identical.
pub fn generate_unified_diff(path: &str, before: &str, after: &str) -> String {
    let old_lines: Vec<&str> = before.lines().collect();
    let new_lines: Vec<&str> = after.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let removed = &old_lines[prefix..old_lines.len() - suffix];
    let added = &new_lines[prefix..new_lines.len() - suffix];
    if removed.is_empty() && added.is_empty() {
        return String::new();
    }

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{}\n", path));
    diff.push_str(&format!("+++ b/{}\n", path));
    diff.push_str(&format!(
        "@@ -{} +{} @@\n",
        hunk_range(prefix, removed.len()),
        hunk_range(prefix, added.len())
    ));
    for line in removed {
        diff.push_str(&format!("-{}\n", line));
    }
    for line in added {
        diff.push_str(&format!("+{}\n", line));
    }
    diff
}

/// Format a hunk range. An empty range names the line *before* the change.
fn hunk_range(prefix: usize, count: usize) -> String {
    if count == 0 {
        format!("{},0", prefix)
    } else {
        format!("{},{}", prefix + 1, count)
    }
}

// ============================================================================
// Tests
// ============================================================================
