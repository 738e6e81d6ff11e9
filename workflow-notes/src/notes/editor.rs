//! Line-level edits to existing note bodies.

/// Insert `new_line` right after the first line equal to `heading` (both
/// compared trimmed). Without such a line, `new_line` is appended after a
/// newline. Calling twice inserts twice.
pub fn insert_under_heading(body: &str, heading: &str, new_line: &str) -> String {
    let heading = heading.trim();
    let mut lines: Vec<&str> = body.split('\n').collect();

    match lines.iter().position(|l| l.trim() == heading) {
        Some(idx) => {
            lines.insert(idx + 1, new_line);
            lines.join("\n")
        }
        None => append_line(body, new_line),
    }
}

/// Append `line` after a newline at the end of `body`
pub fn append_line(body: &str, line: &str) -> String {
    format!("{}\n{}", body, line)
}
