//! Read and edit the YAML frontmatter block of a note.
//!
//! Hand-rolled line handling (no YAML parser): only the `aliases` key is
//! understood, everything else in the block is passed through untouched.

/// Line indices of the opening and closing `---` of the frontmatter block.
/// The block must open on the first line of the note.
fn frontmatter_bounds(lines: &[&str]) -> Option<(usize, usize)> {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return None;
    }
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| l.trim_end() == "---")
        .map(|(idx, _)| (0, idx))
}

fn is_aliases_key(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("aliases")
        .map(|rest| rest.trim_start().starts_with(':'))
        .unwrap_or(false)
}

fn quoted(alias: &str) -> String {
    format!("\"{}\"", alias.replace('"', "\\\""))
}

const DEFAULT_ITEM_INDENT: &str = "  ";

/// Split an `aliases:` line into the key part (through the colon) and its
/// trimmed inline value
fn split_key_line(line: &str) -> (&str, &str) {
    match line.find(':') {
        Some(idx) => (&line[..=idx], line[idx + 1..].trim()),
        None => (line, ""),
    }
}

/// Leading whitespace of the first block item after `key_idx`, if any
fn item_indent<'a>(lines: &[&'a str], key_idx: usize, close: usize) -> Option<&'a str> {
    lines[key_idx + 1..close]
        .iter()
        .copied()
        .find(|l| !l.trim().is_empty())
        .filter(|l| l.trim_start().starts_with("- ") || l.trim() == "-")
        .map(|l| &l[..l.len() - l.trim_start().len()])
}

/// Add `alias` to the note's `aliases` list.
///
/// Without a frontmatter block a new one is prepended. With a block but no
/// `aliases` key, the key is added right after the opening `---`. An inline
/// `[...]` list gets the alias appended inside the brackets, a scalar value
/// becomes a block list, and a block list gets a new first item indented
/// like its existing items. Repeated calls add repeated entries. Everything
/// outside the edited lines is kept byte for byte.
pub fn insert_frontmatter_alias(body: &str, alias: &str) -> String {
    let item = quoted(alias);
    let lines: Vec<&str> = body.split('\n').collect();

    let Some((open, close)) = frontmatter_bounds(&lines) else {
        return format!("---\naliases:\n{}- {}\n---\n{}", DEFAULT_ITEM_INDENT, item, body);
    };

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    let Some(key_idx) = (open + 1..close).find(|&i| is_aliases_key(lines[i])) else {
        out.insert(open + 1, format!("{}- {}", DEFAULT_ITEM_INDENT, item));
        out.insert(open + 1, "aliases:".to_string());
        return out.join("\n");
    };

    let (key, value) = split_key_line(lines[key_idx]);
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let inner = inner.trim();
        out[key_idx] = if inner.is_empty() {
            format!("{} [{}]", key, item)
        } else {
            format!("{} [{}, {}]", key, inner, item)
        };
    } else if !value.is_empty() && !value.starts_with('#') {
        out[key_idx] = key.to_string();
        out.insert(key_idx + 1, format!("{}- {}", DEFAULT_ITEM_INDENT, item));
        out.insert(key_idx + 1, format!("{}- {}", DEFAULT_ITEM_INDENT, value));
    } else {
        let indent = item_indent(&lines, key_idx, close).unwrap_or(DEFAULT_ITEM_INDENT);
        out.insert(key_idx + 1, format!("{}- {}", indent, item));
    }
    out.join("\n")
}

/// Aliases declared in the frontmatter, as a scalar, as `[a, b]` or as a block list.
pub fn frontmatter_aliases(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let Some((open, close)) = frontmatter_bounds(&lines) else {
        return Vec::new();
    };

    let mut aliases = Vec::new();
    let mut in_aliases = false;
    for line in &lines[open + 1..close] {
        if is_aliases_key(line) {
            let value = line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
            if value.starts_with('[') {
                aliases.extend(parse_inline_list(value));
                in_aliases = false;
            } else if !value.is_empty() && !value.starts_with('#') {
                aliases.push(unquote(value));
                in_aliases = false;
            } else {
                in_aliases = true;
            }
            continue;
        }
        if in_aliases {
            match line.trim_start().strip_prefix("- ") {
                Some(item) => {
                    let item = unquote(item);
                    if !item.is_empty() {
                        aliases.push(item);
                    }
                }
                None if line.trim().is_empty() => {}
                None => in_aliases = false,
            }
        }
    }
    aliases
}

/// Remove surrounding quotes from a string
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].replace("\\\"", "\"")
    } else {
        s.to_string()
    }
}

/// Parse an inline YAML list like [foo, bar, "baz qux"]
fn parse_inline_list(s: &str) -> Vec<String> {
    let s = s.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);

    inner
        .split(',')
        .map(unquote)
        .filter(|item| !item.is_empty())
        .collect()
}
