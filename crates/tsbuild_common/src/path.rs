//! Quoting and normalization helpers for file paths handed to the compiler.
//!
//! Paths in a compilation task are stored in their escaped form: a path that
//! contains a space is wrapped in double quotes so it survives being written
//! into a whitespace-separated command file. The helpers here are idempotent,
//! so escaping an already escaped path is a no-op and unquoting a bare path
//! returns it unchanged.

/// Wraps a path in double quotes if it contains a space.
///
/// Paths without spaces are returned untouched. A path that contains a space
/// and is already quoted is trimmed but otherwise left alone.
pub fn escape_path_if_required(path: &str) -> String {
    if !path.contains(' ') {
        return path.to_string();
    }
    let trimmed = path.trim();
    if is_quoted(trimmed) {
        trimmed.to_string()
    } else {
        format!("\"{trimmed}\"")
    }
}

/// Removes one pair of surrounding double quotes, if present.
pub fn unquote_path(path: &str) -> &str {
    let trimmed = path.trim();
    if is_quoted(trimmed) {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Ensures a directory path ends with a `/` or `\` separator.
pub fn end_with_slash(path: &str) -> String {
    if path.ends_with('/') || path.ends_with('\\') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Returns `true` if the path names a single JavaScript output file.
///
/// Used to decide whether a generic `dest` is a merged output file or an
/// output directory.
pub fn is_javascript_file(path: &str) -> bool {
    unquote_path(path).to_ascii_lowercase().ends_with(".js")
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}
