//! Path and filter utilities

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// Check if a file should be excluded based on OS-specific hidden files
pub fn is_os_hidden_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match name {
            // macOS
            ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
            // Windows
            "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" | "$RECYCLE.BIN" => true,
            // Linux
            ".directory" => true,
            _ => {
                // macOS resource forks and per-volume trash dirs
                name.starts_with("._") || name.starts_with(".Trash-")
            }
        }
    } else {
        false
    }
}

/// Returns true if the entry should be kept by the walk (not excluded).
/// The root itself is always kept so the walk can start.
pub fn should_include_in_walk(path: &Path, root: &Path, exclude_patterns: &[String]) -> bool {
    if path == root {
        return true;
    }
    if is_os_hidden_file(path) {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    for pattern in exclude_patterns {
        if glob_match(pattern, name) || glob_match(pattern, path_str) {
            return false;
        }
    }
    true
}

/// Simple glob pattern matching (supports * and ?). Every other character, `!` included, is literal.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_chars(&pattern, &text)
}

fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => {
            if rest.is_empty() {
                return true; // trailing * matches everything
            }
            (0..=text.len()).any(|skip| glob_match_chars(rest, &text[skip..]))
        }
        Some(('?', rest)) => !text.is_empty() && glob_match_chars(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && glob_match_chars(rest, &text[1..]),
    }
}

/// Final path component as UTF-8 (lossy) for filename matching.
pub fn file_name_lossy(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Validate the search root: it must exist and be a directory. The path is returned as given
/// (not canonicalized) so reported paths keep the caller's prefix.
pub fn check_search_root(root: &Path) -> Result<PathBuf> {
    let meta = std::fs::metadata(root)
        .with_context(|| format!("search root {} is not accessible", root.display()))?;
    if !meta.is_dir() {
        bail!("search root {} is not a directory", root.display());
    }
    Ok(root.to_path_buf())
}
