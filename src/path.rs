//! Path utilities for ecosystem detection
//!
//! Repository trees arrive as flat lists of slash-separated paths relative to
//! the repository root (`src/app/package.json`). These helpers derive the
//! containing directory in dependabot's `/`-rooted form and match paths against
//! indicator patterns.

use crate::error::Result;
use glob::{MatchOptions, Pattern};

/// The directory dependabot uses for the repository root
pub const ROOT_DIRECTORY: &str = "/";

/// `*` and `?` never match a `/`, like a shell glob over one path segment.
const SEGMENT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Strip a leading `./` or `/` so every path is relative to the root
pub fn normalize_path(path: &str) -> &str {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.trim_start_matches('/')
}

/// Final component of a path
pub fn base_name(path: &str) -> &str {
    let path = normalize_path(path);
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory containing `path`, rooted at `/`
///
/// # Examples
///
/// ```
/// use dependabot_sync::path::containing_directory;
///
/// assert_eq!(containing_directory("package.json"), "/");
/// assert_eq!(containing_directory("packages/ui/package.json"), "/packages/ui");
/// ```
pub fn containing_directory(path: &str) -> String {
    let path = normalize_path(path);
    match path.rfind('/') {
        Some(idx) if idx > 0 => format!("/{}", &path[..idx]),
        _ => ROOT_DIRECTORY.to_string(),
    }
}

/// Whether a pattern uses glob syntax rather than a literal file name
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Match a path against a compiled glob, one segment per `*`
pub fn glob_match(pattern: &Pattern, path: &str) -> bool {
    pattern.matches_with(path, SEGMENT_MATCH)
}

/// An indicator pattern compiled for repeated matching
#[derive(Debug, Clone, PartialEq)]
pub enum PathMatcher {
    /// Exact file name or full path
    Literal(String),
    /// Shell glob, one segment per `*`
    Glob(Pattern),
}

impl PathMatcher {
    /// Compile `pattern`, failing only on an invalid glob
    pub fn new(pattern: &str) -> Result<Self> {
        if has_wildcard(pattern) {
            Ok(Self::Glob(Pattern::new(pattern)?))
        } else {
            Ok(Self::Literal(pattern.to_string()))
        }
    }

    /// Whether `path` is evidence for this pattern
    ///
    /// Globs are tried against the base name first and then the full path.
    /// Literals match the full path or the base name exactly.
    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_path(path);
        match self {
            Self::Literal(literal) => path == literal || base_name(path) == literal,
            Self::Glob(pattern) => {
                glob_match(pattern, base_name(path)) || glob_match(pattern, path)
            }
        }
    }
}

/// Whether `path` is evidence for an indicator `pattern`
///
/// Compiles `pattern` on every call; see [`PathMatcher`] for the reusable
/// form. An invalid glob never matches.
pub fn matches_indicator(path: &str, pattern: &str) -> bool {
    PathMatcher::new(pattern).is_ok_and(|matcher| matcher.matches(path))
}
