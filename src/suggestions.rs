//! # Error Suggestions
//!
//! Builders for user-facing errors that say what went wrong and how to fix
//! it. Commands return these instead of bare `anyhow!` messages.
//!
//! ```rust,ignore
//! if !args.templates.is_dir() {
//!     return Err(suggestions::templates_not_found(&args.templates));
//! }
//! ```

use std::path::Path;

/// The template directory does not exist.
pub fn templates_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Template directory not found: {path}\n\n\
         hint: Create one subdirectory per ecosystem holding default.yml (e.g. configs/npm/default.yml)\n\
         hint: Use --templates to point at a different directory\n\
         hint: Set the DEPENDABOT_SYNC_TEMPLATES environment variable",
        path = path.display()
    )
}

/// A repository argument is not a checkout.
pub fn repository_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Repository not found: {path}\n\n\
         hint: Pass the path of a local checkout, not a remote URL\n\
         hint: Clone the repository first with 'git clone'",
        path = path.display()
    )
}

/// An indicator catalog file could not be loaded.
pub fn invalid_catalog(path: &Path, error: &crate::error::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid indicator catalog: {path}\n\
         error: {error}\n\n\
         hint: Each entry needs 'ecosystem' and a non-empty 'indicators' list\n\
         hint: Weights must be greater than 0 and at most 1\n\
         hint: Omit --catalog to use the built-in catalog",
        path = path.display()
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns the closest candidate within an edit distance of 2, provided the
/// input is not shorter than the distance itself.
pub fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(input, candidate)))
        .filter(|&(_, distance)| distance <= 2 && distance < input.len())
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, computed one row at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut current = Vec::with_capacity(previous.len());
        current.push(i + 1);
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current.push(substitution.min(deletion).min(insertion));
        }
        previous = current;
    }

    previous[b_chars.len()]
}
