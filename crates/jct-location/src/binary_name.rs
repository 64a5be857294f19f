use std::path::{Path, PathBuf};

use crate::kind::Kind;

/// Convert a dotted binary name (`pkg.subpkg.Class`) into a relative path,
/// appending `kind`'s canonical extension to the final segment.
///
/// This is the inverse of [`relative_path_to_binary_name`] for any `kind`.
pub fn binary_name_to_relative_path(binary_name: &str, kind: Kind) -> PathBuf {
    let mut segments: Vec<&str> = binary_name.split('.').collect();
    let last = segments.pop().unwrap_or("");
    let mut path = PathBuf::new();
    for segment in segments {
        path.push(segment);
    }
    path.push(format!("{last}{}", kind.extension()));
    path
}

/// Convert a relative path back into a dotted binary name by stripping
/// `kind`'s canonical extension from the final segment and joining the
/// remaining segments with `.`.
///
/// Returns `None` if the final segment does not carry `kind`'s extension.
pub fn relative_path_to_binary_name(path: &Path, kind: Kind) -> Option<String> {
    let mut segments: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let last = segments.pop()?;
    let stripped = last.strip_suffix(kind.extension())?;
    segments.push(stripped.to_string());
    Some(segments.join("."))
}

/// Returns `true` if `candidate` is a syntactically valid Java module
/// identifier segment: non-empty, starting with an alphabetic character or
/// underscore, and containing only alphanumerics, `_`, or `$`.
///
/// Dotted module names (`com.example.mod`) are valid as a whole; each
/// dot-separated segment is checked independently.
pub fn is_valid_module_name(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    candidate.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}

/// Extract a leading `module-name/` token from `name`: `<name>/<rest>` where
/// `<name>` is a valid module identifier. An empty remainder is legal
/// (`"m.one/"` yields `("m.one", "")`).
///
/// Returns `None` if there is no `/`, or if the text before it is not a valid
/// module identifier.
pub fn try_extract_module_prefix(name: &str) -> Option<(&str, &str)> {
    let (module, rest) = name.split_once('/')?;
    is_valid_module_name(module).then_some((module, rest))
}
