//! Unique display names for curves loaded from different files.

use std::collections::HashSet;
use std::path::Path;

fn stem(file: &str) -> &str {
    Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
}

/// Shortest trailing `_`-separated part of `new_file`'s stem that no
/// existing file shares at the same position. Empty when nothing
/// distinguishes it.
pub fn smart_suffix(new_file: &str, existing_files: &[&str]) -> String {
    if new_file.is_empty() || existing_files.is_empty() {
        return String::new();
    }
    let new_parts: Vec<&str> = stem(new_file).split('_').collect();
    let existing: Vec<Vec<&str>> = existing_files
        .iter()
        .map(|f| stem(f).split('_').collect())
        .collect();

    for i in (0..new_parts.len()).rev() {
        let candidate = new_parts[i..].join("_");
        let taken = existing
            .iter()
            .any(|parts| parts.len() > i && parts[i..].join("_") == candidate);
        if !taken {
            return candidate;
        }
    }
    String::new()
}

/// `base`, or a suffixed variant that is not in `taken`.
///
/// The first clash tries `base-<suffix>` (or `base(<file stem>)` without a
/// suffix); later clashes count up `base-<suffix>_N`.
pub fn unique_name(
    base: &str,
    taken: &HashSet<&str>,
    source_file: &str,
    existing_files: &[&str],
) -> String {
    let suffix = smart_suffix(source_file, existing_files);
    let mut candidate = base.to_string();
    let mut n = 1;
    while taken.contains(candidate.as_str()) {
        candidate = if n == 1 {
            if suffix.trim().is_empty() {
                format!("{base}({})", stem(source_file))
            } else {
                format!("{base}-{suffix}")
            }
        } else {
            format!("{base}-{suffix}_{n}")
        };
        n += 1;
    }
    candidate
}
