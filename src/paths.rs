//! Vault-relative paths for note files and wiki links.

/// Canonical vault path: forward slashes only, no empty segments, no leading
/// or trailing separator, non-breaking spaces replaced. The vault root is `/`.
pub fn normalize_path(path: &str) -> String {
    let cleaned: String = path
        .chars()
        .map(|c| match c {
            '\\' => '/',
            '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        })
        .collect();
    let joined = cleaned
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Storage path of a note: `<folder>/<file_name>.md`, normalized.
pub fn build_file_path(folder: &str, file_name: &str) -> String {
    let full = if folder.is_empty() {
        format!("{file_name}.md")
    } else {
        format!("{folder}/{file_name}.md")
    };
    normalize_path(&full)
}

/// Link target used inside `[[...]]`. No extension, not normalized.
pub fn build_link_path(folder: &str, file_name: &str) -> String {
    if folder.is_empty() {
        file_name.to_string()
    } else {
        format!("{folder}/{file_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_file_path() {
        assert_eq!(build_file_path("", "2026-01-06"), "2026-01-06.md");
        assert_eq!(build_file_path("Daily", "2026-01-06"), "Daily/2026-01-06.md");
        assert_eq!(
            build_file_path("Journal/Daily", "2026/01/06"),
            "Journal/Daily/2026/01/06.md"
        );
    }

    #[test]
    fn test_build_file_path_collapses_separators() {
        assert_eq!(build_file_path("Daily", "/2026//01/"), "Daily/2026/01/.md");
        assert_eq!(build_file_path("Daily\\Notes", "x"), "Daily/Notes/x.md");
    }

    #[test]
    fn test_build_link_path_is_verbatim() {
        assert_eq!(build_link_path("", "2026 - Week 2"), "2026 - Week 2");
        assert_eq!(build_link_path("Weekly", "2026 - Week 2"), "Weekly/2026 - Week 2");
        assert_eq!(build_link_path("Daily", "a//b"), "Daily/a//b");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("//Notes///Daily//"), "Notes/Daily");
        assert_eq!(normalize_path("Notes\u{00A0}Daily"), "Notes Daily");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }
}
