use std::sync::LazyLock;

use regex::Regex;

/// Heading the OCR pipeline writes between a volume's cover text and its
/// directory pages.
const DIRECTORY_MARKER: &str = "## 目录内容";

static DIRECTORY_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s+目录内容").unwrap());

/// Split an OCR dump into its cover block and directory block. A dump without
/// the marker is all cover; the directory block comes back empty and the
/// caller gets an empty catalog for it.
pub(super) fn split_cover_and_directory(content: &str) -> (String, String) {
    if let Some(found) = DIRECTORY_MARKER_RE.find(content) {
        let cover = &content[..found.start()];
        let directory = &content[found.end()..];
        return (cover.to_string(), directory.to_string());
    }

    // OCR sometimes glues the marker onto the end of another line, which the
    // line-anchored pattern misses.
    if let Some(pos) = content.find(DIRECTORY_MARKER) {
        let cover = &content[..pos];
        let directory = &content[pos + DIRECTORY_MARKER.len()..];
        return (cover.to_string(), directory.to_string());
    }

    (content.to_string(), String::new())
}
