use std::sync::LazyLock;

use regex::Regex;

/// Table header words that leak into the OCR text when the scanner picks up
/// the printed directory grid. A line is dropped only on an exact match so
/// that body text containing one of these words survives.
const HEADER_WORDS: [&str; 11] = [
    "卷内文件目录",
    "顺序号",
    "文号",
    "责任者",
    "题名",
    "题",
    "名",
    "日期",
    "页号",
    "备注",
    "目录页",
];

static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+").unwrap());

static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,3}$").unwrap());

static PUNCT_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\[\]()【】\-]+$").unwrap());

static DATE_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:19|20)\d{6}(?:(?:19|20)\d{6})?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    Number,
    Date,
    Text,
}

#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub text: String,
    pub kind: LineKind,
}

/// Strip a leading `- ` / `* ` list marker the OCR layer likes to invent.
/// Bare digits are left untouched: a digit-only line is an ordinal, not a
/// marker.
fn clean_line(line: &str) -> &str {
    let trimmed = line.trim();
    match LIST_MARKER_RE.find(trimmed) {
        Some(found) => trimmed[found.end()..].trim_start(),
        None => trimmed,
    }
}

fn is_noise(line: &str) -> bool {
    if HEADER_WORDS.contains(&line) {
        return true;
    }
    if line.starts_with("###") {
        return true;
    }
    PUNCT_NOISE_RE.is_match(line)
}

/// Normalize a raw OCR block into the surviving, ordered, non-empty lines.
pub(crate) fn clean_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(clean_line)
        .filter(|line| !line.is_empty() && !is_noise(line))
        .map(ToOwned::to_owned)
        .collect()
}

fn strip_date_separators(text: &str) -> String {
    text.chars()
        .filter(|ch| !matches!(ch, '.' | '-' | '—' | '/' | ' '))
        .collect()
}

/// A line reads as a date when, separators removed, it is one 8-digit
/// `19xx`/`20xx` date or two of them run together (a date range).
pub(crate) fn is_date(text: &str) -> bool {
    DATE_DIGITS_RE.is_match(&strip_date_separators(text))
}

/// The digits of the first date on the line. Ranges keep only their leading
/// date; the tail is the range end and never names the entry.
pub(crate) fn leading_date(text: &str) -> String {
    let digits = strip_date_separators(text);
    digits.chars().take(8).collect()
}

fn classify(text: &str) -> LineKind {
    if ORDINAL_RE.is_match(text) {
        return LineKind::Number;
    }
    if is_date(text) {
        return LineKind::Date;
    }
    LineKind::Text
}

pub(crate) fn build_stream(text: &str) -> Vec<Line> {
    clean_lines(text)
        .into_iter()
        .map(|text| {
            let kind = classify(&text);
            Line { text, kind }
        })
        .collect()
}
