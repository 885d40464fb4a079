use std::sync::LazyLock;

use regex::Regex;

use super::stream::clean_lines;

/// Returned when no cover line survives the rule cascade.
pub const FALLBACK_TITLE: &str = "未找到特定标题";

static VOLUME_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^卷[一二三四五六七八九十0-9]+[：:]").unwrap());

struct TitleRule {
    name: &'static str,
    matches: fn(&str) -> bool,
}

/// Ordered cascade; the first rule with a matching line wins, and all lines
/// are tried against a rule before moving to the next one.
const TITLE_RULES: [TitleRule; 3] = [
    TitleRule {
        name: "volume_heading",
        matches: matches_volume_heading,
    },
    TitleRule {
        name: "evidence_keyword",
        matches: matches_evidence_keyword,
    },
    TitleRule {
        name: "case_mention",
        matches: matches_case_mention,
    },
];

fn matches_volume_heading(line: &str) -> bool {
    VOLUME_HEADING_RE.is_match(line)
}

fn matches_evidence_keyword(line: &str) -> bool {
    (line.contains("书证") || line.contains("笔录")) && line.chars().count() > 5
}

fn matches_case_mention(line: &str) -> bool {
    line.contains('案')
        && line.chars().count() > 4
        && !line.contains("案件名称")
        && !line.contains("案卷")
}

pub(crate) fn extract_cover_title(cover_text: &str) -> String {
    let lines = clean_lines(cover_text);

    for rule in &TITLE_RULES {
        if let Some(line) = lines.iter().find(|line| (rule.matches)(line)) {
            tracing::debug!(rule = rule.name, "cover title rule matched");
            return line.clone();
        }
    }

    FALLBACK_TITLE.to_string()
}
