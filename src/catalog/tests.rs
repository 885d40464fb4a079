use super::*;
use super::anchors::{detect_anchor_mode, find_anchor_chain};
use super::stream::{LineKind, build_stream, is_date, leading_date};

fn block(lines: &[&str]) -> String {
    lines.join("\n")
}

#[test]
fn classifies_ordinals_dates_and_text() {
    let stream = build_stream(&block(&[
        "7",
        "007",
        "123",
        "1234",
        "12a",
        "20210105",
        "2021.01.05",
        "2021-01-05",
        "2021/01/05",
        "19991231",
        "立案决定书",
    ]));

    let kinds = stream.iter().map(|line| line.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            LineKind::Number,
            LineKind::Number,
            LineKind::Number,
            LineKind::Text,
            LineKind::Text,
            LineKind::Date,
            LineKind::Date,
            LineKind::Date,
            LineKind::Date,
            LineKind::Date,
            LineKind::Text,
        ]
    );
}

#[test]
fn date_ranges_require_two_plausible_dates() {
    assert!(is_date("20210105—20211231"));
    assert!(is_date("20210105-20211231"));
    assert!(!is_date("20210105-00000000"));
    assert!(!is_date("21000101"));
    assert!(!is_date("202101"));
    assert!(!is_date("2021010"));
}

#[test]
fn leading_date_keeps_only_the_range_start() {
    assert_eq!(leading_date("20210105—20211231"), "20210105");
    assert_eq!(leading_date("2021.01.05"), "20210105");
}

#[test]
fn noise_lines_are_filtered_out() {
    let stream = build_stream(&block(&[
        "### 卷内文件目录",
        "顺序号",
        "备注",
        "(",
        "【】",
        "---",
        "- 立案决定书",
        "- 1",
    ]));

    assert_eq!(stream.len(), 2);
    assert_eq!(stream[0].text, "立案决定书");
    assert_eq!(stream[0].kind, LineKind::Text);
    assert_eq!(stream[1].text, "1");
    assert_eq!(stream[1].kind, LineKind::Number);
}

#[test]
fn start_anchored_directory_yields_one_entry_per_ordinal() {
    let directory = block(&[
        "顺序号",
        "1",
        "立案决定书",
        "20210105",
        "3",
        "2",
        "起诉书",
        "20210110",
        "5",
    ]);

    let catalog = extract_catalog("", &directory);
    assert_eq!(catalog.anchor_mode, Some(AnchorMode::StartAnchored));
    assert_eq!(catalog.entries.len(), 2);

    let first = &catalog.entries[0];
    assert_eq!(first.seq, 1);
    assert_eq!(first.title, "立案决定书");
    assert_eq!(first.date.as_deref(), Some("20210105"));
    assert_eq!(first.page.as_deref(), Some("3"));
    assert!(first.remark.is_empty());

    let second = &catalog.entries[1];
    assert_eq!(second.seq, 2);
    assert_eq!(second.title, "起诉书");
    assert_eq!(second.date.as_deref(), Some("20210110"));
    assert_eq!(second.page.as_deref(), Some("5"));
}

#[test]
fn directory_without_ordinal_one_is_unparsable() {
    let catalog = extract_catalog("", &block(&["2", "起诉书", "3", "判决书"]));
    assert_eq!(catalog.anchor_mode, None);
    assert!(catalog.entries.is_empty());

    let catalog = extract_catalog("", &block(&["起诉书", "判决书"]));
    assert!(catalog.entries.is_empty());
}

#[test]
fn end_anchored_directory_puts_content_before_the_ordinal() {
    let directory = block(&[
        "立案决定书",
        "20210105",
        "1",
        "起诉书",
        "20210110",
        "2",
    ]);

    let catalog = extract_catalog("", &directory);
    assert_eq!(catalog.anchor_mode, Some(AnchorMode::EndAnchored));
    assert_eq!(catalog.entries.len(), 2);
    assert_eq!(catalog.entries[0].title, "立案决定书");
    assert_eq!(catalog.entries[0].date.as_deref(), Some("20210105"));
    assert_eq!(catalog.entries[1].title, "起诉书");
    assert_eq!(catalog.entries[1].date.as_deref(), Some("20210110"));
}

#[test]
fn anchor_mode_gap_boundary_is_five_lines() {
    let near = block(&["20210101", "甲", "乙", "丙", "1", "文书", "2", "文书二"]);
    let catalog = extract_catalog("", &near);
    assert_eq!(catalog.anchor_mode, Some(AnchorMode::EndAnchored));

    let far = block(&[
        "20210101", "甲", "乙", "丙", "丁", "1", "文书", "2", "文书二",
    ]);
    let catalog = extract_catalog("", &far);
    assert_eq!(catalog.anchor_mode, Some(AnchorMode::StartAnchored));
}

#[test]
fn stray_duplicate_numbers_do_not_break_the_chain() {
    let directory = block(&["2", "1", "立案决定书", "2", "搜查笔录", "3", "扣押清单"]);

    let catalog = extract_catalog("", &directory);
    let seqs = catalog.entries.iter().map(|entry| entry.seq).collect::<Vec<_>>();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(catalog.entries[0].title, "立案决定书");
    assert_eq!(catalog.entries[1].title, "搜查笔录");
    assert_eq!(catalog.entries[2].title, "扣押清单");
}

#[test]
fn chain_positions_and_ordinals_are_strictly_increasing() {
    let stream = build_stream(&block(&[
        "1", "甲", "3", "2", "乙", "2", "3", "丙", "1", "4", "丁",
    ]));
    let chain = find_anchor_chain(&stream);

    assert!(!chain.is_empty());
    for pair in chain.windows(2) {
        assert!(pair[1].seq == pair[0].seq + 1);
        assert!(pair[1].pos > pair[0].pos);
    }
}

#[test]
fn start_anchored_spans_partition_the_stream() {
    let stream = build_stream(&block(&[
        "1",
        "立案决定书",
        "20210105",
        "2",
        "起诉书",
        "3",
        "判决书",
        "20210301",
    ]));
    let chain = find_anchor_chain(&stream);
    assert_eq!(detect_anchor_mode(&stream, &chain), AnchorMode::StartAnchored);

    let mut covered = vec![false; stream.len()];
    for (index, anchor) in chain.iter().enumerate() {
        assert!(!covered[anchor.pos]);
        covered[anchor.pos] = true;

        let end = chain
            .get(index + 1)
            .map(|next| next.pos)
            .unwrap_or(stream.len());
        for slot in &mut covered[anchor.pos + 1..end] {
            assert!(!*slot);
            *slot = true;
        }
    }
    assert!(covered.into_iter().all(|slot| slot));
}

#[test]
fn empty_spans_are_dropped_silently() {
    let catalog = extract_catalog("", &block(&["1", "2", "判决书"]));
    assert_eq!(catalog.entries.len(), 1);
    assert_eq!(catalog.entries[0].seq, 2);
    assert_eq!(catalog.entries[0].title, "判决书");
}

#[test]
fn first_stray_number_in_a_span_wins_as_the_page() {
    let catalog = extract_catalog("", &block(&["1", "合同书", "12", "15"]));
    assert_eq!(catalog.entries[0].page.as_deref(), Some("12"));
}

#[test]
fn leading_zero_ordinal_still_starts_a_chain() {
    let catalog = extract_catalog("", &block(&["01", "报案材料"]));
    assert_eq!(catalog.entries.len(), 1);
    assert_eq!(catalog.entries[0].seq, 1);
    assert_eq!(catalog.entries[0].title, "报案材料");
}

#[test]
fn duplicate_ordinal_one_ties_break_to_the_earliest() {
    let catalog = extract_catalog("", &block(&["1", "甲文书", "1", "乙文书", "2", "丙文书"]));

    assert_eq!(catalog.entries.len(), 2);
    // The stray second "1" lands inside the first span as its page number.
    assert_eq!(catalog.entries[0].title, "甲文书乙文书");
    assert_eq!(catalog.entries[0].page.as_deref(), Some("1"));
    assert_eq!(catalog.entries[1].title, "丙文书");
}

#[test]
fn cover_volume_heading_rule_fires_first() {
    let cover = block(&["卷一：书证清单", "案件编号：2021-001"]);
    let catalog = extract_catalog(&cover, "");
    assert_eq!(catalog.title, "卷一：书证清单");
}

#[test]
fn cover_evidence_keyword_rule_needs_length() {
    let catalog = extract_catalog(&block(&["询问笔录材料汇编"]), "");
    assert_eq!(catalog.title, "询问笔录材料汇编");

    // Five characters or fewer is too short for the keyword rule.
    let catalog = extract_catalog(&block(&["书证清单"]), "");
    assert_eq!(catalog.title, FALLBACK_TITLE);
}

#[test]
fn cover_case_rule_skips_form_labels() {
    let catalog = extract_catalog(&block(&["案件名称：盗窃案件", "某某市盗窃一案材料"]), "");
    assert_eq!(catalog.title, "某某市盗窃一案材料");
}

#[test]
fn cover_falls_back_to_sentinel() {
    let catalog = extract_catalog(&block(&["你好", "世界"]), "");
    assert_eq!(catalog.title, FALLBACK_TITLE);

    let catalog = extract_catalog("", "");
    assert_eq!(catalog.title, FALLBACK_TITLE);
}

#[test]
fn extraction_is_total_and_idempotent() {
    let cover = "卷三：证据材料书证卷";
    let directory = block(&["1", "立案决定书", "20210105", "2", "起诉书"]);

    let first = extract_catalog(cover, &directory);
    let second = extract_catalog(cover, &directory);

    assert_eq!(first.title, second.title);
    assert_eq!(first.entries, second.entries);
    assert_eq!(first.anchor_mode, second.anchor_mode);
}
