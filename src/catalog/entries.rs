use crate::model::EvidenceEntry;

use super::anchors::{Anchor, AnchorMode};
use super::stream::{Line, LineKind, leading_date};

/// Cut the stream into one span per anchor and build an entry from each span.
///
/// Start-anchored: an entry runs from just past its ordinal up to the next
/// ordinal. End-anchored: it runs from just past the previous ordinal up to
/// its own. Within a span the first date and the first stray number win; all
/// text lines concatenate into the title in stream order.
pub(crate) fn extract_entries(
    stream: &[Line],
    chain: &[Anchor],
    mode: AnchorMode,
) -> Vec<EvidenceEntry> {
    let mut entries = Vec::with_capacity(chain.len());

    for (index, anchor) in chain.iter().enumerate() {
        let (start, end) = match mode {
            AnchorMode::StartAnchored => {
                let end = chain
                    .get(index + 1)
                    .map(|next| next.pos)
                    .unwrap_or(stream.len());
                (anchor.pos + 1, end)
            }
            AnchorMode::EndAnchored => {
                let start = if index == 0 {
                    0
                } else {
                    chain[index - 1].pos + 1
                };
                (start, anchor.pos)
            }
        };

        let mut title = String::new();
        let mut date: Option<String> = None;
        let mut page: Option<String> = None;

        for line in &stream[start..end] {
            match line.kind {
                LineKind::Date => {
                    if date.is_none() {
                        date = Some(leading_date(&line.text));
                    }
                }
                LineKind::Number => {
                    if page.is_none() {
                        page = Some(line.text.clone());
                    }
                }
                LineKind::Text => title.push_str(&line.text),
            }
        }

        // A span with nothing in it is an OCR gap, not a catalog row.
        if title.is_empty() && date.is_none() && page.is_none() {
            continue;
        }

        entries.push(EvidenceEntry {
            seq: anchor.seq,
            title,
            remark: String::new(),
            page,
            date,
        });
    }

    entries
}
