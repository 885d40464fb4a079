use std::collections::HashMap;

use super::stream::{Line, LineKind};

/// An end-anchored directory puts the date on the line(s) just before the
/// ordinal; anything further away than this is treated as unrelated.
const DATE_ANCHOR_GAP: usize = 5;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Anchor {
    pub seq: u32,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMode {
    StartAnchored,
    EndAnchored,
}

impl AnchorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartAnchored => "start_anchored",
            Self::EndAnchored => "end_anchored",
        }
    }
}

/// Find the longest chain of ordinals 1, 2, 3, … whose stream positions are
/// strictly increasing.
///
/// OCR noise routinely duplicates numbers or drops them, so every occurrence
/// of `1` is tried as a start and each chain is extended greedily: the next
/// expected value is taken at its earliest position past the previous anchor.
/// The greedy pass is not globally optimal under pathological noise; that is
/// an accepted limitation of the reconstruction.
pub(crate) fn find_anchor_chain(stream: &[Line]) -> Vec<Anchor> {
    let mut positions_by_value: HashMap<u32, Vec<usize>> = HashMap::new();
    for (pos, line) in stream.iter().enumerate() {
        if line.kind != LineKind::Number {
            continue;
        }
        if let Ok(value) = line.text.parse::<u32>() {
            positions_by_value.entry(value).or_default().push(pos);
        }
    }

    // Without an ordinal 1 there is no chain to hang entries on. The block is
    // reported as unparsable rather than guessed at.
    let Some(start_positions) = positions_by_value.get(&1) else {
        return Vec::new();
    };

    let mut best: Vec<Anchor> = Vec::new();
    for &start in start_positions {
        let mut chain = vec![Anchor { seq: 1, pos: start }];
        let mut last_pos = start;
        let mut expect = 2_u32;

        loop {
            let next_pos = positions_by_value
                .get(&expect)
                .and_then(|candidates| candidates.iter().copied().find(|&pos| pos > last_pos));
            let Some(next_pos) = next_pos else {
                break;
            };
            chain.push(Anchor {
                seq: expect,
                pos: next_pos,
            });
            last_pos = next_pos;
            expect += 1;
        }

        if chain.len() > best.len() {
            best = chain;
        }
    }

    if best.is_empty() {
        if let Some(&first) = start_positions.first() {
            best.push(Anchor { seq: 1, pos: first });
        }
    }

    best
}

/// Decide whether ordinals open their entry (the common printed layout) or
/// close it. A date sitting within a few lines before the first ordinal means
/// the row content ran first and the ordinal trails it.
pub(crate) fn detect_anchor_mode(stream: &[Line], chain: &[Anchor]) -> AnchorMode {
    let Some(first) = chain.first() else {
        return AnchorMode::StartAnchored;
    };

    let date_before = stream[..first.pos]
        .iter()
        .rposition(|line| line.kind == LineKind::Date);

    match date_before {
        Some(date_pos) if first.pos - date_pos < DATE_ANCHOR_GAP => AnchorMode::EndAnchored,
        _ => AnchorMode::StartAnchored,
    }
}
