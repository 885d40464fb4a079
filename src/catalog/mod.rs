//! Reconstruction of a volume's evidence catalog from raw OCR text.
//!
//! The caller hands over two text blocks: the cover page and the directory
//! (table-of-contents) pages. Nothing here touches the filesystem or keeps
//! state between calls; garbage in yields an empty catalog, never an error.

mod anchors;
mod cover;
mod entries;
mod stream;
#[cfg(test)]
mod tests;

use crate::model::EvidenceEntry;

pub use anchors::AnchorMode;
pub use cover::FALLBACK_TITLE;

#[derive(Debug, Clone)]
pub struct DocumentCatalog {
    pub title: String,
    /// `None` when the directory block had no usable ordinal chain.
    pub anchor_mode: Option<AnchorMode>,
    pub entries: Vec<EvidenceEntry>,
}

pub fn extract_catalog(cover_text: &str, directory_text: &str) -> DocumentCatalog {
    let title = cover::extract_cover_title(cover_text);

    let line_stream = stream::build_stream(directory_text);
    let chain = anchors::find_anchor_chain(&line_stream);
    if chain.is_empty() {
        return DocumentCatalog {
            title,
            anchor_mode: None,
            entries: Vec::new(),
        };
    }

    let mode = anchors::detect_anchor_mode(&line_stream, &chain);
    let entries = entries::extract_entries(&line_stream, &chain, mode);

    DocumentCatalog {
        title,
        anchor_mode: Some(mode),
        entries,
    }
}
