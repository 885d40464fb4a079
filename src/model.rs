use serde::{Deserialize, Serialize};

/// One reconstructed catalog row. `remark` stays empty until manual review
/// fills in the proving purpose column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub seq: u32,
    pub title: String,
    pub remark: String,
    pub page: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDocEntry {
    pub filename: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub doc_count: usize,
    pub docs: Vec<OcrDocEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub cache_root: String,
    pub manifest_dir: String,
    pub inventory_manifest_path: String,
    pub db_path: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractCounts {
    pub doc_count: usize,
    pub processed_doc_count: usize,
    pub skipped_doc_count: usize,
    pub docs_upserted: usize,
    pub docs_total: i64,
    pub entries_inserted: usize,
    pub entries_total: i64,
    pub start_anchored_doc_count: usize,
    pub end_anchored_doc_count: usize,
    pub unparsable_doc_count: usize,
    pub empty_directory_doc_count: usize,
    pub title_fallback_count: usize,
    pub tables_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub source_hashes: Vec<OcrDocEntry>,
    pub warnings: Vec<String>,
}
