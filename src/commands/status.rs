use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{ExtractRunManifest, OcrInventoryManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");
    let inventory_path = manifest_dir.join("ocr_inventory.json");
    let db_path = args.cache_root.join("anjuan_catalog.sqlite");

    info!(cache_root = %args.cache_root.display(), "status requested");

    if inventory_path.exists() {
        let raw = fs::read(&inventory_path)
            .with_context(|| format!("failed to read {}", inventory_path.display()))?;
        let inventory: OcrInventoryManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", inventory_path.display()))?;

        info!(
            generated_at = %inventory.generated_at,
            doc_count = inventory.doc_count,
            source = %inventory.source_directory,
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    match latest_extract_manifest(&manifest_dir)? {
        Some((path, manifest)) => {
            info!(
                path = %path.display(),
                run_id = %manifest.run_id,
                status = %manifest.status,
                updated_at = %manifest.updated_at,
                docs = manifest.counts.docs_total,
                entries = manifest.counts.entries_total,
                unparsable = manifest.counts.unparsable_doc_count,
                title_fallbacks = manifest.counts.title_fallback_count,
                warnings = manifest.warnings.len(),
                "loaded latest extract run manifest"
            );
        }
        None => {
            warn!(dir = %manifest_dir.display(), "no extract run manifest found");
        }
    }

    if db_path.exists() {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        let docs_count = query_count(&conn, "SELECT COUNT(*) FROM docs").unwrap_or(0);
        let entries_count = query_count(&conn, "SELECT COUNT(*) FROM entries").unwrap_or(0);

        info!(
            path = %db_path.display(),
            docs = docs_count,
            entries = entries_count,
            "database status"
        );
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    Ok(())
}

/// Run manifests embed a sortable UTC stamp in their filename, so the
/// lexicographically last one is the most recent.
fn latest_extract_manifest(
    manifest_dir: &Path,
) -> Result<Option<(PathBuf, ExtractRunManifest)>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.starts_with("extract_run_") && name.ends_with(".json") {
            candidates.push(path);
        }
    }

    candidates.sort();
    let Some(path) = candidates.pop() else {
        return Ok(None);
    };

    let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(Some((path, manifest)))
}

fn query_count(conn: &Connection, sql: &str) -> Result<i64> {
    let count = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
