use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::catalog::{self, AnchorMode, FALLBACK_TITLE};
use crate::cli::ExtractArgs;
use crate::commands::inventory;
use crate::model::{ExtractCounts, ExtractPaths, ExtractRunManifest, OcrInventoryManifest};
use crate::util::{
    ensure_directory, now_utc_string, read_text_lossy, utc_compact_string, write_json_pretty,
};

use super::db_setup::{
    DB_SCHEMA_VERSION, configure_connection, count_rows, ensure_schema, replace_entries,
    upsert_doc,
};
use super::doc_split::split_cover_and_directory;
use super::render::{render_markdown_table, table_filename};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let cache_root = args.cache_root.clone();
    let manifest_dir = cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let source_dir = args
        .source_dir
        .clone()
        .unwrap_or_else(|| cache_root.join("ocr"));
    let inventory_manifest_path = args
        .inventory_manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join("ocr_inventory.json"));
    let extract_manifest_path = args.extract_manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!(
            "extract_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| cache_root.join("anjuan_catalog.sqlite"));
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| cache_root.join("tables"));

    info!(cache_root = %cache_root.display(), run_id = %run_id, "starting extract");

    let inventory = load_or_refresh_inventory(
        &source_dir,
        &inventory_manifest_path,
        args.refresh_inventory,
    )?;

    let mut connection = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;

    if !args.skip_tables {
        ensure_directory(&output_dir)?;
    }

    let mut counts = ExtractCounts {
        doc_count: inventory.doc_count,
        ..ExtractCounts::default()
    };
    let mut warnings = Vec::new();

    for doc in &inventory.docs {
        let path = source_dir.join(&doc.filename);
        let content = match read_text_lossy(&path) {
            Ok(content) => content,
            Err(error) => {
                warn!(filename = %doc.filename, error = %error, "skipping unreadable dump");
                warnings.push(format!("skipped {}: {}", doc.filename, error));
                counts.skipped_doc_count += 1;
                continue;
            }
        };

        let (cover_text, directory_text) = split_cover_and_directory(&content);
        if directory_text.trim().is_empty() {
            counts.empty_directory_doc_count += 1;
        }

        let document = catalog::extract_catalog(&cover_text, &directory_text);

        match document.anchor_mode {
            Some(AnchorMode::StartAnchored) => counts.start_anchored_doc_count += 1,
            Some(AnchorMode::EndAnchored) => counts.end_anchored_doc_count += 1,
            None => counts.unparsable_doc_count += 1,
        }
        if document.title == FALLBACK_TITLE {
            counts.title_fallback_count += 1;
        }

        let tx = connection.transaction()?;
        upsert_doc(
            &tx,
            doc,
            &document.title,
            document.anchor_mode.map(AnchorMode::as_str),
        )?;
        let inserted = replace_entries(&tx, &doc.filename, &document.entries)?;
        tx.commit()?;
        counts.docs_upserted += 1;
        counts.entries_inserted += inserted;

        if !args.skip_tables {
            let table = render_markdown_table(&doc.filename, &document.title, &document.entries);
            let table_path = output_dir.join(table_filename(&doc.filename));
            fs::write(&table_path, table)
                .with_context(|| format!("failed to write {}", table_path.display()))?;
            counts.tables_written += 1;
        }

        counts.processed_doc_count += 1;
        info!(
            filename = %doc.filename,
            entries = document.entries.len(),
            title = %document.title,
            "processed volume"
        );
    }

    counts.docs_total = count_rows(&connection, "SELECT COUNT(*) FROM docs")?;
    counts.entries_total = count_rows(&connection, "SELECT COUNT(*) FROM entries")?;

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        db_schema_version: DB_SCHEMA_VERSION.to_string(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        paths: ExtractPaths {
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            inventory_manifest_path: inventory_manifest_path.display().to_string(),
            db_path: db_path.display().to_string(),
            output_dir: output_dir.display().to_string(),
        },
        counts,
        source_hashes: inventory.docs,
        warnings,
    };

    write_json_pretty(&extract_manifest_path, &manifest)?;

    info!(path = %extract_manifest_path.display(), "wrote extract run manifest");
    info!(
        docs = manifest.counts.docs_total,
        entries = manifest.counts.entries_total,
        unparsable = manifest.counts.unparsable_doc_count,
        "extract completed"
    );

    Ok(())
}

fn load_or_refresh_inventory(
    source_dir: &Path,
    inventory_manifest_path: &Path,
    refresh_inventory: bool,
) -> Result<OcrInventoryManifest> {
    if refresh_inventory || !inventory_manifest_path.exists() {
        let manifest = inventory::build_manifest(source_dir)?;
        write_json_pretty(inventory_manifest_path, &manifest)?;
        info!(
            path = %inventory_manifest_path.display(),
            doc_count = manifest.doc_count,
            "refreshed inventory manifest"
        );
        return Ok(manifest);
    }

    let raw = fs::read(inventory_manifest_path)
        .with_context(|| format!("failed to read {}", inventory_manifest_path.display()))?;
    let manifest: OcrInventoryManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", inventory_manifest_path.display()))?;

    info!(
        path = %inventory_manifest_path.display(),
        doc_count = manifest.doc_count,
        "loaded existing inventory manifest"
    );

    Ok(manifest)
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "anjuan".to_string(),
        "extract".to_string(),
        "--cache-root".to_string(),
        args.cache_root.display().to_string(),
    ];

    if let Some(source_dir) = &args.source_dir {
        command.push("--source-dir".to_string());
        command.push(source_dir.display().to_string());
    }
    if args.refresh_inventory {
        command.push("--refresh-inventory".to_string());
    }
    if args.skip_tables {
        command.push("--skip-tables".to_string());
    }

    command.join(" ")
}
