use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{OcrDocEntry, OcrInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let source_dir = args
        .source_dir
        .unwrap_or_else(|| args.cache_root.join("ocr"));
    let manifest = build_manifest(&source_dir)?;

    if args.dry_run {
        info!(
            doc_count = manifest.doc_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.cache_root.join("manifests").join("ocr_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(doc_count = manifest.doc_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(source_dir: &Path) -> Result<OcrInventoryManifest> {
    let mut dump_paths = discover_ocr_dumps(source_dir)?;
    dump_paths.sort();

    if dump_paths.is_empty() {
        bail!("no OCR dumps found in {}", source_dir.display());
    }

    let mut docs = Vec::with_capacity(dump_paths.len());
    for path in dump_paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let sha256 = sha256_file(&path)?;
        docs.push(OcrDocEntry { filename, sha256 });
    }

    docs.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(OcrInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: source_dir.display().to_string(),
        doc_count: docs.len(),
        docs,
    })
}

fn discover_ocr_dumps(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dumps = Vec::new();

    let entries = fs::read_dir(source_dir)
        .with_context(|| format!("failed to read {}", source_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", source_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if is_ocr_dump(&path) {
            dumps.push(path);
        }
    }

    Ok(dumps)
}

fn is_ocr_dump(path: &Path) -> bool {
    let has_text_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    if !has_text_extension {
        return false;
    }

    // Skip tables generated by a previous extract run.
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| !name.starts_with("Table_"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::is_ocr_dump;

    #[test]
    fn accepts_markdown_and_text_dumps() {
        assert!(is_ocr_dump(Path::new("正卷一.md")));
        assert!(is_ocr_dump(Path::new("volume_02.TXT")));
    }

    #[test]
    fn rejects_generated_tables_and_other_files() {
        assert!(!is_ocr_dump(Path::new("Table_正卷一.md")));
        assert!(!is_ocr_dump(Path::new("正卷一.pdf")));
        assert!(!is_ocr_dump(Path::new("README")));
    }
}
