use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::{ExportArgs, ExportFormat};
use crate::model::EvidenceEntry;
use crate::util::{ensure_directory, write_json_pretty};

/// One flat row of the aggregate catalog, keyed the way the downstream
/// spreadsheet expects its columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "文件序号")]
    pub file_index: usize,
    #[serde(rename = "文件名")]
    pub filename: String,
    #[serde(rename = "文件标题")]
    pub doc_title: String,
    #[serde(rename = "顺序号")]
    pub seq: Option<u32>,
    #[serde(rename = "证据名称")]
    pub entry_title: String,
    #[serde(rename = "证明目的")]
    pub remark: String,
    #[serde(rename = "页码")]
    pub page: String,
    #[serde(rename = "日期")]
    pub date: String,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.cache_root.join("anjuan_catalog.sqlite"));

    if !db_path.exists() {
        bail!(
            "catalog database missing: {} (run `anjuan extract` first)",
            db_path.display()
        );
    }

    let connection = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let rows = collect_rows(&connection)?;

    let output_path = args.output_path.clone().unwrap_or_else(|| {
        args.cache_root
            .join(format!("evidence_catalog.{}", args.format.as_str()))
    });

    match args.format {
        ExportFormat::Csv => write_csv(&output_path, &rows)?,
        ExportFormat::Json => write_json_pretty(&output_path, &rows)?,
    }

    info!(
        path = %output_path.display(),
        rows = rows.len(),
        format = args.format.as_str(),
        "export completed"
    );

    Ok(())
}

fn collect_rows(connection: &Connection) -> Result<Vec<ExportRow>> {
    let mut docs_statement =
        connection.prepare("SELECT doc_id, filename, title FROM docs ORDER BY filename")?;
    let docs = docs_statement
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut entries_statement = connection.prepare(
        "SELECT seq, title, remark, page, date FROM entries WHERE doc_id = ?1 ORDER BY order_index",
    )?;

    let mut rows = Vec::new();
    for (index, (doc_id, filename, title)) in docs.into_iter().enumerate() {
        let entries = entries_statement
            .query_map(params![doc_id], |row| {
                Ok(EvidenceEntry {
                    seq: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    remark: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    page: row.get(3)?,
                    date: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.extend(rows_for_doc(
            index + 1,
            &filename,
            title.as_deref().unwrap_or(""),
            &entries,
        ));
    }

    Ok(rows)
}

fn rows_for_doc(
    file_index: usize,
    filename: &str,
    doc_title: &str,
    entries: &[EvidenceEntry],
) -> Vec<ExportRow> {
    // Volumes without a reconstructed directory still get a row, so the
    // aggregate table accounts for every scanned file.
    if entries.is_empty() {
        return vec![ExportRow {
            file_index,
            filename: filename.to_string(),
            doc_title: doc_title.to_string(),
            seq: None,
            entry_title: "未找到目录项".to_string(),
            remark: String::new(),
            page: String::new(),
            date: String::new(),
        }];
    }

    entries
        .iter()
        .map(|entry| ExportRow {
            file_index,
            filename: filename.to_string(),
            doc_title: doc_title.to_string(),
            seq: Some(entry.seq),
            entry_title: entry.title.clone(),
            remark: entry.remark.clone(),
            page: entry.page.clone().unwrap_or_default(),
            date: entry.date.clone().unwrap_or_default(),
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write csv row: {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to finalize csv file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docless_catalog_still_produces_a_placeholder_row() {
        let rows = rows_for_doc(3, "正卷三.md", "未找到特定标题", &[]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_index, 3);
        assert_eq!(rows[0].seq, None);
        assert_eq!(rows[0].entry_title, "未找到目录项");
    }

    #[test]
    fn entries_map_onto_flat_rows_in_order() {
        let entries = vec![
            EvidenceEntry {
                seq: 1,
                title: "立案决定书".to_string(),
                remark: String::new(),
                page: Some("3".to_string()),
                date: Some("20210105".to_string()),
            },
            EvidenceEntry {
                seq: 2,
                title: "起诉书".to_string(),
                remark: String::new(),
                page: None,
                date: None,
            },
        ];

        let rows = rows_for_doc(1, "正卷一.md", "卷一：书证清单", &entries);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].seq, Some(1));
        assert_eq!(rows[0].page, "3");
        assert_eq!(rows[1].seq, Some(2));
        assert_eq!(rows[1].page, "");
        assert!(rows.iter().all(|row| row.doc_title == "卷一：书证清单"));
    }
}
