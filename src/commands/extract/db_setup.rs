use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction, params};

use crate::model::{EvidenceEntry, OcrDocEntry};

pub(super) const DB_SCHEMA_VERSION: &str = "0.2.0";

pub(super) fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub(super) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS docs (
          doc_id TEXT PRIMARY KEY,
          filename TEXT NOT NULL,
          sha256 TEXT NOT NULL,
          title TEXT,
          anchor_mode TEXT
        );

        CREATE TABLE IF NOT EXISTS entries (
          entry_id TEXT PRIMARY KEY,
          doc_id TEXT NOT NULL,
          seq INTEGER NOT NULL,
          title TEXT,
          remark TEXT,
          page TEXT,
          date TEXT,
          order_index INTEGER DEFAULT 0,
          FOREIGN KEY(doc_id) REFERENCES docs(doc_id)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_doc ON entries(doc_id, order_index);
        ",
    )?;

    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![DB_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// The OCR dump filename doubles as the document id: it is unique within a
/// source directory and survives re-OCR runs, unlike a content hash.
pub(super) fn upsert_doc(
    tx: &Transaction<'_>,
    doc: &OcrDocEntry,
    title: &str,
    anchor_mode: Option<&str>,
) -> Result<()> {
    tx.execute(
        "
        INSERT INTO docs(doc_id, filename, sha256, title, anchor_mode)
        VALUES(?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(doc_id) DO UPDATE SET
          filename=excluded.filename,
          sha256=excluded.sha256,
          title=excluded.title,
          anchor_mode=excluded.anchor_mode
        ",
        params![doc.filename, doc.filename, doc.sha256, title, anchor_mode],
    )?;

    Ok(())
}

/// Entries are replaced wholesale per document so a re-run over a re-OCR'd
/// volume never leaves stale rows behind.
pub(super) fn replace_entries(
    tx: &Transaction<'_>,
    doc_id: &str,
    entries: &[EvidenceEntry],
) -> Result<usize> {
    tx.execute("DELETE FROM entries WHERE doc_id = ?1", params![doc_id])?;

    let mut statement = tx.prepare(
        "
        INSERT INTO entries(entry_id, doc_id, seq, title, remark, page, date, order_index)
        VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ",
    )?;

    for (index, entry) in entries.iter().enumerate() {
        let entry_id = format!("{}:entry:{:03}", doc_id, entry.seq);
        statement.execute(params![
            entry_id,
            doc_id,
            entry.seq,
            entry.title,
            entry.remark,
            entry.page,
            entry.date,
            index as i64,
        ])?;
    }

    Ok(entries.len())
}

pub(super) fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
