use crate::model::EvidenceEntry;

pub(super) const MISSING_DIRECTORY_ROW: &str = "| - | 未找到目录项 | - | - | - |";

pub(super) fn render_markdown_table(
    filename: &str,
    title: &str,
    entries: &[EvidenceEntry],
) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 4);
    lines.push(format!("# {filename} 表格化数据"));
    lines.push(format!("**文件标题**: {title}\n"));
    lines.push("| 顺序号 | 证据名称 | 证明目的 | 页号 | 日期 |".to_string());
    lines.push("|---|---|---|---|---|".to_string());

    if entries.is_empty() {
        lines.push(MISSING_DIRECTORY_ROW.to_string());
    } else {
        for entry in entries {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                entry.seq,
                sanitize_cell(&entry.title),
                entry.remark,
                entry.page.as_deref().unwrap_or(""),
                entry.date.as_deref().unwrap_or(""),
            ));
        }
    }

    lines.join("\n")
}

fn sanitize_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', " ")
}

pub(super) fn table_filename(source_filename: &str) -> String {
    match source_filename.rsplit_once('.') {
        Some((stem, _)) => format!("Table_{stem}.md"),
        None => format!("Table_{source_filename}.md"),
    }
}
