//! Markdown rendering for addendum content and artifact listings

use crate::types::{Column, Value};

/// Render items as a bullet list, one `- item` line each.
pub fn bullet_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", cell(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render rows as a pipe table with the given columns.
///
/// Rows that are not records, and keys a record does not have, render as
/// empty cells.
pub fn pipe_table(columns: &[Column], rows: &[Value]) -> String {
    let mut lines = vec![
        table_row(columns.iter().map(|c| escape(&c.label))),
        table_row(columns.iter().map(|_| "---".to_string())),
    ];

    for row in rows {
        let record = row.as_record();
        lines.push(table_row(columns.iter().map(|column| {
            record
                .and_then(|r| r.get(&column.key))
                .map(cell)
                .unwrap_or_default()
        })));
    }

    lines.join("\n")
}

/// Render a two-column table from string pairs.
pub fn two_column_table(headers: (&str, &str), rows: &[(String, String)]) -> String {
    let mut lines = vec![
        table_row([escape(headers.0), escape(headers.1)].into_iter()),
        table_row(["---".to_string(), "---".to_string()].into_iter()),
    ];
    for (left, right) in rows {
        lines.push(table_row([escape(left), escape(right)].into_iter()));
    }
    lines.join("\n")
}

fn table_row(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("| {} |", cells.join(" | "))
}

/// Display form of a value fit for a single markdown line.
fn cell(value: &Value) -> String {
    escape(&value.to_string())
}

fn escape(s: &str) -> String {
    s.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}
