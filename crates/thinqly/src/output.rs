//! Output formatting helpers: tables for listings, key/value blocks for
//! status dumps.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

/// Render rows as a rounded-style table.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print to stdout, tolerating a closed pipe.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Render a decoded status map as aligned `key: value` lines.
pub fn render_fields(fields: &serde_json::Map<String, serde_json::Value>) -> String {
    let width = fields.keys().map(String::len).max().unwrap_or(0);
    fields
        .iter()
        .map(|(key, value)| {
            let shown = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("  {key:width$}  {shown}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
