use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as pretty JSON with `--json`, otherwise hand it to `display_fn`.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Borderless, whitespace-aligned table on top of `comfy-table`.
pub struct TabWriter {
    table: Table,
    indent: String,
}

impl TabWriter {
    /// A left-aligned table with one header per column.
    pub fn new(columns: &[&str]) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.iter().copied());

        // two-space gap between columns, none at the edges
        let last = columns.len().saturating_sub(1);
        for i in 0..columns.len() {
            if let Some(col) = table.column_mut(i) {
                col.set_padding((u16::from(i != 0), u16::from(i != last)));
            }
        }

        Self {
            table,
            indent: String::new(),
        }
    }

    /// Prefix every printed line with `prefix`.
    pub fn indent(mut self, prefix: &str) -> Self {
        self.indent = prefix.to_string();
        self
    }

    /// Add a row, values in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        for line in self.table.to_string().lines() {
            println!("{}{}", self.indent, line.trim_end());
        }
    }
}
