//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{
        Alignment, Modify, Style,
        object::{Columns, Rows},
    },
};

/// Format rows as a rounded table, or `empty_hint` when there are none.
///
/// Columns whose every cell is a number (amounts, percentages, IDs) are
/// right-aligned; headers are centered.
pub fn format_table<T: Tabled>(data: &[T], empty_hint: &str) -> String {
    if data.is_empty() {
        return empty_hint.to_string();
    }

    let mut table = Table::new(data);
    table.with(Style::rounded());
    for col in numeric_columns(data) {
        table.with(Modify::new(Columns::one(col)).with(Alignment::right()));
    }
    table.with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

fn numeric_columns<T: Tabled>(data: &[T]) -> Vec<usize> {
    let rows: Vec<_> = data.iter().map(Tabled::fields).collect();
    (0..T::LENGTH)
        .filter(|&col| rows.iter().all(|fields| is_numeric(&fields[col])))
        .collect()
}

fn is_numeric(cell: &str) -> bool {
    cell.chars().any(|c| c.is_ascii_digit())
        && cell
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '.' | '-' | '%'))
}
