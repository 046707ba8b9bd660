//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod formatters;
pub mod json;
pub mod table;

/// Print a list as a table (pretty/table formats) or as JSON.
///
/// Rows are built from the items only for table output, so the JSON keeps
/// the full server payload.
pub fn print_list<T, R>(format: OutputFormat, items: &[T], empty_hint: &str) -> Result<()>
where
    T: Serialize,
    R: Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Pretty | OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(R::from).collect();
            println!("{}", table::format_table(&rows, empty_hint));
        }
        OutputFormat::Json => {
            println!("{}", json::format_json_list(items)?);
        }
    }
    Ok(())
}
