//! Rendering of car and audit listings.

use comfy_table::{modifiers, presets, ContentArrangement, Table};

use super::OutputFormat;
use crate::error::Result;
use crate::record::{AuditEntry, Car, Record};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Render cars in `format`, or `empty` when there are none and the format is
/// not JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_cars(cars: &[Car], format: OutputFormat, empty: &str) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(cars)?);
    }
    if cars.is_empty() {
        return Ok(empty.to_string());
    }
    Ok(match format {
        OutputFormat::Plain => join_lines(cars),
        _ => {
            let mut table = new_table(vec!["Model", "Type", "Year", "Rate", "Status"]);
            for car in cars {
                table.add_row(vec![
                    car.model.clone(),
                    car.kind.clone(),
                    car.year.to_string(),
                    car.rate.to_string(),
                    car.status.to_string(),
                ]);
            }
            table.to_string()
        }
    })
}

/// Render audit entries in `format` under a single-column `title`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_log(
    entries: &[AuditEntry],
    format: OutputFormat,
    title: &str,
    empty: &str,
) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(entries)?);
    }
    if entries.is_empty() {
        return Ok(empty.to_string());
    }
    Ok(match format {
        OutputFormat::Plain => join_lines(entries),
        _ => {
            let mut table = new_table(vec![title]);
            for entry in entries {
                table.add_row(vec![entry.to_line()]);
            }
            table.to_string()
        }
    })
}

fn join_lines<R: Record>(records: &[R]) -> String {
    records
        .iter()
        .map(Record::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}
