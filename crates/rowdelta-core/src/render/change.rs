//! Rendering of one change with its start and end rows.

use super::grid::{header_block, line, separator, widths, GridColumn};
use crate::errors::Result;
use crate::model::{snapshot::describe_pk, Change};
use crate::value::{Value, ValueType};

const AT_START_POINT: &str = "At start point";
const AT_END_POINT: &str = "At end point";

fn column_type(start: &Value, end: &Value) -> ValueType {
    if start.is_null() {
        end.value_type()
    } else {
        start.value_type()
    }
}

fn cell(value: &Value, present: bool) -> String {
    if present {
        value.represent()
    } else {
        String::new()
    }
}

/// Body line `n` with the spanning type and key cells left blank
fn body_cells(columns: &[GridColumn], n: usize) -> Vec<&str> {
    let mut cells = vec!["", ""];
    cells.extend(columns[2..].iter().map(|c| c.cells[n].as_str()));
    cells
}

/// Render `change`, shown as the change at `index` of its list.
///
/// The type and key cells span both body lines; an absent row leaves its
/// line empty.
///
/// # Errors
///
/// `NotFound` if a column of the change cannot be read back, which only
/// happens for a change built with inconsistent rows.
pub fn render_change(change: &Change, index: usize) -> Result<String> {
    let has_start = change.row_at_start_point().is_some();
    let has_end = change.row_at_end_point().is_some();
    let pk: Vec<&Value> = change.pk_values().iter().collect();
    let key = if change.pk_names().is_empty() {
        String::new()
    } else {
        describe_pk(&pk)
    };

    let mut columns = vec![
        GridColumn::new(["", "TYPE", "", ""]),
        GridColumn::new(["", "PRIMARY", "KEY", ""]),
        GridColumn::new(["", "", "", ""])
            .with_cell(AT_START_POINT)
            .with_cell(AT_END_POINT),
    ];
    let type_name = change.change_type().as_str();
    for (i, name) in change.column_names().iter().enumerate() {
        let (start, end) = change.column_values(name)?;
        let marker = if change.pk_names().contains(name) { "*" } else { "" };
        let value_type = format!("({})", column_type(&start, &end));
        let position = format!("Index : {}", i);
        columns.push(
            GridColumn::new([marker, name, &value_type, &position])
                .with_cell(cell(&start, has_start))
                .with_cell(cell(&end, has_end)),
        );
    }

    let mut widths = widths(&columns);
    widths[0] = widths[0].max(type_name.len());
    widths[1] = widths[1].max(key.chars().count());

    let mut lines = vec![format!("[Change at index {} of {}]", index, change.source_label())];
    lines.extend(header_block(&columns, &widths));
    lines.push(line(&body_cells(&columns, 0), &widths));
    let middle = format!(
        "{}{}",
        line(&[type_name, key.as_str()], &widths[..2]),
        &separator(&widths[2..])[1..]
    );
    lines.push(middle);
    lines.push(line(&body_cells(&columns, 1), &widths));
    lines.push(separator(&widths));

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
