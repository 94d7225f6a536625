//! Rendering of one snapshot row.

use super::grid::{header_block, line, separator, widths, GridColumn};
use crate::errors::{DeltaError, Result};
use crate::model::{snapshot::describe_pk, Snapshot};

/// Render the row at `index` of `snapshot` as a boxed table.
///
/// The leading `PRIMARY KEY` column holds the key values joined with `/`;
/// it stays empty for a source without key.
///
/// # Errors
///
/// `IndexOutOfRange` outside `[0, row count)`.
pub fn render_row(snapshot: &Snapshot, index: usize) -> Result<String> {
    let row = snapshot
        .row(index)
        .ok_or_else(|| DeltaError::index_out_of_range("rows", index, snapshot.row_count()))?;

    let key = if snapshot.is_keyless() {
        String::new()
    } else {
        describe_pk(&row.pk_values())
    };
    let mut columns = vec![GridColumn::new(["", "PRIMARY", "KEY", ""]).with_cell(key)];
    for (i, (name, value)) in row.column_names().iter().zip(row.values()).enumerate() {
        let marker = if row.pk_names().contains(name) { "*" } else { "" };
        let value_type = format!("({})", value.value_type());
        let position = format!("Index : {}", i);
        columns.push(
            GridColumn::new([marker, name, &value_type, &position]).with_cell(value.represent()),
        );
    }

    let widths = widths(&columns);
    let mut lines = vec![format!(
        "[Row at index {} of {}]",
        index,
        snapshot.source().label()
    )];
    lines.extend(header_block(&columns, &widths));
    let cells: Vec<&str> = columns.iter().map(|c| c.cells[0].as_str()).collect();
    lines.push(line(&cells, &widths));
    lines.push(separator(&widths));

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
