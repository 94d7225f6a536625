//! Boxed text grid shared by the row and change renderers.

/// Header lines per column: key marker, name, type, index
pub(crate) const HEADER_LINES: usize = 4;

/// One grid column: its header lines and body cells
#[derive(Debug, Clone, Default)]
pub(crate) struct GridColumn {
    pub header: [String; HEADER_LINES],
    pub cells: Vec<String>,
}

impl GridColumn {
    pub fn new(header: [&str; HEADER_LINES]) -> Self {
        Self {
            header: header.map(str::to_string),
            cells: Vec::new(),
        }
    }

    pub fn with_cell(mut self, cell: impl Into<String>) -> Self {
        self.cells.push(cell.into());
        self
    }

    pub fn width(&self) -> usize {
        self.header
            .iter()
            .chain(&self.cells)
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
    }
}

pub(crate) fn widths(columns: &[GridColumn]) -> Vec<usize> {
    columns.iter().map(GridColumn::width).collect()
}

/// `|---|---|` line, each segment two dashes wider than its column
pub(crate) fn separator(widths: &[usize]) -> String {
    let mut out = String::from("|");
    for w in widths {
        out.push_str(&"-".repeat(w + 2));
        out.push('|');
    }
    out
}

/// `| a | b |` line, cells padded to their column width
pub(crate) fn line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (cell, w) in cells.iter().zip(widths) {
        out.push_str(&format!(" {:<width$} |", cell.as_ref(), width = *w));
    }
    out
}

/// Header block of `columns`, framed by separators
pub(crate) fn header_block(columns: &[GridColumn], widths: &[usize]) -> Vec<String> {
    let mut lines = vec![separator(widths)];
    for i in 0..HEADER_LINES {
        let cells: Vec<&str> = columns.iter().map(|c| c.header[i].as_str()).collect();
        lines.push(line(&cells, widths));
    }
    lines.push(separator(widths));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_pads_to_width() {
        assert_eq!(line(&["1", "Weaver"], &[3, 7]), "| 1   | Weaver  |");
        assert_eq!(separator(&[3, 7]), "|-----|---------|");
    }

    #[test]
    fn test_width_counts_chars() {
        let column = GridColumn::new(["", "NAME", "(TEXT)", "Index : 1"]).with_cell("Éléonore");
        assert_eq!(column.width(), 9);
    }
}
