//! Markdown summary of a set of changes.

use crate::diff::Changes;
use crate::model::{snapshot::describe_pk, Change, ChangeType};
use crate::value::Value;

fn plural(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Creation => "Creations",
        ChangeType::Modification => "Modifications",
        ChangeType::Deletion => "Deletions",
    }
}

fn count_of<'a, I>(changes: I, change_type: ChangeType) -> usize
where
    I: IntoIterator<Item = &'a Change>,
{
    changes
        .into_iter()
        .filter(|c| c.change_type() == change_type)
        .count()
}

fn describe(change: &Change) -> String {
    let pk: Vec<&Value> = change.pk_values().iter().collect();
    let mut line = format!(
        "- `{}` {} [{}]",
        change.change_type(),
        change.data_source(),
        describe_pk(&pk)
    );
    if change.change_type() == ChangeType::Modification {
        let diffs: Vec<String> = change
            .modified_columns()
            .iter()
            .map(|d| {
                format!(
                    "{} `{}` → `{}`",
                    d.name,
                    d.at_start_point.represent(),
                    d.at_end_point.represent()
                )
            })
            .collect();
        line.push_str(": ");
        line.push_str(&diffs.join(", "));
    }
    line
}

/// Render a Markdown summary of `changes`.
///
/// Informational only: counts per type, counts per data source, then one
/// line per change in list order.
pub fn render_changes_summary(changes: &Changes) -> String {
    let mut out = String::new();
    out.push_str("## Changes\n\n");

    let all: Vec<&Change> = changes.all().iter().map(|c| c.as_ref()).collect();
    let totals: Vec<String> = ChangeType::ALL
        .iter()
        .map(|&t| format!("**{}**: {}", plural(t), count_of(all.iter().copied(), t)))
        .collect();
    out.push_str(&totals.join("  \n"));
    out.push_str("\n\n");

    if all.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str("### By Data Source\n\n");
    out.push_str("| Data Source | Kind | Creations | Modifications | Deletions |\n");
    out.push_str("|---|---|---|---|---|\n");
    for source in changes.sources() {
        let on_source: Vec<&Change> = all
            .iter()
            .copied()
            .filter(|c| c.is_on(source.name()))
            .collect();
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            source.name(),
            source.kind(),
            count_of(on_source.iter().copied(), ChangeType::Creation),
            count_of(on_source.iter().copied(), ChangeType::Modification),
            count_of(on_source.iter().copied(), ChangeType::Deletion),
        ));
    }
    out.push('\n');

    out.push_str("### Details\n\n");
    for change in &all {
        out.push_str(&describe(change));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataKind, DataSource, Row};
    use crate::value::RawValue;

    fn row(id: i32, name: &str) -> Row {
        Row::new(
            ["id", "name"],
            vec![RawValue::I32(id), RawValue::from(name)],
            ["id"],
        )
        .unwrap()
    }

    #[test]
    fn test_summary_lists_counts_and_details() {
        let changes = Changes::new(
            vec![DataSource::table("actor"), DataSource::table("movie")],
            vec![
                Change::modification(
                    "actor",
                    DataKind::Table,
                    row(2, "Phoenix"),
                    row(2, "Phoenix-updated"),
                )
                .unwrap()
                .unwrap(),
                Change::deletion("actor", DataKind::Table, row(3, "Worthington")),
            ],
        );
        let summary = render_changes_summary(&changes);
        assert!(summary.starts_with("## Changes\n\n**Creations**: 0  \n**Modifications**: 1  \n**Deletions**: 1\n\n"));
        assert!(summary.contains("| actor | TABLE | 0 | 1 | 1 |\n"));
        assert!(summary.contains("| movie | TABLE | 0 | 0 | 0 |\n"));
        assert!(summary.contains("- `MODIFICATION` actor [2]: NAME `Phoenix` → `Phoenix-updated`\n"));
        assert!(summary.ends_with("- `DELETION` actor [3]\n"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = render_changes_summary(&Changes::new(Vec::new(), Vec::new()));
        assert!(summary.ends_with("_No changes detected._\n"));
    }
}
