//! Terminal rendering of the report tables.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::models::{BasicRow, ClassifiedCode, DetailedRow};
use crate::services::ValidationIssue;

fn table<const N: usize>(headers: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

pub fn basic_table(rows: &[BasicRow]) -> Table {
    let mut table = table(BasicRow::headers());
    for row in rows {
        table.add_row(row.cells());
    }
    table
}

pub fn detailed_table(rows: &[DetailedRow]) -> Table {
    let mut table = table(DetailedRow::headers());
    for row in rows {
        table.add_row(row.cells());
    }
    table
}

pub fn codes_table(codes: &[ClassifiedCode]) -> Table {
    let mut table = table(["Código", "Tipo"]);
    for code in codes {
        table.add_row([code.code.as_str(), code.kind.label()]);
    }
    table
}

pub fn issues_table(issues: &[ValidationIssue]) -> Table {
    let mut table = table(["Código", "Hoja", "Problema"]);
    for issue in issues {
        table.add_row([issue.code.as_str(), issue.sheet, issue.issue.as_str()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CodeKind;

    #[test]
    fn test_detailed_table_renders_rows() {
        let rows = vec![DetailedRow {
            code: "C1".to_string(),
            kind: CodeKind::Ce,
            description: "Criterio uno".to_string(),
        }];
        let rendered = detailed_table(&rows).to_string();
        assert!(rendered.contains("Elemento"));
        assert!(rendered.contains("Criterio uno"));
    }
}
