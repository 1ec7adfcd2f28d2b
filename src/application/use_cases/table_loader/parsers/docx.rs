use super::super::TableLoader;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Table};

impl TableLoader {
    pub(in crate::application::use_cases::table_loader) fn parse_docx(
        &self,
        bytes: &[u8],
    ) -> Result<Table> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| AppError::FormatError(format!("failed to parse document: {}", e)))?;

        let grid = first_table_grid(&docx).ok_or_else(|| {
            AppError::FormatError("document contains no tables".to_string())
        })?;

        let mut rows = grid.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| AppError::FormatError("document table is empty".to_string()))?;

        let table = Table::from_text_rows(header, rows.collect())?;
        coerce_numeric_columns(table)
    }
}

/// Cell texts of the first table in the document, one Vec per row.
fn first_table_grid(docx: &docx_rs::Docx) -> Option<Vec<Vec<String>>> {
    docx.document.children.iter().find_map(|child| match child {
        docx_rs::DocumentChild::Table(table) => Some(table_grid(table)),
        _ => None,
    })
}

fn table_grid(table: &docx_rs::Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            let docx_rs::TableChild::TableRow(row) = row;
            row.cells
                .iter()
                .map(|cell| {
                    let docx_rs::TableRowChild::TableCell(cell) = cell;
                    cell_text(cell)
                })
                .collect()
        })
        .collect()
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        if let docx_rs::TableCellContent::Paragraph(paragraph) = content {
            let text = paragraph_text(paragraph);
            if !text.trim().is_empty() {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            run_text(run, &mut buffer);
        }
    }
    buffer
}

fn run_text(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::Tab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            _ => {}
        }
    }
}

/// Best-effort numeric conversion: a column becomes numeric only when every
/// cell parses as a number; one bad cell leaves the whole column as text.
fn coerce_numeric_columns(table: Table) -> Result<Table> {
    let columns = table
        .into_columns()
        .into_iter()
        .map(|mut column| {
            let parsed: Option<Vec<f64>> = column
                .values
                .iter()
                .map(|cell| match cell {
                    CellValue::Text(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                })
                .collect();
            if let Some(numbers) = parsed {
                column.values = numbers.into_iter().map(CellValue::Number).collect();
            }
            column
        })
        .collect();

    Table::new(columns)
}
