use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{MergeError, Result};
use crate::model::{CellRef, CellValue, Sheet, Workbook};

/// Loads every sheet of the workbook at `path` in its original order, keeping
/// both the cached values and the formula text of each cell.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let mut reader: Xlsx<_> = open_workbook(path)?;
    let mut workbook = Workbook::new();

    let names = reader.sheet_names().to_owned();
    for name in names {
        let mut sheet = Sheet::new(name.clone());

        if let Some(range) = reader.worksheet_range(&name) {
            copy_values(&range?, &mut sheet);
        }
        if let Some(formulas) = reader.worksheet_formula(&name) {
            copy_formulas(&formulas?, &mut sheet);
        }

        debug!(sheet = %name, cells = sheet.cell_count(), "loaded sheet");
        workbook.push_sheet(sheet);
    }

    Ok(workbook)
}

/// Reads the cached values of one named sheet. Formula text is never read,
/// so computed cells contribute their last saved result.
pub fn read_sheet_values(path: &Path, sheet_name: &str) -> Result<Sheet> {
    let mut reader: Xlsx<_> = open_workbook(path)?;
    let range = reader
        .worksheet_range(sheet_name)
        .ok_or_else(|| MergeError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet_name.to_string(),
        })??;

    let mut sheet = Sheet::new(sheet_name);
    copy_values(&range, &mut sheet);
    debug!(
        path = %path.display(),
        sheet = sheet_name,
        cells = sheet.cell_count(),
        "read source sheet"
    );
    Ok(sheet)
}

fn copy_values(range: &Range<DataType>, sheet: &mut Sheet) {
    let Some(start) = range.start() else {
        return;
    };
    for (row, column, cell) in range.used_cells() {
        if let Some(value) = cell_value(cell) {
            sheet.set_value(absolute(start, row, column), value);
        }
    }
}

fn copy_formulas(range: &Range<String>, sheet: &mut Sheet) {
    let Some(start) = range.start() else {
        return;
    };
    for (row, column, formula) in range.used_cells() {
        if formula.is_empty() {
            continue;
        }
        let text = if formula.starts_with('=') {
            formula.clone()
        } else {
            format!("={formula}")
        };
        sheet.set_formula(absolute(start, row, column), text);
    }
}

fn absolute(start: (u32, u32), row: usize, column: usize) -> CellRef {
    (start.0 + row as u32, (start.1 + column as u32) as u16)
}

fn cell_value(cell: &DataType) -> Option<CellValue> {
    let value = match cell {
        DataType::Empty => return None,
        DataType::String(value) => CellValue::String(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Boolean(*value),
        DataType::DateTime(serial) => CellValue::DateTime {
            serial: *serial,
            text: cell
                .as_datetime()
                .map(|datetime| datetime.to_string())
                .unwrap_or_else(|| serial.to_string()),
        },
        DataType::Error(error) => CellValue::Error(error.to_string()),
        other => CellValue::String(other.to_string()),
    };
    Some(value)
}
