use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use tracing::debug;

use crate::error::Result;
use crate::model::{CellValue, Sheet, Workbook};

/// Display format applied to date-time cells.
pub const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the provided workbook to the given path, replacing any existing
/// file.
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let mut workbook_writer = XlsxWorkbook::new();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for sheet in workbook.sheets() {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &datetime_format)?;
        debug!(sheet = %sheet.name, cells = sheet.cell_count(), "sheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, datetime_format: &Format) -> Result<()> {
    for ((row, col), value) in sheet.values() {
        if sheet.formula((row, col)).is_some() {
            continue;
        }
        match value {
            CellValue::String(text) | CellValue::Error(text) => {
                worksheet.write_string(row, col, text)?;
            }
            CellValue::Number(number) => {
                worksheet.write_number(row, col, *number)?;
            }
            CellValue::Boolean(flag) => {
                worksheet.write_boolean(row, col, *flag)?;
            }
            CellValue::DateTime { serial, .. } => {
                worksheet.write_number_with_format(row, col, *serial, datetime_format)?;
            }
        }
    }

    for ((row, col), formula) in sheet.formulas() {
        worksheet.write_formula(row, col, formula)?;
    }

    for (col, width) in sheet.column_widths() {
        worksheet.set_column_width(col, width)?;
    }

    Ok(())
}
