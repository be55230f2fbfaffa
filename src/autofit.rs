use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::model::{CellRef, Sheet};

/// Characters added to the longest value of a column.
pub const WIDTH_PADDING: usize = 2;

/// Length of an empty position inside the used range, which displays as
/// `None`.
pub const EMPTY_CELL_LENGTH: usize = 4;

/// Computes the width of every column from the first one up to the last used
/// column: the character count of the longest stringified cell plus
/// [`WIDTH_PADDING`]. Every row from the first one up to the last used row is
/// visited, so a column with any empty position is at least
/// [`EMPTY_CELL_LENGTH`] wide. Cells holding a formula are measured by the
/// formula text.
pub fn column_widths(sheet: &Sheet) -> BTreeMap<u16, f64> {
    let (Some(max_row), Some(max_column)) = (sheet.max_row(), sheet.max_column()) else {
        return BTreeMap::new();
    };
    let rows = max_row as usize + 1;

    let mut longest: BTreeMap<u16, usize> = (0..=max_column).map(|column| (column, 0)).collect();
    let mut occupied: BTreeMap<u16, BTreeSet<u32>> = BTreeMap::new();

    let mut measure = |(row, column): CellRef, length: usize| {
        occupied.entry(column).or_default().insert(row);
        let entry = longest.entry(column).or_insert(0);
        *entry = (*entry).max(length);
    };

    for (cell, value) in sheet.values() {
        if sheet.formula(cell).is_none() {
            measure(cell, value.to_string().chars().count());
        }
    }
    for (cell, formula) in sheet.formulas() {
        measure(cell, formula.chars().count());
    }

    longest
        .into_iter()
        .map(|(column, length)| {
            let filled = occupied.get(&column).map_or(0, BTreeSet::len);
            let length = if filled < rows {
                length.max(EMPTY_CELL_LENGTH)
            } else {
                length
            };
            (column, (length + WIDTH_PADDING) as f64)
        })
        .collect()
}

/// Applies [`column_widths`] to the sheet, overriding earlier widths of the
/// measured columns.
pub fn autofit_columns(sheet: &mut Sheet) {
    let widths = column_widths(sheet);
    debug!(sheet = %sheet.name, columns = widths.len(), "auto-fitting columns");
    for (column, width) in widths {
        sheet.set_column_width(column, width);
    }
}
