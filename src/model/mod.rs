use std::collections::BTreeMap;
use std::fmt;

/// Zero-based `(row, column)` coordinate of a cell.
pub type CellRef = (u32, u16);

/// A single cell value. Empty cells are never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Excel serial date together with the text it displays as.
    DateTime { serial: f64, text: String },
    /// Cached error result such as `#N/A`.
    Error(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(value) => f.write_str(value),
            CellValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            CellValue::Boolean(true) => f.write_str("True"),
            CellValue::Boolean(false) => f.write_str("False"),
            CellValue::DateTime { text, .. } => f.write_str(text),
            CellValue::Error(value) => f.write_str(value),
        }
    }
}

/// A named worksheet with sparse cell storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<CellRef, CellValue>,
    formulas: BTreeMap<CellRef, String>,
    column_widths: BTreeMap<u16, f64>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, cell: CellRef, value: CellValue) {
        self.cells.insert(cell, value);
    }

    pub fn value(&self, cell: CellRef) -> Option<&CellValue> {
        self.cells.get(&cell)
    }

    pub fn values(&self) -> impl Iterator<Item = (CellRef, &CellValue)> {
        self.cells.iter().map(|(cell, value)| (*cell, value))
    }

    /// Records the formula text of a cell. The cached value, if any, stays in
    /// the value map.
    pub fn set_formula(&mut self, cell: CellRef, formula: impl Into<String>) {
        self.formulas.insert(cell, formula.into());
    }

    pub fn formula(&self, cell: CellRef) -> Option<&str> {
        self.formulas.get(&cell).map(String::as_str)
    }

    pub fn formulas(&self) -> impl Iterator<Item = (CellRef, &str)> {
        self.formulas
            .iter()
            .map(|(cell, formula)| (*cell, formula.as_str()))
    }

    pub fn set_column_width(&mut self, column: u16, width: f64) {
        self.column_widths.insert(column, width);
    }

    pub fn column_width(&self, column: u16) -> Option<f64> {
        self.column_widths.get(&column).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.column_widths
            .iter()
            .map(|(column, width)| (*column, *width))
    }

    /// Number of cells holding either a value or a formula.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
            + self
                .formulas
                .keys()
                .filter(|cell| !self.cells.contains_key(cell))
                .count()
    }

    /// Highest row index holding a value or a formula.
    pub fn max_row(&self) -> Option<u32> {
        self.cells
            .keys()
            .chain(self.formulas.keys())
            .map(|(row, _)| *row)
            .max()
    }

    /// Highest column index holding a value or a formula.
    pub fn max_column(&self) -> Option<u16> {
        self.cells
            .keys()
            .chain(self.formulas.keys())
            .map(|(_, column)| *column)
            .max()
    }
}

/// Ordered collection of sheets held in memory until it is persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.iter_mut()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    /// Removes any sheet called `name` and appends a fresh empty one in its
    /// place at the end of the sheet order.
    pub fn upsert_sheet(&mut self, name: &str) -> &mut Sheet {
        self.sheets.retain(|sheet| sheet.name != name);
        self.sheets.push(Sheet::new(name));
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }
}
