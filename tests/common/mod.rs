#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use quick_xml::events::Event;
use rust_xlsxwriter::Workbook;
use zip::ZipArchive;

pub const UUID_NAME: &str = "11111111-1111-1111-1111-111111111111.xlsx";
pub const JOBS_OLD: &str = "Copy of Jobs Report for Performance -DE2_Dated 2024-01-01.xlsx";
pub const JOBS_NEW: &str = "Copy of Jobs Report for Performance -DE2_Dated 2024-02-01.xlsx";
pub const TECH_NAME: &str = "Technician Department_Dated 2024-01-01.xlsx";
pub const TIME_OFF_NAME: &str = "Approved_Time_Off 2023.xlsx";
pub const TGL_NAME: &str = "TGLs Set _Dated 2024-01-15.xlsx";

/// Rows of a fixture sheet. Cells that parse as numbers are written as
/// numbers, `TRUE`/`FALSE` as booleans, a leading `=` as a formula, and
/// empty strings are left blank.
pub type Rows<'a> = &'a [&'a [&'a str]];

pub fn write_fixture(path: &Path, sheets: &[(&str, Rows<'_>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet name accepted");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (row, col) = (row_idx as u32, col_idx as u16);
                if cell.is_empty() {
                    continue;
                }
                if let Some(formula) = cell.strip_prefix('=') {
                    worksheet.write_formula(row, col, formula).expect("formula written");
                } else if let Ok(number) = cell.parse::<f64>() {
                    worksheet.write_number(row, col, number).expect("number written");
                } else if *cell == "TRUE" || *cell == "FALSE" {
                    worksheet
                        .write_boolean(row, col, *cell == "TRUE")
                        .expect("boolean written");
                } else {
                    worksheet.write_string(row, col, *cell).expect("string written");
                }
            }
        }
    }
    workbook.save(path).expect("fixture saved");
}

pub fn touch(directory: &Path, name: &str) -> PathBuf {
    let path = directory.join(name);
    fs::write(&path, b"").expect("file created");
    path
}

pub const BASE_SUMMARY: Rows<'static> = &[&["Team", "Total"], &["North", "=1+1"]];
pub const BASE_STALE: Rows<'static> = &[&["stale"], &["", "", "old value"]];
pub const JOBS_OLD_ROWS: Rows<'static> = &[&["Job", "Hours"], &["outdated", "1"]];
pub const JOBS_ROWS: Rows<'static> = &[
    &["Job", "Technician", "Hours"],
    &["J-100", "Alice", "7.5"],
    &["J-101", "", "12"],
    &["J-102 with a long description", "Bob", "TRUE"],
];
pub const TECH_ROWS: Rows<'static> = &[&["Technician", "Department"], &["Alice", "DE2"]];
pub const TIME_OFF_2023_ROWS: Rows<'static> = &[&["ignored"]];
pub const TIME_OFF_ROWS: Rows<'static> = &[&["Name", "Days"], &["Bob", "3"]];
pub const TGL_ROWS: Rows<'static> = &[&["TGL", "Lead"], &["North", "Carol"]];

/// Populates `directory` with the scenario documents: a base file carrying a
/// stale `Sheet1`, two dated jobs reports, a tech report and the time off
/// file. The TGL document is only written when `with_tgl` is set.
pub fn write_scenario(directory: &Path, with_tgl: bool) {
    write_fixture(
        &directory.join(UUID_NAME),
        &[("Summary", BASE_SUMMARY), ("Sheet1", BASE_STALE)],
    );
    write_fixture(&directory.join(JOBS_OLD), &[("Sheet1", JOBS_OLD_ROWS)]);
    write_fixture(&directory.join(JOBS_NEW), &[("Sheet1", JOBS_ROWS)]);
    write_fixture(&directory.join(TECH_NAME), &[("Sheet1", TECH_ROWS)]);
    write_fixture(
        &directory.join(TIME_OFF_NAME),
        &[("2023", TIME_OFF_2023_ROWS), ("2024", TIME_OFF_ROWS)],
    );
    if with_tgl {
        write_fixture(&directory.join(TGL_NAME), &[("Sheet1", TGL_ROWS)]);
    }
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).expect("workbook opened");
    workbook.sheet_names().to_owned()
}

pub fn sheet_range(path: &Path, name: &str) -> Range<DataType> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("workbook opened");
    workbook
        .worksheet_range(name)
        .expect("sheet present")
        .expect("sheet readable")
}

/// Asserts that every non-empty cell of `source` holds the same value at the
/// same coordinates in `target`.
pub fn assert_same_values(source: &Range<DataType>, target: &Range<DataType>) {
    let start = source.start().expect("source has cells");
    for (row, col, value) in source.used_cells() {
        let position = (start.0 + row as u32, start.1 + col as u32);
        assert_eq!(
            target.get_value(position),
            Some(value),
            "cell {position:?} differs"
        );
    }
}

/// Reads the `<col>` widths stored for the sheet at `sheet_index` (zero-based,
/// in workbook order), keyed by zero-based column.
pub fn written_column_widths(path: &Path, sheet_index: usize) -> BTreeMap<u16, f64> {
    let file = File::open(path).expect("workbook opened");
    let mut archive = ZipArchive::new(file).expect("workbook is a zip archive");
    let sheet_path = format!("xl/worksheets/sheet{}.xml", sheet_index + 1);
    let sheet_xml = archive.by_name(&sheet_path).expect("sheet part present");

    let mut reader = quick_xml::Reader::from_reader(BufReader::new(sheet_xml));
    let mut buf = Vec::new();
    let mut widths = BTreeMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"col" => {
                let (mut min, mut max, mut width) = (0u16, 0u16, 0f64);
                for attr in e.attributes() {
                    let attr = attr.expect("attribute parsed");
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"min" => min = value.parse().expect("numeric min"),
                        b"max" => max = value.parse().expect("numeric max"),
                        b"width" => width = value.parse().expect("numeric width"),
                        _ => {}
                    }
                }
                for column in min..=max {
                    widths.insert(column - 1, width);
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => panic!("XML parsing error: {error}"),
            _ => {}
        }
        buf.clear();
    }

    widths
}

/// Asserts that the stored widths match the character widths requested for
/// each column. The writer adds a fraction of a character of cell padding,
/// so the stored value lies within one character above the request.
pub fn assert_written_widths(written: &BTreeMap<u16, f64>, expected: &[(u16, f64)]) {
    for (column, width) in expected {
        let stored = written
            .get(column)
            .unwrap_or_else(|| panic!("no width stored for column {column}"));
        assert!(
            *stored >= *width && *stored < width + 1.0,
            "column {column}: stored width {stored}, expected about {width}"
        );
    }
}
