use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::autofit::autofit_columns;
use crate::config::MergeConfig;
use crate::error::Result;
use crate::io::{excel_read, excel_write};
use crate::locate::{DocumentKind, LocatedFiles, find_latest_files, validate_required_files};
use crate::model::Workbook;

/// One source sheet copied into a named sheet of the combined workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetCopy {
    pub document: DocumentKind,
    pub source_sheet: &'static str,
    pub target_sheet: &'static str,
}

/// Copies applied on top of the base workbook, in order.
pub const SHEET_COPIES: [SheetCopy; 4] = [
    SheetCopy {
        document: DocumentKind::Jobs,
        source_sheet: "Sheet1",
        target_sheet: "Sheet1",
    },
    SheetCopy {
        document: DocumentKind::Tech,
        source_sheet: "Sheet1",
        target_sheet: "Sheet1_Tech",
    },
    SheetCopy {
        document: DocumentKind::TimeOff,
        source_sheet: "2024",
        target_sheet: "2024",
    },
    SheetCopy {
        document: DocumentKind::Tgl,
        source_sheet: "Sheet1",
        target_sheet: "Sheet1_TGL",
    },
];

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    pub files: LocatedFiles,
    pub sheets: Vec<String>,
    pub tgl_included: bool,
}

/// Locates the source documents in the configured directory and combines
/// them into the configured output workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(directory = %config.directory().display(), output = %config.output_path().display())
)]
pub fn combine_workbooks(config: &MergeConfig) -> Result<MergeReport> {
    validate_required_files(config.directory())?;
    let files = find_latest_files(config.directory())?;
    merge_files(&files, &config.output_path())
}

/// Seeds `output` with a byte copy of the base document, then upserts one
/// sheet per located source and persists the result. A failure part way
/// leaves whatever was already written at `output`.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn merge_files(files: &LocatedFiles, output: &Path) -> Result<MergeReport> {
    if same_file(output, &files.uuid)? {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "output path is the base workbook itself",
        )
        .into());
    }

    fs::copy(&files.uuid, output)?;
    let mut workbook = excel_read::read_workbook(output)?;
    for sheet in workbook.sheets_mut() {
        autofit_columns(sheet);
    }
    info!(sheets = workbook.sheets().len(), "loaded base workbook");

    let mut tgl_included = false;
    for copy in &SHEET_COPIES {
        let Some(source) = files.get(copy.document) else {
            info!(document = %copy.document, "optional document absent, skipping");
            continue;
        };
        copy_sheet(&mut workbook, source, copy.source_sheet, copy.target_sheet)?;
        tgl_included |= copy.document == DocumentKind::Tgl;
    }

    excel_write::write_workbook(output, &workbook)?;
    info!("combined workbook written");

    Ok(MergeReport {
        output: output.to_path_buf(),
        files: files.clone(),
        sheets: workbook.sheet_names(),
        tgl_included,
    })
}

/// Replaces `target_sheet` in the workbook with the cached values of
/// `source_sheet` from the workbook at `source`, cell for cell, then
/// auto-fits its columns.
pub fn copy_sheet(
    workbook: &mut Workbook,
    source: &Path,
    source_sheet: &str,
    target_sheet: &str,
) -> Result<()> {
    let source_values = excel_read::read_sheet_values(source, source_sheet)?;

    let target = workbook.upsert_sheet(target_sheet);
    for (cell, value) in source_values.values() {
        target.set_value(cell, value.clone());
    }
    autofit_columns(target);

    debug!(
        source = %source.display(),
        sheet = target_sheet,
        cells = target.cell_count(),
        "sheet copied"
    );
    Ok(())
}

/// Whether `output` names the existing file at `existing`, after resolving
/// symlinks and `..` components. `output` itself may not exist yet.
fn same_file(output: &Path, existing: &Path) -> Result<bool> {
    let existing = fs::canonicalize(existing)?;
    if output.exists() {
        return Ok(fs::canonicalize(output)? == existing);
    }
    let Some(name) = output.file_name() else {
        return Ok(false);
    };
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(fs::canonicalize(parent)?.join(name) == existing)
}
