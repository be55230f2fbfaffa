use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{MergeError, Result};

/// The logical source documents the combined workbook is assembled from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Uuid,
    Jobs,
    Tech,
    TimeOff,
    Tgl,
}

/// How a single file is picked among the directory entries matching a
/// document's pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// First match in directory enumeration order.
    First,
    /// Greatest file name by plain string comparison. Dates that are not
    /// zero-padded ISO strings will not order chronologically.
    Latest,
    /// The pattern is a literal file name.
    Exact,
}

impl DocumentKind {
    /// Every document that must be present for a run to proceed.
    pub const REQUIRED: [DocumentKind; 4] = [
        DocumentKind::Uuid,
        DocumentKind::Jobs,
        DocumentKind::Tech,
        DocumentKind::TimeOff,
    ];

    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Uuid,
        DocumentKind::Jobs,
        DocumentKind::Tech,
        DocumentKind::TimeOff,
        DocumentKind::Tgl,
    ];

    /// File name pattern, matched against the bare file name.
    pub fn pattern(self) -> &'static str {
        match self {
            DocumentKind::Uuid => "????????-????-????-????-????????????.xlsx",
            DocumentKind::Jobs => "Copy of Jobs Report for Performance -DE2_Dated *.xlsx",
            DocumentKind::Tech => "Technician Department_Dated *.xlsx",
            DocumentKind::TimeOff => "Approved_Time_Off 2023.xlsx",
            DocumentKind::Tgl => "TGLs Set _Dated *.xlsx",
        }
    }

    pub fn selection(self) -> Selection {
        match self {
            DocumentKind::Uuid => Selection::First,
            DocumentKind::Jobs | DocumentKind::Tech | DocumentKind::Tgl => Selection::Latest,
            DocumentKind::TimeOff => Selection::Exact,
        }
    }

    /// Human readable name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Uuid => "UUID",
            DocumentKind::Jobs => "Jobs Report",
            DocumentKind::Tech => "Tech Department",
            DocumentKind::TimeOff => "Time Off",
            DocumentKind::Tgl => "TGLs Set",
        }
    }

    fn matcher(self) -> Result<GlobMatcher> {
        Ok(Glob::new(self.pattern())?.compile_matcher())
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Uuid => "uuid",
            DocumentKind::Jobs => "jobs",
            DocumentKind::Tech => "tech",
            DocumentKind::TimeOff => "time_off",
            DocumentKind::Tgl => "tgl",
        };
        f.write_str(name)
    }
}

/// Paths of the source documents chosen for one run. Every required document
/// resolves to an existing file; only the TGL document may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedFiles {
    pub uuid: PathBuf,
    pub jobs: PathBuf,
    pub tech: PathBuf,
    pub time_off: PathBuf,
    pub tgl: Option<PathBuf>,
}

impl LocatedFiles {
    pub fn get(&self, kind: DocumentKind) -> Option<&Path> {
        match kind {
            DocumentKind::Uuid => Some(&self.uuid),
            DocumentKind::Jobs => Some(&self.jobs),
            DocumentKind::Tech => Some(&self.tech),
            DocumentKind::TimeOff => Some(&self.time_off),
            DocumentKind::Tgl => self.tgl.as_deref(),
        }
    }

    /// Iterates over the documents that resolved to a path.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &Path)> + '_ {
        DocumentKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|path| (kind, path)))
    }
}

/// Checks that every required document has at least one candidate in the
/// directory, without choosing between candidates. Runs before anything is
/// written so a missing input never leaves a partial output behind.
#[instrument(level = "info", skip_all, fields(directory = %directory.display()))]
pub fn validate_required_files(directory: &Path) -> Result<()> {
    let listing = DirectoryListing::read(directory)?;

    for kind in DocumentKind::REQUIRED {
        if !listing.contains(kind)? {
            return Err(MergeError::MissingRequiredFile(kind));
        }
    }

    debug!(entries = listing.entries.len(), "all required files present");
    Ok(())
}

/// Resolves every logical document in `directory` to the file that should be
/// merged.
#[instrument(level = "info", skip_all, fields(directory = %directory.display()))]
pub fn find_latest_files(directory: &Path) -> Result<LocatedFiles> {
    let directory = std::path::absolute(directory)?;
    let listing = DirectoryListing::read(&directory)?;

    let required = |kind: DocumentKind| -> Result<PathBuf> {
        listing
            .resolve(kind)?
            .ok_or(MergeError::MissingRequiredFile(kind))
    };

    let files = LocatedFiles {
        uuid: required(DocumentKind::Uuid)?,
        jobs: required(DocumentKind::Jobs)?,
        tech: required(DocumentKind::Tech)?,
        time_off: required(DocumentKind::TimeOff)?,
        tgl: listing.resolve(DocumentKind::Tgl)?,
    };

    for (kind, path) in files.iter() {
        info!(document = %kind, path = %path.display(), "located source file");
    }
    Ok(files)
}

/// Regular files of a directory in enumeration order.
struct DirectoryListing {
    entries: Vec<(String, PathBuf)>,
}

impl DirectoryListing {
    fn read(directory: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push((name, path));
        }
        Ok(Self { entries })
    }

    fn matching<'a>(
        &'a self,
        matcher: &'a GlobMatcher,
    ) -> impl Iterator<Item = &'a (String, PathBuf)> + 'a {
        self.entries
            .iter()
            .filter(move |(name, _)| matcher.is_match(name))
    }

    fn contains(&self, kind: DocumentKind) -> Result<bool> {
        if kind.selection() == Selection::Exact {
            return Ok(self.exact(kind).is_some());
        }
        let matcher = kind.matcher()?;
        Ok(self.matching(&matcher).next().is_some())
    }

    fn exact(&self, kind: DocumentKind) -> Option<&PathBuf> {
        self.entries
            .iter()
            .find(|(name, _)| name == kind.pattern())
            .map(|(_, path)| path)
    }

    fn resolve(&self, kind: DocumentKind) -> Result<Option<PathBuf>> {
        let selected = match kind.selection() {
            Selection::Exact => self.exact(kind).cloned(),
            Selection::First => {
                let matcher = kind.matcher()?;
                let mut candidates = self.matching(&matcher);
                let first = candidates.next().map(|(_, path)| path.clone());
                let ignored = candidates.count();
                if ignored > 0 {
                    warn!(document = %kind, ignored, "several candidates found, using the first");
                }
                first
            }
            Selection::Latest => {
                let matcher = kind.matcher()?;
                self.matching(&matcher)
                    .max_by(|lhs, rhs| lhs.0.cmp(&rhs.0))
                    .map(|(_, path)| path.clone())
            }
        };
        Ok(selected)
    }
}
