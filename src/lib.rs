//! Core library for the sheet-combine command line application.
//!
//! A run locates a fixed set of spreadsheet exports in one directory
//! ([`locate`]), then merges their relevant sheets into a single workbook
//! seeded from the base document ([`merge`]). Workbooks are held in memory as
//! [`model::Workbook`] between the [`io`] adapters, and every written sheet
//! has its columns sized by [`autofit`].

pub mod autofit;
pub mod config;
pub mod error;
pub mod io;
pub mod locate;
pub mod merge;
pub mod model;

pub use config::MergeConfig;
pub use error::{MergeError, Result};
pub use locate::{DocumentKind, LocatedFiles};
pub use merge::{MergeReport, combine_workbooks};
