//! Reads the sheet names and header columns of a spreadsheet and
//! fingerprints its contents, without sending the file anywhere.
//!
//! ```no_run
//! use sheet_probe::{IngestConfig, SelectedFile, Session, UploadOutcome};
//!
//! # async fn demo() -> Result<(), sheet_probe::IngestError> {
//! let session = Session::new(IngestConfig::default());
//! let selected = SelectedFile::from_path("report.xlsx").await?;
//!
//! if let UploadOutcome::Completed(result) = session.handle_selection(Some(selected)).await {
//!     for sheet in &result.sheets {
//!         println!("{}: {:?}", sheet.name, sheet.columns);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod excel;

pub use config::IngestConfig;
pub use excel::{
    FileMetadata, FileReadResult, IngestError, Pipeline, SelectedFile, Session, SessionSnapshot,
    SheetInfo, UploadOutcome,
};
