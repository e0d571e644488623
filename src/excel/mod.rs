//! Excel module for turning an uploaded spreadsheet into a header summary.
//!
//! This module provides:
//! - Loading the selected file into memory
//! - Decoding only the first row of every sheet
//! - Header column extraction with display-text coercion
//! - SHA-256 content fingerprinting
//! - Modification time formatting
//! - Result assembly and the session state that holds the current result

pub mod types;
pub mod loader;
pub mod reader;
pub mod header;
pub mod checksum;
pub mod timestamp;
pub mod assembler;
pub mod pipeline;
pub mod session;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types and functions
pub use types::*;
pub use loader::{mime_type_for, SelectedFile};
pub use reader::parse_workbook;
pub use header::{cell_display_text, extract_columns, extract_sheets};
pub use checksum::{fingerprint, ContentHasher, DisabledHasher, Sha256Hasher};
pub use timestamp::{format_timestamp, format_timestamp_in, ClockZone};
pub use assembler::assemble;
pub use pipeline::Pipeline;
pub use session::{Session, SessionSnapshot, UploadOutcome};
