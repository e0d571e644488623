use calamine::Data;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown to the user when an upload cannot be processed.
/// The detailed cause goes to the operational log instead.
pub const GENERIC_FAILURE_NOTICE: &str = "Failed to process the file. Please try again.";

/// Metadata of a user-selected file, captured at selection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    /// Milliseconds since the Unix epoch
    pub last_modified: i64,
}

/// A populated cell of a sheet's header row, keyed by its column position
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub col: u32,
    pub value: Data,
}

/// Header row of one sheet as decoded by the parser
#[derive(Debug, Clone, PartialEq)]
pub struct SheetHeaderRow {
    pub name: String,
    /// `None` when the sheet has no first row at all
    pub first_row: Option<Vec<HeaderCell>>,
}

/// Decoded workbook, restricted to what header extraction needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<SheetHeaderRow>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Column names found in the first row of a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInfo {
    pub name: String,
    pub columns: Vec<String>,
}

/// File-level part of the output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub last_modified: i64,
    pub last_modified_date: String,
    pub last_modified_time: String,
    /// Lowercase hex SHA-256, or empty when hashing was unavailable
    pub hash: String,
}

/// Output of one upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReadResult {
    pub file: FileMetadata,
    pub sheets: Vec<SheetInfo>,
}

/// Reduced per-sheet record kept for consumers of the older output shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySheetRecord {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub columns: Vec<String>,
}

/// Failures that abort an upload
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read file '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workbook: {0}")]
    Parse(String),
}

impl IngestError {
    pub fn read(name: impl Into<String>, source: std::io::Error) -> Self {
        IngestError::Read {
            name: name.into(),
            source,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        IngestError::Parse(message.into())
    }

    /// The single notification surfaced to the user for any failure
    pub fn user_notice(&self) -> &'static str {
        GENERIC_FAILURE_NOTICE
    }
}

/// The hashing primitive could not produce a digest. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Content hashing unavailable: {reason}")]
pub struct HashUnavailable {
    pub reason: String,
}

impl HashUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        HashUnavailable {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IngestError::read(
            "book.xlsx",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to read file 'book.xlsx': denied");
        assert_eq!(err.user_notice(), GENERIC_FAILURE_NOTICE);

        let err = IngestError::parse("bad magic");
        assert_eq!(err.to_string(), "Failed to parse workbook: bad magic");
        assert_eq!(err.user_notice(), GENERIC_FAILURE_NOTICE);
    }

    #[test]
    fn test_workbook_sheet_names_in_order() {
        let workbook = Workbook {
            sheets: vec![
                SheetHeaderRow { name: "B".to_string(), first_row: None },
                SheetHeaderRow { name: "A".to_string(), first_row: Some(Vec::new()) },
            ],
        };
        assert_eq!(workbook.sheet_names(), vec!["B", "A"]);
    }
}
