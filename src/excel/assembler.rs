use super::types::*;

/// Combine file metadata, content hash and sheet infos into the output record
pub fn assemble(
    raw: &RawFile,
    hash: String,
    last_modified_date: String,
    last_modified_time: String,
    sheets: Vec<SheetInfo>,
) -> FileReadResult {
    FileReadResult {
        file: FileMetadata {
            name: raw.name.clone(),
            size: raw.size,
            mime_type: raw.mime_type.clone(),
            last_modified: raw.last_modified,
            last_modified_date,
            last_modified_time,
            hash,
        },
        sheets,
    }
}

impl FileReadResult {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Sheets in the older `{ fileName, columns }` shape
    pub fn legacy_sheets(&self) -> Vec<LegacySheetRecord> {
        self.sheets
            .iter()
            .map(|sheet| LegacySheetRecord {
                file_name: sheet.name.clone(),
                columns: sheet.columns.clone(),
            })
            .collect()
    }
}
