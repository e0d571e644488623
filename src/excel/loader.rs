use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::*;

/// Where the bytes of a selected file live
#[derive(Debug, Clone)]
enum FileOrigin {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file the user picked, with its metadata captured at selection time
#[derive(Debug, Clone)]
pub struct SelectedFile {
    raw: RawFile,
    origin: FileOrigin,
}

impl SelectedFile {
    /// Select a file on disk, reading its metadata but not its contents
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| IngestError::read(&name, e))?;

        if !metadata.is_file() {
            return Err(IngestError::read(
                name,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let last_modified = metadata.modified().map(system_time_to_millis).unwrap_or(0);

        Ok(SelectedFile {
            raw: RawFile {
                mime_type: mime_type_for(&name).to_string(),
                name,
                size: metadata.len(),
                last_modified,
            },
            origin: FileOrigin::Path(path),
        })
    }

    /// Select a file whose contents the caller already holds
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>, last_modified: i64) -> Self {
        let name = name.into();
        let bytes = bytes.into();

        SelectedFile {
            raw: RawFile {
                mime_type: mime_type_for(&name).to_string(),
                size: bytes.len() as u64,
                name,
                last_modified,
            },
            origin: FileOrigin::Memory(bytes),
        }
    }

    pub fn raw(&self) -> &RawFile {
        &self.raw
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    /// Lowercased extension of the file name, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.raw.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Read the full contents of the file
    pub async fn load_buffer(&self) -> Result<Arc<[u8]>, IngestError> {
        match &self.origin {
            FileOrigin::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| IngestError::read(&self.raw.name, e))?;
                Ok(Arc::from(bytes))
            }
            FileOrigin::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// MIME type for the spreadsheet extensions we know, empty otherwise
pub fn mime_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xlsm") => "application/vnd.ms-excel.sheet.macroEnabled.12",
        Some("xlsb") => "application/vnd.ms-excel.sheet.binary.macroEnabled.12",
        Some("xls") => "application/vnd.ms-excel",
        Some("ods") => "application/vnd.oasis.opendocument.spreadsheet",
        _ => "",
    }
}

/// Milliseconds since the Unix epoch, negative for earlier instants
fn system_time_to_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mime_types() {
        assert_eq!(
            mime_type_for("Report.XLSX"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(mime_type_for("legacy.xls"), "application/vnd.ms-excel");
        assert_eq!(mime_type_for("notes.txt"), "");
        assert_eq!(mime_type_for("no_extension"), "");
    }

    #[test]
    fn test_system_time_to_millis() {
        let after = UNIX_EPOCH + Duration::from_millis(1_700_000_000_000);
        assert_eq!(system_time_to_millis(after), 1_700_000_000_000);

        let before = UNIX_EPOCH - Duration::from_millis(1_500);
        assert_eq!(system_time_to_millis(before), -1_500);
    }

    #[tokio::test]
    async fn test_from_bytes() {
        let file = SelectedFile::from_bytes("Book.xlsx", vec![1u8, 2, 3], 42);

        assert_eq!(file.raw().size, 3);
        assert_eq!(file.raw().last_modified, 42);
        assert_eq!(file.extension().as_deref(), Some("xlsx"));
        assert_eq!(&*file.load_buffer().await.unwrap(), &[1u8, 2, 3][..]);
    }

    #[tokio::test]
    async fn test_from_path_reads_metadata_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.xls");
        std::fs::write(&path, b"not really xls").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "sales.xls");
        assert_eq!(file.raw().size, 14);
        assert_eq!(file.raw().mime_type, "application/vnd.ms-excel");
        assert!(file.raw().last_modified > 0);

        let buffer = file.load_buffer().await.unwrap();
        assert_eq!(&*buffer, b"not really xls");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(dir.path().join("gone.xlsx")).await.unwrap_err();
        assert!(matches!(err, IngestError::Read { ref name, .. } if name == "gone.xlsx"));
    }

    #[tokio::test]
    async fn test_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(dir.path()).await.unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }

    #[tokio::test]
    async fn test_file_removed_after_selection_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, b"bytes").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(file.load_buffer().await, Err(IngestError::Read { .. })));
    }
}
