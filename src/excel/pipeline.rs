use std::sync::Arc;

use super::assembler::assemble;
use super::checksum::{fingerprint_async, ContentHasher, DisabledHasher, Sha256Hasher};
use super::header::extract_sheets;
use super::loader::SelectedFile;
use super::reader::parse_workbook;
use super::timestamp::format_timestamp;
use super::types::*;
use crate::config::IngestConfig;

/// Runs one upload from raw bytes to [`FileReadResult`]
#[derive(Clone)]
pub struct Pipeline {
    config: IngestConfig,
    hasher: Arc<dyn ContentHasher>,
}

impl Pipeline {
    pub fn new(config: IngestConfig) -> Self {
        let hasher: Arc<dyn ContentHasher> = if config.hash_contents {
            Arc::new(Sha256Hasher)
        } else {
            Arc::new(DisabledHasher)
        };

        Self { config, hasher }
    }

    pub fn with_hasher(config: IngestConfig, hasher: Arc<dyn ContentHasher>) -> Self {
        Self { config, hasher }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Load, parse, extract headers, hash and assemble.
    ///
    /// Read and parse failures abort the run. An unavailable hasher only
    /// empties the hash field.
    pub async fn run(&self, selected: &SelectedFile) -> Result<FileReadResult, IngestError> {
        let raw = selected.raw();
        tracing::info!(file = %raw.name, size = raw.size, "Reading spreadsheet");

        let buffer = selected.load_buffer().await?;

        let parse_buffer = buffer.clone();
        let workbook = tokio::task::spawn_blocking(move || parse_workbook(&parse_buffer))
            .await
            .map_err(|e| IngestError::parse(format!("Parser task failed: {}", e)))??;

        tracing::debug!(file = %raw.name, sheets = ?workbook.sheet_names(), "Decoded workbook");
        let sheets = extract_sheets(&workbook);
        drop(workbook);

        let hash = fingerprint_async(self.hasher.clone(), buffer).await;
        let (date, time) = format_timestamp(raw.last_modified, self.config.clock_zone);

        let result = assemble(raw, hash, date, time, sheets);

        match result.to_json() {
            Ok(json) => tracing::debug!(%json, "Assembled file read result"),
            Err(e) => tracing::warn!(error = %e, "Could not serialize file read result"),
        }

        Ok(result)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
