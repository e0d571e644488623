use serde::Serialize;
use tokio::sync::Mutex;

use super::loader::SelectedFile;
use super::pipeline::Pipeline;
use super::types::*;
use crate::config::IngestConfig;

/// What the presentation layer reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub sheets: Vec<SheetInfo>,
    pub is_loading: bool,
    pub result: Option<FileReadResult>,
}

/// How one selection event ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was selected (or the selection was filtered out); state untouched
    NoFileSelected,
    Completed(FileReadResult),
    /// The run was aborted; `notice` is the message for the user
    Failed { notice: String },
}

#[derive(Debug, Default)]
struct SessionState {
    sheets: Vec<SheetInfo>,
    /// Uploads currently running
    in_flight: usize,
    result: Option<FileReadResult>,
}

/// Holds the current result and applies upload transitions to it.
///
/// Overlapping uploads are allowed: whichever finishes last replaces the
/// result.
#[derive(Debug)]
pub struct Session {
    pipeline: Pipeline,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(config: IngestConfig) -> Self {
        Self::with_pipeline(Pipeline::new(config))
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            sheets: state.sheets.clone(),
            is_loading: state.in_flight > 0,
            result: state.result.clone(),
        }
    }

    pub async fn current_result(&self) -> Option<FileReadResult> {
        self.state.lock().await.result.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.in_flight > 0
    }

    /// Handle a file-selection event.
    ///
    /// `None` means the user cancelled; the state is left exactly as it was.
    pub async fn handle_selection(&self, selection: Option<SelectedFile>) -> UploadOutcome {
        let Some(selected) = selection else {
            return UploadOutcome::NoFileSelected;
        };

        let accepted = selected
            .extension()
            .is_some_and(|ext| self.pipeline.config().accepts_extension(&ext));
        if !accepted {
            tracing::debug!(file = %selected.name(), "Ignoring file outside the extension filter");
            return UploadOutcome::NoFileSelected;
        }

        self.state.lock().await.in_flight += 1;

        let outcome = self.pipeline.run(&selected).await;

        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);

        match outcome {
            Ok(result) => {
                tracing::info!(
                    file = %result.file.name,
                    sheet_count = result.sheets.len(),
                    "Spreadsheet processed"
                );
                state.sheets = result.sheets.clone();
                state.result = Some(result.clone());
                UploadOutcome::Completed(result)
            }
            Err(e) => {
                tracing::error!(file = %selected.name(), error = %e, "Failed to process spreadsheet");
                UploadOutcome::Failed {
                    notice: e.user_notice().to_string(),
                }
            }
        }
    }
}
