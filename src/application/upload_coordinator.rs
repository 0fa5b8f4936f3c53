use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt};

use super::upload_controller::{COMPLETE_PROGRESS, SENDING_PROGRESS, SUBMIT_PROGRESS};
use crate::{
    api::ApiClient,
    domain::{AppError, FileSource, SelectedFile},
    utils::REQUIRED_EXTENSION,
};

/// Pause on a full progress bar before switching to the result section
const SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Illustrative percentage, not transfer progress
    Progress(f32),
    Completed(Bytes),
    Failed(AppError),
}

#[derive(Clone)]
pub struct UploadCoordinator {
    api_client: ApiClient,
    settle_delay: Duration,
}

impl UploadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self {
            api_client,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    pub async fn pick_file(&self) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .add_filter("Power BI template", &[REQUIRED_EXTENSION])
            .pick_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub async fn load_file(&self, path: PathBuf) -> Result<SelectedFile, AppError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::Io(format!("Not a file: {}", path.display())))?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(AppError::Io(format!("Not a file: {}", path.display())));
        }

        Ok(SelectedFile {
            name,
            size: metadata.len(),
            source: FileSource::Path(path),
        })
    }

    pub fn upload_stream(&self, file: SelectedFile) -> BoxStream<'static, UploadEvent> {
        futures::stream::unfold(
            UploadRuntimeState::Start {
                client: self.api_client.clone(),
                file,
                settle_delay: self.settle_delay,
            },
            |state| async move {
                match state {
                    UploadRuntimeState::Start {
                        client,
                        file,
                        settle_delay,
                    } => Some((
                        UploadEvent::Progress(SUBMIT_PROGRESS),
                        UploadRuntimeState::Sending {
                            client,
                            file,
                            settle_delay,
                        },
                    )),
                    UploadRuntimeState::Sending {
                        client,
                        file,
                        settle_delay,
                    } => {
                        let read = file.read_contents().await;
                        match read {
                            Ok(content) => Some((
                                UploadEvent::Progress(SENDING_PROGRESS),
                                UploadRuntimeState::Requesting {
                                    client,
                                    file_name: file.name,
                                    content,
                                    settle_delay,
                                },
                            )),
                            Err(e) => Some((UploadEvent::Failed(e), UploadRuntimeState::Finished)),
                        }
                    }
                    UploadRuntimeState::Requesting {
                        client,
                        file_name,
                        content,
                        settle_delay,
                    } => {
                        match client.process_file(&file_name, content).await {
                            Ok(bytes) => Some((
                                UploadEvent::Progress(COMPLETE_PROGRESS),
                                UploadRuntimeState::Settling {
                                    bytes,
                                    settle_delay,
                                },
                            )),
                            Err(e) => Some((
                                UploadEvent::Failed(e.into()),
                                UploadRuntimeState::Finished,
                            )),
                        }
                    }
                    UploadRuntimeState::Settling {
                        bytes,
                        settle_delay,
                    } => {
                        if !settle_delay.is_zero() {
                            tokio::time::sleep(settle_delay).await;
                        }
                        Some((UploadEvent::Completed(bytes), UploadRuntimeState::Finished))
                    }
                    UploadRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_file_name(&suggested_filename)
            .add_filter("PDF", &["pdf"])
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub async fn save_artifact(&self, path: &Path, bytes: Bytes) -> Result<PathBuf, AppError> {
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path.to_path_buf())
    }
}

enum UploadRuntimeState {
    Start {
        client: ApiClient,
        file: SelectedFile,
        settle_delay: Duration,
    },
    Sending {
        client: ApiClient,
        file: SelectedFile,
        settle_delay: Duration,
    },
    Requesting {
        client: ApiClient,
        file_name: String,
        content: Bytes,
        settle_delay: Duration,
    },
    Settling {
        bytes: Bytes,
        settle_delay: Duration,
    },
    Finished,
}
