use bytes::{Bytes, BytesMut};
use futures::{stream::BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    api::{models::DownloadBody, ApiClient, ApiError},
    application::thumbnail::decode_thumbnail,
    domain::{AppError, DownloadPlan, DownloadRequest, Format, Thumbnail, VideoInfo},
    utils::output_filename,
};

const CHECK_FAILED: &str = "Failed to fetch video info";
const DOWNLOAD_FAILED: &str = "Download failed";

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    /// Response headers arrived
    Started { total: Option<u64> },
    /// A chunk arrived; `received` is the running byte count
    Progress { received: u64, total: Option<u64> },
    Completed(CompletedDownload),
    /// Terminal failure, including `AppError::Cancelled`
    Failed(AppError),
}

/// Fully buffered download, ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    pub file_name: String,
    pub data: Bytes,
}

/// Reject an empty URL before anything touches the network
pub fn validate_url(url: &str) -> Result<&str, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validation(
            "Please enter a YouTube URL.".to_string(),
        ));
    }
    Ok(url)
}

/// Check the download preconditions and build the request.
/// Needs metadata from a successful fetch to name the output file.
pub fn plan_download(
    info: Option<&VideoInfo>,
    url: &str,
    format: Format,
    quality: &str,
    bitrate: &str,
) -> Result<DownloadPlan, AppError> {
    let info = info.ok_or_else(|| {
        AppError::Validation("Please fetch video info first.".to_string())
    })?;

    Ok(DownloadPlan {
        title: info.title.clone(),
        request: DownloadRequest::new(url, format, quality, bitrate),
        suggested_filename: output_filename(&info.title, format),
    })
}

fn api_failure(err: ApiError, fallback: &str) -> AppError {
    match err {
        ApiError::ServerError { message, .. } => {
            AppError::Server(message.unwrap_or_else(|| fallback.to_string()))
        }
        other => {
            error!(error = %other, "network failure");
            AppError::Network(other.to_string())
        }
    }
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    pub async fn fetch_info(&self, url: String) -> Result<VideoInfo, AppError> {
        let url = validate_url(&url)?;
        info!(url, "checking video");

        let response = self
            .api_client
            .check(url)
            .await
            .map_err(|e| api_failure(e, CHECK_FAILED))?;

        Ok(VideoInfo {
            title: response.title,
            length: response.length.unwrap_or(0),
            thumbnail_url: response.thumbnail,
            available: response.available,
            is_short: response.is_short,
        })
    }

    pub async fn fetch_thumbnail(&self, url: String) -> Result<Thumbnail, AppError> {
        let bytes = self
            .api_client
            .fetch_thumbnail(&url)
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        decode_thumbnail(&bytes)
    }

    /// Issue the download request and stream its progress.
    ///
    /// The stream ends after exactly one terminal event: `Completed` or `Failed`.
    pub fn download_stream(
        &self,
        plan: DownloadPlan,
        cancel: CancellationToken,
    ) -> BoxStream<'static, DownloadEvent> {
        run_download(DownloadRuntimeState::Start {
            client: self.api_client.clone(),
            plan,
            cancel,
        })
    }
}

fn run_download(initial: DownloadRuntimeState) -> BoxStream<'static, DownloadEvent> {
    futures::stream::unfold(initial, |state| async move {
        match state {
            DownloadRuntimeState::Start {
                client,
                plan,
                cancel,
            } => {
                let request = &plan.request;
                let body = DownloadBody {
                    url: &request.url,
                    format: request.format.as_str(),
                    quality: request.quality.as_deref(),
                    bitrate: request.bitrate.as_deref(),
                };
                info!(title = %plan.title, format = %request.format, "starting download");

                let response = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("download cancelled before response");
                        return Some((
                            DownloadEvent::Failed(AppError::Cancelled),
                            DownloadRuntimeState::Finished,
                        ));
                    }
                    response = client.download_stream(&body) => response,
                };

                match response {
                    Ok((total, stream)) => Some((
                        DownloadEvent::Started { total },
                        DownloadRuntimeState::Downloading {
                            stream,
                            buffer: BytesMut::new(),
                            received: 0,
                            total,
                            file_name: plan.suggested_filename,
                            cancel,
                        },
                    )),
                    Err(e) => Some((
                        DownloadEvent::Failed(api_failure(e, DOWNLOAD_FAILED)),
                        DownloadRuntimeState::Finished,
                    )),
                }
            }
            DownloadRuntimeState::Downloading {
                mut stream,
                mut buffer,
                mut received,
                total,
                file_name,
                cancel,
            } => {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!(received, "download cancelled");
                        return Some((
                            DownloadEvent::Failed(AppError::Cancelled),
                            DownloadRuntimeState::Finished,
                        ));
                    }
                    next = stream.next() => next,
                };

                match next {
                    Some(Ok(chunk)) => {
                        buffer.extend_from_slice(&chunk);
                        received += chunk.len() as u64;
                        debug!(received, ?total, "chunk received");

                        Some((
                            DownloadEvent::Progress { received, total },
                            DownloadRuntimeState::Downloading {
                                stream,
                                buffer,
                                received,
                                total,
                                file_name,
                                cancel,
                            },
                        ))
                    }
                    Some(Err(e)) => Some((
                        DownloadEvent::Failed(api_failure(e, DOWNLOAD_FAILED)),
                        DownloadRuntimeState::Finished,
                    )),
                    None => {
                        info!(received, file_name = %file_name, "download complete");
                        Some((
                            DownloadEvent::Completed(CompletedDownload {
                                file_name,
                                data: buffer.freeze(),
                            }),
                            DownloadRuntimeState::Finished,
                        ))
                    }
                }
            }
            DownloadRuntimeState::Finished => None,
        }
    })
    .boxed()
}

enum DownloadRuntimeState {
    Start {
        client: ApiClient,
        plan: DownloadPlan,
        cancel: CancellationToken,
    },
    Downloading {
        stream: BoxStream<'static, crate::api::Result<Bytes>>,
        buffer: BytesMut,
        received: u64,
        total: Option<u64>,
        file_name: String,
        cancel: CancellationToken,
    },
    Finished,
}
