use crate::api::ApiClient;
use crate::application::download_coordinator::{plan_download, validate_url, CompletedDownload};
use crate::application::saver::save_download;
use crate::application::{DownloadCoordinator, DownloadEvent, DownloadId, Session};
use crate::config::Settings;
use crate::domain::{AppError, Format, Thumbnail, VideoInfo};
use crate::ui::{DownloadMessage, DownloadView, Transition};
use futures::StreamExt;
use iced::widget::image;
use iced::{window, Subscription, Task};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct DownloadApp {
    view: DownloadView,
    session: Session,
    coordinator: DownloadCoordinator,
    settings: Settings,
}

impl DownloadApp {
    pub fn new(settings: Settings) -> Self {
        let coordinator = DownloadCoordinator::new(ApiClient::new(settings.api_config()));
        let view = DownloadView::new(&settings.default_quality, &settings.default_bitrate);

        Self {
            view,
            session: Session::default(),
            coordinator,
            settings,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    InfoReceived(Result<VideoInfo, AppError>),
    /// (Thumbnail URL, decoded image)
    ThumbnailLoaded(String, Result<Thumbnail, AppError>),
    Download(DownloadId, Format, DownloadEvent),
    /// Save result of a completed download; `None` when the save dialog was dismissed
    SaveFinished(DownloadId, Result<Option<PathBuf>, AppError>),
    NotificationClosed,
    CloseRequested(window::Id),
}

/// Blocking notification for validation and failure messages
fn notify(title: &'static str, description: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title(title)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::NotificationClosed,
    )
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::FetchPressed => return start_check(app),
                DownloadMessage::DownloadPressed(format) => return start_download(app, format),
                DownloadMessage::CancelPressed => {
                    app.session.cancel_active();
                }
                _ => {}
            }
        }
        Message::InfoReceived(result) => match result {
            Ok(info) => {
                info!(title = %info.title, length = info.length, "video info received");
                let thumbnail_url = info.thumbnail_url.clone();

                app.session.set_current_info(info.clone());
                app.view.thumbnail = None;
                app.view.apply(Transition::CheckSucceeded(info));

                let coordinator = app.coordinator.clone();
                return Task::perform(
                    async move {
                        let result = coordinator.fetch_thumbnail(thumbnail_url.clone()).await;
                        (thumbnail_url, result)
                    },
                    |(url, result)| Message::ThumbnailLoaded(url, result),
                );
            }
            Err(e) => {
                warn!(error = %e, "video check failed");
                app.view.apply(Transition::CheckFailed(e.to_string()));
                return notify("Error", format!("Error: {}", e));
            }
        },
        Message::ThumbnailLoaded(url, result) => {
            let current = app.session.current_info().map(|info| info.thumbnail_url.as_str());
            if current != Some(url.as_str()) {
                debug!(url = %url, "ignoring stale thumbnail");
                return Task::none();
            }
            match result {
                Ok(thumb) => {
                    app.view.thumbnail = Some(image::Handle::from_rgba(
                        thumb.width,
                        thumb.height,
                        thumb.rgba,
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "thumbnail unavailable");
                }
            }
        }
        Message::Download(id, format, event) => return on_download_event(app, id, format, event),
        Message::SaveFinished(id, result) => {
            if let Err(e) = &result {
                warn!(error = %e, "saving download failed");
            }
            let failure = result.as_ref().err().map(|e| format!("Download failed: {}", e));
            app.view.apply(Transition::SaveFinished { id, result });
            if let Some(description) = failure {
                return notify("Download failed", description);
            }
        }
        Message::NotificationClosed => {}
        Message::CloseRequested(id) => {
            app.session.cancel_active();
            return window::close(id);
        }
    }
    Task::none()
}

fn start_check(app: &mut DownloadApp) -> Task<Message> {
    if app.view.state.is_checking() {
        return Task::none();
    }

    let url = match validate_url(&app.view.url) {
        Ok(url) => url.to_string(),
        Err(e) => return notify("Invalid input", e.to_string()),
    };

    app.view.apply(Transition::CheckStarted);

    let coordinator = app.coordinator.clone();
    Task::perform(
        async move { coordinator.fetch_info(url).await },
        Message::InfoReceived,
    )
}

fn start_download(app: &mut DownloadApp, format: Format) -> Task<Message> {
    let plan = match plan_download(
        app.session.current_info(),
        &app.view.url,
        format,
        &app.view.quality,
        &app.view.bitrate,
    ) {
        Ok(plan) => plan,
        Err(e) => return notify("Invalid input", e.to_string()),
    };

    let (id, cancel) = app.session.begin_download();
    app.view.apply(Transition::DownloadStarted { id, format });

    Task::stream(
        app.coordinator
            .download_stream(plan, cancel)
            .map(move |event| Message::Download(id, format, event)),
    )
}

fn on_download_event(
    app: &mut DownloadApp,
    id: DownloadId,
    format: Format,
    event: DownloadEvent,
) -> Task<Message> {
    match event {
        DownloadEvent::Started { total } => {
            debug!(?id, ?total, "download started");
        }
        DownloadEvent::Progress { received, total } => {
            app.view.apply(Transition::DownloadProgress {
                id,
                received,
                total,
            });
        }
        DownloadEvent::Completed(download) => {
            app.session.settle(id);
            app.view.apply(Transition::DownloadSettled {
                id,
                format,
                outcome: Ok(()),
            });
            return save(app, id, download);
        }
        DownloadEvent::Failed(e) => {
            app.session.settle(id);
            let cancelled = e.is_cancelled();
            let description = format!("Download failed: {}", e);
            app.view.apply(Transition::DownloadSettled {
                id,
                format,
                outcome: Err(e),
            });
            if !cancelled {
                return notify("Download failed", description);
            }
        }
    }
    Task::none()
}

fn save(app: &DownloadApp, id: DownloadId, download: CompletedDownload) -> Task<Message> {
    let target = app.settings.save_target();
    Task::perform(save_download(download, target), move |result| {
        Message::SaveFinished(id, result)
    })
}

pub fn subscription(_app: &DownloadApp) -> Subscription<Message> {
    window::close_requests().map(Message::CloseRequested)
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
