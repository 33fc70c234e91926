pub mod state;

use iced::{
    widget::{
        button, column, image, pick_list, progress_bar, row, text, text_input, Column, Space,
    },
    Element, Length,
};

use crate::{
    config::{BITRATES, QUALITIES},
    domain::{Format, VideoInfo},
};

pub use state::{CheckState, Transition, ViewState};

/// Main view: form fields plus the rendered view state
pub struct DownloadView {
    pub url: String,
    pub quality: String,
    pub bitrate: String,
    pub state: ViewState,
    pub thumbnail: Option<image::Handle>,
    qualities: Vec<String>,
    bitrates: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    FetchPressed,
    QualitySelected(String),
    BitrateSelected(String),
    DownloadPressed(Format),
    CancelPressed,
}

impl DownloadView {
    pub fn new(quality: &str, bitrate: &str) -> Self {
        Self {
            url: String::new(),
            quality: quality.to_string(),
            bitrate: bitrate.to_string(),
            state: ViewState::default(),
            thumbnail: None,
            qualities: QUALITIES.iter().map(|q| q.to_string()).collect(),
            bitrates: BITRATES.iter().map(|b| b.to_string()).collect(),
        }
    }

    pub fn apply(&mut self, transition: Transition) {
        self.state = std::mem::take(&mut self.state).apply(transition);
    }

    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::QualitySelected(quality) => {
                self.quality = quality;
            }
            DownloadMessage::BitrateSelected(bitrate) => {
                self.bitrate = bitrate;
            }
            _ => {}
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let checking = self.state.is_checking();
        let fetch_button = button(if checking {
            "Checking..."
        } else {
            "Fetch Video Info"
        })
        .on_press_maybe((!checking).then_some(DownloadMessage::FetchPressed))
        .padding([10, 20]);

        let mut content = column![
            text("Video Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("Video URL:").size(16),
            row![
                text_input("Paste a YouTube URL...", &self.url)
                    .on_input(DownloadMessage::UrlChanged)
                    .on_submit(DownloadMessage::FetchPressed)
                    .padding(10),
                fetch_button,
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10);

        if let CheckState::Error(message) = &self.state.check {
            content = content.push(text(format!("Error: {}", message)).size(14));
        }

        if let Some(info) = &self.state.info {
            content = content
                .push(Space::new().height(Length::Fixed(10.0)))
                .push(self.preview(info))
                .push(self.options());
        }

        let download = &self.state.download;
        if download.visible {
            let mut progress = Column::new().spacing(6);
            if let Some(percent) = download.percent {
                progress = progress.push(progress_bar(0.0..=100.0, percent as f32));
            }
            progress = progress.push(text(&download.status).size(14)).push(
                button("Cancel")
                    .on_press_maybe(download.active.map(|_| DownloadMessage::CancelPressed))
                    .padding([6, 14]),
            );
            content = content
                .push(Space::new().height(Length::Fixed(10.0)))
                .push(progress);
        }

        content.into()
    }

    fn preview<'a>(&'a self, info: &'a VideoInfo) -> Element<'a, DownloadMessage> {
        let mut details = column![
            text(&info.title).size(20),
            text(format!("Duration: {}", info.formatted_duration())).size(14),
        ]
        .spacing(4);

        if info.is_short {
            details = details.push(text("YouTube Short").size(12));
        }
        if !info.available {
            details = details.push(text("Reported as unavailable").size(12));
        }

        match &self.thumbnail {
            Some(handle) => row![image(handle.clone()).width(Length::Fixed(240.0)), details]
                .spacing(16)
                .into(),
            None => details.into(),
        }
    }

    fn options(&self) -> Element<'_, DownloadMessage> {
        let busy = |format| self.state.download.is_busy(format);

        column![
            row![
                text("Quality:").size(14),
                pick_list(
                    self.qualities.as_slice(),
                    Some(&self.quality),
                    DownloadMessage::QualitySelected
                ),
                button("Download Video")
                    .on_press_maybe(
                        (!busy(Format::Video)).then_some(DownloadMessage::DownloadPressed(Format::Video))
                    )
                    .padding([10, 20]),
            ]
            .spacing(10),
            row![
                text("Bitrate (kbps):").size(14),
                pick_list(
                    self.bitrates.as_slice(),
                    Some(&self.bitrate),
                    DownloadMessage::BitrateSelected
                ),
                button("Download MP3")
                    .on_press_maybe(
                        (!busy(Format::Audio)).then_some(DownloadMessage::DownloadPressed(Format::Audio))
                    )
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_edits_form_fields_only() {
        let mut view = DownloadView::new("720p", "192");

        view.update(DownloadMessage::UrlChanged("https://youtu.be/x".to_string()));
        view.update(DownloadMessage::QualitySelected("1080p".to_string()));
        view.update(DownloadMessage::BitrateSelected("320".to_string()));
        assert_eq!(view.url, "https://youtu.be/x");
        assert_eq!(view.quality, "1080p");
        assert_eq!(view.bitrate, "320");

        view.update(DownloadMessage::FetchPressed);
        view.update(DownloadMessage::DownloadPressed(Format::Audio));
        view.update(DownloadMessage::CancelPressed);
        assert_eq!(view.state, ViewState::default());
        assert_eq!(view.url, "https://youtu.be/x");
    }
}
