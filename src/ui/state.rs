//! View state and its transition function.
//!
//! Everything here is plain data; the iced layer only reads it.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::{
    application::DownloadId,
    domain::{progress_percent, AppError, DownloadPhase, Format, VideoInfo},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    Idle,
    Checking,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadState {
    pub phase: DownloadPhase,
    /// Download whose progress is displayed
    pub active: Option<DownloadId>,
    /// Completed download whose save result is still shown
    pub saving: Option<DownloadId>,
    /// Formats whose trigger is disabled because their download is running
    pub busy: HashSet<Format>,
    /// `None` while indeterminate
    pub percent: Option<u32>,
    pub status: String,
    pub visible: bool,
}

impl Default for DownloadState {
    fn default() -> Self {
        Self {
            phase: DownloadPhase::Idle,
            active: None,
            saving: None,
            busy: HashSet::new(),
            percent: None,
            status: String::new(),
            visible: false,
        }
    }
}

impl DownloadState {
    pub fn is_busy(&self, format: Format) -> bool {
        self.busy.contains(&format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub check: CheckState,
    /// Preview of the last successful check
    pub info: Option<VideoInfo>,
    pub download: DownloadState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            check: CheckState::Idle,
            info: None,
            download: DownloadState::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Transition {
    CheckStarted,
    CheckSucceeded(VideoInfo),
    CheckFailed(String),
    DownloadStarted {
        id: DownloadId,
        format: Format,
    },
    DownloadProgress {
        id: DownloadId,
        received: u64,
        total: Option<u64>,
    },
    DownloadSettled {
        id: DownloadId,
        format: Format,
        outcome: Result<(), AppError>,
    },
    SaveFinished {
        id: DownloadId,
        result: Result<Option<PathBuf>, AppError>,
    },
}

impl ViewState {
    pub fn is_checking(&self) -> bool {
        self.check == CheckState::Checking
    }

    pub fn apply(mut self, transition: Transition) -> Self {
        match transition {
            Transition::CheckStarted => {
                self.check = CheckState::Checking;
            }
            Transition::CheckSucceeded(info) => {
                self.check = CheckState::Ready;
                self.info = Some(info);
            }
            Transition::CheckFailed(message) => {
                // a previous preview stays on screen
                self.check = match self.info {
                    Some(_) => CheckState::Ready,
                    None => CheckState::Error(message),
                };
            }
            Transition::DownloadStarted { id, format } => {
                let download = &mut self.download;
                download.busy.insert(format);
                download.active = Some(id);
                download.saving = None;
                download.visible = true;
                download.phase = DownloadPhase::Preparing;
                download.percent = Some(0);
                download.status = "Preparing download...".to_string();
            }
            Transition::DownloadProgress {
                id,
                received,
                total,
            } => {
                let download = &mut self.download;
                if download.active == Some(id) {
                    download.phase = DownloadPhase::Downloading;
                    download.percent = progress_percent(received, total);
                    download.status = match download.percent {
                        Some(percent) => format!("Downloading... {}%", percent),
                        None => "Downloading...".to_string(),
                    };
                }
            }
            Transition::DownloadSettled {
                id,
                format,
                outcome,
            } => {
                let download = &mut self.download;
                download.busy.remove(&format);
                if download.active == Some(id) {
                    download.active = None;
                    match outcome {
                        Ok(()) => {
                            download.phase = DownloadPhase::AwaitingSavePath;
                            download.saving = Some(id);
                            download.percent = Some(100);
                            download.status = "Download complete.".to_string();
                        }
                        Err(AppError::Cancelled) => {
                            download.phase = DownloadPhase::Cancelled;
                            download.status = AppError::Cancelled.to_string();
                        }
                        Err(e) => {
                            download.phase = DownloadPhase::Failed;
                            download.status = format!("Error: {}", e);
                        }
                    }
                }
            }
            Transition::SaveFinished { id, result } => {
                let download = &mut self.download;
                if download.saving != Some(id) || download.active.is_some() {
                    return self;
                }
                download.saving = None;
                match result {
                    Ok(Some(path)) => {
                        download.phase = DownloadPhase::Completed;
                        download.status = format!("Download complete. Saved to {}", path.display());
                    }
                    Ok(None) => {
                        download.phase = DownloadPhase::Completed;
                        download.status = "Save cancelled".to_string();
                    }
                    Err(e) => {
                        download.phase = DownloadPhase::Failed;
                        download.status = format!("Error: {}", e);
                    }
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Session;

    fn info() -> VideoInfo {
        VideoInfo {
            title: "Clip".to_string(),
            length: 125,
            thumbnail_url: "https://img.example/clip.jpg".to_string(),
            available: true,
            is_short: false,
        }
    }

    fn ids(count: usize) -> Vec<DownloadId> {
        let mut session = Session::default();
        (0..count).map(|_| session.begin_download().0).collect()
    }

    #[test]
    fn test_check_lifecycle() {
        let state = ViewState::default().apply(Transition::CheckStarted);
        assert!(state.is_checking());

        let state = state.apply(Transition::CheckSucceeded(info()));
        assert_eq!(state.check, CheckState::Ready);
        assert_eq!(state.info.as_ref().unwrap().formatted_duration(), "2:05");
    }

    #[test]
    fn test_failed_check_keeps_previous_preview() {
        let state = ViewState::default()
            .apply(Transition::CheckSucceeded(info()))
            .apply(Transition::CheckStarted)
            .apply(Transition::CheckFailed("boom".to_string()));

        assert_eq!(state.check, CheckState::Ready);
        assert_eq!(state.info, Some(info()));

        let state = ViewState::default()
            .apply(Transition::CheckStarted)
            .apply(Transition::CheckFailed("boom".to_string()));
        assert_eq!(state.check, CheckState::Error("boom".to_string()));
    }

    #[test]
    fn test_progress_sequence_with_length() {
        let id = ids(1)[0];
        let mut state = ViewState::default().apply(Transition::DownloadStarted {
            id,
            format: Format::Video,
        });
        assert_eq!(state.download.percent, Some(0));
        assert_eq!(state.download.status, "Preparing download...");
        assert!(state.download.is_busy(Format::Video));
        assert!(!state.download.is_busy(Format::Audio));

        let mut seen = Vec::new();
        for received in [250, 500, 1000] {
            state = state.apply(Transition::DownloadProgress {
                id,
                received,
                total: Some(1000),
            });
            seen.push(state.download.percent.unwrap());
        }
        assert_eq!(seen, vec![25, 50, 100]);
        assert_eq!(state.download.status, "Downloading... 100%");
    }

    #[test]
    fn test_progress_without_length_has_no_percent() {
        let id = ids(1)[0];
        let mut state = ViewState::default().apply(Transition::DownloadStarted {
            id,
            format: Format::Audio,
        });

        for received in [100, 200, 300] {
            state = state.apply(Transition::DownloadProgress {
                id,
                received,
                total: None,
            });
            assert_eq!(state.download.percent, None);
            assert_eq!(state.download.status, "Downloading...");
            assert_eq!(state.download.phase, DownloadPhase::Downloading);
        }
    }

    #[test]
    fn test_cancel_is_not_an_error() {
        let id = ids(1)[0];
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id,
                format: Format::Video,
            })
            .apply(Transition::DownloadSettled {
                id,
                format: Format::Video,
                outcome: Err(AppError::Cancelled),
            });

        assert_eq!(state.download.phase, DownloadPhase::Cancelled);
        assert_eq!(state.download.status, "Download cancelled");
        assert!(!state.download.is_busy(Format::Video));
        assert_eq!(state.download.active, None);
    }

    #[test]
    fn test_failure_shows_error_text() {
        let id = ids(1)[0];
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id,
                format: Format::Audio,
            })
            .apply(Transition::DownloadSettled {
                id,
                format: Format::Audio,
                outcome: Err(AppError::Server("Download failed".to_string())),
            });

        assert_eq!(state.download.phase, DownloadPhase::Failed);
        assert_eq!(state.download.status, "Error: Download failed");
        assert!(!state.download.is_busy(Format::Audio));
    }

    #[test]
    fn test_completion_then_save() {
        let id = ids(1)[0];
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id,
                format: Format::Audio,
            })
            .apply(Transition::DownloadSettled {
                id,
                format: Format::Audio,
                outcome: Ok(()),
            });
        assert_eq!(state.download.status, "Download complete.");
        assert_eq!(state.download.phase, DownloadPhase::AwaitingSavePath);

        let state = state.apply(Transition::SaveFinished {
            id,
            result: Ok(None),
        });
        assert_eq!(state.download.status, "Save cancelled");
    }

    #[test]
    fn test_orphan_events_do_not_touch_display() {
        let ids = ids(2);
        let (first, second) = (ids[0], ids[1]);
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id: first,
                format: Format::Video,
            })
            .apply(Transition::DownloadStarted {
                id: second,
                format: Format::Audio,
            })
            .apply(Transition::DownloadProgress {
                id: first,
                received: 900,
                total: Some(1000),
            });
        assert_eq!(state.download.percent, Some(0));

        let state = state.apply(Transition::DownloadSettled {
            id: first,
            format: Format::Video,
            outcome: Ok(()),
        });
        assert_eq!(state.download.active, Some(second));
        assert_eq!(state.download.status, "Preparing download...");
        assert!(!state.download.is_busy(Format::Video));
        assert!(state.download.is_busy(Format::Audio));
    }

    #[test]
    fn test_orphan_save_does_not_touch_display() {
        let ids = ids(2);
        let (first, second) = (ids[0], ids[1]);
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id: first,
                format: Format::Video,
            })
            .apply(Transition::DownloadStarted {
                id: second,
                format: Format::Audio,
            })
            .apply(Transition::DownloadProgress {
                id: second,
                received: 300,
                total: Some(1000),
            })
            .apply(Transition::DownloadSettled {
                id: first,
                format: Format::Video,
                outcome: Ok(()),
            })
            .apply(Transition::SaveFinished {
                id: first,
                result: Ok(Some(PathBuf::from("/tmp/first.mp4"))),
            });

        assert_eq!(state.download.active, Some(second));
        assert_eq!(state.download.phase, DownloadPhase::Downloading);
        assert_eq!(state.download.status, "Downloading... 30%");
    }

    #[test]
    fn test_save_result_ignored_once_new_download_starts() {
        let ids = ids(2);
        let (first, second) = (ids[0], ids[1]);
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id: first,
                format: Format::Video,
            })
            .apply(Transition::DownloadSettled {
                id: first,
                format: Format::Video,
                outcome: Ok(()),
            })
            .apply(Transition::DownloadStarted {
                id: second,
                format: Format::Audio,
            })
            .apply(Transition::DownloadSettled {
                id: second,
                format: Format::Audio,
                outcome: Err(AppError::Server("Download failed".to_string())),
            })
            .apply(Transition::SaveFinished {
                id: first,
                result: Ok(Some(PathBuf::from("/tmp/first.mp4"))),
            });

        assert_eq!(state.download.phase, DownloadPhase::Failed);
        assert_eq!(state.download.status, "Error: Download failed");
    }

    #[test]
    fn test_save_result_shown_for_latest_download() {
        let id = ids(1)[0];
        let state = ViewState::default()
            .apply(Transition::DownloadStarted {
                id,
                format: Format::Video,
            })
            .apply(Transition::DownloadSettled {
                id,
                format: Format::Video,
                outcome: Ok(()),
            })
            .apply(Transition::SaveFinished {
                id,
                result: Ok(Some(PathBuf::from("/tmp/clip.mp4"))),
            });

        assert_eq!(state.download.phase, DownloadPhase::Completed);
        assert_eq!(state.download.saving, None);
        assert_eq!(
            state.download.status,
            format!("Download complete. Saved to {}", PathBuf::from("/tmp/clip.mp4").display())
        );
    }
}
