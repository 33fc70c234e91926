use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::VideoInfo;

/// Identifies one download invocation so late events from an orphaned
/// download can be told apart from the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DownloadId(u64);

#[derive(Debug)]
struct ActiveDownload {
    id: DownloadId,
    token: CancellationToken,
}

/// Single-slot state shared by the info fetcher and the download controller.
#[derive(Debug, Default)]
pub struct Session {
    current_info: Option<VideoInfo>,
    active: Option<ActiveDownload>,
    next_id: u64,
}

impl Session {
    pub fn current_info(&self) -> Option<&VideoInfo> {
        self.current_info.as_ref()
    }

    /// Replace the held metadata; never merged with the previous value
    pub fn set_current_info(&mut self, info: VideoInfo) {
        self.current_info = Some(info);
    }

    /// Register a new download and return its cancellation token.
    ///
    /// A download that is still running keeps going but can no longer be
    /// cancelled through the session.
    pub fn begin_download(&mut self) -> (DownloadId, CancellationToken) {
        let id = DownloadId(self.next_id);
        self.next_id += 1;

        let token = CancellationToken::new();
        if let Some(previous) = self.active.replace(ActiveDownload {
            id,
            token: token.clone(),
        }) {
            warn!(orphaned = ?previous.id, "new download replaces an unfinished one");
        }

        (id, token)
    }

    pub fn active_download(&self) -> Option<DownloadId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Signal the active download, if any. Returns whether a signal was sent.
    pub fn cancel_active(&self) -> bool {
        match &self.active {
            Some(active) => {
                info!(id = ?active.id, "cancelling download");
                active.token.cancel();
                true
            }
            None => {
                debug!("cancel requested with no active download");
                false
            }
        }
    }

    /// Clear the handle once `id` has settled.
    ///
    /// An orphaned download settling leaves the newer handle in place.
    pub fn settle(&mut self, id: DownloadId) -> bool {
        if self.active_download() == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(title: &str) -> VideoInfo {
        VideoInfo {
            title: title.to_string(),
            length: 60,
            thumbnail_url: String::new(),
            available: true,
            is_short: false,
        }
    }

    #[test]
    fn test_info_is_overwritten() {
        let mut session = Session::default();
        assert!(session.current_info().is_none());

        session.set_current_info(info("first"));
        session.set_current_info(info("second"));
        assert_eq!(session.current_info().unwrap().title, "second");
    }

    #[test]
    fn test_cancel_without_download_is_noop() {
        let session = Session::default();
        assert!(!session.cancel_active());
    }

    #[test]
    fn test_cancel_signals_active_token() {
        let mut session = Session::default();
        let (_, token) = session.begin_download();

        assert!(session.cancel_active());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_settle_clears_handle() {
        let mut session = Session::default();
        let (id, token) = session.begin_download();

        assert!(session.settle(id));
        assert_eq!(session.active_download(), None);
        assert!(!session.cancel_active());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_new_download_orphans_previous() {
        let mut session = Session::default();
        let (first, first_token) = session.begin_download();
        let (second, second_token) = session.begin_download();
        assert_ne!(first, second);

        session.cancel_active();
        assert!(!first_token.is_cancelled());
        assert!(second_token.is_cancelled());

        // the orphan settling must not clear the newer handle
        assert!(!session.settle(first));
        assert_eq!(session.active_download(), Some(second));
    }
}
