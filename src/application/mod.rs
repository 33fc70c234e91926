pub mod download_coordinator;
pub mod saver;
pub mod session;
pub mod thumbnail;

pub use download_coordinator::{DownloadCoordinator, DownloadEvent};
pub use session::{DownloadId, Session};
