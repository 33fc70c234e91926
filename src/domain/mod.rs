pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{
    progress_percent, DownloadPhase, DownloadPlan, DownloadRequest, Format, Thumbnail, VideoInfo,
};
