use crate::domain::{AppError, Thumbnail};

/// Decode downloaded thumbnail bytes into RGBA pixels
pub fn decode_thumbnail(bytes: &[u8]) -> Result<Thumbnail, AppError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AppError::Io(format!("Failed to decode thumbnail: {}", e)))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    Ok(Thumbnail {
        width,
        height,
        rgba: img.into_raw(),
    })
}
