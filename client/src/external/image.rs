//! Reading leaf images from local storage

use shared::{validate_image_ref, ImageFormat, ImageRef};

use crate::error::{AppError, AppResult};

/// Image bytes ready for upload
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    /// Format declared to the service, from the file extension
    pub format: ImageFormat,
    pub filename: String,
}

/// Read the image behind `image`. `tag` names the upload, usually the
/// crop (`leaf_image_{tag}.{ext}`).
pub async fn load_image(image: &ImageRef, tag: &str) -> AppResult<LoadedImage> {
    validate_image_ref(image)
        .map_err(|msg| AppError::InvalidImageRef(format!("{}: {}", image, msg)))?;

    let path = image
        .to_path()
        .ok_or_else(|| AppError::InvalidImageRef(image.to_string()))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| AppError::ImageUnreadable {
            uri: image.to_string(),
            source,
        })?;

    if bytes.is_empty() {
        return Err(AppError::ImageUnreadable {
            uri: image.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "image file is empty"),
        });
    }

    let format = image.format();
    match ImageFormat::sniff(&bytes) {
        Some(sniffed) if sniffed != format => tracing::warn!(
            "{} looks like {:?} but will be sent as {}",
            image,
            sniffed,
            format.mime_type()
        ),
        Some(_) => {}
        None => tracing::warn!("{} has an unknown file signature, uploading anyway", image),
    }

    tracing::debug!("Loaded {} bytes from {}", bytes.len(), path.display());

    Ok(LoadedImage {
        bytes,
        format,
        filename: image.upload_filename(tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_HEADER: [u8; 4] = [0xff, 0xd8, 0xff, 0xe0];

    #[tokio::test]
    async fn test_load_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.jpg");
        std::fs::write(&path, JPEG_HEADER).unwrap();

        let image = ImageRef::new(format!("file://{}", path.display()));
        let loaded = load_image(&image, "maize").await.unwrap();

        assert_eq!(loaded.bytes, JPEG_HEADER);
        assert_eq!(loaded.format, ImageFormat::Jpeg);
        assert_eq!(loaded.filename, "leaf_image_maize.jpg");
    }

    #[tokio::test]
    async fn test_png_extension_sets_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.PNG");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let loaded = load_image(&ImageRef::new(path.display().to_string()), "tomato")
            .await
            .unwrap();
        assert_eq!(loaded.format, ImageFormat::Png);
        assert_eq!(loaded.filename, "leaf_image_tomato.png");
    }

    #[tokio::test]
    async fn test_unknown_signature_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let loaded = load_image(&ImageRef::new(path.display().to_string()), "cassava").await;
        assert!(loaded.is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_unreadable() {
        let err = load_image(&ImageRef::new("/definitely/not/here.jpg"), "maize")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "IMAGE_UNREADABLE");
    }

    #[tokio::test]
    async fn test_empty_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();

        let err = load_image(&ImageRef::new(path.display().to_string()), "maize")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImageUnreadable { .. }));
    }

    #[tokio::test]
    async fn test_remote_uri_rejected() {
        let err = load_image(&ImageRef::new("https://example.com/leaf.jpg"), "maize")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidImageRef(_)));
    }
}
