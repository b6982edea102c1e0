//! Image Storage
//!
//! JPEG-only uploads written to a configured directory. Per-file failures
//! accumulate into the response message while valid files still succeed.

use std::path::{Path, PathBuf};

use shared::models::ImageDto;

use crate::utils::{AppError, AppResult};

/// One uploaded file as received from the HTTP boundary
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

#[derive(Clone)]
pub struct ImageService {
    images_dir: PathBuf,
    base_url: String,
}

impl ImageService {
    pub fn new(images_dir: &str, base_url: &str) -> Self {
        Self {
            images_dir: PathBuf::from(images_dir),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store the given files, returning the stored images and an error
    /// message accumulated over the rejected ones (empty when all passed).
    pub async fn upload_images(
        &self,
        files: &[UploadFile],
    ) -> AppResult<(Vec<ImageDto>, String)> {
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create images dir: {e}")))?;

        let mut images = Vec::new();
        let mut error_message = String::new();

        for file in files {
            if let Err(reason) = validate_image(file) {
                error_message.push_str(&reason);
                continue;
            }

            let file_name = unique_file_name(&file.file_name);
            let file_path = self.images_dir.join(&file_name);
            match tokio::fs::write(&file_path, &file.data).await {
                Ok(()) => {
                    let stored = file_path.to_string_lossy().to_string();
                    let link = format!("{}/images/{}", self.base_url, file_name);
                    images.push(ImageDto {
                        file_path: stored,
                        link,
                    });
                }
                Err(e) => {
                    tracing::error!(file = %file.file_name, error = %e, "Image was not created");
                    error_message.push_str("Image was not created.");
                }
            }
        }

        Ok((images, error_message))
    }

    /// Delete a stored image; succeeds when the file is already gone
    pub fn delete_image(&self, file_path: &str) -> AppResult<()> {
        let path = Path::new(file_path);
        // Only paths under the images dir are deletable
        if !path.starts_with(&self.images_dir) {
            return Err(AppError::invalid_request(format!(
                "{file_path} is not an uploaded image"
            )));
        }
        if path.exists() {
            std::fs::remove_file(path)
                .map_err(|e| AppError::internal(format!("Image {file_path} was not deleted: {e}")))?;
        }
        Ok(())
    }
}

/// JPEG by extension and by content
fn validate_image(file: &UploadFile) -> Result<(), String> {
    let lower = file.file_name.to_lowercase();
    if !(lower.ends_with(".jpg") || lower.ends_with(".jpeg")) {
        return Err(format!("Invalid file format of {}.", file.file_name));
    }
    if mime_guess::from_path(&file.file_name).first_or_octet_stream() != mime_guess::mime::IMAGE_JPEG
    {
        return Err(format!("Invalid file format of {}.", file.file_name));
    }
    if file.data.len() > MAX_FILE_SIZE {
        return Err(format!("File {} is too large.", file.file_name));
    }
    if image::load_from_memory_with_format(&file.data, image::ImageFormat::Jpeg).is_err() {
        return Err(format!("File {} is not a valid JPEG image.", file.file_name));
    }
    Ok(())
}

/// `photo.jpg` → `photo-3f9a.jpg`
fn unique_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let suffix = &uuid::Uuid::new_v4().to_string()[..4];
    format!("{stem}-{suffix}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_jpeg() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    fn service(dir: &tempfile::TempDir) -> ImageService {
        ImageService::new(dir.path().to_str().unwrap(), "http://localhost:3000/")
    }

    #[tokio::test]
    async fn test_upload_valid_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let (images, message) = service
            .upload_images(&[UploadFile {
                file_name: "photo.jpg".into(),
                data: tiny_jpeg(),
            }])
            .await
            .unwrap();

        assert!(message.is_empty());
        assert_eq!(images.len(), 1);
        assert!(std::path::Path::new(&images[0].file_path).exists());
        assert!(images[0].link.starts_with("http://localhost:3000/images/photo-"));
        assert!(images[0].link.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_invalid_files_accumulate_while_valid_ones_pass() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let (images, message) = service
            .upload_images(&[
                UploadFile {
                    file_name: "diagram.png".into(),
                    data: tiny_jpeg(),
                },
                UploadFile {
                    file_name: "broken.jpg".into(),
                    data: vec![0u8; 16],
                },
                UploadFile {
                    file_name: "photo.jpeg".into(),
                    data: tiny_jpeg(),
                },
            ])
            .await
            .unwrap();

        assert_eq!(images.len(), 1);
        assert!(message.contains("diagram.png"));
        assert!(message.contains("broken.jpg"));
    }

    #[tokio::test]
    async fn test_delete_image_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let (images, _) = service
            .upload_images(&[UploadFile {
                file_name: "photo.jpg".into(),
                data: tiny_jpeg(),
            }])
            .await
            .unwrap();

        service.delete_image(&images[0].file_path).unwrap();
        assert!(!std::path::Path::new(&images[0].file_path).exists());
        // Deleting again is not an error
        service.delete_image(&images[0].file_path).unwrap();
    }

    #[tokio::test]
    async fn test_delete_refuses_paths_outside_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        assert!(service.delete_image("/etc/passwd").is_err());
    }
}
