//! Turns a user-selected file into a preview data URL and a base64 payload.

use crate::domain::model::{DataUrl, ImagePayload, IngestedImage};
use crate::utils::error::IngestionError;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum UploadSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// 使用者選取或拖放的檔案。內容在讀取時才載入。
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    mime_type: String,
    source: UploadSource,
}

impl UploadFile {
    /// MIME 類型依副檔名推斷。
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mime_type = mime_type_for_path(&path).to_string();

        Self {
            name,
            mime_type,
            source: UploadSource::Path(path),
        }
    }

    pub fn from_bytes(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            source: UploadSource::Memory(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, IngestionError> {
        let bytes = match &self.source {
            UploadSource::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| IngestionError::Read {
                        name: self.name.clone(),
                        source,
                    })?
            }
            UploadSource::Memory(bytes) => bytes.to_vec(),
        };

        if bytes.is_empty() {
            return Err(IngestionError::Empty {
                name: self.name.clone(),
            });
        }

        tracing::debug!("Read {} bytes from '{}'", bytes.len(), self.name);
        Ok(bytes)
    }

    fn ensure_image(&self) -> Result<(), IngestionError> {
        if self.is_image() {
            Ok(())
        } else {
            Err(IngestionError::NotAnImage {
                mime_type: self.mime_type.clone(),
            })
        }
    }
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.to_ascii_lowercase().starts_with("image/")
}

pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

pub fn encode_payload(mime_type: &str, bytes: &[u8]) -> ImagePayload {
    ImagePayload {
        mime_type: mime_type.to_string(),
        data: STANDARD.encode(bytes),
    }
}

pub fn decode_payload(payload: &ImagePayload) -> Result<Vec<u8>, IngestionError> {
    STANDARD
        .decode(payload.data.as_bytes())
        .map_err(|e| IngestionError::MalformedDataUrl {
            reason: format!("invalid base64 body: {}", e),
        })
}

/// 去掉 `data:<mime>;base64,` 前綴，只留下要傳送的內容。
pub fn payload_from_data_url(url: &DataUrl) -> Result<ImagePayload, IngestionError> {
    url.to_payload().ok_or_else(|| IngestionError::MalformedDataUrl {
        reason: "expected data:<mime>;base64,<body>".to_string(),
    })
}

pub async fn read_preview(file: &UploadFile) -> Result<DataUrl, IngestionError> {
    file.ensure_image()?;
    let bytes = file.read_bytes().await?;
    Ok(DataUrl::from_payload(&encode_payload(file.mime_type(), &bytes)))
}

pub async fn read_payload(file: &UploadFile) -> Result<ImagePayload, IngestionError> {
    file.ensure_image()?;
    let bytes = file.read_bytes().await?;
    Ok(encode_payload(file.mime_type(), &bytes))
}

pub async fn ingest(file: &UploadFile) -> Result<IngestedImage, IngestionError> {
    file.ensure_image()?;
    let bytes = file.read_bytes().await?;
    let payload = encode_payload(file.mime_type(), &bytes);

    Ok(IngestedImage {
        preview: DataUrl::from_payload(&payload),
        payload,
        byte_len: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JPEG_HEADER: [u8; 8] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("me.png")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("me.webp")), "image/webp");
        assert_eq!(
            mime_type_for_path(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("IMAGE/PNG"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime(""));
    }

    #[tokio::test]
    async fn test_ingest_from_path_round_trips_bytes() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&JPEG_HEADER).unwrap();

        let upload = UploadFile::from_path(file.path());
        let ingested = ingest(&upload).await.unwrap();

        assert_eq!(ingested.payload.mime_type, "image/jpeg");
        assert_eq!(ingested.byte_len, JPEG_HEADER.len());
        assert_eq!(decode_payload(&ingested.payload).unwrap(), JPEG_HEADER);
        assert_eq!(
            ingested.preview.as_str(),
            format!("data:image/jpeg;base64,{}", ingested.payload.data)
        );
        assert_eq!(payload_from_data_url(&ingested.preview).unwrap(), ingested.payload);
    }

    #[tokio::test]
    async fn test_preview_and_payload_agree() {
        let upload = UploadFile::from_bytes("face.png", "image/png", vec![1, 2, 3, 4, 5]);

        let preview = read_preview(&upload).await.unwrap();
        let payload = read_payload(&upload).await.unwrap();

        assert_eq!(preview, DataUrl::from_payload(&payload));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let upload = UploadFile::from_path("/definitely/not/here.png");
        let err = ingest(&upload).await.unwrap_err();
        assert!(matches!(err, IngestionError::Read { .. }));
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let upload = UploadFile::from_path(file.path());

        assert!(matches!(
            ingest(&upload).await.unwrap_err(),
            IngestionError::Empty { .. }
        ));

        let in_memory = UploadFile::from_bytes("blank.png", "image/png", Vec::new());
        assert!(read_preview(&in_memory).await.is_err());
    }

    #[tokio::test]
    async fn test_non_image_is_rejected() {
        let upload = UploadFile::from_bytes("doc.pdf", "application/pdf", vec![0x25, 0x50]);
        assert!(matches!(
            read_payload(&upload).await.unwrap_err(),
            IngestionError::NotAnImage { .. }
        ));
    }

    #[test]
    fn test_payload_from_malformed_data_url() {
        let url = DataUrl::parse("data:image/png;base64,AAAA").unwrap();
        assert!(payload_from_data_url(&url).is_ok());

        let bad = ImagePayload {
            mime_type: "image/png".to_string(),
            data: "not base64!!".to_string(),
        };
        assert!(decode_payload(&bad).is_err());
    }
}
