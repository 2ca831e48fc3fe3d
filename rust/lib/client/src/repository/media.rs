use std::path::Path;

use nework_core::{AppError, AttachmentType, Media};

use crate::api::ApiClient;
use crate::transport::{ApiRequest, FilePart};

/// Form field the backend reads uploads from.
const FILE_FIELD: &str = "file";

/// A file picked from local storage, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Guessed from the extension; `None` when unrecognized.
    pub mime: Option<String>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).map(str::to_string);
        Self { name, bytes, mime }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::api(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Attachment kind implied by the mime type.
    pub fn attachment_type(&self) -> Option<AttachmentType> {
        let mime = self.mime.as_deref()?;
        if mime.starts_with("image/") {
            Some(AttachmentType::Image)
        } else if mime.starts_with("video/") {
            Some(AttachmentType::Video)
        } else if mime.starts_with("audio/") {
            Some(AttachmentType::Audio)
        } else {
            None
        }
    }

    pub(crate) fn part(&self, field: &str, mime: &str) -> FilePart {
        FilePart {
            field: field.to_string(),
            file_name: self.name.clone(),
            mime: mime.to_string(),
            bytes: self.bytes.clone(),
        }
    }
}

fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => return None,
    })
}

#[derive(Clone)]
pub struct MediaRepository {
    api: ApiClient,
}

impl MediaRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload as multipart `file`, announced with the kind's wildcard type.
    pub async fn upload(&self, file: &LocalFile, kind: AttachmentType) -> Result<Media, AppError> {
        let request = ApiRequest::post("api/media").multipart(&[], vec![file.part(FILE_FIELD, kind.mime_type())]);
        self.api.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::transport::{Method, RequestBody};
    use std::sync::Arc;

    #[test]
    fn mime_guess() {
        assert_eq!(LocalFile::new("a.JPG", vec![]).mime.as_deref(), Some("image/jpeg"));
        assert_eq!(LocalFile::new("clip.mp4", vec![]).attachment_type(), Some(AttachmentType::Video));
        assert_eq!(LocalFile::new("notes", vec![]).mime, None);
        assert_eq!(LocalFile::new("doc.pdf", vec![]).attachment_type(), None);
    }

    #[tokio::test]
    async fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"ID3").unwrap();

        let file = LocalFile::read(&path).await.unwrap();
        assert_eq!(file.name, "song.mp3");
        assert_eq!(file.size(), 3);
        assert_eq!(file.attachment_type(), Some(AttachmentType::Audio));

        let missing = LocalFile::read(dir.path().join("nope.png")).await;
        assert!(matches!(missing, Err(AppError::Api(Some(_)))));
    }

    #[tokio::test]
    async fn upload_sends_file_part() {
        let fake = Arc::new(FakeTransport::new());
        let repo = MediaRepository::new(ApiClient::new(fake.clone()));
        fake.respond_json(Method::Post, "api/media", &Media { url: "http://m/1.png".into() });

        let media = repo
            .upload(&LocalFile::new("pic.png", vec![1, 2, 3]), AttachmentType::Image)
            .await
            .unwrap();
        assert_eq!(media.url, "http://m/1.png");

        match &fake.requests()[0].body {
            RequestBody::Multipart { fields, files } => {
                assert!(fields.is_empty());
                assert_eq!(files[0].field, "file");
                assert_eq!(files[0].mime, "image/*");
                assert_eq!(files[0].bytes, vec![1, 2, 3]);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }
}
