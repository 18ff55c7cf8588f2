//! Driven port for the multipart upload endpoint.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::BackendCredentials;

/// One file in an upload batch.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name.
    pub file_name: String,
    /// MIME type, when the browser supplied one.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Port sending a batch of files in a single request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileUpload: Send + Sync {
    /// Upload `files` and return the public URLs the backend assigned.
    async fn upload(
        &self,
        credentials: &BackendCredentials,
        files: &[UploadFile],
    ) -> Result<Vec<String>, BackendError>;
}

/// Fixture inventing a URL per file name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFileUpload;

#[async_trait]
impl FileUpload for FixtureFileUpload {
    async fn upload(
        &self,
        _credentials: &BackendCredentials,
        files: &[UploadFile],
    ) -> Result<Vec<String>, BackendError> {
        Ok(files
            .iter()
            .map(|file| format!("https://files.invalid/{}", file.file_name))
            .collect())
    }
}
