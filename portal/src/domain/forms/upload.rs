//! Upload batches.

use super::{FormError, FormErrorCode};
use crate::domain::ports::UploadFile;

/// A non-empty batch of non-empty files, sent in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    files: Vec<UploadFile>,
}

impl UploadBatch {
    /// Validate the batch.
    pub fn try_from_files(files: Vec<UploadFile>) -> Result<Self, FormError> {
        if files.is_empty() {
            return Err(FormError::required("files"));
        }
        if let Some(empty) = files.iter().find(|file| file.bytes.is_empty()) {
            return Err(FormError::new(
                "files",
                FormErrorCode::OutOfRange,
                format!("{} is empty", empty.file_name),
            ));
        }
        if files.iter().any(|file| file.file_name.trim().is_empty()) {
            return Err(FormError::new(
                "files",
                FormErrorCode::Required,
                "every file needs a name",
            ));
        }
        Ok(Self { files })
    }

    /// Files in the batch.
    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }
}
