use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Grade, subject::is_known_subject};

/// Largest accepted upload is strictly below this many bytes (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UploadError {
    #[error("Please select an image to upload")]
    MissingFile,
    #[error("Please select a subject")]
    MissingSubject,
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
    #[error("Please upload an image file")]
    NotAnImage,
    #[error("File size must be less than 10MB")]
    TooLarge,
}

//
// ─── FILE CHECKS ───────────────────────────────────────────────────────────────
//

/// Check a picked file before it is accepted into the form.
///
/// # Errors
///
/// Returns `UploadError::TooLarge` for files of 10 MB or more and
/// `UploadError::NotAnImage` when the MIME type is not `image/*`.
pub fn check_file(mime_type: &str, size: usize) -> Result<(), UploadError> {
    if size >= MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    if !mime_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(UploadError::NotAnImage);
    }
    Ok(())
}

/// Check a file by name and on-disk length, before its bytes are read.
///
/// # Errors
///
/// Same as [`check_file`], using the MIME type guessed from the name.
pub fn check_picked(file_name: &str, len: u64) -> Result<(), UploadError> {
    let size = usize::try_from(len).unwrap_or(usize::MAX);
    check_file(mime_from_file_name(file_name), size)
}

/// Guess a MIME type from a file extension.
#[must_use]
pub fn mime_from_file_name(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        Some("tif" | "tiff") => "image/tiff",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_from_file_name(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// State of the upload form before submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub file: Option<UploadFile>,
    pub subject: String,
    pub grade: Option<Grade>,
}

/// Upload that passed every client-side check and may be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedUpload {
    file: UploadFile,
    subject: String,
    grade: Option<Grade>,
}

impl UploadDraft {
    /// # Errors
    ///
    /// Returns the first `UploadError` found, checking the file before the subject.
    pub fn validate(self) -> Result<ValidatedUpload, UploadError> {
        let file = self.file.ok_or(UploadError::MissingFile)?;
        check_file(&file.mime_type, file.size())?;

        let subject = self.subject.trim().to_string();
        if subject.is_empty() {
            return Err(UploadError::MissingSubject);
        }
        if !is_known_subject(&subject) {
            return Err(UploadError::UnknownSubject(subject));
        }

        Ok(ValidatedUpload {
            file,
            subject,
            grade: self.grade,
        })
    }
}

impl ValidatedUpload {
    #[must_use]
    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn grade(&self) -> Option<&Grade> {
        self.grade.as_ref()
    }

    #[must_use]
    pub fn into_parts(self) -> (UploadFile, String, Option<Grade>) {
        (self.file, self.subject, self.grade)
    }
}

//
// ─── RESULT & PROGRESS ─────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub questions_count: u32,
    pub upload_id: i64,
}

impl UploadReceipt {
    #[must_use]
    pub fn success_message(&self) -> String {
        format!(
            "Successfully extracted {} wrong question(s)!",
            self.questions_count
        )
    }
}

/// Progress shown while an upload is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadStage {
    Uploading,
    Analyzing,
    Extracting,
    Done,
}

impl UploadStage {
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            UploadStage::Uploading => 30,
            UploadStage::Analyzing => 60,
            UploadStage::Extracting => 90,
            UploadStage::Done => 100,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UploadStage::Uploading => "Uploading image...",
            UploadStage::Analyzing => "Analyzing image with AI...",
            UploadStage::Extracting => "Extracting wrong questions...",
            UploadStage::Done => "Done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(bytes: usize, name: &str) -> UploadDraft {
        UploadDraft {
            file: Some(UploadFile::new(name, vec![0; bytes])),
            subject: "Mathematics".into(),
            grade: None,
        }
    }

    #[test]
    fn exactly_ten_megabytes_is_rejected() {
        assert_eq!(
            draft(MAX_UPLOAD_BYTES, "big.png").validate(),
            Err(UploadError::TooLarge)
        );
        assert!(draft(MAX_UPLOAD_BYTES - 1, "ok.png").validate().is_ok());
    }

    #[test]
    fn non_image_is_rejected() {
        assert_eq!(
            draft(10, "notes.pdf").validate(),
            Err(UploadError::NotAnImage)
        );
        let file = UploadFile::new("scan", vec![1]).with_mime_type("IMAGE/JPEG");
        assert!(check_file(&file.mime_type, file.size()).is_ok());
    }

    #[test]
    fn huge_file_is_rejected_from_its_length() {
        assert_eq!(
            check_picked("scan.png", 5 * 1024 * 1024 * 1024),
            Err(UploadError::TooLarge)
        );
        assert_eq!(
            check_picked("scan.png", MAX_UPLOAD_BYTES as u64),
            Err(UploadError::TooLarge)
        );
        assert_eq!(check_picked("notes.pdf", 10), Err(UploadError::NotAnImage));
        assert!(check_picked("scan.png", 2048).is_ok());
    }

    #[test]
    fn file_is_checked_before_subject() {
        let empty = UploadDraft::default();
        assert_eq!(empty.validate(), Err(UploadError::MissingFile));

        let mut no_subject = draft(10, "a.jpg");
        no_subject.subject = " ".into();
        assert_eq!(no_subject.validate(), Err(UploadError::MissingSubject));
    }

    #[test]
    fn mime_guess_by_extension() {
        assert_eq!(mime_from_file_name("Paper.JPG"), "image/jpeg");
        assert_eq!(mime_from_file_name("paper.webp"), "image/webp");
        assert_eq!(mime_from_file_name("paper"), "application/octet-stream");
    }

    #[test]
    fn receipt_message_counts_questions() {
        let receipt = UploadReceipt {
            message: "ok".into(),
            questions_count: 3,
            upload_id: 11,
        };
        assert_eq!(
            receipt.success_message(),
            "Successfully extracted 3 wrong question(s)!"
        );
        assert_eq!(UploadStage::Analyzing.percent(), 60);
    }
}
