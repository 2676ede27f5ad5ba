//! Upload validation: filename checks and the size guard.
//!
//! Both checks run before the upload is encoded or sent anywhere, so a
//! rejected upload never costs a provider call.

use crate::error::OcrError;
use tracing::debug;

/// Extensions accepted by `POST /api/ocr`.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];

/// A file received in a request. Lives for the duration of one request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// The accepted upload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Png,
    Jpg,
    Jpeg,
    Pdf,
}

impl FileKind {
    /// Parse a lower-case extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(FileKind::Png),
            "jpg" => Some(FileKind::Jpg),
            "jpeg" => Some(FileKind::Jpeg),
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }

    /// Resolve the kind of a filename, if its extension is accepted.
    pub fn from_filename(filename: &str) -> Option<Self> {
        extension(filename).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Png => "png",
            FileKind::Jpg => "jpg",
            FileKind::Jpeg => "jpeg",
            FileKind::Pdf => "pdf",
        }
    }

    pub fn is_image(self) -> bool {
        !matches!(self, FileKind::Pdf)
    }

    /// MIME marker used in the data URI. Images use `image/<ext>` verbatim.
    pub fn mime_type(self) -> &'static str {
        match self {
            FileKind::Png => "image/png",
            FileKind::Jpg => "image/jpg",
            FileKind::Jpeg => "image/jpeg",
            FileKind::Pdf => "application/pdf",
        }
    }

    /// Noun used in user-facing warnings.
    pub fn label(self) -> &'static str {
        if self.is_image() {
            "image"
        } else {
            "PDF"
        }
    }
}

/// Lower-cased suffix after the last dot, or `None` when there is no dot.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// `true` when the filename carries one of [`ALLOWED_EXTENSIONS`].
pub fn allowed_file(filename: &str) -> bool {
    extension(filename)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Validate the filename of an upload and return its kind.
pub fn validate_filename(filename: &str) -> Result<FileKind, OcrError> {
    if filename.is_empty() {
        return Err(OcrError::NoSelectedFile);
    }
    FileKind::from_filename(filename).ok_or_else(|| OcrError::UnsupportedFormat {
        filename: filename.to_string(),
    })
}

/// Reject payloads above `limit`. `None` disables the check.
pub fn check_size(size: usize, limit: Option<usize>) -> Result<(), OcrError> {
    match limit {
        Some(limit) if size > limit => Err(OcrError::FileTooLarge { size, limit }),
        _ => Ok(()),
    }
}

/// Run every upload check in order: filename, then size.
pub fn validate_upload(upload: &Upload, limit: Option<usize>) -> Result<FileKind, OcrError> {
    let kind = validate_filename(&upload.filename)?;
    check_size(upload.bytes.len(), limit)?;
    debug!(
        "Accepted upload '{}' ({:?}, {} bytes)",
        upload.filename,
        kind,
        upload.bytes.len()
    );
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        for name in [
            "scan.png",
            "photo.JPG",
            "photo.jpeg",
            "Report.PDF",
            "a.b.c.pdf",
        ] {
            assert!(allowed_file(name), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_missing_or_unknown_extension() {
        for name in ["README", "notes.txt", "archive.pdf.zip", "file.", "png", ""] {
            assert!(!allowed_file(name), "{name} should be rejected");
        }
    }

    #[test]
    fn dot_only_prefix_is_an_extension() {
        assert!(allowed_file(".png"));
    }

    #[test]
    fn kind_from_filename() {
        assert_eq!(FileKind::from_filename("x.JPEG"), Some(FileKind::Jpeg));
        assert_eq!(FileKind::from_filename("x.pdf"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_filename("x.gif"), None);
        assert!(FileKind::Png.is_image());
        assert!(!FileKind::Pdf.is_image());
        assert_eq!(FileKind::Pdf.label(), "PDF");
        assert_eq!(FileKind::Jpg.label(), "image");
    }

    #[test]
    fn empty_filename_is_no_selected_file() {
        let err = validate_filename("").unwrap_err();
        assert!(matches!(err, OcrError::NoSelectedFile));
    }

    #[test]
    fn unsupported_extension_rejected() {
        assert!(matches!(
            validate_filename("notes.txt"),
            Err(OcrError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn size_guard_boundaries() {
        let limit = Some(4 * 1024 * 1024);
        assert!(check_size(4 * 1024 * 1024, limit).is_ok());
        match check_size(4 * 1024 * 1024 + 1, limit) {
            Err(OcrError::FileTooLarge { size, limit }) => {
                assert_eq!(size, 4 * 1024 * 1024 + 1);
                assert_eq!(limit, 4 * 1024 * 1024);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
        assert!(check_size(usize::MAX, None).is_ok());
    }

    #[test]
    fn filename_checked_before_size() {
        let upload = Upload::new("big.txt", vec![0u8; 16]);
        assert!(matches!(
            validate_upload(&upload, Some(8)),
            Err(OcrError::UnsupportedFormat { .. })
        ));
    }
}
