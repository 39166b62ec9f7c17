//! Message attachments

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::errors::AttachmentError;

/// A file attached to every message of a batch
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment, deriving its content type from the file extension
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename);

        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// The file name presented to the recipient
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The MIME type of the attachment
    pub fn content_type(&self) -> &str {
        self.content_type
    }

    /// The raw file contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Where the attachment of a batch comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentSource {
    /// A file configured ahead of time, such as a resume
    Predefined(PathBuf),

    /// A file supplied by the user for this batch, if one was provided
    Uploaded(Option<Attachment>),
}

impl AttachmentSource {
    /// Resolves the attachment.
    ///
    /// The predefined file is read once; the result is shared by every message in the batch.
    pub fn resolve(self) -> Result<Attachment, AttachmentError> {
        match self {
            Self::Predefined(path) => {
                if path.as_os_str().is_empty() || !path.exists() {
                    return Err(AttachmentError::NotFound(path));
                }

                let bytes = fs::read(&path).map_err(|source| AttachmentError::Unreadable {
                    path: path.clone(),
                    source,
                })?;

                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());

                debug!(%filename, size = bytes.len(), "read predefined attachment");

                Ok(Attachment::new(filename, bytes))
            }
            Self::Uploaded(Some(attachment)) => Ok(attachment),
            Self::Uploaded(None) => Err(AttachmentError::Missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(Attachment::new("resume.PDF", vec![]).content_type(), "application/pdf");
        assert_eq!(Attachment::new("notes.txt", vec![]).content_type(), "text/plain");
        assert_eq!(
            Attachment::new("archive", vec![]).content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_debug_does_not_dump_contents() {
        let attachment = Attachment::new("resume.pdf", vec![1, 2, 3]);

        assert_eq!(
            format!("{attachment:?}"),
            "Attachment { filename: \"resume.pdf\", content_type: \"application/pdf\", size: 3 }"
        );
    }

    #[test]
    fn test_resolve_predefined_reads_file() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("resume.pdf");
        fs::write(&path, b"%PDF-1.4")?;

        let attachment = AttachmentSource::Predefined(path).resolve()?;

        assert_eq!(attachment.filename(), "resume.pdf");
        assert_eq!(attachment.bytes(), b"%PDF-1.4");

        Ok(())
    }

    #[test]
    fn test_resolve_predefined_missing_file() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("missing.pdf");

        let result = AttachmentSource::Predefined(path.clone()).resolve();

        assert!(matches!(result, Err(AttachmentError::NotFound(p)) if p == path));

        Ok(())
    }

    #[test]
    fn test_resolve_predefined_empty_path() {
        let result = AttachmentSource::Predefined(PathBuf::new()).resolve();

        assert!(matches!(result, Err(AttachmentError::NotFound(_))));
    }

    #[test]
    fn test_resolve_uploaded() -> TestResult {
        let upload = Attachment::new("cover.txt", b"hello".to_vec());

        let attachment = AttachmentSource::Uploaded(Some(upload.clone())).resolve()?;

        assert_eq!(attachment, upload);

        Ok(())
    }

    #[test]
    fn test_resolve_uploaded_missing() {
        let result = AttachmentSource::Uploaded(None).resolve();

        assert!(matches!(result, Err(AttachmentError::Missing)));
    }
}
