//! Command-line composition of a batch

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::domain::communication::{
    templates::{Draft, TemplateContext, TemplateKind},
    Attachment, AttachmentSource, ComposeRequest,
};

/// Where the attachment is taken from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AttachmentChoice {
    /// The file configured with `ATTACHMENT_FILE_PATH`
    #[default]
    Predefined,

    /// The file given with `--attachment-file`
    Upload,
}

/// Message and recipient arguments
#[derive(Debug, Parser)]
pub struct ComposeArgs {
    /// Recipient addresses, separated by commas
    #[arg(long, conflicts_with = "to_file")]
    pub to: Option<String>,

    /// File of recipient addresses, separated by commas or newlines
    #[arg(long)]
    pub to_file: Option<PathBuf>,

    /// Subject line; overrides the template's subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Message body; overrides the template's body
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// File containing the message body
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Built-in template to start from
    #[arg(long, value_enum)]
    pub template: Option<TemplateKind>,

    /// Name to sign templates with; defaults to the sender address
    #[arg(long, env = "SENDER_NAME")]
    pub sender_name: Option<String>,

    /// Role or topic mentioned by templates
    #[arg(long)]
    pub role: Option<String>,

    /// Additional recipient, sent a copy of its own
    #[arg(long)]
    pub cc: Option<String>,

    /// Additional recipient, sent a copy of its own
    #[arg(long)]
    pub bcc: Option<String>,

    /// Send without the attachment; by default every message carries one
    #[arg(long)]
    pub no_attach: bool,

    /// Which file to attach
    #[arg(long, value_enum, default_value_t = AttachmentChoice::Predefined)]
    pub attachment_source: AttachmentChoice,

    /// File to attach when the source is `upload`
    #[arg(long)]
    pub attachment_file: Option<PathBuf>,

    /// Path of the predefined attachment, such as a resume
    #[arg(long, env = "ATTACHMENT_FILE_PATH")]
    pub predefined_attachment: Option<PathBuf>,
}

impl ComposeArgs {
    /// Reads any referenced files and renders the template into a [`ComposeRequest`]
    pub fn into_request(self, sender: &str) -> Result<ComposeRequest> {
        let recipients = match (&self.to, &self.to_file) {
            (Some(to), _) => to.clone(),
            (None, Some(path)) => read_text(path)?.replace(['\n', '\r'], ","),
            (None, None) => String::new(),
        };

        let body = match (&self.body, &self.body_file) {
            (Some(body), _) => Some(body.clone()),
            (None, Some(path)) => Some(read_text(path)?),
            (None, None) => None,
        };

        let draft = match self.template {
            Some(template) => {
                let context = TemplateContext {
                    sender_name: self.sender_name.as_deref().unwrap_or(sender),
                    role: self.role.as_deref(),
                };

                template
                    .draft(&context)
                    .context("failed to render template")?
                    .edit(self.subject.clone(), body)
            }
            None => Draft {
                subject: self.subject.clone().unwrap_or_default(),
                body: body.unwrap_or_default(),
            },
        };

        let attachment = if !self.no_attach {
            Some(self.attachment_source()?)
        } else {
            None
        };

        Ok(ComposeRequest {
            recipients,
            subject: draft.subject,
            body: draft.body,
            cc: self.cc,
            bcc: self.bcc,
            attachment,
        })
    }

    fn attachment_source(&self) -> Result<AttachmentSource> {
        Ok(match self.attachment_source {
            AttachmentChoice::Predefined => {
                AttachmentSource::Predefined(self.predefined_attachment.clone().unwrap_or_default())
            }
            AttachmentChoice::Upload => match &self.attachment_file {
                Some(path) => {
                    let bytes = fs::read(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let filename = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());

                    AttachmentSource::Uploaded(Some(Attachment::new(filename, bytes)))
                }
                None => AttachmentSource::Uploaded(None),
            },
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn parse(args: &[&str]) -> TestResult<ComposeArgs> {
        Ok(ComposeArgs::try_parse_from(
            std::iter::once("send").chain(args.iter().copied()),
        )?)
    }

    #[test]
    fn test_explicit_subject_and_body() -> TestResult {
        let request = parse(&[
            "--to",
            "a@x.com, b@y.com",
            "--subject",
            "Hi",
            "--body",
            "Hello",
            "--no-attach",
        ])?
            .into_request("me@example.com")?;

        assert_eq!(request.recipients, "a@x.com, b@y.com");
        assert_eq!(request.subject, "Hi");
        assert_eq!(request.body, "Hello");
        assert!(request.attachment.is_none());

        Ok(())
    }

    #[test]
    fn test_recipients_file_accepts_newlines() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("recipients.txt");
        fs::write(&path, "a@x.com\nb@y.com, c@z.com\n")?;

        let request =
            parse(&["--to-file", &path.to_string_lossy()])?.into_request("me@example.com")?;

        assert_eq!(request.recipients, "a@x.com,b@y.com, c@z.com,");

        Ok(())
    }

    #[test]
    fn test_template_signed_with_sender_address_by_default() -> TestResult {
        let request = parse(&["--to", "a@x.com", "--template", "introduction"])?
            .into_request("me@example.com")?;

        assert_eq!(request.subject, "Introduction from me@example.com");
        assert!(request.body.contains("My name is me@example.com"));

        Ok(())
    }

    #[test]
    fn test_template_subject_can_be_edited() -> TestResult {
        let request = parse(&[
            "--to",
            "a@x.com",
            "--template",
            "job-application",
            "--sender-name",
            "Ada",
            "--role",
            "the Backend Engineer position",
            "--subject",
            "Backend Engineer application",
        ])?
        .into_request("me@example.com")?;

        assert_eq!(request.subject, "Backend Engineer application");
        assert!(request.body.contains("apply for the Backend Engineer position"));

        Ok(())
    }

    #[test]
    fn test_upload_without_file_is_missing() -> TestResult {
        let request = parse(&["--to", "a@x.com", "--attachment-source", "upload"])?
            .into_request("me@example.com")?;

        assert_eq!(request.attachment, Some(AttachmentSource::Uploaded(None)));

        Ok(())
    }

    #[test]
    fn test_uploaded_file_is_read() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("cv.pdf");
        fs::write(&path, b"%PDF")?;

        let request = parse(&[
            "--to",
            "a@x.com",
            "--attachment-source",
            "upload",
            "--attachment-file",
            &path.to_string_lossy(),
        ])?
        .into_request("me@example.com")?;

        assert_eq!(
            request.attachment,
            Some(AttachmentSource::Uploaded(Some(Attachment::new(
                "cv.pdf",
                b"%PDF".to_vec()
            ))))
        );

        Ok(())
    }

    #[test]
    fn test_predefined_attachment_is_attached_by_default() -> TestResult {
        let request = parse(&[
            "--to",
            "a@x.com",
            "--predefined-attachment",
            "/srv/resume.pdf",
        ])?
        .into_request("me@example.com")?;

        assert_eq!(
            request.attachment,
            Some(AttachmentSource::Predefined(PathBuf::from("/srv/resume.pdf")))
        );

        Ok(())
    }
}
