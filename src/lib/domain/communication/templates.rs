//! Built-in message templates

use askama::Template;
use clap::ValueEnum;

/// Role mentioned when the sender did not name one
const DEFAULT_ROLE: &str = "opportunities on your team";

/// The built-in templates a message can start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateKind {
    /// A general introduction
    Introduction,

    /// An application for a specific role, usually sent with a resume
    JobApplication,

    /// A reminder about an earlier message
    FollowUp,
}

/// Values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    /// The name the message is signed with
    pub sender_name: &'a str,

    /// The role or topic the message is about
    pub role: Option<&'a str>,
}

/// A subject and body ready to be edited or sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// The subject line
    pub subject: String,

    /// The plain text body
    pub body: String,
}

#[derive(Template)]
#[template(path = "emails/introduction.txt")]
struct IntroductionTemplate<'a> {
    sender_name: &'a str,
    role: &'a str,
}

#[derive(Template)]
#[template(path = "emails/job_application.txt")]
struct JobApplicationTemplate<'a> {
    sender_name: &'a str,
    role: &'a str,
}

#[derive(Template)]
#[template(path = "emails/follow_up.txt")]
struct FollowUpTemplate<'a> {
    sender_name: &'a str,
    role: &'a str,
}

impl TemplateKind {
    /// The subject line suggested by the template
    pub fn subject(&self, context: &TemplateContext<'_>) -> String {
        match (self, context.role) {
            (Self::Introduction, _) => format!("Introduction from {}", context.sender_name),
            (Self::JobApplication, Some(role)) => format!("Application for {role}"),
            (Self::JobApplication, None) => "Job application".to_string(),
            (Self::FollowUp, Some(role)) => format!("Following up: {role}"),
            (Self::FollowUp, None) => "Following up on my previous email".to_string(),
        }
    }

    /// Renders the template into a draft
    pub fn draft(&self, context: &TemplateContext<'_>) -> Result<Draft, askama::Error> {
        let sender_name = context.sender_name;
        let role = context.role.unwrap_or(DEFAULT_ROLE);

        let body = match self {
            Self::Introduction => IntroductionTemplate { sender_name, role }.render()?,
            Self::JobApplication => JobApplicationTemplate { sender_name, role }.render()?,
            Self::FollowUp => FollowUpTemplate { sender_name, role }.render()?,
        };

        Ok(Draft {
            subject: self.subject(context),
            body,
        })
    }
}

impl Draft {
    /// Replaces the subject and/or body with the user's own text
    pub fn edit(self, subject: Option<String>, body: Option<String>) -> Self {
        Self {
            subject: subject.unwrap_or(self.subject),
            body: body.unwrap_or(self.body),
        }
    }
}
