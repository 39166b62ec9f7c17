//! Infrastructure: the SMTP mailer and the command-line front end

pub mod cli;
pub mod email;
pub mod terminal;
