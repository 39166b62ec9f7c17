#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends an email to every address in a list

use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use cold_email_sender::{
    domain::dispatch::DispatchService,
    infrastructure::{
        cli::ComposeArgs,
        email::smtp::{SMTPConfig, SMTPMailer},
        terminal::{render_abort, render_summary, TerminalReporter},
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(about = "Send one email to a list of recipients over SMTP")]
pub struct Args {
    /// The SMTP server and sender credentials
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The message and its recipients
    #[clap(flatten)]
    pub compose: ComposeArgs,
}

#[mutants::skip]
fn main() -> Result<ExitCode> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let request = args.compose.into_request(&args.smtp.sender)?;
    let mut reporter = TerminalReporter::new(io::stdout().lock(), args.smtp.sender.clone());
    let service = DispatchService::new(Arc::new(SMTPMailer::new(args.smtp)));

    match service.dispatch_request(request, &mut reporter) {
        Ok(report) => {
            let mut out = reporter.into_inner();
            render_summary(&mut out, &report.summary)?;
            out.flush()?;

            if report.summary.error_count > 0 {
                return Ok(ExitCode::FAILURE);
            }

            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            render_abort(&mut io::stderr(), &e)?;

            Ok(ExitCode::from(2))
        }
    }
}
