#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends one plain text message, with an optional attachment, to a list of recipients over a
//! single authenticated SMTP session.

pub mod domain;
pub mod infrastructure;
