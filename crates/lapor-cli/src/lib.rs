#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::future_not_send)]

//! Administrative CLI for the LaporOnline report service.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: reqwest transport, app context and CLI errors
//! - `session.rs`: session slots persisted to a JSON file
//! - `images.rs`: temporary-file image handles
//! - `logging.rs`: tracing subscriber setup
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod images;
pub(crate) mod logging;
pub(crate) mod output;
pub(crate) mod session;

pub use cli::run;
