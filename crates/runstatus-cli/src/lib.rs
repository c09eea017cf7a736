//! # runstatus-cli
//!
//! Command-line client for a hosted status page.
//!
//! Provides commands for:
//! - Page status overview (services, open incidents)
//! - Service management
//! - Incident creation, updates and resolution
//!
//! # Architecture
//!
//! Credentials come from a `key = value` file (see [`config`]). Every
//! command issues one or two signed HTTP requests through
//! [`client::ApiClient`]; read commands render the result with [`render`].
//!
//! ```text
//! ┌───────────────┐   signed HTTPS / JSON   ┌──────────────────┐
//! │ runstatus-cli │◄───────────────────────►│  status page API │
//! └───────────────┘                         └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod prompt;
pub mod render;
pub mod sign;
pub mod transport;

pub use cli::{Cli, Commands, Format};
pub use client::ApiClient;
pub use config::Config;
pub use error::CliError;
pub use output::OutputFormat;
