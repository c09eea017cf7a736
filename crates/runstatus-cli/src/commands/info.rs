//! Page status command implementation.
//!
//! Shows the page state, its services and the open incidents.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::client::ApiClient;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::render::render_summary;
use crate::transport::Transport;

/// Info command executor.
pub struct InfoCommand<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> InfoCommand<'a, T> {
    /// Create a new info command.
    #[must_use]
    pub const fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Execute the info command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or rendered.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        self.execute_at(out, format, Utc::now()).await
    }

    /// Execute with ages computed against `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or rendered.
    pub async fn execute_at<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        now: DateTime<Utc>,
    ) -> Result<(), CliError> {
        let status = self.client.fetch_status().await?;
        if format.is_json() {
            return format.write_json(out, &status);
        }
        let lines = render_summary(&status, now)?;
        format.write_lines(out, &lines)
    }
}
