//! Service management command implementation.

use std::io::Write;

use crate::cli::ServiceAction;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::output::{OutputFormat, ServiceChange, ServiceOutcome};
use crate::transport::Transport;

/// Handler for `services add|remove`.
pub struct ServicesCommand<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> ServicesCommand<'a, T> {
    /// Creates a new services command handler.
    #[must_use]
    pub const fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Executes the services subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        action: ServiceAction,
        name: &str,
    ) -> Result<(), CliError> {
        let change = match action {
            ServiceAction::Add => {
                self.client.add_service(name).await?;
                ServiceChange::Added
            }
            ServiceAction::Remove => {
                self.client.remove_service(name).await?;
                ServiceChange::Removed
            }
        };

        format.write(
            out,
            &ServiceOutcome {
                change,
                name: name.to_string(),
            },
        )
    }
}
