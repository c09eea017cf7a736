//! Incident lifecycle commands: create, update, resolve.
//!
//! Options not given on the command line are asked for interactively.
//! `resolve` is `update` with status `resolved` and state `operational`.

use std::io::Write;

use crate::cli::{CreateArgs, ResolveArgs, UpdateArgs};
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{IncidentStatus, OperationalState};
use crate::output::{IncidentCreated, IncidentUpdated, OutputFormat};
use crate::prompt::{Prompter, state_or_prompt, status_or_prompt, text_or_prompt};
use crate::transport::Transport;

/// Handler for incident commands.
pub struct IncidentCommand<'a, T, P: ?Sized> {
    client: &'a ApiClient<T>,
    prompter: &'a P,
}

impl<'a, T: Transport, P: Prompter + ?Sized> IncidentCommand<'a, T, P> {
    /// Creates a new incident command handler.
    #[must_use]
    pub const fn new(client: &'a ApiClient<T>, prompter: &'a P) -> Self {
        Self { client, prompter }
    }

    /// Open a new incident.
    ///
    /// # Errors
    ///
    /// Returns error if prompting or the API call fails.
    pub async fn create<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &CreateArgs,
    ) -> Result<(), CliError> {
        let title = text_or_prompt(self.prompter, args.title.clone(), "Title", "title", false)?;
        let services = text_or_prompt(
            self.prompter,
            args.services.clone(),
            "Services (comma-separated list)",
            "services",
            true,
        )?;
        let status = status_or_prompt(self.prompter, args.status, Some(IncidentStatus::Investigating))?;
        let state = state_or_prompt(self.prompter, args.state)?;
        let text = text_or_prompt(self.prompter, args.text.clone(), "Text", "text", false)?;

        let id = self
            .client
            .create_incident(&title, &services, &text, status, state)
            .await?;
        format.write(out, &IncidentCreated { id })
    }

    /// Post an update to an open incident.
    ///
    /// # Errors
    ///
    /// Returns error if prompting or the API call fails.
    pub async fn update<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &UpdateArgs,
    ) -> Result<(), CliError> {
        let status = status_or_prompt(self.prompter, args.status, None)?;
        let state = state_or_prompt(self.prompter, args.state)?;
        let text = text_or_prompt(self.prompter, args.text.clone(), "Text", "text", false)?;
        self.post_event(out, format, args.incident, status, state, &text)
            .await
    }

    /// Resolve an open incident.
    ///
    /// # Errors
    ///
    /// Returns error if prompting or the API call fails.
    pub async fn resolve<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &ResolveArgs,
    ) -> Result<(), CliError> {
        let text = text_or_prompt(self.prompter, args.text.clone(), "Text", "text", false)?;
        self.post_event(
            out,
            format,
            args.incident,
            IncidentStatus::Resolved,
            OperationalState::Operational,
            &text,
        )
        .await
    }

    async fn post_event<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        incident_id: u64,
        status: IncidentStatus,
        state: OperationalState,
        text: &str,
    ) -> Result<(), CliError> {
        self.client
            .add_incident_event(incident_id, status, state, text)
            .await?;
        format.write(
            out,
            &IncidentUpdated {
                incident_id,
                status,
                state,
            },
        )
    }
}
