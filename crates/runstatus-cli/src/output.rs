//! Output formatting for CLI commands.
//!
//! Supports table (human-readable, optionally colored) and JSON output
//! formats.

use std::io::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::cli::Format;
use crate::config::CONFIG_TEMPLATE;
use crate::error::CliError;
use crate::model::{IncidentStatus, OperationalState};
use crate::render::{Color, Span, StyledLine};

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
    color: bool,
}

impl OutputFormat {
    /// Create a new output formatter without color.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self {
            format,
            color: false,
        }
    }

    /// Enable or disable ANSI colors in table output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => self.write_json(writer, value),
            Format::Table => value.write_table(writer),
        }
    }

    /// Write a value as pretty JSON regardless of the selected format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_json<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *writer, value)
            .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write styled lines, colored if enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_lines<W: Write>(&self, writer: &mut W, lines: &[StyledLine]) -> Result<(), CliError> {
        for line in lines {
            for span in &line.spans {
                if self.color {
                    write!(writer, "{}", paint(span))?;
                } else {
                    write!(writer, "{}", span.text)?;
                }
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write a terminal error, followed by the config template when relevant.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_error<W: Write>(&self, writer: &mut W, error: &CliError) -> Result<(), CliError> {
        if self.is_json() {
            let value = serde_json::json!({"status": "error", "message": error.to_string()});
            return self.write_json(writer, &value);
        }

        let mut lines = vec![StyledLine::new(vec![Span::colored(
            error.to_string(),
            Color::Red,
        )])];
        if error.is_config_error() {
            let hint = match error {
                CliError::ConfigMissing { path } => vec![
                    Span::plain("Please create '"),
                    Span::plain(path.display().to_string()).bold(),
                    Span::plain("' with the following format:"),
                ],
                _ => vec![Span::plain("The configuration file uses the following format:")],
            };
            lines.push(StyledLine::new(hint));
            lines.extend(
                CONFIG_TEMPLATE
                    .lines()
                    .map(|l| StyledLine::new(vec![Span::plain(l).bold()])),
            );
        }
        self.write_lines(writer, &lines)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

fn paint(span: &Span) -> ColoredString {
    let mut painted = span.text.as_str().normal();
    if let Some(color) = span.color {
        painted = painted.color(term_color(color));
    }
    if span.bold {
        painted = painted.bold();
    }
    if span.underline {
        painted = painted.underline();
    }
    painted
}

const fn term_color(color: Color) -> colored::Color {
    match color {
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Red => colored::Color::Red,
        Color::Cyan => colored::Color::Cyan,
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as human-readable text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// What happened to a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceChange {
    /// Service was created.
    Added,
    /// Service was deleted.
    Removed,
}

/// Outcome of `services add|remove`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutcome {
    /// Change applied.
    pub change: ServiceChange,
    /// Service name.
    pub name: String,
}

impl TableDisplay for ServiceOutcome {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let verb = match self.change {
            ServiceChange::Added => "Added",
            ServiceChange::Removed => "Removed",
        };
        writeln!(writer, "{verb} service '{}'.", self.name)?;
        Ok(())
    }
}

/// Outcome of `update` and `resolve`.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentUpdated {
    /// Incident id.
    pub incident_id: u64,
    /// Status posted.
    pub status: IncidentStatus,
    /// State posted.
    pub state: OperationalState,
}

impl TableDisplay for IncidentUpdated {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Incident updated.")?;
        Ok(())
    }
}

/// Outcome of `create`.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentCreated {
    /// Id of the new incident.
    pub id: u64,
}

impl TableDisplay for IncidentCreated {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Incident #{} created", self.id)?;
        Ok(())
    }
}
