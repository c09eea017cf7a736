//! Human-readable rendering of a page status.
//!
//! Rendering produces [`StyledLine`]s: plain text spans annotated with a
//! color and emphasis. Turning them into terminal escapes is the job of
//! [`OutputFormat`](crate::output::OutputFormat), which keeps this module
//! free of I/O and deterministic for a given `now`.
//!
//! ```text
//!  ● https://acme.runstat.us	[partial_outage]
//!
//! Services:
//!  ● api	[partial_outage]
//!  ● web	[operational]
//!
//! Open incidents:
//!  ● #42 - Database down	[partial_outage]	[identified]
//!    Failover in progress
//!    Created: 2 hours, 5 minutes ago. Updated: 12 minutes ago.
//!    To update this incident: runstatus update 42
//!    To resolve: runstatus resolve 42
//! ```

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc};

use crate::error::CliError;
use crate::model::{Incident, OperationalState, PageStatus};

/// Marker printed in front of every stateful line.
pub const DOT: &str = " ● ";

/// Name of the binary, used in command hints.
const BIN: &str = "runstatus";

/// Accepted timestamp layouts, both UTC.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ"];

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Units for [`time_ago`], largest first.
const CHUNKS: [(i64, &str); 6] = [
    (365 * DAY, "years"),
    (30 * DAY, "months"),
    (7 * DAY, "weeks"),
    (DAY, "days"),
    (HOUR, "hours"),
    (MINUTE, "minutes"),
];

/// Terminal colors used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Operational.
    Green,
    /// Degraded or partial outage; incident ages.
    Yellow,
    /// Major outage; errors.
    Red,
    /// Command hints.
    Cyan,
}

/// Color for an operational state.
#[must_use]
pub const fn state_color(state: OperationalState) -> Color {
    match state {
        OperationalState::Operational => Color::Green,
        OperationalState::DegradedPerformance | OperationalState::PartialOutage => Color::Yellow,
        OperationalState::MajorOutage => Color::Red,
    }
}

/// A run of text with uniform style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text.
    pub text: String,
    /// Foreground color.
    pub color: Option<Color>,
    /// Bold.
    pub bold: bool,
    /// Underlined.
    pub underline: bool,
}

impl Span {
    /// Unstyled text.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
            underline: false,
        }
    }

    /// Colored text.
    #[must_use]
    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::plain(text)
        }
    }

    /// Make the span bold.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Underline the span.
    #[must_use]
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// One output line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    /// Spans, left to right.
    pub spans: Vec<Span>,
}

impl StyledLine {
    /// A line made of `spans`.
    #[must_use]
    pub const fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// An empty line.
    #[must_use]
    pub const fn blank() -> Self {
        Self { spans: Vec::new() }
    }

    /// Text without styling.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Render the summary shown by `runstatus info`.
///
/// Services are sorted by name; open incidents keep the API order. Ages are
/// computed against `now`.
///
/// # Errors
///
/// Returns [`CliError::Parse`] if an incident or event timestamp cannot be
/// parsed, or [`CliError::Decode`] if an incident URL carries no id.
pub fn render_summary(status: &PageStatus, now: DateTime<Utc>) -> Result<Vec<StyledLine>, CliError> {
    let mut lines = Vec::new();

    let color = state_color(status.state);
    lines.push(StyledLine::new(vec![
        Span::colored(DOT, color).bold(),
        Span::plain(status.public_url()).underline(),
        Span::plain("\t"),
        Span::colored(format!("[{}]", status.state), color).bold(),
    ]));

    if !status.services.is_empty() {
        lines.push(StyledLine::blank());
        lines.push(StyledLine::new(vec![Span::plain("Services:").bold()]));
        let mut services: Vec<_> = status.services.iter().collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        for service in services {
            let color = state_color(service.state);
            lines.push(StyledLine::new(vec![
                Span::colored(DOT, color).bold(),
                Span::plain(service.name.as_str()),
                Span::plain("\t"),
                Span::colored(format!("[{}]", service.state), color).bold(),
            ]));
        }
    }

    let open: Vec<&Incident> = status.open_incidents().collect();
    if !open.is_empty() {
        lines.push(StyledLine::blank());
        lines.push(StyledLine::new(vec![Span::plain("Open incidents:").bold()]));
    }
    for incident in open {
        render_incident(&mut lines, incident, now)?;
    }

    Ok(lines)
}

fn render_incident(
    lines: &mut Vec<StyledLine>,
    incident: &Incident,
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    let id = incident.id()?;
    let color = state_color(incident.state);
    lines.push(StyledLine::new(vec![
        Span::colored(DOT, color).bold(),
        Span::plain(format!("#{id} - {}", incident.title)),
        Span::colored(
            format!("\t[{}]\t[{}]", incident.state, incident.status),
            color,
        ),
    ]));

    let event = incident.latest_event();
    if let Some(event) = event {
        lines.push(StyledLine::new(vec![Span::plain(format!("   {}", event.text))]));
    }
    let created = time_ago(&incident.start_date, now)?;
    let updated = match event {
        Some(event) => time_ago(&event.created, now)?,
        None => created.clone(),
    };
    lines.push(StyledLine::new(vec![Span::colored(
        format!("   Created: {created} ago. Updated: {updated} ago."),
        Color::Yellow,
    )]));

    lines.push(StyledLine::new(vec![
        Span::colored("   To update this incident: ", Color::Cyan),
        Span::plain(format!("{BIN} update {id}")),
    ]));
    lines.push(StyledLine::new(vec![
        Span::colored("   To resolve: ", Color::Cyan),
        Span::plain(format!("{BIN} resolve {id}")),
    ]));
    Ok(())
}

/// Parse an API timestamp, with or without fractional seconds.
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, CliError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::Parse {
            timestamp: timestamp.to_string(),
        })
}

/// Elapsed time from `timestamp` to `now`, e.g. `"1 hours, 1 minutes"`.
///
/// One leap day is subtracted for every leap year in
/// `[timestamp.year, now.year)`, whether or not its 29 February falls
/// between the two instants. The largest unit that fits is printed, then the
/// next smaller unit if its count is non-zero. Anything under a minute,
/// including a future timestamp, is `"0 minutes"`.
///
/// # Errors
///
/// Returns [`CliError::Parse`] if `timestamp` is not in a supported layout.
pub fn time_ago(timestamp: &str, now: DateTime<Utc>) -> Result<String, CliError> {
    let then = parse_timestamp(timestamp)?;
    let delta = now - then - TimeDelta::days(leap_days(then.year(), now.year()));
    let since = delta.num_milliseconds().div_euclid(1000);
    Ok(format_elapsed(since))
}

/// Format a number of seconds with at most two units.
fn format_elapsed(since: i64) -> String {
    if since <= 0 {
        return "0 minutes".to_string();
    }

    let Some(index) = CHUNKS.iter().position(|(seconds, _)| since / seconds != 0) else {
        return "0 minutes".to_string();
    };
    let (seconds, name) = CHUNKS[index];
    let count = since / seconds;
    let mut result = format!("{count} {name}");

    if let Some((seconds2, name2)) = CHUNKS.get(index + 1) {
        let count2 = (since - seconds * count) / seconds2;
        if count2 != 0 {
            result.push_str(&format!(", {count2} {name2}"));
        }
    }
    result
}

/// Number of leap years in `[from, to)`.
fn leap_days(from: i32, to: i32) -> i64 {
    let before = |year: i32| {
        let y = i64::from(year) - 1;
        y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
    };
    before(to) - before(from)
}
