//! Status page documents exchanged with the API.
//!
//! All entities are read-only snapshots: the client never mutates them
//! locally, every change goes through the API and is observed on the next
//! fetch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Severity level of a page or service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalState {
    /// Everything works.
    Operational,
    /// Slower than usual.
    DegradedPerformance,
    /// Some functionality is unavailable.
    PartialOutage,
    /// Unavailable.
    MajorOutage,
}

impl OperationalState {
    /// All states, least severe first.
    pub const ALL: [Self; 4] = [
        Self::Operational,
        Self::DegradedPerformance,
        Self::PartialOutage,
        Self::MajorOutage,
    ];

    /// Wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::DegradedPerformance => "degraded_performance",
            Self::PartialOutage => "partial_outage",
            Self::MajorOutage => "major_outage",
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow stage of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Cause unknown.
    Investigating,
    /// Cause found.
    Identified,
    /// Fix applied, watching.
    Monitoring,
    /// Over.
    Resolved,
}

impl IncidentStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Investigating,
        Self::Identified,
        Self::Monitoring,
        Self::Resolved,
    ];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investigating => "investigating",
            Self::Identified => "identified",
            Self::Monitoring => "monitoring",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status page as returned by `GET /pages/{page}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStatus {
    /// Page-level state.
    pub state: OperationalState,
    /// Custom domain, if the page has one.
    #[serde(default)]
    pub domain: Option<String>,
    /// Subdomain under the hosted domain.
    #[serde(default)]
    pub subdomain: String,
    /// Monitored services.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Incidents, open and closed.
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl PageStatus {
    /// Public URL of the page.
    #[must_use]
    pub fn public_url(&self) -> String {
        match self.domain.as_deref() {
            Some(domain) if !domain.is_empty() => format!("https://{domain}"),
            _ => format!("https://{}.runstat.us", self.subdomain),
        }
    }

    /// Incidents without an end date, in API order.
    pub fn open_incidents(&self) -> impl Iterator<Item = &Incident> {
        self.incidents.iter().filter(|incident| incident.is_open())
    }
}

/// A monitored service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Display name, unique key for removal.
    pub name: String,
    /// Current state.
    pub state: OperationalState,
    /// Resource URL.
    pub url: String,
}

/// A tracked disruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Resource URL; the trailing segment is the incident id.
    pub url: String,
    /// Title.
    pub title: String,
    /// Current severity.
    pub state: OperationalState,
    /// Current workflow stage.
    pub status: IncidentStatus,
    /// When the incident was opened.
    pub start_date: String,
    /// When the incident was resolved, `None` while open.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Event log, most recent first.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Incident {
    /// Numeric id parsed from the last path segment of [`Incident::url`].
    pub fn id(&self) -> Result<u64, CliError> {
        let segment = self
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        segment
            .parse()
            .map_err(|_| CliError::Decode(format!("incident url without id: {}", self.url)))
    }

    /// Whether the incident is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Most recent event, if any.
    #[must_use]
    pub fn latest_event(&self) -> Option<&Event> {
        self.events.first()
    }
}

/// Entry in an incident's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Message.
    pub text: String,
    /// When the event was posted.
    pub created: String,
    /// Incident status set by this event.
    pub status: IncidentStatus,
    /// Incident state set by this event.
    pub state: OperationalState,
}

/// Body of `POST /services`.
#[derive(Debug, Clone, Serialize)]
pub struct NewService<'a> {
    /// Service name.
    pub name: &'a str,
}

/// Body of `POST /incidents/{id}/events`.
#[derive(Debug, Clone, Serialize)]
pub struct NewEvent<'a> {
    /// New incident status.
    pub status: IncidentStatus,
    /// New incident state.
    pub state: OperationalState,
    /// Message.
    pub text: &'a str,
}

/// Body of `POST /incidents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIncident {
    /// Names of affected services.
    pub services: Vec<String>,
    /// Title.
    pub title: String,
    /// Text of the first event.
    pub status_text: String,
    /// Initial status.
    pub status: IncidentStatus,
    /// Initial state.
    pub state: OperationalState,
}

impl NewIncident {
    /// Build a request body from a comma-separated service list.
    ///
    /// Names are trimmed and empty entries dropped.
    #[must_use]
    pub fn new(
        title: &str,
        service_names: &str,
        text: &str,
        status: IncidentStatus,
        state: OperationalState,
    ) -> Self {
        let services = service_names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        Self {
            services,
            title: title.to_string(),
            status_text: text.to_string(),
            status,
            state,
        }
    }
}

/// Response body of `POST /incidents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedIncident {
    /// Id of the new incident.
    pub id: u64,
}
