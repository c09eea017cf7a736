//! Status page API client.
//!
//! Wraps a [`Transport`] with the five operations the CLI needs. Each call
//! is one round trip (`remove_service` is two: a fetch to resolve the name,
//! then the delete). Nothing is cached between calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use runstatus_cli::client::ApiClient;
//! use runstatus_cli::config::Config;
//! use runstatus_cli::sign::ExoscaleSigner;
//! use runstatus_cli::transport::HttpTransport;
//!
//! # async fn example() -> Result<(), runstatus_cli::CliError> {
//! let config = Config::parse("page = acme\nkey = EXO...\nsecret = ...\n")?;
//! let transport = HttpTransport::new(ExoscaleSigner::new(&config.api_key, &config.secret_key))?;
//! let client = ApiClient::new(&config, transport);
//! let status = client.fetch_status().await?;
//! println!("{} services", status.services.len());
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info};

use crate::config::Config;
use crate::error::CliError;
use crate::model::{
    CreatedIncident, IncidentStatus, NewEvent, NewIncident, NewService, OperationalState,
    PageStatus, Service,
};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Authenticated client for one status page.
#[derive(Debug)]
pub struct ApiClient<T> {
    page: String,
    base_url: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client for the page named in `config`.
    pub fn new(config: &Config, transport: T) -> Self {
        let base_url = format!(
            "{}/pages/{}",
            config.endpoint.trim_end_matches('/'),
            config.page
        );
        Self {
            page: config.page.clone(),
            base_url,
            transport,
        }
    }

    /// `{endpoint}/pages/{page}`.
    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying transport.
    #[cfg(test)]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Page
    // ========================================================================

    /// Fetch the current page document.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Remote`] unless the API answers 200.
    pub async fn fetch_status(&self) -> Result<PageStatus, CliError> {
        let response = self.transport.send(ApiRequest::get(&self.base_url)).await?;
        let response = expect_status(response, 200, || {
            format!("Status page '{}' not found", self.page)
        })?;
        let status: PageStatus = response.json()?;
        debug!(
            page = %self.page,
            services = status.services.len(),
            incidents = status.incidents.len(),
            "Fetched page status"
        );
        Ok(status)
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Add a service to the page.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Remote`] unless the API answers 201.
    pub async fn add_service(&self, name: &str) -> Result<(), CliError> {
        let url = format!("{}/services", self.base_url);
        let request = ApiRequest::post(url, &NewService { name })?;
        let response = self.transport.send(request).await?;
        expect_status(response, 201, || format!("Error adding service '{name}'"))?;
        info!(page = %self.page, service = name, "Added service");
        Ok(())
    }

    /// Remove the service called exactly `name`.
    ///
    /// Returns the removed service.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ServiceNotFound`] or [`CliError::AmbiguousService`]
    /// if the name does not match exactly one service, and
    /// [`CliError::Remote`] unless the delete answers 204.
    pub async fn remove_service(&self, name: &str) -> Result<Service, CliError> {
        let status = self.fetch_status().await?;
        let service = find_service(status.services, name)?;

        let response = self
            .transport
            .send(ApiRequest::delete(&service.url))
            .await?;
        expect_status(response, 204, || format!("Error removing service '{name}'"))?;
        info!(page = %self.page, service = name, "Removed service");
        Ok(service)
    }

    // ========================================================================
    // Incidents
    // ========================================================================

    /// Append an event to an incident, possibly changing its status and state.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Remote`] unless the API answers 201.
    pub async fn add_incident_event(
        &self,
        incident_id: u64,
        status: IncidentStatus,
        state: OperationalState,
        text: &str,
    ) -> Result<(), CliError> {
        let url = format!("{}/incidents/{incident_id}/events", self.base_url);
        let request = ApiRequest::post(url, &NewEvent { status, state, text })?;
        let response = self.transport.send(request).await?;
        expect_status(response, 201, || {
            format!("Error updating incident #{incident_id}")
        })?;
        info!(page = %self.page, incident = incident_id, %status, %state, "Updated incident");
        Ok(())
    }

    /// Open a new incident. `service_names` is a comma-separated list.
    ///
    /// Returns the id of the new incident.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Remote`] unless the API answers 201.
    pub async fn create_incident(
        &self,
        title: &str,
        service_names: &str,
        text: &str,
        status: IncidentStatus,
        state: OperationalState,
    ) -> Result<u64, CliError> {
        let url = format!("{}/incidents", self.base_url);
        let body = NewIncident::new(title, service_names, text, status, state);
        let request = ApiRequest::post(url, &body)?;
        let response = self.transport.send(request).await?;
        let response = expect_status(response, 201, || "Error creating incident".to_string())?;
        let created: CreatedIncident = response.json()?;
        info!(page = %self.page, incident = created.id, "Created incident");
        Ok(created.id)
    }
}

/// Pass `response` through if it has the `expected` status.
fn expect_status(
    response: ApiResponse,
    expected: u16,
    context: impl FnOnce() -> String,
) -> Result<ApiResponse, CliError> {
    if response.status == expected {
        Ok(response)
    } else {
        Err(CliError::Remote {
            context: context(),
            status: response.status,
            body: response.body,
        })
    }
}

/// The single service named exactly `name`.
fn find_service(services: Vec<Service>, name: &str) -> Result<Service, CliError> {
    let mut matches: Vec<Service> = services.into_iter().filter(|s| s.name == name).collect();
    match matches.len() {
        0 => Err(CliError::ServiceNotFound { name: name.into() }),
        1 => Ok(matches.remove(0)),
        count => Err(CliError::AmbiguousService {
            name: name.into(),
            count,
        }),
    }
}
