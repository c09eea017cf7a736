//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`info`] - Page status overview
//! - [`services`] - Service management
//! - [`incident`] - Incident create, update and resolve

pub mod incident;
pub mod info;
pub mod services;

pub use incident::IncidentCommand;
pub use info::InfoCommand;
pub use services::ServicesCommand;
