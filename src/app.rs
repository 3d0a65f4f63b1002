//! Shared state handed to every request handler.

#[cfg(feature = "with-db")]
use sea_orm::DatabaseConnection;

use crate::{
    clinic::{ClinicServices, CustomersService, VetsService, VisitsService},
    config::Config,
    environment::Environment,
};

/// Represents the application context for a web server.
///
/// Cloning is cheap: services hold their repositories behind `Arc`s.
#[derive(Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct AppContext {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// Configuration settings for the application
    pub config: Config,
    /// Owners, pets and pet types.
    pub customers: CustomersService,
    /// Vets and their specialties.
    pub vets: VetsService,
    /// Visit history.
    pub visits: VisitsService,
    /// Database connection backing the services, when one is configured.
    #[cfg(feature = "with-db")]
    pub db: Option<DatabaseConnection>,
}

impl AppContext {
    /// Assembles a context from already built services.
    #[must_use]
    pub fn new(environment: Environment, config: Config, services: ClinicServices) -> Self {
        let ClinicServices {
            customers,
            vets,
            visits,
        } = services;
        Self {
            environment,
            config,
            customers,
            vets,
            visits,
            #[cfg(feature = "with-db")]
            db: None,
        }
    }

    /// The services as one bundle, e.g. for seeding.
    #[must_use]
    pub fn services(&self) -> ClinicServices {
        ClinicServices {
            customers: self.customers.clone(),
            vets: self.vets.clone(),
            visits: self.visits.clone(),
        }
    }
}
