//! Collects the [`Routes`] of every mounted service and turns them into an
//! axum [`Router`].

use std::fmt;

use axum::{http::Method, Router as AXRouter};

use super::{monitoring, owners, pets, routes::Routes, vets, visits};
use crate::{
    app::AppContext,
    config::{Config, Service},
};

/// A single mounted URI and the methods it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoutes {
    pub uri: String,
    pub actions: Vec<Method>,
}

impl fmt::Display for ListRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions = self
            .actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "[{actions}] {}", self.uri)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppRoutes {
    routes: Vec<Routes>,
}

impl AppRoutes {
    /// Create a new instance with the monitoring routes.
    #[must_use]
    pub fn with_default_routes() -> Self {
        Self::empty().add_route(monitoring::routes())
    }

    /// Create an empty instance.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Monitoring routes plus the routes of every service the configuration
    /// enables.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut app_routes = Self::with_default_routes();
        if config.serves(Service::Customers) {
            app_routes = app_routes
                .add_route(owners::routes())
                .add_route(pets::routes());
        }
        if config.serves(Service::Vets) {
            app_routes = app_routes.add_route(vets::routes());
        }
        if config.serves(Service::Visits) {
            app_routes = app_routes.add_route(visits::routes());
        }
        app_routes
    }

    #[must_use]
    pub fn add_route(mut self, route: Routes) -> Self {
        self.routes.push(route);
        self
    }

    /// Flattens the groups into full URIs, merging methods mounted on the
    /// same URI.
    #[must_use]
    pub fn collect(&self) -> Vec<ListRoutes> {
        let mut collected: Vec<ListRoutes> = Vec::new();
        for (uri, handler) in self.mounted() {
            if let Some(existing) = collected.iter_mut().find(|route| route.uri == uri) {
                existing.actions.extend(handler.actions.iter().cloned());
            } else {
                collected.push(ListRoutes {
                    uri,
                    actions: handler.actions.clone(),
                });
            }
        }
        collected
    }

    fn mounted(&self) -> impl Iterator<Item = (String, &super::routes::Handler)> + '_ {
        self.routes.iter().flat_map(|routes| {
            routes.handlers.iter().map(move |handler| {
                let uri = join_uri(&[routes.prefix.as_deref(), Some(handler.uri.as_str())]);
                (uri, handler)
            })
        })
    }

    /// Builds the axum router, leaving state to be supplied by the caller.
    #[must_use]
    pub fn to_router(&self) -> AXRouter<AppContext> {
        let mut router = AXRouter::new();
        for (uri, handler) in self.mounted() {
            tracing::debug!(uri = %uri, actions = ?handler.actions, "route_mounted");
            router = router.route(&uri, handler.method.clone());
        }
        router
    }
}

fn join_uri(parts: &[Option<&str>]) -> String {
    let joined = parts
        .iter()
        .flatten()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

#[cfg(test)]
mod tests {
    use axum::http::Method;

    use super::{join_uri, AppRoutes};
    use crate::{config::Service, tests_cfg};

    #[test]
    fn joins_prefixes() {
        assert_eq!(join_uri(&[Some("/api/"), None, Some("owners")]), "/api/owners");
        assert_eq!(join_uri(&[None, Some("/")]), "/");
    }

    #[test]
    fn lists_routes_of_enabled_services_only() {
        let mut config = tests_cfg::config::test_config();
        config.services = [Service::Visits].into_iter().collect();

        let routes = AppRoutes::from_config(&config).collect();
        let uris: Vec<_> = routes.iter().map(|route| route.uri.as_str()).collect();
        assert!(uris.contains(&"/_ping"));
        assert!(uris.contains(&"/pets/visits"));
        assert!(!uris.contains(&"/vets"));
        assert!(!uris.contains(&"/owners"));

        let visits = routes
            .iter()
            .find(|route| route.uri == "/owners/{owner_id}/pets/{pet_id}/visits")
            .expect("visit routes");
        assert_eq!(visits.actions, vec![Method::GET, Method::POST]);
    }
}
