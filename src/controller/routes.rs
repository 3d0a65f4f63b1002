use axum::{
    http::Method,
    routing::{self, MethodRouter},
};

use crate::app::AppContext;

/// A group of handlers mounted under an optional prefix.
#[derive(Clone, Default, Debug)]
pub struct Routes {
    pub prefix: Option<String>,
    pub handlers: Vec<Handler>,
}

#[derive(Clone, Debug)]
pub struct Handler {
    pub uri: String,
    pub method: MethodRouter<AppContext>,
    pub actions: Vec<Method>,
}

impl Routes {
    /// Creates a new [`Routes`] instance with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for the routes. this prefix will be a prefix for all the
    /// routes.
    ///
    /// # Example
    ///
    /// In the following example you are adding `visits` as a prefix for all
    /// routes
    ///
    /// ```rust
    /// use petclinic_records::controller::Routes;
    ///
    /// Routes::new().prefix("visits");
    /// ```
    #[must_use]
    pub fn prefix(mut self, uri: &str) -> Self {
        self.prefix = Some(uri.to_owned());
        self
    }

    /// Adds a method router for a URI, recording the HTTP method it answers.
    #[must_use]
    pub fn add(mut self, uri: &str, action: Method, method: MethodRouter<AppContext>) -> Self {
        self.handlers.push(Handler {
            uri: uri.to_owned(),
            method,
            actions: vec![action],
        });
        self
    }

    #[must_use]
    pub fn get<H, T>(self, uri: &str, handler: H) -> Self
    where
        H: axum::handler::Handler<T, AppContext>,
        T: 'static,
    {
        self.add(uri, Method::GET, routing::get(handler))
    }

    #[must_use]
    pub fn post<H, T>(self, uri: &str, handler: H) -> Self
    where
        H: axum::handler::Handler<T, AppContext>,
        T: 'static,
    {
        self.add(uri, Method::POST, routing::post(handler))
    }

    #[must_use]
    pub fn put<H, T>(self, uri: &str, handler: H) -> Self
    where
        H: axum::handler::Handler<T, AppContext>,
        T: 'static,
    {
        self.add(uri, Method::PUT, routing::put(handler))
    }
}
