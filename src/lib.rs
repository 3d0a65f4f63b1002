//! Record-keeping services of a veterinary clinic.
//!
//! Three services share this crate: **customers** (owners, their pets and pet
//! types), **vets** (the staff directory and its specialties) and **visits**
//! (visit history per pet). The domain and its repository contracts live in
//! [`clinic`]; [`controller`] exposes them over HTTP and [`boot`] wires
//! configuration, stores and router together.
#![allow(clippy::missing_errors_doc)]

pub use self::errors::Error;

pub mod app;
pub mod boot;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clinic;
pub mod config;
pub mod controller;
pub mod environment;
pub mod errors;
pub mod logger;
#[cfg(feature = "with-db")]
pub mod models;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod tests_cfg;
pub mod views;

#[cfg(feature = "testing")]
pub use axum_test::{TestServer, TestServerConfig};

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
