//! JSON shapes returned by the controllers.

pub mod customers;
pub mod vets;
pub mod visits;
