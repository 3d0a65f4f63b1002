//! Table definitions of the relational store.

pub mod prelude;

pub mod owners;
pub mod pets;
pub mod specialties;
pub mod types;
pub mod vet_specialties;
pub mod vets;
pub mod visits;
