//! Clinic domain primitives and query contracts.
//!
//! The module defines the owner/pet, vet/specialty and visit records
//! independently from persistence or transport concerns, the repository
//! traits describing the required infrastructure behavior, and the services
//! that compose repository results into response shapes.

pub mod customers;
pub mod memory;
pub mod repositories;
pub mod seed;
pub mod service;
pub mod value_objects;
pub mod vets;
pub mod visits;

pub use customers::{Owner, OwnerRef, Pet, PetType};
pub use repositories::{
    OwnerRepository, PetRepository, PetTypeRepository, SpecialtyRepository, VetRepository,
    VisitRepository,
};
pub use service::{
    ClinicServices, CustomersService, OwnerDetails, PetDraft, ServiceError, VetsService,
    VisitDraft, Visits, VisitsService,
};
pub use value_objects::{Description, PetIds, MAX_DESCRIPTION_LENGTH};
pub use vets::{Specialty, Vet};
pub use visits::{Visit, VisitBuilder, VisitError};

/// Today's date in UTC, the default for birth and visit dates.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
