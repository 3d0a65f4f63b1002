//! Query contracts the services rely on.
//!
//! Every lookup by identifier reports a missing record as `Ok(None)` and every
//! filtered listing reports no matches as an empty vector. Errors are reserved
//! for store failures. Listings come back in primary key order, which for the
//! bundled stores is insertion order.

use async_trait::async_trait;

use super::{
    customers::{Owner, Pet, PetType},
    value_objects::PetIds,
    vets::{Specialty, Vet},
    visits::Visit,
};

/// Persistence responsibilities for the owner aggregate, pets included.
#[async_trait]
pub trait OwnerRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Lists every owner with their pets.
    async fn find_all(&self) -> Result<Vec<Owner>, Self::Error>;

    /// Retrieves an owner and their pets.
    async fn find_by_id(&self, id: i32) -> Result<Option<Owner>, Self::Error>;

    /// Inserts the owner when it has no identifier, updates it otherwise.
    ///
    /// Pets held by the owner are saved alongside it. The returned owner and
    /// its pets carry their assigned identifiers.
    async fn save(&self, owner: Owner) -> Result<Owner, Self::Error>;

    /// Deletes an owner together with their pets.
    async fn delete(&self, id: i32) -> Result<bool, Self::Error>;
}

/// Persistence responsibilities for individual pets.
#[async_trait]
pub trait PetRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Retrieves a pet with its type and owner reference.
    async fn find_by_id(&self, id: i32) -> Result<Option<Pet>, Self::Error>;

    /// Inserts or updates a pet.
    ///
    /// Implementors must reject pets whose owner reference carries no
    /// identifier, and pet types that were never saved.
    async fn save(&self, pet: Pet) -> Result<Pet, Self::Error>;

    /// Deletes a pet.
    async fn delete(&self, id: i32) -> Result<bool, Self::Error>;
}

/// Reference data: kinds of pets.
#[async_trait]
pub trait PetTypeRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    async fn find_all(&self) -> Result<Vec<PetType>, Self::Error>;

    async fn find_by_id(&self, id: i32) -> Result<Option<PetType>, Self::Error>;

    async fn save(&self, pet_type: PetType) -> Result<PetType, Self::Error>;
}

/// Reference data: vet specialties.
#[async_trait]
pub trait SpecialtyRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    async fn find_all(&self) -> Result<Vec<Specialty>, Self::Error>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Specialty>, Self::Error>;

    async fn save(&self, specialty: Specialty) -> Result<Specialty, Self::Error>;
}

/// Persistence responsibilities for vets and their specialty membership.
#[async_trait]
pub trait VetRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    async fn find_all(&self) -> Result<Vec<Vet>, Self::Error>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Vet>, Self::Error>;

    /// Inserts or updates a vet and replaces its membership.
    ///
    /// Specialties must already be saved. A membership table cannot hold the
    /// same specialty twice, so duplicates collapse once persisted.
    async fn save(&self, vet: Vet) -> Result<Vet, Self::Error>;

    async fn delete(&self, id: i32) -> Result<bool, Self::Error>;
}

/// Persistence responsibilities for visit records.
#[async_trait]
pub trait VisitRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    async fn find_all(&self) -> Result<Vec<Visit>, Self::Error>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Visit>, Self::Error>;

    /// Visits of one pet, in store order.
    async fn find_by_pet_id(&self, pet_id: i32) -> Result<Vec<Visit>, Self::Error>;

    /// Visits of any pet in the set, in store order, answered by one query.
    ///
    /// The result equals the store-ordered union of [`find_by_pet_id`] over
    /// the members of `pet_ids`, without duplicates.
    ///
    /// [`find_by_pet_id`]: VisitRepository::find_by_pet_id
    async fn find_by_pet_id_in(&self, pet_ids: &PetIds) -> Result<Vec<Visit>, Self::Error>;

    async fn save(&self, visit: Visit) -> Result<Visit, Self::Error>;

    async fn delete(&self, id: i32) -> Result<bool, Self::Error>;
}
